//! Playback state machine.
//!
//! All session bookkeeping flows through [`apply`], a pure transition
//! function over [`ControllerState`]. The [`TurnController`] wraps it
//! with the actual gateway calls and enforces the mode gate: a new
//! advance is only issued from `Idle`, so at most one request is ever
//! in flight, and `GameOver` latches until the session is replaced.

use std::mem;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::warn;

use gateway::board::{position_of, BOARD_SIZE};
use gateway::engine::dto::{
    AgentSummary, FastForwardResponse, NewGameRequest, NewGameResponse, PlayResponse,
    StateSnapshot, TurnInfo, TurnResponse,
};

use crate::api::{ApiError, SessionApi};
use crate::scheduler::AutoPlay;

/// How many log entries the default rendering window shows.
pub const DEFAULT_LOG_WINDOW: usize = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Mode {
    #[default]
    Idle,
    Stepping,
    Batching,
    AutoPlaying,
    GameOver,
}

/// The watched session as last reported by the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub game_id: String,
    pub state: StateSnapshot,
    pub agents: Vec<AgentSummary>,
    pub winner: Option<u8>,
}

impl SessionView {
    /// Each player's board slot mapped onto the 11x11 rendering grid.
    pub fn grid_positions(&self) -> Vec<(usize, usize)> {
        self.state
            .positions
            .iter()
            .map(|&slot| position_of(usize::from(slot) % BOARD_SIZE))
            .collect()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControllerState {
    pub session: Option<SessionView>,
    pub mode: Mode,
    /// Full turn log since session creation; rendering windows it.
    pub log: Vec<TurnInfo>,
    /// One-line diagnostic from the most recent failure, if any.
    pub notice: Option<String>,
}

#[derive(Debug, Clone)]
pub enum Event {
    SessionCreated(NewGameResponse),
    CreationFailed(String),
    /// An advance request was issued; the mode names which kind.
    AdvanceStarted(Mode),
    TurnApplied(TurnResponse),
    BatchApplied(FastForwardResponse),
    PlayoutApplied(PlayResponse),
    AdvanceFailed(String),
    AutoStopped,
    SessionCleared,
}

/// Pure state transition. Events that are not legal in the current
/// mode leave the state untouched rather than panicking, so a stale
/// caller (a cancelled scheduler, a double keypress) is harmless.
pub fn apply(mut state: ControllerState, event: Event) -> ControllerState {
    match event {
        Event::SessionCreated(resp) => ControllerState {
            session: Some(SessionView {
                game_id: resp.game_id,
                state: resp.state,
                agents: resp.agents,
                winner: None,
            }),
            mode: Mode::Idle,
            log: Vec::new(),
            notice: None,
        },

        Event::CreationFailed(msg) => {
            state.notice = Some(msg);
            state
        }

        Event::AdvanceStarted(mode) => {
            let legal = matches!(
                mode,
                Mode::Stepping | Mode::Batching | Mode::AutoPlaying
            );
            if legal && state.mode == Mode::Idle && state.session.is_some() {
                state.mode = mode;
                state.notice = None;
            }
            state
        }

        Event::TurnApplied(resp) => {
            if !matches!(state.mode, Mode::Stepping | Mode::AutoPlaying) {
                return state;
            }
            let game_over = resp.game_over;
            if let Some(session) = state.session.as_mut() {
                session.state = resp.state;
                session.winner = resp.winner;
            }
            // No entry when the session was already over and the
            // engine played nothing.
            if let Some(info) = resp.turn_info {
                state.log.push(info);
            }
            state.mode = match (game_over, state.mode) {
                (true, _) => Mode::GameOver,
                (false, Mode::AutoPlaying) => Mode::AutoPlaying,
                (false, _) => Mode::Idle,
            };
            state
        }

        Event::BatchApplied(resp) => {
            if state.mode != Mode::Batching {
                return state;
            }
            let game_over = resp.game_over;
            if let Some(session) = state.session.as_mut() {
                session.state = resp.state;
                session.winner = resp.winner;
            }
            // Batch advances carry no per-turn detail; the log is not
            // padded with placeholders.
            state.mode = if game_over { Mode::GameOver } else { Mode::Idle };
            state
        }

        Event::PlayoutApplied(resp) => {
            if state.mode != Mode::Batching {
                return state;
            }
            if let Some(session) = state.session.as_mut() {
                session.state = resp.state;
                session.winner = resp.winner;
            }
            state.log = resp.history;
            state.mode = Mode::GameOver;
            state
        }

        Event::AdvanceFailed(msg) => {
            if matches!(
                state.mode,
                Mode::Stepping | Mode::Batching | Mode::AutoPlaying
            ) {
                state.mode = Mode::Idle;
            }
            state.notice = Some(msg);
            state
        }

        Event::AutoStopped => {
            if state.mode == Mode::AutoPlaying {
                state.mode = Mode::Idle;
            }
            state
        }

        Event::SessionCleared => ControllerState::default(),
    }
}

/// The most recent `window` log entries, newest first. The full log
/// stays in [`ControllerState::log`]; this is only the rendering view.
pub fn visible_log(state: &ControllerState, window: usize) -> Vec<&TurnInfo> {
    state.log.iter().rev().take(window).collect()
}

/// Drives a single session against a [`SessionApi`].
pub struct TurnController {
    api: Arc<dyn SessionApi>,
    state: Arc<Mutex<ControllerState>>,
    auto: Option<AutoPlay>,
}

impl TurnController {
    pub fn new(api: Arc<dyn SessionApi>) -> Self {
        Self {
            api,
            state: Arc::new(Mutex::new(ControllerState::default())),
            auto: None,
        }
    }

    pub async fn snapshot(&self) -> ControllerState {
        self.state.lock().await.clone()
    }

    async fn record(&self, event: Event) {
        let mut st = self.state.lock().await;
        *st = apply(mem::take(&mut *st), event);
    }

    /// Atomically claim an advance slot: only succeeds from `Idle`
    /// with a live session, returning the session id.
    async fn claim(&self, mode: Mode) -> Option<String> {
        let mut st = self.state.lock().await;
        if st.mode != Mode::Idle {
            return None;
        }
        let game_id = st.session.as_ref()?.game_id.clone();
        *st = apply(mem::take(&mut *st), Event::AdvanceStarted(mode));
        Some(game_id)
    }

    pub async fn create(&mut self, req: &NewGameRequest) -> Result<(), ApiError> {
        self.stop_auto().await;
        match self.api.create_game(req).await {
            Ok(resp) => {
                self.record(Event::SessionCreated(resp)).await;
                Ok(())
            }
            Err(err) => {
                self.record(Event::CreationFailed(err.to_string())).await;
                Err(err)
            }
        }
    }

    /// Single turn advance. A no-op unless the controller is idle with
    /// a live session; in particular, a no-op after `GameOver`.
    pub async fn step(&self) -> Result<(), ApiError> {
        let Some(game_id) = self.claim(Mode::Stepping).await else {
            return Ok(());
        };
        match self.api.step(&game_id).await {
            Ok(resp) => {
                self.record(Event::TurnApplied(resp)).await;
                Ok(())
            }
            Err(err) => {
                self.record(Event::AdvanceFailed(err.to_string())).await;
                Err(err)
            }
        }
    }

    /// Batch advance of up to `turns` turns. Appends nothing to the
    /// turn log.
    pub async fn fast_forward(&self, turns: u32) -> Result<(), ApiError> {
        let Some(game_id) = self.claim(Mode::Batching).await else {
            return Ok(());
        };
        match self.api.fast_forward(&game_id, turns).await {
            Ok(resp) => {
                self.record(Event::BatchApplied(resp)).await;
                Ok(())
            }
            Err(err) => {
                self.record(Event::AdvanceFailed(err.to_string())).await;
                Err(err)
            }
        }
    }

    /// Run the session to completion; the turn log is replaced with
    /// the full playout history.
    pub async fn play_out(&self) -> Result<(), ApiError> {
        let Some(game_id) = self.claim(Mode::Batching).await else {
            return Ok(());
        };
        match self.api.play_out(&game_id).await {
            Ok(resp) => {
                self.record(Event::PlayoutApplied(resp)).await;
                Ok(())
            }
            Err(err) => {
                self.record(Event::AdvanceFailed(err.to_string())).await;
                Err(err)
            }
        }
    }

    /// Begin timed auto-play. A no-op unless idle with a live session.
    pub async fn start_auto(&mut self, delay: Duration) {
        let Some(game_id) = self.claim(Mode::AutoPlaying).await else {
            return;
        };
        self.auto = Some(AutoPlay::start(
            Arc::clone(&self.api),
            Arc::clone(&self.state),
            game_id,
            delay,
        ));
    }

    /// Cancel auto-play at the next scheduled boundary and wait for
    /// the in-flight turn, if any, to land.
    pub async fn stop_auto(&mut self) {
        if let Some(auto) = self.auto.take() {
            auto.cancel();
            auto.join().await;
        }
    }

    /// Wait for a running auto-play schedule to finish on its own
    /// (game over or failure).
    pub async fn wait_auto(&mut self) {
        if let Some(auto) = self.auto.take() {
            auto.join().await;
        }
    }

    pub async fn toggle_auto(&mut self, delay: Duration) {
        let mode = self.state.lock().await.mode;
        match mode {
            Mode::AutoPlaying => self.stop_auto().await,
            Mode::Idle => self.start_auto(delay).await,
            // Latched or mid-advance: ignore the toggle.
            _ => {}
        }
    }

    /// Delete the watched session on the gateway. The local view is
    /// cleared even if the gateway no longer knows the id.
    pub async fn delete(&mut self) -> Result<(), ApiError> {
        self.stop_auto().await;
        let game_id = {
            let st = self.state.lock().await;
            match &st.session {
                Some(session) => session.game_id.clone(),
                None => return Ok(()),
            }
        };
        let result = self.api.delete_game(&game_id).await;
        match &result {
            Ok(_) => self.record(Event::SessionCleared).await,
            Err(err) if err.is_not_found() => {
                warn!(game_id = %game_id, "session already gone on delete");
                self.record(Event::SessionCleared).await;
            }
            Err(err) => self.record(Event::AdvanceFailed(err.to_string())).await,
        }
        result.map(|_| ())
    }
}
