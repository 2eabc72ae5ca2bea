//! Timed auto-play.
//!
//! One background task advances the session turn by turn with a fixed
//! delay between turns. Cancellation is only observed at scheduling
//! boundaries: a turn request that is already in flight always
//! completes and is applied before the task exits. Exactly one request
//! is in flight at any instant because the loop awaits each response
//! before arming the next delay.

use std::mem;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::api::SessionApi;
use crate::controller::{apply, ControllerState, Event};

pub struct AutoPlay {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl AutoPlay {
    /// Spawn the schedule. The controller has already moved the shared
    /// state into `AutoPlaying` before calling this.
    pub fn start(
        api: Arc<dyn SessionApi>,
        state: Arc<Mutex<ControllerState>>,
        game_id: String,
        delay: Duration,
    ) -> Self {
        let token = CancellationToken::new();
        let schedule = token.clone();

        let handle = tokio::spawn(async move {
            loop {
                if schedule.is_cancelled() {
                    break;
                }

                match api.step(&game_id).await {
                    Ok(resp) => {
                        let game_over = resp.game_over;
                        let mut st = state.lock().await;
                        *st = apply(mem::take(&mut *st), Event::TurnApplied(resp));
                        drop(st);
                        if game_over {
                            debug!(game_id = %game_id, "auto-play reached game over");
                            break;
                        }
                    }
                    Err(err) => {
                        warn!(game_id = %game_id, error = %err, "auto-play halted");
                        let mut st = state.lock().await;
                        *st = apply(mem::take(&mut *st), Event::AdvanceFailed(err.to_string()));
                        break;
                    }
                }

                tokio::select! {
                    _ = schedule.cancelled() => break,
                    _ = tokio::time::sleep(delay) => {}
                }
            }

            let mut st = state.lock().await;
            *st = apply(mem::take(&mut *st), Event::AutoStopped);
        });

        Self { token, handle }
    }

    /// Request cancellation; takes effect at the next boundary.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Wait for the task to drain, including any in-flight turn.
    pub async fn join(self) {
        if self.handle.await.is_err() {
            warn!("auto-play task aborted");
        }
    }
}
