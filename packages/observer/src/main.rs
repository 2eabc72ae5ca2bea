//! Observer CLI - drives one gateway session from the terminal.
//!
//! Creates a session between two engine agents, advances it in the
//! requested playback mode, prints a windowed turn log and the final
//! standings, then deletes the session unless told to keep it.

use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use tracing::info;

use gateway::engine::dto::NewGameRequest;
use observer::api::{agent_spec, GatewayClient};
use observer::controller::{visible_log, Mode, TurnController, DEFAULT_LOG_WINDOW};

#[derive(Parser)]
#[command(name = "observer")]
#[command(about = "Playback driver for gateway game sessions")]
struct Args {
    /// Gateway base URL
    #[arg(long, default_value = "http://127.0.0.1:4000")]
    gateway: String,

    /// Agent id for player 0
    #[arg(long, default_value = "expectiminimax")]
    agent1: String,

    /// Agent id for player 1
    #[arg(long, default_value = "mcts")]
    agent2: String,

    /// Inline JSON config for agent 1
    #[arg(long)]
    agent1_config: Option<String>,

    /// Inline JSON config for agent 2
    #[arg(long)]
    agent2_config: Option<String>,

    /// Starting cash per player
    #[arg(long, default_value = "1500")]
    starting_cash: i64,

    /// Turn cap before the session ends on wealth
    #[arg(long, default_value = "200")]
    max_turns: u32,

    /// Playback mode
    #[arg(long, default_value = "step")]
    mode: PlaybackMode,

    /// Turns to advance (step and fast-forward modes)
    #[arg(short, long, default_value = "5")]
    turns: u32,

    /// Delay between auto-played turns, in milliseconds
    #[arg(long, default_value = "500")]
    delay_ms: u64,

    /// Turn log window size
    #[arg(long, default_value_t = DEFAULT_LOG_WINDOW)]
    window: usize,

    /// Leave the session on the gateway instead of deleting it
    #[arg(long)]
    keep: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, ValueEnum)]
enum PlaybackMode {
    /// One gateway round-trip per turn
    Step,
    /// Single batch advance of --turns turns
    FastForward,
    /// Run the session to completion in one call
    Run,
    /// Timed stepping until game over
    Auto,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let api = Arc::new(GatewayClient::new(args.gateway.clone()));
    let mut controller = TurnController::new(api);

    let request = NewGameRequest {
        agent1: agent_spec(&args.agent1, args.agent1_config.as_deref())?,
        agent2: agent_spec(&args.agent2, args.agent2_config.as_deref())?,
        starting_cash: args.starting_cash,
        max_turns: args.max_turns,
    };

    controller.create(&request).await?;
    {
        let state = controller.snapshot().await;
        let session = state.session.as_ref().ok_or("session missing after create")?;
        info!(
            game_id = %session.game_id,
            agent1 = %args.agent1,
            agent2 = %args.agent2,
            "session created"
        );
    }

    match args.mode {
        PlaybackMode::Step => {
            for _ in 0..args.turns {
                controller.step().await?;
                let state = controller.snapshot().await;
                if let Some(entry) = state.log.last() {
                    info!(
                        turn = entry.turn,
                        player = entry.player,
                        dice = ?entry.dice_roll,
                        action = ?entry.action,
                        "turn played"
                    );
                }
                if state.mode == Mode::GameOver {
                    break;
                }
            }
        }
        PlaybackMode::FastForward => {
            controller.fast_forward(args.turns).await?;
        }
        PlaybackMode::Run => {
            controller.play_out().await?;
        }
        PlaybackMode::Auto => {
            controller
                .start_auto(Duration::from_millis(args.delay_ms))
                .await;
            controller.wait_auto().await;
        }
    }

    print_summary(&controller, args.window).await;

    if args.keep {
        if let Some(session) = controller.snapshot().await.session {
            info!(game_id = %session.game_id, "session kept on gateway");
        }
    } else {
        controller.delete().await?;
    }

    Ok(())
}

async fn print_summary(controller: &TurnController, window: usize) {
    let state = controller.snapshot().await;

    println!("\n=== Turn Log (latest first) ===");
    let entries = visible_log(&state, window);
    if entries.is_empty() {
        println!("(no per-turn entries)");
    }
    for entry in entries {
        println!(
            "turn {:>4}  player {}  dice {:>2}  {}",
            entry.turn,
            entry.player,
            entry.dice_roll.map_or("-".to_string(), |d| d.to_string()),
            entry.action.as_deref().unwrap_or("-"),
        );
    }

    if let Some(session) = &state.session {
        println!("\n=== Session {} ===", session.game_id);
        println!("turns played: {}", session.state.turn_count);
        let grid = session.grid_positions();
        for (player, cash) in session.state.cash.iter().enumerate() {
            let slot = session.state.positions.get(player).copied().unwrap_or(0);
            let at = grid
                .get(player)
                .map_or("-".to_string(), |(row, col)| format!("({row}, {col})"));
            println!("player {player}: cash {cash}, slot {slot} at {at}");
        }
        match (session.state.game_over, session.winner) {
            (true, Some(winner)) => println!("game over, winner: player {winner}"),
            (true, None) => println!("game over"),
            (false, _) => println!("game still in progress"),
        }
    }

    if let Some(notice) = &state.notice {
        println!("\nnotice: {notice}");
    }
}
