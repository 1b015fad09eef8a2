#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that scores and projects craftsmen boards.

mod session;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use craftsmen_core::{Event, ScoreCoefficients, Side};
use craftsmen_protocol::submission_turn;
use craftsmen_system_prediction::Predictor;
use craftsmen_system_scoring::compute_points;
use tracing::info;
use tracing_subscriber::EnvFilter;

use session::Session;

/// Craftsmen territory engine
#[derive(Debug, Parser)]
#[command(name = "craftsmen", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Replay a game and print both scores
    Score {
        #[command(flatten)]
        game: GameArgs,
    },
    /// Score a prospective batch without committing it
    Predict {
        #[command(flatten)]
        game: GameArgs,
        /// JSON list of actions to evaluate
        #[arg(long)]
        batch: PathBuf,
    },
    /// Print the turn a side's next submission is addressed to
    Turn {
        /// Turn currently being played
        #[arg(long)]
        current: u32,
        /// Submitting side
        #[arg(long, value_enum, ignore_case = true)]
        side: SideArg,
    },
}

/// Inputs shared by every command that works on a board.
#[derive(Debug, Args)]
struct GameArgs {
    /// Field snapshot (JSON)
    #[arg(long)]
    field: PathBuf,
    /// Server action log (JSON list of turn records)
    #[arg(long)]
    actions: Option<PathBuf>,
    /// Last turn to replay (default: every logged turn)
    #[arg(long)]
    turn: Option<u32>,
    /// Override the snapshot's castle coefficient
    #[arg(long, env = "CRAFTSMEN_CASTLE_COEFF")]
    castle_coeff: Option<i64>,
    /// Override the snapshot's wall coefficient
    #[arg(long, env = "CRAFTSMEN_WALL_COEFF")]
    wall_coeff: Option<i64>,
    /// Override the snapshot's territory coefficient
    #[arg(long, env = "CRAFTSMEN_TERRITORY_COEFF")]
    territory_coeff: Option<i64>,
}

impl GameArgs {
    fn coefficients(&self, announced: ScoreCoefficients) -> ScoreCoefficients {
        ScoreCoefficients {
            castle: self.castle_coeff.unwrap_or(announced.castle),
            wall: self.wall_coeff.unwrap_or(announced.wall),
            territory: self.territory_coeff.unwrap_or(announced.territory),
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SideArg {
    A,
    B,
}

impl From<SideArg> for Side {
    fn from(side: SideArg) -> Self {
        match side {
            SideArg::A => Side::A,
            SideArg::B => Side::B,
        }
    }
}

/// Entry point for the craftsmen command-line interface.
fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Command::Score { game } => {
            let session = Session::load(&game)?;
            let coeffs = game.coefficients(session.coefficients);
            println!("{}", compute_points(&session.board, &coeffs));
        }
        Command::Predict { game, batch } => {
            let session = Session::load(&game)?;
            let coeffs = game.coefficients(session.coefficients);
            let batch = session::load_batch(&batch)?;

            let current = compute_points(&session.board, &coeffs);
            let projection = Predictor::new().project_scored(&session.board, &batch, &coeffs);

            println!("current   {current}");
            println!("projected {}", projection.score);
            for event in &projection.events {
                if let Event::ActionRejected {
                    unit,
                    kind,
                    rejection,
                } = event
                {
                    println!("rejected  {unit} {kind:?}: {rejection}");
                }
            }
        }
        Command::Turn { current, side } => {
            let turn = submission_turn(current, side.into());
            info!(current, turn, "submission turn computed");
            println!("{turn}");
        }
    }
    Ok(())
}
