//! Loading snapshots and logs from disk.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use craftsmen_core::{ActionBatch, ScoreCoefficients};
use craftsmen_protocol::{decode_batch, replay, ChildAction, Field, TurnActions};
use craftsmen_system_territory::recompute;
use craftsmen_world::Board;
use tracing::info;

use crate::GameArgs;

/// Board reconstructed from a snapshot and its replayed log.
#[derive(Debug)]
pub(crate) struct Session {
    pub(crate) board: Board,
    pub(crate) coefficients: ScoreCoefficients,
}

impl Session {
    pub(crate) fn load(args: &GameArgs) -> Result<Self> {
        let text = read(&args.field)?;
        let field = Field::from_json(&text)
            .with_context(|| format!("failed to parse field {}", args.field.display()))?;
        let mut board = field
            .to_board()
            .with_context(|| format!("field {} has an invalid layout", args.field.display()))?;

        if let Some(path) = &args.actions {
            let log: Vec<TurnActions> = serde_json::from_str(&read(path)?)
                .with_context(|| format!("failed to parse action log {}", path.display()))?;
            let mut events = Vec::new();
            let turns = replay(&mut board, &log, args.turn, &mut events);
            info!(turns, events = events.len(), "action log replayed");
        }
        recompute(&mut board);

        Ok(Self {
            board,
            coefficients: field.coefficients(),
        })
    }
}

pub(crate) fn load_batch(path: &Path) -> Result<ActionBatch> {
    let actions: Vec<ChildAction> = serde_json::from_str(&read(path)?)
        .with_context(|| format!("failed to parse batch {}", path.display()))?;
    Ok(decode_batch(&actions))
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}
