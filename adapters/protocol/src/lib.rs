#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Wire protocol adapter for the remote game service.
//!
//! The service publishes a [`Field`] snapshot describing the starting layout
//! and a log of [`TurnActions`] records. This crate decodes both into the
//! engine's vocabulary and replays the log onto a [`craftsmen_world::Board`].

mod actions;
mod snapshot;
mod turns;

pub use actions::{decode_batch, ActionDecodeError, ChildAction};
pub use snapshot::{CraftsmanResp, Field, PointResp, SnapshotError};
pub use turns::{replay, submission_turn, TurnActions};
