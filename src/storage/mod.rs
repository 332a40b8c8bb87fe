// src/storage/mod.rs

//! Durable progress storage.
//!
//! The checkpoint is the only state that survives a crash; everything else
//! is reconstructed from the upstream API on the next run.

mod export;
mod local;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::Checkpoint;

pub use export::write_export;
pub use local::FileCheckpointStore;

/// Durable checkpoint storage.
#[async_trait]
pub trait CheckpointStore: Send + Sync {
    /// Load the checkpoint.
    ///
    /// An absent checkpoint yields the empty checkpoint; an unparseable one
    /// is an error the caller must surface, never silently discard.
    async fn load(&self) -> Result<Checkpoint>;

    /// Persist the full checkpoint, replacing the prior version.
    ///
    /// Safe to call after every course completion; the last completed save
    /// wins.
    async fn save(&self, checkpoint: &Checkpoint) -> Result<()>;
}
