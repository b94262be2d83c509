//! Identifier generation.
//!
//! Every scene, connection and connection group gets an opaque string id
//! from an [`IdGenerator`]. The graph never parses ids; it only needs them
//! to be unique within one world.

use std::sync::atomic::{AtomicU64, Ordering};

use uuid::Uuid;

/// Source of unique identifiers.
pub trait IdGenerator: Send + Sync {
    /// Return a fresh identifier. Never returns the same value twice.
    fn next_id(&self) -> String;
}

/// Random v4 UUIDs in hyphenated form (36 characters).
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&self) -> String {
        Uuid::new_v4().hyphenated().to_string()
    }
}

/// Monotonic ids with a fixed prefix: `scene-1`, `scene-2`, ...
///
/// Deterministic output makes it the generator of choice for tests and
/// admin tooling that diffs exported graphs.
#[derive(Debug)]
pub struct SequentialIds {
    prefix: String,
    next: AtomicU64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into(), next: AtomicU64::new(1) }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        format!("{}-{n}", self.prefix)
    }
}
