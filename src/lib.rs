//! # scene-graph — Game-World Scene Topology
//!
//! Locations ("scenes") in a game world form a directed graph. Scenes own
//! named connection groups (exits) and take part in connections, each of
//! which is either bidirectional or one-way.
//!
//! ## Design Principles
//!
//! 1. **Arena, not pointers**: `SceneGraph` owns every entity; entities
//!    refer to each other by id, so there are no ownership cycles
//! 2. **Validate, then mutate**: every operation checks all invariants
//!    before touching state; an `Err` leaves the graph unchanged
//! 3. **Lazy adjacency**: each scene builds its connected-scene set on first
//!    query and keeps it current incrementally
//! 4. **Trait seams**: persistence (`SceneStore`) and id generation
//!    (`IdGenerator`) are collaborators with in-memory defaults
//!
//! ## Quick Start
//!
//! ```rust
//! use scene_graph::{Directionality, SceneGraph};
//!
//! # fn example() -> scene_graph::Result<()> {
//! let mut world = SceneGraph::new();
//! let inn = world.create_scene("The Prancing Pony")?;
//! let road = world.create_scene("East Road")?;
//!
//! let gate = world.create_group("west gate")?;
//! world.add_connection_group(&road, &gate)?;
//!
//! // Connect through the group: the connection lands on `road`
//! // and remembers it came in through "west gate".
//! let door = world.connect(&inn, &gate, Directionality::Bidirectional)?;
//! assert_eq!(door.incoming_group(), Some("west gate"));
//!
//! assert!(world.is_connected(&road, &inn));
//! assert!(world.connect(&road, &inn, Directionality::OneWay).is_err());
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod graph;
pub mod traverse;
pub mod storage;
pub mod export;
pub mod ids;
pub mod config;

// ============================================================================
// Re-exports: Model
// ============================================================================

pub use model::{
    Scene, SceneId, Connection, ConnectionId, Directionality,
    ConnectionGroup, GroupId, ScenePath, Value, PropertyMap,
};

// ============================================================================
// Re-exports: Graph
// ============================================================================

pub use graph::{SceneGraph, ConnectTarget};
pub use traverse::{ExpandDepth, TraversalMode};
pub use config::GraphConfig;
pub use ids::{IdGenerator, UuidGenerator, SequentialIds};

// ============================================================================
// Re-exports: Storage
// ============================================================================

pub use storage::{SceneStore, SceneRecord, MemoryStore};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A precondition of a graph operation does not hold: self-connection,
    /// duplicate connection, group ownership or name clash.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate identifier: {0}")]
    DuplicateId(String),

    #[error("Corrupt record: {0}")]
    CorruptRecord(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
