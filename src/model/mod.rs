//! # Scene Graph Model
//!
//! The three entity types of the world topology plus the attribute values
//! carried by scenes. Cross-entity invariants (no self-loops, no parallel
//! connections, unique group names) are enforced by
//! [`SceneGraph`](crate::SceneGraph); this module holds the data and the
//! per-scene bookkeeping.

pub mod scene;
pub mod connection;
pub mod connection_group;
pub mod path;
pub mod value;
pub mod property_map;

pub use scene::{Scene, SceneId};
pub use connection::{Connection, ConnectionId, Directionality};
pub use connection_group::{ConnectionGroup, GroupId};
pub use path::ScenePath;
pub use value::Value;
pub use property_map::PropertyMap;
