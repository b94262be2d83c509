//! # Scene Store
//!
//! The persistence contract between a [`SceneGraph`] and wherever worlds
//! are kept between sessions. Stores deal in [`SceneRecord`]s: one scene
//! with its attributes, the groups it owns and the connections it takes
//! part in.
//!
//! ## Cascading
//!
//! - `save_scene` saves the record's groups and connections too. The record
//!   is authoritative for its scene: groups the scene no longer owns and
//!   connections it no longer takes part in are deleted.
//! - `delete_scene` deletes the scene's groups and every connection it
//!   takes part in, so the scene at the other end no longer sees them.
//!
//! ## Implementations
//!
//! | Store | Module | Description |
//! |-------|--------|-------------|
//! | `MemoryStore` | `memory` | In-memory for testing/embedding |

pub mod memory;

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::GraphConfig;
use crate::graph::SceneGraph;
use crate::ids::IdGenerator;
use crate::model::*;
use crate::{Error, Result};

pub use memory::MemoryStore;

// ============================================================================
// SceneRecord
// ============================================================================

/// A scene as it crosses the store boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneRecord {
    pub id: SceneId,
    pub name: String,
    pub properties: PropertyMap,
    /// Groups owned by this scene.
    pub groups: Vec<ConnectionGroup>,
    /// Connections in either direction.
    pub connections: Vec<Connection>,
}

impl SceneRecord {
    /// Snapshot one scene of a graph.
    pub fn from_graph(graph: &SceneGraph, id: &SceneId) -> Result<Self> {
        let scene = graph.scene(id)
            .ok_or_else(|| Error::NotFound(format!("Scene {id}")))?;
        Ok(Self {
            id: id.clone(),
            name: scene.name.clone(),
            properties: scene.properties.clone(),
            groups: graph.connection_groups(id).into_iter().cloned().collect(),
            connections: graph.connections_of(id).into_iter().cloned().collect(),
        })
    }
}

// ============================================================================
// SceneStore Trait
// ============================================================================

/// The persistence contract.
#[async_trait]
pub trait SceneStore: Send + Sync + 'static {
    /// Insert or replace a scene, cascading to its groups and connections.
    ///
    /// Stored groups owned by the scene and stored connections involving it
    /// that are missing from `record` are deleted.
    async fn save_scene(&self, record: SceneRecord) -> Result<()>;

    /// Load a scene with its groups and connections. None if unknown.
    async fn load_scene(&self, id: &SceneId) -> Result<Option<SceneRecord>>;

    /// Delete a scene, its groups and its connections. Returns true if it existed.
    async fn delete_scene(&self, id: &SceneId) -> Result<bool>;

    /// Get a single connection by id.
    async fn get_connection(&self, id: &ConnectionId) -> Result<Option<Connection>>;

    /// Ids of every stored scene.
    async fn scene_ids(&self) -> Result<Vec<SceneId>>;

    /// Total number of scenes.
    async fn scene_count(&self) -> Result<u64>;

    /// Total number of connections.
    async fn connection_count(&self) -> Result<u64>;
}

// ============================================================================
// Graph ↔ store
// ============================================================================

impl SceneGraph {
    /// Save every scene of the graph.
    ///
    /// Stored scenes the graph no longer has are deleted first, so the store
    /// ends up holding exactly this graph.
    pub async fn save_to<S: SceneStore>(&self, store: &S) -> Result<()> {
        for id in store.scene_ids().await? {
            if self.scene(&id).is_none() {
                store.delete_scene(&id).await?;
            }
        }

        let mut ids: Vec<&SceneId> = self.scenes().map(|s| s.id()).collect();
        ids.sort();
        for id in ids {
            store.save_scene(SceneRecord::from_graph(self, id)?).await?;
        }
        debug!(scenes = self.scene_count(), connections = self.connection_count(), "graph saved");
        Ok(())
    }

    /// Rebuild a graph from every scene in `store`.
    ///
    /// Records go through the same checks as live edits; anything that
    /// would break a graph invariant is reported as `CorruptRecord`.
    pub async fn load_from<S: SceneStore>(
        store: &S,
        config: GraphConfig,
        ids: impl IdGenerator + 'static,
    ) -> Result<Self> {
        let mut records = Vec::new();
        for id in store.scene_ids().await? {
            if let Some(record) = store.load_scene(&id).await? {
                records.push(record);
            }
        }

        let mut graph = SceneGraph::with_config(config, ids);
        let mut connections = BTreeMap::new();

        for record in &records {
            graph
                .restore_scene(record.id.clone(), record.name.clone(), record.properties.clone())
                .map_err(corrupt)?;
        }
        for record in &records {
            for group in &record.groups {
                if group.scene() != Some(&record.id) {
                    return Err(corrupt(Error::InvalidArgument(format!(
                        "group {} is listed on scene {} but owned by {:?}",
                        group.id(), record.id, group.scene()
                    ))));
                }
                graph.restore_group(group.id().clone(), group.name()).map_err(corrupt)?;
                graph.add_connection_group(&record.id, group.id()).map_err(corrupt)?;
            }
            for connection in &record.connections {
                connections.entry(connection.id().clone()).or_insert(connection);
            }
        }
        for (id, connection) in connections {
            graph
                .register(
                    id,
                    connection.outgoing_scene(),
                    connection.incoming_scene(),
                    connection.directionality(),
                    connection.incoming_group().map(str::to_owned),
                )
                .map_err(corrupt)?;
        }

        debug!(scenes = graph.scene_count(), connections = graph.connection_count(), "graph loaded");
        Ok(graph)
    }
}

fn corrupt(err: Error) -> Error {
    warn!(error = %err, "stored scene graph failed validation");
    match err {
        Error::InvalidArgument(msg) | Error::NotFound(msg) | Error::DuplicateId(msg) => {
            Error::CorruptRecord(msg)
        }
        other => other,
    }
}
