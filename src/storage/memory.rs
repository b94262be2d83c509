//! In-memory scene store.
//!
//! The reference implementation of `SceneStore`: three tables behind
//! `parking_lot` locks. Connections are stored once, not per endpoint, so
//! deleting a scene detaches its connections from the neighbours' records
//! automatically.
//!
//! ## Limitations
//!
//! - **No transactions**: a cascading save takes the table locks one after
//!   another, so a concurrent reader can observe a half-saved scene.
//! - **No durability**: everything is gone when the store is dropped.

use std::collections::HashMap;
use std::sync::Arc;
use parking_lot::RwLock;
use async_trait::async_trait;

use crate::model::*;
use crate::Result;
use super::{SceneRecord, SceneStore};

/// A stored scene row without its cascaded children.
#[derive(Debug, Clone)]
struct SceneRow {
    name: String,
    properties: PropertyMap,
}

/// In-memory scene storage. Cheap to clone; clones share the same tables.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    scenes: RwLock<HashMap<SceneId, SceneRow>>,
    groups: RwLock<HashMap<GroupId, ConnectionGroup>>,
    connections: RwLock<HashMap<ConnectionId, Connection>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SceneStore for MemoryStore {
    async fn save_scene(&self, record: SceneRecord) -> Result<()> {
        let SceneRecord { id, name, properties, groups, connections } = record;

        {
            let mut table = self.inner.groups.write();
            table.retain(|gid, g| {
                g.scene() != Some(&id) || groups.iter().any(|kept| kept.id() == gid)
            });
            for group in groups {
                table.insert(group.id().clone(), group);
            }
        }
        {
            let mut table = self.inner.connections.write();
            table.retain(|cid, c| {
                !c.involves(&id) || connections.iter().any(|kept| kept.id() == cid)
            });
            for connection in connections {
                table.insert(connection.id().clone(), connection);
            }
        }

        self.inner.scenes.write().insert(id, SceneRow { name, properties });
        Ok(())
    }

    async fn load_scene(&self, id: &SceneId) -> Result<Option<SceneRecord>> {
        let Some(row) = self.inner.scenes.read().get(id).cloned() else {
            return Ok(None);
        };

        let mut groups: Vec<ConnectionGroup> = self.inner.groups.read()
            .values()
            .filter(|g| g.scene() == Some(id))
            .cloned()
            .collect();
        groups.sort_by(|a, b| a.name().cmp(b.name()));

        let mut connections: Vec<Connection> = self.inner.connections.read()
            .values()
            .filter(|c| c.involves(id))
            .cloned()
            .collect();
        connections.sort_by(|a, b| a.id().cmp(b.id()));

        Ok(Some(SceneRecord {
            id: id.clone(),
            name: row.name,
            properties: row.properties,
            groups,
            connections,
        }))
    }

    async fn delete_scene(&self, id: &SceneId) -> Result<bool> {
        let removed = self.inner.scenes.write().remove(id);
        self.inner.groups.write().retain(|_, g| g.scene() != Some(id));
        self.inner.connections.write().retain(|_, c| !c.involves(id));
        Ok(removed.is_some())
    }

    async fn get_connection(&self, id: &ConnectionId) -> Result<Option<Connection>> {
        Ok(self.inner.connections.read().get(id).cloned())
    }

    async fn scene_ids(&self) -> Result<Vec<SceneId>> {
        let mut ids: Vec<SceneId> = self.inner.scenes.read().keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }

    async fn scene_count(&self) -> Result<u64> {
        Ok(self.inner.scenes.read().len() as u64)
    }

    async fn connection_count(&self) -> Result<u64> {
        Ok(self.inner.connections.read().len() as u64)
    }
}

// ============================================================================
// Tests
// ============================================================================
