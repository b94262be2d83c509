//! ScenePath — a walk through the world: scene, connection, scene, ...

use serde::Serialize;
use super::{ConnectionId, SceneId};

/// A path in the scene graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenePath {
    /// Scenes along the path. Always has one more element than `connections`.
    scenes: Vec<SceneId>,
    /// Connections linking consecutive scenes.
    connections: Vec<ConnectionId>,
}

impl ScenePath {
    pub fn single(scene: SceneId) -> Self {
        Self { scenes: vec![scene], connections: Vec::new() }
    }

    /// Number of hops.
    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    pub fn scenes(&self) -> &[SceneId] { &self.scenes }

    pub fn connections(&self) -> &[ConnectionId] { &self.connections }

    pub fn start(&self) -> &SceneId {
        &self.scenes[0]
    }

    pub fn end(&self) -> &SceneId {
        &self.scenes[self.scenes.len() - 1]
    }

    pub fn contains(&self, scene: &SceneId) -> bool {
        self.scenes.contains(scene)
    }

    /// Extend the path by one hop.
    pub fn append(&mut self, connection: ConnectionId, scene: SceneId) {
        self.connections.push(connection);
        self.scenes.push(scene);
    }
}
