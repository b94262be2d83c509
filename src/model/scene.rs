//! Scene — a location in the world graph.
//!
//! A scene owns its connection groups and records every connection it
//! takes part in, split into outgoing and incoming sets. Each set maps the
//! connection id to the scene at the other end; connection endpoints never
//! change, so that is all a scene needs to answer adjacency questions
//! without going back to the arena.
//!
//! ## Adjacency cache
//!
//! [`Scene::connected_scenes`] is computed on first access (O(E)) and then
//! kept up to date by the registration hooks, so later membership tests are
//! O(1). The cache is never built eagerly and never handed out mutably.

use std::cell::OnceCell;

use hashbrown::{HashMap, HashSet};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::{Connection, ConnectionId, GroupId, PropertyMap, Value};

/// Opaque scene identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SceneId(pub String);

impl std::fmt::Display for SceneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SceneId {
    fn from(s: &str) -> Self { Self(s.to_owned()) }
}

/// A node in the scene graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    id: SceneId,
    pub name: String,
    pub properties: PropertyMap,
    /// (group name, group id). Scenes rarely have more than a handful of exits.
    groups: SmallVec<[(String, GroupId); 4]>,
    /// connection id → incoming scene of that connection
    outgoing: HashMap<ConnectionId, SceneId>,
    /// connection id → outgoing scene of that connection
    incoming: HashMap<ConnectionId, SceneId>,
    #[serde(skip)]
    connected: OnceCell<HashSet<SceneId>>,
}

impl PartialEq for Scene {
    /// Cache state is not part of a scene's identity.
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.name == other.name
            && self.properties == other.properties
            && self.groups == other.groups
            && self.outgoing == other.outgoing
            && self.incoming == other.incoming
    }
}

impl Scene {
    pub(crate) fn new(id: SceneId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            properties: PropertyMap::new(),
            groups: SmallVec::new(),
            outgoing: HashMap::new(),
            incoming: HashMap::new(),
            connected: OnceCell::new(),
        }
    }

    pub fn id(&self) -> &SceneId { &self.id }

    // ========================================================================
    // Property sidecar
    // ========================================================================

    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Set an attribute, returning the previous value.
    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.properties.insert(key.into(), value.into())
    }

    pub fn remove_property(&mut self, key: &str) -> Option<Value> {
        self.properties.remove(key)
    }

    // ========================================================================
    // Connection groups
    // ========================================================================

    pub fn has_connection_group(&self, name: &str) -> bool {
        self.groups.iter().any(|(n, _)| n == name)
    }

    pub fn connection_group_id(&self, name: &str) -> Option<&GroupId> {
        self.groups.iter().find(|(n, _)| n == name).map(|(_, id)| id)
    }

    pub fn connection_group_ids(&self) -> impl Iterator<Item = &GroupId> {
        self.groups.iter().map(|(_, id)| id)
    }

    pub fn owns_group(&self, group: &GroupId) -> bool {
        self.groups.iter().any(|(_, id)| id == group)
    }

    /// Caller has already checked name and ownership.
    pub(crate) fn insert_group(&mut self, name: String, id: GroupId) {
        self.groups.push((name, id));
    }

    pub(crate) fn remove_group(&mut self, id: &GroupId) -> bool {
        let before = self.groups.len();
        self.groups.retain(|(_, g)| g != id);
        self.groups.len() != before
    }

    // ========================================================================
    // Connections
    // ========================================================================

    /// Ids of every connection this scene takes part in, outgoing first.
    pub fn connections(&self) -> impl Iterator<Item = &ConnectionId> {
        self.outgoing.keys().chain(self.incoming.keys())
    }

    pub fn outgoing_connections(&self) -> impl Iterator<Item = (&ConnectionId, &SceneId)> {
        self.outgoing.iter()
    }

    pub fn incoming_connections(&self) -> impl Iterator<Item = (&ConnectionId, &SceneId)> {
        self.incoming.iter()
    }

    pub fn connection_count(&self) -> usize {
        self.outgoing.len() + self.incoming.len()
    }

    /// The connection linking this scene with `other`, in either direction.
    ///
    /// Linear scan over outgoing then incoming connections; does not touch
    /// the adjacency cache.
    pub fn connection_to(&self, other: &SceneId) -> Option<&ConnectionId> {
        self.outgoing
            .iter()
            .chain(self.incoming.iter())
            .find(|(_, scene)| *scene == other)
            .map(|(id, _)| id)
    }

    /// Every scene directly linked to this one, in either direction.
    ///
    /// The first call walks all connections; intended for admin tools and
    /// world building rather than per-turn hot paths.
    pub fn connected_scenes(&self) -> &HashSet<SceneId> {
        self.connected.get_or_init(|| {
            tracing::trace!(scene = %self.id, edges = self.connection_count(), "building adjacency cache");
            self.recompute_connected()
        })
    }

    pub fn is_connected_to(&self, other: &SceneId) -> bool {
        self.connected_scenes().contains(other)
    }

    /// Drop the adjacency cache; the next query rebuilds it.
    pub fn invalidate_connected_scenes(&mut self) {
        self.connected.take();
    }

    pub(crate) fn is_adjacency_cached(&self) -> bool {
        self.connected.get().is_some()
    }

    fn recompute_connected(&self) -> HashSet<SceneId> {
        self.incoming.values().chain(self.outgoing.values()).cloned().collect()
    }

    // ========================================================================
    // Registration hooks (called by SceneGraph only)
    // ========================================================================

    pub(crate) fn add_outgoing_connection(&mut self, connection: &Connection) {
        debug_assert_eq!(connection.outgoing_scene(), &self.id);
        let target = connection.incoming_scene().clone();
        if let Some(cache) = self.connected.get_mut() {
            cache.insert(target.clone());
        }
        self.outgoing.insert(connection.id().clone(), target);
    }

    pub(crate) fn add_incoming_connection(&mut self, connection: &Connection) {
        debug_assert_eq!(connection.incoming_scene(), &self.id);
        let source = connection.outgoing_scene().clone();
        if let Some(cache) = self.connected.get_mut() {
            cache.insert(source.clone());
        }
        self.incoming.insert(connection.id().clone(), source);
    }

    pub(crate) fn remove_outgoing_connection(&mut self, id: &ConnectionId) -> Option<SceneId> {
        let target = self.outgoing.remove(id)?;
        self.forget_if_unlinked(&target);
        Some(target)
    }

    pub(crate) fn remove_incoming_connection(&mut self, id: &ConnectionId) -> Option<SceneId> {
        let source = self.incoming.remove(id)?;
        self.forget_if_unlinked(&source);
        Some(source)
    }

    fn forget_if_unlinked(&mut self, other: &SceneId) {
        let still_linked = self.outgoing.values().chain(self.incoming.values()).any(|s| s == other);
        if !still_linked {
            if let Some(cache) = self.connected.get_mut() {
                cache.remove(other);
            }
        }
    }
}
