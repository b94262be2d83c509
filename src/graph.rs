//! # SceneGraph — the arena and its mutation protocol
//!
//! All scenes, connections and connection groups live here, keyed by id.
//! Entities refer to each other by id only, so there are no ownership
//! cycles between a scene and the connections it takes part in.
//!
//! Every mutating operation validates all of its preconditions before it
//! touches any state: a call that returns `Err` leaves the graph exactly
//! as it found it.

use hashbrown::HashMap;

use tracing::debug;

use crate::config::GraphConfig;
use crate::ids::{IdGenerator, UuidGenerator};
use crate::model::*;
use crate::{Error, Result};

// ============================================================================
// ConnectTarget
// ============================================================================

/// The far side of a new connection: a scene, or a named group on a scene.
///
/// Connecting to a group links to the group's owning scene and records the
/// group name on the connection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConnectTarget {
    Scene(SceneId),
    Group(GroupId),
}

impl From<SceneId> for ConnectTarget {
    fn from(id: SceneId) -> Self { ConnectTarget::Scene(id) }
}

impl From<&SceneId> for ConnectTarget {
    fn from(id: &SceneId) -> Self { ConnectTarget::Scene(id.clone()) }
}

impl From<GroupId> for ConnectTarget {
    fn from(id: GroupId) -> Self { ConnectTarget::Group(id) }
}

impl From<&GroupId> for ConnectTarget {
    fn from(id: &GroupId) -> Self { ConnectTarget::Group(id.clone()) }
}

// ============================================================================
// SceneGraph
// ============================================================================

/// In-memory world topology.
///
/// Not thread-safe by itself: mutation takes `&mut self` and scenes keep a
/// lazily built adjacency cache. Share it behind a lock if several tasks
/// need to edit the same world.
pub struct SceneGraph {
    config: GraphConfig,
    ids: Box<dyn IdGenerator>,
    scenes: HashMap<SceneId, Scene>,
    connections: HashMap<ConnectionId, Connection>,
    groups: HashMap<GroupId, ConnectionGroup>,
}

impl std::fmt::Debug for SceneGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneGraph")
            .field("config", &self.config)
            .field("scenes", &self.scenes.len())
            .field("connections", &self.connections.len())
            .field("groups", &self.groups.len())
            .finish()
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    /// Empty graph with default config and UUID identifiers.
    pub fn new() -> Self {
        Self::with_config(GraphConfig::default(), UuidGenerator)
    }

    pub fn with_config(config: GraphConfig, ids: impl IdGenerator + 'static) -> Self {
        Self {
            config,
            ids: Box::new(ids),
            scenes: HashMap::new(),
            connections: HashMap::new(),
            groups: HashMap::new(),
        }
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    // ========================================================================
    // Scenes
    // ========================================================================

    /// Create a scene with a fresh identifier and no connections.
    pub fn create_scene(&mut self, name: impl Into<String>) -> Result<SceneId> {
        let id = SceneId(self.ids.next_id());
        if self.scenes.contains_key(&id) {
            return Err(Error::DuplicateId(format!("Scene {id}")));
        }
        let scene = Scene::new(id.clone(), name);
        debug!(scene = %id, name = %scene.name, "scene created");
        self.scenes.insert(id.clone(), scene);
        Ok(id)
    }

    pub fn scene(&self, id: &SceneId) -> Option<&Scene> {
        self.scenes.get(id)
    }

    /// Mutable access for the attribute sidecar and display name.
    ///
    /// Connection bookkeeping is not reachable through this handle.
    pub fn scene_mut(&mut self, id: &SceneId) -> Option<&mut Scene> {
        self.scenes.get_mut(id)
    }

    pub fn scenes(&self) -> impl Iterator<Item = &Scene> {
        self.scenes.values()
    }

    pub fn scene_count(&self) -> usize {
        self.scenes.len()
    }

    /// Remove a scene together with its connections and groups.
    ///
    /// Connections are detached from the scene at the other end first, so
    /// the neighbours' adjacency caches stay exact.
    pub fn remove_scene(&mut self, id: &SceneId) -> Result<Scene> {
        let scene = self.scenes.get(id)
            .ok_or_else(|| Error::NotFound(format!("Scene {id}")))?;
        let connection_ids: Vec<ConnectionId> = scene.connections().cloned().collect();
        let group_ids: Vec<GroupId> = scene.connection_group_ids().cloned().collect();

        for cid in &connection_ids {
            self.detach_connection(cid);
        }
        for gid in &group_ids {
            self.groups.remove(gid);
        }

        let removed = self.scenes.remove(id)
            .ok_or_else(|| Error::NotFound(format!("Scene {id}")))?;
        debug!(
            scene = %id,
            connections = connection_ids.len(),
            groups = group_ids.len(),
            "scene removed"
        );
        Ok(removed)
    }

    // ========================================================================
    // Connection groups
    // ========================================================================

    /// Create a detached connection group.
    pub fn create_group(&mut self, name: impl Into<String>) -> Result<GroupId> {
        let id = GroupId(self.ids.next_id());
        if self.groups.contains_key(&id) {
            return Err(Error::DuplicateId(format!("Connection group {id}")));
        }
        self.groups.insert(id.clone(), ConnectionGroup::new(id.clone(), name));
        Ok(id)
    }

    pub fn group(&self, id: &GroupId) -> Option<&ConnectionGroup> {
        self.groups.get(id)
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// The group called `name` on `scene`, if any.
    pub fn connection_group(&self, scene: &SceneId, name: &str) -> Option<&ConnectionGroup> {
        let gid = self.scenes.get(scene)?.connection_group_id(name)?;
        self.groups.get(gid)
    }

    /// All groups owned by `scene`. Empty for an unknown scene.
    pub fn connection_groups(&self, scene: &SceneId) -> Vec<&ConnectionGroup> {
        self.scenes.get(scene)
            .map(|s| s.connection_group_ids().filter_map(|gid| self.groups.get(gid)).collect())
            .unwrap_or_default()
    }

    /// Attach `group` to `scene`.
    ///
    /// Fails with `InvalidArgument` if the group is already on this scene,
    /// belongs to another scene, or the scene already has a group with the
    /// same name.
    pub fn add_connection_group(&mut self, scene: &SceneId, group: &GroupId) -> Result<()> {
        let owner = self.scenes.get_mut(scene)
            .ok_or_else(|| Error::NotFound(format!("Scene {scene}")))?;
        let g = self.groups.get_mut(group)
            .ok_or_else(|| Error::NotFound(format!("Connection group {group}")))?;

        if owner.owns_group(group) {
            return Err(Error::InvalidArgument(format!(
                "connection group '{}' is already attached to scene {scene}",
                g.name()
            )));
        }
        if let Some(other) = g.scene() {
            return Err(Error::InvalidArgument(format!(
                "connection group '{}' already belongs to scene {other}",
                g.name()
            )));
        }
        if owner.has_connection_group(g.name()) {
            return Err(Error::InvalidArgument(format!(
                "scene {scene} already has a connection group named '{}'",
                g.name()
            )));
        }

        g.attach(scene.clone())?;
        owner.insert_group(g.name().to_owned(), group.clone());
        debug!(scene = %scene, group = %group, name = %g.name(), "connection group attached");
        Ok(())
    }

    /// Detach `group` from `scene`. The group stays in the graph, ownerless,
    /// and may be attached again. Existing connections keep the group name
    /// they recorded.
    pub fn drop_connection_group(&mut self, scene: &SceneId, group: &GroupId) -> Result<()> {
        let owner = self.scenes.get_mut(scene)
            .ok_or_else(|| Error::NotFound(format!("Scene {scene}")))?;
        if !owner.owns_group(group) {
            return Err(Error::InvalidArgument(format!(
                "connection group {group} is not owned by scene {scene}"
            )));
        }

        owner.remove_group(group);
        if let Some(g) = self.groups.get_mut(group) {
            g.detach();
        }
        debug!(scene = %scene, group = %group, "connection group dropped");
        Ok(())
    }

    // ========================================================================
    // Connections
    // ========================================================================

    /// Connect `from` to a scene or to a named group on a scene.
    ///
    /// Fails with `InvalidArgument` for a self-connection, for a pair that
    /// is already connected (in either direction) and for a detached group.
    /// The duplicate check goes through the adjacency cache of `from`,
    /// building it if needed.
    pub fn connect(
        &mut self,
        from: &SceneId,
        target: impl Into<ConnectTarget>,
        directionality: Directionality,
    ) -> Result<&Connection> {
        let (to, group_name) = self.resolve_target(target.into())?;
        let id = ConnectionId(self.ids.next_id());
        self.register(id, from, &to, directionality, group_name)
    }

    /// [`connect`](Self::connect) with the configured default directionality.
    pub fn connect_default(
        &mut self,
        from: &SceneId,
        target: impl Into<ConnectTarget>,
    ) -> Result<&Connection> {
        let directionality = self.config.default_directionality;
        self.connect(from, target, directionality)
    }

    /// Remove a connection from both endpoints and from the graph.
    pub fn disconnect(&mut self, id: &ConnectionId) -> Result<Connection> {
        let connection = self.detach_connection(id)
            .ok_or_else(|| Error::NotFound(format!("Connection {id}")))?;
        debug!(
            connection = %id,
            from = %connection.outgoing_scene(),
            to = %connection.incoming_scene(),
            "scenes disconnected"
        );
        Ok(connection)
    }

    pub fn connection(&self, id: &ConnectionId) -> Option<&Connection> {
        self.connections.get(id)
    }

    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.connections.values()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Every connection `scene` takes part in, outgoing first.
    pub fn connections_of(&self, scene: &SceneId) -> Vec<&Connection> {
        self.scenes.get(scene)
            .map(|s| s.connections().filter_map(|cid| self.connections.get(cid)).collect())
            .unwrap_or_default()
    }

    /// The connection between `a` and `b`, whichever way it points.
    pub fn connection_between(&self, a: &SceneId, b: &SceneId) -> Option<&Connection> {
        let cid = self.scenes.get(a)?.connection_to(b)?;
        self.connections.get(cid)
    }

    pub fn is_connected(&self, a: &SceneId, b: &SceneId) -> bool {
        self.scenes.get(a).is_some_and(|s| s.is_connected_to(b))
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn resolve_target(&self, target: ConnectTarget) -> Result<(SceneId, Option<String>)> {
        match target {
            ConnectTarget::Scene(id) => Ok((id, None)),
            ConnectTarget::Group(gid) => {
                let group = self.groups.get(&gid)
                    .ok_or_else(|| Error::NotFound(format!("Connection group {gid}")))?;
                let owner = group.scene().ok_or_else(|| Error::InvalidArgument(format!(
                    "connection group '{}' is not attached to a scene",
                    group.name()
                )))?;
                Ok((owner.clone(), Some(group.name().to_owned())))
            }
        }
    }

    /// Validate and insert a connection with a known id.
    ///
    /// Shared by `connect` and by loading from a store.
    pub(crate) fn register(
        &mut self,
        id: ConnectionId,
        from: &SceneId,
        to: &SceneId,
        directionality: Directionality,
        group_name: Option<String>,
    ) -> Result<&Connection> {
        if from == to {
            return Err(Error::InvalidArgument(format!(
                "scene {from} cannot be connected to itself"
            )));
        }
        if self.connections.contains_key(&id) {
            return Err(Error::DuplicateId(format!("Connection {id}")));
        }

        let source = self.scenes.get(from)
            .ok_or_else(|| Error::NotFound(format!("Scene {from}")))?;
        if !self.scenes.contains_key(to) {
            return Err(Error::NotFound(format!("Scene {to}")));
        }
        if source.is_connected_to(to) {
            return Err(Error::InvalidArgument(format!(
                "scenes {from} and {to} are already connected"
            )));
        }

        let mut connection = Connection::new(id.clone(), from.clone(), to.clone(), directionality);
        if let Some(name) = group_name {
            connection.set_incoming_group(name)?;
        }

        if let Some(source) = self.scenes.get_mut(from) {
            source.add_outgoing_connection(&connection);
        }
        if let Some(target) = self.scenes.get_mut(to) {
            target.add_incoming_connection(&connection);
        }
        debug!(
            connection = %id,
            from = %from,
            to = %to,
            directionality = ?directionality,
            group = connection.incoming_group().unwrap_or("-"),
            "scenes connected"
        );
        Ok(&*self.connections.entry(id).or_insert(connection))
    }

    fn detach_connection(&mut self, id: &ConnectionId) -> Option<Connection> {
        let connection = self.connections.remove(id)?;
        if let Some(source) = self.scenes.get_mut(connection.outgoing_scene()) {
            source.remove_outgoing_connection(id);
        }
        if let Some(target) = self.scenes.get_mut(connection.incoming_scene()) {
            target.remove_incoming_connection(id);
        }
        Some(connection)
    }

    /// Insert a scene with a known id (store loading).
    pub(crate) fn restore_scene(
        &mut self,
        id: SceneId,
        name: String,
        properties: PropertyMap,
    ) -> Result<()> {
        if self.scenes.contains_key(&id) {
            return Err(Error::DuplicateId(format!("Scene {id}")));
        }
        let mut scene = Scene::new(id.clone(), name);
        scene.properties = properties;
        self.scenes.insert(id, scene);
        Ok(())
    }

    /// Insert a detached group with a known id (store loading).
    pub(crate) fn restore_group(&mut self, id: GroupId, name: &str) -> Result<()> {
        if self.groups.contains_key(&id) {
            return Err(Error::DuplicateId(format!("Connection group {id}")));
        }
        self.groups.insert(id.clone(), ConnectionGroup::new(id, name));
        Ok(())
    }
}
