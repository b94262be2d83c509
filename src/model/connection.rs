//! Connection (directed edge) between two scenes.

use serde::{Deserialize, Serialize};
use super::SceneId;
use crate::{Error, Result};

/// Opaque connection identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConnectionId(pub String);

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ConnectionId {
    fn from(s: &str) -> Self { Self(s.to_owned()) }
}

/// Whether a connection can be walked from both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Directionality {
    /// Traversable from either endpoint.
    #[default]
    Bidirectional,
    /// Traversable only from the outgoing scene to the incoming scene.
    OneWay,
}

/// A directed connection between two distinct scenes.
///
/// Endpoints are fixed at construction. Connections are only built by
/// [`SceneGraph::connect`](crate::SceneGraph::connect), which checks the
/// graph invariants first; a `Connection` trusts its creator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    id: ConnectionId,
    outgoing: SceneId,
    incoming: SceneId,
    directionality: Directionality,
    /// Name of the group on the incoming scene this connection terminates in.
    incoming_group: Option<String>,
}

impl Connection {
    pub(crate) fn new(
        id: ConnectionId,
        outgoing: SceneId,
        incoming: SceneId,
        directionality: Directionality,
    ) -> Self {
        Self { id, outgoing, incoming, directionality, incoming_group: None }
    }

    pub fn id(&self) -> &ConnectionId { &self.id }

    pub fn outgoing_scene(&self) -> &SceneId { &self.outgoing }

    pub fn incoming_scene(&self) -> &SceneId { &self.incoming }

    pub fn directionality(&self) -> Directionality { self.directionality }

    pub fn is_bidirectional(&self) -> bool {
        self.directionality == Directionality::Bidirectional
    }

    pub fn incoming_group(&self) -> Option<&str> {
        self.incoming_group.as_deref()
    }

    /// Record the incoming-side group name. May only be set once.
    pub fn set_incoming_group(&mut self, name: impl Into<String>) -> Result<()> {
        if let Some(existing) = &self.incoming_group {
            return Err(Error::InvalidArgument(format!(
                "connection {} already terminates in group '{existing}'",
                self.id
            )));
        }
        self.incoming_group = Some(name.into());
        Ok(())
    }

    /// Whether `scene` is one of the two endpoints.
    pub fn involves(&self, scene: &SceneId) -> bool {
        &self.outgoing == scene || &self.incoming == scene
    }

    /// The other end of the connection from the given scene.
    pub fn other_scene(&self, from: &SceneId) -> Option<&SceneId> {
        if from == &self.outgoing { Some(&self.incoming) }
        else if from == &self.incoming { Some(&self.outgoing) }
        else { None }
    }

    /// Whether a walker standing on `from` may follow this connection.
    pub fn can_traverse_from(&self, from: &SceneId) -> bool {
        match self.directionality {
            Directionality::Bidirectional => self.involves(from),
            Directionality::OneWay => from == &self.outgoing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(dir: Directionality) -> Connection {
        Connection::new("c".into(), "a".into(), "b".into(), dir)
    }

    #[test]
    fn test_other_scene() {
        let c = edge(Directionality::Bidirectional);
        assert_eq!(c.other_scene(&"a".into()), Some(&SceneId::from("b")));
        assert_eq!(c.other_scene(&"b".into()), Some(&SceneId::from("a")));
        assert_eq!(c.other_scene(&"z".into()), None);
    }

    #[test]
    fn test_one_way_traversal() {
        let c = edge(Directionality::OneWay);
        assert!(c.can_traverse_from(&"a".into()));
        assert!(!c.can_traverse_from(&"b".into()));

        let c = edge(Directionality::Bidirectional);
        assert!(c.can_traverse_from(&"b".into()));
        assert!(!c.can_traverse_from(&"z".into()));
    }

    #[test]
    fn test_incoming_group_set_once() {
        let mut c = edge(Directionality::Bidirectional);
        assert_eq!(c.incoming_group(), None);
        c.set_incoming_group("north").unwrap();
        assert_eq!(c.incoming_group(), Some("north"));

        let err = c.set_incoming_group("south").unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert_eq!(c.incoming_group(), Some("north"));
    }

    #[test]
    fn test_default_directionality() {
        assert_eq!(Directionality::default(), Directionality::Bidirectional);
    }
}
