//! Named connection groups ("exits") on a scene.

use serde::{Deserialize, Serialize};
use super::SceneId;
use crate::{Error, Result};

/// Opaque connection-group identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupId(pub String);

impl std::fmt::Display for GroupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for GroupId {
    fn from(s: &str) -> Self { Self(s.to_owned()) }
}

/// A named attachment point on a scene.
///
/// Created detached, then attached to exactly one scene via
/// [`SceneGraph::add_connection_group`](crate::SceneGraph::add_connection_group).
/// Connecting *to* a group records its name on the new connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionGroup {
    id: GroupId,
    name: String,
    scene: Option<SceneId>,
}

impl ConnectionGroup {
    pub(crate) fn new(id: GroupId, name: impl Into<String>) -> Self {
        Self { id, name: name.into(), scene: None }
    }

    pub fn id(&self) -> &GroupId { &self.id }

    pub fn name(&self) -> &str { &self.name }

    /// The owning scene, if attached.
    pub fn scene(&self) -> Option<&SceneId> { self.scene.as_ref() }

    pub fn is_attached(&self) -> bool { self.scene.is_some() }

    pub(crate) fn attach(&mut self, scene: SceneId) -> Result<()> {
        if let Some(owner) = &self.scene {
            return Err(Error::InvalidArgument(format!(
                "connection group '{}' already belongs to scene {owner}",
                self.name
            )));
        }
        self.scene = Some(scene);
        Ok(())
    }

    pub(crate) fn detach(&mut self) {
        self.scene = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attach_once() {
        let mut g = ConnectionGroup::new("g1".into(), "north");
        assert!(!g.is_attached());

        g.attach("s1".into()).unwrap();
        assert_eq!(g.scene(), Some(&SceneId::from("s1")));

        assert!(g.attach("s2".into()).is_err());
        assert_eq!(g.scene(), Some(&SceneId::from("s1")));
    }

    #[test]
    fn test_detach_allows_reattach() {
        let mut g = ConnectionGroup::new("g1".into(), "north");
        g.attach("s1".into()).unwrap();
        g.detach();
        assert_eq!(g.scene(), None);
        g.attach("s2".into()).unwrap();
        assert_eq!(g.scene(), Some(&SceneId::from("s2")));
    }
}
