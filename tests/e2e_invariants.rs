//! Property tests: random edit sequences never break the graph invariants.
//!
//! After every operation, for every scene:
//! - no connection has the same scene at both ends,
//! - at most one connection links any unordered pair,
//! - the adjacency view matches the connections actually registered,
//! - group names are unique and every owned group points back at its owner.
//!
//! Saves can be interleaved with the edits; at the end the store must load
//! back into a graph with the same scenes, connections and groups.

use std::collections::HashSet;

use proptest::prelude::*;
use scene_graph::{
    ConnectionId, Directionality, GraphConfig, GroupId, MemoryStore, SceneGraph, SceneId,
    SequentialIds,
};

const SCENES: usize = 6;
const GROUPS: usize = 4;
const NAMES: [&str; 3] = ["north", "south", "door"];

#[derive(Debug, Clone)]
enum Op {
    Connect { from: usize, to: usize, one_way: bool },
    ConnectToGroup { from: usize, group: usize },
    Disconnect { pick: usize },
    AddGroup { scene: usize, group: usize },
    DropGroup { scene: usize, group: usize },
    RemoveScene { scene: usize },
    Query { scene: usize },
    Save,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0..SCENES, 0..SCENES, any::<bool>())
            .prop_map(|(from, to, one_way)| Op::Connect { from, to, one_way }),
        1 => (0..SCENES, 0..GROUPS).prop_map(|(from, group)| Op::ConnectToGroup { from, group }),
        1 => (0..16usize).prop_map(|pick| Op::Disconnect { pick }),
        2 => (0..SCENES, 0..GROUPS).prop_map(|(scene, group)| Op::AddGroup { scene, group }),
        1 => (0..SCENES, 0..GROUPS).prop_map(|(scene, group)| Op::DropGroup { scene, group }),
        1 => (0..SCENES).prop_map(|scene| Op::RemoveScene { scene }),
        2 => (0..SCENES).prop_map(|scene| Op::Query { scene }),
        2 => Just(Op::Save),
    ]
}

fn setup() -> (SceneGraph, Vec<SceneId>, Vec<GroupId>) {
    let mut g = SceneGraph::with_config(GraphConfig::default(), SequentialIds::new("p"));
    let scenes = (0..SCENES).map(|i| g.create_scene(format!("scene {i}")).unwrap()).collect();
    let groups = (0..GROUPS).map(|i| g.create_group(NAMES[i % NAMES.len()]).unwrap()).collect();
    (g, scenes, groups)
}

fn check_invariants(g: &SceneGraph) -> Result<(), TestCaseError> {
    let mut pairs = HashSet::new();
    for c in g.connections() {
        prop_assert_ne!(c.outgoing_scene(), c.incoming_scene());
        let mut pair = [c.outgoing_scene().clone(), c.incoming_scene().clone()];
        pair.sort();
        prop_assert!(pairs.insert(pair), "parallel connection {}", c.id());
    }

    for scene in g.scenes() {
        let expected: HashSet<SceneId> = g
            .connections()
            .filter_map(|c| c.other_scene(scene.id()).cloned())
            .collect();
        let cached: HashSet<SceneId> = scene.connected_scenes().iter().cloned().collect();
        prop_assert_eq!(&cached, &expected);

        let mut names = HashSet::new();
        for group in g.connection_groups(scene.id()) {
            prop_assert!(names.insert(group.name().to_owned()));
            prop_assert_eq!(group.scene(), Some(scene.id()));
        }
    }
    Ok(())
}

fn connection_set(g: &SceneGraph) -> HashSet<String> {
    g.connections()
        .map(|c| {
            format!(
                "{} {}->{} {:?} {:?}",
                c.id(), c.outgoing_scene(), c.incoming_scene(), c.directionality(), c.incoming_group()
            )
        })
        .collect()
}

fn group_names(g: &SceneGraph, scene: &SceneId) -> HashSet<(GroupId, String)> {
    g.connection_groups(scene)
        .into_iter()
        .map(|grp| (grp.id().clone(), grp.name().to_owned()))
        .collect()
}

fn check_reload(live: &SceneGraph, loaded: &SceneGraph) -> Result<(), TestCaseError> {
    prop_assert_eq!(loaded.scene_count(), live.scene_count());
    prop_assert_eq!(connection_set(loaded), connection_set(live));
    for scene in live.scenes() {
        let Some(other) = loaded.scene(scene.id()) else {
            return Err(TestCaseError::fail(format!("scene {} missing after load", scene.id())));
        };
        prop_assert_eq!(other.connected_scenes(), scene.connected_scenes());
        prop_assert_eq!(group_names(loaded, scene.id()), group_names(live, scene.id()));
    }
    Ok(())
}

proptest! {
    #[test]
    fn prop_random_edits_keep_invariants(ops in proptest::collection::vec(op(), 1..80)) {
        let (mut g, scenes, groups) = setup();
        let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let store = MemoryStore::new();

        for op in ops {
            match op {
                Op::Connect { from, to, one_way } => {
                    let dir = if one_way { Directionality::OneWay } else { Directionality::Bidirectional };
                    let was_connected = g.is_connected(&scenes[from], &scenes[to]);
                    let missing = g.scene(&scenes[from]).is_none() || g.scene(&scenes[to]).is_none();
                    let count = g.connection_count();
                    let result = g.connect(&scenes[from], &scenes[to], dir).map(|c| c.id().clone());
                    if from == to || was_connected || missing {
                        prop_assert!(result.is_err());
                        prop_assert_eq!(g.connection_count(), count);
                    } else {
                        prop_assert!(result.is_ok());
                        prop_assert_eq!(g.connection_count(), count + 1);
                    }
                }
                Op::ConnectToGroup { from, group } => {
                    let _ = g.connect(&scenes[from], &groups[group], Directionality::Bidirectional);
                }
                Op::Disconnect { pick } => {
                    let mut ids: Vec<ConnectionId> = g.connections().map(|c| c.id().clone()).collect();
                    ids.sort();
                    if let Some(id) = ids.get(pick % ids.len().max(1)) {
                        prop_assert!(g.disconnect(id).is_ok());
                    }
                }
                Op::AddGroup { scene, group } => {
                    let _ = g.add_connection_group(&scenes[scene], &groups[group]);
                }
                Op::DropGroup { scene, group } => {
                    let owned = g.scene(&scenes[scene]).is_some_and(|s| s.owns_group(&groups[group]));
                    prop_assert_eq!(g.drop_connection_group(&scenes[scene], &groups[group]).is_ok(), owned);
                }
                Op::RemoveScene { scene } => {
                    let existed = g.scene(&scenes[scene]).is_some();
                    prop_assert_eq!(g.remove_scene(&scenes[scene]).is_ok(), existed);
                }
                Op::Query { scene } => {
                    if let Some(s) = g.scene(&scenes[scene]) {
                        let _ = s.connected_scenes();
                    }
                }
                Op::Save => {
                    rt.block_on(g.save_to(&store)).unwrap();
                }
            }
            check_invariants(&g)?;
        }

        rt.block_on(g.save_to(&store)).unwrap();
        let loaded = rt
            .block_on(SceneGraph::load_from(&store, GraphConfig::default(), SequentialIds::new("r")))
            .unwrap();
        check_invariants(&loaded)?;
        check_reload(&g, &loaded)?;
    }
}
