//! Graph walks for admin tooling: expansion, reachability, routes.
//!
//! All walks are breadth-first over the arena and never touch the
//! adjacency caches. Neighbours are visited in connection-id order so the
//! output is stable for a given graph.

use std::collections::VecDeque;

use hashbrown::HashSet;

use crate::graph::SceneGraph;
use crate::model::{ConnectionId, SceneId, ScenePath};
use crate::{Error, Result};

/// Depth specification for [`SceneGraph::expand`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpandDepth {
    /// Exact number of hops
    Exact(usize),
    /// Range: min..max hops (inclusive)
    Range { min: usize, max: usize },
    /// Up to `GraphConfig::max_expand_depth`
    Unbounded,
}

/// Which connections a walker may follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TraversalMode {
    /// One-way connections only from their outgoing scene.
    #[default]
    FollowDirectionality,
    /// Every connection from either end.
    AnyDirection,
}

impl SceneGraph {
    /// Every simple path from `from` whose hop count falls in `depth`.
    pub fn expand(
        &self,
        from: &SceneId,
        depth: ExpandDepth,
        mode: TraversalMode,
    ) -> Result<Vec<ScenePath>> {
        let (min_depth, max_depth) = match depth {
            ExpandDepth::Exact(d) => (d, d),
            ExpandDepth::Range { min, max } => (min, max),
            ExpandDepth::Unbounded => (1, self.config().max_expand_depth),
        };
        self.require_scene(from)?;

        let mut results = Vec::new();
        if min_depth == 0 {
            results.push(ScenePath::single(from.clone()));
        }
        let mut queue = vec![ScenePath::single(from.clone())];

        for current_depth in 0..max_depth {
            let mut next_queue = Vec::new();

            for path in &queue {
                for (cid, next) in self.neighbours(path.end(), mode) {
                    if path.contains(&next) {
                        continue;
                    }
                    let mut new_path = path.clone();
                    new_path.append(cid, next);

                    if current_depth + 1 >= min_depth {
                        results.push(new_path.clone());
                    }
                    if current_depth + 1 < max_depth {
                        next_queue.push(new_path);
                    }
                }
            }

            queue = next_queue;
            if queue.is_empty() { break; }
        }

        Ok(results)
    }

    /// Every scene reachable from `from` in one or more hops.
    ///
    /// `from` itself is only included if a cycle leads back to it.
    pub fn reachable_from(&self, from: &SceneId, mode: TraversalMode) -> Result<HashSet<SceneId>> {
        self.require_scene(from)?;

        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([from.clone()]);
        while let Some(tip) = queue.pop_front() {
            for (_, next) in self.neighbours(&tip, mode) {
                if seen.insert(next.clone()) {
                    queue.push_back(next);
                }
            }
        }
        Ok(seen)
    }

    /// Shortest route from `from` to `to`, if one exists.
    pub fn route(
        &self,
        from: &SceneId,
        to: &SceneId,
        mode: TraversalMode,
    ) -> Result<Option<ScenePath>> {
        self.require_scene(from)?;
        self.require_scene(to)?;

        let mut visited: HashSet<SceneId> = HashSet::from([from.clone()]);
        let mut queue = VecDeque::from([ScenePath::single(from.clone())]);
        while let Some(path) = queue.pop_front() {
            if path.end() == to {
                return Ok(Some(path));
            }
            for (cid, next) in self.neighbours(path.end(), mode) {
                if visited.insert(next.clone()) {
                    let mut longer = path.clone();
                    longer.append(cid, next);
                    queue.push_back(longer);
                }
            }
        }
        Ok(None)
    }

    fn require_scene(&self, id: &SceneId) -> Result<()> {
        if self.scene(id).is_none() {
            return Err(Error::NotFound(format!("Scene {id}")));
        }
        Ok(())
    }

    fn neighbours(&self, scene: &SceneId, mode: TraversalMode) -> Vec<(ConnectionId, SceneId)> {
        let mut out: Vec<(ConnectionId, SceneId)> = self
            .connections_of(scene)
            .into_iter()
            .filter(|c| mode == TraversalMode::AnyDirection || c.can_traverse_from(scene))
            .filter_map(|c| Some((c.id().clone(), c.other_scene(scene)?.clone())))
            .collect();
        out.sort();
        out
    }
}
