//! Random growth of a quadtree toward a target node count.
//!
//! Growth repeatedly picks a leaf uniformly at random from the set of
//! leaves that may still be subdivided, and splits it into four. Each split
//! adds four nodes, so the final size overshoots the target by at most
//! three, unless every leaf reaches max depth first.

use rand::Rng;
use tracing::{debug, info, info_span};

use crate::config::GeneratorConfig;
use crate::error::TreeError;
use crate::path::QuadPath;
use crate::tree::{QuadTree, Subdivision};
use crate::types::{Depth, NodeId};

const PROGRESS_EVERY: usize = 1 << 20;

/// Outcome of a [`QuadTreeGenerator::generate`] call.
///
/// ### Fields
/// - `subdivisions` - Number of leaves split during this call.
/// - `nodes` - Tree size after the call.
/// - `saturated` - `true` if growth stopped below the target because no
///   leaf above max depth remained.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GrowthReport {
    pub subdivisions: usize,
    pub nodes: usize,
    pub saturated: bool,
}

/// Owns a [`QuadTree`] and grows it.
#[derive(Clone, Debug)]
pub struct QuadTreeGenerator {
    tree: QuadTree,
}

/// Number of nodes in a complete quadtree of the given depth,
/// `(4^(depth+1) - 1) / 3`, or `None` if that overflows `u64`.
pub fn full_tree_size(max_depth: Depth) -> Option<u64> {
    let levels = u32::from(max_depth) + 1;
    4u64.checked_pow(levels).map(|n| (n - 1) / 3)
}

impl QuadTreeGenerator {
    pub fn new(max_depth: Depth) -> Self {
        Self {
            tree: QuadTree::new(max_depth),
        }
    }

    /// Creates a generator whose arena is pre-sized for `config`.
    pub fn from_config(config: &GeneratorConfig) -> Self {
        let cap = full_tree_size(config.max_depth)
            .and_then(|full| usize::try_from(full).ok())
            .map_or(config.target_count, |full| full.min(config.target_count));
        // Last split may overshoot the target by three.
        let cap = cap.saturating_add(3);
        Self {
            tree: QuadTree::with_capacity(config.max_depth, cap),
        }
    }

    pub fn tree(&self) -> &QuadTree {
        &self.tree
    }

    pub fn into_tree(self) -> QuadTree {
        self.tree
    }

    /// Subdivides the node at `path`. See [`QuadTree::subdivide_path`].
    pub fn subdivide(&mut self, path: &QuadPath) -> Result<Subdivision, TreeError> {
        self.tree.subdivide_path(path)
    }

    /// Grows the tree until it holds at least `target_count` nodes or no
    /// leaf can be subdivided further.
    ///
    /// The working set starts as every leaf above max depth (just the root
    /// for a fresh tree). Each step:
    ///
    /// 1. Picks an entry uniformly at random with `rng`.
    /// 2. Removes it with `swap_remove`; order within the set is irrelevant.
    /// 3. Subdivides it.
    /// 4. Adds the new children to the set if they are still above max depth.
    ///
    /// `target_count` is not range checked here; see
    /// [`crate::config::validate_target_count`].
    ///
    /// ### Parameters
    /// - `target_count` - Desired minimum tree size.
    /// - `rng` - Source of randomness; seed it for reproducible trees.
    ///
    /// ### Returns
    /// A [`GrowthReport`] describing what happened.
    pub fn generate<R: Rng + ?Sized>(&mut self, target_count: usize, rng: &mut R) -> GrowthReport {
        let tree = &mut self.tree;
        let _span = info_span!("generate", target_count, max_depth = tree.max_depth()).entered();

        let mut eligible: Vec<NodeId> = tree
            .leaves()
            .filter(|&id| {
                tree.node(id)
                    .is_some_and(|n| tree.can_subdivide_at(n.depth))
            })
            .collect();
        let mut subdivisions = 0;

        while tree.len() < target_count && !eligible.is_empty() {
            let id = eligible.swap_remove(rng.random_range(0..eligible.len()));

            if let Subdivision::Split(children) = tree.subdivide(id) {
                subdivisions += 1;
                let child_depth = tree.node(children.nw).map_or(Depth::MAX, |n| n.depth);
                if tree.can_subdivide_at(child_depth) {
                    eligible.extend(children);
                }
                if subdivisions % PROGRESS_EVERY == 0 {
                    debug!(nodes = tree.len(), eligible = eligible.len(), "growing");
                }
            }
        }

        let report = GrowthReport {
            subdivisions,
            nodes: tree.len(),
            saturated: tree.len() < target_count,
        };
        info!(
            nodes = report.nodes,
            subdivisions = report.subdivisions,
            saturated = report.saturated,
            "generation finished"
        );
        report
    }
}

/// Builds a fresh tree for `config` using `rng`.
pub fn generate<R: Rng + ?Sized>(config: &GeneratorConfig, rng: &mut R) -> (QuadTree, GrowthReport) {
    let mut generator = QuadTreeGenerator::from_config(config);
    let report = generator.generate(config.target_count, rng);
    (generator.into_tree(), report)
}
