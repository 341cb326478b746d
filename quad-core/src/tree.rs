use crate::error::TreeError;
use crate::path::QuadPath;
use crate::quadrant::{Quad, Quadrant};
use crate::types::{Depth, LeafValue, NodeId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Leaf { value: LeafValue },
    Internal { children: Quad<NodeId> },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuadNode {
    pub depth: Depth,
    /// Parent id and the quadrant this node fills in it. `None` for the root.
    pub parent: Option<(NodeId, Quadrant)>,
    pub kind: NodeKind,
}

/// What [`QuadTree::subdivide`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Subdivision {
    /// A leaf became internal and gained these four new leaves.
    Split(Quad<NodeId>),
    /// The node was already internal; nothing changed.
    AlreadyInternal(Quad<NodeId>),
    /// The node sits at or below max depth; nothing changed.
    AtMaxDepth,
}

impl Subdivision {
    /// Children of the node after the call, if it has any.
    pub fn children(&self) -> Option<Quad<NodeId>> {
        match *self {
            Self::Split(children) | Self::AlreadyInternal(children) => Some(children),
            Self::AtMaxDepth => None,
        }
    }
}

/// Node counts of a tree, with a breakdown by depth.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TreeStats {
    pub nodes: usize,
    pub leaves: usize,
    pub internal: usize,
    pub deepest: Depth,
    /// `per_depth[d]` is the number of nodes at depth `d`.
    pub per_depth: Vec<usize>,
}

/// A quadtree stored as an arena of nodes.
///
/// Node `0` is always the root. Children are appended four at a time when
/// their parent is subdivided, so arena order is creation order and a
/// parent always precedes its children. Nodes are never removed.
#[derive(Clone, Debug)]
pub struct QuadTree {
    nodes: Vec<QuadNode>,
    max_depth: Depth,
}

impl QuadNode {
    pub fn new_root() -> Self {
        Self {
            depth: 0,
            parent: None,
            kind: NodeKind::Leaf { value: 0 },
        }
    }

    pub fn new_child(parent: NodeId, quadrant: Quadrant, depth: Depth) -> Self {
        Self {
            depth,
            parent: Some((parent, quadrant)),
            kind: NodeKind::Leaf { value: 0 },
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf { .. })
    }

    pub fn value(&self) -> Option<LeafValue> {
        match self.kind {
            NodeKind::Leaf { value } => Some(value),
            NodeKind::Internal { .. } => None,
        }
    }

    pub fn children(&self) -> Option<Quad<NodeId>> {
        match self.kind {
            NodeKind::Leaf { .. } => None,
            NodeKind::Internal { children } => Some(children),
        }
    }
}

impl QuadTree {
    pub const ROOT: NodeId = 0;

    /// Creates a tree holding only a leaf root with value `0`.
    pub fn new(max_depth: Depth) -> Self {
        Self {
            nodes: vec![QuadNode::new_root()],
            max_depth,
        }
    }

    pub fn with_capacity(max_depth: Depth, capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity.max(1));
        nodes.push(QuadNode::new_root());
        Self { nodes, max_depth }
    }

    pub fn max_depth(&self) -> Depth {
        self.max_depth
    }

    /// Total number of nodes; never zero.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn node(&self, id: NodeId) -> Option<&QuadNode> {
        self.nodes.get(id)
    }

    /// All nodes in creation order.
    pub fn nodes(&self) -> &[QuadNode] {
        &self.nodes
    }

    /// Returns `true` if a node at `depth` may still be subdivided.
    #[inline]
    pub fn can_subdivide_at(&self, depth: Depth) -> bool {
        depth < self.max_depth
    }

    /// Subdivides the node `id` into four leaf children.
    ///
    /// A leaf above max depth becomes internal (its value is dropped) and
    /// four new leaves with value `0` are appended, all in one step. Nodes
    /// at max depth and nodes that are already internal are left untouched.
    ///
    /// ### Panics
    /// Panics if `id` is not a node of this tree.
    pub fn subdivide(&mut self, id: NodeId) -> Subdivision {
        let node = &self.nodes[id];
        if !self.can_subdivide_at(node.depth) {
            return Subdivision::AtMaxDepth;
        }
        if let NodeKind::Internal { children } = node.kind {
            return Subdivision::AlreadyInternal(children);
        }

        let depth = node.depth + 1;
        let first = self.nodes.len();
        let children = Quad::from_fn(|q| first + q as usize);
        self.nodes
            .extend(Quadrant::iter_all().map(|q| QuadNode::new_child(id, q, depth)));
        self.nodes[id].kind = NodeKind::Internal { children };

        Subdivision::Split(children)
    }

    /// Subdivides the node at `path`.
    ///
    /// Paths at or deeper than max depth are a no-op even when they do not
    /// exist; otherwise the path must name an existing node.
    pub fn subdivide_path(&mut self, path: &QuadPath) -> Result<Subdivision, TreeError> {
        if !self.can_subdivide_at(path.depth()) {
            return Ok(Subdivision::AtMaxDepth);
        }
        let id = self
            .find(path)
            .ok_or_else(|| TreeError::NotFound(path.to_string()))?;
        Ok(self.subdivide(id))
    }

    /// Sets the payload of a leaf. Returns `false` if `id` is not a leaf.
    pub fn set_leaf_value(&mut self, id: NodeId, value: LeafValue) -> bool {
        match self.nodes.get_mut(id) {
            Some(QuadNode {
                kind: NodeKind::Leaf { value: v },
                ..
            }) => {
                *v = value;
                true
            }
            _ => false,
        }
    }

    /// Looks up the node at `path` by walking down from the root.
    pub fn find(&self, path: &QuadPath) -> Option<NodeId> {
        path.quadrants()
            .iter()
            .try_fold(Self::ROOT, |id, &q| self.nodes[id].children().map(|c| c[q]))
    }

    /// `Some(true)` for a leaf, `Some(false)` for an internal node, `None`
    /// if there is no node at `path`.
    pub fn is_leaf(&self, path: &QuadPath) -> Option<bool> {
        self.find(path).map(|id| self.nodes[id].is_leaf())
    }

    /// Quadrants from `id` up to the root, deepest step first.
    pub fn ancestry(&self, id: NodeId) -> impl Iterator<Item = Quadrant> + '_ {
        let mut cur = self.nodes.get(id).and_then(|n| n.parent);
        std::iter::from_fn(move || {
            let (parent, q) = cur?;
            cur = self.nodes[parent].parent;
            Some(q)
        })
    }

    /// Re-derives the path of node `id`.
    pub fn path_of(&self, id: NodeId) -> QuadPath {
        let mut quadrants: Vec<Quadrant> = self.ancestry(id).collect();
        quadrants.reverse();
        QuadPath::from(quadrants)
    }

    pub fn leaves(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(id, n)| n.is_leaf().then_some(id))
    }

    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats {
            nodes: self.nodes.len(),
            ..TreeStats::default()
        };
        for node in &self.nodes {
            if node.is_leaf() {
                stats.leaves += 1;
            } else {
                stats.internal += 1;
            }
            let d = node.depth as usize;
            if stats.per_depth.len() <= d {
                stats.per_depth.resize(d + 1, 0);
            }
            stats.per_depth[d] += 1;
            stats.deepest = stats.deepest.max(node.depth);
        }
        stats
    }

    /// Verifies the structural invariants of the arena.
    ///
    /// Every node is within max depth, every internal node links to four
    /// children that link back to it, and every non-root node hangs off an
    /// internal parent at the matching quadrant.
    pub fn check_invariants(&self) -> Result<(), TreeError> {
        for (id, node) in self.nodes.iter().enumerate() {
            if node.depth > self.max_depth {
                return Err(TreeError::TooDeep {
                    path: self.path_of(id).to_string(),
                    depth: node.depth,
                    max_depth: self.max_depth,
                });
            }

            if let Some(children) = node.children() {
                let complete = Quadrant::iter_all().all(|q| {
                    self.nodes.get(children[q]).is_some_and(|c| {
                        c.parent == Some((id, q)) && c.depth == node.depth + 1
                    })
                });
                if !complete {
                    return Err(TreeError::IncompleteInternal(self.path_of(id).to_string()));
                }
            }

            let attached = match node.parent {
                None => id == Self::ROOT,
                Some((parent, q)) => self
                    .nodes
                    .get(parent)
                    .and_then(QuadNode::children)
                    .is_some_and(|c| c[q] == id),
            };
            if !attached {
                return Err(TreeError::Orphan(self.path_of(id).to_string()));
            }
        }
        Ok(())
    }
}
