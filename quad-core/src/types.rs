/// Identifier for a node in a [`crate::tree::QuadTree`].
///
/// This is an index into the tree's node arena. Ids are handed out in
/// creation order and stay valid for the lifetime of the tree, since nodes
/// are never removed.
pub type NodeId = usize;

/// Depth of a node, counted in quadrant steps from the root.
pub type Depth = u8;

/// Per-leaf payload. Uninterpreted; generated leaves always carry `0`.
pub type LeafValue = u8;
