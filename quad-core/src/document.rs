//! The JSON document format for quadtrees.
//!
//! A document is a single `"nodes"` object mapping path strings to records:
//!
//! ```json
//! {
//!     "nodes": {
//!         "": { "isLeaf": false },
//!         "00": { "isLeaf": true, "value": 0 }
//!     }
//! }
//! ```
//!
//! Internal records never carry a `value`. Keys are written in arena
//! (creation) order; readers must not depend on key order.

use std::collections::{HashMap, VecDeque};
use std::io::{BufReader, BufWriter, Read, Write};

use serde::ser::{SerializeMap, SerializeStruct, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::ser::{CompactFormatter, PrettyFormatter};
use tracing::debug;

use crate::error::{DocumentError, Result, TreeError};
use crate::path::QuadPath;
use crate::quadrant::Quadrant;
use crate::tree::{QuadNode, QuadTree, Subdivision};
use crate::types::{Depth, LeafValue};

const INDENT: &[u8] = b"    ";

/// One entry of the `"nodes"` object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NodeRecord {
    pub is_leaf: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<LeafValue>,
}

impl From<&QuadNode> for NodeRecord {
    fn from(node: &QuadNode) -> Self {
        Self {
            is_leaf: node.is_leaf(),
            value: node.value(),
        }
    }
}

/// Whitespace style of a written document. Not part of the format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Layout {
    /// Four-space indentation.
    #[default]
    Pretty,
    Compact,
}

/// Borrowed view of a tree that serializes as a quadtree document.
#[derive(Clone, Copy, Debug)]
pub struct Document<'a> {
    tree: &'a QuadTree,
}

impl<'a> Document<'a> {
    pub fn new(tree: &'a QuadTree) -> Self {
        Self { tree }
    }
}

impl Serialize for Document<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut doc = serializer.serialize_struct("Document", 1)?;
        doc.serialize_field("nodes", &Nodes(self.tree))?;
        doc.end()
    }
}

struct Nodes<'a>(&'a QuadTree);

impl Serialize for Nodes<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let tree = self.0;
        let mut map = serializer.serialize_map(Some(tree.len()))?;
        let mut steps: Vec<Quadrant> = Vec::with_capacity(tree.max_depth() as usize);
        let mut key = String::with_capacity(2 * tree.max_depth() as usize);

        for (id, node) in tree.nodes().iter().enumerate() {
            steps.clear();
            steps.extend(tree.ancestry(id));
            key.clear();
            for q in steps.iter().rev() {
                key.push_str(q.bits());
            }
            map.serialize_entry(&key, &NodeRecord::from(node))?;
        }
        map.end()
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDocument {
    nodes: HashMap<String, NodeRecord>,
}

/// Writes `tree` as a JSON document.
pub fn write_json<W: Write>(tree: &QuadTree, writer: W, layout: Layout) -> Result<()> {
    let mut writer = BufWriter::new(writer);
    let doc = Document::new(tree);
    match layout {
        Layout::Pretty => {
            let formatter = PrettyFormatter::with_indent(INDENT);
            doc.serialize(&mut serde_json::Serializer::with_formatter(&mut writer, formatter))?
        }
        Layout::Compact => doc.serialize(&mut serde_json::Serializer::with_formatter(
            &mut writer,
            CompactFormatter,
        ))?,
    }
    writer.flush()?;
    debug!(nodes = tree.len(), ?layout, "wrote quadtree document");
    Ok(())
}

pub fn to_json_string(tree: &QuadTree, layout: Layout) -> Result<String> {
    let mut buf = Vec::new();
    write_json(tree, &mut buf, layout)?;
    // serde_json only emits UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Reads a JSON document and rebuilds the tree it describes.
///
/// The document must describe a complete quadtree within `max_depth`: a
/// root, four children for every internal node, no node without an
/// internal parent, and a value on every leaf (and only on leaves).
pub fn read_json<R: Read>(reader: R, max_depth: Depth) -> Result<QuadTree> {
    let raw: RawDocument = serde_json::from_reader(BufReader::new(reader))?;
    build_tree(raw.nodes, max_depth)
}

pub fn from_json_str(json: &str, max_depth: Depth) -> Result<QuadTree> {
    let raw: RawDocument = serde_json::from_str(json)?;
    build_tree(raw.nodes, max_depth)
}

fn build_tree(raw: HashMap<String, NodeRecord>, max_depth: Depth) -> Result<QuadTree> {
    let mut records = raw
        .into_iter()
        .map(|(key, record)| -> Result<(QuadPath, NodeRecord)> { Ok((key.parse()?, record)) })
        .collect::<Result<HashMap<_, _>>>()?;

    let mut tree = QuadTree::with_capacity(max_depth, records.len());
    let mut queue = VecDeque::from([(QuadTree::ROOT, QuadPath::root())]);

    while let Some((id, path)) = queue.pop_front() {
        let record = records
            .remove(&path)
            .ok_or_else(|| TreeError::NotFound(path.to_string()))?;

        if record.is_leaf {
            let value = record
                .value
                .ok_or_else(|| DocumentError::MissingValue(path.to_string()))?;
            tree.set_leaf_value(id, value);
            continue;
        }

        if record.value.is_some() {
            return Err(DocumentError::UnexpectedValue(path.to_string()));
        }
        if Quadrant::iter_all().any(|q| !records.contains_key(&path.child(q))) {
            return Err(TreeError::IncompleteInternal(path.to_string()).into());
        }
        match tree.subdivide(id) {
            Subdivision::Split(children) => {
                for q in Quadrant::iter_all() {
                    queue.push_back((children[q], path.child(q)));
                }
            }
            Subdivision::AlreadyInternal(_) | Subdivision::AtMaxDepth => {
                let child = path.child(Quadrant::NW);
                return Err(TreeError::TooDeep {
                    path: child.to_string(),
                    depth: child.depth(),
                    max_depth,
                }
                .into());
            }
        }
    }

    // Anything left was never reached from the root.
    if let Some(path) = records.keys().min() {
        let err = if path.depth() > max_depth {
            TreeError::TooDeep {
                path: path.to_string(),
                depth: path.depth(),
                max_depth,
            }
        } else {
            TreeError::Orphan(path.to_string())
        };
        return Err(err.into());
    }

    debug!(nodes = tree.len(), "read quadtree document");
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use crate::generator::generate;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use serde_json::{Value, json};

    fn small_tree() -> QuadTree {
        let mut tree = QuadTree::new(20);
        tree.subdivide(QuadTree::ROOT);
        tree.subdivide(2);
        tree
    }

    #[test]
    fn records_match_reference_shape() {
        let json = to_json_string(&small_tree(), Layout::Compact).unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();

        assert_eq!(
            value,
            json!({
                "nodes": {
                    "": { "isLeaf": false },
                    "00": { "isLeaf": true, "value": 0 },
                    "01": { "isLeaf": false },
                    "10": { "isLeaf": true, "value": 0 },
                    "11": { "isLeaf": true, "value": 0 },
                    "0100": { "isLeaf": true, "value": 0 },
                    "0101": { "isLeaf": true, "value": 0 },
                    "0110": { "isLeaf": true, "value": 0 },
                    "0111": { "isLeaf": true, "value": 0 }
                }
            })
        );
    }

    #[test]
    fn keys_follow_creation_order() {
        let json = to_json_string(&small_tree(), Layout::Compact).unwrap();
        assert!(json.starts_with(r#"{"nodes":{"":{"isLeaf":false},"00":{"isLeaf":true,"value":0},"01":"#));
    }

    #[test]
    fn pretty_layout_indents_with_four_spaces() {
        let mut tree = QuadTree::new(20);
        tree.subdivide(QuadTree::ROOT);
        let json = to_json_string(&tree, Layout::Pretty).unwrap();

        assert!(json.starts_with("{\n    \"nodes\": {\n        \"\": {\n            \"isLeaf\": false\n        },"));
    }

    #[test]
    fn export_is_stable() {
        let config = GeneratorConfig::with_target(500);
        let (tree, _) = generate(&config, &mut StdRng::seed_from_u64(11));

        let a = to_json_string(&tree, Layout::Pretty).unwrap();
        let b = to_json_string(&tree, Layout::Pretty).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn read_rebuilds_written_tree() {
        let config = GeneratorConfig::with_target(300);
        let (mut tree, _) = generate(&config, &mut StdRng::seed_from_u64(9));
        let leaf = tree.leaves().last().unwrap();
        tree.set_leaf_value(leaf, 200);

        let mut buf = Vec::new();
        write_json(&tree, &mut buf, Layout::Pretty).unwrap();
        let back = read_json(buf.as_slice(), 20).unwrap();

        back.check_invariants().unwrap();
        assert_eq!(back.len(), tree.len());
        for (id, node) in tree.nodes().iter().enumerate() {
            let path = tree.path_of(id);
            let other = back.node(back.find(&path).unwrap()).unwrap();
            assert_eq!(NodeRecord::from(node), NodeRecord::from(other), "at {path}");
        }
    }

    #[test]
    fn read_accepts_single_leaf_root() {
        let tree = from_json_str(r#"{"nodes": {"": {"isLeaf": true, "value": 3}}}"#, 20).unwrap();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.node(QuadTree::ROOT).unwrap().value(), Some(3));
    }

    #[test]
    fn read_rejects_missing_root() {
        let err = from_json_str(r#"{"nodes": {}}"#, 20).unwrap_err();
        assert!(matches!(err, DocumentError::Structure(TreeError::NotFound(p)) if p.is_empty()));
    }

    #[test]
    fn read_rejects_incomplete_internal() {
        let json = r#"{"nodes": {
            "": {"isLeaf": false},
            "00": {"isLeaf": true, "value": 0},
            "01": {"isLeaf": true, "value": 0},
            "10": {"isLeaf": true, "value": 0}
        }}"#;
        let err = from_json_str(json, 20).unwrap_err();
        assert!(matches!(err, DocumentError::Structure(TreeError::IncompleteInternal(p)) if p.is_empty()));
    }

    #[test]
    fn read_rejects_children_of_leaves() {
        let json = r#"{"nodes": {
            "": {"isLeaf": true, "value": 0},
            "00": {"isLeaf": true, "value": 0}
        }}"#;
        let err = from_json_str(json, 20).unwrap_err();
        assert!(matches!(err, DocumentError::Structure(TreeError::Orphan(p)) if p == "00"));
    }

    #[test]
    fn read_rejects_nodes_below_max_depth() {
        let json = to_json_string(&small_tree(), Layout::Compact).unwrap();
        let err = from_json_str(&json, 1).unwrap_err();
        assert!(matches!(
            err,
            DocumentError::Structure(TreeError::TooDeep { depth: 2, max_depth: 1, .. })
        ));
    }

    #[test]
    fn read_rejects_misplaced_values() {
        let leaf_without_value = r#"{"nodes": {"": {"isLeaf": true}}}"#;
        assert!(matches!(
            from_json_str(leaf_without_value, 20).unwrap_err(),
            DocumentError::MissingValue(_)
        ));

        let internal_with_value = r#"{"nodes": {
            "": {"isLeaf": false, "value": 1},
            "00": {"isLeaf": true, "value": 0},
            "01": {"isLeaf": true, "value": 0},
            "10": {"isLeaf": true, "value": 0},
            "11": {"isLeaf": true, "value": 0}
        }}"#;
        assert!(matches!(
            from_json_str(internal_with_value, 20).unwrap_err(),
            DocumentError::UnexpectedValue(_)
        ));
    }

    #[test]
    fn read_rejects_bad_keys_and_json() {
        assert!(matches!(
            from_json_str(r#"{"nodes": {"0": {"isLeaf": true, "value": 0}}}"#, 20).unwrap_err(),
            DocumentError::Path(_)
        ));
        assert!(matches!(
            from_json_str(r#"{"quads": {}}"#, 20).unwrap_err(),
            DocumentError::Json(_)
        ));
    }
}
