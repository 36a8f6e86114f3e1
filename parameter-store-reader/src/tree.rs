use serde::Serialize;
use std::collections::BTreeMap;

use crate::{
    domain::{FlatMap, PATH_SEPARATOR},
    error::ReaderError,
};

/// Nested view of slash-delimited keys, used for JSON and YAML output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TreeNode {
    Leaf(String),
    Branch(BTreeMap<String, TreeNode>),
}

impl TreeNode {
    pub fn empty() -> Self {
        TreeNode::Branch(BTreeMap::new())
    }

    pub fn as_leaf(&self) -> Option<&str> {
        match self {
            TreeNode::Leaf(value) => Some(value),
            TreeNode::Branch(_) => None,
        }
    }

    pub fn get(&self, segment: &str) -> Option<&TreeNode> {
        match self {
            TreeNode::Branch(children) => children.get(segment),
            TreeNode::Leaf(_) => None,
        }
    }
}

/// Splits every key on `/`, ignoring empty segments, and nests the values.
pub fn build_tree(flat: &FlatMap) -> Result<TreeNode, ReaderError> {
    let mut root = BTreeMap::new();

    for (key, value) in flat {
        let segments: Vec<&str> = key
            .split(PATH_SEPARATOR)
            .filter(|segment| !segment.is_empty())
            .collect();

        if segments.is_empty() {
            return Err(ReaderError::Conflict {
                key: key.clone(),
                reason: "key has no path segments",
            });
        }

        insert(&mut root, key, &segments, value)?;
    }

    Ok(TreeNode::Branch(root))
}

fn insert(
    current: &mut BTreeMap<String, TreeNode>,
    key: &str,
    segments: &[&str],
    value: &str,
) -> Result<(), ReaderError> {
    let (head, rest) = match segments.split_first() {
        Some(split) => split,
        None => return Ok(()),
    };

    if rest.is_empty() {
        if let Some(TreeNode::Branch(_)) = current.get(*head) {
            return Err(ReaderError::Conflict {
                key: key.to_string(),
                reason: "a value would replace a branch",
            });
        }
        current.insert(head.to_string(), TreeNode::Leaf(value.to_string()));
        return Ok(());
    }

    let node = current
        .entry(head.to_string())
        .or_insert_with(TreeNode::empty);

    match node {
        TreeNode::Branch(children) => insert(children, key, rest, value),
        TreeNode::Leaf(_) => Err(ReaderError::Conflict {
            key: key.to_string(),
            reason: "an intermediate segment already holds a value",
        }),
    }
}

/// Joins every leaf's segment chain back into a `/`-prefixed key.
pub fn flatten(tree: &TreeNode) -> FlatMap {
    let mut out = FlatMap::new();
    collect(tree, String::new(), &mut out);
    out
}

fn collect(node: &TreeNode, prefix: String, out: &mut FlatMap) {
    match node {
        TreeNode::Leaf(value) => {
            out.insert(prefix, value.clone());
        }
        TreeNode::Branch(children) => {
            for (segment, child) in children {
                collect(child, format!("{prefix}{PATH_SEPARATOR}{segment}"), out);
            }
        }
    }
}
