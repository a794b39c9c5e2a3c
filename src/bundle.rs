//! Locale bundle definitions

use std::collections::HashMap;
use std::sync::Arc;

use serde::{
    Deserialize,
    Serialize,
};

/// A node of a bundle tree: either a leaf string or a nested mapping.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum BundleNode {
    Leaf(String),
    Map(HashMap<String, BundleNode>),
}

impl BundleNode {
    /// Child named `segment`, if this node is a mapping that has one.
    #[must_use]
    pub fn child(&self, segment: &str) -> Option<&Self> {
        match self {
            Self::Map(children) => children.get(segment),
            Self::Leaf(_) => None,
        }
    }

    #[must_use]
    pub fn as_leaf(&self) -> Option<&str> {
        match self {
            Self::Leaf(text) => Some(text),
            Self::Map(_) => None,
        }
    }
}

/// All translated strings for one locale.
///
/// The root is always a mapping. Cloning shares the underlying tree, which is
/// never mutated once built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Bundle {
    /// Top-level mapping
    root: Arc<HashMap<String, BundleNode>>,
}

impl Bundle {
    #[must_use]
    pub fn new(root: HashMap<String, BundleNode>) -> Self {
        Self { root: Arc::new(root) }
    }

    /// Parse a bundle from JSON text.
    ///
    /// The document must be an object whose values are strings or nested
    /// objects; numbers, booleans, null and arrays are rejected.
    ///
    /// # Examples
    /// ```
    /// use locale_strings::bundle::Bundle;
    ///
    /// let bundle = Bundle::from_json_str(r#"{"common": {"hello": "Hello"}}"#).unwrap();
    /// assert_eq!(bundle.flatten(".").get("common.hello"), Some(&"Hello".to_string()));
    ///
    /// assert!(Bundle::from_json_str(r#"{"count": 3}"#).is_err());
    /// ```
    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    #[must_use]
    pub fn root(&self) -> &HashMap<String, BundleNode> {
        &self.root
    }

    #[must_use]
    pub fn get(&self, segment: &str) -> Option<&BundleNode> {
        self.root.get(segment)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Whether two handles share the same underlying tree.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.root, &other.root)
    }

    /// Flatten the tree into a `joined.key -> text` map.
    #[must_use]
    pub fn flatten(&self, separator: &str) -> HashMap<String, String> {
        let mut result = HashMap::new();
        for (key, node) in self.root.iter() {
            flatten_node(node, separator, key, &mut result);
        }
        result
    }
}

impl From<HashMap<String, BundleNode>> for Bundle {
    fn from(root: HashMap<String, BundleNode>) -> Self {
        Self::new(root)
    }
}

/// Collect the leaves under `node`, prefixing keys with `prefix`.
fn flatten_node(
    node: &BundleNode,
    separator: &str,
    prefix: &str,
    result: &mut HashMap<String, String>,
) {
    match node {
        BundleNode::Map(children) => {
            for (key, child) in children {
                flatten_node(child, separator, &format!("{prefix}{separator}{key}"), result);
            }
        }
        BundleNode::Leaf(text) => {
            result.insert(prefix.to_string(), text.clone());
        }
    }
}
