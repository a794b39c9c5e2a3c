//! Translation key resolution.

use crate::bundle::{
    Bundle,
    BundleNode,
};

/// Default separator between key segments.
pub const DEFAULT_KEY_SEPARATOR: &str = ".";

/// Walks `key` through `bundle` and returns the leaf string it names.
///
/// Returns `None` when the bundle or key is empty, a segment is missing, a
/// segment would descend into a leaf, an interior mapping along the way is
/// empty, or the final node is a mapping or an empty string. Repeated
/// separators produce empty segments, which never match.
///
/// # Examples
/// ```
/// use locale_strings::bundle::Bundle;
/// use locale_strings::resolve::resolve;
///
/// let bundle = Bundle::from_json_str(r#"{"a": {"b": {"c": "hi"}}}"#).unwrap();
/// assert_eq!(resolve(&bundle, "a.b.c", "."), Some("hi"));
/// assert_eq!(resolve(&bundle, "a.b", "."), None);
/// ```
#[must_use]
pub fn resolve<'a>(bundle: &'a Bundle, key: &str, separator: &str) -> Option<&'a str> {
    if bundle.is_empty() || key.is_empty() {
        return None;
    }

    let mut segments = key.split(separator);
    let mut node = bundle.get(segments.next()?)?;
    for segment in segments {
        node = match node {
            BundleNode::Map(children) if !children.is_empty() => children.get(segment)?,
            _ => return None,
        };
    }

    node.as_leaf().filter(|text| !text.is_empty())
}
