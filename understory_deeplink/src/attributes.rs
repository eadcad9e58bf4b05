// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Attribute sets and the path/query parameter merge.
//!
//! ## Precedence
//!
//! [`merge`] layers, lowest to highest:
//!
//! 1. attributes already attached to the inbound request,
//! 2. path parameters extracted by the matching route table,
//! 3. query parameters parsed from the request string,
//! 4. the reserved [`keys::URI`] entry holding the raw request string.
//!
//! A query parameter that shadows a path parameter is logged at `warn` level
//! and reported in [`Merged::duplicates`]; the query value still wins.
//!
//! ```
//! use understory_deeplink::attributes::{AttributeSet, merge};
//! use understory_deeplink::types::keys;
//!
//! let mut path = AttributeSet::new();
//! path.insert("id", "1");
//! let uri = "app://item/1?id=2&tab=info";
//! let merged = merge(path, uri, &AttributeSet::new());
//!
//! assert_eq!(merged.attributes.get("id"), Some("2"));
//! assert_eq!(merged.attributes.get("tab"), Some("info"));
//! assert_eq!(merged.attributes.get(keys::URI), Some(uri));
//! assert_eq!(merged.duplicates, vec!["id".to_string()]);
//! ```

use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashMap;
use log::warn;

use crate::query;
use crate::types::keys;

/// A flat map of string attributes. Keys are unique; the last write wins.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AttributeSet {
    map: HashMap<String, String>,
}

impl AttributeSet {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.map.get(key).map(String::as_str)
    }

    /// Whether `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    /// Store `value` under `key`, returning the value it replaced.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.map.insert(key.into(), value.into())
    }

    /// Copy every entry of `other` into `self`, overwriting on collision.
    pub fn extend_from(&mut self, other: &Self) {
        self.map
            .extend(other.map.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether the set has no entries.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterate entries in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.map.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AttributeSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for AttributeSet {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

/// Result of [`merge`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Merged {
    /// The merged attributes.
    pub attributes: AttributeSet,
    /// Parameter names that appeared both in the path and in the query, in
    /// the order the query first mentioned them.
    pub duplicates: Vec<String>,
}

/// Merge `path` parameters with the query parameters of `uri` on top of the
/// `inbound` attributes.
///
/// See the [module docs](self) for the precedence rules.
pub fn merge(path: AttributeSet, uri: &str, inbound: &AttributeSet) -> Merged {
    let mut attributes = inbound.clone();
    attributes.extend_from(&path);

    let mut duplicates: Vec<String> = Vec::new();
    for (name, value) in query::parameters(uri) {
        if path.contains_key(&name) && !duplicates.contains(&name) {
            warn!("Duplicate parameter name in path and query param: {name}");
            duplicates.push(name.clone());
        }
        attributes.insert(name, value);
    }

    attributes.insert(keys::URI, uri);
    Merged {
        attributes,
        duplicates,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn set(pairs: &[(&str, &str)]) -> AttributeSet {
        pairs.iter().copied().collect()
    }

    #[test]
    fn query_overrides_path_and_records_duplicate() {
        let merged = merge(
            set(&[("id", "1")]),
            "app://profile/1?id=2",
            &AttributeSet::new(),
        );
        assert_eq!(merged.attributes.get("id"), Some("2"));
        assert_eq!(merged.duplicates, vec![String::from("id")]);
    }

    #[test]
    fn duplicate_recorded_once_per_name() {
        let merged = merge(
            set(&[("id", "1")]),
            "app://profile/1?id=2&id=3",
            &AttributeSet::new(),
        );
        assert_eq!(merged.attributes.get("id"), Some("3"));
        assert_eq!(merged.duplicates.len(), 1);
    }

    #[test]
    fn repeated_query_key_without_path_collision_is_not_a_duplicate() {
        let merged = merge(
            AttributeSet::new(),
            "app://search?q=a&q=b",
            &AttributeSet::new(),
        );
        assert_eq!(merged.attributes.get("q"), Some("b"));
        assert!(merged.duplicates.is_empty());
    }

    #[test]
    fn reserved_uri_key_always_wins() {
        let uri = "app://x?deep_link_uri=spoofed";
        let merged = merge(
            set(&[(keys::URI, "from-path")]),
            uri,
            &set(&[(keys::URI, "from-inbound")]),
        );
        assert_eq!(merged.attributes.get(keys::URI), Some(uri));
    }

    #[test]
    fn inbound_is_the_base_layer() {
        let inbound = set(&[("source", "push"), ("id", "inbound"), ("tab", "inbound")]);
        let merged = merge(set(&[("id", "7")]), "app://item/7?tab=posts", &inbound);
        assert_eq!(merged.attributes.get("source"), Some("push"));
        assert_eq!(merged.attributes.get("id"), Some("7"));
        assert_eq!(merged.attributes.get("tab"), Some("posts"));
        // Inbound keys shadowed by path/query are not duplicates.
        assert!(merged.duplicates.is_empty());
    }

    #[test]
    fn no_query_yields_path_plus_uri() {
        let merged = merge(set(&[("id", "42")]), "app://p/42", &AttributeSet::new());
        assert_eq!(merged.attributes.len(), 2);
        assert_eq!(merged.attributes.get("id"), Some("42"));
    }

    #[test]
    fn extend_from_overwrites() {
        let mut a = set(&[("k", "1"), ("x", "x")]);
        a.extend_from(&set(&[("k", "2")]));
        assert_eq!(a.get("k"), Some("2"));
        assert_eq!(a.get("x"), Some("x"));
        assert_eq!(a.insert("k", "3"), Some(String::from("2")));
    }
}
