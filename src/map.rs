//! Attribute maps for Bag nodes.
//!
//! This module provides [`AttrMap`], a wrapper around [`IndexMap`] holding a
//! node's attributes. Attribute values are restricted to scalars: a nested
//! [`Bag`](crate::Bag) is rejected with [`Error::UnsupportedValueKind`].
//!
//! Insertion order is kept so that encoding is deterministic, but equality is
//! order-insensitive: two attribute maps are equal when they hold the same
//! key/value pairs.
//!
//! ## Examples
//!
//! ```rust
//! use tytx_bag::{AttrMap, Value};
//!
//! let mut attrs = AttrMap::new();
//! attrs.insert("color", "red").unwrap();
//! attrs.insert("size", 10).unwrap();
//!
//! assert_eq!(attrs.len(), 2);
//! assert_eq!(attrs.get("color").and_then(|v| v.as_str()), Some("red"));
//! ```

use crate::{Error, Result, Value};
use indexmap::IndexMap;

/// An ordered map of attribute names to scalar values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AttrMap(IndexMap<String, Value>);

impl AttrMap {
    /// Creates an empty `AttrMap`.
    #[must_use]
    pub fn new() -> Self {
        AttrMap(IndexMap::new())
    }

    /// Builds a map from key/value pairs, rejecting non-scalar values.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tytx_bag::{AttrMap, Bag, Value};
    ///
    /// let attrs = AttrMap::from_pairs([("sku", Value::from("PRD001")), ("stock", Value::from(100))]).unwrap();
    /// assert_eq!(attrs.keys().collect::<Vec<_>>(), vec!["sku", "stock"]);
    ///
    /// assert!(AttrMap::from_pairs([("nested", Value::Bag(Bag::new()))]).is_err());
    /// ```
    pub fn from_pairs<K, V, I>(pairs: I) -> Result<Self>
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut map = AttrMap::new();
        for (key, value) in pairs {
            map.insert(key, value)?;
        }
        Ok(map)
    }

    /// Inserts an attribute, returning the previous value for that key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedValueKind`] if `value` is a Bag.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Result<Option<Value>> {
        let key = key.into();
        let value = value.into();
        if value.is_bag() {
            return Err(Error::unsupported_kind(
                "bag",
                &format!("as value of attribute '{}'", key),
            ));
        }
        Ok(self.0.insert(key, value))
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Removes an attribute, keeping the order of the remaining ones.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.shift_remove(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the attribute names, in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.keys().map(String::as_str)
    }

    /// Returns an iterator over the attribute values, in insertion order.
    pub fn values(&self) -> indexmap::map::Values<'_, String, Value> {
        self.0.values()
    }

    /// Returns an iterator over the name/value pairs, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a AttrMap {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for AttrMap {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Bag;

    #[test]
    fn test_equality_is_unordered() {
        let a = AttrMap::from_pairs([("color", Value::from("red")), ("size", Value::from(10))]).unwrap();
        let b = AttrMap::from_pairs([("size", Value::from(10)), ("color", Value::from("red"))]).unwrap();
        assert_eq!(a, b);
        assert_ne!(a.keys().collect::<Vec<_>>(), b.keys().collect::<Vec<_>>());
    }

    #[test]
    fn test_rejects_bag_values() {
        let mut attrs = AttrMap::new();
        let err = attrs.insert("child", Bag::new()).unwrap_err();
        assert!(matches!(err, Error::UnsupportedValueKind { .. }));
        assert!(attrs.is_empty());
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut attrs = AttrMap::from_pairs([("a", 1), ("b", 2), ("c", 3)]).unwrap();
        assert_eq!(attrs.remove("b"), Some(Value::Integer(2)));
        assert_eq!(attrs.keys().collect::<Vec<_>>(), vec!["a", "c"]);
    }

    #[test]
    fn test_insert_replaces() {
        let mut attrs = AttrMap::new();
        assert!(attrs.insert("k", 1).unwrap().is_none());
        assert_eq!(attrs.insert("k", 2).unwrap(), Some(Value::Integer(1)));
        assert_eq!(attrs.len(), 1);
    }
}
