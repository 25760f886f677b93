//! The Bag container: an ordered, path-addressable tree of labeled nodes.
//!
//! A [`Bag`] owns an ordered sequence of [`Node`]s. Each node has a label
//! (unique among its siblings), a [`Value`] and an [`AttrMap`]. A node whose
//! value is itself a Bag forms the next level of the tree.
//!
//! ## Paths
//!
//! Dotted paths address nested nodes: `"a.b.c"` is node `c` inside `b` inside
//! `a`. Writing through a path creates missing intermediate nodes as empty
//! Bags; writing through an intermediate node that holds a scalar fails with
//! [`Error::PathConflict`] and leaves the Bag untouched. Read paths may also
//! use `#n` segments to address a sibling by index, `#attr=text` to find the
//! first sibling whose attribute reads as `text`, and `#=text` to find the
//! first sibling whose value reads as `text`.
//!
//! ```rust
//! use tytx_bag::{Bag, Value};
//!
//! let mut bag = Bag::new();
//! bag.set("a.b.c", "deep").unwrap();
//!
//! assert!(bag.get("a").unwrap().is_bag());
//! assert!(bag.get("a.b").unwrap().is_bag());
//! assert_eq!(bag.get("a.b.c"), Some(&Value::from("deep")));
//! assert_eq!(bag.get("a.#0.#0"), Some(&Value::from("deep")));
//! assert!(bag.get("a.#=deep").is_none());
//! assert_eq!(bag.get("a.b.#=deep"), Some(&Value::from("deep")));
//! assert!(bag.get("a.x").is_none());
//! ```
//!
//! `get` returns `None` for absent paths; `delete` of an absent path is an
//! error ([`Error::NotFound`]) while `pop` returns `None`.

use crate::{AttrMap, Error, Result, Value};
use indexmap::IndexMap;
use std::fmt;
use std::str::FromStr;

/// A single labeled entry in a [`Bag`].
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    label: String,
    value: Value,
    attrs: AttrMap,
}

impl Node {
    #[must_use]
    pub fn new(label: impl Into<String>, value: impl Into<Value>) -> Self {
        Node {
            label: label.into(),
            value: value.into(),
            attrs: AttrMap::new(),
        }
    }

    #[must_use]
    pub fn with_attrs(label: impl Into<String>, value: impl Into<Value>, attrs: AttrMap) -> Self {
        Node {
            label: label.into(),
            value: value.into(),
            attrs,
        }
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut Value {
        &mut self.value
    }

    /// Replaces the value, returning the previous one. Attributes are untouched.
    pub fn set_value(&mut self, value: impl Into<Value>) -> Value {
        std::mem::replace(&mut self.value, value.into())
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        self.value
    }

    #[must_use]
    pub fn attrs(&self) -> &AttrMap {
        &self.attrs
    }

    pub fn attrs_mut(&mut self) -> &mut AttrMap {
        &mut self.attrs
    }

    /// Replaces the whole attribute map.
    pub fn set_attrs(&mut self, attrs: AttrMap) {
        self.attrs = attrs;
    }

    #[must_use]
    pub fn get_attr(&self, key: &str) -> Option<&Value> {
        self.attrs.get(key)
    }

    /// Sets a single attribute.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedValueKind`] if `value` is a Bag.
    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Result<Option<Value>> {
        self.attrs.insert(key, value)
    }

    pub fn del_attr(&mut self, key: &str) -> Option<Value> {
        self.attrs.remove(key)
    }

    /// Whether attribute `key` is present and, when `value` is given, equal to it.
    ///
    /// ```rust
    /// use tytx_bag::{Node, Value};
    ///
    /// let mut node = Node::new("item", 1);
    /// node.set_attr("id", 34).unwrap();
    /// assert!(node.has_attr("id", None));
    /// assert!(node.has_attr("id", Some(&Value::from(34))));
    /// assert!(!node.has_attr("id", Some(&Value::from("34"))));
    /// assert!(!node.has_attr("name", None));
    /// ```
    #[must_use]
    pub fn has_attr(&self, key: &str, value: Option<&Value>) -> bool {
        match (self.attrs.get(key), value) {
            (Some(found), Some(expected)) => found == expected,
            (Some(_), None) => true,
            (None, _) => false,
        }
    }
}

/// Whether a scalar reads as `text`; nulls and Bags never match.
fn reads_as(value: &Value, text: &str) -> bool {
    match value {
        Value::String(s) => s == text,
        Value::Null | Value::Bag(_) => false,
        other => other.to_string() == text,
    }
}

/// Where a *new* node is inserted among its siblings.
///
/// Overwriting an existing node never moves it. Unknown references and
/// out-of-range indices fall back to appending.
///
/// The string forms follow the classic Bag syntax:
///
/// ```rust
/// use tytx_bag::Position;
///
/// assert_eq!(">".parse::<Position>().unwrap(), Position::Append);
/// assert_eq!("<".parse::<Position>().unwrap(), Position::Prepend);
/// assert_eq!("#2".parse::<Position>().unwrap(), Position::Index(2));
/// assert_eq!("<name".parse::<Position>().unwrap(), Position::Before("name".into()));
/// assert_eq!(">name".parse::<Position>().unwrap(), Position::After("name".into()));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum Position {
    #[default]
    Append,
    Prepend,
    Index(usize),
    Before(String),
    After(String),
}

impl FromStr for Position {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let parse_index = |digits: &str| {
            digits
                .parse::<usize>()
                .map_err(|_| Error::invalid_path(s, "position index is not a number"))
        };
        match s {
            "" | ">" => Ok(Position::Append),
            "<" => Ok(Position::Prepend),
            _ => {
                if let Some(rest) = s.strip_prefix('#') {
                    return Ok(Position::Index(parse_index(rest)?));
                }
                if let Some(rest) = s.strip_prefix('<') {
                    return match rest.strip_prefix('#') {
                        Some(digits) => Ok(Position::Index(parse_index(digits)?)),
                        None => Ok(Position::Before(rest.to_string())),
                    };
                }
                if let Some(rest) = s.strip_prefix('>') {
                    return match rest.strip_prefix('#') {
                        Some(digits) => Ok(Position::Index(parse_index(digits)? + 1)),
                        None => Ok(Position::After(rest.to_string())),
                    };
                }
                Err(Error::invalid_path(s, "unrecognized position"))
            }
        }
    }
}

/// An ordered, path-addressable nested container of labeled nodes.
#[derive(Clone, Debug, Default)]
pub struct Bag {
    nodes: IndexMap<String, Node>,
}

fn split_path(path: &str) -> Result<Vec<&str>> {
    if path.is_empty() {
        return Err(Error::invalid_path(path, "path is empty"));
    }
    let segments: Vec<&str> = path.split('.').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(Error::invalid_path(path, "path contains an empty segment"));
    }
    Ok(segments)
}

impl Bag {
    #[must_use]
    pub fn new() -> Self {
        Bag {
            nodes: IndexMap::new(),
        }
    }

    /// Number of top-level nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Top-level labels in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.nodes.keys().map(String::as_str)
    }

    /// Top-level values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &Value> + '_ {
        self.nodes.values().map(Node::value)
    }

    /// Top-level `(label, value)` pairs in insertion order.
    pub fn items(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.nodes.values().map(|n| (n.label(), n.value()))
    }

    /// Top-level nodes in insertion order.
    pub fn iter(&self) -> indexmap::map::Values<'_, String, Node> {
        self.nodes.values()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Index of a sibling addressed by label, `#n`, `#attr=text` or `#=text`.
    fn local_index(&self, segment: &str) -> Option<usize> {
        if let Some(index) = self.nodes.get_index_of(segment) {
            return Some(index);
        }
        let selector = segment.strip_prefix('#')?;
        if let Some((attr, text)) = selector.split_once('=') {
            if attr.is_empty() {
                return self.nodes.values().position(|node| reads_as(&node.value, text));
            }
            if !attr.chars().all(|c| c.is_alphanumeric() || c == '_') {
                return None;
            }
            return self
                .nodes
                .values()
                .position(|node| node.attrs.get(attr).is_some_and(|v| reads_as(v, text)));
        }
        let index: usize = selector.parse().ok()?;
        (index < self.nodes.len()).then_some(index)
    }

    fn local_node(&self, segment: &str) -> Option<&Node> {
        self.local_index(segment)
            .and_then(|i| self.nodes.get_index(i))
            .map(|(_, node)| node)
    }

    fn local_node_mut(&mut self, segment: &str) -> Option<&mut Node> {
        let index = self.local_index(segment)?;
        self.nodes.get_index_mut(index).map(|(_, node)| node)
    }

    /// Returns the node at `path`, or `None` if the path does not resolve.
    #[must_use]
    pub fn get_node(&self, path: &str) -> Option<&Node> {
        let segments = split_path(path).ok()?;
        let (last, parents) = segments.split_last()?;
        let mut current = self;
        for segment in parents {
            current = current.local_node(segment)?.value().as_bag()?;
        }
        current.local_node(last)
    }

    pub fn get_node_mut(&mut self, path: &str) -> Option<&mut Node> {
        let segments = split_path(path).ok()?;
        let (last, parents) = segments.split_last()?;
        let mut current = self;
        for segment in parents {
            current = current.local_node_mut(segment)?.value_mut().as_bag_mut()?;
        }
        current.local_node_mut(last)
    }

    /// Returns the value at `path`, or `None` if the path does not resolve.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Value> {
        self.get_node(path).map(Node::value)
    }

    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.get_node(path).is_some()
    }

    /// Sets the value at `path`, creating intermediate Bags as needed.
    ///
    /// An existing node keeps its position and its attributes.
    ///
    /// # Errors
    ///
    /// - [`Error::PathConflict`] if an intermediate segment holds a scalar
    /// - [`Error::InvalidPath`] for empty segments or `#n` labels that would be created
    pub fn set(&mut self, path: &str, value: impl Into<Value>) -> Result<&mut Node> {
        self.set_at(path, value, None, Position::Append)
    }

    /// Sets the value at `path` and replaces the node's attribute map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tytx_bag::{AttrMap, Bag, Value};
    ///
    /// let mut bag = Bag::new();
    /// let attrs = AttrMap::from_pairs([("color", Value::from("red")), ("size", Value::from(10))]).unwrap();
    /// bag.set_with_attrs("item1", "value1", attrs).unwrap();
    ///
    /// let node = bag.get_node("item1").unwrap();
    /// assert_eq!(node.get_attr("size"), Some(&Value::from(10)));
    /// ```
    pub fn set_with_attrs(&mut self, path: &str, value: impl Into<Value>, attrs: AttrMap) -> Result<&mut Node> {
        self.set_at(path, value, Some(attrs), Position::Append)
    }

    /// Full form of [`Bag::set`]: optional attribute replacement and an
    /// insertion position used when the terminal node is new.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tytx_bag::{Bag, Position};
    ///
    /// let mut bag = Bag::new();
    /// bag.set("b", 2).unwrap();
    /// bag.set_at("a", 1, None, Position::Prepend).unwrap();
    /// bag.set_at("c", 3, None, Position::After("a".into())).unwrap();
    /// assert_eq!(bag.keys().collect::<Vec<_>>(), vec!["a", "c", "b"]);
    /// ```
    pub fn set_at(
        &mut self,
        path: &str,
        value: impl Into<Value>,
        attrs: Option<AttrMap>,
        position: Position,
    ) -> Result<&mut Node> {
        let segments = split_path(path)?;
        let (last, parents) = segments
            .split_last()
            .ok_or_else(|| Error::invalid_path(path, "path is empty"))?;

        // Validate the whole descent before touching anything.
        self.check_writable(path, parents, last)?;

        let mut current: &mut Bag = self;
        for segment in parents {
            current = current.child_bag_or_create(path, segment)?;
        }
        current.put_local(path, last, value.into(), attrs, position)
    }

    fn check_writable(&self, path: &str, parents: &[&str], last: &str) -> Result<()> {
        let mut current = Some(self);
        let mut creating = false;
        for segment in parents {
            match current.and_then(|bag| bag.local_node(segment)) {
                Some(node) => match node.value() {
                    Value::Bag(child) => current = Some(child),
                    _ => return Err(Error::path_conflict(path, segment)),
                },
                None => {
                    if segment.starts_with('#') {
                        return Err(Error::invalid_path(path, "cannot create a node with '#n' syntax"));
                    }
                    creating = true;
                    current = None;
                }
            }
        }
        let exists = !creating && current.is_some_and(|bag| bag.local_node(last).is_some());
        if !exists && last.starts_with('#') {
            return Err(Error::invalid_path(path, "cannot create a node with '#n' syntax"));
        }
        Ok(())
    }

    fn child_bag_or_create(&mut self, path: &str, segment: &str) -> Result<&mut Bag> {
        let index = match self.local_index(segment) {
            Some(index) => index,
            None => {
                self.nodes
                    .insert(segment.to_string(), Node::new(segment, Bag::new()));
                self.nodes.len() - 1
            }
        };
        match self.nodes.get_index_mut(index) {
            Some((_, node)) => node
                .value_mut()
                .as_bag_mut()
                .ok_or_else(|| Error::path_conflict(path, segment)),
            None => Err(Error::not_found(path)),
        }
    }

    fn put_local(
        &mut self,
        path: &str,
        label: &str,
        value: Value,
        attrs: Option<AttrMap>,
        position: Position,
    ) -> Result<&mut Node> {
        let index = match self.local_index(label) {
            Some(index) => {
                if let Some((_, node)) = self.nodes.get_index_mut(index) {
                    node.value = value;
                    if let Some(attrs) = attrs {
                        node.attrs = attrs;
                    }
                }
                index
            }
            None => {
                let index = self.insertion_index(&position);
                let node = Node::with_attrs(label, value, attrs.unwrap_or_default());
                self.nodes.shift_insert(index, label.to_string(), node);
                index
            }
        };
        self.nodes
            .get_index_mut(index)
            .map(|(_, node)| node)
            .ok_or_else(|| Error::not_found(path))
    }

    fn insertion_index(&self, position: &Position) -> usize {
        let len = self.nodes.len();
        match position {
            Position::Append => len,
            Position::Prepend => 0,
            Position::Index(i) => (*i).min(len),
            Position::Before(label) => self.local_index(label).unwrap_or(len),
            Position::After(label) => self.local_index(label).map_or(len, |i| i + 1),
        }
    }

    /// Removes the node at `path` and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the path does not resolve.
    pub fn delete(&mut self, path: &str) -> Result<Node> {
        let segments = split_path(path)?;
        let (last, parents) = segments
            .split_last()
            .ok_or_else(|| Error::invalid_path(path, "path is empty"))?;
        let mut current: &mut Bag = self;
        for segment in parents {
            current = current
                .local_node_mut(segment)
                .and_then(|node| node.value_mut().as_bag_mut())
                .ok_or_else(|| Error::not_found(path))?;
        }
        let index = current.local_index(last).ok_or_else(|| Error::not_found(path))?;
        current
            .nodes
            .shift_remove_index(index)
            .map(|(_, node)| node)
            .ok_or_else(|| Error::not_found(path))
    }

    /// Moves top-level nodes, given by index, to the slot of the node at `position`.
    ///
    /// A single node lands exactly at `position`. Several nodes keep their
    /// relative order and land before the node that was at `position`, or
    /// after it when the first of them came from in front of it. A
    /// `position` past the end, or out-of-range indices, leave the Bag as is.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tytx_bag::Bag;
    ///
    /// let mut bag = Bag::new();
    /// for label in ["a", "b", "c", "d"] {
    ///     bag.set(label, 0).unwrap();
    /// }
    /// bag.move_nodes(&[3], 0);
    /// assert_eq!(bag.keys().collect::<Vec<_>>(), vec!["d", "a", "b", "c"]);
    /// bag.move_nodes(&[0, 1], 3);
    /// assert_eq!(bag.keys().collect::<Vec<_>>(), vec!["b", "c", "d", "a"]);
    /// ```
    pub fn move_nodes(&mut self, what: &[usize], position: usize) {
        let len = self.nodes.len();
        if position >= len {
            return;
        }
        if let [from] = what {
            if *from == position || *from >= len {
                return;
            }
            if let Some((label, node)) = self.nodes.shift_remove_index(*from) {
                self.nodes.shift_insert(position, label, node);
            }
            return;
        }

        let mut indices: Vec<usize> = what.iter().copied().filter(|&i| i < len).collect();
        indices.sort_unstable();
        indices.dedup();
        let Some(&first) = indices.first() else {
            return;
        };
        let delta = usize::from(first < position);
        let Some(dest) = self.nodes.get_index(position).map(|(label, _)| label.clone()) else {
            return;
        };

        let mut moved = Vec::with_capacity(indices.len());
        for &index in indices.iter().rev() {
            if let Some(entry) = self.nodes.shift_remove_index(index) {
                moved.push(entry);
            }
        }
        let target = self.nodes.get_index_of(&dest).unwrap_or(self.nodes.len()) + delta;
        let target = target.min(self.nodes.len());
        for (label, node) in moved {
            self.nodes.shift_insert(target, label, node);
        }
    }

    /// Removes the node at `path` and returns its value, or `None` if absent.
    pub fn pop(&mut self, path: &str) -> Option<Value> {
        self.delete(path).ok().map(Node::into_value)
    }

    /// Depth-first pre-order traversal yielding `(full_path, node)` pairs.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tytx_bag::Bag;
    ///
    /// let mut bag = Bag::new();
    /// bag.set("config.host", "localhost").unwrap();
    /// bag.set("version", "1.0").unwrap();
    ///
    /// let paths: Vec<String> = bag.walk().into_iter().map(|(p, _)| p).collect();
    /// assert_eq!(paths, vec!["config", "config.host", "version"]);
    /// ```
    #[must_use]
    pub fn walk(&self) -> Vec<(String, &Node)> {
        let mut out = Vec::new();
        self.walk_into("", &mut out);
        out
    }

    fn walk_into<'a>(&'a self, prefix: &str, out: &mut Vec<(String, &'a Node)>) {
        for node in self.nodes.values() {
            let path = if prefix.is_empty() {
                node.label.clone()
            } else {
                format!("{}.{}", prefix, node.label)
            };
            out.push((path.clone(), node));
            if let Value::Bag(child) = &node.value {
                child.walk_into(&path, out);
            }
        }
    }

    /// Tolerant comparison, see [`crate::equiv`].
    #[must_use]
    pub fn is_equivalent(&self, other: &Bag) -> bool {
        crate::equiv::bags_equivalent(self, other)
    }

    /// Appends a node built by the decoder. The label must be new.
    pub(crate) fn push_node(&mut self, node: Node) -> Result<&mut Node> {
        let label = node.label.clone();
        if self.nodes.contains_key(&label) {
            return Err(Error::malformed(format!("duplicate label '{}'", label)));
        }
        let (index, _) = self.nodes.insert_full(label, node);
        self.nodes
            .get_index_mut(index)
            .map(|(_, node)| node)
            .ok_or_else(|| Error::malformed("node vanished after insertion"))
    }
}

/// Strict equality: same labels in the same order, equal values and
/// attributes, recursively.
impl PartialEq for Bag {
    fn eq(&self, other: &Self) -> bool {
        self.nodes.len() == other.nodes.len()
            && self
                .nodes
                .values()
                .zip(other.nodes.values())
                .all(|(a, b)| a == b)
    }
}

impl<'a> IntoIterator for &'a Bag {
    type Item = &'a Node;
    type IntoIter = indexmap::map::Values<'a, String, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.values()
    }
}

impl fmt::Display for Bag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, node) in self.nodes.values().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "{} - ({}) {}: {}", idx, node.value.kind(), node.label, node.value)?;
        }
        Ok(())
    }
}
