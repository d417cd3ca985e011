//! A trie, or prefix tree, from keys (strings of symbols) to values.
//!
//! No node stores its key; instead the position of a node in the tree determines the key the node is associated with.
//! The root is associated with the empty key, and never holds a value.
//!
//! # Storage
//!
//! Nodes are stored in a [SlotMap], and refer to each other by [NodeKey].
//! Each node owns its children (an ordered map from symbol to key), and keeps the key of its parent as a non-owning back reference for ancestry queries.
//! Traversal only ever follows child edges.
//!
//! # Visitors
//!
//! [Trie::accept] walks the trie depth-first, calling [Visitor::visit] before the children of a node and [Visitor::leave] after.
//! The walk keeps an explicit stack, so deep keys do not grow the call stack.
//!
//! ```rust
//! # use termsat_lib::generic::trie::Trie;
//! let mut trie = Trie::default();
//! trie.put("*1.", 'a').unwrap();
//! trie.put("*2.", 'b').unwrap();
//!
//! assert_eq!(trie.get("*1."), Some(&'a'));
//! assert_eq!(trie.get("*"), None);
//! assert_eq!(trie.len(), 2);
//!
//! let star = trie.node("*").unwrap();
//! assert_eq!(star.depth(), 1);
//! assert_eq!(star.children().count(), 2);
//! ```

use std::collections::{btree_map, BTreeMap};

use slotmap::{new_key_type, SlotMap};

use crate::types::err::TrieError;

new_key_type! {
    /// The key of a node in a [Trie].
    pub struct NodeKey;
}

struct Node<V> {
    symbol: Option<char>,
    depth: usize,
    parent: Option<NodeKey>,
    value: Option<V>,
    children: BTreeMap<char, NodeKey>,
}

impl<V> Node<V> {
    fn new(parent: Option<NodeKey>, symbol: Option<char>, depth: usize) -> Self {
        Node {
            symbol,
            depth,
            parent,
            value: None,
            children: BTreeMap::new(),
        }
    }
}

pub struct Trie<V> {
    nodes: SlotMap<NodeKey, Node<V>>,
    root: NodeKey,
    size: usize,
}

impl<V> Default for Trie<V> {
    fn default() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Node::new(None, None, 0));
        Trie {
            nodes,
            root,
            size: 0,
        }
    }
}

/// A callback for a walk of a trie.
pub trait Visitor<V> {
    /// Visit a node, whose key is `key`.
    ///
    /// Returns false if the children of the node should not be visited.
    fn visit(&mut self, key: &str, node: NodeRef<'_, V>) -> bool;

    /// Leave a node, after any children have been visited.
    ///
    /// Called once for every visited node.
    fn leave(&mut self, _key: &str, _node: NodeRef<'_, V>) {}

    /// Polled before each child is visited, ending the walk on true.
    fn is_complete(&self) -> bool {
        false
    }
}

/// A read-only view of a node in a trie.
pub struct NodeRef<'t, V> {
    trie: &'t Trie<V>,
    key: NodeKey,
}

impl<V> Clone for NodeRef<'_, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for NodeRef<'_, V> {}

impl<'t, V> NodeRef<'t, V> {
    fn node(&self) -> &'t Node<V> {
        &self.trie.nodes[self.key]
    }

    pub fn key(&self) -> NodeKey {
        self.key
    }

    /// The symbol distinguishing this node from its siblings, or [None] for the root.
    pub fn symbol(&self) -> Option<char> {
        self.node().symbol
    }

    /// The position of this node in a key, where 1 is the first symbol and the root is 0.
    pub fn depth(&self) -> usize {
        self.node().depth
    }

    pub fn value(&self) -> Option<&'t V> {
        self.node().value.as_ref()
    }

    pub fn is_root(&self) -> bool {
        self.node().parent.is_none()
    }

    pub fn is_leaf(&self) -> bool {
        self.node().children.is_empty()
    }

    pub fn parent(&self) -> Option<NodeRef<'t, V>> {
        self.node().parent.map(|key| NodeRef {
            trie: self.trie,
            key,
        })
    }

    pub fn child(&self, symbol: char) -> Option<NodeRef<'t, V>> {
        self.node().children.get(&symbol).map(|&key| NodeRef {
            trie: self.trie,
            key,
        })
    }

    /// Children, in order of symbol.
    pub fn children(&self) -> impl Iterator<Item = (char, NodeRef<'t, V>)> + 't {
        let trie = self.trie;
        self.node()
            .children
            .iter()
            .map(move |(&symbol, &key)| (symbol, NodeRef { trie, key }))
    }

    /// Strict ancestors, nearest first, ending with the root.
    pub fn ancestors(&self) -> impl Iterator<Item = NodeRef<'t, V>> + 't {
        std::iter::successors(self.parent(), |node| node.parent())
    }
}

impl<V> Trie<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of keys with a value.
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// The number of nodes, including the root.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn root(&self) -> NodeRef<'_, V> {
        NodeRef {
            trie: self,
            key: self.root,
        }
    }

    pub fn node_at(&self, key: NodeKey) -> Option<NodeRef<'_, V>> {
        match self.nodes.contains_key(key) {
            true => Some(NodeRef { trie: self, key }),
            false => None,
        }
    }

    /// The node for `key`, if the path exists, whether or not the node holds a value.
    pub fn node(&self, key: &str) -> Option<NodeRef<'_, V>> {
        self.node_by_symbols(key.chars())
    }

    /// As [node](Trie::node), with the key given symbol by symbol.
    ///
    /// Symbols are taken only until the path leaves the trie.
    pub fn node_by_symbols(&self, key: impl IntoIterator<Item = char>) -> Option<NodeRef<'_, V>> {
        let mut here = self.root;
        for symbol in key {
            here = *self.nodes[here].children.get(&symbol)?;
        }
        Some(NodeRef {
            trie: self,
            key: here,
        })
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.node(key)?.value()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Stores `value` at `key`, returning the value previously stored, if any.
    ///
    /// Intermediate nodes are created as needed.
    pub fn put(&mut self, key: &str, value: V) -> Result<Option<V>, TrieError> {
        if key.is_empty() {
            return Err(TrieError::EmptyKey);
        }
        let mut here = self.root;
        for symbol in key.chars() {
            here = self.insert_child(here, symbol)?;
        }
        self.set_value(here, value)
    }

    /// The child of `parent` with `symbol`, created if missing.
    pub fn insert_child(&mut self, parent: NodeKey, symbol: char) -> Result<NodeKey, TrieError> {
        let Some(parent_node) = self.nodes.get(parent) else {
            return Err(TrieError::UnknownNode);
        };
        if let Some(&child) = parent_node.children.get(&symbol) {
            return Ok(child);
        }
        let depth = parent_node.depth + 1;
        let child = self.nodes.insert(Node::new(Some(parent), Some(symbol), depth));
        self.nodes[parent].children.insert(symbol, child);
        Ok(child)
    }

    /// Stores `value` at the node, returning the value previously stored, if any.
    pub fn set_value(&mut self, node: NodeKey, value: V) -> Result<Option<V>, TrieError> {
        if node == self.root {
            return Err(TrieError::EmptyKey);
        }
        let Some(the_node) = self.nodes.get_mut(node) else {
            return Err(TrieError::UnknownNode);
        };
        let previous = the_node.value.replace(value);
        if previous.is_none() {
            self.size += 1;
        }
        Ok(previous)
    }

    /// Removes the value at `key`, and any nodes left without a value or children.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let here = self.node(key)?.key;
        let value = self.nodes[here].value.take()?;
        self.size -= 1;

        let mut here = here;
        while here != self.root {
            let node = &self.nodes[here];
            if node.value.is_some() || !node.children.is_empty() {
                break;
            }
            let (Some(parent), Some(symbol)) = (node.parent, node.symbol) else {
                break;
            };
            self.nodes.remove(here);
            self.nodes[parent].children.remove(&symbol);
            here = parent;
        }

        Some(value)
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = self.nodes.insert(Node::new(None, None, 0));
        self.size = 0;
    }

    /// The key of a node, read through ancestry.
    pub fn key_of(&self, node: NodeKey) -> Option<String> {
        let here = self.node_at(node)?;
        let mut symbols: Vec<char> = std::iter::once(here)
            .chain(here.ancestors())
            .filter_map(|node| node.symbol())
            .collect();
        symbols.reverse();
        Some(symbols.into_iter().collect())
    }

    /// Walks the trie depth-first, in order of symbol.
    ///
    /// The root is not visited.
    pub fn accept(&self, visitor: &mut impl Visitor<V>) {
        let mut key = String::new();
        let mut stack: Vec<(NodeKey, btree_map::Values<'_, char, NodeKey>)> =
            vec![(self.root, self.nodes[self.root].children.values())];

        while let Some((_, children)) = stack.last_mut() {
            let next = match visitor.is_complete() {
                true => None,
                false => children.next().copied(),
            };

            match next {
                Some(child) => {
                    let node = &self.nodes[child];
                    if let Some(symbol) = node.symbol {
                        key.push(symbol);
                    }
                    let view = NodeRef {
                        trie: self,
                        key: child,
                    };
                    match visitor.visit(&key, view) {
                        true => stack.push((child, node.children.values())),
                        false => {
                            visitor.leave(&key, view);
                            key.pop();
                        }
                    }
                }

                None => {
                    if let Some((finished, _)) = stack.pop() {
                        if finished != self.root {
                            visitor.leave(
                                &key,
                                NodeRef {
                                    trie: self,
                                    key: finished,
                                },
                            );
                            key.pop();
                        }
                    }
                }
            }
        }
    }

    /// All values, in order of key.
    pub fn values(&self) -> Vec<&V> {
        self.entries().into_iter().map(|(_, value)| value).collect()
    }

    /// All keys with a value, in order.
    pub fn keys(&self) -> Vec<String> {
        self.entries().into_iter().map(|(key, _)| key).collect()
    }

    /// All keys with a value, paired with the value, in order of key.
    pub fn entries(&self) -> Vec<(String, &V)> {
        let mut entries = Vec::with_capacity(self.size);
        // Children are pushed in reverse, so the least symbol is taken first.
        let mut stack: Vec<(NodeKey, String)> = vec![(self.root, String::new())];
        while let Some((here, key)) = stack.pop() {
            let node = &self.nodes[here];
            if let Some(value) = &node.value {
                entries.push((key.clone(), value));
            }
            for (&symbol, &child) in node.children.iter().rev() {
                let mut child_key = key.clone();
                child_key.push(symbol);
                stack.push((child, child_key));
            }
        }
        entries
    }
}
