//! Arena-backed rooted trees keyed by string.
//!
//! Every node stores a non-owning parent index and an ordered list of child
//! indices. A node's key may never repeat within its own bloodline (the node
//! itself plus every ancestor up to the root), which keeps each tree acyclic
//! at insertion time. The same key may appear on separate branches.

use thiserror::Error;

// ---------- Public types ----------

/// Stable index of a node inside the [`Tree`] that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Argument for the reachability queries: a raw key, or a node whose key is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRef<'a> {
    Key(&'a str),
    Node(NodeId),
}

impl<'a> From<&'a str> for NodeRef<'a> {
    fn from(key: &'a str) -> Self {
        NodeRef::Key(key)
    }
}

impl<'a> From<&'a String> for NodeRef<'a> {
    fn from(key: &'a String) -> Self {
        NodeRef::Key(key.as_str())
    }
}

impl From<NodeId> for NodeRef<'_> {
    fn from(id: NodeId) -> Self {
        NodeRef::Node(id)
    }
}

/// A single node in a [`Tree`]
#[derive(Debug, Clone)]
struct Node {
    key: String,
    /// Set once on attachment, never changed afterwards
    parent: Option<NodeId>,
    /// Discovery order
    children: Vec<NodeId>,
}

/// Structural errors raised by tree mutation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("cannot add '{key}' under '{parent}': key already in bloodline")]
    Cycle { key: String, parent: String },

    #[error("node '{key}' already has a parent")]
    AlreadyParented { key: String },
}

/// Arena of nodes. May hold several independent roots.
#[derive(Debug, Clone, Default)]
pub struct Tree {
    nodes: Vec<Node>,
}

// ---------- Implementation ----------

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parentless node. It can later be attached with [`Tree::add_child_node`].
    pub fn insert_root(&mut self, key: impl Into<String>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            key: key.into(),
            parent: None,
            children: Vec::new(),
        });
        id
    }

    pub fn key(&self, id: NodeId) -> &str {
        &self.nodes[id.0].key
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Create a new child of `parent` with the given key and return it.
    ///
    /// Fails with [`TreeError::Cycle`] if `key` is already in `parent`'s bloodline.
    pub fn add_child(&mut self, parent: NodeId, key: impl Into<String>) -> Result<NodeId, TreeError> {
        let key = key.into();
        if self.in_bloodline(parent, key.as_str()) {
            return Err(TreeError::Cycle {
                key,
                parent: self.key(parent).to_string(),
            });
        }

        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            key,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        Ok(id)
    }

    /// Attach an existing parentless node (with its subtree) under `parent`.
    pub fn add_child_node(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        if self.nodes[child.0].parent.is_some() {
            return Err(TreeError::AlreadyParented {
                key: self.key(child).to_string(),
            });
        }
        // The only parentless ancestor of `parent` is its root, whose key is
        // in the bloodline, so this check also rules out structural loops.
        if self.in_bloodline(parent, child) {
            return Err(TreeError::Cycle {
                key: self.key(child).to_string(),
                parent: self.key(parent).to_string(),
            });
        }

        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
        Ok(())
    }

    /// Walk parent links to the node without a parent.
    pub fn root_of(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(parent) = self.nodes[current.0].parent {
            current = parent;
        }
        current
    }

    /// True if the target key equals `id`'s key or the key of any ancestor.
    pub fn in_bloodline<'a>(&'a self, id: NodeId, target: impl Into<NodeRef<'a>>) -> bool {
        let key = self.resolve(target.into());
        let mut current = Some(id);
        while let Some(node) = current {
            if self.nodes[node.0].key == key {
                return true;
            }
            current = self.nodes[node.0].parent;
        }
        false
    }

    /// True if any strict descendant of `id` carries the target key.
    pub fn is_ancestor_of<'a>(&'a self, id: NodeId, target: impl Into<NodeRef<'a>>) -> bool {
        let key = self.resolve(target.into());
        let mut stack: Vec<NodeId> = self.nodes[id.0].children.iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            if self.nodes[node.0].key == key {
                return true;
            }
            stack.extend(self.nodes[node.0].children.iter().rev());
        }
        false
    }

    /// `id`'s own key, or any descendant's.
    pub fn contains<'a>(&'a self, id: NodeId, target: impl Into<NodeRef<'a>>) -> bool {
        let target = target.into();
        self.resolve(target) == self.key(id) || self.is_ancestor_of(id, target)
    }

    pub fn root_contains<'a>(&'a self, id: NodeId, target: impl Into<NodeRef<'a>>) -> bool {
        self.contains(self.root_of(id), target)
    }

    /// Size of the subtree rooted at `id`, including `id`.
    pub fn num_nodes(&self, id: NodeId) -> usize {
        let mut count = 0;
        let mut stack = vec![id];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(self.nodes[node.0].children.iter());
        }
        count
    }

    /// Deepest level below `id` (a leaf is depth 0).
    pub fn depth(&self, id: NodeId) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(id, 0usize)];
        while let Some((node, level)) = stack.pop() {
            deepest = deepest.max(level);
            for &child in &self.nodes[node.0].children {
                stack.push((child, level + 1));
            }
        }
        deepest
    }

    /// Pre-order keys of the subtree rooted at `id`.
    pub fn flatten(&self, id: NodeId) -> Vec<String> {
        let mut keys = Vec::new();
        let mut stack = vec![id];
        while let Some(node) = stack.pop() {
            keys.push(self.nodes[node.0].key.clone());
            stack.extend(self.nodes[node.0].children.iter().rev());
        }
        keys
    }

    /// Pre-order rendering, one line per node:
    /// `key: child1, child2` for internal nodes and `key -` for leaves.
    pub fn render(&self, id: NodeId) -> String {
        self.render_indented(id, 0)
    }

    /// Same as [`Tree::render`], with every line shifted by `indent` levels.
    pub fn render_indented(&self, id: NodeId, indent: usize) -> String {
        let mut lines = Vec::new();
        let mut stack = vec![(id, indent)];
        while let Some((node, level)) = stack.pop() {
            let entry = &self.nodes[node.0];
            let pad = "  ".repeat(level);
            if entry.children.is_empty() {
                lines.push(format!("{}{} -", pad, entry.key));
            } else {
                let child_keys: Vec<&str> = entry
                    .children
                    .iter()
                    .map(|c| self.nodes[c.0].key.as_str())
                    .collect();
                lines.push(format!("{}{}: {}", pad, entry.key, child_keys.join(", ")));
            }
            for &child in entry.children.iter().rev() {
                stack.push((child, level + 1));
            }
        }
        lines.join("\n")
    }

    // ---------- Internal ----------

    fn resolve<'a>(&'a self, target: NodeRef<'a>) -> &'a str {
        match target {
            NodeRef::Key(key) => key,
            NodeRef::Node(id) => &self.nodes[id.0].key,
        }
    }
}

// ---------- Tests ----------
