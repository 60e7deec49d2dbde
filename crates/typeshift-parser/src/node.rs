//! Arena-backed syntax tree nodes.
//!
//! All nodes of a file live in one `NodeArena` and refer to each other by
//! `NodeIndex`. A node's declared type is a type subtree in the same arena,
//! reached through the `declared_type` slot rather than the child list, so
//! statement traversal never wanders into type position.

use bitflags::bitflags;
use indexmap::IndexMap;
use rustc_hash::FxHashMap;

use crate::token::Token;

/// Handle to a node in a `NodeArena`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct NodeIndex(pub u32);

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct NodeProps: u8 {
        /// Optional parameter (`name?: T`).
        const OPT_ES6_TYPED = 1 << 0;
        /// String literal originally written with double quotes.
        const DOUBLE_QUOTED = 1 << 1;
        /// Static class member.
        const STATIC = 1 << 2;
        /// Declaration carries `export`.
        const EXPORT = 1 << 3;
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Private,
    Protected,
}

/// Structured information parsed from a doc comment.
#[derive(Debug, Clone, Default)]
pub struct DocInfo {
    /// Overall `@type`/`@const {T}` expression.
    pub ty: Option<NodeIndex>,
    /// `@return` type expression.
    pub return_ty: Option<NodeIndex>,
    /// `@param` type expressions, in declaration order.
    pub params: IndexMap<String, NodeIndex>,
    pub visibility: Option<Visibility>,
    /// Bare `@const` (the typed form `@const {T}` sets only `ty`).
    pub is_const: bool,
    /// `@externs` file marker.
    pub is_externs: bool,
}

impl DocInfo {
    pub fn is_empty(&self) -> bool {
        self.ty.is_none()
            && self.return_ty.is_none()
            && self.params.is_empty()
            && self.visibility.is_none()
            && !self.is_const
            && !self.is_externs
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    pub token: Token,
    /// Start byte offset in the source, 0 for synthesized nodes.
    pub pos: u32,
    pub string: Option<String>,
    pub children: Vec<NodeIndex>,
    /// Declared type (a typed-declaration subtree), attached by the
    /// type-annotation pass.
    pub declared_type: Option<NodeIndex>,
    pub doc: Option<DocInfo>,
    pub props: NodeProps,
    /// Access modifier copied from doc visibility.
    pub access: Option<Visibility>,
}

impl Node {
    pub fn new(token: Token) -> Self {
        Node {
            token,
            pos: 0,
            string: None,
            children: Vec::new(),
            declared_type: None,
            doc: None,
            props: NodeProps::empty(),
            access: None,
        }
    }
}

#[derive(Debug, Default)]
pub struct NodeArena {
    nodes: Vec<Node>,
}

impl NodeArena {
    pub fn new() -> Self {
        NodeArena { nodes: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn alloc(&mut self, token: Token) -> NodeIndex {
        let idx = NodeIndex(self.nodes.len() as u32);
        self.nodes.push(Node::new(token));
        idx
    }

    pub fn alloc_string(&mut self, token: Token, string: impl Into<String>) -> NodeIndex {
        let idx = self.alloc(token);
        self.nodes[idx.0 as usize].string = Some(string.into());
        idx
    }

    pub fn alloc_with_children(&mut self, token: Token, children: Vec<NodeIndex>) -> NodeIndex {
        let idx = self.alloc(token);
        self.nodes[idx.0 as usize].children = children;
        idx
    }

    pub fn get(&self, idx: NodeIndex) -> &Node {
        &self.nodes[idx.0 as usize]
    }

    pub fn get_mut(&mut self, idx: NodeIndex) -> &mut Node {
        &mut self.nodes[idx.0 as usize]
    }

    pub fn token(&self, idx: NodeIndex) -> Token {
        self.get(idx).token
    }

    /// Payload string, empty when absent.
    pub fn string(&self, idx: NodeIndex) -> &str {
        self.get(idx).string.as_deref().unwrap_or("")
    }

    pub fn children(&self, idx: NodeIndex) -> &[NodeIndex] {
        &self.get(idx).children
    }

    /// Replace the child at position `at` in `parent`'s child list.
    pub fn replace_child(&mut self, parent: NodeIndex, at: usize, child: NodeIndex) {
        self.get_mut(parent).children[at] = child;
    }
}

/// Side table mapping nodes to the verbatim text of their leading comments.
///
/// Mutated when passes replace a commented node; read by the emitter's
/// pre-hook.
#[derive(Debug, Default)]
pub struct CommentRegistry {
    map: FxHashMap<NodeIndex, String>,
}

impl CommentRegistry {
    pub fn new() -> Self {
        CommentRegistry::default()
    }

    pub fn attach(&mut self, idx: NodeIndex, text: impl Into<String>) {
        let text = text.into();
        match self.map.get_mut(&idx) {
            Some(existing) => {
                existing.push('\n');
                existing.push_str(&text);
            }
            None => {
                self.map.insert(idx, text);
            }
        }
    }

    pub fn get(&self, idx: NodeIndex) -> Option<&str> {
        self.map.get(&idx).map(String::as_str)
    }

    /// Move the comment attached to `from` (if any) onto `to`.
    pub fn remap(&mut self, from: NodeIndex, to: NodeIndex) {
        if let Some(text) = self.map.remove(&from) {
            self.attach(to, text);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
