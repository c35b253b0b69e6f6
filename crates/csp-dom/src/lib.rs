//! CSP DOM - Document Object Model
//!
//! Arena-allocated, mutable DOM tree used by the refactoring passes.
//! Nodes are addressed by [`NodeId`]; detaching a node unlinks it from the
//! tree but leaves it in the arena, so ids held by a caller stay valid.

mod document;
mod interner;
mod node;
mod tree;

pub use document::Document;
pub use interner::{InternedString, StringInterner};
pub use node::{Attribute, ElementData, Node, NodeData, TextData};
pub use tree::{Children, Descendants, DomTree};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root (document) node ID
    pub const ROOT: NodeId = NodeId(0);

    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Whether this id points at a node
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}
