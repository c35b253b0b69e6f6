//! DOM Node - Compact representation
//!
//! Links are stored as [`NodeId`]s rather than pointers, so a node is a
//! handful of `u32`s plus its payload.

use crate::{InternedString, NodeId};

/// DOM Node - Core structure
#[derive(Debug)]
pub struct Node {
    /// Parent node (NONE if root or detached)
    pub parent: NodeId,
    /// First child
    pub first_child: NodeId,
    /// Last child (for O(1) append)
    pub last_child: NodeId,
    /// Previous sibling
    pub prev_sibling: NodeId,
    /// Next sibling
    pub next_sibling: NodeId,
    /// Node-specific data
    pub data: NodeData,
}

impl Node {
    pub(crate) fn new(data: NodeData) -> Self {
        Self {
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
            data,
        }
    }

    /// Check if this is an element
    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    /// Check if this is text
    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self.data, NodeData::Text(_))
    }

    /// Get element data if this is an element
    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get mutable element data
    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get text content if this is a text node
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(t) => Some(&t.content),
            _ => None,
        }
    }
}

/// Node-specific data
#[derive(Debug)]
pub enum NodeData {
    /// Document root
    Document,
    /// DOCTYPE
    Doctype {
        name: InternedString,
        public_id: String,
        system_id: String,
    },
    /// Element
    Element(ElementData),
    /// Text content
    Text(TextData),
    /// Comment
    Comment(String),
}

/// Element-specific data
#[derive(Debug)]
pub struct ElementData {
    /// Local tag name, lowercase as produced by the HTML parser
    pub name: InternedString,
    /// Attributes in source order
    pub attrs: Vec<Attribute>,
}

impl ElementData {
    pub fn new(name: InternedString) -> Self {
        Self {
            name,
            attrs: Vec::new(),
        }
    }

    /// Get an attribute value
    pub fn get_attr(&self, name: InternedString) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Whether the attribute is present (regardless of its value)
    pub fn has_attr(&self, name: InternedString) -> bool {
        self.attrs.iter().any(|a| a.name == name)
    }

    /// Set an attribute, keeping its position if it already exists
    pub fn set_attr(&mut self, name: InternedString, value: String) {
        if let Some(attr) = self.attrs.iter_mut().find(|a| a.name == name) {
            attr.value = value;
            return;
        }
        self.attrs.push(Attribute { name, value });
    }

    /// Remove an attribute, returning its previous value
    pub fn remove_attr(&mut self, name: InternedString) -> Option<String> {
        let pos = self.attrs.iter().position(|a| a.name == name)?;
        Some(self.attrs.remove(pos).value)
    }
}

/// Text node data
#[derive(Debug)]
pub struct TextData {
    pub content: String,
}

/// Attribute
#[derive(Debug, Clone)]
pub struct Attribute {
    pub name: InternedString,
    pub value: String,
}
