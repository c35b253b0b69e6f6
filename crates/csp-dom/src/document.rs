//! Document - High-level document API

use std::collections::HashMap;

use crate::{DomTree, NodeId};

/// HTML Document
#[derive(Debug)]
pub struct Document {
    /// The DOM tree
    pub tree: DomTree,
    /// Name the document was loaded under (file name or URL)
    name: String,
    /// Cached reference to <html> element
    html_element: NodeId,
    /// Cached reference to <head> element
    head_element: NodeId,
    /// Cached reference to <body> element
    body_element: NodeId,
}

impl Document {
    /// Create a new document with an empty html/head/body skeleton
    pub fn new(name: &str) -> Self {
        let mut tree = DomTree::new();

        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");

        tree.append_child(tree.root(), html);
        tree.append_child(html, head);
        tree.append_child(html, body);

        Self {
            tree,
            name: name.to_string(),
            html_element: html,
            head_element: head,
            body_element: body,
        }
    }

    /// Create an empty document (no structure); call [`Document::finalize`] after filling it
    pub fn empty(name: &str) -> Self {
        Self {
            tree: DomTree::new(),
            name: name.to_string(),
            html_element: NodeId::NONE,
            head_element: NodeId::NONE,
            body_element: NodeId::NONE,
        }
    }

    /// Locate and cache the html, head and body elements
    pub fn finalize(&mut self) {
        let root = self.tree.root();
        self.html_element = self
            .tree
            .children(root)
            .find(|(id, _)| self.tree.is_element_named(*id, "html"))
            .map(|(id, _)| id)
            .unwrap_or(NodeId::NONE);

        let html = self.html_element;
        let find_child = |tag: &str| {
            self.tree
                .children(html)
                .find(|(id, _)| self.tree.is_element_named(*id, tag))
                .map(|(id, _)| id)
                .unwrap_or(NodeId::NONE)
        };
        let head = find_child("head");
        let body = find_child("body");
        self.head_element = head;
        self.body_element = body;

        tracing::trace!(
            html = self.html_element.is_valid(),
            head = head.is_valid(),
            body = body.is_valid(),
            "document finalized"
        );
    }

    /// Name the document was loaded under
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get <html> element
    pub fn document_element(&self) -> NodeId {
        self.html_element
    }

    /// Get <head> element
    pub fn head(&self) -> NodeId {
        self.head_element
    }

    /// Get <body> element
    pub fn body(&self) -> NodeId {
        self.body_element
    }

    /// Count of every id value in the document, built in one pass
    pub fn id_counts(&self) -> HashMap<String, usize> {
        let mut counts = HashMap::new();
        for node in self.tree.elements_with_attr("id") {
            if let Some(id) = self.tree.attr(node, "id") {
                *counts.entry(id.to_string()).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Access the DOM tree mutably
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}
