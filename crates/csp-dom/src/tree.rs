//! DOM Tree (arena-based allocation)

use crate::node::{ElementData, NodeData, TextData};
use crate::{InternedString, Node, NodeId, StringInterner};

/// Arena-based DOM tree
///
/// Node 0 is always the document node. Detached nodes remain in the arena
/// but are unreachable from the root, so traversals never see them.
#[derive(Debug)]
pub struct DomTree {
    nodes: Vec<Node>,
    interner: StringInterner,
}

impl DomTree {
    /// Create a tree holding only the document node
    pub fn new() -> Self {
        let mut nodes = Vec::with_capacity(256);
        nodes.push(Node::new(NodeData::Document));
        Self {
            nodes,
            interner: StringInterner::new(),
        }
    }

    /// The document node
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    /// Number of nodes in the arena (detached nodes included)
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    pub fn interner_mut(&mut self) -> &mut StringInterner {
        &mut self.interner
    }

    /// Resolve an interned name
    #[inline]
    pub fn resolve(&self, id: InternedString) -> &str {
        self.interner.get(id)
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::new(data));
        id
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        let name = self.interner.intern(tag);
        self.push(NodeData::Element(ElementData::new(name)))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.push(NodeData::Text(TextData {
            content: content.to_string(),
        }))
    }

    /// Create a detached comment node
    pub fn create_comment(&mut self, content: &str) -> NodeId {
        self.push(NodeData::Comment(content.to_string()))
    }

    /// Create a detached doctype node
    pub fn create_doctype(&mut self, name: &str, public_id: &str, system_id: &str) -> NodeId {
        let name = self.interner.intern(name);
        self.push(NodeData::Doctype {
            name,
            public_id: public_id.to_string(),
            system_id: system_id.to_string(),
        })
    }

    /// Append a child to a parent, detaching it from any previous position first
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if parent == child || self.get(parent).is_none() || self.get(child).is_none() {
            return;
        }
        self.detach(child);

        let last = self.nodes[parent.index()].last_child;
        {
            let node = &mut self.nodes[child.index()];
            node.parent = parent;
            node.prev_sibling = last;
        }

        if last.is_valid() {
            self.nodes[last.index()].next_sibling = child;
        } else {
            self.nodes[parent.index()].first_child = child;
        }
        self.nodes[parent.index()].last_child = child;
    }

    /// Unlink a node (and its subtree) from its parent.
    /// The node keeps its children; it is simply no longer reachable from the root.
    pub fn detach(&mut self, id: NodeId) {
        let Some(node) = self.get(id) else {
            return;
        };
        let (parent, prev, next) = (node.parent, node.prev_sibling, node.next_sibling);
        if !parent.is_valid() {
            return;
        }

        if prev.is_valid() {
            self.nodes[prev.index()].next_sibling = next;
        } else {
            self.nodes[parent.index()].first_child = next;
        }

        if next.is_valid() {
            self.nodes[next.index()].prev_sibling = prev;
        } else {
            self.nodes[parent.index()].last_child = prev;
        }

        let node = &mut self.nodes[id.index()];
        node.parent = NodeId::NONE;
        node.prev_sibling = NodeId::NONE;
        node.next_sibling = NodeId::NONE;
    }

    /// Iterate over the direct children of a node
    pub fn children(&self, parent: NodeId) -> Children<'_> {
        let first = self
            .get(parent)
            .map(|n| n.first_child)
            .unwrap_or(NodeId::NONE);
        Children {
            tree: self,
            current: first,
        }
    }

    /// Iterate over all descendants of a node in document (pre-)order
    pub fn descendants(&self, root: NodeId) -> Descendants<'_> {
        let first = self
            .get(root)
            .map(|n| n.first_child)
            .unwrap_or(NodeId::NONE);
        Descendants {
            tree: self,
            root,
            current: first,
        }
    }

    /// Tag name of an element node
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        let elem = self.get(id)?.as_element()?;
        Some(self.resolve(elem.name))
    }

    /// Whether the node is an element with the given tag name
    pub fn is_element_named(&self, id: NodeId, tag: &str) -> bool {
        self.tag_name(id) == Some(tag)
    }

    /// Attribute value of an element
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        let name = self.interner.lookup(name)?;
        self.get(id)?.as_element()?.get_attr(name)
    }

    /// Set an attribute on an element; no-op for non-elements
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        let name = self.interner.intern(name);
        if let Some(elem) = self.get_mut(id).and_then(Node::as_element_mut) {
            elem.set_attr(name, value.to_string());
        }
    }

    /// Remove an attribute from an element, returning its value
    pub fn remove_attr(&mut self, id: NodeId, name: &str) -> Option<String> {
        let name = self.interner.lookup(name)?;
        self.get_mut(id)?.as_element_mut()?.remove_attr(name)
    }

    /// Add a class token, keeping existing classes and skipping duplicates
    pub fn add_class(&mut self, id: NodeId, class: &str) {
        let current = self.attr(id, "class").unwrap_or("");
        if current.split_ascii_whitespace().any(|c| c == class) {
            return;
        }

        let value = if current.trim().is_empty() {
            class.to_string()
        } else {
            format!("{} {}", current.trim_end(), class)
        };
        self.set_attr(id, "class", &value);
    }

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self, id: NodeId) -> String {
        self.descendants(id)
            .filter_map(|(_, node)| node.as_text())
            .collect()
    }

    /// Snapshot of attached elements with the given tag, in document order
    pub fn elements_by_tag(&self, tag: &str) -> Vec<NodeId> {
        let Some(tag) = self.interner.lookup(tag) else {
            return Vec::new();
        };
        self.descendants(self.root())
            .filter(|(_, node)| node.as_element().is_some_and(|e| e.name == tag))
            .map(|(id, _)| id)
            .collect()
    }

    /// Snapshot of attached elements carrying the attribute, in document order
    pub fn elements_with_attr(&self, name: &str) -> Vec<NodeId> {
        let Some(name) = self.interner.lookup(name) else {
            return Vec::new();
        };
        self.descendants(self.root())
            .filter(|(_, node)| node.as_element().is_some_and(|e| e.has_attr(name)))
            .map(|(id, _)| id)
            .collect()
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over the children of a node
pub struct Children<'a> {
    tree: &'a DomTree,
    current: NodeId,
}

impl<'a> Iterator for Children<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current;
        let node = self.tree.get(id)?;
        self.current = node.next_sibling;
        Some((id, node))
    }
}

/// Pre-order iterator over the subtree below a node (the node itself excluded)
pub struct Descendants<'a> {
    tree: &'a DomTree,
    root: NodeId,
    current: NodeId,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current;
        let node = self.tree.get(id)?;

        self.current = if node.first_child.is_valid() {
            node.first_child
        } else {
            // Climb until a next sibling exists, stopping at the subtree root
            let mut climb = id;
            loop {
                if climb == self.root {
                    break NodeId::NONE;
                }
                let Some(n) = self.tree.get(climb) else {
                    break NodeId::NONE;
                };
                if n.next_sibling.is_valid() {
                    break n.next_sibling;
                }
                climb = n.parent;
            }
        };

        Some((id, node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (DomTree, NodeId, NodeId, NodeId) {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        let a = tree.create_element("span");
        let b = tree.create_element("p");
        tree.append_child(tree.root(), div);
        tree.append_child(div, a);
        tree.append_child(div, b);
        (tree, div, a, b)
    }

    #[test]
    fn test_append_links_siblings() {
        let (tree, div, a, b) = sample();
        let div_node = tree.get(div).unwrap();
        assert_eq!(div_node.first_child, a);
        assert_eq!(div_node.last_child, b);
        assert_eq!(tree.get(a).unwrap().next_sibling, b);
        assert_eq!(tree.get(b).unwrap().prev_sibling, a);
    }

    #[test]
    fn test_detach_middle_and_ends() {
        let (mut tree, div, a, b) = sample();
        let c = tree.create_element("em");
        tree.append_child(div, c);

        tree.detach(b);
        let children: Vec<_> = tree.children(div).map(|(id, _)| id).collect();
        assert_eq!(children, vec![a, c]);
        assert!(!tree.get(b).unwrap().parent.is_valid());

        tree.detach(a);
        tree.detach(c);
        assert_eq!(tree.children(div).count(), 0);
        assert!(!tree.get(div).unwrap().first_child.is_valid());
        assert!(!tree.get(div).unwrap().last_child.is_valid());
    }

    #[test]
    fn test_descendants_document_order() {
        let (mut tree, _div, a, _b) = sample();
        let text = tree.create_text("x");
        tree.append_child(a, text);

        let tags: Vec<_> = tree
            .descendants(tree.root())
            .filter_map(|(id, _)| tree.tag_name(id))
            .collect();
        assert_eq!(tags, vec!["div", "span", "p"]);
    }

    #[test]
    fn test_descendants_stays_in_subtree() {
        let (mut tree, _div, a, b) = sample();
        let inner = tree.create_element("b");
        tree.append_child(a, inner);

        let ids: Vec<_> = tree.descendants(a).map(|(id, _)| id).collect();
        assert_eq!(ids, vec![inner]);
        assert!(!ids.contains(&b));
    }

    #[test]
    fn test_detached_subtree_not_queried() {
        let (mut tree, _div, a, _b) = sample();
        tree.set_attr(a, "style", "color:red");
        assert_eq!(tree.elements_with_attr("style"), vec![a]);

        tree.detach(a);
        assert!(tree.elements_with_attr("style").is_empty());
    }

    #[test]
    fn test_add_class_is_additive() {
        let (mut tree, div, _, _) = sample();
        tree.add_class(div, "one");
        assert_eq!(tree.attr(div, "class"), Some("one"));

        tree.add_class(div, "two");
        tree.add_class(div, "one");
        assert_eq!(tree.attr(div, "class"), Some("one two"));
    }

    #[test]
    fn test_remove_unknown_attr() {
        let (mut tree, div, _, _) = sample();
        assert_eq!(tree.remove_attr(div, "data-unknown-attribute"), None);
    }

    #[test]
    fn test_text_content() {
        let (mut tree, _, a, b) = sample();
        let t1 = tree.create_text("hello ");
        let t2 = tree.create_text("world");
        tree.append_child(a, t1);
        tree.append_child(b, t2);
        assert_eq!(tree.text_content(tree.root()), "hello world");
    }
}
