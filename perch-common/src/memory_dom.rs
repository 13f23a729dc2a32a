//! In-memory document
//!
//! Enough of the DOM tree model to host portals off the browser: elements
//! with ids, text nodes, and the child-mutation primitives with their DOM
//! error behavior.

use std::cell::RefCell;
use std::rc::Rc;

use crate::dom::PortalDom;
use crate::error::DomError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug)]
enum NodeKind {
    Element { tag: String, id: Option<String> },
    Text(String),
}

#[derive(Debug)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug)]
struct Arena {
    nodes: Vec<NodeData>,
    body: NodeId,
}

impl Arena {
    fn push(&mut self, kind: NodeKind) -> NodeId {
        self.nodes.push(NodeData {
            kind,
            parent: None,
            children: Vec::new(),
        });
        NodeId(self.nodes.len() - 1)
    }

    fn is_inclusive_ancestor(&self, ancestor: NodeId, mut node: NodeId) -> bool {
        loop {
            if node == ancestor {
                return true;
            }
            match self.nodes[node.0].parent {
                Some(parent) => node = parent,
                None => return false,
            }
        }
    }

    fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0].children.retain(|c| *c != node);
        }
    }

    fn insert(
        &mut self,
        parent: NodeId,
        new: NodeId,
        reference: Option<NodeId>,
    ) -> Result<NodeId, DomError> {
        if matches!(self.nodes[parent.0].kind, NodeKind::Text(_))
            || self.is_inclusive_ancestor(new, parent)
        {
            return Err(DomError::HierarchyRequest);
        }
        if let Some(reference) = reference {
            if self.nodes[reference.0].parent != Some(parent) {
                return Err(DomError::NotFound);
            }
        }
        // Inserting a node before itself keeps it in place.
        let reference = match reference {
            Some(r) if r == new => self.next_sibling(new),
            other => other,
        };
        self.detach(new);
        let children = &mut self.nodes[parent.0].children;
        match reference.and_then(|r| children.iter().position(|c| *c == r)) {
            Some(index) => children.insert(index, new),
            None => children.push(new),
        }
        self.nodes[new.0].parent = Some(parent);
        Ok(new)
    }

    fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        let parent = self.nodes[node.0].parent?;
        let siblings = &self.nodes[parent.0].children;
        let index = siblings.iter().position(|c| *c == node)?;
        siblings.get(index + 1).copied()
    }

    fn find_by_id(&self, root: NodeId, id: &str) -> Option<NodeId> {
        if let NodeKind::Element { id: Some(own), .. } = &self.nodes[root.0].kind {
            if own == id {
                return Some(root);
            }
        }
        self.nodes[root.0]
            .children
            .iter()
            .find_map(|child| self.find_by_id(*child, id))
    }
}

/// Shared handle to an in-memory document. Clones see the same tree.
#[derive(Debug, Clone)]
pub struct MemoryDom {
    arena: Rc<RefCell<Arena>>,
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDom {
    /// Empty document with only a `body` element.
    pub fn new() -> Self {
        let mut arena = Arena {
            nodes: Vec::new(),
            body: NodeId(0),
        };
        arena.body = arena.push(NodeKind::Element {
            tag: "body".into(),
            id: None,
        });
        Self {
            arena: Rc::new(RefCell::new(arena)),
        }
    }

    pub fn body(&self) -> NodeId {
        self.arena.borrow().body
    }

    pub fn create_element(&self, tag: &str) -> NodeId {
        self.arena.borrow_mut().push(NodeKind::Element {
            tag: tag.to_string(),
            id: None,
        })
    }

    pub fn create_text(&self, data: &str) -> NodeId {
        self.arena
            .borrow_mut()
            .push(NodeKind::Text(data.to_string()))
    }

    /// Set the `id` of an element. Ignored for text nodes.
    pub fn set_id(&self, node: NodeId, id: &str) {
        if let NodeKind::Element { id: own, .. } = &mut self.arena.borrow_mut().nodes[node.0].kind {
            *own = Some(id.to_string());
        }
    }

    pub fn tag(&self, node: NodeId) -> Option<String> {
        match &self.arena.borrow().nodes[node.0].kind {
            NodeKind::Element { tag, .. } => Some(tag.clone()),
            NodeKind::Text(_) => None,
        }
    }

    /// Character data of a text node
    pub fn text(&self, node: NodeId) -> Option<String> {
        match &self.arena.borrow().nodes[node.0].kind {
            NodeKind::Text(data) => Some(data.clone()),
            NodeKind::Element { .. } => None,
        }
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.arena.borrow().nodes[node.0].parent
    }

    /// Whether the node is reachable from the body.
    pub fn is_connected(&self, node: NodeId) -> bool {
        let arena = self.arena.borrow();
        arena.is_inclusive_ancestor(arena.body, node)
    }

    /// Concatenated text of the node's subtree
    pub fn text_content(&self, node: NodeId) -> String {
        let arena = self.arena.borrow();
        let mut out = String::new();
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            let data = &arena.nodes[current.0];
            if let NodeKind::Text(text) = &data.kind {
                out.push_str(text);
            }
            stack.extend(data.children.iter().rev());
        }
        out
    }

    /// Append a new element with the given id to the body.
    pub fn provision(&self, tag: &str, id: &str) -> NodeId {
        let node = self.create_element(tag);
        self.set_id(node, id);
        let body = self.body();
        let inserted = self.arena.borrow_mut().insert(body, node, None);
        debug_assert_eq!(inserted, Ok(node), "fresh element always fits under body");
        node
    }
}

impl PortalDom for MemoryDom {
    type Node = NodeId;

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        let arena = self.arena.borrow();
        arena.find_by_id(arena.body, id)
    }

    fn create_proxy(&self) -> Result<NodeId, DomError> {
        Ok(self.create_element("div"))
    }

    fn append_child(&self, parent: &NodeId, child: &NodeId) -> Result<NodeId, DomError> {
        self.arena.borrow_mut().insert(*parent, *child, None)
    }

    fn insert_before(
        &self,
        parent: &NodeId,
        new: &NodeId,
        reference: Option<&NodeId>,
    ) -> Result<NodeId, DomError> {
        self.arena
            .borrow_mut()
            .insert(*parent, *new, reference.copied())
    }

    fn remove_child(&self, parent: &NodeId, child: &NodeId) -> Result<NodeId, DomError> {
        let mut arena = self.arena.borrow_mut();
        if arena.nodes[child.0].parent != Some(*parent) {
            return Err(DomError::NotFound);
        }
        arena.detach(*child);
        Ok(*child)
    }

    fn child_nodes(&self, parent: &NodeId) -> Vec<NodeId> {
        self.arena.borrow().nodes[parent.0].children.clone()
    }

    fn replace_data(
        &self,
        node: &NodeId,
        offset: u32,
        count: u32,
        data: &str,
    ) -> Result<(), DomError> {
        let mut arena = self.arena.borrow_mut();
        let NodeKind::Text(text) = &mut arena.nodes[node.0].kind else {
            return Err(DomError::NotCharacterData);
        };
        let mut units: Vec<u16> = text.encode_utf16().collect();
        let len = units.len() as u32;
        if offset > len {
            return Err(DomError::IndexSize { offset, len });
        }
        let end = offset.saturating_add(count).min(len);
        units.splice(offset as usize..end as usize, data.encode_utf16());
        *text = String::from_utf16_lossy(&units);
        Ok(())
    }
}
