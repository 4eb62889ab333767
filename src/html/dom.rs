//! The in-memory document tree.
//!
//! Nodes live in an arena owned by the [`Document`] and are addressed by
//! [`NodeId`]. Detaching a node only unlinks it from its parent; the arena
//! slot stays allocated for the lifetime of the document.

use super::selector::Selector;

/// Index of a node in the document arena.
pub type NodeId = usize;

/// The contents of a node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeData {
    Root,
    Doctype(String),
    Comment(String),
    Text(String),
    Element(Element),
}

/// A node in the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub data: NodeData,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

/// A navigation action attached to one of an element's handler slots.
///
/// * `ScrollToEntry`: scroll the reference-list entry into view and highlight
///   it. Fired by a click, or by a key press of `Enter` or space.
/// * `CenterOnOccurrence`: prevent the default anchor jump, center the
///   occurrence in the viewport, and highlight it. Fired by a click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Handler {
    ScrollToEntry { target: String },
    CenterOnOccurrence { target: String },
}

/// An element node.
///
/// The class list and inline style are stored in the `class` and `style`
/// attributes. An element owns at most one click handler and one key-press
/// handler; assigning a slot replaces whatever was there.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub on_click: Option<Handler>,
    pub on_key_press: Option<Handler>,
}

impl Element {
    /// Creates a new [`Element`] with no attributes or handlers.
    pub fn new(name: &str) -> Element {
        Element {
            name: name.to_ascii_lowercase(),
            attributes: Vec::new(),
            on_click: None,
            on_key_press: None,
        }
    }

    /// Get an attribute value.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, overwriting any existing value in place.
    pub fn set_attr(&mut self, name: &str, value: &str) {
        match self.attributes.iter_mut().find(|(n, _)| n == name) {
            Some(existing) => existing.1 = value.to_string(),
            None => self
                .attributes
                .push((name.to_string(), value.to_string())),
        }
    }

    pub fn remove_attr(&mut self, name: &str) {
        self.attributes.retain(|(n, _)| n != name);
    }

    /// The value of a `data-*` attribute.
    pub fn data(&self, key: &str) -> Option<&str> {
        self.attr(&format!("data-{}", key))
    }

    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or("").split_ascii_whitespace()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    /// Add a class if it isn't already present.
    pub fn add_class(&mut self, class: &str) {
        if self.has_class(class) {
            return;
        }
        let mut classes: Vec<&str> = self.classes().collect();
        classes.push(class);
        let joined = classes.join(" ");
        self.set_attr("class", &joined);
    }

    /// Remove a class. The `class` attribute stays, even if empty.
    pub fn remove_class(&mut self, class: &str) {
        if !self.has_class(class) {
            return;
        }
        let joined = self
            .classes()
            .filter(|c| *c != class)
            .collect::<Vec<&str>>()
            .join(" ");
        self.set_attr("class", &joined);
    }

    /// Set one inline style property, keeping declaration order.
    pub fn set_style(&mut self, property: &str, value: &str) {
        let mut declarations: Vec<(String, String)> = self
            .attr("style")
            .unwrap_or("")
            .split(';')
            .filter_map(|d| {
                let (p, v) = d.split_once(':')?;
                Some((p.trim().to_string(), v.trim().to_string()))
            })
            .collect();

        match declarations.iter_mut().find(|(p, _)| p == property) {
            Some(existing) => existing.1 = value.to_string(),
            None => declarations.push((property.to_string(), value.to_string())),
        }

        let style = declarations
            .iter()
            .map(|(p, v)| format!("{}: {}", p, v))
            .collect::<Vec<String>>()
            .join("; ");
        self.set_attr("style", &style);
    }

    /// Get one inline style property.
    pub fn style(&self, property: &str) -> Option<String> {
        self.attr("style")?.split(';').find_map(|d| {
            let (p, v) = d.split_once(':')?;
            if p.trim() == property {
                Some(v.trim().to_string())
            } else {
                None
            }
        })
    }
}

/// The document tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Creates an empty document holding only the root node.
    pub fn new() -> Document {
        Document {
            nodes: vec![Node {
                data: NodeData::Root,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        0
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match self.nodes.get(id) {
            Some(n) => &n.children,
            None => &[],
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id)?.parent
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match &self.nodes.get(id)?.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match &mut self.nodes.get_mut(id)?.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Allocate a detached node.
    pub fn create_node(&mut self, data: NodeData) -> NodeId {
        self.nodes.push(Node {
            data,
            parent: None,
            children: Vec::new(),
        });
        self.nodes.len() - 1
    }

    pub fn create_element(&mut self, name: &str) -> NodeId {
        self.create_node(NodeData::Element(Element::new(name)))
    }

    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.create_node(NodeData::Text(text.to_string()))
    }

    /// Append `child` to `parent`, detaching it from any previous parent.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.push(child);
    }

    /// Unlink a node from its parent.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id].parent.take() {
            self.nodes[parent].children.retain(|c| *c != id);
        }
    }

    /// Unlink every child of a node.
    pub fn clear_children(&mut self, id: NodeId) {
        let children = std::mem::take(&mut self.nodes[id].children);
        for child in children {
            self.nodes[child].parent = None;
        }
    }

    /// Every node below `id`, in document (pre-)order. `id` itself is not
    /// included.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev());
        }
        out
    }

    /// All attached elements matching `selector`, in document order.
    pub fn select_all(&self, selector: &Selector) -> Vec<NodeId> {
        self.descendants(self.root())
            .into_iter()
            .filter(|id| match self.element(*id) {
                Some(e) => selector.matches(e),
                None => false,
            })
            .collect()
    }

    /// The first attached element with the given `id` attribute.
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.root())
            .into_iter()
            .find(|n| self.element(*n).and_then(|e| e.id()) == Some(id))
    }

    /// The concatenated text of every text node below `id`.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut text = String::new();
        if let Some(Node {
            data: NodeData::Text(t),
            ..
        }) = self.nodes.get(id)
        {
            text.push_str(t);
        }
        for node in self.descendants(id) {
            if let NodeData::Text(t) = &self.nodes[node].data {
                text.push_str(t);
            }
        }
        text
    }

    /// Replace the children of `id` with a single text node.
    pub fn set_text_content(&mut self, id: NodeId, text: &str) {
        self.clear_children(id);
        if !text.is_empty() {
            let text_node = self.create_text(text);
            self.append_child(id, text_node);
        }
    }
}
