//! Elements live in an arena owned by [`Document`]. Detached elements stay in
//! the arena but lookups only see the tree under the root.

use crate::errors::ClientError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
struct Node {
    tag: String,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
    scrolled_into_view: Option<NodeId>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        let body = Node {
            tag: "body".to_string(),
            attributes: Vec::new(),
            text: String::new(),
            children: Vec::new(),
            parent: None,
        };
        Self {
            nodes: vec![body],
            root: NodeId(0),
            scrolled_into_view: None,
        }
    }

    pub fn body(&self) -> NodeId {
        self.root
    }

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.nodes.push(Node {
            tag: tag.to_string(),
            attributes: Vec::new(),
            text: String::new(),
            children: Vec::new(),
            parent: None,
        });
        NodeId(self.nodes.len() - 1)
    }

    /// Creates `tag` with the given `id` and appends it to `parent`.
    pub fn append_new(&mut self, parent: NodeId, tag: &str, id: Option<&str>) -> NodeId {
        let node = self.create_element(tag);
        if let Some(id) = id {
            self.set_attribute(node, "id", id);
        }
        self.append_child(parent, node);
        node
    }

    pub fn tag(&self, node: NodeId) -> &str {
        &self.nodes[node.0].tag
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.nodes[node.0]
            .attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn has_attribute(&self, node: NodeId, name: &str) -> bool {
        self.attribute(node, name).is_some()
    }

    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        let attributes = &mut self.nodes[node.0].attributes;
        match attributes.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => *existing = value.to_string(),
            None => attributes.push((name.to_string(), value.to_string())),
        }
    }

    pub fn remove_attribute(&mut self, node: NodeId, name: &str) {
        self.nodes[node.0].attributes.retain(|(key, _)| key != name);
    }

    /// Flips a boolean attribute such as `hidden`.
    pub fn toggle_attribute(&mut self, node: NodeId, name: &str) {
        if self.has_attribute(node, name) {
            self.remove_attribute(node, name);
        } else {
            self.set_attribute(node, name, "");
        }
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.attribute(node, "class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    /// Form field value, stored as the `value` attribute.
    pub fn value(&self, node: NodeId) -> &str {
        self.attribute(node, "value").unwrap_or("")
    }

    pub fn set_value(&mut self, node: NodeId, value: &str) {
        self.set_attribute(node, "value", value);
    }

    /// Replaces the children of `node` with a single text run.
    pub fn set_text(&mut self, node: NodeId, text: &str) {
        self.clear_children(node);
        self.nodes[node.0].text = text.to_string();
    }

    /// Own text followed by the text of every descendant.
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = self.nodes[node.0].text.clone();
        for child in &self.nodes[node.0].children {
            out.push_str(&self.text_content(*child));
        }
        out
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    pub fn remove(&mut self, node: NodeId) {
        self.detach(node);
    }

    pub fn clear_children(&mut self, node: NodeId) {
        let children = std::mem::take(&mut self.nodes[node.0].children);
        for child in children {
            self.nodes[child.0].parent = None;
        }
        self.nodes[node.0].text.clear();
    }

    fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0].children.retain(|child| *child != node);
        }
    }

    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.find_by_id(self.root, id)
    }

    pub fn require_element(&self, id: &str) -> Result<NodeId, ClientError> {
        self.get_element_by_id(id)
            .ok_or_else(|| ClientError::missing_element(id))
    }

    /// First element with `id` inside `scope`, scope included.
    pub fn find_by_id(&self, scope: NodeId, id: &str) -> Option<NodeId> {
        self.descendants(scope)
            .into_iter()
            .find(|node| self.attribute(*node, "id") == Some(id))
    }

    pub fn find_by_class(&self, scope: NodeId, class: &str) -> Option<NodeId> {
        self.descendants(scope)
            .into_iter()
            .find(|node| self.has_class(*node, class))
    }

    pub fn find_by_tag(&self, scope: NodeId, tag: &str) -> Option<NodeId> {
        self.descendants(scope)
            .into_iter()
            .find(|node| self.tag(*node) == tag)
    }

    /// Pre-order walk of `scope` and everything below it.
    pub fn descendants(&self, scope: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![scope];
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.nodes[node.0].children.iter().rev().copied());
        }
        out
    }

    pub fn scroll_into_view(&mut self, node: NodeId) {
        self.scrolled_into_view = Some(node);
    }

    pub fn scrolled_into_view(&self) -> Option<NodeId> {
        self.scrolled_into_view
    }

    /// Serializes the children of `node` as html.
    pub fn inner_html(&self, node: NodeId) -> String {
        let mut out = escape(&self.nodes[node.0].text);
        for child in &self.nodes[node.0].children {
            self.write_html(*child, &mut out);
        }
        out
    }

    fn write_html(&self, node: NodeId, out: &mut String) {
        let element = &self.nodes[node.0];
        out.push('<');
        out.push_str(&element.tag);
        for (name, value) in &element.attributes {
            out.push(' ');
            out.push_str(name);
            if !value.is_empty() {
                out.push_str("=\"");
                out.push_str(&escape(value));
                out.push('"');
            }
        }
        out.push('>');
        out.push_str(&self.inner_html(node));
        out.push_str("</");
        out.push_str(&element.tag);
        out.push('>');
    }
}

pub(crate) fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
