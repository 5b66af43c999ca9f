// src/dom.rs
//! In-process document tree the dashboard renders into.
//!
//! Elements live in an arena owned by [`Document`]. Removing a subtree frees
//! its slots for reuse, so a [`NodeId`] of a removed element must not be held
//! across later appends.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub type NodeId = usize;

const VOID_TAGS: &[&str] = &["img", "input", "br", "meta"];

#[derive(Debug, Clone, Default)]
pub struct Element {
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attrs: BTreeMap<String, String>,
    /// Own text, rendered ahead of any children.
    pub text: String,
    /// Current form value (inputs only).
    pub value: String,
    /// Value a form reset restores.
    pub default_value: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Element {
            tag: tag.to_string(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }
}

/// A compound selector: every populated part must match.
///
/// `attrs` maps an attribute name to `Some(value)` for an exact match or
/// `None` for a presence check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Selector {
    pub tag: Option<String>,
    pub id: Option<String>,
    pub class: Vec<String>,
    pub attrs: BTreeMap<String, Option<String>>,
}

impl Selector {
    pub fn id(id: &str) -> Self {
        Selector {
            id: Some(id.to_string()),
            ..Default::default()
        }
    }

    pub fn class(class: &str) -> Self {
        Selector {
            class: vec![class.to_string()],
            ..Default::default()
        }
    }

    pub fn tag(tag: &str) -> Self {
        Selector {
            tag: Some(tag.to_string()),
            ..Default::default()
        }
    }

    pub fn attr(name: &str, value: &str) -> Self {
        Selector::default().and_attr(name, value)
    }

    pub fn and_class(mut self, class: &str) -> Self {
        self.class.push(class.to_string());
        self
    }

    pub fn and_attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_string(), Some(value.to_string()));
        self
    }

    pub fn and_has_attr(mut self, name: &str) -> Self {
        self.attrs.insert(name.to_string(), None);
        self
    }

    pub fn matches(&self, element: &Element) -> bool {
        if let Some(tag) = &self.tag {
            if !element.tag.eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if element.id.as_deref() != Some(id.as_str()) {
                return false;
            }
        }
        if !self.class.iter().all(|class| element.has_class(class)) {
            return false;
        }
        self.attrs.iter().all(|(name, expected)| match expected {
            Some(value) => element.attr(name) == Some(value.as_str()),
            None => element.attr(name).is_some(),
        })
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(tag) = &self.tag {
            f.write_str(tag)?;
        }
        if let Some(id) = &self.id {
            write!(f, "#{}", id)?;
        }
        for class in &self.class {
            write!(f, ".{}", class)?;
        }
        for (name, value) in &self.attrs {
            match value {
                Some(value) => write!(f, "[{}=\"{}\"]", name, value)?,
                None => write!(f, "[{}]", name)?,
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Option<Element>>,
    free: Vec<NodeId>,
    root: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// An empty document whose root is `<body>`.
    pub fn new() -> Self {
        Document {
            nodes: vec![Some(Element::new("body"))],
            free: Vec::new(),
            root: 0,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn get(&self, node: NodeId) -> Option<&Element> {
        self.nodes.get(node).and_then(Option::as_ref)
    }

    fn get_mut(&mut self, node: NodeId) -> Option<&mut Element> {
        self.nodes.get_mut(node).and_then(Option::as_mut)
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.get(node).and_then(|element| element.parent)
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.get(node)
            .map(|element| element.children.as_slice())
            .unwrap_or(&[])
    }

    /// Appends `element` as the last child of `parent`.
    ///
    /// Appending under a freed node still allocates the element, detached.
    pub fn append(&mut self, parent: NodeId, mut element: Element) -> NodeId {
        let node = self.free.pop().unwrap_or(self.nodes.len());
        element.children.clear();
        element.parent = None;
        if let Some(parent_element) = self.get_mut(parent) {
            parent_element.children.push(node);
            element.parent = Some(parent);
        }
        if node == self.nodes.len() {
            self.nodes.push(Some(element));
        } else {
            self.nodes[node] = Some(element);
        }
        node
    }

    /// Drops every descendant of `node` (`innerHTML = ''`).
    pub fn clear_children(&mut self, node: NodeId) {
        let children = match self.get_mut(node) {
            Some(element) => std::mem::take(&mut element.children),
            None => return,
        };
        let mut pending = children;
        while let Some(child) = pending.pop() {
            if let Some(element) = self.nodes.get_mut(child).and_then(Option::take) {
                pending.extend(element.children);
                self.free.push(child);
            }
        }
    }

    /// Replaces the node's whole content with plain text (`textContent = ...`).
    pub fn set_text(&mut self, node: NodeId, text: &str) {
        self.clear_children(node);
        if let Some(element) = self.get_mut(node) {
            element.text = text.to_string();
        }
    }

    /// Concatenated text of the node and all of its descendants.
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(node, &mut out);
        out
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        if let Some(element) = self.get(node) {
            out.push_str(&element.text);
            for &child in &element.children {
                self.collect_text(child, out);
            }
        }
    }

    pub fn value(&self, node: NodeId) -> Option<&str> {
        self.get(node).map(|element| element.value.as_str())
    }

    pub fn set_value(&mut self, node: NodeId, value: &str) {
        if let Some(element) = self.get_mut(node) {
            element.value = value.to_string();
        }
    }

    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.get(node).and_then(|element| element.attr(name))
    }

    pub fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(element) = self.get_mut(node) {
            element.attrs.insert(name.to_string(), value.to_string());
        }
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.get(node)
            .map(|element| element.has_class(class))
            .unwrap_or(false)
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) {
        if self.has_class(node, class) {
            return;
        }
        if let Some(element) = self.get_mut(node) {
            element.classes.push(class.to_string());
        }
    }

    pub fn remove_class(&mut self, node: NodeId, class: &str) {
        if let Some(element) = self.get_mut(node) {
            element.classes.retain(|c| c != class);
        }
    }

    /// Descendants of `scope` in document order, `scope` itself excluded.
    pub fn descendants(&self, scope: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(scope).iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.children(node).iter().rev());
        }
        out
    }

    pub fn matches(&self, node: NodeId, selector: &Selector) -> bool {
        self.get(node)
            .map(|element| selector.matches(element))
            .unwrap_or(false)
    }

    /// First element in the document matching `selector`.
    pub fn query(&self, selector: &Selector) -> Option<NodeId> {
        self.query_in(self.root, selector)
    }

    pub fn query_in(&self, scope: NodeId, selector: &Selector) -> Option<NodeId> {
        self.descendants(scope)
            .into_iter()
            .find(|&node| self.matches(node, selector))
    }

    pub fn query_all(&self, selector: &Selector) -> Vec<NodeId> {
        self.query_all_in(self.root, selector)
    }

    pub fn query_all_in(&self, scope: NodeId, selector: &Selector) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|&node| self.matches(node, selector))
            .collect()
    }

    /// First element in document order matching any of `selectors`, like a
    /// comma-separated selector list.
    pub fn query_any(&self, selectors: &[Selector]) -> Option<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .find(|&node| selectors.iter().any(|selector| self.matches(node, selector)))
    }

    /// Nearest inclusive ancestor of `node` matching `selector`.
    pub fn closest(&self, node: NodeId, selector: &Selector) -> Option<NodeId> {
        let mut current = Some(node);
        while let Some(candidate) = current {
            if self.matches(candidate, selector) {
                return Some(candidate);
            }
            current = self.parent(candidate);
        }
        None
    }

    /// The node followed by its ancestors up to the root.
    pub fn propagation_path(&self, node: NodeId) -> Vec<NodeId> {
        let mut path = Vec::new();
        let mut current = self.get(node).map(|_| node);
        while let Some(candidate) = current {
            path.push(candidate);
            current = self.parent(candidate);
        }
        path
    }

    /// Restores every input under `form` to its default value.
    pub fn reset_form(&mut self, form: NodeId) {
        for node in self.query_all_in(form, &Selector::tag("input")) {
            if let Some(element) = self.get_mut(node) {
                element.value = element.default_value.clone();
            }
        }
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(self.root, &mut out);
        out
    }

    fn write_html(&self, node: NodeId, out: &mut String) {
        let Some(element) = self.get(node) else {
            return;
        };
        out.push('<');
        out.push_str(&element.tag);
        if let Some(id) = &element.id {
            push_attr(out, "id", id);
        }
        if !element.classes.is_empty() {
            push_attr(out, "class", &element.classes.join(" "));
        }
        let is_input = element.tag == "input";
        for (name, value) in &element.attrs {
            if is_input && name == "value" {
                continue;
            }
            push_attr(out, name, value);
        }
        if is_input {
            push_attr(out, "value", &element.value);
        }
        out.push('>');
        if VOID_TAGS.contains(&element.tag.as_str()) {
            return;
        }
        out.push_str(&escape(&element.text));
        for &child in &element.children {
            self.write_html(child, out);
        }
        out.push_str("</");
        out.push_str(&element.tag);
        out.push('>');
    }
}

fn push_attr(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    out.push_str(&escape(value));
    out.push('"');
}

fn escape(text: &str) -> String {
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
