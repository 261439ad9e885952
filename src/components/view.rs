//! Headless view tree.
//!
//! An [`Element`] is a shared handle to a node with text, classes, attributes,
//! an enabled flag, children and named interaction listeners. Components write
//! to it; tests and the CLI read it back or `dispatch` interactions into it.

use serde_json::Value;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::rc::{Rc, Weak};

use crate::core::Payload;
use crate::utils::error::{Result, ShopError};

pub type Listener = Rc<dyn Fn(Payload)>;

#[derive(Default)]
struct Node {
    tag: String,
    classes: Vec<String>,
    text: String,
    attrs: BTreeMap<String, String>,
    disabled: bool,
    children: Vec<Element>,
    listeners: Vec<(String, Listener)>,
}

#[derive(Clone)]
pub struct Element(Rc<RefCell<Node>>);

/// Non-owning handle, for listeners that refer back to their own tree.
#[derive(Clone)]
pub struct WeakElement(Weak<RefCell<Node>>);

impl WeakElement {
    pub fn upgrade(&self) -> Option<Element> {
        self.0.upgrade().map(Element)
    }
}

impl std::fmt::Debug for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let node = self.0.borrow();
        f.debug_struct("Element")
            .field("tag", &node.tag)
            .field("classes", &node.classes)
            .field("text", &node.text)
            .field("children", &node.children.len())
            .finish()
    }
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Element(Rc::new(RefCell::new(Node {
            tag: tag.to_string(),
            ..Default::default()
        })))
    }

    pub fn with_class(self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    pub fn with_attr(self, name: &str, value: &str) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_text(self, text: &str) -> Self {
        self.set_text(text);
        self
    }

    pub fn with_child(self, child: Element) -> Self {
        self.append(child);
        self
    }

    pub fn downgrade(&self) -> WeakElement {
        WeakElement(Rc::downgrade(&self.0))
    }

    pub fn ptr_eq(&self, other: &Element) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn tag(&self) -> String {
        self.0.borrow().tag.clone()
    }

    pub fn text(&self) -> String {
        self.0.borrow().text.clone()
    }

    pub fn set_text(&self, text: &str) {
        self.0.borrow_mut().text = text.to_string();
    }

    pub fn attr(&self, name: &str) -> Option<String> {
        self.0.borrow().attrs.get(name).cloned()
    }

    pub fn set_attr(&self, name: &str, value: &str) {
        self.0
            .borrow_mut()
            .attrs
            .insert(name.to_string(), value.to_string());
    }

    pub fn classes(&self) -> Vec<String> {
        self.0.borrow().classes.clone()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.0.borrow().classes.iter().any(|c| c == class)
    }

    pub fn add_class(&self, class: &str) {
        if !self.has_class(class) {
            self.0.borrow_mut().classes.push(class.to_string());
        }
    }

    pub fn remove_class(&self, class: &str) {
        self.0.borrow_mut().classes.retain(|c| c != class);
    }

    pub fn set_classes(&self, classes: &[&str]) {
        self.0.borrow_mut().classes = classes.iter().map(|c| c.to_string()).collect();
    }

    pub fn is_disabled(&self) -> bool {
        self.0.borrow().disabled
    }

    pub fn set_disabled(&self, disabled: bool) {
        self.0.borrow_mut().disabled = disabled;
    }

    pub fn children(&self) -> Vec<Element> {
        self.0.borrow().children.clone()
    }

    pub fn append(&self, child: Element) {
        self.0.borrow_mut().children.push(child);
    }

    pub fn replace_children(&self, children: Vec<Element>) {
        self.0.borrow_mut().children = children;
    }

    /// First descendant (depth-first) matching `selector`: `.class`,
    /// `[name=value]` or a tag name.
    pub fn query(&self, selector: &str) -> Option<Element> {
        for child in self.children() {
            if child.matches(selector) {
                return Some(child);
            }
            if let Some(found) = child.query(selector) {
                return Some(found);
            }
        }
        None
    }

    pub fn query_all(&self, selector: &str) -> Vec<Element> {
        let mut found = Vec::new();
        for child in self.children() {
            if child.matches(selector) {
                found.push(child.clone());
            }
            found.extend(child.query_all(selector));
        }
        found
    }

    /// Like [`query`](Self::query) but a missing element is an error.
    pub fn ensure(&self, selector: &str) -> Result<Element> {
        self.query(selector).ok_or_else(|| ShopError::MissingElement {
            selector: selector.to_string(),
        })
    }

    fn matches(&self, selector: &str) -> bool {
        if let Some(class) = selector.strip_prefix('.') {
            return self.has_class(class);
        }
        if let Some(inner) = selector.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
            return match inner.split_once('=') {
                Some((name, value)) => self.attr(name).as_deref() == Some(value),
                None => self.attr(inner).is_some(),
            };
        }
        self.0.borrow().tag == selector
    }

    pub fn add_listener(&self, event: &str, listener: impl Fn(Payload) + 'static) {
        self.0
            .borrow_mut()
            .listeners
            .push((event.to_string(), Rc::new(listener)));
    }

    /// Simulates a user interaction. Disabled elements ignore it.
    pub fn dispatch(&self, event: &str, payload: Payload) {
        let listeners: Vec<Listener> = {
            let node = self.0.borrow();
            if node.disabled {
                return;
            }
            node.listeners
                .iter()
                .filter(|(name, _)| name == event)
                .map(|(_, listener)| Rc::clone(listener))
                .collect()
        };
        for listener in listeners {
            listener(payload.clone());
        }
    }

    pub fn click(&self) {
        self.dispatch("click", Value::Null);
    }

    /// Sets the `value` attribute and fires `input`.
    pub fn input(&self, value: &str) {
        self.set_attr("value", value);
        self.dispatch("input", Value::String(value.to_string()));
    }

    /// Plain-text dump of the tree, one node per line.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        self.write_text(&mut out, 0);
        out
    }

    fn write_text(&self, out: &mut String, depth: usize) {
        let node = self.0.borrow();
        let _ = write!(out, "{}<{}", "  ".repeat(depth), node.tag);
        if !node.classes.is_empty() {
            let _ = write!(out, " .{}", node.classes.join("."));
        }
        for (name, value) in &node.attrs {
            let _ = write!(out, " {}=\"{}\"", name, value);
        }
        if node.disabled {
            out.push_str(" disabled");
        }
        out.push('>');
        if !node.text.is_empty() {
            let _ = write!(out, " {}", node.text);
        }
        out.push('\n');
        for child in &node.children {
            child.write_text(out, depth + 1);
        }
    }
}
