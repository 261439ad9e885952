//! Synchronous publish/subscribe hub.
//!
//! Subscriptions live in one ordered list per broker. `emit` dispatches to
//! exact-name handlers first, then pattern handlers, then catch-all handlers,
//! each group in registration order. Handlers may emit again; nested emissions
//! complete before the outer dispatch continues.

use regex::Regex;
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Nested emissions deeper than this are treated as an event cycle.
pub const MAX_EMIT_DEPTH: usize = 32;

pub type Payload = Value;

/// Event names shared by state, components and the presenter.
pub mod names {
    pub const CATALOG_CHANGED: &str = "catalog-changed";
    pub const PREVIEW_CHANGED: &str = "preview-changed";
    pub const BASKET_CHANGED: &str = "basket-changed";
    pub const ORDER_CHANGED: &str = "order-changed";
    pub const ORDER_READY: &str = "order-ready";
    pub const VALIDATION_CHANGED: &str = "validation-changed";
    pub const ORDER_SUBMIT: &str = "order:submit";
    pub const CONTACTS_SUBMIT: &str = "contacts:submit";
    pub const PAYMENT_CHANGE: &str = "payment:change";
    pub const CARD_SELECT: &str = "card:select";
    pub const BASKET_OPEN: &str = "basket:open";
    pub const ORDER_OPEN: &str = "order:open";
    pub const CONTACTS_OPEN: &str = "contacts:open";
    pub const MODAL_OPEN: &str = "modal:open";
    pub const MODAL_CLOSE: &str = "modal:close";

    /// `<form>.<field>:change`
    pub fn field_change(form: &str, field: &str) -> String {
        format!("{}.{}:change", form, field)
    }

    /// `<form>:submit`
    pub fn form_submit(form: &str) -> String {
        format!("{}:submit", form)
    }

    /// Field-change events of the checkout forms, capturing form and field.
    pub const FIELD_CHANGE_PATTERN: &str = r"^(order|contacts)\.(\w+):change$";
}

#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub name: String,
    pub payload: Payload,
}

pub type Handler = Rc<dyn Fn(&Event)>;

/// What a subscription listens to.
#[derive(Debug, Clone)]
pub enum Topic {
    Exact(String),
    Pattern(Regex),
    All,
}

impl Topic {
    fn same_as(&self, other: &Topic) -> bool {
        match (self, other) {
            (Topic::Exact(a), Topic::Exact(b)) => a == b,
            (Topic::Pattern(a), Topic::Pattern(b)) => a.as_str() == b.as_str(),
            (Topic::All, Topic::All) => true,
            _ => false,
        }
    }
}

impl From<&str> for Topic {
    fn from(name: &str) -> Self {
        Topic::Exact(name.to_string())
    }
}

impl From<String> for Topic {
    fn from(name: String) -> Self {
        Topic::Exact(name)
    }
}

impl From<Regex> for Topic {
    fn from(pattern: Regex) -> Self {
        Topic::Pattern(pattern)
    }
}

struct Subscription {
    topic: Topic,
    handler: Handler,
}

#[derive(Default)]
pub struct EventBroker {
    subscriptions: RefCell<Vec<Subscription>>,
    depth: Cell<usize>,
}

impl EventBroker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler`. The same handler may be registered more than once.
    pub fn subscribe(&self, topic: impl Into<Topic>, handler: Handler) {
        self.subscriptions.borrow_mut().push(Subscription {
            topic: topic.into(),
            handler,
        });
    }

    /// Convenience over [`subscribe`](Self::subscribe); returns the handle for unsubscribing.
    pub fn on(&self, topic: impl Into<Topic>, handler: impl Fn(&Event) + 'static) -> Handler {
        let handler: Handler = Rc::new(handler);
        self.subscribe(topic, handler.clone());
        handler
    }

    pub fn on_all(&self, handler: impl Fn(&Event) + 'static) -> Handler {
        self.on(Topic::All, handler)
    }

    /// Exact names drop matching `handler` entries; patterns drop every handler
    /// registered under that pattern.
    pub fn unsubscribe(&self, topic: impl Into<Topic>, handler: &Handler) {
        let topic = topic.into();
        let whole_pattern = matches!(topic, Topic::Pattern(_));
        self.subscriptions.borrow_mut().retain(|sub| {
            if !sub.topic.same_as(&topic) {
                return true;
            }
            !whole_pattern && !Rc::ptr_eq(&sub.handler, handler)
        });
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscriptions.borrow().len()
    }

    pub fn emit(&self, name: &str, payload: Payload) {
        let depth = self.depth.get();
        if depth >= MAX_EMIT_DEPTH {
            tracing::error!("Event cycle detected while emitting '{}' at depth {}", name, depth);
            debug_assert!(false, "event cycle detected while emitting '{}'", name);
            return;
        }

        let handlers = self.matching_handlers(name);
        if handlers.is_empty() {
            return;
        }

        let event = Event {
            name: name.to_string(),
            payload,
        };

        self.depth.set(depth + 1);
        let _guard = DepthGuard(&self.depth, depth);
        for handler in handlers {
            handler(&event);
        }
    }

    /// Adapts a UI callback into an emission: `context` is merged over the
    /// call-time argument, keys in `context` winning.
    pub fn trigger(self: &Rc<Self>, name: &str, context: Payload) -> impl Fn(Payload) + 'static {
        let broker = Rc::clone(self);
        let name = name.to_string();
        move |data: Payload| broker.emit(&name, merge_payload(data, &context))
    }

    // Snapshot so handlers can subscribe or emit without holding the borrow.
    fn matching_handlers(&self, name: &str) -> Vec<Handler> {
        let subscriptions = self.subscriptions.borrow();
        let exact = subscriptions.iter().filter(|sub| match &sub.topic {
            Topic::Exact(exact) => exact == name,
            _ => false,
        });
        let patterns = subscriptions.iter().filter(|sub| match &sub.topic {
            Topic::Pattern(pattern) => pattern.is_match(name),
            _ => false,
        });
        let all = subscriptions
            .iter()
            .filter(|sub| matches!(sub.topic, Topic::All));

        exact
            .chain(patterns)
            .chain(all)
            .map(|sub| Rc::clone(&sub.handler))
            .collect()
    }
}

struct DepthGuard<'a>(&'a Cell<usize>, usize);

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.0.set(self.1);
    }
}

fn merge_payload(data: Payload, context: &Payload) -> Payload {
    match (data, context) {
        (Value::Object(mut base), Value::Object(patch)) => {
            for (key, value) in patch {
                base.insert(key.clone(), value.clone());
            }
            Value::Object(base)
        }
        (data, Value::Null) => data,
        (_, context) => context.clone(),
    }
}
