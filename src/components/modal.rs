use serde::Deserialize;
use serde_json::Value;
use std::rc::Rc;

use super::view::Element;
use super::{Bindings, Component};
use crate::core::{names, EventBroker};
use crate::utils::error::Result;

#[derive(Default, Deserialize)]
pub struct ModalProps {
    #[serde(skip)]
    pub content: Option<Element>,
}

/// Single modal container. Rendering content opens it.
pub struct Modal {
    view: Bindings,
    content: Element,
    broker: Rc<EventBroker>,
}

impl Modal {
    pub fn new(container: Element, broker: Rc<EventBroker>) -> Result<Self> {
        let view = Bindings::new(container);
        let modal = Self {
            content: view.ensure(".modal__content")?,
            view,
            broker,
        };

        let close_button = modal.view.ensure(".modal__close")?;
        let closer = modal.closer();
        close_button.add_listener("click", move |_| closer());

        Ok(modal)
    }

    /// A close action holding only weak handles to the modal tree.
    pub fn closer(&self) -> impl Fn() + 'static {
        let root = self.view.root().downgrade();
        let slot = self.content.downgrade();
        let broker = Rc::clone(&self.broker);
        move || {
            if let (Some(root), Some(slot)) = (root.upgrade(), slot.upgrade()) {
                close(&root, &slot, &broker);
            }
        }
    }

    pub fn is_open(&self) -> bool {
        self.view.root().has_class("modal_active")
    }

    pub fn content(&self) -> Option<Element> {
        self.content.children().into_iter().next()
    }

    pub fn open(&self) {
        self.view.toggle_class(self.view.root(), "modal_active", true);
        self.broker.emit(names::MODAL_OPEN, Value::Null);
    }

    pub fn close(&self) {
        close(self.view.root(), &self.content, &self.broker);
    }
}

fn close(root: &Element, content: &Element, broker: &EventBroker) {
    root.remove_class("modal_active");
    content.replace_children(Vec::new());
    broker.emit(names::MODAL_CLOSE, Value::Null);
}

impl Component for Modal {
    type Props = ModalProps;

    fn root(&self) -> &Element {
        self.view.root()
    }

    fn apply(&self, props: ModalProps) {
        if let Some(content) = props.content {
            self.content.replace_children(vec![content]);
        }
        self.open();
    }
}
