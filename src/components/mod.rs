//! Views bound to a root [`Element`].
//!
//! A component is a stateless transformer from a property bag to its view.
//! `render` applies every field present in the bag and leaves absent ones
//! untouched; unknown keys in a JSON bag are ignored.

pub mod basket;
pub mod card;
pub mod form;
pub mod modal;
pub mod page;
pub mod success;
pub mod templates;
pub mod view;

pub use basket::{Basket, BasketProps};
pub use card::{Card, CardProps};
pub use form::{ContactsForm, ContactsProps, Form, OrderForm, OrderProps};
pub use modal::{Modal, ModalProps};
pub use page::{Page, PageProps};
pub use success::{Success, SuccessProps};
pub use view::Element;

use serde::de::DeserializeOwned;

use crate::core::Payload;
use crate::utils::error::Result;

pub trait Component {
    type Props: DeserializeOwned + Default;

    fn root(&self) -> &Element;

    fn apply(&self, props: Self::Props);

    fn render(&self, props: Self::Props) -> Element {
        self.apply(props);
        self.root().clone()
    }

    /// Renders from an untyped bag such as an event payload.
    fn render_bag(&self, bag: Payload) -> Result<Element> {
        let props = if bag.is_null() {
            Self::Props::default()
        } else {
            serde_json::from_value(bag)?
        };
        Ok(self.render(props))
    }
}

/// Shared field helpers every component composes.
#[derive(Debug, Clone)]
pub struct Bindings {
    root: Element,
}

impl Bindings {
    pub fn new(root: Element) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn ensure(&self, selector: &str) -> Result<Element> {
        self.root.ensure(selector)
    }

    pub fn find(&self, selector: &str) -> Option<Element> {
        self.root.query(selector)
    }

    pub fn set_text(&self, element: Option<&Element>, text: impl std::fmt::Display) {
        if let Some(element) = element {
            element.set_text(&text.to_string());
        }
    }

    pub fn toggle_class(&self, element: &Element, class: &str, enabled: bool) {
        if enabled {
            element.add_class(class);
        } else {
            element.remove_class(class);
        }
    }

    pub fn set_image(&self, element: Option<&Element>, src: &str, alt: Option<&str>) {
        if let Some(element) = element {
            element.set_attr("src", src);
            if let Some(alt) = alt {
                element.set_attr("alt", alt);
            }
        }
    }

    pub fn set_disabled(&self, element: Option<&Element>, disabled: bool) {
        if let Some(element) = element {
            element.set_disabled(disabled);
        }
    }

    pub fn set_hidden(&self, element: &Element, hidden: bool) {
        self.toggle_class(element, "hidden", hidden);
    }
}

/// `"750 synapses"`, or `"Priceless"` for 0.
pub fn format_price(price: u64) -> String {
    if price == 0 {
        "Priceless".to_string()
    } else {
        format!("{} synapses", price)
    }
}
