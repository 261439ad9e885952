use serde::Deserialize;

use super::view::Element;
use super::{format_price, Bindings, Component};
use crate::utils::error::Result;

#[derive(Default, Deserialize)]
pub struct BasketProps {
    #[serde(skip)]
    pub items: Option<Vec<Element>>,
    pub total: Option<u64>,
}

pub struct Basket {
    view: Bindings,
    list: Element,
    total: Option<Element>,
    button: Option<Element>,
}

impl Basket {
    /// `on_checkout` fires when the checkout button is clicked.
    pub fn new(container: Element, on_checkout: impl Fn() + 'static) -> Result<Self> {
        let view = Bindings::new(container);
        let basket = Self {
            list: view.ensure(".basket__list")?,
            total: view.find(".basket__price"),
            button: view.find(".basket__button"),
            view,
        };

        if let Some(button) = &basket.button {
            button.add_listener("click", move |_| on_checkout());
        }
        basket.set_items(Vec::new());

        Ok(basket)
    }

    fn set_items(&self, items: Vec<Element>) {
        let empty = items.is_empty();
        if empty {
            self.list
                .replace_children(vec![Element::new("p").with_text("Basket is empty")]);
        } else {
            self.list.replace_children(items);
        }
        self.view.set_disabled(self.button.as_ref(), empty);
    }
}

impl Component for Basket {
    type Props = BasketProps;

    fn root(&self) -> &Element {
        self.view.root()
    }

    fn apply(&self, props: BasketProps) {
        if let Some(items) = props.items {
            self.set_items(items);
        }
        if let Some(total) = props.total {
            self.view.set_text(self.total.as_ref(), format_price(total));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::templates;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_empty_basket_disables_checkout() {
        let basket = Basket::new(templates::basket(), || {}).unwrap();
        let root = basket.render(BasketProps {
            items: Some(Vec::new()),
            total: Some(0),
        });

        assert!(root.query(".basket__button").unwrap().is_disabled());
        assert_eq!(root.query(".basket__list").unwrap().children().len(), 1);
        assert_eq!(root.query(".basket__list").unwrap().children()[0].text(), "Basket is empty");
    }

    #[test]
    fn test_items_enable_checkout() {
        let opened = Rc::new(Cell::new(false));
        let flag = opened.clone();
        let basket = Basket::new(templates::basket(), move || flag.set(true)).unwrap();

        basket.render(BasketProps {
            items: Some(vec![templates::card_basket(), templates::card_basket()]),
            total: Some(2200),
        });

        let root = basket.root();
        assert_eq!(root.query(".basket__list").unwrap().children().len(), 2);
        assert_eq!(root.query(".basket__price").unwrap().text(), "2200 synapses");

        root.query(".basket__button").unwrap().click();
        assert!(opened.get());
    }
}
