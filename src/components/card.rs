use serde::Deserialize;
use serde_json::json;

use super::view::Element;
use super::{format_price, Bindings, Component};
use crate::core::Payload;
use crate::domain::model::{Category, Product};
use crate::utils::error::Result;

pub const BUY_LABEL: &str = "Add to basket";
pub const REMOVE_LABEL: &str = "Remove from basket";
pub const NOT_FOR_SALE_LABEL: &str = "Not for sale";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardProps {
    pub id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub category: Option<Category>,
    pub price: Option<u64>,
    pub button: Option<String>,
    pub basket_index: Option<usize>,
}

impl From<&Product> for CardProps {
    fn from(product: &Product) -> Self {
        Self {
            id: Some(product.id.clone()),
            title: Some(product.title.clone()),
            description: Some(product.description.clone()),
            image: Some(product.image.clone()),
            category: Some(product.category),
            price: Some(product.price),
            ..Default::default()
        }
    }
}

/// Product card. The same type serves catalog, preview and basket layouts;
/// fields whose element is absent from the layout are skipped.
pub struct Card {
    view: Bindings,
    title: Element,
    image: Option<Element>,
    description: Option<Element>,
    button: Option<Element>,
    price: Option<Element>,
    category: Option<Element>,
    basket_index: Option<Element>,
}

impl Card {
    /// `on_click` receives `{"id": <card id>}` from the card button, or from
    /// the whole card when the layout has no button.
    pub fn new(container: Element, on_click: Option<Box<dyn Fn(Payload)>>) -> Result<Self> {
        let view = Bindings::new(container.clone());
        let card = Self {
            title: view.ensure(".card__title")?,
            image: view.find(".card__image"),
            description: view.find(".card__text"),
            button: view.find(".card__button"),
            price: view.find(".card__price"),
            category: view.find(".card__category"),
            basket_index: view.find(".basket__item-index"),
            view,
        };

        if let Some(on_click) = on_click {
            let target = card.button.clone().unwrap_or_else(|| container.clone());
            let source = container.downgrade();
            target.add_listener("click", move |_| {
                let id = source
                    .upgrade()
                    .and_then(|card| card.attr("data-id"))
                    .unwrap_or_default();
                on_click(json!({ "id": id }));
            });
        }

        Ok(card)
    }

    pub fn id(&self) -> String {
        self.view.root().attr("data-id").unwrap_or_default()
    }

    pub fn title(&self) -> String {
        self.title.text()
    }

    fn set_category(&self, category: Category) {
        if let Some(element) = &self.category {
            element.set_text(category.label());
            let state = format!("card__category_{}", category.modifier());
            element.set_classes(&["card__category", state.as_str()]);
        }
    }

    fn set_button(&self, label: &str) {
        self.view.set_text(self.button.as_ref(), label);
        self.view
            .set_disabled(self.button.as_ref(), label == NOT_FOR_SALE_LABEL);
    }
}

impl Component for Card {
    type Props = CardProps;

    fn root(&self) -> &Element {
        self.view.root()
    }

    fn apply(&self, props: CardProps) {
        if let Some(id) = props.id {
            self.view.root().set_attr("data-id", &id);
        }
        if let Some(title) = props.title {
            self.title.set_text(&title);
        }
        if let Some(image) = props.image {
            let alt = self.title();
            self.view.set_image(self.image.as_ref(), &image, Some(&alt));
        }
        if let Some(description) = props.description {
            self.view.set_text(self.description.as_ref(), description);
        }
        if let Some(category) = props.category {
            self.set_category(category);
        }
        if let Some(price) = props.price {
            self.view.set_text(self.price.as_ref(), format_price(price));
        }
        if let Some(button) = props.button {
            self.set_button(&button);
        }
        if let Some(index) = props.basket_index {
            self.view.set_text(self.basket_index.as_ref(), index);
        }
    }
}
