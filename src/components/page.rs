use serde::Deserialize;

use super::view::Element;
use super::{Bindings, Component};
use crate::utils::error::Result;

#[derive(Default, Deserialize)]
pub struct PageProps {
    pub counter: Option<usize>,
    #[serde(skip)]
    pub catalog: Option<Vec<Element>>,
    pub locked: Option<bool>,
}

/// Header counter, product gallery and the scroll lock used while a modal is open.
pub struct Page {
    view: Bindings,
    counter: Element,
    gallery: Element,
    wrapper: Element,
}

impl Page {
    pub fn new(container: Element, on_basket: impl Fn() + 'static) -> Result<Self> {
        let view = Bindings::new(container);
        view.ensure(".header__basket")?
            .add_listener("click", move |_| on_basket());

        Ok(Self {
            counter: view.ensure(".header__basket-counter")?,
            gallery: view.ensure(".gallery")?,
            wrapper: view.ensure(".page__wrapper")?,
            view,
        })
    }

    pub fn is_locked(&self) -> bool {
        self.wrapper.has_class("page__wrapper_locked")
    }
}

impl Component for Page {
    type Props = PageProps;

    fn root(&self) -> &Element {
        self.view.root()
    }

    fn apply(&self, props: PageProps) {
        if let Some(counter) = props.counter {
            self.view.set_text(Some(&self.counter), counter);
        }
        if let Some(catalog) = props.catalog {
            self.gallery.replace_children(catalog);
        }
        if let Some(locked) = props.locked {
            self.view
                .toggle_class(&self.wrapper, "page__wrapper_locked", locked);
        }
    }
}
