use serde::Deserialize;

use super::view::Element;
use super::{Bindings, Component};
use crate::utils::error::Result;

#[derive(Default, Deserialize)]
pub struct SuccessProps {
    pub total: Option<u64>,
}

pub struct Success {
    view: Bindings,
    description: Element,
}

impl Success {
    pub fn new(container: Element, on_close: impl Fn() + 'static) -> Result<Self> {
        let view = Bindings::new(container);
        view.ensure(".order-success__close")?
            .add_listener("click", move |_| on_close());

        Ok(Self {
            description: view.ensure(".order-success__description")?,
            view,
        })
    }
}

impl Component for Success {
    type Props = SuccessProps;

    fn root(&self) -> &Element {
        self.view.root()
    }

    fn apply(&self, props: SuccessProps) {
        if let Some(total) = props.total {
            self.view
                .set_text(Some(&self.description), format!("Spent {} synapses", total));
        }
    }
}
