//! Checkout forms.
//!
//! Forms never validate. Every tracked input emits
//! `<form>.<field>:change` with `{field, value}`, submitting emits
//! `<form>:submit`, and `valid`/`errors` are pushed back in from state.

use serde::Deserialize;
use serde_json::{json, Value};
use std::rc::Rc;

use super::view::Element;
use super::{Bindings, Component};
use crate::core::{names, EventBroker};
use crate::domain::model::PaymentMethod;
use crate::utils::error::{Result, ShopError};

pub struct Form {
    view: Bindings,
    name: String,
    submit: Element,
    errors: Element,
}

impl Form {
    pub fn new(container: Element, broker: &Rc<EventBroker>) -> Result<Self> {
        let name = container
            .attr("name")
            .ok_or_else(|| ShopError::MissingElement {
                selector: "form[name]".to_string(),
            })?;
        let view = Bindings::new(container.clone());
        let submit = view.ensure("[type=submit]")?;
        let errors = view.ensure(".form__errors")?;

        for input in container.query_all("input") {
            let Some(field) = input.attr("name") else {
                continue;
            };
            let event = names::field_change(&name, &field);
            let broker = Rc::clone(broker);
            input.add_listener("input", move |value| {
                let value = value.as_str().unwrap_or_default().to_string();
                broker.emit(&event, json!({ "field": field, "value": value }));
            });
        }

        let on_submit = broker.trigger(&names::form_submit(&name), Value::Null);
        container.add_listener("submit", on_submit);

        let form = container.downgrade();
        submit.add_listener("click", move |_| {
            if let Some(form) = form.upgrade() {
                form.dispatch("submit", Value::Null);
            }
        });

        Ok(Self {
            view,
            name,
            submit,
            errors,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root(&self) -> &Element {
        self.view.root()
    }

    pub fn set_valid(&self, valid: bool) {
        self.view.set_disabled(Some(&self.submit), !valid);
    }

    pub fn set_errors(&self, errors: &[String]) {
        self.view.set_text(Some(&self.errors), errors.join("; "));
    }

    pub fn set_input(&self, field: &str, value: &str) {
        if let Some(input) = self.view.find(&format!("[name={}]", field)) {
            input.set_attr("value", value);
        }
    }

    fn apply_state(&self, valid: Option<bool>, errors: Option<Vec<String>>) {
        if let Some(valid) = valid {
            self.set_valid(valid);
        }
        if let Some(errors) = errors {
            self.set_errors(&errors);
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderProps {
    pub valid: Option<bool>,
    pub errors: Option<Vec<String>>,
    pub payment: Option<PaymentMethod>,
    pub address: Option<String>,
}

/// Payment method and delivery address.
pub struct OrderForm {
    form: Form,
    buttons: Vec<Element>,
}

impl OrderForm {
    pub fn new(container: Element, broker: &Rc<EventBroker>) -> Result<Self> {
        let form = Form::new(container, broker)?;
        let buttons = form.view.ensure(".order__buttons")?.query_all(".button");

        for button in &buttons {
            let payment = button.attr("name").unwrap_or_default();
            button.add_listener(
                "click",
                broker.trigger(names::PAYMENT_CHANGE, json!({ "payment": payment })),
            );
        }

        Ok(Self { form, buttons })
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    fn set_payment(&self, payment: PaymentMethod) {
        for button in &self.buttons {
            let active = button.attr("name").as_deref() == Some(payment.as_str());
            self.form
                .view
                .toggle_class(button, "button_alt-active", active);
        }
    }
}

impl Component for OrderForm {
    type Props = OrderProps;

    fn root(&self) -> &Element {
        self.form.root()
    }

    fn apply(&self, props: OrderProps) {
        self.form.apply_state(props.valid, props.errors);
        if let Some(payment) = props.payment {
            self.set_payment(payment);
        }
        if let Some(address) = props.address {
            self.form.set_input("address", &address);
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactsProps {
    pub valid: Option<bool>,
    pub errors: Option<Vec<String>>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Email and phone.
pub struct ContactsForm {
    form: Form,
}

impl ContactsForm {
    pub fn new(container: Element, broker: &Rc<EventBroker>) -> Result<Self> {
        Ok(Self {
            form: Form::new(container, broker)?,
        })
    }

    pub fn form(&self) -> &Form {
        &self.form
    }
}

impl Component for ContactsForm {
    type Props = ContactsProps;

    fn root(&self) -> &Element {
        self.form.root()
    }

    fn apply(&self, props: ContactsProps) {
        self.form.apply_state(props.valid, props.errors);
        if let Some(email) = props.email {
            self.form.set_input("email", &email);
        }
        if let Some(phone) = props.phone {
            self.form.set_input("phone", &phone);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::templates;
    use crate::core::Event;
    use std::cell::RefCell;

    fn capture(broker: &EventBroker) -> Rc<RefCell<Vec<Event>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        broker.on_all(move |event| sink.borrow_mut().push(event.clone()));
        events
    }

    #[test]
    fn test_input_emits_field_change() {
        let broker = Rc::new(EventBroker::new());
        let events = capture(&broker);
        let contacts = ContactsForm::new(templates::contacts(), &broker).unwrap();

        contacts.root().query("[name=email]").unwrap().input("x@y.com");

        let events = events.borrow();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name, "contacts.email:change");
        assert_eq!(events[0].payload, json!({"field": "email", "value": "x@y.com"}));
    }

    #[test]
    fn test_submit_button_emits_form_submit() {
        let broker = Rc::new(EventBroker::new());
        let events = capture(&broker);
        let order = OrderForm::new(templates::order(), &broker).unwrap();

        order.render(OrderProps {
            valid: Some(true),
            ..Default::default()
        });
        order.root().query("[type=submit]").unwrap().click();

        assert_eq!(events.borrow()[0].name, names::ORDER_SUBMIT);
    }

    #[test]
    fn test_invalid_form_cannot_submit() {
        let broker = Rc::new(EventBroker::new());
        let events = capture(&broker);
        let contacts = ContactsForm::new(templates::contacts(), &broker).unwrap();

        contacts.render(ContactsProps {
            valid: Some(false),
            errors: Some(vec!["email required".to_string(), "phone required".to_string()]),
            ..Default::default()
        });
        contacts.root().query("[type=submit]").unwrap().click();

        assert!(events.borrow().is_empty());
        assert_eq!(
            contacts.root().query(".form__errors").unwrap().text(),
            "email required; phone required"
        );
    }

    #[test]
    fn test_payment_buttons() {
        let broker = Rc::new(EventBroker::new());
        let events = capture(&broker);
        let order = OrderForm::new(templates::order(), &broker).unwrap();

        order.root().query("[name=cash]").unwrap().click();
        assert_eq!(events.borrow()[0].name, names::PAYMENT_CHANGE);
        assert_eq!(events.borrow()[0].payload, json!({"payment": "cash"}));

        order.render(OrderProps {
            payment: Some(PaymentMethod::Cash),
            address: Some("Main st".to_string()),
            ..Default::default()
        });
        let cash = order.root().query("[name=cash]").unwrap();
        let card = order.root().query("[name=card]").unwrap();
        assert!(cash.has_class("button_alt-active"));
        assert!(!card.has_class("button_alt-active"));
        assert_eq!(
            order.root().query("[name=address]").unwrap().attr("value").as_deref(),
            Some("Main st")
        );
        assert_eq!(order.form().name(), "order");
    }
}
