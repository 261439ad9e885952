//! Orchestration: routes UI events into [`AppState`] mutations and state
//! notifications back into component renders.
//!
//! Runs on a single thread. Order submission is spawned with
//! `tokio::task::spawn_local`, so a presenter that handles `contacts:submit`
//! must live inside a `tokio::task::LocalSet`.

use regex::Regex;
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::components::card::{BUY_LABEL, NOT_FOR_SALE_LABEL, REMOVE_LABEL};
use crate::components::{
    templates, Basket, BasketProps, Card, CardProps, Component, ContactsForm, ContactsProps,
    Element, Modal, ModalProps, OrderForm, OrderProps, Page, PageProps, Success, SuccessProps,
};
use crate::core::{names, AppState, Event, EventBroker, ShopApi, Topic};
use crate::domain::model::{OrderField, OrderReceipt, Product, ValidationErrors};
use crate::utils::error::Result;
use crate::utils::validation::validate_order;

const ORDER_FIELDS: &[OrderField] = &[OrderField::Address];
const CONTACTS_FIELDS: &[OrderField] = &[OrderField::Email, OrderField::Phone];

pub struct Presenter {
    me: Weak<Presenter>,
    broker: Rc<EventBroker>,
    state: Rc<AppState>,
    api: Arc<dyn ShopApi>,
    page: Page,
    modal: Modal,
    basket: Basket,
    order: OrderForm,
    contacts: ContactsForm,
    success: Success,
    preview: RefCell<Option<Card>>,
    submission: RefCell<Option<JoinHandle<Result<OrderReceipt>>>>,
    submitting: Cell<bool>,
}

impl Presenter {
    /// Builds the views and subscribes every handler.
    pub fn new(state: Rc<AppState>, api: Arc<dyn ShopApi>) -> Result<Rc<Self>> {
        let broker = Rc::clone(state.broker());

        let page = {
            let broker = Rc::clone(&broker);
            Page::new(templates::page(), move || {
                broker.emit(names::BASKET_OPEN, Value::Null)
            })?
        };
        let modal = Modal::new(templates::modal(), Rc::clone(&broker))?;
        let basket = {
            let broker = Rc::clone(&broker);
            Basket::new(templates::basket(), move || {
                broker.emit(names::ORDER_OPEN, Value::Null)
            })?
        };
        let order = OrderForm::new(templates::order(), &broker)?;
        let contacts = ContactsForm::new(templates::contacts(), &broker)?;
        let success = Success::new(templates::success(), modal.closer())?;

        let presenter = Rc::new_cyclic(|me| Presenter {
            me: me.clone(),
            broker,
            state,
            api,
            page,
            modal,
            basket,
            order,
            contacts,
            success,
            preview: RefCell::new(None),
            submission: RefCell::new(None),
            submitting: Cell::new(false),
        });
        presenter.wire();
        Ok(presenter)
    }

    pub fn broker(&self) -> &Rc<EventBroker> {
        &self.broker
    }

    pub fn state(&self) -> &Rc<AppState> {
        &self.state
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn modal(&self) -> &Modal {
        &self.modal
    }

    /// Fetches the catalog and applies it in one mutation. On failure state is untouched.
    pub async fn load_catalog(&self) -> Result<usize> {
        match self.api.get_product_list().await {
            Ok(products) => {
                let count = products.len();
                self.state.set_catalog(products);
                let stale = self.state.drop_unresolved_items();
                if !stale.is_empty() {
                    tracing::warn!("⚠️ Dropped basket items no longer in the catalog: {:?}", stale);
                }
                Ok(count)
            }
            Err(e) => {
                tracing::error!("❌ Failed to load catalog: {}", e);
                Err(e)
            }
        }
    }

    /// Submits the current draft. Success clears the basket and shows the
    /// receipt; failure leaves the draft intact for another attempt.
    pub async fn submit_order(&self) -> Result<OrderReceipt> {
        let request = self.state.order_request();
        match self.api.order_products(&request).await {
            Ok(receipt) => {
                self.state.clear_basket();
                let content = self.success.render(SuccessProps {
                    total: Some(receipt.total),
                });
                self.show(content);
                Ok(receipt)
            }
            Err(e) => {
                tracing::error!("❌ Order submission failed: {}", e);
                Err(e)
            }
        }
    }

    /// Handle of the submission started by the last `contacts:submit`.
    pub fn take_submission(&self) -> Option<JoinHandle<Result<OrderReceipt>>> {
        self.submission.borrow_mut().take()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.get()
    }

    fn on(&self, topic: impl Into<Topic>, handler: impl Fn(&Presenter, &Event) + 'static) {
        let me = self.me.clone();
        self.broker.on(topic, move |event| {
            if let Some(presenter) = me.upgrade() {
                handler(&presenter, event);
            }
        });
    }

    fn wire(&self) {
        self.on(names::CATALOG_CHANGED, |p, _| p.render_catalog());

        self.on(names::CARD_SELECT, |p, event| {
            let id = event.payload["id"].as_str().unwrap_or_default();
            match p.state.product(id) {
                Some(product) => p.state.set_preview(&product),
                None => tracing::warn!("Selected unknown product '{}'", id),
            }
        });

        self.on(names::PREVIEW_CHANGED, |p, event| {
            match serde_json::from_value::<Product>(event.payload.clone()) {
                Ok(product) => p.render_preview(&product),
                Err(e) => tracing::warn!("Malformed preview payload: {}", e),
            }
        });

        self.on(names::BASKET_OPEN, |p, _| {
            let content = p.basket.render(p.basket_props());
            p.show(content);
        });

        self.on(names::BASKET_CHANGED, |p, _| {
            p.page.render(PageProps {
                counter: Some(p.state.basket_products().len()),
                ..Default::default()
            });
            p.basket.render(p.basket_props());
            if let Some(card) = p.preview.borrow().as_ref() {
                if let Some(product) = p.state.product(&card.id()) {
                    card.render(CardProps {
                        button: Some(p.button_label(&product).to_string()),
                        ..Default::default()
                    });
                }
            }
        });

        self.on(names::ORDER_OPEN, |p, _| {
            let draft = p.state.order();
            let errors = validate_order(&draft);
            let content = p.order.render(OrderProps {
                valid: Some(errors.messages_for(ORDER_FIELDS).is_empty()),
                errors: Some(Vec::new()),
                payment: Some(draft.payment),
                address: Some(draft.address),
            });
            p.show(content);
        });

        self.on(names::PAYMENT_CHANGE, |p, event| {
            match event.payload["payment"].as_str().unwrap_or_default().parse() {
                Ok(payment) => p.state.set_payment_method(payment),
                Err(e) => tracing::warn!("Ignoring payment change: {}", e),
            }
        });

        self.on(names::ORDER_CHANGED, |p, _| {
            p.order.render(OrderProps {
                payment: Some(p.state.order().payment),
                ..Default::default()
            });
        });

        let field_change = Regex::new(names::FIELD_CHANGE_PATTERN).unwrap();
        self.on(field_change, |p, event| {
            let field = event.payload["field"].as_str().unwrap_or_default();
            let value = event.payload["value"].as_str().unwrap_or_default();
            match field.parse::<OrderField>() {
                Ok(field) => p.state.set_order_field(field, value),
                Err(e) => tracing::warn!("Ignoring '{}': {}", event.name, e),
            }
        });

        self.on(names::VALIDATION_CHANGED, |p, event| {
            let errors: ValidationErrors =
                serde_json::from_value(event.payload.clone()).unwrap_or_default();
            p.render_form_errors(&errors);
        });

        self.on(names::ORDER_READY, |_, _| tracing::debug!("Order draft is complete"));

        self.on(names::ORDER_SUBMIT, |p, _| {
            p.broker.emit(names::CONTACTS_OPEN, Value::Null)
        });

        self.on(names::CONTACTS_OPEN, |p, _| {
            let draft = p.state.order();
            let errors = validate_order(&draft);
            let content = p.contacts.render(ContactsProps {
                valid: Some(errors.messages_for(CONTACTS_FIELDS).is_empty()),
                errors: Some(Vec::new()),
                email: Some(draft.email),
                phone: Some(draft.phone),
            });
            p.show(content);
        });

        self.on(names::CONTACTS_SUBMIT, |p, _| p.spawn_submission());

        self.on(names::MODAL_OPEN, |p, _| {
            p.page.render(PageProps {
                locked: Some(true),
                ..Default::default()
            });
        });

        self.on(names::MODAL_CLOSE, |p, _| {
            p.page.render(PageProps {
                locked: Some(false),
                ..Default::default()
            });
            p.preview.borrow_mut().take();
            p.state.clear_preview();
        });
    }

    fn show(&self, content: Element) {
        let is_preview = self
            .preview
            .borrow()
            .as_ref()
            .is_some_and(|card| card.root().ptr_eq(&content));
        if !is_preview {
            self.preview.borrow_mut().take();
        }
        self.modal.render(ModalProps {
            content: Some(content),
        });
    }

    fn render_catalog(&self) {
        let cards: Vec<Element> = self
            .state
            .catalog()
            .iter()
            .filter_map(|product| {
                let on_click = self.broker.trigger(names::CARD_SELECT, Value::Null);
                match Card::new(templates::card_catalog(), Some(Box::new(on_click))) {
                    Ok(card) => Some(card.render(CardProps::from(product))),
                    Err(e) => {
                        tracing::error!("Cannot build catalog card: {}", e);
                        None
                    }
                }
            })
            .collect();

        self.page.render(PageProps {
            counter: Some(self.state.basket_products().len()),
            catalog: Some(cards),
            ..Default::default()
        });
    }

    fn render_preview(&self, product: &Product) {
        let me = self.me.clone();
        let on_click = move |payload: Value| {
            if let (Some(p), Some(id)) = (me.upgrade(), payload["id"].as_str()) {
                p.toggle_from_preview(id);
            }
        };

        let card = match Card::new(templates::card_preview(), Some(Box::new(on_click))) {
            Ok(card) => card,
            Err(e) => {
                tracing::error!("Cannot build preview card: {}", e);
                return;
            }
        };
        let content = card.render(CardProps {
            button: Some(self.button_label(product).to_string()),
            ..CardProps::from(product)
        });

        *self.preview.borrow_mut() = Some(card);
        self.show(content);
    }

    fn toggle_from_preview(&self, id: &str) {
        let Some(product) = self.state.product(id) else {
            return;
        };
        if product.is_priceless() {
            tracing::debug!("'{}' is priceless and cannot be bought", product.title);
            return;
        }
        let included = !self.state.is_in_basket(id);
        self.state.toggle_basket_item(id, included);
    }

    fn button_label(&self, product: &Product) -> &'static str {
        if product.is_priceless() {
            NOT_FOR_SALE_LABEL
        } else if self.state.is_in_basket(&product.id) {
            REMOVE_LABEL
        } else {
            BUY_LABEL
        }
    }

    fn basket_props(&self) -> BasketProps {
        let items = self
            .state
            .basket_products()
            .iter()
            .enumerate()
            .filter_map(|(index, product)| {
                let state = Rc::clone(&self.state);
                let on_delete = move |payload: Value| {
                    if let Some(id) = payload["id"].as_str() {
                        state.toggle_basket_item(id, false);
                    }
                };
                let card = Card::new(templates::card_basket(), Some(Box::new(on_delete))).ok()?;
                Some(card.render(CardProps {
                    basket_index: Some(index + 1),
                    ..CardProps::from(product)
                }))
            })
            .collect();

        BasketProps {
            items: Some(items),
            total: Some(self.state.order().total),
        }
    }

    fn render_form_errors(&self, errors: &ValidationErrors) {
        let order_errors: Vec<String> = errors
            .messages_for(ORDER_FIELDS)
            .into_iter()
            .map(String::from)
            .collect();
        let contacts_errors: Vec<String> = errors
            .messages_for(CONTACTS_FIELDS)
            .into_iter()
            .map(String::from)
            .collect();

        self.order.render(OrderProps {
            valid: Some(order_errors.is_empty()),
            errors: Some(order_errors),
            ..Default::default()
        });
        self.contacts.render(ContactsProps {
            valid: Some(contacts_errors.is_empty()),
            errors: Some(contacts_errors),
            ..Default::default()
        });
    }

    /// At most one submission is in flight; the pay button stays disabled until it settles.
    fn spawn_submission(&self) {
        if self.submitting.get() {
            tracing::warn!("Order submission already in progress, ignoring");
            return;
        }
        let Some(presenter) = self.me.upgrade() else {
            return;
        };

        self.submitting.set(true);
        self.contacts.render(ContactsProps {
            valid: Some(false),
            ..Default::default()
        });

        let handle = tokio::task::spawn_local(async move {
            let result = presenter.submit_order().await;
            presenter.submitting.set(false);
            if result.is_err() {
                let errors = presenter.state.form_errors();
                presenter.contacts.render(ContactsProps {
                    valid: Some(errors.messages_for(CONTACTS_FIELDS).is_empty()),
                    ..Default::default()
                });
            }
            result
        });
        *self.submission.borrow_mut() = Some(handle);
    }
}
