//! Application state: catalog, basket, order draft, validation and preview.
//!
//! Every mutation goes through [`AppState`], and only [`AppState`] emits the
//! domain-change events. Borrows are always released before emitting so that
//! handlers may read state (or mutate it again) during dispatch.

use serde::Serialize;
use serde_json::{json, Value};
use std::cell::RefCell;
use std::rc::Rc;

use crate::core::events::{names, EventBroker, Payload};
use crate::domain::model::{
    OrderDraft, OrderField, OrderRequest, PaymentMethod, Product, ValidationErrors,
};
use crate::domain::ports::BasketStore;
use crate::utils::validation::validate_order;

pub struct AppState {
    broker: Rc<EventBroker>,
    store: Box<dyn BasketStore>,
    catalog: RefCell<Vec<Product>>,
    order: RefCell<OrderDraft>,
    preview: RefCell<Option<String>>,
    form_errors: RefCell<ValidationErrors>,
}

impl AppState {
    /// Reads the basket snapshot once; a missing or unreadable slot yields an empty basket.
    pub fn new(broker: Rc<EventBroker>, store: Box<dyn BasketStore>) -> Self {
        let items = match store.load() {
            Ok(Some(items)) => dedup(items),
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!("Could not restore basket snapshot: {}", e);
                Vec::new()
            }
        };
        if !items.is_empty() {
            tracing::debug!("Restored {} basket items from snapshot", items.len());
        }

        Self {
            broker,
            store,
            catalog: RefCell::new(Vec::new()),
            order: RefCell::new(OrderDraft {
                items,
                ..Default::default()
            }),
            preview: RefCell::new(None),
            form_errors: RefCell::new(ValidationErrors::default()),
        }
    }

    pub fn broker(&self) -> &Rc<EventBroker> {
        &self.broker
    }

    /// Basket entries are kept even if the new catalog no longer lists them.
    pub fn set_catalog(&self, products: Vec<Product>) {
        *self.catalog.borrow_mut() = products;
        let total = self.get_total();
        self.order.borrow_mut().total = total;

        let payload = json!({ "catalog": to_payload(&*self.catalog.borrow()) });
        self.broker.emit(names::CATALOG_CHANGED, payload);
    }

    pub fn set_preview(&self, product: &Product) {
        *self.preview.borrow_mut() = Some(product.id.clone());
        self.broker.emit(names::PREVIEW_CHANGED, to_payload(product));
    }

    /// Dismissing the detail view is the caller's business.
    pub fn clear_preview(&self) {
        self.preview.borrow_mut().take();
    }

    pub fn toggle_basket_item(&self, id: &str, included: bool) {
        let items = {
            let mut order = self.order.borrow_mut();
            if included {
                if !order.items.iter().any(|item| item == id) {
                    order.items.push(id.to_string());
                }
            } else {
                order.items.retain(|item| item != id);
            }
            order.items.clone()
        };

        let total = self.sum_prices(&items);
        self.order.borrow_mut().total = total;

        if let Err(e) = self.store.save(&items) {
            tracing::error!("Failed to persist basket snapshot: {}", e);
        }

        self.broker.emit(names::BASKET_CHANGED, Value::Null);
    }

    pub fn clear_basket(&self) {
        let items = self.basket_items();
        for id in &items {
            self.toggle_basket_item(id, false);
        }

        let total = self.get_total();
        {
            let mut order = self.order.borrow_mut();
            order.payment = PaymentMethod::default();
            order.address.clear();
            order.email.clear();
            order.phone.clear();
            order.total = total;
        }
        self.validate();
    }

    /// Removes basket ids the current catalog does not list, persisting once.
    /// Returns the removed ids.
    pub fn drop_unresolved_items(&self) -> Vec<String> {
        let stale = self.unresolved_items();
        if stale.is_empty() {
            return stale;
        }

        let items = {
            let mut order = self.order.borrow_mut();
            order.items.retain(|item| !stale.contains(item));
            order.items.clone()
        };
        let total = self.sum_prices(&items);
        self.order.borrow_mut().total = total;

        if let Err(e) = self.store.save(&items) {
            tracing::error!("Failed to persist basket snapshot: {}", e);
        }

        self.broker.emit(names::BASKET_CHANGED, Value::Null);
        stale
    }

    /// Emits `order-ready` after `validation-changed` when the draft became valid.
    pub fn set_order_field(&self, field: OrderField, value: impl Into<String>) {
        self.order.borrow_mut().set_field(field, value.into());
        if self.validate() {
            let draft = self.order();
            self.broker.emit(names::ORDER_READY, to_payload(&draft));
        }
    }

    pub fn set_payment_method(&self, payment: PaymentMethod) {
        self.order.borrow_mut().payment = payment;
        self.broker
            .emit(names::ORDER_CHANGED, json!({ "payment": payment.as_str() }));
    }

    /// Recomputes form errors, always emits `validation-changed`, returns validity.
    pub fn validate(&self) -> bool {
        let errors = validate_order(&self.order.borrow());
        let valid = errors.is_empty();
        let payload = to_payload(&errors);
        *self.form_errors.borrow_mut() = errors;

        self.broker.emit(names::VALIDATION_CHANGED, payload);
        valid
    }

    /// Sum of catalog prices for basket ids. Ids missing from the catalog count
    /// as zero and are reported.
    pub fn get_total(&self) -> u64 {
        let items = self.basket_items();
        self.sum_prices(&items)
    }

    pub fn catalog(&self) -> Vec<Product> {
        self.catalog.borrow().clone()
    }

    pub fn product(&self, id: &str) -> Option<Product> {
        self.catalog.borrow().iter().find(|p| p.id == id).cloned()
    }

    pub fn basket_items(&self) -> Vec<String> {
        self.order.borrow().items.clone()
    }

    pub fn is_in_basket(&self, id: &str) -> bool {
        self.order.borrow().items.iter().any(|item| item == id)
    }

    /// Basket products in display order; unresolved ids are skipped.
    pub fn basket_products(&self) -> Vec<Product> {
        let catalog = self.catalog.borrow();
        self.order
            .borrow()
            .items
            .iter()
            .filter_map(|id| catalog.iter().find(|p| &p.id == id).cloned())
            .collect()
    }

    /// Basket ids with no catalog entry.
    pub fn unresolved_items(&self) -> Vec<String> {
        let catalog = self.catalog.borrow();
        self.order
            .borrow()
            .items
            .iter()
            .filter(|id| !catalog.iter().any(|p| &p.id == *id))
            .cloned()
            .collect()
    }

    pub fn order(&self) -> OrderDraft {
        self.order.borrow().clone()
    }

    /// Submission payload. Only ids the catalog resolves are sent, so `items`
    /// always agrees with `total`.
    pub fn order_request(&self) -> OrderRequest {
        let mut request = OrderRequest::from(&*self.order.borrow());
        let catalog = self.catalog.borrow();
        request
            .items
            .retain(|id| catalog.iter().any(|p| &p.id == id));
        request
    }

    pub fn form_errors(&self) -> ValidationErrors {
        self.form_errors.borrow().clone()
    }

    pub fn preview(&self) -> Option<String> {
        self.preview.borrow().clone()
    }

    fn sum_prices(&self, items: &[String]) -> u64 {
        let catalog = self.catalog.borrow();
        if catalog.is_empty() {
            return 0;
        }

        items
            .iter()
            .map(|id| match catalog.iter().find(|p| &p.id == id) {
                Some(product) => product.price,
                None => {
                    tracing::warn!("Basket item '{}' has no catalog entry; counting it as 0", id);
                    0
                }
            })
            .fold(0u64, u64::saturating_add)
    }
}

fn to_payload<T: Serialize + ?Sized>(value: &T) -> Payload {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

fn dedup(items: Vec<String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        if !unique.contains(&item) {
            unique.push(item);
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::MemoryStorage;
    use crate::domain::model::Category;
    use crate::utils::validation::EMAIL_FORMAT;
    use std::cell::RefCell;

    fn product(id: &str, price: u64) -> Product {
        Product {
            id: id.to_string(),
            title: format!("Product {}", id),
            description: String::new(),
            image: format!("https://cdn.test/{}.svg", id),
            category: Category::Other,
            price,
        }
    }

    fn setup() -> (Rc<EventBroker>, MemoryStorage, AppState) {
        let broker = Rc::new(EventBroker::new());
        let storage = MemoryStorage::new();
        let state = AppState::new(broker.clone(), Box::new(storage.clone()));
        (broker, storage, state)
    }

    fn record_events(broker: &EventBroker) -> Rc<RefCell<Vec<String>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = log.clone();
        broker.on_all(move |event| sink.borrow_mut().push(event.name.clone()));
        log
    }

    #[test]
    fn test_total_follows_basket() {
        let (_broker, _storage, state) = setup();
        state.set_catalog(vec![product("p1", 100)]);

        state.toggle_basket_item("p1", true);
        assert_eq!(state.get_total(), 100);
        assert_eq!(state.order().total, 100);

        state.toggle_basket_item("p1", false);
        assert_eq!(state.get_total(), 0);
        assert_eq!(state.order().total, 0);
    }

    #[test]
    fn test_adding_twice_is_idempotent() {
        let (_broker, _storage, state) = setup();
        state.set_catalog(vec![product("p1", 100), product("p2", 50)]);

        state.toggle_basket_item("p1", true);
        state.toggle_basket_item("p2", true);
        let before = state.order();
        state.toggle_basket_item("p1", true);

        assert_eq!(state.order(), before);
        assert_eq!(state.basket_items(), vec!["p1", "p2"]);
        assert_eq!(state.order().total, 150);

        state.toggle_basket_item("p3", false);
        assert_eq!(state.basket_items(), vec!["p1", "p2"]);
    }

    #[test]
    fn test_snapshot_mirrors_basket() {
        let (_broker, storage, state) = setup();
        state.set_catalog(vec![product("p1", 100), product("p2", 50)]);

        state.toggle_basket_item("p1", true);
        state.toggle_basket_item("p2", true);
        state.toggle_basket_item("p1", false);

        assert_eq!(storage.load().unwrap(), Some(vec!["p2".to_string()]));
    }

    #[test]
    fn test_basket_restored_from_snapshot() {
        let broker = Rc::new(EventBroker::new());
        let storage = MemoryStorage::new();
        storage
            .save(&["p2".to_string(), "p1".to_string(), "p2".to_string()])
            .unwrap();

        let state = AppState::new(broker, Box::new(storage));
        assert_eq!(state.basket_items(), vec!["p2", "p1"]);
        assert_eq!(state.get_total(), 0);

        state.set_catalog(vec![product("p1", 100), product("p2", 50)]);
        assert_eq!(state.order().total, 150);
    }

    #[test]
    fn test_stale_basket_ids_are_kept_and_counted_as_zero() {
        let (_broker, _storage, state) = setup();
        state.set_catalog(vec![product("p1", 100), product("p2", 50)]);
        state.toggle_basket_item("p1", true);
        state.toggle_basket_item("p2", true);

        state.set_catalog(vec![product("p2", 70)]);

        assert_eq!(state.basket_items(), vec!["p1", "p2"]);
        assert_eq!(state.unresolved_items(), vec!["p1"]);
        assert_eq!(state.get_total(), 70);
        assert_eq!(state.basket_products(), vec![product("p2", 70)]);
    }

    #[test]
    fn test_clear_basket_resets_draft() {
        let (broker, storage, state) = setup();
        state.set_catalog(vec![product("p1", 100), product("p2", 50)]);
        state.toggle_basket_item("p1", true);
        state.toggle_basket_item("p2", true);
        state.set_payment_method(PaymentMethod::Cash);
        state.set_order_field(OrderField::Address, "Main st 1");
        state.set_order_field(OrderField::Email, "a@b.co");
        state.set_order_field(OrderField::Phone, "+7999");

        let log = record_events(&broker);
        state.clear_basket();

        let order = state.order();
        assert!(order.items.is_empty());
        assert_eq!(order.total, 0);
        assert_eq!(order.payment, PaymentMethod::Card);
        assert!(order.address.is_empty() && order.email.is_empty() && order.phone.is_empty());
        assert_eq!(storage.load().unwrap(), Some(Vec::new()));
        assert_eq!(
            *log.borrow(),
            vec![
                names::BASKET_CHANGED,
                names::BASKET_CHANGED,
                names::VALIDATION_CHANGED
            ]
        );

        let errors = state.form_errors();
        assert_eq!(errors.len(), 3);
        assert_eq!(errors, validate_order(&order));
    }

    #[test]
    fn test_order_request_skips_unresolved_ids() {
        let broker = Rc::new(EventBroker::new());
        let storage = MemoryStorage::new();
        storage
            .save(&["gone".to_string(), "p1".to_string()])
            .unwrap();
        let state = AppState::new(broker, Box::new(storage.clone()));

        state.set_catalog(vec![product("p1", 750)]);
        assert_eq!(state.basket_items(), vec!["gone", "p1"]);

        let request = state.order_request();
        assert_eq!(request.items, vec!["p1"]);
        assert_eq!(request.total, 750);
    }

    #[test]
    fn test_drop_unresolved_items_persists_once() {
        let (broker, storage, state) = setup();
        state.set_catalog(vec![product("p1", 100), product("p2", 50)]);
        state.toggle_basket_item("p1", true);
        state.toggle_basket_item("p2", true);
        state.set_catalog(vec![product("p2", 50)]);

        let log = record_events(&broker);
        assert_eq!(state.drop_unresolved_items(), vec!["p1"]);
        assert_eq!(state.basket_items(), vec!["p2"]);
        assert_eq!(state.order().total, 50);
        assert_eq!(storage.load().unwrap(), Some(vec!["p2".to_string()]));
        assert_eq!(*log.borrow(), vec![names::BASKET_CHANGED]);

        assert!(state.drop_unresolved_items().is_empty());
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn test_huge_prices_saturate_instead_of_overflowing() {
        let (_broker, _storage, state) = setup();
        state.set_catalog(vec![product("p1", u64::MAX), product("p2", 10)]);
        state.toggle_basket_item("p1", true);
        state.toggle_basket_item("p2", true);
        assert_eq!(state.get_total(), u64::MAX);
    }

    #[test]
    fn test_validate_emits_errors() {
        let (broker, _storage, state) = setup();
        let payloads = Rc::new(RefCell::new(Vec::new()));
        {
            let payloads = payloads.clone();
            broker.on(names::VALIDATION_CHANGED, move |event| {
                payloads.borrow_mut().push(event.payload.clone())
            });
        }

        assert!(!state.validate());
        assert_eq!(state.form_errors().len(), 3);

        state.set_order_field(OrderField::Email, "bad");
        let errors = state.form_errors();
        assert_eq!(errors.get(OrderField::Email), Some(EMAIL_FORMAT));
        assert_eq!(payloads.borrow().len(), 2);
        assert_eq!(payloads.borrow()[1]["email"], EMAIL_FORMAT);
    }

    #[test]
    fn test_order_ready_follows_validation() {
        let (broker, _storage, state) = setup();
        state.set_order_field(OrderField::Address, "Main st 1");
        state.set_order_field(OrderField::Phone, "+123");

        let log = record_events(&broker);
        let ready = Rc::new(RefCell::new(None));
        {
            let ready = ready.clone();
            broker.on(names::ORDER_READY, move |event| {
                *ready.borrow_mut() = Some(event.payload.clone())
            });
        }

        state.set_order_field(OrderField::Email, "x@y.com");

        assert_eq!(*log.borrow(), vec![names::VALIDATION_CHANGED, names::ORDER_READY]);
        let draft: OrderDraft = serde_json::from_value(ready.borrow().clone().unwrap()).unwrap();
        assert_eq!(draft.email, "x@y.com");
        assert!(state.form_errors().is_empty());
    }

    #[test]
    fn test_preview_and_payment_events() {
        let (broker, _storage, state) = setup();
        let log = record_events(&broker);

        state.set_preview(&product("p1", 10));
        state.set_payment_method(PaymentMethod::Cash);

        assert_eq!(state.preview().as_deref(), Some("p1"));
        assert_eq!(state.order().payment, PaymentMethod::Cash);
        assert_eq!(*log.borrow(), vec![names::PREVIEW_CHANGED, names::ORDER_CHANGED]);

        state.clear_preview();
        assert!(state.preview().is_none());
    }

    #[test]
    fn test_handlers_may_read_state_during_dispatch() {
        let (broker, _storage, state) = setup();
        let state = Rc::new(state);
        state.set_catalog(vec![product("p1", 100)]);

        let seen = Rc::new(RefCell::new(0));
        {
            let reader = state.clone();
            let seen = seen.clone();
            broker.on(names::BASKET_CHANGED, move |_| *seen.borrow_mut() = reader.order().total);
        }

        state.toggle_basket_item("p1", true);
        assert_eq!(*seen.borrow(), 100);
    }
}
