use async_trait::async_trait;
use serde_json::json;
use small_shop::components::card::NOT_FOR_SALE_LABEL;
use small_shop::components::Component;
use small_shop::core::{names, BasketStore, Product, ShopApi};
use small_shop::domain::model::{Category, OrderReceipt, OrderRequest};
use small_shop::{AppState, EventBroker, MemoryStorage, Presenter, Result, ShopError};
use std::rc::Rc;
use std::sync::{Arc, Mutex};

struct StubApi {
    products: Vec<Product>,
    orders: Mutex<Vec<OrderRequest>>,
}

#[async_trait]
impl ShopApi for StubApi {
    async fn get_product_list(&self) -> Result<Vec<Product>> {
        Ok(self.products.clone())
    }

    async fn get_product_item(&self, id: &str) -> Result<Product> {
        self.products
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| ShopError::LookupError { id: id.to_string() })
    }

    async fn order_products(&self, order: &OrderRequest) -> Result<OrderReceipt> {
        self.orders.lock().unwrap().push(order.clone());
        Ok(OrderReceipt {
            order_id: "stub".to_string(),
            total: order.total,
        })
    }
}

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

fn stub_api() -> Arc<StubApi> {
    Arc::new(StubApi {
        products: vec![product("p1", 750), product("p2", 0)],
        orders: Mutex::new(Vec::new()),
    })
}

fn presenter_with(store: MemoryStorage, api: Arc<StubApi>) -> Rc<Presenter> {
    let broker = Rc::new(EventBroker::new());
    let state = Rc::new(AppState::new(broker, Box::new(store)));
    Presenter::new(state, api).unwrap()
}

#[test]
fn test_priceless_product_cannot_be_bought() {
    let store = MemoryStorage::new();
    let presenter = presenter_with(store.clone(), stub_api());
    tokio_test::block_on(presenter.load_catalog()).unwrap();

    presenter
        .broker()
        .emit(names::CARD_SELECT, json!({ "id": "p2" }));
    let content = presenter.modal().content().unwrap();
    let button = content.query(".card__button").unwrap();
    assert_eq!(button.text(), NOT_FOR_SALE_LABEL);
    assert!(button.is_disabled());

    button.click();
    assert!(presenter.state().basket_items().is_empty());
    assert!(store.raw().is_none());
}

#[test]
fn test_stale_snapshot_ids_are_dropped_on_catalog_load() {
    let store = MemoryStorage::new();
    store
        .save(&["gone".to_string(), "p1".to_string(), "p1".to_string()])
        .unwrap();

    let api = stub_api();
    let presenter = presenter_with(store.clone(), api.clone());
    assert_eq!(
        presenter.state().basket_items(),
        vec!["gone".to_string(), "p1".to_string()]
    );

    tokio_test::block_on(presenter.load_catalog()).unwrap();
    let state = presenter.state();
    assert_eq!(state.basket_items(), vec!["p1".to_string()]);
    assert!(state.unresolved_items().is_empty());
    assert_eq!(state.get_total(), 750);
    assert_eq!(store.raw().as_deref(), Some(r#"["p1"]"#));
    assert_eq!(
        presenter
            .page()
            .root()
            .query(".header__basket-counter")
            .unwrap()
            .text(),
        "1"
    );

    state.set_order_field("address".parse().unwrap(), "Main st 1");
    state.set_order_field("email".parse().unwrap(), "a@b.co");
    state.set_order_field("phone".parse().unwrap(), "+7999");
    let receipt = tokio_test::block_on(presenter.submit_order()).unwrap();
    assert_eq!(receipt.total, 750);

    let orders = api.orders.lock().unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].items, vec!["p1".to_string()]);
    assert_eq!(orders[0].total, 750);
}
