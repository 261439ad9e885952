use anyhow::{anyhow, bail, Context};
use clap::Parser;
use serde_json::{json, Value};
use small_shop::components::{format_price, Element};
use small_shop::config::cli::Command;
use small_shop::core::{names, ConfigProvider, PaymentMethod};
use small_shop::utils::{logger, validation::Validate};
use small_shop::{
    AppState, CliConfig, EventBroker, HttpShopApi, LocalStorage, Presenter, ShopConfig, ShopError,
};
use std::rc::Rc;
use std::sync::Arc;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting small-shop CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    // Order submission is spawned with spawn_local
    let local = tokio::task::LocalSet::new();
    if let Err(e) = local.run_until(run(&cli.command, &*config)).await {
        tracing::error!("❌ Command failed: {:#}", e);

        let exit_code = match e.downcast_ref::<ShopError>() {
            Some(shop_error) => {
                eprintln!("❌ {}", shop_error.user_friendly_message());
                if shop_error.is_retryable() {
                    2
                } else {
                    1
                }
            }
            None => {
                eprintln!("❌ {:#}", e);
                1
            }
        };
        std::process::exit(exit_code);
    }
}

fn load_config(cli: &CliConfig) -> small_shop::Result<Box<dyn ConfigProvider>> {
    match &cli.config {
        Some(path) => {
            tracing::info!("📄 Loading configuration from {}", path);
            let config = ShopConfig::from_file(path)?;
            config.validate()?;
            Ok(Box::new(config))
        }
        None => {
            cli.validate()?;
            Ok(Box::new(cli.clone()))
        }
    }
}

async fn run(command: &Command, config: &dyn ConfigProvider) -> anyhow::Result<()> {
    let broker = Rc::new(EventBroker::new());
    broker.on_all(|event| {
        tracing::debug!(event = %event.name, payload = %event.payload, "event dispatched");
    });

    let store = LocalStorage::new(
        config.storage_path().to_string(),
        config.basket_key().to_string(),
    );
    let state = Rc::new(AppState::new(Rc::clone(&broker), Box::new(store)));
    let api = Arc::new(HttpShopApi::from_config(config)?);
    let presenter = Presenter::new(state, api)?;

    let count = presenter
        .load_catalog()
        .await
        .context("could not load the catalog")?;
    tracing::info!("✅ Catalog loaded: {} products", count);

    match command {
        Command::Catalog => print_catalog(&presenter),
        Command::Add { id } => set_in_basket(&presenter, id, true)?,
        Command::Remove { id } => set_in_basket(&presenter, id, false)?,
        Command::Basket => {
            presenter.broker().emit(names::BASKET_OPEN, Value::Null);
            print!("{}", modal_content(&presenter)?.to_text());
        }
        Command::Checkout {
            payment,
            address,
            email,
            phone,
        } => {
            let payment: PaymentMethod = payment.parse()?;
            checkout(&presenter, payment, address, email, phone).await?;
        }
    }

    Ok(())
}

fn modal_content(presenter: &Presenter) -> anyhow::Result<Element> {
    presenter
        .modal()
        .content()
        .ok_or_else(|| anyhow!("nothing is shown in the modal"))
}

fn print_catalog(presenter: &Presenter) {
    let state = presenter.state();
    for product in state.catalog() {
        let marker = if state.is_in_basket(&product.id) { "*" } else { " " };
        println!(
            "{} {}  {:<32} {:<12} {}",
            marker,
            product.id,
            product.title,
            product.category.label(),
            format_price(product.price)
        );
    }
    println!("Basket: {} item(s)", state.basket_items().len());
}

/// Opens the product preview and presses its button if the basket needs to change.
fn set_in_basket(presenter: &Presenter, id: &str, included: bool) -> anyhow::Result<()> {
    let state = presenter.state();
    let product = state.product(id).ok_or_else(|| ShopError::LookupError {
        id: id.to_string(),
    })?;

    presenter
        .broker()
        .emit(names::CARD_SELECT, json!({ "id": id }));
    if state.is_in_basket(id) != included {
        modal_content(presenter)?.ensure(".card__button")?.click();
    }
    presenter.modal().close();

    if state.is_in_basket(id) != included {
        println!("⚠️ '{}' is not for sale", product.title);
    } else if included {
        println!("✅ '{}' is in the basket", product.title);
    } else {
        println!("✅ '{}' removed from the basket", product.title);
    }
    println!(
        "Basket: {} item(s), {}",
        state.basket_items().len(),
        format_price(state.get_total())
    );
    Ok(())
}

async fn checkout(
    presenter: &Presenter,
    payment: PaymentMethod,
    address: &str,
    email: &str,
    phone: &str,
) -> anyhow::Result<()> {
    if presenter.state().basket_items().is_empty() {
        println!("Basket is empty, nothing to check out");
        return Ok(());
    }

    presenter.broker().emit(names::BASKET_OPEN, Value::Null);
    modal_content(presenter)?.ensure(".basket__button")?.click();

    let order = modal_content(presenter)?;
    order.ensure(&format!("[name={}]", payment.as_str()))?.click();
    order.ensure("[name=address]")?.input(address);
    order.ensure("[type=submit]")?.click();

    let contacts = modal_content(presenter)?;
    if contacts.ptr_eq(&order) {
        bail!("order form rejected: {}", order.ensure(".form__errors")?.text());
    }
    contacts.ensure("[name=email]")?.input(email);
    contacts.ensure("[name=phone]")?.input(phone);
    contacts.ensure("[type=submit]")?.click();

    let Some(submission) = presenter.take_submission() else {
        bail!(
            "contacts form rejected: {}",
            contacts.ensure(".form__errors")?.text()
        );
    };
    let receipt = submission.await.context("order submission task failed")??;

    println!("✅ Order {} placed", receipt.order_id);
    print!("{}", modal_content(presenter)?.to_text());
    Ok(())
}
