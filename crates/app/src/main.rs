//! Valet point-of-sale CLI

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
    process,
};

use clap::{Args, Parser, Subcommand};
use jiff::Zoned;
use tracing::info;
use valet::{
    catalog::Catalog,
    checkout::PaymentMethod,
    customers::Customer,
    delivery::DeliveryInfo,
    invoices::InvoiceDraft,
    orders::OrderId,
    receipt::Receipt,
};
use valet_app::{
    api::CustomersService,
    cart_file::CartFile,
    config::AppConfig,
    context::AppContext,
    observability,
};

#[derive(Debug, Parser)]
#[command(name = "valet", about = "Valet point-of-sale CLI", long_about = None)]
struct Cli {
    #[command(flatten)]
    config: AppConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Price a cart file offline against a catalog file
    Quote(QuoteArgs),

    /// Check out a cart file against the API
    Checkout(CheckoutArgs),

    /// Move an order to its next status
    Advance(OrderArgs),

    /// Cancel an order
    Cancel(OrderArgs),

    /// Replace an order's pickup/delivery schedule from a YAML file
    Delivery(DeliveryArgs),
}

#[derive(Debug, Args)]
struct QuoteArgs {
    /// Cart file (YAML)
    cart: PathBuf,

    /// Catalog file (YAML, top-level `items`)
    #[arg(long, env = "VALET_CATALOG_FILE")]
    catalog: PathBuf,
}

#[derive(Debug, Args)]
struct CheckoutArgs {
    /// Cart file (YAML)
    cart: PathBuf,

    /// Payment method (cash, card, bank_transfer, pay_on_collection, invoice)
    #[arg(long, value_parser = parse_method)]
    method: PaymentMethod,
}

#[derive(Debug, Args)]
struct OrderArgs {
    /// Order id
    order_id: String,
}

#[derive(Debug, Args)]
struct DeliveryArgs {
    /// Order id
    order_id: String,

    /// Delivery schedule (YAML)
    schedule: PathBuf,
}

fn parse_method(name: &str) -> Result<PaymentMethod, String> {
    PaymentMethod::from_name(name).ok_or_else(|| format!("unknown payment method: {name}"))
}

#[tokio::main]
pub async fn main() {
    let _env = dotenvy::dotenv();

    let cli = Cli::parse();

    if let Err(error) = run(cli).await {
        eprintln!("{error}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), String> {
    observability::init(&cli.config.logging)
        .map_err(|error| format!("failed to initialise logging: {error}"))?;

    match cli.command {
        Commands::Quote(args) => quote(&cli.config, &args),
        Commands::Checkout(args) => checkout(&cli.config, args).await,
        Commands::Advance(args) => advance(&cli.config, args).await,
        Commands::Cancel(args) => cancel(&cli.config, args).await,
        Commands::Delivery(args) => delivery(&cli.config, args).await,
    }
}

fn read(path: &Path) -> Result<String, String> {
    fs::read_to_string(path).map_err(|error| format!("failed to read {}: {error}", path.display()))
}

fn context(config: &AppConfig) -> Result<AppContext, String> {
    AppContext::from_api_config(&config.api).map_err(|error| error.to_string())
}

fn quote(config: &AppConfig, args: &QuoteArgs) -> Result<(), String> {
    let catalog = Catalog::from_yaml(&read(&args.catalog)?).map_err(|error| error.to_string())?;
    let pricing = config.pricing.resolve(None).map_err(|error| error.to_string())?;

    let cart = CartFile::from_yaml(&read(&args.cart)?)
        .and_then(|file| file.into_cart(&catalog))
        .map_err(|error| error.to_string())?;

    let totals = cart.totals(&catalog, &pricing);

    Receipt::quote(&cart, &totals, pricing.currency())
        .and_then(|receipt| receipt.write_to(io::stdout().lock()))
        .map_err(|error| format!("failed to print quote: {error}"))
}

async fn checkout(config: &AppConfig, args: CheckoutArgs) -> Result<(), String> {
    let ctx = context(config)?;

    let shop = ctx
        .settings
        .fetch_settings()
        .await
        .map_err(|error| format!("failed to fetch settings: {error}"))?;

    let pricing = config
        .pricing
        .resolve(Some(&shop))
        .map_err(|error| error.to_string())?;

    let catalog = ctx
        .catalog
        .fetch_catalog()
        .await
        .map_err(|error| format!("failed to fetch catalog: {error}"))?;

    let mut cart = CartFile::from_yaml(&read(&args.cart)?)
        .and_then(|file| file.into_cart(&catalog))
        .map_err(|error| error.to_string())?;

    if let Some(selected) = cart.customer().cloned() {
        let current = refresh_customer(ctx.customers.as_ref(), &selected).await?;
        cart.set_customer(Some(current));
    }

    let customer = cart.customer().cloned();

    let outcome = ctx
        .checkout_service(config.pricing.auto_print(Some(&shop)))
        .checkout(&mut cart, &pricing, &catalog, args.method)
        .await
        .map_err(|error| format!("checkout failed: {error}"))?;

    let mut out = io::stdout().lock();
    let write_error = |error: io::Error| error.to_string();

    writeln!(out, "order: {}", outcome.order.order_number).map_err(write_error)?;
    writeln!(out, "total: {}", outcome.order.total).map_err(write_error)?;
    writeln!(out, "payment: {:?}", outcome.payment.status).map_err(write_error)?;

    if let Some(url) = &outcome.redirect_url {
        writeln!(out, "complete card payment at: {url}").map_err(write_error)?;
    }

    if let (PaymentMethod::Invoice, Some(customer)) = (args.method, customer) {
        let draft = InvoiceDraft::for_order(&outcome.order, &customer, Zoned::now().date())
            .map_err(|error| error.to_string())?;

        writeln!(out, "invoice due: {}", draft.due_date).map_err(write_error)?;
    }

    Ok(())
}

/// Re-read the customer so blacklist and payment flags are current.
async fn refresh_customer(
    customers: &dyn CustomersService,
    selected: &Customer,
) -> Result<Customer, String> {
    customers
        .get_customer(&selected.id)
        .await
        .map_err(|error| format!("failed to look up customer {}: {error}", selected.id))
}

async fn advance(config: &AppConfig, args: OrderArgs) -> Result<(), String> {
    let ctx = context(config)?;
    let id = OrderId::new(args.order_id);

    let order = ctx
        .orders
        .get_order(&id)
        .await
        .map_err(|error| format!("failed to fetch order: {error}"))?;

    let updated = ctx
        .checkout_service(false)
        .advance_order(&order, order.fulfilment())
        .await
        .map_err(|error| error.to_string())?;

    info!(order_id = %updated.id, status = %updated.status, "order advanced");

    writeln!(io::stdout(), "{}: {}", updated.order_number, updated.status)
        .map_err(|error| error.to_string())
}

async fn cancel(config: &AppConfig, args: OrderArgs) -> Result<(), String> {
    let ctx = context(config)?;
    let id = OrderId::new(args.order_id);

    let order = ctx
        .orders
        .get_order(&id)
        .await
        .map_err(|error| format!("failed to fetch order: {error}"))?;

    let updated = ctx
        .checkout_service(false)
        .cancel_order(&order)
        .await
        .map_err(|error| error.to_string())?;

    writeln!(io::stdout(), "{}: {}", updated.order_number, updated.status)
        .map_err(|error| error.to_string())
}

async fn delivery(config: &AppConfig, args: DeliveryArgs) -> Result<(), String> {
    let ctx = context(config)?;

    let schedule: DeliveryInfo = serde_norway::from_str(&read(&args.schedule)?)
        .map_err(|error| format!("failed to parse schedule: {error}"))?;

    let updated = ctx
        .checkout_service(false)
        .update_delivery(&OrderId::new(args.order_id), &schedule)
        .await
        .map_err(|error| error.to_string())?;

    writeln!(
        io::stdout(),
        "{}: {:?} scheduled",
        updated.order_number,
        updated.fulfilment()
    )
    .map_err(|error| error.to_string())
}
