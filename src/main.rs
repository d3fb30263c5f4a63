use clap::Parser;
use gamecart::application::checkout::CheckoutController;
use gamecart::application::config::CheckoutConfig;
use gamecart::domain::cart::Cart;
use gamecart::domain::ports::{OrderStoreHandle, PaymentGatewayHandle};
use gamecart::domain::workflow::{CheckoutOutcome, CheckoutStep};
use gamecart::infrastructure::gateway::SimulatedGateway;
use gamecart::infrastructure::in_memory::InMemoryOrderStore;
use gamecart::interfaces::csv::cart_reader::CartReader;
use gamecart::interfaces::csv::outcome_writer::OutcomeWriter;
use gamecart::interfaces::json::catalog_reader::CatalogReader;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Cart CSV file
    input: PathBuf,

    /// Catalog JSON. When given, the cart file lists `game,package,quantity` selections.
    #[arg(long, env = "GAMECART_CATALOG")]
    catalog: Option<PathBuf>,

    /// Path to persistent order database (optional). If provided, uses RocksDB.
    #[arg(long, env = "GAMECART_DB_PATH")]
    db_path: Option<PathBuf>,

    /// Upper bound on the processing window, in seconds.
    #[arg(long, env = "GAMECART_TIMEOUT_SECS", default_value_t = 30)]
    timeout_secs: u64,

    /// Seconds before the order may be cancelled.
    #[arg(long, env = "GAMECART_CANCEL_GRACE_SECS", default_value_t = 5)]
    cancel_grace_secs: u64,

    /// Lower bound of the simulated payment delay, in seconds.
    #[arg(long, env = "GAMECART_MIN_COMPLETION_SECS", default_value_t = 5)]
    min_completion_secs: u64,

    /// Upper bound (exclusive) of the simulated payment delay, in seconds.
    #[arg(long, env = "GAMECART_MAX_COMPLETION_SECS", default_value_t = 25)]
    max_completion_secs: u64,

    /// Confirm the payment after exactly this many seconds instead of a random delay.
    #[arg(long)]
    confirm_after_secs: Option<u64>,

    /// Cancel the order this many seconds after it becomes cancellable.
    #[arg(long)]
    cancel_after_secs: Option<u64>,
}

impl Cli {
    fn checkout_config(&self) -> CheckoutConfig {
        CheckoutConfig {
            timeout: Duration::from_secs(self.timeout_secs),
            cancel_grace: Duration::from_secs(self.cancel_grace_secs),
            completion_window: Duration::from_secs(self.min_completion_secs)
                ..Duration::from_secs(self.max_completion_secs),
            ..CheckoutConfig::default()
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

#[cfg(feature = "storage-rocksdb")]
fn open_store(db_path: Option<&Path>) -> Result<OrderStoreHandle> {
    use gamecart::infrastructure::rocksdb::RocksDBStore;

    match db_path {
        Some(path) => Ok(Arc::new(RocksDBStore::open(path).into_diagnostic()?)),
        None => Ok(Arc::new(InMemoryOrderStore::new())),
    }
}

#[cfg(not(feature = "storage-rocksdb"))]
fn open_store(db_path: Option<&Path>) -> Result<OrderStoreHandle> {
    if db_path.is_some() {
        warn!(
            "Persistent storage requested via --db-path, but the 'storage-rocksdb' feature is not enabled; falling back to in-memory storage"
        );
    }
    Ok(Arc::new(InMemoryOrderStore::new()))
}

fn read_cart(cli: &Cli) -> Result<Cart> {
    let file = File::open(&cli.input).into_diagnostic()?;
    let reader = CartReader::new(file);
    let mut cart = Cart::new();

    if let Some(catalog_path) = &cli.catalog {
        let catalog = CatalogReader::new(File::open(catalog_path).into_diagnostic()?)
            .read()
            .into_diagnostic()?;
        for selection in reader.package_selections() {
            match selection.and_then(|s| s.resolve(&catalog)) {
                Ok(item) => cart.add(item),
                Err(e) => warn!("Skipping cart row: {}", e),
            }
        }
    } else {
        for item in reader.line_items() {
            match item {
                Ok(item) => cart.add(item),
                Err(e) => warn!("Skipping cart row: {}", e),
            }
        }
    }

    Ok(cart)
}

/// Logs the countdown bar on every tick until the order leaves processing.
fn spawn_progress_reporter(controller: &CheckoutController) {
    let mut rx = controller.subscribe();
    tokio::spawn(async move {
        let mut last = None;
        while rx.changed().await.is_ok() {
            let view = rx.borrow_and_update().clone();
            if view.step != CheckoutStep::Processing {
                break;
            }
            if last != Some(view.countdown.remaining) {
                last = Some(view.countdown.remaining);
                info!("{}", view.countdown.render_bar(30));
            }
        }
    });
}

async fn cancel_when_allowed(
    controller: &CheckoutController,
    cancel_after: Duration,
) -> Result<CheckoutOutcome> {
    let mut rx = controller.subscribe();
    let cancellable = rx
        .wait_for(|v| v.cancel_enabled || v.step != CheckoutStep::Processing)
        .await
        .into_diagnostic()?
        .cancel_enabled;

    if cancellable {
        tokio::time::sleep(cancel_after).await;
        if controller.step() == CheckoutStep::Processing {
            info!("Cancelling order on behalf of the user");
            return controller.cancel().await.into_diagnostic();
        }
    }
    controller.wait_for_result().await.into_diagnostic()
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = cli.checkout_config();
    config.validate().into_diagnostic()?;

    let store = open_store(cli.db_path.as_deref())?;
    let gateway: PaymentGatewayHandle = match cli.confirm_after_secs {
        Some(secs) => Arc::new(SimulatedGateway::fixed(Duration::from_secs(secs))),
        None => Arc::new(SimulatedGateway::random(config.completion_window.clone())),
    };

    let cart = read_cart(&cli)?;
    let subtotal = cart.subtotal().into_diagnostic()?;
    info!(
        lines = cart.items().len(),
        units = cart.item_count(),
        %subtotal,
        "Cart loaded"
    );

    let mut controller = CheckoutController::new(store, gateway, config).into_diagnostic()?;
    let order = controller.submit(&cart).await.into_diagnostic()?;
    info!(order_id = %order.order_id, "Order id");
    spawn_progress_reporter(&controller);

    let outcome = match cli.cancel_after_secs {
        Some(secs) => cancel_when_allowed(&controller, Duration::from_secs(secs)).await?,
        None => controller.wait_for_result().await.into_diagnostic()?,
    };

    let stdout = io::stdout();
    let mut writer = OutcomeWriter::new(stdout.lock());
    writer.write_outcome(&order, &outcome).into_diagnostic()?;

    controller.reset().into_diagnostic()?;
    Ok(())
}
