use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use facecart_capture::FileCamera;
use facecart_core::{catalog, Identity, OrderStore, OrderViewParams, SqliteOrderStore};
use facecart_flow::{
    sync_registrations, Config, HttpFaceBackend, OrderView, Outcome, Screen, Services, Session,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser)]
#[command(name = "facecart", about = "Face-recognition ordering from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new face, then pick products
    Register {
        /// Photo to use as the camera shot
        #[arg(short, long)]
        photo: PathBuf,
        /// Display name for the new registration
        #[arg(short, long)]
        name: Option<String>,
        /// Product id to add if the flow reaches the catalog (repeatable)
        #[arg(short, long = "add")]
        add: Vec<String>,
    },
    /// Recognize a face and show its order, or pick products
    Recognize {
        /// Photo to use as the camera shot
        #[arg(short, long)]
        photo: PathBuf,
        /// Product id to add if the flow reaches the catalog (repeatable)
        #[arg(short, long = "add")]
        add: Vec<String>,
    },
    /// List the product catalog
    Products,
    /// Show the stored order for a name
    Orders {
        name: String,
    },
    /// Retry face registrations that failed at checkout
    Sync,
    /// Show configuration and pending registrations
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    match cli.command {
        Commands::Register { photo, name, add } => {
            let mut session = open_session(&config, photo)?;
            let Some(capture) = session.capture_mut() else {
                anyhow::bail!("session did not start on the capture screen");
            };
            capture.open_prompt();
            capture.set_name(name.as_deref().unwrap_or_default());
            let outcome = capture.confirm_prompt().await;
            run_flow(&mut session, outcome, &add).await?;
        }
        Commands::Recognize { photo, add } => {
            let mut session = open_session(&config, photo)?;
            let Some(capture) = session.capture_mut() else {
                anyhow::bail!("session did not start on the capture screen");
            };
            let outcome = capture.recognize().await;
            run_flow(&mut session, outcome, &add).await?;
        }
        Commands::Products => {
            for p in catalog::products() {
                println!("{:>3}  {:<14} {}", p.id, p.name, p.price_label());
            }
        }
        Commands::Orders { name } => {
            let store = open_store(&config)?;
            let name = Identity::resolve(Some(&name), &config.default_name);
            match store.load(&name)? {
                Some(order) => print_orders(&OrderView::new(OrderViewParams { order, name })),
                None => println!("No order stored for {name}"),
            }
        }
        Commands::Sync => {
            let store = open_store(&config)?;
            let backend = HttpFaceBackend::new(&config.base_url)?;
            let report = sync_registrations(&backend, &store).await?;
            for name in &report.synced {
                println!("synced: {name}");
            }
            for (name, error) in &report.failed {
                println!("failed: {name} ({error})");
            }
            if report.synced.is_empty() && report.failed.is_empty() {
                println!("Nothing to sync");
            }
        }
        Commands::Status => {
            let store = open_store(&config)?;
            let pending = store.unsynced()?;
            println!(
                "{}",
                serde_json::json!({
                    "version": env!("CARGO_PKG_VERSION"),
                    "base_url": config.base_url,
                    "db_path": config.db_path.display().to_string(),
                    "default_name": config.default_name,
                    "pending_registrations": pending.len(),
                })
            );
        }
    }

    Ok(())
}

fn open_store(config: &Config) -> Result<SqliteOrderStore> {
    SqliteOrderStore::open(&config.db_path)
        .with_context(|| format!("opening order store at {}", config.db_path.display()))
}

fn open_session(config: &Config, photo: PathBuf) -> Result<Session> {
    let store = open_store(config)?;
    let backend = HttpFaceBackend::new(&config.base_url)?;
    tracing::debug!(base_url = backend.base_url(), "backend configured");
    let services = Services::new(
        Arc::new(backend),
        Arc::new(store),
        Arc::new(FileCamera::new(photo)),
        config.default_name.clone(),
    );
    Ok(Session::new(services))
}

/// Render an outcome, follow its navigation, and keep going until the flow
/// settles on a screen that needs no more input.
async fn run_flow(session: &mut Session, outcome: Outcome, add: &[String]) -> Result<()> {
    show(&outcome);
    if !session.apply(&outcome) {
        return Ok(());
    }

    if matches!(session.screen(), Screen::Catalog(_)) {
        let outcome = if add.is_empty() {
            shop_interactively(session).await?
        } else {
            shop_from_args(session, add).await
        };
        let Some(outcome) = outcome else {
            return Ok(());
        };
        show(&outcome);
        session.apply(&outcome);
    }

    if let Some(view) = session.orders() {
        print_orders(view);
    }
    Ok(())
}

async fn shop_from_args(session: &mut Session, add: &[String]) -> Option<Outcome> {
    let catalog = session.catalog_mut()?;
    for id in add {
        match catalog.add_to_cart(id) {
            Ok(alert) => println!("{alert}"),
            Err(e) => eprintln!("{e}"),
        }
    }
    Some(catalog.checkout().await)
}

/// Read catalog commands from stdin. Returns the checkout outcome that left
/// the catalog, or `None` if the user quit.
async fn shop_interactively(session: &mut Session) -> Result<Option<Outcome>> {
    let Some(catalog) = session.catalog_mut() else {
        return Ok(None);
    };
    println!("Shopping as {}. Commands: list, add <id>, cart, checkout, quit", catalog.name());
    for p in catalog.products() {
        println!("{:>3}  {:<14} {}", p.id, p.name, p.price_label());
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let mut words = line.split_whitespace();
        match (words.next(), words.next()) {
            (Some("list"), _) => {
                for p in catalog.products() {
                    println!("{:>3}  {:<14} {}", p.id, p.name, p.price_label());
                }
            }
            (Some("add"), Some(id)) => match catalog.add_to_cart(id) {
                Ok(alert) => println!("{alert}"),
                Err(e) => eprintln!("{e}"),
            },
            (Some("cart"), _) => {
                for p in catalog.cart().items() {
                    println!("  {:<14} {}", p.name, p.price_label());
                }
                println!("  {} item(s), ${}", catalog.cart().len(), catalog.cart().total());
            }
            (Some("checkout"), _) => {
                let outcome = catalog.checkout().await;
                if outcome.navigation().is_some() {
                    return Ok(Some(outcome));
                }
                show(&outcome);
            }
            (Some("quit"), _) => return Ok(None),
            (None, _) => {}
            _ => eprintln!("unknown command: {line}"),
        }
    }
    Ok(None)
}

fn show(outcome: &Outcome) {
    if let Some(alert) = outcome.alert() {
        println!("{alert}");
    }
}

fn print_orders(view: &OrderView) {
    println!("{}", view.title());
    for row in view.rows() {
        println!("  {:<14} {}", row.name, row.price);
    }
}
