//! noqe-sw - offline install support for the noqe training planner PWA.
//!
//! Models the app's two service-worker drafts as testable policies and
//! drives the precache variant from the command line: `precache` installs
//! the fixed route manifest into a disk-backed cache, `status` reports what
//! is cached, and `get` runs a single request through the cache-first
//! interceptor (served from cache when offline).

use std::io;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use noqe_sw::config::Config;
use noqe_sw::models::Request;
use noqe_sw::net::HttpFetcher;
use noqe_sw::store::DiskStore;
use noqe_sw::worker::{PrecacheWorker, Registration, ServiceWorker};

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();

    let mut config = Config::load()?;
    if let Ok(base_url) = std::env::var("NOQE_BASE_URL") {
        config.base_url = base_url;
    }

    let args: Vec<String> = std::env::args().collect();
    match args.get(1).map(String::as_str) {
        Some("precache") | None => precache(&config).await,
        Some("status") => status(&config),
        Some("get") => {
            let path = args
                .get(2)
                .context("usage: noqe-sw get <path>")?;
            get(&config, path).await
        }
        Some(other) => {
            eprintln!("Unknown command: {other}");
            eprintln!("usage: noqe-sw [precache|status|get <path>]");
            std::process::exit(2);
        }
    }
}

fn open_store(config: &Config) -> Result<DiskStore> {
    let cache_dir = config.cache_dir()?;
    DiskStore::open(&config.cache_name, &cache_dir)
        .with_context(|| format!("Failed to open cache \"{}\"", config.cache_name))
}

fn precache_worker(config: &Config) -> Result<PrecacheWorker<DiskStore, HttpFetcher>> {
    let store = open_store(config)?;
    let fetcher = HttpFetcher::new(&config.base_url)?;
    Ok(PrecacheWorker::new(
        store,
        fetcher,
        config.precache_routes.clone(),
    ))
}

/// Drive the full install -> activate lifecycle against the configured
/// origin, populating the disk cache.
async fn precache(config: &Config) -> Result<()> {
    info!(base_url = %config.base_url, "precaching noqe routes");

    let mut registration = Registration::new(precache_worker(config)?);
    registration
        .take_control()
        .await
        .with_context(|| format!("Installation against {} failed", config.base_url))?;

    println!(
        "Precached {} routes into \"{}\"",
        config.precache_routes.len(),
        config.cache_name
    );
    Ok(())
}

/// List cached entries with their capture ages.
fn status(config: &Config) -> Result<()> {
    let store = open_store(config)?;
    let entries = store.entries()?;

    if entries.is_empty() {
        println!("Cache \"{}\" is empty - run `noqe-sw precache`", config.cache_name);
        return Ok(());
    }

    println!("Cache \"{}\":", config.cache_name);
    for entry in entries {
        println!(
            "  {:<16} {:>7} bytes  captured {}",
            entry.path,
            entry.response.body.len(),
            entry.age_display()
        );
    }
    Ok(())
}

/// Run one request through the cache-first interceptor and print the body.
/// Works offline for any precached route.
async fn get(config: &Config, path: &str) -> Result<()> {
    let worker = precache_worker(config)?;
    let request = Request::get(path);

    let response = worker
        .fetch(&request)
        .await
        .with_context(|| format!("Request for {path} failed"))?;

    eprintln!(
        "{} {} ({} bytes, {})",
        response.status,
        path,
        response.body.len(),
        response.content_type.as_deref().unwrap_or("unknown type")
    );
    print!("{}", response.body_text());
    Ok(())
}
