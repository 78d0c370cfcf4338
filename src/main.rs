use anyhow::Result;
use gdpscraper::{
    scrape::{scrape_table, ScrapeError},
    Config, Controller, CsvStore, HttpFetcher,
};
use std::io;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(io::stderr)
        .init();
    info!("startup");

    std::panic::set_hook(Box::new(|info| {
        eprintln!("panic: {:?}", info);
    }));

    // ─── 2) configuration ────────────────────────────────────────────
    let cfg = Config::from_env()?;
    let fetcher = HttpFetcher::new(&cfg)?;

    // ─── 3) fetch, preview & tabulate ────────────────────────────────
    let mut table = match scrape_table(&fetcher, &cfg, &mut io::stdout().lock()) {
        Ok(table) => table,
        Err(e @ (ScrapeError::Fetch(_) | ScrapeError::Table(_))) => {
            error!(error = %e, "scrape failed");
            println!("{}", e);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    // ─── 4) interactive loop ─────────────────────────────────────────
    let store = CsvStore::new(cfg.output.clone());
    let stdin = io::stdin();
    let stdout = io::stdout();
    Controller::new(stdin.lock(), stdout.lock(), store).run(&mut table)?;

    info!(rows = table.len(), "all done");
    Ok(())
}
