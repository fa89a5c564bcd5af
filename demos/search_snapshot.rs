use anime_catalog::catalog::Catalog;
use anime_catalog::config::Config;
use anime_catalog::display::{select_title, status_text};
use anime_catalog::i18n::Locale;
use anime_catalog::snapshot::Snapshot;
use anyhow::Result;
use dotenvy::dotenv;
use std::env;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn usage() -> ! {
    eprintln!("Usage: cargo run --example search_snapshot -- <query> [zh|en|ja]");
    std::process::exit(2);
}

fn parse_args() -> (String, Locale) {
    let mut args = env::args().skip(1);
    let query = args.next().unwrap_or_else(|| usage());
    let locale = match args.next() {
        Some(raw) => raw.parse().unwrap_or_else(|_| usage()),
        None => Locale::default(),
    };
    (query, locale)
}

fn main() -> Result<()> {
    let _ = dotenv();
    init_tracing();
    let (query, locale) = parse_args();
    let config = Config::from_env()?;

    let catalog = Catalog::new(Snapshot::load_dir(&config.snapshot_dir)?);
    let hits = catalog.search(&query);
    info!("{} matches for {:?}", hits.len(), query);
    for record in hits {
        println!(
            "{:>7}  {}  [{}]",
            record.id,
            select_title(&record.title, locale),
            status_text(record.status.as_ref(), locale)
        );
    }
    Ok(())
}
