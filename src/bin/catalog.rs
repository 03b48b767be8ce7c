use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use inventory_client::{client::AppStore, config::ClientConfig};

/// Prints one page of the public catalog.
///
/// Usage: `catalog [filter] [page]` where `page` starts at 1.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut args = std::env::args().skip(1);
    let filter = args.next().unwrap_or_default();
    let page: u64 = match args.next() {
        Some(raw) => raw
            .parse()
            .map_err(|_| anyhow::anyhow!("page must be a positive number, got '{raw}'"))?,
        None => 1,
    };

    let config = ClientConfig::from_env()?;
    let store = AppStore::new(&config)?;
    let catalog = store.catalog();

    let query = catalog.query().await.with_filter(filter).at_page(page.saturating_sub(1));
    catalog.refresh_with(query).await?;

    let state = catalog.snapshot().await;
    println!(
        "Page {} of {} ({} products)",
        state.query.page_index() + 1,
        state.page_count().max(1),
        state.page.total_count
    );
    for product in &state.page.items {
        println!("{:>5}  {:<40} {:>12.2}", product.id, product.name, product.price);
    }
    Ok(())
}
