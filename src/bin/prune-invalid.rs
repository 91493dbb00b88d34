use wedding_vendor_collector::{audit, config::Settings, store::SqliteVendorStore, Category};

const INVALID_HANDLES: [&str; 9] = [
    "wildflowerdallas",
    "urbancanopyfloral",
    "petalnpressdallas",
    "bloomworksdallas",
    "dallaspetalbar",
    "rosepeddlerflower",
    "flowersbycaroline",
    "botanicaflowerstudio",
    "stemsofdallasflorist",
];

async fn prune_invalid() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::from_env()?;
    let store = SqliteVendorStore::open(&settings.database_url).await?;
    let report = audit::remove_handles(&store, Category::Florists, &INVALID_HANDLES).await?;
    print!("{}", report);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("LOG_LEVEL")
                .unwrap_or_else(|_| "info,sqlx=warn".into()),
        )
        .init();
    prune_invalid().await
}
