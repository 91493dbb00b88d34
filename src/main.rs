use clap::{Args, Parser, Subcommand};
use std::{path::PathBuf, time::Duration};
use tracing::info;
use tracing_error::ErrorLayer;
use tracing_subscriber::prelude::*;
use wedding_vendor_collector::{
    apify::ApifyClient,
    audit,
    collector::Collector,
    config::Settings,
    instagram::{InstagramChecker, DEFAULT_PROFILE_BASE_URL},
    markets::{Priority, TOP_WEDDING_MARKETS},
    seeds,
    store::{SqliteVendorStore, VendorFilter, VendorStore},
    Category, CollectorError,
};

#[derive(Debug, Parser)]
#[command(name = "wedding-vendors", about = "Collects wedding vendors from Instagram")]
struct Cli {
    /// Overrides DATABASE_URL
    #[arg(long, global = true)]
    database: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Store the curated vendor list, or the vendors of a JSON file
    Seed {
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Geographic sweep of every category
    CollectAll {
        #[arg(long, value_enum, default_values_t = [Priority::High, Priority::Medium])]
        priority: Vec<Priority>,
    },
    /// Geographic sweep of one category
    CollectCategory {
        category: Category,
        #[arg(long, value_enum, default_value_t = Priority::High)]
        priority: Priority,
    },
    /// Search the given hashtags
    CollectHashtags {
        category: Category,
        #[arg(value_delimiter = ',', required = true)]
        hashtags: Vec<String>,
    },
    /// Fetch the category's seed profiles until the target is reached
    CollectSeeds {
        category: Category,
        #[arg(long, default_value_t = 50)]
        target: u32,
    },
    /// Search around the largest stored accounts
    Expand {
        category: Category,
        #[arg(long, default_value_t = 5)]
        limit: u32,
    },
    /// Per city coverage of the top wedding markets
    Coverage {
        #[arg(long, default_value_t = audit::DEFAULT_COVERAGE_GOAL)]
        goal: u32,
    },
    /// Check stored Instagram URLs
    AuditUrls,
    /// Fill missing Instagram URLs from handles
    FixUrls,
    /// Profile image coverage
    AuditImages {
        #[command(flatten)]
        scope: Scope,
    },
    /// Fill missing profile images
    FixImages {
        #[arg(long, default_value_t = 100)]
        limit: u32,
        /// Scrape each profile first, using the fallback URL only when it has no picture
        #[arg(long)]
        fetch: bool,
    },
    /// Check that stored accounts still exist on Instagram
    Verify {
        #[command(flatten)]
        scope: Scope,
        #[arg(long, default_value_t = 2)]
        delay_secs: u64,
        /// Delete the accounts found not to exist
        #[arg(long)]
        remove: bool,
    },
    /// Delete vendors from a category
    Remove {
        category: Category,
        #[arg(required = true)]
        handles: Vec<String>,
    },
    /// Vendor count per category
    Stats,
    /// Latest scraping runs
    Runs {
        #[arg(long, default_value_t = 20)]
        limit: u32,
    },
}

#[derive(Debug, Args)]
struct Scope {
    #[arg(long)]
    category: Option<Category>,
    #[arg(long)]
    city: Option<String>,
    #[arg(long)]
    state: Option<String>,
}

impl Scope {
    fn filter(self) -> VendorFilter {
        VendorFilter {
            category: self.category,
            city: self.city,
            state: self.state,
        }
    }
}

fn collector(
    settings: &Settings,
    store: SqliteVendorStore,
) -> Result<Collector<ApifyClient, SqliteVendorStore>, CollectorError> {
    let client = ApifyClient::new(
        &settings.apify_base_url,
        &settings.apify_actor_id,
        settings.apify_token()?,
    )?;
    Ok(Collector::new(client, store, settings.collector.clone()))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_env("LOG_LEVEL")
                .unwrap_or_else(|_| "info,hyper=warn,reqwest=info,sqlx=warn".into()),
        )
        .with(ErrorLayer::default())
        .init();

    let cli = Cli::parse();
    let mut settings = Settings::from_env()?;
    if let Some(database) = cli.database {
        settings.database_url = database;
    }

    let store = SqliteVendorStore::open(&settings.database_url).await?;
    info!("Using database {}", settings.database_url);

    match cli.command {
        Command::Seed { file } => {
            let vendors = match file {
                Some(path) => seeds::load_seed_file(path).await?,
                None => seeds::DALLAS_LOCAL_VENDORS.clone(),
            };
            let report = seeds::populate(&store, &vendors).await?;
            print!("{}", report);
        }
        Command::CollectAll { priority } => {
            let results = collector(&settings, store)?
                .collect_all(&Category::ALL, &priority)
                .await;
            for (category, saved) in results {
                println!("{:<20} {:>6}", category.as_str(), saved);
            }
        }
        Command::CollectCategory { category, priority } => {
            let saved = collector(&settings, store)?
                .geographic_sweep(category, priority)
                .await;
            println!("Saved {} {}", saved, category);
        }
        Command::CollectHashtags { category, hashtags } => {
            let saved = collector(&settings, store)?
                .collect_hashtags(category, &hashtags)
                .await?;
            println!("Saved {} {}", saved, category);
        }
        Command::CollectSeeds { category, target } => {
            let handles: Vec<String> = seeds::seed_handles(category)
                .iter()
                .map(ToString::to_string)
                .collect();
            let added = collector(&settings, store)?
                .collect_from_seeds(category, &handles, target)
                .await?;
            println!("Added {} {}", added, category);
        }
        Command::Expand { category, limit } => {
            let saved = collector(&settings, store)?
                .expand_from_store(category, limit)
                .await?;
            println!("Saved {} {}", saved, category);
        }
        Command::Coverage { goal } => {
            let report =
                audit::coverage_report(&store, &TOP_WEDDING_MARKETS, &Category::ALL, goal).await?;
            print!("{}", report);
        }
        Command::AuditUrls => {
            print!("{}", audit::url_report(&store).await?);
        }
        Command::FixUrls => {
            let fixed = audit::fix_instagram_urls(&store).await?;
            println!("Fixed {} Instagram URLs", fixed);
        }
        Command::AuditImages { scope } => {
            print!("{}", audit::image_report(&store, &scope.filter()).await?);
        }
        Command::FixImages { limit, fetch } => {
            let report = if fetch {
                collector(&settings, store)?
                    .fetch_profile_images(limit)
                    .await?
            } else {
                audit::backfill_profile_images(&store, limit).await?
            };
            print!("{}", report);
        }
        Command::Verify {
            scope,
            delay_secs,
            remove,
        } => {
            let checker = InstagramChecker::new(DEFAULT_PROFILE_BASE_URL)?;
            let report = audit::verify_handles(
                &store,
                &checker,
                &scope.filter(),
                Duration::from_secs(delay_secs),
            )
            .await?;
            print!("{}", report);
            if remove {
                for category in Category::ALL {
                    let handles: Vec<&str> = report
                        .invalid
                        .iter()
                        .filter(|(c, _)| *c == category)
                        .map(|(_, h)| h.as_str())
                        .collect();
                    if !handles.is_empty() {
                        print!("{}", audit::remove_handles(&store, category, &handles).await?);
                    }
                }
            }
        }
        Command::Remove { category, handles } => {
            print!("{}", audit::remove_handles(&store, category, &handles).await?);
        }
        Command::Stats => {
            print!("{}", audit::category_stats(&store).await?);
        }
        Command::Runs { limit } => {
            for run in store.recent_runs(limit).await? {
                println!(
                    "{} {:<10} {:<20} {:<24} {:>4}/{:<4} {}",
                    run.started_at.format("%Y-%m-%d %H:%M"),
                    run.state.as_str(),
                    run.category.as_str(),
                    run.location,
                    run.profiles_saved,
                    run.profiles_discovered,
                    run.error_message.unwrap_or_default()
                );
            }
        }
    }

    Ok(())
}
