//! Strapi Cache CLI - query a Strapi-style content API from the terminal
//!
//! A thin command-line wrapper around the query client: one subcommand per
//! read operation, printing the normalized result as pretty JSON.

use std::error::Error;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use strapi_cache::cache::CacheManager;
use strapi_cache::cli::{parse_sort_order_arg, Cli, Command};
use strapi_cache::strapi::{ClientConfig, CollectionQuery, StrapiClient};

/// Initializes the global tracing subscriber.
///
/// Log levels are controlled via the `RUST_LOG` environment variable, with
/// `info` as the fallback.
fn init_logging() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
}

#[tokio::main]
async fn main() {
    init_logging();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Builds the client from the shared flags, dispatches the subcommand, and
/// renders the result as pretty JSON.
async fn run(cli: Cli) -> Result<String, Box<dyn Error>> {
    let mut config = ClientConfig::new(&cli.base_url);
    config.cache_ttl_secs = cli.ttl;

    let cache = if cli.no_cache { None } else { CacheManager::new() };
    if cli.fresh {
        if let Some(cache) = &cache {
            cache.clear()?;
        }
    }

    let client = match cache {
        Some(cache) => StrapiClient::with_cache(config, cache),
        None => StrapiClient::without_cache(config),
    };

    let value = match cli.command {
        Command::Collection {
            content_type,
            sort_key,
            order,
            limit,
            start,
            populate,
            raw_urls,
        } => {
            let sort_order = parse_sort_order_arg(&order)?;
            let query = CollectionQuery {
                sort_key,
                sort_order,
                limit,
                start,
                full_urls: !raw_urls,
                populate,
            };
            serde_json::Value::Array(client.collection(&content_type, &query).await?)
        }
        Command::Count { content_type } => {
            serde_json::Value::from(client.collection_count(&content_type).await?)
        }
        Command::Entry {
            content_type,
            id,
            raw_urls,
        } => serde_json::Value::Object(client.entry(&content_type, &id, !raw_urls).await?),
        Command::ByField {
            content_type,
            field,
            value,
            populate,
            raw_urls,
        } => serde_json::Value::Array(
            client
                .entries_by_field(&content_type, &field, &value, !raw_urls, populate.as_deref())
                .await?,
        ),
        Command::Single {
            content_type,
            pluck,
            raw_urls,
        } => client.single(&content_type, pluck.as_deref(), !raw_urls).await?,
    };

    Ok(serde_json::to_string_pretty(&value)?)
}
