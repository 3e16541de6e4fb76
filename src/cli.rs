//! Command-line interface parsing for the Strapi cache CLI
//!
//! This module handles parsing of CLI arguments using clap: the connection
//! and cache flags shared by every command, plus one subcommand per query
//! operation the client exposes.

use clap::{Parser, Subcommand};
use thiserror::Error;

use crate::strapi::{SortOrder, DEFAULT_CACHE_TTL_SECS};

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// The specified sort order is not recognized
    #[error("Invalid sort order: '{0}'. Valid orders: asc, desc")]
    InvalidSortOrder(String),
}

/// Strapi cache CLI - query a Strapi-style content API with local caching
#[derive(Parser, Debug)]
#[command(name = "strapi-cache")]
#[command(about = "Query a Strapi-style content API with cached, normalized responses")]
#[command(version)]
pub struct Cli {
    /// Base URL of the content API, e.g. https://cms.example.com
    #[arg(long, value_name = "URL")]
    pub base_url: String,

    /// Cache lifetime for fetched responses, in seconds
    #[arg(long, value_name = "SECONDS", default_value_t = DEFAULT_CACHE_TTL_SECS)]
    pub ttl: u64,

    /// Disable the response cache entirely
    #[arg(long)]
    pub no_cache: bool,

    /// Clear all cached responses before running the command
    #[arg(long)]
    pub fresh: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// One subcommand per read operation of the query client
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch an ordered page of entries from a collection type
    Collection {
        /// Content type to query, e.g. articles
        content_type: String,

        /// Field to sort by
        #[arg(long, default_value = "id")]
        sort_key: String,

        /// Sort direction: asc or desc
        #[arg(long, default_value = "desc")]
        order: String,

        /// Maximum number of entries to return
        #[arg(long, default_value_t = 20)]
        limit: u32,

        /// Offset of the first entry
        #[arg(long, default_value_t = 0)]
        start: u32,

        /// Comma-separated relation fields to inline
        #[arg(long)]
        populate: Option<String>,

        /// Leave relative markdown image links untouched
        #[arg(long)]
        raw_urls: bool,
    },

    /// Count the entries of a collection type
    Count {
        /// Content type to count
        content_type: String,
    },

    /// Fetch one entry by id
    Entry {
        /// Content type the entry belongs to
        content_type: String,

        /// Id of the entry
        id: String,

        /// Leave relative markdown image links untouched
        #[arg(long)]
        raw_urls: bool,
    },

    /// Fetch the entries matching a field value
    ByField {
        /// Content type to query
        content_type: String,

        /// Field name to filter on
        field: String,

        /// Field value to match
        value: String,

        /// Comma-separated relation fields to inline
        #[arg(long)]
        populate: Option<String>,

        /// Leave relative markdown image links untouched
        #[arg(long)]
        raw_urls: bool,
    },

    /// Fetch a singleton content type
    Single {
        /// Singleton content type to fetch
        content_type: String,

        /// Return only this field from the singleton
        #[arg(long)]
        pluck: Option<String>,

        /// Leave relative markdown image links untouched
        #[arg(long)]
        raw_urls: bool,
    },
}

/// Parses a sort order string argument into a SortOrder enum.
///
/// # Arguments
/// * `s` - The sort order string from CLI
///
/// # Returns
/// * `Ok(SortOrder)` if the string matches a valid order
/// * `Err(CliError::InvalidSortOrder)` if the string doesn't match
pub fn parse_sort_order_arg(s: &str) -> Result<SortOrder, CliError> {
    match s.to_ascii_lowercase().as_str() {
        "asc" | "ascending" => Ok(SortOrder::Asc),
        "desc" | "descending" => Ok(SortOrder::Desc),
        _ => Err(CliError::InvalidSortOrder(s.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sort_order_arg_asc_aliases() {
        assert_eq!(parse_sort_order_arg("asc").unwrap(), SortOrder::Asc);
        assert_eq!(parse_sort_order_arg("ascending").unwrap(), SortOrder::Asc);
        assert_eq!(parse_sort_order_arg("ASC").unwrap(), SortOrder::Asc);
    }

    #[test]
    fn test_parse_sort_order_arg_desc_aliases() {
        assert_eq!(parse_sort_order_arg("desc").unwrap(), SortOrder::Desc);
        assert_eq!(parse_sort_order_arg("descending").unwrap(), SortOrder::Desc);
        assert_eq!(parse_sort_order_arg("DESC").unwrap(), SortOrder::Desc);
    }

    #[test]
    fn test_parse_sort_order_arg_invalid() {
        let result = parse_sort_order_arg("sideways");
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(err.to_string().contains("Invalid sort order"));
        assert!(err.to_string().contains("sideways"));
    }

    #[test]
    fn test_cli_parse_collection_defaults() {
        let cli = Cli::parse_from([
            "strapi-cache",
            "--base-url",
            "https://cms.example.com",
            "collection",
            "articles",
        ]);
        assert_eq!(cli.base_url, "https://cms.example.com");
        assert_eq!(cli.ttl, DEFAULT_CACHE_TTL_SECS);
        assert!(!cli.no_cache);
        assert!(!cli.fresh);
        match cli.command {
            Command::Collection {
                content_type,
                sort_key,
                order,
                limit,
                start,
                populate,
                raw_urls,
            } => {
                assert_eq!(content_type, "articles");
                assert_eq!(sort_key, "id");
                assert_eq!(order, "desc");
                assert_eq!(limit, 20);
                assert_eq!(start, 0);
                assert!(populate.is_none());
                assert!(!raw_urls);
            }
            other => panic!("Expected Collection command, got {:?}", other),
        }
    }

    #[test]
    fn test_cli_parse_collection_with_flags() {
        let cli = Cli::parse_from([
            "strapi-cache",
            "--base-url",
            "https://cms.example.com",
            "--ttl",
            "60",
            "collection",
            "articles",
            "--sort-key",
            "publishedAt",
            "--order",
            "asc",
            "--limit",
            "10",
            "--populate",
            "author,tags",
        ]);
        assert_eq!(cli.ttl, 60);
        match cli.command {
            Command::Collection {
                sort_key,
                order,
                limit,
                populate,
                ..
            } => {
                assert_eq!(sort_key, "publishedAt");
                assert_eq!(order, "asc");
                assert_eq!(limit, 10);
                assert_eq!(populate.as_deref(), Some("author,tags"));
            }
            other => panic!("Expected Collection command, got {:?}", other),
        }
    }

    #[test]
    fn test_cli_parse_entry() {
        let cli = Cli::parse_from([
            "strapi-cache",
            "--base-url",
            "https://cms.example.com",
            "entry",
            "articles",
            "42",
        ]);
        match cli.command {
            Command::Entry {
                content_type,
                id,
                raw_urls,
            } => {
                assert_eq!(content_type, "articles");
                assert_eq!(id, "42");
                assert!(!raw_urls);
            }
            other => panic!("Expected Entry command, got {:?}", other),
        }
    }

    #[test]
    fn test_cli_parse_single_with_pluck() {
        let cli = Cli::parse_from([
            "strapi-cache",
            "--base-url",
            "https://cms.example.com",
            "single",
            "homepage",
            "--pluck",
            "title",
        ]);
        match cli.command {
            Command::Single { pluck, .. } => assert_eq!(pluck.as_deref(), Some("title")),
            other => panic!("Expected Single command, got {:?}", other),
        }
    }

    #[test]
    fn test_cli_parse_by_field() {
        let cli = Cli::parse_from([
            "strapi-cache",
            "--base-url",
            "https://cms.example.com",
            "by-field",
            "articles",
            "slug",
            "hello-world",
        ]);
        match cli.command {
            Command::ByField { field, value, .. } => {
                assert_eq!(field, "slug");
                assert_eq!(value, "hello-world");
            }
            other => panic!("Expected ByField command, got {:?}", other),
        }
    }

    #[test]
    fn test_cli_requires_base_url() {
        let result = Cli::try_parse_from(["strapi-cache", "count", "articles"]);
        assert!(result.is_err(), "Missing --base-url should fail to parse");
    }
}
