//! Strapi content API client
//!
//! This module contains the query façade for a Strapi-style headless CMS:
//! connection configuration, query parameter types, raw-response envelope
//! classification, entry normalization, and markdown image link rewriting.

pub mod client;
pub mod envelope;
pub mod links;
pub mod transform;

pub use client::{cache_key, StrapiClient, StrapiError};
pub use envelope::Envelope;
pub use transform::{split_populate, transform_data};

use serde::{Deserialize, Serialize};

/// Default cache lifetime for API responses in seconds
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;

/// Connection settings for a Strapi-style content API
///
/// Passed to the client at construction; there is no ambient or process-wide
/// configuration lookup.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the content API, without a trailing slash
    pub base_url: String,
    /// How long fetched responses stay fresh in the cache, in seconds
    pub cache_ttl_secs: u64,
}

impl ClientConfig {
    /// Creates a config for the given base URL with the default cache TTL.
    ///
    /// A trailing slash on the base URL is trimmed so request paths and
    /// rewritten links never contain a double slash.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
        }
    }
}

/// Sort direction for collection queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// Wire-level spelling used in the `_sort=<field>:<order>` query parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Parameters for a paged collection query
///
/// `Default` carries the conventional values: newest-first by `id`, one page
/// of 20 entries, links rewritten, nothing populated.
#[derive(Debug, Clone)]
pub struct CollectionQuery {
    /// Field to sort by
    pub sort_key: String,
    /// Sort direction
    pub sort_order: SortOrder,
    /// Maximum number of entries to return
    pub limit: u32,
    /// Offset of the first entry
    pub start: u32,
    /// Whether to rewrite relative markdown image links to absolute URLs
    pub full_urls: bool,
    /// Comma-separated relation field names to inline in each entry
    pub populate: Option<String>,
}

impl Default for CollectionQuery {
    fn default() -> Self {
        Self {
            sort_key: "id".to_string(),
            sort_order: SortOrder::Desc,
            limit: 20,
            start: 0,
            full_urls: true,
            populate: None,
        }
    }
}
