//! Query façade for a Strapi-style content API
//!
//! Every operation follows the same skeleton: build a deterministic cache key
//! from the operation name and its parameters, serve the raw JSON body from
//! cache or fetch it, classify the body shape, evict the cache entry on any
//! shape error, rewrite embedded image links, normalize, and return.

use reqwest::Client;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use super::envelope::Envelope;
use super::links::{absolutize_entry_fields, absolutize_fields};
use super::transform::{split_populate, transform_data};
use super::{ClientConfig, CollectionQuery};
use crate::cache::CacheManager;

/// Prefix applied to every cache key written by the client
const CACHE_KEY_PREFIX: &str = "strapi";

/// Errors that can occur when querying the content API
#[derive(Debug, Error)]
pub enum StrapiError {
    /// The API answered with an embedded 403 status code
    #[error("permission denied by the content API")]
    PermissionDenied,

    /// The response body was literally null
    #[error("requested content was not found")]
    NotFound,

    /// The response body matched no expected shape
    #[error("unrecognized response shape: {0}")]
    Unknown(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Builds a deterministic cache key from an operation name and its parameters.
///
/// Each parameter is sanitized to keep keys filesystem-safe; distinct
/// parameter combinations never collide with each other regardless of the
/// cache backend in use.
pub fn cache_key(operation: &str, parts: &[&str]) -> String {
    let mut key = format!("{}_{}", CACHE_KEY_PREFIX, operation);
    for part in parts {
        key.push('_');
        key.push_str(&sanitize_key_part(part));
    }
    key
}

fn sanitize_key_part(part: &str) -> String {
    part.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect()
}

/// Caching read-only client for a Strapi-style content API
///
/// Holds the HTTP client, an optional response cache, and the connection
/// configuration. All operations are read-only and issue at most one outbound
/// request per cache miss; failures evict the affected cache entry before
/// surfacing, so the next call re-fetches instead of re-serving an error.
#[derive(Debug, Clone)]
pub struct StrapiClient {
    /// HTTP client for making requests
    http_client: Client,
    /// Cache manager for persisting raw responses
    cache: Option<CacheManager>,
    /// Connection settings
    config: ClientConfig,
}

impl StrapiClient {
    /// Creates a client with the platform cache directory.
    ///
    /// Falls back to running uncached if no cache directory can be determined.
    pub fn new(config: ClientConfig) -> Self {
        Self {
            http_client: Client::new(),
            cache: CacheManager::new(),
            config,
        }
    }

    /// Creates a client backed by a specific cache manager
    pub fn with_cache(config: ClientConfig, cache: CacheManager) -> Self {
        Self {
            http_client: Client::new(),
            cache: Some(cache),
            config,
        }
    }

    /// Creates a client that fetches on every call
    pub fn without_cache(config: ClientConfig) -> Self {
        Self {
            http_client: Client::new(),
            cache: None,
            config,
        }
    }

    /// Fetches an ordered page of entries from a collection type.
    ///
    /// Issues `GET /<type>?_sort=<key>:<order>&_limit=<n>&_start=<n>` plus
    /// `&populate=<csv>` when given. Each entry is normalized through
    /// [`transform_data`] with the populate list, preserving source order;
    /// when `full_urls` is set, relative markdown image links in every string
    /// field of every entry are rewritten first.
    ///
    /// # Errors
    /// * `PermissionDenied` if the body carries `statusCode: 403`
    /// * `NotFound` if the body is null
    /// * `Unknown` for any other non-array body
    pub async fn collection(
        &self,
        content_type: &str,
        query: &CollectionQuery,
    ) -> Result<Vec<Value>, StrapiError> {
        let limit = query.limit.to_string();
        let start = query.start.to_string();
        let key = cache_key(
            "collection",
            &[
                content_type,
                &query.sort_key,
                query.sort_order.as_str(),
                &limit,
                &start,
                query.populate.as_deref().unwrap_or(""),
            ],
        );

        let mut path = format!(
            "{}?_sort={}:{}&_limit={}&_start={}",
            content_type,
            query.sort_key,
            query.sort_order.as_str(),
            query.limit,
            query.start
        );
        if let Some(populate) = &query.populate {
            path.push_str("&populate=");
            path.push_str(populate);
        }

        let body = self.cached_body(&key, &path).await?;
        let items = self.require_collection(&key, body)?;

        let populate = split_populate(query.populate.as_deref());
        let entries = items
            .into_iter()
            .map(|mut item| {
                if query.full_urls {
                    absolutize_fields(&mut item, &self.config.base_url);
                }
                transform_data(item, &populate)
            })
            .collect();
        Ok(entries)
    }

    /// Counts the entries of a collection type via `GET /<type>/count`.
    ///
    /// The raw integer body is cached like any other response; no shape
    /// validation is applied beyond the numeric conversion.
    pub async fn collection_count(&self, content_type: &str) -> Result<u64, StrapiError> {
        let key = cache_key("count", &[content_type]);
        let path = format!("{}/count", content_type);

        let body = self.cached_body(&key, &path).await?;
        body.as_u64().ok_or_else(|| {
            StrapiError::Unknown("count endpoint did not return an integer".to_string())
        })
    }

    /// Fetches one entry by id via `GET /<type>/<id>`.
    ///
    /// The mapping is returned as-is: this endpoint serves the legacy flat
    /// entry shape, so no `attributes` envelope is unwrapped. When
    /// `full_urls` is set, relative markdown image links in every
    /// string-valued field are rewritten.
    ///
    /// # Errors
    /// * `PermissionDenied` if the body carries `statusCode: 403`
    /// * `NotFound` if the body is null
    /// * `Unknown` if the body lacks an `id` field
    pub async fn entry(
        &self,
        content_type: &str,
        id: &str,
        full_urls: bool,
    ) -> Result<Map<String, Value>, StrapiError> {
        let key = cache_key("entry", &[content_type, id]);
        let path = format!("{}/{}", content_type, id);

        let body = self.cached_body(&key, &path).await?;
        let mut entry = self.require_entity(&key, body)?;
        if full_urls {
            absolutize_entry_fields(&mut entry, &self.config.base_url);
        }
        Ok(entry)
    }

    /// Fetches the entries matching a field value via
    /// `GET /<type>?<field>=<value>` plus `&populate=<csv>` when given.
    ///
    /// Validation, link rewriting, and normalization follow
    /// [`StrapiClient::collection`].
    pub async fn entries_by_field(
        &self,
        content_type: &str,
        field_name: &str,
        field_value: &str,
        full_urls: bool,
        populate: Option<&str>,
    ) -> Result<Vec<Value>, StrapiError> {
        let key = cache_key(
            "entries_by_field",
            &[content_type, field_name, field_value, populate.unwrap_or("")],
        );

        let mut path = format!("{}?{}={}", content_type, field_name, field_value);
        if let Some(populate) = populate {
            path.push_str("&populate=");
            path.push_str(populate);
        }

        let body = self.cached_body(&key, &path).await?;
        let items = self.require_collection(&key, body)?;

        let populate = split_populate(populate);
        let entries = items
            .into_iter()
            .map(|mut item| {
                if full_urls {
                    absolutize_fields(&mut item, &self.config.base_url);
                }
                transform_data(item, &populate)
            })
            .collect();
        Ok(entries)
    }

    /// Fetches a singleton content type via `GET /<type>`.
    ///
    /// If `pluck` names a field present in the body, only that field's value
    /// is returned; otherwise the full mapping. When `full_urls` is set,
    /// relative markdown image links in every string-valued field are
    /// rewritten before plucking.
    ///
    /// # Errors
    /// * `PermissionDenied` if the body carries `statusCode: 403`
    /// * `NotFound` if the body is null
    /// * `Unknown` if the body lacks an `id` field
    pub async fn single(
        &self,
        content_type: &str,
        pluck: Option<&str>,
        full_urls: bool,
    ) -> Result<Value, StrapiError> {
        let key = cache_key("single", &[content_type]);

        let body = self.cached_body(&key, content_type).await?;
        let mut entry = self.require_entity(&key, body)?;
        if full_urls {
            absolutize_entry_fields(&mut entry, &self.config.base_url);
        }

        if let Some(field) = pluck {
            if let Some(value) = entry.remove(field) {
                return Ok(value);
            }
        }
        Ok(Value::Object(entry))
    }

    /// Serves the raw JSON body for a request from cache, fetching on a miss
    async fn cached_body(&self, key: &str, path_and_query: &str) -> Result<Value, StrapiError> {
        match &self.cache {
            Some(cache) => {
                cache
                    .remember(key, self.config.cache_ttl_secs, || {
                        self.get_json(path_and_query)
                    })
                    .await
            }
            None => self.get_json(path_and_query).await,
        }
    }

    /// Issues a GET request and decodes the JSON body
    async fn get_json(&self, path_and_query: &str) -> Result<Value, StrapiError> {
        let url = format!("{}/{}", self.config.base_url, path_and_query);
        debug!("GET {}", url);
        let body = self.http_client.get(&url).send().await?.json().await?;
        Ok(body)
    }

    /// Evicts a cache entry, ignoring cache backend failures
    fn evict(&self, key: &str) {
        if let Some(cache) = &self.cache {
            let _ = cache.forget(key);
        }
    }

    /// Validates an array-shaped body, evicting the cache entry on failure
    fn require_collection(&self, key: &str, body: Value) -> Result<Vec<Value>, StrapiError> {
        match Envelope::classify(body) {
            Envelope::Collection(items) => Ok(items),
            Envelope::Error { status_code: 403 } => {
                self.evict(key);
                Err(StrapiError::PermissionDenied)
            }
            Envelope::Null => {
                self.evict(key);
                Err(StrapiError::NotFound)
            }
            Envelope::Error { status_code } => {
                self.evict(key);
                Err(StrapiError::Unknown(format!(
                    "error body with status code {}",
                    status_code
                )))
            }
            Envelope::Entity(_) | Envelope::Unrecognized(_) => {
                self.evict(key);
                Err(StrapiError::Unknown(
                    "expected an array of entries".to_string(),
                ))
            }
        }
    }

    /// Validates an entity-shaped body, evicting the cache entry on failure
    fn require_entity(&self, key: &str, body: Value) -> Result<Map<String, Value>, StrapiError> {
        match Envelope::classify(body) {
            Envelope::Entity(entry) => Ok(entry),
            Envelope::Error { status_code: 403 } => {
                self.evict(key);
                Err(StrapiError::PermissionDenied)
            }
            Envelope::Null => {
                self.evict(key);
                Err(StrapiError::NotFound)
            }
            Envelope::Error { status_code } => {
                self.evict(key);
                Err(StrapiError::Unknown(format!(
                    "error body with status code {}",
                    status_code
                )))
            }
            Envelope::Collection(_) | Envelope::Unrecognized(_) => {
                self.evict(key);
                Err(StrapiError::Unknown(
                    "expected an entry carrying an id field".to_string(),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strapi::SortOrder;

    #[test]
    fn test_cache_key_is_deterministic() {
        let a = cache_key("collection", &["articles", "id", "DESC", "20", "0", ""]);
        let b = cache_key("collection", &["articles", "id", "DESC", "20", "0", ""]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_cache_key_includes_operation_and_prefix() {
        let key = cache_key("count", &["articles"]);
        assert_eq!(key, "strapi_count_articles");
    }

    #[test]
    fn test_cache_keys_differ_per_parameter() {
        let base = cache_key("collection", &["articles", "id", "DESC", "20", "0", ""]);
        let by_sort = cache_key("collection", &["articles", "title", "DESC", "20", "0", ""]);
        let by_order = cache_key("collection", &["articles", "id", "ASC", "20", "0", ""]);
        let by_limit = cache_key("collection", &["articles", "id", "DESC", "10", "0", ""]);
        let by_start = cache_key("collection", &["articles", "id", "DESC", "20", "5", ""]);
        let by_populate = cache_key("collection", &["articles", "id", "DESC", "20", "0", "author"]);

        for other in [&by_sort, &by_order, &by_limit, &by_start, &by_populate] {
            assert_ne!(&base, other, "Parameter change must change the key");
        }
    }

    #[test]
    fn test_cache_keys_differ_per_operation() {
        assert_ne!(
            cache_key("collection", &["articles"]),
            cache_key("entries_by_field", &["articles"])
        );
    }

    #[test]
    fn test_cache_key_sanitizes_unsafe_characters() {
        let key = cache_key("entry", &["articles", "some/id?x"]);
        assert!(!key.contains('/'));
        assert!(!key.contains('?'));
    }

    #[test]
    fn test_collection_query_builds_expected_key_shape() {
        let query = CollectionQuery {
            sort_key: "publishedAt".to_string(),
            sort_order: SortOrder::Asc,
            limit: 10,
            start: 0,
            full_urls: true,
            populate: Some("author".to_string()),
        };
        let key = cache_key(
            "collection",
            &[
                "articles",
                &query.sort_key,
                query.sort_order.as_str(),
                &query.limit.to_string(),
                &query.start.to_string(),
                query.populate.as_deref().unwrap_or(""),
            ],
        );
        assert_eq!(key, "strapi_collection_articles_publishedAt_ASC_10_0_author");
    }
}
