//! Strapi Cache Library
//!
//! A caching read-only client for Strapi-style content APIs: fetches
//! collections, single entries, and filtered queries, caches raw responses
//! with a TTL, normalizes the nested `{id, attributes}` envelope into flat
//! objects, and rewrites relative markdown image links into absolute URLs.

pub mod cache;
pub mod cli;
pub mod strapi;
