//! Cache module for storing API responses to disk
//!
//! This module provides a cache manager that persists raw API responses to the
//! filesystem with configurable TTL (time-to-live) values. Entries past their
//! TTL are treated as misses, and bad entries can be evicted with `forget` so
//! the next call re-fetches instead of re-serving a cached error.

mod manager;

pub use manager::{CacheManager, CachedData};
