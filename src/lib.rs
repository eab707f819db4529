//! Galleria — orchestration core for aggregating media from third-party
//! gallery services behind one normalized interface.
//!
//! The crate holds the provider-agnostic middle of a gallery aggregator:
//! a capability-gated [`provider::ExternalProvider`] contract, the
//! [`registry::ProviderRegistry`] of adapters, a two-tier TTL
//! [`cache::CacheLayer`], and the [`fetch::MediaFetcher`] /
//! [`upload::MediaUploader`] engines that coordinate concurrent
//! multi-provider I/O under partial failure. Concrete provider adapters,
//! HTTP transport, persistence, and the presentation layer live outside
//! and plug in through the traits defined here.

pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod model;
pub mod provider;
pub mod registry;
mod retry;
pub mod upload;

pub use error::{Error, Result};
