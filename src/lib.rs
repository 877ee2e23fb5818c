//! # Diario
//!
//! Daily snapshots of a news site's section feeds.
//!
//! ## Architecture
//!
//! ```text
//! Fetcher (×N, concurrent) → Normalizer → Sanitizer → Store
//! Store → dates → sections → items
//! ```
//!
//! - [`fetcher`]: fetches section feeds and composes snapshots
//! - [`normalizer`]: converts XML feeds into document trees and sanitizes keys
//! - [`store`]: date-keyed snapshot persistence over a REST database
//!
//! ## Quick Start
//!
//! ```bash
//! # Fetch every section and store today's snapshot
//! diario load
//!
//! # Drill down into what was stored
//! diario dates
//! diario sections 2026-02-07
//! diario items 2026-02-07 deportes/futbol
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together the transport,
/// composer and store from one [`Config`](config::Config).
pub mod app;

/// Command-line interface using clap.
///
/// - `load` - Compose and store today's snapshot
/// - `dates` - List stored dates
/// - `sections <date>` - List the sections of a date
/// - `items <date> <section>` - List the items of a section
pub mod cli;

/// Configuration loaded from `~/.config/diario/config.toml`.
pub mod config;

/// Core domain models.
///
/// - [`Node`](domain::Node): parsed feed document tree
/// - [`Snapshot`](domain::Snapshot): one day's section results
/// - [`extract_items`](domain::extract_items): entry list of a stored feed
pub mod domain;

/// Feed fetching and snapshot composition.
///
/// - [`FeedFetcher`](fetcher::FeedFetcher): one section, one request
/// - [`SnapshotComposer`](fetcher::SnapshotComposer): all sections, concurrently
pub mod fetcher;

/// XML to document tree conversion and key sanitization.
pub mod normalizer;

/// Snapshot persistence.
///
/// - [`Store`](store::Store): Trait defining storage operations
/// - [`RestStore`](store::RestStore): JSON-over-REST implementation
pub mod store;

/// HTTP seam shared by the fetcher and the store.
pub mod transport;
