//! Client core for a repository-search API.
//!
//! # Overview
//! Describes one HTTP call as a value (`RequestDescriptor`), performs it
//! through one of three interchangeable strategies on `ApiClient` (callback,
//! cancellable event stream, suspend/resume), decodes the body into
//! `SearchResults`, and surfaces failures through the closed `ApiError`
//! taxonomy. `RepositoryStore` consumes the executor, holding the fetched
//! items and republishing them to observers over a `watch` channel.
//!
//! # Design
//! - Descriptors are immutable, validated at construction, own no resources,
//!   and are built fresh per call.
//! - The three strategies share one perform-and-classify path, so a given
//!   response classifies identically regardless of strategy; network I/O
//!   always runs on a worker thread, never the caller's context.
//! - The transport engine is a single long-lived `ureq::Agent` inside
//!   `ApiClient`, constructed once and cloned by reference. No timeouts are
//!   configured; calls rely on the transport's defaults.
//! - Stream cancellation is best-effort: it suppresses delivery but does not
//!   tear down the socket.

pub mod client;
pub mod error;
pub mod http;
pub mod store;
pub mod types;

pub use client::{ApiClient, StreamEvent, Subscription};
pub use error::ApiError;
pub use http::{HttpMethod, RequestDescriptor};
pub use store::RepositoryStore;
pub use types::{search_repositories, Repository, SearchResults};
