//! # Murmur
//!
//! A terminal client for a small social blog: sign in, read the feed, like
//! posts, follow authors and comment.
//!
//! ## Architecture
//!
//! ```text
//! CredentialStore → Session → SessionGuard → Feed/Profile screens → Gateway
//! ```
//!
//! Screens never talk to storage directly. They ask their [`SessionGuard`]
//! for the credential, and every protected response passes back through it,
//! so a `401` anywhere ends the session and routes to `/login`.
//!
//! Likes and follows are applied optimistically and reconciled when the
//! server answers; only the answer to the newest request is applied.
//!
//! ## Quick Start
//!
//! ```bash
//! murmur login ana
//! murmur feed
//! murmur like 12
//! murmur comment 12 nice post
//! ```
//!
//! [`SessionGuard`]: session::SessionGuard

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct owns the session and builds
/// every screen.
pub mod app;

/// Typed HTTP client for the blog API.
///
/// - [`Gateway`](api::Gateway): async trait, one method per endpoint
/// - [`HttpGateway`](api::HttpGateway): reqwest implementation
pub mod api;

/// Command-line interface using clap.
pub mod cli;

/// Configuration loaded from `~/.config/murmur/config.toml`.
pub mod config;

/// Core domain records.
pub mod domain;

/// Feed screen state, optimistic interactions and reconciliation.
pub mod feed;

/// Profile screen.
pub mod profile;

/// Session ownership, the session guard, login and navigation.
pub mod session;

/// Credential persistence.
///
/// - [`CredentialStore`](store::CredentialStore): storage trait
/// - [`SqliteCredentialStore`](store::SqliteCredentialStore): survives restarts
pub mod store;
