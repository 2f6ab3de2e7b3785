//! # Energy Dashboard Backend
//!
//! Weekly energy-market dashboard engine.
//!
//! This crate assembles the data behind a weekly operations dashboard for the
//! electricity market: hydrological and load metrics per submarket, spot
//! prices, and the futures contracts traded on the power exchange. It exposes
//! the assembled views through a REST API via Axum.
//!
//! ## Features
//!
//! - **Week Alignment**: pair the selected operational week with the weeks
//!   before it and compare each one with its predecessor
//! - **Forward Contracts**: derive the annual, semester and quarter contracts
//!   that have not started delivery yet and resolve them against the catalog
//! - **View Routing**: decide between the dashboard and a product detail view
//!   from query parameters, with fallbacks for malformed input
//! - **HTTP API**: read-only JSON endpoints for a front end
//!
//! ## Architecture
//!
//! - [`models`]: weeks, metrics tables, contract keys and products
//! - [`db`]: repository traits, in-memory storage and dataset snapshots
//! - [`services`]: alignment, contract selection, routing and view assembly
//! - [`config`]: TOML configuration with environment overrides
//! - [`http`]: Axum-based HTTP server and request handlers

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod config;
pub mod db;
pub mod models;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
