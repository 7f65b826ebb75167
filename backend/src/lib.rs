//! # Power Dash Backend
//!
//! Aggregation engine and JSON API for an electricity-trading operations
//! dashboard.
//!
//! The crate turns raw market, settlement, contract, customer, weather and
//! power-plan rows into chart-ready series: grouped aggregates, histograms,
//! time-aligned spreads and summary statistics.
//!
//! ## Architecture
//!
//! - [`api`]: chart shapes and per-view DTOs
//! - [`config`]: TOML configuration with environment overrides
//! - [`db`]: data source abstraction with live (Postgres) and synthetic sources
//! - [`services`]: aggregation primitives and the view services built on them
//! - [`routes`]: route-specific request and response types
//! - [`http`]: axum-based HTTP server and handlers
//!
//! Sparse data is never filled with fabricated values: absent observations
//! stay absent unless a zero policy is configured explicitly.

// SourceError carries a rich context for debugging.
#![allow(clippy::result_large_err)]

pub mod api;
pub mod config;

pub mod db;
pub mod models;

pub mod routes;

pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
