//! HTTP hand history store.
//!
//! Finished six-max hands are posted here by table clients and can be listed
//! or fetched by id. Hands live in PostgreSQL, or in memory for local play
//! and tests.

pub mod api;
pub mod config;
pub mod logging;
pub mod metrics;
