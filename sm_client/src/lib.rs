//! Internal modules for the six-max table driver.
//!
//! This library provides command parsing, the HTTP hand store client, and
//! table rendering used by the sm_client binary.

pub mod api_client;
pub mod commands;
pub mod render;
