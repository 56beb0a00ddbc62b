//! imgstash - image asset helpers.
//!
//! Normalizes heterogeneous image references to displayable URLs, persists
//! ordered image collections to a string-keyed text store, and recompresses
//! images to bounded dimensions and quality.
//! This library exposes modules for integration testing.

pub mod data_url;
pub mod error;
pub mod models;
pub mod services;
