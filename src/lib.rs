//! Data access for the Ikono gallery site: Cockpit content gateway, gallery
//! accessors and the optimized image URL cache.

pub mod application;
pub mod cache;
pub mod config;
pub mod domain;
pub mod infra;
