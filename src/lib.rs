//! Asset recommendation API.
//!
//! Users the trained collaborative-filtering model has history for get
//! model-ranked assets; everyone else gets a static, risk-tier based list.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
