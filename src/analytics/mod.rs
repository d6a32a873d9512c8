//! Visit analytics: best-effort derivation of geography, device and browser
//! for each redirect, plus the models the analytics report is built from.
//!
//! Every lookup in here follows the same contract: best effort, may return
//! absent. Nothing in this module is allowed to fail a redirect.

pub mod client_ip;
pub mod geoip;
pub mod models;
pub mod user_agent;

pub use client_ip::extract_client_ip;
pub use geoip::GeoIpService;
pub use models::{AnalyticsReport, DimensionCount, NewVisit, RecentVisit};
