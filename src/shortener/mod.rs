pub mod alias;
mod service;

pub use service::{extract_short_id, is_valid_custom_alias, is_valid_http_url, Shortener};
