//! User-Agent classification using woothee
//!
//! Maps woothee's device categories onto the coarse classes stored with
//! each visit. Anything unrecognized counts as `desktop`.

use woothee::parser::Parser;

pub const DEFAULT_DEVICE: &str = "desktop";

/// Device class and browser name derived from a User-Agent string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientInfo {
    pub device: String,
    pub browser: Option<String>,
}

pub fn classify(user_agent: &str) -> ClientInfo {
    let parser = Parser::new();
    let Some(result) = parser.parse(user_agent) else {
        return ClientInfo {
            device: DEFAULT_DEVICE.to_string(),
            browser: None,
        };
    };

    let device = match result.category {
        "smartphone" | "mobilephone" => "mobile",
        "appliance" => "tv",
        "crawler" => "crawler",
        _ => DEFAULT_DEVICE,
    }
    .to_string();

    let browser = if result.name.is_empty() || result.name == "UNKNOWN" {
        None
    } else {
        Some(result.name.to_string())
    };

    ClientInfo { device, browser }
}
