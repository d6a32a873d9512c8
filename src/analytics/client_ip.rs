//! Client IP extraction from HTTP headers
//!
//! Prefers the first entry of `X-Forwarded-For` when it parses as an
//! address, falling back to the socket peer address.

use axum::http::HeaderMap;
use std::net::IpAddr;

pub fn extract_client_ip(headers: &HeaderMap, peer: IpAddr) -> IpAddr {
    forwarded_for(headers).unwrap_or(peer)
}

fn forwarded_for(headers: &HeaderMap) -> Option<IpAddr> {
    let xff = headers.get("x-forwarded-for")?.to_str().ok()?;
    xff.split(',').next()?.trim().parse::<IpAddr>().ok()
}
