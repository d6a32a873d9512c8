//! GeoIP country lookup backed by a MaxMind GeoLite2/GeoIP2 MMDB
//!
//! The database is memory-mapped and shared behind an `Arc`. The service is
//! usable without a database; lookups then always return `None`.

use anyhow::{Context, Result};
use maxminddb::{geoip2, Mmap, Reader};
use std::net::IpAddr;
use std::sync::Arc;

pub struct GeoIpService {
    reader: Option<Arc<Reader<Mmap>>>,
}

impl GeoIpService {
    /// Open the MMDB at `path`, or build a no-op service when `path` is `None`
    pub fn new(path: Option<&str>) -> Result<Self> {
        let reader = if let Some(path) = path {
            let reader = unsafe { Reader::open_mmap(path) }
                .with_context(|| format!("Failed to open GeoIP database at {}", path))?;
            Some(Arc::new(reader))
        } else {
            None
        };

        Ok(Self { reader })
    }

    /// ISO country code for an address, if the database knows it
    pub fn country_code(&self, ip: IpAddr) -> Option<String> {
        let reader = self.reader.as_ref()?;

        if let Ok(result) = reader.lookup(ip) {
            if let Ok(Some(country)) = result.decode::<geoip2::Country>() {
                return country.country.iso_code.map(|s| s.to_string());
            }
        }

        None
    }
}

impl Clone for GeoIpService {
    fn clone(&self) -> Self {
        Self {
            reader: self.reader.clone(),
        }
    }
}
