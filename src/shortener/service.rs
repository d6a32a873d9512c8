use std::sync::Arc;
use url::Url;

use crate::error::ServiceError;
use crate::models::{GenerateResponse, ShortLink, ShortenResponse};
use crate::storage::{Storage, StorageError};

use super::alias;

/// Aliases that collide with the service's own routes can never be assigned
const RESERVED_ALIASES: &[&str] = &[
    "api",
    "info",
    "analytics",
    "generate",
    "resolve",
    "favicon.ico",
];

/// Insert attempts before a generated alias is declared exhausted
const MAX_INSERT_ATTEMPTS: usize = 5;

/// Probe attempts when only checking for an unused alias
const MAX_PROBE_ATTEMPTS: usize = 10;

#[derive(Clone)]
pub struct Shortener {
    storage: Arc<dyn Storage>,
    base_url: String,
}

impl Shortener {
    pub fn new(storage: Arc<dyn Storage>, base_url: String) -> Self {
        Self {
            storage,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn short_url(&self, short_id: &str) -> String {
        format!("{}/{}", self.base_url, short_id)
    }

    /// Map a long URL to a short alias, creating a mapping if necessary.
    ///
    /// Without a custom alias the operation is idempotent per long URL: a
    /// repeated submission returns the existing mapping untouched.
    pub async fn shorten(
        &self,
        long_url: &str,
        custom: Option<&str>,
    ) -> Result<ShortenResponse, ServiceError> {
        if !is_valid_http_url(long_url) {
            return Err(ServiceError::InvalidUrl);
        }

        if let Some(requested) = custom {
            if !is_valid_custom_alias(requested) {
                return Err(ServiceError::InvalidAlias);
            }

            if let Some(existing) = self.storage.get(requested).await? {
                if existing.long_url == long_url {
                    return Ok(self.created_response(existing));
                }
                return Err(ServiceError::AliasConflict);
            }

            // A concurrent insert of the same alias surfaces as Conflict
            // here and maps to AliasConflict
            let link = self.storage.insert(requested, long_url).await?;
            return Ok(self.created_response(link));
        }

        if let Some(existing) = self.storage.find_by_long_url(long_url).await? {
            return Ok(ShortenResponse {
                short_url: self.short_url(&existing.short_id),
                short_id: existing.short_id,
                long_url: existing.long_url,
                clicks: Some(existing.clicks),
                created_at: Some(existing.created_at),
            });
        }

        let link = self.insert_generated(long_url).await?;
        Ok(self.created_response(link))
    }

    /// Bounded generate-then-insert loop; retries only on alias collision
    async fn insert_generated(&self, long_url: &str) -> Result<ShortLink, ServiceError> {
        for _ in 0..MAX_INSERT_ATTEMPTS {
            let candidate = alias::generate();
            match self.storage.insert(&candidate, long_url).await {
                Ok(link) => return Ok(link),
                Err(StorageError::Conflict) => continue,
                Err(StorageError::Other(err)) => return Err(ServiceError::Store(err)),
            }
        }
        Err(ServiceError::GenerationExhausted)
    }

    /// Find an alias with no existing mapping without inserting anything
    pub async fn generate_unused(&self) -> Result<GenerateResponse, ServiceError> {
        for _ in 0..MAX_PROBE_ATTEMPTS {
            let candidate = alias::generate();
            if self.storage.get(&candidate).await?.is_none() {
                return Ok(GenerateResponse {
                    short_url: self.short_url(&candidate),
                    short_id: candidate,
                });
            }
        }
        Err(ServiceError::GenerationExhausted)
    }

    pub async fn lookup(&self, short_id: &str) -> Result<ShortLink, ServiceError> {
        self.storage
            .get(short_id)
            .await?
            .ok_or(ServiceError::NotFound)
    }

    /// Inspect a mapping from a bare alias or a full short URL. No click is
    /// counted and no visit is recorded.
    pub async fn resolve(&self, input: &str) -> Result<ShortLink, ServiceError> {
        let short_id = extract_short_id(input).ok_or(ServiceError::InvalidInput)?;
        self.lookup(&short_id).await
    }

    fn created_response(&self, link: ShortLink) -> ShortenResponse {
        ShortenResponse {
            short_url: self.short_url(&link.short_id),
            short_id: link.short_id,
            long_url: link.long_url,
            clicks: None,
            created_at: None,
        }
    }
}

pub fn is_valid_http_url(input: &str) -> bool {
    match Url::parse(input) {
        Ok(url) => matches!(url.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

pub fn is_valid_custom_alias(alias: &str) -> bool {
    if alias.len() < 3 || alias.len() > 64 {
        return false;
    }
    if !alias
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return false;
    }
    let lowered = alias.to_ascii_lowercase();
    !RESERVED_ALIASES.contains(&lowered.as_str())
}

/// Pull the alias out of a bare id or a full short URL
pub fn extract_short_id(input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if input.starts_with("http://") || input.starts_with("https://") {
        let parsed = Url::parse(input).ok()?;
        let path = parsed.path().trim_start_matches('/');
        if path.is_empty() {
            return None;
        }
        return Some(path.to_string());
    }

    let id = input.trim_start_matches('/');
    if id.is_empty() {
        None
    } else {
        Some(id.to_string())
    }
}
