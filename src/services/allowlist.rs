// Safe-domain allowlist backed by a remote public domain list
// Readers always see a complete snapshot; refreshes swap the whole set at once

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::app_config::AllowlistConfig;

// =============================================================================
// ERROR TYPES
// =============================================================================

#[derive(Debug, Error)]
pub enum AllowlistError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Allowlist source returned HTTP {0}")]
    HttpStatus(u16),

    #[error("Allowlist loading is disabled in configuration")]
    Disabled,
}

// =============================================================================
// CONSTANTS
// =============================================================================

/// Well-known domains that are always on the allowlist, whatever the remote
/// source returns.
pub const SUPPLEMENTAL_DOMAINS: [&str; 10] = [
    "google.com",
    "youtube.com",
    "facebook.com",
    "twitter.com",
    "instagram.com",
    "linkedin.com",
    "github.com",
    "microsoft.com",
    "apple.com",
    "amazon.com",
];

// =============================================================================
// DATA STRUCTURES
// =============================================================================

/// Immutable set of allowlisted domains.
#[derive(Debug, Default)]
pub struct AllowlistSnapshot {
    domains: HashSet<String>,
}

impl AllowlistSnapshot {
    /// Exact-match membership test.
    pub fn contains(&self, domain: &str) -> bool {
        self.domains.contains(domain)
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    fn insert_with_www(&mut self, line: &str) {
        let domain = line.trim().to_lowercase();
        if domain.is_empty() {
            return;
        }
        self.domains.insert(format!("www.{}", domain));
        self.domains.insert(domain);
    }

    fn add_supplemental(&mut self) {
        for domain in SUPPLEMENTAL_DOMAINS {
            self.insert_with_www(domain);
        }
    }
}

/// Load bookkeeping reported by the health and refresh endpoints.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AllowlistStatus {
    pub domain_count: usize,
    pub last_loaded_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

// =============================================================================
// DOMAIN ALLOWLIST
// =============================================================================

pub struct DomainAllowlist {
    current: RwLock<Arc<AllowlistSnapshot>>,
    status: RwLock<AllowlistStatus>,
    /// Held for the whole of `load` so refreshes apply one at a time
    load_lock: tokio::sync::Mutex<()>,
    http_client: reqwest::Client,
    config: AllowlistConfig,
}

impl DomainAllowlist {
    /// Create an empty allowlist that loads from the configured source.
    pub fn new(config: AllowlistConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.fetch_timeout_secs))
            .user_agent("URL-Classifier-Allowlist/1.0")
            .build()
            .unwrap_or_default();

        Self {
            current: RwLock::new(Arc::new(AllowlistSnapshot::default())),
            status: RwLock::new(AllowlistStatus::default()),
            load_lock: tokio::sync::Mutex::new(()),
            http_client,
            config,
        }
    }

    /// Build an allowlist from in-memory domains plus the supplemental set.
    /// Remote loading is disabled on the result.
    pub fn with_domains<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let allowlist = Self::new(AllowlistConfig {
            enabled: false,
            refresh_interval_hours: 0,
            ..AllowlistConfig::default()
        });

        let mut snapshot = AllowlistSnapshot::default();
        for domain in domains {
            snapshot.insert_with_www(domain.as_ref());
        }
        snapshot.add_supplemental();
        allowlist.swap(snapshot);
        allowlist
    }

    /// Current snapshot. Hold on to it for the duration of one lookup batch.
    pub fn snapshot(&self) -> Arc<AllowlistSnapshot> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Exact-match membership test against the current snapshot.
    pub fn contains(&self, domain: &str) -> bool {
        self.snapshot().contains(domain)
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }

    pub fn status(&self) -> AllowlistStatus {
        match self.status.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn config(&self) -> &AllowlistConfig {
        &self.config
    }

    /// Fetch the remote list and publish a new snapshot. Concurrent calls
    /// run one after another, each starting from the latest snapshot.
    ///
    /// Failure is non-fatal: the previous contents stay in place, merged with
    /// the supplemental domains, and the error is returned for reporting.
    pub async fn load(&self) -> Result<usize, AllowlistError> {
        let _loading = self.load_lock.lock().await;

        let fetched = if self.config.enabled {
            self.fetch_remote().await
        } else {
            Err(AllowlistError::Disabled)
        };

        match fetched {
            Ok(snapshot) => {
                let count = snapshot.len();
                self.swap(snapshot);
                self.record(|status| {
                    status.domain_count = count;
                    status.last_loaded_at = Some(Utc::now());
                    status.last_error = None;
                });
                info!("Loaded {} safe domains", count);
                Ok(count)
            },
            Err(e) => {
                match &e {
                    AllowlistError::Disabled => {
                        info!("Remote allowlist disabled, using supplemental domains only")
                    },
                    _ => error!("Error loading safe domains: {}", e),
                }
                let count = self.keep_previous_with_supplemental();
                let message = e.to_string();
                self.record(|status| {
                    status.domain_count = count;
                    status.last_error = Some(message);
                });
                Err(e)
            },
        }
    }

    async fn fetch_remote(&self) -> Result<AllowlistSnapshot, AllowlistError> {
        info!("Fetching safe domain list from {}", self.config.source_url);

        let response = self
            .http_client
            .get(&self.config.source_url)
            .send()
            .await?;

        if response.status() != reqwest::StatusCode::OK {
            warn!(
                "Failed to load safe domains list: HTTP {}",
                response.status()
            );
            return Err(AllowlistError::HttpStatus(response.status().as_u16()));
        }

        let text = response.text().await?;
        let mut snapshot = AllowlistSnapshot::default();
        for line in text.lines() {
            snapshot.insert_with_www(line);
        }
        snapshot.add_supplemental();

        Ok(snapshot)
    }

    fn keep_previous_with_supplemental(&self) -> usize {
        let previous = self.snapshot();
        let missing_supplemental = SUPPLEMENTAL_DOMAINS
            .iter()
            .any(|domain| !previous.contains(domain));

        if !missing_supplemental {
            return previous.len();
        }

        let mut merged = AllowlistSnapshot {
            domains: previous.domains.clone(),
        };
        merged.add_supplemental();
        let count = merged.len();
        self.swap(merged);
        count
    }

    fn swap(&self, snapshot: AllowlistSnapshot) {
        let snapshot = Arc::new(snapshot);
        match self.current.write() {
            Ok(mut guard) => *guard = snapshot,
            Err(poisoned) => *poisoned.into_inner() = snapshot,
        }
    }

    fn record(&self, update: impl FnOnce(&mut AllowlistStatus)) {
        match self.status.write() {
            Ok(mut guard) => update(&mut guard),
            Err(poisoned) => update(&mut poisoned.into_inner()),
        }
    }
}

// =============================================================================
// BACKGROUND REFRESHER
// =============================================================================

/// Spawn a background task that reloads the allowlist on the configured
/// interval. The initial load is expected to have happened at startup.
pub fn spawn_allowlist_refresher(allowlist: Arc<DomainAllowlist>) {
    let config = allowlist.config();
    if !config.enabled || config.refresh_interval_hours == 0 {
        info!("Periodic allowlist refresh is disabled in configuration");
        return;
    }

    let update_interval_secs = config.refresh_interval_hours * 3600;

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(update_interval_secs));

        // Skip the first tick since startup already loaded the list
        interval.tick().await;

        loop {
            interval.tick().await;

            info!("Starting scheduled allowlist refresh...");
            match allowlist.load().await {
                Ok(count) => info!("Allowlist refresh successful: {} domains", count),
                Err(e) => error!("Allowlist refresh failed: {}", e),
            }
        }
    });
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_domains_adds_www_variants_and_supplemental() {
        let allowlist = DomainAllowlist::with_domains(["Example.COM ", "", "  "]);

        assert!(allowlist.contains("example.com"));
        assert!(allowlist.contains("www.example.com"));
        assert!(allowlist.contains("github.com"));
        assert!(allowlist.contains("www.github.com"));
        assert!(!allowlist.contains("Example.COM"));
        assert_eq!(allowlist.len(), 2 + SUPPLEMENTAL_DOMAINS.len() * 2);
    }

    #[test]
    fn test_snapshot_survives_swap() {
        let allowlist = DomainAllowlist::with_domains(["old.example"]);
        let before = allowlist.snapshot();

        let mut replacement = AllowlistSnapshot::default();
        replacement.insert_with_www("new.example");
        allowlist.swap(replacement);

        assert!(before.contains("old.example"));
        assert!(!before.contains("new.example"));
        assert!(allowlist.contains("new.example"));
        assert!(!allowlist.contains("old.example"));
    }

    #[tokio::test]
    async fn test_disabled_load_keeps_previous_contents() {
        let allowlist = DomainAllowlist::with_domains(["kept.example"]);

        let result = allowlist.load().await;

        assert!(matches!(result, Err(AllowlistError::Disabled)));
        assert!(allowlist.contains("kept.example"));
        assert!(allowlist.contains("amazon.com"));
        let status = allowlist.status();
        assert_eq!(status.domain_count, allowlist.len());
        assert!(status.last_error.is_some());
    }

    #[tokio::test]
    async fn test_failed_first_load_still_has_supplemental() {
        let allowlist = DomainAllowlist::new(AllowlistConfig {
            // Nothing listens on the discard port
            source_url: "http://127.0.0.1:9/domains.txt".to_string(),
            fetch_timeout_secs: 1,
            ..AllowlistConfig::default()
        });
        assert!(allowlist.is_empty());

        let result = allowlist.load().await;

        assert!(result.is_err());
        assert_eq!(allowlist.len(), SUPPLEMENTAL_DOMAINS.len() * 2);
        assert!(allowlist.contains("www.youtube.com"));
        assert!(allowlist.status().last_loaded_at.is_none());
    }
}
