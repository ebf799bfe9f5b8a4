//! Sales endpoint client with a local response cache.
//!
//! Each region/year request is cached as a gzip-compressed JSON file. Entries
//! older than the configured TTL are refetched; in offline mode only cached
//! entries are served. Only responses that decode as a JSON array are ever
//! written to the cache.

use crate::config;
use crate::error::{DashboardError, Result};
use crate::models::SourceQuery;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use rand::Rng;
use reqwest::blocking::Client;
use std::fs;
use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tempfile::NamedTempFile;

/// Fetches sales data from the endpoint and caches responses on disk.
pub struct CacheManager {
    /// Directory where cached responses are stored.
    pub cache_dir: PathBuf,
    /// If true, never contact the endpoint (use cached responses only).
    pub offline: bool,
    /// Sales endpoint URL.
    pub endpoint: String,
    /// Maximum age of a cached response before it is refetched.
    pub ttl: Duration,
    /// Extra attempts after a failed request.
    pub retries: u32,
    timeout: Duration,
    client: Option<Client>,
}

impl CacheManager {
    /// Create a new cache manager.
    ///
    /// If `cache_dir` is `None`, uses the platform-appropriate default cache directory.
    /// Creates the cache directory if it does not exist.
    pub fn new(cache_dir: Option<PathBuf>, offline: bool, timeout: Duration) -> Result<Self> {
        let dir = cache_dir.unwrap_or_else(config::default_cache_dir);
        fs::create_dir_all(&dir)?;
        Ok(Self {
            cache_dir: dir,
            offline,
            endpoint: config::SALES_URL.to_string(),
            ttl: config::DEFAULT_CACHE_TTL,
            retries: config::DEFAULT_RETRIES,
            timeout,
            client: None,
        })
    }

    /// Lazy HTTP client, created on first use.
    pub fn client(&mut self) -> Result<&Client> {
        if self.client.is_none() {
            let client = Client::builder()
                .timeout(self.timeout)
                .redirect(reqwest::redirect::Policy::limited(10))
                .build()?;
            self.client = Some(client);
        }
        self.client
            .as_ref()
            .ok_or_else(|| DashboardError::NotFound("HTTP client unavailable".to_string()))
    }

    /// Path of the cache entry for `query`.
    pub fn entry_path(&self, query: &SourceQuery) -> PathBuf {
        self.cache_dir.join(format!("{}.json.gz", query.cache_key()))
    }

    /// Whether the entry at `path` is missing or older than the TTL.
    ///
    /// An unreadable modification time counts as stale.
    fn is_stale(&self, path: &Path) -> bool {
        let modified = match fs::metadata(path).and_then(|m| m.modified()) {
            Ok(t) => t,
            Err(_) => return true,
        };
        match SystemTime::now().duration_since(modified) {
            Ok(age) => age > self.ttl,
            // Modified in the future (clock skew): treat as fresh.
            Err(_) => false,
        }
    }

    /// Load the sales response for `query`, fetching it when the cache has
    /// no fresh copy.
    pub fn load_sales(&mut self, query: &SourceQuery) -> Result<serde_json::Value> {
        let path = self.entry_path(query);

        if self.is_stale(&path) {
            if self.offline {
                if path.exists() {
                    tracing::debug!(path = %path.display(), "offline: serving stale cache entry");
                    return self.read_entry(&path);
                }
                return Err(DashboardError::NotFound(format!(
                    "Sales data for {} not cached and offline mode is enabled",
                    query.cache_key()
                )));
            }

            let body = self.fetch(query)?;
            let value: serde_json::Value = serde_json::from_slice(&body)?;
            if !value.is_array() {
                // Error objects sent with a 200 are never cached.
                return Err(DashboardError::Json(serde::de::Error::custom(
                    "expected a JSON array of sales records; response not cached",
                )));
            }
            self.store(query, &value)?;
            return Ok(value);
        }

        tracing::debug!(path = %path.display(), "cache hit");
        self.read_entry(&path)
    }

    /// Write `value` as the cache entry for `query`.
    ///
    /// Writes to a temp file in the cache directory and renames it into
    /// place, so readers never observe a partial entry.
    pub fn store(&self, query: &SourceQuery, value: &serde_json::Value) -> Result<()> {
        let path = self.entry_path(query);
        let tmp = NamedTempFile::new_in(&self.cache_dir)?;
        let mut encoder = GzEncoder::new(tmp, Compression::default());
        serde_json::to_writer(&mut encoder, value)?;
        let mut tmp = encoder.finish()?;
        tmp.flush()?;
        tmp.persist(&path).map_err(|e| e.error)?;
        tracing::debug!(path = %path.display(), "cached sales response");
        Ok(())
    }

    /// GET the endpoint for `query`, retrying transient failures.
    ///
    /// The request has no side effects on the server, so retrying it is safe.
    fn fetch(&mut self, query: &SourceQuery) -> Result<Vec<u8>> {
        let endpoint = self.endpoint.clone();
        let retries = self.retries;
        let client = self.client()?.clone();
        let params = query.params();

        let mut attempt: u32 = 0;
        loop {
            tracing::info!(url = %endpoint, ?params, attempt, "fetching sales data");
            let result = client
                .get(&endpoint)
                .query(&params)
                .send()
                .and_then(|resp| resp.error_for_status())
                .and_then(|resp| resp.bytes());

            match result {
                Ok(bytes) => {
                    tracing::info!(bytes = bytes.len(), "fetched sales data");
                    return Ok(bytes.to_vec());
                }
                Err(e) if attempt < retries && is_transient(&e) => {
                    let delay = retry_delay(attempt);
                    tracing::warn!(error = %e, ?delay, "sales request failed; retrying");
                    std::thread::sleep(delay);
                    attempt += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Read and decode a cache entry.
    ///
    /// If the entry is corrupt (truncated write, disk error), it is deleted
    /// so the next call refetches it.
    fn read_entry(&self, path: &Path) -> Result<serde_json::Value> {
        let parse_result = (|| -> Result<serde_json::Value> {
            let file = fs::File::open(path)?;
            let mut decoder = BufReader::new(GzDecoder::new(BufReader::new(file)));
            let mut contents = String::new();
            decoder.read_to_string(&mut contents)?;
            Ok(serde_json::from_str(&contents)?)
        })();

        match parse_result {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "corrupt cache entry; removing");
                let _ = fs::remove_file(path);
                Err(DashboardError::NotFound(format!(
                    "Cache entry '{}' was corrupt and has been removed. \
                     Retry to refetch. Original error: {}",
                    path.file_name()
                        .and_then(|n| n.to_str())
                        .unwrap_or("unknown"),
                    e
                )))
            }
        }
    }

    /// Remove all cached responses and recreate the cache directory.
    pub fn clear(&self) -> Result<()> {
        if self.cache_dir.exists() {
            fs::remove_dir_all(&self.cache_dir)?;
            fs::create_dir_all(&self.cache_dir)?;
        }
        Ok(())
    }

    /// Close the HTTP client, if open.
    pub fn close(&mut self) {
        self.client = None;
    }
}

/// Connection failures, timeouts and 5xx responses are worth another try;
/// 4xx responses and body decoding errors are not.
fn is_transient(e: &reqwest::Error) -> bool {
    if e.is_timeout() || e.is_connect() {
        return true;
    }
    e.status().map(|s| s.is_server_error()).unwrap_or(false)
}

/// Exponential backoff capped at [`config::RETRY_MAX_DELAY`], plus up to a
/// quarter of the delay in random jitter.
fn retry_delay(attempt: u32) -> Duration {
    let base = config::RETRY_BASE_DELAY.as_millis() as u64;
    let max = config::RETRY_MAX_DELAY.as_millis() as u64;
    let delay = base.saturating_mul(1u64 << attempt.min(8)).min(max);
    let jitter = rand::thread_rng().gen_range(0..=delay / 4);
    Duration::from_millis(delay + jitter)
}
