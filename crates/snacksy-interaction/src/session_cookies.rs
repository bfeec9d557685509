//! Session cookies for the API origin.
//!
//! The backend authenticates credentialed calls with an HTTP-only cookie set
//! by the login endpoint. The jar is shared with the HTTP client and its
//! contents for the API origin are mirrored to `cookies.json`, so a restored
//! user record comes back together with the cookie that makes it usable.
//!
//! The jar does not expose expiry, so `Max-Age` is read from the login
//! response's `Set-Cookie` headers and stored as an absolute time next to
//! each pair. Expired entries are dropped on restore.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use reqwest::Url;
use reqwest::cookie::{CookieStore, Jar};
use serde::{Deserialize, Serialize};
use snacksy_core::error::{Result, SnacksyError};
use snacksy_infrastructure::storage::AtomicFile;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct StoredCookies {
    origin: String,
    cookies: Vec<StoredCookie>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct StoredCookie {
    /// `name=value`.
    pair: String,
    /// Unix seconds; `None` for a cookie without `Max-Age`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    expires_at: Option<u64>,
}

/// Cookie jar bound to one API origin, optionally persisted.
pub struct SessionCookies {
    jar: Arc<Jar>,
    origin: Url,
    file: Option<AtomicFile<StoredCookies>>,
    /// Expiry per cookie name, from `Set-Cookie` or from the stored file.
    expiries: Mutex<HashMap<String, u64>>,
}

impl SessionCookies {
    /// A jar that lives only in memory.
    pub fn in_memory(api_base_url: &str) -> Result<Self> {
        Ok(Self {
            jar: Arc::new(Jar::default()),
            origin: parse_origin(api_base_url)?,
            file: None,
            expiries: Mutex::new(HashMap::new()),
        })
    }

    /// A jar mirrored to `path`, pre-filled with what was stored for the
    /// same origin. Cookies stored for a different origin are ignored.
    pub fn persistent(api_base_url: &str, path: PathBuf) -> Result<Self> {
        let origin = parse_origin(api_base_url)?;
        let jar = Arc::new(Jar::default());
        let file = AtomicFile::<StoredCookies>::json(path);

        let mut expiries = HashMap::new();
        match file.load() {
            Ok(Some(stored)) if stored.origin == origin.as_str() => {
                let now = unix_now();
                let mut restored = 0;
                for cookie in &stored.cookies {
                    match cookie.expires_at {
                        Some(at) if at <= now => {
                            tracing::debug!("[SessionCookies] Dropping expired cookie");
                        }
                        Some(at) => {
                            let header = format!("{}; Max-Age={}", cookie.pair, at - now);
                            jar.add_cookie_str(&header, &origin);
                            if let Some(name) = cookie_name(&cookie.pair) {
                                expiries.insert(name.to_string(), at);
                            }
                            restored += 1;
                        }
                        None => {
                            jar.add_cookie_str(&cookie.pair, &origin);
                            restored += 1;
                        }
                    }
                }
                tracing::debug!(
                    "[SessionCookies] Restored {} cookie(s) for {}",
                    restored,
                    origin
                );
            }
            Ok(Some(stored)) => {
                tracing::info!(
                    "[SessionCookies] Ignoring cookies stored for {} (now {})",
                    stored.origin,
                    origin
                );
            }
            Ok(None) => {}
            Err(e) => tracing::warn!("[SessionCookies] Ignoring unreadable cookie file: {}", e),
        }

        Ok(Self {
            jar,
            origin,
            file: Some(file),
            expiries: Mutex::new(expiries),
        })
    }

    /// The jar to install into the HTTP client.
    pub fn jar(&self) -> Arc<Jar> {
        self.jar.clone()
    }

    /// `name=value` pairs currently held for the API origin.
    pub fn current(&self) -> Vec<String> {
        self.jar
            .cookies(&self.origin)
            .and_then(|header| header.to_str().ok().map(str::to_string))
            .map(|header| {
                header
                    .split("; ")
                    .filter(|pair| !pair.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Notes the `Max-Age` of each `Set-Cookie` header value so that
    /// [`persist`](Self::persist) can store when the cookie expires.
    pub fn record_set_cookies<'a>(&self, headers: impl IntoIterator<Item = &'a str>) {
        let now = unix_now();
        let mut expiries = self.lock_expiries();
        for header in headers {
            let Some(name) = cookie_name(header) else {
                continue;
            };
            match max_age(header) {
                Some(secs) => {
                    expiries.insert(name.to_string(), now.saturating_add(secs));
                }
                None => {
                    expiries.remove(name);
                }
            }
        }
    }

    /// Writes the current cookies to disk.
    pub fn persist(&self) -> Result<()> {
        let Some(file) = &self.file else {
            return Ok(());
        };
        let expiries = self.lock_expiries();
        let cookies = self
            .current()
            .into_iter()
            .map(|pair| StoredCookie {
                expires_at: cookie_name(&pair).and_then(|name| expiries.get(name).copied()),
                pair,
            })
            .collect();
        let stored = StoredCookies {
            origin: self.origin.to_string(),
            cookies,
        };
        Ok(file.save(&stored)?)
    }

    /// Expires every cookie for the origin and deletes the file.
    pub fn clear(&self) -> Result<()> {
        for pair in self.current() {
            if let Some(name) = cookie_name(&pair) {
                self.jar
                    .add_cookie_str(&format!("{}=; Max-Age=0; Path=/", name), &self.origin);
            }
        }
        self.lock_expiries().clear();
        if let Some(file) = &self.file {
            file.remove()?;
        }
        Ok(())
    }

    fn lock_expiries(&self) -> std::sync::MutexGuard<'_, HashMap<String, u64>> {
        self.expiries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn cookie_name(header: &str) -> Option<&str> {
    let (name, _) = header.split_once('=')?;
    let name = name.trim();
    (!name.is_empty()).then_some(name)
}

/// The `Max-Age` attribute of a `Set-Cookie` value, in seconds. Negative
/// values count as zero.
fn max_age(header: &str) -> Option<u64> {
    header.split(';').skip(1).find_map(|attr| {
        let (key, value) = attr.split_once('=')?;
        if !key.trim().eq_ignore_ascii_case("max-age") {
            return None;
        }
        let secs: i64 = value.trim().parse().ok()?;
        Some(secs.max(0) as u64)
    })
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

fn parse_origin(api_base_url: &str) -> Result<Url> {
    let url = Url::parse(api_base_url)
        .map_err(|e| SnacksyError::config(format!("invalid api base url: {}", e)))?;
    url.join("/")
        .map_err(|e| SnacksyError::config(format!("invalid api base url: {}", e)))
}
