//! Tipee timeclock API client.
//!
//! Implements the outbound half of the push pipeline: one merged span
//! becomes one authenticated POST carrying a check-in/check-out pair to
//! Tipee's bulk timecheck endpoint.

use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;

use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};
use thiserror::Error;

use tc_core::{PushError, PushTransport};

/// Default request timeout for API calls.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Timestamp format Tipee expects on timecheck records.
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
/// Separator used when joining several per-record error strings.
const ERROR_JOIN: &str = " // ";

/// Client construction errors.
#[derive(Debug, Error)]
pub enum ClientError {
    /// A configuration field was invalid.
    #[error("invalid {field}: {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: &'static str,
    },
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

/// URL scheme for the Tipee endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    Https,
    Http,
}

impl Scheme {
    /// The port implied when none is configured.
    pub const fn default_port(self) -> u16 {
        match self {
            Self::Https => 443,
            Self::Http => 80,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Https => "https",
            Self::Http => "http",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where the Tipee instance lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub scheme: Scheme,
    pub hostname: String,
    /// Explicit port, or None to use the scheme's default.
    pub port: Option<u16>,
    /// API base path under the host, without a leading slash.
    pub base_path: String,
}

impl Endpoint {
    fn port(&self) -> u16 {
        self.port.unwrap_or_else(|| self.scheme.default_port())
    }

    /// Full URL of the bulk timecheck endpoint.
    fn bulk_url(&self) -> String {
        format!(
            "{}://{}:{}/{}/timeclock/timechecks/bulk",
            self.scheme,
            self.hostname,
            self.port(),
            self.base_path.trim_start_matches('/'),
        )
    }
}

/// Application credentials for the FORUM-TOKEN scheme.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Application name, hashed into the token's `app` field.
    pub app_name: String,
    /// Application private key, hashed with the timestamp into `hash`.
    pub app_secret: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("app_name", &self.app_name)
            .field("app_secret", &"[REDACTED]")
            .finish()
    }
}

/// Source of the unix timestamp embedded in authentication tokens.
///
/// Injectable so token construction is deterministic under test.
pub trait Clock: Send + Sync {
    fn unix_seconds(&self) -> i64;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn unix_seconds(&self) -> i64 {
        Utc::now().timestamp()
    }
}

/// One record of the bulk timecheck payload.
///
/// The `in` flag is present only on the check-in record; Tipee infers the
/// check-out from its absence.
#[derive(Debug, Serialize)]
struct Timecheck<'a> {
    person: i64,
    timeclock: &'a str,
    time: String,
    external_id: &'static str,
    #[serde(rename = "in", skip_serializing_if = "Option::is_none")]
    check_in: Option<bool>,
}

/// One record of the bulk response.
#[derive(Debug, Deserialize)]
struct TimecheckResult {
    success: bool,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ServerErrorBody {
    detail: String,
}

#[derive(Debug, Deserialize)]
struct ClientErrorBody {
    message: String,
}

/// Blocking client for a Tipee instance.
///
/// Pushes are synchronous and sequential; the client holds no mutable state
/// and a single instance serves a whole push pass.
pub struct TipeeClient {
    http: reqwest::blocking::Client,
    endpoint: Endpoint,
    credentials: Credentials,
    person: i64,
    tool_tag: String,
    clock: Box<dyn Clock>,
}

impl fmt::Debug for TipeeClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TipeeClient")
            .field("endpoint", &self.endpoint)
            .field("person", &self.person)
            .finish_non_exhaustive()
    }
}

impl TipeeClient {
    /// Creates a client using the system clock.
    pub fn new(
        endpoint: Endpoint,
        credentials: Credentials,
        person: i64,
    ) -> Result<Self, ClientError> {
        Self::with_clock(endpoint, credentials, person, Box::new(SystemClock))
    }

    /// Creates a client with an explicit clock.
    pub fn with_clock(
        endpoint: Endpoint,
        credentials: Credentials,
        person: i64,
        clock: Box<dyn Clock>,
    ) -> Result<Self, ClientError> {
        if endpoint.hostname.trim().is_empty() {
            return Err(ClientError::InvalidConfig {
                field: "hostname",
                reason: "cannot be empty",
            });
        }
        if credentials.app_name.trim().is_empty() {
            return Err(ClientError::InvalidConfig {
                field: "app_name",
                reason: "cannot be empty",
            });
        }
        if credentials.app_secret.trim().is_empty() {
            return Err(ClientError::InvalidConfig {
                field: "app_secret",
                reason: "cannot be empty",
            });
        }

        let http = reqwest::blocking::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(ClientError::ClientBuild)?;

        Ok(Self {
            http,
            endpoint,
            credentials,
            person,
            tool_tag: format!("tc {}", env!("CARGO_PKG_VERSION")),
            clock,
        })
    }

    /// Builds the FORUM-TOKEN authorization value.
    ///
    /// Recomputed fresh per push: the timestamp changes each call, which
    /// invalidates token reuse.
    fn api_token(&self) -> String {
        let timestamp = self.clock.unix_seconds();
        let app = hex::encode(Sha1::digest(self.credentials.app_name.as_bytes()));
        let hash = hex::encode(Sha1::digest(
            format!("{}{timestamp}", self.credentials.app_secret).as_bytes(),
        ));
        format!("FORUM-TOKEN timestamp={timestamp} app={app} hash={hash}")
    }

    /// The check-in/check-out pair covering one span.
    fn timechecks(&self, start: NaiveDateTime, end: NaiveDateTime) -> [Timecheck<'_>; 2] {
        [
            Timecheck {
                person: self.person,
                timeclock: &self.tool_tag,
                time: start.format(TIME_FORMAT).to_string(),
                external_id: "",
                check_in: Some(true),
            },
            Timecheck {
                person: self.person,
                timeclock: &self.tool_tag,
                time: end.format(TIME_FORMAT).to_string(),
                external_id: "",
                check_in: None,
            },
        ]
    }
}

impl PushTransport for TipeeClient {
    fn push(&self, start: NaiveDateTime, duration_secs: i64) -> Result<(), PushError> {
        let end = start + chrono::Duration::seconds(duration_secs);
        let url = self.endpoint.bulk_url();
        tracing::debug!(%url, start = %start, end = %end, "submitting timecheck pair");

        let response = self
            .http
            .post(&url)
            .header("Authorization", self.api_token())
            .json(&self.timechecks(start, end))
            .send()
            .map_err(|err| PushError::new(format!("request failed: {err}")))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|err| PushError::new(format!("failed to read response: {err}")))?;
        interpret_response(status, &body)
    }
}

/// Maps a bulk response to the push outcome.
///
/// HTTP 500 surfaces the server's `detail` message; any other non-OK status
/// surfaces its `message` field; an OK batch with unsuccessful records
/// surfaces the distinct per-record errors joined together. Everything else
/// is success.
fn interpret_response(status: u16, body: &str) -> Result<(), PushError> {
    if status == 500 {
        let parsed: ServerErrorBody = serde_json::from_str(body)
            .map_err(|err| PushError::new(format!("invalid error response: {err}")))?;
        return Err(PushError::new(parsed.detail));
    }

    if status != 200 {
        let parsed: ClientErrorBody = serde_json::from_str(body)
            .map_err(|err| PushError::new(format!("invalid error response: {err}")))?;
        return Err(PushError::new(parsed.message));
    }

    let results: Vec<TimecheckResult> = serde_json::from_str(body)
        .map_err(|err| PushError::new(format!("invalid response: {err}")))?;

    if results.iter().all(|record| record.success) {
        return Ok(());
    }

    // Distinct errors from every record carrying one, sorted for a
    // deterministic message.
    let errors: BTreeSet<&str> = results
        .iter()
        .filter_map(|record| record.error.as_deref())
        .collect();
    Err(PushError::new(
        errors.into_iter().collect::<Vec<_>>().join(ERROR_JOIN),
    ))
}
