//! Per-instance session management
//!
//! Each instance id owns one slot holding its last issued [`SessionToken`].
//! A slot is guarded by an async mutex that is held across the login call,
//! so concurrent callers for the same id wait for a single login and then
//! share its token. Slots for different ids are independent.

use std::sync::Arc;
use std::time::Duration;

use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use base64::Engine;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use rdi_domain::constants::MSG_INVALID_ACCESS_TOKEN;
use rdi_domain::{RdiError, RdiInstance, Result, SessionToken};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use super::normalizer;
use super::urls;
use crate::http::HttpClient;

type SessionSlot = Arc<Mutex<Option<SessionToken>>>;

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    access_token: Option<String>,
}

#[derive(Deserialize)]
struct JwtClaims {
    exp: Option<f64>,
}

/// Keyed token store plus the login flow that fills it
pub struct SessionManager {
    http: HttpClient,
    expiry_margin: Duration,
    sessions: DashMap<String, SessionSlot>,
}

impl SessionManager {
    pub fn new(http: HttpClient, expiry_margin: Duration) -> Self {
        Self { http, expiry_margin, sessions: DashMap::new() }
    }

    /// Return a valid token for `instance`, logging in only when the cached
    /// one is missing or within the expiry margin.
    ///
    /// # Errors
    /// Fails with `Unauthorized` when RDI rejects the credentials or returns
    /// an undecodable token, and with a generic error when RDI is
    /// unreachable.
    #[instrument(skip(self, instance), fields(instance_id = %instance.id))]
    pub async fn ensure_session(&self, instance: &RdiInstance) -> Result<SessionToken> {
        let slot = self.slot(&instance.id);
        let mut cached = slot.lock().await;

        if let Some(token) = cached.as_ref() {
            if token.is_valid_at(Utc::now(), self.expiry_margin) {
                return Ok(token.clone());
            }
            debug!(expires_at = %token.expires_at(), "Cached RDI token expired");
        }

        let token = self.login(instance).await?;
        *cached = Some(token.clone());
        Ok(token)
    }

    /// Drop `token` for `instance_id` after RDI rejected it.
    ///
    /// A token issued by a concurrent re-login is left in place.
    pub async fn discard(&self, instance_id: &str, token: &SessionToken) {
        let Some(slot) = self.sessions.get(instance_id).map(|entry| Arc::clone(entry.value()))
        else {
            return;
        };

        let mut cached = slot.lock().await;
        if cached.as_ref().is_some_and(|current| current.value() == token.value()) {
            warn!(instance_id, "RDI rejected session token, evicting it");
            *cached = None;
        }
    }

    /// Forget the session of one instance. Returns `true` if one was cached.
    pub fn invalidate(&self, instance_id: &str) -> bool {
        let removed = self.sessions.remove(instance_id).is_some();
        if removed {
            debug!(instance_id, "RDI session invalidated");
        }
        removed
    }

    /// Remove every session whose token has expired. Returns the number of
    /// removed sessions.
    ///
    /// Slots with a login in flight are skipped. An expired slot that a caller
    /// still holds is cleared but kept in the map, so that caller and any
    /// later one share the same login.
    pub fn evict_expired(&self) -> usize {
        let now = Utc::now();
        let before = self.sessions.len();

        // `retain` holds the shard lock, so no new clone of a slot can appear
        // while its strong count is checked.
        self.sessions.retain(|_, slot| {
            let Ok(mut cached) = slot.try_lock() else {
                return true;
            };
            if cached.as_ref().is_some_and(|token| token.is_valid_at(now, self.expiry_margin)) {
                return true;
            }
            *cached = None;
            Arc::strong_count(slot) > 1
        });

        let evicted = before.saturating_sub(self.sessions.len());
        if evicted > 0 {
            debug!(evicted, "Evicted expired RDI sessions");
        }
        evicted
    }

    /// Run [`evict_expired`](Self::evict_expired) every `interval` until
    /// `cancel` fires.
    pub fn spawn_eviction_task(
        self: Arc<Self>,
        interval: Duration,
        cancel: CancellationToken,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        debug!("RDI session eviction loop cancelled");
                        break;
                    }
                    _ = tokio::time::sleep(interval) => {
                        self.evict_expired();
                    }
                }
            }
        })
    }

    /// Number of instances with a session slot
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    fn slot(&self, instance_id: &str) -> SessionSlot {
        Arc::clone(self.sessions.entry(instance_id.to_string()).or_default().value())
    }

    async fn login(&self, instance: &RdiInstance) -> Result<SessionToken> {
        let url = urls::endpoint(&instance.url, urls::LOGIN, &[])?;
        let body = LoginRequest { username: &instance.username, password: &instance.password };

        let response = self.http.send(self.http.request(Method::POST, url).json(&body)).await?;

        if !response.status().is_success() {
            let upstream = normalizer::error_from_response(response).await;
            warn!(status = upstream.http_status, "RDI login rejected");
            let mut error = RdiError::unauthorized(upstream.message);
            error.details = upstream.details;
            return Err(error);
        }

        let reply: LoginResponse = response
            .json()
            .await
            .map_err(|_| RdiError::unauthorized(MSG_INVALID_ACCESS_TOKEN))?;
        let access_token =
            reply.access_token.ok_or_else(|| RdiError::unauthorized(MSG_INVALID_ACCESS_TOKEN))?;
        let expires_at = decode_expiry(&access_token)?;

        info!(expires_at = %expires_at, "Logged in to RDI");
        Ok(SessionToken::new(access_token, expires_at))
    }
}

/// Read the `exp` claim of a JWT without verifying its signature.
fn decode_expiry(jwt: &str) -> Result<DateTime<Utc>> {
    let invalid = || RdiError::unauthorized(MSG_INVALID_ACCESS_TOKEN);

    let payload = jwt.split('.').nth(1).ok_or_else(invalid)?.trim_end_matches('=');
    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .or_else(|_| STANDARD_NO_PAD.decode(payload))
        .map_err(|_| invalid())?;
    let claims: JwtClaims = serde_json::from_slice(&bytes).map_err(|_| invalid())?;

    #[allow(clippy::cast_possible_truncation)]
    let exp = claims.exp.filter(|exp| exp.is_finite()).ok_or_else(invalid)? as i64;
    DateTime::from_timestamp(exp, 0).ok_or_else(invalid)
}
