//! Access tokens minted from a Google service-account key.
//!
//! The key signs a short-lived RS256 assertion which is exchanged at the
//! key's `token_uri` for a bearer token (the JWT bearer grant). Tokens are
//! cached until a minute before they expire.

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;

use super::StoreError;

pub const DATASTORE_SCOPE: &str = "https://www.googleapis.com/auth/datastore";

const GOOGLE_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: u64 = 3600;
const REFRESH_MARGIN: Duration = Duration::from_secs(60);

#[derive(Deserialize)]
struct ServiceAccountKey {
    client_email: String,
    private_key: String,
    #[serde(default)]
    token_uri: Option<String>,
    #[serde(default)]
    project_id: Option<String>,
}

#[derive(Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: u64,
    exp: u64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

struct CachedToken {
    value: String,
    expires_at: Instant,
}

/// A parsed service-account key that can mint Firestore access tokens.
pub struct ServiceAccount {
    client_email: String,
    token_uri: String,
    project_id: Option<String>,
    key: EncodingKey,
    cached: Mutex<Option<CachedToken>>,
}

impl std::fmt::Debug for ServiceAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccount")
            .field("client_email", &self.client_email)
            .field("token_uri", &self.token_uri)
            .field("project_id", &self.project_id)
            .field("key", &"[REDACTED]")
            .finish()
    }
}

impl ServiceAccount {
    /// Parse the credentials JSON downloaded from the Google Cloud console.
    pub fn from_json(creds_json: &str) -> Result<Self, StoreError> {
        let key: ServiceAccountKey = serde_json::from_str(creds_json)
            .map_err(|e| StoreError::Credentials(format!("invalid service-account JSON: {e}")))?;
        let signing_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes()).map_err(|e| {
            StoreError::Credentials(format!("invalid service-account private key: {e}"))
        })?;

        Ok(Self {
            client_email: key.client_email,
            token_uri: key.token_uri.unwrap_or_else(|| GOOGLE_TOKEN_URI.into()),
            project_id: key.project_id.filter(|p| !p.trim().is_empty()),
            key: signing_key,
            cached: Mutex::new(None),
        })
    }

    /// Point the token exchange somewhere else (emulators, tests).
    pub fn with_token_uri(mut self, token_uri: impl Into<String>) -> Self {
        self.token_uri = token_uri.into();
        self
    }

    pub fn client_email(&self) -> &str {
        &self.client_email
    }

    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    fn assertion(&self, issued_at: u64) -> Result<String, StoreError> {
        let claims = Claims {
            iss: &self.client_email,
            scope: DATASTORE_SCOPE,
            aud: &self.token_uri,
            iat: issued_at,
            exp: issued_at + ASSERTION_LIFETIME_SECS,
        };
        jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &self.key)
            .map_err(|e| StoreError::Credentials(format!("failed to sign token request: {e}")))
    }

    /// Current bearer token, exchanging a fresh assertion when the cached one is stale.
    pub async fn access_token(&self, http: &reqwest::Client) -> Result<String, StoreError> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref() {
            if token.expires_at > Instant::now() + REFRESH_MARGIN {
                return Ok(token.value.clone());
            }
        }

        let issued_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        let assertion = self.assertion(issued_at)?;

        debug!(account = %self.client_email, "requesting Firestore access token");
        let response = http
            .post(&self.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(StoreError::Credentials(format!(
                "token exchange failed: HTTP {status}: {text}"
            )));
        }
        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| StoreError::Credentials(format!("invalid token response: {e}")))?;

        let lifetime = token
            .expires_in
            .unwrap_or(ASSERTION_LIFETIME_SECS)
            .min(ASSERTION_LIFETIME_SECS);
        *cached = Some(CachedToken {
            value: token.access_token.clone(),
            expires_at: Instant::now() + Duration::from_secs(lifetime),
        });
        Ok(token.access_token)
    }
}

/// How the Firestore sink authenticates.
pub enum FirestoreAuth {
    /// Pre-minted bearer token, used as is.
    Token(String),
    ServiceAccount(ServiceAccount),
}

impl std::fmt::Debug for FirestoreAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Token(_) => f.write_str("Token([REDACTED])"),
            Self::ServiceAccount(account) => {
                f.debug_tuple("ServiceAccount").field(account).finish()
            }
        }
    }
}

impl FirestoreAuth {
    pub async fn bearer(&self, http: &reqwest::Client) -> Result<String, StoreError> {
        match self {
            Self::Token(token) => Ok(token.clone()),
            Self::ServiceAccount(account) => account.access_token(http).await,
        }
    }
}
