use crate::config::PlatformConfig;
use crate::error::{MarketError, Result};
use crate::models::{AuthUser, Listing, PageCursor, StoredListing, UserProfile};
use crate::platform::traits::{
    AuthService, AuthState, BlobStore, ListingFilter, ListingStore, UserStore,
};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::RwLock;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, warn};

/// HTTP client for the backing platform: document store, auth, and
/// blob storage behind one base URL.
pub struct PlatformClient {
    http: Client,
    api_url: String,
    api_key: String,
    token: RwLock<Option<String>>,
    auth_tx: watch::Sender<AuthState>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    token: String,
    uid: String,
    email: String,
    display_name: Option<String>,
}

#[derive(Deserialize)]
struct QueryResponse {
    documents: Vec<StoredListing>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadResponse {
    download_url: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    field: &'static str,
    equals: &'a str,
    order_by: &'static str,
    direction: &'static str,
    limit: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    start_after: Option<&'a PageCursor>,
}

impl PlatformClient {
    pub fn new(config: &PlatformConfig) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        let (auth_tx, _) = watch::channel(AuthState::Unknown);

        Ok(Self {
            http,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            token: RwLock::new(None),
            auth_tx,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path)
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let mut req = self
            .http
            .request(method, self.url(path))
            .header("x-api-key", &self.api_key);
        if let Some(token) = self.token.read().ok().and_then(|t| t.clone()) {
            req = req.bearer_auth(token);
        }
        req
    }

    fn set_token(&self, token: Option<String>) {
        if let Ok(mut slot) = self.token.write() {
            *slot = token;
        }
    }
}

#[async_trait]
impl ListingStore for PlatformClient {
    async fn query_page(
        &self,
        filter: &ListingFilter,
        page_size: usize,
        cursor: Option<&PageCursor>,
    ) -> Result<Vec<StoredListing>> {
        let (field, equals) = match filter {
            ListingFilter::Category(kind) => ("type", kind.as_str()),
            ListingFilter::Owner(uid) => ("userRef", uid.as_str()),
        };

        debug!(field, equals, page_size, resuming = cursor.is_some(), "querying listings");

        let body = QueryRequest {
            field,
            equals,
            order_by: "createdAt",
            direction: "desc",
            limit: page_size,
            start_after: cursor,
        };

        let resp = self
            .request(reqwest::Method::POST, "collections/listings/query")
            .json(&body)
            .send()
            .await
            .map_err(|e| MarketError::Fetch(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(MarketError::Fetch(format!(
                "listings query returned {}",
                resp.status()
            )));
        }

        let page: QueryResponse = resp
            .json()
            .await
            .map_err(|e| MarketError::Fetch(e.to_string()))?;
        Ok(page.documents)
    }

    async fn get(&self, id: &str) -> Result<Option<StoredListing>> {
        let resp = self
            .request(reqwest::Method::GET, &format!("collections/listings/{id}"))
            .send()
            .await
            .map_err(|e| MarketError::Fetch(e.to_string()))?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !resp.status().is_success() {
            return Err(MarketError::Fetch(format!(
                "listing fetch returned {}",
                resp.status()
            )));
        }

        let listing = resp
            .json()
            .await
            .map_err(|e| MarketError::Fetch(e.to_string()))?;
        Ok(Some(listing))
    }

    async fn add(&self, listing: Listing) -> Result<StoredListing> {
        let resp = self
            .request(reqwest::Method::POST, "collections/listings")
            .json(&listing)
            .send()
            .await
            .map_err(|e| MarketError::Fetch(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(MarketError::Fetch(format!(
                "listing write returned {}",
                resp.status()
            )));
        }

        resp.json()
            .await
            .map_err(|e| MarketError::Fetch(e.to_string()))
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let resp = self
            .request(
                reqwest::Method::DELETE,
                &format!("collections/listings/{id}"),
            )
            .send()
            .await
            .map_err(|e| MarketError::Fetch(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(MarketError::Fetch(format!(
                "listing delete returned {}",
                resp.status()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl UserStore for PlatformClient {
    async fn upsert_profile(&self, uid: &str, profile: &UserProfile) -> Result<()> {
        let resp = self
            .request(reqwest::Method::PUT, &format!("collections/users/{uid}"))
            .json(profile)
            .send()
            .await
            .map_err(|e| MarketError::Fetch(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(MarketError::Fetch(format!(
                "profile upsert returned {}",
                resp.status()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl BlobStore for PlatformClient {
    async fn upload(&self, key: &str, bytes: Vec<u8>) -> Result<String> {
        debug!(key, size = bytes.len(), "uploading image");

        let resp = self
            .request(reqwest::Method::POST, &format!("storage/{key}"))
            .header("content-type", "application/octet-stream")
            .body(bytes)
            .send()
            .await
            .map_err(|e| MarketError::Upload(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(MarketError::Upload(format!(
                "upload returned {}",
                resp.status()
            )));
        }

        let done: UploadResponse = resp
            .json()
            .await
            .map_err(|e| MarketError::Upload(e.to_string()))?;
        debug!(key, url = %done.download_url, "upload complete");
        Ok(done.download_url)
    }
}

#[async_trait]
impl AuthService for PlatformClient {
    fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.auth_tx.subscribe()
    }

    fn current_user(&self) -> Option<AuthUser> {
        match &*self.auth_tx.borrow() {
            AuthState::SignedIn(user) => Some(user.clone()),
            _ => None,
        }
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser> {
        let resp = self
            .request(reqwest::Method::POST, "auth/sign-in")
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| MarketError::Auth(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(MarketError::Auth(format!(
                "sign-in returned {}",
                resp.status()
            )));
        }

        let signed: SignInResponse = resp
            .json()
            .await
            .map_err(|e| MarketError::Auth(e.to_string()))?;

        let user = AuthUser {
            uid: signed.uid,
            email: signed.email,
            display_name: signed.display_name,
        };

        self.set_token(Some(signed.token));
        self.auth_tx.send_replace(AuthState::SignedIn(user.clone()));
        Ok(user)
    }

    async fn sign_out(&self) -> Result<()> {
        let resp = self
            .request(reqwest::Method::POST, "auth/sign-out")
            .send()
            .await
            .map_err(|e| MarketError::Auth(e.to_string()))?;

        if !resp.status().is_success() {
            warn!(status = %resp.status(), "sign-out rejected by platform");
            return Err(MarketError::Auth(format!(
                "sign-out returned {}",
                resp.status()
            )));
        }

        self.set_token(None);
        self.auth_tx.send_replace(AuthState::SignedOut);
        Ok(())
    }

    async fn update_display_name(&self, name: &str) -> Result<()> {
        let resp = self
            .request(reqwest::Method::PATCH, "auth/profile")
            .json(&json!({ "displayName": name }))
            .send()
            .await
            .map_err(|e| MarketError::Auth(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(MarketError::Auth(format!(
                "profile update returned {}",
                resp.status()
            )));
        }

        self.auth_tx.send_modify(|state| {
            if let AuthState::SignedIn(user) = state {
                user.display_name = Some(name.to_string());
            }
        });
        Ok(())
    }

    async fn send_password_reset(&self, email: &str) -> Result<()> {
        let resp = self
            .request(reqwest::Method::POST, "auth/password-reset")
            .json(&json!({ "email": email }))
            .send()
            .await
            .map_err(|e| MarketError::Auth(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(MarketError::Auth(format!(
                "password reset returned {}",
                resp.status()
            )));
        }
        Ok(())
    }
}
