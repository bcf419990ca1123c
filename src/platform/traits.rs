use crate::error::Result;
use crate::models::{AuthUser, Listing, ListingKind, PageCursor, StoredListing, UserProfile};
use async_trait::async_trait;
use tokio::sync::watch;

/// Which slice of the listings collection a query targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingFilter {
    /// Listings whose `type` field equals the category
    Category(ListingKind),
    /// Listings owned by the given user id
    Owner(String),
}

/// Auth session state as published to subscribers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthState {
    /// No auth event observed yet
    #[default]
    Unknown,
    SignedOut,
    SignedIn(AuthUser),
}

/// Read/write access to the `listings` collection
#[async_trait]
pub trait ListingStore: Send + Sync {
    /// Fetch one page ordered by creation time descending, resuming
    /// strictly after `cursor` when one is given.
    async fn query_page(
        &self,
        filter: &ListingFilter,
        page_size: usize,
        cursor: Option<&PageCursor>,
    ) -> Result<Vec<StoredListing>>;

    async fn get(&self, id: &str) -> Result<Option<StoredListing>>;

    /// Write a new document; the store assigns its id and creation timestamp
    async fn add(&self, listing: Listing) -> Result<StoredListing>;

    async fn delete(&self, id: &str) -> Result<()>;
}

/// The `users` collection mirroring auth display names
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn upsert_profile(&self, uid: &str, profile: &UserProfile) -> Result<()>;
}

/// Blob storage for listing images
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Upload bytes under `key`, resolving to a durable download URL
    async fn upload(&self, key: &str, bytes: Vec<u8>) -> Result<String>;
}

/// Auth session operations and the state-change subscription
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Typed subscription to auth-state changes; dropping the receiver
    /// is the unsubscription.
    fn subscribe(&self) -> watch::Receiver<AuthState>;

    fn current_user(&self) -> Option<AuthUser>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser>;

    async fn sign_out(&self) -> Result<()>;

    async fn update_display_name(&self, name: &str) -> Result<()>;

    async fn send_password_reset(&self, email: &str) -> Result<()>;
}
