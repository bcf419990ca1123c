use crate::error::{MarketError, Result};
use crate::listings::CategoryFeed;
use crate::models::{AuthUser, UserProfile};
use crate::platform::{AuthService, ListingFilter, ListingStore, UserStore};
use tracing::info;

/// Profile-page operations for the signed-in user
pub struct ProfileManager<'a> {
    auth: &'a dyn AuthService,
    users: &'a dyn UserStore,
}

impl<'a> ProfileManager<'a> {
    pub fn new(auth: &'a dyn AuthService, users: &'a dyn UserStore) -> Self {
        Self { auth, users }
    }

    /// Name and email shown on the profile page, from the auth session
    pub fn current(&self) -> Option<AuthUser> {
        self.auth.current_user()
    }

    /// Write the new display name to the auth record and the mirrored
    /// user document. Skipped entirely when the name is unchanged;
    /// returns whether anything was written.
    pub async fn update_name(&self, new_name: &str) -> Result<bool> {
        let user = self.signed_in()?;

        if user.display_name.as_deref() == Some(new_name) {
            return Ok(false);
        }

        self.auth.update_display_name(new_name).await?;
        self.users
            .upsert_profile(
                &user.uid,
                &UserProfile {
                    name: new_name.to_string(),
                    email: user.email.clone(),
                },
            )
            .await?;

        info!(uid = %user.uid, "display name updated");
        Ok(true)
    }

    /// Paginated feed over the signed-in user's own listings; same page
    /// size and cursor rules as the category view.
    pub fn own_listings(&self) -> Result<CategoryFeed> {
        let user = self.signed_in()?;
        Ok(CategoryFeed::new(ListingFilter::Owner(user.uid)))
    }

    /// Delete a listing the caller has already confirmed interactively,
    /// then drop it from the local view. Ownership is enforced by the
    /// platform, not re-checked here.
    pub async fn delete_listing(
        &self,
        store: &dyn ListingStore,
        feed: &mut CategoryFeed,
        id: &str,
    ) -> Result<()> {
        store.delete(id).await?;
        feed.remove(id);
        info!(id, "listing deleted");
        Ok(())
    }

    fn signed_in(&self) -> Result<AuthUser> {
        self.auth
            .current_user()
            .ok_or_else(|| MarketError::Auth("not signed in".into()))
    }
}
