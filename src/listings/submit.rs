use crate::error::{MarketError, Result};
use crate::geocode::GeocodeService;
use crate::models::{GeoPoint, Listing, ListingKind, StoredListing};
use crate::platform::{BlobStore, ListingStore};
use futures::future::try_join_all;
use tracing::{debug, info};
use uuid::Uuid;

/// Most images a listing may carry; the first is the cover image
pub const MAX_IMAGES: usize = 6;

/// An image selected for upload
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// The submission form as filled in by the user
#[derive(Debug, Clone)]
pub struct ListingDraft {
    pub kind: ListingKind,
    pub name: String,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub parking: bool,
    pub furnished: bool,
    pub offer: bool,
    pub regular_price: i64,
    pub discounted_price: i64,
    /// Free-text address, normalized by geocoding when enabled
    pub address: String,
    /// Manual coordinates, used only when geocoding is disabled
    pub latitude: f64,
    pub longitude: f64,
    pub geocode_enabled: bool,
    pub images: Vec<ImageUpload>,
}

impl ListingDraft {
    /// Business-rule gate, run before any network call
    pub fn validate(&self) -> Result<()> {
        if self.offer && self.discounted_price >= self.regular_price {
            return Err(MarketError::Validation(
                "discounted price must be below the regular price".into(),
            ));
        }
        if self.images.is_empty() {
            return Err(MarketError::Validation(
                "select at least one image".into(),
            ));
        }
        if self.images.len() > MAX_IMAGES {
            return Err(MarketError::Validation(format!(
                "at most {MAX_IMAGES} images are allowed"
            )));
        }
        Ok(())
    }
}

/// Run the full submission: validate, geocode, upload images, write the
/// document. Any failure aborts the whole thing with nothing persisted;
/// on success the stored record is returned so the caller can navigate
/// to its detail view.
pub async fn submit_listing(
    draft: ListingDraft,
    owner: &str,
    store: &dyn ListingStore,
    blobs: &dyn BlobStore,
    geocoder: &dyn GeocodeService,
) -> Result<StoredListing> {
    draft.validate()?;

    let (location, geolocation) = if draft.geocode_enabled {
        let resolved = geocoder.lookup(&draft.address).await?;
        (resolved.formatted, resolved.point)
    } else {
        (
            draft.address.clone(),
            GeoPoint {
                lat: draft.latitude,
                lng: draft.longitude,
            },
        )
    };

    let img_urls = upload_images(draft.images, owner, blobs).await?;

    let listing = Listing {
        kind: draft.kind,
        name: draft.name,
        bedrooms: draft.bedrooms,
        bathrooms: draft.bathrooms,
        parking: draft.parking,
        furnished: draft.furnished,
        offer: draft.offer,
        regular_price: draft.regular_price,
        // The field is dropped from the document entirely without an offer
        discounted_price: draft.offer.then_some(draft.discounted_price),
        location,
        geolocation,
        img_urls,
        user_ref: owner.to_string(),
    };

    let stored = store.add(listing).await?;
    info!(id = %stored.id, "listing created");
    Ok(stored)
}

/// Upload every image concurrently, joined all-or-nothing: a single
/// failure rejects the whole batch and no document is written. URLs come
/// back in input order, so the first selected image stays the cover.
async fn upload_images(
    images: Vec<ImageUpload>,
    owner: &str,
    blobs: &dyn BlobStore,
) -> Result<Vec<String>> {
    debug!(count = images.len(), "uploading images");

    let uploads = images.into_iter().map(|image| {
        // Random suffix keeps same-named files from colliding
        let key = format!("images/{}-{}-{}", owner, image.file_name, Uuid::new_v4());
        async move { blobs.upload(&key, image.bytes).await }
    });

    try_join_all(uploads).await
}
