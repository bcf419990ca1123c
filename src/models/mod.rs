use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Whether a listing is offered for rent or for sale
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ListingKind {
    Rent,
    Sale,
}

impl ListingKind {
    /// Category segment as it appears in the stored `type` field
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingKind::Rent => "rent",
            ListingKind::Sale => "sale",
        }
    }
}

/// Geographic coordinates attached to a listing
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// A listing document as written to the `listings` collection.
/// Field names mirror the stored document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    #[serde(rename = "type")]
    pub kind: ListingKind,
    pub name: String,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub parking: bool,
    pub furnished: bool,
    pub offer: bool,
    pub regular_price: i64,
    /// Present iff `offer` is set; always below `regular_price`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discounted_price: Option<i64>,
    /// Normalized address (geocoded when geocoding is enabled)
    pub location: String,
    pub geolocation: GeoPoint,
    /// Ordered image URLs, 1..=6 entries; the first is the cover image
    pub img_urls: Vec<String>,
    /// Owner's user id
    pub user_ref: String,
}

impl Listing {
    /// Price to display: the discounted price when an offer is active
    pub fn effective_price(&self) -> i64 {
        if self.offer {
            self.discounted_price.unwrap_or(self.regular_price)
        } else {
            self.regular_price
        }
    }

    pub fn cover_image(&self) -> Option<&str> {
        self.img_urls.first().map(String::as_str)
    }
}

/// A listing as read back from the store: document id plus the
/// server-assigned creation timestamp
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredListing {
    pub id: String,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub data: Listing,
}

/// Opaque pagination handle derived from the last item of a fetched page.
/// Resumption is strictly after (created_at desc, id desc), so pages stay
/// disjoint even when timestamps collide.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PageCursor {
    pub created_at: DateTime<Utc>,
    pub id: String,
}

impl PageCursor {
    /// Cursor pointing just past the given record
    pub fn after(listing: &StoredListing) -> Self {
        Self {
            created_at: listing.created_at,
            id: listing.id.clone(),
        }
    }
}

/// The `users` document mirroring the auth record, kept for query convenience
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
}

/// Identity snapshot from the auth session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub uid: String,
    pub email: String,
    pub display_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effective_price_prefers_discount_when_offered() {
        let listing = sample(true, Some(80));
        assert_eq!(listing.effective_price(), 80);
    }

    #[test]
    fn effective_price_ignores_discount_without_offer() {
        let listing = sample(false, None);
        assert_eq!(listing.effective_price(), 100);
    }

    #[test]
    fn listing_serializes_with_document_field_names() {
        let value = serde_json::to_value(sample(true, Some(80))).unwrap();
        assert_eq!(value["type"], "sale");
        assert_eq!(value["regularPrice"], 100);
        assert_eq!(value["discountedPrice"], 80);
        assert_eq!(value["imgUrls"][0], "https://img/cover.jpg");
        assert_eq!(value["userRef"], "owner-1");
    }

    #[test]
    fn absent_discount_is_omitted_from_the_document() {
        let value = serde_json::to_value(sample(false, None)).unwrap();
        assert!(value.get("discountedPrice").is_none());
    }

    fn sample(offer: bool, discounted_price: Option<i64>) -> Listing {
        Listing {
            kind: ListingKind::Sale,
            name: "Sample house".to_string(),
            bedrooms: 3,
            bathrooms: 2,
            parking: true,
            furnished: false,
            offer,
            regular_price: 100,
            discounted_price,
            location: "1 Main St".to_string(),
            geolocation: GeoPoint { lat: 1.0, lng: 2.0 },
            img_urls: vec!["https://img/cover.jpg".to_string()],
            user_ref: "owner-1".to_string(),
        }
    }
}
