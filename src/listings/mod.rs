pub mod query;
pub mod submit;

pub use query::{CategoryFeed, PAGE_SIZE};
pub use submit::{submit_listing, ImageUpload, ListingDraft, MAX_IMAGES};
