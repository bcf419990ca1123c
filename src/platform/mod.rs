pub mod rest;
pub mod traits;

pub use rest::PlatformClient;
pub use traits::{AuthService, AuthState, BlobStore, ListingFilter, ListingStore, UserStore};
