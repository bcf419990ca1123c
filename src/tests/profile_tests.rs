use crate::error::MarketError;
use crate::listings::PAGE_SIZE;
use crate::models::ListingKind;
use crate::platform::AuthService;
use crate::profile::ProfileManager;
use crate::tests::fake::FakePlatform;

#[tokio::test]
async fn unchanged_name_skips_both_writes() {
    let platform = FakePlatform::new();
    platform.set_user("uid-ana", "ana@example.com", Some("Ana"));

    let manager = ProfileManager::new(&platform, &platform);
    let wrote = manager.update_name("Ana").await.unwrap();

    assert!(!wrote);
    assert_eq!(platform.name_updates(), 0);
    assert_eq!(platform.profile_writes(), 0);
}

#[tokio::test]
async fn changed_name_writes_auth_record_and_mirror() {
    let platform = FakePlatform::new();
    platform.set_user("uid-ana", "ana@example.com", Some("Ana"));

    let manager = ProfileManager::new(&platform, &platform);
    let wrote = manager.update_name("Bo").await.unwrap();

    assert!(wrote);
    assert_eq!(platform.name_updates(), 1);
    assert_eq!(platform.profile_writes(), 1);

    let mirror = platform.profile_of("uid-ana").unwrap();
    assert_eq!(mirror.name, "Bo");
    assert_eq!(mirror.email, "ana@example.com");

    // The session reflects the new name too
    assert_eq!(
        platform.current_user().unwrap().display_name.as_deref(),
        Some("Bo")
    );
}

#[tokio::test]
async fn profile_operations_require_a_session() {
    let platform = FakePlatform::new();
    let manager = ProfileManager::new(&platform, &platform);

    assert!(matches!(
        manager.update_name("Bo").await.unwrap_err(),
        MarketError::Auth(_)
    ));
    assert!(matches!(
        manager.own_listings().unwrap_err(),
        MarketError::Auth(_)
    ));
}

#[tokio::test]
async fn own_listings_show_only_the_owners_records() {
    let platform = FakePlatform::new();
    platform.seed(ListingKind::Rent, 3, "uid-ana").await;
    platform.seed(ListingKind::Sale, 2, "uid-bo").await;
    platform.set_user("uid-ana", "ana@example.com", Some("Ana"));

    let manager = ProfileManager::new(&platform, &platform);
    let mut feed = manager.own_listings().unwrap();
    feed.fetch_page(&platform).await.unwrap();

    assert_eq!(feed.items().len(), 3);
    assert!(feed.items().iter().all(|l| l.data.user_ref == "uid-ana"));
}

#[tokio::test]
async fn own_listings_paginate_like_the_category_view() {
    let platform = FakePlatform::new();
    platform.seed(ListingKind::Rent, 12, "uid-ana").await;
    platform.set_user("uid-ana", "ana@example.com", Some("Ana"));

    let manager = ProfileManager::new(&platform, &platform);
    let mut feed = manager.own_listings().unwrap();

    assert_eq!(feed.fetch_page(&platform).await.unwrap(), PAGE_SIZE);
    assert!(feed.has_more());
    assert_eq!(feed.fetch_page(&platform).await.unwrap(), 2);
    assert!(!feed.has_more());
}

#[tokio::test]
async fn delete_removes_the_listing_everywhere() {
    let platform = FakePlatform::new();
    platform.seed(ListingKind::Rent, 3, "uid-ana").await;
    platform.set_user("uid-ana", "ana@example.com", Some("Ana"));

    let manager = ProfileManager::new(&platform, &platform);
    let mut feed = manager.own_listings().unwrap();
    feed.fetch_page(&platform).await.unwrap();

    let doomed = feed.items()[0].id.clone();
    manager
        .delete_listing(&platform, &mut feed, &doomed)
        .await
        .unwrap();

    assert!(feed.items().iter().all(|l| l.id != doomed));

    // A fresh fetch of the owner's listings never includes it again
    let mut refetched = manager.own_listings().unwrap();
    refetched.fetch_page(&platform).await.unwrap();
    assert_eq!(refetched.items().len(), 2);
    assert!(refetched.items().iter().all(|l| l.id != doomed));
}

#[tokio::test]
async fn password_reset_reaches_the_auth_service() {
    let platform = FakePlatform::new();
    platform
        .send_password_reset("ana@example.com")
        .await
        .unwrap();
    assert_eq!(platform.reset_emails(), vec!["ana@example.com"]);
}
