mod config;
mod error;
mod geocode;
mod listings;
mod models;
mod platform;
mod profile;
mod session;

#[cfg(test)]
mod tests;

use config::PlatformConfig;
use listings::CategoryFeed;
use models::ListingKind;
use platform::{AuthService, ListingFilter, PlatformClient};
use profile::ProfileManager;
use session::Session;
use tracing::{info, warn, Level};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    info!("🏠 House Market - category browser");
    info!("==================================");
    info!("");

    let kind = match std::env::args().nth(1).as_deref() {
        Some("sale") => ListingKind::Sale,
        _ => ListingKind::Rent,
    };

    let config = PlatformConfig::from_env()?;
    let client = PlatformClient::new(&config)?;

    // Optional sign-in so the profile section below has an identity
    if let (Ok(email), Ok(password)) = (
        std::env::var("MARKET_EMAIL"),
        std::env::var("MARKET_PASSWORD"),
    ) {
        match client.sign_in(&email, &password).await {
            Ok(user) => info!("Signed in as {}", user.email),
            Err(e) => warn!("Sign-in failed, browsing anonymously: {e}"),
        }
    }

    let session = Session::observe(&client);
    info!("Session: logged_in={}", session.status().logged_in);
    info!("");

    info!("Fetching {} listings...", kind.as_str());

    let mut feed = CategoryFeed::new(ListingFilter::Category(kind));
    feed.fetch_page(&client).await?;

    while feed.has_more() {
        info!("Loading more...");
        feed.fetch_page(&client).await?;
    }

    info!("\n✅ Fetched {} listings\n", feed.items().len());

    for (i, listing) in feed.items().iter().enumerate() {
        let data = &listing.data;
        println!("{}. {} (${})", i + 1, data.name, data.effective_price());
        println!("   {}", data.location);
        println!("   {} bed, {} bath", data.bedrooms, data.bathrooms);
        if let Some(cover) = data.cover_image() {
            println!("   Cover: {cover}");
        }
        println!("   ID: {}", listing.id);
        println!();
    }

    // With an identity, also show the signed-in user's own listings
    if session.status().logged_in {
        let manager = ProfileManager::new(&client, &client);
        let mut own = manager.own_listings()?;
        own.fetch_page(&client).await?;
        while own.has_more() {
            own.fetch_page(&client).await?;
        }
        info!("💼 You own {} listings", own.items().len());
    }

    Ok(())
}
