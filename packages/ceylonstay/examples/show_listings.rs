//! Print the visible CeylonStay catalog.
//!
//! Reads Firebase settings from the environment (or a `.env` file) and
//! renders each listing the way the site's cards do.

use anyhow::Result;
use chrono::Utc;
use tracing_subscriber::EnvFilter;

use ceylonstay::{queries, stores, whatsapp, Config, Price};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    let store = stores::firebase::listing_store(&config);

    let listings = queries::visible_listings(&store).await?;
    if listings.is_empty() {
        println!("No listings available. Check back later for new properties.");
        return Ok(());
    }

    let today = Utc::now().date_naive();
    for listing in &listings {
        let (amount, unit) = match listing.price {
            Price::PerNight(amount) => (amount, "night"),
            Price::PerMonth(amount) => (amount, "month"),
        };

        println!("{} - {}", listing.title, listing.location);
        println!(
            "  {} bedrooms · {} bathrooms · ${} / {}",
            listing.bedrooms, listing.bathrooms, amount, unit
        );
        println!("  {}", listing.availability.label(today));
        println!("  {} photos", listing.photos.len());
        println!(
            "  message host: {}",
            whatsapp::listing_inquiry_link(&config.contact_phone, &listing.title)
        );
        println!();
    }

    Ok(())
}
