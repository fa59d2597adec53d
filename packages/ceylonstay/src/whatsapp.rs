//! WhatsApp deep links for the operator messaging side channel.
//!
//! Inquiries never pass through the backend; listings link straight to a
//! pre-filled chat with the host.

const WHATSAPP_BASE_URL: &str = "https://wa.me";

/// Link opening a chat about one listing.
pub fn listing_inquiry_link(phone: &str, listing_title: &str) -> String {
    let message = format!("Hi! I'm interested in your {listing_title} listing on CeylonStay.");
    deep_link(phone, &message)
}

/// Link for property owners who want to get listed.
pub fn get_listed_link(phone: &str) -> String {
    deep_link(phone, "Hi! I'm interested in listing my property on CeylonStay.")
}

fn deep_link(phone: &str, message: &str) -> String {
    format!(
        "{}/{}?text={}",
        WHATSAPP_BASE_URL,
        phone,
        urlencoding::encode(message)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inquiry_link_encodes_the_message() {
        let link = listing_inquiry_link("94779598514", "Beach Villa");
        assert!(link.starts_with("https://wa.me/94779598514?text="));
        assert!(link.contains("Beach%20Villa"));
        assert!(!link.contains(' '));
    }

    #[test]
    fn test_get_listed_link_mentions_listing_a_property() {
        let link = get_listed_link("94779598514");
        assert!(link.contains("listing%20my%20property"));
    }
}
