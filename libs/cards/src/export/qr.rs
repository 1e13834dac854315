use crate::model::Card;
use serde::Serialize;

/// Public share URL encoded in a card's QR code
pub fn share_url(origin: &str, slug: &str) -> String {
    format!("{}/share/{slug}", origin.trim_end_matches('/'))
}

/// What the client needs to draw a QR code
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QrPayload {
    pub slug: String,
    pub value: String,
}

impl QrPayload {
    pub fn for_card(origin: &str, card: &Card) -> Self {
        Self {
            slug: card.slug.clone(),
            value: share_url(origin, &card.slug),
        }
    }
}
