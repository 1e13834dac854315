//! Template rendering engine
//!
//! Rendering is pure: the same card and template always produce the same
//! [`Node`] tree. Optional fields that are absent are simply not rendered, so
//! a card holding only its required fields renders under every template.

pub mod layouts;
pub mod node;
mod page;

use crate::model::{Card, Template};

pub use layouts::{Layout, initial, layout_for};
pub use node::{Element, Node};
pub use page::share_page;

pub fn render(card: &Card, template: Template) -> Node {
    layout_for(template)(card)
}

/// Render with the template stored on the card
pub fn render_card(card: &Card) -> Node {
    render(card, card.template)
}
