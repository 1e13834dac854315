use super::node::{Element, Node};
use super::render;
use crate::export::vcard::vcard_filename;
use crate::model::{Card, Template};

/// Standalone HTML page for the public share link
///
/// The QR code is drawn client-side from `data-qr-value`.
pub fn share_page(card: &Card, template: Template, share_url: &str, vcard_href: &str) -> String {
    let name = card.display_name();

    let head = Element::new("head")
        .child(Element::new("meta").attr("charset", "utf-8"))
        .child(
            Element::new("meta")
                .attr("name", "viewport")
                .attr("content", "width=device-width, initial-scale=1"),
        )
        .child(Element::new("title").text(format!("{name} | V-Card")))
        .child(
            Element::new("meta")
                .attr("property", "og:url")
                .attr("content", share_url),
        );

    let share = Element::new("section")
        .part("share")
        .class("share-panel mt-8 flex flex-col items-center gap-3")
        .child(
            Element::new("div")
                .part("qr")
                .class("qr-code")
                .attr("role", "img")
                .attr("aria-label", format!("QR code linking to {name}'s card"))
                .attr("data-qr-value", share_url),
        )
        .child(
            Element::new("a")
                .part("share-url")
                .attr("href", share_url)
                .text(share_url),
        )
        .child(
            Element::new("a")
                .part("vcard-download")
                .class("button")
                .attr("href", vcard_href)
                .attr("download", vcard_filename(card))
                .text("Save contact"),
        );

    let body = Element::new("body")
        .class("share-page min-h-screen bg-slate-50 p-6")
        .child(Element::new("main").child(render(card, template)).child(share));

    let document: Node = Element::new("html")
        .attr("lang", "en")
        .child(head)
        .child(body)
        .into();

    format!("<!DOCTYPE html>{}", document.to_html())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::business_card;

    #[test]
    fn test_share_page_document() {
        let card = business_card();
        let html = share_page(
            &card,
            card.template,
            "https://cards.example.com/share/acme-studio-00aa",
            "/cards/acme-studio-00aa/vcard",
        );

        assert!(html.starts_with("<!DOCTYPE html><html lang=\"en\">"));
        assert!(html.contains("<title>Acme Studio | V-Card</title>"));
        assert!(html.contains("data-qr-value=\"https://cards.example.com/share/acme-studio-00aa\""));
        assert!(html.contains("href=\"/cards/acme-studio-00aa/vcard\" download=\"acme-studio.vcf\""));
        assert!(html.contains("data-template=\"classic\""));
        assert!(html.ends_with("</html>"));
    }
}
