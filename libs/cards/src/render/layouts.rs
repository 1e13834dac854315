//! Card layouts, one function per template

use super::node::{Element, Node};
use crate::model::{Card, CardType, Profile, Template};

pub type Layout = fn(&Card) -> Node;

pub const LAYOUTS: [(Template, Layout); 3] = [
    (Template::Modern, modern as Layout),
    (Template::Classic, classic as Layout),
    (Template::Creative, creative as Layout),
];

/// Layout for a template, `modern` when the table has no entry
pub fn layout_for(template: Template) -> Layout {
    LAYOUTS
        .iter()
        .find(|(candidate, _)| *candidate == template)
        .map(|(_, layout)| *layout)
        .unwrap_or(modern)
}

struct Theme {
    template: Template,
    root: &'static str,
    header: &'static str,
    avatar: &'static str,
    title: &'static str,
    subtitle: &'static str,
    subtitle_separator: &'static str,
    bio: &'static str,
    contact: &'static str,
    section: &'static str,
    social: &'static str,
    footer: &'static str,
}

const MODERN: Theme = Theme {
    template: Template::Modern,
    root: "card card-modern rounded-3xl bg-white shadow-xl p-6",
    header: "flex items-center gap-4",
    avatar: "avatar h-20 w-20 bg-indigo-600 text-white",
    title: "text-2xl font-semibold text-slate-900",
    subtitle: "text-sm text-slate-500",
    subtitle_separator: " • ",
    bio: "mt-4 text-slate-600",
    contact: "mt-6 space-y-2",
    section: "mt-6",
    social: "chip rounded-full bg-slate-100 px-3 py-1",
    footer: "mt-6 text-xs text-slate-400",
};

const CLASSIC: Theme = Theme {
    template: Template::Classic,
    root: "card card-classic border border-stone-300 bg-stone-50 p-8 font-serif",
    header: "flex flex-col items-center text-center gap-3",
    avatar: "avatar h-24 w-24 border-2 border-stone-400 bg-stone-200 text-stone-700",
    title: "text-3xl tracking-wide text-stone-900",
    subtitle: "italic text-stone-600",
    subtitle_separator: " at ",
    bio: "mt-4 text-center text-stone-700",
    contact: "mt-6 divide-y divide-stone-200",
    section: "mt-6 border-t border-stone-200 pt-4",
    social: "chip border border-stone-300 px-3 py-1",
    footer: "mt-8 text-center text-xs text-stone-500",
};

const CREATIVE: Theme = Theme {
    template: Template::Creative,
    root: "card card-creative grid md:grid-cols-2 overflow-hidden rounded-3xl",
    header: "hero bg-gradient-to-br from-fuchsia-500 to-orange-400 p-8 text-white",
    avatar: "avatar h-24 w-24 ring-4 ring-white/60 bg-white/20 text-white",
    title: "mt-4 text-3xl font-black",
    subtitle: "text-white/80",
    subtitle_separator: " · ",
    bio: "mt-4 text-white/90",
    contact: "space-y-3",
    section: "mt-6",
    social: "chip rounded-xl bg-fuchsia-50 px-3 py-1 text-fuchsia-700",
    footer: "col-span-2 p-4 text-right text-xs text-slate-400",
};

pub fn modern(card: &Card) -> Node {
    stacked(card, &MODERN)
}

pub fn classic(card: &Card) -> Node {
    stacked(card, &CLASSIC)
}

/// Split layout: coloured hero on one side, details on the other
pub fn creative(card: &Card) -> Node {
    let theme = &CREATIVE;

    let hero = Element::new("div")
        .class(theme.header)
        .child(avatar(card, theme))
        .child(title(card, theme))
        .maybe_child(subtitle(card, theme))
        .maybe_child(bio(card, theme));

    let details = Element::new("div")
        .class("details p-8")
        .maybe_child(contact_list(card, theme))
        .children(business_sections(card, theme))
        .maybe_child(socials(card, theme));

    root(card, theme)
        .child(hero)
        .child(details)
        .child(footer(card, theme))
        .into()
}

fn stacked(card: &Card, theme: &Theme) -> Node {
    let header = Element::new("header")
        .class(theme.header)
        .child(avatar(card, theme))
        .child(
            Element::new("div")
                .child(title(card, theme))
                .maybe_child(subtitle(card, theme)),
        );

    root(card, theme)
        .child(header)
        .maybe_child(bio(card, theme))
        .maybe_child(contact_list(card, theme))
        .children(business_sections(card, theme))
        .maybe_child(socials(card, theme))
        .child(footer(card, theme))
        .into()
}

fn root(card: &Card, theme: &Theme) -> Element {
    Element::new("article")
        .part("card")
        .class(theme.root)
        .attr("data-template", theme.template.as_str())
        .attr("data-card-type", card.card_type().as_str())
}

/// Uppercased first letter of the display name
pub fn initial(name: &str) -> String {
    match name.trim().chars().next() {
        Some(first) => first.to_uppercase().collect(),
        None => "?".to_string(),
    }
}

fn avatar(card: &Card, theme: &Theme) -> Element {
    let (shape, shape_class) = match card.card_type() {
        CardType::Business => ("square", "rounded-xl"),
        CardType::Personal => ("round", "rounded-full"),
    };
    let class = format!("{} {shape_class}", theme.avatar);

    match card.avatar_image() {
        Some(src) => Element::new("img")
            .part("avatar")
            .class(&class)
            .attr("data-shape", shape)
            .attr("src", src)
            .attr("alt", card.display_name()),
        None => Element::new("div")
            .part("avatar")
            .class(&format!("{class} flex items-center justify-center text-3xl font-bold"))
            .attr("data-shape", shape)
            .text(initial(card.display_name())),
    }
}

fn title(card: &Card, theme: &Theme) -> Element {
    Element::new("h1")
        .part("title")
        .class(theme.title)
        .text(card.display_name())
}

fn subtitle(card: &Card, theme: &Theme) -> Option<Element> {
    let text = match &card.profile {
        Profile::Personal(p) => {
            let parts: Vec<&str> = [p.role.as_deref(), p.company.as_deref()]
                .into_iter()
                .flatten()
                .collect();
            (!parts.is_empty()).then(|| parts.join(theme.subtitle_separator))
        }
        Profile::Business(b) => b.tagline.clone(),
    }?;

    Some(
        Element::new("p")
            .part("subtitle")
            .class(theme.subtitle)
            .text(text),
    )
}

fn bio(card: &Card, theme: &Theme) -> Option<Element> {
    card.bio
        .as_deref()
        .map(|bio| Element::new("p").part("bio").class(theme.bio).text(bio))
}

fn contact_list(card: &Card, theme: &Theme) -> Option<Element> {
    let contact = &card.contact;
    let mut items = Vec::new();

    if !contact.email.is_empty() {
        items.push(contact_item(
            "Email",
            &contact.email,
            Some(format!("mailto:{}", contact.email)),
        ));
    }
    if let Some(phone) = &contact.phone {
        let dial: String = phone.chars().filter(|c| !c.is_whitespace()).collect();
        items.push(contact_item("Phone", phone, Some(format!("tel:{dial}"))));
    }
    if let Some(website) = &contact.website {
        items.push(contact_item("Website", website, Some(website.clone())));
    }
    if let Some(address) = &contact.address {
        items.push(contact_item("Address", address, None));
    }

    (!items.is_empty()).then(|| {
        Element::new("ul")
            .part("contact-list")
            .class(theme.contact)
            .children(items)
    })
}

fn contact_item(label: &str, value: &str, href: Option<String>) -> Element {
    let value = match href {
        Some(href) => Element::new("a").attr("href", href).text(value),
        None => Element::new("span").text(value),
    };

    Element::new("li")
        .part("contact")
        .attr("data-kind", label.to_ascii_lowercase())
        .child(Element::new("span").class("label").text(label))
        .child(value)
}

fn business_sections(card: &Card, theme: &Theme) -> Vec<Element> {
    let mut sections = Vec::new();

    if !card.services().is_empty() {
        let items = card.services().iter().map(|service| {
            Element::new("li")
                .part("service")
                .child(Element::new("strong").text(&service.name))
                .maybe_child(
                    service
                        .description
                        .as_deref()
                        .map(|d| Element::new("p").class("description").text(d)),
                )
        });
        sections.push(section("services", "Services", theme).child(Element::new("ul").children(items)));
    }

    if !card.products().is_empty() {
        let items = card.products().iter().map(|product| {
            let name = match &product.link {
                Some(link) => Element::new("a")
                    .attr("href", link)
                    .attr("target", "_blank")
                    .attr("rel", "noopener noreferrer")
                    .text(&product.name),
                None => Element::new("span").text(&product.name),
            };
            Element::new("li").part("product").child(name)
        });
        sections.push(section("products", "Products", theme).child(Element::new("ul").children(items)));
    }

    sections
}

fn section(part: &str, heading: &str, theme: &Theme) -> Element {
    Element::new("section")
        .part(part)
        .class(theme.section)
        .child(Element::new("h2").text(heading))
}

fn socials(card: &Card, theme: &Theme) -> Option<Element> {
    let chips: Vec<Element> = card
        .socials
        .links()
        .map(|(platform, url)| {
            Element::new("a")
                .part("social")
                .class(theme.social)
                .attr("href", url)
                .attr("target", "_blank")
                .attr("rel", "noopener noreferrer")
                .attr("data-platform", platform.key())
                .child(
                    Element::new("span")
                        .class("icon")
                        .attr("data-icon", platform.icon())
                        .attr("aria-hidden", "true"),
                )
                .text(platform.label())
        })
        .collect();

    (!chips.is_empty()).then(|| {
        Element::new("div")
            .part("socials")
            .class("flex flex-wrap gap-2 mt-6")
            .children(chips)
    })
}

fn footer(card: &Card, theme: &Theme) -> Element {
    Element::new("footer")
        .part("footer")
        .class(theme.footer)
        .text(format!("Created {}", card.created_at.format("%b %-d, %Y")))
}
