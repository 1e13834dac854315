//! Card record and its typed parts

use chrono::{DateTime, Utc};
use common::validation::ValidationErrors;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Which of the two card shapes a record uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardType {
    Personal,
    Business,
}

impl CardType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardType::Personal => "personal",
            CardType::Business => "business",
        }
    }

    /// Strict parse, used for client input and stored rows
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "personal" => Some(CardType::Personal),
            "business" => Some(CardType::Business),
            _ => None,
        }
    }
}

/// Visual layout of a rendered card
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Template {
    #[default]
    Modern,
    Classic,
    Creative,
}

impl Template {
    pub const ALL: [Template; 3] = [Template::Modern, Template::Classic, Template::Creative];

    pub fn as_str(&self) -> &'static str {
        match self {
            Template::Modern => "modern",
            Template::Classic => "classic",
            Template::Creative => "creative",
        }
    }

    /// Lenient parse: anything outside the known set is `Modern`
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "classic" => Template::Classic,
            "creative" => Template::Creative,
            _ => Template::Modern,
        }
    }

    pub fn from_optional(name: Option<&str>) -> Self {
        name.map(Self::from_name).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// Social platforms a card can link to, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SocialPlatform {
    Linkedin,
    Instagram,
    Youtube,
    Github,
    Twitter,
    Facebook,
}

impl SocialPlatform {
    pub const ALL: [SocialPlatform; 6] = [
        SocialPlatform::Linkedin,
        SocialPlatform::Instagram,
        SocialPlatform::Youtube,
        SocialPlatform::Github,
        SocialPlatform::Twitter,
        SocialPlatform::Facebook,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            SocialPlatform::Linkedin => "linkedin",
            SocialPlatform::Instagram => "instagram",
            SocialPlatform::Youtube => "youtube",
            SocialPlatform::Github => "github",
            SocialPlatform::Twitter => "twitter",
            SocialPlatform::Facebook => "facebook",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SocialPlatform::Linkedin => "LinkedIn",
            SocialPlatform::Instagram => "Instagram",
            SocialPlatform::Youtube => "YouTube",
            SocialPlatform::Github => "GitHub",
            SocialPlatform::Twitter => "Twitter",
            SocialPlatform::Facebook => "Facebook",
        }
    }

    /// Icon identifier understood by the front-end icon set
    pub fn icon(&self) -> &'static str {
        match self {
            SocialPlatform::Linkedin => "linkedin",
            SocialPlatform::Instagram => "instagram",
            SocialPlatform::Youtube => "youtube",
            SocialPlatform::Github => "github",
            SocialPlatform::Twitter => "twitter",
            SocialPlatform::Facebook => "facebook",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|p| p.key() == key)
    }
}

/// Platform key to profile URL
///
/// Stored rows may carry keys outside [`SocialPlatform`]; they are kept as-is
/// but never rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Socials(BTreeMap<String, String>);

impl Socials {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_raw(links: BTreeMap<String, String>) -> Self {
        Self(links)
    }

    pub fn insert(&mut self, platform: SocialPlatform, url: impl Into<String>) {
        self.0.insert(platform.key().to_string(), url.into());
    }

    pub fn get(&self, platform: SocialPlatform) -> Option<&str> {
        self.0.get(platform.key()).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Known platforms that have a link, in display order
    pub fn links(&self) -> impl Iterator<Item = (SocialPlatform, &str)> + '_ {
        SocialPlatform::ALL
            .into_iter()
            .filter_map(|platform| self.get(platform).map(|url| (platform, url)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalProfile {
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessProfile {
    pub business_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
    pub services: Vec<Service>,
    pub products: Vec<Product>,
}

/// Type-specific part of a card. A card without a display name cannot exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "cardType", rename_all = "lowercase")]
pub enum Profile {
    Personal(PersonalProfile),
    Business(BusinessProfile),
}

impl Profile {
    pub fn card_type(&self) -> CardType {
        match self {
            Profile::Personal(_) => CardType::Personal,
            Profile::Business(_) => CardType::Business,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            Profile::Personal(p) => &p.full_name,
            Profile::Business(b) => &b.business_name,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// A stored card as returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub slug: String,
    pub owner_email: String,
    pub template: Template,
    #[serde(flatten)]
    pub profile: Profile,
    #[serde(flatten)]
    pub contact: Contact,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    pub socials: Socials,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Card {
    pub fn card_type(&self) -> CardType {
        self.profile.card_type()
    }

    pub fn display_name(&self) -> &str {
        self.profile.display_name()
    }

    /// Avatar image for the card's type: logo for businesses, photo otherwise
    pub fn avatar_image(&self) -> Option<&str> {
        match self.profile {
            Profile::Personal(_) => self.profile_image.as_deref(),
            Profile::Business(_) => self.logo.as_deref(),
        }
    }

    pub fn services(&self) -> &[Service] {
        match &self.profile {
            Profile::Business(b) => &b.services,
            Profile::Personal(_) => &[],
        }
    }

    pub fn products(&self) -> &[Product] {
        match &self.profile {
            Profile::Business(b) => &b.products,
            Profile::Personal(_) => &[],
        }
    }

    /// Ownership rule for mutations on the user path
    pub fn is_owned_by(&self, email: &str) -> bool {
        self.owner_email == email
    }
}

/// A validated card that has not been stored yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCard {
    pub owner_email: String,
    /// Caller-chosen slug, already slugified
    pub requested_slug: Option<String>,
    pub template: Template,
    pub profile: Profile,
    pub contact: Contact,
    pub bio: Option<String>,
    pub socials: Socials,
    pub profile_image: Option<String>,
    pub logo: Option<String>,
}

impl NewCard {
    pub fn into_card(self, slug: String, created_at: DateTime<Utc>) -> Card {
        Card {
            slug,
            owner_email: self.owner_email,
            template: self.template,
            profile: self.profile,
            contact: self.contact,
            bio: self.bio,
            socials: self.socials,
            profile_image: self.profile_image,
            logo: self.logo,
            created_at,
        }
    }
}

/// A validated partial update. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardUpdate {
    pub card_type: Option<CardType>,
    pub template: Option<Template>,
    pub full_name: Option<String>,
    pub role: Option<String>,
    pub company: Option<String>,
    pub business_name: Option<String>,
    pub tagline: Option<String>,
    pub services: Option<Vec<Service>>,
    pub products: Option<Vec<Product>>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub address: Option<String>,
    pub bio: Option<String>,
    pub socials: Option<Socials>,
    pub profile_image: Option<String>,
    pub logo: Option<String>,
}

impl CardUpdate {
    /// Merge onto a stored card
    ///
    /// Sub-objects that are provided replace the stored ones wholesale.
    /// Switching the card type needs the new type's name in the update.
    /// Slug, owner and creation time never change.
    pub fn apply(self, card: Card) -> Result<Card, ValidationErrors> {
        let CardUpdate {
            card_type,
            template,
            full_name,
            role,
            company,
            business_name,
            tagline,
            services,
            products,
            email,
            phone,
            website,
            address,
            bio,
            socials,
            profile_image,
            logo,
        } = self;

        let target = card_type.unwrap_or_else(|| card.card_type());
        let profile = match (target, card.profile) {
            (CardType::Personal, Profile::Personal(existing)) => {
                Profile::Personal(PersonalProfile {
                    full_name: full_name.unwrap_or(existing.full_name),
                    role: role.or(existing.role),
                    company: company.or(existing.company),
                })
            }
            (CardType::Personal, Profile::Business(_)) => match full_name {
                Some(full_name) => Profile::Personal(PersonalProfile {
                    full_name,
                    role,
                    company,
                }),
                None => {
                    return Err(ValidationErrors::single(
                        "fullName",
                        "Full name is required",
                    ));
                }
            },
            (CardType::Business, Profile::Business(existing)) => {
                Profile::Business(BusinessProfile {
                    business_name: business_name.unwrap_or(existing.business_name),
                    tagline: tagline.or(existing.tagline),
                    services: services.unwrap_or(existing.services),
                    products: products.unwrap_or(existing.products),
                })
            }
            (CardType::Business, Profile::Personal(_)) => match business_name {
                Some(business_name) => Profile::Business(BusinessProfile {
                    business_name,
                    tagline,
                    services: services.unwrap_or_default(),
                    products: products.unwrap_or_default(),
                }),
                None => {
                    return Err(ValidationErrors::single(
                        "businessName",
                        "Business name is required",
                    ));
                }
            },
        };

        Ok(Card {
            slug: card.slug,
            owner_email: card.owner_email,
            template: template.unwrap_or(card.template),
            profile,
            contact: Contact {
                email: email.unwrap_or(card.contact.email),
                phone: phone.or(card.contact.phone),
                website: website.or(card.contact.website),
                address: address.or(card.contact.address),
            },
            bio: bio.or(card.bio),
            socials: socials.unwrap_or(card.socials),
            profile_image: profile_image.or(card.profile_image),
            logo: logo.or(card.logo),
            created_at: card.created_at,
        })
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use chrono::TimeZone;

    pub fn created_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 7, 12, 0, 0).unwrap()
    }

    pub fn personal_card() -> Card {
        Card {
            slug: "alex-doe-k3f9".to_string(),
            owner_email: "alex@x.com".to_string(),
            template: Template::Modern,
            profile: Profile::Personal(PersonalProfile {
                full_name: "Alex Doe".to_string(),
                role: Some("Engineer".to_string()),
                company: None,
            }),
            contact: Contact {
                email: "alex@x.com".to_string(),
                ..Contact::default()
            },
            bio: None,
            socials: Socials::new(),
            profile_image: None,
            logo: None,
            created_at: created_at(),
        }
    }

    pub fn business_card() -> Card {
        let mut socials = Socials::new();
        socials.insert(SocialPlatform::Github, "https://github.com/acme");
        socials.insert(SocialPlatform::Linkedin, "https://linkedin.com/company/acme");

        Card {
            slug: "acme-studio-00aa".to_string(),
            owner_email: "owner@acme.io".to_string(),
            template: Template::Classic,
            profile: Profile::Business(BusinessProfile {
                business_name: "Acme Studio".to_string(),
                tagline: Some("Design & build".to_string()),
                services: vec![Service {
                    name: "Branding".to_string(),
                    description: Some("Logos and identity".to_string()),
                }],
                products: vec![
                    Product {
                        name: "Starter kit".to_string(),
                        link: Some("https://acme.io/kit".to_string()),
                    },
                    Product {
                        name: "Workshop".to_string(),
                        link: None,
                    },
                ],
            }),
            contact: Contact {
                email: "hello@acme.io".to_string(),
                phone: Some("+1 555-0100".to_string()),
                website: Some("https://acme.io".to_string()),
                address: Some("1 Main St, Springfield".to_string()),
            },
            bio: Some("Small studio.".to_string()),
            socials,
            profile_image: Some("https://acme.io/me.png".to_string()),
            logo: None,
            created_at: created_at(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_card_serializes_flat_camel_case() {
        let json = serde_json::to_value(personal_card()).unwrap();

        assert_eq!(json["cardType"], "personal");
        assert_eq!(json["fullName"], "Alex Doe");
        assert_eq!(json["role"], "Engineer");
        assert_eq!(json["ownerEmail"], "alex@x.com");
        assert_eq!(json["template"], "modern");
        assert_eq!(json["createdAt"], "2025-03-07T12:00:00Z");
        assert!(json.get("company").is_none());
        assert!(json.get("businessName").is_none());
        assert!(json.get("phone").is_none());
    }

    #[test]
    fn test_business_card_serializes_lists() {
        let json = serde_json::to_value(business_card()).unwrap();

        assert_eq!(json["cardType"], "business");
        assert_eq!(json["services"][0]["name"], "Branding");
        assert_eq!(json["products"][1]["name"], "Workshop");
        assert!(json["products"][1].get("link").is_none());
        assert_eq!(json["socials"]["github"], "https://github.com/acme");
    }

    #[test]
    fn test_template_lenient_parse() {
        assert_eq!(Template::from_name("classic"), Template::Classic);
        assert_eq!(Template::from_name(" Creative "), Template::Creative);
        assert_eq!(Template::from_name("retro"), Template::Modern);
        assert_eq!(Template::from_optional(None), Template::Modern);
    }

    #[test]
    fn test_socials_links_follow_platform_order() {
        let mut raw = BTreeMap::new();
        raw.insert("twitter".to_string(), "https://twitter.com/a".to_string());
        raw.insert("myspace".to_string(), "https://myspace.com/a".to_string());
        raw.insert("github".to_string(), "https://github.com/a".to_string());
        let socials = Socials::from_raw(raw);

        let platforms: Vec<_> = socials.links().map(|(p, _)| p).collect();
        assert_eq!(platforms, vec![SocialPlatform::Github, SocialPlatform::Twitter]);
        assert_eq!(socials.len(), 3);
    }

    #[test]
    fn test_avatar_image_follows_card_type() {
        let card = business_card();
        assert_eq!(card.avatar_image(), None);

        let mut card = personal_card();
        card.profile_image = Some("https://x.com/a.png".to_string());
        card.logo = Some("https://x.com/logo.png".to_string());
        assert_eq!(card.avatar_image(), Some("https://x.com/a.png"));
    }

    #[test]
    fn test_update_keeps_omitted_fields() {
        let card = business_card();
        let update = CardUpdate {
            tagline: Some("New tagline".to_string()),
            ..CardUpdate::default()
        };

        let updated = update.apply(card.clone()).unwrap();
        assert_eq!(updated.services(), card.services());
        assert_eq!(updated.products(), card.products());
        assert_eq!(updated.socials, card.socials);
        assert_eq!(updated.contact, card.contact);
        match updated.profile {
            Profile::Business(b) => assert_eq!(b.tagline.as_deref(), Some("New tagline")),
            Profile::Personal(_) => panic!("card type changed"),
        }
    }

    #[test]
    fn test_update_replaces_lists_wholesale() {
        let update = CardUpdate {
            services: Some(Vec::new()),
            ..CardUpdate::default()
        };

        let updated = update.apply(business_card()).unwrap();
        assert!(updated.services().is_empty());
        assert_eq!(updated.products().len(), 2);
    }

    #[test]
    fn test_update_type_switch_requires_name() {
        let update = CardUpdate {
            card_type: Some(CardType::Business),
            ..CardUpdate::default()
        };
        let errors = update.apply(personal_card()).unwrap_err();
        assert!(errors.has("businessName"));

        let update = CardUpdate {
            card_type: Some(CardType::Business),
            business_name: Some("Doe LLC".to_string()),
            ..CardUpdate::default()
        };
        let updated = update.apply(personal_card()).unwrap();
        assert_eq!(updated.card_type(), CardType::Business);
        assert_eq!(updated.display_name(), "Doe LLC");
        assert_eq!(updated.slug, "alex-doe-k3f9");

        let back = CardUpdate {
            card_type: Some(CardType::Personal),
            ..CardUpdate::default()
        };
        let errors = back.apply(updated).unwrap_err();
        assert!(errors.has("fullName"), "earlier name is not carried back");
    }

    #[test]
    fn test_ownership() {
        let card = personal_card();
        assert!(card.is_owned_by("alex@x.com"));
        assert!(!card.is_owned_by("bob@x.com"));
    }
}
