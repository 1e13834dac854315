//! Card input validation and normalization
//!
//! [`CardInput`] is the loose JSON shape clients post. It becomes either a
//! [`NewCard`] or a [`CardUpdate`], or a [`ValidationErrors`] naming every
//! offending field.

use crate::model::{
    BusinessProfile, CardType, CardUpdate, Contact, NewCard, PersonalProfile, Product, Profile,
    Service, SocialPlatform, Socials, Template,
};
use crate::slug::{SLUG_MAX_LEN, slugify};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use common::validation::{ValidationErrors, blank_as_none, validate_email, validate_max_chars};
use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::OnceLock;
use url::Url;

pub const BIO_MAX_CHARS: usize = 200;
pub const IMAGE_MAX_BYTES: usize = 2 * 1024 * 1024;
/// Width of the `VARCHAR(255)` name and headline columns
pub const TEXT_MAX_CHARS: usize = 255;
pub const PHONE_MAX_CHARS: usize = 64;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInput {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub link: Option<String>,
}

/// Raw card payload for create and update
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardInput {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub card_type: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub template: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub full_name: Option<String>,
    #[serde(default, alias = "jobTitle", deserialize_with = "blank_as_none")]
    pub role: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub company: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub business_name: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub tagline: Option<String>,
    #[serde(default)]
    pub services: Option<Vec<ServiceInput>>,
    #[serde(default)]
    pub products: Option<Vec<ProductInput>>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub website: Option<String>,
    #[serde(default, alias = "location", deserialize_with = "blank_as_none")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub bio: Option<String>,
    #[serde(default, alias = "social")]
    pub socials: Option<BTreeMap<String, Option<String>>>,
    #[serde(default, alias = "profilePhoto", deserialize_with = "blank_as_none")]
    pub profile_image: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub logo: Option<String>,
}

/// Fields whose rules are the same for create and update
struct Checked {
    card_type: Option<CardType>,
    requested_slug: Option<String>,
    services: Option<Vec<Service>>,
    products: Option<Vec<Product>>,
    socials: Option<Socials>,
}

impl CardInput {
    /// Validate a create payload on behalf of `owner_email`
    pub fn into_new_card(self, owner_email: &str) -> Result<NewCard, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check("ownerEmail", validate_email(owner_email));

        let checked = self.check(&mut errors);
        let email = self.email.clone().unwrap_or_default();
        if self.email.is_none() {
            errors.check("email", validate_email(&email));
        }

        let profile = match (self.card_type.is_some(), checked.card_type) {
            (false, _) => {
                errors.add("cardType", "Card type is required");
                None
            }
            (true, None) => None,
            (true, Some(CardType::Personal)) => match self.full_name {
                Some(full_name) => Some(Profile::Personal(PersonalProfile {
                    full_name,
                    role: self.role,
                    company: self.company,
                })),
                None => {
                    errors.add("fullName", "Full name is required");
                    None
                }
            },
            (true, Some(CardType::Business)) => match self.business_name {
                Some(business_name) => Some(Profile::Business(BusinessProfile {
                    business_name,
                    tagline: self.tagline,
                    services: checked.services.unwrap_or_default(),
                    products: checked.products.unwrap_or_default(),
                })),
                None => {
                    errors.add("businessName", "Business name is required");
                    None
                }
            },
        };

        let Some(profile) = profile else {
            return Err(errors);
        };

        errors.finish(NewCard {
            owner_email: owner_email.to_string(),
            requested_slug: checked.requested_slug,
            template: Template::from_optional(self.template.as_deref()),
            profile,
            contact: Contact {
                email,
                phone: self.phone,
                website: self.website,
                address: self.address,
            },
            bio: self.bio,
            socials: checked.socials.unwrap_or_default(),
            profile_image: self.profile_image,
            logo: self.logo,
        })
    }

    /// Validate a partial update; every field is optional
    pub fn into_update(self) -> Result<CardUpdate, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let checked = self.check(&mut errors);

        if self.slug.is_some() {
            errors.add("slug", "Slug cannot be changed");
        }

        errors.finish(CardUpdate {
            card_type: checked.card_type,
            template: self.template.as_deref().map(Template::from_name),
            full_name: self.full_name,
            role: self.role,
            company: self.company,
            business_name: self.business_name,
            tagline: self.tagline,
            services: checked.services,
            products: checked.products,
            email: self.email,
            phone: self.phone,
            website: self.website,
            address: self.address,
            bio: self.bio,
            socials: checked.socials,
            profile_image: self.profile_image,
            logo: self.logo,
        })
    }

    fn check(&self, errors: &mut ValidationErrors) -> Checked {
        let card_type = self.card_type.as_deref().and_then(|raw| {
            let parsed = CardType::parse(raw);
            if parsed.is_none() {
                errors.add("cardType", "Card type must be personal or business");
            }
            parsed
        });

        let requested_slug = self.slug.as_deref().and_then(|raw| {
            let slug = slugify(raw);
            if slug.is_empty() {
                errors.add("slug", "Slug must contain letters or numbers");
                None
            } else if slug.len() > SLUG_MAX_LEN {
                errors.add(
                    "slug",
                    format!("Slug must be at most {SLUG_MAX_LEN} characters"),
                );
                None
            } else {
                Some(slug)
            }
        });

        for (path, value) in [
            ("fullName", &self.full_name),
            ("role", &self.role),
            ("company", &self.company),
            ("businessName", &self.business_name),
            ("tagline", &self.tagline),
        ] {
            if let Some(value) = value {
                errors.check(path, validate_max_chars(value, TEXT_MAX_CHARS));
            }
        }

        if let Some(email) = &self.email {
            errors.check("email", validate_email(email));
        }
        if let Some(phone) = &self.phone {
            errors.check("phone", validate_phone(phone));
        }
        if let Some(website) = &self.website {
            errors.check("website", validate_url(website));
        }
        if let Some(bio) = &self.bio {
            errors.check("bio", validate_bio(bio));
        }
        if let Some(image) = &self.profile_image {
            errors.check("profileImage", validate_image(image));
        }
        if let Some(logo) = &self.logo {
            errors.check("logo", validate_image(logo));
        }

        let services = self.services.as_ref().map(|items| {
            items
                .iter()
                .enumerate()
                .filter_map(|(i, item)| match &item.name {
                    Some(name) => Some(Service {
                        name: name.clone(),
                        description: item.description.clone(),
                    }),
                    None => {
                        errors.add(format!("services.{i}.name"), "Service name is required");
                        None
                    }
                })
                .collect()
        });

        let products = self.products.as_ref().map(|items| {
            items
                .iter()
                .enumerate()
                .filter_map(|(i, item)| {
                    if let Some(link) = &item.link {
                        errors.check(format!("products.{i}.link"), validate_url(link));
                    }
                    match &item.name {
                        Some(name) => Some(Product {
                            name: name.clone(),
                            link: item.link.clone(),
                        }),
                        None => {
                            errors.add(format!("products.{i}.name"), "Product name is required");
                            None
                        }
                    }
                })
                .collect()
        });

        let socials = self.socials.as_ref().map(|links| {
            let mut socials = Socials::new();
            for (key, value) in links {
                let Some(platform) = SocialPlatform::from_key(key) else {
                    continue;
                };
                let Some(url) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) else {
                    continue;
                };
                match validate_url(url) {
                    Ok(()) => socials.insert(platform, url),
                    Err(message) => errors.add(format!("socials.{}", platform.key()), message),
                }
            }
            socials
        });

        Checked {
            card_type,
            requested_slug,
            services,
            products,
            socials,
        }
    }
}

pub fn validate_phone(phone: &str) -> Result<(), String> {
    validate_max_chars(phone, PHONE_MAX_CHARS)?;

    static PHONE_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = PHONE_REGEX.get_or_init(|| {
        Regex::new(r"^[+\d][\d\s-]{6,}$").expect("Failed to compile phone regex")
    });

    if !regex.is_match(phone) {
        return Err("Enter a valid phone number".to_string());
    }

    Ok(())
}

/// Absolute `http(s)` URL with a host
///
/// The value is stored as typed, so control characters are rejected here
/// rather than left for the parser to silently drop.
pub fn validate_url(value: &str) -> Result<(), String> {
    if value.chars().any(char::is_control) {
        return Err("Enter a valid URL".to_string());
    }

    match Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => Ok(()),
        _ => Err("Enter a valid URL".to_string()),
    }
}

pub fn validate_bio(bio: &str) -> Result<(), String> {
    if bio.chars().count() > BIO_MAX_CHARS {
        return Err(format!("Keep bio under {BIO_MAX_CHARS} characters"));
    }

    Ok(())
}

/// `http(s)://` URL or a base64 `data:image/*` URI of at most 2 MiB
pub fn validate_image(value: &str) -> Result<(), String> {
    if value.starts_with("http://") || value.starts_with("https://") {
        return validate_url(value).map_err(|_| "Provide a valid image URL".to_string());
    }

    static DATA_URI_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = DATA_URI_REGEX.get_or_init(|| {
        Regex::new(r"^data:image/[a-zA-Z0-9.+-]+;base64,([A-Za-z0-9+/=\s]*)$")
            .expect("Failed to compile data URI regex")
    });

    let Some(captures) = regex.captures(value) else {
        return Err("Provide a valid image URL or base64 data URL".to_string());
    };

    let payload: String = captures[1].split_whitespace().collect();
    let decoded = STANDARD
        .decode(payload.as_bytes())
        .map_err(|_| "Image data is not valid base64".to_string())?;

    if decoded.len() > IMAGE_MAX_BYTES {
        return Err("Image must be 2MB or smaller".to_string());
    }

    Ok(())
}
