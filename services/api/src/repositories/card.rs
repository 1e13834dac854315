//! Card storage: the `CardStore` seam and its MySQL repository
//!
//! Rows map onto [`Card`] through [`card_from_row`]. The `services`,
//! `products` and `socials` columns are JSON text and are decoded with the
//! lenient readers from `cards::columns`, so a bad column never fails a read.

use cards::{
    BusinessProfile, Card, CardType, Contact, NewCard, PersonalProfile, Profile, Template,
    columns::{
        decode_list, decode_list_value, decode_socials, decode_socials_value, encode_list,
        encode_socials,
    },
};
use chrono::{SubsecRound, Utc};
use common::error::{DatabaseError, DatabaseResult, is_unique_violation};
use serde::de::DeserializeOwned;
use serde_json::Value;
use sqlx::{MySqlPool, Row, mysql::MySqlRow, types::Json};
use tracing::{info, warn};

/// Fresh suffixes tried for a generated slug before giving up
pub const SLUG_ATTEMPTS: usize = 5;

const SELECT_CARD: &str = r#"
    SELECT slug, cardType, ownerEmail, template, fullName, role, company,
           businessName, tagline, email, phone, website, address, bio,
           services, products, socials, profileImage, logo, createdAt
    FROM cards
"#;

/// Outcome of a card insert
#[derive(Debug)]
pub enum InsertOutcome {
    Created(Card),
    /// The caller picked a slug that is already in use
    SlugTaken,
    /// Every generated slug collided
    SlugsExhausted,
}

/// Persistence for cards, keyed by slug
#[axum::async_trait]
pub trait CardStore: Send + Sync {
    /// Insert a new row; `Ok(false)` when its slug is already taken
    async fn insert_row(&self, card: &Card) -> DatabaseResult<bool>;

    /// Cards owned by `owner_email`, newest first
    async fn list_by_owner(&self, owner_email: &str) -> DatabaseResult<Vec<Card>>;

    /// Every card, newest first
    async fn list_all(&self) -> DatabaseResult<Vec<Card>>;

    async fn find_by_slug(&self, slug: &str) -> DatabaseResult<Option<Card>>;

    /// Write every mutable field of `card` back to its row
    async fn update(&self, card: &Card) -> DatabaseResult<()>;

    /// Delete a card; `false` when no card had that slug
    async fn delete(&self, slug: &str) -> DatabaseResult<bool>;
}

/// Store a validated card, choosing its slug
///
/// A requested slug is tried once. Otherwise `next_slug` is asked for a fresh
/// slug from the display name until one is free or [`SLUG_ATTEMPTS`] run out.
pub async fn insert_card(
    store: &dyn CardStore,
    new_card: NewCard,
    mut next_slug: impl FnMut(&str) -> String + Send,
) -> DatabaseResult<InsertOutcome> {
    let created_at = Utc::now().trunc_subsecs(0);

    if let Some(slug) = new_card.requested_slug.clone() {
        let card = new_card.into_card(slug, created_at);
        return Ok(if store.insert_row(&card).await? {
            InsertOutcome::Created(card)
        } else {
            InsertOutcome::SlugTaken
        });
    }

    let display_name = new_card.profile.display_name().to_string();
    let mut card = new_card.into_card(String::new(), created_at);
    for attempt in 1..=SLUG_ATTEMPTS {
        card.slug = next_slug(&display_name);
        if store.insert_row(&card).await? {
            return Ok(InsertOutcome::Created(card));
        }
        warn!(attempt, slug = %card.slug, "Generated slug already taken");
    }

    Ok(InsertOutcome::SlugsExhausted)
}

/// MySQL-backed card store
#[derive(Clone)]
pub struct CardRepository {
    pool: MySqlPool,
}

impl CardRepository {
    /// Create a new card repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[axum::async_trait]
impl CardStore for CardRepository {
    async fn insert_row(&self, card: &Card) -> DatabaseResult<bool> {
        let columns = Columns::of(card);

        let result = sqlx::query(
            r#"
            INSERT INTO cards
            (slug, cardType, ownerEmail, template, fullName, role, company, businessName,
             tagline, email, phone, website, address, bio, services, products, socials,
             profileImage, logo, createdAt)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&card.slug)
        .bind(card.card_type().as_str())
        .bind(&card.owner_email)
        .bind(card.template.as_str())
        .bind(columns.full_name)
        .bind(columns.role)
        .bind(columns.company)
        .bind(columns.business_name)
        .bind(columns.tagline)
        .bind(&card.contact.email)
        .bind(&card.contact.phone)
        .bind(&card.contact.website)
        .bind(&card.contact.address)
        .bind(&card.bio)
        .bind(columns.services)
        .bind(columns.products)
        .bind(columns.socials)
        .bind(&card.profile_image)
        .bind(&card.logo)
        .bind(card.created_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(true),
            Err(e) if is_unique_violation(&e) => Ok(false),
            Err(e) => Err(DatabaseError::Query(e)),
        }
    }

    async fn list_by_owner(&self, owner_email: &str) -> DatabaseResult<Vec<Card>> {
        let rows = sqlx::query(&format!(
            "{SELECT_CARD} WHERE ownerEmail = ? ORDER BY createdAt DESC"
        ))
        .bind(owner_email)
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        rows.iter().map(card_from_row).collect()
    }

    async fn list_all(&self) -> DatabaseResult<Vec<Card>> {
        let rows = sqlx::query(&format!("{SELECT_CARD} ORDER BY createdAt DESC"))
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::Query)?;

        rows.iter().map(card_from_row).collect()
    }

    async fn find_by_slug(&self, slug: &str) -> DatabaseResult<Option<Card>> {
        let row = sqlx::query(&format!("{SELECT_CARD} WHERE slug = ? LIMIT 1"))
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::Query)?;

        row.as_ref().map(card_from_row).transpose()
    }

    async fn update(&self, card: &Card) -> DatabaseResult<()> {
        let columns = Columns::of(card);

        sqlx::query(
            r#"
            UPDATE cards
            SET cardType = ?, template = ?, fullName = ?, role = ?, company = ?,
                businessName = ?, tagline = ?, email = ?, phone = ?, website = ?,
                address = ?, bio = ?, services = ?, products = ?, socials = ?,
                profileImage = ?, logo = ?
            WHERE slug = ?
            "#,
        )
        .bind(card.card_type().as_str())
        .bind(card.template.as_str())
        .bind(columns.full_name)
        .bind(columns.role)
        .bind(columns.company)
        .bind(columns.business_name)
        .bind(columns.tagline)
        .bind(&card.contact.email)
        .bind(&card.contact.phone)
        .bind(&card.contact.website)
        .bind(&card.contact.address)
        .bind(&card.bio)
        .bind(columns.services)
        .bind(columns.products)
        .bind(columns.socials)
        .bind(&card.profile_image)
        .bind(&card.logo)
        .bind(&card.slug)
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        info!(slug = %card.slug, "Card updated");
        Ok(())
    }

    async fn delete(&self, slug: &str) -> DatabaseResult<bool> {
        let result = sqlx::query("DELETE FROM cards WHERE slug = ?")
            .bind(slug)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::Query)?;

        Ok(result.rows_affected() > 0)
    }
}

/// Type-specific columns of a card; the other type's columns are NULL
struct Columns<'a> {
    full_name: Option<&'a str>,
    role: Option<&'a str>,
    company: Option<&'a str>,
    business_name: Option<&'a str>,
    tagline: Option<&'a str>,
    services: Option<String>,
    products: Option<String>,
    socials: String,
}

impl<'a> Columns<'a> {
    fn of(card: &'a Card) -> Self {
        let socials = encode_socials(&card.socials);
        match &card.profile {
            Profile::Personal(p) => Columns {
                full_name: Some(&p.full_name),
                role: p.role.as_deref(),
                company: p.company.as_deref(),
                business_name: None,
                tagline: None,
                services: None,
                products: None,
                socials,
            },
            Profile::Business(b) => Columns {
                full_name: None,
                role: None,
                company: None,
                business_name: Some(&b.business_name),
                tagline: b.tagline.as_deref(),
                services: Some(encode_list(&b.services)),
                products: Some(encode_list(&b.products)),
                socials,
            },
        }
    }
}

/// Map a `cards` row onto a [`Card`]
pub fn card_from_row(row: &MySqlRow) -> DatabaseResult<Card> {
    let raw_type: String = row.try_get("cardType").map_err(DatabaseError::Query)?;
    let card_type = CardType::parse(&raw_type).ok_or_else(|| {
        DatabaseError::Query(sqlx::Error::Decode(
            format!("Unknown card type: {raw_type}").into(),
        ))
    })?;

    let text = |column: &str| -> DatabaseResult<Option<String>> {
        let value: Option<String> = row.try_get(column).map_err(DatabaseError::Query)?;
        Ok(value.filter(|v| !v.trim().is_empty()))
    };

    let profile = match card_type {
        CardType::Personal => Profile::Personal(PersonalProfile {
            full_name: text("fullName")?.unwrap_or_default(),
            role: text("role")?,
            company: text("company")?,
        }),
        CardType::Business => Profile::Business(BusinessProfile {
            business_name: text("businessName")?.unwrap_or_default(),
            tagline: text("tagline")?,
            services: list_column(row, "services"),
            products: list_column(row, "products"),
        }),
    };

    let template: Option<String> = row.try_get("template").map_err(DatabaseError::Query)?;

    Ok(Card {
        slug: row.try_get("slug").map_err(DatabaseError::Query)?,
        owner_email: row.try_get("ownerEmail").map_err(DatabaseError::Query)?,
        template: Template::from_optional(template.as_deref()),
        profile,
        contact: Contact {
            email: text("email")?.unwrap_or_default(),
            phone: text("phone")?,
            website: text("website")?,
            address: text("address")?,
        },
        bio: text("bio")?,
        socials: socials_column(row, "socials"),
        profile_image: text("profileImage")?,
        logo: text("logo")?,
        created_at: row.try_get("createdAt").map_err(DatabaseError::Query)?,
    })
}

/// A JSON column read as text, or as a value when the driver already decoded it
enum JsonColumn {
    Text(Option<String>),
    Value(Option<Value>),
}

fn json_column(row: &MySqlRow, column: &str) -> JsonColumn {
    match row.try_get::<Option<String>, _>(column) {
        Ok(text) => JsonColumn::Text(text),
        Err(_) => JsonColumn::Value(
            row.try_get::<Option<Json<Value>>, _>(column)
                .ok()
                .flatten()
                .map(|Json(value)| value),
        ),
    }
}

fn list_column<T: DeserializeOwned>(row: &MySqlRow, column: &str) -> Vec<T> {
    match json_column(row, column) {
        JsonColumn::Text(text) => decode_list(text.as_deref()),
        JsonColumn::Value(value) => decode_list_value(value),
    }
}

fn socials_column(row: &MySqlRow, column: &str) -> cards::Socials {
    match json_column(row, column) {
        JsonColumn::Text(text) => decode_socials(text.as_deref()),
        JsonColumn::Value(value) => decode_socials_value(value),
    }
}
