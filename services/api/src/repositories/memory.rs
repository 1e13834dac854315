//! In-process card store for route tests

use std::{
    collections::HashMap,
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use cards::Card;
use common::error::DatabaseResult;

use super::CardStore;

#[derive(Default)]
pub struct MemoryCardStore {
    cards: Mutex<HashMap<String, Card>>,
    writes: AtomicUsize,
}

impl MemoryCardStore {
    pub fn with_cards(cards: impl IntoIterator<Item = Card>) -> Self {
        let store = Self::default();
        store
            .cards
            .lock()
            .unwrap()
            .extend(cards.into_iter().map(|card| (card.slug.clone(), card)));
        store
    }

    pub fn get(&self, slug: &str) -> Option<Card> {
        self.cards.lock().unwrap().get(slug).cloned()
    }

    /// Successful inserts, updates and deletes so far
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn sorted(&self, keep: impl Fn(&Card) -> bool) -> Vec<Card> {
        let mut cards: Vec<Card> = self
            .cards
            .lock()
            .unwrap()
            .values()
            .filter(|card| keep(card))
            .cloned()
            .collect();
        cards.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        cards
    }
}

#[axum::async_trait]
impl CardStore for MemoryCardStore {
    async fn insert_row(&self, card: &Card) -> DatabaseResult<bool> {
        let mut cards = self.cards.lock().unwrap();
        if cards.contains_key(&card.slug) {
            return Ok(false);
        }
        cards.insert(card.slug.clone(), card.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(true)
    }

    async fn list_by_owner(&self, owner_email: &str) -> DatabaseResult<Vec<Card>> {
        Ok(self.sorted(|card| card.owner_email == owner_email))
    }

    async fn list_all(&self) -> DatabaseResult<Vec<Card>> {
        Ok(self.sorted(|_| true))
    }

    async fn find_by_slug(&self, slug: &str) -> DatabaseResult<Option<Card>> {
        Ok(self.get(slug))
    }

    async fn update(&self, card: &Card) -> DatabaseResult<()> {
        let mut cards = self.cards.lock().unwrap();
        if let Some(stored) = cards.get_mut(&card.slug) {
            *stored = card.clone();
            self.writes.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }

    async fn delete(&self, slug: &str) -> DatabaseResult<bool> {
        let removed = self.cards.lock().unwrap().remove(slug).is_some();
        if removed {
            self.writes.fetch_add(1, Ordering::SeqCst);
        }
        Ok(removed)
    }
}
