use crate::domain::{Quote, QuoteId};
use crate::shared::error::AppError;

/// In-memory quote collection in insertion order, at most one record per id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordStore {
    quotes: Vec<Quote>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from a collection, keeping the first occurrence of each id.
    pub fn from_quotes(quotes: Vec<Quote>) -> Self {
        let mut store = Self::new();
        store.replace_all(quotes);
        store
    }

    pub fn get_all(&self) -> &[Quote] {
        &self.quotes
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    pub fn contains(&self, id: &QuoteId) -> bool {
        self.position(id).is_some()
    }

    pub fn position(&self, id: &QuoteId) -> Option<usize> {
        self.quotes.iter().position(|quote| &quote.id == id)
    }

    pub fn find_by_id(&self, id: &QuoteId) -> Result<&Quote, AppError> {
        self.quotes
            .iter()
            .find(|quote| &quote.id == id)
            .ok_or_else(|| AppError::NotFound(format!("quote {id}")))
    }

    pub fn find_by_id_mut(&mut self, id: &QuoteId) -> Result<&mut Quote, AppError> {
        self.quotes
            .iter_mut()
            .find(|quote| &quote.id == id)
            .ok_or_else(|| AppError::NotFound(format!("quote {id}")))
    }

    /// Replaces the record with the same id in place, or appends it.
    pub fn upsert(&mut self, quote: Quote) {
        match self.position(&quote.id) {
            Some(index) => self.quotes[index] = quote,
            None => self.quotes.push(quote),
        }
    }

    /// Inserts at the head, where freshly created quotes go.
    pub fn insert_front(&mut self, quote: Quote) {
        self.insert_at(0, quote);
    }

    /// Inserts at `index` (clamped to the end). An existing record with the
    /// same id is removed first.
    pub fn insert_at(&mut self, index: usize, quote: Quote) {
        self.remove(&quote.id);
        let index = index.min(self.quotes.len());
        self.quotes.insert(index, quote);
    }

    /// Swaps the record at `old_id` for `quote`, keeping its position.
    ///
    /// Returns `false` when `old_id` is gone. If another record already holds
    /// the new id, that copy is dropped so the id stays unique.
    pub fn replace_id(&mut self, old_id: &QuoteId, quote: Quote) -> bool {
        let Some(index) = self.position(old_id) else {
            return false;
        };

        if &quote.id != old_id {
            if let Some(duplicate) = self.position(&quote.id) {
                self.quotes.remove(duplicate);
                let index = if duplicate < index { index - 1 } else { index };
                self.quotes[index] = quote;
                return true;
            }
        }

        self.quotes[index] = quote;
        true
    }

    /// Removes the record and reports where it was. Absent ids are a no-op.
    pub fn remove(&mut self, id: &QuoteId) -> Option<(usize, Quote)> {
        let index = self.position(id)?;
        Some((index, self.quotes.remove(index)))
    }

    /// Replaces the whole collection, dropping repeated ids after their first occurrence.
    pub fn replace_all(&mut self, quotes: Vec<Quote>) {
        let mut seen = std::collections::HashSet::with_capacity(quotes.len());
        self.quotes = quotes
            .into_iter()
            .filter(|quote| seen.insert(quote.id.clone()))
            .collect();
    }
}
