// src/db/memory.rs
//
// Implementações em memória de QuoteStore e UserDirectory para os testes dos serviços.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{QuoteFilter, QuoteStore, QuoteWrite, UserDirectory},
    models::quote::{Quote, QuoteStatus, StatusHistoryEntry, TransferHistoryEntry},
};

#[derive(Default)]
pub struct MemoryStore {
    pub quotes: Mutex<HashMap<Uuid, Quote>>,
    pub users: Mutex<HashMap<Uuid, String>>,
}

impl MemoryStore {
    pub async fn add_user(&self, name: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.users.lock().await.insert(id, name.to_string());
        id
    }

    // Simula outro processo alterando o status direto no banco
    pub async fn force_status(&self, id: Uuid, status: QuoteStatus) {
        if let Some(quote) = self.quotes.lock().await.get_mut(&id) {
            quote.status = status;
        }
    }
}

fn matches(quote: &Quote, filter: &QuoteFilter) -> bool {
    filter.created_by.is_none_or(|u| quote.created_by == u)
        && filter.status.is_none_or(|s| quote.status == s)
        && filter.client_id.is_none_or(|c| quote.client_id == c)
        && (!filter.transferred_only || !quote.transfer_history.is_empty())
        && filter.transfer_party.is_none_or(|u| quote.involves_in_transfer(u))
}

#[async_trait]
impl QuoteStore for MemoryStore {
    async fn insert(&self, quote: &Quote) -> Result<(), AppError> {
        self.quotes.lock().await.insert(quote.id, quote.clone());
        Ok(())
    }

    async fn find(&self, id: Uuid) -> Result<Option<Quote>, AppError> {
        Ok(self.quotes.lock().await.get(&id).cloned())
    }

    async fn list(&self, filter: &QuoteFilter) -> Result<Vec<Quote>, AppError> {
        let mut quotes: Vec<Quote> = self
            .quotes
            .lock()
            .await
            .values()
            .filter(|q| matches(q, filter))
            .cloned()
            .collect();
        quotes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(quotes)
    }

    async fn append_status(&self, id: Uuid, entry: &StatusHistoryEntry) -> Result<bool, AppError> {
        let mut quotes = self.quotes.lock().await;
        match quotes.get_mut(&id) {
            Some(quote) => {
                quote.status_history.push(entry.clone());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn update(
        &self,
        id: Uuid,
        expected_status: QuoteStatus,
        write: &QuoteWrite,
    ) -> Result<Option<Quote>, AppError> {
        let mut quotes = self.quotes.lock().await;
        let Some(quote) = quotes.get_mut(&id) else {
            return Ok(None);
        };
        if quote.status != expected_status {
            return Ok(None);
        }

        quote.client_id = write.client_id;
        quote.client_name = write.client_name.clone();
        quote.client_email = write.client_email.clone();
        quote.client_phone = write.client_phone.clone();
        quote.date = write.date;
        quote.items = write.items.clone();
        quote.subtotal = write.subtotal;
        quote.discount = write.discount;
        quote.total = write.total;
        quote.status = write.status;
        quote.notes = write.notes.clone();
        quote.updated_at = write.updated_at;
        quote.last_updated_by = Some(write.last_updated_by);
        if let Some(entry) = &write.status_entry {
            quote.status_history.push(entry.clone());
        }

        Ok(Some(quote.clone()))
    }

    async fn append_transfer(
        &self,
        id: Uuid,
        entry: &TransferHistoryEntry,
    ) -> Result<Option<Quote>, AppError> {
        let mut quotes = self.quotes.lock().await;
        let Some(quote) = quotes.get_mut(&id) else {
            return Ok(None);
        };
        quote.transfer_history.push(entry.clone());
        quote.last_updated_by = Some(entry.transferred_by);
        quote.updated_at = entry.date;
        Ok(Some(quote.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.quotes.lock().await.remove(&id).is_some())
    }
}

#[async_trait]
impl UserDirectory for MemoryStore {
    async fn user_names(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, String>, AppError> {
        let users = self.users.lock().await;
        Ok(ids
            .iter()
            .filter_map(|id| users.get(id).map(|name| (*id, name.clone())))
            .collect())
    }

    async fn user_exists(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.users.lock().await.contains_key(&id))
    }

    async fn roster(&self) -> Result<Vec<(Uuid, String)>, AppError> {
        let mut users: Vec<(Uuid, String)> = self
            .users
            .lock()
            .await
            .iter()
            .map(|(id, name)| (*id, name.clone()))
            .collect();
        users.sort_by(|a, b| a.1.cmp(&b.1));
        Ok(users)
    }
}
