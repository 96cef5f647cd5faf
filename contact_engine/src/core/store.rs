// @file: contact_engine/src/core/store.rs
// @description: In-memory ContactRepository backed by an ordered map.
// @author: LAS.

use std::collections::BTreeMap;
use std::sync::Arc;
use async_trait::async_trait;
use tokio::sync::RwLock;
use crate::core::errors::RepositoryError;
use crate::core::interfaces::ContactRepository;
use crate::core::models::Contact;


//
// STORE STRUCT
//

#[derive(Clone, Default)]
pub struct InMemoryContactStore {
    state: Arc<RwLock<StoreState>>,
}

#[derive(Default)]
struct StoreState {
    contacts: BTreeMap<i64, Contact>,
    last_id: i64,
}

impl InMemoryContactStore {
    pub fn new() -> Self {
        Self::default()
    }
}


//
// REPOSITORY IMPLEMENTATION
//

#[async_trait]
impl ContactRepository for InMemoryContactStore {
    async fn get_all_contacts(&self) -> Result<Vec<Contact>, RepositoryError> {
        let state = self.state.read().await;
        Ok(state.contacts.values().cloned().collect())
    }

    async fn add_contacts(&self, contacts: Vec<Contact>) -> Result<Vec<Contact>, RepositoryError> {
        let mut state = self.state.write().await;
        let mut stored: Vec<Contact> = Vec::with_capacity(contacts.len());

        for mut contact in contacts {
            state.last_id += 1;
            contact.id = state.last_id;
            state.contacts.insert(contact.id, contact.clone());
            stored.push(contact);
        }
        Ok(stored)
    }

    async fn update_contact(&self, contact: Contact) -> Result<Contact, RepositoryError> {
        let mut state = self.state.write().await;
        match state.contacts.get_mut(&contact.id) {
            Some(slot) => {
                *slot = contact.clone();
                Ok(contact)
            }
            None => Err(RepositoryError::NotFound(contact.id)),
        }
    }

    async fn delete_contact(&self, id: i64) -> Result<bool, RepositoryError> {
        let mut state = self.state.write().await;
        Ok(state.contacts.remove(&id).is_some())
    }
}
