// @file: contact_engine/src/core/interfaces.rs
// @description: Seams to the persistence collaborator and to the realtime notifier.
// @author: LAS.

use async_trait::async_trait;
use crate::core::errors::RepositoryError;
use crate::core::models::{Contact, WsMessage};


//
// TRAIT DEFINITIONS
//

#[async_trait]
pub trait ContactRepository: Send + Sync {
    async fn get_all_contacts(&self) -> Result<Vec<Contact>, RepositoryError>;

    // Assigns identifiers; returns the stored contacts in input order.
    async fn add_contacts(&self, contacts: Vec<Contact>) -> Result<Vec<Contact>, RepositoryError>;

    async fn update_contact(&self, contact: Contact) -> Result<Contact, RepositoryError>;

    // `Ok(false)` when nothing carried that id.
    async fn delete_contact(&self, id: i64) -> Result<bool, RepositoryError>;
}

/// Receives change events after a successful mutation.
#[async_trait]
pub trait ChangeNotifier: Send + Sync {
    // Returns how many clients were reached.
    async fn notify(&self, message: WsMessage) -> usize;
}
