// @file: contact_engine/src/core/service.rs
// @description: Contact service: CSV import, CRUD and statistics, announcing every change to connected clients.
// @author: LAS.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use chrono::{NaiveDate, Utc};
use log::{debug, info, warn};
use serde_json::json;
use crate::core::errors::{RepositoryError, ServiceError};
use crate::core::interfaces::{ChangeNotifier, ContactRepository};
use crate::core::models::{Contact, ContactStatistics, ImportSummary, MessageType, WsMessage};
use crate::core::statistics::compute_statistics;
use crate::core::validation::validate_contact;
use crate::ingestion::{parse_contacts_with_report, ParseOutcome};


//
// CONSTANTS
//

pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;


//
// SERVICE STRUCT
//

#[derive(Clone)]
pub struct ContactService {
    repository: Arc<dyn ContactRepository>,
    notifier: Arc<dyn ChangeNotifier>,
    max_upload_bytes: usize,
}

impl ContactService {
    pub fn new(
        repository: Arc<dyn ContactRepository>,
        notifier: Arc<dyn ChangeNotifier>,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            repository,
            notifier,
            max_upload_bytes,
        }
    }


    //
    // QUERIES
    //

    pub async fn list_contacts(&self) -> Result<Vec<Contact>, ServiceError> {
        let contacts: Vec<Contact> = self.repository.get_all_contacts().await?;
        debug!("Loaded {} contacts", contacts.len());
        Ok(contacts)
    }

    pub async fn get_contact(&self, id: i64) -> Result<Contact, ServiceError> {
        self.repository
            .get_all_contacts()
            .await?
            .into_iter()
            .find(|contact| contact.id == id)
            .ok_or(ServiceError::Repository(RepositoryError::NotFound(id)))
    }

    pub async fn statistics(&self) -> Result<ContactStatistics, ServiceError> {
        let contacts: Vec<Contact> = self.repository.get_all_contacts().await?;
        Ok(compute_statistics(&contacts, today()))
    }


    //
    // CSV IMPORT
    //

    pub async fn import_csv(&self, file_name: &str, bytes: &[u8]) -> Result<ImportSummary, ServiceError> {
        let started: Instant = Instant::now();
        info!("Starting CSV import: {}", file_name);

        // #1. Upload checks
        if bytes.is_empty() {
            return Err(ServiceError::EmptyFile);
        }
        let extension: Option<String> = Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());
        if extension.as_deref() != Some("csv") {
            return Err(ServiceError::InvalidExtension(file_name.to_string()));
        }
        if bytes.len() > self.max_upload_bytes {
            return Err(ServiceError::FileTooLarge { limit: self.max_upload_bytes });
        }

        // #2. Parse
        let ParseOutcome { contacts, report } = parse_contacts_with_report(bytes)?;
        let rows_read: usize = report.rows_seen;
        let contacts_parsed: usize = contacts.len();

        if contacts.is_empty() {
            return Ok(ImportSummary {
                rows_read,
                contacts_parsed,
                imported: 0,
                skipped: rows_read,
                message: "File contains no contacts to import".to_string(),
            });
        }

        // #3. Validate
        let today: NaiveDate = today();
        let mut valid: Vec<Contact> = Vec::with_capacity(contacts.len());
        let mut rejected: usize = 0;
        for (index, contact) in contacts.into_iter().enumerate() {
            match validate_contact(&contact, today) {
                Ok(()) => valid.push(contact),
                Err(e) => {
                    rejected += 1;
                    debug!("Contact {} rejected: {}", index + 1, e);
                }
            }
        }

        // #4. Store
        let imported: usize = if valid.is_empty() {
            0
        } else {
            self.repository.add_contacts(valid).await?.len()
        };

        let mut message: String = format!(
            "Import completed. Added contacts: {} of {}.",
            imported, contacts_parsed
        );
        if rejected > 0 {
            message.push_str(&format!(" Skipped due to errors: {}.", rejected));
            warn!("Contacts skipped due to validation errors: {}", rejected);
        }

        // #5. Announce
        if imported > 0 {
            let event = WsMessage::new(
                MessageType::ContactsImported,
                Some(json!({ "Count": imported })),
                Some(message.clone()),
            );
            self.notifier.notify(event).await;
            self.publish_statistics().await;
        }

        info!(
            "CSV import of '{}' finished in {}ms. Added: {}",
            file_name,
            started.elapsed().as_millis(),
            imported
        );

        Ok(ImportSummary {
            rows_read,
            contacts_parsed,
            imported,
            skipped: rows_read.saturating_sub(imported),
            message,
        })
    }


    //
    // MUTATIONS
    //

    pub async fn add_contact(&self, contact: Contact) -> Result<Contact, ServiceError> {
        validate_contact(&contact, today())?;

        let stored: Contact = self
            .repository
            .add_contacts(vec![contact])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| RepositoryError::Storage("repository returned no contact".to_string()))?;

        info!("Contact {} created", stored.id);
        self.announce(MessageType::ContactCreated, serde_json::to_value(&stored).ok(), "Contact created")
            .await;
        Ok(stored)
    }

    pub async fn update_contact(&self, contact: Contact) -> Result<Contact, ServiceError> {
        if let Err(e) = validate_contact(&contact, today()) {
            warn!("Validation failed while updating contact {}: {}", contact.id, e);
            return Err(e.into());
        }

        let updated: Contact = self.repository.update_contact(contact).await?;

        info!("Contact {} updated", updated.id);
        self.announce(MessageType::ContactUpdated, serde_json::to_value(&updated).ok(), "Contact updated")
            .await;
        Ok(updated)
    }

    /// Returns whether a contact was removed. Unknown ids announce nothing.
    pub async fn delete_contact(&self, id: i64) -> Result<bool, ServiceError> {
        let removed: bool = self.repository.delete_contact(id).await?;
        if !removed {
            debug!("Delete of unknown contact {} ignored", id);
            return Ok(false);
        }

        info!("Contact {} deleted", id);
        self.announce(MessageType::ContactDeleted, Some(json!({ "Id": id })), "Contact deleted")
            .await;
        Ok(true)
    }


    //
    // NOTIFICATION HELPERS
    //

    async fn announce(&self, kind: MessageType, data: Option<serde_json::Value>, text: &str) {
        self.notifier
            .notify(WsMessage::new(kind, data, Some(text.to_string())))
            .await;
        self.publish_statistics().await;
    }

    pub async fn publish_statistics(&self) {
        match self.statistics().await {
            Ok(stats) => {
                let event = WsMessage::new(
                    MessageType::StatisticsUpdated,
                    serde_json::to_value(&stats).ok(),
                    None,
                );
                self.notifier.notify(event).await;
            }
            Err(e) => warn!("Could not compute statistics for broadcast: {}", e),
        }
    }
}


fn today() -> NaiveDate {
    Utc::now().date_naive()
}
