// @file: contact_engine/src/core/models.rs
// @description: Contact records, realtime envelope and statistics shapes shared across the engine.
// @author: LAS.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;


//
// CONTACT STRUCTURES
//

/// Raw CSV row. Cells are copied verbatim (after trimming), nothing is validated yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactCsvRecord {
    pub name: String,
    pub date_of_birth: String,
    pub married: String,
    pub phone: String,
    pub salary: String,
}

/// Canonical contact. `id == 0` means the repository has not assigned one yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Contact {
    pub id: i64,
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub married: bool,
    pub phone: String,
    pub salary: f64,
}

impl Contact {
    pub fn new(
        name: impl Into<String>,
        date_of_birth: NaiveDate,
        married: bool,
        phone: impl Into<String>,
        salary: f64,
    ) -> Self {
        Self {
            id: 0,
            name: name.into(),
            date_of_birth,
            married,
            phone: phone.into(),
            salary,
        }
    }
}


//
// STATISTICS
//

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContactStatistics {
    pub total_contacts: usize,
    pub married_contacts: usize,
    pub single_contacts: usize,
    pub average_salary: f64,
    pub min_salary: f64,
    pub max_salary: f64,
    pub average_age: f64,
    pub married_percentage: f64,
}


//
// IMPORT RESULT
//

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ImportSummary {
    /// Data rows seen in the file (header excluded).
    pub rows_read: usize,
    /// Rows that survived field conversion.
    pub contacts_parsed: usize,
    pub imported: usize,
    pub skipped: usize,
    pub message: String,
}


//
// REALTIME ENVELOPE
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageType {
    Ping,
    Pong,
    ContactCreated,
    ContactUpdated,
    ContactDeleted,
    ContactsImported,
    Error,
    Info,
    StatisticsUpdated,
}

impl MessageType {
    pub const ALL: [MessageType; 9] = [
        MessageType::Ping,
        MessageType::Pong,
        MessageType::ContactCreated,
        MessageType::ContactUpdated,
        MessageType::ContactDeleted,
        MessageType::ContactsImported,
        MessageType::Error,
        MessageType::Info,
        MessageType::StatisticsUpdated,
    ];

    const NAMES: &'static [&'static str] = &[
        "Ping",
        "Pong",
        "ContactCreated",
        "ContactUpdated",
        "ContactDeleted",
        "ContactsImported",
        "Error",
        "Info",
        "StatisticsUpdated",
    ];

    /// Case-insensitive lookup by variant name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .zip(Self::NAMES)
            .find(|(_, candidate)| candidate.eq_ignore_ascii_case(name.trim()))
            .map(|(kind, _)| kind)
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Outbound frames always use PascalCase keys. Inbound frames are read leniently:
/// lower-case keys, any-case type names and offset-less timestamps are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WsMessage {
    #[serde(rename = "Type", alias = "type", deserialize_with = "kind_ignoring_case")]
    pub kind: MessageType,

    #[serde(rename = "Data", alias = "data", default)]
    pub data: Option<Value>,

    #[serde(rename = "Message", alias = "message", default)]
    pub message: Option<String>,

    #[serde(
        rename = "Timestamp",
        alias = "timestamp",
        default = "Utc::now",
        deserialize_with = "lenient_timestamp"
    )]
    pub timestamp: DateTime<Utc>,
}

impl WsMessage {
    pub fn new(kind: MessageType, data: Option<Value>, message: Option<String>) -> Self {
        Self {
            kind,
            data,
            message,
            timestamp: Utc::now(),
        }
    }

    pub fn ping() -> Self {
        Self::new(MessageType::Ping, None, Some("ping".to_string()))
    }

    pub fn pong() -> Self {
        Self::new(MessageType::Pong, None, Some("pong".to_string()))
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(MessageType::Info, None, Some(text.into()))
    }
}


//
// ENVELOPE DECODING
//

const NAIVE_TIMESTAMP_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"];

fn kind_ignoring_case<'de, D>(deserializer: D) -> Result<MessageType, D::Error>
where
    D: Deserializer<'de>,
{
    let name: String = String::deserialize(deserializer)?;
    MessageType::from_name(&name).ok_or_else(|| de::Error::unknown_variant(&name, MessageType::NAMES))
}

// Unreadable timestamps fall back to the receive time instead of failing the frame.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Value = Value::deserialize(deserializer)?;
    Ok(raw.as_str().and_then(parse_timestamp).unwrap_or_else(Utc::now))
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(stamp) = DateTime::parse_from_rfc3339(value) {
        return Some(stamp.with_timezone(&Utc));
    }

    // No offset: read as UTC.
    NAIVE_TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
}
