// @file: contact_engine/src/ingestion/mod.rs
// @description: CSV ingestion pipeline (reading, header mapping and field conversion).
// @author: LAS.

pub mod conversion;
pub mod csv_reader;

pub use csv_reader::{parse_contacts, parse_contacts_with_report, ParseOutcome, ParseReport};
