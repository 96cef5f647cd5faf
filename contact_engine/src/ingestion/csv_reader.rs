// @file: contact_engine/src/ingestion/csv_reader.rs
// @description: Header-tolerant CSV reader producing canonical contacts, skipping rows it cannot convert.
// @author: LAS.

use std::io::Read;
use csv::{ReaderBuilder, StringRecord, Trim};
use log::{debug, info};
use crate::core::errors::IngestionError;
use crate::core::models::{Contact, ContactCsvRecord};
use crate::ingestion::conversion::convert_record;


//
// HEADER ALIASES
//

// Exact, case-sensitive. Earlier aliases win when a file carries several.
const NAME_ALIASES: &[&str] = &["Name", "Имя"];
const DATE_OF_BIRTH_ALIASES: &[&str] = &["DateOfBirth", "Date of birth", "Дата рождения"];
const MARRIED_ALIASES: &[&str] = &["Married", "Женат"];
const PHONE_ALIASES: &[&str] = &["Phone", "Телефон"];
const SALARY_ALIASES: &[&str] = &["Salary", "Зарплата"];

const UTF8_BOM: char = '\u{feff}';


//
// TYPE DEFINITIONS
//

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseReport {
    pub rows_seen: usize,
    pub rows_parsed: usize,
    pub rows_converted: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ParseOutcome {
    pub contacts: Vec<Contact>,
    pub report: ParseReport,
}

/// Column positions of the five canonical fields. `None` means the file lacks the column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct ColumnMap {
    name: Option<usize>,
    date_of_birth: Option<usize>,
    married: Option<usize>,
    phone: Option<usize>,
    salary: Option<usize>,
}

impl ColumnMap {
    fn from_headers(headers: &StringRecord) -> Self {
        Self {
            name: find_column(headers, NAME_ALIASES),
            date_of_birth: find_column(headers, DATE_OF_BIRTH_ALIASES),
            married: find_column(headers, MARRIED_ALIASES),
            phone: find_column(headers, PHONE_ALIASES),
            salary: find_column(headers, SALARY_ALIASES),
        }
    }

    // Missing cells become empty strings rather than errors.
    fn materialize(&self, row: &StringRecord) -> ContactCsvRecord {
        let cell = |index: Option<usize>| -> String {
            index
                .and_then(|i| row.get(i))
                .unwrap_or_default()
                .to_string()
        };

        ContactCsvRecord {
            name: cell(self.name),
            date_of_birth: cell(self.date_of_birth),
            married: cell(self.married),
            phone: cell(self.phone),
            salary: cell(self.salary),
        }
    }
}

fn find_column(headers: &StringRecord, aliases: &[&str]) -> Option<usize> {
    aliases.iter().find_map(|alias| {
        headers
            .iter()
            .position(|header| header.trim_start_matches(UTF8_BOM) == *alias)
    })
}


//
// PUBLIC INTERFACE
//

/// Parses an uploaded CSV stream into contacts.
///
/// Only a stream that cannot be read at all is an error. Rows that fail to
/// decode or convert are logged and dropped; the remaining rows are returned.
pub fn parse_contacts<R: Read>(source: R) -> Result<Vec<Contact>, IngestionError> {
    parse_contacts_with_report(source).map(|outcome| outcome.contacts)
}

pub fn parse_contacts_with_report<R: Read>(source: R) -> Result<ParseOutcome, IngestionError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(source);

    // #1. Header row
    let columns: ColumnMap = match reader.headers() {
        Ok(headers) => ColumnMap::from_headers(headers),
        Err(e) => return Err(IngestionError::Unreadable(e)),
    };
    debug!("CSV column map: {:?}", columns);

    // #2. Rows
    let mut outcome = ParseOutcome::default();
    let mut raw_records: Vec<(usize, ContactCsvRecord)> = Vec::new();

    for result in reader.records() {
        outcome.report.rows_seen += 1;
        let row_number: usize = outcome.report.rows_seen;

        match result {
            Ok(row) => {
                let record = columns.materialize(&row);
                debug!("Parsed row {}: {}", row_number, record.name);
                raw_records.push((row_number, record));
            }
            Err(e) if e.is_io_error() => return Err(IngestionError::Unreadable(e)),
            Err(e) => {
                debug!("Skipping row {}: {}", row_number, e);
            }
        }
    }
    outcome.report.rows_parsed = raw_records.len();

    // #3. Conversion
    for (row_number, record) in raw_records {
        match convert_record(&record) {
            Ok(contact) => {
                debug!("Converted row {}: {}", row_number, contact.name);
                outcome.contacts.push(contact);
            }
            Err(e) => {
                debug!("Dropping row {} ({}): {}", row_number, record.name, e);
            }
        }
    }
    outcome.report.rows_converted = outcome.contacts.len();

    info!(
        "CSV parsing completed. Rows: {}, parsed: {}, converted: {}",
        outcome.report.rows_seen, outcome.report.rows_parsed, outcome.report.rows_converted
    );

    Ok(outcome)
}
