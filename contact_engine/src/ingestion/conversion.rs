// @file: contact_engine/src/ingestion/conversion.rs
// @description: Permissive field conversion from raw CSV cells to a canonical Contact.
// @author: LAS.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use crate::core::errors::ConversionError;
use crate::core::models::{Contact, ContactCsvRecord};


//
// CONSTANTS
//

// Tried in order, first match wins. "04/05/2020" therefore reads as April 5th:
// MM/dd/yyyy shadows dd/MM/yyyy whenever both day and month are <= 12.
// `%Y` takes any digit count, so "12.04.95" is year 95; validation rejects it by age.
const EXACT_DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%d.%m.%Y", "%m/%d/%Y", "%d/%m/%Y"];

const FALLBACK_DATE_FORMATS: [&str; 7] = [
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%d-%m-%Y",
    "%d %B %Y",
    "%B %d, %Y",
    "%B %d %Y",
    "%d-%b-%Y",
];

const FALLBACK_DATETIME_FORMATS: [&str; 5] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
];

// Plain digits with an optional decimal point. No exponent, no grouping, no minus.
static SALARY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\+?(?:\d+(?:\.\d*)?|\.\d+)$").expect("salary pattern is valid")
});


//
// FIELD PARSERS
//

pub fn parse_birth_date(raw: &str) -> Option<NaiveDate> {
    let value: &str = raw.trim();
    if value.is_empty() {
        return None;
    }

    // #1. Fixed formats
    for format in EXACT_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Some(date);
        }
    }

    // #2. General invariant parse
    parse_general_date(value)
}

fn parse_general_date(value: &str) -> Option<NaiveDate> {
    if let Ok(stamp) = DateTime::parse_from_rfc3339(value) {
        return Some(stamp.date_naive());
    }

    for format in FALLBACK_DATETIME_FORMATS {
        if let Ok(stamp) = NaiveDateTime::parse_from_str(value, format) {
            return Some(stamp.date());
        }
    }

    FALLBACK_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
}

pub fn parse_married(raw: &str) -> Option<bool> {
    let value: &str = raw.trim();

    // #1. Strict boolean
    if value.eq_ignore_ascii_case("true") {
        return Some(true);
    }
    if value.eq_ignore_ascii_case("false") {
        return Some(false);
    }

    // #2. Localised yes/no and digits
    match value.to_lowercase().as_str() {
        "yes" | "да" | "1" => Some(true),
        "no" | "нет" | "0" => Some(false),
        _ => None,
    }
}

pub fn parse_salary(raw: &str) -> Option<f64> {
    let normalized: String = raw.trim().replace(',', ".");
    if !SALARY_PATTERN.is_match(&normalized) {
        return None;
    }

    normalized
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}


//
// RECORD CONVERSION
//

/// Converts one raw row. Any unconvertible field rejects the whole row.
pub fn convert_record(record: &ContactCsvRecord) -> Result<Contact, ConversionError> {
    let date_of_birth: NaiveDate = parse_birth_date(&record.date_of_birth)
        .ok_or_else(|| ConversionError::InvalidDate(record.date_of_birth.clone()))?;

    let married: bool = parse_married(&record.married)
        .ok_or_else(|| ConversionError::InvalidMarried(record.married.clone()))?;

    let salary: f64 = parse_salary(&record.salary)
        .ok_or_else(|| ConversionError::InvalidSalary(record.salary.clone()))?;

    Ok(Contact::new(
        record.name.trim(),
        date_of_birth,
        married,
        record.phone.trim(),
        salary,
    ))
}
