// @file: contact_engine/src/core/validation.rs
// @description: Business rules every persisted contact must satisfy.
// @author: LAS.

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use crate::core::errors::ValidationError;
use crate::core::models::Contact;


//
// CONSTANTS
//

pub const NAME_MAX_CHARS: usize = 100;
pub const PHONE_MIN_CHARS: usize = 5;
pub const PHONE_MAX_CHARS: usize = 20;
pub const MAX_AGE_YEARS: i32 = 150;
pub const MAX_SALARY: f64 = 10_000_000.0;

static PHONE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+]?[0-9\s\-()]+$").expect("phone pattern is valid"));


//
// PUBLIC INTERFACE
//

/// Whole years between `date_of_birth` and `today`.
pub fn calculate_age(date_of_birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age: i32 = today.year() - date_of_birth.year();
    if (today.month(), today.day()) < (date_of_birth.month(), date_of_birth.day()) {
        age -= 1;
    }
    age
}

pub fn validate_contact(contact: &Contact, today: NaiveDate) -> Result<(), ValidationError> {
    let mut errors: Vec<String> = Vec::new();

    // #1. Name
    let name: &str = contact.name.trim();
    if name.is_empty() {
        errors.push("Name is required".to_string());
    } else if name.chars().count() > NAME_MAX_CHARS {
        errors.push(format!("Name must be at most {} characters", NAME_MAX_CHARS));
    }

    // #2. Date of birth
    if contact.date_of_birth > today {
        errors.push("Date of birth cannot be in the future".to_string());
    } else if calculate_age(contact.date_of_birth, today) > MAX_AGE_YEARS {
        errors.push(format!("Age cannot exceed {} years", MAX_AGE_YEARS));
    }

    // #3. Phone
    let phone: &str = contact.phone.trim();
    let phone_len: usize = phone.chars().count();
    if phone.is_empty() {
        errors.push("Phone is required".to_string());
    } else if !(PHONE_MIN_CHARS..=PHONE_MAX_CHARS).contains(&phone_len) {
        errors.push(format!(
            "Phone must be between {} and {} characters",
            PHONE_MIN_CHARS, PHONE_MAX_CHARS
        ));
    } else if !PHONE_PATTERN.is_match(phone) {
        errors.push("Invalid phone number format".to_string());
    }

    // #4. Salary
    if !contact.salary.is_finite() || contact.salary < 0.0 || contact.salary > MAX_SALARY {
        errors.push("Salary must be between 0 and 10,000,000".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { errors })
    }
}
