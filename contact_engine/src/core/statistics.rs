// @file: contact_engine/src/core/statistics.rs
// @description: Aggregate figures over the stored contacts.
// @author: LAS.

use chrono::NaiveDate;
use crate::core::models::{Contact, ContactStatistics};
use crate::core::validation::calculate_age;


pub fn compute_statistics(contacts: &[Contact], today: NaiveDate) -> ContactStatistics {
    if contacts.is_empty() {
        return ContactStatistics::default();
    }

    let total: usize = contacts.len();
    let married: usize = contacts.iter().filter(|c| c.married).count();

    let salary_sum: f64 = contacts.iter().map(|c| c.salary).sum();
    let min_salary: f64 = contacts.iter().map(|c| c.salary).fold(f64::INFINITY, f64::min);
    let max_salary: f64 = contacts.iter().map(|c| c.salary).fold(f64::NEG_INFINITY, f64::max);

    let age_sum: f64 = contacts
        .iter()
        .map(|c| calculate_age(c.date_of_birth, today) as f64)
        .sum();

    let married_percentage: f64 = (married as f64 / total as f64 * 100.0 * 100.0).round() / 100.0;

    ContactStatistics {
        total_contacts: total,
        married_contacts: married,
        single_contacts: total - married,
        average_salary: salary_sum / total as f64,
        min_salary,
        max_salary,
        average_age: age_sum / total as f64,
        married_percentage,
    }
}
