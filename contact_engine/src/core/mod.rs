// @file: contact_engine/src/core/mod.rs
// @description: Contact domain: models, rules, statistics, storage and the service tying them together.
// @author: LAS.

pub mod errors;
pub mod interfaces;
pub mod models;
pub mod service;
pub mod statistics;
pub mod store;
pub mod validation;
