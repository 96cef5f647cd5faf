// @file: contact_engine/src/utils/mod.rs
// @description: Cross-cutting helpers (configuration).
// @author: LAS.

pub mod config;
