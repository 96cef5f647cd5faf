// @file: contact_engine\src\lib.rs
// @description: Library root: CSV ingestion, contact service and the realtime WebSocket layer.
// @author: LAS.


pub mod api;
pub mod core;
pub mod ingestion;
pub mod utils;

#[cfg(test)]
mod tests;
