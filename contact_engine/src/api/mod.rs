// @file: contact_engine/src/api/mod.rs
// @description: Realtime notification surface (connection registry and WebSocket endpoint).
// @author: LAS.

pub mod connection_manager;
pub mod socket;
pub mod ws_server;
