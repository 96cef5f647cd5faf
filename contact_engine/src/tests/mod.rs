// @file: contact_engine/src/tests/mod.rs
// @description: Scenario test suites for the ingestion pipeline, connection manager, service and server.
// @author: LAS.

mod support;

mod csv_pipeline;
mod ws_roundtrip;
