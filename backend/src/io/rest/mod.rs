//! # REST API Interface Layer
//!
//! HTTP endpoints for the ledger. This layer is a pure translation layer:
//! JSON serialization, request logging, and mapping domain errors to HTTP
//! status codes. No business logic lives here.

pub mod auth_apis;
pub mod dashboard_apis;
pub mod member_apis;
pub mod transaction_apis;
