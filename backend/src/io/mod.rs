//! # IO Module
//!
//! Interface layer that exposes the domain to callers. Currently a REST
//! API; the domain layer is surface-agnostic.

pub mod rest;
