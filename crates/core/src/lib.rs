//! MES Core - Shared domain library for the MES dashboard.
//!
//! This crate provides the types and pure domain logic used across the
//! dashboard components:
//! - `api` - JSON REST API over the upstream MES database
//! - `integration-tests` - end-to-end HTTP tests
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! database access, no HTTP. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and status enums
//! - [`consumption`] - Material-consumption grouping and aggregation
//! - [`plan`] - Plan-quantity derivation for ingredient/batch pairs

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod consumption;
pub mod plan;
pub mod types;

pub use types::*;
