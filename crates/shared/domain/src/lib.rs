//! # Domain Models
//!
//! This crate contains pure domain types with a single dependency (`serde`).
//! Keep it lean: no I/O, networking, or crypto, just data and simple helpers.

pub mod config;
pub mod constants;
pub mod registry;
