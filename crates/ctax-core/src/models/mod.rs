//! Data models for tax extraction.

pub mod config;
pub mod tax;
