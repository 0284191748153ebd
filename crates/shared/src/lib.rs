//! Shared types for Ledgerlock.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references

pub mod types;
