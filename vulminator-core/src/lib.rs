//! Vulminator Core
//!
//! Core types and pure logic for the Vulminator scan client.
//!
//! This crate contains:
//! - Domain types: Run requests, run state and findings
//! - DTOs: Wire shapes exchanged with the scan backend
//! - Classification: Partitioning findings into display buckets
//! - Timeline: Progress steps derived from the run message

pub mod classify;
pub mod domain;
pub mod dto;
pub mod timeline;
