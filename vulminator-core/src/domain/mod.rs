//! Core domain types
//!
//! This module contains the structures shared by the HTTP client (which
//! produces them from backend responses) and the CLI (which tracks and
//! renders them).

pub mod finding;
pub mod run;
