//! Data Transfer Objects for the scan backend API
//!
//! This module contains the request and response bodies exchanged with the
//! backend. Field names follow the backend's snake_case wire format.

pub mod health;
pub mod run;
