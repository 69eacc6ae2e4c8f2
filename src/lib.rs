//! Command-line client for validating lesson tasks and submitting them for grading.

include!(concat!(env!("OUT_DIR"), "/translations.rs"));

pub mod api;
pub mod cli;
pub mod constants;
pub mod core;
pub mod models;
pub mod system;
