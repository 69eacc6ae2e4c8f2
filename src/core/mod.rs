// src/core/mod.rs

pub mod config_resolver;
pub mod lab;
pub mod paths;
pub mod submission;
