// src/cli/handlers/mod.rs

pub mod commons;
pub mod config;
pub mod init;
pub mod submit;
