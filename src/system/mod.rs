//! # System Interaction Layer
//!
//! This module provides abstractions for interacting with the underlying operating system
//! and terminal. It serves as a boundary between the submission workflow and the specifics
//! of process management and interactive rendering.
//!
//! ## Modules
//!
//! - **`executor`**: Runs lesson commands sequentially through a shell under a fixed
//!   UTF-8 locale and captures exit code, stdout and stderr for each of them. A failing
//!   or unlaunchable command becomes a result, never an error.
//! - **`progress`**: The short, cancellable progress animation shown before commands run,
//!   behind the `ProgressIndicator` trait so it can be replaced by a no-op.

pub mod executor;
pub mod progress;
