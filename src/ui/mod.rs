//! User interface components for terminal interaction.
//!
//! # Modules
//!
//! - [`display`]: styled per-file messages and the end-of-run report
//! - [`prompt`]: interactive password dialogs

pub mod display;
pub mod prompt;
