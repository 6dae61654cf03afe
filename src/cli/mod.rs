//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the library layer.

pub mod generate;
pub mod key;
pub mod prompt;

pub use generate::{handle_generate_command, GenerateArgs};
pub use key::{handle_key_command, KeyCommands};
