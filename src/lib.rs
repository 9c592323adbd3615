//! minish: a small line-oriented command interpreter.
//!
//! Each input line goes through [`shell::tokenizer`], [`shell::expander`] and
//! [`shell::planner`], then either runs a built-in from [`core::commands`] or
//! is handed to [`process::ProcessExecutor`]. Background children are watched
//! by [`process::JobMonitor`] between prompts.

pub mod config;
pub mod core;
pub mod error;
pub mod flags;
pub mod input;
pub mod process;
pub mod shell;
