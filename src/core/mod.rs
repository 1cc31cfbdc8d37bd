//! Core application module
//!
//! This module contains:
//! - Command-line argument parsing
//! - Application entry point and the interactive command loop

pub mod app;
pub mod cli;
