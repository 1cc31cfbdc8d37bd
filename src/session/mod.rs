//! Editing session management module
//!
//! This module contains:
//! - Session state and the operations it validates
//! - Message types for partition and selection interactions
//! - Message handlers
//! - The text command adapter that produces messages

pub mod commands;
pub mod handlers;
pub mod messages;
pub mod state;
