//! Utility Functions and Cross-Cutting Concerns
//!
//! This module provides utility functions and macros used throughout the crate:
//!
//! - **console_macros**: WASM-compatible logging macros for browser console output
//! - **files**: filename classification for imported dashboard files
//! - **format**: display helpers for wallet addresses and byte counts
//! - **time**: dual-target clock access

pub mod console_macros;
pub mod files;
pub mod format;
pub mod time;

pub use files::*;
pub use format::*;
pub use time::*;
