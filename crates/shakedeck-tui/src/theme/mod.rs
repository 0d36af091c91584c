//! Centralized theme system.
//!
//! - `palette` - Raw color constants
//! - `styles` - Semantic style builder functions and status indicators

pub mod palette;
pub mod styles;
