//! Common types and utilities for the jscope scope analysis toolkit.
//!
//! This crate provides foundational types used across all jscope crates:
//! - Source spans (`Span`)
//! - Position/Range types for line/column source locations
//! - Centralized limits and thresholds

// Span - Source location tracking (byte offsets)
pub mod span;
pub use span::Span;

// Centralized limits and thresholds
pub mod limits;

// Position/Range types for line/column source locations
pub mod position;
pub use position::{LineMap, Position};
