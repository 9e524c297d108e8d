//! Font metadata types.

use serde::{Deserialize, Serialize};

/// A (font name, font size) pair characterizing a span of text.
///
/// The name is already alias-normalized and the size already rounded to two
/// decimal places, so structural equality is the dedup criterion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontDetail {
    /// Normalized font name
    pub name: String,
    /// Font size in points, rounded to 2 decimal places
    pub size: f64,
}

impl FontDetail {
    /// Create a new font detail, rounding the size to 2 decimal places.
    pub fn new(name: impl Into<String>, size: f64) -> Self {
        Self {
            name: name.into(),
            size: round_size(size),
        }
    }
}

/// Round a font size to 2 decimal places.
pub fn round_size(size: f64) -> f64 {
    (size * 100.0).round() / 100.0
}
