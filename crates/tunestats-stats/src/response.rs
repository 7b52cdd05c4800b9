//! Versioned response envelopes wrapping report payloads.

use serde::{Deserialize, Serialize};

/// Version stamped on every envelope.
pub const RESPONSE_VERSION: u32 = 1;

/// A single payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectResponse<T> {
    pub content: T,
    pub version: u32,
}

impl<T> ObjectResponse<T> {
    pub fn new(content: T) -> Self {
        Self {
            content,
            version: RESPONSE_VERSION,
        }
    }
}

/// A list payload with its length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrayResponse<T> {
    pub items: Vec<T>,
    pub count: usize,
    pub version: u32,
}

impl<T> ArrayResponse<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            count: items.len(),
            items,
            version: RESPONSE_VERSION,
        }
    }
}

impl<T> FromIterator<T> for ArrayResponse<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
