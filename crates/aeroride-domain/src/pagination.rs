//! Pagination parameters for list endpoints.

use serde::Deserialize;

pub const DEFAULT_PER_PAGE: u64 = 25;
pub const MAX_PER_PAGE: u64 = 100;

/// Largest offset handed to storage; fits a signed 64-bit column.
pub const MAX_OFFSET: u64 = i64::MAX as u64;

/// Page selection, 1-based.
///
/// - `per-page`: 1..=100, default 25
/// - `page`: >= 1, default 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PageRequest {
    #[serde(default = "default_per_page", rename = "per-page")]
    pub per_page: u64,
    #[serde(default = "default_page")]
    pub page: u64,
}

fn default_per_page() -> u64 {
    DEFAULT_PER_PAGE
}

fn default_page() -> u64 {
    1
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            per_page: DEFAULT_PER_PAGE,
            page: 1,
        }
    }
}

impl PageRequest {
    /// Clamp into the valid ranges. Call after deserializing query params.
    pub fn clamped(self) -> Self {
        Self {
            per_page: self.per_page.clamp(1, MAX_PER_PAGE),
            page: self.page.max(1),
        }
    }

    /// Row offset of the first item on this page.
    pub fn offset(self) -> u64 {
        let p = self.clamped();
        (p.page - 1).saturating_mul(p.per_page).min(MAX_OFFSET)
    }
}
