//! Pagination utilities for service layer
//!
//! Provides a simple `Pagination` struct and helpers to turn raw
//! `page`/`limit` query values into a page window.

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PER_PAGE: u32 = 10;
pub const MAX_PER_PAGE: u32 = 100;

/// Pagination parameters
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based page index
    pub page: u32,
    /// items per page
    pub per_page: u32,
}

impl Pagination {
    /// Clamp to sane defaults and convert to `u64` (zero-based page index, page size)
    pub fn normalize(self) -> (u64, u64) {
        let page = if self.page == 0 { 1 } else { self.page };
        let per_page = self.per_page.clamp(1, MAX_PER_PAGE);
        ((page - 1) as u64, per_page as u64)
    }

    /// Rows to skip before this page.
    pub fn offset(self) -> u64 {
        let (idx, per) = self.normalize();
        idx * per
    }

    pub fn limit(self) -> u64 {
        self.normalize().1
    }

    /// Lenient parse used by name search: absent, non-numeric or zero
    /// values fall back to page 1 of 10.
    pub fn from_params(page: Option<&str>, per_page: Option<&str>) -> Self {
        Self {
            page: parse_positive(page).unwrap_or(DEFAULT_PAGE),
            per_page: parse_positive(per_page).unwrap_or(DEFAULT_PER_PAGE).min(MAX_PER_PAGE),
        }
    }

    /// Strict parse used by category search: a window only when both values
    /// are valid positive integers, otherwise no pagination at all.
    pub fn strict(page: Option<&str>, per_page: Option<&str>) -> Option<Self> {
        let page = parse_positive(page)?;
        let per_page = parse_positive(per_page)?.min(MAX_PER_PAGE);
        Some(Self { page, per_page })
    }
}

impl Default for Pagination {
    fn default() -> Self { Self { page: DEFAULT_PAGE, per_page: DEFAULT_PER_PAGE } }
}

fn parse_positive(raw: Option<&str>) -> Option<u32> {
    raw.and_then(|s| s.trim().parse::<u32>().ok()).filter(|n| *n >= 1)
}
