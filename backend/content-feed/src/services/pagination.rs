//! Wrap-around pagination over the chronologically ordered post collection.
//!
//! The offset of page `n` is `((n - 1) * page_size) mod total_count`. Page
//! numbers past the natural last page therefore cycle back toward the start
//! instead of returning an empty page, which keeps an infinite-scroll client
//! populated. When a slice runs past the end of the collection the caller
//! appends the `page_size` most recent posts (newest first) to the ascending
//! slice. Duplicates across the two fetches are expected.

use tracing::debug;

/// Fixed number of posts per feed page.
pub const FEED_PAGE_SIZE: u64 = 9;

/// Offsets for one feed page computed against a freshly read total count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlicePlan {
    pub page: u64,
    pub page_size: u64,
    pub total_count: u64,
    /// Offset of the ascending fetch. Always `< total_count` for non-empty plans.
    pub start: u64,
    /// `(start + page_size) mod total_count`
    pub end: u64,
    pub total_pages: u64,
}

impl SlicePlan {
    /// No posts exist; nothing should be fetched.
    pub fn is_empty(&self) -> bool {
        self.total_count == 0
    }

    /// The slice runs past the end of the collection and needs the
    /// most-recent fetch appended.
    pub fn wraps(&self) -> bool {
        !self.is_empty() && self.end < self.start
    }

    /// Rows the ascending fetch returns against an unchanged store.
    pub fn ascending_len(&self) -> u64 {
        if self.is_empty() {
            return 0;
        }
        self.page_size.min(self.total_count - self.start)
    }
}

/// Compute the slice for `page` (1-based).
///
/// `page` and `page_size` below 1 are clamped to 1. Offsets are reduced in
/// 128-bit space so arbitrarily large page numbers never overflow.
pub fn compute_slice(page: u64, page_size: u64, total_count: u64) -> SlicePlan {
    let page = page.max(1);
    let page_size = page_size.max(1);

    if total_count == 0 {
        return SlicePlan {
            page,
            page_size,
            total_count,
            start: 0,
            end: 0,
            total_pages: 0,
        };
    }

    let n = total_count as u128;
    let start = (((page - 1) as u128 % n) * (page_size as u128 % n)) % n;
    let end = (start + page_size as u128) % n;

    SlicePlan {
        page,
        page_size,
        total_count,
        start: start as u64,
        end: end as u64,
        total_pages: total_count.div_ceil(page_size),
    }
}

/// Coerce the raw `page` query value to a page number.
///
/// The leading integer is used, so `"2.5"` is page 2 and `"3abc"` is page 3.
/// Missing, non-numeric, zero and negative values all become page 1.
pub fn parse_page(raw: Option<&str>) -> u64 {
    let Some(raw) = raw else {
        return 1;
    };

    match leading_integer(raw) {
        Some(n) if n >= 1 => n,
        _ => {
            debug!(raw_page = %raw, "coercing invalid page parameter to 1");
            1
        }
    }
}

/// Non-negative integer prefix of `raw` after leading whitespace and an
/// optional `+`. Saturates at `u64::MAX`.
fn leading_integer(raw: &str) -> Option<u64> {
    let trimmed = raw.trim_start();
    if trimmed.starts_with('-') {
        return None;
    }
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let digits = unsigned.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    Some(unsigned[..digits].parse().unwrap_or(u64::MAX))
}
