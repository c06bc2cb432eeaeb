//! Page-window construction for the pagination strip.
//!
//! A page window is the short list of page buttons shown under the results:
//! the anchor pages at both ends, a run of pages around the current one, and
//! a gap marker wherever pages were elided.
//!
//! ```text
//! current=6 total=20 span=2  ->  1 2 … 4 5 [6] 7 8 … 19 20
//! ```

use std::collections::BTreeSet;
use std::fmt;

/// Pages shown on each side of the current page by default.
pub const DEFAULT_SPAN: u32 = 2;

/// Symbol used when a [`PageEntry::Gap`] is displayed.
pub const GAP_SYMBOL: &str = "…";

/// One slot in the pagination strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageEntry {
    /// A selectable 1-based page number
    Page(u32),
    /// An elided run of two or more pages
    Gap,
}

impl PageEntry {
    /// The page number, or `None` for a gap.
    pub const fn page(self) -> Option<u32> {
        match self {
            Self::Page(n) => Some(n),
            Self::Gap => None,
        }
    }

    pub const fn is_gap(self) -> bool {
        matches!(self, Self::Gap)
    }
}

impl fmt::Display for PageEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Page(n) => write!(f, "{n}"),
            Self::Gap => f.write_str(GAP_SYMBOL),
        }
    }
}

/// Build the page window for `current` out of `total` pages.
///
/// The result always starts with page 1 and ends with page `total`. Pages
/// 1, 2, `total - 1` and `total` are always present, as is every page within
/// `span` of `current`. A single [`PageEntry::Gap`] stands in for each run of
/// omitted pages; two pages that differ by exactly one are never separated.
///
/// When `total <= 1` the window is just `[Page(1)]`, even for `total == 0`.
///
/// Callers must pass `current >= 1`. Out-of-range values do not panic but
/// the window is only meaningful inside the contract.
pub fn build_window(current: u32, total: u32, span: u32) -> Vec<PageEntry> {
    if total <= 1 {
        return vec![PageEntry::Page(1)];
    }

    let mut pages = BTreeSet::new();
    for anchor in [1, 2, total - 1, total] {
        pages.insert(anchor.clamp(1, total));
    }
    let low = current.saturating_sub(span).max(1);
    let high = current.saturating_add(span).min(total);
    pages.extend(low..=high);

    let mut out = Vec::with_capacity(pages.len() + 2);
    let mut previous: Option<u32> = None;
    for page in pages {
        if previous.is_some_and(|prev| page - prev > 1) {
            out.push(PageEntry::Gap);
        }
        out.push(PageEntry::Page(page));
        previous = Some(page);
    }
    out
}
