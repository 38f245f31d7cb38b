//! Listing queries: status filter, page number and page math.
//!
//! Query parameters arrive as loose strings and are never rejected:
//!
//! - an empty or unknown `status` means "all statuses"
//! - a missing, non-numeric or non-positive `page` means page 1
//!
//! Pages past the end simply come back empty.

use serde::{Deserialize, Serialize};

use crate::request::RequestStatus;
use crate::validation::is_valid_status;

/// Records returned per page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: u32 = 6;

/// Optional constraint on the listed statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    /// No constraint.
    #[default]
    All,
    /// Only records with this status.
    Only(RequestStatus),
}

impl StatusFilter {
    /// Interpret a raw `status` query parameter.
    ///
    /// Anything that is not exactly a known status is treated as no filter.
    #[must_use]
    pub fn from_query(raw: Option<&str>) -> Self {
        match raw {
            None | Some("") => Self::All,
            Some(value) if !is_valid_status(value) => {
                tracing::debug!(status = value, "Ignoring unknown status filter");
                Self::All
            }
            Some(value) => RequestStatus::parse(value).map_or(Self::All, Self::Only),
        }
    }

    /// The status to filter on, if any.
    #[must_use]
    pub const fn status(&self) -> Option<RequestStatus> {
        match self {
            Self::All => None,
            Self::Only(status) => Some(*status),
        }
    }
}

/// A 1-based page number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PageNumber(u32);

impl PageNumber {
    /// The first page.
    pub const FIRST: Self = Self(1);

    /// Clamp an arbitrary integer into a page number.
    ///
    /// Values below 1 become 1; values above `u32::MAX` saturate.
    #[must_use]
    pub fn new(page: i64) -> Self {
        Self(u32::try_from(page.max(1)).unwrap_or(u32::MAX))
    }

    /// Interpret a raw `page` query parameter.
    #[must_use]
    pub fn from_query(raw: Option<&str>) -> Self {
        raw.and_then(|value| value.trim().parse::<i64>().ok())
            .map_or(Self::FIRST, Self::new)
    }

    /// The page number as an integer.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Skip/limit window for this page at the given page size.
    #[must_use]
    pub fn window(&self, page_size: u32) -> PageWindow {
        PageWindow {
            skip: u64::from(self.0 - 1) * u64::from(page_size),
            limit: u64::from(page_size),
        }
    }
}

impl Default for PageNumber {
    fn default() -> Self {
        Self::FIRST
    }
}

/// Offset and length of a page within the ordered result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// Records to skip
    pub skip: u64,
    /// Maximum records to return
    pub limit: u64,
}

/// A parsed list query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListQuery {
    /// Status filter
    pub filter: StatusFilter,
    /// Requested page
    pub page: PageNumber,
}

impl ListQuery {
    /// Build a query from raw `status` and `page` parameters.
    #[must_use]
    pub fn from_params(status: Option<&str>, page: Option<&str>) -> Self {
        Self {
            filter: StatusFilter::from_query(status),
            page: PageNumber::from_query(page),
        }
    }
}

/// One page of results plus the size of the whole filtered set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Records on this page, newest first
    pub data: Vec<T>,
    /// Records matching the filter across all pages
    pub total_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_and_unknown_filters_mean_all() {
        assert_eq!(StatusFilter::from_query(None), StatusFilter::All);
        assert_eq!(StatusFilter::from_query(Some("")), StatusFilter::All);
        assert_eq!(StatusFilter::from_query(Some("bogus")), StatusFilter::All);
        assert_eq!(
            StatusFilter::from_query(Some("approved")),
            StatusFilter::Only(RequestStatus::Approved)
        );
    }

    #[test]
    fn filter_accepts_exactly_the_valid_statuses() {
        for raw in ["pending", "approved", "completed", "rejected", "Pending", " approved", "x"] {
            let filter = StatusFilter::from_query(Some(raw));
            assert_eq!(filter != StatusFilter::All, is_valid_status(raw), "status: {raw:?}");
        }
    }

    #[test]
    fn page_falls_back_to_first() {
        assert_eq!(PageNumber::from_query(None), PageNumber::FIRST);
        assert_eq!(PageNumber::from_query(Some("abc")), PageNumber::FIRST);
        assert_eq!(PageNumber::from_query(Some("0")), PageNumber::FIRST);
        assert_eq!(PageNumber::from_query(Some("-4")), PageNumber::FIRST);
        assert_eq!(PageNumber::from_query(Some(" 3 ")).get(), 3);
        assert_eq!(PageNumber::from_query(Some("99999999999")).get(), u32::MAX);
    }

    #[test]
    fn window_math() {
        assert_eq!(PageNumber::FIRST.window(6), PageWindow { skip: 0, limit: 6 });
        assert_eq!(PageNumber::new(3).window(6), PageWindow { skip: 12, limit: 6 });
    }

    #[test]
    fn page_serializes_total_count_in_camel_case() {
        let page = Page { data: vec![1, 2], total_count: 7 };
        let json = serde_json::to_value(&page).unwrap_or_default();
        assert_eq!(json["totalCount"], 7);
        assert_eq!(json["data"][1], 2);
    }

    proptest! {
        #[test]
        fn window_never_underflows(page in any::<i64>(), size in 1u32..1000) {
            let window = PageNumber::new(page).window(size);
            prop_assert_eq!(window.limit, u64::from(size));
            prop_assert_eq!(window.skip % u64::from(size), 0);
        }
    }
}
