//! Journal windowing.
//!
//! Issues can carry an unbounded history. Callers receive one window of
//! journals at a time together with a [`JournalPagination`] descriptor that
//! reports the full journal count, so they can ask for the next window.

use crate::domain::{Issue, Journal};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Journals returned when the caller does not ask for a window size.
pub const DEFAULT_JOURNAL_LIMIT: usize = 5;

/// Requested window into an issue's journals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JournalWindow {
    limit: usize,
    offset: usize,
}

impl JournalWindow {
    /// Build a window from optional caller input, defaulting to
    /// `limit = 5, offset = 0`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if `limit` is zero.
    pub fn new(limit: Option<usize>, offset: Option<usize>) -> Result<Self> {
        let limit = limit.unwrap_or(DEFAULT_JOURNAL_LIMIT);
        if limit == 0 {
            return Err(Error::InvalidInput {
                field: "journalLimit",
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(Self {
            limit,
            offset: offset.unwrap_or(0),
        })
    }

    /// Maximum number of journals in the window.
    #[must_use]
    pub fn limit(self) -> usize {
        self.limit
    }

    /// Index of the first journal in the window.
    #[must_use]
    pub fn offset(self) -> usize {
        self.offset
    }
}

impl Default for JournalWindow {
    fn default() -> Self {
        Self {
            limit: DEFAULT_JOURNAL_LIMIT,
            offset: 0,
        }
    }
}

/// Position of a journal window within the full history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalPagination {
    /// Number of journals on the issue, not in the window.
    pub total_count: usize,
    /// Offset that was applied.
    pub offset: usize,
    /// Limit that was applied.
    pub limit: usize,
}

/// Take `items[offset..offset + limit]`, clamped to the slice bounds.
///
/// The source is left untouched and order is preserved.
pub fn paginate<T: Clone>(items: &[T], window: JournalWindow) -> (Vec<T>, JournalPagination) {
    let total_count = items.len();
    let start = window.offset.min(total_count);
    let end = start.saturating_add(window.limit).min(total_count);

    let pagination = JournalPagination {
        total_count,
        offset: window.offset,
        limit: window.limit,
    };
    (items[start..end].to_vec(), pagination)
}

/// An issue whose journals have been cut down to one window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginatedIssue {
    /// The issue, carrying only the windowed journals.
    pub issue: Issue,

    /// Where the window sits in the full history.
    #[serde(rename = "journalPagination")]
    pub journal_pagination: JournalPagination,
}

impl PaginatedIssue {
    /// Apply `window` to the issue's journals.
    ///
    /// An issue without a journal list is treated as having none.
    #[must_use]
    pub fn new(mut issue: Issue, window: JournalWindow) -> Self {
        let journals: Vec<Journal> = issue.journals.take().unwrap_or_default();
        let (page, journal_pagination) = paginate(&journals, window);
        issue.journals = Some(page);
        Self {
            issue,
            journal_pagination,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[test]
    fn test_default_window() {
        let window = JournalWindow::new(None, None).unwrap();
        assert_eq!(window, JournalWindow::default());
        assert_eq!(window.limit(), 5);
        assert_eq!(window.offset(), 0);
    }

    #[test]
    fn test_zero_limit_rejected() {
        match JournalWindow::new(Some(0), None) {
            Err(Error::InvalidInput { field, .. }) => assert_eq!(field, "journalLimit"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[rstest]
    #[case::first_page(50, 5, 0, 0..5)]
    #[case::middle(50, 10, 5, 5..15)]
    #[case::tail_short(12, 10, 5, 5..12)]
    #[case::offset_at_end(12, 10, 12, 0..0)]
    #[case::offset_past_end(3, 5, 40, 0..0)]
    #[case::empty(0, 5, 0, 0..0)]
    fn test_paginate_cases(
        #[case] total: usize,
        #[case] limit: usize,
        #[case] offset: usize,
        #[case] expected: std::ops::Range<usize>,
    ) {
        let items: Vec<usize> = (0..total).collect();
        let window = JournalWindow::new(Some(limit), Some(offset)).unwrap();

        let (page, pagination) = paginate(&items, window);

        assert_eq!(page, expected.collect::<Vec<_>>());
        assert_eq!(
            pagination,
            JournalPagination {
                total_count: total,
                offset,
                limit
            }
        );
        assert_eq!(items.len(), total);
    }

    proptest! {
        #[test]
        fn prop_window_matches_slice(
            total in 0usize..200,
            limit in 1usize..64,
            offset in 0usize..256,
        ) {
            let items: Vec<usize> = (0..total).collect();
            let window = JournalWindow::new(Some(limit), Some(offset)).unwrap();

            let (page, pagination) = paginate(&items, window);

            let expected_len = limit.min(total.saturating_sub(offset));
            prop_assert_eq!(page.len(), expected_len);
            prop_assert_eq!(pagination.total_count, total);
            prop_assert_eq!(pagination.offset, offset);
            prop_assert_eq!(pagination.limit, limit);
            for (i, value) in page.iter().enumerate() {
                prop_assert_eq!(*value, offset + i);
            }
        }
    }
}
