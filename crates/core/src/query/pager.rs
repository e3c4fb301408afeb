//! Cursor pagination: request validation, window arithmetic, and pages.

use serde::{Deserialize, Serialize};

use super::cursor::{decode_cursor, encode_cursor};
use crate::error::{RepositoryError, Result};
use crate::record::{Record, RecordId};

/// Paging arguments as supplied by a caller.
///
/// `after` and `before` are opaque cursors and act as exclusive bounds on the
/// record id. `first` and `last` cap the window from the front and the back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    pub after: Option<String>,
    pub before: Option<String>,
    pub first: Option<i64>,
    pub last: Option<i64>,
}

impl PageRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn first(mut self, n: i64) -> Self {
        self.first = Some(n);
        self
    }

    pub fn last(mut self, n: i64) -> Self {
        self.last = Some(n);
        self
    }

    pub fn after(mut self, cursor: impl Into<String>) -> Self {
        self.after = Some(cursor.into());
        self
    }

    pub fn before(mut self, cursor: impl Into<String>) -> Self {
        self.before = Some(cursor.into());
        self
    }

    /// Checks the caps and decodes the cursors.
    pub fn validate(&self) -> Result<PageBounds> {
        let first = non_negative("first", self.first)?;
        let last = non_negative("last", self.last)?;
        let after = self.after.as_deref().map(decode_cursor).transpose()?;
        let before = self.before.as_deref().map(decode_cursor).transpose()?;
        Ok(PageBounds {
            after,
            before,
            first,
            last,
        })
    }
}

fn non_negative(name: &str, value: Option<i64>) -> Result<Option<u64>> {
    value
        .map(|n| {
            u64::try_from(n).map_err(|_| {
                RepositoryError::InvalidArgument(format!("{name} must be non-negative, got {n}"))
            })
        })
        .transpose()
}

/// A validated [`PageRequest`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageBounds {
    pub after: Option<RecordId>,
    pub before: Option<RecordId>,
    pub first: Option<u64>,
    pub last: Option<u64>,
}

impl PageBounds {
    pub fn has_cursor(&self) -> bool {
        self.after.is_some() || self.before.is_some()
    }

    /// True when both cursors are present and no id can lie strictly between
    /// them.
    pub fn is_crossed(&self) -> bool {
        matches!((self.after, self.before), (Some(a), Some(b)) if a >= b)
    }
}

/// Skip/limit and page flags for one page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageWindow {
    pub skip: u64,
    /// `None` means no limit.
    pub limit: Option<u64>,
    pub has_previous_page: bool,
    pub has_next_page: bool,
}

impl PageWindow {
    /// True when the window cannot contain any record.
    pub fn is_empty(&self) -> bool {
        self.limit == Some(0)
    }
}

/// Computes the page window from the caps and the number of matching records.
///
/// `first` is applied before `last`; when both are set, `last` trims the tail
/// of the window selected by `first`. The flags depend only on the inputs and
/// `count`.
pub fn compute_window(first: Option<u64>, last: Option<u64>, count: u64) -> PageWindow {
    let mut window = PageWindow::default();

    if let Some(first) = first {
        if count > first {
            window.limit = Some(first);
            window.has_next_page = true;
        }
    }

    if let Some(last) = last {
        match window.limit {
            Some(limit) if limit > last => {
                window.skip = limit - last;
                window.limit = Some(last);
            }
            Some(_) => {}
            None if count > last => window.skip = count - last,
            None => {}
        }
        window.has_previous_page = count > last;
    }

    window
}

/// One page of records plus the connection metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<Record<T>>,
    /// Non-deleted records matching the caller filter, independent of cursors.
    pub total_count: u64,
    pub has_previous_page: bool,
    pub has_next_page: bool,
    pub start_cursor: Option<String>,
    pub end_cursor: Option<String>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<Record<T>>, total_count: u64, window: &PageWindow) -> Self {
        let start_cursor = items.first().map(|r| encode_cursor(&r.id));
        let end_cursor = items.last().map(|r| encode_cursor(&r.id));
        Self {
            items,
            total_count,
            has_previous_page: window.has_previous_page,
            has_next_page: window.has_next_page,
            start_cursor,
            end_cursor,
        }
    }

    /// Maps every record's entity fields, keeping the page metadata.
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(|r| r.map(&mut f)).collect(),
            total_count: self.total_count,
            has_previous_page: self.has_previous_page,
            has_next_page: self.has_next_page,
            start_cursor: self.start_cursor,
            end_cursor: self.end_cursor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_no_caps_returns_everything() {
        let window = compute_window(None, None, 7);
        assert_eq!(window, PageWindow::default());
    }

    #[test]
    fn test_first_smaller_than_count() {
        let window = compute_window(Some(2), None, 3);
        assert_eq!(
            window,
            PageWindow {
                skip: 0,
                limit: Some(2),
                has_previous_page: false,
                has_next_page: true,
            }
        );
    }

    #[test]
    fn test_first_covers_count() {
        let window = compute_window(Some(5), None, 3);
        assert_eq!(window.limit, None);
        assert!(!window.has_next_page);
    }

    #[test]
    fn test_last_only() {
        let window = compute_window(None, Some(2), 5);
        assert_eq!(
            window,
            PageWindow {
                skip: 3,
                limit: None,
                has_previous_page: true,
                has_next_page: false,
            }
        );
    }

    #[test]
    fn test_last_covers_count() {
        let window = compute_window(None, Some(10), 5);
        assert_eq!(window, PageWindow::default());
    }

    #[test]
    fn test_first_then_last_trims_tail() {
        let window = compute_window(Some(5), Some(2), 10);
        assert_eq!(
            window,
            PageWindow {
                skip: 3,
                limit: Some(2),
                has_previous_page: true,
                has_next_page: true,
            }
        );
    }

    #[test]
    fn test_first_then_larger_last_keeps_first_window() {
        let window = compute_window(Some(3), Some(5), 10);
        assert_eq!(window.skip, 0);
        assert_eq!(window.limit, Some(3));
        assert!(window.has_previous_page);
        assert!(window.has_next_page);
    }

    #[test]
    fn test_first_zero_is_empty_window() {
        let window = compute_window(Some(0), None, 4);
        assert!(window.is_empty());
        assert!(window.has_next_page);
    }

    #[test]
    fn test_zero_count() {
        assert_eq!(compute_window(Some(2), Some(2), 0), PageWindow::default());
    }

    #[test]
    fn test_validate_rejects_negative_caps() {
        let err = PageRequest::new().first(-1).validate().unwrap_err();
        assert_eq!(
            err,
            RepositoryError::InvalidArgument("first must be non-negative, got -1".into())
        );
        let err = PageRequest::new().last(-3).validate().unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_validate_rejects_bad_cursor() {
        let err = PageRequest::new().after("%%%").validate().unwrap_err();
        assert!(matches!(err, RepositoryError::InvalidCursor(_)));
    }

    #[test]
    fn test_validate_decodes_cursors() {
        let a = RecordId::new();
        let b = RecordId::new();
        let bounds = PageRequest::new()
            .after(encode_cursor(&a))
            .before(encode_cursor(&b))
            .first(3)
            .validate()
            .unwrap();

        assert_eq!(bounds.after, Some(a));
        assert_eq!(bounds.before, Some(b));
        assert_eq!(bounds.first, Some(3));
        assert!(bounds.has_cursor());
        assert!(!bounds.is_crossed());
    }

    #[test]
    fn test_crossed_cursors() {
        let a = RecordId::new();
        let bounds = PageBounds {
            after: Some(a),
            before: Some(a),
            ..Default::default()
        };
        assert!(bounds.is_crossed());
    }

    #[test]
    fn test_page_cursors_follow_items() {
        let now = Utc::now();
        let first = Record::new(RecordId::new(), now, 1_u8);
        let second = Record::new(RecordId::new(), now, 2_u8);
        let expected_start = encode_cursor(&first.id);
        let expected_end = encode_cursor(&second.id);

        let page = Page::new(vec![first, second], 2, &PageWindow::default());
        assert_eq!(page.start_cursor, Some(expected_start));
        assert_eq!(page.end_cursor, Some(expected_end));

        let empty: Page<u8> = Page::new(Vec::new(), 0, &PageWindow::default());
        assert!(empty.start_cursor.is_none());
        assert!(empty.end_cursor.is_none());
    }
}
