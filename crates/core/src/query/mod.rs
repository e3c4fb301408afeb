//! Filters, cursors, and page arithmetic used by `List`.

mod cursor;
mod filter;
mod matching;
mod pager;

pub use cursor::{decode_cursor, encode_cursor, CursorError};
pub use filter::{compose_filter, live_record_filter, Condition, Filter, Predicate};
pub use matching::lookup;
pub use pager::{compute_window, Page, PageBounds, PageRequest, PageWindow};
