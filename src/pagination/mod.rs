//! Pagination module
//!
//! Materializes a full collection from a cursor-paginated listing endpoint.
//!
//! # Overview
//!
//! Each listing page carries relational links; the `next` relation points at
//! the following page with its page number and size embedded in the URL.
//! [`parse_cursor`] is the only place that reads those URLs. The
//! [`CollectionWalker`] follows the cursors until the collection is exhausted
//! and never fails once the first page is in hand: a failed page fetch or a
//! malformed cursor just ends the walk with what has been collected so far.

mod cursor;
mod types;
mod walker;

pub use cursor::{parse_cursor, parse_link_header};
pub use types::{Cursor, Page, PageLink, PageQuery, StopReason, Walk, WalkConfig};
pub use walker::CollectionWalker;
