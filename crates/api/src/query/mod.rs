//! Query-string to SQL translation.
//!
//! - [`filter`] - dynamic WHERE-clause construction with bound parameters
//! - [`page`] - page/limit parsing and clamping

pub mod filter;
pub mod page;

pub use filter::{NullMatch, WhereBuilder};
pub use page::{DEFAULT_LIMIT, DEFAULT_LIST_LIMIT, Pagination};
