//! Wire types shared by the Lumen gateway server and its clients.
//!
//! Everything in this crate is part of the external API compatibility
//! contract: struct field declaration order is the serialized field order,
//! and it is fixed per entity type.

pub mod batch;
pub mod error;
pub mod filter;
pub mod node;
pub mod query;

pub use error::{ApiError, ApiErrorCode};
pub use filter::FilterParam;
pub use query::{Page, DEFAULT_PAGE_SIZE};
