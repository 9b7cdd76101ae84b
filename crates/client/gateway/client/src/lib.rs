//! Client to another Lumen node's gateway interface.
//!
//! Used for leader delegation (forwarding leader-only calls such as block
//! signing) and for block/snapshot synchronization between cooperating
//! nodes. Binary payloads travel gzip-compressed; per-call credentials are
//! carried as a `username:password` access token in the authorization
//! header. Errors returned by the remote node arrive as its structured
//! error payload and are surfaced verbatim.

mod builder;
mod error;
mod methods;
mod request_builder;

pub use builder::NodeProvider;
pub use error::NodeClientError;
