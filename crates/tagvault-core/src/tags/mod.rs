//! Plain tags and the client-side index that maps them to random tokens.
//!
//! The server only ever sees tokens. A client holding [`TagPairs`] can turn
//! a row's token set back into the plain tags it was created with.

pub mod index;
pub mod pairs;
pub mod tag;

pub use index::TagIndex;
pub use pairs::{TagPair, TagPairs};
pub use tag::{Tag, ALL_TAG, CREATED_FORMAT, CREATED_PREFIX, ID_PREFIX};
