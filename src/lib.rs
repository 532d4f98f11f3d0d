//! Inverted bitmap index.
//!
//! Keys are associated with sets of members; each key stores its members as
//! a sparse bit vector over the domain of all members seen so far. Queries
//! combine `any`, `all`, `not any` and `not all` operators over the keys, and
//! the whole index can be dumped to (and loaded from) a compressed blob.
//!
//! The index is built by a single writer and then queried; it carries no
//! synchronization of its own.

pub mod base;
pub mod bitvector;
pub mod codec;
pub mod domain;
pub mod error;
pub mod index;
pub mod indexer;
pub mod result;
pub mod table;
pub mod utils {
    pub mod buffer;
    pub mod input;
}

mod tests;

pub use base::{Bit, Key, Len, Member};
pub use bitvector::BitVector;
pub use codec::{dump_index, load_domain, load_index, CodecOptions, FieldEncoding};
pub use domain::Domain;
pub use error::{Error, Result};
pub use index::{Index, IndexStatistics, Operator, Query};
pub use indexer::{CsvIndexer, CsvOptions, Indexer};
pub use result::QueryResult;
pub use table::Table;
