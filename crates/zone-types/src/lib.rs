//! Wire-level vocabulary shared by every zonefeed crate.
//!
//! This crate is deliberately free of I/O and scanning concerns: it holds
//! the types a decoded resource record is made of (names, RDATA blocks,
//! type/class codes, TTLs) plus the single error taxonomy the rest of the
//! workspace propagates. Everything here is owned data with fixed caps so
//! the parser upstream can recycle blocks without allocating per record.

pub mod error;
pub mod name;
pub mod rdata;
pub mod rr;
pub mod ttl;

pub use error::{SourcePos, ZoneError, ZoneResult};
pub use name::{MAX_LABEL, MAX_NAME, Name, NameError};
pub use rdata::{MAX_RDATA, Rdata, RdataOverflow};
pub use rr::{ClassCode, TypeCode};
pub use ttl::{MAX_TTL, parse_ttl, parse_u32_field};
