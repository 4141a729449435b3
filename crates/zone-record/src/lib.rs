//! Zone file parsing: options, record assembly, control directives and
//! the sink handoff.
//!
//! The two entry points, [`parse_file`] and [`parse_string`], run the
//! whole pipeline synchronously on the caller's thread: window refills
//! feed the vectorized indexer, the lexer yields tokens, the assembler
//! applies the master-file grammar and inheritance rules, the per-type
//! decoders build wire RDATA in caller-owned cache blocks, and the sink
//! is invoked once per completed record. Ingestion is all-or-nothing:
//! the first syntax or semantic error aborts the parse.
//!
//! ```no_run
//! use zone_record::{Cache, Options, Record, parse_file};
//! use zone_types::ClassCode;
//!
//! let options = Options::new("example.com.", 3600, ClassCode::IN);
//! let mut cache = Cache::new(1);
//! let mut count = 0u64;
//! let mut sink = |_record: &Record<'_>| {
//!     count += 1;
//!     Ok(0)
//! };
//! parse_file("db.example.com", options, &mut cache, &mut sink)?;
//! # Ok::<(), zone_types::ZoneError>(())
//! ```

mod file;
pub mod options;
mod parser;
pub mod sink;

pub use options::{LogCategories, LogCategory, LogOptions, Options};
pub use parser::{parse_file, parse_string};
pub use sink::{Cache, Record, Sink};
