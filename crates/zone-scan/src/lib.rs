//! Two-stage scanning for zone file ingestion.
//!
//! Stage one is the indexer: a vectorized pass over a sliding input
//! window that records every structural position (field boundaries,
//! quotes, parentheses, comments, newlines) on a tape. Stage two is the
//! lexer, which walks the tape and hands out one logical token at a
//! time, refilling the window between constructs.
//!
//! Three indexer variants (AVX2, SSE4.2, scalar) share a single
//! classification seam and produce identical tapes; [`Driver::select`]
//! probes the CPU once per parse, honoring the `ZONE_TARGET` override.

pub mod classify;
pub mod lexer;
pub mod scanner;
pub mod tape;
pub mod target;
pub mod window;

pub use lexer::{EofState, Lexer, Token, TokenKind};
pub use tape::{EntryKind, Tape, TapeEntry};
pub use target::{Driver, TARGET_ENV};
pub use window::{WINDOW_SIZE, Window};
