//! One open input source plus its inheritance state.
//!
//! Files stack through `$INCLUDE`: the top of the parser's stack is the
//! innermost include. Origin, owner and the last-seen TTL/class/type
//! are per-file; popping an include therefore restores the outer file's
//! origin unchanged, whatever the nested file did. Buffers and the
//! underlying handle are released by drop on every exit path.

use std::path::{Path, PathBuf};

use zone_scan::{Driver, Lexer};
use zone_types::{ClassCode, Name, TypeCode, ZoneResult};

pub(crate) struct File<'s> {
    /// Canonical path; `None` for string sources.
    pub path: Option<PathBuf>,
    pub lexer: Lexer<'s, std::fs::File>,
    pub origin: Name,
    pub owner: Name,
    pub last_ttl: u32,
    pub last_class: ClassCode,
    pub last_type: Option<TypeCode>,
}

impl File<'static> {
    /// Open a file source: canonicalize (for include-cycle detection),
    /// open the handle, set fresh inheritance state.
    pub fn open(
        path: &Path,
        driver: Driver,
        origin: Name,
        default_ttl: u32,
        default_class: ClassCode,
    ) -> ZoneResult<Self> {
        let canonical = std::fs::canonicalize(path)?;
        let handle = std::fs::File::open(&canonical)?;
        let lexer = Lexer::from_reader(path.display().to_string(), handle, driver);
        Ok(File {
            path: Some(canonical),
            lexer,
            owner: origin.clone(),
            origin,
            last_ttl: default_ttl,
            last_class: default_class,
            last_type: None,
        })
    }
}

impl<'s> File<'s> {
    pub fn from_text(
        text: &'s [u8],
        driver: Driver,
        origin: Name,
        default_ttl: u32,
        default_class: ClassCode,
    ) -> Self {
        File {
            path: None,
            lexer: Lexer::from_text("<string>", text, driver),
            owner: origin.clone(),
            origin,
            last_ttl: default_ttl,
            last_class: default_class,
            last_type: None,
        }
    }

    /// Directory `$INCLUDE` paths resolve against.
    pub fn directory(&self) -> Option<&Path> {
        self.path.as_ref().and_then(|p| p.parent())
    }
}
