//! The option block, validated before any I/O.

use zone_types::{ClassCode, Name, ZoneError, ZoneResult, ttl::MAX_TTL};

bitflags::bitflags! {
    /// Diagnostic categories routed to the log sink.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct LogCategories: u32 {
        const INFO    = 1 << 0;
        const WARNING = 1 << 1;
        const ERROR   = 1 << 2;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogCategory {
    Info,
    Warning,
    Error,
}

impl LogCategory {
    pub fn mask(self) -> LogCategories {
        match self {
            LogCategory::Info => LogCategories::INFO,
            LogCategory::Warning => LogCategories::WARNING,
            LogCategory::Error => LogCategories::ERROR,
        }
    }
}

/// Diagnostic routing. Without a `write` callback, messages go to
/// `tracing` under the `zone::parse` target. When neither field is set,
/// every category is enabled.
pub struct LogOptions {
    pub write: Option<Box<dyn FnMut(LogCategory, &str)>>,
    pub categories: LogCategories,
}

impl Default for LogOptions {
    fn default() -> Self {
        LogOptions {
            write: None,
            categories: LogCategories::empty(),
        }
    }
}

impl std::fmt::Debug for LogOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogOptions")
            .field("write", &self.write.as_ref().map(|_| "<callback>"))
            .field("categories", &self.categories)
            .finish()
    }
}

/// Parse configuration. The accept callback the original option block
/// requires is the `Sink` argument of the parse entries here, so its
/// presence is enforced by the type system rather than a check.
#[derive(Debug)]
pub struct Options {
    /// Initial origin, presentation form, must be absolute.
    pub origin: String,
    /// Applied when a record omits its TTL; 1..=2^31-1.
    pub default_ttl: u32,
    /// Applied when a record omits its class.
    pub default_class: ClassCode,
    pub log: LogOptions,
}

impl Options {
    pub fn new(origin: impl Into<String>, default_ttl: u32, default_class: ClassCode) -> Self {
        Options {
            origin: origin.into(),
            default_ttl,
            default_class,
            log: LogOptions::default(),
        }
    }

    /// Check every field and compile the origin. Runs before any I/O;
    /// failures are parameter errors.
    pub(crate) fn validate(&mut self) -> ZoneResult<Name> {
        let origin = Name::from_text(self.origin.as_bytes(), None)
            .map_err(|err| ZoneError::BadParameter(format!("origin: {err}")))?;
        if self.default_ttl == 0 || self.default_ttl > MAX_TTL {
            return Err(ZoneError::BadParameter(format!(
                "default TTL {} out of range 1..={MAX_TTL}",
                self.default_ttl
            )));
        }
        if !self.default_class.is_recognized() {
            return Err(ZoneError::BadParameter(format!(
                "default class {} is not IN, CS, CH or HS",
                self.default_class.0
            )));
        }
        if self.log.write.is_none() && self.log.categories.is_empty() {
            self.log.categories = LogCategories::all();
        }
        Ok(origin)
    }
}
