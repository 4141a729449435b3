//! The record assembler and parse driver.
//!
//! Reads tokens off the current file's lexer, resolves the
//! `owner? ttl? class? type rdata...` grammar with master-file
//! field-omission inheritance, executes control directives, and hands
//! each completed record to the sink. Failures of any kind return
//! through `?` to the entry points, which report them once through the
//! log route; there is no recovery to a next record.

use std::path::{Path, PathBuf};

use zone_rdata::field::{compile_name, expect_eol, next_field};
use zone_scan::{Driver, Token, TokenKind};
use zone_types::{ClassCode, TypeCode, ZoneError, ZoneResult, parse_ttl};

use crate::file::File;
use crate::options::{LogCategory, Options};
use crate::sink::{Cache, Sink};

/// Parse a master file from disk.
pub fn parse_file<P: AsRef<Path>, S: Sink>(
    path: P,
    mut options: Options,
    cache: &mut Cache,
    sink: &mut S,
) -> ZoneResult<()> {
    let origin = options.validate()?;
    let driver = Driver::select();
    let file = File::open(
        path.as_ref(),
        driver,
        origin,
        options.default_ttl,
        options.default_class,
    )?;
    Parser::new(options, file, cache, sink, driver).parse()
}

/// Parse a master file held in caller-owned memory.
pub fn parse_string<S: Sink>(
    text: &[u8],
    mut options: Options,
    cache: &mut Cache,
    sink: &mut S,
) -> ZoneResult<()> {
    let origin = options.validate()?;
    let driver = Driver::select();
    let file = File::from_text(
        text,
        driver,
        origin,
        options.default_ttl,
        options.default_class,
    );
    Parser::new(options, file, cache, sink, driver).parse()
}

enum Directive {
    Origin,
    Ttl,
    Include,
}

struct Parser<'s, 'c, S: Sink> {
    options: Options,
    files: Vec<File<'s>>,
    cache: &'c mut Cache,
    sink: &'c mut S,
    slot: usize,
    records: u64,
    driver: Driver,
}

impl<'s, 'c, S: Sink> Parser<'s, 'c, S> {
    fn new(
        options: Options,
        root: File<'s>,
        cache: &'c mut Cache,
        sink: &'c mut S,
        driver: Driver,
    ) -> Self {
        Parser {
            options,
            files: vec![root],
            cache,
            sink,
            slot: 0,
            records: 0,
            driver,
        }
    }

    fn parse(mut self) -> ZoneResult<()> {
        let result = self.run();
        match &result {
            Ok(()) => {
                tracing::debug!(target: "zone::parse", records = self.records, "parse complete");
            }
            Err(err) => {
                let message = err.to_string();
                self.log(LogCategory::Error, &message);
            }
        }
        result
    }

    fn run(&mut self) -> ZoneResult<()> {
        loop {
            let token = self.file_mut().lexer.next_token()?;
            match token.kind {
                TokenKind::Eol => continue,
                TokenKind::Eof => {
                    if self.files.len() > 1 {
                        let done = self.files.pop();
                        if let Some(done) = done {
                            tracing::debug!(
                                target: "zone::include",
                                file = done.lexer.source_name(),
                                "leaving include"
                            );
                        }
                        // the outer file's origin and inheritance state
                        // were never touched; nothing to restore
                        continue;
                    }
                    return Ok(());
                }
                TokenKind::Contiguous
                    if token.line_begin && self.file().lexer.bytes(&token).starts_with(b"$") =>
                {
                    self.directive(token)?;
                }
                _ => self.assemble(token)?,
            }
        }
    }

    fn file(&self) -> &File<'s> {
        self.files.last().expect("file stack is never empty")
    }

    fn file_mut(&mut self) -> &mut File<'s> {
        self.files.last_mut().expect("file stack is never empty")
    }

    fn directive(&mut self, token: Token) -> ZoneResult<()> {
        let kind = {
            let bytes = self.file().lexer.bytes(&token);
            if bytes.eq_ignore_ascii_case(b"$ORIGIN") {
                Directive::Origin
            } else if bytes.eq_ignore_ascii_case(b"$TTL") {
                Directive::Ttl
            } else if bytes.eq_ignore_ascii_case(b"$INCLUDE") {
                Directive::Include
            } else {
                return Err(ZoneError::syntax(
                    self.file().lexer.pos(&token),
                    format!(
                        "unknown control directive {}",
                        String::from_utf8_lossy(bytes)
                    ),
                ));
            }
        };
        match kind {
            Directive::Origin => {
                let file = self.file_mut();
                let name_tok = next_field(&mut file.lexer, "$ORIGIN domain name")?;
                let origin = compile_name(&file.lexer, &name_tok, &file.origin)?;
                expect_eol(&mut file.lexer)?;
                file.origin = origin;
                Ok(())
            }
            Directive::Ttl => {
                let file = self.file_mut();
                let ttl_tok = next_field(&mut file.lexer, "$TTL value")?;
                file.lexer.materialize(&ttl_tok)?;
                let value = parse_ttl(file.lexer.token_text(&ttl_tok)).ok_or_else(|| {
                    ZoneError::semantic(file.lexer.pos(&ttl_tok), "invalid $TTL value")
                })?;
                expect_eol(&mut file.lexer)?;
                file.last_ttl = value;
                Ok(())
            }
            Directive::Include => self.include(),
        }
    }

    fn include(&mut self) -> ZoneResult<()> {
        let (relative, origin_override) = {
            let file = self.file_mut();
            let path_tok = next_field(&mut file.lexer, "$INCLUDE path")?;
            file.lexer.materialize(&path_tok)?;
            let relative = std::str::from_utf8(file.lexer.token_text(&path_tok))
                .map(PathBuf::from)
                .map_err(|_| {
                    ZoneError::semantic(file.lexer.pos(&path_tok), "include path is not UTF-8")
                })?;
            let next = file.lexer.next_token()?;
            let origin_override = if next.is_eol() {
                None
            } else {
                let origin = compile_name(&file.lexer, &next, &file.origin)?;
                expect_eol(&mut file.lexer)?;
                Some(origin)
            };
            (relative, origin_override)
        };

        let resolved = if relative.is_absolute() {
            relative
        } else {
            match self.file().directory() {
                Some(dir) => dir.join(&relative),
                None => relative,
            }
        };
        let child_origin = origin_override.unwrap_or_else(|| self.file().origin.clone());
        let child = File::open(
            &resolved,
            self.driver,
            child_origin,
            self.options.default_ttl,
            self.options.default_class,
        )?;
        if let Some(path) = &child.path {
            if self.files.iter().any(|f| f.path.as_deref() == Some(path.as_path())) {
                return Err(ZoneError::semantic(
                    self.file().lexer.here(),
                    format!("include cycle through {}", path.display()),
                ));
            }
        }
        tracing::debug!(
            target: "zone::include",
            file = child.lexer.source_name(),
            depth = self.files.len() + 1,
            "entering include"
        );
        self.files.push(child);
        Ok(())
    }

    fn assemble(&mut self, first: Token) -> ZoneResult<()> {
        let slot = self.slot;
        let file = self.files.last_mut().expect("file stack is never empty");
        let File {
            lexer,
            origin,
            owner,
            last_ttl,
            last_class,
            last_type,
            ..
        } = file;

        let mut token = first;
        if token.line_begin {
            *owner = compile_name(lexer, &token, origin)?;
            token = lexer.next_token()?;
        }

        // ttl and class in either order, each at most once, then type
        let mut ttl = None;
        let mut class = None;
        let rtype = loop {
            if token.is_eol() {
                return Err(ZoneError::semantic(lexer.pos(&token), "record has no type"));
            }
            if token.kind != TokenKind::Contiguous {
                return Err(ZoneError::semantic(
                    lexer.pos(&token),
                    "expected TTL, class or type",
                ));
            }
            let bytes = lexer.bytes(&token);
            let as_class = if class.is_none() {
                ClassCode::from_mnemonic(bytes)
            } else {
                None
            };
            if let Some(c) = as_class {
                class = Some(c);
            } else {
                let as_ttl = if ttl.is_none() { parse_ttl(bytes) } else { None };
                if let Some(t) = as_ttl {
                    ttl = Some(t);
                } else if let Some(t) = TypeCode::from_mnemonic(bytes) {
                    break t;
                } else if !bytes.is_empty() && bytes.iter().all(|b| b.is_ascii_digit()) {
                    let detail = if ttl.is_some() {
                        "duplicate TTL field"
                    } else {
                        "TTL out of range"
                    };
                    return Err(ZoneError::semantic(lexer.pos(&token), detail));
                } else {
                    return Err(ZoneError::semantic(
                        lexer.pos(&token),
                        format!(
                            "expected TTL, class or type, found {}",
                            String::from_utf8_lossy(bytes)
                        ),
                    ));
                }
            }
            token = lexer.next_token()?;
        };

        *last_type = Some(rtype);
        if let Some(c) = class {
            *last_class = c;
        }
        if let Some(t) = ttl {
            *last_ttl = t;
        }
        let (class, ttl) = (*last_class, *last_ttl);

        let first_rdata = lexer.next_token()?;
        if first_rdata.is_eol() {
            return Err(ZoneError::semantic(
                lexer.pos(&first_rdata),
                "record has no RDATA",
            ));
        }
        let rdata = self.cache.rdata_mut(slot);
        rdata.clear();
        zone_rdata::decode(rtype, first_rdata, lexer, origin, rdata)?;

        *self.cache.owner_mut(slot) = owner.clone();
        let record = self.cache.record(slot, rtype, class, ttl);
        tracing::trace!(
            target: "zone::parse",
            r#type = %record.rtype,
            rdata_len = record.rdata.len(),
            "record assembled"
        );
        match self.sink.accept(&record) {
            Ok(next) if next < self.cache.size() => {
                self.slot = next;
                self.records += 1;
                Ok(())
            }
            Ok(next) => Err(ZoneError::BadParameter(format!(
                "sink returned slot {next}, cache holds {}",
                self.cache.size()
            ))),
            Err(code) => Err(ZoneError::Sink(code)),
        }
    }

    fn log(&mut self, category: LogCategory, message: &str) {
        if !self.options.log.categories.contains(category.mask()) {
            return;
        }
        match &mut self.options.log.write {
            Some(write) => write(category, message),
            None => match category {
                LogCategory::Error => tracing::error!(target: "zone::parse", "{message}"),
                LogCategory::Warning => tracing::warn!(target: "zone::parse", "{message}"),
                LogCategory::Info => tracing::info!(target: "zone::parse", "{message}"),
            },
        }
    }
}
