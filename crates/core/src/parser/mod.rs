//! Backtracking recursive-descent parser for Thrift IDL.
//!
//! Rules read directly from the source buffer; there is no separate token
//! stream. Every rule returns `Rule<T>` and signals non-match with a `Miss`,
//! which the combinators below turn into rollback-and-retry or
//! rollback-and-stop. Whitespace and comments are skipped after every token.
use crate::ast::ThriftAst;
use crate::comments::{CommentMark, CommentQueues};
use crate::cursor::{Cursor, Scanner};
use crate::error::{Miss, Reason, Rule, ThriftSyntaxError};
use crate::options::ParseOptions;
use indexmap::IndexMap;

mod subjects;
mod types;
mod values;

/// A rule as a plain function pointer, for ordered-choice tables.
pub(crate) type RuleFn<'src, T> = fn(&mut Parser<'src>) -> Rule<T>;

/// Parse one Thrift source buffer with default options.
pub fn parse(src: &str) -> Result<ThriftAst, ThriftSyntaxError> {
    parse_with(src, ParseOptions::default())
}

/// Parse one Thrift source buffer.
///
/// Either the whole input is consumed and the AST returned, or exactly one
/// syntax error is returned.
pub fn parse_with(src: &str, options: ParseOptions) -> Result<ThriftAst, ThriftSyntaxError> {
    Parser::new(src, options).parse_document()
}

#[derive(Debug, Clone, Copy)]
struct Checkpoint {
    cursor: Cursor,
    comments: CommentMark,
}

// ──────────────────────────────────────────────
// Parser
// ──────────────────────────────────────────────

pub(crate) struct Parser<'src> {
    scanner: Scanner<'src>,
    checkpoints: Vec<Checkpoint>,
    comments: CommentQueues,
    /// Best diagnostic seen during the current top-level attempt.
    furthest: Option<Miss>,
    options: ParseOptions,
}

impl<'src> Parser<'src> {
    pub(crate) fn new(src: &'src str, options: ParseOptions) -> Self {
        Parser {
            scanner: Scanner::new(src),
            checkpoints: Vec::new(),
            comments: CommentQueues::default(),
            furthest: None,
            options,
        }
    }

    // -- Top-level driver ---------------------------------------

    fn parse_document(mut self) -> Result<ThriftAst, ThriftSyntaxError> {
        tracing::trace!(bytes = self.scanner.source().len(), "parsing thrift source");
        let mut ast = ThriftAst::new();
        if self.scanner.starts_with("\u{feff}") {
            self.scanner.advance(3);
        }
        self.skip_new_lines();
        while !self.scanner.at_end() {
            self.furthest = None;
            let line = self.scanner.line();
            match self.subject() {
                Ok(subject) => {
                    tracing::debug!(
                        kind = subject.kind().as_str(),
                        name = subject.name(),
                        line,
                        "parsed declaration"
                    );
                    ast.insert(subject);
                }
                Err(miss) => {
                    let err = self.syntax_error(miss);
                    tracing::debug!(line = err.line, message = %err.message, "syntax error");
                    return Err(err);
                }
            }
        }
        Ok(ast)
    }

    /// Wrap the best miss of the failed attempt with the position the
    /// attempt started from.
    fn syntax_error(&self, miss: Miss) -> ThriftSyntaxError {
        let best = match &self.furthest {
            Some(f) if f.outranks(&miss) => f,
            _ => &miss,
        };
        let message = match &best.reason {
            Reason::Expected(what) => {
                format!("unexpected {}, expected {}", self.describe(best.offset), what)
            }
            Reason::Invalid(msg) => msg.clone(),
        };
        let offset = self.scanner.offset();
        ThriftSyntaxError::new(
            message,
            self.scanner.excerpt(offset, self.options.context_width),
            self.scanner.line(),
        )
    }

    fn describe(&self, offset: usize) -> String {
        match self.scanner.source().get(offset..).and_then(|s| s.chars().next()) {
            None => "end of input".to_owned(),
            Some('\n') | Some('\r') => "line break".to_owned(),
            Some(c) => format!("`{}`", c),
        }
    }

    // -- Backtracking engine ------------------------------------

    fn checkpoint(&mut self) {
        self.checkpoints.push(Checkpoint {
            cursor: self.scanner.cursor,
            comments: self.comments.mark(),
        });
    }

    /// Restore the most recent checkpoint without popping it.
    fn rollback(&mut self) {
        if let Some(cp) = self.checkpoints.last().copied() {
            self.scanner.reset(cp.cursor);
            self.comments.reset(cp.comments);
        }
    }

    /// Pop the most recent checkpoint without restoring it.
    fn commit(&mut self) {
        self.checkpoints.pop();
    }

    /// Ordered choice: the first rule that matches wins. On total failure
    /// the position is left where it started.
    pub(crate) fn choice<T>(&mut self, what: &str, rules: &[RuleFn<'src, T>]) -> Rule<T> {
        self.checkpoint();
        for rule in rules {
            match rule(self) {
                Ok(value) => {
                    self.commit();
                    return Ok(value);
                }
                Err(_) => self.rollback(),
            }
        }
        self.commit();
        Err(self.expected(what))
    }

    /// Optional clause: `None` (with the position restored) if `rule` misses.
    pub(crate) fn attempt<T>(&mut self, rule: impl FnOnce(&mut Self) -> Rule<T>) -> Option<T> {
        self.checkpoint();
        let result = rule(self);
        if result.is_err() {
            self.rollback();
        }
        self.commit();
        result.ok()
    }

    /// Zero or more: apply `rule` until it misses. Never fails.
    pub(crate) fn repeat<T>(&mut self, mut rule: impl FnMut(&mut Self) -> Rule<T>) -> Vec<T> {
        let mut items = Vec::new();
        loop {
            let start = self.scanner.offset();
            self.checkpoint();
            match rule(self) {
                Ok(item) => {
                    self.commit();
                    items.push(item);
                    if self.scanner.offset() == start {
                        return items;
                    }
                }
                Err(_) => {
                    self.rollback();
                    self.commit();
                    return items;
                }
            }
        }
    }

    /// Like [`Parser::repeat`], collecting into a map keyed by `key`. A
    /// repeated key keeps its first position and its last value.
    pub(crate) fn repeat_keyed<T>(
        &mut self,
        rule: impl FnMut(&mut Self) -> Rule<T>,
        key: impl Fn(&T) -> String,
    ) -> IndexMap<String, T> {
        self.repeat(rule)
            .into_iter()
            .map(|item| (key(&item), item))
            .collect()
    }

    // -- Misses -------------------------------------------------

    fn record(&mut self, miss: Miss) -> Miss {
        let better = match &self.furthest {
            Some(f) => miss.outranks(f),
            None => true,
        };
        if better {
            self.furthest = Some(miss.clone());
        }
        miss
    }

    pub(crate) fn expected(&mut self, what: impl Into<String>) -> Miss {
        let miss = Miss {
            offset: self.scanner.offset(),
            reason: Reason::Expected(what.into()),
        };
        self.record(miss)
    }

    pub(crate) fn invalid(&mut self, message: impl Into<String>) -> Miss {
        let miss = Miss {
            offset: self.scanner.offset(),
            reason: Reason::Invalid(message.into()),
        };
        self.record(miss)
    }

    // -- Whitespace & comments ----------------------------------

    /// Skip after a token: the rest of the current line first (tail
    /// comments), then blank lines and comment lines (head comments).
    pub(crate) fn skip(&mut self) {
        self.skip_current_line();
        self.skip_new_lines();
    }

    fn skip_current_line(&mut self) {
        loop {
            match self.scanner.peek() {
                Some(b'\n') | Some(b'\r') => {
                    self.scanner.advance(1);
                    return;
                }
                Some(b' ') | Some(b'\t') => self.scanner.advance(1),
                _ => match self.block_comment().or_else(|| self.line_comment()) {
                    Some(comment) => self.comments.tail.push(comment),
                    None => return,
                },
            }
        }
    }

    fn skip_new_lines(&mut self) {
        loop {
            match self.scanner.peek() {
                Some(b'\n') | Some(b'\r') | Some(b' ') | Some(b'\t') => self.scanner.advance(1),
                _ => match self.block_comment().or_else(|| self.line_comment()) {
                    Some(comment) => self.comments.head.push(comment),
                    None => return,
                },
            }
        }
    }

    /// `// …` or `# …` up to (not including) the line break.
    fn line_comment(&mut self) -> Option<&'src str> {
        if !(self.scanner.starts_with("//") || self.scanner.starts_with("#")) {
            return None;
        }
        let comment = self.scanner.take_while(|b| b != b'\n' && b != b'\r');
        Some(comment.trim_end())
    }

    /// `/* … */`. An unterminated block is not a comment.
    fn block_comment(&mut self) -> Option<&'src str> {
        if !self.scanner.starts_with("/*") {
            return None;
        }
        let end = self.scanner.rest()[2..].find("*/")? + 4;
        let start = self.scanner.offset();
        self.scanner.advance(end);
        Some(self.scanner.slice(start, start + end))
    }

    pub(crate) fn take_head_comments(&mut self) -> Option<String> {
        self.comments.head.drain()
    }

    pub(crate) fn take_tail_comments(&mut self) -> Option<String> {
        self.comments.tail.drain()
    }

    // -- Token primitives ---------------------------------------

    /// A keyword followed by a word boundary.
    pub(crate) fn keyword(&mut self, word: &'static str) -> Rule<&'static str> {
        let bounded = self.scanner.starts_with(word)
            && !self.scanner.peek_at(word.len()).is_some_and(is_ident_byte);
        if !bounded {
            return Err(self.expected(format!("`{}`", word)));
        }
        self.scanner.advance(word.len());
        self.skip();
        Ok(word)
    }

    /// A single punctuation character.
    pub(crate) fn punct(&mut self, ch: u8) -> Rule<()> {
        if self.scanner.peek() != Some(ch) {
            return Err(self.expected(format!("`{}`", ch as char)));
        }
        self.scanner.advance(1);
        self.skip();
        Ok(())
    }

    /// Closing delimiter of a block. Head comments left unclaimed inside the
    /// block belong to nothing and are dropped.
    pub(crate) fn close(&mut self, ch: u8) -> Rule<()> {
        self.comments.head.discard();
        self.punct(ch)
    }

    /// Optional `,` or `;` after an item.
    pub(crate) fn separator(&mut self) -> Option<char> {
        match self.scanner.peek() {
            Some(b @ (b',' | b';')) => {
                self.scanner.advance(1);
                self.skip();
                Some(b as char)
            }
            _ => None,
        }
    }

    /// Declaration, field and type names: `[A-Za-z_][A-Za-z0-9_.]*`.
    /// Dots are allowed so that `shared.Type` reads as one name.
    pub(crate) fn name(&mut self) -> Rule<String> {
        if !self.scanner.peek().is_some_and(is_ident_start) {
            return Err(self.expected("identifier"));
        }
        let name = self
            .scanner
            .take_while(|b| is_ident_byte(b) || b == b'.')
            .to_owned();
        self.skip();
        Ok(name)
    }

    /// Dotted path `a.b.c`, split into segments.
    pub(crate) fn path(&mut self) -> Rule<Vec<String>> {
        let mut segments = Vec::new();
        loop {
            if !self.scanner.peek().is_some_and(is_ident_start) {
                return Err(self.expected("identifier"));
            }
            segments.push(self.scanner.take_while(is_ident_byte).to_owned());
            let continues = self.scanner.peek() == Some(b'.')
                && self.scanner.peek_at(1).is_some_and(is_ident_start);
            if !continues {
                break;
            }
            self.scanner.advance(1);
        }
        self.skip();
        Ok(segments)
    }
}

pub(crate) fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

pub(crate) fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Concatenate two optional comment blocks.
pub(crate) fn join_comments(first: Option<String>, second: Option<String>) -> Option<String> {
    match (first, second) {
        (Some(a), Some(b)) => Some(format!("{}\r\n{}", a, b)),
        (a, b) => a.or(b),
    }
}
