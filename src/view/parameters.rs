//! Extraction of the parameters a PHP template consumes.
//!
//! A template's parameters are the variables it reads at top level without
//! assigning them first. The scan is lexical and best-effort:
//!
//! - text outside `<?php`/`<?=`/`<?` tags is ignored
//! - comments, single-quoted strings and nowdocs are skipped
//! - variables interpolated in double-quoted strings, backticks and heredocs
//!   (`$name`, `{$name}`, `${name}`) count as reads
//! - `$this` and superglobals are never parameters
//! - loop (`foreach ... as`), `catch`, `global`, `static`, arrow-function and
//!   destructuring bindings are local
//! - bodies of named functions, closures and classes are not scanned, but the
//!   variables a closure imports with `use (...)` are reads
//!
//! An assignment only counts once its statement ends, so
//! `$title = $title ?? 'Home';` still reads `$title` as a parameter.

use std::collections::{BTreeSet, HashSet};
use thiserror::Error;
use tracing::debug;

use crate::constants::IMPLICIT_TEMPLATE_VARIABLES;

/// Reasons a template could not be scanned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    /// A quoted string is not closed
    #[error("unterminated string starting at byte {offset}")]
    UnterminatedString {
        /// Offset of the opening quote
        offset: usize,
    },
    /// A block comment is not closed
    #[error("unterminated comment starting at byte {offset}")]
    UnterminatedComment {
        /// Offset of the comment start
        offset: usize,
    },
    /// A heredoc or nowdoc has no closing identifier
    #[error("unterminated heredoc starting at byte {offset}")]
    UnterminatedHeredoc {
        /// Offset of the `<<<` marker
        offset: usize,
    },
    /// A heredoc marker is not followed by a valid identifier line
    #[error("malformed heredoc marker at byte {offset}")]
    MalformedHeredoc {
        /// Offset of the `<<<` marker
        offset: usize,
    },
}

/// Extract the parameter names a template reads.
///
/// Never fails: a template that cannot be scanned contributes no parameters.
///
/// ```
/// use view_params::view::extract_parameters;
///
/// let params = extract_parameters(
///     "<h1><?= $title ?></h1><?php foreach ($items as $item): ?><?= $item ?><?php endforeach ?>",
/// );
/// assert_eq!(params.into_iter().collect::<Vec<_>>(), vec!["items", "title"]);
/// ```
pub fn extract_parameters(content: &str) -> BTreeSet<String> {
    match try_extract_parameters(content) {
        Ok(parameters) => parameters,
        Err(e) => {
            debug!("Template scan failed, treating as parameterless: {}", e);
            BTreeSet::new()
        }
    }
}

/// Extract the parameter names a template reads, reporting scan failures.
///
/// # Errors
///
/// Returns a [`ScanError`] for unterminated strings, comments or heredocs.
pub fn try_extract_parameters(content: &str) -> Result<BTreeSet<String>, ScanError> {
    let tokens = Lexer::new(content).tokenize()?;
    Ok(Analyzer::new(&tokens).run())
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Variable(String),
    Word(String),
    Punct(&'static str),
}

impl Token {
    fn is_punct(&self, p: &str) -> bool {
        matches!(self, Token::Punct(q) if *q == p)
    }

    fn is_word(&self, w: &str) -> bool {
        matches!(self, Token::Word(word) if word.eq_ignore_ascii_case(w))
    }
}

/// Operators sorted longest first so the first match is the greedy one.
const OPERATORS: &[&str] = &[
    "<<=", ">>=", "**=", "??=", "===", "!==", "<=>", "...", "?->", "=>", "->", "::", "==", "!=",
    "<=", ">=", "??", ".=", "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "&&", "||", "++",
    "--", "**", "<<", ">>", "=", ";", ",", "(", ")", "[", "]", "{", "}", "&", "|", "^", "!", "?",
    ":", ".", "+", "-", "*", "/", "%", "<", ">", "@", "~", "$", "#",
];

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b >= 0x80
}

fn is_ident_char(b: u8) -> bool {
    is_ident_start(b) || b.is_ascii_digit()
}

struct Lexer<'a> {
    text: &'a str,
    src: &'a [u8],
    pos: usize,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            src: text.as_bytes(),
            pos: 0,
            tokens: Vec::new(),
        }
    }

    fn tokenize(mut self) -> Result<Vec<Token>, ScanError> {
        while self.skip_html() {
            self.tokens.push(Token::Punct(";"));
            self.scan_php()?;
            self.tokens.push(Token::Punct(";"));
        }
        Ok(self.tokens)
    }

    fn starts_with(&self, s: &str) -> bool {
        self.src[self.pos..].starts_with(s.as_bytes())
    }

    fn peek(&self, offset: usize) -> Option<u8> {
        self.src.get(self.pos + offset).copied()
    }

    fn next_is_ignore_case(&self, word: &[u8]) -> bool {
        self.src[self.pos..].get(..word.len()).is_some_and(|next| next.eq_ignore_ascii_case(word))
    }

    /// Advance past inline HTML to the next open tag. Returns `false` at the end.
    fn skip_html(&mut self) -> bool {
        while self.pos < self.src.len() {
            let Some(found) = self.text[self.pos..].find("<?") else {
                self.pos = self.src.len();
                return false;
            };
            self.pos += found + 2;
            if self.next_is_ignore_case(b"php") {
                self.pos += 3;
                return true;
            }
            if self.peek(0) == Some(b'=') {
                self.pos += 1;
                return true;
            }
            if self.next_is_ignore_case(b"xml") {
                continue;
            }
            return true;
        }
        false
    }

    /// Tokenize PHP code up to the closing tag or the end of input.
    fn scan_php(&mut self) -> Result<(), ScanError> {
        while let Some(b) = self.peek(0) {
            match b {
                b' ' | b'\t' | b'\r' | b'\n' => self.pos += 1,
                b'?' if self.peek(1) == Some(b'>') => {
                    self.pos += 2;
                    return Ok(());
                }
                b'/' if self.peek(1) == Some(b'/') => self.skip_line_comment(),
                b'#' if self.peek(1) != Some(b'[') => self.skip_line_comment(),
                b'/' if self.peek(1) == Some(b'*') => self.skip_block_comment()?,
                b'\'' => self.skip_single_quoted()?,
                b'"' => self.scan_interpolated_string(b'"')?,
                b'`' => self.scan_interpolated_string(b'`')?,
                b'<' if self.starts_with("<<<") => self.scan_heredoc()?,
                b'$' if self.peek(1).is_some_and(is_ident_start) => {
                    self.pos += 1;
                    let name = self.read_ident();
                    self.tokens.push(Token::Variable(name));
                }
                b'$' if self.peek(1) == Some(b'$') => self.pos += 1,
                b'\\' => {
                    self.pos += 1;
                }
                _ if is_ident_start(b) => {
                    let word = self.read_qualified_word();
                    self.tokens.push(Token::Word(word));
                }
                _ if b.is_ascii_digit() => {
                    while self
                        .peek(0)
                        .is_some_and(|c| c.is_ascii_alphanumeric() || c == b'.' || c == b'_')
                    {
                        self.pos += 1;
                    }
                }
                _ => {
                    let op = OPERATORS.iter().copied().find(|op| self.starts_with(op));
                    match op {
                        Some(op) => {
                            self.pos += op.len();
                            self.tokens.push(Token::Punct(op));
                        }
                        None => self.pos += 1,
                    }
                }
            }
        }
        Ok(())
    }

    fn read_ident(&mut self) -> String {
        let start = self.pos;
        while self.peek(0).is_some_and(is_ident_char) {
            self.pos += 1;
        }
        self.text[start..self.pos].to_string()
    }

    fn read_qualified_word(&mut self) -> String {
        let start = self.pos;
        while self.peek(0).is_some_and(|c| is_ident_char(c) || c == b'\\') {
            self.pos += 1;
        }
        self.text[start..self.pos].to_string()
    }

    fn skip_line_comment(&mut self) {
        while let Some(b) = self.peek(0) {
            if b == b'\n' || (b == b'?' && self.peek(1) == Some(b'>')) {
                return;
            }
            self.pos += 1;
        }
    }

    fn skip_block_comment(&mut self) -> Result<(), ScanError> {
        let offset = self.pos;
        match self.text[self.pos + 2..].find("*/") {
            Some(end) => {
                self.pos += 2 + end + 2;
                Ok(())
            }
            None => Err(ScanError::UnterminatedComment {
                offset,
            }),
        }
    }

    fn skip_single_quoted(&mut self) -> Result<(), ScanError> {
        let offset = self.pos;
        self.pos += 1;
        while let Some(b) = self.peek(0) {
            match b {
                b'\\' => self.pos += 2,
                b'\'' => {
                    self.pos += 1;
                    return Ok(());
                }
                _ => self.pos += 1,
            }
        }
        Err(ScanError::UnterminatedString {
            offset,
        })
    }

    fn scan_interpolated_string(&mut self, quote: u8) -> Result<(), ScanError> {
        let offset = self.pos;
        self.pos += 1;
        while let Some(b) = self.peek(0) {
            match b {
                b'\\' => self.pos += 2,
                b'$' if self.peek(1).is_some_and(is_ident_start) => {
                    self.pos += 1;
                    let name = self.read_ident();
                    self.tokens.push(Token::Variable(name));
                }
                // "${name}"
                b'$' if self.peek(1) == Some(b'{') && self.peek(2).is_some_and(is_ident_start) => {
                    self.pos += 2;
                    let name = self.read_ident();
                    self.tokens.push(Token::Variable(name));
                }
                _ if b == quote => {
                    self.pos += 1;
                    return Ok(());
                }
                _ => self.pos += 1,
            }
        }
        Err(ScanError::UnterminatedString {
            offset,
        })
    }

    fn scan_heredoc(&mut self) -> Result<(), ScanError> {
        let offset = self.pos;
        self.pos += 3;
        while matches!(self.peek(0), Some(b' ' | b'\t')) {
            self.pos += 1;
        }

        let quote = match self.peek(0) {
            Some(q @ (b'\'' | b'"')) => {
                self.pos += 1;
                Some(q)
            }
            _ => None,
        };
        if !self.peek(0).is_some_and(is_ident_start) {
            return Err(ScanError::MalformedHeredoc {
                offset,
            });
        }
        let label = self.read_ident();
        if let Some(q) = quote {
            if self.peek(0) != Some(q) {
                return Err(ScanError::MalformedHeredoc {
                    offset,
                });
            }
            self.pos += 1;
        }
        if self.peek(0) == Some(b'\r') {
            self.pos += 1;
        }
        if self.peek(0) != Some(b'\n') {
            return Err(ScanError::MalformedHeredoc {
                offset,
            });
        }
        self.pos += 1;

        let body_start = self.pos;
        let mut line_start = self.pos;
        loop {
            let mut cursor = line_start;
            while matches!(self.src.get(cursor), Some(b' ' | b'\t')) {
                cursor += 1;
            }
            let closes = self.src[cursor..].starts_with(label.as_bytes())
                && !self.src.get(cursor + label.len()).copied().is_some_and(is_ident_char);
            if closes {
                if quote != Some(b'\'') {
                    self.scan_heredoc_body(body_start, line_start);
                }
                self.pos = cursor + label.len();
                return Ok(());
            }
            match self.text[line_start..].find('\n') {
                Some(newline) => line_start += newline + 1,
                None => {
                    return Err(ScanError::UnterminatedHeredoc {
                        offset,
                    });
                }
            }
        }
    }

    fn scan_heredoc_body(&mut self, start: usize, end: usize) {
        let mut i = start;
        while i < end {
            match self.src[i] {
                b'\\' => i += 2,
                b'$' => {
                    let name_start = if self.src.get(i + 1) == Some(&b'{') { i + 2 } else { i + 1 };
                    if name_start >= end || !is_ident_start(self.src[name_start]) {
                        i += 1;
                        continue;
                    }
                    let mut name_end = name_start;
                    while name_end < end && is_ident_char(self.src[name_end]) {
                        name_end += 1;
                    }
                    self.tokens.push(Token::Variable(self.text[name_start..name_end].to_string()));
                    i = name_end;
                }
                _ => i += 1,
            }
        }
    }
}

/// Index of the token closing the group opened at `open`.
fn matching(tokens: &[Token], open: usize, open_p: &str, close_p: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, token) in tokens.iter().enumerate().skip(open) {
        if token.is_punct(open_p) {
            depth += 1;
        } else if token.is_punct(close_p) {
            depth = depth.saturating_sub(1);
            if depth == 0 {
                return Some(i);
            }
        }
    }
    None
}

/// Index of the last token of an arrow function whose parameter list closes at `close`.
///
/// The body runs up to the first `,`, `;` or unbalanced closing bracket at its
/// own nesting level.
fn arrow_body_end(tokens: &[Token], close: usize) -> usize {
    let mut depth = 0usize;
    for (i, token) in tokens.iter().enumerate().skip(close + 1) {
        match token {
            Token::Punct("(" | "[" | "{") => depth += 1,
            Token::Punct(")" | "]" | "}") => {
                if depth == 0 {
                    return i - 1;
                }
                depth -= 1;
            }
            Token::Punct("," | ";") if depth == 0 => return i - 1,
            _ => {}
        }
    }
    tokens.len().saturating_sub(1)
}

fn previous_word(tokens: &[Token], i: usize) -> Option<&str> {
    match i.checked_sub(1).map(|p| &tokens[p]) {
        Some(Token::Word(word)) => Some(word),
        _ => None,
    }
}

fn is_member_access(token: Option<&Token>) -> bool {
    token.is_some_and(|t| t.is_punct("->") || t.is_punct("?->") || t.is_punct("::"))
}

struct Analyzer<'t> {
    tokens: &'t [Token],
    parameters: BTreeSet<String>,
    assigned: HashSet<String>,
    pending: Vec<String>,
    bindings: Vec<(usize, usize)>,
    /// Arrow functions: token range of parameters and body, and the parameter names
    arrow_scopes: Vec<(usize, usize, HashSet<String>)>,
    bind_until_statement_end: bool,
    skip_next_block: bool,
}

impl<'t> Analyzer<'t> {
    fn new(tokens: &'t [Token]) -> Self {
        Self {
            tokens,
            parameters: BTreeSet::new(),
            assigned: HashSet::new(),
            pending: Vec::new(),
            bindings: Vec::new(),
            arrow_scopes: Vec::new(),
            bind_until_statement_end: false,
            skip_next_block: false,
        }
    }

    fn run(mut self) -> BTreeSet<String> {
        let mut i = 0;
        while i < self.tokens.len() {
            i = self.step(i) + 1;
        }
        self.parameters
    }

    fn commit(&mut self) {
        self.assigned.extend(self.pending.drain(..));
    }

    fn is_bound(&self, i: usize) -> bool {
        self.bind_until_statement_end
            || self.bindings.iter().any(|&(from, to)| from <= i && i <= to)
    }

    fn read(&mut self, name: &str) {
        if !self.assigned.contains(name) {
            self.parameters.insert(name.to_string());
        }
    }

    /// Process the token at `i` and return the index of the last token consumed.
    fn step(&mut self, i: usize) -> usize {
        let tokens = self.tokens;
        let previous = i.checked_sub(1).map(|p| &tokens[p]);
        match &tokens[i] {
            Token::Punct(";") => {
                self.commit();
                self.bind_until_statement_end = false;
                self.skip_next_block = false;
                i
            }
            Token::Punct("{") => {
                self.commit();
                if self.skip_next_block {
                    self.skip_next_block = false;
                    return matching(tokens, i, "{", "}").unwrap_or(tokens.len());
                }
                i
            }
            Token::Punct("}") => {
                self.commit();
                i
            }
            Token::Punct("[") => {
                self.mark_destructuring(i, previous, "[", "]");
                i
            }
            Token::Word(word) if !is_member_access(previous) => self.keyword(i, word),
            Token::Variable(name) => {
                self.variable(i, name);
                i
            }
            _ => i,
        }
    }

    fn keyword(&mut self, i: usize, word: &str) -> usize {
        let tokens = self.tokens;
        let next = tokens.get(i + 1);
        match word.to_ascii_lowercase().as_str() {
            "function" => self.closure(i),
            "fn" => {
                let open = if next.is_some_and(|t| t.is_punct("&")) { i + 2 } else { i + 1 };
                if tokens.get(open).is_some_and(|t| t.is_punct("("))
                    && let Some(close) = matching(tokens, open, "(", ")")
                {
                    let names = tokens[open..close]
                        .iter()
                        .filter_map(|token| match token {
                            Token::Variable(name) => Some(name.clone()),
                            _ => None,
                        })
                        .collect();
                    self.arrow_scopes.push((open, arrow_body_end(tokens, close), names));
                }
                i
            }
            "class" | "interface" | "trait" => {
                let declares = matches!(next, Some(Token::Word(_)))
                    || (word.eq_ignore_ascii_case("class")
                        && previous_word(tokens, i).is_some_and(|w| w.eq_ignore_ascii_case("new")));
                if declares {
                    self.skip_next_block = true;
                }
                i
            }
            "enum" if matches!(next, Some(Token::Word(_))) => {
                self.skip_next_block = true;
                i
            }
            "foreach" => {
                if next.is_some_and(|t| t.is_punct("("))
                    && let Some(close) = matching(tokens, i + 1, "(", ")")
                {
                    let mut depth = 0usize;
                    for (j, token) in tokens.iter().enumerate().take(close).skip(i + 1) {
                        match token {
                            Token::Punct("(") | Token::Punct("[") => depth += 1,
                            Token::Punct(")") | Token::Punct("]") => {
                                depth = depth.saturating_sub(1);
                            }
                            Token::Word(w) if depth == 1 && w.eq_ignore_ascii_case("as") => {
                                self.bindings.push((j, close));
                                break;
                            }
                            _ => {}
                        }
                    }
                }
                i
            }
            "catch" => {
                if next.is_some_and(|t| t.is_punct("("))
                    && let Some(close) = matching(tokens, i + 1, "(", ")")
                {
                    self.bindings.push((i + 1, close));
                }
                i
            }
            "global" => {
                self.bind_until_statement_end = true;
                i
            }
            "static" if matches!(next, Some(Token::Variable(_))) => {
                self.bind_until_statement_end = true;
                i
            }
            "list" => {
                if next.is_some_and(|t| t.is_punct("(")) {
                    self.mark_destructuring(i + 1, Some(&tokens[i]), "(", ")");
                }
                i
            }
            _ => i,
        }
    }

    /// `function` keyword: record `use (...)` imports as reads and skip the body.
    fn closure(&mut self, i: usize) -> usize {
        let tokens = self.tokens;
        let mut open = i + 1;
        while open < tokens.len() && !tokens[open].is_punct("(") {
            if tokens[open].is_punct(";") || tokens[open].is_punct("{") {
                return i;
            }
            open += 1;
        }
        let Some(close) = matching(tokens, open, "(", ")") else {
            return i;
        };

        let mut cursor = close + 1;
        if tokens.get(cursor).is_some_and(|t| t.is_word("use"))
            && tokens.get(cursor + 1).is_some_and(|t| t.is_punct("("))
            && let Some(use_close) = matching(tokens, cursor + 1, "(", ")")
        {
            for token in &tokens[cursor + 1..use_close] {
                if let Token::Variable(name) = token {
                    let name = name.clone();
                    if !IMPLICIT_TEMPLATE_VARIABLES.contains(&name.as_str()) {
                        self.read(&name);
                    }
                }
            }
            cursor = use_close + 1;
        }

        while cursor < tokens.len() {
            if tokens[cursor].is_punct("{") {
                return matching(tokens, cursor, "{", "}").unwrap_or(tokens.len());
            }
            if tokens[cursor].is_punct(";") {
                return cursor - 1;
            }
            cursor += 1;
        }
        tokens.len()
    }

    /// Mark `[...] =` and `list(...) =` groups as bindings of the current statement.
    fn mark_destructuring(
        &mut self,
        open: usize,
        previous: Option<&Token>,
        open_p: &str,
        close_p: &str,
    ) {
        let tokens = self.tokens;
        let indexes_something = match previous {
            Some(Token::Variable(_)) | Some(Token::Word(_)) => open_p == "[",
            Some(t) => t.is_punct(")") || t.is_punct("]") || t.is_punct("}"),
            None => false,
        };
        if indexes_something {
            return;
        }
        if let Some(close) = matching(tokens, open, open_p, close_p)
            && tokens.get(close + 1).is_some_and(|t| t.is_punct("="))
        {
            for token in &tokens[open..close] {
                if let Token::Variable(name) = token {
                    self.pending.push(name.clone());
                }
            }
            self.bindings.push((open, close));
        }
    }

    fn variable(&mut self, i: usize, name: &str) {
        if IMPLICIT_TEMPLATE_VARIABLES.contains(&name) {
            return;
        }
        if self
            .arrow_scopes
            .iter()
            .any(|(from, to, names)| *from <= i && i <= *to && names.contains(name))
        {
            return;
        }
        if self.is_bound(i) {
            self.assigned.insert(name.to_string());
            return;
        }

        let tokens = self.tokens;
        let mut after = i + 1;
        while tokens.get(after).is_some_and(|t| t.is_punct("[")) {
            match matching(tokens, after, "[", "]") {
                Some(close) => after = close + 1,
                None => break,
            }
        }
        if tokens.get(after).is_some_and(|t| t.is_punct("="))
            && !self.assigned.contains(name)
            && !self.parameters.contains(name)
        {
            self.pending.push(name.to_string());
            return;
        }
        self.read(name);
    }
}
