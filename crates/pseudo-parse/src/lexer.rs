use crate::error::LexError;
use pseudo_ast::span::Span;
use pseudo_ast::token::{Tok, TokKind};
use tracing::{debug, warn};

/// What the lexer does with characters that are not part of the language.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnknownCharPolicy {
    /// Drop them silently. Unterminated strings run to end of input.
    #[default]
    Discard,
    /// Fail on the first unknown character or unterminated string.
    Reject,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LexOptions {
    pub unknown: UnknownCharPolicy,
}

impl LexOptions {
    pub fn strict() -> Self {
        Self {
            unknown: UnknownCharPolicy::Reject,
        }
    }
}

/// Keyword lookup. Matching is exact and case-sensitive.
pub fn keyword(word: &str) -> Option<TokKind> {
    let kind = match word {
        "Declare" => TokKind::KwDeclare,
        "Assign" => TokKind::KwAssign,
        "Print" => TokKind::KwPrint,
        "If" => TokKind::KwIf,
        "Then" => TokKind::KwThen,
        "Else" => TokKind::KwElse,
        "End" => TokKind::KwEnd,
        "For" => TokKind::KwFor,
        "To" => TokKind::KwTo,
        "Do" => TokKind::KwDo,
        "While" => TokKind::KwWhile,
        "As" => TokKind::KwAs,
        "Of" => TokKind::KwOf,
        "Array" => TokKind::KwArray,
        "Integer" => TokKind::KwInteger,
        "String" => TokKind::KwString,
        _ => return None,
    };
    Some(kind)
}

/// Tokenize with the default (discarding) policy. Never fails.
pub fn tokenize(src: &str) -> Vec<Tok> {
    let mut lex = Lexer::new(src);
    let mut toks = Vec::new();
    let mut dropped = 0usize;
    loop {
        let t = lex.next_tok();
        match t.kind {
            TokKind::Unknown => dropped += 1,
            TokKind::Eof => {
                toks.push(t);
                break;
            }
            _ => toks.push(t),
        }
    }
    if dropped > 0 {
        warn!(dropped, "discarded unrecognized characters");
    }
    if let Some(span) = lex.open_string {
        warn!(%span, "string literal runs to end of input");
    }
    debug!(count = toks.len(), "tokenized");
    toks
}

pub fn tokenize_with(src: &str, opts: &LexOptions) -> Result<Vec<Tok>, LexError> {
    if opts.unknown == UnknownCharPolicy::Discard {
        return Ok(tokenize(src));
    }
    let mut lex = Lexer::new(src);
    let mut toks = Vec::new();
    loop {
        let t = lex.next_tok();
        match t.kind {
            TokKind::Unknown => {
                return Err(LexError::UnknownChar {
                    ch: t.lexeme.chars().next().unwrap_or('\u{fffd}'),
                    span: t.span,
                })
            }
            TokKind::Eof => {
                toks.push(t);
                break;
            }
            _ => {
                if let Some(span) = lex.open_string.take() {
                    return Err(LexError::UnterminatedString { span });
                }
                toks.push(t);
            }
        }
    }
    debug!(count = toks.len(), "tokenized (strict)");
    Ok(toks)
}

pub struct Lexer<'a> {
    src: &'a str,
    pos: usize,
    /// Set when a string literal reached end of input without its closing quote.
    open_string: Option<Span>,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            open_string: None,
        }
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn span(&self, start: usize) -> Span {
        Span::new(start, self.pos)
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    fn take_while(&mut self, f: impl Fn(char) -> bool) {
        while matches!(self.peek(), Some(c) if f(c)) {
            self.bump();
        }
    }

    /// Next token; `Eof` once the input is exhausted, `Unknown` for
    /// characters outside the language.
    pub fn next_tok(&mut self) -> Tok {
        self.skip_ws();
        let start = self.pos;
        let Some(c) = self.bump() else {
            return Tok::eof(self.pos as u32);
        };

        let single = match c {
            '=' => Some(TokKind::Eq),
            '+' => Some(TokKind::Plus),
            '-' => Some(TokKind::Minus),
            '*' => Some(TokKind::Star),
            '/' => Some(TokKind::Slash),
            '<' => Some(TokKind::Lt),
            '>' => Some(TokKind::Gt),
            '!' => Some(TokKind::Bang),
            '(' => Some(TokKind::LParen),
            ')' => Some(TokKind::RParen),
            '[' => Some(TokKind::LBracket),
            ']' => Some(TokKind::RBracket),
            _ => None,
        };
        if let Some(kind) = single {
            return Tok::new(kind, &self.src[start..self.pos], self.span(start));
        }

        // string: no escapes, interior only
        if c == '"' {
            let body_start = self.pos;
            while let Some(ch) = self.peek() {
                if ch == '"' {
                    break;
                }
                self.bump();
            }
            let body_end = self.pos;
            if self.bump().is_none() {
                self.open_string = Some(self.span(start));
            }
            return Tok::new(
                TokKind::Str,
                &self.src[body_start..body_end],
                self.span(start),
            );
        }

        if c.is_ascii_digit() {
            self.take_while(|ch| ch.is_ascii_digit());
            return Tok::new(
                TokKind::Number,
                &self.src[start..self.pos],
                self.span(start),
            );
        }

        if c.is_ascii_alphabetic() {
            self.take_while(|ch| ch.is_ascii_alphanumeric() || ch == '_');
            let word = &self.src[start..self.pos];
            let kind = keyword(word).unwrap_or(TokKind::Ident);
            return Tok::new(kind, word, self.span(start));
        }

        Tok::new(TokKind::Unknown, &self.src[start..self.pos], self.span(start))
    }
}
