pub mod span {
    use serde::Serialize;
    use std::fmt;

    /// Byte range of a lexeme in the source text.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
    pub struct Span {
        pub start: u32,
        pub end: u32,
    }

    impl Span {
        pub fn new(start: usize, end: usize) -> Self {
            Self {
                start: start as u32,
                end: end as u32,
            }
        }

        /// Smallest span covering both `self` and `other`.
        pub fn to(self, other: Span) -> Span {
            Span {
                start: self.start.min(other.start),
                end: self.end.max(other.end),
            }
        }

        /// True when `other` starts exactly where `self` ends.
        pub fn touches(self, other: Span) -> bool {
            self.end == other.start
        }
    }

    impl fmt::Display for Span {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}..{}", self.start, self.end)
        }
    }
}

pub mod token {
    use super::span::Span;
    use serde::Serialize;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
    pub enum TokKind {
        // eof
        Eof,
        // idents / literals
        Ident,
        Number,
        Str,
        // statement keywords
        KwDeclare,
        KwAssign,
        KwPrint,
        KwIf,
        KwThen,
        KwElse,
        KwEnd,
        KwFor,
        KwTo,
        KwDo,
        KwWhile,
        // declaration keywords
        KwAs,
        KwOf,
        KwArray,
        KwInteger,
        KwString,
        // assignment
        Eq,
        // arithmetic
        Plus,
        Minus,
        Star,
        Slash,
        // relational
        Lt,
        Gt,
        // unary
        Bang,
        // grouping / indexing
        LParen,
        RParen,
        LBracket,
        RBracket,
        /// Character outside the language; dropped unless lexing is strict.
        Unknown,
    }

    impl TokKind {
        pub fn is_keyword(self) -> bool {
            matches!(
                self,
                TokKind::KwDeclare
                    | TokKind::KwAssign
                    | TokKind::KwPrint
                    | TokKind::KwIf
                    | TokKind::KwThen
                    | TokKind::KwElse
                    | TokKind::KwEnd
                    | TokKind::KwFor
                    | TokKind::KwTo
                    | TokKind::KwDo
                    | TokKind::KwWhile
                    | TokKind::KwAs
                    | TokKind::KwOf
                    | TokKind::KwArray
                    | TokKind::KwInteger
                    | TokKind::KwString
            )
        }

        pub fn is_operator(self) -> bool {
            matches!(
                self,
                TokKind::Eq
                    | TokKind::Plus
                    | TokKind::Minus
                    | TokKind::Star
                    | TokKind::Slash
                    | TokKind::Lt
                    | TokKind::Gt
                    | TokKind::Bang
                    | TokKind::LParen
                    | TokKind::RParen
            )
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
    pub struct Tok {
        pub kind: TokKind,
        pub lexeme: String,
        pub span: Span,
    }

    impl Tok {
        pub fn new(kind: TokKind, lexeme: impl Into<String>, span: Span) -> Self {
            Self {
                kind,
                lexeme: lexeme.into(),
                span,
            }
        }

        pub fn eof(at: u32) -> Self {
            Self {
                kind: TokKind::Eof,
                lexeme: String::new(),
                span: Span { start: at, end: at },
            }
        }

        /// Human-readable form for diagnostics.
        pub fn describe(&self) -> String {
            match self.kind {
                TokKind::Eof => "end of input".to_string(),
                TokKind::Str => format!("string \"{}\"", self.lexeme),
                _ => format!("`{}`", self.lexeme),
            }
        }
    }
}

pub mod ast {
    use super::token::{Tok, TokKind};
    use serde::Serialize;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
    pub enum NodeKind {
        Program,
        Declaration,
        Assignment,
        Print,
        IfStatement,
        ForLoop,
        WhileLoop,
        Block,
        Expression,
        Identifier,
    }

    /// One AST node. The number and kinds of `children` are fixed by `kind`:
    ///
    /// - `Declaration`: `[name, type]`, or `[name, Array, elem_type, size, size*]`
    /// - `Assignment`: `[target, "=", Expression]`
    /// - `Print`: `[string leaf | Expression]`
    /// - `IfStatement`: `[Expression, Block, Block]` (else block may be empty)
    /// - `ForLoop`: `[Expression "<id> = <start>", Expression, Block]`
    /// - `WhileLoop`: `[Expression, Block]`
    /// - `Expression`: operand/operator `Identifier` leaves in source order
    /// - `Identifier`: index `Expression`s when the name is subscripted
    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct Node {
        pub kind: NodeKind,
        pub token: Tok,
        pub children: Vec<Node>,
    }

    impl Node {
        pub fn new(kind: NodeKind, token: Tok, children: Vec<Node>) -> Self {
            Self {
                kind,
                token,
                children,
            }
        }

        /// An `Identifier` leaf wrapping a single token.
        pub fn leaf(token: Tok) -> Self {
            Self::new(NodeKind::Identifier, token, Vec::new())
        }

        pub fn lexeme(&self) -> &str {
            &self.token.lexeme
        }

        pub fn is_string_literal(&self) -> bool {
            self.kind == NodeKind::Identifier && self.token.kind == TokKind::Str
        }

        /// Array declarations carry the `Array` marker as their second child.
        pub fn is_array_declaration(&self) -> bool {
            self.kind == NodeKind::Declaration
                && self
                    .children
                    .get(1)
                    .is_some_and(|c| c.token.kind == TokKind::KwArray)
        }
    }
}
