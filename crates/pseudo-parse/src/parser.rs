use crate::error::{Error, SyntaxError};
use crate::lexer::{tokenize, tokenize_with, LexOptions};
use pseudo_ast::ast::{Node, NodeKind};
use pseudo_ast::span::Span;
use pseudo_ast::token::{Tok, TokKind};
use tracing::{debug, trace};

/// Maximum nesting of blocks, parentheses and subscripts.
pub const MAX_NESTING_DEPTH: usize = 128;

type Result<T> = std::result::Result<T, SyntaxError>;

/// Parse a token sequence into a `Program` node.
pub fn parse(toks: &[Tok]) -> Result<Node> {
    let mut p = Parser::new(toks);
    p.parse_program()
}

/// Tokenize with the default policy, then parse.
pub fn parse_str(src: &str) -> Result<Node> {
    parse(&tokenize(src))
}

pub fn parse_str_with(src: &str, opts: &LexOptions) -> std::result::Result<Node, Error> {
    let toks = tokenize_with(src, opts)?;
    Ok(parse(&toks)?)
}

struct Parser<'a> {
    toks: &'a [Tok],
    pos: usize,
    /// Returned once the cursor runs past the slice.
    eof: Tok,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(toks: &'a [Tok]) -> Self {
        let at = toks.last().map(|t| t.span.end).unwrap_or(0);
        Self {
            toks,
            pos: 0,
            eof: Tok::eof(at),
            depth: 0,
        }
    }

    fn cur(&self) -> &Tok {
        self.toks.get(self.pos).unwrap_or(&self.eof)
    }

    fn bump(&mut self) -> Tok {
        let t = self.cur().clone();
        if t.kind != TokKind::Eof {
            self.pos += 1;
        }
        t
    }

    fn at(&self, k: TokKind) -> bool {
        self.cur().kind == k
    }

    fn expect(&mut self, k: TokKind, what: &str) -> Result<Tok> {
        if self.at(k) {
            Ok(self.bump())
        } else {
            Err(self.expected(what))
        }
    }

    fn expected(&self, what: &str) -> SyntaxError {
        SyntaxError::Expected {
            expected: what.to_string(),
            found: self.cur().describe(),
            span: self.cur().span,
        }
    }

    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > MAX_NESTING_DEPTH {
            return Err(SyntaxError::NestingTooDeep {
                limit: MAX_NESTING_DEPTH,
                span: self.cur().span,
            });
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    // ======= program / statements =======

    fn parse_program(&mut self) -> Result<Node> {
        let mut stmts = Vec::new();
        while !self.at(TokKind::Eof) {
            stmts.push(self.parse_stmt()?);
        }
        debug!(statements = stmts.len(), "parsed program");
        Ok(Node::new(NodeKind::Program, self.cur().clone(), stmts))
    }

    fn parse_stmt(&mut self) -> Result<Node> {
        trace!(token = ?self.cur().kind, at = %self.cur().span, "statement");
        match self.cur().kind {
            TokKind::KwDeclare => self.parse_declaration(),
            TokKind::KwAssign => self.parse_assignment(),
            TokKind::KwPrint => self.parse_print(),
            TokKind::KwIf => self.parse_if(),
            TokKind::KwFor => self.parse_for(),
            TokKind::KwWhile => self.parse_while(),
            _ => Err(SyntaxError::UnexpectedToken {
                found: self.cur().describe(),
                span: self.cur().span,
            }),
        }
    }

    /// `Declare <id> As <type>` or `Declare <id> As Array Of <type>[<n>]...`
    fn parse_declaration(&mut self) -> Result<Node> {
        let kw = self.bump();
        let name = self.expect(TokKind::Ident, "identifier after `Declare`")?;
        self.expect(TokKind::KwAs, "`As`")?;

        let mut children = vec![Node::leaf(name)];
        if self.at(TokKind::KwArray) {
            children.push(Node::leaf(self.bump()));
            self.expect(TokKind::KwOf, "`Of` after `Array`")?;
            children.push(self.parse_type_name()?);
            // at least one dimension
            self.expect(TokKind::LBracket, "`[` with the array size")?;
            loop {
                children.push(self.parse_array_size()?);
                if !self.at(TokKind::LBracket) {
                    break;
                }
                self.bump();
            }
        } else {
            children.push(self.parse_type_name()?);
        }
        Ok(Node::new(NodeKind::Declaration, kw, children))
    }

    fn parse_type_name(&mut self) -> Result<Node> {
        match self.cur().kind {
            TokKind::KwInteger | TokKind::KwString | TokKind::Ident => {
                Ok(Node::leaf(self.bump()))
            }
            _ => Err(self.expected("a type name")),
        }
    }

    /// Size inside `[...]`, after the `[` has been consumed.
    fn parse_array_size(&mut self) -> Result<Node> {
        let size = match self.cur().kind {
            TokKind::Number | TokKind::Ident => self.bump(),
            _ => {
                return Err(SyntaxError::BadArraySize {
                    found: self.cur().describe(),
                    span: self.cur().span,
                })
            }
        };
        if !self.at(TokKind::RBracket) {
            return Err(SyntaxError::BadArraySize {
                found: self.cur().describe(),
                span: self.cur().span,
            });
        }
        self.bump();
        Ok(Node::leaf(size))
    }

    /// `Assign <target> = <expr>`
    fn parse_assignment(&mut self) -> Result<Node> {
        let kw = self.bump();
        if !self.at(TokKind::Ident) {
            return Err(self.expected("identifier after `Assign`"));
        }
        let target = self.parse_name()?;
        let eq = self.expect(TokKind::Eq, "`=`")?;
        let value = self.parse_expr()?;
        Ok(Node::new(
            NodeKind::Assignment,
            kw,
            vec![target, Node::leaf(eq), value],
        ))
    }

    /// `Print "<text>"` or `Print <expr>`
    fn parse_print(&mut self) -> Result<Node> {
        let kw = self.bump();
        let arg = if self.at(TokKind::Str) && self.binary_op_width(self.pos + 1).is_none() {
            Node::leaf(self.bump())
        } else {
            self.parse_expr()?
        };
        Ok(Node::new(NodeKind::Print, kw, vec![arg]))
    }

    /// `If <expr> Then <block> [Else <block>] End If`
    fn parse_if(&mut self) -> Result<Node> {
        let kw = self.bump();
        self.enter()?;
        let cond = self.parse_expr()?;
        let then_kw = self.expect(TokKind::KwThen, "`Then` after the `If` condition")?;
        let then_ = self.parse_block(then_kw, &[TokKind::KwElse, TokKind::KwEnd], "If", kw.span)?;
        let else_ = if self.at(TokKind::KwElse) {
            let else_kw = self.bump();
            self.parse_block(else_kw, &[TokKind::KwEnd], "If", kw.span)?
        } else {
            // the `End` that closes this If
            Node::new(NodeKind::Block, self.cur().clone(), Vec::new())
        };
        self.expect_end(TokKind::KwIf, "If", kw.span)?;
        self.leave();
        Ok(Node::new(NodeKind::IfStatement, kw, vec![cond, then_, else_]))
    }

    /// `For <id> = <expr> To <expr> Do <block> End For`
    fn parse_for(&mut self) -> Result<Node> {
        let kw = self.bump();
        self.enter()?;
        let var = self.expect(TokKind::Ident, "loop variable after `For`")?;
        let eq = self.expect(TokKind::Eq, "`=` after the loop variable")?;
        let start = self.parse_expr()?;
        let mut init = vec![Node::leaf(var.clone()), Node::leaf(eq)];
        init.extend(start.children);
        let init = Node::new(NodeKind::Expression, var, init);

        self.expect(TokKind::KwTo, "`To`")?;
        let bound = self.parse_expr()?;
        let do_kw = self.expect(TokKind::KwDo, "`Do` after the loop bound")?;
        let body = self.parse_block(do_kw, &[TokKind::KwEnd], "For", kw.span)?;
        self.expect_end(TokKind::KwFor, "For", kw.span)?;
        self.leave();
        Ok(Node::new(NodeKind::ForLoop, kw, vec![init, bound, body]))
    }

    /// `While <expr> Do <block> End While`
    fn parse_while(&mut self) -> Result<Node> {
        let kw = self.bump();
        self.enter()?;
        let cond = self.parse_expr()?;
        let do_kw = self.expect(TokKind::KwDo, "`Do` after the `While` condition")?;
        let body = self.parse_block(do_kw, &[TokKind::KwEnd], "While", kw.span)?;
        self.expect_end(TokKind::KwWhile, "While", kw.span)?;
        self.leave();
        Ok(Node::new(NodeKind::WhileLoop, kw, vec![cond, body]))
    }

    /// Statements up to (not including) one of `terms`.
    fn parse_block(
        &mut self,
        opener: Tok,
        terms: &[TokKind],
        construct: &'static str,
        open_span: Span,
    ) -> Result<Node> {
        let mut stmts = Vec::new();
        while !terms.contains(&self.cur().kind) {
            if self.at(TokKind::Eof) {
                return Err(SyntaxError::Unterminated {
                    construct,
                    span: open_span,
                });
            }
            stmts.push(self.parse_stmt()?);
        }
        Ok(Node::new(NodeKind::Block, opener, stmts))
    }

    fn expect_end(&mut self, closes: TokKind, construct: &'static str, open_span: Span) -> Result<()> {
        if !self.at(TokKind::KwEnd) {
            return Err(SyntaxError::Unterminated {
                construct,
                span: open_span,
            });
        }
        self.bump();
        if !self.at(closes) {
            return Err(self.expected(&format!("`{construct}` after `End`")));
        }
        self.bump();
        Ok(())
    }

    // ======= expressions =======
    //
    // Flat: operand (binop operand)*. No precedence; the leaves are
    // re-emitted in source order.

    fn parse_expr(&mut self) -> Result<Node> {
        let first = self.cur().clone();
        let mut leaves = Vec::new();
        self.parse_operand(&mut leaves)?;
        while let Some(op) = self.take_binary_op() {
            leaves.push(op);
            self.parse_operand(&mut leaves)?;
        }
        Ok(Node::new(NodeKind::Expression, first, leaves))
    }

    fn parse_operand(&mut self, leaves: &mut Vec<Node>) -> Result<()> {
        while matches!(self.cur().kind, TokKind::Minus | TokKind::Bang) {
            leaves.push(Node::leaf(self.bump()));
        }
        match self.cur().kind {
            TokKind::Number | TokKind::Str => leaves.push(Node::leaf(self.bump())),
            TokKind::Ident => leaves.push(self.parse_name()?),
            TokKind::LParen => {
                self.enter()?;
                leaves.push(Node::leaf(self.bump()));
                let inner = self.parse_expr()?;
                leaves.extend(inner.children);
                leaves.push(Node::leaf(self.expect(TokKind::RParen, "`)`")?));
                self.leave();
            }
            _ => return Err(self.expected("an expression")),
        }
        Ok(())
    }

    /// Identifier with optional `[<expr>]` subscripts stored as children.
    fn parse_name(&mut self) -> Result<Node> {
        let name = self.expect(TokKind::Ident, "identifier")?;
        let mut subscripts = Vec::new();
        while self.at(TokKind::LBracket) {
            self.enter()?;
            self.bump();
            subscripts.push(self.parse_expr()?);
            self.expect(TokKind::RBracket, "`]`")?;
            self.leave();
        }
        Ok(Node::new(NodeKind::Identifier, name, subscripts))
    }

    /// Number of tokens forming a binary operator at `idx`, if any.
    /// `==`, `<=`, `>=` and `!=` are two adjacent single-character tokens.
    fn binary_op_width(&self, idx: usize) -> Option<usize> {
        let t = self.toks.get(idx)?;
        let composable = matches!(
            t.kind,
            TokKind::Lt | TokKind::Gt | TokKind::Eq | TokKind::Bang
        );
        if composable {
            if let Some(next) = self.toks.get(idx + 1) {
                if next.kind == TokKind::Eq && t.span.touches(next.span) {
                    return Some(2);
                }
            }
        }
        match t.kind {
            TokKind::Plus
            | TokKind::Minus
            | TokKind::Star
            | TokKind::Slash
            | TokKind::Lt
            | TokKind::Gt
            | TokKind::Eq => Some(1),
            _ => None,
        }
    }

    fn take_binary_op(&mut self) -> Option<Node> {
        match self.binary_op_width(self.pos)? {
            2 => {
                let first = self.bump();
                let second = self.bump();
                Some(Node::leaf(Tok::new(
                    first.kind,
                    format!("{}{}", first.lexeme, second.lexeme),
                    first.span.to(second.span),
                )))
            }
            _ => Some(Node::leaf(self.bump())),
        }
    }
}
