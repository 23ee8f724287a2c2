//! C++ emission.
//!
//! Walks a `Program` tree produced by `pseudo-parse` and writes a complete
//! C++ program: a fixed prelude, the translated statements inside `main`,
//! and `return 0;`. Emission never fails; trees that do not have the shapes
//! the parser produces are skipped node by node.

#![forbid(unsafe_code)]
#![warn(clippy::dbg_macro, clippy::todo, clippy::unimplemented)]

use pseudo_ast::ast::{Node, NodeKind};
use pseudo_ast::token::TokKind;
use tracing::{debug, warn};

const PRELUDE: &str = "#include <bits/stdc++.h>\nusing namespace std;\n\nint main() {\n\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmitOptions {
    /// Spaces per nesting level. Cosmetic only.
    pub indent_width: usize,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self { indent_width: 4 }
    }
}

/// Emit with default options.
pub fn emit(root: &Node) -> String {
    emit_with(root, &EmitOptions::default())
}

pub fn emit_with(root: &Node, opts: &EmitOptions) -> String {
    let mut e = Emitter {
        opts: *opts,
        out: String::from(PRELUDE),
        depth: 1,
    };
    e.stmt(root);
    e.out.push('\n');
    e.line("return 0;");
    e.out.push_str("}\n");
    debug!(bytes = e.out.len(), "emitted");
    e.out
}

/// Target spelling of a pseudocode type name. Unknown names pass through.
pub fn map_type(name: &str) -> &str {
    match name {
        "Integer" => "int",
        "String" => "string",
        other => other,
    }
}

struct Emitter {
    opts: EmitOptions,
    out: String,
    depth: usize,
}

impl Emitter {
    fn line(&mut self, text: &str) {
        for _ in 0..self.depth * self.opts.indent_width {
            self.out.push(' ');
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn nested(&mut self, block: &Node) {
        self.depth += 1;
        self.stmt(block);
        self.depth -= 1;
    }

    fn stmt(&mut self, node: &Node) {
        match (node.kind, node.children.as_slice()) {
            (NodeKind::Program | NodeKind::Block, stmts) => {
                for s in stmts {
                    self.stmt(s);
                }
            }
            (NodeKind::Declaration, [name, ty]) => {
                let line = format!("{} {};", map_type(ty.lexeme()), name.lexeme());
                self.line(&line);
            }
            (NodeKind::Declaration, [name, _array, elem, dims @ ..]) if node.is_array_declaration() => {
                let mut line = format!("{} {}", map_type(elem.lexeme()), name.lexeme());
                for d in dims {
                    line.push('[');
                    line.push_str(d.lexeme());
                    line.push(']');
                }
                line.push(';');
                self.line(&line);
            }
            (NodeKind::Assignment, [target, _eq, value]) => {
                let line = format!("{} = {} ;", operand(target), expr(value));
                self.line(&line);
            }
            (NodeKind::Print, [arg]) => {
                let shown = if arg.kind == NodeKind::Expression && arg.children.len() > 1 {
                    format!("( {} )", expr(arg))
                } else {
                    expr(arg)
                };
                let line = format!("cout << {shown} << endl;");
                self.line(&line);
            }
            (NodeKind::IfStatement, [cond, then_, else_]) => {
                let head = format!("if ( {} ) {{", expr(cond));
                self.line(&head);
                self.nested(then_);
                self.line("}");
                self.line("else {");
                self.nested(else_);
                self.line("}");
            }
            (NodeKind::ForLoop, [init, bound, body]) => {
                let var = init.children.first().map(|v| v.lexeme()).unwrap_or_default();
                let head = format!(
                    "for (int {} ; {var} <= {} ; {var}++) {{",
                    expr(init),
                    expr(bound)
                );
                self.line(&head);
                self.nested(body);
                self.line("}");
            }
            (NodeKind::WhileLoop, [cond, body]) => {
                let head = format!("while ( {} ) {{", expr(cond));
                self.line(&head);
                self.nested(body);
                self.line("}");
            }
            (kind, children) => {
                warn!(?kind, children = children.len(), "skipping malformed node");
            }
        }
    }
}

/// Expression leaves re-joined with single spaces, in source order.
fn expr(node: &Node) -> String {
    match node.kind {
        NodeKind::Expression => node
            .children
            .iter()
            .map(operand)
            .collect::<Vec<_>>()
            .join(" "),
        _ => operand(node),
    }
}

/// A single leaf: string literals are re-quoted, subscripts appended.
fn operand(leaf: &Node) -> String {
    let mut s = if leaf.token.kind == TokKind::Str {
        format!("\"{}\"", leaf.lexeme())
    } else {
        leaf.lexeme().to_string()
    };
    for index in &leaf.children {
        s.push('[');
        s.push_str(&expr(index));
        s.push(']');
    }
    s
}
