//! Pipeline entry points shared by the `pseudoc` binary and its tests.

use pseudo_emit::{emit_with, EmitOptions};
use pseudo_parse::{parse_str_with, Error, LexOptions};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// Maximum source file size in bytes (1MB)
pub const MAX_SOURCE_SIZE: usize = 1_000_000;

#[derive(Debug, Clone, Copy, Default)]
pub struct TranslateOptions {
    pub lex: LexOptions,
    pub emit: EmitOptions,
}

/// Source text to C++ text. Nothing is produced unless every stage succeeds.
pub fn translate(src: &str, opts: &TranslateOptions) -> Result<String, Error> {
    let program = parse_str_with(src, &opts.lex)?;
    let out = emit_with(&program, &opts.emit);
    info!(
        statements = program.children.len(),
        bytes = out.len(),
        "translated"
    );
    Ok(out)
}

/// 1-based line and column of a byte offset.
pub fn line_col(src: &str, offset: u32) -> (usize, usize) {
    let offset = (offset as usize).min(src.len());
    let before = src.get(..offset).unwrap_or(src);
    let line = before.matches('\n').count() + 1;
    let col = before.rsplit('\n').next().map_or(0, |l| l.chars().count()) + 1;
    (line, col)
}

/// Initialize logging to stderr.
///
/// Use `RUST_LOG` to override the default filter (`warn`).
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
