use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use pseudo_emit::EmitOptions;
use pseudo_parse::{parse_str_with, tokenize_with, LexOptions};
use pseudo_cli::{init_logging, line_col, translate, TranslateOptions, MAX_SOURCE_SIZE};
use std::io::Read;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pseudoc")]
#[command(about = "Translate pseudocode programs into C++")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate a pseudocode file into a C++ program
    Translate {
        /// Path to the source file, or `-` for stdin
        file: String,

        /// Write the C++ program here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Fail on unrecognized characters instead of dropping them
        #[arg(long)]
        strict: bool,

        /// Spaces per indentation level
        #[arg(long, default_value_t = 4)]
        indent: usize,
    },

    /// Dump the token stream
    Tokens {
        /// Path to the source file, or `-` for stdin
        file: String,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Pretty)]
        format: Format,

        #[arg(long)]
        strict: bool,
    },

    /// Parse a source file and dump the AST
    Ast {
        /// Path to the source file, or `-` for stdin
        file: String,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Pretty)]
        format: Format,

        #[arg(long)]
        strict: bool,
    },
}

#[derive(ValueEnum, Clone, Debug)]
enum Format {
    Pretty,
    Json,
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Translate {
            file,
            output,
            strict,
            indent,
        } => cmd_translate(&file, output, strict, indent),

        Commands::Tokens {
            file,
            format,
            strict,
        } => cmd_tokens(&file, format, strict),

        Commands::Ast {
            file,
            format,
            strict,
        } => cmd_ast(&file, format, strict),
    }
}

fn lex_options(strict: bool) -> LexOptions {
    if strict {
        LexOptions::strict()
    } else {
        LexOptions::default()
    }
}

fn read_source(path: &str) -> Result<String> {
    let src = if path == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        buf
    } else {
        std::fs::read_to_string(path).with_context(|| format!("failed to read '{}'", path))?
    };

    if src.len() > MAX_SOURCE_SIZE {
        bail!(
            "source file exceeds {}MB limit ({} bytes)",
            MAX_SOURCE_SIZE / 1_000_000,
            src.len()
        );
    }
    Ok(src)
}

/// Prefix a pipeline error with `path:line:col`.
fn located(path: &str, src: &str, err: pseudo_parse::Error) -> anyhow::Error {
    let (line, col) = line_col(src, err.span().start);
    anyhow!("{}:{}:{}: {}", path, line, col, err)
}

fn cmd_translate(file: &str, output: Option<PathBuf>, strict: bool, indent: usize) -> Result<()> {
    let src = read_source(file)?;
    let opts = TranslateOptions {
        lex: lex_options(strict),
        emit: EmitOptions {
            indent_width: indent,
        },
    };
    let cpp = translate(&src, &opts).map_err(|e| located(file, &src, e))?;

    match output {
        Some(path) => std::fs::write(&path, cpp)
            .with_context(|| format!("failed to write '{}'", path.display()))?,
        None => print!("{}", cpp),
    }
    Ok(())
}

fn cmd_tokens(file: &str, format: Format, strict: bool) -> Result<()> {
    let src = read_source(file)?;
    let toks = tokenize_with(&src, &lex_options(strict))
        .map_err(|e| located(file, &src, e.into()))?;

    match format {
        Format::Pretty => {
            for t in &toks {
                println!(
                    "{:>5}..{:<5} {:<10} {:?}",
                    t.span.start,
                    t.span.end,
                    format!("{:?}", t.kind),
                    t.lexeme
                );
            }
        }
        Format::Json => println!("{}", serde_json::to_string_pretty(&toks)?),
    }
    Ok(())
}

fn cmd_ast(file: &str, format: Format, strict: bool) -> Result<()> {
    let src = read_source(file)?;
    let program = parse_str_with(&src, &lex_options(strict)).map_err(|e| located(file, &src, e))?;

    match format {
        Format::Pretty => println!("{:#?}", program),
        Format::Json => println!("{}", serde_json::to_string_pretty(&program)?),
    }
    Ok(())
}
