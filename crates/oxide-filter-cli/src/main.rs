//! oxide-filter CLI
//!
//! Compiles filter expressions into SQL `WHERE` fragments.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

use oxide_filter::{
    CompileError, CompileOptions, CompiledFilter, Compiler, DialectId, LiteralMode, Span,
    UnknownFunctions,
};

/// Compile filter expressions into dialect-correct SQL.
#[derive(Parser, Debug)]
#[command(name = "oxide-filter")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Filter expressions to compile.
    #[arg(required = true)]
    expressions: Vec<String>,

    /// Target dialect (postgres, mysql, generic).
    #[arg(short, long, env = "OXIDE_FILTER_DIALECT", default_value = "postgres")]
    dialect: DialectId,

    /// JSON file holding compile options.
    #[arg(short, long, env = "OXIDE_FILTER_CONFIG")]
    config: Option<PathBuf>,

    /// Maximum expression nesting depth.
    #[arg(long, env = "OXIDE_FILTER_MAX_DEPTH")]
    max_depth: Option<usize>,

    /// Maximum expression tree height.
    #[arg(long, env = "OXIDE_FILTER_MAX_HEIGHT")]
    max_height: Option<usize>,

    /// Emit extracted literals as `?` placeholders instead of inlining them.
    #[arg(long, env = "OXIDE_FILTER_BIND")]
    bind: bool,

    /// Reject functions the dialect does not map.
    #[arg(long, env = "OXIDE_FILTER_STRICT_FUNCTIONS")]
    strict_functions: bool,

    /// Print one JSON document per expression.
    #[arg(long)]
    json: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Loads the options file, if any, then applies explicit flags on top.
    fn options(&self) -> anyhow::Result<CompileOptions> {
        let mut options = match &self.config {
            Some(path) => load_options(path)?,
            None => CompileOptions::default(),
        };
        if let Some(max_depth) = self.max_depth {
            options.max_depth = max_depth;
        }
        if let Some(max_height) = self.max_height {
            options.max_height = max_height;
        }
        if self.bind {
            options.literals = LiteralMode::Bind;
        }
        if self.strict_functions {
            options.unknown_functions = UnknownFunctions::Reject;
        }
        Ok(options)
    }
}

fn load_options(path: &Path) -> anyhow::Result<CompileOptions> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let options = serde_json::from_str(&text)
        .with_context(|| format!("invalid config file {}", path.display()))?;
    Ok(options)
}

/// Renders `expression` with a caret line under `span`.
fn underline(expression: &str, span: Span) -> String {
    let start = expression[..span.start.min(expression.len())].chars().count();
    let width = if span.is_empty() {
        1
    } else {
        expression
            .get(span.start..span.end)
            .map_or(1, |s| s.chars().count())
    };
    format!("  {expression}\n  {}{}", " ".repeat(start), "^".repeat(width))
}

fn print_filter(filter: &CompiledFilter, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string(filter)?);
        return Ok(());
    }
    println!("{}", filter.sql);
    for (i, param) in filter.params.iter().enumerate() {
        println!("  @p{i} = {param:?}");
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let options = cli.options()?;
    debug!(dialect = %cli.dialect, ?options, "compiler configured");
    let compiler = Compiler::new(cli.dialect).with_options(options);

    for expression in &cli.expressions {
        match compiler.compile(expression) {
            Ok(filter) => print_filter(&filter, cli.json)?,
            Err(CompileError::Syntax(err)) => {
                if cli.json {
                    println!("{}", serde_json::json!({ "error": &err }));
                }
                eprintln!("{}", underline(expression, err.span));
                return Err(CompileError::Syntax(err))
                    .with_context(|| format!("failed to compile `{expression}`"));
            }
            Err(err) => {
                return Err(err).with_context(|| format!("failed to compile `{expression}`"));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("oxide-filter").chain(args.iter().copied()))
            .expect("valid arguments")
    }

    #[test]
    fn test_defaults() {
        let cli = cli(&["a = 1"]);
        assert_eq!(cli.dialect, DialectId::Postgres);
        assert_eq!(cli.options().unwrap(), CompileOptions::default());
    }

    #[test]
    fn test_dialect_flag() {
        assert_eq!(cli(&["-d", "mariadb", "a = 1"]).dialect, DialectId::MySql);
        assert!(Cli::try_parse_from(["oxide-filter", "--dialect", "oracle", "a"]).is_err());
    }

    #[test]
    fn test_flags_override_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"max_depth": 16, "literals": "inline", "unknown_functions": "reject"}}"#
        )
        .unwrap();
        let path = file.path().to_str().unwrap();

        let options = cli(&["--config", path, "a = 1"]).options().unwrap();
        assert_eq!(options.max_depth, 16);
        assert_eq!(options.literals, LiteralMode::Inline);
        assert_eq!(options.unknown_functions, UnknownFunctions::Reject);

        let options = cli(&[
            "--config",
            path,
            "--bind",
            "--max-depth",
            "4",
            "--max-height",
            "64",
            "a = 1",
        ])
        .options()
        .unwrap();
        assert_eq!(options.max_depth, 4);
        assert_eq!(options.max_height, 64);
        assert_eq!(options.literals, LiteralMode::Bind);
    }

    #[test]
    fn test_invalid_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"max_depth": "deep"}}"#).unwrap();
        let err = load_options(file.path()).unwrap_err();
        assert!(err.to_string().starts_with("invalid config file"));
        assert!(load_options(Path::new("/nonexistent/oxide-filter.json")).is_err());
    }

    #[test]
    fn test_underline() {
        assert_eq!(underline("a = b)", Span::new(5, 6)), "  a = b)\n       ^");
        assert_eq!(underline("a AND", Span::point(5)), "  a AND\n       ^");
        assert_eq!(underline("(a) = é", Span::new(0, 3)), "  (a) = é\n  ^^^");
    }
}
