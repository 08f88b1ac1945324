mod repl;
mod runner;

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;

use ember_lang_core::trace::{LogTracer, NoopTracer, TraceSink};
use tracing_subscriber::filter::LevelFilter;

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Source file to run. Without a path or `--eval` the REPL is started.
    path: Option<PathBuf>,
    /// Evaluate SOURCE instead of reading a file.
    #[arg(short, long, value_name = "SOURCE", conflicts_with = "path")]
    eval: Option<String>,
    /// Log every token, statement and evaluated node.
    #[arg(long)]
    trace: bool,
    /// Log level used when RUST_LOG is not set.
    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    log_level: LogLevel,
}

/// Installs the global subscriber. `RUST_LOG` takes precedence over
/// `--log-level`; `--trace` always enables trace output.
fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let mut filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from(cli.log_level).into())
        .from_env_lossy();
    if cli.trace {
        filter = filter.add_directive(LevelFilter::TRACE.into());
    }
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_level(true),
        )
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    let mut tracer: Box<dyn TraceSink> = if cli.trace {
        Box::new(LogTracer)
    } else {
        Box::new(NoopTracer)
    };

    let outcome = match (cli.eval, cli.path) {
        (Some(source), _) => Ok(runner::execute(&source, tracer.as_mut())),
        (None, Some(path)) => runner::execute_file(&path, tracer.as_mut()),
        (None, None) => repl::start(tracer).map(|()| ExitCode::SUCCESS),
    };

    match outcome {
        Ok(code) => code,
        Err(error) => {
            tracing::error!(%error, "runner failed");
            eprintln!("ember: {}", error);
            ExitCode::FAILURE
        }
    }
}
