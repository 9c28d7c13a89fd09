use clap::Parser;
use colored::Colorize;
use quizmd::cli::{run_convert, ConvertOptions};
use quizmd::diagnostics::LogLevel;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "quizmd")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Convert Markdown quiz files to a structured quiz graph", long_about = None)]
struct Cli {
    /// Input Markdown file
    input: PathBuf,

    /// Output file or directory (default: input with .json extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// External YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Logging level
    #[arg(long, value_name = "LEVEL", default_value = "info",
          value_parser = ["debug", "info", "warning", "error"])]
    log_level: String,

    /// Log file path (default: next to the output)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Disable console log output
    #[arg(long)]
    no_console_log: bool,
}

fn main() {
    let cli = Cli::parse();

    let log_level = cli
        .log_level
        .parse::<LogLevel>()
        .unwrap_or(LogLevel::Info);

    let options = ConvertOptions {
        input: cli.input,
        output: cli.output,
        config: cli.config,
        log_level,
        log_file: cli.log_file,
        no_console_log: cli.no_console_log,
    };

    match run_convert(&options) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            process::exit(1);
        }
    }
}
