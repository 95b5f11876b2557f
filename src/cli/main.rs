//! # sqlweave CLI
//!
//! Compiles a single template given on the command line, or runs an
//! interactive shell when no template is given.

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use sqlweave::{skip, tokenize, CompileOptions, Compiler, NumericMode, Value};

#[derive(Debug, Parser)]
#[command(name = "sqlweave", version, about = "Compile typed-placeholder SQL templates")]
struct Cli {
    /// Template to compile. Starts the interactive shell when omitted.
    template: Option<String>,

    /// Arguments as a JSON array. `{"$skip": true}` stands for skip().
    #[arg(default_value = "[]")]
    args: String,

    /// Fail on non-numeric input to ?d / ?f instead of coercing it.
    #[arg(long)]
    strict_numbers: bool,

    /// Quote identifiers without checking them.
    #[arg(long)]
    no_identifier_check: bool,

    /// Print the token stream instead of compiling.
    #[arg(long)]
    tokens: bool,

    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut options = CompileOptions::from_env();
    if cli.strict_numbers {
        options = options.with_numeric(NumericMode::Strict);
    }
    if cli.no_identifier_check {
        options = options.with_identifier_check(false);
    }
    tracing::debug!(?options, "resolved compile options");

    match &cli.template {
        Some(template) => {
            if cli.tokens {
                print_tokens(template);
                return ExitCode::SUCCESS;
            }
            match run_once(&Compiler::new(options), template, &cli.args) {
                Ok(sql) => {
                    println!("{sql}");
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("Error: {e}");
                    ExitCode::FAILURE
                }
            }
        }
        None => {
            Shell::new(options, cli.tokens).run();
            ExitCode::SUCCESS
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "sqlweave=debug" } else { "sqlweave=info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn run_once(compiler: &Compiler, template: &str, args: &str) -> Result<String, String> {
    let args = parse_args(args)?;
    compiler.compile(template, &args).map_err(|e| e.to_string())
}

/// Parses a JSON array into template arguments.
fn parse_args(json: &str) -> Result<Vec<Value>, String> {
    let parsed: serde_json::Value =
        serde_json::from_str(json).map_err(|e| format!("invalid JSON arguments: {e}"))?;
    match parsed {
        serde_json::Value::Array(items) => Ok(items.into_iter().map(json_arg).collect()),
        _ => Err("arguments must be a JSON array".to_string()),
    }
}

fn json_arg(json: serde_json::Value) -> Value {
    if let serde_json::Value::Object(map) = &json {
        if map.len() == 1 && map.get("$skip") == Some(&serde_json::Value::Bool(true)) {
            return skip();
        }
    }
    Value::from(json)
}

fn print_tokens(template: &str) {
    for token in tokenize(template) {
        println!("{token:?}");
    }
}

// ---------------------------------------------------------------------------
// Interactive shell
// ---------------------------------------------------------------------------

struct Shell {
    options: CompileOptions,
    show_tokens: bool,
    args: Vec<Value>,
}

impl Shell {
    fn new(options: CompileOptions, show_tokens: bool) -> Self {
        Shell {
            options,
            show_tokens,
            args: Vec::new(),
        }
    }

    fn run(&mut self) {
        println!("sqlweave v{}", env!("CARGO_PKG_VERSION"));
        println!("Enter \".help\" for usage hints.");

        let stdin = io::stdin();
        let mut stdout = io::stdout();

        loop {
            print!("sqlweave> ");
            if stdout.flush().is_err() {
                break;
            }

            let mut line = String::new();
            match stdin.lock().read_line(&mut line) {
                Ok(0) => break, // EOF
                Ok(_) => {}
                Err(_) => break,
            }

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            if trimmed.starts_with('.') {
                if !self.handle_dot_command(trimmed) {
                    break;
                }
                continue;
            }

            self.compile(trimmed);
        }

        println!();
    }

    fn compile(&self, template: &str) {
        if self.show_tokens {
            print_tokens(template);
        }
        match Compiler::new(self.options).compile(template, &self.args) {
            Ok(sql) => println!("{sql}"),
            Err(e) => eprintln!("Error: {e}"),
        }
    }

    /// Returns `false` when the shell should exit.
    fn handle_dot_command(&mut self, cmd: &str) -> bool {
        let (command, rest) = match cmd.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (cmd, ""),
        };

        match command.to_lowercase().as_str() {
            ".help" => {
                println!(".help              Show this help");
                println!(".args JSON         Set arguments for the next templates");
                println!(".strict on|off     Strict numeric parsing for ?d / ?f");
                println!(".tokens on|off     Print the token stream before compiling");
                println!(".quit              Exit this program");
                println!(".exit              Exit this program");
                println!("Any other line is compiled as a template.");
            }
            ".args" => match parse_args(rest) {
                Ok(args) => {
                    println!("({} argument(s))", args.len());
                    self.args = args;
                }
                Err(e) => eprintln!("Error: {e}"),
            },
            ".strict" => match parse_switch(rest) {
                Some(on) => {
                    let mode = if on { NumericMode::Strict } else { NumericMode::Loose };
                    self.options = self.options.with_numeric(mode);
                }
                None => eprintln!("Usage: .strict on|off"),
            },
            ".tokens" => match parse_switch(rest) {
                Some(on) => self.show_tokens = on,
                None => eprintln!("Usage: .tokens on|off"),
            },
            ".quit" | ".exit" => return false,
            _ => {
                eprintln!("Error: unknown command: {command}");
                eprintln!("Use .help for a list of commands.");
            }
        }
        true
    }
}

fn parse_switch(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "on" => Some(true),
        "off" => Some(false),
        _ => None,
    }
}
