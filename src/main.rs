use clap::{Parser, Subcommand};
use stack_debugger::config::{Config, DEFAULT_DUMP_BYTES, MAX_DUMP_WORDS};
use stack_debugger::debugger::{DebugContext, GdbSession};
use stack_debugger::{server, Result};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "stack-debugger", version, about = "Step a native program under gdb and dump its stack")]
struct Cli {
    /// More logging (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Debugger command line
    #[arg(long, env = "STACK_DEBUGGER_GDB", default_value = "gdb", global = true)]
    gdb: String,

    /// Symbol to break on before stepping
    #[arg(long, env = "STACK_DEBUGGER_ENTRY", default_value = "main", global = true)]
    entry: String,

    /// Disassembly flavor passed to gdb
    #[arg(long, default_value = "intel", global = true)]
    flavor: String,

    /// Upper bound on words per memory dump
    #[arg(long, default_value_t = MAX_DUMP_WORDS, global = true)]
    max_words: usize,

    /// Bytes to dump when the stack extent is unknown
    #[arg(long, default_value_t = DEFAULT_DUMP_BYTES, global = true)]
    default_bytes: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Capture one step and print it as JSON
    Step {
        executable: PathBuf,

        /// Instructions to execute after the entry breakpoint
        #[arg(short, long, default_value_t = 0)]
        steps: usize,

        #[arg(long)]
        pretty: bool,
    },
    /// Serve Content-Length framed JSON requests on stdin/stdout
    Serve,
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            gdb: self.gdb.clone(),
            entry: self.entry.clone(),
            disassembly_flavor: self.flavor.clone(),
            max_dump_words: self.max_words,
            default_dump_bytes: self.default_bytes,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    // stdout carries JSON, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let config = cli.config();
    let result = match cli.command {
        Commands::Step {
            executable,
            steps,
            pretty,
        } => run_step(config, &executable, steps, pretty),
        Commands::Serve => server::run_stdio(config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_step(config: Config, executable: &std::path::Path, steps: usize, pretty: bool) -> Result<()> {
    let runner = GdbSession::new(&config)?;
    let context = DebugContext::new(config, runner);
    let state = context.capture(executable, steps)?;

    let json = if pretty {
        serde_json::to_string_pretty(&state)?
    } else {
        serde_json::to_string(&state)?
    };
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", json)?;
    Ok(())
}
