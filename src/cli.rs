//! Command-line interface for treeroute.
//!
//! Two subcommands: `inspect` runs the registration pipeline against a
//! routes directory (handlers resolved with [`EchoLoader`]) and prints the
//! committed table, and `dev` runs a command under the dev watcher.

use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use clap::{Parser, Subcommand};

use crate::inspector;
use crate::loader::EchoLoader;
use crate::registrar::{register_routes, HostServer, RegisterOptions, RouteRecord};
use crate::watcher::{DevWatcher, WatcherConfig};

#[derive(Parser)]
#[command(name = "treeroute")]
#[command(about = "Filesystem-convention HTTP route registration", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve a routes directory and print the committed route table
    Inspect {
        /// Routes root directory
        #[arg(short, long)]
        routes: PathBuf,

        /// Prefix prepended to every URL pattern
        #[arg(long, default_value = "")]
        prefix: String,

        /// Abort on ambiguous routes instead of dropping the later one
        #[arg(long, default_value_t = false)]
        strict: bool,

        /// Middleware directory (default: middleware/ next to the routes root)
        #[arg(long)]
        middleware: Option<PathBuf>,

        /// Emit the report as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Run a command under the dev watcher, restarting it on file changes
    Dev {
        /// Entry command for the hosted process
        entry: PathBuf,

        /// Paths to observe recursively
        #[arg(short, long, default_value = ".")]
        watch: Vec<PathBuf>,

        /// Glob patterns that never trigger a restart
        #[arg(long)]
        ignore: Vec<String>,

        /// Debounce window in milliseconds
        #[arg(long, default_value_t = 150)]
        debounce_ms: u64,

        /// Log every observed change event
        #[arg(short, long, default_value_t = false)]
        verbose: bool,

        /// Arguments passed to the hosted process
        #[arg(last = true)]
        args: Vec<String>,
    },
}

/// Sink host for inspection: the pipeline runs in full, nothing serves.
struct NullServer;

impl HostServer for NullServer {
    fn mount(&mut self, _record: RouteRecord) {}
}

pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Inspect {
            routes,
            prefix,
            strict,
            middleware,
            json,
        } => {
            let options = RegisterOptions {
                prefix,
                strict,
                middleware_dir: middleware,
            };
            let mut server = NullServer;
            let table = register_routes(&mut server, &routes, &options, &EchoLoader)?;
            if json {
                let report = inspector::report(&table);
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                inspector::dump(&table);
            }
            Ok(())
        }
        Commands::Dev {
            entry,
            watch,
            ignore,
            debounce_ms,
            verbose,
            args,
        } => {
            let config = WatcherConfig {
                entry,
                args,
                watch,
                ignore,
                debounce: Duration::from_millis(debounce_ms),
                verbose,
                env: Vec::new(),
            };
            let mut watcher = DevWatcher::new(config);
            watcher.start()?;
            // The watcher owns everything from here; run until the process
            // is interrupted.
            loop {
                thread::sleep(Duration::from_secs(3600));
            }
        }
    }
}
