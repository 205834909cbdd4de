#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

mod commands;
mod logging;

use clap::Parser;
use esmpack_core::Config;
use miette::Result;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "esmpack")]
#[command(author, version, about = "Copy ES module graphs into a self-contained output tree", long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v for DEBUG, -vv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit JSON formatted output (stable, machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// Override the working directory
    #[arg(long, global = true, value_name = "PATH")]
    cwd: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Package the modules reachable from the entry points
    Package {
        /// Config file (defaults to esmpack.json in the working directory)
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,

        /// Repository root
        #[arg(long, value_name = "PATH")]
        root: Option<PathBuf>,

        /// Source folder, relative to the root
        #[arg(long, value_name = "DIR")]
        src: Option<PathBuf>,

        /// Destination folder, relative to the root
        #[arg(long, value_name = "DIR")]
        dest: Option<PathBuf>,

        /// Entry point, relative to the source folder (repeatable)
        #[arg(long = "entry", value_name = "FILE")]
        entries: Vec<String>,

        /// Map a specifier to a file (e.g., lib=vendor/lib.js)
        #[arg(long = "alias", value_name = "SPEC=PATH")]
        aliases: Vec<String>,

        /// Leave specifiers with this prefix untouched (repeatable)
        #[arg(long, value_name = "PREFIX")]
        skip: Vec<String>,

        /// Shorten destination paths (e.g., node_modules/foo/dist=foo)
        #[arg(long, value_name = "PATTERN=REPLACEMENT")]
        simplify: Vec<String>,

        /// package.json field naming the ESM entry file
        #[arg(long, value_name = "FIELD")]
        entry_field: Option<String>,
    },

    /// Print version information
    Version {
        /// Repository to read the commit from (defaults to the working directory)
        #[arg(long, value_name = "PATH")]
        repo: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Determine working directory
    let cwd = cli
        .cwd
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));

    let config = Config::new(cwd)
        .with_verbosity(cli.verbose)
        .with_json_logs(cli.json);

    logging::init(config.verbosity, config.json_logs);

    match cli.command {
        Commands::Package {
            config: config_file,
            root,
            src,
            dest,
            entries,
            aliases,
            skip,
            simplify,
            entry_field,
        } => {
            let action = commands::package::PackageAction {
                cwd: config.cwd.clone(),
                config: config_file,
                root,
                src,
                dest,
                entries,
                aliases,
                skip,
                simplify,
                entry_field,
            };
            commands::package::run(action, cli.json)
        }
        Commands::Version { repo } => {
            let repo = repo.map_or_else(|| config.cwd.clone(), |r| config.cwd.join(r));
            commands::version::run(&repo)
        }
    }
}
