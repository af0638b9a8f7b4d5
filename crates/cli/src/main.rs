//! `ddlsync`: declarative schema migration for MySQL, PostgreSQL, and SQL
//! Server.
//!
//! The desired schema comes from `--file` (first entry, `-` for stdin); the
//! current schema comes either from additional `--file` entries or from a
//! live database via an external driver. The engine prints, applies, or
//! exports depending on the flags.

mod error_presentation;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use ddlsync_core::{Action, CancelToken, Engine, FileDatabase, Mode, RunOptions, RunOutcome};

use error_presentation::{render_error, CliError, CliResult};

#[derive(Parser)]
#[command(name = "ddlsync", version, about = "Idempotent schema migration from declarative DDL")]
struct Cli {
    #[command(subcommand)]
    dialect: Dialect,
}

#[derive(Subcommand)]
enum Dialect {
    /// Target a MySQL schema.
    Mysql(RunArgs),
    /// Target a PostgreSQL schema.
    Postgres(RunArgs),
    /// Target a Microsoft SQL Server schema.
    Mssql(RunArgs),
}

#[derive(Args)]
struct RunArgs {
    /// Database to migrate; omit when --file provides the current schema.
    database: Option<String>,

    /// Schema SQL files: first is the desired schema (`-` = stdin),
    /// remaining entries are the current schema.
    #[arg(long = "file", value_name = "sql_file", default_values_os_t = vec![PathBuf::from("-")])]
    files: Vec<PathBuf>,

    /// Show the DDL without running it.
    #[arg(long)]
    dry_run: bool,

    /// Dump the current schema to stdout and exit.
    #[arg(long)]
    export: bool,

    /// Skip destructive changes such as DROP.
    #[arg(long)]
    skip_drop: bool,

    /// User name for the connection.
    #[arg(short = 'u', long, value_name = "user_name")]
    user: Option<String>,

    /// Password; overridden by the dialect's password environment variable.
    #[arg(short = 'p', long, value_name = "password")]
    password: Option<String>,

    /// Host to connect to.
    #[arg(long, value_name = "host_name")]
    host: Option<String>,

    /// Port for the connection.
    #[arg(short = 'P', long, value_name = "port_num")]
    port: Option<u16>,

    /// Unix socket file.
    #[arg(short = 'S', long, value_name = "socket")]
    socket: Option<String>,

    /// Verbose logging.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let (mode, args) = match cli.dialect {
        Dialect::Mysql(args) => (Mode::Mysql, args),
        Dialect::Postgres(args) => (Mode::Postgres, args),
        Dialect::Mssql(args) => (Mode::Mssql, args),
    };

    init_logging(args.verbose);

    match run(mode, args) {
        Ok(outcome) => {
            match outcome {
                RunOutcome::Applied(count) => {
                    if count == 0 {
                        println!("-- Nothing is modified --");
                    }
                }
                RunOutcome::DryRun(sql) => {
                    if sql.is_empty() {
                        println!("-- Nothing is modified --");
                    } else {
                        print!("{sql}");
                    }
                }
                RunOutcome::Export(sql) => print!("{sql}"),
            }
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("{}", render_error(error));
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn run(mode: Mode, args: RunArgs) -> CliResult<RunOutcome> {
    let (desired_file, current_files) = args
        .files
        .split_first()
        .expect("clap default guarantees at least one file");

    let desired_sql = read_input(desired_file)?;
    let _password = resolve_password(mode, args.password.as_deref());

    let mut database = if current_files.is_empty() {
        if args.database.is_none() {
            return Err(CliError::MissingCurrentSchema);
        }
        // Connectivity lives in external driver crates; this binary only
        // carries the file-backed implementation.
        return Err(CliError::NoDriver { mode });
    } else {
        FileDatabase::open(current_files)?
    };

    let options = RunOptions {
        action: if args.export {
            Action::Export
        } else if args.dry_run {
            Action::DryRun
        } else {
            Action::Apply
        },
        skip_drop: args.skip_drop,
    };

    let cancel = CancelToken::new();
    let outcome = Engine::new(mode).run(&mut database, &desired_sql, options, &cancel)?;
    ddlsync_core::Database::close(&mut database)?;
    Ok(outcome)
}

fn read_input(path: &PathBuf) -> CliResult<String> {
    if path.as_os_str() == "-" {
        use std::io::Read as _;
        let mut contents = String::new();
        std::io::stdin()
            .read_to_string(&mut contents)
            .map_err(|source| CliError::ReadFile {
                path: path.clone(),
                source,
            })?;
        return Ok(contents);
    }

    std::fs::read_to_string(path).map_err(|source| CliError::ReadFile {
        path: path.clone(),
        source,
    })
}

/// The dialect's password environment variable wins over `--password`.
fn resolve_password(mode: Mode, flag: Option<&str>) -> Option<String> {
    std::env::var(mode.rules().password_env)
        .ok()
        .or_else(|| flag.map(str::to_string))
}
