use argv_expand::{ExpandOptions, HostFs, expand_with, split};
use clap::Parser;
use std::ffi::OsString;
use std::io::{self, Write};
use std::os::unix::ffi::OsStrExt;
use std::process;
use tracing_subscriber::EnvFilter;

/// Filter directives for diagnostics, e.g. `ARGV_EXPAND_LOG=debug`.
const LOG_VAR: &str = "ARGV_EXPAND_LOG";

/// Expand `@file` response-file references and print one argument per line.
#[derive(Parser, Debug)]
#[command(name = "argv-expand", disable_version_flag = true)]
struct Cli {
    /// Print how TEXT is tokenized instead of expanding arguments.
    #[arg(long, value_name = "TEXT", allow_hyphen_values = true, conflicts_with = "args")]
    split: Option<OsString>,

    /// Arguments to expand; `@path` is replaced by the contents of `path`.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "ARGS")]
    args: Vec<OsString>,
}

fn init_tracing() {
    // Quiet unless asked, so a fatal error stays a single stderr line.
    let filter = EnvFilter::try_from_env(LOG_VAR).unwrap_or_else(|_| EnvFilter::new("error"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(false)
        .with_target(false)
        .init();
}

fn print_args<'a, I>(out: &mut impl Write, args: I) -> io::Result<()>
where
    I: IntoIterator<Item = &'a OsString>,
{
    for arg in args {
        out.write_all(arg.as_bytes())?;
        out.write_all(b"\n")?;
    }
    out.flush()
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if let Some(text) = cli.split {
        print_args(&mut out, &split(text.as_bytes()))?;
        return Ok(());
    }

    let program = std::env::args_os().next().unwrap_or_default();
    let mut args = Vec::with_capacity(cli.args.len() + 1);
    args.push(program);
    args.extend(cli.args);

    let options = ExpandOptions::from_env()?;
    let expanded = expand_with(&args, &HostFs, &options)?;
    print_args(&mut out, expanded.iter().skip(1))?;
    Ok(())
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{:#}", e);
        process::exit(1);
    }
}
