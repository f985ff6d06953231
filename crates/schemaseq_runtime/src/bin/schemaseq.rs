//! schemaseq CLI entry point.

use schemaseq_runtime::{Repl, Session, describe};
use schemaseq_sql::{ErrorPolicy, GrammarKind, ParserConfig};
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// CLI configuration parsed from arguments.
#[derive(Default)]
struct CliConfig {
    files: Vec<PathBuf>,
    grammar: GrammarKind,
    owner: Option<String>,
    production: Option<String>,
    skip_unsupported: bool,
    print_order: bool,
    batch_mode: bool,
    verbose: bool,
    show_help: bool,
    show_version: bool,
}

impl CliConfig {
    fn parser_config(&self) -> ParserConfig {
        let mut config = ParserConfig::default().with_grammar(self.grammar);
        if let Some(owner) = &self.owner {
            config = config.with_owner(owner.as_str());
        }
        if let Some(production) = &self.production {
            config = config.with_production(production.as_str());
        }
        if self.skip_unsupported {
            config = config.with_policy(ErrorPolicy::SkipUnsupported);
        }
        config
    }
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError: {e}\x1b[0m");
            ExitCode::FAILURE
        }
    }
}

fn value(args: &[String], i: usize, option: &str) -> Result<String, Box<dyn std::error::Error>> {
    args.get(i)
        .cloned()
        .ok_or_else(|| format!("{option} requires a value").into())
}

fn parse_args(args: Vec<String>) -> Result<CliConfig, Box<dyn std::error::Error>> {
    let mut config = CliConfig::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => config.show_help = true,
            "-V" | "--version" => config.show_version = true,
            "-b" | "--batch" => config.batch_mode = true,
            "-v" | "--verbose" => config.verbose = true,
            "--order" => config.print_order = true,
            "--skip-unsupported" => config.skip_unsupported = true,
            option @ ("-g" | "--grammar") => {
                i += 1;
                config.grammar = value(&args, i, option)?.parse()?;
            }
            option @ ("-o" | "--owner") => {
                i += 1;
                config.owner = Some(value(&args, i, option)?);
            }
            option @ ("-p" | "--production") => {
                i += 1;
                config.production = Some(value(&args, i, option)?);
            }
            arg if arg.starts_with('-') => {
                return Err(format!("unknown option: {arg}").into());
            }
            path => config.files.push(PathBuf::from(path)),
        }
        i += 1;
    }

    Ok(config)
}

/// Logs go to stderr. `SCHEMASEQ_LOG` overrides the level.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env("SCHEMASEQ_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: Vec<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = parse_args(args)?;

    if config.show_help {
        print_help();
        return Ok(());
    }

    if config.show_version {
        println!("schemaseq {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    init_logging(config.verbose);

    let session = Session::with_config(config.parser_config());
    let mut repl = Repl::new()?.with_session(session);

    for file in &config.files {
        for statement in repl.eval_file(file)? {
            println!("{}", describe(&statement));
        }
    }

    if config.print_order {
        println!("\x1b[1;36m=== Creation Order ===\x1b[0m");
        for (i, key) in repl.session().order()?.iter().enumerate() {
            println!("{:>4}. {key}", i + 1);
        }
    }

    if config.batch_mode {
        return Ok(());
    }

    // Files establish context, so skip the banner
    if !config.files.is_empty() {
        repl = repl.without_banner();
    }

    repl.run()?;
    Ok(())
}

fn print_help() {
    println!(
        "\x1b[1mschemaseq\x1b[0m - SQL/PL-SQL dependency analysis and creation ordering

\x1b[1mUSAGE:\x1b[0m
    schemaseq [OPTIONS] [FILES...]

\x1b[1mARGUMENTS:\x1b[0m
    [FILES...]    SQL scripts to parse before starting the REPL

\x1b[1mOPTIONS:\x1b[0m
    -h, --help              Print help information
    -V, --version           Print version information
    -b, --batch             Parse files and exit (no REPL)
    -g, --grammar NAME      Grammar to parse with: full (default) or structural
    -o, --owner NAME        Owner assumed for unqualified names
    -p, --production NAME   Start production (default: file)
    --skip-unsupported      Log and skip unsupported statements
    --order                 Print the creation order after parsing files
    -v, --verbose           Enable debug logging (SCHEMASEQ_LOG overrides)

\x1b[1mEXAMPLES:\x1b[0m
    schemaseq                              Start interactive REPL
    schemaseq -o scott schema.sql          Parse schema.sql as SCOTT, then start REPL
    schemaseq -b --order tables.sql views.sql
                                           Print the creation order and exit
    schemaseq -g structural -b big.sql     Parse headers only

\x1b[1mREPL COMMANDS:\x1b[0m
    \\order           Print the creation order so far
    \\owner [NAME]    Show or set the owner
    \\save PATH       Save owner and known objects
    \\load PATH       Restore owner and known objects
    \\help            Show help
    Ctrl+D           Exit REPL
    Ctrl+C           Cancel current input"
    );
}
