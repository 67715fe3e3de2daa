//! CLI entry point for lsx

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;

use clap::error::ErrorKind;
use clap::parser::ValueSource;
use clap::{ArgAction, ArgMatches, CommandFactory, FromArgMatches, Parser, ValueEnum};
use log::debug;
use lsx::output::{DIAGNOSTIC_PREFIX, report};
use lsx::size::{self, SizeUnit};
use lsx::{
    DirMode, Lister, ListingOutput, Ordering, OutputConfig, Recursion, StreamingFormatter,
    TimeField, Visibility, WalkerConfig,
};

const USAGE: &str = "usage: lsx [-AacdFfhiklnqRrSstuw] [file ...]";

/// Color output mode
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum ColorMode {
    /// Auto-detect based on terminal and environment
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Determine whether to use color output based on mode and environment.
fn should_use_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => {
            // Respect NO_COLOR environment variable (https://no-color.org/)
            if std::env::var_os("NO_COLOR").is_some() {
                return false;
            }
            if std::env::var_os("FORCE_COLOR").is_some() {
                return true;
            }
            if std::env::var("TERM").map(|t| t == "dumb").unwrap_or(false) {
                return false;
            }
            std::io::stdout().is_terminal()
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "lsx")]
#[command(about = "List directory contents")]
#[command(version)]
#[command(disable_help_flag = true)]
#[command(args_override_self = true)]
struct Args {
    /// Files and directories to list (default: the current directory)
    #[arg(value_name = "FILE")]
    paths: Vec<PathBuf>,

    /// List all entries except . and ..
    #[arg(short = 'A')]
    almost_all: bool,

    /// Include entries whose names begin with a dot
    #[arg(short = 'a')]
    all: bool,

    /// Use the status change time for sorting and long listings
    #[arg(short = 'c')]
    changed: bool,

    /// List directories as plain files
    #[arg(short = 'd')]
    directory: bool,

    /// Append an indicator (one of */=@|%) to names
    #[arg(short = 'F')]
    indicators: bool,

    /// Do not sort; implies -a
    #[arg(short = 'f')]
    unsorted: bool,

    /// Human-readable sizes with -l and -s
    #[arg(short = 'h')]
    human: bool,

    /// Print each file's inode number
    #[arg(short = 'i')]
    inode: bool,

    /// Report block counts in kibibytes
    #[arg(short = 'k')]
    kibibytes: bool,

    /// Long format
    #[arg(short = 'l')]
    long: bool,

    /// Numeric user and group IDs; implies -l
    #[arg(short = 'n')]
    numeric: bool,

    /// Print non-printable name characters as ?
    #[arg(short = 'q')]
    escape: bool,

    /// List subdirectories recursively
    #[arg(short = 'R')]
    recursive: bool,

    /// Reverse the sort order
    #[arg(short = 'r')]
    reverse: bool,

    /// Sort by size, largest first
    #[arg(short = 'S')]
    by_size: bool,

    /// Print each file's block usage
    #[arg(short = 's')]
    blocks: bool,

    /// Sort by time, newest first
    #[arg(short = 't')]
    by_time: bool,

    /// Use the last access time for sorting and long listings
    #[arg(short = 'u')]
    accessed: bool,

    /// Print names raw
    #[arg(short = 'w')]
    raw: bool,

    /// Control color output: auto, always, never
    #[arg(long = "color", value_name = "WHEN", default_value = "auto")]
    color: ColorMode,

    /// Print help
    #[arg(long = "help", action = ArgAction::Help)]
    help: Option<bool>,
}

/// Position of the last occurrence of a flag given on the command line.
fn last_index(matches: &ArgMatches, id: &str) -> Option<usize> {
    if matches.value_source(id) != Some(ValueSource::CommandLine) {
        return None;
    }
    matches.indices_of(id).and_then(|indices| indices.last())
}

/// Of mutually overriding flags, the one given last.
fn last_of<'a>(matches: &ArgMatches, ids: &[&'a str]) -> Option<&'a str> {
    ids.iter()
        .filter_map(|id| last_index(matches, id).map(|index| (index, *id)))
        .max_by_key(|(index, _)| *index)
        .map(|(_, id)| id)
}

/// Block size from `BLOCKSIZE`, reporting values that had to be adjusted.
fn env_block_size() -> u64 {
    match std::env::var("BLOCKSIZE") {
        Ok(value) if !value.is_empty() => {
            let (block_size, problem) = size::parse_block_size(&value);
            if let Some(problem) = problem {
                report("BLOCKSIZE", &problem);
            }
            block_size
        }
        _ => size::NATIVE_BLOCK_SIZE,
    }
}

fn build_config(args: &Args, matches: &ArgMatches) -> (WalkerConfig, OutputConfig) {
    let visibility = if args.all || args.unsorted {
        Visibility::All
    } else if args.almost_all {
        Visibility::AlmostAll
    } else {
        Visibility::Default
    };

    let time_field = match last_of(matches, &["changed", "accessed"]) {
        Some("changed") => TimeField::Changed,
        Some("accessed") => TimeField::Accessed,
        _ => TimeField::Modified,
    };

    let ordering = if args.unsorted {
        Ordering::Native
    } else {
        let ordering = match last_of(matches, &["by_size", "by_time"]) {
            Some("by_size") => Ordering::size_desc(),
            Some("by_time") => Ordering::time_desc(time_field),
            _ => Ordering::name_asc(),
        };
        if args.reverse {
            ordering.reversed()
        } else {
            ordering
        }
    };

    let size_unit = match last_of(matches, &["human", "kibibytes"]) {
        Some("human") => SizeUnit::Human,
        Some("kibibytes") => SizeUnit::Kibibytes,
        _ => SizeUnit::Blocks(env_block_size()),
    };

    let long = args.long || args.numeric;

    let walker_config = WalkerConfig {
        visibility,
        ordering,
        recursion: if args.recursive && !args.directory {
            Recursion::Recursive
        } else {
            Recursion::Shallow
        },
        dir_mode: if args.directory {
            DirMode::ListItself
        } else {
            DirMode::ListContents
        },
        follow_root_links: !(long || args.directory || args.indicators),
    };

    let output_config = OutputConfig {
        use_color: should_use_color(args.color),
        long,
        inode: args.inode,
        blocks: args.blocks,
        size_unit,
        numeric_ids: args.numeric,
        indicators: args.indicators,
        raw_names: last_of(matches, &["escape", "raw"]) == Some("raw"),
        time_field,
    };

    (walker_config, output_config)
}

fn main() {
    pretty_env_logger::init_custom_env("LSX_LOG");

    let matches = match Args::command().try_get_matches() {
        Ok(matches) => matches,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => usage_error(&e.to_string()),
    };
    let args = Args::from_arg_matches(&matches).unwrap_or_else(|e| usage_error(&e.to_string()));

    let (walker_config, output_config) = build_config(&args, &matches);
    debug!("{:?}", walker_config);
    debug!("{:?}", output_config);

    let mut formatter = StreamingFormatter::new(output_config.use_color);
    let mut lister = Lister::new(walker_config, output_config);

    match lister.list(&args.paths, &mut formatter) {
        Ok(summary) => {
            debug!("{:?}", summary);
            if !summary.is_clean() {
                process::exit(1);
            }
        }
        Err(e) => {
            let _ = formatter.finish();
            eprintln!("{}: {}", DIAGNOSTIC_PREFIX, e);
            process::exit(1);
        }
    }
}

fn usage_error(message: &str) -> ! {
    let first = message.lines().next().unwrap_or_default();
    let first = first.strip_prefix("error: ").unwrap_or(first);
    eprintln!("{}: {}", DIAGNOSTIC_PREFIX, first);
    eprintln!("{}", USAGE);
    process::exit(1);
}
