//! Command-line argument parsing for `gzr`.
//!
//! The entry points are [`parse_args`] (reads `std::env::args_os()`) and
//! [`parse_args_from`] (takes an explicit iterator, suitable for tests).
//! Both return a [`ParsedArgs`] value holding the file-layer preferences,
//! the inputs and the requested display level.
//!
//! Short options may be aggregated (e.g. `-9kv`). When several level
//! options are given, the last one wins.

use std::ffi::OsString;

use anyhow::anyhow;
use clap::parser::ValueSource;
use clap::{ArgAction, ArgMatches, CommandFactory, FromArgMatches, Parser, ValueEnum};

use crate::cli::constants::DISPLAY_LEVEL_DEFAULT;
use crate::config::{CLEVEL_DEFAULT, CLEVEL_MAX, ENV_CLEVEL, GZ_SUFFIX_DEFAULT};
use crate::displaylevel;
use crate::frame::types::{Format, Strategy};
use crate::io::file_io::STDIN_MARK;
use crate::io::prefs::Prefs;

// ── clap surface ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Gzip,
    Zlib,
    Raw,
}

impl From<FormatArg> for Format {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Gzip => Format::Gzip,
            FormatArg::Zlib => Format::Zlib,
            FormatArg::Raw => Format::Raw,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    Default,
    Filtered,
    Huffman,
    Rle,
    Fixed,
}

impl From<StrategyArg> for Strategy {
    fn from(s: StrategyArg) -> Self {
        match s {
            StrategyArg::Default => Strategy::Default,
            StrategyArg::Filtered => Strategy::Filtered,
            StrategyArg::Huffman => Strategy::HuffmanOnly,
            StrategyArg::Rle => Strategy::Rle,
            StrategyArg::Fixed => Strategy::Fixed,
        }
    }
}

/// Raw clap view of the command line.
#[derive(Parser, Debug)]
#[command(
    name = "gzr",
    version,
    about = "Compress files into gzip, zlib or raw DEFLATE streams",
    after_help = "With no FILE, or when FILE is -, read standard input."
)]
pub struct Cli {
    /// Compress faster
    #[arg(short = '1', long = "fast", action = ArgAction::SetTrue)]
    pub level_1: bool,
    #[arg(short = '2', action = ArgAction::SetTrue, hide = true)]
    pub level_2: bool,
    #[arg(short = '3', action = ArgAction::SetTrue, hide = true)]
    pub level_3: bool,
    #[arg(short = '4', action = ArgAction::SetTrue, hide = true)]
    pub level_4: bool,
    #[arg(short = '5', action = ArgAction::SetTrue, hide = true)]
    pub level_5: bool,
    #[arg(short = '6', action = ArgAction::SetTrue, hide = true)]
    pub level_6: bool,
    #[arg(short = '7', action = ArgAction::SetTrue, hide = true)]
    pub level_7: bool,
    #[arg(short = '8', action = ArgAction::SetTrue, hide = true)]
    pub level_8: bool,
    /// Compress better
    #[arg(short = '9', long = "best", action = ArgAction::SetTrue)]
    pub level_9: bool,

    /// Compression level (0 = store only)
    #[arg(short = 'L', long = "level", value_name = "N",
          value_parser = clap::value_parser!(i32).range(0..=CLEVEL_MAX as i64))]
    pub level: Option<i32>,

    /// Write on standard output, keep original files
    #[arg(short = 'c', long = "stdout")]
    pub stdout: bool,

    /// Keep (don't delete) input files
    #[arg(short = 'k', long = "keep")]
    pub keep: bool,

    /// Force overwrite of output files and compression of suffixed inputs
    #[arg(short = 'f', long = "force")]
    pub force: bool,

    /// Do not save the original name and timestamp
    #[arg(short = 'n', long = "no-name", overrides_with = "name")]
    pub no_name: bool,

    /// Save the original name and timestamp (default)
    #[arg(short = 'N', long = "name", overrides_with = "no_name")]
    pub name: bool,

    /// Use suffix SUF on compressed files
    #[arg(short = 'S', long = "suffix", value_name = "SUF", default_value = GZ_SUFFIX_DEFAULT)]
    pub suffix: String,

    /// Operate recursively on directories
    #[arg(short = 'r', long = "recursive")]
    pub recursive: bool,

    /// Verbose mode (repeat for more)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    /// Suppress warnings (repeat to suppress errors)
    #[arg(short = 'q', long = "quiet", action = ArgAction::Count)]
    pub quiet: u8,

    /// Output framing
    #[arg(long = "format", value_enum, default_value_t = FormatArg::Gzip)]
    pub format: FormatArg,

    /// Match-finding strategy
    #[arg(long = "strategy", value_enum, default_value_t = StrategyArg::Default)]
    pub strategy: StrategyArg,

    /// Base-two log of the window size
    #[arg(long = "window-bits", value_name = "BITS", default_value_t = 15,
          value_parser = clap::value_parser!(i32).range(8..=15))]
    pub window_bits: i32,

    /// Memory used for matching state (1..=9)
    #[arg(long = "mem-level", value_name = "N", default_value_t = 8,
          value_parser = clap::value_parser!(i32).range(1..=9))]
    pub mem_level: i32,

    /// Files to compress
    #[arg(value_name = "FILE")]
    pub files: Vec<String>,
}

const LEVEL_FLAGS: [&str; 9] = [
    "level_1", "level_2", "level_3", "level_4", "level_5", "level_6", "level_7", "level_8",
    "level_9",
];

// ── Public output type ─────────────────────────────────────────────────────────

/// Everything the dispatch phase needs.
#[derive(Debug)]
pub struct ParsedArgs {
    pub prefs: Prefs,
    /// Input paths; `["-"]` when none were given.
    pub inputs: Vec<String>,
    /// Expand directory inputs.
    pub recursive: bool,
    /// Notification level after `-v` / `-q`.
    pub display_level: i32,
}

// ── Level selection ────────────────────────────────────────────────────────────

/// Default level from the `GZR_CLEVEL` environment variable.
pub fn init_c_level() -> i32 {
    init_c_level_from(std::env::var(ENV_CLEVEL).ok().as_deref())
}

/// Parse an optional `GZR_CLEVEL` value; anything outside 0..=9 falls back
/// to the built-in default with a warning.
pub fn init_c_level_from(env_val: Option<&str>) -> i32 {
    if let Some(env) = env_val {
        match env.trim().parse::<i32>() {
            Ok(level) if (0..=CLEVEL_MAX).contains(&level) => return level,
            _ => {
                displaylevel!(
                    2,
                    "Ignore environment variable setting {}={}: not a valid level \n",
                    ENV_CLEVEL,
                    env
                );
            }
        }
    }
    CLEVEL_DEFAULT
}

/// The level selected on the command line, if any: the option with the
/// highest argument index wins.
fn command_line_level(matches: &ArgMatches, cli: &Cli) -> Option<i32> {
    let mut best: Option<(usize, i32)> = None;
    let mut consider = |id: &str, level: i32| {
        if matches.value_source(id) != Some(ValueSource::CommandLine) {
            return;
        }
        if let Some(idx) = matches.indices_of(id).and_then(|i| i.last()) {
            if best.map_or(true, |(b, _)| idx > b) {
                best = Some((idx, level));
            }
        }
    };
    for (i, id) in LEVEL_FLAGS.iter().enumerate() {
        consider(id, i as i32 + 1);
    }
    if let Some(level) = cli.level {
        consider("level", level);
    }
    best.map(|(_, level)| level)
}

// ── Public API ─────────────────────────────────────────────────────────────────

/// Parse the process arguments.
pub fn parse_args() -> anyhow::Result<ParsedArgs> {
    parse_args_from(std::env::args_os())
}

/// Parse an explicit argument list (first item is the program name).
///
/// `--help` and `--version` come back as a [`clap::Error`] inside the
/// `anyhow::Error`; callers can downcast and call `exit()` on it.
pub fn parse_args_from<I, T>(argv: I) -> anyhow::Result<ParsedArgs>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = Cli::command().try_get_matches_from(argv)?;
    let cli = Cli::from_arg_matches(&matches)?;
    let level = command_line_level(&matches, &cli).unwrap_or_else(init_c_level);

    if cli.suffix.is_empty() && !cli.stdout {
        return Err(anyhow!("bad usage: --suffix must not be empty"));
    }

    let mut prefs = Prefs::default();
    prefs.set_level(level);
    prefs.set_strategy(cli.strategy.into());
    prefs.set_format(cli.format.into());
    prefs.set_window_bits(cli.window_bits);
    prefs.set_mem_level(cli.mem_level);
    prefs.set_keep_source(cli.keep || cli.stdout);
    prefs.set_overwrite(cli.force);
    prefs.set_to_stdout(cli.stdout);
    prefs.set_suffix(&cli.suffix);
    prefs.set_store_name(!cli.no_name);

    let inputs = if cli.files.is_empty() {
        vec![STDIN_MARK.to_owned()]
    } else {
        cli.files
    };

    Ok(ParsedArgs {
        prefs,
        inputs,
        recursive: cli.recursive,
        display_level: DISPLAY_LEVEL_DEFAULT + cli.verbose as i32 - cli.quiet as i32,
    })
}
