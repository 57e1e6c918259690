// Command-line parsing (src/cli/args.rs).

use gzr::cli::args::{init_c_level_from, parse_args_from, ParsedArgs};
use gzr::{Format, Strategy};

fn parse(args: &[&str]) -> ParsedArgs {
    let mut argv = vec!["gzr"];
    argv.extend_from_slice(args);
    parse_args_from(argv).unwrap()
}

fn parse_err(args: &[&str]) -> anyhow::Error {
    let mut argv = vec!["gzr"];
    argv.extend_from_slice(args);
    parse_args_from(argv).unwrap_err()
}

// ─────────────────────────────────────────────────────────────────────────────
// Levels
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn numeric_level_flags() {
    for n in 1..=9 {
        let flag = format!("-{}", n);
        assert_eq!(parse(&[&flag, "f"]).prefs.level, n);
    }
}

#[test]
fn long_level_aliases() {
    assert_eq!(parse(&["--fast", "f"]).prefs.level, 1);
    assert_eq!(parse(&["--best", "f"]).prefs.level, 9);
    assert_eq!(parse(&["--level", "0", "f"]).prefs.level, 0);
    assert_eq!(parse(&["-L", "4", "f"]).prefs.level, 4);
}

#[test]
fn last_level_wins() {
    assert_eq!(parse(&["-9", "-1", "f"]).prefs.level, 1);
    assert_eq!(parse(&["-1", "-9", "f"]).prefs.level, 9);
    assert_eq!(parse(&["-L", "2", "--best", "f"]).prefs.level, 9);
    assert_eq!(parse(&["--best", "-L", "2", "f"]).prefs.level, 2);
}

#[test]
fn level_out_of_range_is_rejected() {
    let err = parse_err(&["-L", "10", "f"]);
    assert!(err.downcast_ref::<clap::Error>().is_some());
}

#[test]
fn aggregated_short_flags() {
    let p = parse(&["-9kv", "f"]);
    assert_eq!(p.prefs.level, 9);
    assert!(p.prefs.keep_source);
    assert_eq!(p.display_level, 3);
}

#[test]
fn env_level() {
    assert_eq!(init_c_level_from(None), 6);
    assert_eq!(init_c_level_from(Some("3")), 3);
    assert_eq!(init_c_level_from(Some(" 9 ")), 9);
    assert_eq!(init_c_level_from(Some("10")), 6);
    assert_eq!(init_c_level_from(Some("fast")), 6);
}

// ─────────────────────────────────────────────────────────────────────────────
// File-handling flags
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn stdout_implies_keep() {
    let p = parse(&["-c", "f"]);
    assert!(p.prefs.to_stdout);
    assert!(p.prefs.keep_source);
}

#[test]
fn force_and_keep() {
    let p = parse(&["-f", "-k", "f"]);
    assert!(p.prefs.overwrite);
    assert!(p.prefs.keep_source);
    assert!(!p.prefs.to_stdout);
}

#[test]
fn name_flags_override_each_other() {
    assert!(!parse(&["-n", "f"]).prefs.store_name);
    assert!(parse(&["-n", "-N", "f"]).prefs.store_name);
    assert!(!parse(&["-N", "-n", "f"]).prefs.store_name);
}

#[test]
fn custom_suffix() {
    assert_eq!(parse(&["-S", ".z", "f"]).prefs.suffix, ".z");
    assert_eq!(parse(&["--suffix=.gzip", "f"]).prefs.suffix, ".gzip");
}

#[test]
fn empty_suffix_needs_stdout() {
    assert!(parse_args_from(["gzr", "-S", "", "f"]).is_err());
    assert_eq!(parse(&["-c", "-S", "", "f"]).prefs.suffix, "");
}

#[test]
fn recursive_flag_and_inputs() {
    let p = parse(&["-r", "dir", "file"]);
    assert!(p.recursive);
    assert_eq!(p.inputs, vec!["dir", "file"]);
}

// ─────────────────────────────────────────────────────────────────────────────
// Engine options
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn format_and_strategy() {
    let p = parse(&["--format", "zlib", "--strategy", "huffman", "f"]);
    assert_eq!(p.prefs.format, Format::Zlib);
    assert_eq!(p.prefs.strategy, Strategy::HuffmanOnly);
    assert_eq!(parse(&["--format=raw", "f"]).prefs.format, Format::Raw);
    assert_eq!(parse(&["--strategy=fixed", "f"]).prefs.strategy, Strategy::Fixed);
}

#[test]
fn window_and_memory() {
    let p = parse(&["--window-bits", "10", "--mem-level", "3", "f"]);
    assert_eq!(p.prefs.window_bits, 10);
    assert_eq!(p.prefs.mem_level, 3);
    assert!(parse_args_from(["gzr", "--window-bits", "16", "f"]).is_err());
    assert!(parse_args_from(["gzr", "--mem-level", "0", "f"]).is_err());
}

#[test]
fn unknown_format_is_rejected() {
    assert!(parse_args_from(["gzr", "--format", "lzma", "f"]).is_err());
}

// ─────────────────────────────────────────────────────────────────────────────
// Verbosity
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn verbosity_counts() {
    assert_eq!(parse(&["-vv", "f"]).display_level, 4);
    assert_eq!(parse(&["-q", "f"]).display_level, 1);
    assert_eq!(parse(&["-qq", "f"]).display_level, 0);
    assert_eq!(parse(&["-v", "-q", "f"]).display_level, 2);
}

#[test]
fn help_and_version_are_clap_errors() {
    for flag in ["--help", "--version"] {
        let err = parse_err(&[flag]);
        let clap_err = err.downcast_ref::<clap::Error>().unwrap();
        assert!(!clap_err.use_stderr());
    }
}
