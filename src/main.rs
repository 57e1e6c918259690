//! Binary entry point for the `gzr` command-line tool.
//!
//! 1. [`parse_args`] builds a [`ParsedArgs`] value (clap).
//! 2. [`run`] expands directories, checks stdin/stdout, and dispatches to
//!    the file layer. It returns the process exit code.

use std::io::IsTerminal;

use gzr::cli::args::{parse_args, ParsedArgs};
use gzr::cli::constants::{display_level, set_display_level, AUTHOR, COMPRESSOR_NAME};
use gzr::io::{compress_filename, compress_multiple_filenames, STDIN_MARK, STDOUT_MARK};

fn run(args: ParsedArgs) -> anyhow::Result<i32> {
    let ParsedArgs {
        prefs,
        mut inputs,
        recursive,
        display_level: level,
    } = args;
    set_display_level(level);

    gzr::displaylevel!(
        3,
        "*** {} v{} {}-bit, by {} ***\n",
        COMPRESSOR_NAME,
        gzr::GZR_VERSION_STRING,
        std::mem::size_of::<*const ()>() * 8,
        AUTHOR
    );

    // ── Recursive directory expansion ─────────────────────────────────────
    #[cfg(feature = "recursive")]
    if recursive {
        use std::path::Path;
        let paths: Vec<&Path> = inputs.iter().map(|s| Path::new(s.as_str())).collect();
        let list = gzr::util::create_file_list(&paths)?;
        for (u, p) in list.iter().enumerate() {
            gzr::displaylevel!(4, "{} {}\n", u, p.display());
        }
        inputs = list
            .into_iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect();
    }
    #[cfg(not(feature = "recursive"))]
    if recursive {
        gzr::displaylevel!(2, "warning: this executable was built without recursive support\n");
    }

    if inputs.is_empty() {
        anyhow::bail!("no input files");
    }

    let reads_stdin = inputs.iter().any(|s| s == STDIN_MARK);
    let writes_stdout = prefs.to_stdout || reads_stdin;

    // ── Refuse console output ─────────────────────────────────────────────
    if writes_stdout && std::io::stdout().is_terminal() && !prefs.overwrite {
        anyhow::bail!("compressed data not written to a terminal. Use -f to force compression.");
    }

    // ── Quieter defaults when results would interleave with data ─────────
    if (writes_stdout || inputs.len() > 1) && display_level() == 2 {
        set_display_level(1);
    }

    // ── Dispatch ──────────────────────────────────────────────────────────
    if inputs.len() == 1 {
        let src = inputs[0].as_str();
        let dst = gzr::io::dst_filename(src, &prefs.suffix, &prefs);
        if dst != STDOUT_MARK {
            gzr::displaylevel!(3, "Compressed filename will be : {} \n", dst);
        }
        compress_filename(src, &dst, &prefs)?;
        return Ok(0);
    }

    let srcs: Vec<&str> = inputs.iter().map(|s| s.as_str()).collect();
    let missed = compress_multiple_filenames(&srcs, &prefs.suffix, &prefs)?;
    Ok(if missed == 0 { 0 } else { 1 })
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    let args = match parse_args() {
        Ok(a) => a,
        Err(e) => match e.downcast::<clap::Error>() {
            Ok(clap_err) if clap_err.use_stderr() => {
                let _ = clap_err.print();
                std::process::exit(1);
            }
            // --help and --version
            Ok(clap_err) => clap_err.exit(),
            Err(e) => {
                eprintln!("{}: {:#}", COMPRESSOR_NAME, e);
                std::process::exit(1);
            }
        },
    };

    let exit_code = match run(args) {
        Ok(code) => code,
        Err(e) => {
            gzr::displaylevel!(1, "{}: {:#}\n", COMPRESSOR_NAME, e);
            1
        }
    };
    std::process::exit(exit_code);
}
