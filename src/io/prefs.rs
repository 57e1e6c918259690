// prefs.rs - file-compression preferences and the notification level.
//
// - `DISPLAY_LEVEL` is a process-wide `AtomicI32` read by the `displaylevel!`
//   macro and by `display_level`.
// - `Prefs` is a plain value type; setters take `&mut self` and return the
//   value actually stored.

use std::sync::atomic::{AtomicI32, Ordering};

use crate::config::{
    CLEVEL_DEFAULT, CLEVEL_MAX, GZ_SUFFIX_DEFAULT, IO_BLOCK_SIZE, MEM_LEVEL_DEFAULT, MEM_LEVEL_MAX,
    WINDOW_BITS_DEFAULT, WINDOW_BITS_MAX, WINDOW_BITS_MIN,
};
use crate::frame::types::{Config, Format, GzHeader, Strategy, OS_UNIX, OS_UNKNOWN};

pub const KB: usize = 1 << 10;
pub const MB: usize = 1 << 20;

// ---------------------------------------------------------------------------
// Display / notification level
// ---------------------------------------------------------------------------

/// Global notification level. 0 = silent, 1 = errors only, 2 = results +
/// warnings, 3 = progress, 4+ = verbose.
pub static DISPLAY_LEVEL: AtomicI32 = AtomicI32::new(2);

pub fn set_notification_level(level: i32) -> i32 {
    DISPLAY_LEVEL.store(level, Ordering::Relaxed);
    level
}

#[inline]
pub fn notification_level() -> i32 {
    DISPLAY_LEVEL.load(Ordering::Relaxed)
}

/// Write `msg` to stderr if the current notification level is ≥ `level`.
/// Flushes stderr when level ≥ 4.
#[inline]
pub fn display_level(level: i32, msg: &str) {
    if notification_level() >= level {
        eprint!("{}", msg);
        if notification_level() >= 4 {
            use std::io::Write;
            let _ = std::io::stderr().flush();
        }
    }
}

// ---------------------------------------------------------------------------
// Preferences
// ---------------------------------------------------------------------------

/// Everything the file layer needs to compress one or more files.
#[derive(Clone, Debug)]
pub struct Prefs {
    /// Compression level 0..=9. Default: 6.
    pub level: i32,
    pub strategy: Strategy,
    /// Output framing. Default: gzip.
    pub format: Format,
    /// Window size (8..=15). Default: 15.
    pub window_bits: i32,
    /// Hash/symbol memory (1..=9). Default: 8.
    pub mem_level: i32,
    /// Keep the source file after success. Default: false.
    pub keep_source: bool,
    /// Overwrite existing destination files. Default: false.
    pub overwrite: bool,
    /// Write everything to stdout. Default: false.
    pub to_stdout: bool,
    /// Suffix appended to output names. Default: ".gz".
    pub suffix: String,
    /// Store the source name and mtime in the gzip header. Default: true.
    pub store_name: bool,
    /// Read size per compression call. Default: 64 KiB.
    pub block_size: usize,
}

impl Default for Prefs {
    fn default() -> Self {
        Prefs {
            level: CLEVEL_DEFAULT,
            strategy: Strategy::Default,
            format: Format::Gzip,
            window_bits: WINDOW_BITS_DEFAULT,
            mem_level: MEM_LEVEL_DEFAULT,
            keep_source: false,
            overwrite: false,
            to_stdout: false,
            suffix: GZ_SUFFIX_DEFAULT.to_owned(),
            store_name: true,
            block_size: IO_BLOCK_SIZE,
        }
    }
}

impl Prefs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the level, clamped to 0..=9. Returns the stored value.
    pub fn set_level(&mut self, level: i32) -> i32 {
        self.level = level.clamp(0, CLEVEL_MAX);
        self.level
    }

    pub fn set_strategy(&mut self, strategy: Strategy) -> Strategy {
        self.strategy = strategy;
        strategy
    }

    pub fn set_format(&mut self, format: Format) -> Format {
        self.format = format;
        format
    }

    /// Sets the window size, clamped to 8..=15.
    pub fn set_window_bits(&mut self, bits: i32) -> i32 {
        self.window_bits = bits.clamp(WINDOW_BITS_MIN, WINDOW_BITS_MAX);
        self.window_bits
    }

    /// Sets the memory level, clamped to 1..=9.
    pub fn set_mem_level(&mut self, mem_level: i32) -> i32 {
        self.mem_level = mem_level.clamp(1, MEM_LEVEL_MAX);
        self.mem_level
    }

    pub fn set_keep_source(&mut self, yes: bool) -> bool {
        self.keep_source = yes;
        yes
    }

    pub fn set_overwrite(&mut self, yes: bool) -> bool {
        self.overwrite = yes;
        yes
    }

    pub fn set_to_stdout(&mut self, yes: bool) -> bool {
        self.to_stdout = yes;
        yes
    }

    pub fn set_suffix(&mut self, suffix: &str) -> &str {
        self.suffix = suffix.to_owned();
        &self.suffix
    }

    pub fn set_store_name(&mut self, yes: bool) -> bool {
        self.store_name = yes;
        yes
    }

    /// Sets the read size, clamped to [1 KiB, 16 MiB].
    pub fn set_block_size(&mut self, block_size: usize) -> usize {
        self.block_size = block_size.clamp(KB, 16 * MB);
        self.block_size
    }

    /// Stream configuration for one file. `name` and `mtime` are stored only
    /// when `store_name` is set and the output is gzip.
    pub fn stream_config(&self, name: Option<&str>, mtime: u32) -> Config {
        let mut header = GzHeader::default().with_os(if cfg!(unix) { OS_UNIX } else { OS_UNKNOWN });
        if self.store_name {
            if let Some(name) = name {
                header = header.with_name(name).with_mtime(mtime);
            }
        }
        Config::default()
            .with_level(self.level)
            .with_strategy(self.strategy)
            .with_format(self.format)
            .with_window_bits(self.window_bits)
            .with_mem_level(self.mem_level)
            .with_header(header)
    }
}
