// config.rs - Compile-time configuration constants.
//
// Runtime knobs live in `frame::types::Config` (library) and `io::Prefs`
// (file layer); the values below are the defaults both start from.

// Default compression level.
// Can be overridden by the GZR_CLEVEL environment variable at runtime,
// or by the -# command-line flag.
pub const CLEVEL_DEFAULT: i32 = 6;

// Highest selectable compression level.
pub const CLEVEL_MAX: i32 = 9;

// Default base-two logarithm of the history window (32 KiB).
pub const WINDOW_BITS_DEFAULT: i32 = 15;

// Smallest and largest accepted window sizes.
pub const WINDOW_BITS_MIN: i32 = 8;
pub const WINDOW_BITS_MAX: i32 = 15;

// Default memory level: hash table of 2^(8+7) heads, 16 Ki symbol buffer.
pub const MEM_LEVEL_DEFAULT: i32 = 8;

pub const MEM_LEVEL_MAX: i32 = 9;

// Suffix appended to compressed file names.
pub const GZ_SUFFIX_DEFAULT: &str = ".gz";

// Read size used by the file layer when streaming a source file.
pub const IO_BLOCK_SIZE: usize = 64 * 1024;

// Environment variable consulted for the default CLI level.
pub const ENV_CLEVEL: &str = "GZR_CLEVEL";
