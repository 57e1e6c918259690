//! File-level compression: preferences, file opening and the per-file
//! pipeline used by the CLI.

pub mod compress_file;
pub mod file_io;
pub mod prefs;

pub use prefs::{set_notification_level, Prefs, DISPLAY_LEVEL};

pub use file_io::{NUL_MARK, STDIN_MARK, STDOUT_MARK};

/// Compress a single file.
pub use compress_file::compress_filename;

/// Compress several files, appending a suffix to each name.
pub use compress_file::compress_multiple_filenames;

pub use compress_file::{compress_stream, dst_filename, CompressStats};
