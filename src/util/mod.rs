//! Filesystem helpers used by the file layer and the CLI.
//!
//! - [`file_status`] - regular-file / directory checks, attribute copying
//! - [`file_list`] - recursive expansion of directory arguments

pub mod file_list;
pub mod file_status;

pub use file_list::create_file_list;
pub use file_status::{is_directory, is_reg_file, set_file_stat, FileStat};
