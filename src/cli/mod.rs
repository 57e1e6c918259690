//! Command-line interface for the `gzr` binary.
//!
//! | Submodule     | Responsibility |
//! |---------------|---------------|
//! | [`constants`] | Program identity strings and the `displaylevel!` family of macros. |
//! | [`args`]      | clap definition, level selection and `GZR_CLEVEL`, producing [`args::ParsedArgs`]. |

pub mod args;
pub mod constants;
