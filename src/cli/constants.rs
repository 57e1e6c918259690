// cli/constants.rs - program identity strings and the display macros.

pub const COMPRESSOR_NAME: &str = "gzr";
pub const AUTHOR: &str = "the gzr authors";

/// Welcome line shown at notification level 3 and above.
pub const WELCOME_MESSAGE_FMT: &str = "*** {} v{} {}-bit, by {} ***\n";

/// Level written at `-v` count 0 and `-q` count 0.
pub const DISPLAY_LEVEL_DEFAULT: i32 = 2;

/// Returns the current display level.
#[inline]
pub fn display_level() -> i32 {
    crate::io::prefs::notification_level()
}

/// Sets the display level, clamped to 0..=4.
#[inline]
pub fn set_display_level(level: i32) -> i32 {
    crate::io::prefs::set_notification_level(level.clamp(0, 4))
}

/// Print to stdout.
#[macro_export]
macro_rules! displayout {
    ($($arg:tt)*) => { print!($($arg)*) };
}

/// Print to stderr.
#[macro_export]
macro_rules! display {
    ($($arg:tt)*) => { eprint!($($arg)*) };
}

/// Print to stderr when the notification level is at least `level`.
#[macro_export]
macro_rules! displaylevel {
    ($level:expr, $($arg:tt)*) => {
        if $crate::io::prefs::notification_level() >= $level {
            eprint!($($arg)*);
        }
    };
}
