//! Exit codes for the `ctrf` binary.
//! These are part of the public contract; scripts branch on them.

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_WRITE_FAILED: i32 = 1; // Report could not be written
pub const EXIT_INPUT_ERROR: i32 = 2; // Unreadable input or config
