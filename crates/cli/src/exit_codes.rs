//! CLI Exit Code Registry
//!
//! Single source of truth for all CLI exit codes. Exit codes are part of the
//! shell contract — scripts rely on them.
//!
//! | Code | Meaning                                                      |
//! |------|--------------------------------------------------------------|
//! | 0    | Success                                                      |
//! | 2    | Usage error (bad arguments, missing file)                    |
//! | 3    | Invalid job config (TOML parse or validation failure)        |
//! | 4    | Runtime error (unreadable input, bad record, write failure)  |
//! | 5    | Incomplete search (budget exhausted; best-effort result was  |
//! |      | still written)                                               |

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// Job config failed to parse or validate.
pub const EXIT_INVALID_CONFIG: u8 = 3;

/// Runtime failure: unreadable input file, malformed record, output write.
pub const EXIT_RUNTIME: u8 = 4;

/// Search budget exhausted before the frontier was explored; the best-effort
/// result was still produced.
pub const EXIT_INCOMPLETE: u8 = 5;
