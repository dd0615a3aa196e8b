//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract: scripts rely on them.
//!
//! | Code | Meaning                                                  |
//! |------|----------------------------------------------------------|
//! | 0    | Success                                                  |
//! | 1    | General error (unspecified)                              |
//! | 2    | CLI usage error (bad args, unknown strategy)             |
//! | 3    | Input error (unreadable file, malformed JSON/CSV)        |
//! | 4    | Invalid match config                                     |
//! | 5    | Invalid records (empty id, duplicate id, bad price)      |
//! | 6    | Price conflicts found (`--fail-on-conflict`)             |
//! | 7    | Comparison table empty (`--fail-on-empty`)               |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into [`recon_exit_code`] or the command that raises it

use shopmatch_recon::ReconError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// Input file could not be read or parsed into records.
pub const EXIT_INPUT: u8 = 3;

/// Match config failed to parse or validate.
pub const EXIT_INVALID_CONFIG: u8 = 4;

/// A record broke the input contract.
pub const EXIT_INVALID_RECORDS: u8 = 5;

/// At least one matched pair has a price conflict.
/// Only raised with `--fail-on-conflict`.
pub const EXIT_CONFLICTS: u8 = 6;

/// Both inputs were empty, so the table has no rows.
/// Only raised with `--fail-on-empty`.
pub const EXIT_EMPTY: u8 = 7;

/// Map an engine error to its exit code.
pub fn recon_exit_code(err: &ReconError) -> u8 {
    match err {
        ReconError::ConfigParse(_) | ReconError::ConfigValidation { .. } => EXIT_INVALID_CONFIG,
        ReconError::InputParse { .. } | ReconError::MissingColumn { .. } => EXIT_INPUT,
        ReconError::Validation { .. } => EXIT_INVALID_RECORDS,
    }
}
