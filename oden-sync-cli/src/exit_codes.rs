//! Exit code constants for CLI commands
//!
//! - 0: Success
//! - 1: The operation ran but reported an error (authentication, repository, issue creation)
//! - 2: Configuration or startup failure

/// Successful execution
pub const EXIT_SUCCESS: i32 = 0;

/// The requested operation reported an error
pub const EXIT_WARNING: i32 = 1;

/// Configuration or startup failure
pub const EXIT_ERROR: i32 = 2;
