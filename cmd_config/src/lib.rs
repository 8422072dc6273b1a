//! Build-time configuration for the command engine.
//!
//! These constants are plugged into the engine's const-generic parameters by
//! the application layer. They are limits of the deployment, not invariants
//! of the algorithms; adjust them to the target's memory budget.

/// Maximum number of tokens per line (command name + arguments).
pub const MAX_TOKENS: usize = 8;

/// Maximum accepted input line length in bytes.
pub const MAX_LINE_LEN: usize = 256;

/// Byte budget for a single dispatch's decoded binary arguments, and the
/// upper bound on one string or binary argument.
pub const MAX_ARG_BYTES: usize = 64;

/// Prompt shown by the demo application.
pub const PROMPT: &str = "ce> ";
