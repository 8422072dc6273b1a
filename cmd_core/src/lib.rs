//! # Command Engine
//!
//! A text-command dispatcher for constrained targets. A line such as
//! `"cat_bytes 010203 3"` is tokenized, resolved against a generated
//! signature table by the DJB2 hash of its first token, type-checked
//! argument by argument, and finally handed to the registered handler,
//! all on fixed-size stack buffers, with no heap allocation on the
//! dispatch path.
//!
//! ## Pipeline
//!
//! `dispatch_from_line` walks a fixed sequence of validation steps and
//! short-circuits on the first failure:
//!
//! 1. length gate (`LineTooLong`)
//! 2. tokenization (`TooManyTokens`)
//! 3. command resolution (`NoCommand`, `UnknownCommand`)
//! 4. arity check (`ArgCountMismatch`)
//! 5. typed argument parsing (`ArgParse`)
//! 6. handler invocation (`InvocationFailed`)
//!
//! ## Collaborators
//!
//! The signature table is produced offline (command name hashes, handler
//! shims, argument type lists) and consumed here read-only; it is injected
//! at construction, so tests can substitute their own tables. Handler shims
//! recover the concrete prototype from the typed argument array; the
//! dispatcher trusts them because steps 4–5 already enforced the shape.
//!
//! ## Preconditions
//!
//! Single caller, single in-flight dispatch. All per-call state lives on
//! the stack, but hosts driving the engine from several threads must
//! serialize calls themselves; the engine takes no locks on the dispatch
//! path. Failures are recorded in a bounded diagnostic ring (see
//! [`history`]) and, in diagnostic builds, emitted through the `log`
//! facade; production images can compile the text out with `log`'s
//! `release_max_level_off` feature.

pub mod dispatch;
pub mod hash;
pub mod history;
pub mod parser;
pub mod scratch;
pub mod table;
pub mod token;
pub mod types;

pub use dispatch::{DispatchError, Dispatcher};
pub use parser::ParseError;
pub use table::SignatureTable;
pub use token::TokenizeError;
pub use types::{ArgType, ArgValue, HandlerFn, Signature};
