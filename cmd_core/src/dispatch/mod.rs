//! Runtime command dispatcher.
//!
//! Orchestrates the full pipeline for one input line: length gate,
//! tokenization, hash lookup, arity validation, per-argument typed
//! parsing, and handler invocation. Each step either passes the line on
//! or fails the whole call with a specific cause; no later step runs
//! after a failure.

use heapless::Vec;
use thiserror::Error;

use crate::hash;
use crate::history::Source;
use crate::log_err;
use crate::parser::{self, ParseError};
use crate::scratch::Scratch;
use crate::table::SignatureTable;
use crate::token;
use crate::types::{ArgType, ArgValue, Signature};

/// Why a dispatch call failed.
///
/// All variants are local and recoverable; the caller may re-prompt or
/// re-send. Variants borrowing from the input line carry the offending
/// token for diagnostics.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DispatchError<'line> {
    /// Input longer than the configured line limit.
    #[error("input line of {len} bytes exceeds the limit")]
    LineTooLong { len: usize },
    /// More tokens than the configured capacity.
    #[error("too many tokens")]
    TooManyTokens,
    /// The line was empty or all whitespace.
    #[error("no command token found")]
    NoCommand,
    /// No table entry matches the command-name hash.
    #[error("unknown command '{name}' (hash=0x{hash:08X})")]
    UnknownCommand { name: &'line str, hash: u32 },
    /// Token count minus the command name disagrees with the signature.
    #[error("argument count mismatch (got {got}, expected {expected})")]
    ArgCountMismatch { got: usize, expected: u8 },
    /// The signature itself violates the dispatcher's contract: it
    /// declares more arguments than the token capacity can carry, or its
    /// count and type list disagree. A generator or caller defect, not a
    /// user input error.
    #[error("signature declares {declared} arguments, capacity is {capacity}")]
    InvalidSignature { declared: usize, capacity: usize },
    /// One argument token failed its declared type's parser.
    #[error("argument {index} is not a valid {expected:?} (token: '{token}'): {source}")]
    ArgParse {
        index: usize,
        expected: ArgType,
        token: &'line str,
        source: ParseError,
    },
    /// The handler ran and reported failure.
    #[error("handler reported failure")]
    InvocationFailed,
}

/// Line dispatcher over an injected signature table.
///
/// Const parameters fix the deployment limits:
/// - `MT`: maximum tokens per line (command name + arguments),
/// - `ML`: maximum input line length in bytes,
/// - `MB`: scratch budget for decoded binary arguments, which also bounds
///   a single string argument.
///
/// The dispatcher keeps no per-call state in `self`; token list, argument
/// array, and scratch arena live on the stack of each call and are gone
/// when it returns. Calls must be serialized by the host: single caller,
/// single in-flight dispatch.
pub struct Dispatcher<'t, const MT: usize, const ML: usize, const MB: usize> {
    table: SignatureTable<'t>,
}

impl<'t, const MT: usize, const ML: usize, const MB: usize> Dispatcher<'t, MT, ML, MB> {
    /// Build a dispatcher over a generated signature table.
    pub const fn new(entries: &'t [Signature]) -> Self {
        Self { table: SignatureTable::new(entries) }
    }

    /// The injected table.
    pub const fn table(&self) -> SignatureTable<'t> {
        self.table
    }

    /// Parse a command line and invoke the matching handler.
    ///
    /// On success the handler ran exactly once with arguments matching its
    /// declared signature. On failure no handler was invoked, except for
    /// [`DispatchError::InvocationFailed`] where the handler itself
    /// reported the failure.
    pub fn dispatch_from_line<'line>(&self, line: &'line str) -> Result<(), DispatchError<'line>> {
        if line.len() > ML {
            log_err!(Source::Dispatch, "input line truncated ({} > {} bytes)", line.len(), ML);
            return Err(DispatchError::LineTooLong { len: line.len() });
        }

        let tokens = token::tokenize::<MT>(line).map_err(|_| {
            log_err!(Source::Dispatch, "too many tokens, maximum allowed is {}", MT);
            DispatchError::TooManyTokens
        })?;

        let Some(&name) = tokens.first() else {
            log_err!(Source::Dispatch, "no command token found");
            return Err(DispatchError::NoCommand);
        };

        let digest = hash::djb2(name);
        let Some(sig) = self.table.lookup(digest) else {
            log_err!(Source::Dispatch, "unknown command '{}' (hash=0x{:08X})", name, digest);
            return Err(DispatchError::UnknownCommand { name, hash: digest });
        };

        Self::validate_argument_count(tokens.len(), sig)?;

        let mut scratch_buf = [0u8; MB];
        let mut scratch = Scratch::new(&mut scratch_buf);
        let args = Self::parse_arguments(sig, &tokens[1..], &mut scratch)?;

        if (sig.handler)(&args) {
            Ok(())
        } else {
            log_err!(Source::Dispatch, "handler for '{}' reported failure", name);
            Err(DispatchError::InvocationFailed)
        }
    }

    /// Check that the token count matches the signature's declared arity.
    fn validate_argument_count<'line>(
        token_count: usize,
        sig: &Signature,
    ) -> Result<(), DispatchError<'line>> {
        let got = token_count.saturating_sub(1);
        if got != sig.arg_count as usize {
            log_err!(
                Source::Dispatch,
                "argument count mismatch (got {}, expected {})",
                got,
                sig.arg_count
            );
            return Err(DispatchError::ArgCountMismatch { got, expected: sig.arg_count });
        }
        Ok(())
    }

    /// Convert argument tokens into typed values per the signature.
    ///
    /// The signature is sanity-checked before any token is consumed: its
    /// declared count must fit the token capacity (minus the command name)
    /// and agree with its type list. The first parser failure aborts the
    /// whole parse.
    fn parse_arguments<'line, 'a>(
        sig: &Signature,
        arg_tokens: &[&'line str],
        scratch: &mut Scratch<'a>,
    ) -> Result<Vec<ArgValue<'a>, MT>, DispatchError<'line>>
    where
        'line: 'a,
    {
        let declared = sig.arg_count as usize;
        let capacity = MT.saturating_sub(1);
        if declared > capacity || declared != sig.types.len() {
            log_err!(
                Source::Dispatch,
                "defective signature: {} declared arguments, capacity {}",
                declared,
                capacity
            );
            return Err(DispatchError::InvalidSignature { declared, capacity });
        }

        let mut args: Vec<ArgValue<'a>, MT> = Vec::new();
        for (index, (&expected, &token)) in sig.types.iter().zip(arg_tokens).enumerate() {
            let value = Self::parse_value(expected, token, scratch).map_err(|source| {
                log_err!(
                    Source::Dispatch,
                    "failed to parse argument {} as {:?} (token: '{}')",
                    index,
                    expected,
                    token
                );
                DispatchError::ArgParse { index, expected, token, source }
            })?;
            // capacity was checked above; the push cannot fail
            let _ = args.push(value);
        }
        Ok(args)
    }

    /// Parse one token under one declared type.
    fn parse_value<'a>(
        expected: ArgType,
        token: &'a str,
        scratch: &mut Scratch<'a>,
    ) -> Result<ArgValue<'a>, ParseError> {
        match expected {
            ArgType::U8 => parser::parse_u8(token).map(ArgValue::U8),
            ArgType::U16 => parser::parse_u16(token).map(ArgValue::U16),
            ArgType::U32 => parser::parse_u32(token).map(ArgValue::U32),
            ArgType::U64 => parser::parse_u64(token).map(ArgValue::U64),
            ArgType::I8 => parser::parse_i8(token).map(ArgValue::I8),
            ArgType::I16 => parser::parse_i16(token).map(ArgValue::I16),
            ArgType::I32 => parser::parse_i32(token).map(ArgValue::I32),
            ArgType::I64 => parser::parse_i64(token).map(ArgValue::I64),
            ArgType::Bool => parser::parse_bool(token).map(ArgValue::Bool),
            ArgType::Str => {
                if token.len() > MB {
                    return Err(ParseError::TokenTooLong);
                }
                Ok(ArgValue::Str(token))
            }
            ArgType::Bytes => scratch.decode_hex(token).map(ArgValue::Bytes),
        }
    }
}

// ==================== TESTS =======================

#[cfg(test)]
mod dispatch_tests {
    use super::*;
    use crate::hash::djb2;
    use std::string::String;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Mutex, MutexGuard};
    use std::vec::Vec as StdVec;

    // ==================== CAPTURE STATE ====================

    // The demo handlers write into shared state, so end-to-end tests are
    // serialized through this lock (the engine itself is single-caller).
    static LOCK: Mutex<()> = Mutex::new(());

    static CALLS: AtomicUsize = AtomicUsize::new(0);
    static VOID_CALLED: AtomicUsize = AtomicUsize::new(0);
    static LAST_BYTE: AtomicUsize = AtomicUsize::new(usize::MAX);
    static LAST_STRING: Mutex<String> = Mutex::new(String::new());
    static LAST_BYTES: Mutex<StdVec<u8>> = Mutex::new(StdVec::new());

    struct MixedCapture {
        blob1: StdVec<u8>,
        blob2: StdVec<u8>,
        s1: String,
        s2: String,
        blob3: StdVec<u8>,
        wide: i64,
        word: u32,
    }

    static MIXED: Mutex<MixedCapture> = Mutex::new(MixedCapture {
        blob1: StdVec::new(),
        blob2: StdVec::new(),
        s1: String::new(),
        s2: String::new(),
        blob3: StdVec::new(),
        wide: 0,
        word: 0,
    });

    fn reset() -> MutexGuard<'static, ()> {
        let guard = LOCK.lock().unwrap_or_else(|e| e.into_inner());
        CALLS.store(0, Ordering::SeqCst);
        VOID_CALLED.store(0, Ordering::SeqCst);
        LAST_BYTE.store(usize::MAX, Ordering::SeqCst);
        LAST_STRING.lock().unwrap().clear();
        LAST_BYTES.lock().unwrap().clear();
        guard
    }

    // ==================== DEMO HANDLER SHIMS ====================

    fn demo_void(args: &[ArgValue<'_>]) -> bool {
        if !args.is_empty() {
            return false;
        }
        CALLS.fetch_add(1, Ordering::SeqCst);
        VOID_CALLED.fetch_add(1, Ordering::SeqCst);
        true
    }

    fn demo_cat_byte(args: &[ArgValue<'_>]) -> bool {
        let &[ArgValue::U8(value)] = args else { return false };
        CALLS.fetch_add(1, Ordering::SeqCst);
        LAST_BYTE.store(value as usize, Ordering::SeqCst);
        true
    }

    fn demo_cat_string(args: &[ArgValue<'_>]) -> bool {
        let &[ArgValue::Str(s)] = args else { return false };
        CALLS.fetch_add(1, Ordering::SeqCst);
        *LAST_STRING.lock().unwrap() = s.to_string();
        true
    }

    fn demo_cat_bytes(args: &[ArgValue<'_>]) -> bool {
        let &[ArgValue::Bytes(data), ArgValue::U8(len)] = args else { return false };
        if data.len() != len as usize {
            return false;
        }
        CALLS.fetch_add(1, Ordering::SeqCst);
        *LAST_BYTES.lock().unwrap() = data.to_vec();
        true
    }

    fn demo_cat_mixed(args: &[ArgValue<'_>]) -> bool {
        let &[
            ArgValue::Bytes(blob1),
            ArgValue::Bytes(blob2),
            ArgValue::Str(s1),
            ArgValue::Str(s2),
            ArgValue::Bytes(blob3),
            ArgValue::I64(wide),
            ArgValue::U32(word),
        ] = args
        else {
            return false;
        };
        CALLS.fetch_add(1, Ordering::SeqCst);
        let mut mixed = MIXED.lock().unwrap();
        mixed.blob1 = blob1.to_vec();
        mixed.blob2 = blob2.to_vec();
        mixed.s1 = s1.to_string();
        mixed.s2 = s2.to_string();
        mixed.blob3 = blob3.to_vec();
        mixed.wide = wide;
        mixed.word = word;
        true
    }

    fn demo_fail(_args: &[ArgValue<'_>]) -> bool {
        false
    }

    // ==================== DEMO TABLE ====================

    static TABLE: &[Signature] = &[
        Signature { hash: djb2("void"), handler: demo_void, types: &[], arg_count: 0 },
        Signature {
            hash: djb2("cat_byte"),
            handler: demo_cat_byte,
            types: &[ArgType::U8],
            arg_count: 1,
        },
        Signature {
            hash: djb2("cat_string"),
            handler: demo_cat_string,
            types: &[ArgType::Str],
            arg_count: 1,
        },
        Signature {
            hash: djb2("cat_bytes"),
            handler: demo_cat_bytes,
            types: &[ArgType::Bytes, ArgType::U8],
            arg_count: 2,
        },
        Signature {
            hash: djb2("cat_mixed"),
            handler: demo_cat_mixed,
            types: &[
                ArgType::Bytes,
                ArgType::Bytes,
                ArgType::Str,
                ArgType::Str,
                ArgType::Bytes,
                ArgType::I64,
                ArgType::U32,
            ],
            arg_count: 7,
        },
        Signature { hash: djb2("always_fails"), handler: demo_fail, types: &[], arg_count: 0 },
    ];

    type TestDispatcher = Dispatcher<'static, 8, 256, 64>;

    fn dispatcher() -> TestDispatcher {
        TestDispatcher::new(TABLE)
    }

    // ==================== END-TO-END ====================

    #[test]
    fn test_void_command_invokes_once() {
        let _guard = reset();
        assert!(dispatcher().dispatch_from_line("void").is_ok());
        assert_eq!(CALLS.load(Ordering::SeqCst), 1);
        assert_eq!(VOID_CALLED.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_cat_byte_delivers_value() {
        let _guard = reset();
        assert!(dispatcher().dispatch_from_line("cat_byte 22").is_ok());
        assert_eq!(CALLS.load(Ordering::SeqCst), 1);
        assert_eq!(LAST_BYTE.load(Ordering::SeqCst), 22);
    }

    #[test]
    fn test_cat_string_is_zero_copy_delivered() {
        let _guard = reset();
        assert!(dispatcher().dispatch_from_line("cat_string hello_world").is_ok());
        assert_eq!(CALLS.load(Ordering::SeqCst), 1);
        assert_eq!(LAST_STRING.lock().unwrap().as_str(), "hello_world");
    }

    #[test]
    fn test_cat_bytes_three() {
        let _guard = reset();
        assert!(dispatcher().dispatch_from_line("cat_bytes 010203 3").is_ok());
        assert_eq!(CALLS.load(Ordering::SeqCst), 1);
        assert_eq!(LAST_BYTES.lock().unwrap().as_slice(), &[0x01, 0x02, 0x03]);
    }

    #[test]
    fn test_cat_bytes_seven() {
        let _guard = reset();
        assert!(dispatcher().dispatch_from_line("cat_bytes 010203AABBCCEE 7").is_ok());
        assert_eq!(
            LAST_BYTES.lock().unwrap().as_slice(),
            &[0x01, 0x02, 0x03, 0xAA, 0xBB, 0xCC, 0xEE]
        );
    }

    #[test]
    fn test_cat_mixed_complex() {
        let _guard = reset();
        let line = "cat_mixed 010203 0A0B0C foo bar D00EFFAA -123456789 987654321";
        assert!(dispatcher().dispatch_from_line(line).is_ok());
        assert_eq!(CALLS.load(Ordering::SeqCst), 1);

        let mixed = MIXED.lock().unwrap();
        assert_eq!(mixed.blob1.as_slice(), &[0x01, 0x02, 0x03]);
        assert_eq!(mixed.blob2.as_slice(), &[0x0A, 0x0B, 0x0C]);
        assert_eq!(mixed.s1, "foo");
        assert_eq!(mixed.s2, "bar");
        assert_eq!(mixed.blob3.as_slice(), &[0xD0, 0x0E, 0xFF, 0xAA]);
        assert_eq!(mixed.wide, -123_456_789);
        assert_eq!(mixed.word, 987_654_321);
    }

    // ==================== FAILURE PATHS ====================

    #[test]
    fn test_blank_lines_invoke_nothing() {
        let _guard = reset();
        for line in ["", " ", "\r", "\r\n", "     "] {
            assert_eq!(dispatcher().dispatch_from_line(line), Err(DispatchError::NoCommand));
        }
        assert_eq!(CALLS.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_unknown_command() {
        let _guard = reset();
        let err = dispatcher().dispatch_from_line("nonexistent_command").unwrap_err();
        assert!(matches!(err, DispatchError::UnknownCommand { name: "nonexistent_command", .. }));
        assert_eq!(CALLS.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_line_too_long() {
        let _guard = reset();
        let line = "a".repeat(257);
        assert_eq!(
            dispatcher().dispatch_from_line(&line),
            Err(DispatchError::LineTooLong { len: 257 })
        );
        assert_eq!(CALLS.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_too_many_tokens() {
        let _guard = reset();
        assert_eq!(
            dispatcher().dispatch_from_line("void a b c d e f g h"),
            Err(DispatchError::TooManyTokens)
        );
        assert_eq!(CALLS.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_trailing_whitespace_is_not_too_many_tokens() {
        let _guard = reset();
        assert!(dispatcher().dispatch_from_line("void    \t ").is_ok());
        assert_eq!(CALLS.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_argument_count_mismatch() {
        let _guard = reset();
        assert_eq!(
            dispatcher().dispatch_from_line("cat_byte"),
            Err(DispatchError::ArgCountMismatch { got: 0, expected: 1 })
        );
        assert_eq!(
            dispatcher().dispatch_from_line("cat_byte 1 2"),
            Err(DispatchError::ArgCountMismatch { got: 2, expected: 1 })
        );
        assert_eq!(CALLS.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_argument_parse_failure_reports_position() {
        let _guard = reset();
        let err = dispatcher().dispatch_from_line("cat_bytes 0102zz 3").unwrap_err();
        assert_eq!(
            err,
            DispatchError::ArgParse {
                index: 0,
                expected: ArgType::Bytes,
                token: "0102zz",
                source: ParseError::InvalidHexDigit,
            }
        );
        assert_eq!(CALLS.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_handler_failure_is_reported() {
        let _guard = reset();
        assert_eq!(
            dispatcher().dispatch_from_line("always_fails"),
            Err(DispatchError::InvocationFailed)
        );
    }

    // ==================== CONTRACT GUARDS ====================

    #[test]
    fn test_defective_signature_is_rejected_before_parsing() {
        let _guard = reset();
        // declared count disagrees with the type list
        static BAD: &[Signature] = &[Signature {
            hash: djb2("bad"),
            handler: demo_void,
            types: &[ArgType::U8],
            arg_count: 2,
        }];
        let engine: Dispatcher<'static, 8, 256, 64> = Dispatcher::new(BAD);
        let err = engine.dispatch_from_line("bad 1 2").unwrap_err();
        assert!(matches!(err, DispatchError::InvalidSignature { declared: 2, .. }));
        assert_eq!(CALLS.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_scratch_budget_bounds_binary_arguments() {
        let _guard = reset();
        let tiny: Dispatcher<'static, 8, 256, 4> = Dispatcher::new(TABLE);
        let err = tiny.dispatch_from_line("cat_bytes 0102030405 5").unwrap_err();
        assert!(matches!(
            err,
            DispatchError::ArgParse { source: ParseError::HexOverflow, .. }
        ));
        assert_eq!(CALLS.load(Ordering::SeqCst), 0);

        // within budget still works on the same engine type
        assert!(tiny.dispatch_from_line("cat_bytes 01020304 4").is_ok());
    }

    #[test]
    fn test_string_argument_respects_byte_limit() {
        let _guard = reset();
        let tiny: Dispatcher<'static, 8, 256, 4> = Dispatcher::new(TABLE);
        let err = tiny.dispatch_from_line("cat_string abcdefgh").unwrap_err();
        assert!(matches!(
            err,
            DispatchError::ArgParse { source: ParseError::TokenTooLong, .. }
        ));
    }
}
