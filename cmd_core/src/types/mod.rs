//! Core type definitions: argument type tags, typed argument values, and
//! command signatures.
//!
//! Only explicitly-sized scalar types are supported. The value side is a
//! proper sum type, so reading an argument under the wrong tag is a
//! compile-time impossibility rather than a convention.

/// Tag for one declared argument position in a command signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ArgType {
    /// 8-bit unsigned integer
    U8,
    /// 16-bit unsigned integer
    U16,
    /// 32-bit unsigned integer
    U32,
    /// 64-bit unsigned integer
    U64,
    /// 8-bit signed integer
    I8,
    /// 16-bit signed integer
    I16,
    /// 32-bit signed integer
    I32,
    /// 64-bit signed integer
    I64,
    /// Boolean (`true`/`false`/`1`/`0`)
    Bool,
    /// UTF-8 string, zero-copy into the token buffer
    Str,
    /// Byte buffer, hex-encoded in the input
    Bytes,
}

/// One parsed argument value.
///
/// Scalars are held inline; strings borrow the input line, byte buffers
/// borrow the per-dispatch scratch arena. Nothing outlives the dispatch
/// call that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgValue<'a> {
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    Bool(bool),
    Str(&'a str),
    Bytes(&'a [u8]),
}

impl ArgValue<'_> {
    /// The tag this value was parsed under.
    pub fn tag(&self) -> ArgType {
        match self {
            ArgValue::U8(_) => ArgType::U8,
            ArgValue::U16(_) => ArgType::U16,
            ArgValue::U32(_) => ArgType::U32,
            ArgValue::U64(_) => ArgType::U64,
            ArgValue::I8(_) => ArgType::I8,
            ArgValue::I16(_) => ArgType::I16,
            ArgValue::I32(_) => ArgType::I32,
            ArgValue::I64(_) => ArgType::I64,
            ArgValue::Bool(_) => ArgType::Bool,
            ArgValue::Str(_) => ArgType::Str,
            ArgValue::Bytes(_) => ArgType::Bytes,
        }
    }
}

/// Invocation shim for one command.
///
/// Shims are emitted next to the signature table and pattern-match the
/// typed argument array back into the concrete handler prototype. The
/// argument array is guaranteed to match the signature's declared types
/// exactly; a shim returning `false` reports handler failure.
pub type HandlerFn = for<'a> fn(&[ArgValue<'a>]) -> bool;

/// Command signature metadata used for dispatching.
///
/// Produced entirely by the offline generator and never mutated at
/// runtime. `arg_count` is carried redundantly beside `types` and must
/// agree with `types.len()`; the dispatcher verifies the pair before
/// parsing. Hash uniqueness across a table is a generator invariant the
/// engine assumes but does not enforce.
#[derive(Debug, Clone, Copy)]
pub struct Signature {
    /// DJB2 digest of the command name.
    pub hash: u32,
    /// Invocation shim for the handler.
    pub handler: HandlerFn,
    /// Declared argument types, in positional order.
    pub types: &'static [ArgType],
    /// Number of arguments expected.
    pub arg_count: u8,
}

// ==================== TESTS =======================
