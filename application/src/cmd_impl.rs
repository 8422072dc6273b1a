//! Demo command set: handlers, invocation shims, and the signature table.
//!
//! In a production image the shims and the table come out of the offline
//! generator; this demo writes the same shapes by hand. Each shim unpacks
//! the typed argument array into its handler's concrete prototype and
//! reports failure by returning `false`.

use cmd_core::hash::djb2;
use cmd_core::{ArgType, ArgValue, Signature};

// ==================== HANDLERS ====================

pub fn void() {
    println!("void()");
}

pub fn cat_byte(b: u8) {
    println!("cat_byte: {b}");
}

pub fn cat_string(s: &str) {
    println!("cat_string: {s}");
}

pub fn cat_bytes(data: &[u8], len: u8) {
    println!("cat_bytes: len={len} data={data:02X?}");
}

pub fn cat_mixed(blob1: &[u8], blob2: &[u8], s1: &str, s2: &str, blob3: &[u8], i: i64, u: u32) {
    println!("cat_mixed: blob1={blob1:02X?} blob2={blob2:02X?} s1={s1} s2={s2} blob3={blob3:02X?} i={i} u={u}");
}

pub fn set_speed(speed: u16, reverse: bool) {
    println!("set_speed: {speed} reverse={reverse}");
}

// ==================== INVOCATION SHIMS ====================

fn call_void(args: &[ArgValue<'_>]) -> bool {
    if !args.is_empty() {
        return false;
    }
    void();
    true
}

fn call_cat_byte(args: &[ArgValue<'_>]) -> bool {
    let &[ArgValue::U8(b)] = args else { return false };
    cat_byte(b);
    true
}

fn call_cat_string(args: &[ArgValue<'_>]) -> bool {
    let &[ArgValue::Str(s)] = args else { return false };
    cat_string(s);
    true
}

fn call_cat_bytes(args: &[ArgValue<'_>]) -> bool {
    let &[ArgValue::Bytes(data), ArgValue::U8(len)] = args else { return false };
    cat_bytes(data, len);
    true
}

fn call_cat_mixed(args: &[ArgValue<'_>]) -> bool {
    let &[
        ArgValue::Bytes(blob1),
        ArgValue::Bytes(blob2),
        ArgValue::Str(s1),
        ArgValue::Str(s2),
        ArgValue::Bytes(blob3),
        ArgValue::I64(i),
        ArgValue::U32(u),
    ] = args
    else {
        return false;
    };
    cat_mixed(blob1, blob2, s1, s2, blob3, i, u);
    true
}

fn call_set_speed(args: &[ArgValue<'_>]) -> bool {
    let &[ArgValue::U16(speed), ArgValue::Bool(reverse)] = args else { return false };
    set_speed(speed, reverse);
    true
}

// ==================== SIGNATURE TABLE ====================

pub static SIGNATURES: &[Signature] = &[
    Signature { hash: djb2("void"), handler: call_void, types: &[], arg_count: 0 },
    Signature {
        hash: djb2("cat_byte"),
        handler: call_cat_byte,
        types: &[ArgType::U8],
        arg_count: 1,
    },
    Signature {
        hash: djb2("cat_string"),
        handler: call_cat_string,
        types: &[ArgType::Str],
        arg_count: 1,
    },
    Signature {
        hash: djb2("cat_bytes"),
        handler: call_cat_bytes,
        types: &[ArgType::Bytes, ArgType::U8],
        arg_count: 2,
    },
    Signature {
        hash: djb2("cat_mixed"),
        handler: call_cat_mixed,
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
    Signature {
        hash: djb2("set_speed"),
        handler: call_set_speed,
        types: &[ArgType::U16, ArgType::Bool],
        arg_count: 2,
    },
];
