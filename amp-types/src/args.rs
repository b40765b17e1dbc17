//! Keyword/value argument channel for generated constructors.
//!
//! A generated `proto_<type>_kw` function consumes a [`VarArgs`] queue laid
//! out as `keyword, value, keyword, value, ..., terminator`. Values travel as
//! [`Arg`], which mirrors a variadic calling convention: `bool`, `u8` and
//! `u16` are promoted to [`Arg::Int`] when the argument is created and read
//! back at that promoted width.

use crate::value::{Binary, Described, List, Map, Value};
use std::collections::VecDeque;

/// A single heterogeneous constructor argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    /// Promoted integer (`bool`, `u8`, `u16`, `i32`).
    Int(i32),
    /// Unsigned 32-bit integer.
    Uint(u32),
    /// Unsigned 64-bit integer.
    Ulong(u64),
    /// Possibly-null text.
    Str(Option<String>),
    /// Any runtime value.
    Value(Value),
}

impl Arg {
    /// Short name of the argument kind, used in diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Uint(_) => "uint",
            Self::Ulong(_) => "ulong",
            Self::Str(_) => "str",
            Self::Value(_) => "value",
        }
    }
}

impl From<bool> for Arg {
    fn from(value: bool) -> Self {
        Self::Int(i32::from(value))
    }
}

impl From<u8> for Arg {
    fn from(value: u8) -> Self {
        Self::Int(i32::from(value))
    }
}

impl From<u16> for Arg {
    fn from(value: u16) -> Self {
        Self::Int(i32::from(value))
    }
}

impl From<i32> for Arg {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for Arg {
    fn from(value: u32) -> Self {
        Self::Uint(value)
    }
}

impl From<u64> for Arg {
    fn from(value: u64) -> Self {
        Self::Ulong(value)
    }
}

impl From<&str> for Arg {
    fn from(value: &str) -> Self {
        Self::Str(Some(value.to_string()))
    }
}

impl From<String> for Arg {
    fn from(value: String) -> Self {
        Self::Str(Some(value))
    }
}

impl From<Option<&str>> for Arg {
    fn from(value: Option<&str>) -> Self {
        Self::Str(value.map(str::to_string))
    }
}

impl From<Value> for Arg {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<Binary> for Arg {
    fn from(value: Binary) -> Self {
        Self::Value(Value::Binary(value))
    }
}

impl From<List> for Arg {
    fn from(value: List) -> Self {
        Self::Value(Value::List(value))
    }
}

impl From<Map> for Arg {
    fn from(value: Map) -> Self {
        Self::Value(Value::Map(value))
    }
}

impl From<Described> for Arg {
    fn from(value: Described) -> Self {
        Self::Value(Value::from(value))
    }
}

/// Types that can be read back out of an [`Arg`].
pub trait FromArg: Sized {
    /// Kind name reported when the argument does not match.
    const KIND: &'static str;

    /// Converts the argument, or returns `None` on a kind mismatch.
    fn from_arg(arg: Arg) -> Option<Self>;
}

impl FromArg for i32 {
    const KIND: &'static str = "int";

    fn from_arg(arg: Arg) -> Option<Self> {
        match arg {
            Arg::Int(v) => Some(v),
            _ => None,
        }
    }
}

impl FromArg for u32 {
    const KIND: &'static str = "uint";

    fn from_arg(arg: Arg) -> Option<Self> {
        match arg {
            Arg::Uint(v) => Some(v),
            Arg::Int(v) => u32::try_from(v).ok(),
            _ => None,
        }
    }
}

impl FromArg for u64 {
    const KIND: &'static str = "ulong";

    fn from_arg(arg: Arg) -> Option<Self> {
        match arg {
            Arg::Ulong(v) => Some(v),
            Arg::Uint(v) => Some(u64::from(v)),
            Arg::Int(v) => u64::try_from(v).ok(),
            _ => None,
        }
    }
}

impl FromArg for Option<String> {
    const KIND: &'static str = "str";

    fn from_arg(arg: Arg) -> Option<Self> {
        match arg {
            Arg::Str(s) => Some(s),
            Arg::Value(Value::Null) => Some(None),
            _ => None,
        }
    }
}

impl FromArg for Value {
    const KIND: &'static str = "value";

    fn from_arg(arg: Arg) -> Option<Self> {
        match arg {
            Arg::Value(v) => Some(v),
            _ => None,
        }
    }
}

impl FromArg for Binary {
    const KIND: &'static str = "binary";

    fn from_arg(arg: Arg) -> Option<Self> {
        match arg {
            Arg::Value(Value::Binary(b)) => Some(b),
            _ => None,
        }
    }
}

impl FromArg for List {
    const KIND: &'static str = "list";

    fn from_arg(arg: Arg) -> Option<Self> {
        match arg {
            Arg::Value(Value::List(l)) => Some(l),
            _ => None,
        }
    }
}

impl FromArg for Map {
    const KIND: &'static str = "map";

    fn from_arg(arg: Arg) -> Option<Self> {
        match arg {
            Arg::Value(Value::Map(m)) => Some(m),
            _ => None,
        }
    }
}

impl FromArg for Described {
    const KIND: &'static str = "described";

    fn from_arg(arg: Arg) -> Option<Self> {
        match arg {
            Arg::Value(Value::Described(d)) => Some(*d),
            _ => None,
        }
    }
}

/// Queue of constructor arguments.
#[derive(Debug, Clone, Default)]
pub struct VarArgs {
    args: VecDeque<Arg>,
}

impl VarArgs {
    /// Creates an empty argument queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lays out keyword/value pairs followed by the terminator keyword.
    #[must_use]
    pub fn terminated<I>(pairs: I, terminator: u32) -> Self
    where
        I: IntoIterator<Item = (u32, Arg)>,
    {
        let mut ap = Self::new();
        for (keyword, value) in pairs {
            ap.push(keyword);
            ap.push(value);
        }
        ap.push(terminator);
        ap
    }

    /// Appends an argument.
    pub fn push(&mut self, arg: impl Into<Arg>) {
        self.args.push_back(arg.into());
    }

    /// Returns the number of unread arguments.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.args.len()
    }

    /// Reads the next argument as a keyword code.
    ///
    /// # Panics
    /// Panics if the queue is exhausted or the argument is not an integer.
    pub fn keyword(&mut self) -> u32 {
        self.value::<u32>()
    }

    /// Reads the next argument as `T`.
    ///
    /// # Panics
    /// Panics if the queue is exhausted or the argument kind does not match.
    pub fn value<T: FromArg>(&mut self) -> T {
        let Some(arg) = self.args.pop_front() else {
            panic!("argument list exhausted before terminator");
        };
        let found = arg.kind();
        match T::from_arg(arg) {
            Some(value) => value,
            None => panic!("expected {} argument, found {}", T::KIND, found),
        }
    }
}

/// Reports a keyword the constructor does not recognize and halts.
///
/// Malformed constructor usage is a programming error, so this never returns
/// and nothing is written to the container under construction.
///
/// # Panics
/// Always panics with `unrecognized arg: <code>` after logging the code at
/// error level. Process termination depends on the panic strategy: the
/// workspace release profile sets `panic = "abort"`, so the process exits
/// with a non-zero status. Under the default `unwind` strategy (dev and test
/// profiles) the panic unwinds the calling thread and can be observed with
/// `#[should_panic]`, `std::panic::catch_unwind`, or
/// `std::thread::JoinHandle::join`.
pub fn unrecognized_keyword(code: u32) -> ! {
    tracing::error!(code, "unrecognized constructor keyword");
    panic!("unrecognized arg: {code}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_narrow_types_promote_to_int() {
        assert_eq!(Arg::from(true), Arg::Int(1));
        assert_eq!(Arg::from(200u8), Arg::Int(200));
        assert_eq!(Arg::from(65535u16), Arg::Int(65535));
        assert_eq!(Arg::from(7u32), Arg::Uint(7));
        assert_eq!(Arg::from(7u64), Arg::Ulong(7));
    }

    #[test]
    fn test_terminated_layout() {
        let mut ap = VarArgs::terminated([(3, Arg::from("x")), (1, Arg::from(9u16))], 42);
        assert_eq!(ap.remaining(), 5);

        assert_eq!(ap.keyword(), 3);
        assert_eq!(ap.value::<Option<String>>(), Some("x".to_string()));
        assert_eq!(ap.keyword(), 1);
        assert_eq!(ap.value::<i32>(), 9);
        assert_eq!(ap.keyword(), 42);
        assert_eq!(ap.remaining(), 0);
    }

    #[test]
    fn test_unsigned_reads_accept_smaller_kinds() {
        let mut ap = VarArgs::new();
        ap.push(5i32);
        ap.push(6u32);
        ap.push(7i32);
        assert_eq!(ap.value::<u32>(), 5);
        assert_eq!(ap.value::<u64>(), 6);
        assert_eq!(ap.value::<u64>(), 7);
    }

    #[test]
    fn test_null_value_reads_as_absent_string() {
        let mut ap = VarArgs::new();
        ap.push(Value::Null);
        assert_eq!(ap.value::<Option<String>>(), None);
    }

    #[test]
    #[should_panic(expected = "expected list argument, found uint")]
    fn test_kind_mismatch_panics() {
        let mut ap = VarArgs::new();
        ap.push(1u32);
        let _ = ap.value::<List>();
    }

    #[test]
    #[should_panic(expected = "argument list exhausted")]
    fn test_exhausted_panics() {
        let mut ap = VarArgs::new();
        let _ = ap.keyword();
    }

    #[test]
    #[should_panic(expected = "unrecognized arg: 99")]
    fn test_unrecognized_keyword_halts() {
        unrecognized_keyword(99);
    }

    #[test]
    fn test_unrecognized_keyword_unwinds_calling_thread() {
        let handle = std::thread::spawn(|| -> u32 { unrecognized_keyword(7) });
        let payload = handle.join().expect_err("constructor thread must not return");
        let message = payload
            .downcast_ref::<String>()
            .map(String::as_str)
            .unwrap_or_default();
        assert_eq!(message, "unrecognized arg: 7");
    }
}
