//! Value types for AMQP protocol data.
//!
//! Generated constructors assemble composite instances out of these types:
//! a [`List`] or [`Map`] body wrapped in a [`Described`] value tagged with the
//! composite's descriptor symbol.

use std::fmt;

/// A protocol value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Value {
    /// Absent value.
    #[default]
    Null,
    /// Boolean.
    Boolean(bool),
    /// Unsigned 8-bit integer.
    Ubyte(u8),
    /// Unsigned 16-bit integer.
    Ushort(u16),
    /// Unsigned 32-bit integer.
    Uint(u32),
    /// Unsigned 64-bit integer (also carries timestamps).
    Ulong(u64),
    /// Unicode string.
    String(String),
    /// Interned ASCII symbol.
    Symbol(String),
    /// Opaque bytes.
    Binary(Binary),
    /// Ordered sequence.
    List(List),
    /// Associative container.
    Map(Map),
    /// Value tagged with a descriptor.
    Described(Box<Described>),
}

impl Value {
    /// Creates a string value.
    #[must_use]
    pub fn string(s: impl Into<String>) -> Self {
        Self::String(s.into())
    }

    /// Creates a symbol value.
    #[must_use]
    pub fn symbol(s: impl Into<String>) -> Self {
        Self::Symbol(s.into())
    }

    /// Wraps `value` in a described value tagged with `descriptor`.
    #[must_use]
    pub fn described(descriptor: Value, value: Value) -> Self {
        Self::Described(Box::new(Described::new(descriptor, value)))
    }

    /// Returns true if this is the null value.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the boolean payload, if any.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns any unsigned integer payload widened to `u64`.
    #[must_use]
    pub const fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Ubyte(v) => Some(*v as u64),
            Self::Ushort(v) => Some(*v as u64),
            Self::Uint(v) => Some(*v as u64),
            Self::Ulong(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the text of a string or symbol value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) | Self::Symbol(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the bytes of a binary value.
    #[must_use]
    pub fn as_binary(&self) -> Option<&Binary> {
        match self {
            Self::Binary(b) => Some(b),
            _ => None,
        }
    }

    /// Returns the list payload, if any.
    #[must_use]
    pub fn as_list(&self) -> Option<&List> {
        match self {
            Self::List(l) => Some(l),
            _ => None,
        }
    }

    /// Returns the map payload, if any.
    #[must_use]
    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Returns the described payload, if any.
    #[must_use]
    pub fn as_described(&self) -> Option<&Described> {
        match self {
            Self::Described(d) => Some(d),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<u8> for Value {
    fn from(value: u8) -> Self {
        Self::Ubyte(value)
    }
}

impl From<u16> for Value {
    fn from(value: u16) -> Self {
        Self::Ushort(value)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::Uint(value)
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Self::Ulong(value)
    }
}

impl From<Binary> for Value {
    fn from(value: Binary) -> Self {
        Self::Binary(value)
    }
}

impl From<List> for Value {
    fn from(value: List) -> Self {
        Self::List(value)
    }
}

impl From<Map> for Value {
    fn from(value: Map) -> Self {
        Self::Map(value)
    }
}

impl From<Described> for Value {
    fn from(value: Described) -> Self {
        Self::Described(Box::new(value))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Ubyte(v) => write!(f, "{v}"),
            Self::Ushort(v) => write!(f, "{v}"),
            Self::Uint(v) => write!(f, "{v}"),
            Self::Ulong(v) => write!(f, "{v}"),
            Self::String(s) => write!(f, "{s:?}"),
            Self::Symbol(s) => write!(f, ":{s}"),
            Self::Binary(b) => write!(f, "b\"{}\"", b.0.escape_ascii()),
            Self::List(l) => write!(f, "{l}"),
            Self::Map(m) => write!(f, "{m}"),
            Self::Described(d) => write!(f, "{}{}", d.descriptor, d.value),
        }
    }
}

/// Owned binary data.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Binary(Vec<u8>);

impl Binary {
    /// Returns the bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the number of bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for Binary {
    fn from(value: Vec<u8>) -> Self {
        Self(value)
    }
}

impl From<&[u8]> for Binary {
    fn from(value: &[u8]) -> Self {
        Self(value.to_vec())
    }
}

/// Ordered list of values.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct List {
    items: Vec<Value>,
}

impl List {
    /// Creates an empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Creates an empty list with room for `capacity` values.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }

    /// Appends `count` copies of `value`.
    pub fn fill(&mut self, value: Value, count: usize) {
        self.items.resize(self.items.len() + count, value);
    }

    /// Appends a value.
    pub fn push(&mut self, value: impl Into<Value>) {
        self.items.push(value.into());
    }

    /// Replaces the value at `index`.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn set(&mut self, index: usize, value: Value) {
        self.items[index] = value;
    }

    /// Returns the value at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    /// Returns the number of values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the list holds no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates over the values in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.items.iter()
    }
}

impl FromIterator<Value> for List {
    fn from_iter<T: IntoIterator<Item = Value>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for List {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{item}")?;
        }
        f.write_str("]")
    }
}

/// Associative container preserving insertion order.
///
/// Protocol maps are small, so lookups are linear.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Map {
    entries: Vec<(Value, Value)>,
}

impl Map {
    /// Creates an empty map.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Creates an empty map with room for `capacity` entries.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Inserts `value` under `key`, returning the previous value for that key.
    pub fn insert(&mut self, key: Value, value: Value) -> Option<Value> {
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            return Some(std::mem::replace(&mut slot.1, value));
        }
        self.entries.push((key, value));
        None
    }

    /// Looks up a value by key.
    #[must_use]
    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Looks up a value stored under a symbol key.
    #[must_use]
    pub fn get_symbol(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| matches!(k, Value::Symbol(s) if s == name))
            .map(|(_, v)| v)
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the map has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }
}

impl fmt::Display for Map {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (k, v)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{k}={v}")?;
        }
        f.write_str("}")
    }
}

/// A value tagged with a descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Described {
    /// Descriptor (a symbol for composites, `true` for repeated-field boxes).
    pub descriptor: Value,
    /// Wrapped value.
    pub value: Value,
}

impl Described {
    /// Creates a described value.
    #[must_use]
    pub const fn new(descriptor: Value, value: Value) -> Self {
        Self { descriptor, value }
    }

    /// Returns the descriptor symbol text, if the descriptor is a symbol.
    #[must_use]
    pub fn symbol(&self) -> Option<&str> {
        match &self.descriptor {
            Value::Symbol(s) => Some(s),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_fill_and_set() {
        let mut list = List::with_capacity(3);
        list.fill(Value::Null, 3);
        list.set(2, Value::Ushort(7));

        assert_eq!(list.len(), 3);
        assert!(list.get(0).unwrap().is_null());
        assert!(list.get(1).unwrap().is_null());
        assert_eq!(list.get(2), Some(&Value::Ushort(7)));
        assert_eq!(list.get(3), None);
    }

    #[test]
    #[should_panic]
    fn test_list_set_out_of_bounds() {
        let mut list = List::new();
        list.set(0, Value::Null);
    }

    #[test]
    fn test_map_insert_replaces() {
        let mut map = Map::with_capacity(2);
        assert!(map.insert(Value::symbol("a"), Value::Uint(1)).is_none());
        let prev = map.insert(Value::symbol("a"), Value::Uint(2));

        assert_eq!(prev, Some(Value::Uint(1)));
        assert_eq!(map.len(), 1);
        assert_eq!(map.get_symbol("a"), Some(&Value::Uint(2)));
    }

    #[test]
    fn test_map_symbol_lookup_ignores_strings() {
        let mut map = Map::new();
        map.insert(Value::string("key"), Value::Boolean(true));

        assert!(map.get_symbol("key").is_none());
        assert_eq!(map.get(&Value::string("key")), Some(&Value::Boolean(true)));
    }

    #[test]
    fn test_described_symbol() {
        let value = Value::described(Value::symbol("amqp:open:list"), Value::List(List::new()));
        let described = value.as_described().unwrap();

        assert_eq!(described.symbol(), Some("amqp:open:list"));
        assert!(described.value.as_list().unwrap().is_empty());

        let boxed = Described::new(Value::Boolean(true), Value::Null);
        assert_eq!(boxed.symbol(), None);
    }

    #[test]
    fn test_as_u64_widens() {
        assert_eq!(Value::Ubyte(1).as_u64(), Some(1));
        assert_eq!(Value::Ushort(2).as_u64(), Some(2));
        assert_eq!(Value::Uint(3).as_u64(), Some(3));
        assert_eq!(Value::Ulong(u64::MAX).as_u64(), Some(u64::MAX));
        assert_eq!(Value::Boolean(true).as_u64(), None);
    }

    #[test]
    fn test_display() {
        let mut list = List::new();
        list.push(Value::string("c1"));
        list.push(Value::Null);
        list.push(Value::Ushort(5));
        let value = Value::described(Value::symbol("amqp:open:list"), list.into());

        assert_eq!(value.to_string(), ":amqp:open:list[\"c1\", null, 5]");
        assert_eq!(Value::from(Binary::from(&b"ab"[..])).to_string(), "b\"ab\"");
    }
}
