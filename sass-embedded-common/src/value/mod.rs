// SPDX-License-Identifier: Apache-2.0

//! The Sass Value Model (design §4, component 1): an immutable,
//! polymorphic tagged value type covering Sass's runtime values.
//! Supports equality, hashing, a visitor traversal for wire encoding,
//! and typed downcasts.

mod color;
mod number;
mod visit;

pub use color::SassColor;
pub use number::SassNumber;
pub use visit::ValueVisitor;

use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

/// How a [`Value::List`] is printed: the separator between elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListSeparator {
    Comma,
    Space,
    Slash,
    /// No separator has been observed yet (e.g. a zero- or one-element
    /// list); the compiler treats this as compatible with any separator.
    Undecided,
}

/// An opaque reference to a Sass-level function defined inside the
/// compiler itself; the host never inspects its internals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CompilerFunctionId(pub u32);

/// A reference to a host-defined dynamic function (design §4.3):
/// host-assigned id plus the signature string it was created with. The
/// callable itself lives in the `DynamicFunctionRegistry` in
/// `sass-embedded-host`, keyed by `id` — this type is just the pointer
/// that flows through the value model and the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DynamicFunctionRef {
    pub id: u32,
    pub signature: String,
}

/// A polymorphic Sass runtime value (design §3).
#[derive(Debug, Clone)]
pub enum Value {
    String { text: String, quoted: bool },
    Number(SassNumber),
    Color(SassColor),
    Bool(bool),
    Null,
    List { items: Vec<Value>, separator: ListSeparator, bracketed: bool },
    /// An ordered association list. Construction enforces unique keys
    /// (design §3 invariant: "a Map with non-unique keys is a
    /// programmer error at construction") — see [`Value::map`].
    Map(Vec<(Value, Value)>),
    CompilerFunction(CompilerFunctionId),
    DynamicFunction(DynamicFunctionRef),
}

impl Value {
    pub const TRUE: Value = Value::Bool(true);
    pub const FALSE: Value = Value::Bool(false);

    /// Builds a `Map`, panicking if two keys are equal under [`Value`]
    /// equality: duplicate keys are a programmer error, not a runtime
    /// one.
    pub fn map(entries: Vec<(Value, Value)>) -> Value {
        for i in 0..entries.len() {
            for j in (i + 1)..entries.len() {
                assert!(
                    entries[i].0 != entries[j].0,
                    "Sass map constructed with duplicate key"
                );
            }
        }
        Value::Map(entries)
    }

    pub fn empty_list(separator: ListSeparator) -> Value {
        Value::List { items: Vec::new(), separator, bracketed: false }
    }

    /// Iterates a List or Map uniformly: a Map yields its entries as
    /// 2-element lists, matching the compiler's own iteration contract
    /// (design §3: "iteration yields 2-element lists").
    pub fn iter_as_list(&self) -> Vec<Value> {
        match self {
            Value::List { items, .. } => items.clone(),
            Value::Map(entries) => entries
                .iter()
                .map(|(k, v)| Value::List {
                    items: vec![k.clone(), v.clone()],
                    separator: ListSeparator::Comma,
                    bracketed: false,
                })
                .collect(),
            other => vec![other.clone()],
        }
    }

    pub fn as_string(&self) -> Option<(&str, bool)> {
        match self {
            Value::String { text, quoted } => Some((text.as_str(), *quoted)),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<&SassNumber> {
        match self {
            Value::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<&SassColor> {
        match self {
            Value::Color(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Like [`Value::as_string`], but turns a failed downcast into the
    /// [`crate::error::ValueError`] a host function callback should
    /// surface as its function-call error text (design §7).
    pub fn expect_string(&self) -> Result<(&str, bool), crate::error::ValueError> {
        self.as_string().ok_or_else(|| self.wrong_variant("string"))
    }

    /// Like [`Value::as_number`], wrapped as a [`crate::error::ValueError`].
    pub fn expect_number(&self) -> Result<&SassNumber, crate::error::ValueError> {
        self.as_number().ok_or_else(|| self.wrong_variant("number"))
    }

    /// Like [`Value::as_color`], wrapped as a [`crate::error::ValueError`].
    pub fn expect_color(&self) -> Result<&SassColor, crate::error::ValueError> {
        self.as_color().ok_or_else(|| self.wrong_variant("color"))
    }

    /// Like [`Value::as_bool`], wrapped as a [`crate::error::ValueError`].
    pub fn expect_bool(&self) -> Result<bool, crate::error::ValueError> {
        self.as_bool().ok_or_else(|| self.wrong_variant("bool"))
    }

    fn wrong_variant(&self, expected: &'static str) -> crate::error::ValueError {
        crate::error::ValueError::WrongVariant { expected, actual: self.type_name() }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Sass truthiness: everything except `null` and `false` is truthy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Null | Value::Bool(false))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::String { .. } => "string",
            Value::Number(_) => "number",
            Value::Color(_) => "color",
            Value::Bool(_) => "bool",
            Value::Null => "null",
            Value::List { .. } => "list",
            Value::Map(_) => "map",
            Value::CompilerFunction(_) => "function",
            Value::DynamicFunction(_) => "function",
        }
    }

    /// Visits this value via [`ValueVisitor`] — the traversal the
    /// Protocol Codec drives to serialize a value to the wire.
    pub fn accept<V: ValueVisitor>(&self, visitor: &mut V) -> V::Output {
        visit::accept(self, visitor)
    }

    /// A value normalized so that an empty List and an empty Map compare
    /// and hash identically (design §3 invariant).
    fn equality_view(&self) -> EqualityView<'_> {
        match self {
            Value::List { items, bracketed, .. } if items.is_empty() => {
                EqualityView::EmptyCollection { bracketed: *bracketed }
            }
            Value::Map(entries) if entries.is_empty() => {
                EqualityView::EmptyCollection { bracketed: false }
            }
            other => EqualityView::Value(other),
        }
    }
}

enum EqualityView<'a> {
    EmptyCollection { bracketed: bool },
    Value(&'a Value),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self.equality_view(), other.equality_view()) {
            (
                EqualityView::EmptyCollection { bracketed: a },
                EqualityView::EmptyCollection { bracketed: b },
            ) => a == b,
            (EqualityView::EmptyCollection { .. }, _) | (_, EqualityView::EmptyCollection { .. }) => {
                false
            }
            (EqualityView::Value(a), EqualityView::Value(b)) => match (a, b) {
                (Value::String { text: t1, quoted: q1 }, Value::String { text: t2, quoted: q2 }) => {
                    t1 == t2 && q1 == q2
                }
                (Value::Number(n1), Value::Number(n2)) => n1 == n2,
                (Value::Color(c1), Value::Color(c2)) => c1 == c2,
                (Value::Bool(b1), Value::Bool(b2)) => b1 == b2,
                (Value::Null, Value::Null) => true,
                (
                    Value::List { items: i1, separator: s1, bracketed: b1 },
                    Value::List { items: i2, separator: s2, bracketed: b2 },
                ) => s1 == s2 && b1 == b2 && i1 == i2,
                (Value::Map(e1), Value::Map(e2)) => map_as_btree(e1) == map_as_btree(e2),
                (Value::CompilerFunction(a), Value::CompilerFunction(b)) => a == b,
                (Value::DynamicFunction(a), Value::DynamicFunction(b)) => a == b,
                _ => false,
            },
        }
    }
}

impl Eq for Value {}

/// Maps compare by content regardless of insertion order, so equality
/// (and the `Hash` impl below) goes through a sorted view keyed by a
/// value's `Hash`-derived fingerprint. We can't put `Value` itself in a
/// `BTreeMap` (no `Ord`), so we sort by hash-and-debug as a stable,
/// order-independent proxy.
fn map_as_btree(entries: &[(Value, Value)]) -> BTreeMap<u64, Vec<(&Value, &Value)>> {
    let mut out: BTreeMap<u64, Vec<(&Value, &Value)>> = BTreeMap::new();
    for (k, v) in entries {
        out.entry(hash_value(k)).or_default().push((k, v));
    }
    for bucket in out.values_mut() {
        bucket.sort_by(|a, b| format!("{a:?}").cmp(&format!("{b:?}")));
    }
    out
}

fn hash_value(value: &Value) -> u64 {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self.equality_view() {
            EqualityView::EmptyCollection { bracketed } => {
                state.write_u8(0xEE);
                bracketed.hash(state);
            }
            EqualityView::Value(value) => match value {
                Value::String { text, quoted } => {
                    state.write_u8(0);
                    text.hash(state);
                    quoted.hash(state);
                }
                Value::Number(n) => {
                    state.write_u8(1);
                    n.hash(state);
                }
                Value::Color(c) => {
                    state.write_u8(2);
                    c.hash(state);
                }
                Value::Bool(b) => {
                    state.write_u8(3);
                    b.hash(state);
                }
                Value::Null => state.write_u8(4),
                Value::List { items, separator, bracketed } => {
                    state.write_u8(5);
                    for item in items {
                        item.hash(state);
                    }
                    separator.hash(state);
                    bracketed.hash(state);
                }
                Value::Map(entries) => {
                    state.write_u8(6);
                    // Order-independent: XOR each entry's fingerprint.
                    let mut acc: u64 = 0;
                    for (k, v) in entries {
                        acc ^= hash_value(k).wrapping_mul(31).wrapping_add(hash_value(v));
                    }
                    state.write_u64(acc);
                }
                Value::CompilerFunction(id) => {
                    state.write_u8(7);
                    id.hash(state);
                }
                Value::DynamicFunction(f) => {
                    state.write_u8(8);
                    f.hash(state);
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_list_equals_empty_map() {
        let list = Value::List { items: vec![], separator: ListSeparator::Comma, bracketed: false };
        let map = Value::Map(vec![]);
        assert_eq!(list, map);
        assert_eq!(hash_value(&list), hash_value(&map));
    }

    #[test]
    fn bracketed_empty_list_differs_from_unbracketed() {
        let a = Value::List { items: vec![], separator: ListSeparator::Comma, bracketed: true };
        let b = Value::List { items: vec![], separator: ListSeparator::Comma, bracketed: false };
        assert_ne!(a, b);
    }

    #[test]
    fn map_equality_ignores_insertion_order() {
        let a = Value::map(vec![
            (Value::String { text: "a".into(), quoted: true }, Value::Bool(true)),
            (Value::String { text: "b".into(), quoted: true }, Value::Bool(false)),
        ]);
        let b = Value::map(vec![
            (Value::String { text: "b".into(), quoted: true }, Value::Bool(false)),
            (Value::String { text: "a".into(), quoted: true }, Value::Bool(true)),
        ]);
        assert_eq!(a, b);
        assert_eq!(hash_value(&a), hash_value(&b));
    }

    #[test]
    #[should_panic(expected = "duplicate key")]
    fn map_with_duplicate_keys_panics() {
        Value::map(vec![
            (Value::Bool(true), Value::Null),
            (Value::Bool(true), Value::Null),
        ]);
    }

    #[test]
    fn truthiness_excludes_only_null_and_false() {
        assert!(Value::Bool(true).is_truthy());
        assert!(Value::String { text: String::new(), quoted: false }.is_truthy());
        assert!(!Value::Null.is_truthy());
        assert!(!Value::Bool(false).is_truthy());
    }

    #[test]
    fn expect_number_passes_through_a_number() {
        let value = Value::Number(SassNumber::unitless(4.0));
        assert_eq!(value.expect_number().unwrap().value, 4.0);
    }

    #[test]
    fn expect_number_on_a_non_number_reports_both_variant_names() {
        let err = Value::Bool(true).expect_number().unwrap_err();
        assert_eq!(err.to_string(), "expected a number value, got bool");
    }

    #[test]
    fn expect_string_on_a_non_string_reports_both_variant_names() {
        let err = Value::Null.expect_string().unwrap_err();
        assert_eq!(err.to_string(), "expected a string value, got null");
    }
}
