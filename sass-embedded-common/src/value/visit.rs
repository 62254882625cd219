// SPDX-License-Identifier: Apache-2.0

//! The visitor traversal the Protocol Codec drives to turn a [`Value`]
//! into a wire message (design §3, §4.2), kept independent of the wire
//! schema so `sass-embedded-common` doesn't need to depend on
//! `sass-embedded-protocol`.

use super::{CompilerFunctionId, DynamicFunctionRef, ListSeparator, SassColor, SassNumber, Value};

/// One callback per `Value` variant. Implemented by the Protocol Codec's
/// encoder; `Value::accept` drives the traversal, recursing into list
/// and map children itself so implementors only need to handle their
/// own wire representation of each leaf/branch.
pub trait ValueVisitor {
    type Output;

    fn visit_string(&mut self, text: &str, quoted: bool) -> Self::Output;
    fn visit_number(&mut self, number: &SassNumber) -> Self::Output;
    fn visit_color(&mut self, color: &SassColor) -> Self::Output;
    fn visit_bool(&mut self, value: bool) -> Self::Output;
    fn visit_null(&mut self) -> Self::Output;
    fn visit_list(
        &mut self,
        items: Vec<Self::Output>,
        separator: ListSeparator,
        bracketed: bool,
    ) -> Self::Output;
    fn visit_map(&mut self, entries: Vec<(Self::Output, Self::Output)>) -> Self::Output;
    fn visit_compiler_function(&mut self, id: CompilerFunctionId) -> Self::Output;
    fn visit_dynamic_function(&mut self, reference: &DynamicFunctionRef) -> Self::Output;
}

pub(super) fn accept<V: ValueVisitor>(value: &Value, visitor: &mut V) -> V::Output {
    match value {
        Value::String { text, quoted } => visitor.visit_string(text, *quoted),
        Value::Number(n) => visitor.visit_number(n),
        Value::Color(c) => visitor.visit_color(c),
        Value::Bool(b) => visitor.visit_bool(*b),
        Value::Null => visitor.visit_null(),
        Value::List { items, separator, bracketed } => {
            let visited = items.iter().map(|item| accept(item, visitor)).collect();
            visitor.visit_list(visited, *separator, *bracketed)
        }
        Value::Map(entries) => {
            let visited = entries
                .iter()
                .map(|(k, v)| (accept(k, visitor), accept(v, visitor)))
                .collect();
            visitor.visit_map(visited)
        }
        Value::CompilerFunction(id) => visitor.visit_compiler_function(*id),
        Value::DynamicFunction(f) => visitor.visit_dynamic_function(f),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CountingVisitor {
        leaves: usize,
    }

    impl ValueVisitor for CountingVisitor {
        type Output = ();

        fn visit_string(&mut self, _text: &str, _quoted: bool) {
            self.leaves += 1;
        }
        fn visit_number(&mut self, _number: &SassNumber) {
            self.leaves += 1;
        }
        fn visit_color(&mut self, _color: &SassColor) {
            self.leaves += 1;
        }
        fn visit_bool(&mut self, _value: bool) {
            self.leaves += 1;
        }
        fn visit_null(&mut self) {
            self.leaves += 1;
        }
        fn visit_list(&mut self, _items: Vec<()>, _separator: ListSeparator, _bracketed: bool) {}
        fn visit_map(&mut self, _entries: Vec<((), ())>) {}
        fn visit_compiler_function(&mut self, _id: CompilerFunctionId) {
            self.leaves += 1;
        }
        fn visit_dynamic_function(&mut self, _reference: &DynamicFunctionRef) {
            self.leaves += 1;
        }
    }

    #[test]
    fn visits_every_leaf_in_a_nested_list() {
        let value = Value::List {
            items: vec![Value::Bool(true), Value::Null, Value::String { text: "x".into(), quoted: true }],
            separator: ListSeparator::Comma,
            bracketed: false,
        };
        let mut visitor = CountingVisitor { leaves: 0 };
        value.accept(&mut visitor);
        assert_eq!(visitor.leaves, 3);
    }
}
