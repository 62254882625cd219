// SPDX-License-Identifier: Apache-2.0

//! Stateless conversions between the Value Model / `Span` / `Diagnostic`
//! types in `sass-embedded-common` and their wire counterparts (design
//! §4.2). Encoding drives `Value::accept` with a `ValueVisitor` that
//! builds `WireValue`s bottom-up; decoding is a plain recursive
//! function over `WireValue`, since there's no equivalent "accept" to
//! drive on the wire side.

use sass_embedded_common::{
    CompilerFunctionId, Diagnostic, DiagnosticKind, DynamicFunctionRef, InputSyntax, ListSeparator,
    OutputStyle, ProtocolError, SassColor, SassNumber, Span, Value, ValueVisitor,
};

use crate::wire::{
    self, wire_value, LogEventKind, SourceSpan, WireListSeparator, WireLocation, WireSingleton,
    WireValue,
};

// ---------------------------------------------------------------------
// OutputStyle / Syntax
// ---------------------------------------------------------------------

pub fn style_to_wire(style: OutputStyle) -> wire::OutputStyle {
    match style {
        OutputStyle::Expanded => wire::OutputStyle::Expanded,
        OutputStyle::Compact => wire::OutputStyle::Compact,
        OutputStyle::Compressed => wire::OutputStyle::Compressed,
    }
}

pub fn syntax_to_wire(syntax: InputSyntax) -> wire::Syntax {
    match syntax {
        InputSyntax::Scss => wire::Syntax::Scss,
        InputSyntax::Indented => wire::Syntax::Indented,
        InputSyntax::Css => wire::Syntax::Css,
    }
}

pub fn syntax_from_wire(syntax: i32) -> Result<InputSyntax, ProtocolError> {
    match wire::Syntax::try_from(syntax).ok() {
        Some(wire::Syntax::Scss) => Ok(InputSyntax::Scss),
        Some(wire::Syntax::Indented) => Ok(InputSyntax::Indented),
        Some(wire::Syntax::Css) => Ok(InputSyntax::Css),
        None => Err(ProtocolError::UnknownDiscriminant { field: "Syntax", discriminant: syntax }),
    }
}

// ---------------------------------------------------------------------
// Value
// ---------------------------------------------------------------------

/// Encodes a [`Value`] to its wire form.
pub fn value_to_wire(value: &Value) -> WireValue {
    let mut encoder = Encoder;
    value.accept(&mut encoder)
}

struct Encoder;

impl ValueVisitor for Encoder {
    type Output = WireValue;

    fn visit_string(&mut self, text: &str, quoted: bool) -> WireValue {
        WireValue {
            value: Some(wire_value::Value::String(wire_value::WireString {
                text: text.to_owned(),
                quoted,
            })),
        }
    }

    fn visit_number(&mut self, number: &SassNumber) -> WireValue {
        WireValue {
            value: Some(wire_value::Value::Number(wire_value::WireNumber {
                value: number.value,
                numerator_units: number.numerator_units.clone(),
                denominator_units: number.denominator_units.clone(),
            })),
        }
    }

    fn visit_color(&mut self, color: &SassColor) -> WireValue {
        let inner = if color.is_hsl_primary() {
            wire_value::Value::HslaColor(wire_value::WireHsla {
                hue: color.hue(),
                saturation: color.saturation(),
                lightness: color.lightness(),
                alpha: color.alpha(),
            })
        } else {
            wire_value::Value::RgbaColor(wire_value::WireRgba {
                red: color.red() as u32,
                green: color.green() as u32,
                blue: color.blue() as u32,
                alpha: color.alpha(),
            })
        };
        WireValue { value: Some(inner) }
    }

    fn visit_bool(&mut self, value: bool) -> WireValue {
        let singleton = if value { WireSingleton::True } else { WireSingleton::False };
        WireValue { value: Some(wire_value::Value::Singleton(singleton as i32)) }
    }

    fn visit_null(&mut self) -> WireValue {
        WireValue { value: Some(wire_value::Value::Singleton(WireSingleton::Null as i32)) }
    }

    fn visit_list(&mut self, items: Vec<WireValue>, separator: ListSeparator, bracketed: bool) -> WireValue {
        WireValue {
            value: Some(wire_value::Value::List(wire_value::WireList {
                contents: items,
                separator: separator_to_wire(separator) as i32,
                has_brackets: bracketed,
            })),
        }
    }

    fn visit_map(&mut self, entries: Vec<(WireValue, WireValue)>) -> WireValue {
        let entries = entries
            .into_iter()
            .map(|(key, value)| wire_value::WireMapEntry { key: Some(key), value: Some(value) })
            .collect();
        WireValue { value: Some(wire_value::Value::Map(wire_value::WireMap { entries })) }
    }

    fn visit_compiler_function(&mut self, id: CompilerFunctionId) -> WireValue {
        WireValue {
            value: Some(wire_value::Value::CompilerFunction(wire_value::WireCompilerFunction {
                id: id.0,
            })),
        }
    }

    fn visit_dynamic_function(&mut self, reference: &DynamicFunctionRef) -> WireValue {
        WireValue {
            value: Some(wire_value::Value::HostFunction(wire_value::WireHostFunction {
                id: reference.id,
                signature: reference.signature.clone(),
            })),
        }
    }
}

fn separator_to_wire(separator: ListSeparator) -> WireListSeparator {
    match separator {
        ListSeparator::Comma => WireListSeparator::Comma,
        ListSeparator::Space => WireListSeparator::Space,
        ListSeparator::Slash => WireListSeparator::Slash,
        ListSeparator::Undecided => WireListSeparator::Undecided,
    }
}

fn separator_from_wire(separator: i32) -> Result<ListSeparator, ProtocolError> {
    match WireListSeparator::try_from(separator).ok() {
        Some(WireListSeparator::Comma) => Ok(ListSeparator::Comma),
        Some(WireListSeparator::Space) => Ok(ListSeparator::Space),
        Some(WireListSeparator::Slash) => Ok(ListSeparator::Slash),
        Some(WireListSeparator::Undecided) => Ok(ListSeparator::Undecided),
        None => Err(ProtocolError::UnknownDiscriminant {
            field: "WireList.separator",
            discriminant: separator,
        }),
    }
}

/// Decodes a wire value back into a [`Value`]. There's no visitor to
/// drive on this side (the wire form doesn't implement `accept`), so
/// this just recurses directly over `WireValue`.
pub fn wire_to_value(wire: &WireValue) -> Result<Value, ProtocolError> {
    match wire.value.as_ref().ok_or(ProtocolError::MissingField("WireValue.value"))? {
        wire_value::Value::String(s) => Ok(Value::String { text: s.text.clone(), quoted: s.quoted }),
        wire_value::Value::Number(n) => Ok(Value::Number(SassNumber {
            value: n.value,
            numerator_units: n.numerator_units.clone(),
            denominator_units: n.denominator_units.clone(),
        })),
        wire_value::Value::RgbaColor(c) => {
            Ok(Value::Color(SassColor::rgba(c.red as u8, c.green as u8, c.blue as u8, c.alpha)))
        }
        wire_value::Value::HslaColor(c) => {
            Ok(Value::Color(SassColor::hsla(c.hue, c.saturation, c.lightness, c.alpha)))
        }
        wire_value::Value::Singleton(s) => match WireSingleton::try_from(*s).ok() {
            Some(WireSingleton::True) => Ok(Value::Bool(true)),
            Some(WireSingleton::False) => Ok(Value::Bool(false)),
            Some(WireSingleton::Null) => Ok(Value::Null),
            None => Err(ProtocolError::UnknownDiscriminant {
                field: "WireValue.singleton",
                discriminant: *s,
            }),
        },
        wire_value::Value::List(list) => {
            let items = list
                .contents
                .iter()
                .map(wire_to_value)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::List {
                items,
                separator: separator_from_wire(list.separator)?,
                bracketed: list.has_brackets,
            })
        }
        wire_value::Value::Map(map) => {
            let entries = map
                .entries
                .iter()
                .map(|entry| {
                    let key = entry
                        .key
                        .as_ref()
                        .ok_or(ProtocolError::MissingField("WireMapEntry.key"))?;
                    let value = entry
                        .value
                        .as_ref()
                        .ok_or(ProtocolError::MissingField("WireMapEntry.value"))?;
                    Ok((wire_to_value(key)?, wire_to_value(value)?))
                })
                .collect::<Result<Vec<_>, ProtocolError>>()?;
            Ok(Value::Map(entries))
        }
        wire_value::Value::CompilerFunction(f) => Ok(Value::CompilerFunction(CompilerFunctionId(f.id))),
        wire_value::Value::HostFunction(f) => {
            Ok(Value::DynamicFunction(DynamicFunctionRef { id: f.id, signature: f.signature.clone() }))
        }
    }
}

// ---------------------------------------------------------------------
// Span / Location
// ---------------------------------------------------------------------

pub fn location_to_wire(location: sass_embedded_common::Location) -> WireLocation {
    WireLocation { offset: location.offset, line: location.line, column: location.column }
}

pub fn location_from_wire(wire: &WireLocation) -> sass_embedded_common::Location {
    sass_embedded_common::Location::new(wire.offset, wire.line, wire.column)
}

pub fn span_to_wire(span: &Span) -> SourceSpan {
    SourceSpan {
        text: span.text.clone(),
        url: span.url.clone(),
        start: Some(location_to_wire(span.start)),
        end: span.end.map(location_to_wire),
        context: span.context.clone(),
    }
}

pub fn span_from_wire(wire: &SourceSpan) -> Result<Span, ProtocolError> {
    let start = wire
        .start
        .as_ref()
        .ok_or(ProtocolError::MissingField("SourceSpan.start"))?;
    Ok(Span {
        text: wire.text.clone(),
        url: wire.url.clone(),
        start: location_from_wire(start),
        end: wire.end.as_ref().map(location_from_wire),
        context: wire.context.clone(),
    })
}

pub fn span_to_wire_opt(span: Option<&Span>) -> Option<SourceSpan> {
    span.map(span_to_wire)
}

pub fn span_from_wire_opt(wire: Option<&SourceSpan>) -> Result<Option<Span>, ProtocolError> {
    wire.map(span_from_wire).transpose()
}

// ---------------------------------------------------------------------
// Diagnostic / LogEvent
// ---------------------------------------------------------------------

pub fn diagnostic_kind_to_wire(kind: DiagnosticKind) -> LogEventKind {
    match kind {
        DiagnosticKind::Warning => LogEventKind::Warning,
        DiagnosticKind::Deprecation => LogEventKind::Deprecation,
        DiagnosticKind::Debug => LogEventKind::DebugMessage,
    }
}

pub fn diagnostic_kind_from_wire(kind: i32) -> Result<DiagnosticKind, ProtocolError> {
    match LogEventKind::try_from(kind).ok() {
        Some(LogEventKind::Warning) => Ok(DiagnosticKind::Warning),
        Some(LogEventKind::Deprecation) => Ok(DiagnosticKind::Deprecation),
        Some(LogEventKind::DebugMessage) => Ok(DiagnosticKind::Debug),
        None => Err(ProtocolError::UnknownDiscriminant { field: "LogEvent.kind", discriminant: kind }),
    }
}

pub fn diagnostic_from_log_event(event: &wire::LogEvent) -> Result<Diagnostic, ProtocolError> {
    Ok(Diagnostic {
        kind: diagnostic_kind_from_wire(event.kind)?,
        text: event.message.clone(),
        span: span_from_wire_opt(event.span.as_ref())?,
        stack: event.stack_trace.clone(),
    })
}

pub fn log_event_from_diagnostic(compilation_id: u32, diagnostic: &Diagnostic) -> wire::LogEvent {
    wire::LogEvent {
        compilation_id,
        kind: diagnostic_kind_to_wire(diagnostic.kind) as i32,
        message: diagnostic.text.clone(),
        span: span_to_wire_opt(diagnostic.span.as_ref()),
        stack_trace: diagnostic.stack.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sass_embedded_common::Location;

    #[test]
    fn round_trips_a_quoted_string() {
        let value = Value::String { text: "hello".into(), quoted: true };
        let wire = value_to_wire(&value);
        assert_eq!(wire_to_value(&wire).expect("decodes"), value);
    }

    #[test]
    fn round_trips_a_map_preserving_order_independent_equality() {
        let value = Value::map(vec![
            (Value::String { text: "a".into(), quoted: true }, Value::Bool(true)),
            (Value::String { text: "b".into(), quoted: true }, Value::Null),
        ]);
        let wire = value_to_wire(&value);
        assert_eq!(wire_to_value(&wire).expect("decodes"), value);
    }

    #[test]
    fn rgb_color_round_trips_without_forcing_hsl() {
        let color = SassColor::rgba(10, 20, 30, 0.5);
        let value = Value::Color(color);
        let wire = value_to_wire(&value);
        match &wire.value {
            Some(wire_value::Value::RgbaColor(_)) => {}
            other => panic!("expected RgbaColor, got {other:?}"),
        }
        assert_eq!(wire_to_value(&wire).expect("decodes"), value);
    }

    #[test]
    fn span_round_trips() {
        let span = Span {
            text: Some("a { }".into()),
            url: Some("input.scss".into()),
            start: Location::new(0, 0, 0),
            end: Some(Location::new(5, 0, 5)),
            context: Some("a { }".into()),
        };
        let wire = span_to_wire(&span);
        assert_eq!(span_from_wire(&wire).expect("decodes"), span);
    }

    #[test]
    fn unknown_singleton_discriminant_is_a_protocol_error() {
        let wire = WireValue { value: Some(wire_value::Value::Singleton(99)) };
        assert!(matches!(
            wire_to_value(&wire),
            Err(ProtocolError::UnknownDiscriminant { field: "WireValue.singleton", discriminant: 99 })
        ));
    }

    #[test]
    fn style_to_wire_covers_every_variant() {
        assert_eq!(style_to_wire(OutputStyle::Expanded), wire::OutputStyle::Expanded);
        assert_eq!(style_to_wire(OutputStyle::Compact), wire::OutputStyle::Compact);
        assert_eq!(style_to_wire(OutputStyle::Compressed), wire::OutputStyle::Compressed);
    }

    #[test]
    fn syntax_round_trips_through_the_wire_discriminant() {
        for syntax in [InputSyntax::Scss, InputSyntax::Indented, InputSyntax::Css] {
            let wire = syntax_to_wire(syntax);
            assert_eq!(syntax_from_wire(wire as i32).expect("decodes"), syntax);
        }
    }

    #[test]
    fn unknown_syntax_discriminant_is_a_protocol_error() {
        assert!(matches!(
            syntax_from_wire(99),
            Err(ProtocolError::UnknownDiscriminant { field: "Syntax", discriminant: 99 })
        ));
    }
}
