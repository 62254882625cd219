// SPDX-License-Identifier: Apache-2.0

//! `SassNumber`: a double plus numerator/denominator unit lists.
//!
//! Full CSS unit-conversion algebra (e.g. `1in == 96px`) is a large,
//! self-contained subsystem of its own and isn't part of what this
//! design calls the hard part (design §1 scopes color-space conversion
//! out for the same reason: it's a lot of domain tables, not
//! supervisor/protocol logic). Equality here compares the numeric value
//! plus the unit lists as written, without attempting cross-unit
//! conversion — noted as a simplification in DESIGN.md.

use std::hash::{Hash, Hasher};

#[derive(Debug, Clone)]
pub struct SassNumber {
    pub value: f64,
    pub numerator_units: Vec<String>,
    pub denominator_units: Vec<String>,
}

impl SassNumber {
    pub fn unitless(value: f64) -> Self {
        SassNumber { value, numerator_units: Vec::new(), denominator_units: Vec::new() }
    }

    pub fn with_unit(value: f64, unit: impl Into<String>) -> Self {
        SassNumber { value, numerator_units: vec![unit.into()], denominator_units: Vec::new() }
    }

    pub fn is_integer(&self) -> bool {
        self.value.fract() == 0.0 && self.value.is_finite()
    }

    pub fn is_unitless(&self) -> bool {
        self.numerator_units.is_empty() && self.denominator_units.is_empty()
    }
}

impl PartialEq for SassNumber {
    fn eq(&self, other: &Self) -> bool {
        self.value.to_bits() == other.value.to_bits()
            && self.numerator_units == other.numerator_units
            && self.denominator_units == other.denominator_units
    }
}

impl Eq for SassNumber {}

impl Hash for SassNumber {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.to_bits().hash(state);
        self.numerator_units.hash(state);
        self.denominator_units.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_predicate() {
        assert!(SassNumber::unitless(4.0).is_integer());
        assert!(!SassNumber::unitless(4.5).is_integer());
    }

    #[test]
    fn equality_is_unit_list_sensitive() {
        let px = SassNumber::with_unit(4.0, "px");
        let em = SassNumber::with_unit(4.0, "em");
        assert_ne!(px, em);
        assert_eq!(px, SassNumber::with_unit(4.0, "px"));
    }
}
