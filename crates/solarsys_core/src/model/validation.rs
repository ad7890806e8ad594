//! Field constraints for celestial bodies.
//!
//! # Responsibility
//! - Gate admission of bodies into a store.
//! - Report every violated constraint in one pass so callers can fix all
//!   fields in a single round trip.
//!
//! # Invariants
//! - Violations are reported in field declaration order.
//! - `rotationPeriod` has no sign constraint; only finiteness is checked.

use crate::model::celestial_body::CelestialBody;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// One violated field constraint.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldViolation {
    /// `name` is empty or whitespace-only.
    EmptyName,
    /// A measurement that must be `>= 0` is negative.
    Negative { field: &'static str, value: f64 },
    /// A measurement is NaN or infinite.
    NotFinite { field: &'static str },
}

impl FieldViolation {
    /// Wire name of the offending field.
    pub fn field(&self) -> &'static str {
        match *self {
            Self::EmptyName => "name",
            Self::Negative { field, .. } | Self::NotFinite { field } => field,
        }
    }
}

impl Display for FieldViolation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::Negative { field, value } => write!(f, "{field} ({value}) must be >= 0"),
            Self::NotFinite { field } => write!(f, "{field} must be a finite number"),
        }
    }
}

/// Validation failure carrying the complete list of violations.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    violations: Vec<FieldViolation>,
}

impl ValidationError {
    /// All violated constraints, never empty.
    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    /// Returns whether any violation concerns `field`.
    pub fn has_field(&self, field: &str) -> bool {
        self.violations.iter().any(|item| item.field() == field)
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid celestial body: ")?;
        for (index, violation) in self.violations.iter().enumerate() {
            if index > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}

impl Error for ValidationError {}

/// Validates one candidate body against all field constraints.
///
/// # Errors
/// - Returns `ValidationError` listing every violated constraint.
pub fn validate_body(body: &CelestialBody) -> Result<(), ValidationError> {
    let mut violations = Vec::new();

    if body.name.trim().is_empty() {
        violations.push(FieldViolation::EmptyName);
    }

    check_non_negative(&mut violations, "radius", body.radius);
    check_non_negative(&mut violations, "orbitRadius", body.orbit_radius);
    if !body.rotation_period.is_finite() {
        violations.push(FieldViolation::NotFinite {
            field: "rotationPeriod",
        });
    }
    check_non_negative(&mut violations, "orbitPeriod", body.orbit_period);

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { violations })
    }
}

fn check_non_negative(violations: &mut Vec<FieldViolation>, field: &'static str, value: f64) {
    if !value.is_finite() {
        violations.push(FieldViolation::NotFinite { field });
    } else if value < 0.0 {
        violations.push(FieldViolation::Negative { field, value });
    }
}
