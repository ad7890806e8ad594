//! Celestial body record.
//!
//! # Responsibility
//! - Define the persisted shape of one celestial body.
//! - Keep wire naming stable for controller layers (`orbitRadius`, ...).
//!
//! # Invariants
//! - `id` is `None` until a store assigns it and never changes afterwards.
//! - `rotation_period` may be negative to mark retrograde rotation.

use crate::model::validation::{validate_body, ValidationError};
use serde::{Deserialize, Serialize};

/// Store-assigned identifier of a celestial body.
///
/// Allocated from a strictly increasing sequence starting at 1.
pub type BodyId = i64;

/// One celestial body with its physical and orbital measurements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CelestialBody {
    /// Assigned by the store on create. Absent on creation requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<BodyId>,
    /// Human-readable label. Must not be blank.
    pub name: String,
    /// Physical radius in kilometers.
    pub radius: f64,
    /// Mean distance from the parent body in millions of kilometers.
    pub orbit_radius: f64,
    /// Sidereal rotation in Earth days. Negative means retrograde.
    pub rotation_period: f64,
    /// Orbital period in Earth days.
    pub orbit_period: f64,
    /// Optional reference to a visual asset. Not interpreted by core.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub texture_url: Option<String>,
}

impl CelestialBody {
    /// Creates an unsaved body without a texture reference.
    pub fn new(
        name: impl Into<String>,
        radius: f64,
        orbit_radius: f64,
        rotation_period: f64,
        orbit_period: f64,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            radius,
            orbit_radius,
            rotation_period,
            orbit_period,
            texture_url: None,
        }
    }

    /// Returns this body with `texture_url` set.
    pub fn with_texture_url(mut self, texture_url: impl Into<String>) -> Self {
        self.texture_url = Some(texture_url.into());
        self
    }

    /// Checks every field constraint and reports all violations at once.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_body(self)
    }

    /// Returns whether the body spins against its orbital direction.
    pub fn is_retrograde(&self) -> bool {
        self.rotation_period < 0.0
    }

    /// Compares all mutable fields, ignoring `id`.
    pub fn same_fields(&self, other: &CelestialBody) -> bool {
        self.name == other.name
            && self.radius == other.radius
            && self.orbit_radius == other.orbit_radius
            && self.rotation_period == other.rotation_period
            && self.orbit_period == other.orbit_period
            && self.texture_url == other.texture_url
    }

    /// Returns a copy carrying the given store identifier.
    ///
    /// Negative zero is stored as `0.0`; SQLite does not keep the sign.
    pub(crate) fn stored_as(&self, id: BodyId) -> Self {
        Self {
            id: Some(id),
            name: self.name.clone(),
            radius: positive_zero(self.radius),
            orbit_radius: positive_zero(self.orbit_radius),
            rotation_period: positive_zero(self.rotation_period),
            orbit_period: positive_zero(self.orbit_period),
            texture_url: self.texture_url.clone(),
        }
    }
}

fn positive_zero(value: f64) -> f64 {
    if value == 0.0 {
        0.0
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::CelestialBody;

    #[test]
    fn same_fields_ignores_identifier() {
        let draft = CelestialBody::new("Io", 1821.6, 0.4217, 1.769, 1.769);
        let stored = draft.stored_as(7);

        assert!(draft.same_fields(&stored));
        assert_ne!(draft, stored);
    }

    #[test]
    fn stored_copy_drops_negative_zero_sign() {
        let draft = CelestialBody::new("Phobos", -0.0, 9.376e-3, -0.0, 0.319);
        let stored = draft.stored_as(1);

        assert!(stored.radius.is_sign_positive());
        assert!(stored.rotation_period.is_sign_positive());
        assert!(!stored.is_retrograde());
        assert!(draft.same_fields(&stored));
    }

    #[test]
    fn negative_rotation_is_retrograde() {
        let venus = CelestialBody::new("Venus", 6051.8, 108.2, -243.0, 224.7);
        assert!(venus.is_retrograde());
        assert!(!CelestialBody::new("Mars", 3389.5, 227.9, 1.03, 687.0).is_retrograde());
    }
}
