//! Built-in solar system catalog.
//!
//! Mean radius in km, mean orbit radius in 10^6 km around the Sun, sidereal
//! rotation and orbital period in Earth days. Venus and Uranus rotate
//! retrograde and carry negative rotation periods.

use crate::model::celestial_body::CelestialBody;

struct CatalogEntry {
    name: &'static str,
    radius: f64,
    orbit_radius: f64,
    rotation_period: f64,
    orbit_period: f64,
    texture: &'static str,
}

const SOLAR_SYSTEM: &[CatalogEntry] = &[
    CatalogEntry {
        name: "Sun",
        radius: 696_340.0,
        orbit_radius: 0.0,
        rotation_period: 25.38,
        orbit_period: 0.0,
        texture: "sun.jpg",
    },
    CatalogEntry {
        name: "Mercury",
        radius: 2_439.7,
        orbit_radius: 57.9,
        rotation_period: 58.646,
        orbit_period: 87.969,
        texture: "mercury.jpg",
    },
    CatalogEntry {
        name: "Venus",
        radius: 6_051.8,
        orbit_radius: 108.2,
        rotation_period: -243.025,
        orbit_period: 224.701,
        texture: "venus.jpg",
    },
    CatalogEntry {
        name: "Earth",
        radius: 6_371.0,
        orbit_radius: 149.6,
        rotation_period: 1.0,
        orbit_period: 365.25,
        texture: "earth.jpg",
    },
    CatalogEntry {
        name: "Mars",
        radius: 3_389.5,
        orbit_radius: 227.9,
        rotation_period: 1.026,
        orbit_period: 686.98,
        texture: "mars.jpg",
    },
    CatalogEntry {
        name: "Jupiter",
        radius: 69_911.0,
        orbit_radius: 778.5,
        rotation_period: 0.41354,
        orbit_period: 4_332.59,
        texture: "jupiter.jpg",
    },
    CatalogEntry {
        name: "Saturn",
        radius: 58_232.0,
        orbit_radius: 1_433.5,
        rotation_period: 0.44401,
        orbit_period: 10_759.22,
        texture: "saturn.jpg",
    },
    CatalogEntry {
        name: "Uranus",
        radius: 25_362.0,
        orbit_radius: 2_872.5,
        rotation_period: -0.71833,
        orbit_period: 30_688.5,
        texture: "uranus.jpg",
    },
    CatalogEntry {
        name: "Neptune",
        radius: 24_622.0,
        orbit_radius: 4_495.1,
        rotation_period: 0.67125,
        orbit_period: 60_182.0,
        texture: "neptune.jpg",
    },
];

/// Returns the Sun followed by the eight planets, innermost first.
///
/// Bodies are unsaved (`id == None`).
pub fn solar_system() -> Vec<CelestialBody> {
    SOLAR_SYSTEM
        .iter()
        .map(|entry| {
            CelestialBody::new(
                entry.name,
                entry.radius,
                entry.orbit_radius,
                entry.rotation_period,
                entry.orbit_period,
            )
            .with_texture_url(entry.texture)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::solar_system;

    #[test]
    fn catalog_is_valid_and_ordered_by_distance() {
        let bodies = solar_system();
        assert_eq!(bodies.len(), 9);
        assert!(bodies.iter().all(|body| body.validate().is_ok()));
        assert!(bodies.iter().all(|body| body.id.is_none()));
        assert!(bodies
            .windows(2)
            .all(|pair| pair[0].orbit_radius < pair[1].orbit_radius));
    }

    #[test]
    fn venus_and_uranus_are_retrograde() {
        let retrograde: Vec<_> = solar_system()
            .into_iter()
            .filter(|body| body.is_retrograde())
            .map(|body| body.name)
            .collect();
        assert_eq!(retrograde, ["Venus", "Uranus"]);
    }
}
