use serde::{Deserialize, Serialize};

use crate::errors::SimulationError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlAuthority {
    pub pitch: f64,
    pub roll: f64,
    pub yaw: f64,
}

// kg·m²
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Inertia {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AircraftProfile {
    pub id: String,
    pub name: String,
    pub mass: f64, // kg
    pub wing_area: f64, // m²
    pub max_thrust: f64, // N
    pub max_fuel: f64, // kg
    pub control_authority: ControlAuthority,
    pub drag_coefficient: f64,
    pub lift_slope: f64, // per rad
    pub stall_aoa: f64, // rad
    /// Effective zero-lift offset of the wing (incidence plus camber), rad.
    pub wing_incidence: f64,
    // Takeoff rotation: indicated airspeed in knots, held pitch in rad
    pub rotation_speed: f64,
    pub rotation_pitch: f64,
    pub inertia: Inertia,
}

impl AircraftProfile {
    pub fn weight(&self, gravity: f64) -> f64 {
        self.mass * gravity
    }

    pub fn cessna_172() -> Self {
        AircraftProfile {
            id: "c172".to_string(),
            name: "Cessna 172".to_string(),
            mass: 1_111.0,
            wing_area: 16.2,
            max_thrust: 4_200.0,
            max_fuel: 212.0,
            control_authority: ControlAuthority {
                pitch: 1.1,
                roll: 1.0,
                yaw: 0.8,
            },
            drag_coefficient: 0.032,
            lift_slope: 5.6,
            stall_aoa: 0.28,
            wing_incidence: 0.12,
            rotation_speed: 55.0,
            rotation_pitch: 0.14,
            inertia: Inertia {
                x: 1_450.0,
                y: 2_100.0,
                z: 2_850.0,
            },
        }
    }

    pub fn boeing_737() -> Self {
        AircraftProfile {
            id: "b737".to_string(),
            name: "Boeing 737".to_string(),
            mass: 41_413.0,
            wing_area: 124.6,
            max_thrust: 242_000.0,
            max_fuel: 26_000.0,
            control_authority: ControlAuthority {
                pitch: 0.55,
                roll: 0.5,
                yaw: 0.45,
            },
            drag_coefficient: 0.022,
            lift_slope: 5.1,
            stall_aoa: 0.24,
            wing_incidence: 0.1,
            rotation_speed: 130.0,
            rotation_pitch: 0.16,
            inertia: Inertia {
                x: 150_000.0,
                y: 230_000.0,
                z: 350_000.0,
            },
        }
    }

    pub fn fa_18() -> Self {
        AircraftProfile {
            id: "fa18".to_string(),
            name: "F/A-18".to_string(),
            mass: 16_800.0,
            wing_area: 37.2,
            max_thrust: 157_000.0,
            max_fuel: 4_900.0,
            control_authority: ControlAuthority {
                pitch: 1.5,
                roll: 1.55,
                yaw: 1.2,
            },
            drag_coefficient: 0.028,
            lift_slope: 6.4,
            stall_aoa: 0.36,
            wing_incidence: 0.08,
            rotation_speed: 140.0,
            rotation_pitch: 0.14,
            inertia: Inertia {
                x: 29_000.0,
                y: 43_000.0,
                z: 62_000.0,
            },
        }
    }

    pub fn catalog() -> Vec<AircraftProfile> {
        vec![Self::cessna_172(), Self::boeing_737(), Self::fa_18()]
    }

    pub fn find(id: &str) -> Result<AircraftProfile, SimulationError> {
        Self::catalog()
            .into_iter()
            .find(|profile| profile.id == id)
            .ok_or_else(|| SimulationError::UnknownProfile {
                kind: "aircraft",
                id: id.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::GRAVITY;

    #[test]
    fn test_catalog_ids_are_unique() {
        let catalog = AircraftProfile::catalog();
        let mut ids: Vec<_> = catalog.iter().map(|a| a.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), catalog.len());
    }

    #[test]
    fn test_find_known_aircraft() {
        let profile = AircraftProfile::find("b737").expect("b737 in catalog");
        assert_eq!(profile.name, "Boeing 737");
        assert_eq!(profile.max_thrust, 242_000.0);
    }

    #[test]
    fn test_find_unknown_aircraft() {
        let result = AircraftProfile::find("a380");
        assert!(matches!(
            result,
            Err(SimulationError::UnknownProfile { kind: "aircraft", .. })
        ));
    }

    #[test]
    fn test_every_profile_can_climb() {
        // Thrust-to-weight must at least overcome zero-lift drag at rest
        for profile in AircraftProfile::catalog() {
            assert!(profile.max_thrust > 0.0);
            assert!(profile.max_thrust / profile.weight(GRAVITY) > 0.1, "{}", profile.id);
        }
    }

    #[test]
    fn test_rotation_is_below_stall() {
        for profile in AircraftProfile::catalog() {
            assert!(profile.rotation_speed > 0.0, "{}", profile.id);
            assert!(profile.rotation_pitch > 0.0, "{}", profile.id);
            assert!(profile.rotation_pitch < profile.stall_aoa, "{}", profile.id);
        }
    }
}
