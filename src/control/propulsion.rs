use crate::config::FlightModelConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineState {
    pub fuel: f64,
    pub engine_on: bool,
}

pub struct PropulsionSystem {
    pub max_thrust: f64,
}

impl PropulsionSystem {
    pub fn new(max_thrust: f64) -> Self {
        PropulsionSystem { max_thrust }
    }

    pub fn thrust(&self, throttle: f64, engine_on: bool) -> f64 {
        if engine_on {
            self.max_thrust * throttle
        } else {
            0.0
        }
    }

    // kg/s, idle included
    pub fn fuel_flow(&self, throttle: f64, config: &FlightModelConfig) -> f64 {
        (config.idle_fuel_flow + throttle * config.throttle_fuel_gain)
            * (self.max_thrust / config.thrust_per_fuel_flow)
    }

    /// Burns fuel for one step. Once the tank is empty the engine stays off
    /// for the rest of the flight.
    pub fn burn(
        &self,
        fuel: f64,
        engine_on: bool,
        throttle: f64,
        delta_time: f64,
        config: &FlightModelConfig,
    ) -> EngineState {
        if !engine_on {
            return EngineState {
                fuel,
                engine_on: false,
            };
        }

        let fuel = (fuel - self.fuel_flow(throttle, config) * delta_time).max(0.0);
        EngineState {
            fuel,
            engine_on: fuel > 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_thrust_scales_with_throttle() {
        let ps = PropulsionSystem::new(4_200.0);
        assert_eq!(ps.thrust(0.5, true), 2_100.0);
        assert_eq!(ps.thrust(1.0, false), 0.0);
    }

    #[test]
    fn test_fuel_flow_idle_and_full() {
        let ps = PropulsionSystem::new(100_000.0);
        let config = FlightModelConfig::default();

        assert_relative_eq!(ps.fuel_flow(0.0, &config), 0.08, epsilon = 1e-12);
        assert_relative_eq!(ps.fuel_flow(1.0, &config), 1.03, epsilon = 1e-12);
    }

    #[test]
    fn test_burn_with_fuel() {
        let ps = PropulsionSystem::new(100_000.0);
        let config = FlightModelConfig::default();
        let state = ps.burn(10.0, true, 1.0, 1.0, &config);

        assert_relative_eq!(state.fuel, 8.97, epsilon = 1e-12);
        assert!(state.engine_on);
    }

    #[test]
    fn test_burn_out_of_fuel() {
        let ps = PropulsionSystem::new(100_000.0);
        let config = FlightModelConfig::default();
        let state = ps.burn(0.5, true, 1.0, 1.0, &config);

        assert_eq!(state.fuel, 0.0);
        assert!(!state.engine_on);
    }

    #[test]
    fn test_engine_off_does_not_burn() {
        let ps = PropulsionSystem::new(100_000.0);
        let config = FlightModelConfig::default();
        let state = ps.burn(3.0, false, 1.0, 1.0, &config);

        assert_eq!(state.fuel, 3.0);
        assert!(!state.engine_on);
    }
}
