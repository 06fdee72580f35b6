use chrono::Utc;

use crate::constants::INITIAL_THROTTLE;
use crate::errors::SimulationError;
use crate::persistence::SavedFlight;
use crate::trajectory_system::kinematics::{FlightModel, SixDofModel};
use crate::trajectory_system::state::FlightState;

use super::aircraft::AircraftProfile;
use super::controls::ControlInput;
use super::environment::{Airport, EnvironmentProfile, WeatherPreset};

/// One live flight. Only [`FlightSession::step`] replaces the state; readers
/// borrow it or take an owned snapshot.
pub struct FlightSession {
    aircraft: AircraftProfile,
    airport: Airport,
    weather: WeatherPreset,
    environment: EnvironmentProfile,
    model: Box<dyn FlightModel>,
    state: FlightState,
    controls: ControlInput,
    sim_time: f64,
}

impl FlightSession {
    pub fn new(aircraft_id: &str, airport_id: &str, weather_id: &str) -> Result<Self, SimulationError> {
        Self::with_model(
            aircraft_id,
            airport_id,
            weather_id,
            Box::new(SixDofModel::default()),
        )
    }

    pub fn with_model(
        aircraft_id: &str,
        airport_id: &str,
        weather_id: &str,
        model: Box<dyn FlightModel>,
    ) -> Result<Self, SimulationError> {
        let aircraft = AircraftProfile::find(aircraft_id)?;
        let airport = Airport::find(airport_id)?;
        let weather = WeatherPreset::find(weather_id)?;
        let environment = EnvironmentProfile::compose(&weather, &airport);
        let state = FlightState::on_runway(&environment, &aircraft);

        log::info!(
            "New flight: {} at {} ({})",
            aircraft.name,
            airport.name,
            weather.name
        );

        Ok(FlightSession {
            aircraft,
            airport,
            weather,
            environment,
            model,
            state,
            controls: ControlInput::neutral_with_throttle(INITIAL_THROTTLE),
            sim_time: 0.0,
        })
    }

    pub fn aircraft(&self) -> &AircraftProfile {
        &self.aircraft
    }

    pub fn airport(&self) -> &Airport {
        &self.airport
    }

    pub fn weather(&self) -> &WeatherPreset {
        &self.weather
    }

    pub fn environment(&self) -> &EnvironmentProfile {
        &self.environment
    }

    pub fn sim_time(&self) -> f64 {
        self.sim_time
    }

    pub fn set_controls(&mut self, controls: ControlInput) {
        self.controls = controls;
    }

    pub fn controls(&self) -> &ControlInput {
        &self.controls
    }

    pub fn state(&self) -> &FlightState {
        &self.state
    }

    pub fn snapshot(&self) -> FlightState {
        self.state.clone()
    }

    pub fn step(&mut self, delta_time: f64) -> &FlightState {
        self.sim_time += delta_time;
        self.state = self.model.step(
            &self.state,
            &self.controls,
            &self.aircraft,
            &self.environment,
            delta_time,
            self.sim_time,
        );
        &self.state
    }

    pub fn reset_at_airport(&mut self) {
        self.state = FlightState::on_runway(&self.environment, &self.aircraft);
        self.controls = ControlInput::neutral_with_throttle(INITIAL_THROTTLE);
        self.sim_time = 0.0;
        log::info!("Reset at {} runway {:.0}", self.airport.id, self.airport.runway_heading);
    }

    pub fn select_aircraft(&mut self, aircraft_id: &str) -> Result<(), SimulationError> {
        self.aircraft = AircraftProfile::find(aircraft_id)?;
        self.reset_at_airport();
        Ok(())
    }

    pub fn select_airport(&mut self, airport_id: &str) -> Result<(), SimulationError> {
        self.airport = Airport::find(airport_id)?;
        self.environment = EnvironmentProfile::compose(&self.weather, &self.airport);
        self.reset_at_airport();
        Ok(())
    }

    // Weather changes keep the aircraft state
    pub fn select_weather(&mut self, weather_id: &str) -> Result<(), SimulationError> {
        self.weather = WeatherPreset::find(weather_id)?;
        self.environment = EnvironmentProfile::compose(&self.weather, &self.airport);
        log::info!("Weather changed to {}", self.weather.name);
        Ok(())
    }

    pub fn to_saved(&self) -> SavedFlight {
        SavedFlight {
            aircraft_id: self.aircraft.id.clone(),
            airport_id: self.airport.id.clone(),
            weather_id: self.weather.id.clone(),
            sim_time: self.sim_time,
            state: self.state.clone(),
            saved_at: Utc::now(),
        }
    }

    /// Resumes a saved flight. Profiles are looked up again by id; on an
    /// unknown id the session is left untouched.
    pub fn restore(&mut self, saved: SavedFlight) -> Result<(), SimulationError> {
        let aircraft = AircraftProfile::find(&saved.aircraft_id)?;
        let airport = Airport::find(&saved.airport_id)?;
        let weather = WeatherPreset::find(&saved.weather_id)?;

        self.environment = EnvironmentProfile::compose(&weather, &airport);
        self.aircraft = aircraft;
        self.airport = airport;
        self.weather = weather;
        self.state = saved.state;
        self.sim_time = saved.sim_time;
        self.controls = ControlInput::neutral_with_throttle(self.state.throttle);

        log::info!(
            "Restored flight saved at {} (t={:.1}s)",
            saved.saved_at.to_rfc3339(),
            self.sim_time
        );
        Ok(())
    }
}
