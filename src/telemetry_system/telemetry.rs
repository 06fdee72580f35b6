use std::collections::VecDeque;

use serde::Serialize;

use crate::trajectory_system::state::FlightState;

const DEFAULT_HISTORY: usize = 600;
/// Height above ground that counts as lift-off, m.
const AIRBORNE_HEIGHT: f64 = 1.5;
const TOUCHDOWN_HEIGHT: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FlightEvent {
    Airborne,
    Landed,
    EngineOut,
    Crashed,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TelemetrySample {
    pub sim_time: f64,
    pub altitude: f64,
    pub airspeed: f64,
    pub vertical_speed: f64,
    pub heading: f64,
    pub g_force: f64,
    pub fuel: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TelemetrySummary {
    pub flight_time: f64,
    pub max_airspeed: f64,
    pub max_altitude: f64,
    pub max_g_force: f64,
    pub min_fuel: f64,
    pub score: f64,
    pub events: Vec<(FlightEvent, f64)>,
}

/// Flight recorder fed once per step.
pub struct Telemetry {
    ground_elevation: f64,
    history: VecDeque<TelemetrySample>,
    capacity: usize,
    events: Vec<(FlightEvent, f64)>,
    airborne: Option<bool>,
    engine_on: bool,
    crashed: bool,
    max_airspeed: f64,
    max_altitude: f64,
    max_g_force: f64,
    min_fuel: f64,
    score: f64,
    simulation_time: f64,
}

impl Telemetry {
    pub fn new(ground_elevation: f64) -> Self {
        Self::with_capacity(ground_elevation, DEFAULT_HISTORY)
    }

    pub fn with_capacity(ground_elevation: f64, capacity: usize) -> Self {
        Telemetry {
            ground_elevation,
            history: VecDeque::with_capacity(capacity),
            capacity,
            events: Vec::new(),
            airborne: None,
            engine_on: true,
            crashed: false,
            max_airspeed: 0.0,
            max_altitude: ground_elevation,
            max_g_force: 0.0,
            min_fuel: f64::MAX,
            score: 0.0,
            simulation_time: 0.0,
        }
    }

    fn format_time(elapsed_time: f64) -> String {
        if elapsed_time >= 3600.0 {
            let hours = (elapsed_time / 3600.0).floor();
            let minutes = ((elapsed_time % 3600.0) / 60.0).floor();
            let seconds = elapsed_time % 60.0;
            format!("{:.0}h {:.0}m {:.2}s", hours, minutes, seconds)
        } else if elapsed_time >= 60.0 {
            let minutes = (elapsed_time / 60.0).floor();
            let seconds = elapsed_time % 60.0;
            format!("{:.0}m {:.2}s", minutes, seconds)
        } else {
            format!("{:.2}s", elapsed_time)
        }
    }

    fn format_altitude(altitude_m: f64) -> String {
        format!("{:.0} ft", altitude_m * 3.28084)
    }

    fn record_event(&mut self, event: FlightEvent, sim_time: f64) {
        log::info!("{:?} at {}", event, Self::format_time(sim_time));
        self.events.push((event, sim_time));
    }

    pub fn collect_data(&mut self, state: &FlightState, sim_time: f64) {
        self.simulation_time = sim_time;

        let altitude = state.position.altitude;
        self.max_airspeed = self.max_airspeed.max(state.airspeed);
        self.max_altitude = self.max_altitude.max(altitude);
        self.max_g_force = self.max_g_force.max(state.g_force);
        self.min_fuel = self.min_fuel.min(state.fuel);
        self.score = state.score;

        if state.crashed && !self.crashed {
            self.crashed = true;
            self.record_event(FlightEvent::Crashed, sim_time);
        }
        if !state.engine_on && self.engine_on {
            self.engine_on = false;
            self.record_event(FlightEvent::EngineOut, sim_time);
        }

        let height = state.altitude_above(self.ground_elevation);
        let airborne = match self.airborne {
            Some(true) => height > TOUCHDOWN_HEIGHT,
            _ => height > AIRBORNE_HEIGHT,
        };
        match self.airborne {
            Some(false) if airborne => self.record_event(FlightEvent::Airborne, sim_time),
            Some(true) if !airborne && !state.crashed => self.record_event(FlightEvent::Landed, sim_time),
            _ => {}
        }
        self.airborne = Some(airborne);

        if self.history.len() == self.capacity {
            self.history.pop_front();
        }
        if self.capacity > 0 {
            self.history.push_back(TelemetrySample {
                sim_time,
                altitude,
                airspeed: state.airspeed,
                vertical_speed: state.vertical_speed,
                heading: state.heading_degrees(),
                g_force: state.g_force,
                fuel: state.fuel,
            });
        }
    }

    pub fn history(&self) -> impl Iterator<Item = &TelemetrySample> {
        self.history.iter()
    }

    pub fn latest(&self) -> Option<&TelemetrySample> {
        self.history.back()
    }

    pub fn events(&self) -> &[(FlightEvent, f64)] {
        &self.events
    }

    pub fn summary(&self) -> TelemetrySummary {
        TelemetrySummary {
            flight_time: self.simulation_time,
            max_airspeed: self.max_airspeed,
            max_altitude: self.max_altitude,
            max_g_force: self.max_g_force,
            min_fuel: if self.min_fuel == f64::MAX { 0.0 } else { self.min_fuel },
            score: self.score,
            events: self.events.clone(),
        }
    }

    pub fn display_data(&self) {
        if let Some(sample) = self.latest() {
            log::info!(
                "T+{} | ALT {} | IAS {:.0} kt | VS {:.0} fpm | HDG {:03.0} | G {:.2} | Fuel {:.1} kg",
                Self::format_time(sample.sim_time),
                Self::format_altitude(sample.altitude),
                sample.airspeed,
                sample.vertical_speed,
                sample.heading,
                sample.g_force,
                sample.fuel
            );
        }

        let summary = self.summary();
        log::info!("--- Flight Summary ---");
        log::info!("Flight time: {}", Self::format_time(summary.flight_time));
        log::info!("Max airspeed: {:.1} kt", summary.max_airspeed);
        log::info!("Max altitude: {}", Self::format_altitude(summary.max_altitude));
        log::info!("Max load: {:.2} g", summary.max_g_force);
        log::info!("Min fuel: {:.1} kg", summary.min_fuel);
        log::info!("Score: {:.1}", summary.score);
        for (event, time) in &summary.events {
            log::info!("{:?} at {}", event, Self::format_time(*time));
        }
    }
}
