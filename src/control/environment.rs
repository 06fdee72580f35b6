use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::config::FlightModelConfig;
use crate::constants::KNOTS_TO_MPS;
use crate::errors::SimulationError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherPreset {
    pub id: String,
    pub name: String,
    pub wind_knots: f64,
    pub wind_direction: f64, // degrees true, blowing from
    pub gust_strength: f64, // m/s
    // Rendering-only
    pub cloud_density: f64,
    pub rain: f64,
    pub fog: f64,
}

impl WeatherPreset {
    #[allow(clippy::too_many_arguments)]
    fn preset(
        id: &str,
        name: &str,
        wind_knots: f64,
        wind_direction: f64,
        gust_strength: f64,
        cloud_density: f64,
        rain: f64,
        fog: f64,
    ) -> Self {
        WeatherPreset {
            id: id.to_string(),
            name: name.to_string(),
            wind_knots,
            wind_direction,
            gust_strength,
            cloud_density,
            rain,
            fog,
        }
    }

    pub fn catalog() -> Vec<WeatherPreset> {
        vec![
            Self::preset("calm", "Calm", 0.0, 0.0, 0.0, 0.0, 0.0, 0.0),
            Self::preset("clear", "Clear", 4.0, 270.0, 0.5, 0.1, 0.0, 0.01),
            Self::preset("cloudy", "Cloudy", 12.0, 240.0, 1.8, 0.5, 0.1, 0.03),
            Self::preset("storm", "Storm", 28.0, 200.0, 5.5, 0.95, 1.0, 0.08),
            Self::preset("windy", "Windy", 24.0, 300.0, 3.8, 0.35, 0.05, 0.02),
        ]
    }

    pub fn find(id: &str) -> Result<WeatherPreset, SimulationError> {
        Self::catalog()
            .into_iter()
            .find(|preset| preset.id == id)
            .ok_or_else(|| SimulationError::UnknownProfile {
                kind: "weather",
                id: id.to_string(),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Airport {
    pub id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: f64, // m MSL
    pub runway_heading: f64, // degrees true
}

impl Airport {
    fn airport(id: &str, name: &str, latitude: f64, longitude: f64, elevation: f64, runway_heading: f64) -> Self {
        Airport {
            id: id.to_string(),
            name: name.to_string(),
            latitude,
            longitude,
            elevation,
            runway_heading,
        }
    }

    pub fn catalog() -> Vec<Airport> {
        vec![
            Self::airport("wsss", "Singapore Changi", 1.3644, 103.9915, 7.0, 20.0),
            Self::airport("ksfo", "San Francisco Intl", 37.6189, -122.375, 4.0, 284.0),
            Self::airport("egll", "London Heathrow", 51.47, -0.4543, 25.0, 270.0),
            Self::airport("kden", "Denver Intl", 39.8561, -104.6737, 1_656.0, 353.0),
        ]
    }

    pub fn find(id: &str) -> Result<Airport, SimulationError> {
        Self::catalog()
            .into_iter()
            .find(|airport| airport.id == id)
            .ok_or_else(|| SimulationError::UnknownProfile {
                kind: "airport",
                id: id.to_string(),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentProfile {
    pub airport_id: String,
    pub weather_id: String,
    pub wind_knots: f64,
    pub wind_direction: f64,
    pub gust_strength: f64,
    /// Sea-level reference density, kg/m³. `None` defers to the model config.
    #[serde(default)]
    pub air_density: Option<f64>,
    pub ground_elevation: f64,
    pub runway_heading: f64,
    pub latitude: f64,
    pub longitude: f64,
}

impl EnvironmentProfile {
    pub fn compose(weather: &WeatherPreset, airport: &Airport) -> Self {
        EnvironmentProfile {
            airport_id: airport.id.clone(),
            weather_id: weather.id.clone(),
            wind_knots: weather.wind_knots,
            wind_direction: weather.wind_direction,
            gust_strength: weather.gust_strength,
            air_density: None,
            ground_elevation: airport.elevation,
            runway_heading: airport.runway_heading,
            latitude: airport.latitude,
            longitude: airport.longitude,
        }
    }

    pub fn lookup(airport_id: &str, weather_id: &str) -> Result<Self, SimulationError> {
        Ok(Self::compose(
            &WeatherPreset::find(weather_id)?,
            &Airport::find(airport_id)?,
        ))
    }

    pub fn id(&self) -> String {
        format!("{}/{}", self.airport_id, self.weather_id)
    }

    // Below sea level the reference density applies
    pub fn air_density(&self, altitude: f64, config: &FlightModelConfig) -> f64 {
        let reference = self.air_density.unwrap_or(config.sea_level_density);
        reference * (-altitude.max(0.0) / config.scale_height).exp()
    }

    /// Wind vector in NED m/s. A pure function of time and altitude, so
    /// replays with the same clock see the same gusts.
    pub fn wind_at(&self, sim_time: f64, altitude: f64) -> Vector3<f64> {
        let base = self.wind_knots * KNOTS_TO_MPS;
        let along_gust = self.gust_strength * (sim_time * 0.2 + altitude * 0.0015).sin();
        let cross_gust = self.gust_strength * (sim_time * 0.17).cos();

        // Air moves toward the reciprocal of the reported direction
        let (sin_dir, cos_dir) = self.wind_direction.to_radians().sin_cos();
        let downwind = Vector3::new(-cos_dir, -sin_dir, 0.0);
        let crosswind = Vector3::new(sin_dir, -cos_dir, 0.0);

        downwind * (base + along_gust) + crosswind * cross_gust
            + Vector3::new(0.0, 0.0, -0.15 * cross_gust)
    }
}
