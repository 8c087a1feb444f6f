//! OpenWeatherMap integration
//!
//! Fetches current conditions and the 5-day/3-hour forecast for a location,
//! then reduces the forecast samples into at most seven per-day summaries.

use chrono::NaiveDateTime;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Production API base. Tests point the client at a local mock instead.
pub const OPENWEATHER_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// Daily summaries are truncated to the first seven distinct calendar days.
const MAX_FORECAST_DAYS: usize = 7;

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("City or coordinates required")]
    InvalidLocation,

    #[error("Location not found")]
    LocationNotFound,

    #[error("Forecast unavailable")]
    ForecastUnavailable,
}

/// Where weather is requested for: a free-text city name or a coordinate pair.
#[derive(Debug, Clone, PartialEq)]
pub enum Location {
    City(String),
    Coordinates { lat: f64, lon: f64 },
}

impl Location {
    /// Build a location from raw request fields. A city name wins over
    /// coordinates when both are present; a blank city counts as absent.
    pub fn from_parts(
        city: Option<String>,
        lat: Option<f64>,
        lon: Option<f64>,
    ) -> Result<Self, WeatherError> {
        if let Some(city) = city {
            let city = city.trim().to_string();
            if !city.is_empty() {
                return Ok(Location::City(city));
            }
        }
        match (lat, lon) {
            (Some(lat), Some(lon)) => Ok(Location::Coordinates { lat, lon }),
            _ => Err(WeatherError::InvalidLocation),
        }
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        match self {
            Location::City(city) => vec![("q", city.clone())],
            Location::Coordinates { lat, lon } => {
                vec![("lat", lat.to_string()), ("lon", lon.to_string())]
            }
        }
    }
}

/// Snapshot of the weather at request time, shaped for the front-end.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub city: String,
    /// Temperature in whole °C.
    pub temp: i32,
    /// Relative humidity in percent, passed through verbatim.
    pub humidity: u8,
    /// Wind speed in m/s, rounded to two decimals.
    pub wind: f64,
    pub description: String,
}

/// Per-calendar-day aggregate of the 3-hour forecast samples.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyForecastEntry {
    pub date: String,
    pub min: i32,
    pub max: i32,
    /// Peak precipitation probability for the day, in percent.
    pub rain: u8,
}

pub struct WeatherClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl WeatherClient {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Fetch current conditions and the daily forecast summary for a location.
    ///
    /// The current-conditions call runs first; its failure skips the forecast
    /// call entirely, since the result would be discarded anyway.
    pub async fn resolve(
        &self,
        location: &Location,
    ) -> Result<(CurrentConditions, Vec<DailyForecastEntry>), WeatherError> {
        let current = self.current(location).await?;
        let daily = self.forecast(location).await?;
        Ok((current, daily))
    }

    /// Fetch and shape current conditions. Any upstream failure (transport,
    /// non-2xx, malformed body) collapses to `LocationNotFound`.
    pub async fn current(&self, location: &Location) -> Result<CurrentConditions, WeatherError> {
        let raw: openweather::CurrentResponse =
            self.fetch("weather", location).await.map_err(|err| {
                tracing::warn!(error = %err, "current conditions lookup failed");
                WeatherError::LocationNotFound
            })?;

        let description = raw
            .weather
            .first()
            .map(|w| w.description.clone())
            .unwrap_or_default();

        Ok(CurrentConditions {
            city: raw.name,
            temp: raw.main.temp.round() as i32,
            humidity: raw.main.humidity,
            wind: round_wind(raw.wind.speed),
            description,
        })
    }

    /// Fetch the 5-day/3-hour forecast and reduce it to daily summaries.
    pub async fn forecast(
        &self,
        location: &Location,
    ) -> Result<Vec<DailyForecastEntry>, WeatherError> {
        let raw: openweather::ForecastResponse =
            self.fetch("forecast", location).await.map_err(|err| {
                tracing::warn!(error = %err, "forecast lookup failed");
                WeatherError::ForecastUnavailable
            })?;

        Ok(summarize_daily(&raw.list))
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        location: &Location,
    ) -> anyhow::Result<T> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let mut query = location.query();
        query.push(("units", "metric".to_string()));
        query.push(("appid", self.api_key.clone()));

        let response = self.client.get(&url).query(&query).send().await?;
        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("upstream returned {status}");
        }
        Ok(response.json().await?)
    }
}

/// Round a wind speed to two decimal places.
pub fn round_wind(speed: f64) -> f64 {
    (speed * 100.0).round() / 100.0
}

/// Group 3-hour samples by calendar day, preserving first-seen day order,
/// and emit min/max temperature plus peak precipitation probability for the
/// first seven days. A day with fewer than eight samples (a partially
/// elapsed "today") is still emitted from whatever samples exist.
fn summarize_daily(samples: &[openweather::ForecastSample]) -> Vec<DailyForecastEntry> {
    let mut days: Vec<(String, Vec<&openweather::ForecastSample>)> = Vec::new();

    for sample in samples {
        let day = calendar_day(&sample.dt_txt);
        match days.iter_mut().find(|(d, _)| *d == day) {
            Some((_, group)) => group.push(sample),
            None => days.push((day, vec![sample])),
        }
    }

    days.into_iter()
        .take(MAX_FORECAST_DAYS)
        .map(|(date, group)| {
            let mut min = f64::INFINITY;
            let mut max = f64::NEG_INFINITY;
            let mut pop: f64 = 0.0;
            for sample in &group {
                min = min.min(sample.main.temp);
                max = max.max(sample.main.temp);
                pop = pop.max(sample.pop);
            }
            DailyForecastEntry {
                date,
                min: min.round() as i32,
                max: max.round() as i32,
                rain: (pop * 100.0).round().clamp(0.0, 100.0) as u8,
            }
        })
        .collect()
}

/// Calendar-day portion of a forecast timestamp ("2026-08-23 15:00:00").
fn calendar_day(dt_txt: &str) -> String {
    NaiveDateTime::parse_from_str(dt_txt, "%Y-%m-%d %H:%M:%S")
        .map(|dt| dt.date().to_string())
        .unwrap_or_else(|_| dt_txt.split(' ').next().unwrap_or(dt_txt).to_string())
}

/// OpenWeatherMap wire shapes. Only the fields the app reads are declared.
mod openweather {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct CurrentResponse {
        pub name: String,
        pub main: CurrentMain,
        pub wind: Wind,
        #[serde(default)]
        pub weather: Vec<Condition>,
    }

    #[derive(Debug, Deserialize)]
    pub struct CurrentMain {
        pub temp: f64,
        pub humidity: u8,
    }

    #[derive(Debug, Deserialize)]
    pub struct Wind {
        pub speed: f64,
    }

    #[derive(Debug, Deserialize)]
    pub struct Condition {
        pub description: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct ForecastResponse {
        pub list: Vec<ForecastSample>,
    }

    #[derive(Debug, Deserialize)]
    pub struct ForecastSample {
        pub dt_txt: String,
        pub main: SampleMain,
        /// Probability of precipitation, 0.0..=1.0. Absent on some samples.
        #[serde(default)]
        pub pop: f64,
    }

    #[derive(Debug, Deserialize)]
    pub struct SampleMain {
        pub temp: f64,
    }
}

#[cfg(test)]
mod tests {
    use super::openweather::{ForecastSample, SampleMain};
    use super::*;

    fn sample(dt_txt: &str, temp: f64, pop: f64) -> ForecastSample {
        ForecastSample {
            dt_txt: dt_txt.to_string(),
            main: SampleMain { temp },
            pop,
        }
    }

    #[test]
    fn test_groups_by_day_in_first_seen_order() {
        let samples = vec![
            sample("2026-08-23 21:00:00", 18.2, 0.0),
            sample("2026-08-24 09:00:00", 14.8, 0.2),
            sample("2026-08-24 15:00:00", 22.5, 0.61),
            sample("2026-08-23 23:00:00", 16.1, 0.05),
        ];

        let daily = summarize_daily(&samples);
        assert_eq!(daily.len(), 2);
        assert_eq!(daily[0].date, "2026-08-23");
        assert_eq!(daily[1].date, "2026-08-24");

        // Out-of-order sample still lands in the first day's entry
        assert_eq!(daily[0].min, 16);
        assert_eq!(daily[0].max, 18);

        assert_eq!(daily[1].min, 15);
        assert_eq!(daily[1].max, 23);
        assert_eq!(daily[1].rain, 61);
    }

    #[test]
    fn test_truncates_to_seven_days() {
        let mut samples = Vec::new();
        for day in 1..=9 {
            samples.push(sample(&format!("2026-09-0{day} 12:00:00"), 20.0, 0.1));
        }

        let daily = summarize_daily(&samples);
        assert_eq!(daily.len(), 7);
        assert_eq!(daily[0].date, "2026-09-01");
        assert_eq!(daily[6].date, "2026-09-07");
    }

    #[test]
    fn test_partial_day_is_still_emitted() {
        let samples = vec![sample("2026-08-23 21:00:00", 19.5, 0.0)];

        let daily = summarize_daily(&samples);
        assert_eq!(daily.len(), 1);
        assert_eq!(daily[0].min, 20);
        assert_eq!(daily[0].max, 20);
        assert!(daily[0].min <= daily[0].max);
    }

    #[test]
    fn test_rain_is_peak_probability_as_percent() {
        let samples = vec![
            sample("2026-08-23 09:00:00", 20.0, 0.124),
            sample("2026-08-23 15:00:00", 21.0, 0.875),
        ];

        let daily = summarize_daily(&samples);
        assert_eq!(daily[0].rain, 88);
        assert!(daily[0].rain <= 100);
    }

    #[test]
    fn test_empty_forecast_yields_no_days() {
        assert!(summarize_daily(&[]).is_empty());
    }

    #[test]
    fn test_wind_rounding_is_idempotent() {
        let once = round_wind(3.456_789);
        assert_eq!(once, 3.46);
        assert_eq!(round_wind(once), once);
    }

    #[test]
    fn test_temperature_rounding_is_idempotent() {
        let once = (21.6_f64).round();
        assert_eq!(once.round(), once);
    }

    #[test]
    fn test_location_requires_city_or_both_coordinates() {
        assert!(matches!(
            Location::from_parts(None, None, None),
            Err(WeatherError::InvalidLocation)
        ));
        assert!(matches!(
            Location::from_parts(Some("   ".into()), Some(48.85), None),
            Err(WeatherError::InvalidLocation)
        ));
        assert_eq!(
            Location::from_parts(Some("Paris".into()), None, None).unwrap(),
            Location::City("Paris".into())
        );
        assert_eq!(
            Location::from_parts(None, Some(48.85), Some(2.35)).unwrap(),
            Location::Coordinates {
                lat: 48.85,
                lon: 2.35
            }
        );
    }

    #[test]
    fn test_city_wins_over_coordinates() {
        let location =
            Location::from_parts(Some("Lyon".into()), Some(48.85), Some(2.35)).unwrap();
        assert_eq!(location, Location::City("Lyon".into()));
    }

    #[test]
    fn test_calendar_day_falls_back_to_prefix() {
        assert_eq!(calendar_day("2026-08-23 15:00:00"), "2026-08-23");
        assert_eq!(calendar_day("2026-08-23 junk"), "2026-08-23");
    }
}
