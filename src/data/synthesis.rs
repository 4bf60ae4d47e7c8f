use chrono::{DateTime, Datelike, Local, Weekday};
use rand::Rng;

use crate::data::features::{FeatureSchema, FeatureVector};
use crate::error::{Error, Result};

/// Produces one feature vector per simulation tick.
pub trait FeatureSource {
    fn schema(&self) -> FeatureSchema;

    fn next_features(&mut self, now: DateTime<Local>) -> FeatureVector;
}

/// Dashboard control values around which live readings are jittered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeatherBaseline {
    pub temperature: f64,
    pub humidity: f64,
    pub rainfall: f64,
    pub population: f64,
    pub day: Weekday,
}

impl WeatherBaseline {
    pub const TEMPERATURE_RANGE: (f64, f64) = (10.0, 45.0);
    pub const HUMIDITY_RANGE: (f64, f64) = (10.0, 100.0);
    pub const RAINFALL_RANGE: (f64, f64) = (0.0, 200.0);
    pub const POPULATION_RANGE: (f64, f64) = (0.0, 10_000.0);

    /// Rejects values outside the dashboard control bounds.
    pub fn validate(&self) -> Result<()> {
        check_range("temperature", self.temperature, Self::TEMPERATURE_RANGE)?;
        check_range("humidity", self.humidity, Self::HUMIDITY_RANGE)?;
        check_range("rainfall", self.rainfall, Self::RAINFALL_RANGE)?;
        check_range("population", self.population, Self::POPULATION_RANGE)?;
        Ok(())
    }

    /// The unperturbed reading, as submitted by the form.
    pub fn to_features(&self) -> FeatureVector {
        weather_vector(
            self.temperature,
            self.humidity,
            self.rainfall,
            self.population,
            self.day,
        )
    }
}

impl Default for WeatherBaseline {
    fn default() -> Self {
        Self {
            temperature: 25.0,
            humidity: 60.0,
            rainfall: 10.0,
            population: 200.0,
            day: Weekday::Mon,
        }
    }
}

fn check_range(field: &str, value: f64, (low, high): (f64, f64)) -> Result<()> {
    if !(low..=high).contains(&value) {
        return Err(Error::invalid_input(
            field,
            format!("{value} is outside {low}..={high}"),
        ));
    }
    Ok(())
}

fn weather_vector(
    temperature: f64,
    humidity: f64,
    rainfall: f64,
    population: f64,
    day: Weekday,
) -> FeatureVector {
    FeatureSchema::WEATHER
        .names()
        .zip([
            temperature,
            humidity,
            rainfall,
            population,
            f64::from(day.num_days_from_monday()),
        ])
        .collect()
}

/// Uniform jitter around a [`WeatherBaseline`].
pub struct JitteredWeather<R: Rng> {
    baseline: WeatherBaseline,
    rng: R,
}

impl<R: Rng> JitteredWeather<R> {
    pub const TEMPERATURE_JITTER: f64 = 2.0;
    pub const HUMIDITY_JITTER: f64 = 5.0;
    pub const RAINFALL_JITTER: f64 = 5.0;

    pub fn new(baseline: WeatherBaseline, rng: R) -> Self {
        Self { baseline, rng }
    }
}

impl<R: Rng> FeatureSource for JitteredWeather<R> {
    fn schema(&self) -> FeatureSchema {
        FeatureSchema::WEATHER
    }

    fn next_features(&mut self, _now: DateTime<Local>) -> FeatureVector {
        let b = self.baseline;
        let temperature = self.rng.gen_range(
            b.temperature - Self::TEMPERATURE_JITTER..=b.temperature + Self::TEMPERATURE_JITTER,
        );
        let humidity = self
            .rng
            .gen_range(b.humidity - Self::HUMIDITY_JITTER..=b.humidity + Self::HUMIDITY_JITTER);
        // rainfall never goes negative
        let rainfall = self.rng.gen_range(
            (b.rainfall - Self::RAINFALL_JITTER).max(0.0)..=b.rainfall + Self::RAINFALL_JITTER,
        );
        weather_vector(temperature, humidity, rainfall, b.population, b.day)
    }
}

/// Per-zone flow bands in MLD, in [`FeatureSchema::ZONES`] order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneRanges {
    pub bands: [(f64, f64); 5],
}

impl ZoneRanges {
    /// Wide bands used by the plotting simulator.
    pub const SURGE: ZoneRanges = ZoneRanges {
        bands: [
            (300.0, 500.0),
            (50.0, 150.0),
            (100.0, 250.0),
            (10.0, 15.0),
            (100.0, 200.0),
        ],
    };

    /// Narrow bands used by the console monitor.
    pub const STEADY: ZoneRanges = ZoneRanges {
        bands: [
            (400.0, 460.0),
            (10.0, 20.0),
            (15.0, 25.0),
            (9.0, 13.0),
            (150.0, 180.0),
        ],
    };
}

/// Samples zone readings uniformly and stamps them with the calendar date.
pub struct ZoneSampler<R: Rng> {
    ranges: ZoneRanges,
    rng: R,
}

impl<R: Rng> ZoneSampler<R> {
    pub fn new(ranges: ZoneRanges, rng: R) -> Self {
        Self { ranges, rng }
    }
}

impl<R: Rng> FeatureSource for ZoneSampler<R> {
    fn schema(&self) -> FeatureSchema {
        FeatureSchema::ZONES
    }

    fn next_features(&mut self, now: DateTime<Local>) -> FeatureVector {
        let mut flows = [0.0; 5];
        for (flow, &(low, high)) in flows.iter_mut().zip(self.ranges.bands.iter()) {
            *flow = self.rng.gen_range(low..=high);
        }
        zone_vector(flows, now)
    }
}

/// Fixed zone readings for a one-shot prediction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneReadings {
    pub parvati: f64,
    pub cantonment: f64,
    pub waraje: f64,
    pub old_holkar: f64,
    pub vadgaon: f64,
}

impl ZoneReadings {
    pub fn to_features(&self, now: DateTime<Local>) -> FeatureVector {
        zone_vector(
            [
                self.parvati,
                self.cantonment,
                self.waraje,
                self.old_holkar,
                self.vadgaon,
            ],
            now,
        )
    }
}

impl Default for ZoneReadings {
    fn default() -> Self {
        Self {
            parvati: 420.5,
            cantonment: 15.2,
            waraje: 22.4,
            old_holkar: 10.9,
            vadgaon: 165.3,
        }
    }
}

fn zone_vector(flows: [f64; 5], now: DateTime<Local>) -> FeatureVector {
    let calendar = [
        f64::from(now.day()),
        f64::from(now.month()),
        f64::from(now.weekday().num_days_from_monday()),
    ];
    FeatureSchema::ZONES
        .names()
        .zip(flows.into_iter().chain(calendar))
        .collect()
}
