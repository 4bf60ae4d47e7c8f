#![allow(dead_code)]

use chrono::{DateTime, Local, TimeZone};
use ndarray::{Array1, ArrayView1};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use smart_water_saver::data::features::{FeatureSchema, FeatureVector};
use smart_water_saver::data::synthesis::FeatureSource;
use smart_water_saver::model::{Artifacts, FeatureScaler, Regressor, StandardScaler, UsageModel};
use smart_water_saver::runner::{Pacer, Pause, PredictionLog, PredictionRecord, Reporter};
use smart_water_saver::Result;

pub fn zone_names() -> Vec<String> {
    FeatureSchema::ZONES.names().map(str::to_owned).collect()
}

/// Identity scaler over the zone schema.
pub fn zone_scaler() -> StandardScaler {
    StandardScaler::new(Array1::zeros(8), Array1::ones(8)).with_feature_names(zone_names())
}

/// Sum of the five flows plus 100, ignoring the calendar fields.
pub fn zone_model() -> Regressor {
    let mut coefficients = Array1::zeros(8);
    coefficients.slice_mut(ndarray::s![..5]).fill(1.0);
    Regressor::linear(coefficients, 100.0).with_feature_names(zone_names())
}

/// Wraps a model and counts predict calls.
pub struct CountingModel {
    pub inner: Regressor,
    pub calls: Arc<AtomicUsize>,
}

impl UsageModel for CountingModel {
    fn feature_names(&self) -> Option<&[String]> {
        self.inner.feature_names()
    }

    fn n_features(&self) -> usize {
        self.inner.n_features()
    }

    fn predict(&self, x: ArrayView1<'_, f64>) -> Result<f64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.predict(x)
    }
}

pub fn counting_zone_artifacts() -> (Artifacts, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let model = CountingModel {
        inner: zone_model(),
        calls: Arc::clone(&calls),
    };
    let scaler: Box<dyn FeatureScaler> = Box::new(zone_scaler());
    (Artifacts::new(scaler, Box::new(model)), calls)
}

pub fn start_time() -> DateTime<Local> {
    Local.with_ymd_and_hms(2024, 6, 3, 10, 0, 0).unwrap()
}

/// Advances a virtual clock on every pause instead of sleeping.
pub struct ManualPacer {
    pub start: DateTime<Local>,
    pub elapsed: Duration,
    pub pauses: usize,
    pub interrupt_after: Option<usize>,
}

impl ManualPacer {
    pub fn new() -> Self {
        Self {
            start: start_time(),
            elapsed: Duration::ZERO,
            pauses: 0,
            interrupt_after: None,
        }
    }

    pub fn interrupting_after(pauses: usize) -> Self {
        Self {
            interrupt_after: Some(pauses),
            ..Self::new()
        }
    }
}

impl Pacer for ManualPacer {
    fn now(&self) -> DateTime<Local> {
        self.start + chrono::Duration::from_std(self.elapsed).unwrap()
    }

    fn elapsed(&self) -> Duration {
        self.elapsed
    }

    fn pause(&mut self, duration: Duration) -> Pause {
        self.elapsed += duration;
        self.pauses += 1;
        match self.interrupt_after {
            Some(k) if self.pauses >= k => Pause::Interrupted,
            _ => Pause::Elapsed,
        }
    }
}

/// Remembers how often it rendered and how long the history was each time.
#[derive(Default)]
pub struct CountingReporter {
    pub renders: usize,
    pub history_lengths: Vec<usize>,
    pub finished: bool,
}

impl Reporter for CountingReporter {
    fn render(&mut self, _latest: &PredictionRecord, history: &PredictionLog) -> Result<()> {
        self.renders += 1;
        self.history_lengths.push(history.len());
        Ok(())
    }

    fn finish(&mut self, _history: &PredictionLog) -> Result<()> {
        self.finished = true;
        Ok(())
    }
}

/// Emits the same vector every tick.
pub struct FixedSource(pub FeatureVector);

impl FeatureSource for FixedSource {
    fn schema(&self) -> FeatureSchema {
        FeatureSchema::ZONES
    }

    fn next_features(&mut self, _now: DateTime<Local>) -> FeatureVector {
        self.0.clone()
    }
}
