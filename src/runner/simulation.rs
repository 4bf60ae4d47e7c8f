use chrono::{DateTime, Local};
use std::io::Write;
use std::time::Duration;
use tracing::{debug, info};

use crate::data::synthesis::FeatureSource;
use crate::error::{Error, Result};
use crate::runner::pacer::{Pacer, Pause};
use crate::runner::predictor::Predictor;
use crate::runner::record::{PredictionLog, PredictionRecord};
use crate::runner::report::Reporter;

pub const STOP_MESSAGE: &str = "Simulation stopped by user.";

/// Why a driver returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Completed,
    DeadlineReached,
    Interrupted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub iterations: usize,
    pub stop: StopReason,
}

/// One synthesize, predict, record, render step per [`tick`](Self::tick).
pub struct Simulation<'a, S, R> {
    predictor: Predictor<'a>,
    source: S,
    reporter: R,
    log: PredictionLog,
}

impl<'a, S: FeatureSource, R: Reporter> Simulation<'a, S, R> {
    pub fn new(predictor: Predictor<'a>, source: S, reporter: R) -> Self {
        Self {
            predictor,
            source,
            reporter,
            log: PredictionLog::default(),
        }
    }

    pub fn tick(&mut self, now: DateTime<Local>) -> Result<&PredictionRecord> {
        let features = self.source.next_features(now);
        let predicted = self.predictor.predict(&features)?;
        self.log.record(PredictionRecord {
            timestamp: now,
            features,
            predicted,
        });

        let history = &self.log;
        let latest = history.last().ok_or_else(|| Error::Runtime {
            message: "prediction log empty after record".into(),
        })?;
        self.reporter.render(latest, history)?;
        debug!(iteration = history.len(), predicted, "tick complete");
        Ok(latest)
    }

    pub fn log(&self) -> &PredictionLog {
        &self.log
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Ends the run, returning the accumulated log.
    pub fn finish(mut self) -> Result<PredictionLog> {
        self.reporter.finish(&self.log)?;
        Ok(self.log)
    }
}

/// Runs exactly `iterations` ticks, pausing `interval` after each.
pub fn run_fixed_count<S, R, P>(
    sim: &mut Simulation<'_, S, R>,
    pacer: &mut P,
    iterations: usize,
    interval: Duration,
) -> Result<RunSummary>
where
    S: FeatureSource,
    R: Reporter,
    P: Pacer,
{
    for _ in 0..iterations {
        sim.tick(pacer.now())?;
        pacer.pause(interval);
    }
    info!(iterations, "simulation completed");
    Ok(RunSummary {
        iterations,
        stop: StopReason::Completed,
    })
}

/// Ticks while less than `duration` has elapsed on the pacer.
///
/// The deadline is checked before every tick, so no tick starts after it.
pub fn run_time_boxed<S, R, P>(
    sim: &mut Simulation<'_, S, R>,
    pacer: &mut P,
    duration: Duration,
    interval: Duration,
) -> Result<RunSummary>
where
    S: FeatureSource,
    R: Reporter,
    P: Pacer,
{
    let mut iterations = 0;
    while pacer.elapsed() < duration {
        sim.tick(pacer.now())?;
        iterations += 1;
        pacer.pause(interval);
    }
    info!(
        iterations,
        seconds = duration.as_secs_f64(),
        "visualization stopped at deadline"
    );
    Ok(RunSummary {
        iterations,
        stop: StopReason::DeadlineReached,
    })
}

/// Ticks until the pacer reports an interrupt, then writes one stop line.
pub fn run_unbounded<S, R, P, W>(
    sim: &mut Simulation<'_, S, R>,
    pacer: &mut P,
    interval: Duration,
    out: &mut W,
) -> Result<RunSummary>
where
    S: FeatureSource,
    R: Reporter,
    P: Pacer,
    W: Write,
{
    let mut iterations = 0;
    loop {
        sim.tick(pacer.now())?;
        iterations += 1;
        if pacer.pause(interval) == Pause::Interrupted {
            break;
        }
    }
    writeln!(out, "\n{STOP_MESSAGE}").map_err(|e| Error::io("writing stop confirmation", e))?;
    info!(iterations, "simulation interrupted");
    Ok(RunSummary {
        iterations,
        stop: StopReason::Interrupted,
    })
}
