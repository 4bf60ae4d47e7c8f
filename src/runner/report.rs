use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{Error, Result};
use crate::runner::advisory::Advisory;
use crate::runner::record::{PredictionLog, PredictionRecord};
use crate::utils::plot::{create_usage_plot, ChartStyle};

/// Renders each new prediction to its destination.
pub trait Reporter {
    fn render(&mut self, latest: &PredictionRecord, history: &PredictionLog) -> Result<()>;

    /// Called once after the last iteration of a run that ends normally.
    fn finish(&mut self, _history: &PredictionLog) -> Result<()> {
        Ok(())
    }
}

/// Timestamp, value and live advisory, one block per prediction.
pub struct ConsoleReporter<W: Write> {
    out: W,
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn render(&mut self, latest: &PredictionRecord, _history: &PredictionLog) -> Result<()> {
        let advisory = Advisory::classify(latest.predicted);
        let write_err = |e: std::io::Error| Error::io("writing console report", e);
        writeln!(self.out, "\n{}", latest.time_label()).map_err(write_err)?;
        writeln!(
            self.out,
            "Predicted Total Water Supply (MLD): {:.2}",
            latest.predicted
        )
        .map_err(write_err)?;
        writeln!(self.out, "{}", advisory.live_message()).map_err(write_err)?;
        self.out.flush().map_err(write_err)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartMode {
    /// A single widget overwritten every tick; only the latest frame exists.
    Placeholder,
    /// A live window; the last frame is held open once the run ends.
    Live,
}

/// Re-renders the whole history as a line chart every tick.
#[derive(Debug, Clone)]
pub struct ChartReporter {
    path: PathBuf,
    style: ChartStyle,
    mode: ChartMode,
    frames: usize,
}

impl ChartReporter {
    pub fn new(path: impl Into<PathBuf>, style: ChartStyle, mode: ChartMode) -> Self {
        Self {
            path: path.into(),
            style,
            mode,
            frames: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of frames drawn so far.
    pub fn frames(&self) -> usize {
        self.frames
    }
}

impl Reporter for ChartReporter {
    fn render(&mut self, _latest: &PredictionRecord, history: &PredictionLog) -> Result<()> {
        create_usage_plot(history, &self.style, &self.path)?;
        self.frames += 1;
        Ok(())
    }

    fn finish(&mut self, history: &PredictionLog) -> Result<()> {
        if self.mode == ChartMode::Live {
            info!(
                path = %self.path.display(),
                points = history.len(),
                "live chart held at final frame"
            );
        }
        Ok(())
    }
}

/// Fans a prediction out to two reporters in order.
impl<A: Reporter, B: Reporter> Reporter for (A, B) {
    fn render(&mut self, latest: &PredictionRecord, history: &PredictionLog) -> Result<()> {
        self.0.render(latest, history)?;
        self.1.render(latest, history)
    }

    fn finish(&mut self, history: &PredictionLog) -> Result<()> {
        self.0.finish(history)?;
        self.1.finish(history)
    }
}

impl<R: Reporter + ?Sized> Reporter for &mut R {
    fn render(&mut self, latest: &PredictionRecord, history: &PredictionLog) -> Result<()> {
        (**self).render(latest, history)
    }

    fn finish(&mut self, history: &PredictionLog) -> Result<()> {
        (**self).finish(history)
    }
}
