//! The prediction runner: scale-and-predict, reporting and loop drivers.

pub mod advisory;
pub mod pacer;
pub mod predictor;
pub mod record;
pub mod report;
pub mod simulation;

pub use advisory::Advisory;
pub use pacer::{BlockingPacer, InterruptiblePacer, Pacer, Pause};
pub use predictor::Predictor;
pub use record::{PredictionLog, PredictionRecord};
pub use report::{ChartMode, ChartReporter, ConsoleReporter, Reporter};
pub use simulation::{
    run_fixed_count, run_time_boxed, run_unbounded, RunSummary, Simulation, StopReason,
};
