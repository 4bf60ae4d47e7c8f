//! Smart Water Saver: runs a pre-trained water consumption model over
//! manual, batch or simulated zone readings.
//!
//! The scaler and model are loaded once into an [`model::Artifacts`] handle
//! and borrowed by every entry point in [`cli`].

pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod model;
pub mod runner;
pub mod utils;

pub use error::{Error, Result};
