//! Station and train lookup API.
//!
//! The map engine never talks to the network itself. Lookups go through the
//! [`TrainApi`] trait; [`HttpTrainApi`] is the production implementation and
//! tests substitute in-memory fakes.

pub mod client;
pub mod config;
pub mod error;
pub mod types;

pub use client::{ApiFuture, HttpTrainApi, TrainApi};
pub use config::ApiConfig;
pub use error::{ApiError, Result};
pub use types::{Journey, StationLocation};
