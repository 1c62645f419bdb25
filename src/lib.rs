//! Port Tariff Engine for Strait of Gibraltar port calls
//!
//! This crate computes the cost of a port call under the Tanger Med, Nador
//! West Med and Algeciras tariff regimes, and compares the totals. Every
//! amount is an exact `Decimal` and every tariff decision is recorded in an
//! audit trace.
//!
//! # Example
//!
//! ```no_run
//! use port_tariff_engine::config::ConfigLoader;
//! use port_tariff_engine::engine::evaluate;
//! use port_tariff_engine::models::EvaluationRequest;
//!
//! let loader = ConfigLoader::load("./config/tariffs_2025").unwrap();
//! let request: EvaluationRequest =
//!     serde_json::from_str(&std::fs::read_to_string("request.json").unwrap()).unwrap();
//! let evaluation = evaluate(&request, loader.schedules()).unwrap();
//! for delta in &evaluation.comparisons {
//!     println!("{:?}: {}", delta.other, delta.display_percent());
//! }
//! ```

#![warn(missing_docs)]

pub mod calculation;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
