//! Rendering service for PlantD.
//!
//! The request-facing layer around the external PlantUML engine:
//!
//! - [`RenderService`]: synchronous SVG/PNG rendering, render-based syntax
//!   validation, bounded-concurrency async rendering, health probe, and
//!   statistics reporting
//! - [`locator`]: startup discovery of the GraphViz `dot` executable with
//!   graceful degradation when it is absent
//! - startup self-test that exercises the real render path and records
//!   whether the engine and the layout tool integration work
//!
//! The service is degraded-but-available by design: locator and self-test
//! failures are logged, never propagated, and never block startup.

mod error;
pub mod locator;
mod pool;
mod selftest;
mod service;

pub use error::RenderError;
pub use selftest::SelfTest;
pub use service::{RenderService, ServiceStats, Validity};
