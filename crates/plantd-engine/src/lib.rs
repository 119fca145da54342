//! PlantUML engine adapter for PlantD.
//!
//! Wraps the external `plantuml` executable behind a small, stateless API:
//! - [`Engine`]: one render per call via `plantuml -pipe`, source on stdin,
//!   image bytes on stdout
//! - [`OutputFormat`]: SVG or PNG output selection
//! - [`LayoutTool`]: resolved GraphViz `dot` location, handed to the engine
//!   through the child process environment (`GRAPHVIZ_DOT`)
//!
//! Every render spawns a fresh engine process, so concurrent calls never
//! share engine state. Engine failures carry the engine's own stderr message
//! and are never swallowed at this layer.

mod engine;
mod error;
mod layout;

pub use engine::{Engine, OutputFormat, Rendered};
pub use error::EngineError;
pub use layout::LayoutTool;
