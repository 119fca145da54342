//! The rendering service.

use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::Instant;

use plantd_engine::{Engine, EngineError, LayoutTool, OutputFormat};

use crate::error::RenderError;
use crate::locator;
use crate::pool::RenderPool;
use crate::selftest::{self, SelfTest};

/// Worker capacity of the async render pool.
const POOL_CAPACITY: usize = 10;

/// Trivial diagram used by the health probe; needs no layout tool.
const HEALTH_DIAGRAM: &str = "@startuml\nAlice -> Bob: Test\n@enduml";

/// Engine license and capability constants reported in stats.
const ENGINE_LICENSE: &str = "MIT";
const COMMERCIAL_USE: bool = true;

/// Outcome of a syntax validation.
///
/// Validation is a full render with the output discarded: the engine is the
/// only grammar. Any failure is a negative result, never an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validity {
    /// The source rendered successfully.
    Valid,
    /// The render failed; carries the failure message.
    Invalid(String),
}

impl Validity {
    /// Boolean view of the outcome.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// Read-only service statistics snapshot, recomputed per call.
#[derive(Debug, Clone)]
pub struct ServiceStats {
    /// Engine version string, or `"unknown"` when the probe failed.
    pub engine_version: String,
    /// Engine license.
    pub license: &'static str,
    /// Whether commercial use is allowed.
    pub commercial_use: bool,
    /// Async render pool capacity.
    pub pool_capacity: usize,
    /// Async render pool workers currently idle.
    pub pool_idle: usize,
    /// Resolved GraphViz dot path, when located.
    pub graphviz_path: Option<PathBuf>,
    /// Whether a layout tool was located.
    pub graphviz_available: bool,
}

/// Request-facing rendering service.
///
/// Synchronous operations block the calling thread for the duration of the
/// engine call. The asynchronous SVG path runs through a fixed pool of ten
/// workers. The layout tool location is resolved once by
/// [`init`](Self::init) and read lock-free afterwards.
pub struct RenderService {
    engine: Engine,
    configured_dot: Option<PathBuf>,
    layout: OnceLock<Option<LayoutTool>>,
    version: OnceLock<String>,
    self_test: OnceLock<SelfTest>,
    pool: RenderPool,
}

impl RenderService {
    /// Create a service around the given engine.
    ///
    /// `configured_dot` is the explicitly configured GraphViz path probed
    /// first by the locator during [`init`](Self::init).
    #[must_use]
    pub fn new(engine: Engine, configured_dot: Option<PathBuf>) -> Self {
        Self {
            engine,
            configured_dot,
            layout: OnceLock::new(),
            version: OnceLock::new(),
            self_test: OnceLock::new(),
            pool: RenderPool::new(POOL_CAPACITY),
        }
    }

    /// Create a service with a pre-resolved layout tool, skipping discovery.
    ///
    /// Intended for tests and embedding; the locator never runs for a
    /// service built this way.
    #[must_use]
    pub fn with_layout_tool(engine: Engine, tool: Option<LayoutTool>) -> Self {
        let service = Self::new(engine, None);
        let _ = service.layout.set(tool);
        service
    }

    /// Initialize the service: locate the layout tool, probe the engine
    /// version, and run the startup self-test.
    ///
    /// Failures are logged and recorded, never propagated; the service
    /// starts degraded-but-available. Calling `init` again is safe; the
    /// first published values win.
    pub fn init(&self) {
        let located = locator::locate(self.configured_dot.as_deref());
        let _ = self.layout.set(located);

        match self.engine.version() {
            Ok(version) => {
                tracing::info!(%version, "engine available");
                let _ = self.version.set(version);
            }
            Err(err) => {
                tracing::warn!(error = %err, "engine version probe failed");
            }
        }

        let outcome = selftest::run(self);
        let _ = self.self_test.set(outcome);
        tracing::info!("render service initialized");
    }

    /// Render diagram source to SVG text.
    pub fn render_svg(&self, source: &str) -> Result<String, RenderError> {
        render_svg_with(&self.engine, source, self.layout_tool())
    }

    /// Render diagram source to PNG bytes.
    pub fn render_png(&self, source: &str) -> Result<Vec<u8>, RenderError> {
        let started = Instant::now();
        tracing::debug!(source_len = source.len(), "generating PNG diagram");

        let rendered = self
            .engine
            .render(source, OutputFormat::Png, self.layout_tool())
            .map_err(|err| wrap(OutputFormat::Png, err))?;

        tracing::info!(
            duration_ms = duration_ms(started),
            size = rendered.bytes.len(),
            "PNG generated"
        );
        Ok(rendered.bytes)
    }

    /// Render diagram source to SVG text on the bounded render pool.
    ///
    /// Permits are granted in FIFO order; completions may finish out of
    /// submission order. Failures resolve through the returned future with
    /// the same [`RenderError`] the synchronous path would produce.
    pub async fn render_svg_async(&self, source: &str) -> Result<String, RenderError> {
        let engine = self.engine.clone();
        let layout = self.layout_tool().cloned();
        let source = source.to_owned();

        match self
            .pool
            .run(move || render_svg_with(&engine, &source, layout.as_ref()))
            .await
        {
            Ok(result) => result,
            Err(err) => Err(RenderError::service(OutputFormat::Svg, err.to_string())),
        }
    }

    /// Validate diagram syntax by rendering and discarding the output.
    pub fn validate(&self, source: &str) -> Validity {
        match self.render_svg(source) {
            Ok(_) => Validity::Valid,
            Err(err) => {
                tracing::debug!(error = %err, "syntax validation failed");
                Validity::Invalid(err.message)
            }
        }
    }

    /// Health probe: renders a fixed trivial diagram.
    ///
    /// Proves the render path works, not merely that the process is up.
    pub fn health_check(&self) -> bool {
        match self.render_svg(HEALTH_DIAGRAM) {
            Ok(_) => true,
            Err(err) => {
                tracing::error!(error = %err, "health check failed");
                false
            }
        }
    }

    /// Current statistics snapshot. Never fails; unavailable values are
    /// reported as placeholders.
    pub fn stats(&self) -> ServiceStats {
        let layout = self.layout_tool();
        ServiceStats {
            engine_version: self
                .version
                .get()
                .cloned()
                .unwrap_or_else(|| "unknown".to_owned()),
            license: ENGINE_LICENSE,
            commercial_use: COMMERCIAL_USE,
            pool_capacity: self.pool.capacity(),
            pool_idle: self.pool.idle(),
            graphviz_path: layout.map(|tool| tool.dot_path().to_path_buf()),
            graphviz_available: layout.is_some(),
        }
    }

    /// Startup self-test outcome, once recorded by [`init`](Self::init).
    #[must_use]
    pub fn self_test(&self) -> Option<SelfTest> {
        self.self_test.get().copied()
    }

    /// Resolved layout tool, when located.
    fn layout_tool(&self) -> Option<&LayoutTool> {
        self.layout.get().and_then(Option::as_ref)
    }
}

/// Synchronous SVG render shared by the sync and async paths.
fn render_svg_with(
    engine: &Engine,
    source: &str,
    layout: Option<&LayoutTool>,
) -> Result<String, RenderError> {
    let started = Instant::now();
    tracing::debug!(source_len = source.len(), "generating SVG diagram");

    let rendered = engine
        .render(source, OutputFormat::Svg, layout)
        .map_err(|err| wrap(OutputFormat::Svg, err))?;
    let description = rendered.description;
    let svg = String::from_utf8(rendered.bytes).map_err(|_| {
        RenderError::service(OutputFormat::Svg, "engine produced non-UTF-8 SVG output")
    })?;

    tracing::info!(
        duration_ms = duration_ms(started),
        description = description.as_deref().unwrap_or("none"),
        "SVG generated"
    );
    Ok(svg)
}

fn wrap(format: OutputFormat, err: EngineError) -> RenderError {
    // Prefer the engine's own message over the wrapper's framing.
    match err.engine_message().map(str::to_owned) {
        Some(message) => RenderError {
            format,
            message,
            source: Some(err),
        },
        None => RenderError::engine(format, err),
    }
}

#[allow(clippy::cast_possible_truncation)]
fn duration_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}
