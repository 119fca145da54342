//! Startup self-test.
//!
//! Drives two probe renders through the service after the locator has run:
//! a sequence diagram that needs no layout tool, then a state diagram that
//! does. The outcome separates "engine broken" from "layout tool missing,
//! only layout-dependent diagram types are degraded". Failures are logged
//! and recorded; startup is never blocked.

use crate::service::RenderService;

/// Probe diagram that renders without a layout tool.
const SEQUENCE_PROBE: &str = "@startuml\nAlice -> Bob: Test\n@enduml";

/// Probe diagram that requires the layout tool.
const STATE_PROBE: &str =
    "@startuml\n[*] --> State1\nState1 --> State2 : Event\nState2 --> [*]\n@enduml";

/// Substrings the engine emits into SVG output when the layout executable
/// is missing. The engine reports this inside an otherwise successful
/// render, so exit status alone is not enough.
const DOT_ERROR_MARKERS: [&str; 2] = ["Dot Executable", "does not exist"];

/// Recorded self-test outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelfTest {
    /// The basic render path works.
    pub engine_ok: bool,
    /// Layout-tool-dependent diagrams render correctly.
    pub layout_ok: bool,
}

/// Run both probes and log a diagnosis.
pub(crate) fn run(service: &RenderService) -> SelfTest {
    let engine_ok = match service.render_svg(SEQUENCE_PROBE) {
        Ok(_) => {
            tracing::info!("basic render self-test passed");
            true
        }
        Err(err) => {
            tracing::error!(error = %err, "render self-test failed; diagram generation is broken");
            false
        }
    };

    if !engine_ok {
        return SelfTest {
            engine_ok: false,
            layout_ok: false,
        };
    }

    let layout_ok = match service.render_svg(STATE_PROBE) {
        Ok(svg) if contains_dot_error(&svg) => {
            tracing::error!(
                "layout self-test failed: dot executable not found; \
                 state-like diagrams will not render"
            );
            false
        }
        Ok(_) => {
            tracing::info!("layout self-test passed; layout-dependent diagrams available");
            true
        }
        Err(err) => {
            tracing::warn!(
                error = %err,
                "layout self-test failed; layout-dependent diagrams may not render"
            );
            false
        }
    };

    SelfTest { engine_ok, layout_ok }
}

/// Whether SVG output carries an engine-emitted missing-dot report.
fn contains_dot_error(svg: &str) -> bool {
    DOT_ERROR_MARKERS.iter().any(|marker| svg.contains(marker))
}
