//! Mutation track layout engine
//!
//! Turns per-sample mutation events and the regions of the current view into
//! pixel geometry: mapped intervals with stack rows, point markers with label
//! sides, per-sample heights and, in dense mode, radius-scaled density bins.

pub mod types;
pub mod config;
pub mod error;
pub mod coords;
pub mod stack;
pub mod assemble;
pub mod density;
pub mod labels;
pub mod layout;
pub mod session;
pub mod io;

// Re-export commonly used types and functions
pub use types::{CoordinateMode, DisplayMode, Event, EventKind, EventRecord, LayoutInput, RegionSpec};
pub use config::LayoutConfig;
pub use error::{LayoutError, LayoutResult};
pub use coords::{CoordinateMapper, PixelSpan};
pub use assemble::{LayoutStats, LegendSummary, SampleGroupLayout, SampleLayout};
pub use density::{bin_events, DensityBin, RadiusScale};
pub use labels::{CharWidthMeasure, LabelPlacer, LabelSide, TextMeasure};
pub use layout::{compute_layout, LayoutOutcome, LayoutOutput};
pub use session::{PassTicket, TrackLayout};

/// Version information for the layout engine
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
