//! # Pitch Core
//!
//! Tactical inference engine for the tactical board.
//!
//! This crate contains **only** pure board logic:
//! - No IO
//! - No network
//! - No global mutable state
//! - Randomness only through an injected [`jitter::JitterSource`]
//!
//! Given a snapshot of two teams and the ball it produces a formation label,
//! a phase label, a synthesized counter team, and a repositioned companion
//! team. Every operation is total: bad or missing data falls back to
//! defaults instead of failing.
//!
//! ## Crate Structure
//!
//! - [`field`] - Pitch geometry and clamp regions
//! - [`point`] - Board markers and snapshots
//! - [`stats`] - Per-team position statistics
//! - [`formation`] - Formation detection
//! - [`templates`] - Formation template library
//! - [`synthesis`] - Counter-formation placement
//! - [`phase`] - Phase classification
//! - [`companion`] - Companion team repositioning
//! - [`analysis`] - Full pipeline

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod analysis;
pub mod companion;
pub mod error;
pub mod field;
pub mod formation;
pub mod jitter;
pub mod phase;
pub mod point;
pub mod stats;
pub mod synthesis;
pub mod templates;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::analysis::{analyze, Classification, TacticalReport};
    pub use crate::companion::reposition_companions;
    pub use crate::error::{Result, TacticsError};
    pub use crate::formation::{detect_formation, DEFAULT_FORMATION};
    pub use crate::jitter::{FixedJitter, JitterSource, NoJitter, RngJitter};
    pub use crate::phase::{classify_phase, Phase};
    pub use crate::point::{Point, Snapshot};
    pub use crate::stats::{PositionStats, Thirds};
    pub use crate::synthesis::{build_counter_formation, CounterFormation, SynthPhase};
    pub use crate::templates::{FormationLibrary, FormationTemplate, TemplateSlot};
}
