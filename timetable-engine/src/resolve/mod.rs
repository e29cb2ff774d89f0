//! Timetable resolution engine.
//!
//! This module turns layered timetable revisions into date-exact
//! schedules. The stages run in a fixed order:
//!
//! 1. overlays: overlay and cancellation revisions are laid over the
//!    records they replace, for schedules and associations alike
//! 2. associations: splits and joins are spliced into through schedules
//! 3. variations (optional): real-time cancellations, reinstatements and
//!    changes of origin are applied to each activation
//! 4. consolidation: identical schedules on neighbouring dates are merged

mod associations;
mod config;
mod consolidate;
mod overlays;
mod pipeline;
mod variations;

pub use associations::apply_associations;
pub use config::{APPLY_VARIATIONS_VAR, EngineConfig};
pub use consolidate::merge_schedules;
pub use overlays::{OverlayIndex, apply_overlays};
pub use pipeline::{Engine, Timetable};
pub use variations::{VariationEvents, apply_variations};
