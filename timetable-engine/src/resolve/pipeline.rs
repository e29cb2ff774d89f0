//! The resolution pipeline.

use tracing::info;

use crate::domain::{Association, DomainError, IdGenerator, OverlayRecord, Schedule};

use super::config::EngineConfig;
use super::{VariationEvents, apply_associations, apply_overlays, apply_variations, merge_schedules};

/// One closed batch of timetable data.
///
/// Schedules and associations are applied in the order given, so they
/// should be sorted by STP precedence with permanent records first.
#[derive(Debug, Clone, Default)]
pub struct Timetable {
    pub schedules: Vec<Schedule>,
    pub associations: Vec<Association>,
    pub events: VariationEvents,
}

/// Resolves timetable batches into date-exact schedules.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run the whole pipeline over one batch.
    ///
    /// Overlays are resolved for schedules and associations, associations
    /// are spliced in, variation events are applied if enabled, and
    /// finally identical neighbouring schedules are merged.
    pub fn resolve(&self, timetable: Timetable) -> Result<Vec<Schedule>, DomainError> {
        let Timetable {
            schedules,
            associations,
            events,
        } = timetable;
        info!(
            schedules = schedules.len(),
            associations = associations.len(),
            "resolving timetable"
        );

        let mut ids = IdGenerator::seeded_from(
            schedules
                .iter()
                .map(OverlayRecord::id)
                .chain(associations.iter().map(OverlayRecord::id)),
        )?;

        let schedules = apply_overlays(schedules, &mut ids)?;
        let associations = apply_overlays(associations, &mut ids)?;
        let mut schedules = apply_associations(schedules, &associations, &mut ids)?.into_records();

        if self.config.apply_variations {
            schedules = apply_variations(schedules, events, self.config.match_window());
        }

        let schedules = merge_schedules(schedules);
        info!(schedules = schedules.len(), "timetable resolved");
        Ok(schedules)
    }
}
