//! Applying resolved associations to resolved schedules.

use tracing::{debug, info};

use crate::domain::{Association, AssociationType, DomainError, IdGenerator, Schedule};

use super::OverlayIndex;

/// Splice every split and join into the schedules of its associated
/// train.
///
/// For each association, each schedule of the associated train that runs
/// together with some base schedule on a date the association covers is
/// replaced by one merged through schedule per such base schedule, plus
/// whatever is left of it outside the association's dates. The base
/// train's schedules are left as they are.
///
/// Associations naming a train with no schedules are skipped.
pub fn apply_associations(
    mut schedules: OverlayIndex<Schedule>,
    associations: &OverlayIndex<Association>,
    ids: &mut IdGenerator,
) -> Result<OverlayIndex<Schedule>, DomainError> {
    let mut applied = 0usize;

    for (_, revisions) in associations.iter() {
        for association in revisions {
            if association.assoc_type == AssociationType::NotApplicable {
                continue;
            }
            if !schedules.contains(&association.base_tuid) || !schedules.contains(&association.assoc_tuid) {
                debug!(
                    base = %association.base_tuid,
                    assoc = %association.assoc_tuid,
                    "association without schedules for both trains"
                );
                continue;
            }

            let bases = schedules.get(&association.base_tuid).to_vec();
            let existing = schedules.take(&association.assoc_tuid);
            let mut replaced = Vec::with_capacity(existing.len());

            for assoc in existing {
                if assoc.tuid == association.assoc_tuid && runs_with_base(association, &bases, &assoc)? {
                    replaced.extend(association.apply(&bases, &assoc, ids)?);
                    applied += 1;
                } else {
                    replaced.push(assoc);
                }
            }

            schedules.replace(&association.assoc_tuid, replaced);
        }
    }

    info!(applied, schedules = schedules.len(), "associations applied");
    Ok(schedules)
}

/// Does any base schedule run with `assoc` on a date the association
/// covers?
fn runs_with_base(association: &Association, bases: &[Schedule], assoc: &Schedule) -> Result<bool, DomainError> {
    for base in bases {
        if association.shared_dates(base, assoc)?.is_some() {
            return Ok(true);
        }
    }
    Ok(false)
}
