use super::backfill_api::BackfillRequest;
use super::Editor;

use crate::{
    api::DurationAPI,
    entities::{Day, DraftField, MAX_DURATION_DAYS},
    error::{invalid_input_error, Error},
};

/// What a duration change did to the day sequence.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Reconciliation {
    pub previous: u32,
    pub current: u32,
    pub truncated: Vec<u32>,
    pub restored: Vec<u32>,
    pub synthesized: Vec<u32>,
    /// Restored stops whose location text is still raw coordinates.
    pub backfills: Vec<BackfillRequest>,
}

impl Reconciliation {
    pub fn is_noop(&self) -> bool {
        self.previous == self.current
    }
}

impl DurationAPI for Editor {
    #[tracing::instrument(skip(self))]
    fn set_duration(&mut self, duration_days: u32) -> Result<Reconciliation, Error> {
        if duration_days < 1 || duration_days > MAX_DURATION_DAYS {
            return Err(invalid_input_error());
        }

        let current = self.draft.days.len();
        let target = duration_days as usize;

        let mut reconciliation = Reconciliation {
            previous: current as u32,
            current: duration_days,
            ..Default::default()
        };

        if target < current {
            let truncated: Vec<Day> = self.draft.days.split_off(target);

            self.snapshot.retain_truncated(&truncated);
            self.errors.truncate_days(target);

            if self.active_day >= target {
                self.active_day = target - 1;
            }

            reconciliation.truncated = truncated.iter().map(|day| day.day_number).collect();
        } else if target > current {
            for n in (current as u32 + 1)..=duration_days {
                match self.snapshot.restore(n) {
                    Some(day) => {
                        reconciliation.backfills.extend(
                            day.stops.iter().filter_map(BackfillRequest::for_stop),
                        );
                        self.draft.days.push(day);
                        reconciliation.restored.push(n);
                    }
                    None => {
                        self.draft.days.push(Day::new(n));
                        reconciliation.synthesized.push(n);
                    }
                }
            }
        }

        self.draft.duration_days = duration_days;
        self.errors.clear_field(DraftField::Duration);

        if !reconciliation.is_noop() {
            tracing::info!(
                "duration {} -> {}: truncated {:?}, restored {:?} from a {}s old snapshot, synthesized {:?}",
                reconciliation.previous,
                reconciliation.current,
                reconciliation.truncated,
                reconciliation.restored,
                self.snapshot.age().num_seconds(),
                reconciliation.synthesized
            );
        }

        Ok(reconciliation)
    }
}
