use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};

use crate::entities::day::Day;

/// Retained copies of previously known days, keyed by day number. Used
/// only to restore days when the duration grows again.
#[derive(Clone, Debug)]
pub struct DaySnapshot {
    days: BTreeMap<u32, Day>,
    captured_at: DateTime<Utc>,
}

impl DaySnapshot {
    pub fn empty() -> Self {
        Self {
            days: BTreeMap::new(),
            captured_at: Utc::now(),
        }
    }

    pub fn capture(days: &[Day]) -> Self {
        Self {
            days: days
                .iter()
                .map(|day| (day.day_number, day.clone()))
                .collect(),
            captured_at: Utc::now(),
        }
    }

    /// Records the content of days that are being truncated so a later
    /// increase brings them back as they were.
    pub fn retain_truncated(&mut self, truncated: &[Day]) {
        for day in truncated {
            self.days.insert(day.day_number, day.clone());
        }
    }

    /// Overwrites the entries for freshly persisted days. Days not in
    /// `saved` keep their cached content.
    pub fn refresh(&mut self, saved: &[Day]) {
        self.retain_truncated(saved);
        self.captured_at = Utc::now();
    }

    /// A deep copy of the cached day, never a reference into the cache.
    pub fn restore(&self, day_number: u32) -> Option<Day> {
        self.days.get(&day_number).cloned()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    pub fn age(&self) -> Duration {
        Utc::now() - self.captured_at
    }
}

impl Default for DaySnapshot {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restored_day_is_independent() {
        let mut day = Day::new(2);
        day.push_stop();
        let snapshot = DaySnapshot::capture(&[day]);

        let mut restored = snapshot.restore(2).unwrap();
        restored.stops[0].name = "edited".into();

        assert_eq!(snapshot.restore(2).unwrap().stops[0].name, "");
    }

    #[test]
    fn truncated_days_overwrite_entries() {
        let mut snapshot = DaySnapshot::capture(&[Day::new(1), Day::new(2)]);
        let mut day = Day::new(2);
        day.title = "Montmartre".into();

        snapshot.retain_truncated(&[day]);

        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.restore(2).unwrap().title, "Montmartre");
        assert!(snapshot.restore(3).is_none());
    }

    #[test]
    fn refresh_keeps_truncated_days() {
        let mut snapshot = DaySnapshot::capture(&[Day::new(1)]);
        let mut truncated = Day::new(3);
        truncated.title = "Versailles".into();
        snapshot.retain_truncated(&[truncated]);
        let before = snapshot.captured_at();

        let mut saved = Day::new(1);
        saved.title = "Arrival".into();
        snapshot.refresh(&[saved, Day::new(2)]);

        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot.restore(1).unwrap().title, "Arrival");
        assert_eq!(snapshot.restore(3).unwrap().title, "Versailles");
        assert!(snapshot.captured_at() >= before);
        assert!(snapshot.age() >= Duration::zero());
    }
}
