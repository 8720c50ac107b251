use chrono::{TimeDelta, Weekday};
use std::collections::HashMap;

/// Expected work per weekday for one employee.
///
/// Weekdays with no schedule fall back to the default quota.
#[derive(Debug, Clone)]
pub struct QuotaTable {
    default: TimeDelta,
    by_weekday: HashMap<Weekday, TimeDelta>,
}

impl QuotaTable {
    pub fn new(default: TimeDelta) -> Self {
        Self {
            default,
            by_weekday: HashMap::new(),
        }
    }

    pub fn set(&mut self, weekday: Weekday, quota: TimeDelta) {
        self.by_weekday.insert(weekday, quota);
    }

    pub fn quota_for(&self, weekday: Weekday) -> TimeDelta {
        self.by_weekday
            .get(&weekday)
            .copied()
            .unwrap_or(self.default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_to_default() {
        let mut q = QuotaTable::new(TimeDelta::hours(8));
        q.set(Weekday::Fri, TimeDelta::hours(6));
        assert_eq!(q.quota_for(Weekday::Fri), TimeDelta::hours(6));
        assert_eq!(q.quota_for(Weekday::Mon), TimeDelta::hours(8));
    }
}
