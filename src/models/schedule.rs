use chrono::{NaiveTime, TimeDelta, Weekday};
use serde::Serialize;

/// One expected work period inside a weekday schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WorkPeriod {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl WorkPeriod {
    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }
}

/// Expected work periods of one employee on one weekday.
#[derive(Debug, Clone, Serialize)]
pub struct Schedule {
    pub employee_id: i64,
    #[serde(serialize_with = "serialize_weekday")]
    pub weekday: Weekday,
    pub periods: Vec<WorkPeriod>,
}

impl Schedule {
    /// Expected hours for the day: the sum of all periods.
    pub fn quota(&self) -> TimeDelta {
        self.periods
            .iter()
            .fold(TimeDelta::zero(), |acc, p| acc + p.duration())
    }
}

fn serialize_weekday<S: serde::Serializer>(w: &Weekday, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&w.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> NaiveTime {
        NaiveTime::parse_from_str(s, "%H:%M").unwrap()
    }

    #[test]
    fn test_quota_sums_periods() {
        let s = Schedule {
            employee_id: 1,
            weekday: Weekday::Mon,
            periods: vec![
                WorkPeriod {
                    start: t("08:00"),
                    end: t("12:00"),
                },
                WorkPeriod {
                    start: t("13:00"),
                    end: t("15:30"),
                },
            ],
        };
        assert_eq!(s.quota(), TimeDelta::minutes(390));
    }
}
