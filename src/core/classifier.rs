//! Per-day classification: the decision table at the heart of reconciliation.
//!
//! | punches | special day | justification | shortfall | status    |
//! |---------|-------------|---------------|-----------|-----------|
//! | none    | yes         | any           | -         | regular   |
//! | none    | no          | yes           | quota     | justified |
//! | none    | no          | no            | quota     | irregular |
//! | some    | yes         | any           | 0         | regular   |
//! | some    | no          | yes           | > 0       | justified |
//! | some    | no          | no            | > 0       | irregular |
//! | some    | no          | any           | 0         | regular   |

use crate::core::calculator::{intervals, surplus::split_surplus};
use crate::models::day_result::{DayResult, DayStatus};
use crate::models::justification::Justification;
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

/// Everything needed to classify one employee day. No I/O happens past this point.
#[derive(Debug, Clone)]
pub struct DayInput<'a> {
    pub date: NaiveDate,
    /// Punch timestamps of the day, sorted ascending.
    pub punches: &'a [NaiveDateTime],
    pub special: bool,
    /// An approved justification for this date, if any.
    pub justification: Option<&'a Justification>,
    pub quota: TimeDelta,
    pub min_break: TimeDelta,
}

/// Which row of the decision table applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    RestDay,
    ExcusedAbsence,
    UnexcusedAbsence,
    RestDayWork,
    Workday,
}

impl Rule {
    pub fn select(has_punches: bool, special: bool, justified: bool) -> Self {
        match (has_punches, special, justified) {
            (false, true, _) => Rule::RestDay,
            (false, false, true) => Rule::ExcusedAbsence,
            (false, false, false) => Rule::UnexcusedAbsence,
            (true, true, _) => Rule::RestDayWork,
            (true, false, _) => Rule::Workday,
        }
    }
}

pub fn classify_day(input: &DayInput<'_>) -> DayResult {
    let zero = TimeDelta::zero();
    let rule = Rule::select(
        !input.punches.is_empty(),
        input.special,
        input.justification.is_some(),
    );

    let base = DayResult {
        date: input.date,
        status: DayStatus::Regular,
        punches: input
            .punches
            .iter()
            .map(|p| p.format("%H:%M").to_string())
            .collect(),
        worked: zero,
        extra: zero,
        short: zero,
        justification_id: input.justification.map(|j| j.id),
        observation: String::new(),
    };

    match rule {
        Rule::RestDay => DayResult {
            observation: "weekend/holiday, no punches expected".into(),
            ..base
        },
        Rule::ExcusedAbsence => DayResult {
            status: DayStatus::Justified,
            short: input.quota,
            observation: input
                .justification
                .map(Justification::describe)
                .unwrap_or_default(),
            ..base
        },
        Rule::UnexcusedAbsence => DayResult {
            status: DayStatus::Irregular,
            short: input.quota,
            observation: "unexcused absence".into(),
            ..base
        },
        Rule::RestDayWork => {
            let work = intervals::compute(input.punches, input.min_break);
            DayResult {
                worked: work.worked,
                extra: work.worked,
                observation: with_dropped_note("work on weekend/holiday".into(), work.dropped),
                ..base
            }
        }
        Rule::Workday => {
            let work = intervals::compute(input.punches, input.min_break);
            let (extra, short) = split_surplus(work.worked, input.quota);

            let (status, observation) = match (short > zero, input.justification) {
                (true, Some(j)) => (DayStatus::Justified, j.describe()),
                (true, None) => (
                    DayStatus::Irregular,
                    "shortfall without justification".to_string(),
                ),
                (false, _) => (DayStatus::Regular, "regular workday".to_string()),
            };

            DayResult {
                status,
                worked: work.worked,
                extra,
                short,
                observation: with_dropped_note(observation, work.dropped),
                ..base
            }
        }
    }
}

fn with_dropped_note(observation: String, dropped: Option<NaiveDateTime>) -> String {
    match dropped {
        Some(p) => format!(
            "{observation}; odd punch count, ignored trailing punch at {}",
            p.format("%H:%M")
        ),
        None => observation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::justification::{Channel, JustificationStatus, JustificationType};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn at(day: &str, hm: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(&format!("{day} {hm}"), "%Y-%m-%d %H:%M").unwrap()
    }

    fn medical(day: &str) -> Justification {
        Justification {
            id: 42,
            employee_id: 1,
            date: date(day),
            kind: JustificationType::Medical,
            reason: "dentist appointment".into(),
            status: JustificationStatus::Approved,
            approved_by: Some("hr".into()),
            approved_at: Some("2025-03-11T09:00:00+00:00".into()),
            channel: Channel::Manual,
            created_at: "2025-03-10T09:00:00+00:00".into(),
        }
    }

    fn input<'a>(
        day: &str,
        punches: &'a [NaiveDateTime],
        special: bool,
        justification: Option<&'a Justification>,
    ) -> DayInput<'a> {
        DayInput {
            date: date(day),
            punches,
            special,
            justification,
            quota: TimeDelta::hours(8),
            min_break: TimeDelta::minutes(60),
        }
    }

    #[test]
    fn test_rest_day_without_punches_is_regular() {
        let r = classify_day(&input("2025-03-08", &[], true, None));
        assert_eq!(r.status, DayStatus::Regular);
        assert_eq!(r.short, TimeDelta::zero());
        assert_eq!(r.worked, TimeDelta::zero());
        assert_eq!(r.observation, "weekend/holiday, no punches expected");
    }

    #[test]
    fn test_absence_with_justification_is_justified() {
        let j = medical("2025-03-10");
        let r = classify_day(&input("2025-03-10", &[], false, Some(&j)));
        assert_eq!(r.status, DayStatus::Justified);
        assert_eq!(r.short, TimeDelta::hours(8));
        assert_eq!(r.justification_id, Some(42));
        assert!(r.observation.contains("medical"));
    }

    #[test]
    fn test_unexcused_absence_is_irregular() {
        let r = classify_day(&input("2025-03-10", &[], false, None));
        assert_eq!(r.status, DayStatus::Irregular);
        assert_eq!(r.short, TimeDelta::hours(8));
        assert_eq!(r.observation, "unexcused absence");
        assert!(r.justification_id.is_none());
    }

    #[test]
    fn test_saturday_work_counts_as_extra() {
        let p = [at("2025-03-08", "09:00"), at("2025-03-08", "11:00")];
        let r = classify_day(&input("2025-03-08", &p, true, None));
        assert_eq!(r.status, DayStatus::Regular);
        assert_eq!(r.worked, TimeDelta::hours(2));
        assert_eq!(r.extra, TimeDelta::hours(2));
        assert_eq!(r.short, TimeDelta::zero());
        assert_eq!(r.punches, vec!["09:00", "11:00"]);
    }

    #[test]
    fn test_full_day_is_regular() {
        let d = "2025-03-10";
        let p = [at(d, "08:00"), at(d, "12:00"), at(d, "13:00"), at(d, "17:30")];
        let r = classify_day(&input(d, &p, false, None));
        assert_eq!(r.status, DayStatus::Regular);
        assert_eq!(r.extra, TimeDelta::minutes(30));
        assert_eq!(r.short, TimeDelta::zero());
    }

    #[test]
    fn test_short_break_penalty_reaches_exact_quota() {
        let d = "2025-03-10";
        let p = [at(d, "09:00"), at(d, "12:00"), at(d, "12:10"), at(d, "18:00")];
        let r = classify_day(&input(d, &p, false, None));
        assert_eq!(r.worked, TimeDelta::hours(8));
        assert_eq!(r.status, DayStatus::Regular);
    }

    #[test]
    fn test_shortfall_without_justification_is_irregular() {
        let d = "2025-03-10";
        let p = [at(d, "08:00"), at(d, "12:00")];
        let r = classify_day(&input(d, &p, false, None));
        assert_eq!(r.status, DayStatus::Irregular);
        assert_eq!(r.short, TimeDelta::hours(4));
    }

    #[test]
    fn test_shortfall_with_justification_is_justified() {
        let d = "2025-03-10";
        let j = medical(d);
        let p = [at(d, "08:00"), at(d, "12:00")];
        let r = classify_day(&input(d, &p, false, Some(&j)));
        assert_eq!(r.status, DayStatus::Justified);
        assert_eq!(r.short, TimeDelta::hours(4));
    }

    #[test]
    fn test_justification_on_full_day_does_not_change_status() {
        let d = "2025-03-10";
        let j = medical(d);
        let p = [at(d, "08:00"), at(d, "12:00"), at(d, "13:00"), at(d, "17:00")];
        let r = classify_day(&input(d, &p, false, Some(&j)));
        assert_eq!(r.status, DayStatus::Regular);
        assert_eq!(r.justification_id, Some(42));
    }

    #[test]
    fn test_odd_punches_noted_in_observation() {
        let d = "2025-03-10";
        let p = [at(d, "08:00"), at(d, "16:00"), at(d, "16:05")];
        let r = classify_day(&input(d, &p, false, None));
        assert_eq!(r.worked, TimeDelta::hours(8));
        assert_eq!(r.status, DayStatus::Regular);
        assert!(r.observation.contains("ignored trailing punch at 16:05"));
        assert_eq!(r.punches.len(), 3);
    }

    #[test]
    fn test_rule_selection() {
        assert_eq!(Rule::select(false, true, true), Rule::RestDay);
        assert_eq!(Rule::select(false, false, true), Rule::ExcusedAbsence);
        assert_eq!(Rule::select(false, false, false), Rule::UnexcusedAbsence);
        assert_eq!(Rule::select(true, true, false), Rule::RestDayWork);
        assert_eq!(Rule::select(true, false, true), Rule::Workday);
    }
}
