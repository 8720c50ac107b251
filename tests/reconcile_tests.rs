use chrono::{TimeDelta, Weekday};
use punchclock::core::calendar::{HolidayLogic, ScheduleLogic, parse_period};
use punchclock::core::justification::JustificationLogic;
use punchclock::core::reconcile::{ReconcileLogic, ReconcileSettings};
use punchclock::db::pool::DbPool;
use punchclock::db::processed::list_processed;
use punchclock::errors::AppError;
use punchclock::models::day_result::DayStatus;
use punchclock::models::holiday::HolidayScope;
use punchclock::models::justification::{Channel, JustificationType};
use punchclock::models::punch_kind::PunchKind;
use std::thread;

mod common;
use common::{add_punches, date, memory_pool, processed_count, setup_test_db};

fn run(pool: &DbPool, emp: i64, from: &str, to: &str) -> punchclock::models::day_result::AggregateResult {
    ReconcileLogic::run(pool, ReconcileSettings::default(), emp, date(from), date(to)).unwrap()
}

fn request(pool: &DbPool, emp: i64, day: &str) -> i64 {
    JustificationLogic::request(
        pool,
        emp,
        date(day),
        JustificationType::Medical,
        "medical appointment in the morning",
        Channel::Manual,
    )
    .unwrap()
}

#[test]
fn test_reconcile_is_idempotent() {
    let (pool, emp) = memory_pool();
    add_punches(
        &pool,
        emp,
        &[
            "2025-03-10 08:00",
            "2025-03-10 12:00",
            "2025-03-10 13:00",
            "2025-03-10 17:00",
            "2025-03-11 08:00",
            "2025-03-11 12:00",
        ],
    );

    let first = run(&pool, emp, "2025-03-10", "2025-03-14");
    let rows_after_first = processed_count(&pool, emp);
    let second = run(&pool, emp, "2025-03-10", "2025-03-14");

    assert_eq!(rows_after_first, 6);
    assert_eq!(processed_count(&pool, emp), rows_after_first);
    assert_eq!(first.per_day, second.per_day);
    assert_eq!(first.regular, second.regular);
}

#[test]
fn test_counts_add_up_and_days_are_ordered() {
    let (pool, emp) = memory_pool();
    add_punches(&pool, emp, &["2025-03-10 08:00", "2025-03-10 16:00"]);

    let r = run(&pool, emp, "2025-03-01", "2025-03-31");

    assert_eq!(r.total_days, 31);
    assert_eq!(r.regular + r.irregular + r.justified, r.total_days);
    assert!(r.per_day.windows(2).all(|w| w[0].date < w[1].date));
    assert!(r.errors.is_empty());
}

#[test]
fn test_processed_rows_alternate_and_carry_status() {
    let (pool, emp) = memory_pool();
    add_punches(
        &pool,
        emp,
        &["2025-03-10 12:00", "2025-03-10 08:00", "2025-03-10 13:00"],
    );

    run(&pool, emp, "2025-03-10", "2025-03-10");

    let rows = pool
        .with_conn(|c| list_processed(c, emp, date("2025-03-10"), date("2025-03-10")))
        .unwrap();
    let kinds: Vec<PunchKind> = rows.iter().map(|r| r.kind).collect();
    assert_eq!(kinds, vec![PunchKind::In, PunchKind::Out, PunchKind::In]);
    assert!(rows.iter().all(|r| r.status == DayStatus::Irregular));
    assert!(rows.iter().all(|r| r.processed_by == "system"));
}

#[test]
fn test_stale_projection_is_purged() {
    let (pool, emp) = memory_pool();
    add_punches(&pool, emp, &["2025-03-10 08:00", "2025-03-10 16:00"]);
    run(&pool, emp, "2025-03-10", "2025-03-10");
    assert_eq!(processed_count(&pool, emp), 2);

    pool.with_conn(|c| {
        c.execute("DELETE FROM punches WHERE employee_id = ?1", [emp])?;
        Ok(())
    })
    .unwrap();

    let r = run(&pool, emp, "2025-03-10", "2025-03-10");
    assert_eq!(processed_count(&pool, emp), 0);
    assert_eq!(r.per_day[0].status, DayStatus::Irregular);
}

#[test]
fn test_saturday_work_and_holiday() {
    let (pool, emp) = memory_pool();
    HolidayLogic::add(&pool, date("2025-04-21"), "Tiradentes", HolidayScope::National).unwrap();
    add_punches(&pool, emp, &["2025-04-19 09:00", "2025-04-19 11:00"]);

    let r = run(&pool, emp, "2025-04-19", "2025-04-21");

    // Sat worked, Sun rest, Mon holiday
    assert!(r.per_day.iter().all(|d| d.status == DayStatus::Regular));
    assert_eq!(r.per_day[0].extra, TimeDelta::hours(2));
    assert_eq!(r.per_day[2].short, TimeDelta::zero());
}

#[test]
fn test_deactivated_holiday_is_a_workday() {
    let (pool, emp) = memory_pool();
    HolidayLogic::add(&pool, date("2025-04-21"), "Tiradentes", HolidayScope::National).unwrap();
    HolidayLogic::set_active(&pool, date("2025-04-21"), false).unwrap();

    let r = run(&pool, emp, "2025-04-21", "2025-04-21");
    assert_eq!(r.per_day[0].status, DayStatus::Irregular);
}

#[test]
fn test_only_approved_justifications_count() {
    let (pool, emp) = memory_pool();
    let pending = request(&pool, emp, "2025-03-10");

    let r = run(&pool, emp, "2025-03-10", "2025-03-10");
    assert_eq!(r.per_day[0].status, DayStatus::Irregular);
    assert_eq!(r.per_day[0].justification_id, None);

    JustificationLogic::reject(&pool, pending, "hr").unwrap();
    let r = run(&pool, emp, "2025-03-10", "2025-03-10");
    assert_eq!(r.per_day[0].status, DayStatus::Irregular);

    let approved = request(&pool, emp, "2025-03-10");
    JustificationLogic::approve(&pool, approved, "hr").unwrap();
    let r = run(&pool, emp, "2025-03-10", "2025-03-10");
    assert_eq!(r.per_day[0].status, DayStatus::Justified);
    assert_eq!(r.per_day[0].justification_id, Some(approved));
    assert_eq!(r.per_day[0].short, TimeDelta::hours(8));
}

#[test]
fn test_latest_approval_wins() {
    let (pool, emp) = memory_pool();
    let a = request(&pool, emp, "2025-03-10");
    let b = request(&pool, emp, "2025-03-10");
    JustificationLogic::approve(&pool, a, "hr").unwrap();
    JustificationLogic::approve(&pool, b, "hr").unwrap();

    // `a` re-stamped as the most recent approval
    pool.with_conn(|c| {
        c.execute(
            "UPDATE justifications SET approved_at = '2999-01-01T00:00:00+00:00' WHERE id = ?1",
            [a],
        )?;
        Ok(())
    })
    .unwrap();

    let r = run(&pool, emp, "2025-03-10", "2025-03-10");
    assert_eq!(r.per_day[0].justification_id, Some(a));
}

#[test]
fn test_schedule_sets_weekday_quota() {
    let (pool, emp) = memory_pool();
    ScheduleLogic::set(
        &pool,
        emp,
        Weekday::Fri,
        &[parse_period("08:00-14:00").unwrap()],
    )
    .unwrap();
    add_punches(
        &pool,
        emp,
        &[
            "2025-03-13 08:00",
            "2025-03-13 14:00",
            "2025-03-14 08:00",
            "2025-03-14 14:00",
        ],
    );

    let r = run(&pool, emp, "2025-03-13", "2025-03-14");
    // Thursday keeps the 8h default, Friday expects 6h
    assert_eq!(r.per_day[0].status, DayStatus::Irregular);
    assert_eq!(r.per_day[0].short, TimeDelta::hours(2));
    assert_eq!(r.per_day[1].status, DayStatus::Regular);
}

#[test]
fn test_invalid_requests() {
    let (pool, emp) = memory_pool();

    let err = ReconcileLogic::run(
        &pool,
        ReconcileSettings::default(),
        emp,
        date("2025-03-11"),
        date("2025-03-10"),
    )
    .unwrap_err();
    assert!(matches!(err, AppError::InvalidRange { .. }));

    let err = ReconcileLogic::run(
        &pool,
        ReconcileSettings::default(),
        emp + 100,
        date("2025-03-10"),
        date("2025-03-10"),
    )
    .unwrap_err();
    assert!(matches!(err, AppError::EmployeeNotFound(_)));
}

#[test]
fn test_concurrent_runs_on_same_file_do_not_duplicate() {
    let db_path = setup_test_db("concurrent_reconcile");
    let pool = DbPool::open(&db_path).unwrap();
    let emp = pool
        .with_conn(|c| punchclock::db::employees::insert_employee(c, "Ana", "0042"))
        .unwrap();
    add_punches(
        &pool,
        emp,
        &[
            "2025-03-10 08:00",
            "2025-03-10 12:00",
            "2025-03-10 13:00",
            "2025-03-10 17:00",
            "2025-03-11 08:00",
            "2025-03-11 17:00",
        ],
    );

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let path = db_path.clone();
            thread::spawn(move || {
                // separate connection per thread
                let own = DbPool::open(&path).unwrap();
                for _ in 0..5 {
                    let r = ReconcileLogic::run(
                        &own,
                        ReconcileSettings::default(),
                        emp,
                        date("2025-03-10"),
                        date("2025-03-12"),
                    )
                    .unwrap();
                    assert!(r.errors.is_empty(), "{:?}", r.errors);
                }
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(processed_count(&pool, emp), 6);
}

#[test]
fn test_shared_pool_across_threads() {
    let (pool, emp) = memory_pool();
    add_punches(&pool, emp, &["2025-03-10 08:00", "2025-03-10 16:00"]);

    let handles: Vec<_> = (0..3)
        .map(|_| {
            let p = pool.clone();
            thread::spawn(move || {
                ReconcileLogic::run(&p, ReconcileSettings::default(), emp, date("2025-03-10"), date("2025-03-10"))
                    .unwrap()
            })
        })
        .collect();

    for h in handles {
        assert_eq!(h.join().unwrap().regular, 1);
    }
    assert_eq!(processed_count(&pool, emp), 2);
}
