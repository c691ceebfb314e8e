//! Performance benchmarks for the payroll ledger.
//!
//! Covers the pure pay calculation for one employee and for growing
//! batches, attendance grouping, and a full payroll preview through the
//! HTTP router.
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use std::sync::Arc;

use axum::{body::Body, http::Request};
use chrono::{NaiveDate, Utc};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rust_decimal::Decimal;
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;

use payroll_ledger::api::{AppState, create_router};
use payroll_ledger::calculation::{PeriodPayInput, calculate_period_pay, group_attendance_by_day};
use payroll_ledger::config::ConfigLoader;
use payroll_ledger::models::{
    Adjustment, AdjustmentKind, Attendance, Employee, Loan, LoanStatus, PayFrequency, PayPeriod,
    WorkDay,
};
use payroll_ledger::store::InMemoryStore;

fn period_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 5).unwrap()
}

fn period() -> PayPeriod {
    PayFrequency::Weekly.period_starting(period_start()).unwrap()
}

/// Creates an employee present on weekdays.
fn create_employee(company_id: Uuid, index: usize) -> Employee {
    let attendance: Attendance = WorkDay::ALL
        .iter()
        .map(|day| (*day, !matches!(day, WorkDay::Saturday | WorkDay::Sunday)))
        .collect();
    Employee {
        id: Uuid::new_v4(),
        company_id,
        department_id: None,
        name: format!("Employee {:04}", index),
        position: None,
        daily_wage: Decimal::new(10000 + index as i64, 2),
        wage_history: vec![],
        attendance,
        active: true,
        hired_on: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        created_at: Utc::now(),
    }
}

fn create_adjustment(employee: &Employee) -> Adjustment {
    Adjustment {
        id: Uuid::new_v4(),
        company_id: employee.company_id,
        employee_id: employee.id,
        kind: AdjustmentKind::Bonus,
        amount: Decimal::from(25),
        reason: "Overtime".to_string(),
        period_start: period_start(),
        created_at: Utc::now(),
    }
}

fn create_loan(employee: &Employee) -> Loan {
    Loan {
        id: Uuid::new_v4(),
        company_id: employee.company_id,
        employee_id: employee.id,
        amount: Decimal::from(500),
        repayment_amount: Decimal::from(50),
        start_date: NaiveDate::from_ymd_opt(2025, 12, 1).unwrap(),
        status: LoanStatus::Active,
        cancelled_on: None,
        note: None,
        created_at: Utc::now(),
    }
}

/// Benchmark: pay for one employee with one adjustment and one loan.
fn bench_single_employee(c: &mut Criterion) {
    let employee = create_employee(Uuid::new_v4(), 0);
    let adjustments = vec![create_adjustment(&employee)];
    let loans = vec![create_loan(&employee)];
    let period = period();

    c.bench_function("single_employee_period_pay", |b| {
        b.iter(|| {
            calculate_period_pay(black_box(PeriodPayInput {
                employee: &employee,
                period: &period,
                frequency: PayFrequency::Weekly,
                adjustments: &adjustments,
                loans: &loans,
            }))
            .unwrap()
        })
    });
}

/// Benchmark: a whole company's pay, as done by a period close.
fn bench_company_scaling(c: &mut Criterion) {
    let company_id = Uuid::new_v4();
    let period = period();
    let mut group = c.benchmark_group("company_period_pay");

    for size in [10usize, 100, 1000] {
        let employees: Vec<Employee> = (0..size).map(|i| create_employee(company_id, i)).collect();
        let adjustments: Vec<Adjustment> = employees.iter().map(create_adjustment).collect();
        let loans: Vec<Loan> = employees.iter().step_by(3).map(create_loan).collect();

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                employees
                    .iter()
                    .map(|employee| {
                        calculate_period_pay(PeriodPayInput {
                            employee,
                            period: &period,
                            frequency: PayFrequency::Weekly,
                            adjustments: &adjustments,
                            loans: &loans,
                        })
                        .unwrap()
                    })
                    .count()
            })
        });
    }

    group.finish();
}

/// Benchmark: grouping a company's attendance by day.
fn bench_attendance_grouping(c: &mut Criterion) {
    let company_id = Uuid::new_v4();
    let employees: Vec<Employee> = (0..500).map(|i| create_employee(company_id, i)).collect();

    let mut group = c.benchmark_group("attendance_grouping");
    group.throughput(Throughput::Elements(employees.len() as u64));
    group.bench_function("group_500", |b| {
        b.iter(|| group_attendance_by_day(black_box(&employees)))
    });
    group.finish();
}

/// Benchmark: `GET /payroll/preview` for a company of 100 employees.
fn bench_preview_endpoint(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let state = AppState::new(ConfigLoader::default(), Arc::new(InMemoryStore::new()));

    let token = rt.block_on(async {
        let session = state
            .service()
            .register_company(serde_json::from_value(json!({
                "name": "Bench Co",
                "slug": "bench",
                "pay_frequency": "weekly",
                "period_start": "2026-01-05",
                "admin_name": "Bench Admin",
                "admin_email": "admin@bench.test",
                "admin_password": "bench-password"
            }))
            .unwrap())
            .await
            .unwrap()
            .session;

        for i in 0..100 {
            let employee = state
                .service()
                .add_employee(
                    &session,
                    serde_json::from_value(json!({ "name": format!("Employee {:03}", i), "daily_wage": "100" }))
                        .unwrap(),
                )
                .await
                .unwrap();
            for day in [WorkDay::Monday, WorkDay::Tuesday, WorkDay::Wednesday] {
                state
                    .service()
                    .mark_attendance(&session, employee.id, day, true)
                    .await
                    .unwrap();
            }
        }
        session.token
    });

    let mut group = c.benchmark_group("http");
    group.sample_size(20);
    group.bench_function("payroll_preview_100", |b| {
        b.to_async(&rt).iter(|| async {
            let router = create_router(state.clone());
            let response = router
                .oneshot(
                    Request::builder()
                        .uri("/payroll/preview")
                        .header("Authorization", format!("Bearer {}", token))
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            black_box(response)
        })
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_single_employee,
    bench_company_scaling,
    bench_attendance_grouping,
    bench_preview_endpoint,
);
criterion_main!(benches);
