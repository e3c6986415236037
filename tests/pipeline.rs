use assert_approx_eq::assert_approx_eq;
use chrono::{DateTime, Days, NaiveDate, TimeZone, Utc};
use hedge_residuals::{
    FitError, MetricsHistory, RegressionConfig, RollingRegression, TimePoint, run, summarize,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};

fn day(i: u64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, 2).unwrap() + Days::new(i)
}

fn is_weekend(ts: NaiveDate) -> bool {
    use chrono::Datelike;
    ts.weekday().number_from_monday() > 5
}

#[test]
fn exact_hedge_is_recovered_through_gaps() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut leg = Vec::new();
    let mut fly = Vec::new();
    for i in 0..400 {
        let ts = day(i);
        let x: f64 = 95.0 + rng.gen_range(0.0..10.0);
        // leg trades every day, fly only on weekdays and with the odd missing print
        leg.push(TimePoint::new(ts, x));
        if is_weekend(ts) {
            continue;
        }
        if i % 17 == 0 {
            fly.push(TimePoint::missing(ts));
        } else {
            fly.push(TimePoint::new(ts, 2.0 * x + 5.0));
        }
    }

    let report = run(&fly, &leg, &RegressionConfig::default());
    let expected = fly.iter().filter(|p| p.value.is_some()).count();
    assert_eq!(report.len(), expected);
    assert!(report.rows().all(|r| !is_weekend(r.timestamp)));

    let mut defined = 0;
    for row in report.rows() {
        if let Some(slope) = row.slope {
            defined += 1;
            assert_approx_eq!(slope, 2.0, 1e-9);
            assert_approx_eq!(row.intercept.unwrap(), 5.0, 1e-6);
            assert_approx_eq!(row.residual.unwrap(), 0.0, 1e-8);
        }
    }
    assert_eq!(defined, report.defined_count());
    assert!(defined > 0);
    assert!(report.is_latest_defined());
    assert_approx_eq!(report.mean().unwrap(), 0.0, 1e-8);
}

#[test]
fn shock_on_latest_row_shows_in_z_score() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut leg = Vec::new();
    let mut fly = Vec::new();
    let n = 250;
    for i in 0..n {
        let ts = day(i);
        let x: f64 = 50.0 + rng.gen_range(-5.0..5.0);
        let noise: f64 = StandardNormal.sample(&mut rng);
        let shock = if i == n - 1 { 3.0 } else { 0.0 };
        leg.push(TimePoint::new(ts, x));
        fly.push(TimePoint::new(ts, 1.5 * x - 10.0 + 0.1 * noise + shock));
    }

    let report = run(&fly, &leg, &RegressionConfig::new(3, 50));
    assert!(report.is_latest_defined());
    assert_eq!(report.latest_residual_timestamp(), Some(day(n - 1)));
    assert!(report.latest_residual().unwrap() > 2.0);
    assert!(report.z_score().unwrap() > 4.0);

    let last = report.rows().last().unwrap();
    assert_approx_eq!(last.slope.unwrap(), 1.5, 0.05);
}

#[test]
fn normal_residuals_have_normal_moments() {
    let mut rng = StdRng::seed_from_u64(2024);
    let residuals: Vec<Option<f64>> = (0..20_000)
        .map(|_| Some(StandardNormal.sample(&mut rng)))
        .collect();

    let summary = summarize(residuals);
    assert_eq!(summary.count(), 20_000);
    assert_approx_eq!(summary.mean().unwrap(), 0.0, 0.05);
    assert_approx_eq!(summary.std_dev().unwrap(), 1.0, 0.05);
    assert_approx_eq!(summary.skewness().unwrap(), 0.0, 0.1);
    assert_approx_eq!(summary.kurtosis().unwrap(), 3.0, 0.15);
    assert_approx_eq!(
        summary.normal_pdf(summary.mean().unwrap()).unwrap(),
        0.3989,
        0.02
    );
}

#[test]
fn no_common_timestamps() {
    let leg: Vec<_> = (0..10).map(|i| TimePoint::new(day(2 * i), 1.0)).collect();
    let fly: Vec<_> = (0..10).map(|i| TimePoint::new(day(2 * i + 1), 1.0)).collect();

    let report = run(&fly, &leg, &RegressionConfig::default());
    assert!(report.is_empty());
    assert_eq!(report.summary().count(), 0);
    assert_eq!(report.mean(), None);
    assert_eq!(report.std_dev(), None);
    assert_eq!(report.skewness(), None);
    assert_eq!(report.kurtosis(), None);
    assert_eq!(report.z_score(), None);
}

#[test]
fn short_history_leaves_every_row_undefined() {
    let leg: Vec<_> = (0..20).map(|i| TimePoint::new(day(i), i as f64)).collect();
    let fly: Vec<_> = (0..20).map(|i| TimePoint::new(day(i), 2.0 * i as f64)).collect();

    let report = run(&fly, &leg, &RegressionConfig::default());
    assert_eq!(report.len(), 20);
    assert_eq!(report.defined_count(), 0);
    assert_eq!(
        report.error(19),
        Some(FitError::InsufficientWindow {
            len: 20,
            required: 50
        })
    );
    assert_eq!(report.latest_residual(), None);
    assert_eq!(report.z_score(), None);
}

#[test]
fn utc_timestamps_use_calendar_months() {
    let at = |m: u32, d: u32| Utc.with_ymd_and_hms(2024, m, d, 21, 0, 0).unwrap();
    let stamps: Vec<DateTime<Utc>> = vec![at(1, 30), at(2, 29), at(3, 1), at(4, 15), at(5, 31)];

    let leg: Vec<_> = stamps
        .iter()
        .enumerate()
        .map(|(i, ts)| TimePoint::new(*ts, i as f64))
        .collect();
    let fly: Vec<_> = stamps
        .iter()
        .enumerate()
        .map(|(i, ts)| TimePoint::new(*ts, 3.0 * i as f64 + 1.0))
        .collect();

    let config = RegressionConfig::new(3, 2);
    let report = run(&fly, &leg, &config);
    // 2024-05-31 21:00 looks back to 2024-02-29 21:00 inclusive
    assert_eq!(report.records()[4].line().map(|l| l.len), Some(4));
    // 2024-04-15 21:00 looks back to 2024-01-15 21:00
    assert_eq!(report.records()[3].line().map(|l| l.len), Some(4));

    let mut reg = RollingRegression::new(&config);
    for row in report.series() {
        reg.next(*row);
    }
    assert_eq!(reg.window_start(), Some(at(2, 29)));
    assert_eq!(reg.len(), 4);
    assert_approx_eq!(reg.slope().unwrap(), 3.0, 1e-12);
}

#[test]
fn history_collects_runs() {
    let leg: Vec<_> = (0..120).map(|i| TimePoint::new(day(i), (i % 13) as f64)).collect();
    let fly_a: Vec<_> = leg
        .iter()
        .enumerate()
        .map(|(i, p)| TimePoint::new(p.timestamp, p.value.unwrap() + (i % 3) as f64))
        .collect();
    let fly_b: Vec<_> = leg
        .iter()
        .enumerate()
        .map(|(i, p)| TimePoint::new(p.timestamp, -p.value.unwrap() + (i % 4) as f64))
        .collect();

    let config = RegressionConfig::default();
    let history = MetricsHistory::new()
        .record(run(&fly_a, &leg, &config).metrics("fly_a.csv"))
        .record(run(&fly_b, &leg, &config).metrics("fly_b.csv"));

    assert_eq!(history.len(), 2);
    let names: Vec<_> = history.iter().map(|e| e.butterfly.as_str()).collect();
    assert_eq!(names, ["fly_a.csv", "fly_b.csv"]);
    assert!(history.iter().all(|e| e.std.is_some() && e.z_score.is_some()));
}
