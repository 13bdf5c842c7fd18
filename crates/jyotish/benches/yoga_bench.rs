use std::path::PathBuf;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use jyotish::ephemeris::{Body, FixedEphemeris};
use jyotish::yoga::{evaluate, evaluate_all, expr::Expr, RulesetStore};
use jyotish::{compute_chart, BirthParams, ChartOptions};

fn sample_chart() -> jyotish::ChartResult {
    let mut eph = FixedEphemeris::new(0.0).with_sidereal_ascendant(5.0);
    let longitudes = [10.0, 5.0, 65.0, 20.0, 95.0, 335.0, 185.0, 120.0];
    for (body, lon) in Body::ALL.iter().zip(longitudes) {
        eph = eph.with_sidereal(*body, lon, 1.0);
    }
    let datetime = chrono::NaiveDate::from_ymd_opt(2000, 1, 1)
        .and_then(|d| d.and_hms_opt(12, 0, 0))
        .unwrap();
    let options = ChartOptions {
        now_jd: Some(2_460_000.5),
        ..ChartOptions::default()
    };
    compute_chart(&eph, &BirthParams::new(datetime, "UTC", 28.61, 77.21), &options).unwrap()
}

fn bench_rulesets(c: &mut Criterion) {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../rulesets/yogas");
    let store = RulesetStore::load_dir(&dir).unwrap();
    let chart = sample_chart();
    let ctx = chart.yoga_context();

    c.bench_function("load_rulesets", |b| b.iter(|| RulesetStore::load_dir(black_box(&dir))));
    c.bench_function("evaluate_all", |b| b.iter(|| evaluate_all(black_box(&store), &ctx)));

    if let Some(gaja) = store.get("gaja_kesari") {
        c.bench_function("evaluate_weighted", |b| b.iter(|| evaluate(black_box(gaja), &ctx)));
    }
}

fn bench_expression(c: &mut Criterion) {
    let source = "a and (b or not c) and (d or e)";
    c.bench_function("parse_expr", |b| b.iter(|| Expr::parse(black_box(source))));

    let expr = Expr::parse(source).unwrap();
    let lookup = |id: &str| Some(matches!(id, "a" | "b" | "e"));
    c.bench_function("eval_expr", |b| b.iter(|| expr.eval(black_box(&lookup))));
}

criterion_group!(benches, bench_rulesets, bench_expression);
criterion_main!(benches);
