use baro_pulse::models::{
    GeoPoint, Observer, PressureSample, PulseEvent, SampleSeries, TimeWindow,
};
use baro_pulse::processors::{ArrivalCalculator, Detrender};
use baro_pulse::utils::coordinates::geodesic_distance;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::f64::consts::PI;

const T0: i64 = 1_642_248_000;

// Five-minute barometer trace with a slow swing and one short pulse
fn create_series(hours: i64) -> SampleSeries {
    let samples = (0..hours * 12)
        .map(|i| {
            let t = T0 + i * 300;
            let h = (t - T0) as f64 / 3600.0;
            let pulse = 1.5 * (-0.5 * ((h - hours as f64 / 3.0) / 0.5).powi(2)).exp();
            PressureSample::new(t, 1013.0 + 3.0 * (2.0 * PI * h / 60.0).sin() + pulse)
        })
        .collect();
    SampleSeries::new(samples)
}

fn window(hours: i64) -> TimeWindow {
    TimeWindow {
        start: T0,
        stop: T0 + hours * 3600,
    }
}

fn benchmark_spline_detrend(c: &mut Criterion) {
    let mut group = c.benchmark_group("spline_detrend");

    for hours in [24, 48, 96, 192].iter() {
        let series = create_series(*hours);
        let window = window(*hours);
        let detrender = Detrender::new(6.0);

        group.bench_with_input(BenchmarkId::new("hours", hours), hours, |b, _| {
            b.iter(|| detrender.detrend(black_box(&series), black_box(&window)))
        });
    }

    group.finish();
}

fn benchmark_polynomial_detrend(c: &mut Criterion) {
    let series = create_series(48);
    let window = window(48);
    let detrender = Detrender::new(10.0).with_polynomial(2);

    c.bench_function("polynomial_detrend_48h", |b| {
        b.iter(|| detrender.detrend(black_box(&series), black_box(&window)))
    });
}

fn benchmark_arrivals(c: &mut Criterion) {
    let observer = Observer::new(44.80321621050904, -63.62038361172844);
    let event = PulseEvent::new(
        "Hunga Tonga-Hunga Ha'apai",
        GeoPoint::new(-20.5452074472518, -175.38715105641674),
        1642220085,
        0.32,
    );
    let calculator = ArrivalCalculator::new();

    c.bench_function("vincenty_distance", |b| {
        b.iter(|| geodesic_distance(black_box(observer.location()), black_box(event.location())))
    });
    c.bench_function("predict_arrivals", |b| {
        b.iter(|| calculator.predict(black_box(&observer), black_box(&event)))
    });
}

criterion_group!(
    benches,
    benchmark_spline_detrend,
    benchmark_polynomial_detrend,
    benchmark_arrivals
);
criterion_main!(benches);
