use criterion::{criterion_group, criterion_main, Criterion};
use fluxmodels::prelude::functions::*;
use fluxmodels::prelude::*;
use ndarray::Array1;
use std::hint::black_box;

fn energies(n: usize) -> ArrayD<f64> {
    Array1::logspace(10.0, 0.0, 4.0, n).into_dyn()
}

fn bench_closed_form(c: &mut Criterion) {
    let x = energies(1000);
    let powerlaw = PowerLaw::new();
    let log_parabola = LogParabola::new();

    c.bench_function("powerlaw_1000", |b| {
        b.iter(|| powerlaw.call(black_box(&x)).unwrap())
    });
    c.bench_function("log_parabola_1000", |b| {
        b.iter(|| log_parabola.call(black_box(&x)).unwrap())
    });
}

fn bench_band(c: &mut Criterion) {
    let x = energies(1000);
    let band = Band::new();
    let params = band.parameters().values();

    c.bench_function("band_1000", |b| {
        b.iter(|| band.evaluate(black_box(&x), black_box(&params)).unwrap())
    });
}

#[cfg(feature = "special")]
fn bench_cutoff_powerlaw_flux(c: &mut Criterion) {
    let x = energies(1000);
    let function = CutoffPowerLawFlux::new();

    c.bench_function("cutoff_powerlaw_flux_1000", |b| {
        b.iter(|| function.call(black_box(&x)).unwrap())
    });
}

#[cfg(not(feature = "special"))]
fn bench_cutoff_powerlaw_flux(_c: &mut Criterion) {}

#[cfg(feature = "synchrotron")]
fn bench_synchrotron(c: &mut Criterion) {
    let x = energies(50);
    let mut synchrotron = Synchrotron::new();
    synchrotron
        .set_particle_distribution(Box::new(PowerLaw::new()))
        .unwrap();

    c.bench_function("synchrotron_50", |b| {
        b.iter(|| synchrotron.call(black_box(&x)).unwrap())
    });
}

#[cfg(not(feature = "synchrotron"))]
fn bench_synchrotron(_c: &mut Criterion) {}

criterion_group!(
    benches,
    bench_closed_form,
    bench_band,
    bench_cutoff_powerlaw_flux,
    bench_synchrotron
);
criterion_main!(benches);
