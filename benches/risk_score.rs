//! Benchmarks for risk assessment

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use folio_pilot::portfolio::{AssetClass, Fundamentals, Portfolio, Position};
use folio_pilot::risk::{self, ReturnSeries};
use rust_decimal::Decimal;

fn sample_portfolio(size: usize) -> Portfolio {
    let value_per_position = Decimal::from(100_000 / size as i64);
    let sectors = ["Technology", "Healthcare", "Energy", "Financials", "Staples"];
    let positions = (0..size)
        .map(|i| Position {
            symbol: format!("SYM{i}"),
            quantity: Decimal::from(100),
            asset_class: if i % 4 == 0 {
                AssetClass::Etf
            } else {
                AssetClass::Equity
            },
            cost_basis: value_per_position / Decimal::from(100),
            market_value: value_per_position,
            current_price: value_per_position / Decimal::from(100),
            fundamentals: Fundamentals {
                sector: Some(sectors[i % sectors.len()].to_string()),
                beta: Some(0.8 + (i % 10) as f64 * 0.1),
                ..Fundamentals::default()
            },
            weight: 0.0,
        })
        .collect();
    Portfolio::new(
        "bench",
        positions,
        Decimal::from(110_000),
        Decimal::from(10_000),
    )
}

fn benchmark_assess(c: &mut Criterion) {
    let portfolio = sample_portfolio(25);

    c.bench_function("risk_assess_25_positions", |b| {
        b.iter(|| risk::assess(black_box(&portfolio), None))
    });
}

fn benchmark_assess_with_returns(c: &mut Criterion) {
    let portfolio = sample_portfolio(25);
    let returns: ReturnSeries = portfolio
        .positions
        .iter()
        .map(|p| {
            let series = (0..252)
                .map(|d| ((d % 7) as f64 - 3.0) * 0.004)
                .collect::<Vec<f64>>();
            (p.symbol.clone(), series)
        })
        .collect();

    c.bench_function("risk_assess_with_volatility", |b| {
        b.iter(|| risk::assess(black_box(&portfolio), Some(black_box(&returns))))
    });
}

criterion_group!(benches, benchmark_assess, benchmark_assess_with_returns);
criterion_main!(benches);
