//! Lightweight parse/print benchmark harness for local baselines.
//!
//! Run from repository root:
//! `cargo run -p sheet_history_core --example parse_benchmark --release`

use std::time::Instant;

use sheet_history_core::{FragmentMemo, HistoryToken, parse_str};

const SAMPLES: &[(&str, &str)] = &[
    ("list", "/*/offset/20/count/10"),
    ("cell_select", "/1/Untitled/cell/A1"),
    ("range_formula", "/1/Untitled/cell/B2:C3/bottom-right/formula/save/=SUM(A1:A9)*2"),
    (
        "save_map",
        r#"/1/Untitled/cell/A1:B2/top-left/save/formula/{"A1":"=1","A2":"=2","B1":"=3","B2":"=4"}"#,
    ),
    ("find", "/1/Untitled/cell/A1:Z99/top-left/find/path/lrtd/offset/5/count/50/query/=A1>0"),
    ("navigate", "/1/Untitled/navigate/right column,down row,extend-cell C9"),
];

fn per_iter_ms(elapsed: std::time::Duration, iterations: usize) -> f64 {
    elapsed.as_secs_f64() * 1000.0 / iterations as f64
}

fn run_benchmark(label: &str, input: &str, iterations: usize) -> Result<(), String> {
    let parse_start = Instant::now();
    for _ in 0..iterations {
        let _ = parse_str(input);
    }
    let parse_elapsed = parse_start.elapsed();

    let token: HistoryToken = parse_str(input)
        .token
        .ok_or_else(|| format!("sample '{label}' does not parse"))?;

    let print_start = Instant::now();
    for _ in 0..iterations {
        let _ = token.to_string();
    }
    let print_elapsed = print_start.elapsed();

    let mut memo = FragmentMemo::default();
    let memo_start = Instant::now();
    for _ in 0..iterations {
        let _ = memo.parse(input);
    }
    let memo_elapsed = memo_start.elapsed();

    println!("Benchmark: {label}");
    println!("  input_bytes: {}", input.len());
    println!(
        "  parse: total={:?}, per_iter={:.4} ms",
        parse_elapsed,
        per_iter_ms(parse_elapsed, iterations)
    );
    println!(
        "  print: total={:?}, per_iter={:.4} ms",
        print_elapsed,
        per_iter_ms(print_elapsed, iterations)
    );
    println!(
        "  memo:  total={:?}, per_iter={:.4} ms",
        memo_elapsed,
        per_iter_ms(memo_elapsed, iterations)
    );
    Ok(())
}

fn main() -> Result<(), String> {
    let iterations = std::env::var("SHEET_HISTORY_BENCH_ITERS")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(10_000);

    for (label, input) in SAMPLES {
        run_benchmark(label, input, iterations)?;
    }

    Ok(())
}
