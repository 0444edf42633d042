use crate::backtester::BacktestResult;

/// Print a formatted table of backtest results to stdout.
pub fn print_report(results: &[BacktestResult]) {
    if results.is_empty() {
        println!("No results to report.");
        return;
    }

    println!(
        "{:<28} {:<14} {:>10} {:>8}",
        "Fixture", "Config", "MAE", "WAPE%"
    );
    println!("{}", "-".repeat(64));

    let mut current_fixture = String::new();
    for r in results {
        if r.fixture_name != current_fixture {
            if !current_fixture.is_empty() {
                println!("{}", "-".repeat(64));
            }
            current_fixture = r.fixture_name.clone();
        }
        let wape_str = if r.wape.is_infinite() {
            "Inf".to_string()
        } else {
            format!("{:.2}", r.wape)
        };
        println!(
            "{:<28} {:<14} {:>10.2} {:>8}",
            r.fixture_name, r.config_name, r.mae, wape_str
        );
    }
    println!("{}", "-".repeat(64));

    println!("\n=== Average WAPE by Config ===");
    for config in collect_config_names(results) {
        let wapes: Vec<f64> = results
            .iter()
            .filter(|r| r.config_name == config && r.wape.is_finite())
            .map(|r| r.wape)
            .collect();
        if !wapes.is_empty() {
            let avg = wapes.iter().sum::<f64>() / wapes.len() as f64;
            let total_count = results.iter().filter(|r| r.config_name == config).count();
            println!(
                "  {:<14} avg WAPE = {:.2}%  ({}/{} fixtures)",
                config,
                avg,
                wapes.len(),
                total_count
            );
        }
    }
}

fn collect_config_names(results: &[BacktestResult]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for r in results {
        if !names.contains(&r.config_name) {
            names.push(r.config_name.clone());
        }
    }
    names
}
