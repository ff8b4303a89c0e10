//! Command-line entry point: loads a route (preset or TOML file), runs the fixed-path
//! optimizer, and prints the resulting step table and totals.

use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use swap_route_optimizer::cli::Cli;
use swap_route_optimizer::config::RouteConfig;
use swap_route_optimizer::solver::FixedPathOptimizer;

fn init_logging(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.list_presets {
        for name in RouteConfig::PRESETS {
            println!("{name}");
        }
        return;
    }

    let route = if let Some(path) = &cli.route {
        match RouteConfig::from_toml_file(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else {
        let name = cli.preset.as_deref().unwrap_or("demo_route");
        match RouteConfig::from_preset(name) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    };

    let errors = route.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    let inputs = match route.to_fixed_path_inputs() {
        Ok(inputs) => inputs,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };

    let optimizer = FixedPathOptimizer::new(inputs);
    let result = match optimizer.solve() {
        Ok(result) => result,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };

    for step in &result.steps {
        println!("{step}");
    }
    println!(
        "\ntotal cost: {:.2}  total time: {:.2} hr  finish: {:.2} hr",
        result.total_cost, result.total_time_hr, result.finish_time_hr
    );

    if !result.station_timelines.is_empty() {
        println!("\nstation timelines:");
        for (port_name, events) in &result.station_timelines {
            println!("  {port_name}:");
            for event in events {
                println!("    {event}");
            }
        }
    }
}
