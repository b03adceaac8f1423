//! chirpbind CLI - runs the library ownership self-checks.
//!
//! Usage:
//!   chirpbind                      # run the checks, print progress lines
//!   chirpbind --iterations 20      # longer parent-tracking loop
//!   chirpbind -o json              # machine-readable result
//!   chirpbind --stats              # include registry statistics

use clap::Parser;
use std::process;

use chirpbind_core::CoreError;
use chirpbind_inspiral::{selfcheck, InspiralError};

#[derive(Parser)]
#[command(name = "chirpbind")]
#[command(version)]
#[command(about = "chirpbind ownership self-checks")]
#[command(
    long_about = "Runs the module-load and cross-crate parent-tracking checks \
                  and audits the allocation registry for leaks"
)]
struct Cli {
    /// Iterations of the parent-tracking loop
    #[arg(
        short,
        long,
        default_value_t = selfcheck::DEFAULT_ITERATIONS,
        value_name = "N"
    )]
    iterations: usize,

    /// Output format: summary or json
    #[arg(short, long, default_value = "summary", value_name = "FORMAT")]
    output: String,

    /// Print registry statistics after the checks
    #[arg(short, long)]
    stats: bool,
}

fn main() {
    let cli = Cli::parse();

    match cli.output.as_str() {
        "summary" => run_summary(&cli),
        "json" => run_json(&cli),
        other => {
            eprintln!("Unknown output format '{}'", other);
            process::exit(1);
        }
    }
}

fn run_summary(cli: &Cli) {
    println!("checking module load ...");
    if let Err(e) = selfcheck::module_load() {
        eprintln!("FAILED module load: {}", e);
        process::exit(1);
    }
    println!("PASSED module load");

    println!("checking object parent tracking ...");
    if let Err(e) = selfcheck::parent_tracking(cli.iterations) {
        eprintln!("FAILED object parent tracking: {}", e);
        process::exit(1);
    }
    println!("PASSED object parent tracking");

    if cli.stats {
        let stats = chirpbind_core::memory::global().stats();
        println!(
            "registry: live={} registered={} released={} peak={}",
            stats.live, stats.total_registered, stats.total_released, stats.peak_live
        );
    }

    println!("PASSED all tests");
}

fn run_json(cli: &Cli) {
    let module_load = selfcheck::module_load();
    let parent_tracking = if module_load.is_ok() {
        Some(selfcheck::parent_tracking(cli.iterations))
    } else {
        None
    };

    let passed =
        module_load.is_ok() && parent_tracking.as_ref().is_some_and(|r| r.is_ok());
    let stats = chirpbind_core::memory::global().stats();

    let result = serde_json::json!({
        "passed": passed,
        "iterations": cli.iterations,
        "checks": {
            "module_load": check_value(&module_load),
            "parent_tracking": parent_tracking
                .as_ref()
                .map(check_value)
                .unwrap_or(serde_json::Value::Null),
        },
        "registry": stats,
    });

    match serde_json::to_string_pretty(&result) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing to JSON: {}", e);
            process::exit(1);
        }
    }

    if !passed {
        process::exit(1);
    }
}

fn check_value(result: &Result<(), InspiralError>) -> serde_json::Value {
    match result {
        Ok(()) => serde_json::json!({ "passed": true }),
        Err(e) => {
            let mut value = serde_json::json!({ "passed": false, "error": e.to_string() });
            // A failed leak check carries a structured per-tag report.
            if let InspiralError::Core(CoreError::LeakDetected(report)) = e {
                value["leak_report"] =
                    serde_json::to_value(report).unwrap_or(serde_json::Value::Null);
            }
            value
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chirpbind_core::memory::AllocationRegistry;

    #[test]
    fn leak_failure_reports_structured_entries() {
        let registry = AllocationRegistry::new();
        registry.register("chirp_template");
        registry.register("strain_segment");
        registry.register("strain_segment");

        let err = registry.check_leaks().unwrap_err();
        let value = check_value(&Err(InspiralError::from(err)));

        assert_eq!(value["passed"], false);
        assert_eq!(
            value["leak_report"]["entries"],
            serde_json::json!([
                { "tag": "chirp_template", "count": 1 },
                { "tag": "strain_segment", "count": 2 },
            ])
        );
    }

    #[test]
    fn check_failure_reports_the_message_only() {
        let value = check_value(&Err(InspiralError::Check("fixture unreadable".into())));
        assert_eq!(value["passed"], false);
        assert_eq!(value["error"], "self-check error: fixture unreadable");
        assert!(value.get("leak_report").is_none());
    }
}
