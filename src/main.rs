use std::fs;
use std::path::PathBuf;
use std::process::exit;

use clap::Parser;
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use cachetron::hierarchy::{Hierarchy, HierarchyConfig};
use cachetron::mem::MemoryConfig;
use cachetron::sim::config::{Config, SimConfig};
use cachetron::sim::report::summarize;
use cachetron::sim::trace::{parse_trace, ParsedTrace};
use cachetron::sweep::{
    run_multi_level_sweep, run_single_level_sweep, MultiSweepSpec, SingleSweepSpec,
};
use cachetron::traffic::{generate, GeometryHint, TrafficConfig};

#[derive(Parser)]
#[command(version, about)]
struct CachetronArgs {
    /// Trace file in the textual format; omitted = synthetic traffic
    trace_path: Option<PathBuf>,

    /// TOML file with [hierarchy], [memory], [traffic], [sim], [sweep] sections
    #[arg(long)]
    config: Option<PathBuf>,

    /// Run a parameter sweep instead of a single replay
    #[arg(long, value_parser = ["single", "multi"])]
    sweep: Option<String>,

    #[arg(long)]
    pattern: Option<String>,
    #[arg(long)]
    count: Option<usize>,
    #[arg(long)]
    stress: Option<String>,
    #[arg(long)]
    seed: Option<u64>,
}

pub fn main() {
    env_logger::init();
    let argv = CachetronArgs::parse();

    let root: Option<toml::Value> = argv.config.as_ref().map(|path| {
        let text = fs::read_to_string(path).unwrap_or_else(|err| {
            eprintln!("cannot read config {}: {err}", path.display());
            exit(1);
        });
        text.parse().unwrap_or_else(|err| {
            eprintln!("cannot parse config {}: {err}", path.display());
            exit(1);
        })
    });
    let section = |name: &str| root.as_ref().and_then(|r| r.get(name));

    let sim_config = SimConfig::from_section(section("sim"));
    let hierarchy_config = HierarchyConfig::from_section(section("hierarchy"));
    let memory_config = MemoryConfig::from_section(section("memory"));

    let mut traffic_config = TrafficConfig::from_section(section("traffic"));
    if let Some(pattern) = &argv.pattern {
        traffic_config.pattern = parse_enum(pattern, "pattern");
    }
    if let Some(stress) = &argv.stress {
        traffic_config.stress = parse_enum(stress, "stress");
    }
    if let Some(count) = argv.count {
        traffic_config.count = count;
    }
    let seed = argv.seed.unwrap_or(sim_config.seed);

    let trace = load_trace(&argv, &sim_config, &traffic_config, &hierarchy_config, seed);
    info!(
        "replaying {} accesses ({} lines skipped)",
        trace.accesses.len(),
        trace.skipped_lines
    );

    match argv.sweep.as_deref() {
        Some("single") => {
            let spec = SingleSweepSpec {
                seed,
                ..SingleSweepSpec::from_section(section("sweep"))
            };
            let results = run_single_level_sweep(&trace.accesses, &spec, &memory_config);
            println!("{}", serde_json::to_string_pretty(&results).unwrap());
        }
        Some("multi") => {
            let spec = MultiSweepSpec {
                seed,
                ..MultiSweepSpec::from_section(section("sweep"))
            };
            let results = run_multi_level_sweep(&trace.accesses, &spec, &memory_config);
            println!("{}", serde_json::to_string_pretty(&results).unwrap());
        }
        _ => {
            let mut hierarchy = Hierarchy::with_seed(hierarchy_config, memory_config, seed)
                .unwrap_or_else(|err| {
                    eprintln!("invalid cache configuration: {err}");
                    exit(1);
                });
            for access in &trace.accesses {
                hierarchy.access(access.address, access.is_write);
            }
            let summary = summarize(&hierarchy, trace.accesses.len(), trace.skipped_lines);
            println!("{}", serde_json::to_string_pretty(&summary).unwrap());
        }
    }
}

fn load_trace(
    argv: &CachetronArgs,
    sim_config: &SimConfig,
    traffic_config: &TrafficConfig,
    hierarchy_config: &HierarchyConfig,
    seed: u64,
) -> ParsedTrace {
    let path = argv
        .trace_path
        .clone()
        .or_else(|| (!sim_config.trace.is_empty()).then(|| PathBuf::from(&sim_config.trace)));
    match path {
        Some(path) => {
            let text = fs::read_to_string(&path).unwrap_or_else(|err| {
                eprintln!("cannot read trace {}: {err}", path.display());
                exit(1);
            });
            parse_trace(&text)
        }
        None => {
            let hint = if hierarchy_config.l1_enabled {
                GeometryHint::from(&hierarchy_config.l1)
            } else {
                GeometryHint::from(&hierarchy_config.l2)
            };
            let mut rng = StdRng::seed_from_u64(traffic_config.seed ^ seed);
            ParsedTrace {
                accesses: generate(traffic_config, &hint, &mut rng),
                skipped_lines: 0,
            }
        }
    }
}

// Reuses the serde names so the CLI accepts exactly the strings the TOML does.
fn parse_enum<T: serde::de::DeserializeOwned>(value: &str, what: &str) -> T {
    serde_json::from_value(serde_json::Value::String(value.to_string())).unwrap_or_else(|_| {
        eprintln!("unknown {what} '{value}'");
        exit(1);
    })
}
