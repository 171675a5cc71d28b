use gravsim::{bench_step, bench_step_curve, load_scenario, Scenario, ScenarioConfig};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::path::PathBuf;

#[derive(Parser, Debug)]
struct Args {
    /// Scenario file under `scenarios/`
    #[arg(short, default_value = "solar_system.yaml")]
    file_name: String,

    /// Number of ticks to run
    #[arg(long, default_value_t = 6000)]
    steps: usize,

    /// Log a status line every N ticks
    #[arg(long, default_value_t = 1000)]
    report_every: usize,

    /// Shatter this body during the run
    #[arg(long)]
    shatter: Option<String>,

    /// Tick at which `--shatter` fires
    #[arg(long, default_value_t = 0)]
    shatter_at: usize,

    /// Run time backwards
    #[arg(long)]
    reverse: bool,

    /// Time the serial and parallel force passes instead of simulating
    #[arg(long)]
    bench: bool,

    /// With `--bench`, print a CSV curve
    #[arg(long)]
    curve: bool,
}

// load here to keep main clean
fn load_scenario_from_yaml(file_name: &str) -> Result<ScenarioConfig> {
    let config_path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(file_name);
    load_scenario(&config_path).with_context(|| format!("failed to load scenario {}", config_path.display()))
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    if args.bench {
        if args.curve {
            bench_step_curve()?;
        } else {
            bench_step()?;
        }
        return Ok(());
    }

    let scenario_cfg = load_scenario_from_yaml(&args.file_name)?;
    let mut scenario = Scenario::build_scenario(scenario_cfg)?;

    if args.reverse {
        scenario.environment.set_forward(false);
    }

    let start_time = scenario.environment.t;
    let start_energy = scenario.environment.total_energy();
    let mut merges = 0;

    for k in 0..args.steps {
        if k == args.shatter_at {
            if let Some(name) = &args.shatter {
                match scenario.shatter(name) {
                    Ok(fragments) => info!("fragments: {}", fragments.join(", ")),
                    Err(err) => warn!("could not shatter {name}: {err}"),
                }
            }
        }

        let report = scenario.tick();
        merges += report.merges.len();

        if args.report_every > 0 && (k + 1) % args.report_every == 0 {
            let env = &scenario.environment;
            info!(
                "tick {:>8}  t = {:.3e} s  bodies = {}  merges = {}",
                k + 1,
                env.t - start_time,
                env.len(),
                merges
            );
        }
    }

    let env = &scenario.environment;
    println!("{}", env.name);
    println!("  simulated time : {:.6e} s", env.t - start_time);
    println!("  bodies         : {}", env.len());
    println!("  total mass     : {:.6e} kg", env.mass());
    match env.center_of_mass() {
        Some(com) => println!("  centre of mass : [{:.6e}, {:.6e}, {:.6e}] m", com.x, com.y, com.z),
        None => println!("  centre of mass : undefined"),
    }
    let p = env.total_momentum();
    println!("  momentum       : [{:.6e}, {:.6e}, {:.6e}] kg m/s", p.x, p.y, p.z);
    if start_energy != 0.0 {
        let drift = (env.total_energy() - start_energy) / start_energy.abs();
        println!("  energy drift   : {:.3e}", drift);
    }
    println!("  merges         : {}", merges);

    Ok(())
}
