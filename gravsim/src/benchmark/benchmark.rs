use std::time::Instant;

use crate::error::SimResult;
use crate::simulation::engine::Engine;
use crate::simulation::integrator::Integrator;
use crate::simulation::states::{Body, Environment, NVec3};

/// Helper to build a manual Environment of size `n`
fn make_environment(n: usize) -> SimResult<Environment> {
    // deterministic positions, no rand needed
    let mut env = Environment::new("bench", 0.0, 1.0, 1e-2, 0.1)?;

    for i in 0..n {
        let i_f = i as f64;
        let x = NVec3::new(
            (i_f * 0.37).sin() * 5.0,
            (i_f * 0.13).cos() * 5.0,
            (i_f * 0.07).sin() * 5.0,
        );
        env.insert(Body::new(format!("b{i}"), 1.0, 0.0, x, NVec3::zeros())?);
    }

    Ok(env)
}

fn integrator(parallel: bool) -> Integrator {
    Integrator::new(Engine {
        ticks_per_second: 1000.0,
        merge_collisions: false,
        parallel,
        balance_momentum: false,
    })
}

/// Average wall time of one `step`, in seconds
fn time_steps(integrator: &Integrator, env: &mut Environment, steps: usize) -> f64 {
    // Warm-up
    integrator.step(env);

    let t0 = Instant::now();
    for _ in 0..steps {
        integrator.step(env);
    }
    t0.elapsed().as_secs_f64() / steps as f64
}

/// Compare the serial and rayon force passes over a range of n
pub fn bench_step() -> SimResult<()> {
    let ns = [100, 200, 400, 800, 1600, 3200];
    let steps = 2; // number of integrator steps per model (tune as needed)

    let serial = integrator(false);
    let parallel = integrator(true);

    for n in ns {
        let template = make_environment(n)?;

        let mut env_serial = template.clone();
        let serial_per_step = time_steps(&serial, &mut env_serial, steps);

        let mut env_parallel = template.clone();
        let parallel_per_step = time_steps(&parallel, &mut env_parallel, steps);

        println!(
            "N = {:5}, serial step = {:8.6} s,   parallel step = {:8.6} s",
            n, serial_per_step, parallel_per_step
        );
    }
    Ok(())
}

/// Same comparison as CSV, for graphing
pub fn bench_step_curve() -> SimResult<()> {
    println!("N,serial_ms,parallel_ms");

    let serial = integrator(false);
    let parallel = integrator(true);

    for n in (200..=3200).step_by(200) {
        // Small n: average over a few steps to smooth noise
        let steps = if n <= 800 { 5 } else { 1 };
        let template = make_environment(n)?;

        let ms_serial = time_steps(&serial, &mut template.clone(), steps) * 1000.0;
        let ms_parallel = time_steps(&parallel, &mut template.clone(), steps) * 1000.0;

        println!("{},{:.6},{:.6}", n, ms_serial, ms_parallel);
    }
    Ok(())
}
