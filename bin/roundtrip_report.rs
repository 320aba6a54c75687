use std::time::Instant;

use apex_rotations::{
    init_logger, is_rotation_matrix, mappings, random_unitquat, Batch, Execution, MappingConfig,
    RealScalar, RotationResult,
};
use clap::Parser;
use nalgebra::{Matrix3, Vector3, Vector4};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "roundtrip_report")]
#[command(about = "Measure worst-case round-trip errors of the rotation mappings")]
struct Args {
    /// Number of random rotations per mapping
    #[arg(short, long, default_value = "10000")]
    batch_size: usize,

    /// Seed of the random generator
    #[arg(short, long, default_value = "666")]
    seed: u64,

    /// Standard deviation of the random rotation vectors (e.g. 10 or 1e-7)
    #[arg(long, default_value = "10.0")]
    scale: f64,

    /// Scalar precision: "f32", "f64" or "all"
    #[arg(short, long, default_value = "all")]
    precision: String,

    /// Run every mapping on the calling thread
    #[arg(long)]
    sequential: bool,

    /// Validity tolerance
    #[arg(long, default_value = "1e-6")]
    epsilon: f64,
}

struct RoundtripResult {
    precision: &'static str,
    mapping: &'static str,
    max_error: f64,
    all_valid: bool,
    time_ms: u128,
}

fn format_summary_table(results: &[RoundtripResult]) {
    println!("\n{}", "=".repeat(80));
    println!("=== ROUND-TRIP SUMMARY ===\n");
    println!(
        "{:<9} | {:<34} | {:<12} | {:<6} | {:<9}",
        "Precision", "Mapping", "Max Error", "Valid", "Time(ms)"
    );
    println!("{}", "-".repeat(80));
    for result in results {
        println!(
            "{:<9} | {:<34} | {:<12.3e} | {:<6} | {:<9}",
            result.precision, result.mapping, result.max_error, result.all_valid, result.time_ms
        );
    }
    println!("{}", "-".repeat(80));
}

fn to_f64<T: RealScalar + Into<f64>>(value: T) -> f64 {
    value.into()
}

fn quat_distance<T: RealScalar + Into<f64>>(a: &Vector4<T>, b: &Vector4<T>) -> f64 {
    to_f64((a - b).norm().min((a + b).norm()))
}

fn run_precision<T: RealScalar + Into<f64>>(
    precision: &'static str,
    args: &Args,
    config: &MappingConfig,
) -> RotationResult<Vec<RoundtripResult>> {
    let mut rng = StdRng::seed_from_u64(args.seed);
    let mut results = Vec::new();

    // rotvec -> unitquat -> rotvec -> unitquat
    let start = Instant::now();
    let rotvecs = Batch::from_items(
        (0..args.batch_size)
            .map(|_| {
                Vector3::from_fn(|_, _| {
                    let sample: f64 = StandardNormal.sample(&mut rng);
                    nalgebra::convert::<f64, T>(args.scale * sample)
                })
            })
            .collect(),
    );
    let q = mappings::rotvec_to_unitquat(&rotvecs, config);
    let q_bis = mappings::rotvec_to_unitquat(&mappings::unitquat_to_rotvec(&q, config), config);
    let max_error = q
        .iter()
        .zip(q_bis.iter())
        .map(|(a, b)| quat_distance(a, b))
        .fold(0.0, f64::max);
    let all_valid = q.iter().all(|q| (to_f64(q.norm()) - 1.0).abs() < args.epsilon);
    results.push(RoundtripResult {
        precision,
        mapping: "rotvec -> unitquat -> rotvec",
        max_error,
        all_valid,
        time_ms: start.elapsed().as_millis(),
    });

    // rotvec -> rotmat -> rotvec -> rotmat
    let start = Instant::now();
    let r = mappings::rotvec_to_rotmat(&rotvecs, config);
    let r_bis = mappings::rotvec_to_rotmat(&mappings::rotmat_to_rotvec(&r, config), config);
    let max_error = r
        .iter()
        .zip(r_bis.iter())
        .map(|(a, b): (&Matrix3<T>, &Matrix3<T>)| to_f64((a - b).norm()))
        .fold(0.0, f64::max);
    results.push(RoundtripResult {
        precision,
        mapping: "rotvec -> rotmat -> rotvec",
        max_error,
        all_valid: is_rotation_matrix(&r, config).all(),
        time_ms: start.elapsed().as_millis(),
    });

    // unitquat -> rotmat -> unitquat
    let start = Instant::now();
    let q = random_unitquat::<T, _>(args.batch_size, &mut rng);
    let r = mappings::unitquat_to_rotmat(&q, config);
    let q_back = mappings::rotmat_to_unitquat(&r, config);
    let max_error = q
        .iter()
        .zip(q_back.iter())
        .map(|(a, b)| quat_distance(a, b))
        .fold(0.0, f64::max);
    results.push(RoundtripResult {
        precision,
        mapping: "unitquat -> rotmat -> unitquat",
        max_error,
        all_valid: is_rotation_matrix(&r, config).all(),
        time_ms: start.elapsed().as_millis(),
    });

    // special procrustes of perturbed rotations
    let start = Instant::now();
    let noisy = r.map(config.execution, |m| {
        m + Matrix3::from_fn(|_, _| nalgebra::convert::<f64, T>(1e-3))
    });
    let projected = mappings::special_procrustes(&noisy, config)?;
    let max_error = r
        .iter()
        .zip(projected.iter())
        .map(|(a, b)| to_f64((a - b).norm()))
        .fold(0.0, f64::max);
    results.push(RoundtripResult {
        precision,
        mapping: "special_procrustes(rotmat + noise)",
        max_error,
        all_valid: is_rotation_matrix(&projected, config).all(),
        time_ms: start.elapsed().as_millis(),
    });

    for result in &results {
        info!(
            "[{}] {}: max error {:.3e}, valid {}, {} ms",
            result.precision, result.mapping, result.max_error, result.all_valid, result.time_ms
        );
        if !result.all_valid {
            warn!("[{}] {} produced invalid outputs", result.precision, result.mapping);
        }
    }

    Ok(results)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    init_logger();

    let execution = if args.sequential {
        Execution::Sequential
    } else {
        Execution::Parallel
    };
    let config = MappingConfig::new()
        .with_epsilon(args.epsilon)
        .with_execution(execution);
    config.validate()?;

    info!("APEX-ROTATIONS ROUND-TRIP REPORT");
    info!("  Batch size: {}", args.batch_size);
    info!("  Seed: {}", args.seed);
    info!("  Rotation vector scale: {:e}", args.scale);
    info!("  {}", config);
    info!("");

    let mut all_results = Vec::new();
    match args.precision.as_str() {
        "f32" => all_results.extend(run_precision::<f32>("f32", &args, &config)?),
        "f64" => all_results.extend(run_precision::<f64>("f64", &args, &config)?),
        other => {
            if other != "all" {
                warn!("Unknown precision: {}", other);
                warn!("Using default: running f32 and f64");
            }
            all_results.extend(run_precision::<f32>("f32", &args, &config)?);
            all_results.extend(run_precision::<f64>("f64", &args, &config)?);
        }
    }

    format_summary_table(&all_results);
    Ok(())
}
