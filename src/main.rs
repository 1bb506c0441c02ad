use std::fs;
use std::path::PathBuf;

use circuit_core::backend::{check_parameterization, run_backend, BackendField};
use circuit_core::pipeline::CircuitPipeline;
use clap::Parser;
use common::config::{Curve, OutputMode, ProofSystem, ReaderConfig};
use eyre::WrapErr;
use tracing_subscriber::{self, prelude::*, EnvFilter};

/// Evaluate an arithmetic circuit, translate it into a rank-1 constraint
/// system and hand the satisfied system to a zkSNARK.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Proof system to run (R1CS_PPZKSNARK, R1CS_GG_PPZKSNARK / gg, R1CS_SE_PPZKSNARK / se)
    #[clap(long)]
    proof_system: Option<ProofSystem>,

    /// Curve whose scalar field carries the circuit arithmetic
    #[clap(long, default_value_t = Curve::Bn254)]
    curve: Curve,

    /// readable | compact. Overrides the config file.
    #[clap(long)]
    output_mode: Option<OutputMode>,

    /// Skip the structural check of the constraint system
    #[clap(long)]
    skip_structure_check: bool,

    /// Stop after the satisfiability check
    #[clap(long)]
    skip_proof: bool,

    /// JSON reader configuration
    #[clap(long)]
    config: Option<PathBuf>,

    /// Circuit description (.arith)
    circuit: PathBuf,

    /// Input values (.in)
    inputs: PathBuf,
}

fn main() -> eyre::Result<()> {
    let log_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let log_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_target(false)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_filter(log_filter);
    tracing_subscriber::registry().with(log_layer).init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .wrap_err_with(|| format!("reading config {}", path.display()))?;
            ReaderConfig::from_json(&json)
                .wrap_err_with(|| format!("parsing config {}", path.display()))?
        }
        None => ReaderConfig::default(),
    };
    if let Some(output_mode) = cli.output_mode {
        config.output_mode = output_mode;
    }
    if cli.skip_structure_check {
        config.check_structure = false;
    }

    let proof_system = cli.proof_system.unwrap_or_default();
    tracing::info!(%proof_system, curve = %cli.curve, "Using {proof_system}");

    match cli.curve {
        Curve::Bn254 => run::<ark_bn254::Fr>(&cli, proof_system, config),
        Curve::Bls12_381 => run::<ark_bls12_381::Fr>(&cli, proof_system, config),
    }
}

fn run<F: BackendField>(cli: &Cli, proof_system: ProofSystem, config: ReaderConfig) -> eyre::Result<()> {
    check_parameterization(F::CURVE, proof_system)?;

    let pipeline = CircuitPipeline::<F>::from_paths(&cli.circuit, &cli.inputs, config)
        .wrap_err_with(|| {
            format!(
                "loading {} with inputs {}",
                cli.circuit.display(),
                cli.inputs.display()
            )
        })?;
    let output = pipeline
        .assemble()
        .wrap_err("running circuit pipeline")?;

    if let Some(report) = output.report.render(pipeline.config().output_mode) {
        println!("\nPrinting output assignment in readable format::");
        println!("{report}");
    }

    pipeline
        .check(&output)
        .wrap_err("checking the constraint system against the value assignment")?;

    if cli.skip_proof {
        tracing::info!("Skipping proof generation");
        return Ok(());
    }
    run_backend(proof_system, &output.example)
        .wrap_err("Problem occurred while running the ppzksnark algorithms")?;
    Ok(())
}
