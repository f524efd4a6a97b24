use std::path::PathBuf;

use clap::Parser;
use kernelbench_harness::DEFAULT_ITERATIONS;

#[derive(Parser, Debug)]
#[command(
    name = "kernelbench",
    version,
    about = "Measure single-input inference latency of an ONNX model"
)]
pub struct Cli {
    /// Path to ONNX model file
    pub model_path: PathBuf,

    /// Number of timed iterations
    #[arg(default_value_t = DEFAULT_ITERATIONS, allow_negative_numbers = true)]
    pub iterations: i64,

    /// Seed for the random input (random when omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Device for inference (cpu or cuda:N)
    #[arg(long, default_value = "cpu")]
    pub device: String,

    /// ONNX Runtime intra-op thread count
    #[arg(long, default_value_t = 1)]
    pub intra_op_threads: usize,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    pub log: String,
}
