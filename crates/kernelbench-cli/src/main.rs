mod cli;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use cli::Cli;
use kernelbench_backend_ort::{OrtBackend, SessionConfig};
use kernelbench_core::{Backend, Device, ModelArtifact};
use kernelbench_harness::{run_benchmark, BenchmarkConfig};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return usage_exit_code(err.kind());
        }
    };
    init_tracing(&cli.log);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

/// Help and version requests succeed; every other argument error exits with 1.
fn usage_exit_code(kind: ErrorKind) -> ExitCode {
    if is_informational(kind) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn is_informational(kind: ErrorKind) -> bool {
    matches!(kind, ErrorKind::DisplayHelp | ErrorKind::DisplayVersion)
}

fn init_tracing(log: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let device = parse_device(&cli.device)?;
    let backend = OrtBackend::with_config(SessionConfig {
        intra_op_threads: cli.intra_op_threads,
    });

    let artifact = ModelArtifact::OnnxPath(cli.model_path);
    let mut engine = backend
        .load(&artifact, device)
        .with_context(|| format!("{} backend could not load {artifact}", backend.name()))?;

    let config = BenchmarkConfig {
        iterations: cli.iterations,
        seed: cli.seed,
    };
    let run = run_benchmark(&mut engine, &config)?;

    println!();
    println!("{}", run.report.display_for(&artifact.to_string()));
    Ok(())
}

fn parse_device(raw: &str) -> Result<Device> {
    if raw.eq_ignore_ascii_case("cpu") {
        return Ok(Device::Cpu);
    }

    if let Some(rest) = raw.strip_prefix("cuda:") {
        let device_id: u32 = rest.parse().context("invalid cuda device id")?;
        return Ok(Device::Cuda { device_id });
    }

    anyhow::bail!("unsupported device: {raw} (expected cpu or cuda:N)");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn succeeds_for(args: &[&str]) -> bool {
        let err = cli::Cli::try_parse_from(args.iter().copied()).unwrap_err();
        is_informational(err.kind())
    }

    #[test]
    fn argument_errors_exit_with_failure() {
        assert!(!succeeds_for(&["kernelbench"]));
        assert!(!succeeds_for(&["kernelbench", "model.onnx", "ten"]));
        assert!(!succeeds_for(&["kernelbench", "model.onnx", "--device"]));
    }

    #[test]
    fn help_and_version_exit_cleanly() {
        assert!(succeeds_for(&["kernelbench", "--help"]));
        assert!(succeeds_for(&["kernelbench", "--version"]));
    }

    #[test]
    fn parses_devices() {
        assert_eq!(parse_device("cpu").unwrap(), Device::Cpu);
        assert_eq!(parse_device("CPU").unwrap(), Device::Cpu);
        assert_eq!(
            parse_device("cuda:2").unwrap(),
            Device::Cuda { device_id: 2 }
        );
        assert!(parse_device("cuda:x").is_err());
        assert!(parse_device("tpu").is_err());
    }
}
