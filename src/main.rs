use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context as _;
use clap::{Parser, ValueEnum};
use feedback_qr::{EcLevel, GeneratorConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "feedback-qr", version, about = "Generate a hotel feedback QR code with a centered logo")]
struct Cli {
    /// JSON config file; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Hotel identifier used in the URL and file name.
    #[arg(long)]
    hotel_code: Option<String>,

    /// Logo image to place at the center.
    #[arg(long)]
    logo: Option<PathBuf>,

    /// Directory to write `qr_<hotel_code>.png` into.
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Pixels per module.
    #[arg(long)]
    module_size: Option<u32>,

    /// Quiet zone width in modules.
    #[arg(long)]
    border: Option<u32>,

    /// Logo side as a fraction of the image side.
    #[arg(long)]
    logo_scale: Option<f64>,

    /// Error correction level.
    #[arg(long, value_enum, ignore_case = true)]
    ec_level: Option<EcArg>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum EcArg {
    L,
    M,
    Q,
    H,
}

impl From<EcArg> for EcLevel {
    fn from(ec: EcArg) -> Self {
        match ec {
            EcArg::L => EcLevel::L,
            EcArg::M => EcLevel::M,
            EcArg::Q => EcLevel::Q,
            EcArg::H => EcLevel::H,
        }
    }
}

impl Cli {
    fn into_config(self) -> anyhow::Result<GeneratorConfig> {
        let mut cfg = match &self.config {
            Some(path) => GeneratorConfig::from_json_file(path)
                .with_context(|| format!("load config '{}'", path.display()))?,
            None => GeneratorConfig::default(),
        };
        if let Some(v) = self.hotel_code {
            cfg.hotel_code = v;
        }
        if let Some(v) = self.logo {
            cfg.logo_path = v;
        }
        if let Some(v) = self.output_dir {
            cfg.output_dir = v;
        }
        if let Some(v) = self.module_size {
            cfg.module_pixel_size = v;
        }
        if let Some(v) = self.border {
            cfg.border_modules = v;
        }
        if let Some(v) = self.logo_scale {
            cfg.logo_scale = v;
        }
        if let Some(v) = self.ec_level {
            cfg.error_correction_level = v.into();
        }
        Ok(cfg)
    }
}

fn run(cli: Cli) -> anyhow::Result<PathBuf> {
    let cfg = cli.into_config()?;
    let path = feedback_qr::generate_feedback_qr(&cfg).map_err(|err| {
        anyhow::anyhow!("{} stage failed for hotel '{}': {err}", err.stage(), cfg.hotel_code)
    })?;
    Ok(path)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(path) => {
            println!("Saved {}", path.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
