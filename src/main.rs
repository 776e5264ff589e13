//! lane_kernels 命令行
//!
//! 生成随机输入，运行标量和向量内核并比对，打印通道利用率统计。
//!
//! 用法:
//!   lane_kernels -s 6 -l
//!   lane_kernels --config lane_kernels.toml --kernel clamped-exp --json

use clap::{Parser, ValueEnum};
use lane_kernels::{run, HarnessResult, Kernel, RunConfig};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum KernelArg {
    Abs,
    ClampedExp,
    ArraySum,
}

impl From<KernelArg> for Kernel {
    fn from(arg: KernelArg) -> Self {
        match arg {
            KernelArg::Abs => Kernel::Abs,
            KernelArg::ClampedExp => Kernel::ClampedExp,
            KernelArg::ArraySum => Kernel::ArraySum,
        }
    }
}

/// Verify lane-parallel kernels against their serial versions
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file (TOML, or JSON by extension)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of elements (N)
    #[arg(short, long)]
    size: Option<usize>,

    /// Print the per-instruction execution log
    #[arg(short, long)]
    log: bool,

    /// Random seed for input generation
    #[arg(long)]
    seed: Option<u64>,

    /// Exclusive upper bound for generated exponents
    #[arg(long)]
    exp_max: Option<i32>,

    /// Kernels to run (repeatable); defaults to all
    #[arg(short, long, value_enum)]
    kernel: Vec<KernelArg>,

    /// Print the report as JSON instead of text
    #[arg(long)]
    json: bool,
}

impl Args {
    fn apply(&self, config: &mut RunConfig) {
        if let Some(size) = self.size {
            config.input.size = size;
        }
        if let Some(seed) = self.seed {
            config.input.seed = seed;
        }
        if let Some(exp_max) = self.exp_max {
            config.input.exp_max = exp_max;
        }
        if self.log {
            config.verify.print_log = true;
        }
        if !self.kernel.is_empty() {
            config.verify.kernels = self.kernel.iter().copied().map(Kernel::from).collect();
        }
    }
}

/// 加载配置，同时返回配置文件路径（使用默认配置时为 `None`）
fn load_config(args: &Args) -> HarnessResult<(RunConfig, Option<PathBuf>)> {
    let (mut config, source) = match &args.config {
        Some(path) => (RunConfig::from_file(path)?, Some(path.clone())),
        None => match RunConfig::discover() {
            Some((config, path)) => (config, Some(path)),
            None => (RunConfig::default(), None),
        },
    };
    config.apply_env_overrides();
    args.apply(&mut config);
    Ok((config, source))
}

/// 初始化日志系统
///
/// `RUST_LOG` 优先，否则使用配置中的日志级别。日志写到stderr，stdout只留给报告。
fn initialize_logging(config: &RunConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.as_filter()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    let args = Args::parse();

    let (config, source) = match load_config(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };
    initialize_logging(&config);
    match &source {
        Some(path) => tracing::info!(target: "lane_kernels", "Loaded config from {}", path.display()),
        None => tracing::debug!(target: "lane_kernels", "Using default configuration"),
    }

    let report = match run(&config) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Run failed: {}", e);
            std::process::exit(1);
        }
    };

    if args.json {
        match report.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Run failed: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        print!("{}", report);
    }

    if !report.passed() {
        std::process::exit(1);
    }
}
