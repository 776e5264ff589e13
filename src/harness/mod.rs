//! 校验运行
//!
//! 对每个选中的内核：用标量版本生成基准结果，运行向量版本，
//! 比对输出并收集向量单元的通道利用率统计。

mod inputs;
mod verify;

pub use inputs::KernelInputs;
pub use verify::{compare_outputs, sums_match, within_tolerance, Mismatch};

use crate::config::RunConfig;
use crate::error::HarnessResult;
use crate::kernels::{
    abs_serial, abs_vector, array_sum_serial, array_sum_vector, clamped_exp_serial,
    clamped_exp_vector, Kernel,
};
use lane_kernels_intrin::{is_power_of_two_width, LaneStats, TraceEntry, VectorUnit, VECTOR_WIDTH};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 报告中最多打印的不一致元素数
const MAX_PRINTED_MISMATCHES: usize = 16;

/// 单个内核的结论
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum KernelStatus {
    Passed,
    Failed,
    Skipped { reason: String },
}

/// 单个内核的报告
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KernelReport {
    pub kernel: Kernel,
    #[serde(flatten)]
    pub status: KernelStatus,
    pub mismatches: Vec<Mismatch>,
    /// 求和内核的 (标量, 向量) 结果
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sums: Option<(f32, f32)>,
    pub stats: LaneStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<Vec<TraceEntry>>,
}

impl KernelReport {
    pub fn passed(&self) -> bool {
        self.status != KernelStatus::Failed
    }

    fn title(&self) -> &'static str {
        match self.kernel {
            Kernel::Abs => "ABSOLUTE VALUE",
            Kernel::ClampedExp => "CLAMPED EXPONENT",
            Kernel::ArraySum => "ARRAY SUM",
        }
    }
}

impl fmt::Display for KernelReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title())?;

        match &self.status {
            KernelStatus::Skipped { reason } => return writeln!(f, "{reason}"),
            KernelStatus::Passed => writeln!(f, "Results matched with answer!")?,
            KernelStatus::Failed => {
                writeln!(f, "@@@ Failed!!! {} mismatches", self.mismatches.len())?;
                for m in self.mismatches.iter().take(MAX_PRINTED_MISMATCHES) {
                    write!(f, "  [{}] value = {}", m.index, m.value)?;
                    if let Some(exponent) = m.exponent {
                        write!(f, ", exp = {exponent}")?;
                    }
                    writeln!(f, ", expected = {}, got = {}", m.expected, m.actual)?;
                }
                if self.mismatches.len() > MAX_PRINTED_MISMATCHES {
                    writeln!(f, "  ... and {} more", self.mismatches.len() - MAX_PRINTED_MISMATCHES)?;
                }
            }
        }

        if let Some((serial, vector)) = self.sums {
            writeln!(f, "serial sum = {serial}, vector sum = {vector}")?;
        }

        if let Some(trace) = &self.trace {
            writeln!(f, "***************** Printing Vector Unit Execution Log *****************")?;
            for entry in trace {
                writeln!(f, "{} | {}", entry.lanes, entry.instruction)?;
            }
        }

        writeln!(f, "{}", self.stats)
    }
}

/// 一次运行的完整报告
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub size: usize,
    pub vector_width: usize,
    pub seed: u64,
    pub kernels: Vec<KernelReport>,
}

impl RunReport {
    /// 没有任何内核失败
    pub fn passed(&self) -> bool {
        self.kernels.iter().all(KernelReport::passed)
    }

    pub fn kernel(&self, kernel: Kernel) -> Option<&KernelReport> {
        self.kernels.iter().find(|report| report.kernel == kernel)
    }

    pub fn to_json(&self) -> HarnessResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "N = {}, VECTOR_WIDTH = {}, seed = {}",
            self.size, self.vector_width, self.seed
        )?;
        for report in &self.kernels {
            writeln!(f)?;
            write!(f, "{report}")?;
        }
        Ok(())
    }
}

/// 用默认宽度运行
pub fn run(config: &RunConfig) -> HarnessResult<RunReport> {
    run_with_width::<VECTOR_WIDTH>(config)
}

/// 用指定宽度 `W` 运行所有选中的内核
pub fn run_with_width<const W: usize>(config: &RunConfig) -> HarnessResult<RunReport> {
    config.validate()?;

    let inputs = KernelInputs::generate(&config.input);
    let mut unit = VectorUnit::<W>::with_trace(config.verify.print_log);
    let mut kernels = Vec::with_capacity(config.verify.kernels.len());

    for kernel in &config.verify.kernels {
        unit.reset();
        let report = match kernel {
            Kernel::Abs => run_abs(&mut unit, &inputs, config)?,
            Kernel::ClampedExp => run_clamped_exp(&mut unit, &inputs, config)?,
            Kernel::ArraySum => run_array_sum(&mut unit, &inputs, config)?,
        };

        match &report.status {
            KernelStatus::Passed => tracing::info!(
                target: "lane_kernels",
                kernel = %kernel,
                utilization = report.stats.utilization(),
                "kernel passed"
            ),
            KernelStatus::Failed => tracing::error!(
                target: "lane_kernels",
                kernel = %kernel,
                mismatches = report.mismatches.len(),
                "kernel output differs from serial reference"
            ),
            KernelStatus::Skipped { reason } => {
                tracing::warn!(target: "lane_kernels", kernel = %kernel, "{}", reason)
            }
        }
        kernels.push(report);
    }

    Ok(RunReport {
        size: config.input.size,
        vector_width: W,
        seed: config.input.seed,
        kernels,
    })
}

fn finish<const W: usize>(
    unit: &VectorUnit<W>,
    kernel: Kernel,
    mismatches: Vec<Mismatch>,
    sums: Option<(f32, f32)>,
) -> KernelReport {
    let status = if mismatches.is_empty() {
        KernelStatus::Passed
    } else {
        KernelStatus::Failed
    };

    KernelReport {
        kernel,
        status,
        mismatches,
        sums,
        stats: unit.stats().clone(),
        trace: unit.log().trace().map(<[TraceEntry]>::to_vec),
    }
}

fn run_abs<const W: usize>(
    unit: &mut VectorUnit<W>,
    inputs: &KernelInputs,
    config: &RunConfig,
) -> HarnessResult<KernelReport> {
    let mut gold = vec![0.0; inputs.len()];
    let mut output = vec![0.0; inputs.len()];

    abs_serial(&inputs.values, &mut gold)?;
    abs_vector(unit, &inputs.values, &mut output)?;

    let mismatches = compare_outputs(&inputs.values, None, &gold, &output, config.verify.tolerance);
    Ok(finish(unit, Kernel::Abs, mismatches, None))
}

fn run_clamped_exp<const W: usize>(
    unit: &mut VectorUnit<W>,
    inputs: &KernelInputs,
    config: &RunConfig,
) -> HarnessResult<KernelReport> {
    let mut gold = vec![0.0; inputs.len()];
    let mut output = vec![0.0; inputs.len()];

    clamped_exp_serial(&inputs.values, &inputs.exponents, &mut gold)?;
    clamped_exp_vector(unit, &inputs.values, &inputs.exponents, &mut output)?;

    let mismatches = compare_outputs(
        &inputs.values,
        Some(inputs.exponents.as_slice()),
        &gold,
        &output,
        config.verify.tolerance,
    );
    Ok(finish(unit, Kernel::ClampedExp, mismatches, None))
}

fn run_array_sum<const W: usize>(
    unit: &mut VectorUnit<W>,
    inputs: &KernelInputs,
    config: &RunConfig,
) -> HarnessResult<KernelReport> {
    let skip_reason = if !is_power_of_two_width(W) {
        Some(format!("VECTOR_WIDTH must be a power of two for this problem (VECTOR_WIDTH is {W})"))
    } else if inputs.len() % W != 0 {
        Some(format!("Must have N % VECTOR_WIDTH == 0 for this problem (VECTOR_WIDTH is {W})"))
    } else {
        None
    };
    if let Some(reason) = skip_reason {
        let mut report = finish(unit, Kernel::ArraySum, Vec::new(), None);
        report.status = KernelStatus::Skipped { reason };
        return Ok(report);
    }

    let serial = array_sum_serial(&inputs.values);
    let vector = array_sum_vector(unit, &inputs.values)?;

    let mut report = finish(unit, Kernel::ArraySum, Vec::new(), Some((serial, vector)));
    if !sums_match(&inputs.values, serial, vector, config.verify.tolerance) {
        report.status = KernelStatus::Failed;
    }
    Ok(report)
}
