/// 向量指令日志
///
/// 记录每条向量指令执行时的掩码，用来统计通道利用率：
/// 利用率 = 有效通道总数 / (指令数 * 向量宽度)。
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// 向量指令种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Instruction {
    VSet,
    VMove,
    VLoad,
    VStore,
    VAdd,
    VSub,
    VMult,
    VDiv,
    VAbs,
    VShiftRight,
    VBitAnd,
    VGt,
    VLt,
    VEq,
    Interleave,
    HAdd,
    #[serde(rename = "init_ones")]
    InitOnes,
    #[serde(rename = "mask_not")]
    MaskNot,
    #[serde(rename = "mask_and")]
    MaskAnd,
    #[serde(rename = "mask_or")]
    MaskOr,
    CntBits,
}

impl Instruction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VSet => "vset",
            Self::VMove => "vmove",
            Self::VLoad => "vload",
            Self::VStore => "vstore",
            Self::VAdd => "vadd",
            Self::VSub => "vsub",
            Self::VMult => "vmult",
            Self::VDiv => "vdiv",
            Self::VAbs => "vabs",
            Self::VShiftRight => "vshiftright",
            Self::VBitAnd => "vbitand",
            Self::VGt => "vgt",
            Self::VLt => "vlt",
            Self::VEq => "veq",
            Self::Interleave => "interleave",
            Self::HAdd => "hadd",
            Self::InitOnes => "init_ones",
            Self::MaskNot => "mask_not",
            Self::MaskAnd => "mask_and",
            Self::MaskOr => "mask_or",
            Self::CntBits => "cntbits",
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 单条指令的执行记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceEntry {
    pub instruction: Instruction,
    /// 执行掩码，`*` 有效，`_` 空闲
    pub lanes: String,
}

/// 单种指令的统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructionCount {
    pub issued: u64,
    pub utilized_lanes: u64,
}

/// 通道利用率统计
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaneStats {
    /// 向量宽度
    pub vector_width: usize,
    /// 向量指令总数
    pub total_instructions: u64,
    /// 实际参与运算的通道数
    pub utilized_lanes: u64,
    /// 指令数 * 向量宽度
    pub total_lanes: u64,
    /// 按指令分类的统计
    pub per_instruction: BTreeMap<Instruction, InstructionCount>,
}

impl LaneStats {
    pub fn new(vector_width: usize) -> Self {
        Self {
            vector_width,
            ..Default::default()
        }
    }

    /// 通道利用率（百分比），没有执行任何指令时为0
    pub fn utilization(&self) -> f64 {
        if self.total_lanes == 0 {
            return 0.0;
        }
        self.utilized_lanes as f64 / self.total_lanes as f64 * 100.0
    }

    fn record(&mut self, instruction: Instruction, active: usize) {
        self.total_instructions += 1;
        self.utilized_lanes += active as u64;
        self.total_lanes += self.vector_width as u64;

        let entry = self.per_instruction.entry(instruction).or_default();
        entry.issued += 1;
        entry.utilized_lanes += active as u64;
    }
}

impl fmt::Display for LaneStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "****************** Printing Vector Unit Statistics *******************")?;
        writeln!(f, "Vector Width:              {}", self.vector_width)?;
        writeln!(f, "Total Vector Instructions: {}", self.total_instructions)?;
        writeln!(f, "Vector Utilization:        {:.6}%", self.utilization())?;
        writeln!(f, "Utilized Vector Lanes:     {}", self.utilized_lanes)?;
        write!(f, "Total Vector Lanes:        {}", self.total_lanes)
    }
}

/// 指令日志
///
/// 统计总是开启；逐条跟踪只在 `trace_enabled` 时记录，避免大数组时内存膨胀。
#[derive(Debug, Clone)]
pub struct InstructionLog {
    stats: LaneStats,
    trace: Option<Vec<TraceEntry>>,
}

impl InstructionLog {
    pub fn new(vector_width: usize, trace_enabled: bool) -> Self {
        Self {
            stats: LaneStats::new(vector_width),
            trace: trace_enabled.then(Vec::new),
        }
    }

    /// 记录一条指令
    pub fn record(&mut self, instruction: Instruction, lanes: &[bool]) {
        let active = lanes.iter().filter(|lane| **lane).count();
        self.stats.record(instruction, active);

        if let Some(trace) = self.trace.as_mut() {
            trace.push(TraceEntry {
                instruction,
                lanes: lanes.iter().map(|lane| if *lane { '*' } else { '_' }).collect(),
            });
        }
    }

    pub fn stats(&self) -> &LaneStats {
        &self.stats
    }

    pub fn trace(&self) -> Option<&[TraceEntry]> {
        self.trace.as_deref()
    }

    pub fn trace_enabled(&self) -> bool {
        self.trace.is_some()
    }

    /// 清空统计与跟踪，保留向量宽度和跟踪开关
    pub fn clear(&mut self) {
        self.stats = LaneStats::new(self.stats.vector_width);
        if let Some(trace) = self.trace.as_mut() {
            trace.clear();
        }
    }

    /// 逐条渲染跟踪，例如 `**__ | vload`
    pub fn render_trace(&self) -> String {
        let Some(trace) = self.trace.as_ref() else {
            return String::new();
        };

        let mut out = String::new();
        for entry in trace {
            out.push_str(&entry.lanes);
            out.push_str(" | ");
            out.push_str(entry.instruction.as_str());
            out.push('\n');
        }
        out
    }
}
