//! # lane_kernels_intrin
//!
//! 定宽通道向量抽象，用来练习手写SIMD式的内核：掩码谓词、通道一致的控制流、
//! 以及数组长度不是向量宽度整数倍时的尾部处理。
//!
//! 向量宽度是编译期常量（const generic `W`），默认宽度为 [`VECTOR_WIDTH`]。
//! 所有"指令"都通过 [`VectorUnit`] 执行，执行时的掩码会被记录下来，
//! 用于统计通道利用率。
//!
//! ## 快速开始
//!
//! ```rust
//! use lane_kernels_intrin::{VectorUnit, VecF32, VECTOR_WIDTH};
//!
//! let values = [-1.5f32, 2.0, 0.0];
//! let mut output = [0.0f32; 3];
//!
//! let mut unit = VectorUnit::<VECTOR_WIDTH>::new();
//! let zero = unit.splat(0.0f32);
//! let active = unit.init_ones(values.len());
//!
//! let mut x = VecF32::zeroed();
//! unit.vload(&mut x, &values, &active);
//!
//! let mut negative = unit.init_ones(0);
//! unit.vlt(&mut negative, &x, &zero, &active);
//!
//! let mut result = x;
//! unit.vsub(&mut result, &zero, &x, &negative);
//! unit.vstore(&mut output, &result, &active);
//!
//! assert_eq!(output, [1.5, 2.0, 0.0]);
//! println!("{}", unit.stats());
//! ```
//!
//! ## 模块
//!
//! - [`lane`]: 通道向量、掩码、按宽度分组
//! - [`unit`]: 带日志的向量执行单元
//! - [`log`]: 指令日志与利用率统计

pub mod lane;
pub mod log;
pub mod unit;

// 重新导出主要类型
pub use lane::{LaneGroups, LaneMask, LaneVec, VecF32, VecI32};
pub use log::{Instruction, InstructionCount, InstructionLog, LaneStats, TraceEntry};
pub use unit::{LaneElement, VectorUnit};

/// 默认向量宽度（f32通道数）
pub const VECTOR_WIDTH: usize = 4;

/// 宽度是否为2的幂，水平归约的成对折叠依赖这一点
pub const fn is_power_of_two_width(width: usize) -> bool {
    width.is_power_of_two()
}

/// 水平归约需要的折叠轮数（log2(W)）
pub const fn reduction_rounds(width: usize) -> u32 {
    if width <= 1 {
        0
    } else {
        width.trailing_zeros()
    }
}
