/// 标量与向量内核
///
/// 每个内核都有一对实现：标量版本作为基准，向量版本在定宽通道上用掩码表达分支。
/// 向量版本对宽度 `W` 泛型；`*_vector_default` 使用 [`VECTOR_WIDTH`] 和一个新的执行单元。
mod abs;
mod array_sum;
mod clamped_exp;
#[cfg(test)]
mod property_tests;

pub use abs::{abs_serial, abs_vector};
pub use array_sum::{array_sum_serial, array_sum_vector};
pub use clamped_exp::{clamped_exp_serial, clamped_exp_vector, CLAMP_CEILING};

use crate::error::KernelResult;
use lane_kernels_intrin::{VectorUnit, VECTOR_WIDTH};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 内核种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Kernel {
    Abs,
    ClampedExp,
    ArraySum,
}

impl Kernel {
    pub const ALL: [Kernel; 3] = [Kernel::Abs, Kernel::ClampedExp, Kernel::ArraySum];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Abs => "abs",
            Self::ClampedExp => "clamped-exp",
            Self::ArraySum => "array-sum",
        }
    }
}

impl fmt::Display for Kernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 默认宽度的向量绝对值
pub fn abs_vector_default(values: &[f32], output: &mut [f32]) -> KernelResult<()> {
    abs_vector(&mut VectorUnit::<VECTOR_WIDTH>::new(), values, output)
}

/// 默认宽度的向量截断幂
pub fn clamped_exp_vector_default(
    values: &[f32],
    exponents: &[i32],
    output: &mut [f32],
) -> KernelResult<()> {
    clamped_exp_vector(&mut VectorUnit::<VECTOR_WIDTH>::new(), values, exponents, output)
}

/// 默认宽度的向量求和
pub fn array_sum_vector_default(values: &[f32]) -> KernelResult<f32> {
    array_sum_vector(&mut VectorUnit::<VECTOR_WIDTH>::new(), values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_wrappers() {
        let mut output = [0.0; 3];
        abs_vector_default(&[-1.5, 2.0, 0.0], &mut output).unwrap();
        assert_eq!(output, [1.5, 2.0, 0.0]);

        let mut output = [0.0; 1];
        clamped_exp_vector_default(&[2.0], &[3], &mut output).unwrap();
        assert_eq!(output, [CLAMP_CEILING]);

        assert_eq!(array_sum_vector_default(&[1.0, 2.0, 3.0, 4.0]).unwrap(), 10.0);
    }

    #[test]
    fn test_kernel_names() {
        assert_eq!(Kernel::ClampedExp.to_string(), "clamped-exp");
        let json = serde_json::to_string(&Kernel::ArraySum).unwrap();
        assert_eq!(json, "\"array-sum\"");
    }
}
