//! 绝对值内核
//!
//! 向量版本对每一组都计算尾部感知的有效掩码，长度不是 `W` 的整数倍时
//! 最后一组只读写 `N mod W` 个通道，不会越过数组末尾。

use crate::error::{check_lengths, check_width, KernelResult};
use lane_kernels_intrin::{LaneGroups, VecF32, VectorUnit};

/// 标量绝对值：按符号分支取反或拷贝
pub fn abs_serial(values: &[f32], output: &mut [f32]) -> KernelResult<()> {
    check_lengths("abs_serial", ("values", values.len()), ("output", output.len()))?;

    for (x, out) in values.iter().zip(output.iter_mut()) {
        *out = if *x < 0.0 { -*x } else { *x };
    }
    Ok(())
}

/// 向量绝对值
///
/// 每组：载入有效通道，`x < 0` 的通道做 `0 - x`，
/// 其余有效通道直接拷贝，最后按有效掩码写回。
pub fn abs_vector<const W: usize>(
    unit: &mut VectorUnit<W>,
    values: &[f32],
    output: &mut [f32],
) -> KernelResult<()> {
    check_width("abs_vector", W)?;
    check_lengths("abs_vector", ("values", values.len()), ("output", output.len()))?;
    tracing::debug!(target: "lane_kernels", len = values.len(), width = W, "abs_vector");

    let zero = unit.splat(0.0f32);

    for (offset, active) in LaneGroups::<W>::new(values.len()) {
        let all = unit.init_ones(active);
        let mut x = VecF32::<W>::zeroed();
        let mut result = VecF32::<W>::zeroed();

        unit.vload(&mut x, &values[offset..], &all);

        // if (x < 0)
        let mut is_negative = unit.init_ones(0);
        unit.vlt(&mut is_negative, &x, &zero, &all);
        unit.vsub(&mut result, &zero, &x, &is_negative);

        // else
        let not_negative = unit.mask_not(&is_negative);
        let not_negative = unit.mask_and(&not_negative, &all);
        unit.vload(&mut result, &values[offset..], &not_negative);

        unit.vstore(&mut output[offset..], &result, &all);
    }
    Ok(())
}
