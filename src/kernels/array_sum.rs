//! 数组求和内核
//!
//! 向量版本的契约比另外两个内核窄：要求 `N % W == 0` 且 `W` 为2的幂，
//! 因此不做尾部处理。

use crate::error::{KernelError, KernelResult};
use lane_kernels_intrin::{is_power_of_two_width, reduction_rounds, LaneGroups, VecF32, VectorUnit};

/// 标量求和，单累加器从左到右
pub fn array_sum_serial(values: &[f32]) -> f32 {
    let mut sum = 0.0f32;
    for x in values {
        sum += *x;
    }
    sum
}

/// 向量求和
///
/// 先按组做逐通道累加，再用 `hadd` + `interleave` 做 log2(W) 轮成对折叠，
/// 最终和落在通道0。求和顺序与标量版本不同，结果只在浮点误差范围内一致。
pub fn array_sum_vector<const W: usize>(unit: &mut VectorUnit<W>, values: &[f32]) -> KernelResult<f32> {
    if !is_power_of_two_width(W) {
        return Err(KernelError::WidthNotPowerOfTwo {
            kernel: "array_sum_vector",
            width: W,
        });
    }
    if values.len() % W != 0 {
        return Err(KernelError::RemainderNotSupported {
            kernel: "array_sum_vector",
            len: values.len(),
            width: W,
        });
    }
    tracing::debug!(target: "lane_kernels", len = values.len(), width = W, "array_sum_vector");

    let all = unit.init_ones(W);
    let mut acc = unit.splat(0.0f32);
    let mut x = VecF32::<W>::zeroed();

    for (offset, _) in LaneGroups::<W>::new(values.len()) {
        unit.vload(&mut x, &values[offset..], &all);
        let partial = acc;
        unit.vadd(&mut acc, &partial, &x, &all);
    }

    for _ in 0..reduction_rounds(W) {
        let folded = acc;
        unit.hadd(&mut acc, &folded);
        let paired = acc;
        unit.interleave(&mut acc, &paired);
    }

    let mut sum = [0.0f32; 1];
    let first = unit.init_ones(1);
    unit.vstore(&mut sum, &acc, &first);
    Ok(sum[0])
}
