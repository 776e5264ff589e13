//! 截断幂内核：`output[i] = min(values[i] ^ exponents[i], 4.18)`
//!
//! 使用重复平方，迭代次数与指数的位长成正比。
//! 向量版本中每个通道在不同的迭代次数结束，"仍在迭代"掩码单调收缩，
//! 当掩码为空时整组结束。

use crate::error::{check_lengths, check_width, KernelError, KernelResult};
use lane_kernels_intrin::{LaneGroups, VecF32, VecI32, VectorUnit};

/// 输出上限
pub const CLAMP_CEILING: f32 = 4.18;

fn check_inputs(
    kernel: &'static str,
    values: &[f32],
    exponents: &[i32],
    output: &[f32],
) -> KernelResult<()> {
    check_lengths(kernel, ("values", values.len()), ("exponents", exponents.len()))?;
    check_lengths(kernel, ("values", values.len()), ("output", output.len()))?;

    if let Some((index, &value)) = exponents.iter().enumerate().find(|(_, y)| **y < 0) {
        return Err(KernelError::NegativeExponent {
            kernel,
            index,
            value,
        });
    }
    Ok(())
}

/// 标量截断幂
pub fn clamped_exp_serial(values: &[f32], exponents: &[i32], output: &mut [f32]) -> KernelResult<()> {
    check_inputs("clamped_exp_serial", values, exponents, output)?;

    for ((&x, &exponent), out) in values.iter().zip(exponents).zip(output.iter_mut()) {
        let mut result = 1.0f32;
        let mut xpower = x;
        let mut y = exponent;
        while y > 0 {
            if y & 0x1 != 0 {
                result *= xpower;
            }
            xpower *= xpower;
            y >>= 1;
        }
        if result > CLAMP_CEILING {
            result = CLAMP_CEILING;
        }
        *out = result;
    }
    Ok(())
}

/// 向量截断幂
///
/// 平方和右移只在"仍在迭代"的通道上执行：已结束通道的 `xpower`
/// 不会再被使用，跳过它们不改变结果，同时让利用率统计反映真实工作量。
/// 每组的循环次数等于组内最大指数的位长。
pub fn clamped_exp_vector<const W: usize>(
    unit: &mut VectorUnit<W>,
    values: &[f32],
    exponents: &[i32],
    output: &mut [f32],
) -> KernelResult<()> {
    check_width("clamped_exp_vector", W)?;
    check_inputs("clamped_exp_vector", values, exponents, output)?;
    tracing::debug!(target: "lane_kernels", len = values.len(), width = W, "clamped_exp_vector");

    let zero = unit.splat(0i32);
    let one = unit.splat(1i32);
    let ceiling = unit.splat(CLAMP_CEILING);

    for (offset, active) in LaneGroups::<W>::new(values.len()) {
        let all = unit.init_ones(active);

        let mut result = VecF32::<W>::zeroed();
        let mut xpower = VecF32::<W>::zeroed();
        let mut y = VecI32::<W>::zeroed();
        let mut low_bit = VecI32::<W>::zeroed();

        unit.vset(&mut result, 1.0, &all);
        unit.vload(&mut xpower, &values[offset..], &all);
        unit.vload(&mut y, &exponents[offset..], &all);

        let mut iterating = unit.init_ones(0);
        unit.vgt(&mut iterating, &y, &zero, &all);

        while unit.cntbits(&iterating) > 0 {
            // if (y & 1) result *= xpower
            unit.vbitand(&mut low_bit, &y, &one, &iterating);
            let mut multiply = unit.init_ones(0);
            unit.vgt(&mut multiply, &low_bit, &zero, &iterating);

            let product = result;
            unit.vmult(&mut result, &product, &xpower, &multiply);

            let base = xpower;
            unit.vmult(&mut xpower, &base, &base, &iterating);

            let shifted = y;
            unit.vshiftright(&mut y, &shifted, &one, &iterating);

            let still = iterating;
            iterating = unit.init_ones(0);
            unit.vgt(&mut iterating, &y, &zero, &still);
        }

        let mut over = unit.init_ones(0);
        unit.vgt(&mut over, &result, &ceiling, &all);
        unit.vset(&mut result, CLAMP_CEILING, &over);

        unit.vstore(&mut output[offset..], &result, &all);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_example() {
        let mut serial = [0.0];
        let mut vector = [0.0];

        clamped_exp_serial(&[2.0], &[3], &mut serial).unwrap();
        clamped_exp_vector(&mut VectorUnit::<4>::new(), &[2.0], &[3], &mut vector).unwrap();

        assert_eq!(serial, [CLAMP_CEILING]);
        assert_eq!(vector, [CLAMP_CEILING]);
    }

    #[test]
    fn test_zero_exponent_is_one() {
        let values = [0.0, -3.0, 100.0, 0.5, 2.0];
        let exponents = [0; 5];
        let mut output = [f32::NAN; 5];

        clamped_exp_vector(&mut VectorUnit::<4>::new(), &values, &exponents, &mut output).unwrap();
        assert_eq!(output, [1.0; 5]);
    }

    #[test]
    fn test_mixed_exponents_match_serial() {
        let values = [1.1, -1.5, 0.9, 2.0, -0.7, 1.9, 3.0];
        let exponents = [9, 3, 7, 1, 5, 2, 0];
        let mut serial = [0.0; 7];
        let mut vector = [0.0; 7];

        clamped_exp_serial(&values, &exponents, &mut serial).unwrap();
        clamped_exp_vector(&mut VectorUnit::<4>::new(), &values, &exponents, &mut vector).unwrap();

        assert_eq!(serial, vector);
        assert_eq!(vector[1], -3.375);
        assert_eq!(vector[3], 2.0);
        assert_eq!(vector[6], 1.0);
    }

    #[test]
    fn test_tail_stays_in_bounds() {
        let values = [1.5; 8];
        let exponents = [2; 8];
        let mut output = [-9.0; 8];

        clamped_exp_vector(&mut VectorUnit::<4>::new(), &values[..5], &exponents[..5], &mut output[..5])
            .unwrap();

        assert_eq!(&output[..5], &[2.25; 5]);
        assert_eq!(&output[5..], &[-9.0; 3]);
    }

    #[test]
    fn test_negative_exponent_rejected_before_writing() {
        let mut output = [7.0; 3];
        let err = clamped_exp_vector(&mut VectorUnit::<4>::new(), &[1.0, 2.0, 3.0], &[1, -1, 2], &mut output)
            .unwrap_err();

        assert_eq!(
            err,
            KernelError::NegativeExponent {
                kernel: "clamped_exp_vector",
                index: 1,
                value: -1,
            }
        );
        assert_eq!(output, [7.0; 3]);

        let mut output = [7.0; 3];
        let err = clamped_exp_serial(&[1.0, 2.0, 3.0], &[2, 3, -4], &mut output).unwrap_err();
        assert_eq!(
            err,
            KernelError::NegativeExponent {
                kernel: "clamped_exp_serial",
                index: 2,
                value: -4,
            }
        );
        assert_eq!(output, [7.0; 3]);
    }

    #[test]
    fn test_zero_width_rejected() {
        let mut output = [7.0];
        let err = clamped_exp_vector(&mut VectorUnit::<0>::new(), &[2.0], &[3], &mut output).unwrap_err();
        assert_eq!(err, KernelError::ZeroWidth { kernel: "clamped_exp_vector" });
        assert_eq!(output, [7.0]);
    }

    #[test]
    fn test_loop_trip_count_follows_largest_exponent() {
        // 最大指数 8 = 0b1000，位长4，循环4次，每次一条cntbits，再加结束时的一次
        let mut unit = VectorUnit::<4>::new();
        let mut output = [0.0; 4];
        clamped_exp_vector(&mut unit, &[1.0; 4], &[8, 1, 0, 2], &mut output).unwrap();

        let cntbits = unit.stats().per_instruction[&lane_kernels_intrin::Instruction::CntBits];
        assert_eq!(cntbits.issued, 5);
        assert_eq!(output, [1.0; 4]);
    }
}
