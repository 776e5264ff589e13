//! 属性测试
//!
//! 使用proptest验证标量与向量内核在任意长度、多种宽度下结果一致

#[cfg(test)]
mod tests {
    use crate::kernels::{
        abs_serial, abs_vector, array_sum_serial, array_sum_vector, clamped_exp_serial,
        clamped_exp_vector, CLAMP_CEILING,
    };
    use lane_kernels_intrin::VectorUnit;
    use proptest::prelude::*;

    fn finite_values(max_len: usize) -> impl Strategy<Value = Vec<f32>> {
        proptest::collection::vec(-1000.0f32..1000.0, 0..max_len)
    }

    fn exp_inputs(max_len: usize) -> impl Strategy<Value = (Vec<f32>, Vec<i32>)> {
        (0..max_len).prop_flat_map(|len| {
            (
                proptest::collection::vec(-3.0f32..3.0, len),
                proptest::collection::vec(0i32..64, len),
            )
        })
    }

    fn abs_matches<const W: usize>(values: &[f32]) -> Result<(), TestCaseError> {
        let mut serial = vec![0.0; values.len()];
        let mut vector = vec![0.0; values.len()];
        abs_serial(values, &mut serial).unwrap();
        abs_vector(&mut VectorUnit::<W>::new(), values, &mut vector).unwrap();
        prop_assert_eq!(serial, vector);
        Ok(())
    }

    fn exp_matches<const W: usize>(values: &[f32], exponents: &[i32]) -> Result<(), TestCaseError> {
        let mut serial = vec![0.0; values.len()];
        let mut vector = vec![0.0; values.len()];
        clamped_exp_serial(values, exponents, &mut serial).unwrap();
        clamped_exp_vector(&mut VectorUnit::<W>::new(), values, exponents, &mut vector).unwrap();

        for (s, v) in serial.iter().zip(vector.iter()) {
            let scale = s.abs().max(1.0);
            // 溢出到负无穷时两边相同，差值是NaN，需要先比较相等
            prop_assert!(s == v || (s - v).abs() <= 1e-5 * scale, "serial={} vector={}", s, v);
            prop_assert!(*v <= CLAMP_CEILING);
        }
        Ok(())
    }

    fn sum_matches<const W: usize>(values: &[f32]) -> Result<(), TestCaseError> {
        let len = values.len() / W * W;
        let values = &values[..len];

        let serial = array_sum_serial(values);
        let vector = array_sum_vector(&mut VectorUnit::<W>::new(), values).unwrap();

        // 累加误差与绝对值之和成正比
        let magnitude: f32 = values.iter().map(|x| x.abs()).sum();
        prop_assert!(
            (serial - vector).abs() <= 1e-4 * magnitude.max(1.0),
            "serial={} vector={}",
            serial,
            vector
        );
        Ok(())
    }

    proptest! {
        #[test]
        fn abs_vector_matches_serial(values in finite_values(67)) {
            abs_matches::<1>(&values)?;
            abs_matches::<3>(&values)?;
            abs_matches::<4>(&values)?;
            abs_matches::<8>(&values)?;
        }

        #[test]
        fn abs_output_is_non_negative(values in finite_values(40)) {
            let mut output = vec![-1.0; values.len()];
            abs_vector(&mut VectorUnit::<4>::new(), &values, &mut output).unwrap();
            prop_assert!(output.iter().all(|x| *x >= 0.0));
        }

        #[test]
        fn clamped_exp_vector_matches_serial((values, exponents) in exp_inputs(67)) {
            exp_matches::<1>(&values, &exponents)?;
            exp_matches::<3>(&values, &exponents)?;
            exp_matches::<4>(&values, &exponents)?;
            exp_matches::<8>(&values, &exponents)?;
        }

        #[test]
        fn array_sum_vector_matches_serial(values in finite_values(130)) {
            sum_matches::<1>(&values)?;
            sum_matches::<2>(&values)?;
            sum_matches::<4>(&values)?;
            sum_matches::<16>(&values)?;
        }
    }
}
