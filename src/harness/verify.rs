/// 结果比对
///
/// 以标量内核的输出为基准，逐元素比较向量内核的输出。
use serde::{Deserialize, Serialize};

/// 一个不一致的元素
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mismatch {
    pub index: usize,
    pub value: f32,
    pub exponent: Option<i32>,
    pub expected: f32,
    pub actual: f32,
}

/// 两个值是否在相对容差内一致
///
/// 误差上限为 `tolerance * max(|expected|, 1)`，小于1的值按绝对误差比较。
/// 同为NaN或完全相等（含无穷）视为一致，只有一方非有限值视为不一致。
pub fn within_tolerance(expected: f32, actual: f32, tolerance: f32) -> bool {
    within_bound(expected, actual, tolerance * expected.abs().max(1.0))
}

fn within_bound(expected: f32, actual: f32, bound: f32) -> bool {
    if expected == actual || (expected.is_nan() && actual.is_nan()) {
        return true;
    }
    if !expected.is_finite() || !actual.is_finite() {
        return false;
    }
    (expected - actual).abs() <= bound
}

/// 逐元素比较，返回所有不一致的元素
pub fn compare_outputs(
    values: &[f32],
    exponents: Option<&[i32]>,
    gold: &[f32],
    output: &[f32],
    tolerance: f32,
) -> Vec<Mismatch> {
    gold.iter()
        .zip(output)
        .enumerate()
        .filter(|(_, (expected, actual))| !within_tolerance(**expected, **actual, tolerance))
        .map(|(index, (expected, actual))| Mismatch {
            index,
            value: values[index],
            exponent: exponents.map(|e| e[index]),
            expected: *expected,
            actual: *actual,
        })
        .collect()
}

/// 求和结果比较
///
/// 两种求和顺序的舍入误差与元素绝对值之和成正比，所以按相对误差比较。
pub fn sums_match(values: &[f32], expected: f32, actual: f32, tolerance: f32) -> bool {
    let magnitude: f32 = values.iter().map(|x| x.abs()).sum();
    within_bound(expected, actual, tolerance * magnitude.max(1.0))
}
