//! 随机输入生成
//!
//! 同一个种子总是生成同一组输入，便于复现失败用例。

use crate::config::InputConfig;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// 一次运行使用的输入
#[derive(Debug, Clone, PartialEq)]
pub struct KernelInputs {
    pub values: Vec<f32>,
    pub exponents: Vec<i32>,
}

impl KernelInputs {
    /// 按配置生成：数值在 `[value_min, value_max)`，指数在 `[0, exp_max)`
    ///
    /// 调用前应先通过 [`InputConfig::validate`]，空区间会panic。
    pub fn generate(config: &InputConfig) -> Self {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut values = Vec::with_capacity(config.size);
        let mut exponents = Vec::with_capacity(config.size);

        for _ in 0..config.size {
            values.push(rng.gen_range(config.value_min..config.value_max));
            exponents.push(rng.gen_range(0..config.exp_max));
        }

        Self { values, exponents }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
