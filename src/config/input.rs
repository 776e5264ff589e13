use super::{ConfigError, ConfigResult};
use crate::impl_default;
use serde::{Deserialize, Serialize};

/// 单次运行允许的最大数组长度
pub const MAX_SIZE: usize = 1 << 26;

/// 指数上限（不含），超过31位的指数在i32上没有意义
pub const MAX_EXP: i32 = 31;

/// 输入数据配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// 数组长度N
    pub size: usize,

    /// 随机种子
    pub seed: u64,

    /// 指数取值范围 [0, exp_max)
    pub exp_max: i32,

    /// 数值下界（含）
    pub value_min: f32,

    /// 数值上界（不含）
    pub value_max: f32,
}

impl_default!(InputConfig {
    size: 16,
    seed: 418,
    exp_max: 10,
    value_min: -1.0,
    value_max: 3.0,
});

impl InputConfig {
    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        if self.size > MAX_SIZE {
            return Err(ConfigError::ValidationError(format!(
                "size {} exceeds {}",
                self.size, MAX_SIZE
            )));
        }
        if self.exp_max <= 0 || self.exp_max > MAX_EXP {
            return Err(ConfigError::ValidationError(format!(
                "exp_max must be in 1..={}, got {}",
                MAX_EXP, self.exp_max
            )));
        }
        if !self.value_min.is_finite() || !self.value_max.is_finite() || self.value_min >= self.value_max {
            return Err(ConfigError::ValidationError(format!(
                "invalid value range [{}, {})",
                self.value_min, self.value_max
            )));
        }
        Ok(())
    }
}
