use super::{ConfigError, ConfigResult};
use crate::impl_default;
use crate::kernels::Kernel;
use serde::{Deserialize, Serialize};

/// 校验配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifyConfig {
    /// 相对容差，逐元素按 max(|期望值|, 1) 缩放，求和按元素绝对值之和缩放
    pub tolerance: f32,

    /// 打印逐条指令跟踪
    pub print_log: bool,

    /// 要运行的内核
    pub kernels: Vec<Kernel>,
}

impl_default!(VerifyConfig {
    tolerance: 1e-4,
    print_log: false,
    kernels: Kernel::ALL.to_vec(),
});

impl VerifyConfig {
    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        if self.kernels.is_empty() {
            return Err(ConfigError::ValidationError(
                "at least one kernel must be selected".to_string(),
            ));
        }
        Ok(())
    }
}
