/// 内核错误处理
///
/// 把原本属于"调用方责任"的前置条件显式化为错误返回。
use crate::config::ConfigError;
use thiserror::Error;

/// 内核前置条件错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KernelError {
    /// 输入输出长度不一致
    #[error("{kernel}: 长度不匹配 ({lhs_name}={lhs}, {rhs_name}={rhs})")]
    LengthMismatch {
        kernel: &'static str,
        lhs_name: &'static str,
        lhs: usize,
        rhs_name: &'static str,
        rhs: usize,
    },

    /// 指数为负，重复平方无法终止
    #[error("{kernel}: exponents[{index}] = {value} 为负数")]
    NegativeExponent {
        kernel: &'static str,
        index: usize,
        value: i32,
    },

    /// 归约内核要求长度是向量宽度的整数倍
    #[error("{kernel}: 长度 {len} 不是向量宽度 {width} 的整数倍")]
    RemainderNotSupported {
        kernel: &'static str,
        len: usize,
        width: usize,
    },

    /// 向量宽度为0，没有可执行的通道
    #[error("{kernel}: 向量宽度为0")]
    ZeroWidth { kernel: &'static str },

    /// 成对折叠要求向量宽度为2的幂
    #[error("{kernel}: 向量宽度 {width} 不是2的幂")]
    WidthNotPowerOfTwo { kernel: &'static str, width: usize },
}

/// 内核结果类型
pub type KernelResult<T> = Result<T, KernelError>;

/// 校验运行错误
#[derive(Error, Debug)]
pub enum HarnessError {
    /// 配置无效
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// 内核前置条件不满足
    #[error(transparent)]
    Kernel(#[from] KernelError),

    /// 报告序列化失败
    #[error("报告序列化失败: {0}")]
    Report(#[from] serde_json::Error),
}

/// 校验运行结果类型
pub type HarnessResult<T> = Result<T, HarnessError>;

/// 检查两个缓冲区长度一致
pub(crate) fn check_lengths(
    kernel: &'static str,
    (lhs_name, lhs): (&'static str, usize),
    (rhs_name, rhs): (&'static str, usize),
) -> KernelResult<()> {
    if lhs != rhs {
        return Err(KernelError::LengthMismatch {
            kernel,
            lhs_name,
            lhs,
            rhs_name,
            rhs,
        });
    }
    Ok(())
}

/// 检查向量宽度至少为1
pub(crate) fn check_width(kernel: &'static str, width: usize) -> KernelResult<()> {
    if width == 0 {
        return Err(KernelError::ZeroWidth { kernel });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = KernelError::NegativeExponent {
            kernel: "clamped_exp_serial",
            index: 3,
            value: -2,
        };
        assert!(error.to_string().contains("exponents[3] = -2"));

        let error = KernelError::RemainderNotSupported {
            kernel: "array_sum_vector",
            len: 6,
            width: 4,
        };
        assert!(error.to_string().contains("长度 6"));
    }

    #[test]
    fn test_check_lengths() {
        assert!(check_lengths("abs", ("values", 3), ("output", 3)).is_ok());

        let err = check_lengths("abs", ("values", 3), ("output", 2)).unwrap_err();
        assert_eq!(
            err,
            KernelError::LengthMismatch {
                kernel: "abs",
                lhs_name: "values",
                lhs: 3,
                rhs_name: "output",
                rhs: 2,
            }
        );
    }

    #[test]
    fn test_check_width() {
        assert!(check_width("abs_vector", 1).is_ok());
        assert_eq!(
            check_width("abs_vector", 0),
            Err(KernelError::ZeroWidth { kernel: "abs_vector" })
        );
    }
}
