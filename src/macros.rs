//! 公共宏定义

/// 为结构体实现Default trait的宏
///
/// 使用示例:
/// ```rust
/// struct Limits {
///     max_size: usize,
///     name: String,
/// }
///
/// lane_kernels::impl_default!(Limits {
///     max_size: 16,
///     name: String::from("default"),
/// });
///
/// assert_eq!(Limits::default().max_size, 16);
/// ```
#[macro_export]
macro_rules! impl_default {
    ($struct_name:ident {
        $($field:ident: $value:expr),* $(,)?
    }) => {
        impl Default for $struct_name {
            fn default() -> Self {
                Self {
                    $($field: $value),*
                }
            }
        }
    };
}
