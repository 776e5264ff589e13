//! # Lane Kernels
//!
//! Scalar and lane-parallel implementations of a handful of numeric kernels,
//! used to practice manual SIMD-style thinking.
//!
//! ## Features
//!
//! - **Masked predication**: branchy scalar logic (if/else, data-dependent loops)
//!   expressed as branch-free masked operations over fixed-width lanes
//! - **Tail handling**: every general-length kernel computes a remainder-aware
//!   active mask, so it never reads or writes past `N`
//! - **Instrumentation**: each vector instruction is logged with its mask, giving
//!   lane utilization statistics and an optional execution trace
//! - **Verification harness**: seeded inputs, serial gold results, elementwise
//!   comparison and text/JSON reports
//!
//! ### Example
//!
//! ```rust
//! use lane_kernels::kernels::{clamped_exp_serial, clamped_exp_vector};
//! use lane_kernels::VectorUnit;
//!
//! let values = [2.0f32, 1.5, -1.0];
//! let exponents = [3, 2, 5];
//! let mut gold = [0.0f32; 3];
//! let mut output = [0.0f32; 3];
//!
//! clamped_exp_serial(&values, &exponents, &mut gold).unwrap();
//!
//! let mut unit = VectorUnit::<4>::new();
//! clamped_exp_vector(&mut unit, &values, &exponents, &mut output).unwrap();
//!
//! assert_eq!(output, [4.18, 2.25, -1.0]);
//! assert_eq!(output, gold);
//! ```
//!
//! ## Modules
//!
//! - [`kernels`]: absolute value, clamped power and array sum, serial and vector
//! - [`harness`]: input generation, verification and reports
//! - [`config`]: TOML/JSON configuration with environment overrides
//! - [`error`]: kernel and harness errors

pub mod macros;

/// Kernel and harness error types
pub mod error;
/// Run configuration
pub mod config;
/// Serial and lane-parallel kernels
pub mod kernels;
/// Verification runs and reports
pub mod harness;

pub use config::{ConfigError, ConfigResult, RunConfig};
pub use error::{HarnessError, HarnessResult, KernelError, KernelResult};
pub use harness::{run, run_with_width, KernelReport, KernelStatus, RunReport};
pub use kernels::{Kernel, CLAMP_CEILING};

// 重新导出通道抽象
pub use lane_kernels_intrin::{LaneMask, LaneStats, VecF32, VecI32, VectorUnit, VECTOR_WIDTH};
