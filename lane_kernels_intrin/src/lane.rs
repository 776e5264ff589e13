//! 定宽通道向量与谓词掩码
//!
//! `LaneVec` 对应一个宽度为 `W` 的向量寄存器，`LaneMask` 对应一组逐通道谓词。
//! 两者都是纯值类型，不记录任何指令；带日志的运算请通过 [`crate::VectorUnit`]。

use std::fmt;

/// 定宽通道向量（向量寄存器）
#[derive(Clone, Copy, PartialEq)]
pub struct LaneVec<T: Copy, const W: usize> {
    lanes: [T; W],
}

/// 单精度浮点向量
pub type VecF32<const W: usize> = LaneVec<f32, W>;

/// 32位有符号整数向量
pub type VecI32<const W: usize> = LaneVec<i32, W>;

impl<T: Copy + Default, const W: usize> LaneVec<T, W> {
    /// 所有通道为 `T::default()` 的向量
    pub fn zeroed() -> Self {
        Self {
            lanes: [T::default(); W],
        }
    }
}

impl<T: Copy + Default, const W: usize> Default for LaneVec<T, W> {
    fn default() -> Self {
        Self::zeroed()
    }
}

impl<T: Copy, const W: usize> LaneVec<T, W> {
    /// 从数组构造
    pub fn from_array(lanes: [T; W]) -> Self {
        Self { lanes }
    }

    /// 所有通道填充同一个值
    pub fn splat(value: T) -> Self {
        Self { lanes: [value; W] }
    }

    /// 读取单个通道
    ///
    /// # Panics
    ///
    /// `lane >= W` 时panic。
    pub fn lane(&self, lane: usize) -> T {
        self.lanes[lane]
    }

    /// 写入单个通道
    pub fn set_lane(&mut self, lane: usize, value: T) {
        self.lanes[lane] = value;
    }

    /// 通道数组
    pub fn as_array(&self) -> &[T; W] {
        &self.lanes
    }

    pub fn to_array(self) -> [T; W] {
        self.lanes
    }

    /// 通道数
    pub const fn width(&self) -> usize {
        W
    }
}

impl<T: Copy + fmt::Debug, const W: usize> fmt::Debug for LaneVec<T, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.lanes.iter()).finish()
    }
}

/// 逐通道谓词掩码
///
/// 被掩码覆盖的通道才会被带掩码的运算修改，其余通道保持原值。
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct LaneMask<const W: usize> {
    bits: [bool; W],
}

impl<const W: usize> LaneMask<W> {
    /// 全部通道有效
    pub fn all() -> Self {
        Self { bits: [true; W] }
    }

    /// 全部通道无效
    pub fn none() -> Self {
        Self { bits: [false; W] }
    }

    /// 前 `first` 个通道有效，超过 `W` 时按 `W` 处理
    ///
    /// 这是处理尾部（不足一组）元素的基本工具。
    ///
    /// ```rust
    /// use lane_kernels_intrin::LaneMask;
    ///
    /// let mask = LaneMask::<4>::first(3);
    /// assert_eq!(mask.count(), 3);
    /// assert!(!mask.is_set(3));
    /// ```
    pub fn first(first: usize) -> Self {
        let mut bits = [false; W];
        for bit in bits.iter_mut().take(first.min(W)) {
            *bit = true;
        }
        Self { bits }
    }

    pub fn from_array(bits: [bool; W]) -> Self {
        Self { bits }
    }

    pub fn is_set(&self, lane: usize) -> bool {
        self.bits[lane]
    }

    pub fn set(&mut self, lane: usize, value: bool) {
        self.bits[lane] = value;
    }

    /// 逻辑非
    pub fn not(&self) -> Self {
        let mut bits = self.bits;
        for bit in bits.iter_mut() {
            *bit = !*bit;
        }
        Self { bits }
    }

    /// 逻辑与
    pub fn and(&self, other: &Self) -> Self {
        let mut bits = self.bits;
        for (bit, rhs) in bits.iter_mut().zip(other.bits.iter()) {
            *bit = *bit && *rhs;
        }
        Self { bits }
    }

    /// 逻辑或
    pub fn or(&self, other: &Self) -> Self {
        let mut bits = self.bits;
        for (bit, rhs) in bits.iter_mut().zip(other.bits.iter()) {
            *bit = *bit || *rhs;
        }
        Self { bits }
    }

    /// 有效通道数（population count）
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|bit| **bit).count()
    }

    pub fn any(&self) -> bool {
        self.bits.iter().any(|bit| *bit)
    }

    /// 有效通道下标
    pub fn active_lanes(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits
            .iter()
            .enumerate()
            .filter_map(|(lane, bit)| bit.then_some(lane))
    }

    pub fn as_array(&self) -> &[bool; W] {
        &self.bits
    }

    /// `*` 表示有效通道，`_` 表示空闲通道
    pub fn render(&self) -> String {
        self.bits
            .iter()
            .map(|bit| if *bit { '*' } else { '_' })
            .collect()
    }
}

impl<const W: usize> fmt::Debug for LaneMask<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LaneMask({})", self.render())
    }
}

/// 按宽度 `W` 切分长度为 `len` 的数组
///
/// 产出 `(offset, active)`：除最后一组外 `active == W`，
/// 最后一组为 `len % W`（不为零时）。
#[derive(Debug, Clone)]
pub struct LaneGroups<const W: usize> {
    len: usize,
    offset: usize,
}

impl<const W: usize> LaneGroups<W> {
    pub fn new(len: usize) -> Self {
        Self { len, offset: 0 }
    }
}

impl<const W: usize> Iterator for LaneGroups<W> {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<Self::Item> {
        if W == 0 || self.offset >= self.len {
            return None;
        }
        let offset = self.offset;
        let active = (self.len - offset).min(W);
        self.offset += W;
        Some((offset, active))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = if W == 0 {
            0
        } else {
            (self.len.saturating_sub(self.offset) + W - 1) / W
        };
        (remaining, Some(remaining))
    }
}

impl<const W: usize> ExactSizeIterator for LaneGroups<W> {}
