//! 带指令日志的向量执行单元
//!
//! 每个方法对应一条向量指令：在执行掩码覆盖的通道上运算，
//! 其余通道保持不变，并把掩码记入 [`InstructionLog`]。

use crate::lane::{LaneMask, LaneVec};
use crate::log::{Instruction, InstructionLog, LaneStats};
use std::fmt::Debug;

/// 可以放入通道的标量类型
///
/// 整数运算使用环绕语义，整数除零得0，和浮点保持"永不陷入"的行为一致。
pub trait LaneElement: Copy + Default + PartialOrd + Debug + 'static {
    fn lane_add(self, rhs: Self) -> Self;
    fn lane_sub(self, rhs: Self) -> Self;
    fn lane_mul(self, rhs: Self) -> Self;
    fn lane_div(self, rhs: Self) -> Self;
    fn lane_abs(self) -> Self;
}

impl LaneElement for f32 {
    fn lane_add(self, rhs: Self) -> Self {
        self + rhs
    }

    fn lane_sub(self, rhs: Self) -> Self {
        self - rhs
    }

    fn lane_mul(self, rhs: Self) -> Self {
        self * rhs
    }

    fn lane_div(self, rhs: Self) -> Self {
        self / rhs
    }

    fn lane_abs(self) -> Self {
        self.abs()
    }
}

impl LaneElement for i32 {
    fn lane_add(self, rhs: Self) -> Self {
        self.wrapping_add(rhs)
    }

    fn lane_sub(self, rhs: Self) -> Self {
        self.wrapping_sub(rhs)
    }

    fn lane_mul(self, rhs: Self) -> Self {
        self.wrapping_mul(rhs)
    }

    fn lane_div(self, rhs: Self) -> Self {
        self.checked_div(rhs).unwrap_or(0)
    }

    fn lane_abs(self) -> Self {
        self.wrapping_abs()
    }
}

/// 向量执行单元
///
/// 宽度 `W` 是编译期常量。单元本身只持有指令日志，
/// 向量和掩码都是调用方持有的值。
///
/// ```rust
/// use lane_kernels_intrin::{VectorUnit, VecF32};
///
/// let mut unit = VectorUnit::<4>::new();
/// let values = [1.0f32, -2.0, 3.0];
///
/// let active = unit.init_ones(values.len());
/// let mut x = VecF32::<4>::zeroed();
/// unit.vload(&mut x, &values, &active);
/// assert_eq!(x.to_array(), [1.0, -2.0, 3.0, 0.0]);
/// assert_eq!(unit.stats().total_instructions, 2);
/// ```
#[derive(Debug, Clone)]
pub struct VectorUnit<const W: usize> {
    log: InstructionLog,
}

impl<const W: usize> Default for VectorUnit<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const W: usize> VectorUnit<W> {
    /// 只统计利用率，不记录逐条跟踪
    pub fn new() -> Self {
        Self::with_trace(false)
    }

    /// `trace` 为真时同时记录逐条指令跟踪
    pub fn with_trace(trace: bool) -> Self {
        Self {
            log: InstructionLog::new(W, trace),
        }
    }

    pub const fn width(&self) -> usize {
        W
    }

    pub fn stats(&self) -> &LaneStats {
        self.log.stats()
    }

    pub fn log(&self) -> &InstructionLog {
        &self.log
    }

    /// 清空日志
    pub fn reset(&mut self) {
        tracing::trace!(
            target: "lane_kernels",
            "vector unit reset after {} instructions",
            self.log.stats().total_instructions
        );
        self.log.clear();
    }

    fn record(&mut self, instruction: Instruction, mask: &LaneMask<W>) {
        self.log.record(instruction, mask.as_array());
    }

    fn record_full(&mut self, instruction: Instruction) {
        self.log.record(instruction, &[true; W]);
    }

    fn unary<T: LaneElement>(
        &mut self,
        instruction: Instruction,
        dest: &mut LaneVec<T, W>,
        a: &LaneVec<T, W>,
        mask: &LaneMask<W>,
        op: impl Fn(T) -> T,
    ) {
        for lane in mask.active_lanes() {
            dest.set_lane(lane, op(a.lane(lane)));
        }
        self.record(instruction, mask);
    }

    fn binary<T: LaneElement>(
        &mut self,
        instruction: Instruction,
        dest: &mut LaneVec<T, W>,
        a: &LaneVec<T, W>,
        b: &LaneVec<T, W>,
        mask: &LaneMask<W>,
        op: impl Fn(T, T) -> T,
    ) {
        for lane in mask.active_lanes() {
            dest.set_lane(lane, op(a.lane(lane), b.lane(lane)));
        }
        self.record(instruction, mask);
    }

    fn compare<T: LaneElement>(
        &mut self,
        instruction: Instruction,
        dest: &mut LaneMask<W>,
        a: &LaneVec<T, W>,
        b: &LaneVec<T, W>,
        mask: &LaneMask<W>,
        op: impl Fn(T, T) -> bool,
    ) {
        for lane in mask.active_lanes() {
            dest.set(lane, op(a.lane(lane), b.lane(lane)));
        }
        self.record(instruction, mask);
    }

    // ---- 赋值与访存 ----

    /// 返回所有通道为 `value` 的新向量（全宽指令）
    pub fn splat<T: LaneElement>(&mut self, value: T) -> LaneVec<T, W> {
        self.record_full(Instruction::VSet);
        LaneVec::splat(value)
    }

    /// 在掩码通道上写入 `value`
    pub fn vset<T: LaneElement>(&mut self, dest: &mut LaneVec<T, W>, value: T, mask: &LaneMask<W>) {
        for lane in mask.active_lanes() {
            dest.set_lane(lane, value);
        }
        self.record(Instruction::VSet, mask);
    }

    pub fn vmove<T: LaneElement>(
        &mut self,
        dest: &mut LaneVec<T, W>,
        src: &LaneVec<T, W>,
        mask: &LaneMask<W>,
    ) {
        self.unary(Instruction::VMove, dest, src, mask, |x| x);
    }

    /// 从 `src[lane]` 载入掩码通道
    ///
    /// 只读取掩码覆盖的通道，`src` 可以比 `W` 短。
    ///
    /// # Panics
    ///
    /// 掩码覆盖的通道超出 `src` 长度时panic。
    pub fn vload<T: LaneElement>(&mut self, dest: &mut LaneVec<T, W>, src: &[T], mask: &LaneMask<W>) {
        for lane in mask.active_lanes() {
            dest.set_lane(lane, src[lane]);
        }
        self.record(Instruction::VLoad, mask);
    }

    /// 把掩码通道写回 `dest[lane]`，其余位置不被触碰
    ///
    /// # Panics
    ///
    /// 掩码覆盖的通道超出 `dest` 长度时panic。
    pub fn vstore<T: LaneElement>(&mut self, dest: &mut [T], src: &LaneVec<T, W>, mask: &LaneMask<W>) {
        for lane in mask.active_lanes() {
            dest[lane] = src.lane(lane);
        }
        self.record(Instruction::VStore, mask);
    }

    // ---- 算术 ----

    pub fn vadd<T: LaneElement>(
        &mut self,
        dest: &mut LaneVec<T, W>,
        a: &LaneVec<T, W>,
        b: &LaneVec<T, W>,
        mask: &LaneMask<W>,
    ) {
        self.binary(Instruction::VAdd, dest, a, b, mask, T::lane_add);
    }

    pub fn vsub<T: LaneElement>(
        &mut self,
        dest: &mut LaneVec<T, W>,
        a: &LaneVec<T, W>,
        b: &LaneVec<T, W>,
        mask: &LaneMask<W>,
    ) {
        self.binary(Instruction::VSub, dest, a, b, mask, T::lane_sub);
    }

    pub fn vmult<T: LaneElement>(
        &mut self,
        dest: &mut LaneVec<T, W>,
        a: &LaneVec<T, W>,
        b: &LaneVec<T, W>,
        mask: &LaneMask<W>,
    ) {
        self.binary(Instruction::VMult, dest, a, b, mask, T::lane_mul);
    }

    pub fn vdiv<T: LaneElement>(
        &mut self,
        dest: &mut LaneVec<T, W>,
        a: &LaneVec<T, W>,
        b: &LaneVec<T, W>,
        mask: &LaneMask<W>,
    ) {
        self.binary(Instruction::VDiv, dest, a, b, mask, T::lane_div);
    }

    pub fn vabs<T: LaneElement>(&mut self, dest: &mut LaneVec<T, W>, a: &LaneVec<T, W>, mask: &LaneMask<W>) {
        self.unary(Instruction::VAbs, dest, a, mask, T::lane_abs);
    }

    /// 逐通道算术右移，移位量取低5位
    pub fn vshiftright(
        &mut self,
        dest: &mut LaneVec<i32, W>,
        a: &LaneVec<i32, W>,
        b: &LaneVec<i32, W>,
        mask: &LaneMask<W>,
    ) {
        self.binary(Instruction::VShiftRight, dest, a, b, mask, |x: i32, s: i32| {
            x.wrapping_shr(s as u32)
        });
    }

    pub fn vbitand(
        &mut self,
        dest: &mut LaneVec<i32, W>,
        a: &LaneVec<i32, W>,
        b: &LaneVec<i32, W>,
        mask: &LaneMask<W>,
    ) {
        self.binary(Instruction::VBitAnd, dest, a, b, mask, |x: i32, y: i32| x & y);
    }

    // ---- 比较，结果写入掩码；掩码外的谓词保持原值 ----

    pub fn vgt<T: LaneElement>(
        &mut self,
        dest: &mut LaneMask<W>,
        a: &LaneVec<T, W>,
        b: &LaneVec<T, W>,
        mask: &LaneMask<W>,
    ) {
        self.compare(Instruction::VGt, dest, a, b, mask, |x, y| x > y);
    }

    pub fn vlt<T: LaneElement>(
        &mut self,
        dest: &mut LaneMask<W>,
        a: &LaneVec<T, W>,
        b: &LaneVec<T, W>,
        mask: &LaneMask<W>,
    ) {
        self.compare(Instruction::VLt, dest, a, b, mask, |x, y| x < y);
    }

    pub fn veq<T: LaneElement>(
        &mut self,
        dest: &mut LaneMask<W>,
        a: &LaneVec<T, W>,
        b: &LaneVec<T, W>,
        mask: &LaneMask<W>,
    ) {
        self.compare(Instruction::VEq, dest, a, b, mask, |x, y| x == y);
    }

    // ---- 跨通道（全宽） ----

    /// 偶数通道移到低半部分，奇数通道移到高半部分
    ///
    /// `[a, b, c, d]` -> `[a, c, b, d]`
    pub fn interleave<T: LaneElement>(&mut self, dest: &mut LaneVec<T, W>, src: &LaneVec<T, W>) {
        let mut out = *src;
        let evens = (0..W).step_by(2);
        let odds = (1..W).step_by(2);
        for (slot, lane) in evens.chain(odds).enumerate() {
            out.set_lane(slot, src.lane(lane));
        }
        *dest = out;
        self.record_full(Instruction::Interleave);
    }

    /// 相邻两通道求和，结果同时写入这两个通道
    ///
    /// `[a, b, c, d]` -> `[a+b, a+b, c+d, c+d]`；宽度为奇数时最后一个通道原样保留。
    pub fn hadd<T: LaneElement>(&mut self, dest: &mut LaneVec<T, W>, src: &LaneVec<T, W>) {
        let mut out = *src;
        for lane in (0..W.saturating_sub(1)).step_by(2) {
            let sum = src.lane(lane).lane_add(src.lane(lane + 1));
            out.set_lane(lane, sum);
            out.set_lane(lane + 1, sum);
        }
        *dest = out;
        self.record_full(Instruction::HAdd);
    }

    // ---- 掩码 ----

    /// 前 `first` 个通道有效的掩码
    pub fn init_ones(&mut self, first: usize) -> LaneMask<W> {
        self.record_full(Instruction::InitOnes);
        LaneMask::first(first)
    }

    pub fn mask_not(&mut self, mask: &LaneMask<W>) -> LaneMask<W> {
        self.record_full(Instruction::MaskNot);
        mask.not()
    }

    pub fn mask_and(&mut self, a: &LaneMask<W>, b: &LaneMask<W>) -> LaneMask<W> {
        self.record_full(Instruction::MaskAnd);
        a.and(b)
    }

    pub fn mask_or(&mut self, a: &LaneMask<W>, b: &LaneMask<W>) -> LaneMask<W> {
        self.record_full(Instruction::MaskOr);
        a.or(b)
    }

    /// 掩码中有效通道数
    pub fn cntbits(&mut self, mask: &LaneMask<W>) -> usize {
        self.record_full(Instruction::CntBits);
        mask.count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lane::{VecF32, VecI32};

    #[test]
    fn test_masked_ops_leave_inactive_lanes() {
        let mut unit = VectorUnit::<4>::new();
        let mask = LaneMask::from_array([true, false, true, false]);

        let a = VecF32::from_array([1.0, 2.0, 3.0, 4.0]);
        let b = VecF32::splat(10.0);
        let mut dest = VecF32::splat(-1.0);

        unit.vadd(&mut dest, &a, &b, &mask);
        assert_eq!(dest.to_array(), [11.0, -1.0, 13.0, -1.0]);

        unit.vmult(&mut dest, &a, &b, &mask.not());
        assert_eq!(dest.to_array(), [11.0, 20.0, 13.0, 40.0]);

        assert_eq!(unit.stats().total_instructions, 2);
        assert_eq!(unit.stats().utilized_lanes, 4);
        assert_eq!(unit.stats().total_lanes, 8);
    }

    #[test]
    fn test_load_store_respect_mask() {
        let mut unit = VectorUnit::<4>::new();
        let src = [5, 6];
        let mask = unit.init_ones(src.len());

        let mut v = VecI32::splat(9);
        unit.vload(&mut v, &src, &mask);
        assert_eq!(v.to_array(), [5, 6, 9, 9]);

        let mut out = [0; 2];
        unit.vstore(&mut out, &v, &mask);
        assert_eq!(out, [5, 6]);
    }

    #[test]
    fn test_compare_keeps_predicates_outside_mask() {
        let mut unit = VectorUnit::<4>::new();
        let a = VecI32::from_array([1, 0, 3, 0]);
        let zero = unit.splat(0);

        let mut dest = LaneMask::from_array([false, true, false, true]);
        unit.vgt(&mut dest, &a, &zero, &LaneMask::first(2));
        assert_eq!(dest.render(), "*__*");
    }

    #[test]
    fn test_integer_ops() {
        let mut unit = VectorUnit::<4>::new();
        let all = LaneMask::all();
        let a = VecI32::from_array([7, 6, -8, 1]);
        let one = VecI32::splat(1);
        let mut out = VecI32::zeroed();

        unit.vbitand(&mut out, &a, &one, &all);
        assert_eq!(out.to_array(), [1, 0, 0, 1]);

        unit.vshiftright(&mut out, &a, &one, &all);
        assert_eq!(out.to_array(), [3, 3, -4, 0]);

        unit.vdiv(&mut out, &a, &VecI32::from_array([2, 0, 2, 1]), &all);
        assert_eq!(out.to_array(), [3, 0, -4, 1]);

        unit.vabs(&mut out, &a, &all);
        assert_eq!(out.to_array(), [7, 6, 8, 1]);
    }

    #[test]
    fn test_hadd_interleave_reduce() {
        let mut unit = VectorUnit::<8>::new();
        let mut v = VecF32::from_array([1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);

        let src = v;
        unit.interleave(&mut v, &src);
        assert_eq!(v.to_array(), [1.0, 3.0, 5.0, 7.0, 2.0, 4.0, 6.0, 8.0]);

        let mut v = src;
        for _ in 0..3 {
            let cur = v;
            unit.hadd(&mut v, &cur);
            let cur = v;
            unit.interleave(&mut v, &cur);
        }
        assert_eq!(v.lane(0), 36.0);
        assert_eq!(unit.stats().utilization(), 100.0);
    }

    #[test]
    fn test_hadd_odd_width_keeps_last_lane() {
        let mut unit = VectorUnit::<3>::new();
        let src = VecI32::from_array([1, 2, 3]);
        let mut dest = VecI32::zeroed();
        unit.hadd(&mut dest, &src);
        assert_eq!(dest.to_array(), [3, 3, 3]);
    }

    #[test]
    fn test_mask_instructions_are_logged() {
        let mut unit = VectorUnit::<4>::with_trace(true);
        let a = unit.init_ones(1);
        let b = unit.mask_not(&a);
        let c = unit.mask_or(&a, &b);
        let d = unit.mask_and(&a, &c);
        assert_eq!(unit.cntbits(&c), 4);
        assert_eq!(d, a);

        assert_eq!(unit.stats().total_instructions, 5);
        assert_eq!(unit.log().trace().map(|t| t.len()), Some(5));

        unit.reset();
        assert_eq!(unit.stats().total_instructions, 0);
    }
}
