//! # MT19937 伪随机数生成器
//!
//! 槽位序列完全由生成器的输出流决定，隐藏方与恢复方必须逐位一致。
//! 这里固定使用 32 位 Mersenne Twister (`init_genrand` 播种、`genrand_int32` 输出)，
//! 由 `rand_mt` 提供，任何平台、任何语言的标准 MT19937 实现都能复现同一条序列。
//!
//! 区间采样 [`Mt19937::next_in_range`] 在本模块内固定实现，
//! 不依赖 `rand` 的 `random_range`，后者的采样算法可能随版本变化。

use rand_mt::Mt;

/// 带固定区间采样算法的 32 位 Mersenne Twister。
#[derive(Clone, Debug)]
pub struct Mt19937 {
    inner: Mt,
}

impl Mt19937 {
    /// 用 32 位种子初始化 (`init_genrand`)。
    pub fn new(seed: u32) -> Self {
        Self {
            inner: Mt::new(seed),
        }
    }

    /// 下一个 32 位输出 (`genrand_int32`)。
    pub fn next_word(&mut self) -> u32 {
        self.inner.next_u32()
    }

    /// 在 `[0, n)` 内均匀采样，`n` 必须满足 `1 <= n <= 2^32`。
    ///
    /// 落在 2^32 顶部不完整窗口内的输出会被丢弃重抽，因此结果无偏。
    pub fn next_in_range(&mut self, n: u64) -> u64 {
        const SPAN: u64 = 1 << 32;
        assert!(n >= 1 && n <= SPAN, "range {n} is outside [1, 2^32]");

        let zone = SPAN - SPAN % n;
        loop {
            let value = u64::from(self.next_word());
            if value < zone {
                return value % n;
            }
        }
    }
}
