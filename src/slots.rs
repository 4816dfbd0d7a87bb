//! # 槽位分配模块
//!
//! 每个可写通道维护一张 N 位的已用位图。分配时不断从生成器抽取 `[0, N)` 内的槽位，
//! 命中已用槽位就重抽，直到得到该通道尚未使用的槽位。

use bitvec::prelude::*;

use crate::constants::SEED;
use crate::error::{Result, StegoError};
use crate::mt::Mt19937;
use crate::pixel::WritableChannel;

/// 生成器一次输出 32 位，槽位数不能超过 2^32。
const MAX_SLOTS: u64 = 1 << 32;

/// 单次隐藏或恢复过程中的槽位分配器。
///
/// 生成器与位图只存活于一次运行之内，运行结束即丢弃。
#[derive(Debug)]
pub struct SlotAllocator {
    rng: Mt19937,
    total: u64,
    used: [BitVec<u64, Lsb0>; 3],
    drawn: [u64; 3],
}

impl SlotAllocator {
    /// 以固定种子创建分配器。`total` 为像素总数 N。
    ///
    /// # Errors
    ///
    /// N 超过 2^32，或在当前平台上无法作为位图长度时返回 [`StegoError::ImageTooLarge`]。
    ///
    /// # Panics
    ///
    /// N 为 0 时 panic。
    pub fn new(total: u64) -> Result<Self> {
        Self::with_seed(total, SEED)
    }

    pub fn with_seed(total: u64, seed: u32) -> Result<Self> {
        assert!(total >= 1, "slot count must be at least 1");
        let len = usize::try_from(total)
            .ok()
            .filter(|_| total <= MAX_SLOTS)
            .ok_or(StegoError::ImageTooLarge { pixels: total })?;

        let bitmap = || bitvec![u64, Lsb0; 0; len];
        Ok(Self {
            rng: Mt19937::new(seed),
            total,
            used: [bitmap(), bitmap(), bitmap()],
            drawn: [0; 3],
        })
    }

    /// 为 `channel` 抽取一个尚未使用的槽位并标记为已用。
    ///
    /// # Panics
    ///
    /// 该通道的 N 个槽位已全部用完时 panic。
    /// 编解码器在进入分配前已检查容量，正常调用不会触发。
    pub fn draw(&mut self, channel: WritableChannel) -> u64 {
        let slot = channel.index();
        assert!(
            self.drawn[slot] < self.total,
            "all {} slots of channel {channel:?} are used",
            self.total
        );

        loop {
            let position = self.rng.next_in_range(self.total);
            // 位图长度等于 total 且已确认能放进 usize，position < total 不会截断
            // replace 返回旧值，旧值为 false 说明这是第一次命中
            if !self.used[slot].replace(position as usize, true) {
                self.drawn[slot] += 1;
                return position;
            }
        }
    }

    /// 该通道已分配出的槽位数。
    pub fn drawn(&self, channel: WritableChannel) -> u64 {
        self.drawn[channel.index()]
    }

    /// 槽位是否已被该通道使用。
    pub fn is_used(&self, channel: WritableChannel, position: u64) -> bool {
        usize::try_from(position)
            .ok()
            .and_then(|position| self.used[channel.index()].get(position).map(|bit| *bit))
            .unwrap_or(false)
    }
}
