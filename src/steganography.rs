//! # 隐写核心模块
//!
//! 把比特序列散布到像素的最低有效位中，或按相同顺序把它们读回来。
//! 两个方向共用 [`walk`] 生成的槽位序列：通道由 [`channel_for`] 按阶梯决定，
//! 像素由 [`SlotAllocator`] 从固定种子的随机流中抽取。
//!
//! 隐藏是全有或全无的：所有校验都在第一次写像素之前完成。
//! 恢复是纯读取操作，不会修改图像。

use log::{debug, trace};

use crate::bits::{decode_bits, encode_bits};
use crate::constants::{BITS_PER_BYTE, WRITABLE_CHANNELS};
use crate::error::{Result, StegoError};
use crate::pixel::{Channel, PixelGrid, linearize, lsb, with_lsb};
use crate::schedule::channel_for;
use crate::slots::SlotAllocator;

/// 一次访问的目标：第几个比特、写入哪个通道、落在哪个像素上。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub index: u64,
    pub channel: Channel,
    pub position: u64,
    pub x: u32,
    pub y: u32,
}

/// 按固定顺序产出 `(通道, 像素)` 访问序列的迭代器。
///
/// 对同样的尺寸，长度为 `L` 的序列总是长度更大的序列的前缀。
#[derive(Debug)]
pub struct Walk {
    allocator: SlotAllocator,
    width: u32,
    total: u64,
    index: u64,
    len: u64,
}

impl Iterator for Walk {
    type Item = Slot;

    fn next(&mut self) -> Option<Slot> {
        if self.index >= self.len {
            return None;
        }

        let channel = channel_for(self.index, self.total)?;
        let position = self.allocator.draw(channel);
        let (x, y) = linearize(position, self.width);
        let slot = Slot {
            index: self.index,
            channel: channel.into(),
            position,
            x,
            y,
        };
        self.index += 1;
        Some(slot)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.len - self.index).unwrap_or(usize::MAX);
        (remaining, Some(remaining))
    }
}

/// 图像能承载的比特数，即 `3 * W * H`。
pub fn capacity_bits<G: PixelGrid + ?Sized>(grid: &G) -> u64 {
    WRITABLE_CHANNELS * grid.total_pixels()
}

/// 构造 `width x height` 图像上长度为 `len` 的访问序列。
///
/// # Errors
///
/// * `len` 超过 `3N` 时返回 [`StegoError::CapacityExceeded`]。
/// * 像素数超过 2^32，或超出当前平台 `usize` 的范围时返回 [`StegoError::ImageTooLarge`]。
pub fn walk(width: u32, height: u32, len: u64) -> Result<Walk> {
    let total = u64::from(width) * u64::from(height);
    let capacity = WRITABLE_CHANNELS * total;
    if len > capacity {
        return Err(StegoError::CapacityExceeded {
            needed: len,
            capacity,
        });
    }

    Ok(Walk {
        allocator: SlotAllocator::new(total.max(1))?,
        width,
        total,
        index: 0,
        len,
    })
}

/// 把文本隐藏到图像中，直接修改 `grid`。
///
/// 每个比特只改变一个像素中一个通道的最低有效位，alpha 通道与其余位保持不变。
///
/// # Errors
///
/// * 文本为空时返回 [`StegoError::EmptyInput`]。
/// * `8 * 字节数 > 3N` 时返回 [`StegoError::CapacityExceeded`]，此时图像未被修改。
pub fn hide<G: PixelGrid + ?Sized>(grid: &mut G, plaintext: &str) -> Result<()> {
    let bits = encode_bits(plaintext)?;
    hide_bits(grid, &bits)
}

/// 按访问序列把比特流写入图像。
///
/// # Errors
///
/// 同 [`hide`]：空比特流返回 [`StegoError::EmptyInput`]，超出容量返回
/// [`StegoError::CapacityExceeded`]。
pub fn hide_bits<G: PixelGrid + ?Sized>(grid: &mut G, bits: &[u8]) -> Result<()> {
    if bits.is_empty() {
        return Err(StegoError::EmptyInput);
    }

    let slots = walk(grid.width(), grid.height(), bits.len() as u64)?;
    debug!(
        "hiding {} bits in a {}x{} image",
        bits.len(),
        grid.width(),
        grid.height()
    );

    for (slot, &bit) in slots.zip(bits) {
        trace!("bit {} -> {:?} at ({}, {})", slot.index, slot.channel, slot.x, slot.y);
        let pixel = grid.get(slot.x, slot.y);
        grid.set(slot.x, slot.y, with_lsb(pixel, slot.channel, bit));
    }

    Ok(())
}

/// 从图像中读出 `bit_length` 个比特，不做字节组装。
///
/// # Errors
///
/// * `bit_length` 为 0 时返回 [`StegoError::InvalidLength`]。
/// * 超出容量时返回 [`StegoError::CapacityExceeded`]。
pub fn extract_bits<G: PixelGrid + ?Sized>(grid: &G, bit_length: u64) -> Result<Vec<u8>> {
    if bit_length == 0 {
        return Err(StegoError::InvalidLength(bit_length));
    }

    let slots = walk(grid.width(), grid.height(), bit_length)?;
    debug!(
        "extracting {} bits from a {}x{} image",
        bit_length,
        grid.width(),
        grid.height()
    );

    Ok(slots
        .map(|slot| lsb(grid.get(slot.x, slot.y), slot.channel))
        .collect())
}

/// 从图像中恢复长度为 `bit_length` 比特的文本。
///
/// 长度不嵌入图像中，必须由调用方通过其他渠道得知。
///
/// # Errors
///
/// 校验顺序如下：
/// * `bit_length` 为 0 时返回 [`StegoError::InvalidLength`]。
/// * `bit_length > 3N` 时返回 [`StegoError::CapacityExceeded`]。
/// * `bit_length` 不是 8 的倍数时返回 [`StegoError::InvalidLength`]。
/// * 读出的字节不是合法 UTF-8 时返回 [`StegoError::DecodeUtf8`]。
pub fn extract<G: PixelGrid + ?Sized>(grid: &G, bit_length: u64) -> Result<String> {
    if bit_length == 0 {
        return Err(StegoError::InvalidLength(bit_length));
    }

    let capacity = capacity_bits(grid);
    if bit_length > capacity {
        return Err(StegoError::CapacityExceeded {
            needed: bit_length,
            capacity,
        });
    }

    if bit_length % BITS_PER_BYTE as u64 != 0 {
        return Err(StegoError::InvalidLength(bit_length));
    }

    let bits = extract_bits(grid, bit_length)?;
    decode_bits(&bits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel::{ArgbImage, split};
    use std::collections::HashSet;

    const WHITE: u32 = 0xFF_FF_FF_FF;

    fn changed_pixels(before: &ArgbImage, after: &ArgbImage) -> usize {
        before
            .pixels()
            .iter()
            .zip(after.pixels())
            .filter(|(a, b)| a != b)
            .count()
    }

    #[test]
    fn walk_is_prefix_stable() {
        let short: Vec<Slot> = walk(5, 3, 10).unwrap().collect();
        let long: Vec<Slot> = walk(5, 3, 45).unwrap().collect();
        assert_eq!(short.as_slice(), &long[..10]);
    }

    #[test]
    fn walk_visits_every_slot_once_per_channel() {
        let slots: Vec<Slot> = walk(4, 4, 48).unwrap().collect();
        assert_eq!(slots.len(), 48);
        let unique: HashSet<(Channel, u64)> =
            slots.iter().map(|s| (s.channel, s.position)).collect();
        assert_eq!(unique.len(), 48);
        assert!(slots[..16].iter().all(|s| s.channel == Channel::B));
        assert!(slots[16..32].iter().all(|s| s.channel == Channel::R));
        assert!(slots[32..].iter().all(|s| s.channel == Channel::G));
    }

    #[test]
    fn walk_rejects_oversized_requests() {
        assert_eq!(
            walk(2, 2, 13).unwrap_err(),
            StegoError::CapacityExceeded {
                needed: 13,
                capacity: 12
            }
        );
        assert!(matches!(
            walk(u32::MAX, 2, 1),
            Err(StegoError::ImageTooLarge { .. })
        ));
    }

    #[test]
    fn single_letter_on_two_by_two() {
        let cover = ArgbImage::filled(2, 2, WHITE);
        let mut stego = cover.clone();
        hide(&mut stego, "A").unwrap();

        // "A" = 01000001：前 4 个比特占满 B 通道，后 4 个进入 R 通道
        let slots: Vec<Slot> = walk(2, 2, 8).unwrap().collect();
        assert_eq!(slots.iter().filter(|s| s.channel == Channel::B).count(), 4);
        assert_eq!(slots.iter().filter(|s| s.channel == Channel::R).count(), 4);

        // 白色像素的每个 LSB 都是 1，只有写入 0 的地方会变化
        let zeros = [0, 1, 0, 0, 0, 0, 0, 1].iter().filter(|&&b| b == 0).count();
        let flipped: u32 = cover
            .pixels()
            .iter()
            .zip(stego.pixels())
            .map(|(a, b)| (a ^ b).count_ones())
            .sum();
        assert_eq!(flipped as usize, zeros);

        assert_eq!(extract(&stego, 8).unwrap(), "A");
    }

    #[test]
    fn hide_is_deterministic() {
        let mut first = ArgbImage::filled(4, 4, WHITE);
        let mut second = ArgbImage::filled(4, 4, WHITE);
        hide(&mut first, "Hi").unwrap();
        hide(&mut second, "Hi").unwrap();
        assert_eq!(first, second);
        assert_eq!(extract(&first, 16).unwrap(), "Hi");
        assert_eq!(extract(&first, 16).unwrap(), extract(&second, 16).unwrap());
    }

    #[test]
    fn exact_capacity_round_trips() {
        let mut grid = ArgbImage::filled(4, 4, WHITE);
        hide(&mut grid, "Hi Ant").unwrap();
        assert_eq!(extract(&grid, 48).unwrap(), "Hi Ant");
    }

    #[test]
    fn over_capacity_leaves_image_untouched() {
        let cover = ArgbImage::filled(4, 4, WHITE);
        let mut grid = cover.clone();
        let err = hide(&mut grid, &"x".repeat(50)).unwrap_err();
        assert_eq!(
            err,
            StegoError::CapacityExceeded {
                needed: 400,
                capacity: 48
            }
        );
        assert_eq!(grid, cover);

        // 3N + 1 比特同样被拒绝
        let bits = vec![1u8; 49];
        assert!(matches!(
            hide_bits(&mut grid, &bits),
            Err(StegoError::CapacityExceeded { .. })
        ));
        assert_eq!(changed_pixels(&cover, &grid), 0);
    }

    #[test]
    fn empty_message_is_rejected() {
        let mut grid = ArgbImage::filled(4, 4, WHITE);
        assert_eq!(hide(&mut grid, ""), Err(StegoError::EmptyInput));
        assert_eq!(hide_bits(&mut grid, &[]), Err(StegoError::EmptyInput));
    }

    #[test]
    fn extraction_length_is_validated_in_order() {
        let grid = ArgbImage::filled(4, 4, WHITE);
        assert_eq!(extract(&grid, 0), Err(StegoError::InvalidLength(0)));
        assert_eq!(extract(&grid, 7), Err(StegoError::InvalidLength(7)));
        assert_eq!(
            extract(&grid, i32::MAX as u64),
            Err(StegoError::CapacityExceeded {
                needed: i32::MAX as u64,
                capacity: 48
            })
        );
        assert_eq!(extract_bits(&grid, 0), Err(StegoError::InvalidLength(0)));
        assert_eq!(extract_bits(&grid, 7).unwrap().len(), 7);
    }

    #[test]
    fn alpha_and_untargeted_bits_survive() {
        let cover = ArgbImage::from_pixels(
            3,
            3,
            (0..9u32).map(|i| 0x40_00_00_00 | i * 0x00_1F_2E_3D).collect(),
        )
        .unwrap();
        let mut stego = cover.clone();
        hide(&mut stego, "ok!").unwrap();

        for (before, after) in cover.pixels().iter().zip(stego.pixels()) {
            let [a0, ..] = split(*before);
            let [a1, ..] = split(*after);
            assert_eq!(a0, a1);
            // 每个像素只有 R/G/B 的最低位可能变化
            assert_eq!(before & !0x00_01_01_01, after & !0x00_01_01_01);
        }
        assert_eq!(extract(&stego, 24).unwrap(), "ok!");
    }
}
