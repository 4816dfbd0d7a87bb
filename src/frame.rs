//! # 自描述帧模块
//!
//! 核心编解码不在图像中记录长度。需要自描述载荷时，在比特流前加一个
//! 32 位大端序的字节长度头，恢复时先沿同一访问序列读出头部，再读取整帧。
//! 访问序列是前缀稳定的，所以先读头部再读整帧不会改变前 32 个槽位。

use crate::bits::{decode_bits, encode_bytes};
use crate::constants::{BITS_PER_BYTE, LENGTH_PREFIX_BITS};
use crate::error::{Result, StegoError};
use crate::pixel::PixelGrid;
use crate::steganography::{capacity_bits, extract_bits, hide_bits};

/// 为载荷加上长度头，返回整帧的比特序列。
///
/// # Errors
///
/// * 载荷为空时返回 [`StegoError::EmptyInput`]。
/// * 载荷超过 `u32::MAX` 字节时返回 [`StegoError::FrameLength`]。
pub fn frame(payload: &[u8]) -> Result<Vec<u8>> {
    if payload.is_empty() {
        return Err(StegoError::EmptyInput);
    }

    let declared = u32::try_from(payload.len()).map_err(|_| StegoError::FrameLength {
        declared: payload.len() as u64,
        capacity: u64::from(u32::MAX) * BITS_PER_BYTE as u64,
    })?;

    let mut bits = encode_bytes(&declared.to_be_bytes())?;
    bits.extend(encode_bytes(payload)?);
    Ok(bits)
}

/// 整帧占用的比特数。
pub fn framed_bits(payload_len: usize) -> u64 {
    LENGTH_PREFIX_BITS as u64 + payload_len as u64 * BITS_PER_BYTE as u64
}

/// 以帧格式隐藏文本。
///
/// # Errors
///
/// * 文本为空时返回 [`StegoError::EmptyInput`]。
/// * `32 + 8 * 字节数 > 3N` 时返回 [`StegoError::CapacityExceeded`]。
pub fn hide_framed<G: PixelGrid + ?Sized>(grid: &mut G, plaintext: &str) -> Result<()> {
    let bits = frame(plaintext.as_bytes())?;
    hide_bits(grid, &bits)
}

/// 读取帧头并恢复帧内文本。
///
/// # Errors
///
/// * 图像容量不足以容纳帧头时返回 [`StegoError::FrameTooShort`]。
/// * 帧头声明的长度为 0 或超出图像容量时返回 [`StegoError::FrameLength`]。
/// * 载荷不是合法 UTF-8 时返回 [`StegoError::DecodeUtf8`]。
pub fn extract_framed<G: PixelGrid + ?Sized>(grid: &G) -> Result<String> {
    let capacity = capacity_bits(grid);
    if capacity < LENGTH_PREFIX_BITS as u64 {
        return Err(StegoError::FrameTooShort {
            needed: LENGTH_PREFIX_BITS as u64,
            capacity,
        });
    }

    let header = extract_bits(grid, LENGTH_PREFIX_BITS as u64)?;
    let declared = read_header(&header);
    let total = framed_bits(declared as usize);
    if declared == 0 || total > capacity {
        return Err(StegoError::FrameLength {
            declared: u64::from(declared),
            capacity,
        });
    }

    let bits = extract_bits(grid, total)?;
    decode_bits(&bits[LENGTH_PREFIX_BITS..])
}

fn read_header(bits: &[u8]) -> u32 {
    bits.iter().fold(0u32, |acc, &bit| (acc << 1) | u32::from(bit & 1))
}
