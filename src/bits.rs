//! # 比特编解码模块
//!
//! 在字节串与比特序列之间转换。每个字节按最高位优先 (MSB-first) 展开，
//! 恢复时每 8 个比特重新组装成一个字节，第一个比特为最高位。
//! 比特序列用 `Vec<u8>` 表示，每个元素只取 0 或 1。

use crate::constants::BITS_PER_BYTE;
use crate::error::{Result, StegoError};

/// 把文本的 UTF-8 字节展开为比特序列。
///
/// # Errors
///
/// 文本为空时返回 [`StegoError::EmptyInput`]。
pub fn encode_bits(text: &str) -> Result<Vec<u8>> {
    encode_bytes(text.as_bytes())
}

/// 把任意字节展开为比特序列，每个字节依次产出 `(b >> 7) & 1` 到 `b & 1`。
///
/// # Errors
///
/// 输入为空时返回 [`StegoError::EmptyInput`]。
pub fn encode_bytes(bytes: &[u8]) -> Result<Vec<u8>> {
    if bytes.is_empty() {
        return Err(StegoError::EmptyInput);
    }

    Ok(bytes
        .iter()
        .flat_map(|&byte| (0..BITS_PER_BYTE).rev().map(move |shift| (byte >> shift) & 1))
        .collect())
}

/// 把比特序列重新组装为字节，不做 UTF-8 解释。
///
/// # Errors
///
/// 比特数为 0 或不是 8 的倍数时返回 [`StegoError::BadBitLength`]。
pub fn pack_bits(bits: &[u8]) -> Result<Vec<u8>> {
    if bits.is_empty() || bits.len() % BITS_PER_BYTE != 0 {
        return Err(StegoError::BadBitLength(bits.len()));
    }

    Ok(bits
        .chunks_exact(BITS_PER_BYTE)
        .map(|group| group.iter().fold(0u8, |byte, &bit| (byte << 1) | (bit & 1)))
        .collect())
}

/// 把比特序列解码为 UTF-8 文本。
///
/// # Errors
///
/// * 比特数不是正的 8 的倍数时返回 [`StegoError::BadBitLength`]。
/// * 组装出的字节不是合法 UTF-8 时返回 [`StegoError::DecodeUtf8`]。
pub fn decode_bits(bits: &[u8]) -> Result<String> {
    let bytes = pack_bits(bits)?;
    Ok(String::from_utf8(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_msb_first() {
        assert_eq!(encode_bits("A").unwrap(), vec![0, 1, 0, 0, 0, 0, 0, 1]);
        assert_eq!(
            encode_bytes(&[0x80, 0x01]).unwrap(),
            vec![1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1]
        );
    }

    #[test]
    fn empty_text_is_rejected() {
        assert_eq!(encode_bits(""), Err(StegoError::EmptyInput));
        assert_eq!(encode_bytes(&[]), Err(StegoError::EmptyInput));
    }

    #[test]
    fn decodes_multibyte_utf8() {
        let text = "Hi 🦀 隐写";
        let bits = encode_bits(text).unwrap();
        assert_eq!(bits.len(), text.len() * 8);
        assert_eq!(decode_bits(&bits).unwrap(), text);
    }

    #[test]
    fn rejects_partial_bytes() {
        assert_eq!(decode_bits(&[]), Err(StegoError::BadBitLength(0)));
        assert_eq!(decode_bits(&[1, 0, 1]), Err(StegoError::BadBitLength(3)));
        assert_eq!(pack_bits(&[0; 9]), Err(StegoError::BadBitLength(9)));
    }

    #[test]
    fn rejects_invalid_utf8() {
        // 0xFF 永远不会出现在合法的 UTF-8 中
        let bits = encode_bytes(&[0xFF]).unwrap();
        assert!(matches!(decode_bits(&bits), Err(StegoError::DecodeUtf8(_))));
        assert_eq!(pack_bits(&bits).unwrap(), vec![0xFF]);
    }
}
