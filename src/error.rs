//! # 错误类型模块
//!
//! 隐写核心只返回 [`StegoError`]，不重试、不记录日志，也不吞掉错误。
//! 如何把错误展示给用户由前端 (本 crate 中的 `handler`) 决定。

use thiserror::Error;

/// 隐写编解码过程中可能出现的错误。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StegoError {
    #[error("Cannot hide an empty message")]
    EmptyInput,

    #[error("Message does not fit in the image: needs {needed} bits, capacity is {capacity} bits")]
    CapacityExceeded { needed: u64, capacity: u64 },

    #[error("Invalid extraction length: {0} bits (must be a positive multiple of 8)")]
    InvalidLength(u64),

    #[error("Bit stream length {0} is not a positive multiple of 8")]
    BadBitLength(usize),

    #[error("Recovered bytes are not valid UTF-8: {0}")]
    DecodeUtf8(#[from] std::string::FromUtf8Error),

    #[error("Image has {pixels} pixels, more than the slot generator can address")]
    ImageTooLarge { pixels: u64 },

    #[error("Image is too small to hold a {needed}-bit length header (capacity is {capacity} bits)")]
    FrameTooShort { needed: u64, capacity: u64 },

    #[error("Frame header announces {declared} bytes, which cannot fit in {capacity} bits")]
    FrameLength { declared: u64, capacity: u64 },
}

/// 隐写核心统一使用的 `Result` 别名。
pub type Result<T> = std::result::Result<T, StegoError>;
