//! # lsb_scatter 库
//!
//! 本库包含随机散布 LSB 隐写工具的核心逻辑。
//!
//! 隐藏时，文本的每个比特按阶梯调度落入蓝、红、绿三个通道之一，
//! 再由固定种子的 MT19937 随机流在该通道尚未使用的像素中选出一个，
//! 替换其最低有效位。恢复时以同样的种子重走一遍相同的序列。
//!
//! ```
//! use lsb_scatter::pixel::ArgbImage;
//! use lsb_scatter::steganography::{extract, hide};
//!
//! let mut grid = ArgbImage::filled(4, 4, 0xFFFF_FFFF);
//! hide(&mut grid, "Hi").unwrap();
//! assert_eq!(extract(&grid, 16).unwrap(), "Hi");
//! ```

// 声明库包含的所有模块。

pub mod bits;
pub mod cli;
pub mod constants;
pub mod error;
pub mod frame;
pub mod handler;
pub mod mt;
pub mod pixel;
pub mod schedule;
pub mod slots;
pub mod steganography;

pub use error::{Result, StegoError};
