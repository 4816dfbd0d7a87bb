/// 伪随机数生成器的固定种子。
/// 隐藏与恢复双方必须使用同一个种子，才能走出完全相同的槽位序列。
pub const SEED: u32 = 12345;

/// 每个字节展开后的比特数。
pub const BITS_PER_BYTE: usize = 8;

/// 可写颜色通道的数量 (B, R, G)。
/// 图像的总容量为 `WRITABLE_CHANNELS * 像素数` 个比特。
pub const WRITABLE_CHANNELS: u64 = 3;

/// 自描述帧头部占用的比特数。
/// 帧头是一个大端序 `u32`，记录载荷的字节长度。
pub const LENGTH_PREFIX_BITS: usize = 32;

/// 未指定输出路径时，隐写图像文件名的前缀。
pub const HIDDEN_IMAGE_PREFIX: &str = "doctored_";

/// 未指定输出路径时，恢复文本文件名的前缀。
pub const RECOVERED_TEXT_PREFIX: &str = "recovered_";

/// 隐写图像的默认扩展名。输出必须是无损格式，否则最低有效位会被破坏。
pub const DEFAULT_IMAGE_EXTENSION: &str = "png";
