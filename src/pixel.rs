//! # 像素网格模块
//!
//! 像素以 `u32` 打包为 A·R·G·B：A 占 24–31 位，R 占 16–23 位，G 占 8–15 位，B 占 0–7 位。
//! 所有通道运算均为无符号整数运算，每次提取都在右移后与 `0xFF` 相与。

use image::{Rgba, RgbaImage};

/// 打包像素中的一个颜色通道。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    A,
    R,
    G,
    B,
}

impl Channel {
    /// 该通道在打包像素中的位移量。
    pub const fn shift(self) -> u32 {
        match self {
            Channel::A => 24,
            Channel::R => 16,
            Channel::G => 8,
            Channel::B => 0,
        }
    }

    /// 从打包像素中取出本通道的值。
    pub const fn of(self, pixel: u32) -> u8 {
        ((pixel >> self.shift()) & 0xFF) as u8
    }
}

/// 编解码器可写入的通道。alpha 不在其中，因此永远不会被分配或修改。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WritableChannel {
    B,
    R,
    G,
}

impl WritableChannel {
    /// 按调度顺序排列：先蓝，再红，最后绿。
    pub const ALL: [WritableChannel; 3] = [WritableChannel::B, WritableChannel::R, WritableChannel::G];

    /// 在调度顺序中的位置，也用作每通道状态数组的下标。
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn channel(self) -> Channel {
        match self {
            WritableChannel::B => Channel::B,
            WritableChannel::R => Channel::R,
            WritableChannel::G => Channel::G,
        }
    }
}

impl From<WritableChannel> for Channel {
    fn from(channel: WritableChannel) -> Self {
        channel.channel()
    }
}

/// 可按坐标读写打包 ARGB 像素的矩形栅格。
///
/// 越界访问属于调用方错误，实现应当 panic。
pub trait PixelGrid {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn get(&self, x: u32, y: u32) -> u32;
    fn set(&mut self, x: u32, y: u32, pixel: u32);

    /// 像素总数，即槽位数 N。
    fn total_pixels(&self) -> u64 {
        u64::from(self.width()) * u64::from(self.height())
    }
}

/// 把像素拆为 `[A, R, G, B]` 四个通道值。
pub const fn split(pixel: u32) -> [u8; 4] {
    [
        Channel::A.of(pixel),
        Channel::R.of(pixel),
        Channel::G.of(pixel),
        Channel::B.of(pixel),
    ]
}

/// 由四个通道值组装打包像素。
pub const fn assemble(a: u8, r: u8, g: u8, b: u8) -> u32 {
    (a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32
}

/// 只替换指定通道，其余位保持不变。
pub const fn with_channel(pixel: u32, channel: Channel, value: u8) -> u32 {
    let shift = channel.shift();
    (pixel & !(0xFF << shift)) | ((value as u32) << shift)
}

/// 把指定通道的最低有效位替换为 `bit`。
pub const fn with_lsb(pixel: u32, channel: Channel, bit: u8) -> u32 {
    let value = (channel.of(pixel) & 0xFE) | (bit & 1);
    with_channel(pixel, channel, value)
}

/// 读取指定通道的最低有效位。
pub const fn lsb(pixel: u32, channel: Channel) -> u8 {
    channel.of(pixel) & 1
}

/// 线性槽位号转为 `(x, y)`：`x = p mod W`，`y = p / W`。
pub fn linearize(position: u64, width: u32) -> (u32, u32) {
    let width = u64::from(width);
    ((position % width) as u32, (position / width) as u32)
}

/// 内存中的 ARGB 栅格，按行优先存放打包像素。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgbImage {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl ArgbImage {
    /// 创建全零 (透明黑) 图像。
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, 0)
    }

    /// 创建每个像素都等于 `pixel` 的图像。
    pub fn filled(width: u32, height: u32, pixel: u32) -> Self {
        assert!(width >= 1 && height >= 1, "image must be at least 1x1");
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            pixels: vec![pixel; len],
        }
    }

    /// 由现成的像素缓冲创建图像，长度必须等于 `width * height`。
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<u32>) -> Option<Self> {
        (width >= 1 && height >= 1 && pixels.len() == width as usize * height as usize).then_some(
            Self {
                width,
                height,
                pixels,
            },
        )
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) is outside a {}x{} image",
            self.width,
            self.height
        );
        y as usize * self.width as usize + x as usize
    }
}

impl PixelGrid for ArgbImage {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn get(&self, x: u32, y: u32) -> u32 {
        self.pixels[self.offset(x, y)]
    }

    fn set(&mut self, x: u32, y: u32, pixel: u32) {
        let offset = self.offset(x, y);
        self.pixels[offset] = pixel;
    }
}

// `image` 的 RGBA8 缓冲按字节存放，这里在读写时与 ARGB 打包格式互转。
impl PixelGrid for RgbaImage {
    fn width(&self) -> u32 {
        self.dimensions().0
    }

    fn height(&self) -> u32 {
        self.dimensions().1
    }

    fn get(&self, x: u32, y: u32) -> u32 {
        let Rgba([r, g, b, a]) = *self.get_pixel(x, y);
        assemble(a, r, g, b)
    }

    fn set(&mut self, x: u32, y: u32, pixel: u32) {
        let [a, r, g, b] = split(pixel);
        self.put_pixel(x, y, Rgba([r, g, b, a]));
    }
}
