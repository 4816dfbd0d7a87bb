use crate::pixel::WritableChannel;

/// 根据全局比特序号 `index` 与像素总数 `total` 选出当前通道。
///
/// 阶梯式调度：前 N 个比特写入蓝色通道，接下来 N 个写入红色，再 N 个写入绿色。
/// 双方只凭 `index` 与 `total` 就能得出同一个通道。超出 `3N` 时返回 `None`，
/// 容量检查由调用方负责。
pub fn channel_for(index: u64, total: u64) -> Option<WritableChannel> {
    WritableChannel::ALL
        .get(usize::try_from(index.checked_div(total)?).ok()?)
        .copied()
}
