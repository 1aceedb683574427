//! 持久化块存储接口
//!
//! 持久化任务把攒满的一批样本作为单个连续块提交: 先擦除基地址处
//! 的块，再一次性编程整批字节。上一批内容随之销毁 (覆写语义，
//! 非追加)。不做磨损均衡与坏块管理。

use core::fmt;

use embedded_storage::nor_flash::NorFlash;
use heapless::Vec;

use crate::config::BUFFER_SIZE;
use crate::hw::sensor::Celsius;

/// 整批序列化后的字节数
pub const BATCH_BYTES: usize = BUFFER_SIZE * core::mem::size_of::<Celsius>();

/// 存储操作错误
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "log-defmt", derive(defmt::Format))]
pub enum StoreError {
    /// 擦除失败
    EraseFailed,
    /// 编程失败
    ProgramFailed,
    /// 地址越界
    OutOfBounds,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EraseFailed => write!(f, "flash erase failed"),
            Self::ProgramFailed => write!(f, "flash program failed"),
            Self::OutOfBounds => write!(f, "address out of bounds"),
        }
    }
}

impl core::error::Error for StoreError {}

/// 持久化块存储窄接口
///
/// 仅整块语义: 无部分更新，调用方保证 `erase` 先于 `program`。
pub trait BlockStore {
    /// 擦除基地址处的块
    fn erase(&mut self, base: u32) -> Result<(), StoreError>;

    /// 将整批字节作为一个连续块写入
    fn program(&mut self, base: u32, bytes: &[u8]) -> Result<(), StoreError>;
}

/// 整批样本的小端序列化
///
/// 容量按 BUFFER_SIZE 计算，满批以内不会溢出。
pub fn batch_bytes(samples: &[Celsius]) -> Vec<u8, BATCH_BYTES> {
    let mut out = Vec::new();
    for sample in samples {
        let _ = out.extend_from_slice(&sample.to_le_bytes());
    }
    out
}

/// embedded-storage NorFlash 适配器
///
/// 把任意 `NorFlash` 实现桥接到 `BlockStore`，目标端直接包上
/// 平台的 flash 驱动即可。
pub struct NorStore<F: NorFlash> {
    flash: F,
}

impl<F: NorFlash> NorStore<F> {
    /// 包装一个 NorFlash 驱动
    pub fn new(flash: F) -> Self {
        Self { flash }
    }

    /// 取回内部驱动
    pub fn into_inner(self) -> F {
        self.flash
    }
}

impl<F: NorFlash> BlockStore for NorStore<F> {
    fn erase(&mut self, base: u32) -> Result<(), StoreError> {
        self.flash
            .erase(base, base + F::ERASE_SIZE as u32)
            .map_err(|_| StoreError::EraseFailed)
    }

    fn program(&mut self, base: u32, bytes: &[u8]) -> Result<(), StoreError> {
        self.flash
            .write(base, bytes)
            .map_err(|_| StoreError::ProgramFailed)
    }
}
