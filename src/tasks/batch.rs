//! 批缓冲
//!
//! 任务本地的定容累积数组: 攒满整批后一次性刷出，刷出后逻辑
//! 清空。只在拥有它的任务栈上存在，从不跨任务共享。

use heapless::Vec;

/// 定容批缓冲
pub struct Batch<T, const N: usize> {
    items: Vec<T, N>,
}

impl<T, const N: usize> Batch<T, N> {
    /// 创建空批
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// 追加一个元素，返回批是否已满
    ///
    /// 只在成功出队后调用; 对已满的批追加是调用方漏刷的信号，
    /// 元素被拒收并立即报满。
    pub fn push(&mut self, value: T) -> bool {
        if self.items.push(value).is_err() {
            return true;
        }
        self.items.is_full()
    }

    /// 当前元素数
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// 按到达顺序的整批视图
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// 刷出后逻辑清空 (容量不变)
    pub fn reset(&mut self) {
        self.items.clear();
    }
}

impl<T, const N: usize> Default for Batch<T, N> {
    fn default() -> Self {
        Self::new()
    }
}
