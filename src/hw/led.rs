//! 状态指示灯
//!
//! 仅作观测侧通道，不参与正确性: 采样 = 红，持久化 = 绿，
//! 报表 = 蓝。空闲即 "无亮色"——启动时熄灭一次，之后没有任务
//! 驱动它就保持原样，不存在刷灭自旋。

use core::cell::RefCell;

use embassy_sync::blocking_mutex::{raw::CriticalSectionRawMutex, Mutex};
use embedded_hal::digital::OutputPin;

/// LED 颜色位掩码 (bit1 红 / bit2 蓝 / bit3 绿)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "log-defmt", derive(defmt::Format))]
pub struct LedColor(u8);

impl LedColor {
    pub const OFF: LedColor = LedColor(0x00);
    pub const RED: LedColor = LedColor(0x02);
    pub const BLUE: LedColor = LedColor(0x04);
    pub const GREEN: LedColor = LedColor(0x08);

    /// 原始位掩码
    #[inline(always)]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// 查询某一色位是否点亮
    #[inline(always)]
    pub const fn contains(self, other: LedColor) -> bool {
        (self.0 & other.0) == other.0
    }
}

/// 状态指示灯窄接口
pub trait StatusLed {
    /// 设置当前颜色 (覆盖式，非叠加)
    fn set(&mut self, color: LedColor);
}

/// 多任务共享的指示灯
///
/// 阻塞互斥 + RefCell，`set` 在临界区内完成，任何任务上下文
/// 都可调用且不会挂起。
pub struct SharedLed<L: StatusLed> {
    inner: Mutex<CriticalSectionRawMutex, RefCell<L>>,
}

impl<L: StatusLed> SharedLed<L> {
    /// 包装一个指示灯驱动
    pub const fn new(led: L) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(led)),
        }
    }

    /// 设置颜色 (非阻塞)
    pub fn set(&self, color: LedColor) {
        self.inner.lock(|led| led.borrow_mut().set(color));
    }
}

/// 三引脚 RGB 指示灯适配器
///
/// 把位掩码展开到三个推挽输出引脚。引脚写入错误无从恢复，
/// 指示灯又只是观测通道，直接忽略。
pub struct RgbLed<P: OutputPin> {
    red: P,
    blue: P,
    green: P,
}

impl<P: OutputPin> RgbLed<P> {
    pub fn new(red: P, blue: P, green: P) -> Self {
        Self { red, blue, green }
    }
}

impl<P: OutputPin> StatusLed for RgbLed<P> {
    fn set(&mut self, color: LedColor) {
        let _ = self.red.set_state(color.contains(LedColor::RED).into());
        let _ = self.blue.set_state(color.contains(LedColor::BLUE).into());
        let _ = self.green.set_state(color.contains(LedColor::GREEN).into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_bitmask_matches_reference_values() {
        assert_eq!(LedColor::OFF.bits(), 0x00);
        assert_eq!(LedColor::RED.bits(), 0x02);
        assert_eq!(LedColor::BLUE.bits(), 0x04);
        assert_eq!(LedColor::GREEN.bits(), 0x08);
        assert!(LedColor::GREEN.contains(LedColor::GREEN));
        assert!(!LedColor::GREEN.contains(LedColor::RED));
        assert!(LedColor::OFF.contains(LedColor::OFF));
    }
}
