//! 流水线资源束与运行配置
//!
//! 参考系统把队列/信号/锁摆成全局句柄; 这里改为显式资源束:
//! 启动时构造一次，按引用传给各任务入口，生命周期覆盖整个进程，
//! 从不销毁或重建。

use core::fmt;

use embassy_time::Duration;

use crate::config;
use crate::hw::console::{Console, TextSink};
use crate::hw::led::{LedColor, SharedLed, StatusLed};
use crate::hw::sensor::{Celsius, SamplerError};
use crate::hw::store::StoreError;
use crate::sync::primitives::{AtomicCounter, CriticalChannel, CriticalSignal};

/// 流水线运行配置
///
/// 构造期接线参数，带参考系统的默认值。运行中不可重配——
/// 测试用快档变体只是另造一份配置再启动。
#[derive(Debug, Clone, Copy)]
pub struct PipelineConfig {
    /// 触发节拍周期
    pub tick_period: Duration,
    /// 有界等待窗口 (节拍数)
    pub wait_ticks: u32,
    /// 转换完成轮询上限
    pub max_poll: u32,
    /// 持久化块基地址
    pub flash_base: u32,
}

impl PipelineConfig {
    /// 有界等待窗口时长 (wait_ticks 个节拍周期)
    pub fn wait_window(&self) -> Duration {
        self.tick_period * self.wait_ticks
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            tick_period: Duration::from_hz(config::TICK_HZ),
            wait_ticks: config::TICKS_TO_WAIT,
            max_poll: config::MAX_CONVERSION_POLLS,
            flash_base: config::FLASH_BASE_ADDR,
        }
    }
}

/// 流水线运行统计
///
/// 全部为 Relaxed 原子计数; 有界等待超时在参考系统里被静默吞掉，
/// 这里至少计数，供心跳日志观察。
pub struct PipelineStats {
    /// 成功产出的样本数
    pub samples: AtomicCounter,
    /// 信号等待超时 (错过的触发周期)
    pub tick_misses: AtomicCounter,
    /// 输出锁超时 (被跳过的消息组)
    pub lock_misses: AtomicCounter,
    /// 持久化队列入队超时丢弃
    pub store_drops: AtomicCounter,
    /// 报表队列入队超时丢弃
    pub report_drops: AtomicCounter,
    /// 已提交的持久化批数
    pub commits: AtomicCounter,
    /// 已输出的报表批数
    pub reports: AtomicCounter,
}

impl PipelineStats {
    pub const fn new() -> Self {
        Self {
            samples: AtomicCounter::new(),
            tick_misses: AtomicCounter::new(),
            lock_misses: AtomicCounter::new(),
            store_drops: AtomicCounter::new(),
            report_drops: AtomicCounter::new(),
            commits: AtomicCounter::new(),
            reports: AtomicCounter::new(),
        }
    }
}

impl Default for PipelineStats {
    fn default() -> Self {
        Self::new()
    }
}

/// 流水线共享资源束
///
/// 两条队列各连接恰好两方 (采样任务与其消费者)；触发信号由
/// 中断边界写、采样任务读；输出通道是唯一的三方资源。
pub struct PipelineResources<S: TextSink, L: StatusLed> {
    /// 持久化队列 (采样 → 持久化任务)
    pub store_queue: CriticalChannel<Celsius, { config::QUEUE_LENGTH }>,
    /// 报表队列 (采样 → 报表任务)
    pub report_queue: CriticalChannel<Celsius, { config::QUEUE_LENGTH }>,
    /// 触发信号 (中断边界 → 采样任务)
    pub tick: CriticalSignal<()>,
    /// 互斥保护的输出通道
    pub console: Console<S>,
    /// 共享状态灯
    pub led: SharedLed<L>,
    /// 运行统计
    pub stats: PipelineStats,
}

impl<S: TextSink, L: StatusLed> PipelineResources<S, L> {
    /// 构造资源束，启动时调用一次
    ///
    /// 启动即把指示灯置为熄灭 (空闲态的唯一动作)。
    pub fn new(sink: S, mut led: L) -> Self {
        led.set(LedColor::OFF);
        Self {
            store_queue: CriticalChannel::new(),
            report_queue: CriticalChannel::new(),
            tick: CriticalSignal::new(),
            console: Console::new(sink),
            led: SharedLed::new(led),
            stats: PipelineStats::new(),
        }
    }
}

/// 任务致命错误
///
/// 任务循环唯一的退出路径: 硬件故障。有界等待超时不会走到这里。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "log-defmt", derive(defmt::Format))]
pub enum TaskError {
    /// 采样器故障
    Sampler(SamplerError),
    /// 存储故障
    Store(StoreError),
}

impl fmt::Display for TaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sampler(e) => write!(f, "sampler fault: {e}"),
            Self::Store(e) => write!(f, "store fault: {e}"),
        }
    }
}

impl core::error::Error for TaskError {}

impl From<SamplerError> for TaskError {
    fn from(e: SamplerError) -> Self {
        Self::Sampler(e)
    }
}

impl From<StoreError> for TaskError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_reference_values() {
        let cfg = PipelineConfig::default();
        assert_eq!(cfg.tick_period, Duration::from_millis(200));
        assert_eq!(cfg.wait_ticks, 5);
        assert_eq!(cfg.flash_base, 0x10000);
        assert_eq!(cfg.wait_window(), Duration::from_millis(1000));
    }

    #[test]
    fn task_error_wraps_sources() {
        let e: TaskError = SamplerError::ConversionTimeout.into();
        assert_eq!(e, TaskError::Sampler(SamplerError::ConversionTimeout));
        let e: TaskError = StoreError::EraseFailed.into();
        assert_eq!(e, TaskError::Store(StoreError::EraseFailed));
    }
}
