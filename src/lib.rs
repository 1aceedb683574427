//! thermolog - 周期温度采样流水线
//!
//! 基于 Embassy 异步运行时的固件采样管线:
//! - 周期中断触发 (饱和二值信号, 5Hz)
//! - 采样任务: ADC 序列转换 + 定点温度换算
//! - 两条有界队列分别供给持久化与报表两个消费任务
//! - 互斥保护的共享文本输出通道 (无优先级反转)
//!
//! 所有挂起点均为有界等待 (见 `sync::primitives`)，超时按组件策略
//! 就地处理，绝不无限阻塞。外设 (ADC / Flash / 串口 / LED) 通过
//! `hw` 模块的窄接口注入，寄存器序列不在本库范围内。

#![cfg_attr(not(feature = "sim"), no_std)]

pub mod hw;
pub mod pipeline;
pub mod sync;
pub mod tasks;
pub mod util;

// ===== 重导出常用类型 =====
pub use sync::primitives::{
    CriticalMutex,
    CriticalSignal,
    CriticalChannel,
};
pub use hw::sensor::{AnalogSampler, Celsius, SampleSource, SamplerError};
pub use hw::store::{BlockStore, StoreError};
pub use hw::console::TextSink;
pub use hw::led::{LedColor, StatusLed};
pub use pipeline::{PipelineConfig, PipelineResources, PipelineStats, TaskError};

// ===== 版本信息 =====
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// 系统配置常量
pub mod config {
    /// 队列容量 (每条队列最多 4 个未消费样本)
    pub const QUEUE_LENGTH: usize = 4;

    /// 批缓冲容量 (攒满 10 个样本后整批落盘/输出)
    pub const BUFFER_SIZE: usize = 10;

    /// ADC 序列步数 (末步置位完成标志并结束序列)
    pub const SEQUENCE_STEPS: usize = 4;

    /// ADC 硬件过采样系数
    pub const OVERSAMPLE_FACTOR: u32 = 64;

    /// 触发节拍频率 (Hz)
    pub const TICK_HZ: u64 = 5;

    /// 有界等待窗口 (节拍数)
    pub const TICKS_TO_WAIT: u32 = 5;

    /// 转换完成轮询上限 (超过即判定硬件故障)
    pub const MAX_CONVERSION_POLLS: u32 = 100_000;

    /// 持久化区域基地址 (单个可覆写块, 先擦后写)
    pub const FLASH_BASE_ADDR: u32 = 0x10000;

    /// 持久化任务优先级 (最低)
    pub const PERSIST_TASK_PRIORITY: u8 = 1;

    /// 报表任务优先级 (中)
    pub const REPORT_TASK_PRIORITY: u8 = 2;

    /// 采样任务优先级 (任务中最高; 触发器运行于中断级)
    pub const SAMPLER_TASK_PRIORITY: u8 = 3;
}
