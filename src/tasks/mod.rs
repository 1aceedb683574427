//! 任务模块
//!
//! 流水线的四个执行体，按优先级从高到低:
//! - `trigger`: 周期触发器 (中断级, 仅释放信号)
//! - `sampler`: 采样任务 (任务中最高优先级)
//! - `report`: 报表任务 (中优先级)
//! - `persist`: 持久化任务 (最低优先级)
//!
//! `batch` 提供两个消费任务共用的批缓冲。

pub mod batch;
pub mod persist;
pub mod report;
pub mod sampler;
pub mod trigger;
