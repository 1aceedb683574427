//! 外设窄接口模块
//!
//! 流水线核心只通过这里定义的 trait 接触外设，寄存器序列由
//! 各目标平台的适配器自行实现:
//! - `sensor`: 模拟采样器 (ADC 序列) 与定点温度换算
//! - `store`: 持久化块存储 (整块先擦后写)
//! - `console`: 共享文本输出通道
//! - `led`: 状态指示灯 (仅观测用途)
//! - `sim`: 主机模拟外设 (feature = "sim")

pub mod console;
pub mod led;
pub mod sensor;
pub mod store;

#[cfg(feature = "sim")]
pub mod sim;
