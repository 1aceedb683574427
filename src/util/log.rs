//! 条件编译日志系统
//!
//! 根据 feature 选择不同的日志后端:
//! - `log-defmt`: 使用 defmt (高效二进制日志)
//! - `log-facade`: 使用 log 门面 (文本日志, sim 默认启用)
//! - 默认 (release): 完全禁用日志 (零开销)
//!
//! 注意: 这里只承载任务生命周期事件 (启动/致命故障/心跳)。
//! 流水线的可观测输出 (诊断行与报表) 走共享输出通道，不经过日志。
//!
//! # 日志级别
//! - `error!`: 错误信息
//! - `warn!`: 警告信息
//! - `info!`: 一般信息
//! - `debug!`: 调试信息
//! - `trace!`: 详细跟踪

// ===================================================================
// defmt 后端 (feature = "log-defmt")
// ===================================================================
#[cfg(feature = "log-defmt")]
pub use defmt::{info, debug, warn, error, trace};

#[cfg(feature = "log-defmt")]
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => { defmt::info!($($arg)*) };
}

#[cfg(feature = "log-defmt")]
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => { defmt::debug!($($arg)*) };
}

#[cfg(feature = "log-defmt")]
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => { defmt::warn!($($arg)*) };
}

#[cfg(feature = "log-defmt")]
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => { defmt::error!($($arg)*) };
}

#[cfg(feature = "log-defmt")]
#[macro_export]
macro_rules! log_trace {
    ($($arg:tt)*) => { defmt::trace!($($arg)*) };
}

// ===================================================================
// log 门面后端 (feature = "log-facade", defmt 优先)
// ===================================================================
#[cfg(all(feature = "log-facade", not(feature = "log-defmt")))]
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => { log::info!($($arg)*) };
}

#[cfg(all(feature = "log-facade", not(feature = "log-defmt")))]
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => { log::debug!($($arg)*) };
}

#[cfg(all(feature = "log-facade", not(feature = "log-defmt")))]
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => { log::warn!($($arg)*) };
}

#[cfg(all(feature = "log-facade", not(feature = "log-defmt")))]
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => { log::error!($($arg)*) };
}

#[cfg(all(feature = "log-facade", not(feature = "log-defmt")))]
#[macro_export]
macro_rules! log_trace {
    ($($arg:tt)*) => { log::trace!($($arg)*) };
}

// ===================================================================
// 空实现 (无日志 feature)
// ===================================================================
#[cfg(not(any(feature = "log-defmt", feature = "log-facade")))]
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {};
}

#[cfg(not(any(feature = "log-defmt", feature = "log-facade")))]
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {};
}

#[cfg(not(any(feature = "log-defmt", feature = "log-facade")))]
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {};
}

#[cfg(not(any(feature = "log-defmt", feature = "log-facade")))]
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {};
}

#[cfg(not(any(feature = "log-defmt", feature = "log-facade")))]
#[macro_export]
macro_rules! log_trace {
    ($($arg:tt)*) => {};
}

// ===================================================================
// 便捷重导出
// ===================================================================
pub use log_info;
pub use log_debug;
pub use log_warn;
pub use log_error;
pub use log_trace;
