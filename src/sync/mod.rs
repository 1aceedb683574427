//! 同步原语模块
//!
//! 提供线程安全的同步原语，基于 embassy-sync 封装:
//! - `CriticalSignal`: 饱和二值信号 (中断安全释放)
//! - `CriticalChannel`: 有界 FIFO 队列
//! - `CriticalMutex`: 异步互斥锁
//! - 有界等待辅助函数 (`send_within` / `recv_within` / `wait_within` / `lock_within`)

pub mod primitives;

pub use primitives::{CriticalSignal, CriticalChannel, CriticalMutex};
