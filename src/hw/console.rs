//! 共享文本输出通道
//!
//! 三个任务共用一个行缓冲文本汇 (参考系统中为 UART 控制台)。
//! 汇本身不做并发防护，只允许在持有输出锁期间调用; `emit` 是
//! 唯一的加锁入口，保证一条消息组的行不会与他人交错。

use embassy_time::Duration;

use crate::sync::primitives::{lock_within, CriticalMutex};

/// 文本输出汇窄接口
///
/// 行式输出，假定底层是行缓冲的。只能在持有输出锁时调用。
pub trait TextSink {
    /// 输出一行 (空参数即空行)
    fn write_line(&mut self, args: core::fmt::Arguments<'_>);
}

/// 互斥保护的输出通道
pub type Console<S> = CriticalMutex<S>;

/// 在输出锁下发出一条消息组
///
/// 有界加锁; 窗口内未取得锁返回 `false`，整组消息被跳过。
/// 闭包内只做输出，不得包含任何挂起点，锁区间因此保持最小，
/// 也是输出锁无需优先级继承协议的前提。
pub async fn emit<S, F>(console: &Console<S>, window: Duration, f: F) -> bool
where
    S: TextSink,
    F: FnOnce(&mut S),
{
    match lock_within(console, window).await {
        Some(mut sink) => {
            f(&mut *sink);
            true
        }
        None => false,
    }
}
