//! 同步原语封装
//!
//! 基于 embassy-sync 提供的同步原语，统一使用 CriticalSectionRawMutex，
//! 保证在单核嵌入式目标与主机模拟环境下行为一致。
//!
//! 系统中所有任务侧挂起点都是有界等待: 操作在窗口内完成即成功，
//! 否则按调用方策略视为本次失败。本模块的 `*_within` 函数是唯一的
//! 有界等待入口，任务代码不直接调用无界的 `send`/`receive`/`lock`。

use embassy_sync::{
    blocking_mutex::raw::CriticalSectionRawMutex,
    signal::Signal,
    channel::Channel,
    mutex::{Mutex, MutexGuard},
};
use embassy_time::{with_timeout, Duration};

// ===== 类型别名: 简化使用 =====

/// 临界区信号 - 饱和二值通知
///
/// 发送方 (可处于中断上下文) 调用 `signal()` 释放一个就绪单元，
/// 接收方异步等待。单元至多挂起一个: 未消费前的重复释放被合并，
/// 这是设计的溢出策略而非错误。
///
/// # Example
/// ```ignore
/// static TICK: CriticalSignal<()> = CriticalSignal::new();
///
/// // 中断侧: 非阻塞释放
/// TICK.signal(());
///
/// // 任务侧: 有界等待
/// let fired = wait_within(&TICK, window).await.is_some();
/// ```
pub type CriticalSignal<T> = Signal<CriticalSectionRawMutex, T>;

/// 临界区通道 - 有界 FIFO 队列
///
/// 固定容量，出队顺序严格等于入队顺序。本系统中每条队列
/// 只有一个生产者 (采样任务) 和一个消费者 (对应的下游任务)。
///
/// # Type Parameters
/// * `T` - 消息类型
/// * `N` - 队列容量
pub type CriticalChannel<T, const N: usize> = Channel<CriticalSectionRawMutex, T, N>;

/// 临界区互斥锁 - 异步互斥访问
///
/// 保护共享输出通道。唤醒按等待顺序进行，且持锁方在持锁期间
/// 不执行任何其他有界等待 (锁区间只做输出)，两者共同避免
/// 高优先级任务被低优先级持锁方间接压制。
pub type CriticalMutex<T> = Mutex<CriticalSectionRawMutex, T>;

// ===== 便捷构造函数 =====

/// 创建新的信号
#[inline]
pub const fn new_signal<T: Send>() -> CriticalSignal<T> {
    Signal::new()
}

/// 创建新的通道
#[inline]
pub const fn new_channel<T, const N: usize>() -> CriticalChannel<T, N> {
    Channel::new()
}

/// 创建新的互斥锁
#[inline]
pub const fn new_mutex<T>(value: T) -> CriticalMutex<T> {
    Mutex::new(value)
}

// ===== 有界等待 =====

/// 有界入队
///
/// 队列满时最多等待 `window`; 超时返回 `false`，消息被丢弃。
pub async fn send_within<T, const N: usize>(
    channel: &CriticalChannel<T, N>,
    value: T,
    window: Duration,
) -> bool {
    with_timeout(window, channel.send(value)).await.is_ok()
}

/// 有界出队
///
/// 队列空时最多等待 `window`; 超时返回 `None`。
pub async fn recv_within<T, const N: usize>(
    channel: &CriticalChannel<T, N>,
    window: Duration,
) -> Option<T> {
    with_timeout(window, channel.receive()).await.ok()
}

/// 有界等待信号
///
/// 窗口内无释放则返回 `None`; 成功消费恰好一个就绪单元。
pub async fn wait_within<T: Send>(
    signal: &CriticalSignal<T>,
    window: Duration,
) -> Option<T> {
    with_timeout(window, signal.wait()).await.ok()
}

/// 有界加锁
///
/// 窗口内未取得锁则返回 `None`，调用方跳过本次输出。
pub async fn lock_within<T>(
    mutex: &CriticalMutex<T>,
    window: Duration,
) -> Option<MutexGuard<'_, CriticalSectionRawMutex, T>> {
    with_timeout(window, mutex.lock()).await.ok()
}

// ===== 在临界区中执行闭包 =====

/// 禁用中断确保原子性，仅用于非常短的操作
///
/// # Warning
/// 临界区内不能执行任何异步操作或长时间计算
#[inline]
pub fn with_critical_section<R, F>(f: F) -> R
where
    F: FnOnce(critical_section::CriticalSection) -> R,
{
    critical_section::with(f)
}

// ===== 优化的原子操作封装 =====

use portable_atomic::{AtomicU64, Ordering};

/// 原子计数器 - 用于统计和序列号
pub struct AtomicCounter {
    count: AtomicU64,
}

impl AtomicCounter {
    /// 创建新的计数器
    pub const fn new() -> Self {
        Self {
            count: AtomicU64::new(0),
        }
    }

    /// 增加并返回新值
    #[inline(always)]
    pub fn increment(&self) -> u64 {
        self.count.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// 获取当前值
    #[inline(always)]
    pub fn get(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    /// 重置为 0
    #[inline(always)]
    pub fn reset(&self) {
        self.count.store(0, Ordering::Relaxed);
    }
}

impl Default for AtomicCounter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(all(test, feature = "sim"))]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(10);

    #[tokio::test]
    async fn channel_preserves_fifo_order() {
        let ch: CriticalChannel<i32, 4> = new_channel();

        for v in [87, 23, -5, 41] {
            assert!(send_within(&ch, v, WINDOW).await);
        }
        for v in [87, 23, -5, 41] {
            assert_eq!(recv_within(&ch, WINDOW).await, Some(v));
        }
    }

    #[tokio::test]
    async fn channel_rejects_fifth_enqueue() {
        let ch: CriticalChannel<i32, 4> = new_channel();

        for v in 0..4 {
            assert!(send_within(&ch, v, WINDOW).await);
        }
        // 第 5 次入队必须超时而非成功
        assert!(!send_within(&ch, 4, WINDOW).await);
        assert_eq!(ch.len(), 4);

        // 腾出一格后入队恢复
        assert_eq!(recv_within(&ch, WINDOW).await, Some(0));
        assert!(send_within(&ch, 4, WINDOW).await);
    }

    #[tokio::test]
    async fn empty_dequeue_times_out() {
        let ch: CriticalChannel<i32, 4> = new_channel();
        assert_eq!(recv_within(&ch, WINDOW).await, None);
    }

    #[tokio::test]
    async fn signal_saturates_repeated_releases() {
        let signal: CriticalSignal<()> = new_signal();

        // 连续两次释放只保留一个就绪单元
        signal.signal(());
        signal.signal(());

        assert_eq!(wait_within(&signal, WINDOW).await, Some(()));
        assert_eq!(wait_within(&signal, WINDOW).await, None);
    }

    #[tokio::test]
    async fn lock_within_times_out_while_held() {
        let mutex: CriticalMutex<u32> = new_mutex(0);

        let guard = mutex.lock().await;
        assert!(lock_within(&mutex, WINDOW).await.is_none());
        drop(guard);
        assert!(lock_within(&mutex, WINDOW).await.is_some());
    }

    #[test]
    fn counter_increments_and_resets() {
        let counter = AtomicCounter::new();
        assert_eq!(counter.increment(), 1);
        assert_eq!(counter.increment(), 2);
        assert_eq!(counter.get(), 2);
        counter.reset();
        assert_eq!(counter.get(), 0);
    }
}
