//! 周期触发器
//!
//! 中断侧的全部工作就是一次非阻塞的信号释放。释放是饱和的:
//! 上一个就绪单元尚未被采样任务消费时，新的释放被静默合并——
//! 这是设计的溢出策略，不是错误。

use embassy_time::{Duration, Ticker};

use crate::hw::console::TextSink;
use crate::hw::led::StatusLed;
use crate::pipeline::PipelineResources;
use crate::sync::primitives::CriticalSignal;

/// 触发器句柄
///
/// `fire` 是中断上下文允许的唯一操作: 在临界区内置位信号，
/// 不挂起、不加锁、不触碰输出通道。
pub struct TickTrigger<'a> {
    tick: &'a CriticalSignal<()>,
}

impl<'a> TickTrigger<'a> {
    pub fn new(tick: &'a CriticalSignal<()>) -> Self {
        Self { tick }
    }

    /// 释放一个就绪单元 (非阻塞, 中断安全, 饱和)
    #[inline(always)]
    pub fn fire(&self) {
        self.tick.signal(());
    }
}

/// 中断模拟边界: 按节拍周期驱动触发器
///
/// 循环体除了等节拍和 `fire` 之外不做任何事，保持与真实
/// tick 中断相同的约束。
pub async fn run_ticker<S, L>(resources: &PipelineResources<S, L>, period: Duration) -> !
where
    S: TextSink,
    L: StatusLed,
{
    let trigger = TickTrigger::new(&resources.tick);
    let mut ticker = Ticker::every(period);
    loop {
        ticker.next().await;
        trigger.fire();
    }
}
