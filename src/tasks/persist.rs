//! 持久化任务 (最低优先级)
//!
//! 有界出队 → 攒批 → 满批时对基地址先擦后写一次性提交整块，
//! 随后在锁内发确认消息并清空批。出队超时的迭代是空操作:
//! 批索引不前进，不会有陈旧值混入。

use core::convert::Infallible;

use crate::config::BUFFER_SIZE;
use crate::hw::console::{emit, TextSink};
use crate::hw::led::{LedColor, StatusLed};
use crate::hw::sensor::Celsius;
use crate::hw::store::{batch_bytes, BlockStore};
use crate::pipeline::{PipelineConfig, PipelineResources, TaskError};
use crate::sync::primitives::recv_within;
use crate::tasks::batch::Batch;
use crate::util::log::*;

/// 持久化任务主循环
///
/// 存储故障是致命的, 直接上抛结束任务; 有界等待超时只计数。
pub async fn run<B, S, L>(
    resources: &PipelineResources<S, L>,
    config: &PipelineConfig,
    mut store: B,
) -> Result<Infallible, TaskError>
where
    B: BlockStore,
    S: TextSink,
    L: StatusLed,
{
    log_info!("persist task started (base=0x{:05x})", config.flash_base);

    let window = config.wait_window();
    let mut batch: Batch<Celsius, BUFFER_SIZE> = Batch::new();

    loop {
        // 超时: 队列空, 本迭代不动批
        let Some(value) = recv_within(&resources.store_queue, window).await else {
            continue;
        };

        resources.led.set(LedColor::GREEN);

        if batch.push(value) {
            // 整块提交: 先擦后写, 覆写上一批
            store.erase(config.flash_base)?;
            store.program(config.flash_base, &batch_bytes(batch.as_slice()))?;

            let printed = emit(&resources.console, window, |sink| {
                sink.write_line(format_args!("flash: committed {} samples", batch.len()));
                sink.write_line(format_args!(""));
            })
            .await;
            if !printed {
                resources.stats.lock_misses.increment();
            }

            resources.stats.commits.increment();
            batch.reset();
        }
    }
}
