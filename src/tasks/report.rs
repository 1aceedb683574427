//! 报表任务 (中优先级)
//!
//! 与持久化任务结构相同的攒批循环，刷出动作换成一次锁内的
//! 多行人读报表: 空行、表头、每样本一行 (1 起始两位序号 +
//! 单位后缀)、再一个空行。整组在一次加锁内完成，不会与其他
//! 任务的输出交错。

use core::convert::Infallible;

use crate::config::BUFFER_SIZE;
use crate::hw::console::{emit, TextSink};
use crate::hw::led::{LedColor, StatusLed};
use crate::hw::sensor::Celsius;
use crate::pipeline::{PipelineConfig, PipelineResources, TaskError};
use crate::sync::primitives::recv_within;
use crate::tasks::batch::Batch;
use crate::util::log::*;

/// 报表表头行
pub const REPORT_HEADER: &str = "temperature report";

/// 报表任务主循环
///
/// 锁超时则整组报表被跳过 (计数), 批照常清空, 下一批重新攒。
pub async fn run<S, L>(
    resources: &PipelineResources<S, L>,
    config: &PipelineConfig,
) -> Result<Infallible, TaskError>
where
    S: TextSink,
    L: StatusLed,
{
    log_info!("report task started");

    let window = config.wait_window();
    let mut batch: Batch<Celsius, BUFFER_SIZE> = Batch::new();

    loop {
        // 超时: 队列空, 本迭代不动批
        let Some(value) = recv_within(&resources.report_queue, window).await else {
            continue;
        };

        resources.led.set(LedColor::BLUE);

        if batch.push(value) {
            let printed = emit(&resources.console, window, |sink| {
                sink.write_line(format_args!(""));
                sink.write_line(format_args!("{REPORT_HEADER}"));
                for (index, sample) in batch.as_slice().iter().enumerate() {
                    sink.write_line(format_args!("[{:02}] {}°C", index + 1, sample));
                }
                sink.write_line(format_args!(""));
            })
            .await;
            if !printed {
                resources.stats.lock_misses.increment();
            }

            resources.stats.reports.increment();
            batch.reset();
        }
    }
}
