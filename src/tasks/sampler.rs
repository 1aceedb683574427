//! 采样任务 (任务中最高优先级)
//!
//! 每个触发周期: 有界等待信号 → 锁内发一行诊断 → 红灯 →
//! 触发 ADC 序列并有界轮询 → 定点换算 → 向两条队列各做一次
//! 有界入队。任一入队超时只丢弃该目的地的这份样本，不重试。

use core::convert::Infallible;

use crate::config::{BUFFER_SIZE, OVERSAMPLE_FACTOR, SEQUENCE_STEPS};
use crate::hw::console::{emit, TextSink};
use crate::hw::led::{LedColor, StatusLed};
use crate::hw::sensor::{raw_to_celsius, wait_conversion, AnalogSampler, SampleSource};
use crate::pipeline::{PipelineConfig, PipelineResources, TaskError};
use crate::sync::primitives::{send_within, wait_within};
use crate::util::log::*;

/// 采样任务主循环
///
/// 启动时配置一次采样器 (过采样 64, 4 步序列, 末步结束并置位
/// 完成标志)，此后循环直到硬件故障。正常路径永不返回。
pub async fn run<A, S, L>(
    resources: &PipelineResources<S, L>,
    config: &PipelineConfig,
    mut sampler: A,
) -> Result<Infallible, TaskError>
where
    A: AnalogSampler,
    S: TextSink,
    L: StatusLed,
{
    sampler.configure(
        OVERSAMPLE_FACTOR,
        &[SampleSource::DieTemperature; SEQUENCE_STEPS],
    )?;
    log_info!("sampler task started (oversample={})", OVERSAMPLE_FACTOR);

    let window = config.wait_window();
    let mut cycle: u32 = 0;

    loop {
        // 信号超时: 本周期没有触发, 跳过
        if wait_within(&resources.tick, window).await.is_none() {
            resources.stats.tick_misses.increment();
            continue;
        }

        // 诊断行编号按批容量回绕 (01..=10)
        cycle += 1;
        let printed = emit(&resources.console, window, |sink| {
            sink.write_line(format_args!("[{cycle:02}] sampler awake"));
        })
        .await;
        if !printed {
            resources.stats.lock_misses.increment();
        }
        if cycle >= BUFFER_SIZE as u32 {
            cycle = 0;
        }

        resources.led.set(LedColor::RED);

        // 转换序列: 触发后有界轮询, 耗尽即硬件故障
        sampler.start();
        wait_conversion(&mut sampler, config.max_poll)?;
        let raw = sampler.read_raw();
        let celsius = raw_to_celsius(raw);
        resources.stats.samples.increment();

        // 双发布: 两条队列独立入队, 各自超时各自丢弃
        if !send_within(&resources.store_queue, celsius, window).await {
            resources.stats.store_drops.increment();
        }
        if !send_within(&resources.report_queue, celsius, window).await {
            resources.stats.report_drops.increment();
        }
    }
}
