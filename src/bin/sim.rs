//! thermolog 主机模拟演示程序
//!
//! 在 std 执行器上跑完整流水线: 周期触发 → 采样 → 双队列 →
//! 持久化 + 报表。采样器用循环脚本持续产出，默认节拍 5Hz，
//! 每 2 秒落一批盘、出一份报表。
//!
//! 硬件部署时把这里的模拟外设换成目标平台适配器，并按
//! `thermolog::config` 里的优先级把三个任务挂到各自的
//! 中断执行器上 (持久化最低、报表居中、采样最高)。

use embassy_executor::Executor;
use embassy_time::{Duration, Timer};
use static_cell::StaticCell;

use thermolog::hw::sim::{SimConsole, SimFlash, SimLed, SimSampler};
use thermolog::pipeline::{PipelineConfig, PipelineResources};
use thermolog::tasks;
use thermolog::util::log::*;

type SimResources = PipelineResources<SimConsole, SimLed>;

// ===== 静态分配 =====
static EXECUTOR: StaticCell<Executor> = StaticCell::new();
static RESOURCES: StaticCell<SimResources> = StaticCell::new();

// ===== 具象任务包装 =====

#[embassy_executor::task]
async fn ticker_task(resources: &'static SimResources, period: Duration) {
    tasks::trigger::run_ticker(resources, period).await
}

#[embassy_executor::task]
async fn sampler_task(
    resources: &'static SimResources,
    config: PipelineConfig,
    sampler: SimSampler,
) {
    if let Err(e) = tasks::sampler::run(resources, &config, sampler).await {
        log_error!("sampler task stopped: {e}");
    }
}

#[embassy_executor::task]
async fn persist_task(resources: &'static SimResources, config: PipelineConfig, flash: SimFlash) {
    if let Err(e) = tasks::persist::run(resources, &config, flash).await {
        log_error!("persist task stopped: {e}");
    }
}

#[embassy_executor::task]
async fn report_task(resources: &'static SimResources, config: PipelineConfig) {
    if let Err(e) = tasks::report::run(resources, &config).await {
        log_error!("report task stopped: {e}");
    }
}

#[embassy_executor::task]
async fn heartbeat_task(resources: &'static SimResources) {
    loop {
        Timer::after(Duration::from_secs(10)).await;
        let stats = &resources.stats;
        log_info!(
            "heartbeat: samples={} commits={} reports={} drops={}/{} misses={}/{}",
            stats.samples.get(),
            stats.commits.get(),
            stats.reports.get(),
            stats.store_drops.get(),
            stats.report_drops.get(),
            stats.tick_misses.get(),
            stats.lock_misses.get(),
        );
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!();
    println!("Welcome to the {} demo! (v{})", thermolog::NAME, thermolog::VERSION);

    // ========================================
    // 1. 外设与配置
    // ========================================
    let config = PipelineConfig::default();

    // 循环脚本: 覆盖常温到高温 (含换算为负数的读数)
    let sampler = SimSampler::cycle(vec![
        [1000, 1000, 1000, 1000],
        [1500, 1500, 1500, 1500],
        [2048, 2048, 2048, 2048],
        [2500, 2500, 2500, 2500],
        [3000, 3001, 3002, 3003],
        [4090, 4090, 4090, 4090],
    ]);
    let flash = SimFlash::new();

    // ========================================
    // 2. 资源束 (进程级, 构造一次)
    // ========================================
    let resources = RESOURCES.init(PipelineResources::new(SimConsole::stdout(), SimLed::new()));

    log_info!(
        "pipeline configured: tick={}ms window={}ms base=0x{:05x}",
        config.tick_period.as_millis(),
        config.wait_window().as_millis(),
        config.flash_base,
    );

    // ========================================
    // 3. 执行器启动 (不返回)
    // ========================================
    let executor = EXECUTOR.init(Executor::new());
    executor.run(|spawner| {
        spawner.must_spawn(ticker_task(resources, config.tick_period));
        spawner.must_spawn(sampler_task(resources, config, sampler));
        spawner.must_spawn(report_task(resources, config));
        spawner.must_spawn(persist_task(resources, config, flash));
        spawner.must_spawn(heartbeat_task(resources));
    });
}
