//! 流水线集成测试 (feature = "sim")
//!
//! 在 tokio 上驱动完整流水线，用脚本化外设断言端到端行为:
//! 单批端到端、满队列丢弃策略、存储故障致命路径、报表格式、
//! 输出组互斥。窗口经快档配置缩短，整套测试保持在亚秒级。

use std::time::Duration as StdDuration;

use embassy_time::Duration;

use thermolog::config;
use thermolog::hw::console::{emit, Console};
use thermolog::hw::sensor::raw_to_celsius;
use thermolog::hw::sim::{FlashOp, SimConsole, SimFlash, SimLed, SimSampler};
use thermolog::hw::store::StoreError;
use thermolog::TextSink;
use thermolog::pipeline::{PipelineConfig, PipelineResources, TaskError};
use thermolog::tasks;
use thermolog::tasks::report::REPORT_HEADER;

type SimResources = PipelineResources<SimConsole, SimLed>;

/// 快档配置: 2ms 节拍, 10ms 等待窗口
fn fast_config() -> PipelineConfig {
    PipelineConfig {
        tick_period: Duration::from_millis(2),
        wait_ticks: 5,
        max_poll: 8,
        flash_base: config::FLASH_BASE_ADDR,
    }
}

/// 10 组脚本读数, 覆盖正负换算结果
fn ten_tuples() -> Vec<[u32; 4]> {
    vec![
        [1000, 1000, 1000, 1000],
        [1200, 1200, 1200, 1200],
        [1500, 1500, 1500, 1500],
        [1800, 1800, 1800, 1800],
        [2048, 2048, 2048, 2048],
        [2500, 2500, 2500, 2500],
        [3000, 3001, 3002, 3003],
        [3500, 3500, 3500, 3500],
        [4000, 4000, 4000, 4000],
        [4090, 4090, 4090, 4090],
    ]
}

/// 跑完整流水线 `budget` 时长后返回 (任务不会自行结束)
async fn run_pipeline_for(
    resources: &SimResources,
    cfg: &PipelineConfig,
    sampler: SimSampler,
    flash: SimFlash,
    budget: StdDuration,
) {
    let pipeline = async {
        tokio::join!(
            tasks::trigger::run_ticker(resources, cfg.tick_period),
            tasks::sampler::run(resources, cfg, sampler),
            tasks::persist::run(resources, cfg, flash),
            tasks::report::run(resources, cfg),
        )
    };
    tokio::select! {
        _ = pipeline => unreachable!("pipeline tasks never all complete"),
        _ = tokio::time::sleep(budget) => {}
    }
}

#[tokio::test]
async fn end_to_end_single_batch() {
    let cfg = fast_config();
    let resources = SimResources::new(SimConsole::new(), SimLed::new());

    let tuples = ten_tuples();
    let expected: Vec<i32> = tuples.iter().map(|t| raw_to_celsius(*t)).collect();

    let sampler = SimSampler::scripted(tuples);
    let flash = SimFlash::new();
    let flash_ops = flash.ops();

    run_pipeline_for(&resources, &cfg, sampler, flash, StdDuration::from_millis(400)).await;

    // 持久化侧: 恰好一次擦除 + 一次整块编程, 内容为 10 个小端 i32
    let ops = flash_ops.lock().unwrap();
    let mut expected_bytes = Vec::new();
    for v in &expected {
        expected_bytes.extend_from_slice(&v.to_le_bytes());
    }
    assert_eq!(
        ops.as_slice(),
        &[
            FlashOp::Erase(config::FLASH_BASE_ADDR),
            FlashOp::Program(config::FLASH_BASE_ADDR, expected_bytes),
        ]
    );
    drop(ops);

    // 报表侧: 独立观察到同样 10 个值, 顺序一致
    let console = resources.console.lock().await;
    let lines = console.lines();

    let header = lines
        .iter()
        .position(|l| l == REPORT_HEADER)
        .expect("report header missing");
    assert_eq!(lines[header - 1], "");
    for (i, v) in expected.iter().enumerate() {
        assert_eq!(lines[header + 1 + i], format!("[{:02}] {}°C", i + 1, v));
    }
    assert_eq!(lines[header + 11], "");

    // 诊断行编号 01..=10
    for n in 1..=10u32 {
        let diag = format!("[{n:02}] sampler awake");
        assert!(lines.contains(&diag), "missing diagnostic line {diag:?}");
    }

    // 持久化确认行
    assert!(lines.iter().any(|l| l == "flash: committed 10 samples"));

    // 统计: 10 个样本, 各一批
    assert_eq!(resources.stats.samples.get(), 10);
    assert_eq!(resources.stats.commits.get(), 1);
    assert_eq!(resources.stats.reports.get(), 1);
}

#[tokio::test]
async fn stalled_consumers_drop_overflow_samples() {
    let cfg = fast_config();
    let resources = SimResources::new(SimConsole::new(), SimLed::new());

    // 8 组读数, 无消费任务: 每条队列只装得下 4 个
    let tuples: Vec<[u32; 4]> = (0..8u32).map(|i| [1000 + i; 4]).collect();
    let sampler = SimSampler::scripted(tuples);

    let producers = async {
        tokio::join!(
            tasks::trigger::run_ticker(&resources, cfg.tick_period),
            tasks::sampler::run(&resources, &cfg, sampler),
        )
    };
    tokio::select! {
        _ = producers => unreachable!(),
        _ = tokio::time::sleep(StdDuration::from_millis(500)) => {}
    }

    // 有界容量: 队列里至多 4 个未消费样本, 其余被丢弃且被计数
    assert_eq!(resources.store_queue.len(), config::QUEUE_LENGTH);
    assert_eq!(resources.report_queue.len(), config::QUEUE_LENGTH);
    assert_eq!(resources.stats.samples.get(), 8);
    assert_eq!(resources.stats.store_drops.get(), 4);
    assert_eq!(resources.stats.report_drops.get(), 4);

    // 滞留的 4 个按入队顺序可出队
    for i in 0..4u32 {
        assert_eq!(
            resources.store_queue.try_receive().ok(),
            Some(raw_to_celsius([1000 + i; 4]))
        );
    }
}

#[tokio::test]
async fn store_fault_kills_persist_task() {
    let cfg = fast_config();
    let resources = SimResources::new(SimConsole::new(), SimLed::new());

    let mut flash = SimFlash::new();
    flash.fail_next_erase = true;

    // 直接喂满一批, 让持久化任务走到提交
    let feeder = async {
        for v in 0..10 {
            resources.store_queue.send(v).await;
        }
        std::future::pending::<()>().await;
    };

    tokio::select! {
        result = tasks::persist::run(&resources, &cfg, flash) => {
            assert_eq!(
                result.unwrap_err(),
                TaskError::Store(StoreError::EraseFailed)
            );
        }
        _ = feeder => unreachable!(),
        _ = tokio::time::sleep(StdDuration::from_secs(2)) => {
            panic!("persist task did not surface the store fault");
        }
    }
}

#[tokio::test]
async fn timed_out_dequeue_does_not_advance_batch() {
    let cfg = fast_config();
    let resources = SimResources::new(SimConsole::new(), SimLed::new());
    let flash = SimFlash::new();
    let flash_ops = flash.ops();

    // 分两段各喂 5 个, 中间隔出多个空窗超时
    let feeder = async {
        for v in 0..5 {
            resources.store_queue.send(v).await;
        }
        tokio::time::sleep(StdDuration::from_millis(80)).await;
        for v in 5..10 {
            resources.store_queue.send(v).await;
        }
        std::future::pending::<()>().await;
    };

    let persist = tasks::persist::run(&resources, &cfg, flash);
    tokio::select! {
        _ = persist => unreachable!(),
        _ = feeder => unreachable!(),
        _ = tokio::time::sleep(StdDuration::from_millis(300)) => {}
    }

    // 空窗期间批索引未前进: 依然恰好一批, 值连续无陈旧混入
    let ops = flash_ops.lock().unwrap();
    assert_eq!(ops.len(), 2);
    let FlashOp::Program(_, ref bytes) = ops[1] else {
        panic!("second op should be a program");
    };
    let values: Vec<i32> = bytes
        .chunks_exact(4)
        .map(|c| i32::from_le_bytes(c.try_into().unwrap()))
        .collect();
    assert_eq!(values, (0..10).collect::<Vec<i32>>());
}

#[tokio::test]
async fn message_groups_never_interleave() {
    let console: Console<SimConsole> = Console::new(SimConsole::new());
    let window = Duration::from_millis(50);

    let writer = |tag: &'static str| {
        let console = &console;
        async move {
            for group in 0..20 {
                let printed = emit(console, window, |sink| {
                    sink.write_line(format_args!("{tag} {group} begin"));
                    sink.write_line(format_args!("{tag} {group} body"));
                    sink.write_line(format_args!("{tag} {group} end"));
                })
                .await;
                assert!(printed);
                tokio::task::yield_now().await;
            }
        }
    };

    tokio::join!(writer("A"), writer("B"));

    // 每个三行组必须连续且同源
    let console = console.lock().await;
    let lines = console.lines();
    assert_eq!(lines.len(), 120);
    for group in lines.chunks_exact(3) {
        let tag = group[0].split_whitespace().next().unwrap();
        let seq = group[0].split_whitespace().nth(1).unwrap();
        assert_eq!(group[0], format!("{tag} {seq} begin"));
        assert_eq!(group[1], format!("{tag} {seq} body"));
        assert_eq!(group[2], format!("{tag} {seq} end"));
    }
}
