//! 主机模拟外设 (feature = "sim")
//!
//! 演示程序与测试共用的脚本化外设。记录型外设把历史放在
//! `Arc<Mutex<..>>` 里，测试侧保留一个句柄即可在任务结束后断言。

use std::sync::{Arc, Mutex};
use std::vec::Vec;

use crate::config::SEQUENCE_STEPS;
use crate::hw::console::TextSink;
use crate::hw::led::{LedColor, StatusLed};
use crate::hw::sensor::{AnalogSampler, SampleSource, SamplerError};
use crate::hw::store::{BlockStore, StoreError};

// ===== 模拟采样器 =====

/// 脚本化模拟采样器
///
/// 每次 `start` 消耗脚本中的下一组原始 4 元组; 脚本耗尽后
/// 转换永远不就绪，流水线经由 `ConversionTimeout` 故障路径收尾。
/// 循环模式 (`cycle`) 供演示程序持续产出。
pub struct SimSampler {
    script: Vec<[u32; SEQUENCE_STEPS]>,
    next: usize,
    repeat: bool,
    current: [u32; SEQUENCE_STEPS],
    ready: bool,
    configured: Option<(u32, Vec<SampleSource>)>,
}

impl SimSampler {
    /// 有限脚本: 逐组消耗，耗尽后永不就绪
    pub fn scripted(script: Vec<[u32; SEQUENCE_STEPS]>) -> Self {
        Self {
            script,
            next: 0,
            repeat: false,
            current: [0; SEQUENCE_STEPS],
            ready: false,
            configured: None,
        }
    }

    /// 循环脚本: 到尾后从头再来
    pub fn cycle(script: Vec<[u32; SEQUENCE_STEPS]>) -> Self {
        Self {
            repeat: true,
            ..Self::scripted(script)
        }
    }

    /// 查询配置记录 (过采样系数, 序列步)
    pub fn configured(&self) -> Option<&(u32, Vec<SampleSource>)> {
        self.configured.as_ref()
    }
}

impl AnalogSampler for SimSampler {
    fn configure(&mut self, oversample: u32, steps: &[SampleSource]) -> Result<(), SamplerError> {
        if steps.is_empty() || steps.len() > SEQUENCE_STEPS {
            return Err(SamplerError::InvalidConfig);
        }
        self.configured = Some((oversample, steps.to_vec()));
        Ok(())
    }

    fn start(&mut self) {
        if self.repeat && !self.script.is_empty() {
            self.next %= self.script.len();
        }
        match self.script.get(self.next) {
            Some(raw) => {
                self.current = *raw;
                self.next += 1;
                self.ready = true;
            }
            None => self.ready = false,
        }
    }

    fn poll_ready(&mut self) -> bool {
        self.ready
    }

    fn read_raw(&mut self) -> [u32; SEQUENCE_STEPS] {
        self.ready = false;
        self.current
    }
}

// ===== 模拟块存储 =====

/// 一次存储操作的记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlashOp {
    Erase(u32),
    Program(u32, Vec<u8>),
}

/// 记录型模拟块存储
pub struct SimFlash {
    ops: Arc<Mutex<Vec<FlashOp>>>,
    /// 置位后下一次擦除返回错误 (测试故障路径)
    pub fail_next_erase: bool,
}

impl SimFlash {
    pub fn new() -> Self {
        Self {
            ops: Arc::new(Mutex::new(Vec::new())),
            fail_next_erase: false,
        }
    }

    /// 操作历史句柄，可在实例移交给任务后继续观察
    pub fn ops(&self) -> Arc<Mutex<Vec<FlashOp>>> {
        Arc::clone(&self.ops)
    }
}

impl Default for SimFlash {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockStore for SimFlash {
    fn erase(&mut self, base: u32) -> Result<(), StoreError> {
        if self.fail_next_erase {
            self.fail_next_erase = false;
            return Err(StoreError::EraseFailed);
        }
        self.ops.lock().unwrap().push(FlashOp::Erase(base));
        Ok(())
    }

    fn program(&mut self, base: u32, bytes: &[u8]) -> Result<(), StoreError> {
        self.ops
            .lock()
            .unwrap()
            .push(FlashOp::Program(base, bytes.to_vec()));
        Ok(())
    }
}

// ===== 模拟控制台 =====

/// 记录型文本汇
///
/// 整行记录; `stdout` 模式同时镜像到标准输出 (演示程序用)。
pub struct SimConsole {
    lines: Vec<String>,
    mirror: bool,
}

impl SimConsole {
    /// 仅记录 (测试用)
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            mirror: false,
        }
    }

    /// 记录并镜像到标准输出
    pub fn stdout() -> Self {
        Self {
            lines: Vec::new(),
            mirror: true,
        }
    }

    /// 已输出的行
    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl Default for SimConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl TextSink for SimConsole {
    fn write_line(&mut self, args: core::fmt::Arguments<'_>) {
        let line = args.to_string();
        if self.mirror {
            println!("{line}");
        }
        self.lines.push(line);
    }
}

// ===== 模拟指示灯 =====

/// 记录型状态灯
pub struct SimLed {
    history: Arc<Mutex<Vec<LedColor>>>,
}

impl SimLed {
    pub fn new() -> Self {
        Self {
            history: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// 颜色历史句柄
    pub fn history(&self) -> Arc<Mutex<Vec<LedColor>>> {
        Arc::clone(&self.history)
    }
}

impl Default for SimLed {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusLed for SimLed {
    fn set(&mut self, color: LedColor) {
        self.history.lock().unwrap().push(color);
    }
}
