//! 模拟采样器接口与温度换算
//!
//! 采样任务通过 `AnalogSampler` 驱动一次 4 步 ADC 序列转换，
//! 轮询完成标志后读回原始值，再用 `raw_to_celsius` 做定点换算。
//! 转换始终是同步/轮询式的，不使用中断完成通知。

use core::fmt;

use crate::config::SEQUENCE_STEPS;

/// 工程单位温度值 (整数摄氏度)
///
/// 有符号: 换算链的末步 `1475 - scaled` 在高温读数下为负，
/// 无符号实现会回绕成天文数字。
pub type Celsius = i32;

/// ADC 序列单步的采样源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "log-defmt", derive(defmt::Format))]
pub enum SampleSource {
    /// 片上温度传感器
    DieTemperature,
}

/// 采样器错误
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "log-defmt", derive(defmt::Format))]
pub enum SamplerError {
    /// 序列配置非法 (步数为 0 或超出序列器容量)
    InvalidConfig,
    /// 轮询上限内转换未完成 (硬件卡死)
    ConversionTimeout,
}

impl fmt::Display for SamplerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig => write!(f, "invalid sampler sequence config"),
            Self::ConversionTimeout => write!(f, "conversion did not complete within poll budget"),
        }
    }
}

impl core::error::Error for SamplerError {}

/// 模拟采样器窄接口
///
/// 约定: `configure` 在任务启动时调用一次；`steps` 的末项隐含
/// 结束序列并置位完成标志的语义 (对应序列器的 IE|END 步)。
/// 此后每个采样周期按 `start` → 轮询 `poll_ready` → `read_raw`
/// 的顺序使用。
pub trait AnalogSampler {
    /// 配置硬件过采样系数与转换序列，仅启动时调用一次
    fn configure(&mut self, oversample: u32, steps: &[SampleSource]) -> Result<(), SamplerError>;

    /// 清除完成标志并触发一次序列转换 (非阻塞)
    fn start(&mut self);

    /// 单次非阻塞查询转换是否完成
    fn poll_ready(&mut self) -> bool;

    /// 读回整个序列的原始转换值
    fn read_raw(&mut self) -> [u32; SEQUENCE_STEPS];
}

/// 有界轮询等待转换完成
///
/// 最多查询 `max_poll` 次; 耗尽后判定为硬件故障返回
/// `ConversionTimeout`，由采样任务作为致命错误上抛。
pub fn wait_conversion<A: AnalogSampler>(sampler: &mut A, max_poll: u32) -> Result<(), SamplerError> {
    for _ in 0..max_poll {
        if sampler.poll_ready() {
            return Ok(());
        }
    }
    Err(SamplerError::ConversionTimeout)
}

/// 原始读数到摄氏度的定点换算
///
/// 按传感器手册的换算式逐步截断求值，顺序不可调整:
/// 求和时 +2 做四舍五入。禁止改写为浮点形式，会改变可观测输出。
pub fn raw_to_celsius(raw: [u32; SEQUENCE_STEPS]) -> Celsius {
    let average = (raw[0] + raw[1] + raw[2] + raw[3] + 2) / 4;
    let scaled = (2475 * average) / 4096;
    (1475 - scaled as i32) / 10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formula_matches_truncating_chain() {
        // 每组: 原始 4 元组 → 手算的截断链结果
        // [4090;4]: avg=4090, scaled=2471, (1475-2471)/10 = -99
        assert_eq!(raw_to_celsius([4090, 4090, 4090, 4090]), -99);
        // [1000;4]: avg=1000, scaled=604, (1475-604)/10 = 87
        assert_eq!(raw_to_celsius([1000, 1000, 1000, 1000]), 87);
        // [2048;4]: avg=2048, scaled=1237, (1475-1237)/10 = 23
        assert_eq!(raw_to_celsius([2048, 2048, 2048, 2048]), 23);
        // 非均匀组: sum=12006, avg=(12006+2)/4=3002, scaled=1813 → -33
        assert_eq!(raw_to_celsius([3000, 3001, 3002, 3003]), -33);
        // 全零: avg=0 (2/4 截断), scaled=0 → 147
        assert_eq!(raw_to_celsius([0, 0, 0, 0]), 147);
    }

    #[test]
    fn rounding_bias_is_preserved() {
        // +2 的修正使 avg 向最近整数取整: sum=9, (9+2)/4=2
        assert_eq!(raw_to_celsius([2, 2, 2, 3]), 147);
        // sum=4093*4=16372, avg=(16372+2)/4=4093, scaled=2473 → (1475-2473)/10 = -99
        assert_eq!(raw_to_celsius([4093, 4093, 4093, 4093]), -99);
    }

    struct StuckSampler;

    impl AnalogSampler for StuckSampler {
        fn configure(&mut self, _: u32, _: &[SampleSource]) -> Result<(), SamplerError> {
            Ok(())
        }
        fn start(&mut self) {}
        fn poll_ready(&mut self) -> bool {
            false
        }
        fn read_raw(&mut self) -> [u32; SEQUENCE_STEPS] {
            [0; SEQUENCE_STEPS]
        }
    }

    #[test]
    fn stuck_conversion_faults_after_poll_budget() {
        let mut sampler = StuckSampler;
        assert_eq!(
            wait_conversion(&mut sampler, 16),
            Err(SamplerError::ConversionTimeout)
        );
    }
}
