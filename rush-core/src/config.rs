//! 总线配置（BusConfig）
//!
//! 可通过 `BusConfig::builder()` 构建，也可从配置文件反序列化（缺失字段取默认值）。
//!
use bon::Builder;
use serde::Deserialize;

/// 事件总线配置
#[derive(Builder, Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BusConfig {
    /// 总线名称（出现在日志字段 `bus` 中，便于区分多个实例）
    #[builder(into, default = BusConfig::DEFAULT_NAME.to_string())]
    pub name: String,
    /// 注册表与缓存的初始容量（按事件类型计）
    #[builder(default = BusConfig::DEFAULT_CAPACITY)]
    pub initial_capacity: usize,
    /// 事件没有任何监听器处理时是否输出 debug 日志
    #[builder(default)]
    pub log_dead_events: bool,
}

impl BusConfig {
    pub const DEFAULT_NAME: &'static str = "rush";
    pub const DEFAULT_CAPACITY: usize = 16;
}

impl Default for BusConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
