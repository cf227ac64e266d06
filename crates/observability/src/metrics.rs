//! 指标注册模块
//!
//! 集中声明各组件上报的指标名称与说明，便于 Prometheus 侧查阅。
//! 具体上报点分散在各业务 crate（pacer / corpus / server / relay）。

use metrics::{describe_counter, describe_gauge, Unit};

/// 语料加载指标
pub const CORPUS_RECORDS_LOADED: &str = "corpus_records_loaded";

/// Pacer 释放指标
pub const PACER_RECORDS_RELEASED: &str = "pacer_records_released";

/// Delivery endpoint 服务指标
pub const ENDPOINT_WINDOWS_SERVED: &str = "endpoint_windows_served";

/// Relay 转发指标
pub const RELAY_RECORDS_PUBLISHED: &str = "relay_records_published";

/// Relay 重试指标
pub const RELAY_RETRIES: &str = "relay_retries";

/// 注册全部指标描述
pub fn describe_all() {
    describe_gauge!(
        CORPUS_RECORDS_LOADED,
        Unit::Count,
        "Records loaded into the corpus at startup"
    );
    describe_counter!(
        PACER_RECORDS_RELEASED,
        Unit::Count,
        "Records released by the pacer across all windows"
    );
    describe_counter!(
        ENDPOINT_WINDOWS_SERVED,
        Unit::Count,
        "Delivery endpoint invocations (including empty windows)"
    );
    describe_counter!(
        RELAY_RECORDS_PUBLISHED,
        Unit::Count,
        "Records forwarded to the broker by the relay"
    );
    describe_counter!(
        RELAY_RETRIES,
        Unit::Count,
        "Transient fetch/publish failures that were retried"
    );
}
