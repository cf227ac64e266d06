//! 配置校验模块
//!
//! 校验规则：
//! - run_length_secs > 0 (server 与 relay)
//! - frequency_secs > 0
//! - endpoint / topic / address 非空
//! - retry 策略下 max_attempts > 0
//! - glob 非空

use contracts::{ContractError, FailurePolicy, ReplayBlueprint};

/// 校验 ReplayBlueprint 配置
///
/// 返回第一个遇到的错误，或 Ok(())。
pub fn validate(blueprint: &ReplayBlueprint) -> Result<(), ContractError> {
    validate_corpus(blueprint)?;
    validate_server(blueprint)?;
    validate_relay(blueprint)?;
    validate_broker(blueprint)?;
    Ok(())
}

/// 校验语料配置
fn validate_corpus(blueprint: &ReplayBlueprint) -> Result<(), ContractError> {
    if blueprint.corpus.glob.is_empty() {
        return Err(ContractError::config_validation(
            "corpus.glob",
            "glob pattern must not be empty",
        ));
    }
    Ok(())
}

/// 校验服务端窗口
fn validate_server(blueprint: &ReplayBlueprint) -> Result<(), ContractError> {
    if blueprint.server.run_length_secs == 0 {
        return Err(ContractError::config_validation(
            "server.run_length_secs",
            "run length must be > 0, the release rate would be undefined",
        ));
    }
    Ok(())
}

/// 校验中继节奏与失败策略
fn validate_relay(blueprint: &ReplayBlueprint) -> Result<(), ContractError> {
    let relay = &blueprint.relay;

    if relay.frequency_secs == 0 {
        return Err(ContractError::config_validation(
            "relay.frequency_secs",
            "poll frequency must be > 0",
        ));
    }
    if relay.run_length_secs == 0 {
        return Err(ContractError::config_validation(
            "relay.run_length_secs",
            "run length must be > 0",
        ));
    }
    if relay.endpoint.is_empty() {
        return Err(ContractError::config_validation(
            "relay.endpoint",
            "endpoint URL must not be empty",
        ));
    }
    if relay.failure_policy == FailurePolicy::Retry && relay.max_attempts == 0 {
        return Err(ContractError::config_validation(
            "relay.max_attempts",
            "retry policy requires max_attempts > 0",
        ));
    }
    Ok(())
}

/// 校验 broker 路由
fn validate_broker(blueprint: &ReplayBlueprint) -> Result<(), ContractError> {
    if blueprint.broker.topic.is_empty() {
        return Err(ContractError::config_validation(
            "broker.topic",
            "topic must not be empty",
        ));
    }
    if blueprint.broker.address.is_empty() {
        return Err(ContractError::config_validation(
            "broker.address",
            "broker address must not be empty",
        ));
    }
    Ok(())
}
