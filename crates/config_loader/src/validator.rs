//! 配置校验模块
//!
//! 校验规则：
//! - 字段级约束 (`validator` derive，定义在 contracts)
//! - move_speed 为正的有限值
//! - noise_std_dev 为有限值
//! - default_scene 必须是 .ttt 场景文件
//! - HTTP 监听端口不能为 0

use std::collections::BTreeMap;

use contracts::{ContractError, ServerConfig};
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

/// 校验 ServerConfig
///
/// 返回第一个遇到的错误 (按字段路径排序)，或 Ok(())。
pub fn validate(config: &ServerConfig) -> Result<(), ContractError> {
    if let Err(errors) = config.validate() {
        let (field, message) = first_violation(&errors, "")
            .unwrap_or_else(|| ("config".to_string(), errors.to_string()));
        return Err(ContractError::config_validation(field, message));
    }
    validate_motion(config)?;
    validate_scene(config)?;
    validate_server(config)?;
    Ok(())
}

/// 展开嵌套的 ValidationErrors，取路径最小的一条
fn first_violation(errors: &ValidationErrors, prefix: &str) -> Option<(String, String)> {
    let sorted: BTreeMap<_, _> = errors.errors().iter().collect();
    for (name, kind) in sorted {
        let path = if prefix.is_empty() {
            name.to_string()
        } else {
            format!("{prefix}.{name}")
        };
        let found = match kind {
            ValidationErrorsKind::Field(list) => list.first().map(|e| {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("failed '{}' check", e.code));
                (path.clone(), message)
            }),
            ValidationErrorsKind::Struct(nested) => first_violation(nested, &path),
            ValidationErrorsKind::List(items) => items
                .iter()
                .find_map(|(idx, nested)| first_violation(nested, &format!("{path}[{idx}]"))),
        };
        if found.is_some() {
            return found;
        }
    }
    None
}

fn validate_motion(config: &ServerConfig) -> Result<(), ContractError> {
    let motion = &config.motion;
    if !(motion.move_speed.is_finite() && motion.move_speed > 0.0) {
        return Err(ContractError::config_validation(
            "motion.move_speed",
            format!("move_speed must be > 0, got {}", motion.move_speed),
        ));
    }
    if !motion.noise_std_dev.is_finite() {
        return Err(ContractError::config_validation(
            "motion.noise_std_dev",
            "noise_std_dev must be finite",
        ));
    }
    Ok(())
}

fn validate_scene(config: &ServerConfig) -> Result<(), ContractError> {
    let scene = &config.simulator.default_scene;
    if !scene.to_ascii_lowercase().ends_with(".ttt") {
        return Err(ContractError::config_validation(
            "simulator.default_scene",
            format!("'{scene}' is not a .ttt scene file"),
        ));
    }
    Ok(())
}

fn validate_server(config: &ServerConfig) -> Result<(), ContractError> {
    if config.server.port == 0 {
        return Err(ContractError::config_validation(
            "server.port",
            "port must be > 0",
        ));
    }
    Ok(())
}
