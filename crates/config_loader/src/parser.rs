//! 配置解析模块
//!
//! 支持 TOML (主要) 和 JSON (可选) 格式。

use contracts::{ContractError, ServerConfig};

/// 配置文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML 格式 (推荐)
    Toml,
    /// JSON 格式
    Json,
}

impl ConfigFormat {
    /// 从文件扩展名推断格式
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// 根据格式解析配置
pub fn parse(content: &str, format: ConfigFormat) -> Result<ServerConfig, ContractError> {
    match format {
        ConfigFormat::Toml => toml::from_str(content).map_err(|e| ContractError::ConfigParse {
            message: format!("TOML parse error: {e}"),
            source: Some(Box::new(e)),
        }),
        ConfigFormat::Json => {
            serde_json::from_str(content).map_err(|e| ContractError::ConfigParse {
                message: format!("JSON parse error: {e}"),
                source: Some(Box::new(e)),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_toml_partial_sections() {
        let content = r#"
[simulator]
host = "10.0.0.5"

[motion]
noise_seed = 42
"#;
        let config = parse(content, ConfigFormat::Toml).unwrap();
        assert_eq!(config.simulator.host, "10.0.0.5");
        assert_eq!(config.simulator.port, 19997);
        assert_eq!(config.motion.noise_seed, Some(42));
        assert_eq!(config.server.port, 5000);
    }

    #[test]
    fn test_parse_json() {
        let content = r#"{ "server": { "port": 8080 }, "fleet": { "suffix_pool_size": 3 } }"#;
        let config = parse(content, ConfigFormat::Json).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.fleet.suffix_pool_size, 3);
    }

    #[test]
    fn test_parse_toml_syntax_error() {
        let err = parse("invalid toml [[[", ConfigFormat::Toml).unwrap_err();
        assert!(matches!(err, ContractError::ConfigParse { .. }));
    }

    #[test]
    fn test_parse_wrong_type() {
        let err = parse("[simulator]\nport = \"high\"\n", ConfigFormat::Toml).unwrap_err();
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            ConfigFormat::from_extension("TOML"),
            Some(ConfigFormat::Toml)
        );
        assert_eq!(
            ConfigFormat::from_extension("json"),
            Some(ConfigFormat::Json)
        );
        assert_eq!(ConfigFormat::from_extension("yaml"), None);
    }
}
