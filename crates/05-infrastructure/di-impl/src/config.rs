//! 容器配置加载
//!
//! 配置来源按优先级从低到高：默认值、配置文件、`ADSP_DI__` 前缀的环境变量。

use config::{Config, Environment, File};
use di_abstractions::ContainerConfig;
use infrastructure_common::{ConfigError, ConfigResult};
use std::path::Path;
use tracing::debug;

/// 默认配置文件（不含扩展名，可以是 toml/json/yaml）
pub const CONFIG_FILE: &str = "config/di";

/// 环境变量前缀
pub const ENV_PREFIX: &str = "ADSP_DI";

/// 从默认配置文件和环境变量加载容器配置
///
/// 配置文件不存在时使用默认值
pub fn load_container_config() -> ConfigResult<ContainerConfig> {
    let builder = Config::builder()
        .add_source(File::with_name(CONFIG_FILE).required(false))
        .add_source(environment());
    deserialize(builder.build())
}

/// 从指定配置文件加载容器配置，环境变量仍然优先
pub fn load_container_config_from(path: impl AsRef<Path>) -> ConfigResult<ContainerConfig> {
    let path = path.as_ref();
    debug!("加载容器配置: {}", path.display());

    let builder = Config::builder()
        .add_source(File::from(path))
        .add_source(environment());
    deserialize(builder.build())
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
}

fn deserialize(config: Result<Config, config::ConfigError>) -> ConfigResult<ContainerConfig> {
    let container_config = config
        .and_then(|config| config.try_deserialize::<ContainerConfig>())
        .map_err(|e| ConfigError::ParseError { source: Box::new(e) })?;
    debug!("容器配置: {:?}", container_config);
    Ok(container_config)
}
