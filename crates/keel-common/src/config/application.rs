use figment::providers::{Env, Format, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::error::{CommonError, CommonResult};

const DEFAULT_CONFIG: &str = include_str!("default.toml");

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub node: NodeConfig,
    pub scheduler: SchedulerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfig {
    /// The cluster-wide identifier of this node.
    pub node_id: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// The interval at which fetch requests for missing objects are retried.
    pub fetch_timeout_ms: u64,
    /// Whether a global scheduler exists in the cluster.
    /// When false, tasks that cannot be queued locally right away are
    /// still queued locally instead of being handed off.
    pub global_scheduler_enabled: bool,
    pub static_cpus: f64,
    pub static_gpus: f64,
}

impl AppConfig {
    pub fn load() -> CommonResult<Self> {
        Figment::from(Toml::string(DEFAULT_CONFIG))
            .merge(Env::prefixed("KEEL_").map(|p| p.as_str().replace("__", ".").into()))
            .extract()
            .map_err(|e| CommonError::InvalidArgument(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::load().unwrap();
        assert_eq!(config.scheduler.fetch_timeout_ms, 1000);
        assert!(config.scheduler.global_scheduler_enabled);
        assert!(config.scheduler.static_cpus > 0.0);
    }
}
