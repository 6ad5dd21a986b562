//! `oc` CLI 기반 Pod 조회

use std::sync::Arc;

use async_trait::async_trait;
use log::debug;

use super::{PodRegistry, ProcessRunner};
use crate::errors::{ConnectionError, ConnectionResult, ErrorContext};
use crate::utils::string_utils::strip_resource_prefix;

/// 클러스터 제어 CLI(`oc`, `kubectl`)로 실행 중인 Pod를 조회하는 `PodRegistry`
///
/// ```rust,ignore
/// let runner = Arc::new(SystemProcessRunner::new(Duration::from_secs(30)));
/// let cluster = OcCluster::new("oc", runner);
/// let pods = cluster.pods("-mongodb-").await?;
/// ```
#[derive(Clone)]
pub struct OcCluster {
    cli: String,
    runner: Arc<dyn ProcessRunner>,
}

impl OcCluster {
    pub fn new(cli: impl Into<String>, runner: Arc<dyn ProcessRunner>) -> Self {
        Self {
            cli: cli.into(),
            runner,
        }
    }

    fn list_args() -> Vec<String> {
        ["get", "pods", "--field-selector=status.phase=Running", "-o", "name"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }
}

#[async_trait]
impl PodRegistry for OcCluster {
    async fn pods(&self, fragment: &str) -> ConnectionResult<Vec<String>> {
        let output = self
            .runner
            .run(&self.cli, &Self::list_args())
            .await
            .step_context(ConnectionError::PodNotFound, &format!("{} get pods", self.cli))?;

        if !output.success {
            return Err(ConnectionError::PodNotFound(format!(
                "{} get pods exited with {:?}: {}",
                self.cli,
                output.code,
                output.stderr_lossy()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let pods: Vec<String> = stdout
            .lines()
            .filter_map(strip_resource_prefix)
            .filter(|name| name.contains(fragment))
            .map(str::to_string)
            .collect();

        debug!("Pods matching '{}': {:?}", fragment, pods);
        Ok(pods)
    }
}
