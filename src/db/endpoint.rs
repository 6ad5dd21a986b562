//! 호스트 이름 해석과 포트 포워딩 터널
//!
//! 배포 토폴로지에 따라 접속 호스트를 결정하고, 클러스터 토폴로지에서는
//! MongoDB Pod로 향하는 `port-forward` 서브프로세스를 실행합니다.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};

use super::uri::Endpoint;
use crate::cluster::{DetachedProcess, PodRegistry, ProcessRunner};
use crate::config::{ConnectorSettings, LOOPBACK_HOST, MONGO_PORT, TUNNEL_BIND_ADDRESS};
use crate::errors::{ConnectionError, ConnectionResult};

/// 배포 토폴로지
///
/// 호스트 이름이 없다는 사실로부터 클러스터 환경을 추론하지 않도록 호출자가 명시합니다.
#[derive(Clone)]
pub enum Topology {
    /// 직접 접근 가능한 서비스. 터널을 만들지 않습니다.
    Service { hostname: String },
    /// 클러스터 내부 Pod. 루프백으로 접속하기 위해 터널을 만듭니다.
    Cluster { registry: Arc<dyn PodRegistry> },
    /// 루프백으로 접속하며 터널은 이미 외부에서 만들어져 있다고 가정합니다.
    Standalone,
}

impl Topology {
    pub fn service(hostname: impl Into<String>) -> Self {
        Topology::Service {
            hostname: hostname.into(),
        }
    }

    pub fn cluster(registry: Arc<dyn PodRegistry>) -> Self {
        Topology::Cluster { registry }
    }

    pub fn requires_tunnel(&self) -> bool {
        matches!(self, Topology::Cluster { .. })
    }
}

impl fmt::Debug for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Topology::Service { hostname } => f.debug_struct("Service").field("hostname", hostname).finish(),
            Topology::Cluster { .. } => f.write_str("Cluster"),
            Topology::Standalone => f.write_str("Standalone"),
        }
    }
}

/// 실행 중인 포트 포워딩 프로세스의 소유 핸들
///
/// `terminate`가 호출되지 않은 채 drop되면 그 시점에 종료 신호를 보냅니다.
pub struct Tunnel {
    pod: String,
    local_port: u16,
    process: Option<Box<dyn DetachedProcess>>,
}

impl Tunnel {
    pub fn pod(&self) -> &str {
        &self.pod
    }

    pub fn local_port(&self) -> u16 {
        self.local_port
    }

    pub fn pid(&self) -> Option<u32> {
        self.process.as_ref().and_then(|p| p.id())
    }

    /// 실행 직후 프로세스가 바로 종료되지 않았는지 확인합니다.
    ///
    /// Pod가 준비되지 않았거나 로컬 포트가 이미 사용 중이면 `port-forward`는 곧바로 종료됩니다.
    pub async fn wait_settled(&mut self, settle: Duration) -> ConnectionResult<()> {
        if !settle.is_zero() {
            tokio::time::sleep(settle).await;
        }

        let Some(process) = self.process.as_mut() else {
            return Err(ConnectionError::TunnelEstablish("tunnel already released".to_string()));
        };

        match process.has_exited() {
            Ok(false) => Ok(()),
            Ok(true) => Err(ConnectionError::TunnelEstablish(format!(
                "port-forward to '{}' exited right after launch",
                self.pod
            ))),
            Err(e) => Err(ConnectionError::TunnelEstablish(format!(
                "could not poll port-forward to '{}': {}",
                self.pod, e
            ))),
        }
    }

    /// 터널 프로세스에 종료 신호를 보내고 핸들을 비웁니다. 실패는 로그로만 남깁니다.
    pub fn terminate(&mut self) {
        let Some(mut process) = self.process.take() else {
            return;
        };

        let pid = process.id();
        match process.terminate() {
            Ok(()) => info!("🔌 터널 종료: pod={}, pid={:?}", self.pod, pid),
            Err(e) => warn!("Failed to signal tunnel to '{}': {}", self.pod, e),
        }
    }
}

impl fmt::Debug for Tunnel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tunnel")
            .field("pod", &self.pod)
            .field("local_port", &self.local_port)
            .field("pid", &self.pid())
            .finish()
    }
}

impl Drop for Tunnel {
    fn drop(&mut self) {
        self.terminate();
    }
}

/// 토폴로지에 따라 접속 엔드포인트를 결정합니다.
///
/// 클러스터 토폴로지에서 터널이 실행되면 안정화 확인 전에 `tunnel_slot`에 먼저 저장되므로,
/// 이후 단계가 실패하더라도 호출자가 터널을 정리할 수 있습니다.
pub async fn resolve_endpoint(
    topology: &Topology,
    settings: &ConnectorSettings,
    runner: &dyn ProcessRunner,
    tunnel_slot: &mut Option<Tunnel>,
) -> ConnectionResult<Endpoint> {
    let endpoint = match topology {
        Topology::Service { hostname } => Endpoint::new(hostname.clone(), MONGO_PORT),
        Topology::Standalone => Endpoint::new(LOOPBACK_HOST, settings.local_port),
        Topology::Cluster { registry } => {
            let pod = select_pod(registry.as_ref(), &settings.pod_fragment).await?;
            let tunnel = tunnel_slot.insert(launch_tunnel(&pod, settings, runner)?);
            tunnel.wait_settled(settings.tunnel_settle).await?;
            Endpoint::new(LOOPBACK_HOST, settings.local_port)
        }
    };

    debug!("returning hostname '{}'.", endpoint.host);
    Ok(endpoint)
}

/// 이름 조각과 일치하는 첫 번째 Pod를 선택합니다.
///
/// 여러 개가 일치해도 추가 판별 없이 첫 번째를 사용합니다.
async fn select_pod(registry: &dyn PodRegistry, fragment: &str) -> ConnectionResult<String> {
    let pods = registry.pods(fragment).await?;
    if pods.len() > 1 {
        debug!("{} pods match '{}', using the first: {:?}", pods.len(), fragment, pods);
    }

    pods.into_iter().next().ok_or_else(|| {
        ConnectionError::PodNotFound(format!("no running pod matches '{}'", fragment))
    })
}

fn launch_tunnel(
    pod: &str,
    settings: &ConnectorSettings,
    runner: &dyn ProcessRunner,
) -> ConnectionResult<Tunnel> {
    let args = tunnel_args(pod, settings.local_port);
    debug!("Setting tunnel to '{}'", pod);

    let process = runner.spawn_detached(&settings.cluster_cli, &args).map_err(|e| {
        ConnectionError::TunnelEstablish(format!(
            "{} port-forward {}: {}",
            settings.cluster_cli, pod, e
        ))
    })?;

    info!(
        "🚇 터널 실행: {}:{} → {}:{} (pid={:?})",
        TUNNEL_BIND_ADDRESS,
        settings.local_port,
        pod,
        MONGO_PORT,
        process.id()
    );

    Ok(Tunnel {
        pod: pod.to_string(),
        local_port: settings.local_port,
        process: Some(process),
    })
}

/// `port-forward --address 0.0.0.0 <pod> <local>:<remote>` 형태의 인자
pub fn tunnel_args(pod: &str, local_port: u16) -> Vec<String> {
    vec![
        "port-forward".to_string(),
        "--address".to_string(),
        TUNNEL_BIND_ADDRESS.to_string(),
        pod.to_string(),
        format!("{}:{}", local_port, MONGO_PORT),
    ]
}
