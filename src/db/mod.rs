//! Database Connection Management Module
//!
//! MongoDB 연결 수립과 해제를 담당하는 모듈입니다.
//! 대상 데이터베이스가 직접 접근 가능한 서비스인지, 클러스터 내부에 있어
//! 포트 포워딩 터널이 필요한지에 따라 연결 경로를 결정하고,
//! 터널 서브프로세스와 클라이언트를 소유하다가 `close`에서 함께 해제합니다.
//!
//! # 연결 순서
//!
//! ```text
//! 자격 증명 해석 ──▶ 호스트 해석 (필요 시 터널 생성) ──▶ 클라이언트 생성
//!   credentials         endpoint                           uri
//! ```
//!
//! # 기본 사용법
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use mongo_accessor::cluster::{OcCluster, SystemProcessRunner};
//! use mongo_accessor::config::ConnectorSettings;
//! use mongo_accessor::db::{ConnectionConfig, ConnectionManager, Topology};
//!
//! let runner = Arc::new(SystemProcessRunner::from_settings(&ConnectorSettings::default()));
//! let cluster = Arc::new(OcCluster::new("oc", runner.clone()));
//! let config = ConnectionConfig::new(None, Topology::cluster(cluster));
//!
//! let names = ConnectionManager::scoped(config, runner, |_client, db| async move {
//!     db.list_collection_names().await.map_err(|e| ConnectionError::DataAccess(e.to_string()))
//! })
//! .await?;
//! ```

pub mod credentials;
pub mod endpoint;
pub mod uri;

use std::future::Future;
use std::sync::Arc;

use log::{debug, info};
use mongodb::options::ClientOptions;
use mongodb::{Client, Database};

use crate::cluster::{PodRegistry, ProcessRunner};
use crate::config::{ConnectorSettings, MongoEnvConfig, TopologyKind};
use crate::errors::{ConnectionError, ConnectionResult, ErrorContext};

pub use credentials::{Credentials, SchemaVersion};
pub use endpoint::{Topology, Tunnel};
pub use uri::Endpoint;

/// 한 번의 연결 시도에 사용되는 입력값
///
/// 인증 세대(`SchemaVersion`)는 입력이 아니라 `explicit_credentials` 유무로부터 파생됩니다.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// 있으면 클러스터 secret 조회를 건너뜁니다.
    pub explicit_credentials: Option<Credentials>,
    pub topology: Topology,
    pub settings: ConnectorSettings,
}

impl ConnectionConfig {
    pub fn new(explicit_credentials: Option<Credentials>, topology: Topology) -> Self {
        Self {
            explicit_credentials,
            topology,
            settings: ConnectorSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: ConnectorSettings) -> Self {
        self.settings = settings;
        self
    }

    /// 서비스 호스트 이름 / 클러스터 핸들의 유무로 토폴로지를 구성합니다.
    ///
    /// 호스트 이름이 있으면 `Service`, 없고 클러스터 핸들이 있으면 `Cluster`입니다.
    /// 둘 다 없으면 클러스터로 가정하지 않고 `InvalidState`를 반환합니다.
    pub fn from_parts(
        explicit_credentials: Option<Credentials>,
        service_hostname: Option<String>,
        cluster: Option<Arc<dyn PodRegistry>>,
    ) -> ConnectionResult<Self> {
        let topology = match (service_hostname, cluster) {
            (Some(hostname), _) => Topology::service(hostname),
            (None, Some(registry)) => Topology::cluster(registry),
            (None, None) => {
                return Err(ConnectionError::InvalidState(
                    "neither a service hostname nor a cluster handle was given".to_string(),
                ));
            }
        };
        Ok(Self::new(explicit_credentials, topology))
    }

    /// 환경 변수 설정으로부터 구성합니다. 클러스터 토폴로지일 때만 `registry`가 사용됩니다.
    pub fn from_env_config(
        env: MongoEnvConfig,
        settings: ConnectorSettings,
        registry: Arc<dyn PodRegistry>,
    ) -> ConnectionResult<Self> {
        let topology = match env.topology {
            TopologyKind::Service => Topology::service(env.service_hostname.ok_or_else(|| {
                ConnectionError::Config("service topology without a hostname".to_string())
            })?),
            TopologyKind::Cluster => Topology::cluster(registry),
            TopologyKind::Standalone => Topology::Standalone,
        };
        Ok(Self::new(env.credentials, topology).with_settings(settings))
    }

    pub fn schema_version(&self) -> SchemaVersion {
        SchemaVersion::for_explicit_credentials(self.explicit_credentials.is_some())
    }
}

/// 연결 관리자 생명주기 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Unconnected,
    Connected,
    Closed,
}

/// MongoDB 연결 관리자
///
/// 자격 증명 → 호스트(터널) → 클라이언트 순서로 연결을 수립하고,
/// 터널 서브프로세스와 클라이언트를 단독으로 소유합니다.
///
/// `close`는 클라이언트를 먼저 종료한 뒤 터널에 SIGTERM을 보냅니다.
/// 여러 번 호출하거나 연결되지 않은 상태에서 호출해도 안전합니다.
/// 내부 잠금이 없으므로 동시 사용 시 호출자가 직렬화해야 합니다.
pub struct ConnectionManager {
    runner: Arc<dyn ProcessRunner>,
    status: ConnectionStatus,
    tunnel: Option<Tunnel>,
    client: Option<Client>,
    database: Option<Database>,
    endpoint: Option<Endpoint>,
    schema_version: Option<SchemaVersion>,
    redacted_uri: Option<String>,
}

impl ConnectionManager {
    pub fn new(runner: Arc<dyn ProcessRunner>) -> Self {
        Self {
            runner,
            status: ConnectionStatus::Unconnected,
            tunnel: None,
            client: None,
            database: None,
            endpoint: None,
            schema_version: None,
            redacted_uri: None,
        }
    }

    /// 연결을 수립합니다.
    ///
    /// 각 단계는 순서대로 실행되며 실패한 단계에서 즉시 중단됩니다.
    /// 클라이언트 생성은 서버 접속을 확인하지 않습니다 (드라이버가 지연 연결).
    ///
    /// # Errors
    ///
    /// - `CredentialResolution` - secret 조회/디코딩 실패
    /// - `PodNotFound` - 일치하는 Pod 없음
    /// - `TunnelEstablish` - 포트 포워딩 실행 실패
    /// - `ClientConstruction` - 드라이버가 연결 문자열을 거부
    /// - `InvalidState` - 이미 연결되었거나 닫힌 관리자
    pub async fn connect(&mut self, config: ConnectionConfig) -> ConnectionResult<()> {
        match self.status {
            ConnectionStatus::Unconnected => {}
            ConnectionStatus::Connected => {
                return Err(ConnectionError::InvalidState("already connected".to_string()));
            }
            ConnectionStatus::Closed => {
                return Err(ConnectionError::InvalidState(
                    "manager is closed and cannot reconnect".to_string(),
                ));
            }
        }

        // 이전의 실패한 시도가 남긴 터널
        if let Some(mut stale) = self.tunnel.take() {
            stale.terminate();
        }

        info!("Connecting to mongo ({:?})", config.topology);
        let settings = &config.settings;

        let (credentials, version) = credentials::resolve_credentials(
            config.explicit_credentials.as_ref(),
            settings,
            self.runner.as_ref(),
        )
        .await?;

        let endpoint = endpoint::resolve_endpoint(
            &config.topology,
            settings,
            self.runner.as_ref(),
            &mut self.tunnel,
        )
        .await?;

        debug!(
            "logging into mongo db '{}', at '{}' as '{}'",
            settings.database_name,
            endpoint,
            credentials.username()
        );
        let connection_uri =
            uri::connection_uri(&credentials, &endpoint, &settings.database_name, version);
        let client = build_client(&connection_uri, &settings.app_name).await?;

        self.database = Some(client.database(&settings.database_name));
        self.client = Some(client);
        self.redacted_uri = Some(uri::redacted_uri(
            &credentials,
            &endpoint,
            &settings.database_name,
            version,
        ));
        self.endpoint = Some(endpoint);
        self.schema_version = Some(version);
        self.status = ConnectionStatus::Connected;

        info!("✅ MongoDB 클라이언트 준비 완료: {}", self.redacted_uri.as_deref().unwrap_or_default());
        Ok(())
    }

    /// 클라이언트와 터널을 해제합니다. 실패하지 않으며 여러 번 호출해도 안전합니다.
    ///
    /// 실패한 `connect`가 남긴 터널도 여기서 정리됩니다.
    pub async fn close(&mut self) {
        self.database = None;
        if let Some(client) = self.client.take() {
            client.shutdown().await;
            debug!("MongoDB client closed");
        }

        if let Some(mut tunnel) = self.tunnel.take() {
            tunnel.terminate();
        }

        if self.status == ConnectionStatus::Connected {
            info!("MongoDB 연결 종료");
            self.status = ConnectionStatus::Closed;
        }
    }

    /// 연결 → `body` 실행 → 항상 `close`.
    ///
    /// `body`가 에러를 반환해도 `close`는 정확히 한 번 실행됩니다.
    /// `connect`가 실패하면 `body`는 호출되지 않으며 부분 상태만 정리됩니다.
    pub async fn scoped<F, Fut, T, E>(
        config: ConnectionConfig,
        runner: Arc<dyn ProcessRunner>,
        body: F,
    ) -> Result<T, E>
    where
        F: FnOnce(Client, Database) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: From<ConnectionError>,
    {
        let mut manager = ConnectionManager::new(runner);

        let result = match manager.connect(config).await {
            Ok(()) => match (manager.client(), manager.database()) {
                (Ok(client), Ok(database)) => body(client.clone(), database.clone()).await,
                (Err(e), _) | (_, Err(e)) => Err(E::from(e)),
            },
            Err(e) => Err(E::from(e)),
        };

        manager.close().await;
        result
    }

    pub fn client(&self) -> ConnectionResult<&Client> {
        self.client
            .as_ref()
            .ok_or_else(|| ConnectionError::InvalidState("client requested before connect".to_string()))
    }

    pub fn database(&self) -> ConnectionResult<&Database> {
        self.database
            .as_ref()
            .ok_or_else(|| ConnectionError::InvalidState("database requested before connect".to_string()))
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn is_connected(&self) -> bool {
        self.status == ConnectionStatus::Connected
    }

    pub fn has_tunnel(&self) -> bool {
        self.tunnel.is_some()
    }

    pub fn tunnel(&self) -> Option<&Tunnel> {
        self.tunnel.as_ref()
    }

    pub fn endpoint(&self) -> Option<&Endpoint> {
        self.endpoint.as_ref()
    }

    pub fn schema_version(&self) -> Option<SchemaVersion> {
        self.schema_version
    }

    /// 비밀번호를 가린 연결 문자열
    pub fn connection_uri_redacted(&self) -> Option<&str> {
        self.redacted_uri.as_deref()
    }
}

async fn build_client(connection_uri: &str, app_name: &str) -> ConnectionResult<Client> {
    let mut options = ClientOptions::parse(connection_uri)
        .await
        .step_context(ConnectionError::ClientConstruction, "invalid connection string")?;
    options.app_name = Some(app_name.to_string());

    Client::with_options(options)
        .step_context(ConnectionError::ClientConstruction, "driver rejected options")
}
