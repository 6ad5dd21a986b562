//! 연결 설정 관리 모듈
//!
//! 클러스터 CLI, secret 이름, Pod 이름 조각, 대상 데이터베이스, 타임아웃 등
//! 연결 관리자가 사용하는 설정값과 배포 토폴로지 설정을 관리합니다.

use std::env;
use std::time::Duration;

use log::{error, info};

use crate::db::credentials::Credentials;
use crate::errors::{ConnectionError, ConnectionResult};
use crate::utils::string_utils::env_optional;

/// MongoDB 표준 포트. 원격 Pod 포트와 서비스 포트 모두 이 값을 사용합니다.
pub const MONGO_PORT: u16 = 27017;

/// 터널 사용 시 클라이언트가 접속하는 루프백 주소
pub const LOOPBACK_HOST: &str = "127.0.0.1";

/// 포트 포워딩 리스너 바인딩 주소 (컨테이너 내부 호출자도 접근 가능하도록 전체 인터페이스)
pub const TUNNEL_BIND_ADDRESS: &str = "0.0.0.0";

/// 연결 관리자 동작 설정
///
/// 기본값은 기존 운영 환경(OpenShift + `vision-secrets`)의 상수와 동일합니다.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectorSettings {
    /// 클러스터 제어 CLI 실행 파일 (`oc`, `kubectl` 등)
    pub cluster_cli: String,
    /// MongoDB 관리자 자격 증명이 담긴 secret 이름
    pub secret_name: String,
    /// secret 내 사용자명 필드 (base64)
    pub username_field: String,
    /// secret 내 비밀번호 필드 (base64)
    pub password_field: String,
    /// MongoDB Pod를 식별하는 이름 조각 (부분 문자열 매칭)
    pub pod_fragment: String,
    /// 대상 데이터베이스 이름. 인증 소스(authSource)로도 사용됩니다.
    pub database_name: String,
    /// 터널의 로컬 리스너 포트
    pub local_port: u16,
    /// 외부 명령(secret 조회, Pod 조회) 최대 대기 시간
    ///
    /// `connect`가 직접 읽지 않고 명령 실행기를 만들 때 적용됩니다
    /// (`SystemProcessRunner::from_settings`).
    pub command_timeout: Duration,
    /// 터널 프로세스 실행 직후 조기 종료 여부를 확인하기까지의 대기 시간
    pub tunnel_settle: Duration,
    /// 드라이버에 전달되는 애플리케이션 이름
    pub app_name: String,
}

impl Default for ConnectorSettings {
    fn default() -> Self {
        Self {
            cluster_cli: "oc".to_string(),
            secret_name: "vision-secrets".to_string(),
            username_field: "mongodb-admin-username".to_string(),
            password_field: "mongodb-admin-password".to_string(),
            pod_fragment: "-mongodb-".to_string(),
            database_name: "DLAAS".to_string(),
            local_port: MONGO_PORT,
            command_timeout: Duration::from_secs(30),
            tunnel_settle: Duration::from_millis(500),
            app_name: "mongo_accessor".to_string(),
        }
    }
}

impl ConnectorSettings {
    /// 환경 변수에서 설정을 읽어옵니다.
    ///
    /// 설정되지 않았거나 파싱할 수 없는 값은 기본값을 사용합니다.
    ///
    /// # Environment Variables
    ///
    /// - `MONGO_CLUSTER_CLI` (기본값: `oc`)
    /// - `MONGO_SECRET_NAME` (기본값: `vision-secrets`)
    /// - `MONGO_POD_FRAGMENT` (기본값: `-mongodb-`)
    /// - `MONGO_DATABASE` (기본값: `DLAAS`)
    /// - `MONGO_TUNNEL_LOCAL_PORT` (기본값: `27017`)
    /// - `MONGO_COMMAND_TIMEOUT_SECS` (기본값: `30`)
    /// - `MONGO_TUNNEL_SETTLE_MS` (기본값: `500`)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let settings = Self {
            cluster_cli: env_optional("MONGO_CLUSTER_CLI").unwrap_or(defaults.cluster_cli),
            secret_name: env_optional("MONGO_SECRET_NAME").unwrap_or(defaults.secret_name),
            username_field: defaults.username_field,
            password_field: defaults.password_field,
            pod_fragment: env_optional("MONGO_POD_FRAGMENT").unwrap_or(defaults.pod_fragment),
            database_name: env_optional("MONGO_DATABASE").unwrap_or(defaults.database_name),
            local_port: parse_or("MONGO_TUNNEL_LOCAL_PORT", defaults.local_port),
            command_timeout: Duration::from_secs(parse_or(
                "MONGO_COMMAND_TIMEOUT_SECS",
                defaults.command_timeout.as_secs(),
            )),
            tunnel_settle: Duration::from_millis(parse_or(
                "MONGO_TUNNEL_SETTLE_MS",
                defaults.tunnel_settle.as_millis() as u64,
            )),
            app_name: defaults.app_name,
        };

        info!("연결 설정 로드됨: cli={}, database={}", settings.cluster_cli, settings.database_name);
        settings
    }
}

fn parse_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Display,
    T::Err: std::fmt::Display,
{
    match env_optional(key) {
        Some(raw) => raw.parse::<T>().unwrap_or_else(|e| {
            error!("{} 파싱 실패: {}. 기본값 {} 사용", key, e, default);
            default
        }),
        None => default,
    }
}

/// 배포 토폴로지 종류
///
/// 호스트 이름 유무로 추론하지 않고 호출자가 명시합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopologyKind {
    /// 직접 접근 가능한 서비스 호스트 이름 사용
    Service,
    /// 클러스터 Pod로 포트 포워딩 터널 생성
    Cluster,
    /// 루프백 주소 사용, 터널은 이미 존재한다고 가정
    Standalone,
}

impl TopologyKind {
    /// 문자열에서 TopologyKind를 생성합니다. (대소문자 무관)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "service" | "svc" => Some(TopologyKind::Service),
            "cluster" | "ocp" | "openshift" => Some(TopologyKind::Cluster),
            "standalone" | "local" => Some(TopologyKind::Standalone),
            _ => None,
        }
    }
}

/// 환경 변수로 지정된 MongoDB 접속 정보
#[derive(Debug, Clone)]
pub struct MongoEnvConfig {
    /// `MONGO_USERNAME`/`MONGO_PASSWORD`가 모두 설정된 경우의 명시적 자격 증명
    pub credentials: Option<Credentials>,
    /// `MONGO_SERVICE` 값
    pub service_hostname: Option<String>,
    /// 결정된 토폴로지
    pub topology: TopologyKind,
}

impl MongoEnvConfig {
    /// 환경 변수에서 접속 정보를 읽어옵니다.
    ///
    /// # Environment Variables
    ///
    /// - `MONGO_USERNAME`, `MONGO_PASSWORD`: 둘 다 있어야 명시적 자격 증명으로 사용
    /// - `MONGO_SERVICE`: 서비스 호스트 이름
    /// - `MONGO_TOPOLOGY`: `service` | `cluster` | `standalone`.
    ///   `MONGO_SERVICE`가 있으면 생략 가능 (`service`로 간주)
    ///
    /// # Errors
    ///
    /// 사용자명/비밀번호 중 하나만 설정된 경우, 토폴로지를 알 수 없는 경우,
    /// `service` 토폴로지인데 `MONGO_SERVICE`가 없는 경우 `ConnectionError::Config`
    pub fn from_env() -> ConnectionResult<Self> {
        Self::from_values(
            env_optional("MONGO_USERNAME"),
            env::var("MONGO_PASSWORD").ok().filter(|p| !p.is_empty()),
            env_optional("MONGO_SERVICE"),
            env_optional("MONGO_TOPOLOGY"),
        )
    }

    /// 이미 읽어 둔 값들로부터 접속 정보를 구성합니다.
    pub fn from_values(
        username: Option<String>,
        password: Option<String>,
        service_hostname: Option<String>,
        topology: Option<String>,
    ) -> ConnectionResult<Self> {
        let credentials = match (username, password) {
            (Some(username), Some(password)) => Some(Credentials::new(username, password)),
            (None, None) => None,
            _ => {
                return Err(ConnectionError::Config(
                    "MONGO_USERNAME and MONGO_PASSWORD must be set together".to_string(),
                ));
            }
        };

        let topology = match topology {
            Some(raw) => TopologyKind::parse(&raw).ok_or_else(|| {
                ConnectionError::Config(format!("unknown MONGO_TOPOLOGY '{}'", raw))
            })?,
            None if service_hostname.is_some() => TopologyKind::Service,
            None => {
                return Err(ConnectionError::Config(
                    "MONGO_TOPOLOGY is required when MONGO_SERVICE is not set".to_string(),
                ));
            }
        };

        if topology == TopologyKind::Service && service_hostname.is_none() {
            return Err(ConnectionError::Config(
                "MONGO_TOPOLOGY=service requires MONGO_SERVICE".to_string(),
            ));
        }

        Ok(Self {
            credentials,
            service_hostname,
            topology,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_defaults_match_cluster_constants() {
        let settings = ConnectorSettings::default();

        assert_eq!(settings.cluster_cli, "oc");
        assert_eq!(settings.secret_name, "vision-secrets");
        assert_eq!(settings.pod_fragment, "-mongodb-");
        assert_eq!(settings.database_name, "DLAAS");
        assert_eq!(settings.local_port, 27017);
    }

    #[test]
    fn test_topology_kind_from_string() {
        assert_eq!(TopologyKind::parse("service"), Some(TopologyKind::Service));
        assert_eq!(TopologyKind::parse("CLUSTER"), Some(TopologyKind::Cluster));
        assert_eq!(TopologyKind::parse(" standalone "), Some(TopologyKind::Standalone));
        assert_eq!(TopologyKind::parse("icp"), None);
    }

    #[test]
    fn test_service_hostname_implies_service_topology() {
        let config = MongoEnvConfig::from_values(None, None, Some("mongo.svc".into()), None).unwrap();

        assert_eq!(config.topology, TopologyKind::Service);
        assert!(config.credentials.is_none());
    }

    #[test]
    fn test_missing_topology_without_service_is_rejected() {
        let result = MongoEnvConfig::from_values(None, None, None, None);

        assert!(matches!(result, Err(ConnectionError::Config(_))));
    }

    #[test]
    fn test_half_credentials_are_rejected() {
        let result =
            MongoEnvConfig::from_values(Some("admin".into()), None, None, Some("cluster".into()));

        assert!(matches!(result, Err(ConnectionError::Config(_))));
    }

    #[test]
    fn test_service_topology_requires_hostname() {
        let result = MongoEnvConfig::from_values(None, None, None, Some("service".into()));

        assert!(matches!(result, Err(ConnectionError::Config(_))));
    }

    #[test]
    fn test_explicit_credentials_from_values() {
        let config = MongoEnvConfig::from_values(
            Some("admin".into()),
            Some("secret".into()),
            None,
            Some("standalone".into()),
        )
        .unwrap();

        let creds = config.credentials.unwrap();
        assert_eq!(creds.username(), "admin");
        assert_eq!(creds.password(), "secret");
        assert_eq!(config.topology, TopologyKind::Standalone);
    }
}
