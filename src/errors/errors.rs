//! 연결 관리자에서 사용하는 에러 시스템
//!
//! `connect` 과정의 각 단계(자격 증명 조회, Pod 조회, 터널 생성, 클라이언트 생성)를
//! 구분할 수 있도록 `thiserror` 기반의 에러 타입을 제공합니다.
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use crate::errors::ConnectionError;
//!
//! fn pick_pod(pods: Vec<String>) -> Result<String, ConnectionError> {
//!     pods.into_iter()
//!         .next()
//!         .ok_or_else(|| ConnectionError::PodNotFound("no pod matches '-mongodb-'".to_string()))
//! }
//! ```

use thiserror::Error;

/// 연결 수립 과정 전역 에러 타입
///
/// 실패한 단계를 변형(variant)으로 구분하여 운영자가 환경 문제, 자격 증명 문제,
/// 네트워크 문제를 각각 진단할 수 있도록 합니다.
#[derive(Error, Debug)]
pub enum ConnectionError {
    /// 클러스터 secret 조회 또는 디코딩 실패
    #[error("Credential resolution failed: {0}")]
    CredentialResolution(String),

    /// 이름 조각과 일치하는 실행 중인 Pod 없음 (또는 Pod 목록 조회 실패)
    #[error("Pod lookup failed: {0}")]
    PodNotFound(String),

    /// 포트 포워딩 서브프로세스 실행 실패
    #[error("Tunnel could not be established: {0}")]
    TunnelEstablish(String),

    /// 드라이버가 연결 문자열이나 옵션을 거부함
    #[error("Client construction failed: {0}")]
    ClientConstruction(String),

    /// 연결 이후 데이터 평면 호출 실패 (서버 접속 불가, 인증 거부 등)
    #[error("Data access failed: {0}")]
    DataAccess(String),

    /// 잘못된 생명주기 상태에서 호출됨
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// 환경 변수 설정 오류
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ConnectionError {
    /// 실패한 단계의 이름을 반환합니다.
    ///
    /// 로그나 터미널 출력에서 어느 단계가 실패했는지 짧게 표시할 때 사용합니다.
    pub fn step(&self) -> &'static str {
        match self {
            ConnectionError::CredentialResolution(_) => "credential fetch",
            ConnectionError::PodNotFound(_) => "pod lookup",
            ConnectionError::TunnelEstablish(_) => "tunnel launch",
            ConnectionError::ClientConstruction(_) => "client construction",
            ConnectionError::DataAccess(_) => "data access",
            ConnectionError::InvalidState(_) => "lifecycle",
            ConnectionError::Config(_) => "configuration",
        }
    }
}

/// 편의성을 위한 Result 타입 별칭
pub type ConnectionResult<T> = Result<T, ConnectionError>;

/// 외부 라이브러리 에러를 특정 단계의 `ConnectionError`로 변환하는 확장 trait
pub trait ErrorContext<T> {
    /// 에러를 `wrap` 변형으로 감싸며 메시지 앞에 컨텍스트를 붙입니다.
    fn step_context(self, wrap: fn(String) -> ConnectionError, msg: &str) -> ConnectionResult<T>;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: std::fmt::Display,
{
    fn step_context(self, wrap: fn(String) -> ConnectionError, msg: &str) -> ConnectionResult<T> {
        self.map_err(|e| wrap(format!("{}: {}", msg, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_names_are_distinct() {
        let errors = [
            ConnectionError::CredentialResolution("x".into()),
            ConnectionError::PodNotFound("x".into()),
            ConnectionError::TunnelEstablish("x".into()),
            ConnectionError::ClientConstruction("x".into()),
            ConnectionError::DataAccess("x".into()),
            ConnectionError::InvalidState("x".into()),
            ConnectionError::Config("x".into()),
        ];
        let mut steps: Vec<&str> = errors.iter().map(|e| e.step()).collect();
        steps.sort();
        steps.dedup();

        assert_eq!(steps.len(), errors.len());
    }

    #[test]
    fn test_data_access_is_not_reported_as_client_construction() {
        let error = ConnectionError::DataAccess("list collections: server selection timeout".to_string());

        assert_eq!(error.step(), "data access");
        assert!(error.to_string().starts_with("Data access failed"));
    }

    #[test]
    fn test_pod_not_found_message_names_step() {
        let error = ConnectionError::PodNotFound("no running pod matches '-mongodb-'".to_string());

        assert_eq!(error.to_string(), "Pod lookup failed: no running pod matches '-mongodb-'");
    }

    #[test]
    fn test_error_context_trait() {
        let result: Result<(), &str> = Err("original error");
        let wrapped = result.step_context(ConnectionError::TunnelEstablish, "spawn oc");

        if let Err(ConnectionError::TunnelEstablish(msg)) = wrapped {
            assert!(msg.contains("spawn oc"));
            assert!(msg.contains("original error"));
        } else {
            panic!("Expected TunnelEstablish");
        }
    }
}
