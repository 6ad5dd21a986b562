//! # Cluster Collaborators
//!
//! 연결 관리자가 의존하는 외부 협력자(서브프로세스 실행, Pod 조회)의 인터페이스입니다.
//! 테스트에서는 실제 프로세스를 띄우지 않고 가짜 구현으로 대체할 수 있습니다.
//!
//! ## 구성 요소
//!
//! - [`ProcessRunner`] - 명령을 끝까지 실행하여 출력 수집 / 백그라운드로 분리 실행
//! - [`DetachedProcess`] - 분리 실행된 프로세스 핸들 (종료 신호 전송용)
//! - [`PodRegistry`] - 이름 조각으로 실행 중인 Pod 목록 조회
//!
//! ## 구현체
//!
//! - [`process::SystemProcessRunner`] - `tokio::process` 기반 실제 실행기
//! - [`oc::OcCluster`] - `oc get pods` 기반 Pod 조회

pub mod oc;
pub mod process;

use std::io;

use async_trait::async_trait;

use crate::errors::ConnectionResult;

pub use oc::OcCluster;
pub use process::SystemProcessRunner;

/// 완료된 명령의 실행 결과
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// 종료 코드가 0이면 true
    pub success: bool,
    /// 종료 코드 (시그널로 종료된 경우 None)
    pub code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl ProcessOutput {
    /// 표준 에러 출력을 손실 허용 UTF-8 문자열로 반환합니다.
    pub fn stderr_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stderr).trim().to_string()
    }
}

/// 백그라운드로 분리 실행된 프로세스 핸들
///
/// 관리자는 이 핸들로 종료 신호만 보낼 뿐 프로세스를 감시하거나 재시작하지 않습니다.
pub trait DetachedProcess: Send + Sync {
    /// 운영체제 프로세스 ID
    fn id(&self) -> Option<u32>;

    /// 프로세스가 이미 종료되었는지 확인합니다. (블로킹하지 않음)
    fn has_exited(&mut self) -> io::Result<bool>;

    /// 종료 신호(SIGTERM)를 보냅니다. 강제 종료(SIGKILL)가 아닙니다.
    fn terminate(&mut self) -> io::Result<()>;
}

/// 외부 명령 실행 기능
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// 명령을 완료될 때까지 실행하고 출력을 수집합니다.
    ///
    /// 실행 파일이 없거나 권한이 없는 등 프로세스를 시작할 수 없으면 `Err`를 반환합니다.
    /// 0이 아닌 종료 코드는 `Ok(ProcessOutput { success: false, .. })`로 반환됩니다.
    async fn run(&self, program: &str, args: &[String]) -> io::Result<ProcessOutput>;

    /// 명령을 백그라운드로 실행하고 핸들을 즉시 반환합니다.
    fn spawn_detached(&self, program: &str, args: &[String]) -> io::Result<Box<dyn DetachedProcess>>;
}

/// 클러스터 Pod 조회 기능
#[async_trait]
pub trait PodRegistry: Send + Sync {
    /// 이름에 `fragment`가 포함된 실행 중인 Pod 이름을 순서대로 반환합니다.
    async fn pods(&self, fragment: &str) -> ConnectionResult<Vec<String>>;
}
