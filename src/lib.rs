//! MongoDB 접근 도구
//!
//! 직접 접근 가능한 서비스 또는 OpenShift 클러스터 내부에 있는 MongoDB에
//! 인증된 핸들을 제공합니다. 클러스터 내부 데이터베이스의 경우 `oc port-forward`
//! 터널을 자동으로 만들고, 연결이 끝나면 성공/실패와 무관하게 정리합니다.
//!
//! # Features
//!
//! - **자격 증명 해석**: 명시적 자격 증명 또는 클러스터 secret (base64) 조회
//! - **토폴로지별 연결**: 서비스 / 클러스터 터널 / 독립 실행 환경
//! - **생명주기 관리**: 멱등적인 `close`, 스코프 기반 사용, 터널 누수 방지
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────┐
//! │  ConnectionManager  │ ← connect / close / scoped
//! └─────────────────────┘
//!      │          │
//!      ▼          ▼
//! ┌─────────┐ ┌──────────────┐
//! │ cluster │ │ mongodb 드라이버 │
//! └─────────┘ └──────────────┘
//!  oc get secret / get pods / port-forward
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use mongo_accessor::db::{ConnectionConfig, ConnectionManager, Credentials, Topology};
//!
//! let config = ConnectionConfig::new(
//!     Some(Credentials::new("admin", "secret")),
//!     Topology::service("mongo.svc"),
//! );
//! let mut manager = ConnectionManager::new(runner);
//! manager.connect(config).await?;
//! let db = manager.database()?;
//! manager.close().await;
//! ```

pub mod cluster;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod utils;
