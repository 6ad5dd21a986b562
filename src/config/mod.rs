//! # Configuration Module
//!
//! 연결 관리자의 설정 관리를 담당하는 모듈입니다.
//! 환경 변수 기반의 설정값들을 중앙집중식으로 관리합니다.
//!
//! ## 모듈 구성
//!
//! - [`data_config`] - 클러스터 CLI, secret, Pod, 데이터베이스, 타임아웃, 토폴로지 설정
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use crate::config::{ConnectorSettings, MongoEnvConfig};
//!
//! let settings = ConnectorSettings::from_env();
//! let mongo = MongoEnvConfig::from_env()?;
//! println!("topology = {:?}, database = {}", mongo.topology, settings.database_name);
//! ```
//!
//! ## 환경 변수 설정 가이드
//!
//! ```bash
//! # 직접 접근 가능한 서비스
//! export MONGO_SERVICE="mongo.svc"
//! export MONGO_USERNAME="admin"
//! export MONGO_PASSWORD="secret"
//!
//! # OpenShift 클러스터 (자격 증명은 secret에서 조회, 터널 자동 생성)
//! export MONGO_TOPOLOGY="cluster"
//! export MONGO_CLUSTER_CLI="oc"
//! export MONGO_SECRET_NAME="vision-secrets"
//! ```

pub mod data_config;

pub use data_config::*;
