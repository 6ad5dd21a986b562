//! MongoDB 접근 도구 메인 애플리케이션
//!
//! 환경 변수로 지정된 토폴로지에 따라 MongoDB에 연결하고(필요 시 터널 생성),
//! 알려진 컬렉션이 존재하는지 확인한 뒤 연결과 터널을 정리합니다.

use std::process::ExitCode;
use std::sync::Arc;

use dotenv::dotenv;
use env_logger::Env;
use log::{error, info};
use mongo_accessor::cluster::{OcCluster, ProcessRunner, SystemProcessRunner};
use mongo_accessor::config::{ConnectorSettings, MongoEnvConfig};
use mongo_accessor::db::{ConnectionConfig, ConnectionManager};
use mongo_accessor::domain::collections::{KNOWN_COLLECTIONS, present_known_collections};
use mongo_accessor::errors::{ConnectionError, ConnectionResult};
use mongo_accessor::utils::display_terminal::{print_boxed_title, print_final_summary, print_sub_task};

#[tokio::main]
async fn main() -> ExitCode {
    let profile = load_env_file();
    init_logging();
    info!("Current profile: {}", profile);

    print_boxed_title("MongoDB Accessor");

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("❌ {} 단계 실패: {}", e.step(), e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> ConnectionResult<()> {
    let settings = ConnectorSettings::from_env();
    let mongo = MongoEnvConfig::from_env()?;

    print_sub_task("topology", &format!("{:?}", mongo.topology));
    print_sub_task("database", &settings.database_name);

    let runner: Arc<dyn ProcessRunner> = Arc::new(SystemProcessRunner::from_settings(&settings));
    let cluster = Arc::new(OcCluster::new(settings.cluster_cli.clone(), runner.clone()));
    let config = ConnectionConfig::from_env_config(mongo, settings, cluster)?;

    let present = ConnectionManager::scoped(config, runner, |_client, database| async move {
        let names = database
            .list_collection_names()
            .await
            .map_err(|e| ConnectionError::DataAccess(format!("list collections: {}", e)))?;
        info!("Found {} collections in '{}'", names.len(), database.name());
        Ok::<_, ConnectionError>(present_known_collections(&names).len())
    })
    .await?;

    print_final_summary(present, KNOWN_COLLECTIONS.len());
    Ok(())
}

/// 환경별 설정 파일을 로드합니다
///
/// * `PROFILE=dev` - .env.dev 파일 로드 (기본값)
/// * `PROFILE=prod` - .env.prod 파일 로드
/// * 기타 - 기본 .env 파일 로드
///
/// 로거 초기화 전에 호출되므로 결과는 반환된 프로필 이름으로만 남깁니다.
fn load_env_file() -> String {
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "dev".to_string());

    match profile.as_str() {
        "prod" => {
            dotenv::from_filename(".env.prod").ok();
        }
        "dev" => {
            dotenv::from_filename(".env.dev").ok();
        }
        _ => {
            dotenv().ok();
        }
    }
    profile
}

/// 로깅 시스템을 초기화합니다
///
/// * `RUST_LOG` - 로깅 레벨 설정 (기본값: "info")
///
/// ```bash
/// RUST_LOG=mongo_accessor=debug cargo run
/// ```
fn init_logging() {
    env_logger::init_from_env(Env::default().default_filter_or("info"));
}
