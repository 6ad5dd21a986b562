//! 자격 증명 해석
//!
//! 명시적으로 전달된 자격 증명을 그대로 사용하거나, 없으면 클러스터 secret을
//! 조회하여 base64로 인코딩된 관리자 사용자명/비밀번호를 디코딩합니다.

use std::collections::HashMap;
use std::fmt;

use base64::{Engine as _, engine::general_purpose};
use log::{debug, error, info};
use serde::Deserialize;

use crate::cluster::ProcessRunner;
use crate::config::ConnectorSettings;
use crate::errors::{ConnectionError, ConnectionResult, ErrorContext};

/// MongoDB 사용자명/비밀번호 쌍
///
/// `Debug` 출력에서 비밀번호는 가려집니다.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// 대상 제품의 인증 세대 구분
///
/// 호출자가 선택하는 값이 아니라 자격 증명 출처로부터 파생됩니다.
/// 명시적 자격 증명은 업그레이드 이전(`Legacy`), 클러스터 secret은
/// 업그레이드 이후(`Current`) 배포에 해당합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaVersion {
    Legacy,
    Current,
}

impl SchemaVersion {
    pub fn for_explicit_credentials(explicit: bool) -> Self {
        if explicit {
            SchemaVersion::Legacy
        } else {
            SchemaVersion::Current
        }
    }
}

#[derive(Debug, Deserialize)]
struct SecretDocument {
    data: Option<HashMap<String, String>>,
}

/// 연결에 사용할 자격 증명과 인증 세대를 결정합니다.
///
/// `explicit`가 있으면 클러스터를 조회하지 않습니다. 없으면 secret 조회 명령을
/// 정확히 한 번 실행하며, 실행 실패/타임아웃/0이 아닌 종료 코드/필드 누락/
/// 잘못된 base64는 모두 `CredentialResolution`으로 보고됩니다.
pub async fn resolve_credentials(
    explicit: Option<&Credentials>,
    settings: &ConnectorSettings,
    runner: &dyn ProcessRunner,
) -> ConnectionResult<(Credentials, SchemaVersion)> {
    if let Some(creds) = explicit {
        debug!("명시적 자격 증명 사용: user={}", creds.username());
        return Ok((creds.clone(), SchemaVersion::Legacy));
    }

    let args: Vec<String> = ["get", "secret", settings.secret_name.as_str(), "-o", "json"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    let output = runner
        .run(&settings.cluster_cli, &args)
        .await
        .step_context(
            ConnectionError::CredentialResolution,
            &format!("{} get secret {}", settings.cluster_cli, settings.secret_name),
        )?;

    if !output.success {
        error!("Failed to get Mongo info -- {} {}", settings.cluster_cli, args.join(" "));
        return Err(ConnectionError::CredentialResolution(format!(
            "{} get secret {} exited with {:?}: {}",
            settings.cluster_cli,
            settings.secret_name,
            output.code,
            output.stderr_lossy()
        )));
    }

    let document: SecretDocument = serde_json::from_slice(&output.stdout)
        .step_context(ConnectionError::CredentialResolution, "secret is not valid JSON")?;
    let data = document.data.ok_or_else(|| {
        ConnectionError::CredentialResolution(format!(
            "secret {} has no data section",
            settings.secret_name
        ))
    })?;

    let username = decode_field(&data, &settings.username_field)?;
    let password = decode_field(&data, &settings.password_field)?;

    info!("🔑 클러스터 secret '{}'에서 자격 증명 조회 완료 (user={})", settings.secret_name, username);
    Ok((Credentials::new(username, password), SchemaVersion::Current))
}

fn decode_field(data: &HashMap<String, String>, field: &str) -> ConnectionResult<String> {
    let encoded = data.get(field).ok_or_else(|| {
        ConnectionError::CredentialResolution(format!("secret field '{}' is missing", field))
    })?;

    let bytes = general_purpose::STANDARD
        .decode(encoded.trim())
        .step_context(ConnectionError::CredentialResolution, &format!("field '{}' is not base64", field))?;

    String::from_utf8(bytes)
        .step_context(ConnectionError::CredentialResolution, &format!("field '{}' is not UTF-8", field))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_password() {
        let creds = Credentials::new("admin", "hunter2");
        let printed = format!("{:?}", creds);

        assert!(printed.contains("admin"));
        assert!(!printed.contains("hunter2"));
    }

    #[test]
    fn test_schema_version_follows_credential_source() {
        assert_eq!(SchemaVersion::for_explicit_credentials(true), SchemaVersion::Legacy);
        assert_eq!(SchemaVersion::for_explicit_credentials(false), SchemaVersion::Current);
    }

    #[test]
    fn test_decode_field() {
        let mut data = HashMap::new();
        data.insert("user".to_string(), "cm9vdA==".to_string());
        data.insert("bad".to_string(), "!!not base64!!".to_string());

        assert_eq!(decode_field(&data, "user").unwrap(), "root");
        assert!(matches!(
            decode_field(&data, "bad"),
            Err(ConnectionError::CredentialResolution(_))
        ));
        assert!(matches!(
            decode_field(&data, "missing"),
            Err(ConnectionError::CredentialResolution(_))
        ));
    }
}
