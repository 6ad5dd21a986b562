//! # 문자열 유틸리티
//!
//! 환경 변수 및 외부 명령 출력 처리와 관련된 공통 유틸리티 함수들입니다.

use std::env;

/// 선택적 문자열 필드 정리
///
/// None 값이거나 빈 문자열/공백만 있는 경우 None을 반환하고,
/// 유효한 문자열인 경우 앞뒤 공백을 제거한 문자열을 Some 옵션으로 반환합니다.
///
/// # 인자
/// * `value` - 정리할 Option<String>
///
/// # 반환값
/// * `None` - 값이 없거나 빈 문자열인 경우
/// * `Some(String)` - 정리된 유효한 문자열
///
/// # 예제
/// ```rust,ignore
/// use crate::utils::string_utils::clean_optional_string;
///
/// assert_eq!(clean_optional_string(Some("  mongo.svc  ".to_string())), Some("mongo.svc".to_string()));
/// assert_eq!(clean_optional_string(Some("   ".to_string())), None);
/// ```
pub fn clean_optional_string(value: Option<String>) -> Option<String> {
    value.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// 환경 변수를 읽어 비어 있지 않은 값만 반환합니다.
///
/// `.env` 파일에 `MONGO_SERVICE=` 처럼 값 없이 선언된 키는
/// 설정되지 않은 것으로 취급합니다.
pub fn env_optional(key: &str) -> Option<String> {
    clean_optional_string(env::var(key).ok())
}

/// `oc get pods -o name` 출력 한 줄에서 Pod 이름만 추출합니다.
///
/// `pod/app-mongodb-0` → `app-mongodb-0`. 접두사가 없는 경우 그대로 반환하며,
/// 빈 줄은 None을 반환합니다.
pub fn strip_resource_prefix(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.rsplit_once('/').map_or(trimmed, |(_, name)| name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_optional_string() {
        assert_eq!(clean_optional_string(Some("Hello".to_string())), Some("Hello".to_string()));
        assert_eq!(clean_optional_string(Some("  World  ".to_string())), Some("World".to_string()));
        assert_eq!(clean_optional_string(Some("".to_string())), None);
        assert_eq!(clean_optional_string(Some("   ".to_string())), None);
        assert_eq!(clean_optional_string(None), None);
    }

    #[test]
    fn test_env_optional_missing_key() {
        assert_eq!(env_optional("MONGO_ACCESSOR_SURELY_UNSET_KEY"), None);
    }

    #[test]
    fn test_strip_resource_prefix() {
        assert_eq!(strip_resource_prefix("pod/app-mongodb-0"), Some("app-mongodb-0"));
        assert_eq!(strip_resource_prefix("  pod/app-mongodb-1\r"), Some("app-mongodb-1"));
        assert_eq!(strip_resource_prefix("app-mongodb-2"), Some("app-mongodb-2"));
        assert_eq!(strip_resource_prefix(""), None);
        assert_eq!(strip_resource_prefix("   "), None);
    }
}
