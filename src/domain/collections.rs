//! MVI 데이터베이스의 알려진 컬렉션 목록
//!
//! 연결 관리자와는 무관한 정적 데이터로, 백업/점검 도구가 대상 컬렉션을
//! 순회할 때 사용합니다.

/// `DLAAS` 데이터베이스에 존재할 수 있는 컬렉션 이름 (알파벳 순이 아닌 관리 순서)
pub const KNOWN_COLLECTIONS: &[&str] = &[
    "DataSets",
    "DLTasks",
    "TrainedModels",
    "ProjectGroups",
    "BGTasks",
    "DataSetCategories",
    "DataSetFiles",
    "DataSetFileLabels",
    "DataSetFileUserKeys",
    "DataSetTags",
    "DataSetActiontags",
    "DataSetFileActionLabels",
    "DataSetFileObjectLabels",
    "InferenceOps",
    "InferenceDetails",
    "WebAPIs",
    "UserDNNs",
    "DnnScripts",
    "DeployableBinaries",
    "DockerHostPorts",
    "SysUsers",
    "UploadOperations",
    "Tokens",
    "RegisteredApps",
];

/// 실제 컬렉션 목록 중 알려진 컬렉션만 관리 순서대로 반환합니다.
pub fn present_known_collections(actual: &[String]) -> Vec<&'static str> {
    KNOWN_COLLECTIONS
        .iter()
        .copied()
        .filter(|known| actual.iter().any(|name| name == known))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_collections_are_unique() {
        let mut names = KNOWN_COLLECTIONS.to_vec();
        names.sort();
        names.dedup();

        assert_eq!(names.len(), KNOWN_COLLECTIONS.len());
    }

    #[test]
    fn test_present_known_collections_keeps_table_order() {
        let actual = vec![
            "Tokens".to_string(),
            "system.views".to_string(),
            "DataSets".to_string(),
        ];

        assert_eq!(present_known_collections(&actual), vec!["DataSets", "Tokens"]);
    }
}
