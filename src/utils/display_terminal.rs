//! 터미널 출력 포맷팅 유틸리티
//!
//! 바이너리 실행 과정에서 사용되는 터미널 출력 함수들을 제공합니다.
//! 박스 형태의 제목, 연결 단계 표시, 최종 요약 등을 시각적으로 표현합니다.

/// 박스 형태로 둘러싸인 제목을 출력합니다
///
/// Unicode 박스 문자를 사용하여 시각적으로 눈에 띄는 제목을 출력합니다.
/// 텍스트는 자동으로 중앙 정렬됩니다.
///
/// # Examples
///
/// ```rust,ignore
/// use crate::utils::display_terminal::print_boxed_title;
///
/// print_boxed_title("MongoDB Accessor");
/// ```
///
/// Output:
/// ```text
/// ╔══════════════════════════════════════════════════╗
/// ║                 MongoDB Accessor                 ║
/// ╚══════════════════════════════════════════════════╝
/// ```
pub fn print_boxed_title(title: &str) {
    // 고정 너비 50칸 사용 (박스 내부 콘텐츠)
    let content_width = 50;
    let border = "═".repeat(content_width);

    println!("╔{}╗", border);
    println!("║{:^50}║", title);
    println!("╚{}╝", border);
}

/// 서브 항목의 상태를 표시합니다
///
/// Output:
/// ```text
///    ├─ endpoint: 127.0.0.1:27017
/// ```
pub fn print_sub_task(name: &str, status: &str) {
    println!("   ├─ {}: {}", name, status);
}

/// 컬렉션 확인 결과 요약을 출력합니다
///
/// # Arguments
///
/// * `present` - 데이터베이스에서 발견된 알려진 컬렉션 수
/// * `known` - 알려진 컬렉션 전체 수
///
/// Output:
/// ```text
/// ╔══════════════════════════════════════════════════╗
/// ║             🎉 MONGODB CONNECTION READY          ║
/// ╚══════════════════════════════════════════════════╝
///    📦 Known collections present: 20 / 24
/// ```
pub fn print_final_summary(present: usize, known: usize) {
    println!();
    print_boxed_title("🎉 MONGODB CONNECTION READY");
    println!("   📦 Known collections present: {} / {}", present, known);
    println!();
}
