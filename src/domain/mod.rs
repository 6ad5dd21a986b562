//! # Domain Module
//!
//! 연결 관리와 무관한 정적 도메인 데이터를 담습니다.
//!
//! - [`collections`] - 알려진 컬렉션 이름 테이블

pub mod collections;
