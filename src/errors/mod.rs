//! 에러 타입 모듈
//!
//! - [`errors`] - `ConnectionError` 및 `ConnectionResult` 정의

#[allow(clippy::module_inception)]
pub mod errors;

pub use errors::*;
