//! # 测试框架模块
//!
//! 提供测试工具、fixtures 和测试辅助函数，供单元测试和 `tests/` 集成测试共用

#[cfg(any(test, feature = "testing"))]
pub mod fixtures;
#[cfg(any(test, feature = "testing"))]
pub mod helpers;

#[cfg(any(test, feature = "testing"))]
pub use fixtures::*;
#[cfg(any(test, feature = "testing"))]
pub use helpers::*;
