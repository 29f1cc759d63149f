//! # 身份提供商类型定义

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ProviderConfigError;

/// 身份提供商标识（封闭集合）
///
/// 边界处拒绝未知标识，数据模型中不出现任意字符串。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OAuthProvider {
    /// 内置的本地账号登录，不可禁用
    Local,
    /// Google
    Google,
    /// Kakao
    Kakao,
    /// Naver
    Naver,
    /// Sign in with Apple
    Apple,
}

impl OAuthProvider {
    /// 所有已知提供商，按声明顺序
    pub const ALL: [Self; 5] = [
        Self::Local,
        Self::Google,
        Self::Kakao,
        Self::Naver,
        Self::Apple,
    ];

    /// 存储用标识
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Google => "google",
            Self::Kakao => "kakao",
            Self::Naver => "naver",
            Self::Apple => "apple",
        }
    }

    /// 是否受保护（永远启用）
    #[must_use]
    pub const fn is_protected(self) -> bool {
        matches!(self, Self::Local)
    }

    /// 默认显示名称
    #[must_use]
    pub const fn default_display_name(self) -> &'static str {
        match self {
            Self::Local => "Email",
            Self::Google => "Google",
            Self::Kakao => "Kakao",
            Self::Naver => "Naver",
            Self::Apple => "Apple",
        }
    }

    /// 默认描述
    #[must_use]
    pub const fn default_description(self) -> &'static str {
        match self {
            Self::Local => "Sign in with email and password",
            Self::Google => "Sign in with Google account",
            Self::Kakao => "Sign in with Kakao account",
            Self::Naver => "Sign in with Naver account",
            Self::Apple => "Sign in with Apple ID",
        }
    }
}

impl fmt::Display for OAuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OAuthProvider {
    type Err = ProviderConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|provider| provider.as_str() == normalized)
            .ok_or_else(|| ProviderConfigError::unknown_provider(s.trim()))
    }
}

impl TryFrom<&str> for OAuthProvider {
    type Error = ProviderConfigError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}
