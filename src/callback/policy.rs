//! # 回调地址策略
//!
//! 策略只依赖静态白名单，构造后不可变

use url::Host;

use crate::error::{ProviderConfigError, Result};

/// 回调地址白名单策略
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackPolicy {
    /// 规范化后的生产基础域名（小写、无首尾点）
    base_domains: Vec<String>,
    /// 是否接受本地回环地址（开发环境）
    allow_loopback: bool,
}

impl CallbackPolicy {
    /// 使用生产基础域名创建策略，默认允许本地回环地址
    pub fn new<I, S>(base_domains: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let base_domains = base_domains
            .into_iter()
            .map(|domain| normalize_base_domain(domain.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        if base_domains.is_empty() {
            return Err(ProviderConfigError::config(
                "callback policy requires at least one base domain",
            ));
        }

        Ok(Self {
            base_domains,
            allow_loopback: true,
        })
    }

    /// 设置是否允许本地回环地址
    #[must_use]
    pub const fn with_loopback(mut self, allow: bool) -> Self {
        self.allow_loopback = allow;
        self
    }

    /// 生产基础域名
    #[must_use]
    pub fn base_domains(&self) -> &[String] {
        &self.base_domains
    }

    /// 是否允许本地回环地址
    #[must_use]
    pub const fn allows_loopback(&self) -> bool {
        self.allow_loopback
    }

    /// 主机是否为某个基础域名本身或其子域名（按标签对齐，不做子串匹配）
    #[must_use]
    pub fn matches_base_domain(&self, host: &str) -> bool {
        let host = host.strip_suffix('.').unwrap_or(host).to_ascii_lowercase();
        if host.split('.').any(str::is_empty) {
            return false;
        }
        self.base_domains.iter().any(|base| {
            host == *base
                || host
                    .strip_suffix(base.as_str())
                    .is_some_and(|prefix| prefix.len() > 1 && prefix.ends_with('.'))
        })
    }
}

fn normalize_base_domain(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_start_matches('.').trim_end_matches('.');
    if trimmed.is_empty() {
        return Err(ProviderConfigError::config("callback base domain is empty"));
    }

    match Host::parse(trimmed) {
        Ok(Host::Domain(domain)) if domain.contains('.') && domain != "localhost" => Ok(domain),
        _ => Err(ProviderConfigError::config(format!(
            "callback base domain `{trimmed}` is not a registrable domain name"
        ))),
    }
}
