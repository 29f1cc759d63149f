//! # 回调地址校验器
//!
//! 纯函数：结果只取决于候选 URL 与静态策略。所有检查必须通过，
//! 第一个失败的检查决定拒绝原因。

use serde::Serialize;
use std::net::Ipv4Addr;
use thiserror::Error;
use url::{Host, ParseError, Url};

use super::CallbackPolicy;

const LOOPBACK_HOSTNAME: &str = "localhost";

/// 回调地址被拒绝的原因
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum CallbackRejection {
    /// 空字符串
    #[error("callback URL is empty")]
    Empty,

    /// 结构不完整或无法解析
    #[error("callback URL is not a valid absolute URL: {detail}")]
    Malformed { detail: String },

    /// 以 `//` 开头的协议相对地址
    #[error("protocol-relative callback URLs are not allowed")]
    ProtocolRelative,

    /// 非 http/https 协议
    #[error("callback URL scheme `{scheme}` is not allowed; use http or https")]
    DisallowedScheme { scheme: String },

    /// 缺少主机
    #[error("callback URL must include a host")]
    MissingHost,

    /// 含有 `user:pass@` 形式的用户信息
    #[error("callback URL must not contain embedded credentials")]
    EmbeddedCredentials,

    /// 端口不在 1-65535 范围内
    #[error("callback URL port must be between 1 and 65535")]
    InvalidPort,

    /// 策略禁止本地回环地址
    #[error("loopback callback URLs are disabled by policy")]
    LoopbackNotAllowed,

    /// 生产域名使用了 http
    #[error("callback URL for host `{host}` must use https")]
    InsecureScheme { host: String },

    /// 主机不在白名单内
    #[error("callback URL host `{host}` is not in the allowlist")]
    HostNotAllowed { host: String },
}

/// 回调地址校验器
#[derive(Debug, Clone)]
pub struct CallbackValidator {
    policy: CallbackPolicy,
}

impl CallbackValidator {
    /// 使用给定策略创建校验器
    #[must_use]
    pub const fn new(policy: CallbackPolicy) -> Self {
        Self { policy }
    }

    /// 当前策略
    #[must_use]
    pub const fn policy(&self) -> &CallbackPolicy {
        &self.policy
    }

    /// 候选地址是否可以注册
    #[must_use]
    pub fn is_allowed(&self, candidate: &str) -> bool {
        self.validate(candidate).is_ok()
    }

    /// 校验候选回调地址
    pub fn validate(&self, candidate: &str) -> Result<(), CallbackRejection> {
        if candidate.trim().is_empty() {
            return Err(CallbackRejection::Empty);
        }

        // WHATWG 解析器会静默去除空白和控制字符，这里直接拒绝
        if candidate
            .chars()
            .any(|c| c.is_control() || c.is_whitespace())
        {
            return Err(malformed("contains whitespace or control characters"));
        }

        if is_protocol_relative(candidate) {
            return Err(CallbackRejection::ProtocolRelative);
        }

        let url = Url::parse(candidate).map_err(map_parse_error)?;

        let scheme = url.scheme();
        if scheme != "http" && scheme != "https" {
            return Err(CallbackRejection::DisallowedScheme {
                scheme: scheme.to_string(),
            });
        }

        // `https:example.com` 会被解析器补全，原始输入必须显式带有 `://`
        let Some(rest) = candidate
            .get(scheme.len()..)
            .and_then(|rest| rest.strip_prefix("://"))
        else {
            return Err(malformed("missing `://` after the scheme"));
        };

        let host = url.host().ok_or(CallbackRejection::MissingHost)?;

        if let Host::Domain(domain) = &host {
            if has_empty_label(domain) {
                return Err(malformed("host contains an empty label"));
            }
        }

        if !url.username().is_empty() || url.password().is_some() || raw_authority(rest).contains('@')
        {
            return Err(CallbackRejection::EmbeddedCredentials);
        }

        if url.port() == Some(0) {
            return Err(CallbackRejection::InvalidPort);
        }

        self.check_host(&host, scheme == "https")
    }

    fn check_host(&self, host: &Host<&str>, secure: bool) -> Result<(), CallbackRejection> {
        let is_loopback = match host {
            Host::Domain(domain) => strip_root(domain) == LOOPBACK_HOSTNAME,
            Host::Ipv4(addr) => *addr == Ipv4Addr::LOCALHOST,
            Host::Ipv6(_) => false,
        };

        if is_loopback {
            // http 与 https 均接受：回环上的 TLS 不构成降级
            return if self.policy.allows_loopback() {
                Ok(())
            } else {
                Err(CallbackRejection::LoopbackNotAllowed)
            };
        }

        match host {
            Host::Domain(domain) if self.policy.matches_base_domain(domain) => {
                if secure {
                    Ok(())
                } else {
                    Err(CallbackRejection::InsecureScheme {
                        host: (*domain).to_string(),
                    })
                }
            }
            other => Err(CallbackRejection::HostNotAllowed {
                host: other.to_string(),
            }),
        }
    }
}

fn malformed(detail: &str) -> CallbackRejection {
    CallbackRejection::Malformed {
        detail: detail.to_string(),
    }
}

/// 去掉至多一个表示根域的结尾点
fn strip_root(domain: &str) -> &str {
    domain.strip_suffix('.').unwrap_or(domain)
}

fn has_empty_label(domain: &str) -> bool {
    strip_root(domain).split('.').any(str::is_empty)
}

fn is_protocol_relative(candidate: &str) -> bool {
    let mut chars = candidate.chars();
    matches!(
        (chars.next(), chars.next()),
        (Some('/' | '\\'), Some('/' | '\\'))
    )
}

/// `scheme://` 之后、路径/查询/片段之前的原始 authority
fn raw_authority(rest: &str) -> &str {
    rest.find(['/', '\\', '?', '#'])
        .map_or(rest, |end| &rest[..end])
}

fn map_parse_error(err: ParseError) -> CallbackRejection {
    match err {
        ParseError::InvalidPort => CallbackRejection::InvalidPort,
        ParseError::EmptyHost => CallbackRejection::MissingHost,
        ParseError::RelativeUrlWithoutBase => malformed("missing scheme"),
        other => CallbackRejection::Malformed {
            detail: other.to_string(),
        },
    }
}
