//! # 错误处理测试

use crate::callback::CallbackRejection;
use crate::crypto::CipherError;
use crate::error::{Context, ErrorCategory, ProviderConfigError};
use crate::providers::OAuthProvider;
use axum::http::StatusCode;
use std::error::Error;

#[test]
fn test_config_error_creation() {
    let err = ProviderConfigError::config("missing allowlist");
    assert!(matches!(err, ProviderConfigError::Config { .. }));
    assert_eq!(err.to_string(), "configuration error: missing allowlist");
    assert_eq!(err.category(), ErrorCategory::Server);
}

#[test]
fn test_config_error_with_source() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err = ProviderConfigError::config_with_source("failed to read config", io_err);

    assert!(err.to_string().contains("failed to read config"));
    assert!(err.source().is_some());
}

#[test]
fn test_callback_rejection_is_client_error() {
    let err: ProviderConfigError = CallbackRejection::EmbeddedCredentials.into();
    assert_eq!(err.category(), ErrorCategory::Client);
    assert_eq!(
        err.to_http_response_parts(),
        (StatusCode::BAD_REQUEST, "INVALID_CALLBACK_URL")
    );
    assert!(err.to_string().contains("embedded credentials"));
}

#[test]
fn test_protected_provider_is_distinct_from_validation() {
    let err = ProviderConfigError::ProtectedProvider {
        provider: OAuthProvider::Local,
    };
    assert_eq!(err.category(), ErrorCategory::Client);
    assert_eq!(err.to_http_response_parts().1, "PROTECTED_PROVIDER");
}

#[test]
fn test_decryption_failure_is_server_error() {
    let err = ProviderConfigError::DecryptionFailed {
        provider: OAuthProvider::Google,
        source: CipherError::AuthenticationFailed,
    };
    assert_eq!(err.category(), ErrorCategory::Server);
    assert_eq!(err.to_http_response_parts().1, "DECRYPTION_FAILED");
    assert!(err.source().is_some());
}

#[test]
fn test_not_configured_maps_to_not_found() {
    let err = ProviderConfigError::NotConfigured {
        provider: OAuthProvider::Kakao,
    };
    assert_eq!(err.to_http_response_parts().0, StatusCode::NOT_FOUND);
}

#[test]
fn test_context_preserves_root_kind() {
    let result: Result<(), ProviderConfigError> = Err(ProviderConfigError::NotConfigured {
        provider: OAuthProvider::Naver,
    });

    let err = result.context("loading handshake credentials").unwrap_err();
    assert_eq!(err.to_string(), "loading handshake credentials");
    assert!(matches!(
        err.root(),
        ProviderConfigError::NotConfigured { .. }
    ));
    assert_eq!(err.category(), ErrorCategory::Client);
    assert_eq!(err.to_http_response_parts().0, StatusCode::NOT_FOUND);
}

#[test]
fn test_auto_conversion_from_toml_error() {
    let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
    let err: ProviderConfigError = toml_err.into();
    assert!(matches!(err, ProviderConfigError::Config { .. }));
}

#[test]
fn test_error_macros() {
    let err = crate::config_error!("bad value {}", 42);
    assert_eq!(err.to_string(), "configuration error: bad value 42");

    let err = crate::internal_error!("boom");
    assert!(matches!(err, ProviderConfigError::Internal { .. }));
}
