//! Typed extraction of auth-relevant request headers.
//!
//! Headers are read from the raw `http::HeaderMap` exactly once, at the
//! authentication boundary; downstream code only ever sees this struct.
//! Values that are missing, empty, or not valid UTF-8 are treated as absent.

use http::HeaderMap;
use http::header::AUTHORIZATION;

use crate::types::{CorrelationId, TenantId, UserId};

pub const API_KEY_HEADER: &str = "x-api-key";
pub const TENANT_ID_HEADER: &str = "x-tenant-id";
pub const USER_ID_HEADER: &str = "x-user-id";
pub const IMPERSONATE_USER_ID_HEADER: &str = "x-impersonate-user-id";
pub const IMPERSONATE_TENANT_ID_HEADER: &str = "x-impersonate-tenant-id";
pub const CORRELATION_ID_HEADER: &str = "x-correlation-id";

/// Auth-relevant headers of one request, extracted and typed.
#[derive(Debug, Clone, Default)]
pub struct RequestHeaders {
    /// Raw `Authorization` header value.
    pub authorization: Option<String>,
    /// Candidate static API key (`x-api-key`).
    pub api_key: Option<String>,
    /// Tenant scope requested by the caller (`x-tenant-id`).
    pub tenant_id: Option<TenantId>,
    /// Caller-asserted user id, honored on the API-key path only.
    pub user_id: Option<UserId>,
    /// Master impersonation target user (`x-impersonate-user-id`).
    pub impersonate_user_id: Option<UserId>,
    /// Master impersonation target tenant (`x-impersonate-tenant-id`).
    pub impersonate_tenant_id: Option<TenantId>,
    /// Caller-supplied correlation id (`x-correlation-id`).
    pub correlation_id: Option<CorrelationId>,
}

impl RequestHeaders {
    /// Extract from a raw header map.
    pub fn from_header_map(headers: &HeaderMap) -> Self {
        Self {
            authorization: header_str(headers, AUTHORIZATION.as_str()),
            api_key: header_str(headers, API_KEY_HEADER),
            tenant_id: header_str(headers, TENANT_ID_HEADER).map(TenantId::new),
            user_id: header_str(headers, USER_ID_HEADER).map(UserId::new),
            impersonate_user_id: header_str(headers, IMPERSONATE_USER_ID_HEADER).map(UserId::new),
            impersonate_tenant_id: header_str(headers, IMPERSONATE_TENANT_ID_HEADER)
                .map(TenantId::new),
            correlation_id: header_str(headers, CORRELATION_ID_HEADER).map(CorrelationId::new),
        }
    }

    /// The bearer token, if the `Authorization` header carries one.
    ///
    /// Only the exact `Bearer <token>` scheme is accepted; raw tokens and
    /// other schemes are not.
    pub fn bearer_token(&self) -> Option<&str> {
        let token = self.authorization.as_deref()?.strip_prefix("Bearer ")?.trim();
        if token.is_empty() { None } else { Some(token) }
    }

    /// Whether either impersonation header is present.
    pub fn has_impersonation(&self) -> bool {
        self.impersonate_user_id.is_some() || self.impersonate_tenant_id.is_some()
    }
}

fn header_str(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    fn header_map(pairs: &[(&str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(
                http::header::HeaderName::from_bytes(name.as_bytes()).unwrap(),
                HeaderValue::from_str(value).unwrap(),
            );
        }
        map
    }

    #[test]
    fn test_extracts_all_fields() {
        let headers = RequestHeaders::from_header_map(&header_map(&[
            ("authorization", "Bearer abc.def.ghi"),
            ("x-api-key", "key-123"),
            ("x-tenant-id", "tenant-1"),
            ("x-user-id", "user-1"),
            ("x-impersonate-user-id", "user-2"),
            ("x-impersonate-tenant-id", "tenant-2"),
            ("x-correlation-id", "corr-1"),
        ]));

        assert_eq!(headers.bearer_token(), Some("abc.def.ghi"));
        assert_eq!(headers.api_key.as_deref(), Some("key-123"));
        assert_eq!(headers.tenant_id, Some(TenantId::new("tenant-1")));
        assert_eq!(headers.user_id, Some(UserId::new("user-1")));
        assert_eq!(headers.impersonate_user_id, Some(UserId::new("user-2")));
        assert_eq!(
            headers.impersonate_tenant_id,
            Some(TenantId::new("tenant-2"))
        );
        assert_eq!(headers.correlation_id, Some(CorrelationId::new("corr-1")));
        assert!(headers.has_impersonation());
    }

    #[test]
    fn test_empty_map_yields_absent_fields() {
        let headers = RequestHeaders::from_header_map(&HeaderMap::new());
        assert!(headers.authorization.is_none());
        assert!(headers.api_key.is_none());
        assert!(headers.bearer_token().is_none());
        assert!(!headers.has_impersonation());
    }

    #[test]
    fn test_bearer_scheme_is_required() {
        let basic = RequestHeaders::from_header_map(&header_map(&[(
            "authorization",
            "Basic dXNlcjpwYXNz",
        )]));
        assert!(basic.bearer_token().is_none());

        let raw = RequestHeaders::from_header_map(&header_map(&[("authorization", "abc.def.ghi")]));
        assert!(raw.bearer_token().is_none());

        let empty = RequestHeaders::from_header_map(&header_map(&[("authorization", "Bearer ")]));
        assert!(empty.bearer_token().is_none());
    }

    #[test]
    fn test_blank_values_are_absent() {
        let headers =
            RequestHeaders::from_header_map(&header_map(&[("x-tenant-id", "  "), ("x-api-key", "")]));
        assert!(headers.tenant_id.is_none());
        assert!(headers.api_key.is_none());
    }

    #[test]
    fn test_non_utf8_value_is_absent() {
        let mut map = HeaderMap::new();
        map.insert(
            http::header::HeaderName::from_static("x-tenant-id"),
            HeaderValue::from_bytes(&[0xff, 0xfe]).unwrap(),
        );
        let headers = RequestHeaders::from_header_map(&map);
        assert!(headers.tenant_id.is_none());
    }
}
