//! Security response headers.
//!
//! # Responsibilities
//! - Describe the content-security, cross-origin and referrer policy
//! - Render the policy into a header map once at startup
//! - Stamp those headers onto every response, whatever produced it
//!
//! # Design Decisions
//! - The policy is a plain value with no runtime input
//! - Headers are overwritten, never merged with handler-set values

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{
        header::{self, InvalidHeaderValue},
        HeaderMap, HeaderName, HeaderValue,
    },
    middleware::Next,
    response::Response,
};

const CROSS_ORIGIN_EMBEDDER_POLICY: HeaderName =
    HeaderName::from_static("cross-origin-embedder-policy");
const CROSS_ORIGIN_OPENER_POLICY: HeaderName =
    HeaderName::from_static("cross-origin-opener-policy");
const CROSS_ORIGIN_RESOURCE_POLICY: HeaderName =
    HeaderName::from_static("cross-origin-resource-policy");
const ORIGIN_AGENT_CLUSTER: HeaderName = HeaderName::from_static("origin-agent-cluster");
const X_DOWNLOAD_OPTIONS: HeaderName = HeaderName::from_static("x-download-options");
const X_PERMITTED_CROSS_DOMAIN_POLICIES: HeaderName =
    HeaderName::from_static("x-permitted-cross-domain-policies");

/// One CSP directive and its allowed sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub name: &'static str,
    pub sources: Vec<&'static str>,
}

impl Directive {
    pub fn new(name: &'static str, sources: &[&'static str]) -> Self {
        Self {
            name,
            sources: sources.to_vec(),
        }
    }

    /// A directive without sources, such as `upgrade-insecure-requests`.
    pub fn flag(name: &'static str) -> Self {
        Self::new(name, &[])
    }
}

/// An ordered list of CSP directives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentSecurityPolicy {
    pub directives: Vec<Directive>,
}

impl ContentSecurityPolicy {
    /// Serialize as a `Content-Security-Policy` value: directives separated by `;`.
    pub fn header_value(&self) -> String {
        self.directives
            .iter()
            .map(|directive| {
                if directive.sources.is_empty() {
                    directive.name.to_string()
                } else {
                    format!("{} {}", directive.name, directive.sources.join(" "))
                }
            })
            .collect::<Vec<_>>()
            .join(";")
    }
}

impl Default for ContentSecurityPolicy {
    fn default() -> Self {
        Self {
            directives: vec![
                Directive::new("default-src", &["'self'"]),
                Directive::new("script-src", &["'self'"]),
                Directive::new("style-src", &["'self'"]),
                Directive::new("img-src", &["'self'", "data:", "https:"]),
                Directive::new("object-src", &["'none'"]),
                Directive::flag("upgrade-insecure-requests"),
                Directive::new("base-uri", &["'self'"]),
                Directive::new("font-src", &["'self'", "https:", "data:"]),
                Directive::new("form-action", &["'self'"]),
                Directive::new("frame-ancestors", &["'self'"]),
                Directive::new("script-src-attr", &["'none'"]),
            ],
        }
    }
}

/// The full set of security headers applied to every response.
#[derive(Debug, Clone)]
pub struct SecurityHeaderPolicy {
    pub content_security_policy: ContentSecurityPolicy,
    pub cross_origin_embedder_policy: &'static str,
    pub cross_origin_opener_policy: &'static str,
    pub cross_origin_resource_policy: &'static str,
    pub referrer_policy: &'static str,
    pub strict_transport_security: &'static str,
    pub frame_options: &'static str,
}

impl Default for SecurityHeaderPolicy {
    fn default() -> Self {
        Self {
            content_security_policy: ContentSecurityPolicy::default(),
            cross_origin_embedder_policy: "require-corp",
            cross_origin_opener_policy: "same-origin",
            cross_origin_resource_policy: "same-site",
            referrer_policy: "no-referrer",
            strict_transport_security: "max-age=31536000; includeSubDomains",
            frame_options: "SAMEORIGIN",
        }
    }
}

impl SecurityHeaderPolicy {
    /// Render the policy into the headers stamped on each response.
    pub fn to_header_map(&self) -> Result<HeaderMap, InvalidHeaderValue> {
        let mut headers = HeaderMap::new();

        headers.insert(
            header::CONTENT_SECURITY_POLICY,
            HeaderValue::from_str(&self.content_security_policy.header_value())?,
        );
        headers.insert(
            CROSS_ORIGIN_EMBEDDER_POLICY,
            HeaderValue::from_static(self.cross_origin_embedder_policy),
        );
        headers.insert(
            CROSS_ORIGIN_OPENER_POLICY,
            HeaderValue::from_static(self.cross_origin_opener_policy),
        );
        headers.insert(
            CROSS_ORIGIN_RESOURCE_POLICY,
            HeaderValue::from_static(self.cross_origin_resource_policy),
        );
        headers.insert(ORIGIN_AGENT_CLUSTER, HeaderValue::from_static("?1"));
        headers.insert(
            header::REFERRER_POLICY,
            HeaderValue::from_static(self.referrer_policy),
        );
        headers.insert(
            header::STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static(self.strict_transport_security),
        );
        headers.insert(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        );
        headers.insert(
            header::X_DNS_PREFETCH_CONTROL,
            HeaderValue::from_static("off"),
        );
        headers.insert(X_DOWNLOAD_OPTIONS, HeaderValue::from_static("noopen"));
        headers.insert(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static(self.frame_options),
        );
        headers.insert(
            X_PERMITTED_CROSS_DOMAIN_POLICIES,
            HeaderValue::from_static("none"),
        );
        headers.insert(header::X_XSS_PROTECTION, HeaderValue::from_static("0"));

        Ok(headers)
    }
}

/// Middleware stamping the rendered policy onto every response.
pub async fn apply_security_headers(
    State(headers): State<Arc<HeaderMap>>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    for (name, value) in headers.iter() {
        response.headers_mut().insert(name.clone(), value.clone());
    }
    response
}
