use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request ID wrapper for use in request extensions
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

/// Request context containing request metadata
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: String,
    pub client_ip: String,
    pub user_agent: Option<String>,
}

impl RequestContext {
    pub fn new(request_id: String, client_ip: String, user_agent: Option<String>) -> Self {
        Self {
            request_id,
            client_ip,
            user_agent,
        }
    }
}

/// Extract client IP address from headers
pub fn extract_client_ip(headers: &HeaderMap) -> String {
    // Check for X-Forwarded-For header (proxy/load balancer)
    if let Some(forwarded) = headers.get("x-forwarded-for") {
        if let Ok(forwarded_str) = forwarded.to_str() {
            if let Some(first_ip) = forwarded_str.split(',').next() {
                return first_ip.trim().to_string();
            }
        }
    }

    if let Some(real_ip) = headers.get("x-real-ip") {
        if let Ok(real_ip_str) = real_ip.to_str() {
            return real_ip_str.to_string();
        }
    }

    "unknown".to_string()
}

/// Extract user agent from headers
pub fn extract_user_agent(headers: &HeaderMap) -> Option<String> {
    headers
        .get("user-agent")
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string())
}

/// Request ID middleware - reuses the caller's `x-request-id` or assigns one
pub async fn request_id_middleware(mut req: Request, next: Next) -> Response {
    let request_id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(|s| RequestId(s.to_string()))
        .unwrap_or_default();

    req.extensions_mut().insert(request_id.clone());

    tracing::info!(
        request_id = %request_id.as_str(),
        method = %req.method(),
        path = %req.uri().path(),
        "Incoming request"
    );

    let mut response = next.run(req).await;

    if let Ok(header_value) = HeaderValue::from_str(request_id.as_str()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, header_value);
    }

    response
}

/// Request context middleware - adds client metadata to each request
pub async fn request_context_middleware(mut req: Request, next: Next) -> Response {
    let headers = req.headers();
    let request_id = req
        .extensions()
        .get::<RequestId>()
        .cloned()
        .unwrap_or_default();

    let client_ip = extract_client_ip(headers);
    let user_agent = extract_user_agent(headers);

    tracing::debug!(
        request_id = %request_id.as_str(),
        client_ip = %client_ip,
        user_agent = ?user_agent,
        "Request context"
    );

    let context = RequestContext::new(request_id.0, client_ip, user_agent);
    req.extensions_mut().insert(context);

    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_id_new() {
        let id = RequestId::new();
        assert_eq!(id.as_str().len(), 36); // UUID v4 length
    }

    #[test]
    fn test_request_context_new() {
        let ctx = RequestContext::new(
            "test-123".to_string(),
            "127.0.0.1".to_string(),
            Some("Mozilla/5.0".to_string()),
        );

        assert_eq!(ctx.request_id, "test-123");
        assert_eq!(ctx.client_ip, "127.0.0.1");
        assert_eq!(ctx.user_agent, Some("Mozilla/5.0".to_string()));
    }

    #[test]
    fn test_extract_client_ip_from_multiple_forwarded() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", "192.168.1.1, 10.0.0.1".parse().unwrap());

        assert_eq!(extract_client_ip(&headers), "192.168.1.1");
    }

    #[test]
    fn test_extract_client_ip_from_real_ip() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", "10.1.2.3".parse().unwrap());

        assert_eq!(extract_client_ip(&headers), "10.1.2.3");
    }

    #[test]
    fn test_extract_client_ip_unknown() {
        let headers = HeaderMap::new();
        assert_eq!(extract_client_ip(&headers), "unknown");
        assert!(extract_user_agent(&headers).is_none());
    }
}
