use axum::{
    body::Body,
    http::{
        header::{self, HeaderValue},
        HeaderMap, Method, Request, Response, StatusCode,
    },
    middleware::Next,
};
use tracing::debug;

/// Value for `Access-Control-Allow-Origin`, if any.
#[derive(Debug, Clone, PartialEq)]
enum AllowedOrigin {
    /// Echo the caller's origin back, with credentials
    Reflect(String),
    /// Plain `*`, no credentials
    Any,
}

fn resolve_origin(
    origin: Option<&str>,
    allowed_origins: &[String],
    is_production: bool,
) -> Option<AllowedOrigin> {
    let has_wildcard = allowed_origins.iter().any(|o| o == "*");

    match origin {
        // Dev/staging with wildcard: reflect the origin so credentials work
        Some(origin) if has_wildcard && !is_production => {
            debug!("CORS: Reflecting origin for staging/dev: {}", origin);
            Some(AllowedOrigin::Reflect(origin.to_string()))
        },
        Some(origin) if allowed_origins.iter().any(|o| o == origin) => {
            debug!("CORS: Origin allowed from whitelist: {}", origin);
            Some(AllowedOrigin::Reflect(origin.to_string()))
        },
        _ if has_wildcard => Some(AllowedOrigin::Any),
        Some(origin) => {
            debug!("CORS: Origin not in whitelist: {}", origin);
            None
        },
        None => None,
    }
}

fn apply_origin(headers: &mut HeaderMap, allowed: &AllowedOrigin) {
    match allowed {
        AllowedOrigin::Reflect(origin) => {
            if let Ok(value) = HeaderValue::from_str(origin) {
                headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, value);
                headers.insert(
                    header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
                    HeaderValue::from_static("true"),
                );
                headers.insert(header::VARY, HeaderValue::from_static("origin"));
            }
        },
        AllowedOrigin::Any => {
            headers.insert(
                header::ACCESS_CONTROL_ALLOW_ORIGIN,
                HeaderValue::from_static("*"),
            );
        },
    }
}

/// CORS middleware driven by `CORS_ALLOWED_ORIGINS`.
///
/// A `*` entry allows every origin; outside production the caller's origin
/// is reflected so credentialed requests also work.
pub async fn dynamic_cors_middleware(
    req: Request<Body>,
    next: Next,
) -> Result<Response<Body>, StatusCode> {
    let config = crate::app_config::config();

    let origin = req
        .headers()
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok());
    let allowed_origin = resolve_origin(
        origin,
        &config.cors_allowed_origins,
        config.is_production(),
    );

    // Handle preflight OPTIONS requests
    if req.method() == Method::OPTIONS {
        let mut response = Response::new(Body::empty());

        if let Some(allowed) = &allowed_origin {
            let headers = response.headers_mut();
            apply_origin(headers, allowed);
            headers.insert(
                header::ACCESS_CONTROL_ALLOW_METHODS,
                HeaderValue::from_static("GET, POST, OPTIONS"),
            );
            headers.insert(
                header::ACCESS_CONTROL_ALLOW_HEADERS,
                HeaderValue::from_static("content-type, accept, origin, x-requested-with"),
            );
            headers.insert(
                header::ACCESS_CONTROL_MAX_AGE,
                HeaderValue::from_static("3600"),
            );
        }

        *response.status_mut() = StatusCode::OK;
        return Ok(response);
    }

    let mut response = next.run(req).await;

    if let Some(allowed) = &allowed_origin {
        apply_origin(response.headers_mut(), allowed);
    }

    Ok(response)
}
