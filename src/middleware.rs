/* src/middleware.rs */

use axum::{
    extract::{ConnectInfo, FromRequestParts, Request},
    http::{HeaderMap, request::Parts},
    response::Response,
};
use futures_util::future::BoxFuture;
use std::{
    convert::Infallible,
    net::SocketAddr,
    task::{Context, Poll},
};
use tower::{Layer, Service};

use crate::classify::{AddressClass, classify};
use crate::extractor::{AddressResolver, target_for};

/// Extension that holds the resolved client address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientAddress(pub String);

impl ClientAddress {
    pub fn address(&self) -> &str {
        &self.0
    }

    pub fn class(&self) -> AddressClass {
        classify(&self.0)
    }

    /// The address to look up, or `None` to look up the server's egress address.
    pub fn lookup_target(&self) -> Option<&str> {
        target_for(&self.0)
    }

    fn resolve(resolver: &AddressResolver, headers: &HeaderMap, remote: Option<SocketAddr>) -> Self {
        let header_map = headers_to_map(headers);
        let fallback = remote.map(|addr| addr.ip().to_string());
        Self(resolver.resolve(&header_map, fallback.as_deref()))
    }
}

/// Layer that resolves the client address of every request and stores it
/// as a [`ClientAddress`] request extension.
///
/// # Examples
///
/// ```rust,no_run
/// use axum::{Router, routing::get};
/// use iplocate::{ClientAddress, ClientAddressLayer};
///
/// async fn handler(client: ClientAddress) -> String {
///     client.address().to_string()
/// }
///
/// let app: Router = Router::new()
///     .route("/", get(handler))
///     .layer(ClientAddressLayer::default());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ClientAddressLayer {
    resolver: AddressResolver,
}

impl ClientAddressLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom header precedence table.
    pub fn with_resolver(resolver: AddressResolver) -> Self {
        Self { resolver }
    }
}

impl<S> Layer<S> for ClientAddressLayer {
    type Service = ClientAddressService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ClientAddressService {
            inner,
            resolver: self.resolver.clone(),
        }
    }
}

/// Service that resolves client addresses.
#[derive(Debug, Clone)]
pub struct ClientAddressService<S> {
    inner: S,
    resolver: AddressResolver,
}

impl<S> Service<Request> for ClientAddressService<S>
where
    S: Service<Request, Response = Response> + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request) -> Self::Future {
        let remote = req
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|connect_info| connect_info.0);

        let client = ClientAddress::resolve(&self.resolver, req.headers(), remote);
        req.extensions_mut().insert(client);

        let future = self.inner.call(req);
        Box::pin(future)
    }
}

/// Convert axum headers to the lower-cased map the resolver reads.
///
/// Repeated header lines are joined with `", "` in arrival order, so a hop
/// chain split across lines keeps its first hop first. Values that are not
/// visible ASCII are skipped.
pub fn headers_to_map(headers: &HeaderMap) -> crate::extractor::HeaderMap {
    headers
        .keys()
        .filter_map(|name| {
            let values: Vec<&str> = headers
                .get_all(name)
                .iter()
                .filter_map(|value| value.to_str().ok())
                .collect();
            (!values.is_empty()).then(|| (name.as_str().to_lowercase(), values.join(", ")))
        })
        .collect()
}

/// Extractor for the client address.
///
/// Reads the extension set by [`ClientAddressLayer`]; without the layer the
/// address is resolved on the spot with the default precedence table.
impl<S> FromRequestParts<S> for ClientAddress
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(client) = parts.extensions.get::<ClientAddress>() {
            return Ok(client.clone());
        }

        let remote = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|connect_info| connect_info.0);
        Ok(ClientAddress::resolve(&AddressResolver::default(), &parts.headers, remote))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderName, HeaderValue};

    #[test]
    fn header_names_are_lower_cased() {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_bytes(b"X-Real-IP").unwrap(),
            HeaderValue::from_static("203.0.113.5"),
        );
        let map = headers_to_map(&headers);
        assert_eq!(map.get("x-real-ip").map(String::as_str), Some("203.0.113.5"));
    }

    #[test]
    fn repeated_header_lines_are_joined_in_order() {
        let mut headers = HeaderMap::new();
        headers.append("x-forwarded-for", HeaderValue::from_static("8.8.8.8"));
        headers.append("x-forwarded-for", HeaderValue::from_static("10.0.0.5"));
        let map = headers_to_map(&headers);
        assert_eq!(
            map.get("x-forwarded-for").map(String::as_str),
            Some("8.8.8.8, 10.0.0.5")
        );
    }

    #[test]
    fn client_address_target() {
        assert_eq!(ClientAddress("8.8.8.8".into()).lookup_target(), Some("8.8.8.8"));
        assert_eq!(ClientAddress("10.1.2.3".into()).lookup_target(), None);
    }

    #[test]
    fn resolve_uses_connection_as_fallback() {
        let headers = HeaderMap::new();
        let remote: SocketAddr = "192.168.1.10:5555".parse().unwrap();
        let client = ClientAddress::resolve(&AddressResolver::default(), &headers, Some(remote));
        assert_eq!(client.address(), "192.168.1.10");
        assert_eq!(client.class(), AddressClass::Local);
    }
}
