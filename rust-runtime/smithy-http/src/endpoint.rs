/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

use http::uri::Uri;
use std::borrow::Cow;
use std::fmt;
use std::fmt::{Display, Formatter};

/// API Endpoint
///
/// This implements an API endpoint as specified in the
/// [Smithy Endpoint Specification](https://awslabs.github.io/smithy/1.0/spec/core/endpoint-traits.html)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoint {
    uri: http::Uri,

    /// If true, the host of this endpoint is used as is when it is set on a request
    immutable: bool,
}

#[non_exhaustive]
#[derive(Debug, Eq, PartialEq, Clone)]
pub enum InvalidEndpoint {
    EndpointMustHaveAuthority,
    EndpointMustHaveScheme,
    InvalidUri(String),
}

impl Display for InvalidEndpoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            InvalidEndpoint::EndpointMustHaveAuthority => {
                write!(f, "endpoint must contain a valid authority")
            }
            InvalidEndpoint::EndpointMustHaveScheme => {
                write!(f, "endpoint must contain a valid scheme")
            }
            InvalidEndpoint::InvalidUri(msg) => write!(f, "endpoint produced an invalid uri: {}", msg),
        }
    }
}

impl std::error::Error for InvalidEndpoint {}

impl Endpoint {
    /// Create a new endpoint from a URI
    ///
    /// Endpoints created this way are the ones produced by a resolver from a region. Use
    /// [`Endpoint::immutable`] for a user supplied endpoint.
    pub fn mutable(uri: Uri) -> Self {
        Endpoint {
            uri,
            immutable: false,
        }
    }

    /// Create a new immutable endpoint from a URI
    ///
    /// ```rust
    /// # use smithy_http::endpoint::Endpoint;
    /// use http::Uri;
    /// let endpoint = Endpoint::immutable(Uri::from_static("http://localhost:8000"));
    /// ```
    pub fn immutable(uri: Uri) -> Self {
        Endpoint {
            uri,
            immutable: true,
        }
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    pub fn is_immutable(&self) -> bool {
        self.immutable
    }

    /// Sets the endpoint on `uri`
    ///
    /// The scheme and authority come from the endpoint. A path on the endpoint is prepended to
    /// the path of `uri`, and the query of `uri` is preserved.
    pub fn set_endpoint(&self, uri: &mut http::Uri) -> Result<(), InvalidEndpoint> {
        let authority = self
            .uri
            .authority()
            .ok_or(InvalidEndpoint::EndpointMustHaveAuthority)?
            .clone();
        let scheme = self
            .uri
            .scheme()
            .ok_or(InvalidEndpoint::EndpointMustHaveScheme)?
            .clone();
        let new_uri = Uri::builder()
            .authority(authority)
            .scheme(scheme)
            .path_and_query(Self::merge_paths(&self.uri, uri).as_ref())
            .build()
            .map_err(|e| InvalidEndpoint::InvalidUri(e.to_string()))?;
        *uri = new_uri;
        Ok(())
    }

    fn merge_paths<'a>(endpoint: &'a Uri, uri: &'a Uri) -> Cow<'a, str> {
        if let Some(query) = endpoint.path_and_query().and_then(|pq| pq.query()) {
            tracing::warn!(query = %query, "query specified in endpoint will be ignored during endpoint resolution");
        }
        let endpoint_path = endpoint.path();
        let uri_path_and_query = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
        if endpoint_path.is_empty() || endpoint_path == "/" {
            Cow::Borrowed(uri_path_and_query)
        } else {
            let ep_no_slash = endpoint_path.strip_suffix('/').unwrap_or(endpoint_path);
            let uri_path_no_slash = uri_path_and_query
                .strip_prefix('/')
                .unwrap_or(uri_path_and_query);
            Cow::Owned(format!("{}/{}", ep_no_slash, uri_path_no_slash))
        }
    }
}

#[cfg(test)]
mod test {
    use crate::endpoint::{Endpoint, InvalidEndpoint};
    use http::Uri;

    #[test]
    fn set_endpoint_keeps_query() {
        let ep = Endpoint::mutable(Uri::from_static("https://ec2.us-east-1.amazonaws.com"));
        let mut uri = Uri::from_static("/?k=v");
        ep.set_endpoint(&mut uri).expect("valid endpoint");
        assert_eq!(
            uri,
            Uri::from_static("https://ec2.us-east-1.amazonaws.com/?k=v")
        );
    }

    #[test]
    fn endpoint_custom_port() {
        let ep = Endpoint::immutable(Uri::from_static("http://localhost:4566"));
        let mut uri = Uri::from_static("/");
        ep.set_endpoint(&mut uri).expect("valid endpoint");
        assert_eq!(uri, Uri::from_static("http://localhost:4566/"));
    }

    #[test]
    fn endpoint_with_path() {
        for uri in &[
            // check that trailing slashes are properly normalized
            "https://vpce-1234.ec2.us-east-1.vpce.amazonaws.com/private",
            "https://vpce-1234.ec2.us-east-1.vpce.amazonaws.com/private/",
        ] {
            let ep = Endpoint::immutable(Uri::from_static(uri));
            let mut uri = Uri::from_static("/?k=v");
            ep.set_endpoint(&mut uri).expect("valid endpoint");
            assert_eq!(
                uri,
                Uri::from_static("https://vpce-1234.ec2.us-east-1.vpce.amazonaws.com/private/?k=v")
            );
        }
    }

    #[test]
    fn endpoint_without_authority() {
        let ep = Endpoint::immutable(Uri::from_static("/just/a/path"));
        let mut uri = Uri::from_static("/");
        assert_eq!(
            ep.set_endpoint(&mut uri),
            Err(InvalidEndpoint::EndpointMustHaveAuthority)
        );
    }
}
