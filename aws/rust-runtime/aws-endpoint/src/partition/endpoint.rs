/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

use crate::ResolveEndpointError;
use smithy_http::endpoint::Endpoint;

/// Endpoint template
///
/// The template may contain `{service}`, `{region}` and `{dnsSuffix}`, which are substituted
/// during endpoint construction.
#[derive(Debug, Clone, Copy)]
pub struct Definition {
    pub uri_template: &'static str,

    /// Protocol to use for this endpoint
    pub protocol: Protocol,
}

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum Protocol {
    Http,
    Https,
}

impl Protocol {
    fn as_str(&self) -> &'static str {
        match self {
            Protocol::Http => "http",
            Protocol::Https => "https",
        }
    }
}

impl Definition {
    pub fn render(
        &self,
        service: &str,
        region: &str,
        dns_suffix: &str,
    ) -> Result<Endpoint, ResolveEndpointError> {
        let host = self
            .uri_template
            .replace("{service}", service)
            .replace("{region}", region)
            .replace("{dnsSuffix}", dns_suffix);
        let uri = format!("{}://{}", self.protocol.as_str(), host);
        let uri = uri
            .parse()
            .map_err(|_| ResolveEndpointError::InvalidRegion(region.to_string()))?;
        Ok(Endpoint::mutable(uri))
    }
}

#[cfg(test)]
mod test {
    use super::{Definition, Protocol};
    use http::Uri;

    #[test]
    fn renders_template() {
        let definition = Definition {
            uri_template: "{service}.{region}.{dnsSuffix}",
            protocol: Protocol::Https,
        };
        let endpoint = definition
            .render("ec2", "us-west-2", "amazonaws.com")
            .expect("valid endpoint");
        assert_eq!(
            endpoint.uri(),
            &Uri::from_static("https://ec2.us-west-2.amazonaws.com")
        );
        assert!(!endpoint.is_immutable());
    }
}
