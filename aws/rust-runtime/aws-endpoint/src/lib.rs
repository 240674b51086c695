/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

//! AWS endpoint resolution
//!
//! Endpoints are computed from [`Params`]: the region, the dualstack and FIPS flags, and an
//! optional endpoint override. Resolution never performs I/O and fails with a typed
//! [`ResolveEndpointError`].

pub mod partition;

pub use partition::{Partition, PartitionResolver};

use crate::partition::endpoint::{Definition, Protocol};
use aws_types::region::{Region, SigningRegion};
use aws_types::SigningService;
use http::Uri;
use smithy_http::endpoint::{Endpoint, InvalidEndpoint};
use smithy_http::middleware::MapRequest;
use smithy_http::operation::Request;
use smithy_http::property_bag::PropertyBag;
use std::error::Error;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// Credential scope of an endpoint
///
/// When set, these values override the signing region and signing service derived from the
/// request.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CredentialScope {
    region: Option<SigningRegion>,
    service: Option<SigningService>,
}

impl CredentialScope {
    pub fn builder() -> credential_scope::Builder {
        credential_scope::Builder::default()
    }

    pub fn region(&self) -> Option<&SigningRegion> {
        self.region.as_ref()
    }

    pub fn service(&self) -> Option<&SigningService> {
        self.service.as_ref()
    }
}

pub mod credential_scope {
    use crate::CredentialScope;
    use aws_types::region::SigningRegion;
    use aws_types::SigningService;

    #[derive(Debug, Default)]
    pub struct Builder {
        region: Option<SigningRegion>,
        service: Option<SigningService>,
    }

    impl Builder {
        pub fn region(mut self, region: impl Into<SigningRegion>) -> Self {
            self.region = Some(region.into());
            self
        }

        pub fn service(mut self, service: impl Into<SigningService>) -> Self {
            self.service = Some(service.into());
            self
        }

        pub fn build(self) -> CredentialScope {
            CredentialScope {
                region: self.region,
                service: self.service,
            }
        }
    }
}

/// A resolved endpoint: where to send the request and how to sign it
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AwsEndpoint {
    endpoint: Endpoint,
    credential_scope: CredentialScope,
}

impl AwsEndpoint {
    pub fn new(endpoint: Endpoint, credential_scope: CredentialScope) -> Self {
        AwsEndpoint {
            endpoint,
            credential_scope,
        }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn credential_scope(&self) -> &CredentialScope {
        &self.credential_scope
    }

    pub fn set_endpoint(&self, uri: &mut Uri) -> Result<(), InvalidEndpoint> {
        self.endpoint.set_endpoint(uri)
    }
}

/// Endpoint resolution parameters
///
/// The client configuration provides the built-in values. Individual requests may replace the
/// region and the dualstack and FIPS flags with [`EndpointOverrides`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Params {
    region: Option<Region>,
    use_dual_stack: bool,
    use_fips: bool,
    endpoint_url: Option<String>,
}

impl Params {
    pub fn new(region: Option<Region>) -> Self {
        Params {
            region,
            ..Default::default()
        }
    }

    pub fn with_dual_stack(mut self, use_dual_stack: bool) -> Self {
        self.use_dual_stack = use_dual_stack;
        self
    }

    pub fn with_fips(mut self, use_fips: bool) -> Self {
        self.use_fips = use_fips;
        self
    }

    pub fn with_endpoint_url(mut self, endpoint_url: Option<String>) -> Self {
        self.endpoint_url = endpoint_url;
        self
    }

    pub fn region(&self) -> Option<&Region> {
        self.region.as_ref()
    }

    pub fn use_dual_stack(&self) -> bool {
        self.use_dual_stack
    }

    pub fn use_fips(&self) -> bool {
        self.use_fips
    }

    pub fn endpoint_url(&self) -> Option<&str> {
        self.endpoint_url.as_deref()
    }

    /// Merge per-request overrides on top of these parameters
    pub fn with_overrides(mut self, overrides: &EndpointOverrides) -> Self {
        if let Some(region) = &overrides.region {
            self.region = Some(region.clone());
        }
        if let Some(use_dual_stack) = overrides.use_dual_stack {
            self.use_dual_stack = use_dual_stack;
        }
        if let Some(use_fips) = overrides.use_fips {
            self.use_fips = use_fips;
        }
        self
    }
}

impl From<Option<Region>> for Params {
    fn from(region: Option<Region>) -> Self {
        Params::new(region)
    }
}

/// Per-request replacements for the client's endpoint parameters
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct EndpointOverrides {
    pub region: Option<Region>,
    pub use_dual_stack: Option<bool>,
    pub use_fips: Option<bool>,
}

/// Resolve the AWS Endpoint for a given set of parameters
///
/// Implementations must be deterministic and must not perform I/O. Closures implement this
/// trait, which makes simple overrides straightforward:
/// ```rust
/// use aws_endpoint::{AwsEndpoint, BoxError, CredentialScope, Params, ResolveAwsEndpoint};
/// use http::Uri;
/// use smithy_http::endpoint::Endpoint;
/// let resolver = |_params: &Params| -> Result<AwsEndpoint, BoxError> {
///     Ok(AwsEndpoint::new(
///         Endpoint::immutable(Uri::from_static("http://localhost:4566")),
///         CredentialScope::default(),
///     ))
/// };
/// let endpoint = resolver.resolve_endpoint(&Params::default()).unwrap();
/// ```
pub trait ResolveAwsEndpoint: Send + Sync {
    fn resolve_endpoint(&self, params: &Params) -> Result<AwsEndpoint, BoxError>;
}

impl<T> ResolveAwsEndpoint for T
where
    T: Fn(&Params) -> Result<AwsEndpoint, BoxError> + Send + Sync,
{
    fn resolve_endpoint(&self, params: &Params) -> Result<AwsEndpoint, BoxError> {
        self(params)
    }
}

#[derive(Debug, Eq, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum ResolveEndpointError {
    #[error("no region was configured. A region is required to resolve an endpoint")]
    MissingRegion,
    #[error("`{0}` is not a valid region: regions must be valid host labels")]
    InvalidRegion(String),
    #[error("{flag} cannot be combined with a custom endpoint URL")]
    OverrideConflict { flag: &'static str },
    #[error("invalid endpoint URL `{url}`: {reason}")]
    InvalidEndpointUrl { url: String, reason: &'static str },
    #[error("FIPS is not supported in partition `{partition}`")]
    FipsNotSupported { partition: &'static str },
    #[error("dualstack is not supported in partition `{partition}`")]
    DualStackNotSupported { partition: &'static str },
}

const STANDARD: Definition = Definition {
    uri_template: "{service}.{region}.{dnsSuffix}",
    protocol: Protocol::Https,
};

const FIPS: Definition = Definition {
    uri_template: "{service}-fips.{region}.{dnsSuffix}",
    protocol: Protocol::Https,
};

/// Regional endpoint resolver backed by the partition table
///
/// Hostnames are `{service}[-fips].{region}.{dnsSuffix}` where the suffix is the partition's
/// dualstack suffix when dualstack is requested. A custom endpoint URL is used verbatim.
#[derive(Debug, Clone)]
pub struct PartitionEndpointResolver {
    service: &'static str,
    partitions: Arc<PartitionResolver>,
}

impl PartitionEndpointResolver {
    pub fn new(service: &'static str) -> Self {
        PartitionEndpointResolver {
            service,
            partitions: Arc::new(PartitionResolver::new()),
        }
    }

    /// Resolver for Amazon EC2
    pub fn ec2() -> Self {
        Self::new("ec2")
    }

    pub fn resolve(&self, params: &Params) -> Result<AwsEndpoint, ResolveEndpointError> {
        let region = params
            .region()
            .ok_or(ResolveEndpointError::MissingRegion)?;
        if !is_valid_host_label(region.as_ref()) {
            return Err(ResolveEndpointError::InvalidRegion(
                region.as_ref().to_string(),
            ));
        }
        let credential_scope = CredentialScope::builder()
            .region(region.clone())
            .service(SigningService::from_static(self.service))
            .build();

        if let Some(url) = params.endpoint_url() {
            if params.use_fips() {
                return Err(ResolveEndpointError::OverrideConflict { flag: "FIPS" });
            }
            if params.use_dual_stack() {
                return Err(ResolveEndpointError::OverrideConflict { flag: "dualstack" });
            }
            let uri = parse_endpoint_url(url)?;
            return Ok(AwsEndpoint::new(Endpoint::immutable(uri), credential_scope));
        }

        let partition = self.partitions.resolve_partition(region.as_ref());
        if params.use_fips() && !partition.supports_fips {
            return Err(ResolveEndpointError::FipsNotSupported {
                partition: partition.id,
            });
        }
        let dns_suffix = if params.use_dual_stack() {
            partition
                .dual_stack_dns_suffix
                .ok_or(ResolveEndpointError::DualStackNotSupported {
                    partition: partition.id,
                })?
        } else {
            partition.dns_suffix
        };
        let definition = if params.use_fips() { FIPS } else { STANDARD };
        let endpoint = definition.render(self.service, region.as_ref(), dns_suffix)?;
        Ok(AwsEndpoint::new(endpoint, credential_scope))
    }
}

impl ResolveAwsEndpoint for PartitionEndpointResolver {
    fn resolve_endpoint(&self, params: &Params) -> Result<AwsEndpoint, BoxError> {
        Ok(self.resolve(params)?)
    }
}

fn parse_endpoint_url(url: &str) -> Result<Uri, ResolveEndpointError> {
    let invalid = |reason| ResolveEndpointError::InvalidEndpointUrl {
        url: url.to_string(),
        reason,
    };
    let uri: Uri = url.parse().map_err(|_| invalid("not a valid URI"))?;
    match uri.scheme_str() {
        Some("http") | Some("https") => {}
        Some(_) => return Err(invalid("scheme must be http or https")),
        None => return Err(invalid("missing scheme")),
    }
    if uri.host().map(str::is_empty).unwrap_or(true) {
        return Err(invalid("missing host"));
    }
    Ok(uri)
}

fn is_valid_host_label(label: &str) -> bool {
    !label.is_empty()
        && label.len() <= 63
        && !label.starts_with('-')
        && !label.ends_with('-')
        && label
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
}

type AwsEndpointResolver = Arc<dyn ResolveAwsEndpoint>;

pub fn get_endpoint_resolver(properties: &PropertyBag) -> Option<&AwsEndpointResolver> {
    properties.get()
}

pub fn set_endpoint_resolver(properties: &mut PropertyBag, provider: AwsEndpointResolver) {
    properties.insert(provider);
}

/// Middleware Stage to Add an Endpoint to a Request
///
/// AwsEndpointStage implements [`MapRequest`](smithy_http::middleware::MapRequest). It will:
/// 1. Load an endpoint provider from the property bag.
/// 2. Build [`Params`] from the property bag, applying any [`EndpointOverrides`].
/// 3. Apply the endpoint to the URI in the request
/// 4. Set the `SigningRegion` and `SigningService` in the property bag to drive downstream
/// signing middleware.
#[derive(Clone, Debug)]
pub struct AwsEndpointStage;

#[derive(Debug)]
pub enum AwsEndpointStageError {
    NoEndpointResolver,
    NoRegion,
    EndpointResolutionError(BoxError),
}

impl Display for AwsEndpointStageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AwsEndpointStageError::NoEndpointResolver => {
                write!(f, "no endpoint resolver was configured")
            }
            AwsEndpointStageError::NoRegion => write!(f, "no region was configured"),
            AwsEndpointStageError::EndpointResolutionError(err) => {
                write!(f, "failed to resolve endpoint: {}", err)
            }
        }
    }
}

impl Error for AwsEndpointStageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AwsEndpointStageError::EndpointResolutionError(err) => Some(err.as_ref() as _),
            _ => None,
        }
    }
}

impl MapRequest for AwsEndpointStage {
    type Error = AwsEndpointStageError;

    fn apply(&self, request: Request) -> Result<Request, Self::Error> {
        request.augment(|mut http_req, props| {
            let provider =
                get_endpoint_resolver(props).ok_or(AwsEndpointStageError::NoEndpointResolver)?;
            let mut params = props.get::<Params>().cloned().unwrap_or_default();
            if let Some(overrides) = props.get::<EndpointOverrides>() {
                params = params.with_overrides(overrides);
            }
            let region = params
                .region()
                .cloned()
                .ok_or(AwsEndpointStageError::NoRegion)?;
            let endpoint = provider
                .resolve_endpoint(&params)
                .map_err(AwsEndpointStageError::EndpointResolutionError)?;
            tracing::debug!(endpoint = ?endpoint, base_region = ?region, "resolved endpoint");
            let signing_region = endpoint
                .credential_scope()
                .region()
                .cloned()
                .unwrap_or_else(|| region.clone().into());
            props.insert::<SigningRegion>(signing_region);
            if let Some(signing_service) = endpoint.credential_scope().service() {
                props.insert::<SigningService>(signing_service.clone());
            }
            props.insert::<Region>(region);
            endpoint
                .set_endpoint(http_req.uri_mut())
                .map_err(|err| AwsEndpointStageError::EndpointResolutionError(err.into()))?;
            Ok(http_req)
        })
    }
}
