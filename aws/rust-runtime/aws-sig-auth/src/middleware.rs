/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

use crate::signer::{
    OperationSigningConfig, RequestConfig, SigV4Signer, SigningError, SigningRequirements,
};
use aws_types::region::SigningRegion;
use aws_types::{Credentials, SigningService};
use smithy_http::middleware::MapRequest;
use smithy_http::operation::Request;
use smithy_http::property_bag::PropertyBag;
use std::time::SystemTime;
use thiserror::Error;

/// Middleware stage to sign requests with SigV4
///
/// SigV4SigningStage will load configuration from the request property bag and add
/// a signature.
///
/// Prior to signing, the following fields MUST be present in the property bag:
/// - [`SigningRegion`](SigningRegion): The region used when signing the request, eg. `us-east-1`
/// - [`SigningService`](SigningService): The name of the service to use when signing the request, eg. `ec2`
/// - [`Credentials`](Credentials): Credentials already resolved by the dispatcher
/// - [`OperationSigningConfig`](OperationSigningConfig): Operation specific signing configuration
/// If any of these fields are missing, the middleware will return an error.
///
/// The following fields MAY be present in the property bag:
/// - [`SystemTime`](SystemTime): The timestamp to use when signing the request. If this field is not present
///   [`SystemTime::now`](SystemTime::now) will be used.
#[derive(Clone, Debug, Default)]
pub struct SigV4SigningStage {
    signer: SigV4Signer,
}

impl SigV4SigningStage {
    pub fn new(signer: SigV4Signer) -> Self {
        Self { signer }
    }
}

#[derive(Debug, Error)]
pub enum SigningStageError {
    #[error("No credentials in the property bag")]
    MissingCredentials,
    #[error("No signing region in the property bag")]
    MissingSigningRegion,
    #[error("No signing service in the property bag")]
    MissingSigningService,
    #[error("No signing configuration in the property bag")]
    MissingSigningConfig,
    #[error("Signing failed")]
    SigningFailure(#[from] SigningError),
}

/// Extract a signing config from a [`PropertyBag`](smithy_http::property_bag::PropertyBag)
///
/// Returns `Ok(None)` when the operation allows the request to go out unsigned.
fn signing_config(
    config: &PropertyBag,
) -> Result<Option<(&OperationSigningConfig, RequestConfig<'_>, &Credentials)>, SigningStageError>
{
    let operation_config = config
        .get::<OperationSigningConfig>()
        .ok_or(SigningStageError::MissingSigningConfig)?;
    let creds = match (
        operation_config.signing_requirements,
        config.get::<Credentials>(),
    ) {
        (SigningRequirements::Disabled, _) => return Ok(None),
        (SigningRequirements::Optional, None) => return Ok(None),
        (SigningRequirements::Required, None) => {
            return Err(SigningStageError::MissingCredentials)
        }
        (_, Some(creds)) => creds,
    };
    let region = config
        .get::<SigningRegion>()
        .ok_or(SigningStageError::MissingSigningRegion)?;
    let signing_service = config
        .get::<SigningService>()
        .ok_or(SigningStageError::MissingSigningService)?;
    let request_config = RequestConfig {
        request_ts: config
            .get::<SystemTime>()
            .copied()
            .unwrap_or_else(SystemTime::now),
        region,
        service: signing_service,
    };
    Ok(Some((operation_config, request_config, creds)))
}

impl MapRequest for SigV4SigningStage {
    type Error = SigningStageError;

    fn apply(&self, req: Request) -> Result<Request, Self::Error> {
        req.augment(|mut req, config| {
            let (operation_config, request_config, creds) = match signing_config(config)? {
                Some(parts) => parts,
                None => return Ok(req),
            };
            let signature =
                self.signer
                    .sign(operation_config, &request_config, creds, &mut req)?;
            tracing::trace!(signature = signature.as_ref(), "signed request");
            Ok(req)
        })
    }
}

#[cfg(test)]
mod test {
    use crate::middleware::{SigV4SigningStage, SigningStageError};
    use crate::signer::{OperationSigningConfig, SigV4Signer, SigningRequirements};
    use aws_types::region::SigningRegion;
    use aws_types::{Credentials, SigningService};
    use smithy_http::body::SdkBody;
    use smithy_http::middleware::MapRequest;
    use smithy_http::operation;
    use std::time::{Duration, UNIX_EPOCH};

    fn request(requirements: SigningRequirements) -> operation::Request {
        let req = http::Request::builder()
            .method("POST")
            .uri("https://ec2.us-east-1.amazonaws.com/")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(SdkBody::from("Action=DescribeRegions&Version=2016-11-15"))
            .unwrap();
        let mut req = operation::Request::new(req);
        {
            let mut props = req.properties_mut();
            let mut signing_config = OperationSigningConfig::default_config();
            signing_config.signing_requirements = requirements;
            props.insert(signing_config);
            props.insert(SigningRegion::from_static("us-east-1"));
            props.insert(SigningService::from_static("ec2"));
            props.insert(UNIX_EPOCH + Duration::from_secs(1614556800));
        }
        req
    }

    #[test]
    fn signs_request_from_property_bag() {
        let mut req = request(SigningRequirements::Required);
        req.properties_mut()
            .insert(Credentials::from_keys("AKIDEXAMPLE", "secret", None));
        let signer = SigV4SigningStage::new(SigV4Signer::new());
        let req = signer.apply(req).expect("signing succeeded");
        let auth = req
            .http()
            .headers()
            .get("authorization")
            .expect("auth header must be present")
            .to_str()
            .unwrap();
        assert_eq!(
            auth,
            "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20210301/us-east-1/ec2/aws4_request, \
             SignedHeaders=content-type;host;x-amz-date, \
             Signature=0e0a840b897cedd744b5c34f5d85156e47af025c3612f39fada65e6b96543961"
        );
    }

    #[test]
    fn session_token_is_signed() {
        let mut req = request(SigningRequirements::Required);
        req.properties_mut().insert(Credentials::from_keys(
            "AKIDEXAMPLE",
            "secret",
            Some("token".to_string()),
        ));
        let req = SigV4SigningStage::default()
            .apply(req)
            .expect("signing succeeded");
        let headers = req.http().headers();
        assert_eq!(headers["x-amz-security-token"], "token");
        assert!(headers["authorization"]
            .to_str()
            .unwrap()
            .ends_with("bbd6411e64a01410474bdfb6ebc50105a84c6cc6e939ccf4b6057fe58db29df5"));
    }

    #[test]
    fn missing_credentials_fail_required_signing() {
        let req = request(SigningRequirements::Required);
        let err = SigV4SigningStage::default()
            .apply(req)
            .expect_err("no credentials were provided");
        assert!(matches!(err, SigningStageError::MissingCredentials));
    }

    #[test]
    fn optional_and_disabled_signing_skip_without_credentials() {
        for requirements in &[SigningRequirements::Optional, SigningRequirements::Disabled] {
            let req = SigV4SigningStage::default()
                .apply(request(*requirements))
                .expect("unsigned request allowed");
            assert!(req.http().headers().get("authorization").is_none());
        }
    }

    #[test]
    fn missing_signing_config() {
        let req = operation::Request::new(http::Request::new(SdkBody::from("")));
        let err = SigV4SigningStage::default().apply(req).expect_err("no config");
        assert!(matches!(err, SigningStageError::MissingSigningConfig));
    }
}
