/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

//! Operation shapes
//!
//! Each struct is the response handler of an [`Operation`](smithy_http::operation::Operation):
//! it turns a loaded HTTP response into the operation output or the operation error.

use bytes::Bytes;
use smithy_http::response::ParseStrictResponse;

macro_rules! operation_shapes {
    ($($op:ident {
        client_method: $method:ident,
        http_method: $http:ident,
        input: $input:ident,
        input_builder: $builder:ident,
        output: $output:ident,
        error: $error:ident,
        error_kind: $error_kind:ident,
        serializer: $ser:path,
        parser: $parser:path,
        docs: $doc:literal,
        setters: { $(fn $setter:ident($arg:ident: $argty:ty);)* },
    },)*) => {
        $(
            #[doc = $doc]
            #[derive(std::default::Default, std::clone::Clone, std::fmt::Debug)]
            pub struct $op {
                _private: (),
            }

            impl $op {
                /// The HTTP method this operation is sent with
                pub const HTTP_METHOD: http::Method = http::Method::$http;

                pub fn new() -> Self {
                    Self { _private: () }
                }
            }

            impl ParseStrictResponse for $op {
                type Output = std::result::Result<crate::output::$output, crate::error::$error>;

                fn parse(&self, response: &http::Response<Bytes>) -> Self::Output {
                    if !response.status().is_success() {
                        let generic = crate::xml_deser::parse_generic_error(response.body())
                            .map_err(crate::error::$error::unhandled)?;
                        return Err(crate::error::$error::generic(generic));
                    }
                    $parser(response.body()).map_err(crate::error::$error::unhandled)
                }
            }
        )*
    };
}

ec2_manifest!(operation_shapes);
