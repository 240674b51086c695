/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

//! Operation inputs
//!
//! Inputs are built with their `builder()`. [`make_operation`](DescribeRegionsInput::make_operation)
//! serializes an input into a signed-on-dispatch [`Operation`].

use crate::error::BuildError;
use aws_http::AwsErrorRetryPolicy;
use smithy_http::operation::{Metadata, Operation};

macro_rules! make_operations {
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
            impl $input {
                pub fn builder() -> $builder::Builder {
                    $builder::Builder::default()
                }

                #[doc = concat!("Serialize this input into a `", stringify!($op), "` operation")]
                ///
                /// The returned operation carries everything needed to dispatch it: the endpoint
                /// parameters and resolver, the credentials provider, and the signing configuration.
                pub fn make_operation(
                    &self,
                    config: &crate::config::Config,
                ) -> Result<Operation<crate::operation::$op, AwsErrorRetryPolicy>, BuildError> {
                    let request = http::Request::builder()
                        .method(crate::operation::$op::HTTP_METHOD)
                        .uri("/")
                        .header(http::header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                        .body($ser(self))?;
                    let mut request = smithy_http::operation::Request::new(request);
                    config.configure_operation(&mut request.properties_mut());
                    Ok(Operation::new(request, crate::operation::$op::new())
                        .with_metadata(Metadata::new(stringify!($op), "ec2"))
                        .with_retry_policy(AwsErrorRetryPolicy::new()))
                }
            }
        )*
    };
}

ec2_manifest!(make_operations);

fn push<T>(list: Option<Vec<T>>, item: T) -> Option<Vec<T>> {
    let mut list = list.unwrap_or_default();
    list.push(item);
    Some(list)
}

#[non_exhaustive]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DescribeRegionsInput {
    pub filters: Option<Vec<crate::model::Filter>>,
    /// The names of the Regions. All Regions are described when omitted.
    pub region_names: Option<Vec<String>>,
    /// Include Regions that are not enabled for the account
    pub all_regions: Option<bool>,
    pub dry_run: Option<bool>,
}

pub mod describe_regions_input {
    use crate::error::BuildError;
    use crate::input::{push, DescribeRegionsInput};
    use crate::model::Filter;

    #[derive(Clone, Debug, Default, PartialEq)]
    pub struct Builder {
        filters: Option<Vec<Filter>>,
        region_names: Option<Vec<String>>,
        all_regions: Option<bool>,
        dry_run: Option<bool>,
    }

    impl Builder {
        pub fn filters(mut self, input: impl Into<Filter>) -> Self {
            self.filters = push(self.filters, input.into());
            self
        }

        pub fn set_filters(mut self, input: Option<Vec<Filter>>) -> Self {
            self.filters = input;
            self
        }

        pub fn region_names(mut self, input: impl Into<String>) -> Self {
            self.region_names = push(self.region_names, input.into());
            self
        }

        pub fn set_region_names(mut self, input: Option<Vec<String>>) -> Self {
            self.region_names = input;
            self
        }

        pub fn all_regions(mut self, input: bool) -> Self {
            self.all_regions = Some(input);
            self
        }

        pub fn set_all_regions(mut self, input: Option<bool>) -> Self {
            self.all_regions = input;
            self
        }

        pub fn dry_run(mut self, input: bool) -> Self {
            self.dry_run = Some(input);
            self
        }

        pub fn set_dry_run(mut self, input: Option<bool>) -> Self {
            self.dry_run = input;
            self
        }

        pub fn build(self) -> Result<DescribeRegionsInput, BuildError> {
            Ok(DescribeRegionsInput {
                filters: self.filters,
                region_names: self.region_names,
                all_regions: self.all_regions,
                dry_run: self.dry_run,
            })
        }
    }
}

#[non_exhaustive]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DescribeAvailabilityZonesInput {
    pub filters: Option<Vec<crate::model::Filter>>,
    pub zone_names: Option<Vec<String>>,
    pub zone_ids: Option<Vec<String>>,
    /// Include every zone, regardless of opt-in status
    pub all_availability_zones: Option<bool>,
    pub dry_run: Option<bool>,
}

pub mod describe_availability_zones_input {
    use crate::error::BuildError;
    use crate::input::{push, DescribeAvailabilityZonesInput};
    use crate::model::Filter;

    #[derive(Clone, Debug, Default, PartialEq)]
    pub struct Builder {
        filters: Option<Vec<Filter>>,
        zone_names: Option<Vec<String>>,
        zone_ids: Option<Vec<String>>,
        all_availability_zones: Option<bool>,
        dry_run: Option<bool>,
    }

    impl Builder {
        pub fn filters(mut self, input: impl Into<Filter>) -> Self {
            self.filters = push(self.filters, input.into());
            self
        }

        pub fn set_filters(mut self, input: Option<Vec<Filter>>) -> Self {
            self.filters = input;
            self
        }

        pub fn zone_names(mut self, input: impl Into<String>) -> Self {
            self.zone_names = push(self.zone_names, input.into());
            self
        }

        pub fn set_zone_names(mut self, input: Option<Vec<String>>) -> Self {
            self.zone_names = input;
            self
        }

        pub fn zone_ids(mut self, input: impl Into<String>) -> Self {
            self.zone_ids = push(self.zone_ids, input.into());
            self
        }

        pub fn set_zone_ids(mut self, input: Option<Vec<String>>) -> Self {
            self.zone_ids = input;
            self
        }

        pub fn all_availability_zones(mut self, input: bool) -> Self {
            self.all_availability_zones = Some(input);
            self
        }

        pub fn set_all_availability_zones(mut self, input: Option<bool>) -> Self {
            self.all_availability_zones = input;
            self
        }

        pub fn dry_run(mut self, input: bool) -> Self {
            self.dry_run = Some(input);
            self
        }

        pub fn set_dry_run(mut self, input: Option<bool>) -> Self {
            self.dry_run = input;
            self
        }

        pub fn build(self) -> Result<DescribeAvailabilityZonesInput, BuildError> {
            Ok(DescribeAvailabilityZonesInput {
                filters: self.filters,
                zone_names: self.zone_names,
                zone_ids: self.zone_ids,
                all_availability_zones: self.all_availability_zones,
                dry_run: self.dry_run,
            })
        }
    }
}

#[non_exhaustive]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DescribeInstancesInput {
    pub filters: Option<Vec<crate::model::Filter>>,
    pub instance_ids: Option<Vec<String>>,
    pub dry_run: Option<bool>,
    /// Page size, between 5 and 1000. Cannot be combined with `instance_ids`.
    pub max_results: Option<i32>,
    /// The token returned by a previous page
    pub next_token: Option<String>,
}

pub mod describe_instances_input {
    use crate::error::BuildError;
    use crate::input::{push, DescribeInstancesInput};
    use crate::model::Filter;
    use std::ops::RangeInclusive;

    const MAX_RESULTS: RangeInclusive<i32> = 5..=1000;

    #[derive(Clone, Debug, Default, PartialEq)]
    pub struct Builder {
        filters: Option<Vec<Filter>>,
        instance_ids: Option<Vec<String>>,
        dry_run: Option<bool>,
        max_results: Option<i32>,
        next_token: Option<String>,
    }

    impl Builder {
        pub fn filters(mut self, input: impl Into<Filter>) -> Self {
            self.filters = push(self.filters, input.into());
            self
        }

        pub fn set_filters(mut self, input: Option<Vec<Filter>>) -> Self {
            self.filters = input;
            self
        }

        pub fn instance_ids(mut self, input: impl Into<String>) -> Self {
            self.instance_ids = push(self.instance_ids, input.into());
            self
        }

        pub fn set_instance_ids(mut self, input: Option<Vec<String>>) -> Self {
            self.instance_ids = input;
            self
        }

        pub fn dry_run(mut self, input: bool) -> Self {
            self.dry_run = Some(input);
            self
        }

        pub fn set_dry_run(mut self, input: Option<bool>) -> Self {
            self.dry_run = input;
            self
        }

        pub fn max_results(mut self, input: i32) -> Self {
            self.max_results = Some(input);
            self
        }

        pub fn set_max_results(mut self, input: Option<i32>) -> Self {
            self.max_results = input;
            self
        }

        pub fn next_token(mut self, input: impl Into<String>) -> Self {
            self.next_token = Some(input.into());
            self
        }

        pub fn set_next_token(mut self, input: Option<String>) -> Self {
            self.next_token = input;
            self
        }

        pub fn build(self) -> Result<DescribeInstancesInput, BuildError> {
            if let Some(max_results) = self.max_results {
                if !MAX_RESULTS.contains(&max_results) {
                    return Err(BuildError::InvalidField {
                        field: "max_results",
                        details: format!(
                            "must be between {} and {}, got {}",
                            MAX_RESULTS.start(),
                            MAX_RESULTS.end(),
                            max_results
                        )
                        .into(),
                    });
                }
                if self.instance_ids.is_some() {
                    return Err(BuildError::InvalidField {
                        field: "max_results",
                        details: "cannot be combined with `instance_ids`".into(),
                    });
                }
            }
            Ok(DescribeInstancesInput {
                filters: self.filters,
                instance_ids: self.instance_ids,
                dry_run: self.dry_run,
                max_results: self.max_results,
                next_token: self.next_token,
            })
        }
    }
}

#[non_exhaustive]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StartInstancesInput {
    pub instance_ids: Option<Vec<String>>,
    /// Reserved
    pub additional_info: Option<String>,
    pub dry_run: Option<bool>,
}

pub mod start_instances_input {
    use crate::error::BuildError;
    use crate::input::{push, StartInstancesInput};

    #[derive(Clone, Debug, Default, PartialEq)]
    pub struct Builder {
        instance_ids: Option<Vec<String>>,
        additional_info: Option<String>,
        dry_run: Option<bool>,
    }

    impl Builder {
        pub fn instance_ids(mut self, input: impl Into<String>) -> Self {
            self.instance_ids = push(self.instance_ids, input.into());
            self
        }

        pub fn set_instance_ids(mut self, input: Option<Vec<String>>) -> Self {
            self.instance_ids = input;
            self
        }

        pub fn additional_info(mut self, input: impl Into<String>) -> Self {
            self.additional_info = Some(input.into());
            self
        }

        pub fn set_additional_info(mut self, input: Option<String>) -> Self {
            self.additional_info = input;
            self
        }

        pub fn dry_run(mut self, input: bool) -> Self {
            self.dry_run = Some(input);
            self
        }

        pub fn set_dry_run(mut self, input: Option<bool>) -> Self {
            self.dry_run = input;
            self
        }

        pub fn build(self) -> Result<StartInstancesInput, BuildError> {
            Ok(StartInstancesInput {
                instance_ids: Some(self.instance_ids.ok_or_else(|| {
                    BuildError::missing_field("instance_ids", "at least one instance ID is required")
                })?),
                additional_info: self.additional_info,
                dry_run: self.dry_run,
            })
        }
    }
}

#[non_exhaustive]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StopInstancesInput {
    pub instance_ids: Option<Vec<String>>,
    /// Hibernate the instances if they are enabled for hibernation
    pub hibernate: Option<bool>,
    pub dry_run: Option<bool>,
    /// Force the instances to stop without flushing file system caches
    pub force: Option<bool>,
}

pub mod stop_instances_input {
    use crate::error::BuildError;
    use crate::input::{push, StopInstancesInput};

    #[derive(Clone, Debug, Default, PartialEq)]
    pub struct Builder {
        instance_ids: Option<Vec<String>>,
        hibernate: Option<bool>,
        dry_run: Option<bool>,
        force: Option<bool>,
    }

    impl Builder {
        pub fn instance_ids(mut self, input: impl Into<String>) -> Self {
            self.instance_ids = push(self.instance_ids, input.into());
            self
        }

        pub fn set_instance_ids(mut self, input: Option<Vec<String>>) -> Self {
            self.instance_ids = input;
            self
        }

        pub fn hibernate(mut self, input: bool) -> Self {
            self.hibernate = Some(input);
            self
        }

        pub fn set_hibernate(mut self, input: Option<bool>) -> Self {
            self.hibernate = input;
            self
        }

        pub fn dry_run(mut self, input: bool) -> Self {
            self.dry_run = Some(input);
            self
        }

        pub fn set_dry_run(mut self, input: Option<bool>) -> Self {
            self.dry_run = input;
            self
        }

        pub fn force(mut self, input: bool) -> Self {
            self.force = Some(input);
            self
        }

        pub fn set_force(mut self, input: Option<bool>) -> Self {
            self.force = input;
            self
        }

        pub fn build(self) -> Result<StopInstancesInput, BuildError> {
            Ok(StopInstancesInput {
                instance_ids: Some(self.instance_ids.ok_or_else(|| {
                    BuildError::missing_field("instance_ids", "at least one instance ID is required")
                })?),
                hibernate: self.hibernate,
                dry_run: self.dry_run,
                force: self.force,
            })
        }
    }
}

#[non_exhaustive]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TerminateInstancesInput {
    pub instance_ids: Option<Vec<String>>,
    pub dry_run: Option<bool>,
}

pub mod terminate_instances_input {
    use crate::error::BuildError;
    use crate::input::{push, TerminateInstancesInput};

    #[derive(Clone, Debug, Default, PartialEq)]
    pub struct Builder {
        instance_ids: Option<Vec<String>>,
        dry_run: Option<bool>,
    }

    impl Builder {
        pub fn instance_ids(mut self, input: impl Into<String>) -> Self {
            self.instance_ids = push(self.instance_ids, input.into());
            self
        }

        pub fn set_instance_ids(mut self, input: Option<Vec<String>>) -> Self {
            self.instance_ids = input;
            self
        }

        pub fn dry_run(mut self, input: bool) -> Self {
            self.dry_run = Some(input);
            self
        }

        pub fn set_dry_run(mut self, input: Option<bool>) -> Self {
            self.dry_run = input;
            self
        }

        pub fn build(self) -> Result<TerminateInstancesInput, BuildError> {
            Ok(TerminateInstancesInput {
                instance_ids: Some(self.instance_ids.ok_or_else(|| {
                    BuildError::missing_field("instance_ids", "at least one instance ID is required")
                })?),
                dry_run: self.dry_run,
            })
        }
    }
}

#[non_exhaustive]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CreateTagsInput {
    /// The IDs of the resources to tag, eg. `ami-1a2b3c4d`
    pub resources: Option<Vec<String>>,
    /// The tags to add. An existing tag with the same key is overwritten.
    pub tags: Option<Vec<crate::model::Tag>>,
    pub dry_run: Option<bool>,
}

pub mod create_tags_input {
    use crate::error::BuildError;
    use crate::input::{push, CreateTagsInput};
    use crate::model::Tag;

    #[derive(Clone, Debug, Default, PartialEq)]
    pub struct Builder {
        resources: Option<Vec<String>>,
        tags: Option<Vec<Tag>>,
        dry_run: Option<bool>,
    }

    impl Builder {
        pub fn resources(mut self, input: impl Into<String>) -> Self {
            self.resources = push(self.resources, input.into());
            self
        }

        pub fn set_resources(mut self, input: Option<Vec<String>>) -> Self {
            self.resources = input;
            self
        }

        pub fn tags(mut self, input: impl Into<Tag>) -> Self {
            self.tags = push(self.tags, input.into());
            self
        }

        pub fn set_tags(mut self, input: Option<Vec<Tag>>) -> Self {
            self.tags = input;
            self
        }

        pub fn dry_run(mut self, input: bool) -> Self {
            self.dry_run = Some(input);
            self
        }

        pub fn set_dry_run(mut self, input: Option<bool>) -> Self {
            self.dry_run = input;
            self
        }

        pub fn build(self) -> Result<CreateTagsInput, BuildError> {
            let resources = self
                .resources
                .ok_or_else(|| BuildError::missing_field("resources", "at least one resource ID is required"))?;
            let tags = self
                .tags
                .ok_or_else(|| BuildError::missing_field("tags", "at least one tag is required"))?;
            Ok(CreateTagsInput {
                resources: Some(resources),
                tags: Some(tags),
                dry_run: self.dry_run,
            })
        }
    }
}

#[cfg(test)]
mod test {
    use crate::config::Config;
    use crate::error::BuildError;
    use crate::input::{
        CreateTagsInput, DescribeInstancesInput, DescribeRegionsInput, StopInstancesInput,
    };
    use crate::model::Tag;
    use aws_types::region::Region;
    use http::header::CONTENT_TYPE;
    use protocol_test_helpers::{assert_ok, validate_form_body, validate_headers};

    fn config() -> Config {
        Config::builder().region(Region::new("us-east-1")).build()
    }

    #[test]
    fn describe_regions_is_a_form_post() {
        let op = DescribeRegionsInput::builder()
            .region_names("us-east-1")
            .region_names("eu-west-1")
            .build()
            .unwrap()
            .make_operation(&config())
            .expect("valid operation");
        let req = op.request().http();
        assert_eq!(req.method(), http::Method::POST);
        assert_eq!(req.uri(), "/");
        assert_ok(validate_headers(
            req,
            &[(CONTENT_TYPE.as_str(), "application/x-www-form-urlencoded")],
        ));
        let body = http::Request::new(req.body().bytes().expect("body is in memory"));
        assert_ok(validate_form_body(
            &body,
            "Action=DescribeRegions&Version=2016-11-15&RegionName.1=us-east-1&RegionName.2=eu-west-1",
        ));
        assert_eq!(op.metadata().map(|m| m.name()), Some("DescribeRegions"));
        assert_eq!(op.metadata().map(|m| m.service()), Some("ec2"));
    }

    #[test]
    fn operations_carry_the_client_config() {
        let op = DescribeRegionsInput::builder()
            .build()
            .unwrap()
            .make_operation(&config())
            .unwrap();
        let props = op.request().properties();
        assert!(aws_endpoint::get_endpoint_resolver(&props).is_some());
        assert!(aws_auth::get_provider(&props).is_some());
        assert_eq!(
            props
                .get::<aws_endpoint::Params>()
                .and_then(|params| params.region()),
            Some(&Region::new("us-east-1"))
        );
    }

    #[test]
    fn required_members_are_checked() {
        match StopInstancesInput::builder().force(true).build() {
            Err(BuildError::MissingField { field, .. }) => assert_eq!(field, "instance_ids"),
            other => panic!("unexpected result: {:?}", other),
        }
        CreateTagsInput::builder()
            .resources("i-1234567890abcdef0")
            .build()
            .expect_err("tags are required");
        CreateTagsInput::builder()
            .resources("i-1234567890abcdef0")
            .tags(Tag::builder().key("Name").value("web").build())
            .build()
            .expect("resources and tags are set");
    }

    #[test]
    fn max_results_is_validated() {
        DescribeInstancesInput::builder()
            .max_results(4)
            .build()
            .expect_err("below minimum");
        DescribeInstancesInput::builder()
            .max_results(50)
            .instance_ids("i-1")
            .build()
            .expect_err("cannot be combined with instance ids");
        DescribeInstancesInput::builder()
            .max_results(1000)
            .build()
            .expect("in range");
    }
}
