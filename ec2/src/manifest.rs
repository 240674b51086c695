/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

//! The operations this client exposes
//!
//! `ec2_manifest!(generator)` expands to `generator! { <every entry> }`. The operation structs,
//! operation errors, `make_operation`, and the fluent builders are generated from these entries.
//! Inputs, outputs, serializers, and parsers are written by hand.
//!
//! Every EC2 Query action is sent with `POST`, including the read-only `Describe*` actions.

macro_rules! ec2_manifest {
    ($generator:ident) => {
        $generator! {
            DescribeRegions {
                client_method: describe_regions,
                http_method: POST,
                input: DescribeRegionsInput,
                input_builder: describe_regions_input,
                output: DescribeRegionsOutput,
                error: DescribeRegionsError,
                error_kind: DescribeRegionsErrorKind,
                serializer: crate::query_ser::serialize_operation_describe_regions,
                parser: crate::xml_deser::deser_operation_describe_regions,
                docs: "Describes the Regions that are enabled for your account, or all Regions.",
                setters: {
                    fn filters(input: impl Into<crate::model::Filter>);
                    fn set_filters(input: Option<Vec<crate::model::Filter>>);
                    fn region_names(input: impl Into<String>);
                    fn set_region_names(input: Option<Vec<String>>);
                    fn all_regions(input: bool);
                    fn set_all_regions(input: Option<bool>);
                    fn dry_run(input: bool);
                    fn set_dry_run(input: Option<bool>);
                },
            },
            DescribeAvailabilityZones {
                client_method: describe_availability_zones,
                http_method: POST,
                input: DescribeAvailabilityZonesInput,
                input_builder: describe_availability_zones_input,
                output: DescribeAvailabilityZonesOutput,
                error: DescribeAvailabilityZonesError,
                error_kind: DescribeAvailabilityZonesErrorKind,
                serializer: crate::query_ser::serialize_operation_describe_availability_zones,
                parser: crate::xml_deser::deser_operation_describe_availability_zones,
                docs: "Describes the Availability Zones, Local Zones, and Wavelength Zones that are available to you.",
                setters: {
                    fn filters(input: impl Into<crate::model::Filter>);
                    fn set_filters(input: Option<Vec<crate::model::Filter>>);
                    fn zone_names(input: impl Into<String>);
                    fn set_zone_names(input: Option<Vec<String>>);
                    fn zone_ids(input: impl Into<String>);
                    fn set_zone_ids(input: Option<Vec<String>>);
                    fn all_availability_zones(input: bool);
                    fn set_all_availability_zones(input: Option<bool>);
                    fn dry_run(input: bool);
                    fn set_dry_run(input: Option<bool>);
                },
            },
            DescribeInstances {
                client_method: describe_instances,
                http_method: POST,
                input: DescribeInstancesInput,
                input_builder: describe_instances_input,
                output: DescribeInstancesOutput,
                error: DescribeInstancesError,
                error_kind: DescribeInstancesErrorKind,
                serializer: crate::query_ser::serialize_operation_describe_instances,
                parser: crate::xml_deser::deser_operation_describe_instances,
                docs: "Describes the specified instances or all instances, grouped by reservation.",
                setters: {
                    fn filters(input: impl Into<crate::model::Filter>);
                    fn set_filters(input: Option<Vec<crate::model::Filter>>);
                    fn instance_ids(input: impl Into<String>);
                    fn set_instance_ids(input: Option<Vec<String>>);
                    fn dry_run(input: bool);
                    fn set_dry_run(input: Option<bool>);
                    fn max_results(input: i32);
                    fn set_max_results(input: Option<i32>);
                    fn next_token(input: impl Into<String>);
                    fn set_next_token(input: Option<String>);
                },
            },
            StartInstances {
                client_method: start_instances,
                http_method: POST,
                input: StartInstancesInput,
                input_builder: start_instances_input,
                output: StartInstancesOutput,
                error: StartInstancesError,
                error_kind: StartInstancesErrorKind,
                serializer: crate::query_ser::serialize_operation_start_instances,
                parser: crate::xml_deser::deser_operation_start_instances,
                docs: "Starts an Amazon EBS-backed instance that you've previously stopped.",
                setters: {
                    fn instance_ids(input: impl Into<String>);
                    fn set_instance_ids(input: Option<Vec<String>>);
                    fn additional_info(input: impl Into<String>);
                    fn set_additional_info(input: Option<String>);
                    fn dry_run(input: bool);
                    fn set_dry_run(input: Option<bool>);
                },
            },
            StopInstances {
                client_method: stop_instances,
                http_method: POST,
                input: StopInstancesInput,
                input_builder: stop_instances_input,
                output: StopInstancesOutput,
                error: StopInstancesError,
                error_kind: StopInstancesErrorKind,
                serializer: crate::query_ser::serialize_operation_stop_instances,
                parser: crate::xml_deser::deser_operation_stop_instances,
                docs: "Stops an Amazon EBS-backed instance.",
                setters: {
                    fn instance_ids(input: impl Into<String>);
                    fn set_instance_ids(input: Option<Vec<String>>);
                    fn hibernate(input: bool);
                    fn set_hibernate(input: Option<bool>);
                    fn dry_run(input: bool);
                    fn set_dry_run(input: Option<bool>);
                    fn force(input: bool);
                    fn set_force(input: Option<bool>);
                },
            },
            TerminateInstances {
                client_method: terminate_instances,
                http_method: POST,
                input: TerminateInstancesInput,
                input_builder: terminate_instances_input,
                output: TerminateInstancesOutput,
                error: TerminateInstancesError,
                error_kind: TerminateInstancesErrorKind,
                serializer: crate::query_ser::serialize_operation_terminate_instances,
                parser: crate::xml_deser::deser_operation_terminate_instances,
                docs: "Shuts down the specified instances. This operation is idempotent.",
                setters: {
                    fn instance_ids(input: impl Into<String>);
                    fn set_instance_ids(input: Option<Vec<String>>);
                    fn dry_run(input: bool);
                    fn set_dry_run(input: Option<bool>);
                },
            },
            CreateTags {
                client_method: create_tags,
                http_method: POST,
                input: CreateTagsInput,
                input_builder: create_tags_input,
                output: CreateTagsOutput,
                error: CreateTagsError,
                error_kind: CreateTagsErrorKind,
                serializer: crate::query_ser::serialize_operation_create_tags,
                parser: crate::xml_deser::deser_operation_create_tags,
                docs: "Adds or overwrites only the specified tags for the specified EC2 resources.",
                setters: {
                    fn resources(input: impl Into<String>);
                    fn set_resources(input: Option<Vec<String>>);
                    fn tags(input: impl Into<crate::model::Tag>);
                    fn set_tags(input: Option<Vec<crate::model::Tag>>);
                    fn dry_run(input: bool);
                    fn set_dry_run(input: Option<bool>);
                },
            },
        }
    };
}
