/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

//! EC2 query request bodies

use crate::input::{
    CreateTagsInput, DescribeAvailabilityZonesInput, DescribeInstancesInput,
    DescribeRegionsInput, StartInstancesInput, StopInstancesInput, TerminateInstancesInput,
};
use crate::model::{Filter, Tag};
use smithy_http::body::SdkBody;
use smithy_query::{QueryValueWriter, QueryWriter};

const API_VERSION: &str = "2016-11-15";

fn write_string_list(writer: QueryValueWriter<'_>, values: &[String]) {
    let mut list = writer.start_list(true, None);
    for value in values {
        list.entry().string(value);
    }
    list.finish();
}

fn write_filters(writer: QueryValueWriter<'_>, filters: &[Filter]) {
    let mut list = writer.start_list(true, None);
    for filter in filters {
        let mut entry = list.entry();
        if let Some(name) = &filter.name {
            entry.prefix("Name").string(name);
        }
        if let Some(values) = &filter.values {
            write_string_list(entry.prefix("Value"), values);
        }
    }
    list.finish();
}

fn write_tags(writer: QueryValueWriter<'_>, tags: &[Tag]) {
    let mut list = writer.start_list(true, None);
    for tag in tags {
        let mut entry = list.entry();
        if let Some(key) = &tag.key {
            entry.prefix("Key").string(key);
        }
        if let Some(value) = &tag.value {
            entry.prefix("Value").string(value);
        }
    }
    list.finish();
}

pub fn serialize_operation_describe_regions(input: &DescribeRegionsInput) -> SdkBody {
    let mut out = String::new();
    let mut writer = QueryWriter::new(&mut out, "DescribeRegions", API_VERSION);
    if let Some(filters) = &input.filters {
        write_filters(writer.prefix("Filter"), filters);
    }
    if let Some(region_names) = &input.region_names {
        write_string_list(writer.prefix("RegionName"), region_names);
    }
    if let Some(all_regions) = input.all_regions {
        writer.prefix("AllRegions").boolean(all_regions);
    }
    if let Some(dry_run) = input.dry_run {
        writer.prefix("DryRun").boolean(dry_run);
    }
    writer.finish();
    SdkBody::from(out)
}

pub fn serialize_operation_describe_availability_zones(
    input: &DescribeAvailabilityZonesInput,
) -> SdkBody {
    let mut out = String::new();
    let mut writer = QueryWriter::new(&mut out, "DescribeAvailabilityZones", API_VERSION);
    if let Some(filters) = &input.filters {
        write_filters(writer.prefix("Filter"), filters);
    }
    if let Some(zone_names) = &input.zone_names {
        write_string_list(writer.prefix("ZoneName"), zone_names);
    }
    if let Some(zone_ids) = &input.zone_ids {
        write_string_list(writer.prefix("ZoneId"), zone_ids);
    }
    if let Some(all) = input.all_availability_zones {
        writer.prefix("AllAvailabilityZones").boolean(all);
    }
    if let Some(dry_run) = input.dry_run {
        writer.prefix("DryRun").boolean(dry_run);
    }
    writer.finish();
    SdkBody::from(out)
}

pub fn serialize_operation_describe_instances(input: &DescribeInstancesInput) -> SdkBody {
    let mut out = String::new();
    let mut writer = QueryWriter::new(&mut out, "DescribeInstances", API_VERSION);
    if let Some(filters) = &input.filters {
        write_filters(writer.prefix("Filter"), filters);
    }
    if let Some(instance_ids) = &input.instance_ids {
        write_string_list(writer.prefix("InstanceId"), instance_ids);
    }
    if let Some(dry_run) = input.dry_run {
        writer.prefix("DryRun").boolean(dry_run);
    }
    if let Some(max_results) = input.max_results {
        writer.prefix("MaxResults").number(max_results.into());
    }
    if let Some(next_token) = &input.next_token {
        writer.prefix("NextToken").string(next_token);
    }
    writer.finish();
    SdkBody::from(out)
}

pub fn serialize_operation_start_instances(input: &StartInstancesInput) -> SdkBody {
    let mut out = String::new();
    let mut writer = QueryWriter::new(&mut out, "StartInstances", API_VERSION);
    if let Some(instance_ids) = &input.instance_ids {
        write_string_list(writer.prefix("InstanceId"), instance_ids);
    }
    if let Some(additional_info) = &input.additional_info {
        writer.prefix("AdditionalInfo").string(additional_info);
    }
    if let Some(dry_run) = input.dry_run {
        writer.prefix("DryRun").boolean(dry_run);
    }
    writer.finish();
    SdkBody::from(out)
}

pub fn serialize_operation_stop_instances(input: &StopInstancesInput) -> SdkBody {
    let mut out = String::new();
    let mut writer = QueryWriter::new(&mut out, "StopInstances", API_VERSION);
    if let Some(instance_ids) = &input.instance_ids {
        write_string_list(writer.prefix("InstanceId"), instance_ids);
    }
    if let Some(hibernate) = input.hibernate {
        writer.prefix("Hibernate").boolean(hibernate);
    }
    if let Some(dry_run) = input.dry_run {
        writer.prefix("DryRun").boolean(dry_run);
    }
    if let Some(force) = input.force {
        writer.prefix("Force").boolean(force);
    }
    writer.finish();
    SdkBody::from(out)
}

pub fn serialize_operation_terminate_instances(input: &TerminateInstancesInput) -> SdkBody {
    let mut out = String::new();
    let mut writer = QueryWriter::new(&mut out, "TerminateInstances", API_VERSION);
    if let Some(instance_ids) = &input.instance_ids {
        write_string_list(writer.prefix("InstanceId"), instance_ids);
    }
    if let Some(dry_run) = input.dry_run {
        writer.prefix("DryRun").boolean(dry_run);
    }
    writer.finish();
    SdkBody::from(out)
}

pub fn serialize_operation_create_tags(input: &CreateTagsInput) -> SdkBody {
    let mut out = String::new();
    let mut writer = QueryWriter::new(&mut out, "CreateTags", API_VERSION);
    if let Some(dry_run) = input.dry_run {
        writer.prefix("DryRun").boolean(dry_run);
    }
    if let Some(resources) = &input.resources {
        write_string_list(writer.prefix("ResourceId"), resources);
    }
    if let Some(tags) = &input.tags {
        write_tags(writer.prefix("Tag"), tags);
    }
    writer.finish();
    SdkBody::from(out)
}

#[cfg(test)]
mod test {
    use crate::input::{
        CreateTagsInput, DescribeInstancesInput, DescribeRegionsInput, StopInstancesInput,
    };
    use crate::model::{Filter, Tag};
    use crate::query_ser::{
        serialize_operation_create_tags, serialize_operation_describe_instances,
        serialize_operation_describe_regions, serialize_operation_stop_instances,
    };
    use pretty_assertions::assert_eq;
    use smithy_http::body::SdkBody;

    fn body_str(body: &SdkBody) -> &str {
        std::str::from_utf8(body.bytes().expect("in-memory body")).expect("utf-8 body")
    }

    #[test]
    fn empty_describe_regions() {
        let input = DescribeRegionsInput::builder().build().unwrap();
        let body = serialize_operation_describe_regions(&input);
        assert_eq!(body_str(&body), "Action=DescribeRegions&Version=2016-11-15");
    }

    #[test]
    fn filters_are_flattened() {
        let input = DescribeInstancesInput::builder()
            .filters(
                Filter::builder()
                    .name("instance-state-name")
                    .values("running")
                    .values("pending")
                    .build(),
            )
            .filters(Filter::builder().name("tag:Name").values("web server").build())
            .max_results(10)
            .build()
            .unwrap();
        let body = serialize_operation_describe_instances(&input);
        assert_eq!(
            body_str(&body),
            "Action=DescribeInstances&Version=2016-11-15\
            &Filter.1.Name=instance-state-name\
            &Filter.1.Value.1=running\
            &Filter.1.Value.2=pending\
            &Filter.2.Name=tag%3AName\
            &Filter.2.Value.1=web%20server\
            &MaxResults=10"
        );
    }

    #[test]
    fn stop_instances_booleans() {
        let input = StopInstancesInput::builder()
            .instance_ids("i-1234567890abcdef0")
            .hibernate(false)
            .force(true)
            .build()
            .unwrap();
        let body = serialize_operation_stop_instances(&input);
        assert_eq!(
            body_str(&body),
            "Action=StopInstances&Version=2016-11-15\
            &InstanceId.1=i-1234567890abcdef0\
            &Hibernate=false\
            &Force=true"
        );
    }

    #[test]
    fn create_tags() {
        let input = CreateTagsInput::builder()
            .resources("ami-78a54011")
            .tags(Tag::builder().key("Stack").value("production").build())
            .build()
            .unwrap();
        let body = serialize_operation_create_tags(&input);
        assert_eq!(
            body_str(&body),
            "Action=CreateTags&Version=2016-11-15\
            &ResourceId.1=ami-78a54011\
            &Tag.1.Key=Stack\
            &Tag.1.Value=production"
        );
    }
}
