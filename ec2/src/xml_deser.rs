/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

//! EC2 query response bodies
//!
//! Successful responses are rooted at `<{Operation}Response>`. Lists are wrapped in an element
//! named after the member (eg. `regionInfo`) and hold one `<item>` per entry. Unknown elements
//! are skipped.

use crate::model::{
    AvailabilityZone, AvailabilityZoneState, InstanceState, InstanceStateChange,
    InstanceStateName, Placement, Region, Reservation, Tag,
};
use crate::output::{
    CreateTagsOutput, DescribeAvailabilityZonesOutput, DescribeInstancesOutput,
    DescribeRegionsOutput, StartInstancesOutput, StopInstancesOutput, TerminateInstancesOutput,
};
use smithy_types::instant::Format;
use smithy_types::Instant;
use smithy_xml::decode::{try_data, Document, ScopedDecoder, XmlError};
use std::convert::TryFrom;

/// Parse the `<Response><Errors><Error>` document EC2 returns for every failed request
pub fn parse_generic_error(body: &[u8]) -> Result<smithy_types::Error, XmlError> {
    let mut doc = Document::try_from(body)?;
    let mut root = doc.root_element()?;
    let mut err = smithy_types::Error::default();
    while let Some(mut tag) = root.next_tag() {
        match tag.start_el() {
            s if s.matches("Errors") => {
                while let Some(mut error_tag) = tag.next_tag() {
                    if !error_tag.start_el().matches("Error") {
                        continue;
                    }
                    while let Some(mut field) = error_tag.next_tag() {
                        match field.start_el() {
                            s if s.matches("Code") => {
                                err.code = Some(deser_string(&mut field)?);
                            }
                            s if s.matches("Message") => {
                                err.message = Some(deser_string(&mut field)?);
                            }
                            _ => {}
                        }
                    }
                }
            }
            s if s.matches("RequestID") => {
                err.request_id = Some(deser_string(&mut tag)?);
            }
            _ => {}
        }
    }
    Ok(err)
}

fn start_response<'inp, 'a>(
    doc: &'a mut Document<'inp>,
    operation: &str,
) -> Result<ScopedDecoder<'inp, 'a>, XmlError> {
    let root = doc.root_element()?;
    let expected = format!("{}Response", operation);
    if !root.start_el().matches(&expected) {
        return Err(XmlError::custom(format!(
            "invalid root, expected {} got {:?}",
            expected,
            root.start_el()
        )));
    }
    Ok(root)
}

fn deser_list<T>(
    decoder: &mut ScopedDecoder<'_, '_>,
    parse_item: fn(&mut ScopedDecoder<'_, '_>) -> Result<T, XmlError>,
) -> Result<Vec<T>, XmlError> {
    let mut out = Vec::new();
    while let Some(mut tag) = decoder.next_tag() {
        if tag.start_el().matches("item") {
            out.push(parse_item(&mut tag)?);
        }
    }
    Ok(out)
}

fn deser_string(decoder: &mut ScopedDecoder<'_, '_>) -> Result<String, XmlError> {
    Ok(try_data(decoder)?.into_owned())
}

fn deser_i32(decoder: &mut ScopedDecoder<'_, '_>) -> Result<i32, XmlError> {
    let data = try_data(decoder)?;
    data.parse::<i32>()
        .map_err(|_| XmlError::custom(format!("expected an integer, found `{}`", data)))
}

fn deser_instant(decoder: &mut ScopedDecoder<'_, '_>) -> Result<Instant, XmlError> {
    let data = try_data(decoder)?;
    Instant::from_str(&data, Format::DateTime).map_err(|err| XmlError::Unhandled(Box::new(err)))
}

fn deser_region(decoder: &mut ScopedDecoder<'_, '_>) -> Result<Region, XmlError> {
    let mut region = Region::default();
    while let Some(mut tag) = decoder.next_tag() {
        match tag.start_el() {
            s if s.matches("regionName") => region.region_name = Some(deser_string(&mut tag)?),
            s if s.matches("regionEndpoint") => region.endpoint = Some(deser_string(&mut tag)?),
            s if s.matches("optInStatus") => region.opt_in_status = Some(deser_string(&mut tag)?),
            _ => {}
        }
    }
    Ok(region)
}

fn deser_availability_zone(
    decoder: &mut ScopedDecoder<'_, '_>,
) -> Result<AvailabilityZone, XmlError> {
    let mut zone = AvailabilityZone::default();
    while let Some(mut tag) = decoder.next_tag() {
        match tag.start_el() {
            s if s.matches("zoneName") => zone.zone_name = Some(deser_string(&mut tag)?),
            s if s.matches("zoneState") => {
                zone.state = Some(AvailabilityZoneState::from(&*try_data(&mut tag)?));
            }
            s if s.matches("regionName") => zone.region_name = Some(deser_string(&mut tag)?),
            s if s.matches("zoneId") => zone.zone_id = Some(deser_string(&mut tag)?),
            s if s.matches("zoneType") => zone.zone_type = Some(deser_string(&mut tag)?),
            s if s.matches("optInStatus") => zone.opt_in_status = Some(deser_string(&mut tag)?),
            _ => {}
        }
    }
    Ok(zone)
}

fn deser_tag(decoder: &mut ScopedDecoder<'_, '_>) -> Result<Tag, XmlError> {
    let mut builder = Tag::builder();
    while let Some(mut tag) = decoder.next_tag() {
        match tag.start_el() {
            s if s.matches("key") => builder = builder.key(deser_string(&mut tag)?),
            s if s.matches("value") => builder = builder.value(deser_string(&mut tag)?),
            _ => {}
        }
    }
    Ok(builder.build())
}

fn deser_instance_state(decoder: &mut ScopedDecoder<'_, '_>) -> Result<InstanceState, XmlError> {
    let mut state = InstanceState::default();
    while let Some(mut tag) = decoder.next_tag() {
        match tag.start_el() {
            s if s.matches("code") => state.code = Some(deser_i32(&mut tag)?),
            s if s.matches("name") => state.name = Some(InstanceStateName::from(&*try_data(&mut tag)?)),
            _ => {}
        }
    }
    Ok(state)
}

fn deser_placement(decoder: &mut ScopedDecoder<'_, '_>) -> Result<Placement, XmlError> {
    let mut placement = Placement::default();
    while let Some(mut tag) = decoder.next_tag() {
        match tag.start_el() {
            s if s.matches("availabilityZone") => {
                placement.availability_zone = Some(deser_string(&mut tag)?)
            }
            s if s.matches("groupName") => placement.group_name = Some(deser_string(&mut tag)?),
            s if s.matches("tenancy") => placement.tenancy = Some(deser_string(&mut tag)?),
            _ => {}
        }
    }
    Ok(placement)
}

fn deser_instance(decoder: &mut ScopedDecoder<'_, '_>) -> Result<crate::model::Instance, XmlError> {
    let mut instance = crate::model::Instance::default();
    while let Some(mut tag) = decoder.next_tag() {
        match tag.start_el() {
            s if s.matches("instanceId") => instance.instance_id = Some(deser_string(&mut tag)?),
            s if s.matches("imageId") => instance.image_id = Some(deser_string(&mut tag)?),
            s if s.matches("instanceType") => {
                instance.instance_type = Some(deser_string(&mut tag)?)
            }
            s if s.matches("instanceState") => {
                instance.state = Some(deser_instance_state(&mut tag)?)
            }
            s if s.matches("placement") => instance.placement = Some(deser_placement(&mut tag)?),
            s if s.matches("privateIpAddress") => {
                instance.private_ip_address = Some(deser_string(&mut tag)?)
            }
            s if s.matches("ipAddress") => {
                instance.public_ip_address = Some(deser_string(&mut tag)?)
            }
            s if s.matches("launchTime") => instance.launch_time = Some(deser_instant(&mut tag)?),
            s if s.matches("tagSet") => instance.tags = Some(deser_list(&mut tag, deser_tag)?),
            _ => {}
        }
    }
    Ok(instance)
}

fn deser_reservation(decoder: &mut ScopedDecoder<'_, '_>) -> Result<Reservation, XmlError> {
    let mut reservation = Reservation::default();
    while let Some(mut tag) = decoder.next_tag() {
        match tag.start_el() {
            s if s.matches("reservationId") => {
                reservation.reservation_id = Some(deser_string(&mut tag)?)
            }
            s if s.matches("ownerId") => reservation.owner_id = Some(deser_string(&mut tag)?),
            s if s.matches("instancesSet") => {
                reservation.instances = Some(deser_list(&mut tag, deser_instance)?)
            }
            _ => {}
        }
    }
    Ok(reservation)
}

fn deser_instance_state_change(
    decoder: &mut ScopedDecoder<'_, '_>,
) -> Result<InstanceStateChange, XmlError> {
    let mut change = InstanceStateChange::default();
    while let Some(mut tag) = decoder.next_tag() {
        match tag.start_el() {
            s if s.matches("instanceId") => change.instance_id = Some(deser_string(&mut tag)?),
            s if s.matches("currentState") => {
                change.current_state = Some(deser_instance_state(&mut tag)?)
            }
            s if s.matches("previousState") => {
                change.previous_state = Some(deser_instance_state(&mut tag)?)
            }
            _ => {}
        }
    }
    Ok(change)
}

fn deser_state_changes(
    body: &[u8],
    operation: &str,
) -> Result<Option<Vec<InstanceStateChange>>, XmlError> {
    let mut doc = Document::try_from(body)?;
    let mut root = start_response(&mut doc, operation)?;
    let mut changes = None;
    while let Some(mut tag) = root.next_tag() {
        if tag.start_el().matches("instancesSet") {
            changes = Some(deser_list(&mut tag, deser_instance_state_change)?);
        }
    }
    Ok(changes)
}

pub fn deser_operation_describe_regions(body: &[u8]) -> Result<DescribeRegionsOutput, XmlError> {
    let mut doc = Document::try_from(body)?;
    let mut root = start_response(&mut doc, "DescribeRegions")?;
    let mut output = DescribeRegionsOutput::default();
    while let Some(mut tag) = root.next_tag() {
        if tag.start_el().matches("regionInfo") {
            output.regions = Some(deser_list(&mut tag, deser_region)?);
        }
    }
    Ok(output)
}

pub fn deser_operation_describe_availability_zones(
    body: &[u8],
) -> Result<DescribeAvailabilityZonesOutput, XmlError> {
    let mut doc = Document::try_from(body)?;
    let mut root = start_response(&mut doc, "DescribeAvailabilityZones")?;
    let mut output = DescribeAvailabilityZonesOutput::default();
    while let Some(mut tag) = root.next_tag() {
        if tag.start_el().matches("availabilityZoneInfo") {
            output.availability_zones = Some(deser_list(&mut tag, deser_availability_zone)?);
        }
    }
    Ok(output)
}

pub fn deser_operation_describe_instances(
    body: &[u8],
) -> Result<DescribeInstancesOutput, XmlError> {
    let mut doc = Document::try_from(body)?;
    let mut root = start_response(&mut doc, "DescribeInstances")?;
    let mut output = DescribeInstancesOutput::default();
    while let Some(mut tag) = root.next_tag() {
        match tag.start_el() {
            s if s.matches("reservationSet") => {
                output.reservations = Some(deser_list(&mut tag, deser_reservation)?);
            }
            s if s.matches("nextToken") => {
                output.next_token = Some(deser_string(&mut tag)?).filter(|t| !t.is_empty());
            }
            _ => {}
        }
    }
    Ok(output)
}

pub fn deser_operation_start_instances(body: &[u8]) -> Result<StartInstancesOutput, XmlError> {
    Ok(StartInstancesOutput {
        starting_instances: deser_state_changes(body, "StartInstances")?,
    })
}

pub fn deser_operation_stop_instances(body: &[u8]) -> Result<StopInstancesOutput, XmlError> {
    Ok(StopInstancesOutput {
        stopping_instances: deser_state_changes(body, "StopInstances")?,
    })
}

pub fn deser_operation_terminate_instances(
    body: &[u8],
) -> Result<TerminateInstancesOutput, XmlError> {
    Ok(TerminateInstancesOutput {
        terminating_instances: deser_state_changes(body, "TerminateInstances")?,
    })
}

pub fn deser_operation_create_tags(body: &[u8]) -> Result<CreateTagsOutput, XmlError> {
    let mut doc = Document::try_from(body)?;
    start_response(&mut doc, "CreateTags")?;
    Ok(CreateTagsOutput::default())
}
