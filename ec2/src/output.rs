/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

//! Operation outputs

use crate::model::{AvailabilityZone, InstanceStateChange, Region, Reservation};

#[non_exhaustive]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DescribeRegionsOutput {
    pub regions: Option<Vec<Region>>,
}

#[non_exhaustive]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DescribeAvailabilityZonesOutput {
    pub availability_zones: Option<Vec<AvailabilityZone>>,
}

#[non_exhaustive]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DescribeInstancesOutput {
    pub reservations: Option<Vec<Reservation>>,
    /// Set when more results are available. Pass it to the next request to read the next page.
    pub next_token: Option<String>,
}

#[non_exhaustive]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StartInstancesOutput {
    pub starting_instances: Option<Vec<InstanceStateChange>>,
}

#[non_exhaustive]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StopInstancesOutput {
    pub stopping_instances: Option<Vec<InstanceStateChange>>,
}

#[non_exhaustive]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TerminateInstancesOutput {
    pub terminating_instances: Option<Vec<InstanceStateChange>>,
}

/// `CreateTags` returns nothing beyond success
#[non_exhaustive]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CreateTagsOutput {}
