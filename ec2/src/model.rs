/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

//! Shapes shared between inputs and outputs

use smithy_types::Instant;

/// A filter name and values pair used to return a more specific list of results
///
/// Filter names and values are case-sensitive. Multiple values for the same filter are
/// combined with a logical `OR`.
#[non_exhaustive]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Filter {
    pub name: Option<String>,
    pub values: Option<Vec<String>>,
}

impl Filter {
    pub fn builder() -> filter::Builder {
        filter::Builder::default()
    }
}

pub mod filter {
    use crate::model::Filter;

    #[derive(Clone, Debug, Default, PartialEq)]
    pub struct Builder {
        name: Option<String>,
        values: Option<Vec<String>>,
    }

    impl Builder {
        pub fn name(mut self, input: impl Into<String>) -> Self {
            self.name = Some(input.into());
            self
        }

        pub fn set_name(mut self, input: Option<String>) -> Self {
            self.name = input;
            self
        }

        /// Append a value to the filter
        pub fn values(mut self, input: impl Into<String>) -> Self {
            self.values.get_or_insert_with(Vec::new).push(input.into());
            self
        }

        pub fn set_values(mut self, input: Option<Vec<String>>) -> Self {
            self.values = input;
            self
        }

        pub fn build(self) -> Filter {
            Filter {
                name: self.name,
                values: self.values,
            }
        }
    }
}

/// A key/value pair attached to a resource
#[non_exhaustive]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tag {
    pub key: Option<String>,
    pub value: Option<String>,
}

impl Tag {
    pub fn builder() -> tag::Builder {
        tag::Builder::default()
    }
}

pub mod tag {
    use crate::model::Tag;

    #[derive(Clone, Debug, Default, PartialEq)]
    pub struct Builder {
        key: Option<String>,
        value: Option<String>,
    }

    impl Builder {
        pub fn key(mut self, input: impl Into<String>) -> Self {
            self.key = Some(input.into());
            self
        }

        pub fn set_key(mut self, input: Option<String>) -> Self {
            self.key = input;
            self
        }

        pub fn value(mut self, input: impl Into<String>) -> Self {
            self.value = Some(input.into());
            self
        }

        pub fn set_value(mut self, input: Option<String>) -> Self {
            self.value = input;
            self
        }

        pub fn build(self) -> Tag {
            Tag {
                key: self.key,
                value: self.value,
            }
        }
    }
}

/// Describes a Region
#[non_exhaustive]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Region {
    /// The Region service endpoint, eg. `ec2.us-east-1.amazonaws.com`
    pub endpoint: Option<String>,
    pub region_name: Option<String>,
    /// `opt-in-not-required`, `opted-in`, or `not-opted-in`
    pub opt_in_status: Option<String>,
}

/// Describes an Availability Zone, Local Zone, or Wavelength Zone
#[non_exhaustive]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AvailabilityZone {
    pub state: Option<AvailabilityZoneState>,
    pub opt_in_status: Option<String>,
    pub region_name: Option<String>,
    pub zone_name: Option<String>,
    pub zone_id: Option<String>,
    /// `availability-zone`, `local-zone`, or `wavelength-zone`
    pub zone_type: Option<String>,
}

#[non_exhaustive]
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum AvailabilityZoneState {
    Available,
    Impaired,
    Information,
    Unavailable,
    /// A state this version of the client does not know about
    Unknown(String),
}

impl AvailabilityZoneState {
    pub fn as_str(&self) -> &str {
        match self {
            AvailabilityZoneState::Available => "available",
            AvailabilityZoneState::Impaired => "impaired",
            AvailabilityZoneState::Information => "information",
            AvailabilityZoneState::Unavailable => "unavailable",
            AvailabilityZoneState::Unknown(s) => s.as_ref(),
        }
    }
}

impl From<&str> for AvailabilityZoneState {
    fn from(s: &str) -> Self {
        match s {
            "available" => AvailabilityZoneState::Available,
            "impaired" => AvailabilityZoneState::Impaired,
            "information" => AvailabilityZoneState::Information,
            "unavailable" => AvailabilityZoneState::Unavailable,
            other => AvailabilityZoneState::Unknown(other.to_owned()),
        }
    }
}

impl AsRef<str> for AvailabilityZoneState {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// A launch request for one or more instances
#[non_exhaustive]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Reservation {
    pub reservation_id: Option<String>,
    /// The ID of the AWS account that owns the reservation
    pub owner_id: Option<String>,
    pub instances: Option<Vec<Instance>>,
}

#[non_exhaustive]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Instance {
    pub instance_id: Option<String>,
    pub image_id: Option<String>,
    pub instance_type: Option<String>,
    pub state: Option<InstanceState>,
    pub placement: Option<Placement>,
    pub private_ip_address: Option<String>,
    pub public_ip_address: Option<String>,
    pub launch_time: Option<Instant>,
    pub tags: Option<Vec<Tag>>,
}

/// The current state of an instance
#[non_exhaustive]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InstanceState {
    /// The state of the instance as a 16-bit unsigned integer
    ///
    /// The low byte holds the state: 0 (pending), 16 (running), 32 (shutting-down),
    /// 48 (terminated), 64 (stopping), and 80 (stopped). The high byte is used internally by
    /// EC2 and should be ignored.
    pub code: Option<i32>,
    pub name: Option<InstanceStateName>,
}

#[non_exhaustive]
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum InstanceStateName {
    Pending,
    Running,
    ShuttingDown,
    Stopped,
    Stopping,
    Terminated,
    /// A state this version of the client does not know about
    Unknown(String),
}

impl InstanceStateName {
    pub fn as_str(&self) -> &str {
        match self {
            InstanceStateName::Pending => "pending",
            InstanceStateName::Running => "running",
            InstanceStateName::ShuttingDown => "shutting-down",
            InstanceStateName::Stopped => "stopped",
            InstanceStateName::Stopping => "stopping",
            InstanceStateName::Terminated => "terminated",
            InstanceStateName::Unknown(s) => s.as_ref(),
        }
    }
}

impl From<&str> for InstanceStateName {
    fn from(s: &str) -> Self {
        match s {
            "pending" => InstanceStateName::Pending,
            "running" => InstanceStateName::Running,
            "shutting-down" => InstanceStateName::ShuttingDown,
            "stopped" => InstanceStateName::Stopped,
            "stopping" => InstanceStateName::Stopping,
            "terminated" => InstanceStateName::Terminated,
            other => InstanceStateName::Unknown(other.to_owned()),
        }
    }
}

impl AsRef<str> for InstanceStateName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

#[non_exhaustive]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Placement {
    pub availability_zone: Option<String>,
    pub group_name: Option<String>,
    /// `default`, `dedicated`, or `host`
    pub tenancy: Option<String>,
}

/// An instance state change returned by `StartInstances`, `StopInstances`, and `TerminateInstances`
#[non_exhaustive]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InstanceStateChange {
    pub instance_id: Option<String>,
    pub current_state: Option<InstanceState>,
    pub previous_state: Option<InstanceState>,
}
