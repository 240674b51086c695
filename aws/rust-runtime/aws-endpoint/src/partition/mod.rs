/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

pub mod endpoint;

/// DNS data for an AWS partition
///
/// A partition is a group of regions that share a DNS suffix and a set of capabilities.
#[derive(Debug, Eq, PartialEq)]
pub struct Partition {
    pub id: &'static str,
    pub dns_suffix: &'static str,
    /// `None` when the partition has no dualstack endpoints
    pub dual_stack_dns_suffix: Option<&'static str>,
    pub supports_fips: bool,
}

pub const AWS: Partition = Partition {
    id: "aws",
    dns_suffix: "amazonaws.com",
    dual_stack_dns_suffix: Some("api.aws"),
    supports_fips: true,
};

pub const AWS_CN: Partition = Partition {
    id: "aws-cn",
    dns_suffix: "amazonaws.com.cn",
    dual_stack_dns_suffix: Some("api.amazonwebservices.com.cn"),
    supports_fips: true,
};

pub const AWS_US_GOV: Partition = Partition {
    id: "aws-us-gov",
    dns_suffix: "amazonaws.com",
    dual_stack_dns_suffix: Some("api.aws"),
    supports_fips: true,
};

pub const AWS_ISO: Partition = Partition {
    id: "aws-iso",
    dns_suffix: "c2s.ic.gov",
    dual_stack_dns_suffix: None,
    supports_fips: true,
};

/// Maps a region name onto its partition
///
/// Regions are matched by prefix. Anything unrecognized lands in the `aws` partition.
#[derive(Debug, Default)]
pub struct PartitionResolver {
    _private: (),
}

impl PartitionResolver {
    pub fn new() -> Self {
        Self { _private: () }
    }

    pub fn resolve_partition(&self, region: &str) -> &'static Partition {
        if region.starts_with("cn-") {
            &AWS_CN
        } else if region.starts_with("us-gov-") {
            &AWS_US_GOV
        } else if region.starts_with("us-iso-") {
            &AWS_ISO
        } else {
            &AWS
        }
    }
}

#[cfg(test)]
mod test {
    use super::PartitionResolver;

    #[test]
    fn regions_map_to_partitions() {
        let resolver = PartitionResolver::new();
        for (region, partition) in &[
            ("us-east-1", "aws"),
            ("eu-west-3", "aws"),
            ("cn-north-1", "aws-cn"),
            ("us-gov-west-1", "aws-us-gov"),
            ("us-iso-east-1", "aws-iso"),
            ("mars-central-1", "aws"),
        ] {
            assert_eq!(resolver.resolve_partition(region).id, *partition, "{}", region);
        }
    }

    #[test]
    fn iso_has_no_dualstack() {
        assert!(PartitionResolver::new()
            .resolve_partition("us-iso-east-1")
            .dual_stack_dns_suffix
            .is_none());
    }
}
