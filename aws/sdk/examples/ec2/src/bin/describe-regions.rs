/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

use aws_types::region::{ChainProvider, ProvideRegion, Region};
use ec2::{Client, Config, Error, PKG_VERSION};
use structopt::StructOpt;
use tracing_subscriber::fmt::format::FmtSpan;

#[derive(Debug, StructOpt)]
struct Opt {
    /// The AWS Region. Read from `AWS_REGION` when omitted, then defaults to us-east-1.
    #[structopt(short, long)]
    region: Option<String>,

    /// Include Regions that are not enabled for the account
    #[structopt(short, long)]
    all_regions: bool,

    /// Whether to display additional information, including request logs
    #[structopt(short, long)]
    verbose: bool,
}

/// Lists the Regions available to the account.
#[tokio::main]
async fn main() -> Result<(), Error> {
    let Opt {
        region,
        all_regions,
        verbose,
    } = Opt::from_args();

    if verbose {
        tracing_subscriber::fmt::SubscriberBuilder::default()
            .with_env_filter("info,aws_hyper=debug,ec2=debug")
            .with_span_events(FmtSpan::CLOSE)
            .init();
    }

    let region = ChainProvider::first_try(region.map(Region::new))
        .or_default_provider()
        .or_else(Region::new("us-east-1"))
        .region()
        .await;

    if verbose {
        println!("EC2 client version: {}", PKG_VERSION);
        println!("Region:             {:?}", region);
        println!();
    }

    let conf = Config::builder().region(region).build();
    let client = Client::from_conf(conf);

    let resp = client
        .describe_regions()
        .all_regions(all_regions)
        .send()
        .await?;

    for region in resp.regions.unwrap_or_default() {
        println!(
            "{:<16} {:<32} {}",
            region.region_name.as_deref().unwrap_or_default(),
            region.endpoint.as_deref().unwrap_or_default(),
            region.opt_in_status.as_deref().unwrap_or_default()
        );
    }

    Ok(())
}
