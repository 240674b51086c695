/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

//! Abstractions for the Smithy AWS Query and EC2 Query protocols
//!
//! Requests are serialized as `application/x-www-form-urlencoded` bodies of the form
//! `Action=<op>&Version=<version>&Name.1=value&...`. The EC2 flavor always flattens lists and
//! numbers list members starting at 1.

use smithy_types::Instant;
use std::borrow::Cow;
use urlencoding::encode;

pub struct QueryWriter<'a> {
    output: &'a mut String,
}

impl<'a> QueryWriter<'a> {
    /// Start a new request body, writing the `Action` and `Version` parameters
    pub fn new(output: &'a mut String, action: &str, version: &str) -> Self {
        output.push_str("Action=");
        output.push_str(&encode(action));
        output.push_str("&Version=");
        output.push_str(&encode(version));
        QueryWriter { output }
    }

    pub fn prefix(&mut self, prefix: &'a str) -> QueryValueWriter {
        QueryValueWriter::new(self.output, Cow::Borrowed(prefix))
    }

    pub fn finish(self) {
        // Calling this drops self
    }
}

#[must_use]
pub struct QueryMapWriter<'a> {
    output: &'a mut String,
    prefix: Cow<'a, str>,
    flatten: bool,
    key_name: &'static str,
    value_name: &'static str,
    next_index: usize,
}

impl<'a> QueryMapWriter<'a> {
    fn new(
        output: &'a mut String,
        prefix: Cow<'a, str>,
        flatten: bool,
        key_name: &'static str,
        value_name: &'static str,
    ) -> QueryMapWriter<'a> {
        QueryMapWriter {
            prefix,
            output,
            flatten,
            key_name,
            value_name,
            next_index: 1,
        }
    }

    pub fn entry(&mut self, key: &str) -> QueryValueWriter {
        let entry = if self.flatten { "" } else { ".entry" };
        self.output.push_str(&format!(
            "&{}{}.{}.{}={}",
            self.prefix,
            entry,
            self.next_index,
            self.key_name,
            encode(key)
        ));
        let value_name = format!(
            "{}{}.{}.{}",
            self.prefix, entry, self.next_index, self.value_name
        );

        self.next_index += 1;
        QueryValueWriter::new(self.output, Cow::Owned(value_name))
    }

    pub fn finish(self) {
        // Calling this drops self
    }
}

#[must_use]
pub struct QueryListWriter<'a> {
    output: &'a mut String,
    prefix: Cow<'a, str>,
    flatten: bool,
    member_override: Option<&'a str>,
    next_index: usize,
}

impl<'a> QueryListWriter<'a> {
    fn new(
        output: &'a mut String,
        prefix: Cow<'a, str>,
        flatten: bool,
        member_override: Option<&'a str>,
    ) -> QueryListWriter<'a> {
        QueryListWriter {
            prefix,
            output,
            flatten,
            member_override,
            next_index: 1,
        }
    }

    pub fn entry(&mut self) -> QueryValueWriter {
        let value_name = if self.flatten {
            format!("{}.{}", self.prefix, self.next_index)
        } else {
            format!(
                "{}.{}.{}",
                self.prefix,
                self.member_override.unwrap_or("member"),
                self.next_index
            )
        };

        self.next_index += 1;
        QueryValueWriter::new(self.output, Cow::Owned(value_name))
    }

    pub fn finish(self) {
        // https://github.com/awslabs/smithy/commit/715b1d94ab14764ad43496b016b0c2e85bcf1d1f
        // If the list was empty, just serialize the parameter name
        if self.next_index == 1 {
            QueryValueWriter::new(self.output, self.prefix).write_param_name();
        }
    }
}

#[must_use]
pub struct QueryValueWriter<'a> {
    output: &'a mut String,
    prefix: Cow<'a, str>,
}

impl<'a> QueryValueWriter<'a> {
    pub fn new(output: &'a mut String, prefix: Cow<'a, str>) -> QueryValueWriter<'a> {
        QueryValueWriter { output, prefix }
    }

    /// Starts a new prefix.
    pub fn prefix(&mut self, prefix: &'a str) -> QueryValueWriter {
        QueryValueWriter::new(
            self.output,
            Cow::Owned(format!("{}.{}", self.prefix, prefix)),
        )
    }

    /// Writes the boolean `value`.
    pub fn boolean(mut self, value: bool) {
        self.write_param_name();
        self.output.push_str(match value {
            true => "true",
            _ => "false",
        });
    }

    /// Writes a string `value`.
    pub fn string(mut self, value: &str) {
        self.write_param_name();
        self.output.push_str(&encode(value));
    }

    /// Writes an integer `value`.
    pub fn number(mut self, value: i64) {
        self.write_param_name();
        self.output.push_str(&value.to_string());
    }

    /// Writes a date-time `value` in the `date-time` format
    pub fn instant(self, value: &Instant) {
        self.string(&value.fmt(smithy_types::instant::Format::DateTime));
    }

    /// Starts a map.
    pub fn start_map(
        self,
        flat: bool,
        key_name: &'static str,
        value_name: &'static str,
    ) -> QueryMapWriter<'a> {
        QueryMapWriter::new(self.output, self.prefix, flat, key_name, value_name)
    }

    /// Starts a list.
    pub fn start_list(self, flat: bool, member_override: Option<&'a str>) -> QueryListWriter<'a> {
        QueryListWriter::new(self.output, self.prefix, flat, member_override)
    }

    fn write_param_name(&mut self) {
        self.output.push('&');
        self.output.push_str(&self.prefix);
        self.output.push('=');
    }
}

#[cfg(test)]
mod tests {
    use crate::QueryWriter;
    use pretty_assertions::assert_eq;
    use smithy_types::Instant;

    #[test]
    fn no_params() {
        let mut out = String::new();
        let writer = QueryWriter::new(&mut out, "DescribeRegions", "2016-11-15");
        writer.finish();
        assert_eq!("Action=DescribeRegions&Version=2016-11-15", out);
    }

    #[test]
    fn ec2_flat_lists() {
        let mut out = String::new();
        let mut writer = QueryWriter::new(&mut out, "DescribeInstances", "2016-11-15");
        let mut list = writer.prefix("InstanceId").start_list(true, None);
        list.entry().string("i-1234567890abcdef0");
        list.entry().string("i-0598c7d356eba48d7");
        list.finish();
        writer.prefix("DryRun").boolean(false);
        writer.prefix("MaxResults").number(5);
        writer.finish();
        assert_eq!(
            "Action=DescribeInstances&Version=2016-11-15\
            &InstanceId.1=i-1234567890abcdef0\
            &InstanceId.2=i-0598c7d356eba48d7\
            &DryRun=false\
            &MaxResults=5",
            out
        );
    }

    #[test]
    fn nested_structures_in_lists() {
        let mut out = String::new();
        let mut writer = QueryWriter::new(&mut out, "CreateTags", "2016-11-15");
        let mut tags = writer.prefix("Tag").start_list(true, None);
        let mut tag = tags.entry();
        tag.prefix("Key").string("Name");
        tag.prefix("Value").string("web server");
        tags.finish();
        writer.finish();
        assert_eq!(
            "Action=CreateTags&Version=2016-11-15&Tag.1.Key=Name&Tag.1.Value=web%20server",
            out
        );
    }

    #[test]
    fn empty_lists_write_the_param_name() {
        let mut out = String::new();
        let mut writer = QueryWriter::new(&mut out, "DescribeRegions", "2016-11-15");
        writer.prefix("RegionName").start_list(true, None).finish();
        writer.finish();
        assert_eq!("Action=DescribeRegions&Version=2016-11-15&RegionName=", out);
    }

    #[test]
    fn member_lists_and_maps() {
        let mut out = String::new();
        let mut writer = QueryWriter::new(&mut out, "Test", "1");
        let mut list = writer.prefix("Values").start_list(false, None);
        list.entry().string("a");
        list.finish();
        let mut map = writer.prefix("Attrs").start_map(false, "key", "value");
        map.entry("color").string("blue");
        map.finish();
        writer.finish();
        assert_eq!(
            "Action=Test&Version=1&Values.member.1=a&Attrs.entry.1.key=color&Attrs.entry.1.value=blue",
            out
        );
    }

    #[test]
    fn timestamps_and_escaping() {
        let mut out = String::new();
        let mut writer = QueryWriter::new(&mut out, "Test", "1");
        writer
            .prefix("Since")
            .instant(&Instant::from_epoch_seconds(1576540098));
        writer.prefix("Filter").string("a&b=c");
        writer.finish();
        assert_eq!(
            "Action=Test&Version=1&Since=2019-12-16T23%3A48%3A18Z&Filter=a%26b%3Dc",
            out
        );
    }
}
