/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Everything except the RFC 3986 unreserved characters `A-Z a-z 0-9 - . _ ~`
const BASE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

pub(super) fn percent_encode(value: &str) -> String {
    utf8_percent_encode(value, BASE_SET).to_string()
}

#[cfg(test)]
mod test {
    use super::percent_encode;
    use proptest::prelude::*;

    #[test]
    fn unreserved_is_untouched() {
        assert_eq!(percent_encode("-_.~azAZ09"), "-_.~azAZ09");
        assert_eq!(percent_encode("a b/c=d"), "a%20b%2Fc%3Dd");
    }

    proptest! {
        #[test]
        fn output_is_unreserved_or_escaped(s: String) {
            let encoded = percent_encode(&s);
            prop_assert!(encoded
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || "-_.~%".contains(c)));
        }
    }
}
