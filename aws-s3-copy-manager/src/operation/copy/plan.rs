/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::cmp;

use crate::config::MIN_MULTIPART_PART_SIZE_BYTES;
use crate::error::{self, Error};

/// Maximum number of parts that a single S3 multipart upload supports
const MAX_PARTS: u64 = 10_000;

/// A single byte range of the source, copied as one part
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PlannedPart {
    part_number: i32,
    range_start: u64,
    range_end: u64,
}

impl PlannedPart {
    /// 1-based part number
    pub(crate) fn part_number(&self) -> i32 {
        self.part_number
    }

    /// The inclusive range formatted as an `x-amz-copy-source-range` value
    pub(crate) fn copy_source_range(&self) -> String {
        format!("bytes={}-{}", self.range_start, self.range_end)
    }
}

/// Part layout of a multipart copy
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CopyPlan {
    total_size: u64,
    part_size: u64,
    parts: Vec<PlannedPart>,
}

impl CopyPlan {
    pub(crate) fn total_size(&self) -> u64 {
        self.total_size
    }

    /// Effective part size, which may be larger than requested
    pub(crate) fn part_size(&self) -> u64 {
        self.part_size
    }

    pub(crate) fn parts(&self) -> &[PlannedPart] {
        &self.parts
    }

    pub(crate) fn len(&self) -> usize {
        self.parts.len()
    }
}

/// Reject a requested part size below the multipart minimum
pub(crate) fn validate_part_size(part_size: u64) -> Result<u64, Error> {
    if part_size < MIN_MULTIPART_PART_SIZE_BYTES {
        return Err(error::invalid_input(format!(
            "part size ({part_size} bytes) must be at least {MIN_MULTIPART_PART_SIZE_BYTES} bytes"
        )));
    }
    Ok(part_size)
}

/// Split `total_size` bytes into parts of `part_size` bytes, the last one possibly shorter.
pub(crate) fn plan(total_size: u64, part_size: u64) -> Result<CopyPlan, Error> {
    let part_size = validate_part_size(part_size)?;
    if total_size < MIN_MULTIPART_PART_SIZE_BYTES {
        return Err(error::size_too_small(total_size));
    }

    let part_size = cmp::max(part_size, total_size.div_ceil(MAX_PARTS));
    let part_count = total_size.div_ceil(part_size);
    tracing::trace!(
        "planned multipart copy of {total_size} bytes as {part_count} parts of {part_size} bytes"
    );

    let parts = (0..part_count)
        .map(|n| {
            let range_start = n * part_size;
            PlannedPart {
                part_number: (n + 1) as i32,
                range_start,
                range_end: cmp::min(range_start.saturating_add(part_size), total_size) - 1,
            }
        })
        .collect();

    Ok(CopyPlan {
        total_size,
        part_size,
        parts,
    })
}

#[cfg(test)]
mod test {
    use super::{plan, CopyPlan};
    use crate::error::ErrorKind;

    const MIB: u64 = 1024 * 1024;

    fn assert_tiles(plan: &CopyPlan) {
        let mut next = 0;
        for (i, part) in plan.parts().iter().enumerate() {
            assert_eq!((i + 1) as i32, part.part_number);
            assert_eq!(next, part.range_start);
            assert!(part.range_end >= part.range_start);
            next = part.range_end + 1;
        }
        assert_eq!(plan.total_size, next);
        assert_eq!(
            plan.total_size.div_ceil(plan.part_size()),
            plan.len() as u64
        );
    }

    #[test]
    fn test_default_part_size_ranges() {
        let plan = plan(300 * MIB, 50 * MIB).unwrap();
        let ranges: Vec<String> = plan.parts().iter().map(|p| p.copy_source_range()).collect();
        assert_eq!(
            vec![
                "bytes=0-52428799",
                "bytes=52428800-104857599",
                "bytes=104857600-157286399",
                "bytes=157286400-209715199",
                "bytes=209715200-262143999",
                "bytes=262144000-314572799",
            ],
            ranges
        );
    }

    #[test]
    fn test_minimum_part_size() {
        let plan = plan(300 * MIB, 5 * MIB).unwrap();
        assert_eq!(60, plan.len());
        assert_tiles(&plan);
    }

    #[test]
    fn test_last_part_shorter() {
        let plan = plan(12 * MIB + 7, 5 * MIB).unwrap();
        assert_eq!(3, plan.len());
        assert_eq!(
            format!("bytes={}-{}", 10 * MIB, 12 * MIB + 6),
            plan.parts()[2].copy_source_range()
        );
        assert_tiles(&plan);
    }

    #[test]
    fn test_ranges_tile_object() {
        for (total, part) in [
            (5 * MIB, 5 * MIB),
            (5 * MIB + 1, 5 * MIB),
            (99 * MIB + 123, 7 * MIB),
            (1024 * MIB, 50 * MIB),
        ] {
            assert_tiles(&plan(total, part).unwrap());
        }
    }

    #[test]
    fn test_part_size_grows_past_max_parts() {
        let total = 10_001 * 5 * MIB;
        let plan = plan(total, 5 * MIB).unwrap();
        assert!(plan.len() <= 10_000);
        assert!(plan.part_size() > 5 * MIB);
        assert_tiles(&plan);
    }

    #[test]
    fn test_largest_length_does_not_overflow() {
        let plan = plan(u64::MAX, 5 * MIB).unwrap();
        assert_eq!(10_000, plan.len());
        let last = plan.parts().last().unwrap();
        assert_eq!(u64::MAX - 1, last.range_end);
        assert_tiles(&plan);
    }

    #[test]
    fn test_object_too_small() {
        let err = plan(4 * MIB, 5 * MIB).unwrap_err();
        assert_eq!(&ErrorKind::SizeTooSmall, err.kind());
        let message = std::error::Error::source(&err).unwrap().to_string();
        assert!(message.contains("smaller than 5MB"));
    }

    #[test]
    fn test_part_size_too_small() {
        let err = plan(300 * MIB, MIB).unwrap_err();
        assert_eq!(&ErrorKind::InputInvalid, err.kind());
    }
}
