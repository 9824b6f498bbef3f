//! Property tests for single-pass rewrite application

use proptest::prelude::*;

use panelsplit::split::region::{self, RegionKind};
use panelsplit::split::rewrite::{Edit, RewritePlan};

proptest! {
    /// Applying a plan matches a naive left-to-right rebuild, and the
    /// length arithmetic agrees with the plan's delta.
    #[test]
    fn applied_plan_matches_forward_rebuild(
        text in "[a-z]{0,80}",
        cuts in proptest::collection::vec(0usize..=80, 0..6),
        replacements in proptest::collection::vec("[A-Z]{0,8}", 3),
    ) {
        let mut cuts: Vec<usize> = cuts.into_iter().filter(|c| *c <= text.len()).collect();
        cuts.sort_unstable();
        cuts.dedup();

        // Pair consecutive cut points into disjoint ranges.
        let mut ranges = Vec::new();
        let mut i = 0;
        while i + 1 < cuts.len() && ranges.len() < replacements.len() {
            ranges.push(cuts[i]..cuts[i + 1]);
            i += 2;
        }

        let mut plan = RewritePlan::new();
        for (idx, range) in ranges.iter().enumerate() {
            plan.push(Edit {
                range: range.clone(),
                replacement: replacements[idx].clone(),
            });
        }

        let mut expected = String::new();
        let mut cursor = 0;
        for (idx, range) in ranges.iter().enumerate() {
            expected.push_str(&text[cursor..range.start]);
            expected.push_str(&replacements[idx]);
            cursor = range.end;
        }
        expected.push_str(&text[cursor..]);

        let out = plan.apply(&text).unwrap();
        prop_assert_eq!(out.len() as i64, text.len() as i64 + plan.delta());
        prop_assert_eq!(out, expected);
    }

    /// Push order never changes the applied result.
    #[test]
    fn push_order_is_irrelevant(
        text in "[a-z]{20,40}",
        a_len in 1usize..5,
        b_start in 10usize..15,
        b_len in 1usize..5,
    ) {
        let a = Edit { range: 0..a_len, replacement: "X".into() };
        let b = Edit { range: b_start..(b_start + b_len), replacement: "Y".into() };

        let mut forward = RewritePlan::new();
        forward.push(a.clone());
        forward.push(b.clone());

        let mut backward = RewritePlan::new();
        backward.push(b);
        backward.push(a);

        prop_assert_eq!(forward.apply(&text).unwrap(), backward.apply(&text).unwrap());
    }

    /// Extracted regions are pairwise disjoint and reproduce the trimmed
    /// inputs for any well-formed blob.
    #[test]
    fn extracted_regions_are_disjoint_and_verbatim(
        style in "[a-z{}:; ]{0,20}",
        body in "[a-z ]{0,20}",
        script in "[a-z().; ]{0,20}",
    ) {
        let blob = format!(
            "<style>\n{}\n</style>\n<body>\n{}\n<script>\n{}\n</script>\n</body>\n",
            style, body, script
        );
        let extraction = region::extract(&blob).unwrap();

        prop_assert_eq!(extraction.region(RegionKind::Style).content.as_str(), style.trim());
        prop_assert_eq!(extraction.region(RegionKind::Body).content.as_str(), body.trim());
        prop_assert_eq!(extraction.region(RegionKind::Script).content.as_str(), script.trim());

        let spans: Vec<_> = extraction
            .regions
            .iter()
            .filter(|r| !r.is_absent())
            .map(|r| r.span.clone())
            .collect();
        for i in 0..spans.len() {
            for j in (i + 1)..spans.len() {
                prop_assert!(
                    spans[i].end <= spans[j].start || spans[j].end <= spans[i].start,
                    "spans {:?} and {:?} overlap", spans[i], spans[j]
                );
            }
        }
    }
}
