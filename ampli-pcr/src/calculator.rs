use std::ops::ControlFlow;

use ampli_core::models::Amplicon;

use crate::models::{MaxProductLength, PrimingSite};
use crate::primers::reverse_complement;

/// Per-template bookkeeping from one calculator pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CalculationStats {
    /// Products handed to the caller
    pub emitted: usize,
    /// Products dropped for exceeding the length limit
    pub too_long: usize,
    /// Forward sites that lost their reverse site to a closer forward site
    pub superseded: usize,
}

///
/// Walk the sorted forward and reverse sites of one template and hand every
/// predicted product to `emit`.
///
/// Each forward site is paired with the first reverse site strictly
/// downstream of it. If the next forward site also lies upstream of that
/// reverse site, the closer one wins and the current site yields nothing.
/// Both indices only move forward, so this is a single merge pass.
///
/// Returning `ControlFlow::Break` from `emit` stops the pass early.
///
/// Both slices must be sorted by position.
pub fn for_each_amplicon<F>(
    chrom: &str,
    forward: &[PrimingSite],
    reverse: &[PrimingSite],
    max_length: MaxProductLength,
    mut emit: F,
) -> CalculationStats
where
    F: FnMut(Amplicon) -> ControlFlow<()>,
{
    let mut stats = CalculationStats::default();
    let mut rev_idx = 0;

    for (i, fwd) in forward.iter().enumerate() {
        while rev_idx < reverse.len() && fwd.position >= reverse[rev_idx].position {
            rev_idx += 1;
        }

        // no reverse site left for this or any later forward site
        let Some(rev) = reverse.get(rev_idx) else {
            break;
        };

        if forward
            .get(i + 1)
            .is_some_and(|next| next.position < rev.position)
        {
            stats.superseded += 1;
            continue;
        }

        let (start, end) = (fwd.position, rev.position);
        if !max_length.allows(end - start) {
            stats.too_long += 1;
            continue;
        }

        let amplicon = Amplicon::new(
            chrom,
            start,
            end,
            &fwd.primer,
            &reverse_complement(&rev.primer),
        );
        stats.emitted += 1;

        if emit(amplicon).is_break() {
            break;
        }
    }

    stats
}

/// Collect the products of one template into a vector.
pub fn calculate_amplicons(
    chrom: &str,
    forward: &[PrimingSite],
    reverse: &[PrimingSite],
    max_length: MaxProductLength,
) -> Vec<Amplicon> {
    let mut amplicons = Vec::new();
    for_each_amplicon(chrom, forward, reverse, max_length, |amplicon| {
        amplicons.push(amplicon);
        ControlFlow::Continue(())
    });
    amplicons
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use pretty_assertions::assert_eq;
    use rstest::*;

    use crate::models::Strand;

    fn fwd(primer: &str, position: usize) -> PrimingSite {
        PrimingSite::new(Arc::from(primer), position, Strand::Forward)
    }

    /// Reverse sites store the reverse complement of the primer
    fn rev(primer: &str, position: usize) -> PrimingSite {
        PrimingSite::new(Arc::from(reverse_complement(primer)), position, Strand::Reverse)
    }

    fn spans(amplicons: &[Amplicon]) -> Vec<(usize, usize)> {
        amplicons.iter().map(|a| (a.start, a.end)).collect()
    }

    #[rstest]
    fn test_single_product() {
        let amplicons = calculate_amplicons(
            "seq1",
            &[fwd("AAA", 7)],
            &[rev("CCC", 10)],
            MaxProductLength::from_raw(1000),
        );
        assert_eq!(amplicons, vec![Amplicon::new("seq1", 7, 10, "AAA", "CCC")]);
        assert_eq!(amplicons[0].name, "AAA+CCC");
    }

    #[rstest]
    #[case(2, 0)]
    #[case(3, 1)]
    #[case(0, 1)]
    fn test_length_filter(#[case] max_length: usize, #[case] expected: usize) {
        let amplicons = calculate_amplicons(
            "seq1",
            &[fwd("AAA", 7)],
            &[rev("CCC", 10)],
            MaxProductLength::from_raw(max_length),
        );
        assert_eq!(amplicons.len(), expected);
    }

    #[rstest]
    fn test_nearest_forward_site_wins() {
        let forward = [fwd("AAA", 5), fwd("AAA", 20)];
        let reverse = [rev("CCC", 40)];

        let mut amplicons = Vec::new();
        let stats = for_each_amplicon("chr1", &forward, &reverse, MaxProductLength::UNLIMITED, |a| {
            amplicons.push(a);
            ControlFlow::Continue(())
        });

        assert_eq!(spans(&amplicons), vec![(20, 40)]);
        assert_eq!(stats.superseded, 1);
        assert_eq!(stats.emitted, 1);
    }

    #[rstest]
    fn test_reverse_sites_behind_are_skipped() {
        let forward = [fwd("AAA", 10), fwd("GGT", 50)];
        let reverse = [rev("CCC", 2), rev("CCC", 10), rev("TTG", 30), rev("CCC", 70)];

        let amplicons = calculate_amplicons("chr1", &forward, &reverse, MaxProductLength::UNLIMITED);
        assert_eq!(spans(&amplicons), vec![(10, 30), (50, 70)]);
        assert_eq!(amplicons[0].name, "AAA+TTG");
        assert_eq!(amplicons[1].name, "GGT+CCC");
    }

    #[rstest]
    fn test_one_reverse_site_can_close_one_product_only_once() {
        // once 10->30 is emitted, the next forward site at 35 must look past 30
        let forward = [fwd("AAA", 10), fwd("AAA", 35)];
        let reverse = [rev("CCC", 30)];

        let amplicons = calculate_amplicons("chr1", &forward, &reverse, MaxProductLength::UNLIMITED);
        assert_eq!(spans(&amplicons), vec![(10, 30)]);
    }

    #[rstest]
    fn test_reverse_site_at_forward_position_cannot_close() {
        let amplicons = calculate_amplicons(
            "chr1",
            &[fwd("AAA", 10)],
            &[rev("CCC", 10)],
            MaxProductLength::UNLIMITED,
        );
        assert!(amplicons.is_empty());
    }

    #[rstest]
    #[case(vec![], vec![rev("CCC", 10)])]
    #[case(vec![fwd("AAA", 7)], vec![])]
    #[case(vec![], vec![])]
    fn test_missing_strand_yields_nothing(
        #[case] forward: Vec<PrimingSite>,
        #[case] reverse: Vec<PrimingSite>,
    ) {
        let amplicons = calculate_amplicons("chr1", &forward, &reverse, MaxProductLength::UNLIMITED);
        assert!(amplicons.is_empty());
    }

    #[rstest]
    fn test_too_long_products_are_counted() {
        let forward = [fwd("AAA", 0), fwd("AAA", 100)];
        let reverse = [rev("CCC", 50), rev("CCC", 1000)];

        let mut count = 0;
        let stats = for_each_amplicon("chr1", &forward, &reverse, MaxProductLength::from_raw(60), |_| {
            count += 1;
            ControlFlow::Continue(())
        });

        assert_eq!(count, 1);
        assert_eq!(stats.emitted, 1);
        assert_eq!(stats.too_long, 1);
    }

    #[rstest]
    fn test_break_stops_the_pass() {
        let forward = [fwd("AAA", 0), fwd("AAA", 20), fwd("AAA", 40)];
        let reverse = [rev("CCC", 10), rev("CCC", 30), rev("CCC", 50)];

        let mut seen = Vec::new();
        for_each_amplicon("chr1", &forward, &reverse, MaxProductLength::UNLIMITED, |a| {
            seen.push(a.start);
            ControlFlow::Break(())
        });
        assert_eq!(seen, vec![0]);
    }

    #[rstest]
    fn test_products_respect_invariants() {
        let forward: Vec<PrimingSite> = (0..200).step_by(7).map(|p| fwd("ACG", p)).collect();
        let reverse: Vec<PrimingSite> = (3..200).step_by(11).map(|p| rev("TTG", p)).collect();
        let limit = MaxProductLength::from_raw(9);

        let amplicons = calculate_amplicons("chr1", &forward, &reverse, limit);
        assert!(!amplicons.is_empty());
        for amplicon in &amplicons {
            assert!(amplicon.end > amplicon.start);
            assert!(amplicon.width() <= 9);
        }
    }
}
