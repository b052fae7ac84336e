use launchpad_core::TokenInfo;

/// How many records a merge saw and why the rejected ones were dropped
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FilterStats {
    pub total: usize,
    /// `created_at <= watermark`
    pub stale: usize,
    /// `liquidity < min_liquidity` (checked after staleness)
    pub illiquid: usize,
}

impl FilterStats {
    pub fn kept(&self) -> usize {
        self.total - self.stale - self.illiquid
    }
}

/// Concatenates every source batch, keeps records strictly newer than the
/// watermark with at least `min_liquidity`, newest first. Addresses are not
/// deduplicated here.
pub fn merge_filter_sort(
    batches: Vec<Vec<TokenInfo>>,
    watermark: i64,
    min_liquidity: f64,
) -> (Vec<TokenInfo>, FilterStats) {
    let mut stats = FilterStats::default();
    let mut kept: Vec<TokenInfo> = Vec::new();

    for token in batches.into_iter().flatten() {
        stats.total += 1;
        if token.created_at <= watermark {
            stats.stale += 1;
            continue;
        }
        // NaN liquidity never passes the comparison
        if !(token.liquidity >= min_liquidity) {
            stats.illiquid += 1;
            continue;
        }
        kept.push(token);
    }

    kept.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    (kept, stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::token;
    use launchpad_core::TokenSource;

    #[test]
    fn test_liquidity_floor_and_watermark() {
        let a = vec![token("X", 1_000, 5_000.0, TokenSource::DexScreener)];
        let b = vec![token("Y", 2_000, 50.0, TokenSource::PumpFun)];

        let (kept, stats) = merge_filter_sort(vec![a, b], 500, 1_000.0);

        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].address, "X");
        assert_eq!(kept[0].created_at, 1_000);
        assert_eq!(stats, FilterStats { total: 2, stale: 0, illiquid: 1 });
    }

    #[test]
    fn test_watermark_boundary_is_exclusive() {
        let batch = vec![
            token("equal", 500, 5_000.0, TokenSource::DexScreener),
            token("after", 501, 5_000.0, TokenSource::DexScreener),
        ];
        let (kept, stats) = merge_filter_sort(vec![batch], 500, 0.0);
        assert_eq!(kept.iter().map(|t| t.address.as_str()).collect::<Vec<_>>(), vec!["after"]);
        assert_eq!(stats.stale, 1);
    }

    #[test]
    fn test_liquidity_boundary_is_inclusive() {
        let batch = vec![token("exact", 900, 1_000.0, TokenSource::PumpFun)];
        let (kept, _) = merge_filter_sort(vec![batch], 0, 1_000.0);
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn test_sorted_newest_first_across_sources() {
        let a = vec![
            token("a1", 100, 1.0, TokenSource::DexScreener),
            token("a2", 300, 1.0, TokenSource::DexScreener),
        ];
        let b = vec![token("b1", 200, 1.0, TokenSource::PumpFun)];
        let (kept, stats) = merge_filter_sort(vec![a, b], 0, 0.0);
        let order: Vec<i64> = kept.iter().map(|t| t.created_at).collect();
        assert_eq!(order, vec![300, 200, 100]);
        assert_eq!(stats.kept(), 3);
    }

    #[test]
    fn test_duplicates_survive_merge() {
        let a = vec![token("same", 100, 1.0, TokenSource::DexScreener)];
        let b = vec![token("same", 100, 1.0, TokenSource::PumpFun)];
        let (kept, _) = merge_filter_sort(vec![a, b], 0, 0.0);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_nan_liquidity_is_rejected() {
        let batch = vec![token("nan", 100, f64::NAN, TokenSource::PumpFun)];
        let (kept, stats) = merge_filter_sort(vec![batch], 0, 0.0);
        assert!(kept.is_empty());
        assert_eq!(stats.illiquid, 1);
    }
}
