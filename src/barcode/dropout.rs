use super::frequency_table::FrequencyTable;

///////////////////////////////
/// Per-chunk dropout threshold: the expected number of noise barcodes per 100k reads,
/// scaled to the chunk size and rounded down
pub fn dropout_threshold(dropout_count_per100k: f64, num_seq_per_chunk: usize) -> u64 {
    let threshold = dropout_count_per100k * num_seq_per_chunk as f64 / 100_000.0;
    if threshold.is_finite() && threshold > 0.0 {
        threshold.floor() as u64
    } else {
        0
    }
}

///////////////////////////////
/// Remove every barcode seen at most threshold times. Returns the number removed.
///
/// This is lossy: a rare but real barcode that falls below the threshold after any
/// chunk is gone for good
pub fn filter_dropout(table: &mut FrequencyTable, threshold: u64) -> usize {
    let before = table.len();
    table.retain(|_, cnt| *cnt > threshold);
    before - table.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> FrequencyTable {
        [
            ("AAAA".to_string(), 10),
            ("CCCC".to_string(), 3),
            ("GGGG".to_string(), 2),
            ("TTTT".to_string(), 1),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn threshold_scales_with_chunk_size() {
        assert_eq!(dropout_threshold(0.0, 1_000_000), 0);
        assert_eq!(dropout_threshold(5.0, 100_000), 5);
        assert_eq!(dropout_threshold(5.0, 1_000_000), 50);
        assert_eq!(dropout_threshold(5.0, 10_000), 0);
        assert_eq!(dropout_threshold(2.5, 300_000), 7);
    }

    #[test]
    fn removes_counts_at_or_below_threshold() {
        let mut t = table();
        assert_eq!(filter_dropout(&mut t, 2), 2);
        assert_eq!(t.get("AAAA"), Some(10));
        assert_eq!(t.get("CCCC"), Some(3));
        assert_eq!(t.get("GGGG"), None);
        assert_eq!(t.get("TTTT"), None);
    }

    #[test]
    fn zero_threshold_keeps_everything() {
        let mut t = table();
        assert_eq!(filter_dropout(&mut t, 0), 0);
        assert_eq!(t, table());
    }

    #[test]
    fn higher_threshold_keeps_a_subset() {
        for t1 in 0..12 {
            for t2 in t1..12 {
                let mut low = table();
                let mut high = table();
                filter_dropout(&mut low, t1);
                filter_dropout(&mut high, t2);
                assert!(high.len() <= low.len());
                for (bc, cnt) in high.iter() {
                    assert_eq!(low.get(bc), Some(*cnt));
                }
            }
        }
    }
}
