use log::debug;

use super::codec_onehot::{EncodedBarcode, HotEncodeACGT};
use super::frequency_table::{Barcode, FrequencyTable};

struct OneBarcode {
    barcode: Barcode,
    encoded: EncodedBarcode,
    cnt: u64,
    merged: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Distinct barcodes going into the pass
    pub num_examined: usize,
    /// Barcodes folded into a more abundant neighbour
    pub num_merged: usize,
    /// Barcodes skipped because they could not be encoded
    pub num_unencodable: usize,
}

///////////////////////////////
/// Bytes that a dense N x N matrix of encoded XORs would take for n barcodes.
///
/// The merge pass computes distances on demand instead, but its running time is
/// still quadratic in n; keeping n bounded is what the dropout filter is for
pub fn dense_grid_bytes(n: usize) -> u128 {
    (n as u128) * (n as u128) * std::mem::size_of::<EncodedBarcode>() as u128
}

///////////////////////////////
/// Merge barcodes into more abundant neighbours within max_distance.
///
/// Barcodes are ranked by count, highest first. Starting from the least abundant,
/// each barcode is compared to the ranked list from the top down, and its count is
/// given to the first barcode within range. This is the first neighbour found, not
/// necessarily the closest. Counts are conserved.
pub fn merge_nearest_neighbors(table: &mut FrequencyTable, max_distance: u32) -> MergeStats {
    let mut stats = MergeStats {
        num_examined: table.len(),
        ..Default::default()
    };
    if max_distance == 0 || table.len() < 2 {
        return stats;
    }

    debug!(
        "Nearest neighbor search over {} barcodes (dense grid would need {} MB)",
        table.len(),
        dense_grid_bytes(table.len()) / 1_000_000
    );

    //Rank by count and encode. Table keys were extracted by the same rule, so
    //encoding only fails if the table was filled by hand
    let mut list_bc: Vec<OneBarcode> = Vec::with_capacity(table.len());
    for (barcode, cnt) in table.sorted() {
        match HotEncodeACGT::encode(barcode.as_bytes()) {
            Ok(encoded) => list_bc.push(OneBarcode {
                barcode,
                encoded,
                cnt,
                merged: false,
            }),
            Err(e) => {
                debug!("Not merging barcode {}: {}", barcode, e);
                stats.num_unencodable += 1;
            }
        }
    }

    //Least abundant first. Everything above i is still alive: only entries
    //after the current one have been merged away
    for i in (1..list_bc.len()).rev() {
        let this_bc = list_bc[i].encoded;

        'find_parent: for j in 0..i {
            let dist = HotEncodeACGT::hamming_distance(this_bc, list_bc[j].encoded);
            if dist > 0 && dist <= max_distance {
                list_bc[j].cnt += list_bc[i].cnt;
                list_bc[i].merged = true;
                stats.num_merged += 1;
                break 'find_parent;
            }
        }
    }

    debug!("Number of similar barcode pairs combined: {}", stats.num_merged);

    if stats.num_merged > 0 {
        for one in list_bc {
            if one.merged {
                table.remove(&one.barcode);
            } else {
                table.set_count(&one.barcode, one.cnt);
            }
        }
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(entries: &[(&str, u64)]) -> FrequencyTable {
        entries
            .iter()
            .map(|(bc, cnt)| (bc.to_string(), *cnt))
            .collect()
    }

    fn as_vec(t: &FrequencyTable) -> Vec<(String, u64)> {
        t.sorted()
    }

    #[test]
    fn single_mismatch_goes_to_abundant_barcode() {
        let mut t = table(&[("AAAA", 10), ("AAAT", 2), ("TTTT", 5)]);
        let stats = merge_nearest_neighbors(&mut t, 1);
        assert_eq!(stats.num_merged, 1);
        assert_eq!(
            as_vec(&t),
            vec![("AAAA".to_string(), 12), ("TTTT".to_string(), 5)]
        );
    }

    #[test]
    fn zero_distance_is_identity() {
        let mut t = table(&[("AAAA", 10), ("AAAT", 2), ("AATT", 1)]);
        let before = t.clone();
        let stats = merge_nearest_neighbors(&mut t, 0);
        assert_eq!(stats.num_merged, 0);
        assert_eq!(t, before);
    }

    #[test]
    fn empty_and_single_tables() {
        let mut t = FrequencyTable::new();
        assert_eq!(merge_nearest_neighbors(&mut t, 2).num_merged, 0);
        assert!(t.is_empty());

        let mut t = table(&[("ACGT", 4)]);
        merge_nearest_neighbors(&mut t, 2);
        assert_eq!(as_vec(&t), vec![("ACGT".to_string(), 4)]);
    }

    #[test]
    fn counts_are_conserved() {
        let mut t = table(&[
            ("ACGTAC", 50),
            ("ACGTAA", 7),
            ("ACGTTT", 3),
            ("TTTTTT", 40),
            ("TTTTTA", 1),
            ("GGGGGG", 2),
            ("CCCCCC", 2),
            ("CCCCCA", 2),
        ]);
        let before = t.total();
        for max_distance in 0..4 {
            let mut t2 = t.clone();
            merge_nearest_neighbors(&mut t2, max_distance);
            assert_eq!(t2.total(), before, "max_distance {}", max_distance);
        }
        merge_nearest_neighbors(&mut t, 2);
        assert_eq!(t.total(), before);
    }

    #[test]
    fn first_match_from_the_top_wins_over_closest() {
        //AACA is 1 away from both AAAA and AACC; AAAA ranks first
        let mut t = table(&[("AAAA", 100), ("AACC", 50), ("AACA", 1)]);
        merge_nearest_neighbors(&mut t, 1);
        assert_eq!(t.get("AAAA"), Some(101));
        assert_eq!(t.get("AACC"), Some(50));

        //AATT is 2 away from AAAA but only 1 away from ATTT. It still goes to AAAA
        let mut t = table(&[("AAAA", 100), ("ATTT", 50), ("AATT", 1)]);
        merge_nearest_neighbors(&mut t, 2);
        assert_eq!(t.get("AAAA"), Some(101));
        assert_eq!(t.get("ATTT"), Some(50));
        assert_eq!(t.get("AATT"), None);
    }

    #[test]
    fn counts_flow_up_a_chain() {
        //Processed from the bottom: AATT joins AAAT first, then AAAT (now 5)
        //joins AAAA
        let mut t = table(&[("AAAA", 10), ("AAAT", 3), ("AATT", 2)]);
        merge_nearest_neighbors(&mut t, 1);
        assert_eq!(as_vec(&t), vec![("AAAA".to_string(), 15)]);
    }

    #[test]
    fn converged_table_is_stable() {
        let mut t = table(&[
            ("ACGTAC", 50),
            ("ACGTAA", 7),
            ("TTTTTT", 40),
            ("TTTTTA", 1),
            ("GGGGGG", 2),
        ]);
        merge_nearest_neighbors(&mut t, 1);
        let once = t.clone();
        let stats = merge_nearest_neighbors(&mut t, 1);
        assert_eq!(stats.num_merged, 0);
        assert_eq!(t, once);
    }

    #[test]
    fn ties_merge_into_smaller_barcode() {
        let mut t = table(&[("AAAT", 5), ("AAAA", 5)]);
        merge_nearest_neighbors(&mut t, 1);
        assert_eq!(as_vec(&t), vec![("AAAA".to_string(), 10)]);
    }

    #[test]
    fn unencodable_entries_are_left_alone() {
        let mut t = table(&[("AAAA", 5), ("AANA", 1), ("AAAT", 1)]);
        let stats = merge_nearest_neighbors(&mut t, 1);
        assert_eq!(stats.num_unencodable, 1);
        assert_eq!(t.get("AAAA"), Some(6));
        assert_eq!(t.get("AANA"), Some(1));
    }

    #[test]
    fn dense_grid_size() {
        assert_eq!(dense_grid_bytes(0), 0);
        assert_eq!(dense_grid_bytes(1000), 16_000_000);
    }
}
