use rustc_hash::FxHashMap;

/// A barcode as extracted from a read
pub type Barcode = String;

///////////////////////////////
/// Running count of each distinct barcode
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: FxHashMap<Barcode, u64>,
}

impl FrequencyTable {
    pub fn new() -> FrequencyTable {
        FrequencyTable {
            counts: FxHashMap::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn get(&self, barcode: &str) -> Option<u64> {
        self.counts.get(barcode).copied()
    }

    /// Add one occurrence
    pub fn increment(&mut self, barcode: &str) {
        self.add_count(barcode, 1);
    }

    pub fn add_count(&mut self, barcode: &str, count: u64) {
        if let Some(c) = self.counts.get_mut(barcode) {
            *c += count;
        } else {
            self.counts.insert(barcode.to_string(), count);
        }
    }

    ///////////////////////////////
    /// Fold another table into this one, summing counts of shared barcodes
    pub fn absorb(&mut self, other: FrequencyTable) {
        for (barcode, count) in other.counts {
            *self.counts.entry(barcode).or_insert(0) += count;
        }
    }

    pub fn set_count(&mut self, barcode: &str, count: u64) {
        if let Some(c) = self.counts.get_mut(barcode) {
            *c = count;
        } else {
            self.counts.insert(barcode.to_string(), count);
        }
    }

    pub fn remove(&mut self, barcode: &str) -> Option<u64> {
        self.counts.remove(barcode)
    }

    /// Sum of all counts
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn retain<F>(&mut self, f: F)
    where
        F: FnMut(&Barcode, &mut u64) -> bool,
    {
        self.counts.retain(f);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Barcode, &u64)> {
        self.counts.iter()
    }

    ///////////////////////////////
    /// Entries by count, highest first. Ties are ordered by barcode so that the
    /// merge pass is deterministic
    pub fn sorted(&self) -> Vec<(Barcode, u64)> {
        let mut list: Vec<(Barcode, u64)> = self
            .counts
            .iter()
            .map(|(bc, &cnt)| (bc.clone(), cnt))
            .collect();
        sort_by_count_desc(&mut list);
        list
    }

    /// Take the entries out, sorted as in sorted()
    pub fn into_sorted(self) -> Vec<(Barcode, u64)> {
        let mut list: Vec<(Barcode, u64)> = self.counts.into_iter().collect();
        sort_by_count_desc(&mut list);
        list
    }
}

impl FromIterator<(Barcode, u64)> for FrequencyTable {
    fn from_iter<I: IntoIterator<Item = (Barcode, u64)>>(iter: I) -> Self {
        let mut table = FrequencyTable::new();
        for (barcode, count) in iter {
            table.add_count(&barcode, count);
        }
        table
    }
}

pub fn sort_by_count_desc(list: &mut [(Barcode, u64)]) {
    list.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
}
