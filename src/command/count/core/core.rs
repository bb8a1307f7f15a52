use std::io::BufRead;

use itertools::Itertools;
use log::{debug, info};

use super::params;
use crate::barcode::{
    dropout_threshold, filter_dropout, merge_nearest_neighbors, Barcode, BarcodeExtractor,
    FrequencyTable, HotEncodeACGT,
};
use crate::fileformat::{Chunk, ChunkReader, RecordSchema};
use crate::runtime::Error;

///////////////////////////////
/// Counters for one run
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CountSummary {
    pub num_chunks: usize,
    pub num_records: usize,
    /// Records where the anchor was not found
    pub num_no_anchor: usize,
    /// Records whose barcode had a base other than ACGT
    pub num_rejected: usize,
    pub num_merged: usize,
    pub num_dropped: usize,
}

///////////////////////////////
/// Final result of a run: barcodes by count, highest first
#[derive(Clone, Debug, Default)]
pub struct CountedBarcodes {
    pub barcodes: Vec<(Barcode, u64)>,
    pub summary: CountSummary,
}

impl CountedBarcodes {
    pub fn is_empty(&self) -> bool {
        self.barcodes.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.barcodes.iter().map(|(_, cnt)| cnt).sum()
    }
}

///////////////////////////////
/// Streams records in chunks, keeping a running barcode count that is error-corrected
/// and pruned after every chunk
pub struct BarcodeCounter {
    extractor: BarcodeExtractor,
    schema: RecordSchema,
    barcode_field_index: usize,
    num_seq_per_chunk: usize,
    hamming_dist: u32,
    dropout_threshold: u64,
    max_chunks: Option<usize>,
}

impl BarcodeCounter {
    pub fn new(
        params_schema: &params::Schema,
        params_runtime: &params::Runtime,
    ) -> Result<BarcodeCounter, Error> {
        let schema = RecordSchema::new(&params_schema.fields, &params_schema.fields_to_delete);
        let barcode_field_index = schema
            .kept_index(&params_schema.barcode_field)
            .ok_or_else(|| {
                Error::invalid_config(format!(
                    "barcode field '{}' is not among the kept fields",
                    params_schema.barcode_field
                ))
            })?;
        if params_runtime.num_seq_per_chunk == 0 {
            return Err(Error::invalid_config("num_seq_per_chunk must be positive"));
        }

        let extractor = BarcodeExtractor::new(
            params_runtime.barcode_len,
            params_runtime.separator_len,
            &params_runtime.anchor_seq,
        )?;
        let dropout_threshold = dropout_threshold(
            params_runtime.dropout_count_per100k,
            params_runtime.num_seq_per_chunk,
        );

        debug!("Keeping fields: {}", schema.kept_names().iter().join(", "));
        debug!("Barcode pattern: {}", extractor.as_str());
        debug!("Dropout threshold per chunk: {}", dropout_threshold);

        Ok(BarcodeCounter {
            extractor,
            schema,
            barcode_field_index,
            num_seq_per_chunk: params_runtime.num_seq_per_chunk,
            hamming_dist: params_runtime.hamming_dist,
            dropout_threshold,
            max_chunks: params_runtime.max_chunks,
        })
    }

    pub fn dropout_threshold(&self) -> u64 {
        self.dropout_threshold
    }

    ///////////////////////////////
    /// Run over a whole source. A chunk that does not split into whole records aborts
    /// the run; nothing counted so far is returned
    pub fn run<R: BufRead>(&self, source: R) -> Result<CountedBarcodes, Error> {
        let mut reader = ChunkReader::new(source, self.schema.clone(), self.num_seq_per_chunk);
        let mut total = FrequencyTable::new();
        let mut summary = CountSummary::default();

        while let Some(chunk) = reader.read_chunk()? {
            info!("Processing chunk {}", chunk.index);
            self.process_chunk(&chunk, &mut total, &mut summary);

            if let Some(max_chunks) = self.max_chunks {
                if summary.num_chunks >= max_chunks {
                    info!("Stopping after {} chunks", max_chunks);
                    break;
                }
            }
        }

        Ok(CountedBarcodes {
            barcodes: total.into_sorted(),
            summary,
        })
    }

    ///////////////////////////////
    /// Extract, count, fold into the running total, then merge and prune it
    pub fn process_chunk(&self, chunk: &Chunk, total: &mut FrequencyTable, summary: &mut CountSummary) {
        let mut chunk_counts = FrequencyTable::new();
        let mut num_no_anchor = 0;
        let mut num_rejected = 0;

        for seq in chunk.field(self.barcode_field_index) {
            match self.extractor.extract(seq) {
                Some(barcode) => {
                    if let Err(e) = HotEncodeACGT::encode(barcode.as_bytes()) {
                        debug!("Rejected barcode {}: {}", barcode, e);
                        num_rejected += 1;
                    } else {
                        chunk_counts.increment(barcode);
                    }
                }
                None => num_no_anchor += 1,
            }
        }

        total.absorb(chunk_counts);
        let merge_stats = merge_nearest_neighbors(total, self.hamming_dist);
        let num_dropped = filter_dropout(total, self.dropout_threshold);

        debug!(
            "Chunk {}: {} records, {} without anchor, {} rejected, {} merged, {} dropped, {} barcodes kept",
            chunk.index,
            chunk.len(),
            num_no_anchor,
            num_rejected,
            merge_stats.num_merged,
            num_dropped,
            total.len()
        );

        summary.num_chunks += 1;
        summary.num_records += chunk.len();
        summary.num_no_anchor += num_no_anchor;
        summary.num_rejected += num_rejected;
        summary.num_merged += merge_stats.num_merged;
        summary.num_dropped += num_dropped;
    }
}
