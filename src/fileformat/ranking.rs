use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::barcode::Barcode;
use crate::runtime::Error;

///////////////////////////////
/// One row of the final result
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RankedBarcode {
    pub rank: usize,
    pub barcode: Barcode,
    pub count: u64,
    pub cum_sum: u64,
}

///////////////////////////////
/// Assign ranks and running totals to a list already sorted by count
pub fn rank_barcodes(sorted: Vec<(Barcode, u64)>) -> Vec<RankedBarcode> {
    let mut cum_sum = 0;
    sorted
        .into_iter()
        .enumerate()
        .map(|(rank, (barcode, count))| {
            cum_sum += count;
            RankedBarcode {
                rank,
                barcode,
                count,
                cum_sum,
            }
        })
        .collect()
}

#[derive(Serialize)]
struct TopRow<'a> {
    rank: usize,
    barcode: &'a str,
    count: u64,
}

#[derive(Serialize)]
struct CumulativeRow {
    rank: usize,
    count: u64,
    cum_sum: u64,
}

///////////////////////////////
/// Write the top num_cells barcodes as CSV: rank,barcode,count
pub fn write_top_barcodes<W: Write>(
    writer: W,
    ranked: &[RankedBarcode],
    num_cells: usize,
) -> Result<(), Error> {
    let mut writer = csv::Writer::from_writer(writer);
    for bc in ranked.iter().take(num_cells) {
        writer.serialize(TopRow {
            rank: bc.rank,
            barcode: &bc.barcode,
            count: bc.count,
        })?;
    }
    writer.flush()?;
    Ok(())
}

///////////////////////////////
/// Write the cumulative count curve as TSV: rank, count, cum_sum.
/// Plotted against rank, the expected number of cells should sit near where it flattens
pub fn write_cumulative_counts<W: Write>(writer: W, ranked: &[RankedBarcode]) -> Result<(), Error> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_writer(writer);
    for bc in ranked {
        writer.serialize(CumulativeRow {
            rank: bc.rank,
            count: bc.count,
            cum_sum: bc.cum_sum,
        })?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_top_barcodes_to_path(
    path: &Path,
    ranked: &[RankedBarcode],
    num_cells: usize,
) -> Result<(), Error> {
    let file = std::fs::File::create(path)?;
    write_top_barcodes(std::io::BufWriter::new(file), ranked, num_cells)
}

pub fn write_cumulative_counts_to_path(path: &Path, ranked: &[RankedBarcode]) -> Result<(), Error> {
    let file = std::fs::File::create(path)?;
    write_cumulative_counts(std::io::BufWriter::new(file), ranked)
}
