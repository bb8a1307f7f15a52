use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use clap::Args;
use log::info;

use super::constants::COUNT_DEFAULT_CONFIG;
use super::core::core::BarcodeCounter;
use super::core::params;
use crate::fileformat::ranking::{
    write_cumulative_counts_to_path, write_top_barcodes, write_top_barcodes_to_path,
};
use crate::fileformat::{open_source, rank_barcodes, verify_input_file};
use crate::runtime::{CountConfig, Error};

/// Commandline option: count barcodes in a sequencing file, merging sequencing errors
#[derive(Args)]
pub struct CountCMD {
    /// JSON file with the run settings
    #[arg(short = 'c', long = "config", value_parser, default_value = COUNT_DEFAULT_CONFIG)]
    pub path_config: PathBuf,

    /// Input FASTQ or other line-based file, optionally compressed. Overrides input_path
    #[arg(short = 'i', value_parser)]
    pub path_in: Option<PathBuf>,

    /// CSV with the top barcodes. Overrides output_csv_path; stdout if neither is set
    #[arg(short = 'o', value_parser)]
    pub path_out: Option<PathBuf>,

    /// TSV with the cumulative count per rank. Overrides output_graph_path
    #[arg(long = "cumsum", value_parser)]
    pub path_cumsum: Option<PathBuf>,

    /// Largest Hamming distance at which a barcode is merged into a more abundant one
    #[arg(long = "hamming-dist", value_parser = clap::value_parser!(u32))]
    pub hamming_dist: Option<u32>,

    /// Expected noise barcodes per 100k reads; rarer barcodes are dropped after each chunk
    #[arg(long = "dropout-per100k", value_parser)]
    pub dropout_per100k: Option<f64>,

    /// Number of records per chunk
    #[arg(long = "chunk-size", value_parser = clap::value_parser!(usize))]
    pub num_seq_per_chunk: Option<usize>,

    /// Number of top barcodes to report, ie expected number of cells
    #[arg(long = "top", value_parser = clap::value_parser!(usize))]
    pub num_cells_seq: Option<usize>,

    /// Stop after this many chunks
    #[arg(long = "max-chunks", value_parser = clap::value_parser!(usize))]
    pub max_chunks: Option<usize>,
}

impl CountCMD {
    /// Run the commandline option
    pub fn try_execute(&mut self) -> Result<()> {
        let config = self.resolve_config()?;

        let path_in = match &self.path_in {
            Some(p) => p.clone(),
            None if !config.input_path.is_empty() => PathBuf::from(&config.input_path),
            None => anyhow::bail!("No input file given, neither with -i nor as input_path in the config"),
        };
        verify_input_file(&path_in)?;

        let params_io = params::IO {
            path_in,
            path_out_csv: self
                .path_out
                .clone()
                .or_else(|| non_empty_path(&config.output_csv_path)),
            path_out_cumsum: self
                .path_cumsum
                .clone()
                .or_else(|| non_empty_path(&config.output_graph_path)),
        };
        let params_schema = params::Schema::from_config(&config);
        let mut params_runtime = params::Runtime::from_config(&config);
        params_runtime.max_chunks = self.max_chunks;

        CountBarcodes::run(&params_io, &params_schema, &params_runtime)?;

        info!("Count has finished successfully");
        Ok(())
    }

    ///////////////////////////////
    /// Load the config file and apply commandline overrides
    fn resolve_config(&self) -> Result<CountConfig> {
        let mut config = CountConfig::load(&self.path_config)?;
        if let Some(v) = self.hamming_dist {
            config.hamming_dist = v;
        }
        if let Some(v) = self.dropout_per100k {
            config.dropout_count_per100k = v;
        }
        if let Some(v) = self.num_seq_per_chunk {
            config.num_seq_per_chunk = v;
        }
        if let Some(v) = self.num_cells_seq {
            config.num_cells_seq = v;
        }
        config.validate()?;
        Ok(config)
    }
}

fn non_empty_path(s: &str) -> Option<PathBuf> {
    if s.is_empty() {
        None
    } else {
        Some(PathBuf::from(s))
    }
}

pub struct CountBarcodes {}

impl CountBarcodes {
    /// Run the algorithm
    pub fn run(
        params_io: &params::IO,
        params_schema: &params::Schema,
        params_runtime: &params::Runtime,
    ) -> Result<(), Error> {
        let start_time = Instant::now();

        let counter = BarcodeCounter::new(params_schema, params_runtime)?;
        let source = open_source(&params_io.path_in)?;
        let result = counter.run(source)?;

        let summary = &result.summary;
        info!(
            "Read {} records in {} chunks: {} without anchor, {} with invalid bases",
            summary.num_records, summary.num_chunks, summary.num_no_anchor, summary.num_rejected
        );
        info!(
            "{} barcodes merged into neighbours, {} dropped as noise",
            summary.num_merged, summary.num_dropped
        );

        if result.is_empty() {
            return Err(Error::EmptyResult);
        }

        let ranked = rank_barcodes(result.barcodes);
        let num_cells = params_runtime.num_cells_seq;

        info!("Top unique barcode candidates:");
        for bc in ranked.iter().take(num_cells) {
            info!("{:>6} {} {}", bc.rank, bc.barcode, bc.count);
        }
        if let Some(at_cells) = ranked.get(num_cells.saturating_sub(1)) {
            info!(
                "Top {} barcodes hold {} of {} counted reads",
                num_cells,
                at_cells.cum_sum,
                ranked.last().map(|bc| bc.cum_sum).unwrap_or(0)
            );
        }
        info!(
            "Input processed in {:.2} secs",
            start_time.elapsed().as_secs_f64()
        );

        match &params_io.path_out_csv {
            Some(path) => {
                write_top_barcodes_to_path(path, &ranked, num_cells)?;
                info!("Results saved to: {}", path.display());
            }
            None => write_top_barcodes(std::io::stdout().lock(), &ranked, num_cells)?,
        }

        if let Some(path) = &params_io.path_out_cumsum {
            write_cumulative_counts_to_path(path, &ranked)?;
            info!("Cumulative counts saved to: {}", path.display());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{CommandFactory, Parser};

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        count: CountCMD,
    }

    #[test]
    fn help_describes_every_option() {
        let help = TestCli::command().render_help().to_string();
        for text in [
            "JSON file with the run settings",
            "Input FASTQ",
            "CSV with the top barcodes",
            "TSV with the cumulative count",
            "Largest Hamming distance",
            "Expected noise barcodes",
            "Number of records per chunk",
            "Number of top barcodes",
            "Stop after this many chunks",
        ] {
            assert!(help.contains(text), "missing '{}' in:\n{}", text, help);
        }
    }

    #[test]
    fn parses_overrides() {
        let cli = TestCli::try_parse_from([
            "bcfreq",
            "-c",
            "run.json",
            "--hamming-dist",
            "2",
            "--chunk-size",
            "5000",
            "--top",
            "50",
        ])
        .unwrap();
        assert_eq!(cli.count.path_config, PathBuf::from("run.json"));
        assert_eq!(cli.count.hamming_dist, Some(2));
        assert_eq!(cli.count.num_seq_per_chunk, Some(5000));
        assert_eq!(cli.count.num_cells_seq, Some(50));
        assert_eq!(cli.count.path_in, None);
    }
}
