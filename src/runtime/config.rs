use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;

use crate::barcode::codec_onehot::MAX_BARCODE_LEN;
use crate::runtime::Error;

pub const DEFAULT_NUM_SEQ_PER_CHUNK: usize = 100_000;
pub const DEFAULT_HAMMING_DIST: u32 = 1;
pub const DEFAULT_NUM_CELLS_SEQ: usize = 1000;

///////////////////////////////
/// Settings for one barcode counting run, as stored in a JSON config file.
///
/// Keys written by older versions of the tool (file dialog filters, temp file
/// handling, graph display) are accepted and ignored.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct CountConfig {
    pub input_path: String,
    pub num_seq_per_chunk: usize,
    pub fields: Vec<String>,
    pub fields_to_delete: Vec<String>,
    pub barcode_field: String,
    pub barcode_len: usize,
    pub separator_len: usize,
    pub anchor_seq: String,
    pub hamming_dist: u32,
    #[serde(rename = "dropout_count_per100K", alias = "dropout_count_per100k")]
    pub dropout_count_per100k: f64,
    pub output_csv_path: String,
    pub output_graph_path: String,
    pub num_cells_seq: usize,
}

impl Default for CountConfig {
    fn default() -> Self {
        CountConfig {
            input_path: String::new(),
            num_seq_per_chunk: DEFAULT_NUM_SEQ_PER_CHUNK,
            fields: vec![
                "name".to_string(),
                "seq".to_string(),
                "plus".to_string(),
                "qual".to_string(),
            ],
            fields_to_delete: vec!["name".to_string(), "plus".to_string(), "qual".to_string()],
            barcode_field: "seq".to_string(),
            barcode_len: 0,
            separator_len: 0,
            anchor_seq: String::new(),
            hamming_dist: DEFAULT_HAMMING_DIST,
            dropout_count_per100k: 0.0,
            output_csv_path: String::new(),
            output_graph_path: String::new(),
            num_cells_seq: DEFAULT_NUM_CELLS_SEQ,
        }
    }
}

impl CountConfig {
    ///////////////////////////////
    /// Load and validate a config file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<CountConfig, Error> {
        let config = CountConfig::load(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a config file without validating it, so that settings can still be
    /// overridden before the check
    pub fn load<P: AsRef<Path>>(path: P) -> Result<CountConfig, Error> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::file_not_found(path));
        }
        let reader = BufReader::new(File::open(path)?);
        serde_json::from_reader(reader).map_err(|e| {
            Error::parse_error(format!("config file {}", path.display()), Some(e.to_string()))
        })
    }

    pub fn from_json_str(s: &str) -> Result<CountConfig, Error> {
        let config: CountConfig = serde_json::from_str(s)
            .map_err(|e| Error::parse_error("config", Some(e.to_string())))?;
        config.validate()?;
        Ok(config)
    }

    pub fn num_fields(&self) -> usize {
        self.fields.len()
    }

    ///////////////////////////////
    /// Check that the settings describe a run that can be carried out
    pub fn validate(&self) -> Result<(), Error> {
        if self.fields.is_empty() {
            return Err(Error::invalid_config("at least one record field is needed"));
        }
        if !self.fields.contains(&self.barcode_field) {
            return Err(Error::invalid_config(format!(
                "barcode field '{}' is not one of the record fields {:?}",
                self.barcode_field, self.fields
            )));
        }
        if self.fields_to_delete.contains(&self.barcode_field) {
            return Err(Error::invalid_config(format!(
                "barcode field '{}' cannot be deleted",
                self.barcode_field
            )));
        }
        if self.barcode_len == 0 || self.barcode_len > MAX_BARCODE_LEN {
            return Err(Error::invalid_config(format!(
                "barcode_len must be between 1 and {}, got {}",
                MAX_BARCODE_LEN, self.barcode_len
            )));
        }
        if self.anchor_seq.is_empty() {
            return Err(Error::invalid_config("anchor_seq must not be empty"));
        }
        if let Some(c) = self
            .anchor_seq
            .chars()
            .find(|c| !matches!(c, 'A' | 'C' | 'G' | 'T'))
        {
            return Err(Error::invalid_config(format!(
                "anchor_seq may only contain A, C, G and T, found '{}'",
                c
            )));
        }
        if self.num_seq_per_chunk == 0 {
            return Err(Error::invalid_config("num_seq_per_chunk must be positive"));
        }
        if !self.dropout_count_per100k.is_finite() || self.dropout_count_per100k < 0.0 {
            return Err(Error::invalid_config(format!(
                "dropout_count_per100K must be a non-negative number, got {}",
                self.dropout_count_per100k
            )));
        }
        Ok(())
    }
}
