use crate::runtime::CountConfig;

pub struct IO {
    pub path_in: std::path::PathBuf,
    pub path_out_csv: Option<std::path::PathBuf>,
    pub path_out_cumsum: Option<std::path::PathBuf>,
}

pub struct Schema {
    pub fields: Vec<String>,
    pub fields_to_delete: Vec<String>,
    pub barcode_field: String,
}

pub struct Runtime {
    pub num_seq_per_chunk: usize,
    pub barcode_len: usize,
    pub separator_len: usize,
    pub anchor_seq: String,
    pub hamming_dist: u32,
    pub dropout_count_per100k: f64,
    pub num_cells_seq: usize,
    /// Stop after this many chunks
    pub max_chunks: Option<usize>,
}

impl Schema {
    pub fn from_config(config: &CountConfig) -> Schema {
        Schema {
            fields: config.fields.clone(),
            fields_to_delete: config.fields_to_delete.clone(),
            barcode_field: config.barcode_field.clone(),
        }
    }
}

impl Runtime {
    pub fn from_config(config: &CountConfig) -> Runtime {
        Runtime {
            num_seq_per_chunk: config.num_seq_per_chunk,
            barcode_len: config.barcode_len,
            separator_len: config.separator_len,
            anchor_seq: config.anchor_seq.clone(),
            hamming_dist: config.hamming_dist,
            dropout_count_per100k: config.dropout_count_per100k,
            num_cells_seq: config.num_cells_seq,
            max_chunks: None,
        }
    }
}
