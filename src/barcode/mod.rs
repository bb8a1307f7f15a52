pub mod codec_onehot;
pub mod dropout;
pub mod extract;
pub mod frequency_table;
pub mod merge;

pub use codec_onehot::EncodedBarcode;
pub use codec_onehot::HotEncodeACGT;

pub use dropout::dropout_threshold;
pub use dropout::filter_dropout;

pub use extract::BarcodeExtractor;

pub use frequency_table::Barcode;
pub use frequency_table::FrequencyTable;

pub use merge::merge_nearest_neighbors;
pub use merge::MergeStats;

///////////////////////////////
/// Reasons a barcode cannot be encoded
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BarcodeError {
    #[error("Invalid base '{symbol}' at position {pos}")]
    InvalidSymbol { symbol: char, pos: usize },

    #[error("Barcode of length {len} exceeds the maximum of {max}")]
    TooLong { len: usize, max: usize },
}
