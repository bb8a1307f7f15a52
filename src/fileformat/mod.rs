pub mod chunk;
pub mod ranking;
mod source;

pub use chunk::Chunk;
pub use chunk::ChunkReader;
pub use chunk::RecordSchema;

pub use ranking::rank_barcodes;
pub use ranking::RankedBarcode;

pub use source::open_source;
pub use source::verify_input_file;
