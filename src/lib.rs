pub mod barcode;
pub mod command;
pub mod fileformat;
pub mod runtime;

pub use barcode::FrequencyTable;
pub use command::count::BarcodeCounter;
pub use runtime::CountConfig;
pub use runtime::Error;
