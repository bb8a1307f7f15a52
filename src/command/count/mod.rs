pub mod command;
pub mod constants;
pub mod core;

pub use command::CountBarcodes;
pub use command::CountCMD;
pub use core::core::BarcodeCounter;
pub use core::core::CountSummary;
pub use core::core::CountedBarcodes;
