use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{debug, warn};

use crate::runtime::Error;

/// Bytes niffler needs to detect a compression format
const NIFFLER_MIN_LEN: u64 = 5;

fn has_gz_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("gz"))
        .unwrap_or(false)
}

///////////////////////////////
/// Check that the input file exists and can be opened
pub fn verify_input_file(path_in: &Path) -> Result<(), Error> {
    if !path_in.is_file() {
        return Err(Error::file_not_found(path_in));
    }
    let file = File::open(path_in)?;
    if file.metadata()?.len() == 0 {
        warn!("Input file {} is empty", path_in.display());
    }
    Ok(())
}

///////////////////////////////
/// Open a sequence file for reading. Compressed files (gzip, bzip2, xz) are detected
/// from their magic bytes and decompressed on the fly. A file named .gz without gzip
/// magic bytes is rejected as corrupted
pub fn open_source(path_in: &Path) -> Result<Box<dyn BufRead>, Error> {
    let opened_handle = File::open(path_in)?;
    //Too short for niffler to sniff a format; cannot hold a compressed stream either
    if opened_handle.metadata()?.len() < NIFFLER_MIN_LEN {
        if has_gz_extension(path_in) {
            return Err(Error::file_not_valid(path_in, Some("corrupted .gz file")));
        }
        return Ok(Box::new(BufReader::new(opened_handle)));
    }
    let (reader, compression) = niffler::get_reader(Box::new(opened_handle))
        .map_err(|e| Error::file_not_valid(path_in, Some(e.to_string())))?;

    if matches!(compression, niffler::compression::Format::No) && has_gz_extension(path_in) {
        return Err(Error::file_not_valid(path_in, Some("corrupted .gz file")));
    }

    debug!(
        "Opened file {} with compression {:?}",
        path_in.display(),
        compression
    );
    Ok(Box::new(BufReader::new(reader)))
}
