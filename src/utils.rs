//! Utility functions for working with files.

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

use flate2::read::MultiGzDecoder;

//-----------------------------------------------------------------------------

const SIZE_UNITS: [(f64, &str); 6] = [
    (1.0, "B"),
    (1024.0, "KiB"),
    (1024.0 * 1024.0, "MiB"),
    (1024.0 * 1024.0 * 1024.0, "GiB"),
    (1024.0 * 1024.0 * 1024.0 * 1024.0, "TiB"),
    (1024.0 * 1024.0 * 1024.0 * 1024.0 * 1024.0, "PiB"),
];

/// Returns a human-readable representation of the given number of bytes.
pub fn human_readable_size(bytes: usize) -> String {
    let mut unit = 0;
    let value = bytes as f64;
    while unit + 1 < SIZE_UNITS.len() && value >= SIZE_UNITS[unit + 1].0 {
        unit += 1;
    }
    format!("{:.3} {}", value / SIZE_UNITS[unit].0, SIZE_UNITS[unit].1)
}

/// Returns a human-readable size of the file.
pub fn file_size<P: AsRef<Path>>(filename: P) -> Option<String> {
    let metadata = fs::metadata(filename).ok()?;
    Some(human_readable_size(metadata.len() as usize))
}

/// Returns `true` if the file exists.
pub fn file_exists<P: AsRef<Path>>(filename: P) -> bool {
    fs::metadata(filename).is_ok()
}

/// Returns `true` if the file appears to be gzip-compressed.
pub fn is_gzipped<P: AsRef<Path>>(filename: P) -> bool {
    let file = File::open(filename).ok();
    if file.is_none() {
        return false;
    }
    let mut reader = BufReader::new(file.unwrap());
    let mut magic = [0; 2];
    let len = reader.read(&mut magic).ok();
    len == Some(2) && magic == [0x1F, 0x8B]
}

/// Returns a buffered reader for the file, which may be gzip-compressed.
pub fn open_file<P: AsRef<Path>>(filename: P) -> io::Result<Box<dyn BufRead>> {
    let file = File::open(&filename)?;
    let inner = BufReader::new(file);
    if is_gzipped(&filename) {
        let inner = MultiGzDecoder::new(inner);
        Ok(Box::new(BufReader::new(inner)))
    } else {
        Ok(Box::new(inner))
    }
}

//-----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    use flate2::write::GzEncoder;
    use flate2::Compression;
    use simple_sds::serialize;
    use std::io::Write;

    #[test]
    fn gzip_detection() {
        let filename = serialize::temp_file_name("is-gzipped");
        fs::write(&filename, b"plain text").unwrap();
        assert!(!is_gzipped(&filename), "Plain file detected as gzipped");

        let file = File::create(&filename).unwrap();
        let mut encoder = GzEncoder::new(file, Compression::default());
        encoder.write_all(b"compressed text").unwrap();
        encoder.finish().unwrap();
        assert!(is_gzipped(&filename), "Gzipped file not detected");

        fs::remove_file(&filename).unwrap();
    }

    #[test]
    fn open_either_encoding() {
        let content = b"line one\nline two\n";
        let filename = serialize::temp_file_name("open-file");

        fs::write(&filename, content).unwrap();
        let mut plain = String::new();
        open_file(&filename).unwrap().read_to_string(&mut plain).unwrap();

        let file = File::create(&filename).unwrap();
        let mut encoder = GzEncoder::new(file, Compression::default());
        encoder.write_all(content).unwrap();
        encoder.finish().unwrap();
        let mut compressed = String::new();
        open_file(&filename).unwrap().read_to_string(&mut compressed).unwrap();

        assert_eq!(plain, compressed, "Plain and gzipped contents differ");
        fs::remove_file(&filename).unwrap();
    }
}

//-----------------------------------------------------------------------------
