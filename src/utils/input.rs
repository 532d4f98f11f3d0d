use bzip2::read::BzDecoder;
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Opens an input file, decompressing it when its extension is
/// `gz`/`gzip` or `bz2`/`bzip2`
pub fn open_input(path: &Path) -> std::io::Result<Box<dyn Read>> {
    let file = BufReader::new(File::open(path)?);
    Ok(match path.extension().and_then(|e| e.to_str()) {
        Some("gz") | Some("gzip") => Box::new(GzDecoder::new(file)),
        Some("bz2") | Some("bzip2") => Box::new(BzDecoder::new(file)),
        _ => Box::new(file),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use temp_dir::TempDir;

    const ROWS: &str = "1,2\n1,3\n";

    fn read_back(path: &Path) -> String {
        let mut text = String::new();
        open_input(path).unwrap().read_to_string(&mut text).unwrap();
        text
    }

    #[test]
    fn test_compressed_inputs() {
        let dir = TempDir::new().unwrap();

        let plain = dir.path().join("rows.csv");
        std::fs::write(&plain, ROWS).unwrap();
        assert_eq!(read_back(&plain), ROWS);

        let gz = dir.path().join("rows.csv.gz");
        let mut encoder = flate2::write::GzEncoder::new(
            File::create(&gz).unwrap(),
            flate2::Compression::default(),
        );
        encoder.write_all(ROWS.as_bytes()).unwrap();
        encoder.finish().unwrap();
        assert_eq!(read_back(&gz), ROWS);

        let bz = dir.path().join("rows.csv.bz2");
        let mut encoder = bzip2::write::BzEncoder::new(
            File::create(&bz).unwrap(),
            bzip2::Compression::default(),
        );
        encoder.write_all(ROWS.as_bytes()).unwrap();
        encoder.finish().unwrap();
        assert_eq!(read_back(&bz), ROWS);
    }
}
