//! On-disk format for flat indices.
//!
//! ```text
//! offset  size  field
//! 0       4     magic "TSIX"
//! 4       1     format version (currently 1)
//! 5       1     metric tag (0 = inner product, 1 = squared L2)
//! 6       4     dimension, u32 little-endian
//! 10      8     vector count, u64 little-endian
//! 18      ...   count * dim f32 values, little-endian
//! ```

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use tessera_core::errors::{IndexError, TesseraResult};

use crate::flat::{FlatIndex, Metric};

const MAGIC: [u8; 4] = *b"TSIX";
const FORMAT_VERSION: u8 = 1;

fn metric_tag(metric: Metric) -> u8 {
    match metric {
        Metric::InnerProduct => 0,
        Metric::SquaredL2 => 1,
    }
}

fn malformed(path: &Path, reason: impl Into<String>) -> IndexError {
    IndexError::Malformed {
        path: path.display().to_string(),
        reason: reason.into(),
    }
}

/// Write an index to `path`, replacing any existing file.
pub fn write_index(path: &Path, index: &FlatIndex) -> TesseraResult<()> {
    let file = File::create(path)?;
    let mut w = BufWriter::new(file);

    w.write_all(&MAGIC)?;
    w.write_all(&[FORMAT_VERSION, metric_tag(index.metric())])?;
    w.write_all(&(index.dim() as u32).to_le_bytes())?;
    w.write_all(&(index.len() as u64).to_le_bytes())?;
    for value in index.vectors() {
        w.write_all(&value.to_le_bytes())?;
    }
    w.flush()?;
    Ok(())
}

/// Read an index from `path`.
pub fn read_index(path: &Path) -> TesseraResult<FlatIndex> {
    let file = File::open(path)?;
    let mut r = BufReader::new(file);

    let mut header = [0u8; 18];
    r.read_exact(&mut header)
        .map_err(|e| malformed(path, format!("short header: {e}")))?;

    if header[..4] != MAGIC {
        return Err(malformed(path, "bad magic").into());
    }
    if header[4] != FORMAT_VERSION {
        return Err(malformed(path, format!("unsupported version {}", header[4])).into());
    }
    let metric = match header[5] {
        0 => Metric::InnerProduct,
        1 => Metric::SquaredL2,
        tag => {
            return Err(IndexError::UnsupportedMetric {
                tag,
                path: path.display().to_string(),
            }
            .into())
        }
    };
    let dim = u32::from_le_bytes([header[6], header[7], header[8], header[9]]) as usize;
    let count = u64::from_le_bytes([
        header[10], header[11], header[12], header[13], header[14], header[15], header[16],
        header[17],
    ]) as usize;
    if dim == 0 {
        return Err(malformed(path, "zero dimension").into());
    }

    let mut payload = vec![0u8; count * dim * 4];
    r.read_exact(&mut payload)
        .map_err(|e| malformed(path, format!("short payload: {e}")))?;

    let mut vectors = Vec::with_capacity(count * dim);
    for chunk in payload.chunks_exact(4) {
        vectors.push(f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]));
    }

    FlatIndex::from_vectors(dim, metric, vectors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_an_index() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dense.idx");

        let index =
            FlatIndex::from_vectors(3, Metric::InnerProduct, vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6])
                .unwrap();
        write_index(&path, &index).unwrap();

        let loaded = read_index(&path).unwrap();
        assert_eq!(loaded.dim(), 3);
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.metric(), Metric::InnerProduct);
        assert_eq!(loaded.vectors(), index.vectors());
    }

    #[test]
    fn preserves_l2_metric_tag() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("theme.idx");
        let index = FlatIndex::from_vectors(2, Metric::SquaredL2, vec![1.0, 2.0]).unwrap();
        write_index(&path, &index).unwrap();
        assert_eq!(read_index(&path).unwrap().metric(), Metric::SquaredL2);
    }

    #[test]
    fn bad_magic_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("junk.idx");
        std::fs::write(&path, b"not an index file at all").unwrap();
        let err = read_index(&path).unwrap_err();
        assert!(err.to_string().contains("bad magic"));
    }

    #[test]
    fn truncated_payload_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.idx");

        let index = FlatIndex::from_vectors(4, Metric::InnerProduct, vec![0.0; 16]).unwrap();
        write_index(&path, &index).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        std::fs::write(&path, &bytes[..bytes.len() - 7]).unwrap();

        let err = read_index(&path).unwrap_err();
        assert!(err.to_string().contains("short payload"));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = read_index(Path::new("/nonexistent/nothing.idx")).unwrap_err();
        assert!(matches!(
            err,
            tessera_core::errors::TesseraError::Io(_)
        ));
    }
}
