//! Reader for the MNIST files in the IDX format.

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::info;
use ndarray::Array2;

use super::{Dataset, OneHotEncoder};
use crate::{Result, SessionErr};

pub const TRAIN_IMAGES: &str = "train-images-idx3-ubyte";
pub const TRAIN_LABELS: &str = "train-labels-idx1-ubyte";
pub const TEST_IMAGES: &str = "t10k-images-idx3-ubyte";
pub const TEST_LABELS: &str = "t10k-labels-idx1-ubyte";

const IMAGES_MAGIC: u32 = 2051;
const LABELS_MAGIC: u32 = 2049;

/// One of the two MNIST splits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Split {
    Train,
    Test,
}

impl Split {
    fn files(self) -> (&'static str, &'static str) {
        match self {
            Split::Train => (TRAIN_IMAGES, TRAIN_LABELS),
            Split::Test => (TEST_IMAGES, TEST_LABELS),
        }
    }
}

/// Raw images of an IDX3 file, one flattened image per row, pixels left in `[0, 255]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Images {
    pub pixels: Array2<f32>,
    pub rows: usize,
    pub cols: usize,
}

/// Loads a split from `dir`, one-hot encoding its labels.
///
/// # Arguments
/// * `dir` - The directory holding the four IDX files.
/// * `split` - Which of the splits to read.
/// * `limit` - Keep only the first `limit` samples, `None` to keep all of them.
///
/// # Returns
/// The dataset with raw pixel features or `SessionErr::DatasetLoad` if the files are unreadable,
/// malformed, disagree on the sample count or hold fewer than `limit` samples.
pub fn load(dir: &Path, split: Split, limit: Option<usize>) -> Result<Dataset> {
    let (images_file, labels_file) = split.files();
    let images_path = dir.join(images_file);
    let labels_path = dir.join(labels_file);

    let images = read_images(&images_path, limit)?;
    let labels = read_labels(&labels_path, limit)?;

    if images.pixels.nrows() != labels.len() {
        return Err(SessionErr::dataset_load(
            &labels_path,
            format!(
                "holds {} labels for {} images",
                labels.len(),
                images.pixels.nrows()
            ),
        ));
    }

    let (encoder, labels) = OneHotEncoder::fit_transform(&labels);
    info!(
        "loaded {split:?} split: {} images of {}x{}, {} label categories",
        images.pixels.nrows(),
        images.rows,
        images.cols,
        encoder.categories().len()
    );

    Dataset::new(images.pixels, labels)
}

/// Reads an IDX3 image file.
///
/// # Arguments
/// * `path` - The file to read.
/// * `limit` - Keep only the first `limit` images.
pub fn read_images(path: &Path, limit: Option<usize>) -> Result<Images> {
    let data = read(path)?;
    let mut reader = IdxReader::new(path, &data);

    reader.expect_magic(IMAGES_MAGIC)?;
    let total = reader.read_u32()? as usize;
    let rows = reader.read_u32()? as usize;
    let cols = reader.read_u32()? as usize;

    let count = reader.limit(total, limit)?;
    let image_size = rows * cols;
    let pixels = reader.take(count.saturating_mul(image_size))?;

    let pixels = Array2::from_shape_fn((count, image_size), |(i, j)| {
        pixels[i * image_size + j] as f32
    });

    Ok(Images { pixels, rows, cols })
}

/// Reads an IDX1 label file.
///
/// # Arguments
/// * `path` - The file to read.
/// * `limit` - Keep only the first `limit` labels.
pub fn read_labels(path: &Path, limit: Option<usize>) -> Result<Vec<u8>> {
    let data = read(path)?;
    let mut reader = IdxReader::new(path, &data);

    reader.expect_magic(LABELS_MAGIC)?;
    let total = reader.read_u32()? as usize;

    let count = reader.limit(total, limit)?;
    Ok(reader.take(count)?.to_vec())
}

fn read(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| SessionErr::dataset_unreadable(path, e))
}

/// Cursor over the bytes of an IDX file.
struct IdxReader<'a> {
    path: PathBuf,
    data: &'a [u8],
    offset: usize,
}

impl<'a> IdxReader<'a> {
    fn new(path: &Path, data: &'a [u8]) -> Self {
        Self {
            path: path.to_path_buf(),
            data,
            offset: 0,
        }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self.offset.saturating_add(n);

        let Some(bytes) = self.data.get(self.offset..end) else {
            return Err(self.err(format!(
                "truncated: needs {end} bytes, has {}",
                self.data.len()
            )));
        };

        self.offset = end;
        Ok(bytes)
    }

    fn read_u32(&mut self) -> Result<u32> {
        let bytes = self.take(4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn expect_magic(&mut self, expected: u32) -> Result<()> {
        let magic = self.read_u32()?;

        if magic != expected {
            return Err(self.err(format!("bad magic number {magic}, expected {expected}")));
        }

        Ok(())
    }

    fn limit(&self, total: usize, limit: Option<usize>) -> Result<usize> {
        match limit {
            None => Ok(total),
            Some(n) if n <= total => Ok(n),
            Some(n) => Err(self.err(format!("requested {n} samples, file holds {total}"))),
        }
    }

    fn err(&self, reason: String) -> SessionErr {
        SessionErr::dataset_load(&self.path, reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idx(magic: u32, dims: &[u32], body: &[u8]) -> Vec<u8> {
        let mut data = magic.to_be_bytes().to_vec();
        for dim in dims {
            data.extend(dim.to_be_bytes());
        }
        data.extend(body);
        data
    }

    fn write_tmp(name: &str, data: &[u8]) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("mnist-idx-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, data).unwrap();
        path
    }

    #[test]
    fn reads_images_row_major() {
        let body: Vec<u8> = (0..12).collect();
        let path = write_tmp("images-ok", &idx(IMAGES_MAGIC, &[3, 2, 2], &body));

        let images = read_images(&path, None).unwrap();

        assert_eq!((images.rows, images.cols), (2, 2));
        assert_eq!(images.pixels.dim(), (3, 4));
        assert_eq!(images.pixels[[2, 3]], 11.0);
    }

    #[test]
    fn limit_keeps_leading_samples() {
        let path = write_tmp("labels-limit", &idx(LABELS_MAGIC, &[4], &[5, 0, 4, 1]));

        assert_eq!(read_labels(&path, Some(2)).unwrap(), vec![5, 0]);
        assert!(matches!(
            read_labels(&path, Some(5)),
            Err(SessionErr::DatasetLoad { .. })
        ));
    }

    #[test]
    fn bad_magic_is_rejected() {
        let path = write_tmp("labels-magic", &idx(IMAGES_MAGIC, &[1], &[3]));

        let err = read_labels(&path, None).unwrap_err();
        assert!(err.to_string().contains("bad magic number 2051"), "{err}");
    }

    #[test]
    fn truncated_file_is_rejected() {
        let path = write_tmp("images-short", &idx(IMAGES_MAGIC, &[2, 2, 2], &[0; 5]));

        assert!(matches!(
            read_images(&path, None),
            Err(SessionErr::DatasetLoad { .. })
        ));
    }

    #[test]
    fn missing_file_is_a_load_failure_caused_by_io() {
        use std::error::Error;

        let path = std::env::temp_dir().join("mnist-idx-does-not-exist");
        let err = read_labels(&path, None).unwrap_err();

        assert!(matches!(
            err,
            SessionErr::DatasetLoad {
                source: Some(_),
                ..
            }
        ));
        assert!(err.source().is_some());
    }
}
