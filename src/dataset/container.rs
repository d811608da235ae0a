//! Container loading for the pre-packaged ASL arrays
//!
//! The dataset ships as a single file holding four named arrays:
//! `x_train`, `y_train`, `x_test` and `y_test`. Images are stored as
//! `(sample, channel, height, width)` intensities on the 0..=255 scale and
//! labels as integer class indices.
//!
//! Two container formats are understood:
//! - `.safetensors` (always available)
//! - `.h5` / `.hdf5` (requires the `hdf5` cargo feature)

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use safetensors::tensor::{Dtype, SafeTensorError, SafeTensors, TensorView};
use tracing::{debug, info};

use super::NUM_CLASSES;
use crate::utils::error::{AslError, Result};

pub const X_TRAIN: &str = "x_train";
pub const Y_TRAIN: &str = "y_train";
pub const X_TEST: &str = "x_test";
pub const Y_TEST: &str = "y_test";

/// Supported container formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerFormat {
    SafeTensors,
    Hdf5,
}

impl ContainerFormat {
    /// Pick the format from the file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "safetensors" => Ok(Self::SafeTensors),
            "h5" | "hdf5" => Ok(Self::Hdf5),
            _ => Err(AslError::UnsupportedFormat(format!(
                "'{}' (expected .safetensors, .h5 or .hdf5)",
                path.display()
            ))),
        }
    }
}

/// Pixel storage; `u8` data is kept as bytes, every other element type is held as `f32`
#[derive(Debug, Clone, PartialEq)]
pub enum PixelBuffer {
    U8(Vec<u8>),
    F32(Vec<f32>),
}

impl PixelBuffer {
    pub fn len(&self) -> usize {
        match self {
            PixelBuffer::U8(v) => v.len(),
            PixelBuffer::F32(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A 4-D image array `(sample, channel, height, width)`
#[derive(Debug, Clone, PartialEq)]
pub struct ImageArray {
    dims: [usize; 4],
    pixels: PixelBuffer,
}

impl ImageArray {
    pub fn new(dims: [usize; 4], pixels: PixelBuffer) -> Result<Self> {
        let expected: usize = dims.iter().product();
        if pixels.len() != expected {
            return Err(AslError::Shape(format!(
                "image buffer holds {} values but shape {:?} needs {}",
                pixels.len(),
                dims,
                expected
            )));
        }
        Ok(Self { dims, pixels })
    }

    pub fn dims(&self) -> [usize; 4] {
        self.dims
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.dims[0]
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `(channels, height, width)` of one sample
    pub fn sample_dims(&self) -> [usize; 3] {
        [self.dims[1], self.dims[2], self.dims[3]]
    }

    /// Number of values in one sample
    pub fn sample_len(&self) -> usize {
        self.dims[1] * self.dims[2] * self.dims[3]
    }

    pub fn pixels(&self) -> &PixelBuffer {
        &self.pixels
    }

    /// Normalized CHW pixels of sample `index`, each in `[0, 1]`
    pub fn normalized_sample(&self, index: usize) -> Option<Vec<f32>> {
        if index >= self.len() {
            return None;
        }
        let start = index * self.sample_len();
        let end = start + self.sample_len();

        let sample = match &self.pixels {
            PixelBuffer::U8(v) => v[start..end].iter().map(|&p| super::normalize_pixel(p as f32)).collect(),
            PixelBuffer::F32(v) => v[start..end].iter().map(|&p| super::normalize_pixel(p)).collect(),
        };
        Some(sample)
    }
}

/// One split: images and their labels
#[derive(Debug, Clone, PartialEq)]
pub struct Split {
    pub images: ImageArray,
    pub labels: Vec<usize>,
}

impl Split {
    pub fn new(images: ImageArray, labels: Vec<usize>) -> Result<Self> {
        if images.len() != labels.len() {
            return Err(AslError::Shape(format!(
                "{} images but {} labels",
                images.len(),
                labels.len()
            )));
        }
        Ok(Self { images, labels })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Samples per class
    pub fn class_distribution(&self) -> Vec<usize> {
        let mut counts = vec![0usize; NUM_CLASSES];
        for &label in &self.labels {
            if label < NUM_CLASSES {
                counts[label] += 1;
            }
        }
        counts
    }
}

/// The four arrays of the container, validated
#[derive(Debug, Clone, PartialEq)]
pub struct AslArrays {
    pub train: Split,
    pub test: Split,
}

impl AslArrays {
    /// Build from raw splits, checking that both share one sample shape
    pub fn new(train: Split, test: Split) -> Result<Self> {
        if !train.is_empty() && !test.is_empty() && train.images.sample_dims() != test.images.sample_dims() {
            return Err(AslError::Shape(format!(
                "train samples are {:?} but test samples are {:?}",
                train.images.sample_dims(),
                test.images.sample_dims()
            )));
        }
        Ok(Self { train, test })
    }

    /// `(channels, height, width)` shared by every sample
    pub fn sample_dims(&self) -> [usize; 3] {
        if self.train.is_empty() && !self.test.is_empty() {
            return self.test.images.sample_dims();
        }
        self.train.images.sample_dims()
    }

    pub fn summary(&self) -> ContainerSummary {
        ContainerSummary {
            x_train: self.train.images.dims(),
            y_train: self.train.len(),
            x_test: self.test.images.dims(),
            y_test: self.test.len(),
        }
    }
}

/// Shapes of the four arrays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerSummary {
    pub x_train: [usize; 4],
    pub y_train: usize,
    pub x_test: [usize; 4],
    pub y_test: usize,
}

impl fmt::Display for ContainerSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}: {:?}", X_TRAIN, self.x_train)?;
        writeln!(f, "{}: [{}]", Y_TRAIN, self.y_train)?;
        writeln!(f, "{}: {:?}", X_TEST, self.x_test)?;
        write!(f, "{}: [{}]", Y_TEST, self.y_test)
    }
}

/// Element data as read from the container, before shape checks
#[derive(Debug, Clone)]
enum RawData {
    U8(Vec<u8>),
    F32(Vec<f32>),
    Int(Vec<i64>),
}

#[derive(Debug, Clone)]
struct RawArray {
    key: String,
    shape: Vec<usize>,
    data: RawData,
}

impl RawArray {
    fn into_images(self) -> Result<ImageArray> {
        let dims: [usize; 4] = self.shape.as_slice().try_into().map_err(|_| {
            AslError::Shape(format!(
                "'{}' must be 4-D (sample, channel, height, width), got {:?}",
                self.key, self.shape
            ))
        })?;

        let pixels = match self.data {
            RawData::U8(v) => PixelBuffer::U8(v),
            RawData::F32(v) => PixelBuffer::F32(v),
            RawData::Int(v) => PixelBuffer::F32(v.into_iter().map(|p| p as f32).collect()),
        };
        ImageArray::new(dims, pixels)
    }

    fn into_labels(self) -> Result<Vec<usize>> {
        let is_column = matches!(self.shape.as_slice(), [_] | [_, 1]);
        if !is_column {
            return Err(AslError::Shape(format!(
                "'{}' must be 1-D (or N x 1), got {:?}",
                self.key, self.shape
            )));
        }

        let values: Vec<i64> = match self.data {
            RawData::U8(v) => v.into_iter().map(i64::from).collect(),
            RawData::Int(v) => v,
            RawData::F32(_) => {
                return Err(AslError::UnsupportedDtype {
                    key: self.key,
                    dtype: "float".to_string(),
                })
            }
        };

        values
            .into_iter()
            .enumerate()
            .map(|(index, label)| match usize::try_from(label) {
                Ok(l) if l < NUM_CLASSES => Ok(l),
                _ => Err(AslError::InvalidLabel {
                    index,
                    label,
                    num_classes: NUM_CLASSES,
                }),
            })
            .collect()
    }
}

/// Load and validate the four arrays from `path`
pub fn load_container(path: impl AsRef<Path>) -> Result<AslArrays> {
    let path = path.as_ref();
    let format = ContainerFormat::from_path(path)?;
    info!("Loading {:?} container from {}", format, path.display());

    let mut raw = match format {
        ContainerFormat::SafeTensors => read_safetensors(path)?,
        ContainerFormat::Hdf5 => read_hdf5(path)?,
    };

    let mut take = |key: &str| raw.remove(key).ok_or_else(|| AslError::MissingArray(key.to_string()));
    let x_train = take(X_TRAIN)?;
    let y_train = take(Y_TRAIN)?;
    let x_test = take(X_TEST)?;
    let y_test = take(Y_TEST)?;

    let train = Split::new(x_train.into_images()?, y_train.into_labels()?)?;
    let test = Split::new(x_test.into_images()?, y_test.into_labels()?)?;
    let arrays = AslArrays::new(train, test)?;

    debug!("Container shapes:\n{}", arrays.summary());
    Ok(arrays)
}

fn read_safetensors(path: &Path) -> Result<HashMap<String, RawArray>> {
    let bytes = fs::read(path)?;
    let tensors = SafeTensors::deserialize(&bytes).map_err(|e| container_error(path, e))?;

    let mut arrays = HashMap::new();
    for key in [X_TRAIN, Y_TRAIN, X_TEST, Y_TEST] {
        let view = match tensors.tensor(key) {
            Ok(view) => view,
            Err(SafeTensorError::TensorNotFound(_)) => return Err(AslError::MissingArray(key.to_string())),
            Err(e) => return Err(container_error(path, e)),
        };
        let data = decode_view(key, &view)?;
        arrays.insert(
            key.to_string(),
            RawArray {
                key: key.to_string(),
                shape: view.shape().to_vec(),
                data,
            },
        );
    }
    Ok(arrays)
}

/// Decode little-endian tensor bytes
fn decode_view(key: &str, view: &TensorView<'_>) -> Result<RawData> {
    let bytes = view.data();
    let data = match view.dtype() {
        Dtype::U8 => RawData::U8(bytes.to_vec()),
        Dtype::F32 => RawData::F32(le_chunks::<4>(bytes).map(f32::from_le_bytes).collect()),
        Dtype::F64 => RawData::F32(le_chunks::<8>(bytes).map(|b| f64::from_le_bytes(b) as f32).collect()),
        Dtype::I8 => RawData::Int(bytes.iter().map(|&b| i64::from(b as i8)).collect()),
        Dtype::I16 => RawData::Int(le_chunks::<2>(bytes).map(|b| i64::from(i16::from_le_bytes(b))).collect()),
        Dtype::U16 => RawData::Int(le_chunks::<2>(bytes).map(|b| i64::from(u16::from_le_bytes(b))).collect()),
        Dtype::I32 => RawData::Int(le_chunks::<4>(bytes).map(|b| i64::from(i32::from_le_bytes(b))).collect()),
        Dtype::U32 => RawData::Int(le_chunks::<4>(bytes).map(|b| i64::from(u32::from_le_bytes(b))).collect()),
        Dtype::I64 => RawData::Int(le_chunks::<8>(bytes).map(i64::from_le_bytes).collect()),
        Dtype::U64 => RawData::Int(
            le_chunks::<8>(bytes)
                .map(u64::from_le_bytes)
                .enumerate()
                .map(|(index, value)| {
                    i64::try_from(value).map_err(|_| AslError::ValueRange {
                        key: key.to_string(),
                        index,
                        value,
                    })
                })
                .collect::<Result<_>>()?,
        ),
        other => {
            return Err(AslError::UnsupportedDtype {
                key: key.to_string(),
                dtype: format!("{:?}", other),
            })
        }
    };
    Ok(data)
}

fn le_chunks<const N: usize>(bytes: &[u8]) -> impl Iterator<Item = [u8; N]> + '_ {
    bytes.chunks_exact(N).map(|c| {
        let mut buf = [0u8; N];
        buf.copy_from_slice(c);
        buf
    })
}

fn container_error(path: &Path, err: impl fmt::Display) -> AslError {
    AslError::Container(PathBuf::from(path), err.to_string())
}

#[cfg(feature = "hdf5")]
fn read_hdf5(path: &Path) -> Result<HashMap<String, RawArray>> {
    use hdf5::types::{IntSize, TypeDescriptor};

    let file = hdf5::File::open(path).map_err(|e| container_error(path, e))?;

    let mut arrays = HashMap::new();
    for key in [X_TRAIN, Y_TRAIN, X_TEST, Y_TEST] {
        if !file.link_exists(key) {
            return Err(AslError::MissingArray(key.to_string()));
        }
        let dataset = file.dataset(key).map_err(|e| container_error(path, e))?;
        let descriptor = dataset
            .dtype()
            .and_then(|t| t.to_descriptor())
            .map_err(|e| container_error(path, e))?;

        let data = match descriptor {
            TypeDescriptor::Unsigned(IntSize::U1) => {
                RawData::U8(dataset.read_raw::<u8>().map_err(|e| container_error(path, e))?)
            }
            TypeDescriptor::Integer(_) | TypeDescriptor::Unsigned(_) => {
                RawData::Int(dataset.read_raw::<i64>().map_err(|e| container_error(path, e))?)
            }
            TypeDescriptor::Float(_) => {
                RawData::F32(dataset.read_raw::<f32>().map_err(|e| container_error(path, e))?)
            }
            other => {
                return Err(AslError::UnsupportedDtype {
                    key: key.to_string(),
                    dtype: format!("{}", other),
                })
            }
        };

        arrays.insert(
            key.to_string(),
            RawArray {
                key: key.to_string(),
                shape: dataset.shape(),
                data,
            },
        );
    }
    Ok(arrays)
}

#[cfg(not(feature = "hdf5"))]
fn read_hdf5(path: &Path) -> Result<HashMap<String, RawArray>> {
    Err(AslError::UnsupportedFormat(format!(
        "'{}' is HDF5; rebuild with `--features hdf5` or convert it to .safetensors",
        path.display()
    )))
}

/// Write the four arrays to a `.safetensors` file
pub fn save_safetensors(arrays: &AslArrays, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();

    fn image_bytes(images: &ImageArray) -> (Dtype, Vec<u8>) {
        match images.pixels() {
            PixelBuffer::U8(v) => (Dtype::U8, v.clone()),
            PixelBuffer::F32(v) => (Dtype::F32, v.iter().flat_map(|p| p.to_le_bytes()).collect()),
        }
    }
    fn label_bytes(labels: &[usize]) -> Vec<u8> {
        labels.iter().flat_map(|&l| (l as i64).to_le_bytes()).collect()
    }

    let (train_dtype, train_pixels) = image_bytes(&arrays.train.images);
    let (test_dtype, test_pixels) = image_bytes(&arrays.test.images);
    let train_labels = label_bytes(&arrays.train.labels);
    let test_labels = label_bytes(&arrays.test.labels);

    let views = vec![
        (
            X_TRAIN,
            TensorView::new(train_dtype, arrays.train.images.dims().to_vec(), &train_pixels),
        ),
        (
            Y_TRAIN,
            TensorView::new(Dtype::I64, vec![arrays.train.len()], &train_labels),
        ),
        (
            X_TEST,
            TensorView::new(test_dtype, arrays.test.images.dims().to_vec(), &test_pixels),
        ),
        (
            Y_TEST,
            TensorView::new(Dtype::I64, vec![arrays.test.len()], &test_labels),
        ),
    ];

    let views = views
        .into_iter()
        .map(|(key, view)| view.map(|v| (key, v)).map_err(|e| container_error(path, e)))
        .collect::<Result<Vec<_>>>()?;

    let bytes = safetensors::serialize(views, &None).map_err(|e| container_error(path, e))?;
    fs::write(path, bytes)?;
    info!("Wrote safetensors container to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_split(n: usize, fill: u8) -> Split {
        let images = ImageArray::new([n, 3, 4, 4], PixelBuffer::U8(vec![fill; n * 3 * 4 * 4])).unwrap();
        Split::new(images, (0..n).map(|i| i % NUM_CLASSES).collect()).unwrap()
    }

    fn i64_bytes(values: &[i64]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    type Entry = (&'static str, Dtype, Vec<usize>, Vec<u8>);

    /// Write `(key, dtype, shape, bytes)` entries as a safetensors file
    fn write_container(path: &Path, entries: &[Entry]) {
        let views: Vec<_> = entries
            .iter()
            .map(|(key, dtype, shape, bytes)| (*key, TensorView::new(*dtype, shape.clone(), bytes).unwrap()))
            .collect();
        fs::write(path, safetensors::serialize(views, &None).unwrap()).unwrap();
    }

    /// Two one-sample splits of 1x1x2 images; the train entries are given
    fn container_with(x_train: (Dtype, Vec<u8>), y_train: (Dtype, Vec<u8>)) -> Vec<Entry> {
        vec![
            (X_TRAIN, x_train.0, vec![1, 1, 1, 2], x_train.1),
            (Y_TRAIN, y_train.0, vec![1], y_train.1),
            (X_TEST, Dtype::U8, vec![1, 1, 1, 2], vec![0, 255]),
            (Y_TEST, Dtype::I64, vec![1], i64_bytes(&[3])),
        ]
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            ContainerFormat::from_path(Path::new("data/asl.safetensors")).unwrap(),
            ContainerFormat::SafeTensors
        );
        assert_eq!(
            ContainerFormat::from_path(Path::new("ASLdatasetGroup23.hdf5")).unwrap(),
            ContainerFormat::Hdf5
        );
        assert_eq!(ContainerFormat::from_path(Path::new("x.H5")).unwrap(), ContainerFormat::Hdf5);
        assert!(ContainerFormat::from_path(Path::new("x.npz")).is_err());
    }

    #[test]
    fn test_image_array_rejects_wrong_length() {
        let err = ImageArray::new([2, 3, 4, 4], PixelBuffer::U8(vec![0; 10])).unwrap_err();
        assert!(matches!(err, AslError::Shape(_)));
    }

    #[test]
    fn test_normalized_sample_range() {
        let pixels: Vec<u8> = (0..=255u8).cycle().take(2 * 3 * 4 * 4).collect();
        let images = ImageArray::new([2, 3, 4, 4], PixelBuffer::U8(pixels)).unwrap();

        for i in 0..images.len() {
            let sample = images.normalized_sample(i).unwrap();
            assert_eq!(sample.len(), 48);
            assert!(sample.iter().all(|&p| (0.0..=1.0).contains(&p)));
        }
        assert_eq!(images.normalized_sample(0).unwrap()[0], 0.0);
        assert!(images.normalized_sample(2).is_none());
    }

    #[test]
    fn test_float_pixels_are_clamped() {
        let images = ImageArray::new([1, 1, 1, 3], PixelBuffer::F32(vec![-5.0, 127.5, 300.0])).unwrap();
        let sample = images.normalized_sample(0).unwrap();
        assert_eq!(sample, vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_non_finite_float_pixels_stay_in_range() {
        let images =
            ImageArray::new([1, 1, 1, 3], PixelBuffer::F32(vec![f32::NAN, 10.0, f32::INFINITY])).unwrap();
        let sample = images.normalized_sample(0).unwrap();
        assert!(sample.iter().all(|&p| (0.0..=1.0).contains(&p)));
        assert_eq!(sample, vec![0.0, 10.0 / 255.0, 1.0]);
    }

    #[test]
    fn test_split_count_mismatch() {
        let images = ImageArray::new([2, 3, 4, 4], PixelBuffer::U8(vec![0; 96])).unwrap();
        assert!(matches!(Split::new(images, vec![1]), Err(AslError::Shape(_))));
    }

    #[test]
    fn test_labels_out_of_range() {
        let raw = RawArray {
            key: Y_TRAIN.to_string(),
            shape: vec![3],
            data: RawData::Int(vec![0, 29, 3]),
        };
        match raw.into_labels() {
            Err(AslError::InvalidLabel { index, label, .. }) => {
                assert_eq!(index, 1);
                assert_eq!(label, 29);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_column_labels_accepted() {
        let raw = RawArray {
            key: Y_TEST.to_string(),
            shape: vec![2, 1],
            data: RawData::U8(vec![4, 28]),
        };
        assert_eq!(raw.into_labels().unwrap(), vec![4, 28]);
    }

    #[test]
    fn test_images_must_be_4d() {
        let raw = RawArray {
            key: X_TRAIN.to_string(),
            shape: vec![2, 48],
            data: RawData::U8(vec![0; 96]),
        };
        assert!(matches!(raw.into_images(), Err(AslError::Shape(_))));
    }

    #[test]
    fn test_safetensors_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("asl.safetensors");
        let arrays = AslArrays::new(tiny_split(5, 200), tiny_split(3, 10)).unwrap();

        save_safetensors(&arrays, &path).unwrap();
        let loaded = load_container(&path).unwrap();

        assert_eq!(loaded, arrays);
        assert_eq!(loaded.summary().x_train, [5, 3, 4, 4]);
        assert_eq!(loaded.summary().y_test, 3);
    }

    #[test]
    fn test_missing_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.safetensors");

        let pixels = vec![0u8; 48];
        let view = TensorView::new(Dtype::U8, vec![1, 3, 4, 4], &pixels).unwrap();
        let bytes = safetensors::serialize(vec![(X_TRAIN, view)], &None).unwrap();
        fs::write(&path, bytes).unwrap();

        match load_container(&path) {
            Err(AslError::MissingArray(key)) => assert_eq!(key, Y_TRAIN),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_missing_file() {
        let err = load_container("/nonexistent/asl.safetensors").unwrap_err();
        assert!(matches!(err, AslError::Io(_)));
    }

    #[test]
    fn test_mismatched_sample_dims() {
        let train = tiny_split(2, 0);
        let images = ImageArray::new([1, 3, 5, 5], PixelBuffer::U8(vec![0; 75])).unwrap();
        let test = Split::new(images, vec![0]).unwrap();
        assert!(matches!(AslArrays::new(train, test), Err(AslError::Shape(_))));
    }

    #[test]
    fn test_empty_split_skips_shape_check() {
        let images = ImageArray::new([0, 1, 9, 9], PixelBuffer::U8(Vec::new())).unwrap();
        let empty = Split::new(images, Vec::new()).unwrap();

        let arrays = AslArrays::new(tiny_split(2, 0), empty.clone()).unwrap();
        assert_eq!(arrays.sample_dims(), [3, 4, 4]);

        let arrays = AslArrays::new(empty, tiny_split(2, 0)).unwrap();
        assert_eq!(arrays.sample_dims(), [3, 4, 4]);
    }

    #[cfg(not(feature = "hdf5"))]
    #[test]
    fn test_hdf5_without_feature() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_container(dir.path().join("ASLdatasetGroup23.hdf5")).unwrap_err();
        match err {
            AslError::UnsupportedFormat(msg) => assert!(msg.contains("--features hdf5")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_bool_images_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bool.safetensors");
        write_container(&path, &container_with((Dtype::BOOL, vec![0, 1]), (Dtype::I64, i64_bytes(&[1]))));

        match load_container(&path) {
            Err(AslError::UnsupportedDtype { key, .. }) => assert_eq!(key, X_TRAIN),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_half_images_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("half.safetensors");
        write_container(&path, &container_with((Dtype::F16, vec![0; 4]), (Dtype::I64, i64_bytes(&[1]))));

        assert!(matches!(
            load_container(&path),
            Err(AslError::UnsupportedDtype { ref key, .. }) if key == X_TRAIN
        ));
    }

    #[test]
    fn test_float_labels_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("float_labels.safetensors");
        let labels: Vec<u8> = 1.0f32.to_le_bytes().to_vec();
        write_container(&path, &container_with((Dtype::U8, vec![0, 255]), (Dtype::F32, labels)));

        match load_container(&path) {
            Err(AslError::UnsupportedDtype { key, dtype }) => {
                assert_eq!(key, Y_TRAIN);
                assert_eq!(dtype, "float");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_u64_label_overflow_keeps_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("u64_labels.safetensors");
        let labels = u64::MAX.to_le_bytes().to_vec();
        write_container(&path, &container_with((Dtype::U8, vec![0, 255]), (Dtype::U64, labels)));

        match load_container(&path) {
            Err(AslError::ValueRange { key, index, value }) => {
                assert_eq!(key, Y_TRAIN);
                assert_eq!(index, 0);
                assert_eq!(value, u64::MAX);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_integer_images_widen_to_f32() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("i16.safetensors");
        let pixels: Vec<u8> = [-4i16, 300].iter().flat_map(|p| p.to_le_bytes()).collect();
        write_container(&path, &container_with((Dtype::I16, pixels), (Dtype::I64, i64_bytes(&[1]))));

        let arrays = load_container(&path).unwrap();
        assert_eq!(arrays.train.images.pixels(), &PixelBuffer::F32(vec![-4.0, 300.0]));
        assert_eq!(arrays.train.images.normalized_sample(0).unwrap(), vec![0.0, 1.0]);

        let converted = dir.path().join("converted.safetensors");
        save_safetensors(&arrays, &converted).unwrap();
        let bytes = fs::read(&converted).unwrap();
        let tensors = SafeTensors::deserialize(&bytes).unwrap();
        assert_eq!(tensors.tensor(X_TRAIN).unwrap().dtype(), Dtype::F32);
        assert_eq!(tensors.tensor(X_TEST).unwrap().dtype(), Dtype::U8);
    }

    #[test]
    fn test_summary_display() {
        let arrays = AslArrays::new(tiny_split(2, 0), tiny_split(1, 0)).unwrap();
        let text = arrays.summary().to_string();
        assert!(text.contains("x_train: [2, 3, 4, 4]"));
        assert!(text.contains("y_test: [1]"));
    }
}
