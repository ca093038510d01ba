use uuid::Uuid;

use crate::encoder::SessionConfig;
use crate::error::CodecError;
use crate::message::{self, Sample};

/// One element of a decoded dataset, as returned by indexed retrieval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedPoint {
    pub timestamp: u64,
    pub value: i32,
    pub quality: u32,
}

/// The per-session decoder engine: parses messages and holds the most
/// recently decoded dataset for retrieval.
///
/// A failed [`decode`](Decoder::decode) leaves the previously stored dataset
/// untouched; a successful one replaces it completely.
///
/// # Example
/// ```
/// use gridstream::{Decoder, Encoder, Sample, SessionConfig};
/// use uuid::Uuid;
///
/// let config = SessionConfig::new(1, 4000, 2).unwrap();
/// let enc = Encoder::new(Uuid::from_u128(1), config);
/// let mut dec = Decoder::new(Uuid::from_u128(1), config);
///
/// let samples = vec![
///     Sample::new(0, vec![100], vec![0]),
///     Sample::new(250, vec![101], vec![0]),
/// ];
/// let bytes = enc.encode_all(&samples).unwrap();
/// dec.decode(&bytes).unwrap();
/// assert_eq!(dec.decoded(), &samples[..]);
/// ```
#[derive(Debug)]
pub struct Decoder {
    id: Uuid,
    config: SessionConfig,
    out: Vec<Sample>,
}

impl Decoder {
    /// Creates a new decoder session with an empty dataset.
    pub fn new(id: Uuid, config: SessionConfig) -> Self {
        Self {
            id,
            config,
            out: Vec::new(),
        }
    }

    /// Returns the session identifier.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the session configuration.
    pub fn config(&self) -> SessionConfig {
        self.config
    }

    /// Returns the most recently decoded dataset (empty before the first
    /// successful decode).
    pub fn decoded(&self) -> &[Sample] {
        &self.out
    }

    /// Parses one message and replaces the stored dataset with its contents.
    /// On any error the stored dataset is left exactly as it was.
    pub fn decode(&mut self, bytes: &[u8]) -> Result<(), CodecError> {
        let samples = message::parse(
            bytes,
            self.config.channel_count,
            self.config.samples_per_message,
        )?;
        self.out = samples;
        Ok(())
    }

    /// Returns one element of the stored dataset by sample and channel index.
    pub fn get(&self, sample_index: usize, value_index: usize) -> Result<DecodedPoint, CodecError> {
        if self.out.is_empty() {
            return Err(CodecError::NoData);
        }
        let sample = self.out.get(sample_index).ok_or(CodecError::IndexOutOfRange {
            index: sample_index,
            len: self.out.len(),
        })?;
        let value = *sample.values.get(value_index).ok_or(CodecError::IndexOutOfRange {
            index: value_index,
            len: sample.values.len(),
        })?;
        Ok(DecodedPoint {
            timestamp: sample.timestamp,
            value,
            quality: sample.qualities[value_index],
        })
    }

    /// Copies `min(dest.len(), stored)` samples of the stored dataset into
    /// caller-owned storage and returns the number copied. Each destination
    /// sample's value and quality arrays must already be sized to the
    /// configured channel count; they are not resized.
    pub fn copy_decoded(&self, dest: &mut [Sample]) -> Result<usize, CodecError> {
        if self.out.is_empty() {
            return Err(CodecError::NoData);
        }
        let count = dest.len().min(self.out.len());
        for (dst, src) in dest[..count].iter_mut().zip(&self.out) {
            if dst.values.len() != self.config.channel_count {
                return Err(CodecError::SchemaMismatch {
                    expected: self.config.channel_count,
                    actual: dst.values.len(),
                });
            }
            if dst.qualities.len() != self.config.channel_count {
                return Err(CodecError::SchemaMismatch {
                    expected: self.config.channel_count,
                    actual: dst.qualities.len(),
                });
            }
            dst.timestamp = src.timestamp;
            dst.values.copy_from_slice(&src.values);
            dst.qualities.copy_from_slice(&src.qualities);
        }
        Ok(count)
    }
}
