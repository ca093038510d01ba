use uuid::Uuid;

use crate::error::CodecError;
use crate::message::{self, Sample};

/// Immutable per-session parameters, fixed at creation. The same configuration
/// must be supplied independently to the encoder and the decoder of a stream;
/// neither side infers it from the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Number of measured quantities per sample.
    pub channel_count: usize,
    /// Nominal sampling rate in Hz. Carried as session metadata; the codec
    /// itself does not interpret it.
    pub sampling_rate: usize,
    /// Number of samples accumulated before a message is emitted.
    pub samples_per_message: usize,
}

impl SessionConfig {
    /// Validates and creates a configuration. All parameters must be positive.
    pub fn new(
        channel_count: usize,
        sampling_rate: usize,
        samples_per_message: usize,
    ) -> Result<Self, CodecError> {
        if channel_count == 0 {
            return Err(CodecError::InvalidConfig { parameter: "channel_count" });
        }
        if sampling_rate == 0 {
            return Err(CodecError::InvalidConfig { parameter: "sampling_rate" });
        }
        if samples_per_message == 0 {
            return Err(CodecError::InvalidConfig { parameter: "samples_per_message" });
        }
        Ok(Self {
            channel_count,
            sampling_rate,
            samples_per_message,
        })
    }
}

/// The per-session encoder engine: accumulates samples and emits one encoded
/// message each time the configured quota is reached.
///
/// # Example
/// ```
/// use gridstream::{Encoder, Sample, SessionConfig};
/// use uuid::Uuid;
///
/// let config = SessionConfig::new(2, 4000, 2).unwrap();
/// let mut enc = Encoder::new(Uuid::from_u128(1), config);
///
/// assert!(enc.encode_one(Sample::new(0, vec![10, -10], vec![0, 0])).unwrap().is_none());
/// let msg = enc.encode_one(Sample::new(250, vec![11, -9], vec![0, 0])).unwrap();
/// assert!(msg.is_some());
/// assert_eq!(enc.pending_len(), 0);
/// ```
#[derive(Debug)]
pub struct Encoder {
    id: Uuid,
    config: SessionConfig,
    pending: Vec<Sample>,
}

impl Encoder {
    /// Creates a new encoder session.
    pub fn new(id: Uuid, config: SessionConfig) -> Self {
        Self {
            id,
            config,
            pending: Vec::with_capacity(config.samples_per_message),
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

    /// Returns the number of samples currently buffered.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Appends one sample to the pending buffer. When the buffer reaches
    /// `samples_per_message` the accumulated samples are serialized, the
    /// buffer resets to empty, and the message bytes are returned.
    ///
    /// A rejected sample (wrong channel count, timestamp earlier than the
    /// previous buffered sample) leaves the buffer untouched.
    pub fn encode_one(&mut self, sample: Sample) -> Result<Option<Vec<u8>>, CodecError> {
        self.check_schema(&sample)?;
        if let Some(last) = self.pending.last() {
            if sample.timestamp < last.timestamp {
                return Err(CodecError::MalformedMessage {
                    reason: "decreasing timestamp",
                });
            }
        }

        self.pending.push(sample);
        if self.pending.len() < self.config.samples_per_message {
            return Ok(None);
        }
        let bytes = message::serialize(self.config.channel_count, &self.pending)?;
        self.pending.clear();
        Ok(Some(bytes))
    }

    /// Serializes an already-collected batch as one message whose sample count
    /// is the batch length, which may differ from `samples_per_message`. The
    /// session's pending buffer is not touched. An empty batch yields an empty
    /// buffer (no message).
    pub fn encode_all(&self, samples: &[Sample]) -> Result<Vec<u8>, CodecError> {
        if samples.is_empty() {
            return Ok(Vec::new());
        }
        for sample in samples {
            self.check_schema(sample)?;
        }
        message::serialize(self.config.channel_count, samples)
    }

    fn check_schema(&self, sample: &Sample) -> Result<(), CodecError> {
        if sample.values.len() != self.config.channel_count {
            return Err(CodecError::SchemaMismatch {
                expected: self.config.channel_count,
                actual: sample.values.len(),
            });
        }
        if sample.qualities.len() != self.config.channel_count {
            return Err(CodecError::SchemaMismatch {
                expected: self.config.channel_count,
                actual: sample.qualities.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoder(channel_count: usize, samples_per_message: usize) -> Encoder {
        let config = SessionConfig::new(channel_count, 4000, samples_per_message).unwrap();
        Encoder::new(Uuid::from_u128(42), config)
    }

    fn sample(t: u64, values: &[i32]) -> Sample {
        Sample::new(t, values.to_vec(), vec![0; values.len()])
    }

    #[test]
    fn test_config_validation() {
        assert!(SessionConfig::new(3, 4000, 80).is_ok());
        assert_eq!(
            SessionConfig::new(0, 4000, 80),
            Err(CodecError::InvalidConfig { parameter: "channel_count" })
        );
        assert_eq!(
            SessionConfig::new(3, 0, 80),
            Err(CodecError::InvalidConfig { parameter: "sampling_rate" })
        );
        assert_eq!(
            SessionConfig::new(3, 4000, 0),
            Err(CodecError::InvalidConfig { parameter: "samples_per_message" })
        );
    }

    #[test]
    fn test_message_emitted_exactly_at_quota() {
        let mut enc = encoder(1, 3);
        assert!(enc.encode_one(sample(0, &[1])).unwrap().is_none());
        assert!(enc.encode_one(sample(1, &[2])).unwrap().is_none());
        assert_eq!(enc.pending_len(), 2);
        let msg = enc.encode_one(sample(2, &[3])).unwrap();
        assert!(msg.is_some());
        assert_eq!(enc.pending_len(), 0);
        // The cycle starts over.
        assert!(enc.encode_one(sample(3, &[4])).unwrap().is_none());
        assert_eq!(enc.pending_len(), 1);
    }

    #[test]
    fn test_wrong_channel_count_rejected() {
        let mut enc = encoder(2, 4);
        let err = enc.encode_one(sample(0, &[1])).unwrap_err();
        assert_eq!(err, CodecError::SchemaMismatch { expected: 2, actual: 1 });
        assert_eq!(enc.pending_len(), 0);

        // Mismatched quality length is also a schema error.
        let bad = Sample::new(0, vec![1, 2], vec![0]);
        assert!(enc.encode_one(bad).is_err());
        assert_eq!(enc.pending_len(), 0);
    }

    #[test]
    fn test_decreasing_timestamp_rejected_without_mutation() {
        let mut enc = encoder(1, 4);
        enc.encode_one(sample(100, &[1])).unwrap();
        let err = enc.encode_one(sample(99, &[2])).unwrap_err();
        assert!(matches!(err, CodecError::MalformedMessage { .. }));
        assert_eq!(enc.pending_len(), 1);
        // Equal timestamps are allowed (non-decreasing).
        assert!(enc.encode_one(sample(100, &[2])).unwrap().is_none());
    }

    #[test]
    fn test_encode_all_leaves_pending_alone() {
        let mut enc = encoder(1, 4);
        enc.encode_one(sample(0, &[5])).unwrap();

        let batch: Vec<Sample> = (0..10).map(|i| sample(i, &[i as i32])).collect();
        let bytes = enc.encode_all(&batch).unwrap();
        assert!(!bytes.is_empty());
        assert_eq!(enc.pending_len(), 1);
    }

    #[test]
    fn test_encode_all_empty_batch() {
        let enc = encoder(1, 4);
        assert_eq!(enc.encode_all(&[]).unwrap(), Vec::<u8>::new());
    }
}
