use std::collections::HashMap;

use uuid::Uuid;

use crate::decoder::{DecodedPoint, Decoder};
use crate::encoder::{Encoder, SessionConfig};
use crate::error::{CodecError, SessionRole};
use crate::message::Sample;

/// The session registry: maps opaque 16-byte identifiers to encoder and
/// decoder sessions, independently for each role, and routes every codec
/// operation to the named session.
///
/// A `Codec` is an ordinary owned value, so multiple independent instances
/// can coexist in one process. It holds no locks of its own; callers sharing
/// one instance across threads wrap it in their own synchronization. Sessions
/// with distinct identifiers never interfere with each other.
///
/// # Example
/// ```
/// use gridstream::{Codec, Sample};
/// use uuid::Uuid;
///
/// let mut codec = Codec::new();
/// let id = Uuid::from_u128(0x1234);
/// codec.create_encoder(id, 3, 4000, 2).unwrap();
/// codec.create_decoder(id, 3, 4000, 2).unwrap();
///
/// assert!(codec
///     .encode_one(id, Sample::new(0, vec![1, 2, 3], vec![0, 0, 0]))
///     .unwrap()
///     .is_none());
/// let msg = codec
///     .encode_one(id, Sample::new(250, vec![2, 3, 4], vec![0, 0, 0]))
///     .unwrap()
///     .expect("second sample completes the message");
///
/// codec.decode(id, &msg).unwrap();
/// assert_eq!(codec.get_decoded_index(id, 1, 0).unwrap().value, 2);
/// ```
#[derive(Debug, Default)]
pub struct Codec {
    encoders: HashMap<Uuid, Encoder>,
    decoders: HashMap<Uuid, Decoder>,
}

impl Codec {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an encoder session for `id`, replacing and dropping any prior
    /// encoder session under the same identifier.
    pub fn create_encoder(
        &mut self,
        id: Uuid,
        channel_count: usize,
        sampling_rate: usize,
        samples_per_message: usize,
    ) -> Result<(), CodecError> {
        let config = SessionConfig::new(channel_count, sampling_rate, samples_per_message)?;
        self.encoders.insert(id, Encoder::new(id, config));
        Ok(())
    }

    /// Creates a decoder session for `id`, replacing and dropping any prior
    /// decoder session under the same identifier.
    pub fn create_decoder(
        &mut self,
        id: Uuid,
        channel_count: usize,
        sampling_rate: usize,
        samples_per_message: usize,
    ) -> Result<(), CodecError> {
        let config = SessionConfig::new(channel_count, sampling_rate, samples_per_message)?;
        self.decoders.insert(id, Decoder::new(id, config));
        Ok(())
    }

    /// Removes the encoder session for `id`. Removing a session that does not
    /// exist is a no-op.
    pub fn remove_encoder(&mut self, id: Uuid) {
        self.encoders.remove(&id);
    }

    /// Removes the decoder session for `id`. Removing a session that does not
    /// exist is a no-op.
    pub fn remove_decoder(&mut self, id: Uuid) {
        self.decoders.remove(&id);
    }

    /// Returns the named encoder session, if any.
    pub fn encoder(&self, id: Uuid) -> Option<&Encoder> {
        self.encoders.get(&id)
    }

    /// Returns the named decoder session, if any.
    pub fn decoder(&self, id: Uuid) -> Option<&Decoder> {
        self.decoders.get(&id)
    }

    /// Appends one sample to the named encoder; see [`Encoder::encode_one`].
    pub fn encode_one(&mut self, id: Uuid, sample: Sample) -> Result<Option<Vec<u8>>, CodecError> {
        self.encoders
            .get_mut(&id)
            .ok_or(CodecError::UnknownSession {
                id,
                role: SessionRole::Encoder,
            })?
            .encode_one(sample)
    }

    /// Serializes a batch through the named encoder; see [`Encoder::encode_all`].
    pub fn encode_all(&self, id: Uuid, samples: &[Sample]) -> Result<Vec<u8>, CodecError> {
        self.encoders
            .get(&id)
            .ok_or(CodecError::UnknownSession {
                id,
                role: SessionRole::Encoder,
            })?
            .encode_all(samples)
    }

    /// Decodes one message into the named decoder; see [`Decoder::decode`].
    pub fn decode(&mut self, id: Uuid, bytes: &[u8]) -> Result<(), CodecError> {
        self.decoders
            .get_mut(&id)
            .ok_or(CodecError::UnknownSession {
                id,
                role: SessionRole::Decoder,
            })?
            .decode(bytes)
    }

    /// Returns one element of the named decoder's stored dataset.
    pub fn get_decoded_index(
        &self,
        id: Uuid,
        sample_index: usize,
        value_index: usize,
    ) -> Result<DecodedPoint, CodecError> {
        self.decoders
            .get(&id)
            .ok_or(CodecError::UnknownSession {
                id,
                role: SessionRole::Decoder,
            })?
            .get(sample_index, value_index)
    }

    /// Bulk-copies the named decoder's stored dataset into caller-owned,
    /// pre-sized storage; see [`Decoder::copy_decoded`].
    pub fn get_decoded(&self, id: Uuid, dest: &mut [Sample]) -> Result<usize, CodecError> {
        self.decoders
            .get(&id)
            .ok_or(CodecError::UnknownSession {
                id,
                role: SessionRole::Decoder,
            })?
            .copy_decoded(dest)
    }
}
