//! # Gridstream
//!
//! A lossless streaming codec for fixed-shape, periodically sampled
//! multi-channel integer measurement streams, such as three-phase
//! current/voltage waveforms from power-grid monitoring. Every value carries
//! a 32-bit quality annotation (0 = good).
//!
//! ## Compression scheme
//!
//! The codec exploits two properties of smoothly varying periodic
//! measurements:
//!
//! - **Timestamps** of periodically sampled data are near-constant-stride, so
//!   they are stored as a base value plus unsigned varint deltas.
//!
//! - **Values** on a single channel change little between adjacent samples,
//!   so each channel is stored columnar as a first absolute value plus
//!   zigzag varint deltas. Small deltas take one byte.
//!
//! Quality flags are overwhelmingly zero in practice, so they cost one bit
//! each in a presence bitmap; only non-zero flags are stored raw.
//!
//! ## Sessions
//!
//! Encoding and decoding are session-based: a [`Codec`] registry maps opaque
//! 16-byte identifiers (`Uuid`) to per-stream encoder and decoder state. An
//! encoder session accumulates samples one at a time and emits an owned
//! message buffer each time `samples_per_message` is reached; a decoder
//! session parses messages and keeps the last decoded dataset for retrieval.
//!
//! ## Example
//!
//! ```rust
//! use gridstream::{Codec, Sample};
//! use uuid::Uuid;
//!
//! let mut codec = Codec::new();
//! let id = Uuid::from_u128(0xCAFE);
//!
//! // Encoder and decoder are configured independently with the same shape:
//! // 3 channels, 4000 Hz, 2 samples per message.
//! codec.create_encoder(id, 3, 4000, 2).unwrap();
//! codec.create_decoder(id, 3, 4000, 2).unwrap();
//!
//! // Stream samples in; a message appears when the quota fills.
//! assert!(codec
//!     .encode_one(id, Sample::new(0, vec![100, -50, 0], vec![0, 0, 0]))
//!     .unwrap()
//!     .is_none());
//! let message = codec
//!     .encode_one(id, Sample::new(250, vec![101, -49, 1], vec![0, 0, 0]))
//!     .unwrap()
//!     .expect("quota reached");
//!
//! // Decode and read back, losslessly.
//! codec.decode(id, &message).unwrap();
//! let point = codec.get_decoded_index(id, 1, 2).unwrap();
//! assert_eq!((point.timestamp, point.value, point.quality), (250, 1, 0));
//! ```
//!
//! The engines are also usable directly, without a registry, via
//! [`Encoder`] and [`Decoder`].

pub mod decoder;
pub mod encoder;
pub mod error;
pub mod message;
pub mod registry;
pub mod varint;

// Re-export primary types at the crate root.
pub use decoder::{DecodedPoint, Decoder};
pub use encoder::{Encoder, SessionConfig};
pub use error::{CodecError, SessionRole};
pub use message::{Sample, FORMAT_VERSION};
pub use registry::Codec;
