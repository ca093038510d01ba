use crate::error::CodecError;
use crate::varint::{self, ByteReader};

/// Current wire format version. Messages declaring any other version are
/// rejected by [`parse`].
pub const FORMAT_VERSION: u8 = 1;

/// One sampling instant: a timestamp plus one value and one quality flag per
/// channel (quality 0 = good).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    pub timestamp: u64,
    pub values: Vec<i32>,
    pub qualities: Vec<u32>,
}

impl Sample {
    /// Creates a new `Sample`.
    pub fn new(timestamp: u64, values: Vec<i32>, qualities: Vec<u32>) -> Self {
        Self {
            timestamp,
            values,
            qualities,
        }
    }

    /// Creates an all-zero sample pre-sized for `channel_count` channels.
    /// Useful for building destination buffers for bulk retrieval.
    pub fn zeroed(channel_count: usize) -> Self {
        Self {
            timestamp: 0,
            values: vec![0; channel_count],
            qualities: vec![0; channel_count],
        }
    }
}

/// Serializes `samples` into one self-describing message.
///
/// Layout: version byte, varint channel count, varint sample count, varint
/// base timestamp, unsigned varint timestamp deltas, then per channel the
/// first value followed by signed varint deltas (columnar), then a presence
/// bitmap over all (sample, channel) quality flags followed by the raw u32
/// value for each set bit.
///
/// The caller must have validated that every sample carries exactly
/// `channel_count` values and qualities. Timestamps must be non-decreasing.
pub fn serialize(channel_count: usize, samples: &[Sample]) -> Result<Vec<u8>, CodecError> {
    debug_assert!(!samples.is_empty());
    debug_assert!(samples
        .iter()
        .all(|s| s.values.len() == channel_count && s.qualities.len() == channel_count));

    let mut buf = Vec::with_capacity(16 + samples.len() * channel_count * 2);
    buf.push(FORMAT_VERSION);
    varint::write_u64(&mut buf, channel_count as u64);
    varint::write_u64(&mut buf, samples.len() as u64);

    varint::write_u64(&mut buf, samples[0].timestamp);
    for pair in samples.windows(2) {
        let delta = pair[1]
            .timestamp
            .checked_sub(pair[0].timestamp)
            .ok_or(CodecError::MalformedMessage {
                reason: "decreasing timestamp",
            })?;
        varint::write_u64(&mut buf, delta);
    }

    // Columnar value section: each channel is smoother on its own than an
    // interleaved row, so per-channel deltas stay small.
    for ch in 0..channel_count {
        varint::write_i64(&mut buf, i64::from(samples[0].values[ch]));
        for pair in samples.windows(2) {
            let delta = i64::from(pair[1].values[ch]) - i64::from(pair[0].values[ch]);
            varint::write_i64(&mut buf, delta);
        }
    }

    // Quality presence bitmap, one bit per (sample, channel), MSB-first.
    let flag_count = samples.len() * channel_count;
    let bitmap_start = buf.len();
    buf.resize(bitmap_start + flag_count.div_ceil(8), 0);
    let mut idx = 0;
    for sample in samples {
        for &q in &sample.qualities {
            if q != 0 {
                buf[bitmap_start + idx / 8] |= 1 << (7 - idx % 8);
            }
            idx += 1;
        }
    }
    for sample in samples {
        for &q in &sample.qualities {
            if q != 0 {
                buf.extend_from_slice(&q.to_be_bytes());
            }
        }
    }

    Ok(buf)
}

/// Parses one message, validating it against the expected channel count and a
/// sample-count ceiling, and reconstructs the original samples.
///
/// The whole buffer must be consumed; trailing bytes are malformed.
pub fn parse(
    bytes: &[u8],
    channel_count: usize,
    max_samples: usize,
) -> Result<Vec<Sample>, CodecError> {
    let mut reader = ByteReader::new(bytes);

    let version = reader.read_u8()?;
    if version != FORMAT_VERSION {
        return Err(CodecError::MalformedMessage {
            reason: "unknown format version",
        });
    }

    let declared_channels = reader.read_count()?;
    if declared_channels != channel_count {
        return Err(CodecError::SchemaMismatch {
            expected: channel_count,
            actual: declared_channels,
        });
    }

    let sample_count = reader.read_count()?;
    if sample_count == 0 || sample_count > max_samples {
        return Err(CodecError::MalformedMessage {
            reason: "sample count out of range",
        });
    }

    // Timestamps: cumulative sum of deltas from the base.
    let mut timestamps = Vec::with_capacity(sample_count);
    let mut t = reader.read_u64()?;
    timestamps.push(t);
    for _ in 1..sample_count {
        let delta = reader.read_u64()?;
        t = t.checked_add(delta).ok_or(CodecError::MalformedMessage {
            reason: "timestamp overflow",
        })?;
        timestamps.push(t);
    }

    let mut samples: Vec<Sample> = timestamps
        .into_iter()
        .map(|timestamp| Sample {
            timestamp,
            values: Vec::with_capacity(channel_count),
            qualities: vec![0; channel_count],
        })
        .collect();

    // Values: per-channel cumulative sum from each channel's first value.
    for _ in 0..channel_count {
        let mut value = read_channel_value(&mut reader, None)?;
        samples[0].values.push(value as i32);
        for sample in samples.iter_mut().skip(1) {
            value = read_channel_value(&mut reader, Some(value))?;
            sample.values.push(value as i32);
        }
    }

    // Qualities: default 0, overwritten at bitmap-set positions in order.
    let flag_count = sample_count * channel_count;
    let bitmap = reader.read_exact(flag_count.div_ceil(8))?;
    for idx in 0..flag_count {
        if bitmap[idx / 8] & (1 << (7 - idx % 8)) != 0 {
            let raw: [u8; 4] = reader.read_exact(4)?.try_into().unwrap();
            samples[idx / channel_count].qualities[idx % channel_count] =
                u32::from_be_bytes(raw);
        }
    }

    if !reader.is_exhausted() {
        return Err(CodecError::MalformedMessage {
            reason: "trailing bytes after message",
        });
    }

    Ok(samples)
}

/// Reads the next value of a channel column: the absolute first value when
/// `previous` is `None`, otherwise the previous value plus a signed delta.
/// The result must fit in an i32.
fn read_channel_value(reader: &mut ByteReader<'_>, previous: Option<i64>) -> Result<i64, CodecError> {
    let raw = reader.read_i64()?;
    let value = match previous {
        None => raw,
        Some(prev) => prev.checked_add(raw).ok_or(CodecError::MalformedMessage {
            reason: "value delta overflow",
        })?,
    };
    if value < i64::from(i32::MIN) || value > i64::from(i32::MAX) {
        return Err(CodecError::MalformedMessage {
            reason: "channel value out of i32 range",
        });
    }
    Ok(value)
}
