use naia_serde::{BitReader, BitWrite, BitWriter, Serde, SerdeErr, UnsignedVariableInteger};

use crate::{error::MetadataError, types::SequenceNumber};

/// Sequencing information attached to every message crossing the layer.
///
/// `seq` is the number of this message in the sender's stream, `next` is the
/// number the sender will use for its following message. `next` need not be
/// `seq + 1`; the receiver always resumes at whatever `next` announces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Metadata {
    pub seq: SequenceNumber,
    pub next: SequenceNumber,
}

impl Metadata {
    pub fn new(seq: SequenceNumber, next: SequenceNumber) -> Self {
        Self { seq, next }
    }

    /// Checks that following `next` moves a receiver forward.
    ///
    /// A `next` at or below `seq` would let a receiver's window go backwards
    /// or stall on a key it already consumed.
    pub fn validate(&self) -> Result<(), MetadataError> {
        if self.next <= self.seq {
            return Err(MetadataError::NonAdvancingNext {
                seq: self.seq,
                next: self.next,
            });
        }
        Ok(())
    }

    /// Encodes this metadata into its wire form
    pub fn to_bytes(&self) -> Box<[u8]> {
        let mut writer = BitWriter::new();
        self.ser(&mut writer);
        writer.to_bytes().into()
    }

    /// Decodes and validates metadata from its wire form.
    ///
    /// Only the two leading integers are read. Any bytes after them are
    /// ignored, so transports may append their own data.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, MetadataError> {
        let mut reader = BitReader::new(bytes);
        let metadata = Self::de(&mut reader).map_err(|_| MetadataError::Decode)?;
        metadata.validate()?;
        Ok(metadata)
    }
}

// Both numbers are written as variable-length integers, so small early
// sequence numbers stay cheap on the wire.
impl Serde for Metadata {
    fn ser(&self, writer: &mut dyn BitWrite) {
        UnsignedVariableInteger::<7>::new(self.seq).ser(writer);
        UnsignedVariableInteger::<7>::new(self.next).ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let seq = read_sequence_number(reader)?;
        let next = read_sequence_number(reader)?;
        Ok(Self { seq, next })
    }

    fn bit_length(&self) -> u32 {
        UnsignedVariableInteger::<7>::new(self.seq).bit_length()
            + UnsignedVariableInteger::<7>::new(self.next).bit_length()
    }
}

const CHUNK_BITS: u32 = 7;
// ceil(64 / 7): no u64 needs more chunks than this
const MAX_CHUNKS: u32 = 10;

/// Reads one integer in the layout written by `UnsignedVariableInteger<7>`:
/// a continuation bit followed by 7 value bits, least significant first.
///
/// SECURITY: a peer controls the continuation bits, so the chunk count is
/// capped and any value past u64 is rejected instead of truncated.
fn read_sequence_number(reader: &mut BitReader) -> Result<SequenceNumber, SerdeErr> {
    let mut value: SequenceNumber = 0;

    for chunk in 0..MAX_CHUNKS {
        let proceed = reader.read_bit()?;
        for bit in 0..CHUNK_BITS {
            if reader.read_bit()? {
                let shift = chunk * CHUNK_BITS + bit;
                if shift >= SequenceNumber::BITS {
                    return Err(SerdeErr);
                }
                value |= 1 << shift;
            }
        }
        if !proceed {
            return Ok(value);
        }
    }

    Err(SerdeErr)
}
