use core::fmt;

use crate::{ConfigError, Result};

/// Default width of the per-millisecond sequence counter.
pub const DEFAULT_SEQUENCE_BITS: u8 = 12;

/// Default width of the worker ID field.
pub const DEFAULT_WORKER_BITS: u8 = 10;

/// Upper bound on `sequence_bits + worker_bits`.
///
/// Keeps at least 35 of the 63 usable bits for the timestamp.
pub const MAX_LAYOUT_BITS: u8 = 28;

/// Number of bits an ID may occupy. Bit 63 is always zero so that every ID
/// is also a non-negative `i64`.
const ID_BITS: u8 = 63;

/// The bit layout of a Snowflake-style ID with runtime-configurable field
/// widths.
///
/// ```text
///  Bit Index:  63           63 62       shift   shift-1       seq   seq-1      0
///              +--------------+----------------+-----------------+---------------+
///  Field:      | reserved (1) |   timestamp    |    worker ID    |   sequence    |
///              +--------------+----------------+-----------------+---------------+
///              |<----------- MSB ---------- 64 bits ----------- LSB ------------>|
/// ```
///
/// where `seq = sequence_bits` and `shift = sequence_bits + worker_bits`.
///
/// # Example
///
/// ```
/// use snowmint::Layout;
///
/// let layout = Layout::default();
/// let id = layout.compose(1000, 2, 1);
/// assert_eq!(layout.timestamp(id), 1000);
/// assert_eq!(layout.worker_id(id), 2);
/// assert_eq!(layout.sequence(id), 1);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Layout {
    sequence_bits: u8,
    worker_bits: u8,
}

impl Default for Layout {
    /// 12 sequence bits, 10 worker bits and 41 timestamp bits.
    fn default() -> Self {
        Self {
            sequence_bits: DEFAULT_SEQUENCE_BITS,
            worker_bits: DEFAULT_WORKER_BITS,
        }
    }
}

impl Layout {
    /// Creates a layout with the given field widths.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::LayoutTooWide`] if `sequence_bits + worker_bits`
    /// exceeds [`MAX_LAYOUT_BITS`].
    pub const fn new(sequence_bits: u8, worker_bits: u8) -> Result<Self, ConfigError> {
        if sequence_bits as u16 + worker_bits as u16 > MAX_LAYOUT_BITS as u16 {
            return Err(ConfigError::LayoutTooWide {
                sequence_bits,
                worker_bits,
            });
        }
        Ok(Self {
            sequence_bits,
            worker_bits,
        })
    }

    /// Width of the sequence field.
    pub const fn sequence_bits(&self) -> u8 {
        self.sequence_bits
    }

    /// Width of the worker ID field.
    pub const fn worker_bits(&self) -> u8 {
        self.worker_bits
    }

    /// Width of the timestamp field.
    pub const fn timestamp_bits(&self) -> u8 {
        ID_BITS - self.timestamp_shift()
    }

    /// Number of bits to shift the worker ID to its position.
    pub const fn worker_shift(&self) -> u8 {
        self.sequence_bits
    }

    /// Number of bits to shift the timestamp to its position.
    pub const fn timestamp_shift(&self) -> u8 {
        self.sequence_bits + self.worker_bits
    }

    /// Largest sequence value within one millisecond.
    pub const fn max_sequence(&self) -> u64 {
        mask(self.sequence_bits)
    }

    /// Largest worker ID the layout can hold.
    pub const fn max_worker_id(&self) -> u64 {
        mask(self.worker_bits)
    }

    /// Largest timestamp the layout can hold, in milliseconds since the
    /// epoch.
    pub const fn max_timestamp(&self) -> u64 {
        mask(self.timestamp_bits())
    }

    /// Checks that `worker_id` fits this layout.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::WorkerIdOutOfRange`] if it does not.
    pub const fn check_worker_id(&self, worker_id: u64) -> Result<u64, ConfigError> {
        let max = self.max_worker_id();
        if worker_id > max {
            return Err(ConfigError::WorkerIdOutOfRange { worker_id, max });
        }
        Ok(worker_id)
    }

    /// Packs the three components into an ID. Each component is truncated to
    /// its field width.
    pub const fn compose(&self, timestamp: u64, worker_id: u64, sequence: u64) -> u64 {
        let timestamp = (timestamp & self.max_timestamp()) << self.timestamp_shift();
        let worker_id = (worker_id & self.max_worker_id()) << self.worker_shift();
        let sequence = sequence & self.max_sequence();
        timestamp | worker_id | sequence
    }

    /// Extracts the timestamp from a packed ID.
    pub const fn timestamp(&self, id: u64) -> u64 {
        (id >> self.timestamp_shift()) & self.max_timestamp()
    }

    /// Extracts the worker ID from a packed ID.
    pub const fn worker_id(&self, id: u64) -> u64 {
        (id >> self.worker_shift()) & self.max_worker_id()
    }

    /// Extracts the sequence from a packed ID.
    pub const fn sequence(&self, id: u64) -> u64 {
        id & self.max_sequence()
    }

    /// Splits a packed ID into its components.
    pub const fn decode(&self, id: u64) -> IdParts {
        IdParts {
            timestamp: self.timestamp(id),
            worker_id: self.worker_id(id),
            sequence: self.sequence(id),
        }
    }
}

/// The decoded components of an ID.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IdParts {
    /// Milliseconds since the generator's epoch.
    pub timestamp: u64,
    /// The worker that issued the ID.
    pub worker_id: u64,
    /// Position within the millisecond.
    pub sequence: u64,
}

impl fmt::Display for IdParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "timestamp={} worker_id={} sequence={}",
            self.timestamp, self.worker_id, self.sequence
        )
    }
}

const fn mask(bits: u8) -> u64 {
    if bits >= 64 {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}
