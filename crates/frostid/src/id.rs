use core::fmt;

/// A 64-bit packed identifier.
///
/// - 36 bits timestamp (ms since [`FROST_EPOCH`])
/// - 16 bits worker ID
/// - 12 bits sequence
///
/// ```text
///  Bit Index:  63             28 27             12 11             0
///              +----------------+----------------+---------------+
///  Field:      | timestamp (36) | worker ID (16) | sequence (12) |
///              +----------------+----------------+---------------+
///              |<----- MSB ---------- 64 bits -------- LSB ----->|
/// ```
///
/// The timestamp occupies the high-order bits, so comparing two IDs as
/// unsigned integers orders them by generation time first, then worker, then
/// sequence. The 36-bit field holds roughly 2178 years past the epoch.
///
/// [`FROST_EPOCH`]: crate::FROST_EPOCH
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrostId {
    id: u64,
}

impl FrostId {
    /// Bitmask for extracting the 36-bit timestamp field. Occupies bits 28
    /// through 63.
    pub const TIMESTAMP_MASK: u64 = (1 << 36) - 1;

    /// Bitmask for extracting the 16-bit worker ID field. Occupies bits 12
    /// through 27.
    pub const WORKER_ID_MASK: u64 = (1 << 16) - 1;

    /// Bitmask for extracting the 12-bit sequence field. Occupies bits 0
    /// through 11.
    pub const SEQUENCE_MASK: u64 = (1 << 12) - 1;

    /// Number of bits to shift the timestamp to its correct position (bit 28).
    pub const TIMESTAMP_SHIFT: u64 = 28;

    /// Number of bits to shift the worker ID to its correct position (bit 12).
    pub const WORKER_ID_SHIFT: u64 = 12;

    /// Number of bits to shift the sequence field (bit 0).
    pub const SEQUENCE_SHIFT: u64 = 0;

    /// Packs the three fields into an ID.
    ///
    /// Each field is masked to its bit width before shifting, so out-of-range
    /// high-order bits never bleed into neighboring fields.
    pub const fn from_parts(timestamp: u64, worker_id: u64, sequence: u64) -> Self {
        let timestamp = (timestamp & Self::TIMESTAMP_MASK) << Self::TIMESTAMP_SHIFT;
        let worker_id = (worker_id & Self::WORKER_ID_MASK) << Self::WORKER_ID_SHIFT;
        let sequence = (sequence & Self::SEQUENCE_MASK) << Self::SEQUENCE_SHIFT;
        Self {
            id: timestamp | worker_id | sequence,
        }
    }

    /// Packs the three fields into an ID, asserting field bounds in debug
    /// builds.
    pub fn from_components(timestamp: u64, worker_id: u64, sequence: u64) -> Self {
        debug_assert!(timestamp <= Self::TIMESTAMP_MASK, "timestamp overflow");
        debug_assert!(worker_id <= Self::WORKER_ID_MASK, "worker_id overflow");
        debug_assert!(sequence <= Self::SEQUENCE_MASK, "sequence overflow");
        Self::from_parts(timestamp, worker_id, sequence)
    }

    /// Extracts the timestamp from the packed ID.
    pub const fn timestamp(&self) -> u64 {
        (self.id >> Self::TIMESTAMP_SHIFT) & Self::TIMESTAMP_MASK
    }

    /// Extracts the worker ID from the packed ID.
    pub const fn worker_id(&self) -> u64 {
        (self.id >> Self::WORKER_ID_SHIFT) & Self::WORKER_ID_MASK
    }

    /// Extracts the sequence number from the packed ID.
    pub const fn sequence(&self) -> u64 {
        (self.id >> Self::SEQUENCE_SHIFT) & Self::SEQUENCE_MASK
    }

    /// Maximum value of the timestamp field.
    pub const fn max_timestamp() -> u64 {
        Self::TIMESTAMP_MASK
    }

    /// Maximum value of the worker ID field.
    pub const fn max_worker_id() -> u64 {
        Self::WORKER_ID_MASK
    }

    /// Maximum value of the sequence field.
    pub const fn max_sequence() -> u64 {
        Self::SEQUENCE_MASK
    }

    /// Converts this ID into its raw `u64` representation.
    pub const fn to_raw(&self) -> u64 {
        self.id
    }

    /// Converts a raw `u64` into an ID.
    pub const fn from_raw(raw: u64) -> Self {
        Self { id: raw }
    }

    /// Returns true if the current sequence value can be incremented without
    /// leaving the field.
    pub const fn has_sequence_room(&self) -> bool {
        self.sequence() < Self::max_sequence()
    }

    /// Returns a new ID with the sequence incremented.
    pub fn increment_sequence(&self) -> Self {
        Self::from_components(self.timestamp(), self.worker_id(), self.sequence() + 1)
    }

    /// Returns a new ID for a newer timestamp with the sequence reset to
    /// zero.
    pub fn rollover_to_timestamp(&self, ts: u64) -> Self {
        Self::from_components(ts, self.worker_id(), 0)
    }

    /// Returns the ID as a zero-padded 20-digit string.
    ///
    /// Padded strings sort lexicographically in the same order as the raw
    /// integers.
    pub fn to_padded_string(&self) -> String {
        format!("{:020}", self.id)
    }
}

impl From<FrostId> for u64 {
    fn from(id: FrostId) -> Self {
        id.to_raw()
    }
}

impl fmt::Display for FrostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl fmt::Debug for FrostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrostId")
            .field("id", &self.id)
            .field("timestamp", &self.timestamp())
            .field("worker_id", &self.worker_id())
            .field("sequence", &self.sequence())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_and_bounds() {
        let ts = FrostId::max_timestamp();
        let wid = FrostId::max_worker_id();
        let seq = FrostId::max_sequence();

        let id = FrostId::from_parts(ts, wid, seq);
        assert_eq!(id.timestamp(), ts);
        assert_eq!(id.worker_id(), wid);
        assert_eq!(id.sequence(), seq);
        assert_eq!(FrostId::from_components(ts, wid, seq), id);
        // 36 + 16 + 12 bits cover the whole word
        assert_eq!(id.to_raw(), u64::MAX);
    }

    #[test]
    fn round_trips_through_raw() {
        let id = FrostId::from_parts(123_456_789, 515, 42);
        let raw = id.to_raw();
        let back = FrostId::from_raw(raw);
        assert_eq!(back, id);
        assert_eq!(back.timestamp(), 123_456_789);
        assert_eq!(back.worker_id(), 515);
        assert_eq!(back.sequence(), 42);
        assert_eq!(u64::from(id), raw);
    }

    #[test]
    fn packing_masks_out_of_range_fields() {
        // High-order bits past the field width must never reach the result.
        let id = FrostId::from_parts(FrostId::max_timestamp() + 1, 0, 0);
        assert_eq!(id.timestamp(), 0);
        assert_eq!(id.to_raw(), 0);

        let id = FrostId::from_parts(0, FrostId::max_worker_id() + 1, 0);
        assert_eq!(id.worker_id(), 0);
        assert_eq!(id.to_raw(), 0);
    }

    #[test]
    fn timestamp_dominates_ordering() {
        let lo = FrostId::from_parts(1, FrostId::max_worker_id(), FrostId::max_sequence());
        let hi = FrostId::from_parts(2, 0, 0);
        assert!(hi > lo);
        assert!(hi.to_raw() > lo.to_raw());
    }

    #[test]
    fn sequence_room() {
        let id = FrostId::from_parts(1, 1, FrostId::max_sequence() - 1);
        assert!(id.has_sequence_room());
        assert!(!id.increment_sequence().has_sequence_room());
    }

    #[test]
    fn rollover_resets_sequence_and_keeps_worker() {
        let id = FrostId::from_parts(41, 7, 99);
        let next = id.rollover_to_timestamp(42);
        assert_eq!(next.timestamp(), 42);
        assert_eq!(next.worker_id(), 7);
        assert_eq!(next.sequence(), 0);
    }

    #[test]
    fn padded_string_sorts_like_the_integer() {
        let a = FrostId::from_parts(1, 2, 3);
        let b = FrostId::from_parts(1, 2, 4);
        let c = FrostId::from_parts(2, 0, 0);
        assert_eq!(a.to_padded_string().len(), 20);
        assert!(a.to_padded_string() < b.to_padded_string());
        assert!(b.to_padded_string() < c.to_padded_string());
    }

    #[test]
    fn display_prints_the_raw_integer() {
        let id = FrostId::from_parts(1, 2, 3);
        assert_eq!(format!("{id}"), id.to_raw().to_string());
    }

    #[test]
    #[should_panic(expected = "timestamp overflow")]
    fn timestamp_overflow_panics() {
        let ts = FrostId::max_timestamp() + 1;
        FrostId::from_components(ts, 0, 0);
    }

    #[test]
    #[should_panic(expected = "worker_id overflow")]
    fn worker_id_overflow_panics() {
        let wid = FrostId::max_worker_id() + 1;
        FrostId::from_components(0, wid, 0);
    }

    #[test]
    #[should_panic(expected = "sequence overflow")]
    fn sequence_overflow_panics() {
        let seq = FrostId::max_sequence() + 1;
        FrostId::from_components(0, 0, seq);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_round_trip() {
        let id = FrostId::from_parts(123, 456, 789);
        let json = serde_json::to_string(&id).unwrap();
        let back: FrostId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
