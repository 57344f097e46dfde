use crate::{FlakeLayout, MicrosLayout, NarrowSidLayout, WideSidLayout};
use core::{fmt, marker::PhantomData};
use std::time::{SystemTime, UNIX_EPOCH};

/// The identity bytes of a flake: exactly `L::IDENTITY_BYTES` bytes.
///
/// Construction from a byte slice is total. Input shorter than the field is
/// left-padded with zero bytes, input longer than the field keeps only its
/// first `L::IDENTITY_BYTES` bytes.
///
/// ```
/// use flakeid::{Identity, NarrowSidLayout};
///
/// let id = Identity::<NarrowSidLayout>::new(b"hello");
/// assert_eq!(id.as_bytes(), &[0, 0, 0, b'h', b'e', b'l', b'l', b'o']);
///
/// let id = Identity::<NarrowSidLayout>::new(b"hello123abc");
/// assert_eq!(id.as_bytes(), b"hello123");
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Identity<L> {
    // Right-aligned: the identity occupies the last `L::IDENTITY_BYTES`.
    bytes: [u8; 16],
    _layout: PhantomData<L>,
}

impl<L: FlakeLayout> Identity<L> {
    /// Normalizes `raw` into an identity of exactly `L::IDENTITY_BYTES`
    /// bytes.
    pub fn new(raw: &[u8]) -> Self {
        let width = L::IDENTITY_BYTES;
        let take = raw.len().min(width);
        let mut bytes = [0; 16];
        bytes[16 - take..].copy_from_slice(&raw[..take]);
        Self {
            bytes,
            _layout: PhantomData,
        }
    }

    /// Builds an identity from the low `L::IDENTITY_BITS` bits of `raw`.
    pub const fn from_raw(raw: u128) -> Self {
        Self {
            bytes: (raw & L::IDENTITY_MASK).to_be_bytes(),
            _layout: PhantomData,
        }
    }

    /// The identity as an integer, right-aligned.
    pub const fn to_raw(&self) -> u128 {
        u128::from_be_bytes(self.bytes)
    }

    /// The identity bytes, most significant first.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[16 - L::IDENTITY_BYTES..]
    }

    /// An owned copy of the identity bytes.
    pub fn to_vec(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }
}

impl<L: FlakeLayout> Default for Identity<L> {
    fn default() -> Self {
        Self::new(&[])
    }
}

impl<L: FlakeLayout> From<&[u8]> for Identity<L> {
    fn from(raw: &[u8]) -> Self {
        Self::new(raw)
    }
}

impl<L: FlakeLayout, const N: usize> From<&[u8; N]> for Identity<L> {
    fn from(raw: &[u8; N]) -> Self {
        Self::new(raw)
    }
}

impl<L: FlakeLayout> AsRef<[u8]> for Identity<L> {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl<L: FlakeLayout> fmt::Debug for Identity<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identity(")?;
        for b in self.as_bytes() {
            write!(f, "{b:02x}")?;
        }
        write!(f, ")")
    }
}

/// A 128-bit flake laid out according to `L`.
///
/// Fields are packed from the most significant bit down: timestamp, sequence,
/// secondary ID, identity. The derived ordering compares the packed `u128`,
/// which is the same order as comparing [`to_bytes`](Self::to_bytes)
/// lexicographically, so flakes sort by creation time.
///
/// ```
/// use flakeid::{Identity, WideSidFlake};
///
/// let flake = WideSidFlake::pack(1_000, 7, 1211, Identity::new(b"hello12"));
/// assert_eq!(flake.timestamp(), 1_000);
/// assert_eq!(flake.sequence(), 7);
/// assert_eq!(flake.secondary_id(), 1211);
/// assert_eq!(flake.id().as_bytes(), b"hello12");
/// ```
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent, bound = "")
)]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Flake<L> {
    id: u128,
    #[cfg_attr(feature = "serde", serde(skip))]
    _layout: PhantomData<L>,
}

/// A flake in the [`WideSidLayout`].
pub type WideSidFlake = Flake<WideSidLayout>;

/// A flake in the [`NarrowSidLayout`].
pub type NarrowSidFlake = Flake<NarrowSidLayout>;

/// A flake in the [`MicrosLayout`].
pub type MicrosFlake = Flake<MicrosLayout>;

impl<L: FlakeLayout> Flake<L> {
    /// Packs the four fields into a flake.
    ///
    /// - `timestamp` is in ticks since `L::EPOCH`. Only its low
    ///   `L::TIMESTAMP_BITS` bits are kept, so a timestamp past the field's
    ///   range wraps silently.
    /// - `sequence` is expected to be reduced by the layout's policy already.
    ///   Only its low `L::SEQUENCE_BITS` bits are kept; wider values are
    ///   masked, never rejected.
    /// - `secondary_id` is masked to `L::SECONDARY_ID_BITS` here; callers do
    ///   not need to pre-mask it, but wider values are truncated.
    /// - `identity` is placed verbatim in the low bytes.
    pub fn pack(timestamp: u64, sequence: u64, secondary_id: u64, identity: Identity<L>) -> Self {
        let timestamp = u128::from(timestamp & L::TIMESTAMP_MASK) << L::TIMESTAMP_SHIFT;
        let sequence = u128::from(sequence & L::SEQUENCE_MASK) << L::SEQUENCE_SHIFT;
        let secondary_id = u128::from(secondary_id & L::SECONDARY_ID_MASK) << L::SECONDARY_ID_SHIFT;
        Self::from_raw(timestamp | sequence | secondary_id | identity.to_raw())
    }

    /// Wraps a raw `u128` without validation; every bit pattern is a valid
    /// flake.
    pub const fn from_raw(raw: u128) -> Self {
        Self {
            id: raw,
            _layout: PhantomData,
        }
    }

    /// The packed flake as an integer.
    pub const fn to_raw(&self) -> u128 {
        self.id
    }

    /// Decodes a flake from its 16-byte big-endian form.
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self::from_raw(u128::from_be_bytes(bytes))
    }

    /// The flake's 16-byte big-endian form.
    pub const fn to_bytes(&self) -> [u8; 16] {
        self.id.to_be_bytes()
    }

    /// Extracts the raw timestamp field: ticks since `L::EPOCH`.
    pub const fn timestamp(&self) -> u64 {
        (self.id >> L::TIMESTAMP_SHIFT) as u64 & L::TIMESTAMP_MASK
    }

    /// Extracts the sequence field.
    pub const fn sequence(&self) -> u64 {
        (self.id >> L::SEQUENCE_SHIFT) as u64 & L::SEQUENCE_MASK
    }

    /// Extracts the secondary ID field, zero-extended. Always zero for
    /// layouts without a secondary ID.
    pub const fn secondary_id(&self) -> u64 {
        (self.id >> L::SECONDARY_ID_SHIFT) as u64 & L::SECONDARY_ID_MASK
    }

    /// Returns a copy of the identity bytes.
    pub const fn id(&self) -> Identity<L> {
        Identity::from_raw(self.id)
    }

    /// The absolute creation time in `L::UNIT` ticks since the Unix epoch:
    /// the timestamp field plus the layout epoch.
    pub const fn time(&self) -> u64 {
        self.timestamp() + L::UNIT.ticks(L::EPOCH)
    }

    /// The creation time as a [`SystemTime`].
    pub fn system_time(&self) -> SystemTime {
        UNIX_EPOCH + L::EPOCH + L::UNIT.duration(self.timestamp())
    }
}

impl<L: FlakeLayout> fmt::Display for Flake<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", self.id)
    }
}

impl<L: FlakeLayout> fmt::Debug for Flake<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(L::name())
            .field("id", &format_args!("0x{:032x}", self.id))
            .field("timestamp", &self.timestamp())
            .field("sequence", &self.sequence())
            .field("secondary_id", &self.secondary_id())
            .field("identity", &self.id())
            .finish()
    }
}

impl<L: FlakeLayout> From<Flake<L>> for [u8; 16] {
    fn from(flake: Flake<L>) -> Self {
        flake.to_bytes()
    }
}

impl<L: FlakeLayout> From<[u8; 16]> for Flake<L> {
    fn from(bytes: [u8; 16]) -> Self {
        Self::from_bytes(bytes)
    }
}
