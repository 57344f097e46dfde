use crate::{SequencePolicy, TimeUnit};
use core::{fmt, hash::Hash, time::Duration};

/// Returns a `u64` with the low `bits` bits set.
#[doc(hidden)]
pub const fn low_mask_u64(bits: u32) -> u64 {
    if bits >= u64::BITS {
        u64::MAX
    } else {
        (1 << bits) - 1
    }
}

/// Returns a `u128` with the low `bits` bits set.
#[doc(hidden)]
pub const fn low_mask_u128(bits: u32) -> u128 {
    if bits >= u128::BITS {
        u128::MAX
    } else {
        (1 << bits) - 1
    }
}

/// The bit layout of one flake variant.
///
/// A layout is a zero-sized marker type whose associated constants fix every
/// field width, the timestamp unit and epoch, and the sequence reduction
/// policy. Nothing about a layout varies at runtime.
///
/// Implement it with [`define_flake_layout!`], which checks at compile time
/// that the fields account for exactly 128 bits:
///
/// ```text
///  T + S + D + 8 * I == 128
/// ```
///
/// Derived constants (shifts and masks) are provided and should not be
/// overridden.
pub trait FlakeLayout:
    Copy + Clone + Default + fmt::Debug + PartialEq + Eq + PartialOrd + Ord + Hash + Send + Sync + 'static
{
    /// Width of the timestamp field (T).
    const TIMESTAMP_BITS: u32;

    /// Width of the sequence field (S).
    const SEQUENCE_BITS: u32;

    /// Width of the secondary ID field (D). Zero when the layout has none.
    const SECONDARY_ID_BITS: u32;

    /// Width of the identity field in bytes (I).
    const IDENTITY_BYTES: usize;

    /// Resolution of the timestamp field.
    const UNIT: TimeUnit;

    /// How the sequence counter is reduced into its field.
    const SEQUENCE_POLICY: SequencePolicy;

    /// Origin of the timestamp field, as a duration since the Unix epoch.
    const EPOCH: Duration = crate::FLAKE_EPOCH;

    /// Width of the identity field in bits.
    const IDENTITY_BITS: u32 = Self::IDENTITY_BYTES as u32 * 8;

    /// Number of bits to shift the secondary ID to its position (directly
    /// above the identity).
    const SECONDARY_ID_SHIFT: u32 = Self::IDENTITY_BITS;

    /// Number of bits to shift the sequence to its position.
    const SEQUENCE_SHIFT: u32 = Self::SECONDARY_ID_SHIFT + Self::SECONDARY_ID_BITS;

    /// Number of bits to shift the timestamp to its position (the top bits).
    const TIMESTAMP_SHIFT: u32 = Self::SEQUENCE_SHIFT + Self::SEQUENCE_BITS;

    /// Bitmask for the timestamp field, before shifting.
    const TIMESTAMP_MASK: u64 = low_mask_u64(Self::TIMESTAMP_BITS);

    /// Bitmask for the sequence field, before shifting.
    const SEQUENCE_MASK: u64 = low_mask_u64(Self::SEQUENCE_BITS);

    /// Bitmask for the secondary ID field, before shifting.
    const SECONDARY_ID_MASK: u64 = low_mask_u64(Self::SECONDARY_ID_BITS);

    /// Bitmask for the identity field (the low bits of the flake).
    const IDENTITY_MASK: u128 = low_mask_u128(Self::IDENTITY_BITS);

    /// Number of distinct sequence values the policy cycles through in one
    /// tick; the per-tick, per-generator capacity.
    const SEQUENCE_SPACE: u64 = Self::SEQUENCE_POLICY.space(Self::SEQUENCE_BITS);

    /// Short name of the layout for diagnostics.
    fn name() -> &'static str;
}

/// Declares a [`FlakeLayout`] marker type.
///
/// All 128 bits must be accounted for, otherwise a compile-time assertion
/// fails. The timestamp and sequence fields must be at least one bit wide and
/// every integer field must fit in a `u64`.
///
/// ## Example
///
/// ```
/// use flakeid::{Flake, FlakeLayout, define_flake_layout};
///
/// define_flake_layout!(
///     /// 48-bit millisecond timestamp, 16-bit sequence, no secondary ID.
///     TinyLayout,
///     unit: Millis,
///     policy: Wrapping,
///     timestamp: 48,
///     sequence: 16,
///     secondary_id: 0,
///     identity: 8
/// );
///
/// assert_eq!(TinyLayout::TIMESTAMP_SHIFT, 80);
/// let flake = Flake::<TinyLayout>::pack(7, 3, 0, b"node-001".into());
/// assert_eq!(flake.timestamp(), 7);
/// ```
#[macro_export]
macro_rules! define_flake_layout {
    (
        $(#[$meta:meta])*
        $name:ident,
        unit: $unit:ident,
        policy: $policy:ident,
        timestamp: $timestamp_bits:expr,
        sequence: $sequence_bits:expr,
        secondary_id: $secondary_id_bits:expr,
        identity: $identity_bytes:expr
    ) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Default, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name;

        const _: () = {
            // Compile-time check: total bit width _must_ equal 128. This is to
            // avoid overlapping fields and silent padding.
            assert!(
                $timestamp_bits + $sequence_bits + $secondary_id_bits + $identity_bytes * 8 == 128,
                "flake layout must account for exactly 128 bits"
            );
            assert!($timestamp_bits >= 1 && $timestamp_bits <= 63, "timestamp must be 1..=63 bits");
            assert!($sequence_bits >= 1 && $sequence_bits <= 63, "sequence must be 1..=63 bits");
            assert!($secondary_id_bits <= 63, "secondary ID must be at most 63 bits");
            assert!($identity_bytes <= 16, "identity must be at most 16 bytes");
        };

        impl $crate::FlakeLayout for $name {
            const TIMESTAMP_BITS: u32 = $timestamp_bits;
            const SEQUENCE_BITS: u32 = $sequence_bits;
            const SECONDARY_ID_BITS: u32 = $secondary_id_bits;
            const IDENTITY_BYTES: usize = $identity_bytes;
            const UNIT: $crate::TimeUnit = $crate::TimeUnit::$unit;
            const SEQUENCE_POLICY: $crate::SequencePolicy = $crate::SequencePolicy::$policy;

            fn name() -> &'static str {
                stringify!($name)
            }
        }
    };
}

define_flake_layout!(
    /// Millisecond layout with a 20-bit secondary ID and a 7-byte identity.
    ///
    /// - 41 bits timestamp (ms since [`FLAKE_EPOCH`], ~69 years)
    /// - 11 bits sequence (full range, 2048 flakes per ms)
    /// - 20 bits secondary ID
    /// - 56 bits identity
    ///
    /// ```text
    ///  Bit Index:  127          87 86         76 75             56 55             0
    ///              +--------------+-------------+-----------------+---------------+
    ///  Field:      | timestamp(41)| sequence(11)| secondary ID(20)| identity (56) |
    ///              +--------------+-------------+-----------------+---------------+
    /// ```
    /// [`FLAKE_EPOCH`]: crate::FLAKE_EPOCH
    WideSidLayout,
    unit: Millis,
    policy: Wrapping,
    timestamp: 41,
    sequence: 11,
    secondary_id: 20,
    identity: 7
);

define_flake_layout!(
    /// Millisecond layout with a 13-bit secondary ID and an 8-byte identity.
    ///
    /// - 41 bits timestamp (ms since [`FLAKE_EPOCH`], ~69 years)
    /// - 10 bits sequence (full range, 1024 flakes per ms)
    /// - 13 bits secondary ID
    /// - 64 bits identity
    ///
    /// ```text
    ///  Bit Index:  127          87 86         77 76             64 63             0
    ///              +--------------+-------------+-----------------+---------------+
    ///  Field:      | timestamp(41)| sequence(10)| secondary ID(13)| identity (64) |
    ///              +--------------+-------------+-----------------+---------------+
    /// ```
    /// [`FLAKE_EPOCH`]: crate::FLAKE_EPOCH
    NarrowSidLayout,
    unit: Millis,
    policy: Wrapping,
    timestamp: 41,
    sequence: 10,
    secondary_id: 13,
    identity: 8
);

define_flake_layout!(
    /// Microsecond layout without a secondary ID.
    ///
    /// - 52 bits timestamp (µs since [`FLAKE_EPOCH`], ~142 years)
    /// - 12 bits sequence (modulo 4095, 4095 flakes per µs)
    /// - 64 bits identity
    ///
    /// ```text
    ///  Bit Index:  127          76 75           64 63             0
    ///              +--------------+---------------+---------------+
    ///  Field:      | timestamp(52)| sequence (12) | identity (64) |
    ///              +--------------+---------------+---------------+
    /// ```
    /// [`FLAKE_EPOCH`]: crate::FLAKE_EPOCH
    MicrosLayout,
    unit: Micros,
    policy: Modulo,
    timestamp: 52,
    sequence: 12,
    secondary_id: 0,
    identity: 8
);
