//! Named bit flags and bit-level helpers.
//!
//! Every named attribute owns exactly one bit. The name tables are `const`
//! and never change at runtime.

use bitflags::bitflags;

bitflags! {
    /// State bits of a digital asset.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct AssetFlags: u8 {
        /// Asset content is encrypted.
        const ENCRYPTED = 1 << 0;
        /// Asset must not be modified.
        const READ_ONLY = 1 << 1;
        /// Asset has been archived.
        const ARCHIVED = 1 << 2;
        /// Asset content failed verification.
        const CORRUPTED = 1 << 3;
    }
}

bitflags! {
    /// Status bits of a fleet.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FleetStatus: u32 {
        /// Hyperdrive spun up.
        const READY_FOR_JUMP = 1 << 0;
        /// Shields raised.
        const SHIELD_ACTIVE = 1 << 1;
        /// Fleet badly damaged.
        const CRITICAL_DAMAGE = 1 << 2;
        /// Fleet is withdrawing.
        const WITHDRAWAL = 1 << 3;
    }
}

/// Display names for [`AssetFlags`], in bit order.
pub const ASSET_FLAG_NAMES: [(AssetFlags, &str); 4] = [
    (AssetFlags::ENCRYPTED, "Encrypted"),
    (AssetFlags::READ_ONLY, "Read-only"),
    (AssetFlags::ARCHIVED, "Archived"),
    (AssetFlags::CORRUPTED, "Corrupted"),
];

/// Status keywords for [`FleetStatus`], in bit order. These are the exact
/// substrings searched for in fleet status text.
pub const FLEET_STATUS_KEYWORDS: [(FleetStatus, &str); 4] = [
    (FleetStatus::READY_FOR_JUMP, "Ready for Jump"),
    (FleetStatus::SHIELD_ACTIVE, "Shield Active"),
    (FleetStatus::CRITICAL_DAMAGE, "Critical Damage"),
    (FleetStatus::WITHDRAWAL, "Withdrawal"),
];

/// Separator used when writing several keywords into one status text.
pub const STATUS_TEXT_SEPARATOR: &str = ", ";

impl AssetFlags {
    /// Returns the names of the set bits, in bit order.
    ///
    /// Bits without a name are ignored.
    #[must_use]
    pub fn names(self) -> Vec<&'static str> {
        decode_names(self, &ASSET_FLAG_NAMES)
    }
}

impl FleetStatus {
    /// Builds a status from every keyword found in `text`.
    #[must_use]
    pub fn from_status_text(text: &str) -> Self {
        FLEET_STATUS_KEYWORDS
            .iter()
            .filter(|(_, keyword)| text.contains(keyword))
            .fold(Self::empty(), |acc, (flag, _)| acc | *flag)
    }

    /// Writes the set keywords back as status text.
    #[must_use]
    pub fn to_status_text(self) -> String {
        self.names().join(STATUS_TEXT_SEPARATOR)
    }

    /// Returns the keywords of the set bits, in bit order.
    #[must_use]
    pub fn names(self) -> Vec<&'static str> {
        decode_names(self, &FLEET_STATUS_KEYWORDS)
    }
}

/// Maps set bits to their names using `table`.
pub fn decode_names<F>(bits: F, table: &[(F, &'static str)]) -> Vec<&'static str>
where
    F: bitflags::Flags + Copy,
{
    table
        .iter()
        .filter(|(flag, _)| bits.contains(*flag))
        .map(|(_, name)| *name)
        .collect()
}

/// How a mask is combined with existing status bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusOp {
    /// `bits | mask`
    Set,
    /// `bits & !mask`
    Clear,
    /// `bits ^ mask`
    Toggle,
}

impl StatusOp {
    /// Applies the operation.
    #[must_use]
    pub const fn apply(self, bits: u32, mask: u32) -> u32 {
        match self {
            Self::Set => bits | mask,
            Self::Clear => bits & !mask,
            Self::Toggle => bits ^ mask,
        }
    }
}

/// Counts positions `i` in `byte` where bit `i` is set and bit `i + 1` is
/// clear.
#[must_use]
pub const fn count_01_pairs(byte: u8) -> u32 {
    (byte & !(byte >> 1) & 0x7f).count_ones()
}

/// Sums [`count_01_pairs`] over every byte of `text`.
#[must_use]
pub fn count_01_pairs_in_str(text: &str) -> u32 {
    text.bytes().map(count_01_pairs).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_bits_do_not_alias() {
        let all = ASSET_FLAG_NAMES
            .iter()
            .fold(0u8, |acc, (flag, _)| {
                assert_eq!(acc & flag.bits(), 0);
                acc | flag.bits()
            });
        assert_eq!(all, AssetFlags::all().bits());
    }

    #[test]
    fn fleet_bits_do_not_alias() {
        let all = FLEET_STATUS_KEYWORDS
            .iter()
            .fold(0u32, |acc, (flag, _)| {
                assert_eq!(acc & flag.bits(), 0);
                acc | flag.bits()
            });
        assert_eq!(all, FleetStatus::all().bits());
    }

    #[test]
    fn asset_names_in_bit_order() {
        let flags = AssetFlags::CORRUPTED | AssetFlags::ENCRYPTED;
        assert_eq!(flags.names(), vec!["Encrypted", "Corrupted"]);
        assert!(AssetFlags::empty().names().is_empty());
    }

    #[test]
    fn unknown_asset_bits_are_retained_but_unnamed() {
        let flags = AssetFlags::from_bits_retain(0b1000_0010);
        assert_eq!(flags.bits(), 0b1000_0010);
        assert_eq!(flags.names(), vec!["Read-only"]);
    }

    #[test]
    fn status_text_scan() {
        let status = FleetStatus::from_status_text("Shield Active; Withdrawal underway");
        assert_eq!(status, FleetStatus::SHIELD_ACTIVE | FleetStatus::WITHDRAWAL);
        assert_eq!(FleetStatus::from_status_text("holding position"), FleetStatus::empty());
    }

    #[test]
    fn status_text_is_case_sensitive() {
        assert_eq!(FleetStatus::from_status_text("ready for jump"), FleetStatus::empty());
    }

    #[test]
    fn status_text_rebuild() {
        let status = FleetStatus::READY_FOR_JUMP | FleetStatus::CRITICAL_DAMAGE;
        assert_eq!(status.to_status_text(), "Ready for Jump, Critical Damage");
        assert_eq!(FleetStatus::from_status_text(&status.to_status_text()), status);
        assert_eq!(FleetStatus::empty().to_status_text(), "");
    }

    #[test]
    fn status_ops() {
        assert_eq!(StatusOp::Set.apply(0b0001, 0b1000), 0b1001);
        assert_eq!(StatusOp::Clear.apply(0b1001, 0b1000), 0b0001);
        assert_eq!(StatusOp::Toggle.apply(0b1001, 0b1100), 0b0101);
    }

    #[test]
    fn bit_pairs_in_byte() {
        assert_eq!(count_01_pairs(0b0000_0000), 0);
        assert_eq!(count_01_pairs(0b0000_0001), 1);
        assert_eq!(count_01_pairs(0b0000_0011), 1);
        assert_eq!(count_01_pairs(0b0101_0101), 4);
        // Bit 7 has no bit 8 to pair with.
        assert_eq!(count_01_pairs(0b1000_0000), 0);
        assert_eq!(count_01_pairs(0b1111_1111), 0);
    }

    #[test]
    fn bit_pairs_in_str() {
        // 'a' = 0x61 = 0110_0001 -> pairs at bit 0 and bit 6
        assert_eq!(count_01_pairs(b'a'), 2);
        assert_eq!(count_01_pairs_in_str("aa"), 4);
        assert_eq!(count_01_pairs_in_str(""), 0);
    }
}
