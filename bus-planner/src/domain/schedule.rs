//! Packed departure time codec.
//!
//! Timetables ship every departure as a single `u16`:
//!
//! ```text
//!  15 | 14 13 | 12 11 | 10 .. 6 | 5 .. 0
//!   - |  day  |   -   |  hour   | minute
//! ```
//!
//! Decoding performs no range validation: an hour of 31 or a minute of 63
//! is passed through as-is.

use std::fmt;

use serde::{Deserialize, Serialize};

const MINUTE_MASK: u16 = 0x3F;
const HOUR_MASK: u16 = 0x1F;
const DAY_MASK: u16 = 0x03;
const HOUR_SHIFT: u16 = 6;
const DAY_SHIFT: u16 = 13;

/// Calendar bucket a departure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayBucket(pub u8);

impl DayBucket {
    pub const UNKNOWN: DayBucket = DayBucket(0);
    /// Monday to Friday.
    pub const WEEKDAYS: DayBucket = DayBucket(1);
    pub const SATURDAY_AND_SUNDAY: DayBucket = DayBucket(2);
    pub const SATURDAY: DayBucket = DayBucket(3);
    /// Cannot be expressed in the two packed day bits; kept so weekend
    /// classification matches the published calendar codes.
    pub const SUNDAY: DayBucket = DayBucket(4);

    pub fn is_weekday(self) -> bool {
        self == Self::WEEKDAYS
    }

    pub fn is_weekend(self) -> bool {
        matches!(
            self,
            Self::SATURDAY_AND_SUNDAY | Self::SATURDAY | Self::SUNDAY
        )
    }
}

impl fmt::Display for DayBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::WEEKDAYS => f.write_str("L-V"),
            Self::SATURDAY_AND_SUNDAY => f.write_str("S-D"),
            Self::SATURDAY => f.write_str("S"),
            Self::SUNDAY => f.write_str("D"),
            _ => f.write_str("?"),
        }
    }
}

/// A decoded departure time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DecodedTime {
    pub day: DayBucket,
    pub hour: u8,
    pub minute: u8,
    /// `hour * 60 + minute`.
    pub minutes_since_midnight: u16,
    /// The packed value this was decoded from.
    pub raw: u16,
}

impl DecodedTime {
    /// `HH:MM`, zero-padded.
    pub fn time_string(&self) -> String {
        format!("{:02}:{:02}", self.hour, self.minute)
    }
}

/// Unpack a departure time.
///
/// # Examples
///
/// ```
/// use bus_planner::domain::schedule::{decode, DayBucket};
///
/// let t = decode(0b0_01_00_00100_101010);
/// assert_eq!(t.day, DayBucket::WEEKDAYS);
/// assert_eq!((t.hour, t.minute), (4, 42));
/// assert_eq!(t.minutes_since_midnight, 282);
/// assert_eq!(t.time_string(), "04:42");
/// ```
pub fn decode(code: u16) -> DecodedTime {
    let minute = (code & MINUTE_MASK) as u8;
    let hour = ((code >> HOUR_SHIFT) & HOUR_MASK) as u8;
    let day = ((code >> DAY_SHIFT) & DAY_MASK) as u8;
    DecodedTime {
        day: DayBucket(day),
        hour,
        minute,
        minutes_since_midnight: u16::from(hour) * 60 + u16::from(minute),
        raw: code,
    }
}

/// Pack a departure time, masking each field to its width.
pub fn encode(day: DayBucket, hour: u8, minute: u8) -> u16 {
    (u16::from(day.0) & DAY_MASK) << DAY_SHIFT
        | (u16::from(hour) & HOUR_MASK) << HOUR_SHIFT
        | (u16::from(minute) & MINUTE_MASK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_reference_value() {
        // hour 4 in bits 6-10, minute 42 in bits 0-5
        let t = decode(0b00100_101010);
        assert_eq!(t.hour, 4);
        assert_eq!(t.minute, 42);
        assert_eq!(t.minutes_since_midnight, 282);
        assert_eq!(t.time_string(), "04:42");
        assert_eq!(t.day, DayBucket::UNKNOWN);
        assert_eq!(t.raw, 298);
    }

    #[test]
    fn minute_field_is_six_bits() {
        // A seven-bit minute spills its top bit into the hour.
        let t = decode(0b0_0100_0101010);
        assert_eq!((t.hour, t.minute), (8, 42));
    }

    #[test]
    fn decode_day_bits() {
        assert_eq!(decode(1 << 13).day, DayBucket::WEEKDAYS);
        assert_eq!(decode(2 << 13).day, DayBucket::SATURDAY_AND_SUNDAY);
        assert_eq!(decode(3 << 13).day, DayBucket::SATURDAY);
    }

    #[test]
    fn decode_ignores_unused_bits() {
        // Bits 11, 12 and 15 carry nothing.
        let plain = decode(encode(DayBucket::WEEKDAYS, 7, 5));
        let noisy = decode(encode(DayBucket::WEEKDAYS, 7, 5) | 0b1001_1000_0000_0000);
        assert_eq!((plain.day, plain.hour, plain.minute), (noisy.day, noisy.hour, noisy.minute));
    }

    #[test]
    fn out_of_range_values_pass_through() {
        let t = decode(encode(DayBucket::WEEKDAYS, 31, 63));
        assert_eq!(t.hour, 31);
        assert_eq!(t.minute, 63);
        assert_eq!(t.minutes_since_midnight, 31 * 60 + 63);
        assert_eq!(t.time_string(), "31:63");
    }

    #[test]
    fn encode_masks_fields() {
        assert_eq!(encode(DayBucket::SUNDAY, 0, 0), 0);
        assert_eq!(encode(DayBucket(0), 32, 64), 0);
    }

    #[test]
    fn weekend_buckets() {
        assert!(DayBucket::WEEKDAYS.is_weekday());
        assert!(!DayBucket::WEEKDAYS.is_weekend());
        for day in [DayBucket::SATURDAY_AND_SUNDAY, DayBucket::SATURDAY, DayBucket::SUNDAY] {
            assert!(day.is_weekend());
            assert!(!day.is_weekday());
        }
        assert!(!DayBucket::UNKNOWN.is_weekday());
        assert!(!DayBucket::UNKNOWN.is_weekend());
    }

    #[test]
    fn day_bucket_display() {
        assert_eq!(DayBucket::WEEKDAYS.to_string(), "L-V");
        assert_eq!(DayBucket::SATURDAY_AND_SUNDAY.to_string(), "S-D");
        assert_eq!(DayBucket(0).to_string(), "?");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Every in-range triple survives a pack/unpack cycle.
        #[test]
        fn fields_recovered(day in 0u8..4, hour in 0u8..24, minute in 0u8..60) {
            let t = decode(encode(DayBucket(day), hour, minute));
            prop_assert_eq!(t.day, DayBucket(day));
            prop_assert_eq!(t.hour, hour);
            prop_assert_eq!(t.minute, minute);
        }

        /// Decoded day is always one of the four representable buckets.
        #[test]
        fn day_in_range(code in any::<u16>()) {
            prop_assert!(decode(code).day.0 <= 3);
        }

        #[test]
        fn minutes_consistent(code in any::<u16>()) {
            let t = decode(code);
            prop_assert_eq!(
                t.minutes_since_midnight,
                u16::from(t.hour) * 60 + u16::from(t.minute)
            );
            prop_assert_eq!(t.raw, code);
        }
    }
}
