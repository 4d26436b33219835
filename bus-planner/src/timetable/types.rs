//! Timetable documents and decoded timetables.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize, Serializer};

use crate::domain::{DayBucket, LineId, StopId};
use crate::network::ServingLine;

/// Departures of one line at one stop, as fetched.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ScheduleBlock {
    #[serde(rename = "lineId", alias = "b")]
    pub line: LineId,
    /// Packed departure codes, see [`crate::domain::schedule`].
    #[serde(alias = "t")]
    pub times: Vec<u16>,
}

/// Which calendar applies today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayKind {
    Weekday,
    Weekend,
}

impl DayKind {
    pub fn of(date: NaiveDate) -> Self {
        Self::from(date.weekday())
    }

    /// Whether departures tagged `day` run today.
    pub fn is_current(self, day: DayBucket) -> bool {
        match self {
            DayKind::Weekday => day.is_weekday(),
            DayKind::Weekend => day.is_weekend(),
        }
    }
}

impl From<Weekday> for DayKind {
    fn from(day: Weekday) -> Self {
        match day {
            Weekday::Sat | Weekday::Sun => DayKind::Weekend,
            _ => DayKind::Weekday,
        }
    }
}

/// One departure from a stop, decoded and joined with its line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedDeparture {
    pub line: LineId,
    pub number: String,
    /// Where the line terminates.
    pub destination: String,
    pub color: String,
    pub day: DayBucket,
    pub hour: u8,
    pub minute: u8,
    /// Minutes since midnight.
    pub minutes: u16,
    pub raw: u16,
    /// Runs today and has not left yet.
    pub future: bool,
}

impl DecodedDeparture {
    /// `HH:MM`, zero-padded.
    pub fn time_string(&self) -> String {
        format!("{:02}:{:02}", self.hour, self.minute)
    }
}

/// The decoded timetable of one stop for one day.
///
/// Both lists are sorted by departure minute; departures at the same
/// minute keep the order they were fetched in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StopTimetable {
    pub stop: StopId,
    /// Departures running today.
    pub current: Vec<DecodedDeparture>,
    /// Departures on other calendars.
    pub extra: Vec<DecodedDeparture>,
    #[serde(serialize_with = "minutes_or_minus_one")]
    pub first_future_occurrence: Option<u16>,
    /// Lines calling here, one per number, naturally sorted.
    pub lines: Vec<ServingLine>,
}

impl StopTimetable {
    /// First departure today at or after `after`, any line.
    pub fn first_departure(&self, after: u16) -> Option<&DecodedDeparture> {
        self.current.iter().find(|d| d.minutes >= after)
    }

    /// First departure of `line` today at or after `after`.
    pub fn next_departure(&self, after: u16, line: LineId) -> Option<&DecodedDeparture> {
        self.current
            .iter()
            .find(|d| d.line == line && d.minutes >= after)
    }

    /// First departure of any of `lines` today at or after `after`.
    pub fn next_departure_among(&self, after: u16, lines: &[LineId]) -> Option<&DecodedDeparture> {
        self.current
            .iter()
            .find(|d| d.minutes >= after && lines.contains(&d.line))
    }
}

fn minutes_or_minus_one<S: Serializer>(value: &Option<u16>, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(minutes) => serializer.serialize_i32(i32::from(*minutes)),
        None => serializer.serialize_i32(-1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekend_calendar() {
        assert_eq!(DayKind::from(Weekday::Mon), DayKind::Weekday);
        assert_eq!(DayKind::from(Weekday::Fri), DayKind::Weekday);
        assert_eq!(DayKind::from(Weekday::Sat), DayKind::Weekend);
        assert_eq!(DayKind::from(Weekday::Sun), DayKind::Weekend);

        // 2024-06-01 was a Saturday.
        let saturday = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert_eq!(DayKind::of(saturday), DayKind::Weekend);
    }

    #[test]
    fn current_buckets() {
        assert!(DayKind::Weekday.is_current(DayBucket::WEEKDAYS));
        assert!(!DayKind::Weekday.is_current(DayBucket::SATURDAY));
        for day in [
            DayBucket::SATURDAY_AND_SUNDAY,
            DayBucket::SATURDAY,
            DayBucket::SUNDAY,
        ] {
            assert!(DayKind::Weekend.is_current(day));
            assert!(!DayKind::Weekday.is_current(day));
        }
        assert!(!DayKind::Weekend.is_current(DayBucket::WEEKDAYS));
        assert!(!DayKind::Weekend.is_current(DayBucket::UNKNOWN));
        assert!(!DayKind::Weekday.is_current(DayBucket::UNKNOWN));
    }

    #[test]
    fn schedule_block_keys() {
        let block: ScheduleBlock = serde_json::from_str(r#"{"b":5369802,"t":[8490,8540]}"#).unwrap();
        assert_eq!(block.line, LineId(5369802));
        assert_eq!(block.times, vec![8490, 8540]);

        let block: ScheduleBlock = serde_json::from_str(r#"{"lineId":7,"times":[]}"#).unwrap();
        assert_eq!(block.line, LineId(7));
    }

    fn departure(line: u64, minutes: u16) -> DecodedDeparture {
        DecodedDeparture {
            line: LineId(line),
            number: line.to_string(),
            destination: "Triaj".into(),
            color: "#ffe900".into(),
            day: DayBucket::WEEKDAYS,
            hour: (minutes / 60) as u8,
            minute: (minutes % 60) as u8,
            minutes,
            raw: 0,
            future: false,
        }
    }

    fn timetable(current: Vec<DecodedDeparture>) -> StopTimetable {
        StopTimetable {
            stop: StopId(1),
            current,
            extra: Vec::new(),
            first_future_occurrence: None,
            lines: Vec::new(),
        }
    }

    #[test]
    fn lookups_are_at_or_after() {
        let table = timetable(vec![departure(1, 480), departure(2, 485), departure(1, 500)]);

        assert_eq!(table.first_departure(481).unwrap().minutes, 485);
        assert_eq!(table.next_departure(480, LineId(1)).unwrap().minutes, 480);
        assert_eq!(table.next_departure(481, LineId(1)).unwrap().minutes, 500);
        assert!(table.next_departure(501, LineId(1)).is_none());
        assert!(table.next_departure(0, LineId(3)).is_none());

        let found = table.next_departure_among(481, &[LineId(1), LineId(2)]).unwrap();
        assert_eq!((found.line, found.minutes), (LineId(2), 485));
        assert!(table.next_departure_among(0, &[]).is_none());
    }

    #[test]
    fn first_future_serialises_as_minus_one() {
        let mut table = timetable(Vec::new());
        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json["first_future_occurrence"], -1);

        table.first_future_occurrence = Some(282);
        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json["first_future_occurrence"], 282);
    }

    #[test]
    fn departure_time_string() {
        assert_eq!(departure(1, 282).time_string(), "04:42");
    }
}
