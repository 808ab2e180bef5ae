//! Meter consumption resolver.
//!
//! Meters carry cumulative counters. The consumption of a calendar year is
//! the difference between the counter value in force at the start of the
//! year and the one in force at its end:
//!
//! - start value: latest reading dated on or before 1 January, else the
//!   earliest reading available (any gap before the first reading counts as
//!   zero consumption);
//! - end value: latest reading dated on or before 31 December, else the
//!   latest reading available;
//! - consumption: `max(0, end - start)`, summed over all meters of a unit.
//!
//! Meters are classified by substring match on their type label. The token
//! sets are deliberately narrow; a label matching both kinds is counted by
//! both kinds.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;
use uuid::Uuid;

const WATER_TOKENS: &[&str] = &["water", "wasser", "h2o"];
const HEAT_TOKENS: &[&str] = &["heat", "heiz", "wärme", "waerme", "warm", "therm"];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeterKind {
    Water,
    Heat,
}

impl MeterKind {
    fn tokens(self) -> &'static [&'static str] {
        match self {
            Self::Water => WATER_TOKENS,
            Self::Heat => HEAT_TOKENS,
        }
    }

    /// Case-insensitive token match on a meter type label.
    pub fn matches(self, label: &str) -> bool {
        let normalized: String = label.nfc().collect::<String>().to_lowercase();
        self.tokens()
            .iter()
            .any(|token| normalized.contains(token))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeterReading {
    pub date: NaiveDate,
    pub value: f64,
}

impl MeterReading {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// A meter with its full reading history.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeterSeries {
    pub meter_id: Uuid,
    pub unit_id: Uuid,
    pub kind_label: String,
    pub readings: Vec<MeterReading>,
}

/// Net consumption of one reading series over `year`.
///
/// Returns `None` when the series has no readings.
pub fn consumption_for_year(readings: &[MeterReading], year: i32) -> Option<f64> {
    let period_start = NaiveDate::from_ymd_opt(year, 1, 1)?;
    let period_end = NaiveDate::from_ymd_opt(year, 12, 31)?;

    let mut sorted: Vec<&MeterReading> = readings.iter().collect();
    sorted.sort_by_key(|reading| reading.date);
    let earliest = sorted.first()?;
    let latest = sorted.last()?;

    let value_at = |boundary: NaiveDate| {
        sorted
            .iter()
            .rev()
            .find(|reading| reading.date <= boundary)
            .map(|reading| reading.value)
    };

    let start = value_at(period_start).unwrap_or(earliest.value);
    let end = value_at(period_end).unwrap_or(latest.value);

    Some((end - start).max(0.0))
}

/// Consumption per unit for all meters of `kind`.
///
/// An empty map means "no consumption data", which callers must treat as a
/// degenerate basis rather than as zero consumption for every unit.
pub fn consumption_by_unit(
    meters: &[MeterSeries],
    year: i32,
    kind: MeterKind,
) -> BTreeMap<Uuid, f64> {
    let mut out: BTreeMap<Uuid, f64> = BTreeMap::new();
    for meter in meters.iter().filter(|meter| kind.matches(&meter.kind_label)) {
        let Some(consumption) = consumption_for_year(&meter.readings, year) else {
            continue;
        };
        *out.entry(meter.unit_id).or_insert(0.0) += consumption;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn series(unit_id: Uuid, label: &str, readings: &[(NaiveDate, f64)]) -> MeterSeries {
        MeterSeries {
            meter_id: Uuid::new_v4(),
            unit_id,
            kind_label: label.to_string(),
            readings: readings
                .iter()
                .map(|(date, value)| MeterReading::new(*date, *value))
                .collect(),
        }
    }

    #[test]
    fn classifies_labels() {
        assert!(MeterKind::Water.matches("Kaltwasser"));
        assert!(MeterKind::Water.matches("H2O main"));
        assert!(MeterKind::Heat.matches("Heizkostenverteiler"));
        assert!(MeterKind::Heat.matches("WÄRMEMENGENZÄHLER"));
        assert!(MeterKind::Heat.matches("Waermezaehler"));
        assert!(MeterKind::Heat.matches("Thermal"));
        assert!(!MeterKind::Water.matches("Strom"));
        assert!(!MeterKind::Heat.matches("electricity"));
        // Mislabelled meters count for both kinds.
        assert!(MeterKind::Water.matches("Warmwasser"));
        assert!(MeterKind::Heat.matches("Warmwasser"));
    }

    #[test]
    fn decomposed_umlaut_still_matches() {
        assert!(MeterKind::Heat.matches("Wa\u{0308}rme"));
    }

    #[test]
    fn readings_on_period_boundaries() {
        let readings = [
            MeterReading::new(date(2024, 1, 1), 100.0),
            MeterReading::new(date(2024, 12, 31), 180.0),
        ];
        assert_eq!(consumption_for_year(&readings, 2024), Some(80.0));
    }

    #[test]
    fn missing_prehistory_uses_earliest_reading() {
        let readings = [
            MeterReading::new(date(2024, 12, 1), 40.0),
            MeterReading::new(date(2024, 6, 1), 25.0),
        ];
        // Start falls back to the June reading; end is the December one.
        assert_eq!(consumption_for_year(&readings, 2024), Some(15.0));

        let single = [MeterReading::new(date(2024, 3, 1), 7.0)];
        assert_eq!(consumption_for_year(&single, 2024), Some(0.0));
    }

    #[test]
    fn no_reading_before_end_uses_latest_reading() {
        let readings = [
            MeterReading::new(date(2025, 2, 1), 10.0),
            MeterReading::new(date(2025, 3, 1), 30.0),
        ];
        // Everything lies after the year: start = earliest, end = latest.
        assert_eq!(consumption_for_year(&readings, 2024), Some(20.0));
    }

    #[test]
    fn counter_reset_is_floored_at_zero() {
        let readings = [
            MeterReading::new(date(2023, 12, 31), 500.0),
            MeterReading::new(date(2024, 12, 31), 20.0),
        ];
        assert_eq!(consumption_for_year(&readings, 2024), Some(0.0));
        assert_eq!(consumption_for_year(&[], 2024), None);
    }

    #[test]
    fn sums_meters_per_unit_and_filters_kind() {
        let unit_a = Uuid::new_v4();
        let unit_b = Uuid::new_v4();
        let meters = vec![
            series(unit_a, "Kaltwasser", &[(date(2023, 12, 31), 0.0), (date(2024, 12, 31), 30.0)]),
            series(unit_a, "Warmwasser", &[(date(2023, 12, 31), 5.0), (date(2024, 12, 31), 15.0)]),
            series(unit_b, "Wasser", &[(date(2024, 1, 1), 10.0), (date(2024, 12, 31), 20.0)]),
            series(unit_b, "Strom", &[(date(2024, 1, 1), 0.0), (date(2024, 12, 31), 999.0)]),
            series(unit_b, "Wasser Garten", &[]),
        ];

        let water = consumption_by_unit(&meters, 2024, MeterKind::Water);
        assert_eq!(water.get(&unit_a), Some(&40.0));
        assert_eq!(water.get(&unit_b), Some(&10.0));

        let heat = consumption_by_unit(&meters, 2024, MeterKind::Heat);
        assert_eq!(heat.get(&unit_a), Some(&10.0));
        assert!(!heat.contains_key(&unit_b));
    }

    #[test]
    fn no_qualifying_meters_yields_empty_map() {
        let meters = vec![series(Uuid::new_v4(), "Strom", &[(date(2024, 1, 1), 1.0)])];
        assert!(consumption_by_unit(&meters, 2024, MeterKind::Water).is_empty());
    }
}
