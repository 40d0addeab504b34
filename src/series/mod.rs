//! Time-series reconstruction: sampling index, period decoding and the
//! two assemblers.
//!
//! This is the stage where a silent mistake corrupts data instead of
//! crashing, so every mapping is checked:
//!
//! - resolutions must come from the closed table
//! - point positions must land inside the sampling index
//! - values must parse as numbers

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::domain::{DecodedSeries, Resolution, TimeColumn, TimeInterval, TimeTable, ValueColumn};
use crate::error::Error;
use crate::io::decode::{RawMarketDocument, RawPeriod};
use crate::io::tables::ProductionTypeTable;

/// Timestamps from `interval.start` to `interval.end` INCLUSIVE, stepped
/// by `resolution`.
///
/// The inclusive end makes the index one stamp longer than the nominal
/// period count: a 1-day interval at PT60M yields 25 stamps. Point
/// positions are mapped against this index, so the extra stamp is
/// load-bearing and must not be "fixed".
pub fn sampling_index(interval: &TimeInterval, resolution: Resolution) -> Vec<DateTime<Utc>> {
    let mut index = Vec::new();
    let mut cursor = interval.start;
    while cursor <= interval.end {
        index.push(cursor);
        cursor = resolution.advance(cursor);
    }
    index
}

/// Parse an interval timestamp as the API writes it (`2023-04-01T00:00Z`),
/// falling back to full RFC 3339.
fn parse_instant(raw: &str) -> Result<DateTime<Utc>, Error> {
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%MZ") {
        return Ok(naive.and_utc());
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| Error::Decode(format!("bad interval timestamp '{raw}': {e}")))
}

/// Decode one period into `(timestamp, value)` pairs.
///
/// Each point's target timestamp is `index[position - 1]`. Positions
/// outside `1..=index.len()` are a typed error, never clipped or wrapped.
pub fn decode_period(
    period: &RawPeriod,
    column: ValueColumn,
) -> Result<Vec<(DateTime<Utc>, f64)>, Error> {
    let resolution: Resolution = period.resolution.parse()?;
    let interval = TimeInterval::new(
        parse_instant(&period.time_interval.start)?,
        parse_instant(&period.time_interval.end)?,
    )?;
    let index = sampling_index(&interval, resolution);

    let mut points = Vec::with_capacity(period.points.len());
    for point in &period.points {
        let position = point.position as usize;
        if position == 0 || position > index.len() {
            return Err(Error::PositionOutOfRange {
                position: point.position,
                len: index.len(),
            });
        }
        let raw = point.value(column).ok_or_else(|| {
            Error::Decode(format!(
                "point at position {} carries no `{}` value",
                point.position,
                column.name()
            ))
        })?;
        let value: f64 = raw.trim().parse().map_err(|_| Error::NumericConversion {
            value: raw.to_string(),
        })?;
        points.push((index[position - 1], value));
    }
    Ok(points)
}

/// Decode every series of one document, keeping each series paired with
/// its optional production-type code.
pub fn decode_document_series(
    doc: &RawMarketDocument,
    column: ValueColumn,
) -> Result<Vec<DecodedSeries>, Error> {
    let mut out = Vec::with_capacity(doc.series.len());
    for series in &doc.series {
        out.push(DecodedSeries {
            production_type: series.psr_type.as_ref().map(|p| p.psr_type.clone()),
            points: decode_period(&series.period, column)?,
        });
    }
    Ok(out)
}

/// Concatenate decoded series into a single named column.
///
/// Document order and per-series point order are preserved; nothing is
/// re-sorted or deduplicated. Callers hand series over in chronological
/// document order, which makes the column chronological too.
pub fn assemble_column(name: &str, series: &[DecodedSeries]) -> TimeColumn {
    let mut rows = Vec::new();
    for s in series {
        rows.extend(s.points.iter().copied());
    }
    TimeColumn {
        name: name.to_string(),
        rows,
    }
}

/// Pivot decoded series into one column per production-type code.
///
/// Grouping spans every document, concatenating each code's points in
/// fetch order. Columns are relabeled through the code table (a missing
/// entry propagates as a blank label) and ordered alphabetically by
/// label, with the code as tie-break so the order stays total. Rows are
/// outer-joined on timestamp; gaps stay `None`.
pub fn assemble_pivot(series: &[DecodedSeries], table: &ProductionTypeTable) -> TimeTable {
    let mut groups: Vec<(String, Vec<(DateTime<Utc>, f64)>)> = Vec::new();
    let mut slot_by_code: HashMap<String, usize> = HashMap::new();
    for s in series {
        let code = s.production_type.clone().unwrap_or_default();
        let slot = match slot_by_code.get(&code) {
            Some(&slot) => slot,
            None => {
                groups.push((code.clone(), Vec::new()));
                slot_by_code.insert(code, groups.len() - 1);
                groups.len() - 1
            }
        };
        groups[slot].1.extend(s.points.iter().copied());
    }

    let mut labeled: Vec<(String, String, Vec<(DateTime<Utc>, f64)>)> = groups
        .into_iter()
        .map(|(code, points)| {
            let label = table.label(&code).unwrap_or_default().to_string();
            (label, code, points)
        })
        .collect();
    labeled.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));

    let mut rows: BTreeMap<DateTime<Utc>, Vec<Option<f64>>> = BTreeMap::new();
    let width = labeled.len();
    for (col, (_, _, points)) in labeled.iter().enumerate() {
        for &(ts, value) in points {
            let row = rows.entry(ts).or_insert_with(|| vec![None; width]);
            // Within one (code, timestamp) cell the last decoded value
            // wins; see DESIGN.md on duplicate alignment.
            row[col] = Some(value);
        }
    }

    TimeTable {
        columns: labeled.into_iter().map(|(label, _, _)| label).collect(),
        rows: rows.into_iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::decode::{RawPoint, RawTimeInterval};
    use chrono::TimeZone;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    fn hourly_period(start: &str, end: &str, points: Vec<RawPoint>) -> RawPeriod {
        RawPeriod {
            time_interval: RawTimeInterval {
                start: start.to_string(),
                end: end.to_string(),
            },
            resolution: "PT60M".to_string(),
            points,
        }
    }

    fn quantity_point(position: u32, value: &str) -> RawPoint {
        RawPoint {
            position,
            quantity: Some(value.to_string()),
            price_amount: None,
        }
    }

    #[test]
    fn sampling_index_includes_both_ends() {
        // One day at hourly resolution: 25 stamps, not 24.
        let interval =
            TimeInterval::new(utc(2023, 4, 1, 0, 0), utc(2023, 4, 2, 0, 0)).unwrap();
        let index = sampling_index(&interval, Resolution::Hour);
        assert_eq!(index.len(), 25);
        assert_eq!(index[0], utc(2023, 4, 1, 0, 0));
        assert_eq!(index[24], utc(2023, 4, 2, 0, 0));
    }

    #[test]
    fn positions_map_onto_the_sampling_index() {
        let period = hourly_period(
            "2023-04-01T00:00Z",
            "2023-04-01T03:00Z",
            vec![
                quantity_point(1, "10"),
                quantity_point(2, "20"),
                quantity_point(3, "30"),
            ],
        );
        let points = decode_period(&period, ValueColumn::Quantity).unwrap();
        assert_eq!(
            points,
            vec![
                (utc(2023, 4, 1, 0, 0), 10.0),
                (utc(2023, 4, 1, 1, 0), 20.0),
                (utc(2023, 4, 1, 2, 0), 30.0),
            ]
        );
    }

    #[test]
    fn unknown_resolution_yields_no_partial_output() {
        let mut period = hourly_period(
            "2023-04-01T00:00Z",
            "2023-04-01T03:00Z",
            vec![quantity_point(1, "10")],
        );
        period.resolution = "PT5M".to_string();
        let err = decode_period(&period, ValueColumn::Quantity).unwrap_err();
        assert!(matches!(err, Error::UnknownResolution(code) if code == "PT5M"));
    }

    #[test]
    fn out_of_range_positions_are_rejected() {
        // The 3-hour hourly interval has an inclusive index of length 4.
        let period = hourly_period(
            "2023-04-01T00:00Z",
            "2023-04-01T03:00Z",
            vec![quantity_point(0, "10")],
        );
        let err = decode_period(&period, ValueColumn::Quantity).unwrap_err();
        assert!(matches!(
            err,
            Error::PositionOutOfRange { position: 0, len: 4 }
        ));

        let period = hourly_period(
            "2023-04-01T00:00Z",
            "2023-04-01T03:00Z",
            vec![quantity_point(5, "10")],
        );
        let err = decode_period(&period, ValueColumn::Quantity).unwrap_err();
        assert!(matches!(
            err,
            Error::PositionOutOfRange { position: 5, len: 4 }
        ));
    }

    #[test]
    fn non_numeric_values_are_rejected() {
        let period = hourly_period(
            "2023-04-01T00:00Z",
            "2023-04-01T03:00Z",
            vec![quantity_point(1, "N/A")],
        );
        let err = decode_period(&period, ValueColumn::Quantity).unwrap_err();
        assert!(matches!(err, Error::NumericConversion { value } if value == "N/A"));
    }

    #[test]
    fn column_assembly_preserves_order_and_duplicates() {
        let first = DecodedSeries {
            production_type: None,
            points: vec![(utc(2023, 4, 1, 0, 0), 1.0), (utc(2023, 4, 1, 1, 0), 2.0)],
        };
        // Overlapping range: the shared timestamp appears twice.
        let second = DecodedSeries {
            production_type: None,
            points: vec![(utc(2023, 4, 1, 1, 0), 3.0), (utc(2023, 4, 1, 2, 0), 4.0)],
        };
        let column = assemble_column("quantity", &[first, second]);
        assert_eq!(column.name, "quantity");
        assert_eq!(column.len(), 4);
        assert_eq!(column.rows[1].0, column.rows[2].0);
        assert_eq!(column.rows[1].1, 2.0);
        assert_eq!(column.rows[2].1, 3.0);
    }

    #[test]
    fn pivot_groups_labels_and_orders_columns() {
        let table = ProductionTypeTable::standard();
        // Deliberately out of alphabetical order on input.
        let gas = DecodedSeries {
            production_type: Some("B04".to_string()),
            points: vec![(utc(2023, 4, 1, 0, 0), 7.0)],
        };
        let biomass = DecodedSeries {
            production_type: Some("B01".to_string()),
            points: vec![(utc(2023, 4, 1, 0, 0), 5.0), (utc(2023, 4, 1, 1, 0), 6.0)],
        };
        let pivot = assemble_pivot(&[gas, biomass], &table);
        assert_eq!(pivot.columns, vec!["Biomass", "Fossil Gas"]);
        assert_eq!(pivot.rows.len(), 2);
        // Outer join: gas has no sample at 01:00.
        assert_eq!(pivot.rows[0].1, vec![Some(5.0), Some(7.0)]);
        assert_eq!(pivot.rows[1].1, vec![Some(6.0), None]);
    }

    #[test]
    fn pivot_concatenates_groups_across_documents() {
        // The same code appearing in two documents lands in one column.
        let day_one = DecodedSeries {
            production_type: Some("B01".to_string()),
            points: vec![(utc(2023, 4, 1, 0, 0), 5.0)],
        };
        let day_two = DecodedSeries {
            production_type: Some("B01".to_string()),
            points: vec![(utc(2023, 4, 2, 0, 0), 8.0)],
        };
        let pivot = assemble_pivot(&[day_one, day_two], &ProductionTypeTable::standard());
        assert_eq!(pivot.columns, vec!["Biomass"]);
        assert_eq!(
            pivot.rows,
            vec![
                (utc(2023, 4, 1, 0, 0), vec![Some(5.0)]),
                (utc(2023, 4, 2, 0, 0), vec![Some(8.0)]),
            ]
        );
    }

    #[test]
    fn unmapped_codes_keep_a_blank_label() {
        let mystery = DecodedSeries {
            production_type: Some("B99".to_string()),
            points: vec![(utc(2023, 4, 1, 0, 0), 1.0)],
        };
        let pivot = assemble_pivot(&[mystery], &ProductionTypeTable::standard());
        assert_eq!(pivot.columns, vec![""]);
    }
}
