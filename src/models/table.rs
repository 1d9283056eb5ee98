use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDateTime};

/// One station's measurement series within a table. `values` is row-aligned
/// with the owning table's `timestamps`; a `None` cell is a missing reading.
#[derive(Debug, Clone, PartialEq)]
pub struct StationColumn {
    pub code: String,
    /// Attached during reconciliation; raw sheets carry only the code.
    pub locality: Option<String>,
    pub values: Vec<Option<f64>>,
}

impl StationColumn {
    pub fn new(code: String, values: Vec<Option<f64>>) -> Self {
        Self {
            code,
            locality: None,
            values,
        }
    }

    /// Compound column identity, `Locality_Code` once the locality has been
    /// attached, bare code before that.
    pub fn label(&self) -> String {
        match &self.locality {
            Some(locality) => format!("{}_{}", locality, self.code),
            None => self.code.clone(),
        }
    }
}

/// A cleaned yearly measurement table: one row per hourly timestamp, one
/// column per station.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyTable {
    pub year: i32,
    pub timestamps: Vec<NaiveDateTime>,
    pub columns: Vec<StationColumn>,
}

impl HourlyTable {
    pub fn new(year: i32, timestamps: Vec<NaiveDateTime>, columns: Vec<StationColumn>) -> Self {
        Self {
            year,
            timestamps,
            columns,
        }
    }

    pub fn row_count(&self) -> usize {
        self.timestamps.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn station_codes(&self) -> BTreeSet<String> {
        self.columns.iter().map(|c| c.code.clone()).collect()
    }

    pub fn column(&self, code: &str) -> Option<&StationColumn> {
        self.columns.iter().find(|c| c.code == code)
    }

    /// Distinct calendar days covered by the time index.
    pub fn distinct_days(&self) -> usize {
        self.timestamps
            .iter()
            .map(|ts| ts.date())
            .collect::<BTreeSet<_>>()
            .len()
    }
}

/// Row-wise union of the cleaned yearly tables. Column identity is stable
/// across the union; years are disjoint by construction.
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedTable {
    pub timestamps: Vec<NaiveDateTime>,
    pub columns: Vec<StationColumn>,
}

impl CombinedTable {
    pub fn row_count(&self) -> usize {
        self.timestamps.len()
    }

    /// Calendar years actually present in the time index.
    pub fn years(&self) -> BTreeSet<i32> {
        self.timestamps.iter().map(|ts| ts.date().year()).collect()
    }

    pub fn labels(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.label()).collect()
    }

    /// Re-split the combined table by the timestamp's calendar year.
    pub fn split_by_year(&self) -> Vec<HourlyTable> {
        self.years()
            .into_iter()
            .map(|year| {
                let row_indices: Vec<usize> = self
                    .timestamps
                    .iter()
                    .enumerate()
                    .filter(|(_, ts)| ts.date().year() == year)
                    .map(|(i, _)| i)
                    .collect();

                let timestamps = row_indices.iter().map(|&i| self.timestamps[i]).collect();
                let columns = self
                    .columns
                    .iter()
                    .map(|col| StationColumn {
                        code: col.code.clone(),
                        locality: col.locality.clone(),
                        values: row_indices.iter().map(|&i| col.values[i]).collect(),
                    })
                    .collect();

                HourlyTable::new(year, timestamps, columns)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn ts(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_label_with_and_without_locality() {
        let mut col = StationColumn::new("DsWrocAlWisn".to_string(), vec![]);
        assert_eq!(col.label(), "DsWrocAlWisn");

        col.locality = Some("Wrocław".to_string());
        assert_eq!(col.label(), "Wrocław_DsWrocAlWisn");
    }

    #[test]
    fn test_distinct_days() {
        let timestamps = vec![
            ts(2021, 1, 1, 1),
            ts(2021, 1, 1, 2),
            ts(2021, 1, 2, 1),
            ts(2021, 1, 3, 1),
        ];
        let table = HourlyTable::new(2021, timestamps, vec![]);

        assert_eq!(table.distinct_days(), 3);
    }

    #[test]
    fn test_split_by_year_partitions_rows() {
        let timestamps = vec![ts(2019, 6, 1, 1), ts(2019, 6, 1, 2), ts(2021, 6, 1, 1)];
        let column = StationColumn::new(
            "MzWarKondrat".to_string(),
            vec![Some(10.0), Some(12.0), Some(8.0)],
        );
        let combined = CombinedTable {
            timestamps,
            columns: vec![column],
        };

        let split = combined.split_by_year();
        assert_eq!(split.len(), 2);
        assert_eq!(split[0].year, 2019);
        assert_eq!(split[0].row_count(), 2);
        assert_eq!(split[1].year, 2021);
        assert_eq!(split[1].columns[0].values, vec![Some(8.0)]);
    }
}
