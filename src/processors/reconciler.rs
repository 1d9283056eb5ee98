use crate::error::{PipelineError, Result};
use crate::models::{HourlyTable, StationColumn};
use std::collections::{BTreeSet, HashMap};

/// Maps historical station codes to current ones and restricts a multi-year
/// run to the stations present in every year.
///
/// Renaming is a pure relabel: column values are never merged or touched.
/// Codes absent from the lookup are assumed to already be current.
pub struct CodeReconciler {
    lookup: HashMap<String, String>,
}

impl CodeReconciler {
    pub fn new(lookup: HashMap<String, String>) -> Self {
        Self { lookup }
    }

    pub fn is_empty(&self) -> bool {
        self.lookup.is_empty()
    }

    /// Relabel columns whose code appears in the historical-code lookup.
    pub fn remap_codes(&self, mut table: HourlyTable) -> HourlyTable {
        for column in &mut table.columns {
            if let Some(current) = self.lookup.get(&column.code) {
                column.code = current.clone();
            }
        }
        table
    }

    /// Intersection of station-code sets across all yearly tables.
    pub fn common_codes(tables: &[HourlyTable]) -> BTreeSet<String> {
        let mut iter = tables.iter();
        let mut common = match iter.next() {
            Some(table) => table.station_codes(),
            None => return BTreeSet::new(),
        };
        for table in iter {
            common = common.intersection(&table.station_codes()).cloned().collect();
        }
        common
    }

    /// Keep exactly `codes`, in their sorted order, so every yearly table
    /// ends up with an identical ordered column set.
    ///
    /// Two columns sharing a code after renaming would have to be merged
    /// or one dropped; neither is defensible, so the run stops.
    pub fn restrict_to(table: HourlyTable, codes: &BTreeSet<String>) -> Result<HourlyTable> {
        let HourlyTable {
            year,
            timestamps,
            columns,
        } = table;

        let mut by_code: HashMap<String, StationColumn> = HashMap::with_capacity(columns.len());
        for column in columns {
            let code = column.code.clone();
            if by_code.insert(code.clone(), column).is_some() {
                return Err(PipelineError::DuplicateStationCode { year, code });
            }
        }

        let restricted = codes
            .iter()
            .filter_map(|code| by_code.remove(code))
            .collect();

        Ok(HourlyTable::new(year, timestamps, restricted))
    }

    /// Attach the compound (locality, code) identity from metadata. A common
    /// station missing from the locality map is a metadata gap the run
    /// cannot paper over.
    pub fn attach_localities(
        table: HourlyTable,
        localities: &HashMap<String, String>,
    ) -> Result<HourlyTable> {
        let mut table = table;
        for column in &mut table.columns {
            let locality = localities.get(&column.code).ok_or_else(|| {
                PipelineError::MissingLocality {
                    code: column.code.clone(),
                }
            })?;
            column.locality = Some(locality.clone());
        }
        Ok(table)
    }

    /// Full reconciliation over a run: remap every yearly table, intersect
    /// the code sets, restrict each table to the intersection and attach
    /// localities.
    pub fn reconcile(
        &self,
        tables: Vec<HourlyTable>,
        localities: &HashMap<String, String>,
    ) -> Result<Vec<HourlyTable>> {
        let remapped: Vec<HourlyTable> =
            tables.into_iter().map(|t| self.remap_codes(t)).collect();

        let common = Self::common_codes(&remapped);

        remapped
            .into_iter()
            .map(|table| {
                let restricted = Self::restrict_to(table, &common)?;
                Self::attach_localities(restricted, localities)
            })
            .collect()
    }
}
