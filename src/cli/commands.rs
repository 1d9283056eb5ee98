use crate::analyzers::{ExceedanceAnalyzer, MonthlyAnalyzer};
use crate::archive::ArchiveExtractor;
use crate::cli::args::Cli;
use crate::config::{FailureMode, ReportConfig};
use crate::error::{PipelineError, Result};
use crate::models::HourlyTable;
use crate::processors::{
    combine_years, correct_day_boundary, CodeReconciler, ConsistencyChecker, ShapeNormalizer,
};
use crate::readers::{
    build_code_lookup, build_locality_map, build_voivodeship_map, MetadataReader, SheetReader,
};
use crate::utils::constants::{
    sheet_archive_name, sheet_file_name, CITY_MONTHLY_MEANS_FILE, EXCEEDANCE_DAYS_FILE,
    METADATA_FILE, MONTHLY_MEANS_FILE, VOIVODESHIP_EXCEEDANCE_FILE,
};
use crate::utils::progress::ProgressReporter;
use crate::writers::CsvWriter;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

pub fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose);

    let report_config = ReportConfig::load(&cli.config)?;

    let mut years = cli.years.clone();
    years.sort_unstable();
    years.dedup();

    println!("Processing PM2.5 data for years {:?}", years);
    println!("Data directory: {}", cli.data_dir.display());
    println!("Output directory: {}", cli.output_dir.display());

    // Station metadata and the lookups derived from it, built once per run.
    let metadata_path = cli.data_dir.join(METADATA_FILE);
    let stations = MetadataReader::new().read_stations(&metadata_path)?;
    println!("Loaded {} stations from metadata", stations.len());

    let code_lookup = build_code_lookup(&stations);
    if code_lookup.is_empty() {
        match report_config.on_empty_lookup {
            FailureMode::Warn => {
                warn!("historical-code lookup is empty; treating all codes as current")
            }
            FailureMode::Abort => return Err(PipelineError::EmptyCodeLookup),
        }
    }
    let localities = build_locality_map(&stations);
    let voivodeships = build_voivodeship_map(&stations);

    // Clean each yearly sheet.
    let progress = ProgressReporter::new(years.len() as u64, "Cleaning yearly sheets", false);
    let extractor = ArchiveExtractor::new()?;
    let sheet_reader = SheetReader::new();
    let normalizer = ShapeNormalizer::new();

    let mut yearly_tables: Vec<HourlyTable> = Vec::with_capacity(years.len());
    for &year in &years {
        progress.set_message(&format!("Cleaning {} sheet", year));

        let archive_path = cli.data_dir.join(sheet_archive_name(year));
        let sheet_path = extractor.extract_sheet(&archive_path, &sheet_file_name(year))?;

        let rows = sheet_reader.read_filtered(&sheet_path)?;
        if !SheetReader::has_measurement_rows(&rows) {
            match report_config.on_empty_sheet {
                FailureMode::Warn => {
                    warn!(year, "no measurement rows survived filtering")
                }
                FailureMode::Abort => return Err(PipelineError::EmptySheet { year }),
            }
        }

        let table = normalizer.normalize(year, rows)?;
        info!(
            year,
            rows = table.row_count(),
            stations = table.column_count(),
            "cleaned yearly sheet"
        );
        yearly_tables.push(table);
        progress.increment(1);
    }
    progress.finish_with_message("Yearly sheets cleaned");

    // Reconcile codes across years, fix the day boundary, then gate.
    let reconciler = CodeReconciler::new(code_lookup);
    let reconciled = reconciler.reconcile(yearly_tables, &localities)?;
    let corrected: Vec<HourlyTable> = reconciled.into_iter().map(correct_day_boundary).collect();

    ConsistencyChecker::new().check_all(&corrected)?;
    println!(
        "Consistency checks passed: {} stations common to all years",
        corrected.first().map(|t| t.column_count()).unwrap_or(0)
    );

    let combined = combine_years(corrected)?;
    info!(rows = combined.row_count(), "combined multi-year table built");

    // Aggregates.
    let monthly = MonthlyAnalyzer::new();
    let station_monthly = monthly.station_monthly_means(&combined, &years);
    let city_monthly =
        monthly.locality_monthly_means(&combined, &years, &report_config.cities);

    let exceedance = ExceedanceAnalyzer::new();
    let station_counts = exceedance.count_exceedance_days(&combined, &years);
    let regional = exceedance.voivodeship_summary(&station_counts, &voivodeships);

    // Per-year output partitions.
    let writer = CsvWriter::new();
    for &year in &years {
        let year_dir = cli.output_dir.join(year.to_string());
        writer.write_monthly_means(&year_dir.join(MONTHLY_MEANS_FILE), &station_monthly, year)?;
        if !city_monthly.is_empty() {
            writer.write_monthly_means(
                &year_dir.join(CITY_MONTHLY_MEANS_FILE),
                &city_monthly,
                year,
            )?;
        }
        writer.write_exceedance_days(&year_dir.join(EXCEEDANCE_DAYS_FILE), &station_counts, year)?;
        writer.write_voivodeship_summary(
            &year_dir.join(VOIVODESHIP_EXCEEDANCE_FILE),
            &regional,
            year,
        )?;
    }

    println!(
        "Processing complete! Tables written under {}",
        cli.output_dir.display()
    );

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    // A second init (e.g. from tests) is fine to ignore.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
