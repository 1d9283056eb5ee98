use chrono::NaiveDate;
use pm25_processor::cli::{run, Cli};
use pm25_processor::error::PipelineError;
use pm25_processor::utils::constants::sheet_archive_name;
use pm25_processor::utils::timestamps::days_in_year;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;
use zip::write::FileOptions;
use zip::ZipWriter;

/// Write a yearly archive whose sheet carries one column per station. Each
/// station's hourly value is constant within a day: 30.0 for its first
/// `exceed_days` days (daily mean 30.0, an exceedance), 5.0 afterwards.
/// The sheet follows the agency layout: title and footnote junk rows, a
/// `Kod stacji` header row, decimal commas, and the midnight reading of
/// each day stamped at 00:00 of the following day.
fn write_sheet_archive(
    data_dir: &Path,
    year: i32,
    stations: &[(&str, u32)],
    skip_last_day: bool,
) {
    let mut sheet = Vec::new();
    {
        let mut writer = csv::Writer::from_writer(&mut sheet);

        let mut title = vec!["Pomiary jakości powietrza - pył PM2.5".to_string()];
        title.resize(stations.len() + 1, String::new());
        writer.write_record(&title).unwrap();

        let mut header = vec!["Kod stacji".to_string()];
        header.extend(stations.iter().map(|(code, _)| code.to_string()));
        writer.write_record(&header).unwrap();

        let mut indicator = vec!["Wskaźnik".to_string()];
        indicator.resize(stations.len() + 1, "PM2.5".to_string());
        writer.write_record(&indicator).unwrap();

        let mut days = days_in_year(year) as u32;
        if skip_last_day {
            days -= 1;
        }
        let jan1 = NaiveDate::from_ymd_opt(year, 1, 1).unwrap();

        for day_idx in 0..days {
            let date = jan1 + chrono::Duration::days(day_idx as i64);
            for hour in 1..=24u32 {
                let ts = if hour == 24 {
                    date.succ_opt().unwrap().and_hms_opt(0, 0, 0).unwrap()
                } else {
                    date.and_hms_opt(hour, 0, 0).unwrap()
                };

                let mut row = vec![ts.format("%Y-%m-%d %H:%M:%S").to_string()];
                for (_, exceed_days) in stations {
                    let value = if day_idx < *exceed_days { "30,0" } else { "5,0" };
                    row.push(value.to_string());
                }
                writer.write_record(&row).unwrap();
            }
        }

        let mut footnote = vec!["Objaśnienia: wartości średnie godzinowe".to_string()];
        footnote.resize(stations.len() + 1, String::new());
        writer.write_record(&footnote).unwrap();
        writer.flush().unwrap();
    }

    let zip_path = data_dir.join(sheet_archive_name(year));
    let file = File::create(zip_path).unwrap();
    let mut zip = ZipWriter::new(file);
    zip.start_file(format!("{}_PM25_1g.csv", year), FileOptions::default())
        .unwrap();
    zip.write_all(&sheet).unwrap();
    zip.finish().unwrap();
}

/// Archive whose sheet carries the agency junk rows and the `Kod stacji`
/// header but not a single measurement row.
fn write_empty_sheet_archive(data_dir: &Path, year: i32, code: &str) {
    let mut sheet = Vec::new();
    {
        let mut writer = csv::Writer::from_writer(&mut sheet);
        writer
            .write_record(["Pomiary jakości powietrza - pył PM2.5", ""])
            .unwrap();
        writer.write_record(["Kod stacji", code]).unwrap();
        writer
            .write_record(["Objaśnienia: wartości średnie godzinowe", ""])
            .unwrap();
        writer.flush().unwrap();
    }

    let zip_path = data_dir.join(sheet_archive_name(year));
    let file = File::create(zip_path).unwrap();
    let mut zip = ZipWriter::new(file);
    zip.start_file(format!("{}_PM25_1g.csv", year), FileOptions::default())
        .unwrap();
    zip.write_all(&sheet).unwrap();
    zip.finish().unwrap();
}

fn write_metadata(data_dir: &Path) {
    let mut file = File::create(data_dir.join("station_metadata.csv")).unwrap();
    writeln!(
        file,
        "Nr,Kod stacji,Stary Kod stacji (o ile inny od aktualnego),Miejscowość,Województwo"
    )
    .unwrap();
    writeln!(file, "1,MzWarKondrat,MzWarKondrat1,Warszawa,mazowieckie").unwrap();
    writeln!(file, "2,DsWrocAlWisn,,Wrocław,dolnośląskie").unwrap();
    writeln!(file, "3,PdBialWarsz,,Białystok,podlaskie").unwrap();
}

fn write_config(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("report.yaml");
    let mut file = File::create(&path).unwrap();
    writeln!(file, "cities:").unwrap();
    writeln!(file, "  - Warszawa").unwrap();
    path
}

fn write_config_aborting_on_empty_sheet(dir: &Path) {
    let mut file = File::create(dir.join("report.yaml")).unwrap();
    writeln!(file, "cities:").unwrap();
    writeln!(file, "  - Warszawa").unwrap();
    writeln!(file, "on_empty_sheet: abort").unwrap();
}

fn cli(years: &[i32], dir: &TempDir) -> Cli {
    Cli {
        years: years.to_vec(),
        config: dir.path().join("report.yaml"),
        data_dir: dir.path().join("data"),
        output_dir: dir.path().join("results").join("pm25"),
        verbose: false,
    }
}

#[test]
fn test_two_year_run_end_to_end() {
    let dir = TempDir::new().unwrap();
    let data_dir = dir.path().join("data");
    std::fs::create_dir_all(&data_dir).unwrap();
    write_metadata(&data_dir);
    write_config(dir.path());

    // 2019 knows the station by its historical code and also carries a
    // station that disappears by 2021.
    write_sheet_archive(
        &data_dir,
        2019,
        &[("MzWarKondrat1", 10), ("DsWrocAlWisn", 3)],
        false,
    );
    write_sheet_archive(&data_dir, 2021, &[("MzWarKondrat", 5)], false);

    run(cli(&[2019, 2021], &dir)).unwrap();

    let results = dir.path().join("results").join("pm25");

    // The station absent from 2021 is excluded from both years; the
    // surviving station is keyed by its current code.
    let exceedance_2019 =
        std::fs::read_to_string(results.join("2019").join("exceedance_days.csv")).unwrap();
    assert_eq!(
        exceedance_2019,
        "station,exceedance_days\nWarszawa_MzWarKondrat,10\n"
    );

    let exceedance_2021 =
        std::fs::read_to_string(results.join("2021").join("exceedance_days.csv")).unwrap();
    assert_eq!(
        exceedance_2021,
        "station,exceedance_days\nWarszawa_MzWarKondrat,5\n"
    );

    // Regional rollup: one mazowieckie station with 10 exceedance days.
    let regional =
        std::fs::read_to_string(results.join("2019").join("voivodeship_exceedance.csv")).unwrap();
    assert_eq!(
        regional,
        "voivodeship,mean_exceedance_days\nmazowieckie,10.00\n"
    );

    // Monthly means cover all twelve months of each requested year.
    let monthly =
        std::fs::read_to_string(results.join("2021").join("monthly_means.csv")).unwrap();
    let lines: Vec<&str> = monthly.lines().collect();
    assert_eq!(lines[0], "month,Warszawa_MzWarKondrat");
    assert_eq!(lines.len(), 13);
    assert!(lines[1].starts_with("2021-01,"));

    // The configured city summary is written as well.
    let city =
        std::fs::read_to_string(results.join("2021").join("city_monthly_means.csv")).unwrap();
    assert!(city.starts_with("month,Warszawa\n"));
}

#[test]
fn test_leap_year_with_missing_day_aborts() {
    let dir = TempDir::new().unwrap();
    let data_dir = dir.path().join("data");
    std::fs::create_dir_all(&data_dir).unwrap();
    write_metadata(&data_dir);
    write_config(dir.path());

    write_sheet_archive(&data_dir, 2024, &[("MzWarKondrat", 0)], true);

    let result = run(cli(&[2024], &dir));

    match result {
        Err(PipelineError::DayCountMismatch {
            year,
            expected,
            actual,
        }) => {
            assert_eq!(year, 2024);
            assert_eq!(expected, 366);
            assert_eq!(actual, 365);
        }
        other => panic!("expected DayCountMismatch, got {:?}", other),
    }

    // Nothing is written for an aborted run.
    assert!(!dir.path().join("results").join("pm25").join("2024").exists());
}

#[test]
fn test_complete_leap_year_passes() {
    let dir = TempDir::new().unwrap();
    let data_dir = dir.path().join("data");
    std::fs::create_dir_all(&data_dir).unwrap();
    write_metadata(&data_dir);
    write_config(dir.path());

    write_sheet_archive(&data_dir, 2024, &[("MzWarKondrat", 2)], false);

    run(cli(&[2024], &dir)).unwrap();

    let exceedance = std::fs::read_to_string(
        dir.path()
            .join("results")
            .join("pm25")
            .join("2024")
            .join("exceedance_days.csv"),
    )
    .unwrap();
    assert_eq!(
        exceedance,
        "station,exceedance_days\nWarszawa_MzWarKondrat,2\n"
    );
}

#[test]
fn test_empty_sheet_in_warn_mode_reaches_the_day_count_gate() {
    // With the default warn mode the empty table flows downstream and the
    // day-count gate reports the real shortfall.
    let dir = TempDir::new().unwrap();
    let data_dir = dir.path().join("data");
    std::fs::create_dir_all(&data_dir).unwrap();
    write_metadata(&data_dir);
    write_config(dir.path());

    write_empty_sheet_archive(&data_dir, 2021, "MzWarKondrat");

    let result = run(cli(&[2021], &dir));

    match result {
        Err(PipelineError::DayCountMismatch {
            year,
            expected,
            actual,
        }) => {
            assert_eq!(year, 2021);
            assert_eq!(expected, 365);
            assert_eq!(actual, 0);
        }
        other => panic!("expected DayCountMismatch, got {:?}", other),
    }
}

#[test]
fn test_empty_sheet_in_abort_mode_fails_immediately() {
    let dir = TempDir::new().unwrap();
    let data_dir = dir.path().join("data");
    std::fs::create_dir_all(&data_dir).unwrap();
    write_metadata(&data_dir);
    write_config_aborting_on_empty_sheet(dir.path());

    write_empty_sheet_archive(&data_dir, 2021, "MzWarKondrat");

    let result = run(cli(&[2021], &dir));

    assert!(matches!(result, Err(PipelineError::EmptySheet { year: 2021 })));
}

#[test]
fn test_missing_archive_aborts_the_run() {
    let dir = TempDir::new().unwrap();
    let data_dir = dir.path().join("data");
    std::fs::create_dir_all(&data_dir).unwrap();
    write_metadata(&data_dir);
    write_config(dir.path());

    let result = run(cli(&[2018], &dir));

    assert!(matches!(result, Err(PipelineError::Io(_))));
}

#[test]
fn test_day_boundary_keeps_rows_inside_their_year() {
    // The sheet for a year ends with a reading stamped at 00:00 on Jan 1
    // of the next year; after correction every row must fall inside the
    // sheet's own year, or the day-count gate would reject the table.
    let dir = TempDir::new().unwrap();
    let data_dir = dir.path().join("data");
    std::fs::create_dir_all(&data_dir).unwrap();
    write_metadata(&data_dir);
    write_config(dir.path());

    write_sheet_archive(&data_dir, 2021, &[("MzWarKondrat", 0)], false);

    run(cli(&[2021], &dir)).unwrap();

    let monthly = std::fs::read_to_string(
        dir.path()
            .join("results")
            .join("pm25")
            .join("2021")
            .join("monthly_means.csv"),
    )
    .unwrap();
    let months: Vec<&str> = monthly.lines().skip(1).collect();
    assert_eq!(months.len(), 12);
    assert!(months.iter().all(|line| line.starts_with("2021-")));
}
