mod common;

use common::*;
use predicates::prelude::*;

#[test]
fn test_help_and_version() {
    AstrodayTest::new()
        .arg("--help")
        .assert_success_contains_all(&["Usage:", "snapshot", "schedule", "--day-parts"]);
    AstrodayTest::new()
        .args(["help", "schedule"])
        .assert_success_contains_all(&["recent events"]);
    AstrodayTest::new()
        .arg("--version")
        .assert_success_contains_all(&[concat!("astroday ", env!("CARGO_PKG_VERSION"))]);
}

#[test]
fn test_no_arguments_prints_usage() {
    astroday_command()
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Usage: astroday"));
}

#[test]
fn test_invalid_input_is_reported() {
    AstrodayTest::new()
        .args(["95", "10", "snapshot"])
        .assert_failure_with("Error: Latitude must be between -90 and 90, got 95");
    AstrodayTest::new()
        .args(["10", "200", "snapshot"])
        .assert_failure_with("Longitude must be between -180 and 180");
    AstrodayTest::new()
        .args(["--timezone=Mars/Base", "10", "10", "snapshot"])
        .assert_failure_with("Unknown timezone: Mars/Base");
    AstrodayTest::new()
        .args(["10", "10", "2024-13-45", "snapshot"])
        .assert_failure_with("Failed to parse date");
    AstrodayTest::new()
        .args(["--format=xml", "10", "10", "snapshot"])
        .assert_failure_with("Unknown output format 'xml'");
    AstrodayTest::new()
        .args(["--early-spring=02-30", "10", "10", "snapshot"])
        .assert_failure_with("'02-30' is not a calendar date");
    AstrodayTest::new()
        .args(["--horizon-morning=50", "10", "10", "snapshot"])
        .assert_failure_with("Morning horizon must be between -45 and 45");
    AstrodayTest::new()
        .args(["--neighbors", "10", "10", "schedule"])
        .assert_failure_with("not valid for schedule command");
    AstrodayTest::new()
        .args(["--offset=someday", "10", "10", "snapshot"])
        .assert_failure_with("Invalid day offset 'someday'");
}

#[test]
fn test_berlin_solstice_csv() {
    let out = berlin_solstice("snapshot").arg("--format=csv").stdout();
    assert!(out.starts_with("field,value\n"));
    assert_eq!(csv_value(&out, "ObsDate").as_deref(), Some("2024-06-21"));
    assert_eq!(csv_value(&out, "ObsTimezone").as_deref(), Some("2.00"));
    assert_eq!(csv_value(&out, "ObsIsDST").as_deref(), Some("1"));
    assert_eq!(csv_value(&out, "ObsSeason").as_deref(), Some("summer"));
    assert_eq!(csv_value(&out, "ObsMeteoSeason").as_deref(), Some("summer"));
    assert_eq!(csv_value(&out, "SunSign").as_deref(), Some("cancer"));

    let rise = minutes(&csv_value(&out, "SunRise").unwrap());
    let set = minutes(&csv_value(&out, "SunSet").unwrap());
    assert!((4 * 60 + 35..=4 * 60 + 52).contains(&rise), "rise {}", rise);
    assert!((21 * 60 + 25..=21 * 60 + 42).contains(&set), "set {}", set);

    let visible = minutes(&csv_value(&out, "SunHrsVisible").unwrap());
    let invisible = minutes(&csv_value(&out, "SunHrsInvisible").unwrap());
    assert_eq!(visible + invisible, 24 * 60);
    assert_eq!(csv_value(&out, "AstroTwilightMorning").as_deref(), Some("---"));
    assert_eq!(csv_value(&out, "DaySeasonalHrsDay").as_deref(), Some("12"));
}

#[test]
fn test_headers_can_be_disabled() {
    let out = berlin_solstice("snapshot")
        .args(["--format=csv", "--no-headers"])
        .stdout();
    assert!(out.starts_with("ObsDate,2024-06-21\n"), "{}", out);
}

#[test]
fn test_text_table() {
    berlin_solstice("snapshot").assert_success_contains_all(&[
        "┌",
        "│ Field",
        "│ Value",
        "ObsDate",
        "2024-06-21",
        "MoonPhaseS",
        "└",
    ]);
}

#[test]
fn test_english_labels() {
    berlin_solstice("snapshot")
        .arg("--labels")
        .assert_success_contains_all(&["Sunrise", "Sun sign", "Cancer", "Summer"]);
}

#[test]
fn test_json_snapshot_with_neighbors() {
    let out = berlin_solstice("snapshot")
        .args(["--format=json", "--neighbors"])
        .stdout();
    let line = out.trim();
    assert!(line.starts_with('{') && line.ends_with('}'));
    assert!(line.contains(r#""ObsDate":"2024-06-21""#));
    assert!(line.contains(r#""ObsIsDST":true"#));
    assert!(line.contains(r#""ObsDayofyear":173"#));
    for (key, date) in [
        ("2", "2024-06-23"),
        ("1", "2024-06-22"),
        ("-1", "2024-06-20"),
        ("-2", "2024-06-19"),
    ] {
        let nested = format!(r#""{}":{{"ObsDate":"{}""#, key, date);
        assert!(line.contains(&nested), "missing {}", nested);
    }
}

#[test]
fn test_csv_neighbors_adds_columns() {
    let out = berlin_solstice("snapshot")
        .args(["--format=csv", "--neighbors"])
        .stdout();
    assert!(out.starts_with("field,-2,-1,0,1,2\n"), "{}", out);
    assert!(out.contains("ObsDate,2024-06-19,2024-06-20,2024-06-21,2024-06-22,2024-06-23\n"));
}

#[test]
fn test_offset_selects_other_day() {
    let out = berlin_solstice("snapshot")
        .args(["--format=csv", "--offset=tomorrow"])
        .stdout();
    assert_eq!(csv_value(&out, "ObsDate").as_deref(), Some("2024-06-22"));
    assert_eq!(csv_value(&out, "ObsTime").as_deref(), Some("12:00:00"));

    let out = berlin_solstice("snapshot")
        .args(["--format=csv", "--offset=-10"])
        .stdout();
    assert_eq!(csv_value(&out, "ObsDate").as_deref(), Some("2024-06-11"));
}

#[test]
fn test_polar_day_and_night() {
    let summer = AstrodayTest::new()
        .args(["--format=csv", "--timezone=+00:00", "80", "0", "2024-06-21T12:00", "snapshot"])
        .stdout();
    assert_eq!(csv_value(&summer, "SunRise").as_deref(), Some("---"));
    assert_eq!(csv_value(&summer, "SunSet").as_deref(), Some("---"));
    assert_eq!(csv_value(&summer, "SunHrsVisible").as_deref(), Some("24:00"));
    assert_eq!(csv_value(&summer, "CivilTwilightMorning").as_deref(), Some("---"));

    let winter = AstrodayTest::new()
        .args(["--format=csv", "--timezone=+00:00", "80", "0", "2024-12-21T12:00", "snapshot"])
        .stdout();
    assert_eq!(csv_value(&winter, "SunRise").as_deref(), Some("---"));
    assert_eq!(csv_value(&winter, "SunHrsVisible").as_deref(), Some("00:00"));
    assert_eq!(csv_value(&winter, "SunHrsInvisible").as_deref(), Some("24:00"));
}

#[test]
fn test_half_hour_zone() {
    let out = AstrodayTest::new()
        .args([
            "--format=csv",
            "--timezone=+05:30",
            "28.61",
            "77.21",
            "2024-02-01T08:00",
            "snapshot",
        ])
        .stdout();
    assert_eq!(csv_value(&out, "ObsTimezone").as_deref(), Some("5.50"));
    assert_eq!(csv_value(&out, "ObsTime").as_deref(), Some("08:00:00"));
    assert_eq!(csv_value(&out, "ObsMeteoSeason").as_deref(), Some("winter"));
}

#[test]
fn test_dst_change_is_flagged() {
    let out = AstrodayTest::new()
        .args([
            "--format=csv",
            "--timezone=Europe/Berlin",
            "52.52",
            "13.405",
            "2024-03-31T12:00",
            "snapshot",
        ])
        .stdout();
    assert_eq!(csv_value(&out, "ObsIsDST").as_deref(), Some("1"));
    assert_eq!(
        csv_value(&out, "ObsIsDSTChange").as_deref(),
        Some("changed_today")
    );
}

#[test]
fn test_seasonal_hour_options() {
    let out = berlin_solstice("snapshot")
        .args(["--format=csv", "--day-parts=6", "--night-parts=4", "--roman"])
        .stdout();
    assert_eq!(csv_value(&out, "DaySeasonalHrsDay").as_deref(), Some("6"));
    assert_eq!(csv_value(&out, "DaySeasonalHrsNight").as_deref(), Some("4"));
    let index: i64 = csv_value(&out, "DaySeasonalHr").unwrap().parse().unwrap();
    assert!((1..=6).contains(&index), "noon falls in a day hour: {}", index);
}

#[test]
fn test_perf_reports_to_stderr() {
    berlin_solstice("snapshot")
        .args(["--format=csv", "--perf"])
        .command()
        .assert()
        .success()
        .stderr(predicate::str::contains("records in"));
}
