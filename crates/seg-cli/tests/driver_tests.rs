//! Driver runs against temporary directories.

use chrono::{DateTime, TimeZone, Utc};
use pretty_assertions::assert_eq;
use seg_cli::{convert, run, ConversionJob, DriverConfig, DriverError};
use seg_core::{MergeError, TimestampError};
use seg_test_utils::{sample_eaf, sample_seg_log, seg_log, GraphFixture, TEST_HEADER};
use std::fs;
use std::path::{Path, PathBuf};

const LOG_NAME: &str = "2007-03-07_1900_US_KTTV-FOX_Montel_Williams_Show.seg";
const CLIP_NAME: &str = "2007-03-07_1900_US_KTTV-FOX_Montel_Williams_Show_797-1277.eaf";

fn header_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2016, 2, 9, 23, 10, 0).unwrap()
}

fn write_input(dir: &Path) -> PathBuf {
    let input = dir.join(CLIP_NAME);
    fs::write(&input, sample_eaf("Jane Doe")).unwrap();
    input
}

fn clip_graph() -> GraphFixture {
    GraphFixture::new()
        .annotation("Speaker", 0, 1000, "Host")
        .annotation("Speech", 0, 1000, "hi")
}

/// Sample log with one clip record merged at 19:13:17 (797 s in)
fn expected_merge() -> String {
    seg_log(&[
        "TOP|20070307190000|2007-03-07_1900_US_KTTV-FOX_Montel_Williams_Show",
        "COL|Communication Studies Archive, UCLA",
        "UID|4d7e9b0e-8b4a-11e5-a0f0-0f0c0a0b0c0d",
        TEST_HEADER.trim_end(),
        "20070307190002.000|20070307190003.000|CC1|Welcome back.",
        "20070307190005.000|20070307190007.000|CC1|Today on the show",
        "20070307190009.000|20070307190011.000|CC1|we talk to families.",
        "20070307191317.000|20070307191318.000|GES_03|Speaker=Host|Speech=hi",
        "END|20070307200000|2007-03-07_1900_US_KTTV-FOX_Montel_Williams_Show",
    ])
}

fn no_staging() -> DriverConfig {
    DriverConfig::new().with_staging(false)
}

#[test]
fn merges_in_place_without_staging() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path());
    let output = dir.path().join(LOG_NAME);
    fs::write(&output, sample_seg_log()).unwrap();

    let job = ConversionJob::new(&input, &output).with_config(no_staging());
    let summary = run(&job, &clip_graph().build(), header_time()).unwrap();

    assert_eq!(summary.clip_offset_secs, 797);
    assert_eq!(summary.video_start_epoch_secs, 1_173_294_797);
    assert_eq!(summary.nodes, 2);
    assert_eq!(summary.records, 1);
    assert_eq!(summary.author, "Jane Doe");
    assert!(summary.merge.header_written);
    assert_eq!(summary.merge.records_flushed_at_end, 1);
    assert_eq!(fs::read_to_string(&output).unwrap(), expected_merge());
}

#[test]
fn convert_reads_exported_graph_next_to_input() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path());
    fs::write(input.with_extension("graph.json"), clip_graph().to_json()).unwrap();
    let output = dir.path().join(LOG_NAME);
    fs::write(&output, sample_seg_log()).unwrap();

    let job = ConversionJob::new(&input, &output).with_config(no_staging());
    let summary = convert(&job).unwrap();

    assert_eq!(summary.records, 1);
    let merged = fs::read_to_string(&output).unwrap();
    let line = "20070307191317.000|20070307191318.000|GES_03|Speaker=Host|Speech=hi\n";
    assert!(merged.contains(line));
    assert_eq!(merged.matches("Source_Person=Jane Doe").count(), 1);
}

#[test]
fn missing_graph_file_is_graph_error() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path());
    let output = dir.path().join(LOG_NAME);
    fs::write(&output, sample_seg_log()).unwrap();

    let job = ConversionJob::new(&input, &output).with_config(no_staging());
    assert!(matches!(convert(&job), Err(DriverError::Graph(_))));
    assert_eq!(fs::read_to_string(&output).unwrap(), sample_seg_log());
}

#[test]
fn stages_base_log_then_merges() {
    let staging = tempfile::tempdir().unwrap();
    let staged_dir = staging.path().join("2007").join("2007-03").join("2007-03-07");
    fs::create_dir_all(&staged_dir).unwrap();
    fs::write(staged_dir.join(LOG_NAME), sample_seg_log()).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path());
    let output = dir.path().join("merged").join(LOG_NAME);

    let config = DriverConfig::new().with_staging_root(staging.path());
    let job = ConversionJob::new(&input, &output).with_config(config);
    run(&job, &clip_graph().build(), header_time()).unwrap();

    assert_eq!(fs::read_to_string(&output).unwrap(), expected_merge());
    assert_eq!(
        fs::read_to_string(staged_dir.join(LOG_NAME)).unwrap(),
        sample_seg_log()
    );
}

#[test]
fn staging_refuses_to_replace_existing_output() {
    let staging = tempfile::tempdir().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path());
    let output = dir.path().join(LOG_NAME);
    fs::write(&output, "already merged\n").unwrap();

    let config = DriverConfig::new().with_staging_root(staging.path());
    let job = ConversionJob::new(&input, &output).with_config(config);
    let err = run(&job, &clip_graph().build(), header_time()).unwrap_err();

    assert!(matches!(err, DriverError::OutputExists(_)));
    assert_eq!(fs::read_to_string(&output).unwrap(), "already merged\n");
}

#[test]
fn overwrite_replaces_existing_output() {
    let staging = tempfile::tempdir().unwrap();
    let staged_dir = staging.path().join("2007/2007-03/2007-03-07");
    fs::create_dir_all(&staged_dir).unwrap();
    fs::write(staged_dir.join(LOG_NAME), sample_seg_log()).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path());
    let output = dir.path().join(LOG_NAME);
    fs::write(&output, "already merged\n").unwrap();

    let config = DriverConfig::new()
        .with_staging_root(staging.path())
        .with_overwrite(true);
    let job = ConversionJob::new(&input, &output).with_config(config);
    run(&job, &clip_graph().build(), header_time()).unwrap();

    assert_eq!(fs::read_to_string(&output).unwrap(), expected_merge());
}

#[test]
fn failed_merge_keeps_output_when_overwriting() {
    let staging = tempfile::tempdir().unwrap();
    let staged_dir = staging.path().join("2007/2007-03/2007-03-07");
    fs::create_dir_all(&staged_dir).unwrap();
    fs::write(staged_dir.join(LOG_NAME), "20070307190001.000|a|CC1|x\n").unwrap();

    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path());
    let output = dir.path().join(LOG_NAME);
    fs::write(&output, "PREVIOUS MERGED LOG\n").unwrap();

    let config = DriverConfig::new()
        .with_staging_root(staging.path())
        .with_overwrite(true);
    let job = ConversionJob::new(&input, &output).with_config(config);
    let err = run(&job, &clip_graph().build(), header_time()).unwrap_err();

    assert!(matches!(
        err,
        DriverError::Merge(MergeError::MissingTerminalMarker { pending: 1 })
    ));
    assert_eq!(fs::read_to_string(&output).unwrap(), "PREVIOUS MERGED LOG\n");
    assert_eq!(
        fs::read_to_string(staged_dir.join(LOG_NAME)).unwrap(),
        "20070307190001.000|a|CC1|x\n"
    );
}

#[test]
fn oversized_clip_offset_is_out_of_range() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("clip_9223372036854775000-1.eaf");
    fs::write(&input, sample_eaf("Jane Doe")).unwrap();
    let output = dir.path().join(LOG_NAME);
    fs::write(&output, sample_seg_log()).unwrap();

    let job = ConversionJob::new(&input, &output).with_config(no_staging());
    let err = run(&job, &clip_graph().build(), header_time()).unwrap_err();

    assert!(matches!(
        err,
        DriverError::Timestamp(TimestampError::OutOfRange(_))
    ));
    assert_eq!(fs::read_to_string(&output).unwrap(), sample_seg_log());
}

#[test]
fn missing_staged_log() {
    let staging = tempfile::tempdir().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path());
    let output = dir.path().join(LOG_NAME);

    let config = DriverConfig::new().with_staging_root(staging.path());
    let job = ConversionJob::new(&input, &output).with_config(config);
    let err = run(&job, &clip_graph().build(), header_time()).unwrap_err();
    assert!(matches!(err, DriverError::MissingStagedLog(_)));
}

#[test]
fn missing_base_log_without_staging() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path());

    let job = ConversionJob::new(&input, dir.path().join(LOG_NAME)).with_config(no_staging());
    let err = run(&job, &clip_graph().build(), header_time()).unwrap_err();
    assert!(matches!(err, DriverError::MissingBaseLog(_)));
}

#[test]
fn missing_input() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join(LOG_NAME);
    fs::write(&output, sample_seg_log()).unwrap();

    let job = ConversionJob::new(dir.path().join(CLIP_NAME), &output).with_config(no_staging());
    let err = run(&job, &clip_graph().build(), header_time()).unwrap_err();
    assert!(matches!(err, DriverError::MissingInput(_)));
}

#[test]
fn unparsable_log_name() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path());
    let output = dir.path().join("montel.seg");
    fs::write(&output, sample_seg_log()).unwrap();

    let job = ConversionJob::new(&input, &output).with_config(no_staging());
    let err = run(&job, &clip_graph().build(), header_time()).unwrap_err();
    assert!(matches!(err, DriverError::InvalidLogName(_)));
}

#[test]
fn malformed_graph_leaves_log_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path());
    let output = dir.path().join(LOG_NAME);
    fs::write(&output, sample_seg_log()).unwrap();

    let graph = clip_graph().orphan("Gesture").build();
    let job = ConversionJob::new(&input, &output).with_config(no_staging());
    let err = run(&job, &graph, header_time()).unwrap_err();

    assert!(matches!(err, DriverError::Aggregate(_)));
    assert_eq!(fs::read_to_string(&output).unwrap(), sample_seg_log());
}
