use vehicle_explorer::config::{AppConfig, FULL_DATASET_FILE};
use vehicle_explorer::dashboard::Dashboard;
use vehicle_explorer::error::ExplorerError;
use vehicle_explorer::state::{Button, ChartRequest, DataStatus, Event, FilterChange, Session};

use crate::{VEHICLES_CSV, dashboard_for, data_dir_with};

fn apply(dashboard: &mut Dashboard, session: Session, events: Vec<Event>) -> Session {
    events
        .into_iter()
        .fold(session, |s, event| dashboard.handle(&s, event))
}

#[test]
fn test_initial_render_uses_bundled_sample() {
    let dir = data_dir_with(VEHICLES_CSV);
    let mut dashboard = dashboard_for(dir.path());
    let session = dashboard.start();
    assert!(matches!(session.data, DataStatus::Ready(_)));

    let state = dashboard.render(&session).unwrap();
    assert_eq!(state.data_name, "vehicles_us_sample.csv");
    assert_eq!(state.loaded_rows, 10);
    assert_eq!(state.loaded_columns, 6);
    assert_eq!(state.numeric_columns, vec!["price", "odometer", "model_year"]);
    assert_eq!(state.categorical_columns, vec!["condition", "fuel", "model"]);
    assert_eq!(state.view.year_bounds, Some((2005, 2019)));
    assert_eq!(state.hist_column, "odometer");
    assert_eq!(state.x_column, "odometer");
    assert_eq!(state.y_column, "price");
    assert!(state.log_y);
    assert_eq!(state.chart, None);
    assert!(state.histogram.is_none());
    assert!(state.scatter.is_none());
}

#[test]
fn test_full_file_takes_precedence() {
    let dir = data_dir_with(VEHICLES_CSV);
    std::fs::write(
        dir.path().join(FULL_DATASET_FILE),
        "price,odometer,model_year\n1000,10,2000\n",
    )
    .unwrap();
    let mut dashboard = dashboard_for(dir.path());
    let session = dashboard.start();

    let state = dashboard.render(&session).unwrap();
    assert_eq!(state.data_name, "vehicles_us.csv");
    assert_eq!(state.loaded_rows, 1);
}

#[test]
fn test_year_range_filters_inclusively() {
    let dir = data_dir_with(VEHICLES_CSV);
    let mut dashboard = dashboard_for(dir.path());
    let session = dashboard.start();
    let session = apply(
        &mut dashboard,
        session,
        vec![
            Event::FilterChanged(FilterChange::YearRange(2010, 2015)),
            Event::ButtonClicked(Button::ShowHistogram),
        ],
    );

    let state = dashboard.render(&session).unwrap();
    assert_eq!(state.view.year_range, Some((2010, 2015)));
    assert_eq!(state.view.filtered.len(), 5);
    let hist = state.histogram.unwrap();
    assert_eq!(hist.total(), 5);
}

#[test]
fn test_rows_without_year_are_dropped_by_the_filter() {
    let csv = format!("{VEHICLES_CSV}11000,70000,,good,gas,sedan\n");
    let dir = data_dir_with(&csv);
    let mut dashboard = dashboard_for(dir.path());
    let session = dashboard.start();

    let state = dashboard.render(&session).unwrap();
    assert_eq!(state.loaded_rows, 11);
    assert_eq!(state.view.filtered.len(), 10);
}

#[test]
fn test_duplicate_rows_are_removed() {
    let csv = format!("{VEHICLES_CSV}12000,60000,2012,good,gas,sedan\n");
    let dir = data_dir_with(&csv);
    let mut dashboard = dashboard_for(dir.path());
    let session = dashboard.start();

    let state = dashboard.render(&session).unwrap();
    assert_eq!(state.loaded_rows, 11);
    assert_eq!(state.view.filtered.len(), 10);
}

#[test]
fn test_bins_change_only_affects_bin_count() {
    let dir = data_dir_with(VEHICLES_CSV);
    let mut dashboard = dashboard_for(dir.path());
    let session = dashboard.start();
    let session = dashboard.handle(&session, Event::ButtonClicked(Button::ShowHistogram));

    let before = dashboard.render(&session).unwrap();
    assert_eq!(before.histogram.as_ref().unwrap().bins.len(), 40);

    let session = dashboard.handle(&session, Event::FilterChanged(FilterChange::Bins(20)));
    let after = dashboard.render(&session).unwrap();
    let hist = after.histogram.as_ref().unwrap();
    assert_eq!(hist.bins.len(), 20);
    assert_eq!(hist.total(), 10);
    assert_eq!(hist.column, before.histogram.as_ref().unwrap().column);
    assert_eq!(after.view, before.view);
}

#[test]
fn test_scatter_defaults_and_log_toggle() {
    let dir = data_dir_with(VEHICLES_CSV);
    let mut dashboard = dashboard_for(dir.path());
    let session = dashboard.start();
    let session = dashboard.handle(&session, Event::ButtonClicked(Button::ShowScatter));

    let state = dashboard.render(&session).unwrap();
    assert_eq!(state.chart, Some(ChartRequest::Scatter));
    let scatter = state.scatter.unwrap();
    assert!(scatter.log_y);
    assert_eq!(scatter.point_count(), 10);
    assert_eq!(scatter.series.len(), 1);
    assert_eq!(
        scatter.hover_columns,
        vec!["model_year", "condition", "fuel", "model"]
    );

    // Y away from price defaults to linear; back to price restores log.
    let session = apply(
        &mut dashboard,
        session,
        vec![
            Event::FilterChanged(FilterChange::YColumn("model_year".into())),
            Event::FilterChanged(FilterChange::LogY(true)),
        ],
    );
    assert!(dashboard.render(&session).unwrap().log_y);
    let session = dashboard.handle(
        &session,
        Event::FilterChanged(FilterChange::YColumn("odometer".into())),
    );
    assert!(!dashboard.render(&session).unwrap().log_y);
}

#[test]
fn test_color_column_groups_points() {
    let dir = data_dir_with(VEHICLES_CSV);
    let mut dashboard = dashboard_for(dir.path());
    let session = dashboard.start();
    let session = apply(
        &mut dashboard,
        session,
        vec![
            Event::ButtonClicked(Button::ShowScatter),
            Event::FilterChanged(FilterChange::ColorColumn(Some("fuel".into()))),
        ],
    );

    let scatter = dashboard.render(&session).unwrap().scatter.unwrap();
    let labels: Vec<&str> = scatter.series.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(labels, vec!["gas", "diesel", "hybrid", "electric"]);
    assert_eq!(scatter.point_count(), 10);
}

#[test]
fn test_single_numeric_column_warns_for_scatter_only() {
    let csv = "price,condition,fuel,model\n\
               12000,good,gas,sedan\n\
               8000,fair,gas,pickup\n\
               15000,like new,diesel,suv\n";
    let dir = data_dir_with(csv);
    let mut dashboard = dashboard_for(dir.path());
    let session = dashboard.start();

    let session = dashboard.handle(&session, Event::ButtonClicked(Button::ShowScatter));
    let state = dashboard.render(&session).unwrap();
    assert_eq!(
        state.scatter_warning,
        Some(ExplorerError::TooFewNumericColumns { found: 1 })
    );
    assert!(state.scatter.is_none());

    let session = dashboard.handle(&session, Event::ButtonClicked(Button::ShowHistogram));
    let state = dashboard.render(&session).unwrap();
    assert_eq!(state.hist_column, "price");
    assert_eq!(state.histogram.unwrap().total(), 3);
}

#[test]
fn test_no_numeric_columns_blocks_rendering() {
    let dir = data_dir_with("condition,fuel\ngood,gas\nfair,diesel\n");
    let mut dashboard = dashboard_for(dir.path());
    let session = dashboard.start();

    assert_eq!(
        dashboard.render(&session).unwrap_err(),
        ExplorerError::NoNumericColumns
    );
}

#[test]
fn test_export_contains_filtered_rows() {
    let dir = data_dir_with(VEHICLES_CSV);
    let mut dashboard = dashboard_for(dir.path());
    let session = dashboard.start();
    let session = apply(
        &mut dashboard,
        session,
        vec![
            Event::FilterChanged(FilterChange::YearRange(2007, 2015)),
            Event::ButtonClicked(Button::Export),
        ],
    );

    let payload = session.pending_export.clone().unwrap();
    assert_eq!(payload.file_name, "vehicles_filtered.csv");
    let text = String::from_utf8(payload.bytes.to_vec()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 8);
    assert_eq!(lines[0], "price,odometer,model_year,condition,fuel,model");
    assert_eq!(lines[1], "12000,60000,2012,good,gas,sedan");

    // The payload is one-shot.
    let next = dashboard.handle(&session, Event::ButtonClicked(Button::ShowHistogram));
    assert!(next.pending_export.is_none());
}

#[test]
fn test_export_without_data_sets_notice() {
    let dir = tempfile::tempdir().unwrap();
    let mut dashboard = dashboard_for(dir.path());
    let session = dashboard.start();
    let session = dashboard.handle(&session, Event::ButtonClicked(Button::Export));

    assert!(session.pending_export.is_none());
    assert!(session.notice.is_some());
}

#[test]
fn test_missing_source_reports_candidates() {
    let dir = tempfile::tempdir().unwrap();
    let mut dashboard = dashboard_for(dir.path());
    let session = dashboard.start();
    assert_eq!(session.data, DataStatus::Missing);

    match dashboard.render(&session) {
        Err(ExplorerError::NoDataSource { dir: d, candidates }) => {
            assert_eq!(d, dir.path());
            assert_eq!(candidates, AppConfig::default().candidate_files);
        }
        other => panic!("expected NoDataSource, got {other:?}"),
    }
}

#[test]
fn test_missing_source_is_cached_until_reset() {
    let dir = tempfile::tempdir().unwrap();
    let mut dashboard = dashboard_for(dir.path());
    let session = dashboard.start();
    assert!(dashboard.render(&session).is_err());

    std::fs::write(
        dir.path().join(vehicle_explorer::config::SAMPLE_DATASET_FILE),
        VEHICLES_CSV,
    )
    .unwrap();

    // Same source again: still the cached "missing".
    let session = dashboard.handle(&session, Event::FilterChanged(FilterChange::ShowRaw(true)));
    let session = dashboard.handle(
        &session,
        Event::SourceChanged(vehicle_explorer::state::SourceChoice::Bundled),
    );
    assert!(dashboard.render(&session).is_err());

    let session = dashboard.handle(&session, Event::ButtonClicked(Button::Reset));
    let state = dashboard.render(&session).unwrap();
    assert_eq!(state.loaded_rows, 10);
    let raw = state.raw_rows.unwrap();
    assert_eq!(raw.len(), 10);
}

#[test]
fn test_reset_reloads_and_keeps_filters() {
    let dir = data_dir_with(VEHICLES_CSV);
    let mut dashboard = dashboard_for(dir.path());
    let session = dashboard.start();
    assert_eq!(dashboard.cache().loads(), 1);

    let session = dashboard.handle(
        &session,
        Event::FilterChanged(FilterChange::YearRange(2010, 2015)),
    );
    let session = dashboard.handle(&session, Event::FilterChanged(FilterChange::Bins(60)));
    assert_eq!(dashboard.cache().loads(), 1);

    let session = dashboard.handle(&session, Event::ButtonClicked(Button::Reset));
    assert_eq!(dashboard.cache().loads(), 2);
    assert_eq!(session.filters.year_range, Some((2010, 2015)));
    assert_eq!(session.filters.bins, 60);
}

#[test]
fn test_sampling_is_reproducible() {
    let dir = data_dir_with(VEHICLES_CSV);
    let config = AppConfig {
        data_dir: dir.path().to_path_buf(),
        sample_limit: 4,
        ..AppConfig::default()
    };
    let mut first = Dashboard::new(config.clone());
    let mut second = Dashboard::new(config);
    let s1 = first.start();
    let s2 = second.start();

    let a = first.render(&s1).unwrap();
    let b = second.render(&s2).unwrap();
    assert!(a.view.sampled);
    assert_eq!(a.view.scatter.len(), 4);
    assert_eq!(a.view.scatter, b.view.scatter);
    assert_eq!(a.view.filtered.len(), 10);

    let s1 = first.handle(&s1, Event::FilterChanged(FilterChange::UseSample(false)));
    let full = first.render(&s1).unwrap();
    assert!(!full.view.sampled);
    assert_eq!(full.view.scatter.len(), 10);
}
