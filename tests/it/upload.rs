use vehicle_explorer::data::loader::Upload;
use vehicle_explorer::error::ExplorerError;
use vehicle_explorer::state::{DataStatus, Event, SourceChoice};

use crate::{VEHICLES_CSV, dashboard_for, data_dir_with};

#[test]
fn test_upload_without_file_awaits_upload() {
    let dir = data_dir_with(VEHICLES_CSV);
    let mut dashboard = dashboard_for(dir.path());
    let session = dashboard.start();
    let session = dashboard.handle(&session, Event::SourceChanged(SourceChoice::Upload));

    assert_eq!(session.data, DataStatus::AwaitingUpload);
    assert_eq!(
        dashboard.render(&session).unwrap_err(),
        ExplorerError::AwaitingUpload
    );
}

#[test]
fn test_uploaded_csv_replaces_bundled_data() {
    let dir = data_dir_with(VEHICLES_CSV);
    let mut dashboard = dashboard_for(dir.path());
    let session = dashboard.start();
    let upload = Upload::new(
        "mine.csv",
        b"price,odometer,model_year\n1000,5,2001\n2000,6,2002\n".to_vec(),
    );
    let session = dashboard.handle(&session, Event::FileUploaded(upload));

    let state = dashboard.render(&session).unwrap();
    assert_eq!(state.data_name, "mine.csv");
    assert_eq!(state.loaded_rows, 2);
    assert_eq!(state.view.year_bounds, Some((2001, 2002)));

    // Switching back hits the cache.
    let session = dashboard.handle(&session, Event::SourceChanged(SourceChoice::Bundled));
    assert_eq!(dashboard.render(&session).unwrap().loaded_rows, 10);
    assert_eq!(dashboard.cache().loads(), 2);
    assert!(session.upload.is_some());
}

#[test]
fn test_uploaded_json_records() {
    let dir = data_dir_with(VEHICLES_CSV);
    let mut dashboard = dashboard_for(dir.path());
    let session = dashboard.start();
    let upload = Upload::new(
        "listings.json",
        br#"[{"price": 1000, "odometer": 5, "fuel": "gas"},
             {"price": 2500.5, "odometer": 7, "fuel": "diesel"}]"#
            .to_vec(),
    );
    let session = dashboard.handle(&session, Event::FileUploaded(upload));

    let state = dashboard.render(&session).unwrap();
    assert_eq!(state.loaded_rows, 2);
    assert_eq!(state.numeric_columns, vec!["price", "odometer"]);
    assert_eq!(state.categorical_columns, vec!["fuel"]);
    assert_eq!(state.view.year_bounds, None);
}

#[test]
fn test_malformed_upload_reports_load_failure() {
    let dir = data_dir_with(VEHICLES_CSV);
    let mut dashboard = dashboard_for(dir.path());
    let session = dashboard.start();
    let upload = Upload::new("bad.csv", b"a,b\n1,2\n3,4,5\n".to_vec());
    let session = dashboard.handle(&session, Event::FileUploaded(upload));

    match dashboard.render(&session) {
        Err(ExplorerError::LoadFailed { name, message }) => {
            assert_eq!(name, "bad.csv");
            assert!(!message.is_empty());
        }
        other => panic!("expected LoadFailed, got {other:?}"),
    }
}

#[test]
fn test_unreadable_upload_event() {
    let dir = data_dir_with(VEHICLES_CSV);
    let mut dashboard = dashboard_for(dir.path());
    let session = dashboard.start();
    let session = dashboard.handle(
        &session,
        Event::UploadFailed {
            name: "gone.csv".into(),
            message: "No such file".into(),
        },
    );

    assert_eq!(session.source, SourceChoice::Upload);
    assert!(matches!(
        dashboard.render(&session),
        Err(ExplorerError::LoadFailed { .. })
    ));
}

#[test]
fn test_nan_and_negative_zero_rows_are_deduplicated() {
    let dir = data_dir_with(VEHICLES_CSV);
    let mut dashboard = dashboard_for(dir.path());
    let session = dashboard.start();
    let upload = Upload::new(
        "odd.csv",
        b"price,odometer\n-nan,5\n-nan,5\n1,2\n0.0,5.5\n-0.0,5.5\n".to_vec(),
    );
    let session = dashboard.handle(&session, Event::FileUploaded(upload));

    let state = dashboard.render(&session).unwrap();
    assert_eq!(state.loaded_rows, 5);
    assert_eq!(state.view.filtered.len(), 3);
}

#[test]
fn test_replaced_upload_is_evicted_from_cache() {
    let dir = data_dir_with(VEHICLES_CSV);
    let mut dashboard = dashboard_for(dir.path());
    let session = dashboard.start();
    let first = Upload::new("a.csv", b"price\n1\n".to_vec());
    let second = Upload::new("b.csv", b"price\n2\n".to_vec());

    let session = dashboard.handle(&session, Event::FileUploaded(first.clone()));
    // Re-picking the same file is a cache hit.
    let session = dashboard.handle(&session, Event::FileUploaded(first));
    assert_eq!(dashboard.cache().loads(), 2);
    assert_eq!(dashboard.cache().len(), 2);

    let session = dashboard.handle(&session, Event::FileUploaded(second));
    assert_eq!(dashboard.cache().loads(), 3);
    // Bundled data plus the latest upload.
    assert_eq!(dashboard.cache().len(), 2);
    assert_eq!(dashboard.render(&session).unwrap().data_name, "b.csv");
}
