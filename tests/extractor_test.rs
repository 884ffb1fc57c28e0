use notihist::config::ExtractorConfig;
use notihist::parsing::history_proto::{NotificationHistoryProto, NotificationProto, StringPoolProto};
use notihist::parsing::HistoryStatus;
use notihist::sources::{ArtifactKind, ArtifactScanner};
use notihist::Extractor;
use prost::Message;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn history_bytes(package_index: i32, posted_time_ms: i64, count: usize) -> Vec<u8> {
    NotificationHistoryProto {
        string_pool: Some(StringPoolProto {
            size: Some(2),
            strings: vec!["General".to_string(), "com.example.app".to_string()],
        }),
        major_version: Some(1),
        notification: (0..count)
            .map(|i| NotificationProto {
                package_index: Some(package_index),
                channel_name_index: Some(1),
                uid: Some(10123),
                user_id: Some(0),
                posted_time_ms: Some(posted_time_ms + i as i64 * 1000),
                title: Some(format!("Message {}", i)),
                ..Default::default()
            })
            .collect(),
    }
    .encode_to_vec()
}

fn write(root: &Path, relative: &str, contents: &[u8]) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn extraction_tree() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    let history = "data/system_ce/0/notification_history/history";
    write(root, &format!("{}/1700000000000", history), &history_bytes(2, 1_700_000_000_000, 2));
    write(root, &format!("{}/1700086400000", history), &history_bytes(2, 1_700_086_400_000, 3));
    write(root, &format!("{}/1700172800000", history), &[0xff; 16]);
    write(
        root,
        "data/system_ce/10/notification_history/history/1700000500000",
        &history_bytes(7, 1_700_000_500_000, 1),
    );

    write(
        root,
        "data/system/users/0/settings_secure.xml",
        br#"<settings version="-1"><setting id="3" name="notification_history_enabled" value="0" package="android" /></settings>"#,
    );
    write(
        root,
        "data/system/notification_policy.xml",
        br#"<notification-policy version="1"><snoozed-notifications><notification key="0|com.example.app|1|null|10123" time="1700000000000" /></snoozed-notifications></notification-policy>"#,
    );
    write(root, "data/system/users/0/settings_global.xml", b"<settings />");
    write(root, "data/misc/notes.txt", b"unrelated");

    dir
}

#[test]
fn test_scanner_finds_artifacts() {
    let dir = extraction_tree();
    let files = ArtifactScanner::new(dir.path()).scan().unwrap();

    assert_eq!(files.len(), 6);
    let histories = files.iter().filter(|f| matches!(f.kind, ArtifactKind::History { .. })).count();
    assert_eq!(histories, 4);
    assert!(files.iter().any(|f| f.kind == ArtifactKind::NotificationPolicy));
    assert!(files
        .iter()
        .any(|f| f.kind == ArtifactKind::SettingsSecure { user: "0".to_string() }));
    assert!(files.windows(2).all(|w| w[0].path <= w[1].path));
}

#[test]
fn test_scanner_rejects_missing_root() {
    let dir = TempDir::new().unwrap();
    assert!(ArtifactScanner::new(dir.path().join("missing")).scan().is_err());
}

#[test]
fn test_extractor_skips_undecodable_file() {
    let dir = extraction_tree();
    let files = ArtifactScanner::new(dir.path()).scan().unwrap();
    let report = Extractor::new(ExtractorConfig::default()).run(&files);

    assert_eq!(report.notifications.len(), 6);
    assert_eq!(report.skipped.len(), 1);
    assert!(report.skipped[0].path.ends_with("1700172800000"));

    let first = &report.notifications[0];
    assert_eq!(first.package, "com.example.app");
    assert_eq!(first.channel_name, "General");
    assert_eq!(first.source_file_name, "1700000000000");

    // index 7 misses the two-entry pool
    let other_user = report
        .notifications
        .iter()
        .find(|row| row.source_file_name == "1700000500000")
        .unwrap();
    assert_eq!(other_user.package, "");

    assert_eq!(report.statuses.len(), 1);
    assert_eq!(report.statuses[0].status, HistoryStatus::Disabled);
    assert_eq!(report.snoozed.len(), 1);
}

#[test]
fn test_parallel_run_keeps_order() {
    let dir = extraction_tree();
    let files = ArtifactScanner::new(dir.path()).scan().unwrap();

    let sequential = Extractor::new(ExtractorConfig::default()).run(&files);
    let parallel =
        Extractor::new(ExtractorConfig { worker_threads: 3, ..ExtractorConfig::default() })
            .run(&files);

    assert_eq!(sequential.notifications, parallel.notifications);
    assert_eq!(sequential.statuses, parallel.statuses);
    assert_eq!(sequential.snoozed, parallel.snoozed);
    assert_eq!(sequential.skipped, parallel.skipped);
}

#[test]
fn test_size_limit_skips_large_files() {
    let dir = extraction_tree();
    let files = ArtifactScanner::new(dir.path()).scan().unwrap();
    let config = ExtractorConfig { max_history_file_bytes: 8, ..ExtractorConfig::default() };
    let report = Extractor::new(config).run(&files);

    assert!(report.notifications.is_empty());
    assert_eq!(report.skipped.len(), 4);
    assert_eq!(report.statuses.len(), 1);
}
