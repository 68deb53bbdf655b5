// gitshallow: Shallow git source sync driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{LogConfig, LogLevel, SyncOperation};

#[test]
fn test_log_level_conversion() {
    let conversions: Vec<(&str, u8)> = vec![
        ("from_int(0)", LogLevel::from_int(0).as_u8()),
        ("from_int(3)", LogLevel::from_int(3).as_u8()),
        ("from_int(5)", LogLevel::from_int(5).as_u8()),
        ("from_int(100)", LogLevel::from_int(100).as_u8()),
    ];
    assert_eq!(
        conversions,
        vec![
            ("from_int(0)", 0),
            ("from_int(3)", 3),
            ("from_int(5)", 5),
            ("from_int(100)", 6),
        ]
    );
}

#[test]
fn test_log_level_bounds() {
    assert!(LogLevel::new(0).is_ok());
    assert!(LogLevel::new(6).is_ok());
    assert!(LogLevel::new(7).is_err());
    assert_eq!(LogLevel::from_u8(9), None);
}

#[test]
fn test_log_level_filter_strings() {
    let filters: Vec<&str> = (0..=6)
        .filter_map(LogLevel::from_u8)
        .map(LogLevel::to_filter_string)
        .collect();
    insta::assert_snapshot!(filters.join(","), @"off,error,warn,info,debug,trace,trace");
}

#[test]
fn test_log_config_defaults() {
    let config = LogConfig::default();
    assert_eq!(config.console_level(), LogLevel::INFO);
    assert_eq!(config.file_level(), LogLevel::TRACE);
    assert!(config.log_file().is_none());
    assert!(config.show_timestamps());
    assert!(!config.show_target());
}

#[test]
fn test_sync_operation_names() {
    let names = [
        SyncOperation::Clone.as_str(),
        SyncOperation::Update.as_str(),
        SyncOperation::Status.as_str(),
    ];
    insta::assert_snapshot!(names.join(" "), @"clone update status");
}
