// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;

fn clear() {
    for key in [
        "TALLY_STATE_DIR",
        "XDG_STATE_HOME",
        "TALLY_LISTEN",
        "TALLY_CHECKPOINT_SECS",
        "TALLY_MIN_SECONDS_PER_TASK",
        "TALLY_DRAIN_TIMEOUT_MS",
    ] {
        std::env::remove_var(key);
    }
}

#[test]
#[serial]
fn state_dir_precedence() {
    clear();
    let home = std::env::var_os("HOME");
    std::env::set_var("HOME", "/home/ana");
    assert_eq!(state_dir(), Some(PathBuf::from("/home/ana/.local/state/tally")));

    std::env::set_var("XDG_STATE_HOME", "/xdg");
    assert_eq!(state_dir(), Some(PathBuf::from("/xdg/tally")));

    std::env::set_var("TALLY_STATE_DIR", "/srv/tally");
    assert_eq!(state_dir(), Some(PathBuf::from("/srv/tally")));
    clear();
    if let Some(home) = home {
        std::env::set_var("HOME", home);
    }
}

#[test]
#[serial]
fn invalid_values_are_ignored() {
    clear();
    std::env::set_var("TALLY_LISTEN", "not-an-addr");
    std::env::set_var("TALLY_CHECKPOINT_SECS", "0");
    std::env::set_var("TALLY_MIN_SECONDS_PER_TASK", "-1");
    assert_eq!(listen_addr(), None);
    assert_eq!(checkpoint_interval(), None);
    assert_eq!(min_seconds_per_task(), None);
    clear();
}

#[test]
#[serial]
fn parses_overrides() {
    clear();
    std::env::set_var("TALLY_LISTEN", "0.0.0.0:8080");
    std::env::set_var("TALLY_CHECKPOINT_SECS", "15");
    std::env::set_var("TALLY_MIN_SECONDS_PER_TASK", "0.5");
    std::env::set_var("TALLY_DRAIN_TIMEOUT_MS", "250");
    assert_eq!(listen_addr(), Some("0.0.0.0:8080".parse().unwrap()));
    assert_eq!(checkpoint_interval(), Some(Duration::from_secs(15)));
    assert_eq!(min_seconds_per_task(), Some(0.5));
    assert_eq!(drain_timeout(), Duration::from_millis(250));
    clear();
}
