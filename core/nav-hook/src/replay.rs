//! Replays a stream of navigation notifications through the tracker.
//!
//! One location per input line; a blank line is an empty notification. Bytes
//! that are not UTF-8 are replaced with U+FFFD rather than ending the replay. The
//! whole stream shares one [`TrackerState`], as a single page session would.
//!
//! ```bash
//! printf '/a\n/a\n/b\n' | nav-hook replay
//! {"notifications":3,"emitted":2,"duplicates":1,"empty":0}
//! ```

use std::io::{BufRead, Write};

use nav_core::{LocationOutcome, Monitoring, NavigationObserver, NavigationTracker, TrackerState};
use serde::Serialize;

use crate::error::HookError;

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ReplaySummary {
    pub notifications: usize,
    pub emitted: usize,
    pub duplicates: usize,
    pub empty: usize,
}

impl ReplaySummary {
    fn record(&mut self, outcome: LocationOutcome) {
        self.notifications += 1;
        match outcome {
            LocationOutcome::Emitted => self.emitted += 1,
            LocationOutcome::Duplicate => self.duplicates += 1,
            LocationOutcome::Empty => self.empty += 1,
        }
    }
}

pub fn run<M, R, W>(monitoring: M, mut input: R, mut output: W) -> Result<ReplaySummary, HookError>
where
    M: Monitoring,
    R: BufRead,
    W: Write,
{
    let mut state = TrackerState::new();
    let mut tracker = NavigationTracker::new(&mut state, monitoring);
    let mut summary = ReplaySummary::default();

    tracker.on_mount();

    let mut buf = Vec::new();
    loop {
        buf.clear();
        if input.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let line = String::from_utf8_lossy(&buf);
        let location = line.trim_end_matches('\n').trim_end_matches('\r');
        summary.record(tracker.on_location_change(Some(location)));
    }

    tracing::info!(
        notifications = summary.notifications,
        emitted = summary.emitted,
        duplicates = summary.duplicates,
        empty = summary.empty,
        last_location = ?tracker.state().last_location(),
        "Replay finished"
    );

    serde_json::to_writer(&mut output, &summary)?;
    writeln!(output)?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nav_core::{MonitoringError, Properties};
    use std::cell::RefCell;
    use std::io::Cursor;

    #[derive(Default)]
    struct Recorder {
        page_views: RefCell<Vec<String>>,
    }

    impl Monitoring for Recorder {
        fn init_monitoring(&self) -> Result<(), MonitoringError> {
            Ok(())
        }

        fn track_page_view(&self, location: &str) -> Result<(), MonitoringError> {
            self.page_views.borrow_mut().push(location.to_string());
            Ok(())
        }

        fn track_event(
            &self,
            _name: &str,
            _properties: Option<Properties>,
        ) -> Result<(), MonitoringError> {
            Ok(())
        }
    }

    #[test]
    fn test_replay_counts_outcomes() {
        let recorder = Recorder::default();
        let input = Cursor::new("/a\n/a\n\n/b\r\n/b\n/a\n");
        let mut output = Vec::new();

        let summary = run(&recorder, input, &mut output).unwrap();

        assert_eq!(
            summary,
            ReplaySummary {
                notifications: 6,
                emitted: 3,
                duplicates: 2,
                empty: 1,
            }
        );
        assert_eq!(*recorder.page_views.borrow(), vec!["/a", "/b", "/a"]);

        let printed: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(printed["emitted"], 3);
        assert_eq!(printed["duplicates"], 2);
    }

    #[test]
    fn test_replay_survives_invalid_utf8() {
        let recorder = Recorder::default();
        let input = Cursor::new(b"/a\n/caf\xe9\n/b".to_vec());
        let mut output = Vec::new();

        let summary = run(&recorder, input, &mut output).unwrap();

        assert_eq!(summary.notifications, 3);
        assert_eq!(summary.emitted, 3);
        assert_eq!(
            *recorder.page_views.borrow(),
            vec!["/a", "/caf\u{FFFD}", "/b"]
        );
        let printed: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(printed["notifications"], 3);
    }

    #[test]
    fn test_replay_empty_input() {
        let recorder = Recorder::default();
        let summary = run(&recorder, Cursor::new(""), Vec::new()).unwrap();
        assert_eq!(summary, ReplaySummary::default());
        assert!(recorder.page_views.borrow().is_empty());
    }
}
