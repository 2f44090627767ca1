//! Two-phase downtime timer attached to an issue.
//!
//! The storage layer keeps two nullable timestamps; this module is the only
//! place that interprets the pair, as a tagged state that cannot represent an
//! end without a start.

use chrono::{DateTime, Duration, Utc};

use crate::tracker::error::TrackerError;
use crate::tracker::messages;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Downtime {
    NotStarted,
    Running {
        start: DateTime<Utc>,
    },
    /// Closed interval. Immutable once reached.
    Ended {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

/// Which transition a toggle performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DowntimePhase {
    Started,
    Stopped,
}

impl DowntimePhase {
    pub fn message(&self) -> &'static str {
        match self {
            DowntimePhase::Started => messages::DOWNTIME_STARTED,
            DowntimePhase::Stopped => messages::DOWNTIME_STOPPED,
        }
    }
}

impl Downtime {
    /// Decodes the stored timestamp pair. An end without a start cannot be
    /// produced by [`Downtime::toggle`]; reading one means the row was
    /// tampered with outside the application.
    pub fn from_columns(
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Self, TrackerError> {
        match (start, end) {
            (None, None) => Ok(Downtime::NotStarted),
            (Some(start), None) => Ok(Downtime::Running { start }),
            (Some(start), Some(end)) => Ok(Downtime::Ended { start, end }),
            (None, Some(_)) => Err(TrackerError::validation(
                "downtime end recorded without a start",
            )),
        }
    }

    pub fn columns(&self) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
        match *self {
            Downtime::NotStarted => (None, None),
            Downtime::Running { start } => (Some(start), None),
            Downtime::Ended { start, end } => (Some(start), Some(end)),
        }
    }

    /// Advances the timer one phase: not started -> running -> ended. A third
    /// toggle is rejected with [`TrackerError::AlreadyEnded`] and leaves the
    /// state untouched.
    pub fn toggle(self, now: DateTime<Utc>) -> Result<(Self, DowntimePhase), TrackerError> {
        match self {
            Downtime::NotStarted => Ok((Downtime::Running { start: now }, DowntimePhase::Started)),
            Downtime::Running { start } => Ok((
                Downtime::Ended { start, end: now },
                DowntimePhase::Stopped,
            )),
            Downtime::Ended { .. } => Err(TrackerError::AlreadyEnded),
        }
    }

    /// Elapsed duration of a closed interval. Open or unstarted timers have
    /// no fixed duration; clients tick those locally.
    pub fn elapsed(&self) -> Option<Duration> {
        match *self {
            Downtime::Ended { start, end } => Some(end - start),
            _ => None,
        }
    }
}

/// Formats a duration as `HH:MM:SS`, zero-padded, with no upper bound on the
/// hour count.
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.num_seconds().max(0);
    format!(
        "{:02}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, h, m, s).unwrap()
    }

    #[test]
    fn test_toggle_walks_both_phases() {
        let (running, phase) = Downtime::NotStarted.toggle(at(9, 0, 0)).unwrap();
        assert_eq!(running, Downtime::Running { start: at(9, 0, 0) });
        assert_eq!(phase, DowntimePhase::Started);
        assert_eq!(phase.message(), "Downtime started.");

        let (ended, phase) = running.toggle(at(9, 45, 0)).unwrap();
        assert_eq!(
            ended,
            Downtime::Ended {
                start: at(9, 0, 0),
                end: at(9, 45, 0),
            }
        );
        assert_eq!(phase, DowntimePhase::Stopped);
        assert_eq!(phase.message(), "Downtime stopped.");
    }

    #[test]
    fn test_third_toggle_is_rejected_without_mutation() {
        let ended = Downtime::Ended {
            start: at(9, 0, 0),
            end: at(9, 45, 0),
        };

        let err = ended.toggle(at(10, 0, 0)).unwrap_err();
        assert!(matches!(err, TrackerError::AlreadyEnded));
        // The closed interval is untouched.
        assert_eq!(ended.columns(), (Some(at(9, 0, 0)), Some(at(9, 45, 0))));
    }

    #[test]
    fn test_end_is_never_set_without_start() {
        // Walk every toggle sequence a client could issue and check the
        // column pair after each step.
        for toggles in 0..6 {
            let mut state = Downtime::NotStarted;
            let mut clock = at(8, 0, 0);
            for _ in 0..toggles {
                clock = clock + Duration::minutes(7);
                if let Ok((next, _)) = state.toggle(clock) {
                    state = next;
                }
                let (start, end) = state.columns();
                if end.is_some() {
                    assert!(start.is_some());
                }
            }
        }
    }

    #[test]
    fn test_from_columns_rejects_orphan_end() {
        let err = Downtime::from_columns(None, Some(at(9, 0, 0))).unwrap_err();
        assert!(matches!(err, TrackerError::Validation(_)));
    }

    #[test]
    fn test_from_columns_round_trips() {
        for state in [
            Downtime::NotStarted,
            Downtime::Running { start: at(9, 0, 0) },
            Downtime::Ended {
                start: at(9, 0, 0),
                end: at(10, 0, 0),
            },
        ] {
            let (start, end) = state.columns();
            assert_eq!(Downtime::from_columns(start, end).unwrap(), state);
        }
    }

    #[test]
    fn test_format_elapsed() {
        let interval = Downtime::Ended {
            start: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2024, 1, 1, 1, 2, 3).unwrap(),
        };
        assert_eq!(format_elapsed(interval.elapsed().unwrap()), "01:02:03");
    }

    #[test]
    fn test_format_elapsed_has_no_hour_cap() {
        let d = Duration::hours(27) + Duration::minutes(4) + Duration::seconds(5);
        assert_eq!(format_elapsed(d), "27:04:05");

        let d = Duration::hours(100) + Duration::seconds(59);
        assert_eq!(format_elapsed(d), "100:00:59");
    }

    #[test]
    fn test_format_elapsed_clamps_negative_intervals() {
        assert_eq!(format_elapsed(Duration::seconds(-5)), "00:00:00");
    }
}
