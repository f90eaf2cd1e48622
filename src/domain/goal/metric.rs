//! Metric kinds and the progress derivation rules.
//!
//! A key result's progress is always derived from its current and target
//! values; it is never set directly. Derivation is a pure function, so the
//! same inputs always produce the same progress.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::Progress;

/// How a key result measures advancement toward its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    /// Current value is itself a 0-100 percentage.
    Percentage,
    /// Current value counts toward a numeric target.
    Number,
    /// Done or not done; any non-zero current value counts as done.
    Boolean,
}

impl MetricKind {
    /// Derives the progress for a current/target value pair.
    ///
    /// - `Percentage`: current value clamped to [0, 100]; target is ignored.
    /// - `Number`: current/target ratio scaled to [0, 100]. A zero target is
    ///   defined as complete when anything has been recorded, zero otherwise.
    /// - `Boolean`: complete when the current value is non-zero.
    pub fn derive_progress(&self, current_value: f64, target_value: f64) -> Progress {
        match self {
            MetricKind::Percentage => Progress::from_f64_clamped(current_value),
            MetricKind::Number => {
                if target_value == 0.0 {
                    if current_value > 0.0 {
                        Progress::COMPLETE
                    } else {
                        Progress::ZERO
                    }
                } else {
                    Progress::from_f64_clamped(current_value / target_value * 100.0)
                }
            }
            MetricKind::Boolean => {
                if current_value != 0.0 {
                    Progress::COMPLETE
                } else {
                    Progress::ZERO
                }
            }
        }
    }

    /// Returns the storage label for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Percentage => "percentage",
            MetricKind::Number => "number",
            MetricKind::Boolean => "boolean",
        }
    }

    /// Parses a storage label back into a kind.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "percentage" => Some(MetricKind::Percentage),
            "number" => Some(MetricKind::Number),
            "boolean" => Some(MetricKind::Boolean),
            _ => None,
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    mod percentage_metric {
        use super::*;

        #[test]
        fn uses_current_value_directly() {
            let p = MetricKind::Percentage.derive_progress(60.0, 100.0);
            assert_eq!(p.value(), 60);
        }

        #[test]
        fn clamps_overachievement_to_100() {
            let p = MetricKind::Percentage.derive_progress(120.0, 100.0);
            assert_eq!(p.value(), 100);
        }

        #[test]
        fn clamps_negative_to_0() {
            let p = MetricKind::Percentage.derive_progress(-5.0, 100.0);
            assert_eq!(p.value(), 0);
        }
    }

    mod number_metric {
        use super::*;

        #[test]
        fn scales_against_target() {
            let p = MetricKind::Number.derive_progress(25.0, 50.0);
            assert_eq!(p.value(), 50);
        }

        #[test]
        fn clamps_when_target_exceeded() {
            let p = MetricKind::Number.derive_progress(80.0, 50.0);
            assert_eq!(p.value(), 100);
        }

        #[test]
        fn zero_target_with_zero_current_is_zero() {
            let p = MetricKind::Number.derive_progress(0.0, 0.0);
            assert_eq!(p.value(), 0);
        }

        #[test]
        fn zero_target_with_positive_current_is_complete() {
            let p = MetricKind::Number.derive_progress(3.0, 0.0);
            assert_eq!(p.value(), 100);
        }

        #[test]
        fn rounds_to_nearest() {
            // 1/3 of the way: 33.33 rounds down
            let p = MetricKind::Number.derive_progress(1.0, 3.0);
            assert_eq!(p.value(), 33);

            // 2/3 of the way: 66.67 rounds up
            let p = MetricKind::Number.derive_progress(2.0, 3.0);
            assert_eq!(p.value(), 67);
        }
    }

    mod boolean_metric {
        use super::*;

        #[test]
        fn non_zero_is_complete() {
            assert_eq!(MetricKind::Boolean.derive_progress(1.0, 0.0).value(), 100);
        }

        #[test]
        fn zero_is_incomplete() {
            assert_eq!(MetricKind::Boolean.derive_progress(0.0, 0.0).value(), 0);
        }
    }

    mod labels {
        use super::*;

        #[test]
        fn round_trips_through_storage_labels() {
            for kind in [MetricKind::Percentage, MetricKind::Number, MetricKind::Boolean] {
                assert_eq!(MetricKind::parse(kind.as_str()), Some(kind));
            }
        }

        #[test]
        fn rejects_unknown_label() {
            assert_eq!(MetricKind::parse("ratio"), None);
        }

        #[test]
        fn serializes_to_snake_case() {
            let json = serde_json::to_string(&MetricKind::Percentage).unwrap();
            assert_eq!(json, "\"percentage\"");
        }
    }

    proptest! {
        #[test]
        fn derived_progress_is_always_in_range(
            current in -1e9f64..1e9f64,
            target in -1e9f64..1e9f64,
        ) {
            for kind in [MetricKind::Percentage, MetricKind::Number, MetricKind::Boolean] {
                let p = kind.derive_progress(current, target);
                prop_assert!(p.value() <= 100);
            }
        }

        #[test]
        fn derivation_is_deterministic(
            current in -1e6f64..1e6f64,
            target in -1e6f64..1e6f64,
        ) {
            for kind in [MetricKind::Percentage, MetricKind::Number, MetricKind::Boolean] {
                prop_assert_eq!(
                    kind.derive_progress(current, target),
                    kind.derive_progress(current, target)
                );
            }
        }
    }
}
