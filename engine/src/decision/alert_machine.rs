//! Per-ticker anti-spam state machine.
//!
//! States are `None` (inside the corridor), `Up` and `Down` (an alert has fired
//! and the price has not yet come back). An alert fires on every transition
//! into an outside state, including a direct `Up` ↔ `Down` flip. Staying
//! outside on the same side never fires again; re-entering the corridor re-arms.

use corelib::{AlertDirection, Ticker};

use super::types::DeltaPct;

/// Result of evaluating one delta against the previous direction.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertDecision {
    pub ticker: Ticker,
    pub prev: AlertDirection,
    pub next: AlertDirection,
    pub fire: bool,
    pub fired_direction: Option<AlertDirection>,
}

impl AlertDecision {
    /// True when the ticker came back inside the corridor this run.
    pub fn is_reset(&self) -> bool {
        !self.prev.is_none() && self.next.is_none()
    }
}

/// Side of the corridor `delta` falls on. Both bounds are inclusive.
///
/// `threshold` must be a positive magnitude; that is enforced at config load.
pub fn target_direction(delta: DeltaPct, threshold: f64) -> AlertDirection {
    debug_assert!(threshold > 0.0, "threshold must be positive");

    if delta >= threshold {
        AlertDirection::Up
    } else if delta <= -threshold {
        AlertDirection::Down
    } else {
        AlertDirection::None
    }
}

pub fn evaluate(
    ticker: &str,
    delta: DeltaPct,
    threshold: f64,
    prev: AlertDirection,
) -> AlertDecision {
    let target = target_direction(delta, threshold);

    let (next, fire) = match target {
        AlertDirection::None => (AlertDirection::None, false),
        t if t == prev => (prev, false),
        t => (t, true),
    };

    AlertDecision {
        ticker: ticker.to_string(),
        prev,
        next,
        fire,
        fired_direction: fire.then_some(next),
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn any_direction() -> impl Strategy<Value = AlertDirection> {
        prop_oneof![
            Just(AlertDirection::None),
            Just(AlertDirection::Up),
            Just(AlertDirection::Down),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(1000))]

        #[test]
        fn inside_never_fires(
            threshold in 0.01f64..50.0,
            frac in -0.999f64..0.999,
            prev in any_direction(),
        ) {
            let d = evaluate("X", threshold * frac, threshold, prev);
            prop_assert_eq!(d.next, AlertDirection::None);
            prop_assert!(!d.fire);
        }

        #[test]
        fn outside_from_none_fires_with_sign(
            threshold in 0.01f64..50.0,
            extra in 0.0f64..100.0,
            negative in any::<bool>(),
        ) {
            let delta = if negative { -(threshold + extra) } else { threshold + extra };
            let d = evaluate("X", delta, threshold, AlertDirection::None);

            prop_assert!(d.fire);
            let expected = if negative { AlertDirection::Down } else { AlertDirection::Up };
            prop_assert_eq!(d.next, expected);
            prop_assert_eq!(d.fired_direction, Some(expected));
        }

        #[test]
        fn repeating_same_delta_never_fires_twice(
            threshold in 0.01f64..50.0,
            delta in -200.0f64..200.0,
            prev in any_direction(),
        ) {
            let first = evaluate("X", delta, threshold, prev);
            let second = evaluate("X", delta, threshold, first.next);

            prop_assert!(!second.fire);
            prop_assert_eq!(second.next, first.next);
        }

        #[test]
        fn fire_iff_direction_changes_to_outside(
            threshold in 0.01f64..50.0,
            delta in -200.0f64..200.0,
            prev in any_direction(),
        ) {
            let d = evaluate("X", delta, threshold, prev);
            prop_assert_eq!(d.fire, !d.next.is_none() && d.next != prev);
        }
    }
}
