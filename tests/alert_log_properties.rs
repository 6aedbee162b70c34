//! Property tests for the bounded alert log as driven through the dashboard.

use proptest::prelude::*;
use tcc::alerts::{AlertEntry, AlertLog};
use tcc::config::{AlertPolicy, RefreshConfig};
use tcc::dashboard::{Dashboard, NO_ALERTS_PLACEHOLDER};
use tcc::feed::{FetchError, MetricsSnapshot};
use tcc::view::ids;

#[derive(Debug, Clone)]
enum Op {
    Local(u8),
    Snapshot(usize),
    Failure,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<u8>().prop_map(Op::Local),
        (0usize..9).prop_map(Op::Snapshot),
        Just(Op::Failure),
    ]
}

fn policy() -> impl Strategy<Value = AlertPolicy> {
    prop_oneof![
        Just(AlertPolicy::SuspendWhileLive),
        Just(AlertPolicy::Interleave),
        Just(AlertPolicy::LocalOnly),
    ]
}

fn snapshot(alerts: usize) -> MetricsSnapshot {
    MetricsSnapshot {
        active_trains: 1,
        efficiency: 80.0,
        avg_delay: 1.0,
        on_time: 90.0,
        avg_speed: 60.0,
        alerts: (0..alerts).map(|i| format!("server-{}", i)).collect(),
    }
}

proptest! {
    #[test]
    fn prop_log_never_exceeds_capacity(
        capacity in 1usize..8,
        policy in policy(),
        ops in proptest::collection::vec(op(), 0..60),
    ) {
        let config = RefreshConfig {
            alert_capacity: capacity,
            alert_policy: policy,
            ..RefreshConfig::default()
        };
        let mut dashboard = Dashboard::new(&config);

        for op in ops {
            match op {
                Op::Local(n) => {
                    dashboard.push_local_alert(AlertEntry::local(format!("local-{}", n), "9:00:00 AM"));
                }
                Op::Snapshot(n) => dashboard.apply_metrics(&snapshot(n)),
                Op::Failure => dashboard.metrics_failed(&FetchError::Http(500)),
            }

            let len = dashboard.alerts().len();
            prop_assert!(len <= capacity);
            let count = len.to_string();
            prop_assert_eq!(dashboard.surface().text(ids::ACTIVE_ALERTS_COUNT), Some(count.as_str()));

            let lines = dashboard.alert_lines();
            if len == 0 {
                prop_assert_eq!(lines, vec![NO_ALERTS_PLACEHOLDER.to_string()]);
            } else {
                prop_assert_eq!(lines.len(), len);
            }
        }
    }

    #[test]
    fn prop_prepend_keeps_newest_first(
        capacity in 1usize..8,
        count in 0usize..30,
    ) {
        let mut log = AlertLog::new(capacity);
        for i in 0..count {
            log.prepend(AlertEntry::local(i.to_string(), "9:00:00 AM"));
        }

        let kept: Vec<usize> = log.iter().map(|e| e.text.parse().unwrap()).collect();
        let expected: Vec<usize> = (0..count).rev().take(capacity).collect();
        prop_assert_eq!(kept, expected);
    }
}
