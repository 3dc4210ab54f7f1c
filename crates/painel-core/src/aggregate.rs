//! Sums and groupings over a filtered view.
//!
//! Cells that are null or not numeric count as `0.0` in sums. Groups are
//! reported in order of first appearance; callers that chart them sort
//! with [`sort_groups_desc`].

use std::collections::HashMap;

use polars::prelude::AnyValue;

use painel_ingest::{any_to_f64, any_to_string};

use crate::filter::FilteredView;

/// Summed value of one group.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupTotal {
    pub group: String,
    pub total: f64,
}

/// Row count of one group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupCount {
    pub group: String,
    pub count: usize,
}

/// Sum of a numeric column. An empty view or an absent column sums to `0.0`.
pub fn sum_column(view: &FilteredView, column: &str) -> f64 {
    let Ok(values) = view.data().column(column) else {
        return 0.0;
    };
    (0..view.height())
        .map(|idx| {
            values
                .get(idx)
                .ok()
                .and_then(any_to_f64)
                .unwrap_or(0.0)
        })
        .sum()
}

/// Sum of `value` per distinct non-blank `group`.
pub fn group_sum(view: &FilteredView, group: &str, value: &str) -> Vec<GroupTotal> {
    let data = view.data();
    let (Ok(groups), Ok(values)) = (data.column(group), data.column(value)) else {
        return Vec::new();
    };
    let mut totals: Vec<GroupTotal> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for idx in 0..view.height() {
        let Some(key) = group_key(groups.get(idx).unwrap_or(AnyValue::Null)) else {
            continue;
        };
        let amount = values
            .get(idx)
            .ok()
            .and_then(any_to_f64)
            .unwrap_or(0.0);
        match index.get(&key) {
            Some(&pos) => totals[pos].total += amount,
            None => {
                index.insert(key.clone(), totals.len());
                totals.push(GroupTotal {
                    group: key,
                    total: amount,
                });
            }
        }
    }
    totals
}

/// Number of rows per distinct non-blank `group`.
pub fn group_count(view: &FilteredView, group: &str) -> Vec<GroupCount> {
    let Ok(groups) = view.data().column(group) else {
        return Vec::new();
    };
    let mut counts: Vec<GroupCount> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for idx in 0..view.height() {
        let Some(key) = group_key(groups.get(idx).unwrap_or(AnyValue::Null)) else {
            continue;
        };
        match index.get(&key) {
            Some(&pos) => counts[pos].count += 1,
            None => {
                index.insert(key.clone(), counts.len());
                counts.push(GroupCount { group: key, count: 1 });
            }
        }
    }
    counts
}

/// Orders groups by total, largest first. Ties keep their relative order.
pub fn sort_groups_desc(groups: &mut [GroupTotal]) {
    groups.sort_by(|a, b| b.total.total_cmp(&a.total));
}

fn group_key(cell: AnyValue<'_>) -> Option<String> {
    let key = any_to_string(cell);
    let trimmed = key.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
