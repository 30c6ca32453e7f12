//! Aggregation over filtered records: scalar KPIs plus the categorical
//! count tables that drive the bar, pie, and stacked-bar charts.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::data::model::{Column, UseCaseRecord};

// ---------------------------------------------------------------------------
// KPIs – scalar summary metrics
// ---------------------------------------------------------------------------

/// The three headline metrics of the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Kpis {
    /// Surviving rows, missing values included.
    pub count: usize,
    /// Sum of `Expected value` over rows where it is present.
    pub expected_value_sum: f64,
    /// Sum of `Actual value realized` over rows where it is present.
    pub actual_value_sum: f64,
}

impl Kpis {
    /// `Expected value` sum as metric-card text, e.g. `$1,200`.
    pub fn expected_value_display(&self) -> String {
        format_currency(self.expected_value_sum)
    }

    /// `Actual value realized` sum as metric-card text.
    pub fn actual_value_display(&self) -> String {
        format_currency(self.actual_value_sum)
    }
}

/// Compute the KPI scalars. Missing numeric cells contribute 0 to the sums;
/// the row still counts.
pub fn compute_kpis(records: &[UseCaseRecord]) -> Kpis {
    Kpis {
        count: records.len(),
        expected_value_sum: records.iter().filter_map(|r| r.expected_value).sum(),
        actual_value_sum: records.iter().filter_map(|r| r.actual_value).sum(),
    }
}

/// Whole-currency display with thousands separators: `1234567.0` → `$1,234,567`.
pub fn format_currency(value: f64) -> String {
    let negative = value < 0.0;
    let whole = format!("{:.0}", value.abs());
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3 + 1);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if negative {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

// ---------------------------------------------------------------------------
// Count tables
// ---------------------------------------------------------------------------

/// One bar / pie slice: a categorical value and how many rows carry it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueCount {
    /// The value, `None` for rows where the column is blank.
    pub value: Option<String>,
    pub count: usize,
}

/// One cell of a stacked-bar table: the Cartesian pair of two columns'
/// values and its row count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupCount {
    pub first: Option<String>,
    pub second: Option<String>,
    pub count: usize,
}

/// Count rows per value of a single categorical column.
///
/// Ordered by descending count, ties by ascending value with blanks first —
/// the order a `value_counts`-style bar chart expects. Blank cells bucket
/// under `None` so the counts always sum to the row count.
pub fn value_counts(records: &[UseCaseRecord], column: Column) -> Vec<ValueCount> {
    let mut counts: BTreeMap<Option<String>, usize> = BTreeMap::new();
    for record in records {
        let key = record.categorical(column).map(str::to_string);
        *counts.entry(key).or_default() += 1;
    }

    let mut table: Vec<ValueCount> = counts
        .into_iter()
        .map(|(value, count)| ValueCount { value, count })
        .collect();
    table.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));
    table
}

/// Count rows per Cartesian pair of two categorical columns' values.
///
/// Ordered lexicographically by `(first, second)` with blanks first; the
/// order is deterministic so stacked-bar categories render stably across
/// recomputations. Counts over all pairs sum to the row count.
pub fn group_count(records: &[UseCaseRecord], first: Column, second: Column) -> Vec<GroupCount> {
    let mut counts: BTreeMap<(Option<String>, Option<String>), usize> = BTreeMap::new();
    for record in records {
        let key = (
            record.categorical(first).map(str::to_string),
            record.categorical(second).map(str::to_string),
        );
        *counts.entry(key).or_default() += 1;
    }

    counts
        .into_iter()
        .map(|((first, second), count)| GroupCount {
            first,
            second,
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(bu: &str, status: &str, expected: Option<f64>) -> UseCaseRecord {
        UseCaseRecord {
            business_unit: Some(bu.to_string()),
            status: Some(status.to_string()),
            expected_value: expected,
            ..UseCaseRecord::default()
        }
    }

    #[test]
    fn kpis_of_empty_input_are_zero() {
        let kpis = compute_kpis(&[]);
        assert_eq!(kpis.count, 0);
        assert_eq!(kpis.expected_value_sum, 0.0);
        assert_eq!(kpis.actual_value_sum, 0.0);
    }

    #[test]
    fn sums_skip_missing_values_but_count_keeps_the_row() {
        let rows = vec![
            record("Sales", "Deployed", Some(100.0)),
            record("Sales", "Prioritization", Some(200.0)),
            record("IT", "Deployed", None),
        ];
        let kpis = compute_kpis(&rows);
        assert_eq!(kpis.count, 3);
        assert_eq!(kpis.expected_value_sum, 300.0);
        assert_eq!(kpis.actual_value_sum, 0.0);
    }

    #[test]
    fn currency_display_groups_thousands() {
        assert_eq!(format_currency(0.0), "$0");
        assert_eq!(format_currency(999.0), "$999");
        assert_eq!(format_currency(1200.0), "$1,200");
        assert_eq!(format_currency(1234567.0), "$1,234,567");
        assert_eq!(format_currency(-4500.0), "-$4,500");
        assert_eq!(compute_kpis(&[]).expected_value_display(), "$0");
    }

    #[test]
    fn value_counts_order_and_blank_bucket() {
        let mut rows = vec![
            record("Sales", "Deployed", None),
            record("IT", "Deployed", None),
            record("Sales", "Prioritization", None),
        ];
        rows.push(UseCaseRecord::default()); // blank status row

        let table = value_counts(&rows, Column::Status);
        assert_eq!(
            table,
            vec![
                ValueCount {
                    value: Some("Deployed".to_string()),
                    count: 2
                },
                ValueCount { value: None, count: 1 },
                ValueCount {
                    value: Some("Prioritization".to_string()),
                    count: 1
                },
            ]
        );
        let total: usize = table.iter().map(|v| v.count).sum();
        assert_eq!(total, rows.len());
    }

    #[test]
    fn group_counts_sum_to_row_count() {
        let mut rows = vec![
            record("Sales", "Deployed", None),
            record("Sales", "Deployed", None),
            record("Sales", "Prioritization", None),
            record("IT", "Deployed", None),
        ];
        rows.push(UseCaseRecord::default());

        let table = group_count(&rows, Column::Status, Column::BusinessUnit);
        let total: usize = table.iter().map(|g| g.count).sum();
        assert_eq!(total, rows.len());

        // Lexicographic by (first, second), blanks first.
        let keys: Vec<(Option<&str>, Option<&str>)> = table
            .iter()
            .map(|g| (g.first.as_deref(), g.second.as_deref()))
            .collect();
        assert_eq!(
            keys,
            vec![
                (None, None),
                (Some("Deployed"), Some("IT")),
                (Some("Deployed"), Some("Sales")),
                (Some("Prioritization"), Some("Sales")),
            ]
        );
        assert_eq!(table[2].count, 2);
    }

    #[test]
    fn empty_input_yields_empty_tables() {
        assert!(value_counts(&[], Column::Ryg).is_empty());
        assert!(group_count(&[], Column::Status, Column::Ryg).is_empty());
    }
}
