//! Challenger/champion comparison tables.
//!
//! Both diffs take the union of the two key sets, sort it, and render each
//! side as a display string. Rows are compared as strings, so a key present on
//! only one side is always a change.

use crate::types::ParamValue;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

const METRIC_DECIMALS: usize = 4;

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct MetricDiff {
    pub name: String,
    pub challenger_value: Option<String>,
    pub champion_value: Option<String>,
    pub change: Option<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ParamDiff {
    pub name: String,
    pub challenger_value: Option<String>,
    pub champion_value: Option<String>,
}

/// A row of either diff table.
pub trait DiffRow {
    fn name(&self) -> &str;
    fn challenger(&self) -> Option<&str>;
    fn champion(&self) -> Option<&str>;
    fn is_changed(&self) -> bool { self.challenger() != self.champion() }
}

impl DiffRow for MetricDiff {
    fn name(&self) -> &str { &self.name }
    fn challenger(&self) -> Option<&str> { self.challenger_value.as_deref() }
    fn champion(&self) -> Option<&str> { self.champion_value.as_deref() }
}

impl DiffRow for ParamDiff {
    fn name(&self) -> &str { &self.name }
    fn challenger(&self) -> Option<&str> { self.challenger_value.as_deref() }
    fn champion(&self) -> Option<&str> { self.champion_value.as_deref() }
}

fn union_keys<'a, A, B>(challenger: &'a BTreeMap<String, A>, champion: &'a BTreeMap<String, B>) -> BTreeSet<&'a str> {
    challenger.keys().chain(champion.keys()).map(String::as_str).collect()
}

/// A metric whose value is `None` is treated as if the key were missing.
pub fn diff_metrics(challenger: Option<&BTreeMap<String, Option<f64>>>, champion: Option<&BTreeMap<String, Option<f64>>>) -> Vec<MetricDiff> {
    let empty = BTreeMap::new();
    let challenger = challenger.unwrap_or(&empty);
    let champion = champion.unwrap_or(&empty);
    union_keys(challenger, champion)
        .into_iter()
        .map(|name| {
            let ch = challenger.get(name).copied().flatten();
            let cp = champion.get(name).copied().flatten();
            MetricDiff {
                name: name.to_string(),
                challenger_value: ch.map(|v| format_fixed(v, METRIC_DECIMALS)),
                champion_value: cp.map(|v| format_fixed(v, METRIC_DECIMALS)),
                change: ch.zip(cp).map(|(ch, cp)| format_fixed(cp - ch, METRIC_DECIMALS)),
            }
        })
        .collect()
}

pub fn diff_params(challenger: Option<&BTreeMap<String, ParamValue>>, champion: Option<&BTreeMap<String, ParamValue>>) -> Vec<ParamDiff> {
    let empty = BTreeMap::new();
    let challenger = challenger.unwrap_or(&empty);
    let champion = champion.unwrap_or(&empty);
    union_keys(challenger, champion)
        .into_iter()
        .map(|name| ParamDiff {
            name: name.to_string(),
            challenger_value: challenger.get(name).and_then(ParamValue::display_value),
            champion_value: champion.get(name).and_then(ParamValue::display_value),
        })
        .collect()
}

/// Names of the rows to highlight. With no champion every row is one-sided,
/// so nothing is highlighted.
pub fn changed_names<R: DiffRow>(rows: &[R], has_champion: bool) -> Vec<String> {
    if !has_champion { return Vec::new(); }
    rows.iter().filter(|r| r.is_changed()).map(|r| r.name().to_string()).collect()
}

/// Fixed-point rendering with `decimals` digits. Rust's formatter rounds the
/// exact binary value correctly but resolves exact ties to even; ties here
/// round away from zero instead.
pub fn format_fixed(value: f64, decimals: usize) -> String {
    // -0.0 renders unsigned
    let value = if value == 0.0 { 0.0 } else { value };
    let rendered = format!("{value:.decimals$}");
    if !value.is_finite() || decimals > 15 { return rendered; }
    let scale = 10f64.powi(decimals as i32) * 2.0;
    let doubled = (value.abs() * scale).round();
    // exact tie: |value| * 2 * 10^d is an odd integer with no rounding error
    let is_tie = doubled % 2.0 == 1.0 && doubled < 9.0e15 && value.abs().mul_add(scale, -doubled) == 0.0;
    if !is_tie { return rendered; }
    let units = (doubled as u64 + 1) / 2;
    let divisor = 10u64.pow(decimals as u32);
    let sign = if value < 0.0 { "-" } else { "" };
    if decimals == 0 { return format!("{sign}{units}"); }
    format!("{sign}{}.{:0width$}", units / divisor, units % divisor, width = decimals)
}
