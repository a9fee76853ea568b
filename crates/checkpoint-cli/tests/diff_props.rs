use checkpoint_cli::diff::{diff_metrics, diff_params, DiffRow};
use checkpoint_cli::types::ParamValue;
use proptest::prelude::*;
use std::collections::BTreeMap;

fn metric_map() -> impl Strategy<Value = Option<BTreeMap<String, Option<f64>>>> {
    let value = proptest::option::weighted(0.9, -1.0e6f64..1.0e6);
    proptest::option::of(proptest::collection::btree_map("[a-zA-Z_]{1,6}", value, 0..8))
}

fn param_map() -> impl Strategy<Value = Option<BTreeMap<String, ParamValue>>> {
    let value = prop_oneof![
        "[a-z0-9.]{0,5}".prop_map(ParamValue::Text),
        any::<i32>().prop_map(|i| ParamValue::Number(i.into())),
        any::<bool>().prop_map(ParamValue::Bool),
    ];
    proptest::option::of(proptest::collection::btree_map("[a-zA-Z_]{1,6}", value, 0..8))
}

proptest! {
    #[test]
    fn metric_rows_are_sorted_and_one_sided_rows_have_one_value(ch in metric_map(), cp in metric_map()) {
        let rows = diff_metrics(ch.as_ref(), cp.as_ref());
        prop_assert!(rows.windows(2).all(|w| w[0].name < w[1].name));
        for r in &rows {
            let keyed = |m: &Option<BTreeMap<String, Option<f64>>>| m.as_ref().is_some_and(|m| m.contains_key(&r.name));
            prop_assert!(keyed(&ch) || keyed(&cp));
            let in_ch = ch.as_ref().is_some_and(|m| m.get(&r.name).is_some_and(Option::is_some));
            let in_cp = cp.as_ref().is_some_and(|m| m.get(&r.name).is_some_and(Option::is_some));
            prop_assert_eq!(r.challenger_value.is_some(), in_ch);
            prop_assert_eq!(r.champion_value.is_some(), in_cp);
            prop_assert_eq!(r.change.is_some(), in_ch && in_cp);
            if in_ch != in_cp { prop_assert!(r.is_changed()); }
            for v in [&r.challenger_value, &r.champion_value, &r.change].into_iter().flatten() {
                prop_assert_eq!(v.split('.').nth(1).map(str::len), Some(4));
            }
        }
    }

    #[test]
    fn param_rows_are_sorted_and_one_sided_rows_have_one_value(ch in param_map(), cp in param_map()) {
        let rows = diff_params(ch.as_ref(), cp.as_ref());
        prop_assert!(rows.windows(2).all(|w| w[0].name < w[1].name));
        prop_assert_eq!(&rows, &diff_params(ch.as_ref(), cp.as_ref()));
        let keys: std::collections::BTreeSet<&String> = ch.iter().chain(cp.iter()).flat_map(|m| m.keys()).collect();
        prop_assert_eq!(rows.len(), keys.len());
        for r in &rows {
            let in_ch = ch.as_ref().is_some_and(|m| m.contains_key(&r.name));
            let in_cp = cp.as_ref().is_some_and(|m| m.contains_key(&r.name));
            prop_assert_eq!(r.challenger_value.is_some(), in_ch);
            prop_assert_eq!(r.champion_value.is_some(), in_cp);
            if in_ch != in_cp { prop_assert!(r.is_changed()); }
        }
    }
}
