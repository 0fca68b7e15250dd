#![cfg(feature = "optional")]
//! Integration tests for `OptionExt`.

use std::cell::{Cell, RefCell};

use fpkit::optional::OptionExt;
use rstest::rstest;

#[rstest]
#[case(Some(4), 4)]
#[case(None, 0)]
fn test_if_present_accumulates(#[case] option: Option<i32>, #[case] expected: i32) {
    let total = Cell::new(0);
    option.if_present(|value| total.set(total.get() + value));
    assert_eq!(total.get(), expected);
}

#[rstest]
#[case(Some("config.toml"), "load config.toml")]
#[case(None, "use defaults")]
fn test_if_present_or_else(#[case] path: Option<&str>, #[case] expected: &str) {
    let action = RefCell::new(String::new());
    path.if_present_or_else(
        |path| *action.borrow_mut() = format!("load {path}"),
        || *action.borrow_mut() = String::from("use defaults"),
    );
    let action = action.into_inner();
    assert_eq!(action, expected);
}

#[rstest]
fn test_is_absent() {
    assert!(None::<u8>.is_absent());
    assert!(!Some(0_u8).is_absent());
}

#[rstest]
#[case(Some(-3), None)]
#[case(Some(3), Some(3))]
#[case(None, None)]
fn test_filter_not(#[case] option: Option<i32>, #[case] expected: Option<i32>) {
    assert_eq!(option.filter_not(|value| *value < 0), expected);
}

#[rstest]
fn test_or_optional_chains_lookups() {
    let calls = Cell::new(0);
    let lookup = |found: Option<&'static str>| {
        calls.set(calls.get() + 1);
        found
    };
    let resolved = None
        .or_optional(|| lookup(None))
        .or_optional(|| lookup(Some("fallback")))
        .or_optional(|| lookup(Some("unused")));
    assert_eq!(resolved, Some("fallback"));
    assert_eq!(calls.get(), 2);
}

#[rstest]
#[case(Some(2), Some("ab"), Some(String::from("abab")))]
#[case(None, Some("ab"), None)]
#[case(Some(2), None, None)]
fn test_zip_with(#[case] count: Option<usize>, #[case] text: Option<&str>, #[case] expected: Option<String>) {
    assert_eq!(count.zip_with(text, |count, text| text.repeat(count)), expected);
}

#[cfg(feature = "stream")]
#[rstest]
#[tokio::test]
async fn test_into_stream_chains_with_other_streams() {
    let combined = Some(1)
        .into_stream()
        .chain(None.into_stream())
        .chain(Some(3).into_stream())
        .to_vec()
        .await;
    assert_eq!(combined, vec![1, 3]);
}
