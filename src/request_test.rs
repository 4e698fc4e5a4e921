use super::*;

#[test]
fn set_adopts_literal() {
    assert_eq!(compute_next(UpdateRequest::Set(3), Some(1)), Some(3));
}

#[test]
fn set_keeps_zero_like_literals() {
    assert_eq!(compute_next(UpdateRequest::Set(0), Some(5)), Some(0));
    assert_eq!(compute_next(UpdateRequest::Set(false), Some(true)), Some(false));
}

#[test]
fn clear_yields_none() {
    assert_eq!(compute_next(UpdateRequest::Clear, Some("x")), None);
}

#[test]
fn updater_receives_previous_value() {
    let next = compute_next(UpdateRequest::with(|prev: Option<i32>| prev.map(|n| n + 1)), Some(5));
    assert_eq!(next, Some(6));
}

#[test]
fn updater_sees_none_when_nothing_stored() {
    let next = compute_next(UpdateRequest::with(|prev: Option<i32>| Some(prev.unwrap_or(10))), None);
    assert_eq!(next, Some(10));
}

#[test]
fn updater_can_clear() {
    let next = compute_next(UpdateRequest::with(|_: Option<i32>| None), Some(1));
    assert_eq!(next, None);
}

#[test]
fn option_converts_to_set_or_clear() {
    assert!(matches!(UpdateRequest::from(Some(2)), UpdateRequest::Set(2)));
    assert!(matches!(UpdateRequest::<i32>::from(None), UpdateRequest::Clear));
}

#[test]
fn debug_hides_updater_closure() {
    assert_eq!(format!("{:?}", UpdateRequest::Set(1)), "Set(1)");
    assert_eq!(format!("{:?}", UpdateRequest::<i32>::Clear), "Clear");
    assert_eq!(format!("{:?}", UpdateRequest::with(|p: Option<i32>| p)), "Update(..)");
}
