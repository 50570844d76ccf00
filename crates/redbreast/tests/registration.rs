//! Tests for runtime operator registration.
//!
//! The registry is process-wide, so every test here runs serially.

use redbreast::{
    is_registered_operation, is_registered_transform, query_args, register_operation,
    register_transform, QueryList, Record, Value,
};
use serial_test::serial;

fn names(list: &QueryList) -> Vec<Value> {
    list.iter().filter_map(|r| r.get("name")).collect()
}

fn longer_than(actual: &Value, expected: &Value) -> bool {
    match (actual.len(), expected.as_number()) {
        (Some(len), Some(n)) => (len as f64) > n.to_f64(),
        _ => false,
    }
}

#[test]
#[serial]
fn test_register_operation_is_visible_to_existing_lists() {
    let list = QueryList::new(vec![
        Record::map([("name", "foo")]),
        Record::map([("name", "fooooooooooooooo")]),
    ]);

    // Before registration `islongerthan` is just an unknown path segment
    assert!(list
        .filter(query_args! { name__islongerthan = 3 })
        .unwrap()
        .is_empty());

    register_operation("islongerthan", longer_than);
    assert!(is_registered_operation("islongerthan"));
    assert!(!is_registered_transform("islongerthan"));

    let long = list.filter(query_args! { name__islongerthan = 3 }).unwrap();
    assert_eq!(names(&long), vec![Value::from("fooooooooooooooo")]);

    let later = QueryList::new(vec![Record::map([("name", "abcd")])]);
    assert!(later.exists(query_args! { name__islongerthan = 3 }).unwrap());
}

#[test]
#[serial]
fn test_register_through_querylist() {
    QueryList::register_operation("shorterthan", |actual: &Value, expected: &Value| {
        match (actual.len(), expected.as_number()) {
            (Some(len), Some(n)) => (len as f64) < n.to_f64(),
            _ => false,
        }
    });
    let list = QueryList::new(vec![
        Record::map([("name", "ab")]),
        Record::map([("name", "abcdef")]),
    ]);
    let short = list.filter(query_args! { name__shorterthan = 3 }).unwrap();
    assert_eq!(names(&short), vec![Value::from("ab")]);
}

#[test]
#[serial]
fn test_register_transform() {
    register_transform("num_fs", |value: &Value| {
        value.as_str().map(|s| Value::from(s.matches('f').count()))
    });
    let list = QueryList::new(vec![
        Record::map([("name", "fff")]),
        Record::map([("name", "ffffffffff")]),
    ]);

    assert_eq!(
        names(&list.filter(query_args! { name__num_fs = 3 }).unwrap()),
        vec![Value::from("fff")]
    );
    assert_eq!(
        names(&list.filter(query_args! { name__num_fs__gt = 5 }).unwrap()),
        vec![Value::from("ffffffffff")]
    );
    assert_eq!(
        names(&list.order_by(["-name__num_fs"]).unwrap()),
        vec![Value::from("ffffffffff"), Value::from("fff")]
    );
}

#[test]
#[serial]
fn test_last_registration_wins() {
    register_operation("flip", |_: &Value, _: &Value| false);
    register_operation("flip", |_: &Value, _: &Value| true);

    let list = QueryList::new(vec![Record::map([("name", "x")])]);
    assert_eq!(list.filter(query_args! { name__flip = 0 }).unwrap().len(), 1);
}

#[test]
#[serial]
fn test_transform_registration_keeps_comparator_role() {
    register_transform("twice", |value: &Value| {
        value.as_number().map(|n| Value::from(n.to_f64() * 2.0))
    });
    register_operation("twice", |actual: &Value, expected: &Value| {
        match (actual.as_number(), expected.as_number()) {
            (Some(a), Some(e)) => a.to_f64() * 2.0 == e.to_f64(),
            _ => false,
        }
    });

    let list = QueryList::new(vec![Record::map([("n", 2)]), Record::map([("n", 5)])]);
    // Trailing: comparator role
    assert_eq!(list.filter(query_args! { n__twice = 4 }).unwrap().len(), 1);
    // Interior: transform role
    assert_eq!(list.filter(query_args! { n__twice__gt = 5 }).unwrap().len(), 1);
}
