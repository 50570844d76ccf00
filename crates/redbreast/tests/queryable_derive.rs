//! Integration tests for the Queryable derive macro.
//!
//! These tests verify that `#[derive(Queryable)]` exposes struct fields as
//! queryable record fields and generates field name constants.

#![cfg(feature = "macros")]
#![allow(dead_code)] // Some fields are intentionally skipped for testing

use redbreast::{query_args, QueryList, Queryable, Record, Value};

// =============================================================================
// Basic derive tests
// =============================================================================

#[derive(Queryable)]
struct Dog {
    name: String,
    owner: String,
    number: f64,
}

fn dog(name: &str, owner: &str, number: f64) -> Dog {
    Dog {
        name: name.to_string(),
        owner: owner.to_string(),
        number,
    }
}

#[test]
fn test_fields_are_queryable() {
    let fido = dog("Fido", "Sam", 15.72);

    assert_eq!(fido.field("name"), Some(Value::from("Fido")));
    assert_eq!(fido.field("owner"), Some(Value::from("Sam")));
    assert_eq!(fido.field("number"), Some(Value::from(15.72)));
    assert_eq!(fido.field("unknown"), None);
    assert_eq!(fido.field(""), None);
}

#[test]
fn test_field_constants_generated() {
    assert_eq!(Dog::NAME, "name");
    assert_eq!(Dog::OWNER, "owner");
    assert_eq!(Dog::NUMBER, "number");
}

#[test]
fn test_type_name_is_struct_name() {
    let record = Record::object(dog("Fido", "Sam", 15.72));
    assert_eq!(format!("{record:?}"), "Dog { .. }");
}

#[test]
fn test_derived_records_in_a_list() {
    let dogs = QueryList::from_objects(vec![
        dog("Fido", "Sam", 15.72),
        dog("Muttley", "Robin", 31.44),
        dog("Biko", "Sam", 47.17),
        dog("Buster", "Robin", 71.19),
    ]);

    let middle = dogs.filter(query_args! { number__gt = 30, number__lt = 70 }).unwrap();
    let names: Vec<Value> = middle.iter().filter_map(|r| r.get(Dog::NAME)).collect();
    assert_eq!(names, vec![Value::from("Muttley"), Value::from("Biko")]);

    let ordered = dogs.order_by(["owner", "-number"]).unwrap();
    assert_eq!(ordered.first().and_then(|r| r.get("name")), Some(Value::from("Buster")));
}

// =============================================================================
// Attributes
// =============================================================================

#[derive(Queryable)]
#[query(accessors(shout, name_len))]
struct Pet {
    name: String,

    #[query(rename = "owner_name")]
    owner: String,

    #[query(skip)]
    chip_id: u64,

    tags: Vec<String>,
}

impl Pet {
    fn shout(&self) -> String {
        self.name.to_uppercase()
    }

    fn name_len(&self) -> usize {
        self.name.len()
    }
}

fn pet() -> Pet {
    Pet {
        name: "Fido".to_string(),
        owner: "Sam".to_string(),
        chip_id: 42,
        tags: vec!["good".to_string(), "boy".to_string()],
    }
}

#[test]
fn test_rename() {
    let pet = pet();
    assert_eq!(pet.field("owner_name"), Some(Value::from("Sam")));
    assert_eq!(pet.field("owner"), None);
    assert_eq!(Pet::OWNER_NAME, "owner_name");
}

#[test]
fn test_skip() {
    assert_eq!(pet().field("chip_id"), None);
}

#[test]
fn test_accessors() {
    let pet = pet();
    assert_eq!(pet.field("shout"), Some(Value::from("FIDO")));
    assert_eq!(pet.field("name_len"), Some(Value::from(4)));
}

#[test]
fn test_list_fields() {
    let pets = QueryList::from_objects(vec![pet()]);
    assert!(pets.exists(query_args! { tags__contains = "boy" }).unwrap());
    assert!(pets.exists(query_args! { tags__len = 2 }).unwrap());
    assert!(pets.exists(query_args! { shout__startswith = "FI" }).unwrap());
}

// =============================================================================
// References between records
// =============================================================================

#[derive(Queryable)]
struct Person {
    name: String,
    friend: Option<Record>,
}

#[test]
fn test_optional_references() {
    let sam = Record::object(Person {
        name: "Sam".to_string(),
        friend: None,
    });
    let robin = Record::object(Person {
        name: "Robin".to_string(),
        friend: Some(sam.clone()),
    });
    let people = QueryList::new(vec![sam.clone(), robin.clone()]);

    assert_eq!(
        people.get(query_args! { friend__name = "Sam" }),
        Ok(&robin)
    );
    // An absent reference is null, which matches an explicit null lookup
    assert_eq!(
        people.get(query_args! { friend = Value::Null }),
        Ok(&sam)
    );
}

// =============================================================================
// Generics
// =============================================================================

#[derive(Queryable)]
struct Tagged<T: Clone + Into<Value> + Send + Sync> {
    label: String,
    payload: T,
}

#[test]
fn test_generic_struct() {
    let tagged = Tagged {
        label: "answer".to_string(),
        payload: 42u32,
    };
    assert_eq!(tagged.field("payload"), Some(Value::from(42)));
    assert_eq!(Tagged::<u32>::LABEL, "label");
}
