use flexstr::SharedStr as FlexStr;

use serde::{Deserialize, Deserializer};

use crate::error::BuildError;

pub fn join(v: &[FlexStr], connector: &str) -> FlexStr {
    let result = itertools::join(v.iter().map(|s| -> &str { s.as_ref() }), connector);
    result.into()
}

// Return the value of a required builder field or a MissingRequiredField error
pub fn required<T>(value: Option<T>, entity: &'static str, field: &'static str)
                   -> Result<T, BuildError>
{
    value.ok_or(BuildError::MissingRequiredField { entity, field })
}

// Append to a Vec unless an equal element is already present, for repeated
// fields with set semantics where the first occurrence keeps its position
pub fn push_unique<T: PartialEq>(vec: &mut Vec<T>, item: T) -> bool {
    if vec.contains(&item) {
        false
    } else {
        vec.push(item);
        true
    }
}

// Decode a repeated field with set semantics the way push_unique builds it,
// so decoding can't produce a value the builders couldn't
pub fn deserialize_unique<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
    where D: Deserializer<'de>,
          T: Deserialize<'de> + PartialEq
{
    let mut unique = vec![];
    for item in Vec::<T>::deserialize(deserializer)? {
        push_unique(&mut unique, item);
    }
    Ok(unique)
}

// A parent id of "" or "0" means "no parent" in pedigree files
pub fn parent_id_is_set(parent_id: &str) -> bool {
    !parent_id.is_empty() && parent_id != crate::constants::PED_MISSING_PARENT_ID
}

#[test]
fn test_join() {
    let v: Vec<FlexStr> = vec!["A".into(), "B".into(), "A".into()];
    assert_eq!(join(&v, " -> ").to_string(), "A -> B -> A");
    assert_eq!(join(&[], ",").to_string(), "");
}

#[test]
fn test_required() {
    assert_eq!(required(Some(1), "Thing", "id"), Ok(1));
    assert_eq!(required::<i32>(None, "Individual", "id"),
               Err(BuildError::MissingRequiredField { entity: "Individual", field: "id" }));
}

#[test]
fn test_push_unique() {
    let mut v = vec!["one", "two"];
    assert!(!push_unique(&mut v, "one"));
    assert!(push_unique(&mut v, "three"));
    assert_eq!(v, vec!["one", "two", "three"]);
}

#[test]
fn test_parent_id_is_set() {
    assert!(parent_id_is_set("MOTHER"));
    assert!(!parent_id_is_set("0"));
    assert!(!parent_id_is_set(""));
}
