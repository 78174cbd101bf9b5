// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Integration tests across builder, value handles and container ops.

use super::*;
use crate::builder::{
    get_struct_field_value, new_field, new_field_with_type, new_map_of_type_keyed,
    new_slice_of_type, new_struct_definition, new_type_instance, set_struct_field_value,
};
use crate::value::{make_map, new};

fn named_record() -> Type {
    new_struct_definition(vec![new_field("Name", String::new(), r#"json:"name""#)])
        .expect("record type")
}

fn instance(ty: &Type, name: &str) -> Value {
    let ptr = new_type_instance(ty);
    set_struct_field_value(&ptr, "Name", &value_of(name)).expect("set Name");
    ptr
}

#[test]
fn test_append_then_prepend_records() {
    // 1. Build the type and an empty sequence of it
    let record = named_record();
    let list = new_slice_of_type(&record).expect("slice");

    // 2. Append "a", prepend "b"
    let list = ops::append(&list, &[instance(&record, "a")]).expect("append");
    let list = ops::prepend(&list, &[instance(&record, "b")]).expect("prepend");

    // 3. Verify order
    assert_eq!(ops::len(&list).unwrap(), 2);
    let first = ops::get_index_value(&list, 0).unwrap();
    let second = ops::get_index_value(&list, 1).unwrap();
    assert_eq!(get_struct_field_value::<String>(&first, "Name").unwrap(), "b");
    assert_eq!(get_struct_field_value::<String>(&second, "Name").unwrap(), "a");
}

#[test]
fn test_len_guards() {
    let rec = new_type_instance(&named_record()).elem().unwrap();
    let err = ops::len(&rec).unwrap_err();
    assert_eq!(err.class(), ErrorClass::Unsupported);
    assert_eq!(err.to_string(), "Value::len: kind struct not supported");

    assert_eq!(ops::len(&value_of("hello")).unwrap(), 5);
}

#[test]
fn test_get_index_out_of_range_cites_bounds() {
    let s = value_of(vec![1u8, 2, 3]);
    let err = ops::get_index(&s, 5).unwrap_err();
    assert!(matches!(err, Error::OutOfRange { index: 5, len: 3, .. }));
    assert_eq!(err.class(), ErrorClass::OutOfRange);
    assert!(err.to_string().contains("index 5 out of range for length 3"));
}

#[test]
fn test_struct_definition_round_trips_field_types() {
    let fields = [
        ("id", Type::of::<u64>()),
        ("label", Type::of::<String>()),
        ("weights", Type::of::<Vec<f32>>()),
        ("grid", Type::of::<[[i8; 2]; 2]>()),
    ];
    let ty = new_struct_definition(
        fields
            .iter()
            .map(|(name, ty)| new_field_with_type(name, ty, ""))
            .collect(),
    )
    .unwrap();

    assert_eq!(ty.num_field().unwrap(), fields.len());
    for (name, declared) in &fields {
        let normalized = NamingConfig::default().normalize(name);
        let field = ty.field_by_name(&normalized).unwrap().unwrap();
        assert_eq!(&field.ty, declared);
    }
    assert_eq!(
        ty.to_string(),
        "struct { Id u64; Label string; Weights []f32; Grid [2][2]i8 }"
    );
}

#[test]
fn test_non_comparable_key_rejected_before_allocation() {
    let record = named_record();
    let key = Type::of::<Vec<String>>();
    let err = new_map_of_type_keyed(&key, &record).unwrap_err();
    assert_eq!(err.class(), ErrorClass::ShapeInvalid);

    let m = new_map_of_type_keyed(&record, &Type::of::<bool>()).unwrap();
    ops::put_map_index(&m, &instance(&record, "k").elem().unwrap(), &value_of(true)).unwrap();
    assert_eq!(ops::len(&m).unwrap(), 1);
}

#[test]
fn test_set_index_then_get_index_value() {
    let record = named_record();
    let list = ops::append(
        &new_slice_of_type(&record).unwrap(),
        &[instance(&record, "x"), instance(&record, "y")],
    )
    .unwrap();

    let replacement = instance(&record, "z").elem().unwrap();
    ops::set_index(&list, 1, &replacement).unwrap();
    let got = ops::get_index_value(&list, 1).unwrap();
    assert!(got.equal(&replacement).unwrap());

    let err = ops::set_index(&list, 2, &replacement).unwrap_err();
    assert!(matches!(err, Error::OutOfRange { index: 2, len: 2, .. }));
}

#[test]
fn test_get_index_aliases_get_index_value_copies() {
    let record = named_record();
    let list = ops::append(&new_slice_of_type(&record).unwrap(), &[instance(&record, "a")]).unwrap();

    let alias = ops::get_index(&list, 0).unwrap();
    let copy = ops::get_index_value(&list, 0).unwrap();
    alias.field_by_name("Name").unwrap().set_string("changed").unwrap();

    assert_eq!(get_struct_field_value::<String>(&copy, "Name").unwrap(), "a");
    let reread = ops::get_index_value(&list, 0).unwrap();
    assert_eq!(get_struct_field_value::<String>(&reread, "Name").unwrap(), "changed");
}

#[test]
fn test_nested_dynamic_types() {
    let record = named_record();
    let group = TypeBuilder::with_config(NamingConfig::default())
        .field::<String>("title")
        .field_with_type("members", &Type::slice_of(&record))
        .field_with_type("index", &Type::map_of(&Type::of::<String>(), &record).unwrap())
        .build()
        .unwrap();

    let g = new_type_instance(&group).elem().unwrap();
    let members = g.field_by_name("Members").unwrap();
    let grown = ops::append(&members, &[instance(&record, "m1"), instance(&record, "m2")]).unwrap();
    members.set(&grown).unwrap();

    let index = g.field_by_name("Index").unwrap();
    index
        .set(&make_map(&index.ty().unwrap()).unwrap())
        .unwrap();
    ops::put_map_index(&index, &value_of("first"), &ops::get_index(&members, 0).unwrap()).unwrap();

    assert_eq!(ops::len(&g.field_by_name("Members").unwrap()).unwrap(), 2);
    let first = ops::get_map_index(&index, &value_of("first")).unwrap().unwrap();
    assert_eq!(get_struct_field_value::<String>(&first, "Name").unwrap(), "m1");
}

#[test]
fn test_slice_of_array_field_aliases_record() {
    let ty = Type::struct_of(vec![FieldSpec::new(
        "Scores",
        Type::array_of(&Type::of::<i32>(), 4),
    )])
    .unwrap();
    let rec = new(&ty).elem().unwrap();
    let scores = rec.field_by_name("Scores").unwrap();

    let window = scores.slice(1, 3).unwrap();
    assert_eq!(window.len().unwrap(), 2);
    assert_eq!(window.cap().unwrap(), 3);
    ops::set_index(&window, 0, &value_of(7i32)).unwrap();

    assert_eq!(scores.extract_as::<[i32; 4]>().unwrap(), [0, 7, 0, 0]);
}

#[test]
fn test_unexported_fields_are_read_only() {
    let ty = Type::struct_of(vec![
        FieldSpec::new("Public", Type::of::<i64>()),
        FieldSpec::new("secret", Type::of::<i64>()),
    ])
    .unwrap();
    let rec = new(&ty).elem().unwrap();
    let secret = rec.field_by_name("secret").unwrap();

    assert!(!secret.can_set());
    assert_eq!(secret.as_int().unwrap(), 0);
    assert!(matches!(secret.set_int(1), Err(Error::Unexported { .. })));
    assert!(matches!(secret.extract(), Err(Error::Unexported { .. })));

    let public = rec.field_by_name("Public").unwrap();
    assert!(matches!(public.set(&secret), Err(Error::Unexported { .. })));
    assert!(!ty.field(1).unwrap().is_exported());
}

#[test]
fn test_interface_field_holds_any_value() {
    let ty = Type::struct_of(vec![FieldSpec::new("Payload", Type::any())]).unwrap();
    let rec = new_type_instance(&ty);

    set_struct_field_value(&rec, "Payload", &value_of(3i32)).unwrap();
    let payload = builder::get_struct_field_value_any(&rec, "Payload").unwrap();
    assert_eq!(payload.kind(), Kind::Interface);
    assert_eq!(payload.elem().unwrap().kind(), Kind::I32);
    assert_eq!(payload.extract_as::<i32>().unwrap(), 3);

    set_struct_field_value(&rec, "Payload", &value_of("now a string")).unwrap();
    assert_eq!(
        builder::get_struct_field_value::<String>(&rec, "Payload").unwrap(),
        "now a string"
    );
}

#[test]
fn test_types_are_shareable_across_threads() {
    let record = named_record();
    let handle = std::thread::spawn({
        let record = record.clone();
        move || record.field(0).map(|f| f.name)
    });
    assert_eq!(handle.join().unwrap().unwrap(), "Name");
    assert_eq!(record.num_field().unwrap(), 1);
}
