use insta::assert_snapshot;
use serde_json::json;
use strictjson::{Error, JsonPath, Mapped, StrictJson, TypeDescriptor};
use strictjson_testhelpers::setup;

use crate::fixtures::{
    BasicClass, HasIntArrayProp, HasIntProp, HasNullableProp, HasObjectProp, MissingConstructor,
    NoTypesInConstructor, ThrowsInvalidArgument, ThrowsUnexpected,
};

fn map_err<T: strictjson::Construct>(engine: &StrictJson, json: &str) -> Error {
    match engine.map::<T>(json) {
        Ok(_) => panic!("mapping {json} to {} should have failed", T::NAME),
        Err(err) => err,
    }
}

#[test]
fn arrays_cannot_be_mapped_directly() {
    setup();
    let err = StrictJson::new()
        .map_decoded(&json!({"does not": "matter"}), &TypeDescriptor::array(), &JsonPath::root())
        .unwrap_err();
    assert!(err.is_configuration());
    assert_snapshot!(err, @"Cannot map to arrays directly, use StrictJson::map_to_array_of() at path <json_root>");
}

#[test]
fn array_parameter_without_adapter() {
    setup();
    let err = map_err::<HasIntArrayProp>(&StrictJson::new(), r#"{"int_array_prop": [1, 2, 3]}"#);
    assert!(err.is_configuration());
    assert_snapshot!(err, @r"
    HasIntArrayProp::construct has parameter named int_array_prop of type array with no parameter adapter
    (Use StrictJson::builder().add_parameter_array_adapter(...) to register an array adapter for this class) at path <json_root>
    ");
}

#[test]
fn array_parameter_without_adapter_fails_before_any_json() {
    setup();
    let engine = StrictJson::new();
    let ty = TypeDescriptor::of_class::<HasIntArrayProp>();
    let err = engine.parameters(ty.class().unwrap()).unwrap_err();
    assert!(err.message().contains("int_array_prop"));

    // Setup problems win over data problems.
    let err = map_err::<HasIntArrayProp>(&engine, "4");
    assert!(err.is_configuration());
}

#[test]
fn invalid_json() {
    setup();
    let json = "{ invalid";
    let err = map_err::<HasIntProp>(&StrictJson::new(), json);
    assert!(err.is_json_format());
    assert!(err.path().is_root());
    assert!(err.message().starts_with("Unable to parse invalid JSON ("));
    assert!(err.message().ends_with("): { invalid"));
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn unknown_target_type() {
    setup();
    let err = StrictJson::new()
        .map_named(r#"{"does_not": "matter"}"#, "invalid")
        .unwrap_err();
    assert!(err.is_configuration());
    assert_snapshot!(err, @r#"Type "invalid" is not a valid class at path <json_root>"#);
}

#[test]
fn mismatched_types() {
    setup();
    let err = map_err::<HasIntProp>(&StrictJson::new(), r#"{"int_prop": "1"}"#);
    assert!(err.is_json_format());
    assert_snapshot!(err, @"Value is of type string, expected type int at path $.int_prop");
}

#[test]
fn numbers_are_not_interchangeable() {
    setup();
    let engine = StrictJson::new();
    let err = engine.map_as::<f64>("1", &TypeDescriptor::float()).unwrap_err();
    assert_snapshot!(err, @"Value is of type int, expected type float at path <json_root>");
    let err = engine.map_as::<i64>("1.0", &TypeDescriptor::int()).unwrap_err();
    assert_snapshot!(err, @"Value is of type float, expected type int at path <json_root>");
}

#[test]
fn parameter_without_type() {
    setup();
    let err = map_err::<NoTypesInConstructor>(&StrictJson::new(), r#"{"unknown_property": "value"}"#);
    assert!(err.is_configuration());
    assert_snapshot!(err, @"NoTypesInConstructor::construct has parameter named unknown_property with no specified type at path <json_root>");
}

#[test]
fn missing_property() {
    setup();
    let err = map_err::<HasIntProp>(&StrictJson::new(), r#"{"unknown_property": "value"}"#);
    assert!(err.is_json_format());
    assert_snapshot!(err, @"HasIntProp::construct has non-optional parameter named int_prop that does not exist in JSON at path <json_root>");
}

#[cfg(feature = "suggestions")]
#[test]
fn missing_property_suggests_a_typo() {
    setup();
    let err = map_err::<HasIntProp>(&StrictJson::new(), r#"{"int_porp": 1}"#);
    assert_snapshot!(err, @"HasIntProp::construct has non-optional parameter named int_prop that does not exist in JSON (did you mean `int_porp`?) at path <json_root>");
}

#[test]
fn missing_property_in_nested_class() {
    setup();
    let json = r#"{
        "string_prop": "string_value",
        "int_prop": 1,
        "float_prop": 1.2,
        "bool_prop": true,
        "array_prop": [1, 2, 3],
        "class_prop": {}
    }"#;
    let engine = StrictJson::builder()
        .add_parameter_array_adapter::<BasicClass>("array_prop", TypeDescriptor::int())
        .build();
    let err = map_err::<BasicClass>(&engine, json);
    assert_snapshot!(err, @"HasIntProp::construct has non-optional parameter named int_prop that does not exist in JSON at path $.class_prop");
}

#[test]
fn wrong_type_in_nested_array() {
    setup();
    let json = r#"{
        "string_prop": "string_value",
        "int_prop": 1,
        "float_prop": 1.2,
        "bool_prop": true,
        "array_prop": [1, "two", 3],
        "class_prop": {"int_prop": 1}
    }"#;
    let engine = StrictJson::builder()
        .add_parameter_array_adapter::<BasicClass>("array_prop", TypeDescriptor::int())
        .build();
    let err = map_err::<BasicClass>(&engine, json);
    assert!(err.is_json_format());
    assert_snapshot!(err, @"Value is of type string, expected type int at path $.array_prop[1]");
}

#[test]
fn wrong_item_type_in_array_property() {
    setup();
    let engine = StrictJson::builder()
        .add_parameter_array_adapter::<HasIntArrayProp>("int_array_prop", TypeDescriptor::int())
        .build();
    let err = map_err::<HasIntArrayProp>(&engine, r#"{"int_array_prop": [1, "2", 3]}"#);
    assert_snapshot!(err, @"Value is of type string, expected type int at path $.int_array_prop[1]");
}

#[test]
fn array_property_given_an_object() {
    setup();
    let engine = StrictJson::builder()
        .add_parameter_array_adapter::<HasIntArrayProp>("int_array_prop", TypeDescriptor::int())
        .build();
    let err = map_err::<HasIntArrayProp>(&engine, r#"{"int_array_prop": {"0": 1}}"#);
    assert!(err.is_json_format());
    assert_snapshot!(err, @"Expected array, found object (using ArrayAdapter) at path $.int_array_prop");
}

#[test]
fn missing_constructor() {
    setup();
    let err = StrictJson::new()
        .map_as::<Mapped>(
            r#"{"does not": "matter"}"#,
            &TypeDescriptor::opaque::<MissingConstructor>("MissingConstructor"),
        )
        .unwrap_err();
    assert!(err.is_configuration());
    assert_snapshot!(err, @"Type MissingConstructor does not have a valid constructor at path <json_root>");
}

#[test]
fn null_for_non_nullable_parameter() {
    setup();
    let err = map_err::<HasIntProp>(&StrictJson::new(), r#"{"int_prop": null}"#);
    assert!(err.is_json_format());
    assert_snapshot!(err, @"Value is of type null, expected type int at path $.int_prop");
}

#[test]
fn default_null_differs_from_no_default() {
    setup();
    let engine = StrictJson::new();
    let err = map_err::<HasNullableProp>(&engine, "{}");
    assert_snapshot!(err, @"HasNullableProp::construct has non-optional parameter named nullable_prop that does not exist in JSON at path <json_root>");
}

#[test]
fn unsupported_type() {
    setup();
    let err = map_err::<HasObjectProp>(&StrictJson::new(), r#"{"object": {"should not": "work"}}"#);
    assert!(err.is_configuration());
    assert_snapshot!(err, @"Unsupported type object for parameter object of HasObjectProp at path <json_root>");
}

#[test]
fn validation_failure_is_a_format_error() {
    setup();
    let err = map_err::<ThrowsInvalidArgument>(&StrictJson::new(), r#"{"value": "not good enough"}"#);
    assert!(err.is_json_format());
    assert_snapshot!(err, @r#"ThrowsInvalidArgument::construct threw a validation error for args ["not good enough"] at path <json_root>"#);
    let source = std::error::Error::source(&err).unwrap();
    assert_eq!(source.to_string(), "I am very picky");
}

#[test]
fn unexpected_construction_failure_is_a_configuration_error() {
    setup();
    let err = map_err::<ThrowsUnexpected>(&StrictJson::new(), r#"{"value": "not good enough"}"#);
    assert!(err.is_configuration());
    assert_snapshot!(err, @r#"Unable to construct object of type ThrowsUnexpected with args ["not good enough"] at path <json_root>"#);
}

#[test]
fn scalar_where_object_expected() {
    setup();
    let err = map_err::<HasIntProp>(&StrictJson::new(), "4");
    assert!(err.is_json_format());
    assert_snapshot!(err, @"Expected object, found int at path <json_root>");
}

#[test]
fn map_to_array_of_rejects_objects() {
    setup();
    let err = StrictJson::new()
        .map_to_array_of::<HasIntProp>(r#"{"int_prop": 1}"#)
        .unwrap_err();
    assert!(err.is_json_format());
    assert_snapshot!(err, @"Expected array, found object (using ArrayAdapter) at path <json_root>");
}

#[test]
fn map_to_array_of_reports_element_paths() {
    setup();
    let err = StrictJson::new()
        .map_to_array_of::<HasIntProp>(r#"[{"int_prop": 1}, {"int_prop": true}]"#)
        .unwrap_err();
    assert_snapshot!(err, @"Value is of type bool, expected type int at path $[1].int_prop");
}
