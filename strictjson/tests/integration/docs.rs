//! The examples from the crate documentation, end to end.

use chrono::{DateTime, Datelike, Utc};
use indoc::indoc;
use insta::assert_snapshot;
use strictjson::{
    Adapter, AdapterError, Arguments, Construct, ConstructError, JsonFormatError, JsonPath,
    Mapped, Param, StrictJson, TypeDescriptor, Value,
};
use strictjson_testhelpers::{setup, user_list_json};

use crate::fixtures::LenientBooleanAdapter;

#[derive(Debug, PartialEq)]
struct Address {
    street: String,
    zip_code: String,
}

impl Construct for Address {
    const NAME: &'static str = "Address";

    fn signature() -> Vec<Param> {
        vec![
            Param::new("street", TypeDescriptor::string()),
            Param::new("zip_code", TypeDescriptor::string()),
        ]
    }

    fn construct(mut args: Arguments) -> Result<Self, ConstructError> {
        Ok(Address {
            street: args.take("street")?,
            zip_code: args.take("zip_code")?,
        })
    }
}

#[derive(Debug, PartialEq)]
struct User {
    name: String,
    age: i64,
    address: Address,
}

impl Construct for User {
    const NAME: &'static str = "User";

    fn signature() -> Vec<Param> {
        vec![
            Param::new("name", TypeDescriptor::string()),
            Param::new("age", TypeDescriptor::int()),
            Param::named("address", "Address"),
        ]
    }

    fn construct(mut args: Arguments) -> Result<Self, ConstructError> {
        Ok(User {
            name: args.take("name")?,
            age: args.take("age")?,
            address: args.take("address")?,
        })
    }
}

fn date_type() -> TypeDescriptor {
    TypeDescriptor::opaque::<DateTime<Utc>>("DateTime")
}

#[derive(Debug)]
struct Event {
    name: String,
    date: DateTime<Utc>,
    is_suit_required: bool,
}

impl Construct for Event {
    const NAME: &'static str = "Event";

    fn signature() -> Vec<Param> {
        vec![
            Param::new("name", TypeDescriptor::string()),
            Param::new("date", date_type()),
            Param::new("is_suit_required", TypeDescriptor::bool())
                .with_default(|| Mapped::Bool(false)),
        ]
    }

    fn construct(mut args: Arguments) -> Result<Self, ConstructError> {
        Ok(Event {
            name: args.take("name")?,
            date: args.take_instance("date")?,
            is_suit_required: args.take("is_suit_required")?,
        })
    }
}

/// A user with the events they went to.
#[derive(Debug)]
struct Attendee {
    name: String,
    events_attended: Vec<Event>,
}

impl Construct for Attendee {
    const NAME: &'static str = "Attendee";

    fn signature() -> Vec<Param> {
        vec![
            Param::new("name", TypeDescriptor::string()),
            Param::new("events_attended", TypeDescriptor::array())
                .with_default(|| Mapped::List(Vec::new())),
        ]
    }

    fn construct(mut args: Arguments) -> Result<Self, ConstructError> {
        Ok(Attendee {
            name: args.take("name")?,
            events_attended: args.take("events_attended")?,
        })
    }
}

/// Parses ISO 8601 timestamps into `DateTime<Utc>`.
struct DateAdapter;

impl Adapter for DateAdapter {
    fn from_types(&self) -> Vec<TypeDescriptor> {
        vec![TypeDescriptor::string()]
    }

    fn from_json(&self, value: &Value, _: &StrictJson, path: &JsonPath) -> Result<Mapped, AdapterError> {
        let text = value.as_str().unwrap_or_default();
        let date = DateTime::parse_from_rfc3339(text).map_err(|err| {
            JsonFormatError::new(format!("Expected ISO8601 date, found {text}"), path).with_source(err)
        })?;
        Ok(Mapped::opaque("DateTime", date.with_timezone(&Utc)))
    }

    fn name(&self) -> &str {
        "DateAdapter"
    }
}

struct ModelWithOptionalParam {
    optional_param: String,
}

impl Construct for ModelWithOptionalParam {
    const NAME: &'static str = "ModelWithOptionalParam";

    fn signature() -> Vec<Param> {
        vec![
            Param::new("optional_param", TypeDescriptor::string())
                .with_default(|| Mapped::from("default")),
        ]
    }

    fn construct(mut args: Arguments) -> Result<Self, ConstructError> {
        Ok(ModelWithOptionalParam {
            optional_param: args.take("optional_param")?,
        })
    }
}

struct ModelWithNullableParam {
    nullable_param: Option<String>,
}

impl Construct for ModelWithNullableParam {
    const NAME: &'static str = "ModelWithNullableParam";

    fn signature() -> Vec<Param> {
        vec![Param::named("nullable_param", "?string")]
    }

    fn construct(mut args: Arguments) -> Result<Self, ConstructError> {
        Ok(ModelWithNullableParam {
            nullable_param: args.take("nullable_param")?,
        })
    }
}

#[derive(Debug)]
struct ErrorPathExampleRoot;

impl Construct for ErrorPathExampleRoot {
    const NAME: &'static str = "ErrorPathExampleRoot";

    fn signature() -> Vec<Param> {
        vec![Param::new("a", TypeDescriptor::of_class::<ErrorPathExampleA>())]
    }

    fn construct(_args: Arguments) -> Result<Self, ConstructError> {
        Ok(ErrorPathExampleRoot)
    }
}

struct ErrorPathExampleA;

impl Construct for ErrorPathExampleA {
    const NAME: &'static str = "ErrorPathExampleA";

    fn signature() -> Vec<Param> {
        vec![Param::new("b", TypeDescriptor::array())]
    }

    fn construct(_args: Arguments) -> Result<Self, ConstructError> {
        Ok(ErrorPathExampleA)
    }
}

fn event_engine() -> StrictJson {
    StrictJson::builder()
        .add_class_adapter::<DateTime<Utc>>(DateAdapter)
        .build()
}

#[test]
fn basic_example() {
    setup();
    let json = indoc! {r#"
        {
          "name": "Joe User",
          "age": 4,
          "address": {
            "street": "1234 Fake St.",
            "zip_code": "12345"
          }
        }
    "#};
    let engine = StrictJson::builder().register_class::<Address>().build();
    let user: User = engine.map(json).unwrap();
    assert_eq!(
        user,
        User {
            name: "Joe User".into(),
            age: 4,
            address: Address {
                street: "1234 Fake St.".into(),
                zip_code: "12345".into(),
            },
        }
    );
}

#[test]
fn named_class_must_be_registered() {
    setup();
    let err = StrictJson::new()
        .map::<User>(r#"{"name": "Joe", "age": 4, "address": {}}"#)
        .unwrap_err();
    assert!(err.is_configuration());
    assert_snapshot!(err, @"Unsupported type Address for parameter address of User at path <json_root>");
}

#[test]
fn large_user_list_keeps_order() {
    setup();
    let engine = StrictJson::builder().register_class::<Address>().build();
    let users: Vec<User> = engine.map_to_array_of(&user_list_json(1000)).unwrap();
    assert_eq!(users.len(), 1000);
    assert_eq!(
        users[999],
        User {
            name: "User 999".into(),
            age: 69,
            address: Address {
                street: "999 Fake St.".into(),
                zip_code: "06993".into(),
            },
        }
    );
    assert!(users.iter().enumerate().all(|(i, user)| user.name == format!("User {i}")));
}

#[test]
fn class_adapter_example() {
    setup();
    let json = indoc! {r#"
        {
            "name": "Dinner party for Bob",
            "date": "2013-02-13T08:35:34Z"
        }
    "#};
    let event: Event = event_engine().map(json).unwrap();
    assert_eq!(event.name, "Dinner party for Bob");
    assert_eq!(event.date.year(), 2013);
    assert!(!event.is_suit_required);
}

#[test]
fn class_adapter_rejects_bad_dates() {
    setup();
    let err = event_engine()
        .map::<Event>(r#"{"name": "Dinner", "date": "last tuesday"}"#)
        .unwrap_err();
    assert!(err.is_json_format());
    assert_snapshot!(err, @"Expected ISO8601 date, found last tuesday at path $.date");
}

#[test]
fn unadapted_opaque_parameter() {
    setup();
    let err = StrictJson::new()
        .map::<Event>(r#"{"name": "Dinner", "date": "2013-02-13T08:35:34Z"}"#)
        .unwrap_err();
    assert!(err.is_configuration());
    assert_snapshot!(err, @"Type DateTime does not have a valid constructor at path $.date");
}

#[test]
fn parameter_adapter_example() {
    setup();
    let json = indoc! {r#"
        {
            "name": "Dinner party for Bob",
            "date": "2013-02-13T08:35:34Z",
            "is_suit_required": 1
        }
    "#};
    let engine = StrictJson::builder()
        .add_class_adapter::<DateTime<Utc>>(DateAdapter)
        .add_parameter_adapter::<Event>("is_suit_required", LenientBooleanAdapter)
        .build();
    let event: Event = engine.map(json).unwrap();
    assert!(event.is_suit_required);
}

#[test]
fn array_adapter_example() {
    setup();
    let json = indoc! {r#"
        {
            "name": "Tim Fabulous",
            "events_attended": [
                {
                    "name": "Dinner party for Bob",
                    "date": "2013-02-13T08:35:34Z"
                }
            ]
        }
    "#};
    let engine = StrictJson::builder()
        .add_class_adapter::<DateTime<Utc>>(DateAdapter)
        .add_parameter_array_adapter::<Attendee>(
            "events_attended",
            TypeDescriptor::of_class::<Event>(),
        )
        .build();
    let attendee: Attendee = engine.map(json).unwrap();
    assert_eq!(attendee.name, "Tim Fabulous");
    assert_eq!(attendee.events_attended.len(), 1);
    assert_eq!(attendee.events_attended[0].name, "Dinner party for Bob");

    let homebody: Attendee = engine.map(r#"{"name": "Stay Home"}"#).unwrap();
    assert!(homebody.events_attended.is_empty());
}

#[test]
fn optional_param_example() {
    setup();
    let engine = StrictJson::new();
    let model: ModelWithOptionalParam = engine.map("{}").unwrap();
    assert_eq!(model.optional_param, "default");
    let model: ModelWithOptionalParam = engine.map(r#"{"optional_param": "given"}"#).unwrap();
    assert_eq!(model.optional_param, "given");
}

#[test]
fn nullable_param_example() {
    setup();
    let engine = StrictJson::new();
    let model: ModelWithNullableParam = engine.map(r#"{"nullable_param": null}"#).unwrap();
    assert_eq!(model.nullable_param, None);
    let model: ModelWithNullableParam = engine.map(r#"{"nullable_param": "here"}"#).unwrap();
    assert_eq!(model.nullable_param.as_deref(), Some("here"));
}

#[test]
fn error_path_example() {
    setup();
    let engine = StrictJson::builder()
        .add_parameter_array_adapter::<ErrorPathExampleA>("b", TypeDescriptor::int())
        .build();
    let err = engine
        .map::<ErrorPathExampleRoot>(r#"{"a": {"b": [1, "two", 3]}}"#)
        .unwrap_err();
    assert_snapshot!(err, @"Value is of type string, expected type int at path $.a.b[1]");
    assert_snapshot!(err.path(), @"$.a.b[1]");
}
