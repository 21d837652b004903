use modeldao::{DaoError, Model, Populator, ScriptedSource};

#[derive(Debug, Default, Clone, PartialEq, Model)]
struct Driver {
    #[primary_key]
    #[model(column = "numDriver")]
    num_driver: i32,
    name: String,
    surname: String,
}

#[derive(Debug, Default, Clone, PartialEq, Model)]
struct Place {
    #[primary_key]
    #[model(column = "idPlace")]
    id_place: i32,
    city: String,
    cp: i32,
    site: String,
}

#[derive(Debug, Default, Clone, PartialEq, Model)]
struct Fare {
    #[primary_key]
    code: String,
    price: f64,
    night: bool,
}

#[derive(Debug, Default, Clone, PartialEq, Model)]
struct Stop {
    #[primary_key]
    code: String,
    platform: Option<i32>,
    shelter: Option<bool>,
    note: Option<String>,
}

#[derive(Debug, Default, Model)]
struct Note {
    text: String,
}

#[test]
fn test_populate_all_fills_every_field() {
    let mut source = ScriptedSource::new(["7", "Ana", "Lopez"]);
    let driver: Driver = Populator::new(&mut source).populate_all().unwrap();

    assert_eq!(
        driver,
        Driver {
            num_driver: 7,
            name: "Ana".into(),
            surname: "Lopez".into(),
        }
    );
    assert_eq!(
        source.prompts(),
        [
            "Enter value for numDriver (INTEGER): ",
            "Enter value for name (TEXT): ",
            "Enter value for surname (TEXT): ",
        ]
    );
    assert_eq!(source.remaining(), 0);
}

#[test]
fn test_non_numeric_key_is_rejected() {
    let mut source = ScriptedSource::new(["seven", "Ana", "Lopez"]);
    let err = Populator::new(&mut source)
        .populate_all::<Driver>()
        .unwrap_err();

    match err {
        DaoError::InputError(msg) => {
            assert!(msg.starts_with("numDriver:"));
            assert!(msg.contains("'seven' is not a valid INTEGER"));
        }
        other => panic!("expected input error, got {:?}", other),
    }
    // Nothing past the failing field is consumed.
    assert_eq!(source.remaining(), 2);
}

#[test]
fn test_keys_only_leaves_defaults() {
    let mut source = ScriptedSource::new(["3", "Madrid"]);
    let place: Place = Populator::new(&mut source).populate_keys_only().unwrap();

    assert_eq!(
        place,
        Place {
            id_place: 3,
            ..Default::default()
        }
    );
    assert_eq!(source.prompts(), ["Enter value for idPlace (INTEGER): "]);
    assert_eq!(source.remaining(), 1);
}

#[test]
fn test_float_and_boolean_fields() {
    let mut source = ScriptedSource::new(["F-1", " 2.75 ", "TRUE"]);
    let fare: Fare = Populator::new(&mut source).populate_all().unwrap();
    assert_eq!(fare.price, 2.75);
    assert!(fare.night);

    let mut source = ScriptedSource::new(["F-2", "3", "maybe"]);
    let err = Populator::new(&mut source)
        .populate_all::<Fare>()
        .unwrap_err();
    assert!(err.to_string().contains("night:"));
}

#[test]
fn test_text_is_taken_verbatim() {
    let mut source = ScriptedSource::new(["1", "  Plaza  ", "28001", ""]);
    let place: Place = Populator::new(&mut source).populate_all().unwrap();
    assert_eq!(place.city, "  Plaza  ");
    assert_eq!(place.site, "");
}

#[test]
fn test_empty_number_is_rejected() {
    let mut source = ScriptedSource::new([""]);
    let err = Populator::new(&mut source)
        .populate_keys_only::<Driver>()
        .unwrap_err();
    assert!(matches!(err, DaoError::InputError(_)));
}

#[test]
fn test_end_of_input_is_an_input_error() {
    let mut source = ScriptedSource::new(["7"]);
    let err = Populator::new(&mut source)
        .populate_all::<Driver>()
        .unwrap_err();
    assert!(matches!(err, DaoError::InputError(ref msg) if msg.contains("'name'")));
}

#[test]
fn test_keys_only_without_keys_is_a_configuration_error() {
    let mut source = ScriptedSource::new(["hello"]);
    let err = Populator::new(&mut source)
        .populate_keys_only::<Note>()
        .unwrap_err();
    assert!(err.is_configuration());
    assert!(source.prompts().is_empty());

    let note: Note = Populator::new(&mut source).populate_all().unwrap();
    assert_eq!(note.text, "hello");
}

#[test]
fn test_blank_line_clears_optional_fields() {
    let mut source = ScriptedSource::new(["S-1", "", " ", ""]);
    let stop: Stop = Populator::new(&mut source).populate_all().unwrap();
    assert_eq!(
        stop,
        Stop {
            code: "S-1".into(),
            platform: None,
            shelter: None,
            note: None,
        }
    );

    let mut source = ScriptedSource::new(["S-2", "4", "false", "north side"]);
    let stop: Stop = Populator::new(&mut source).populate_all().unwrap();
    assert_eq!(stop.platform, Some(4));
    assert_eq!(stop.shelter, Some(false));
    assert_eq!(stop.note.as_deref(), Some("north side"));

    let mut source = ScriptedSource::new(["S-3", "four"]);
    let err = Populator::new(&mut source)
        .populate_all::<Stop>()
        .unwrap_err();
    assert!(err.to_string().contains("platform:"));
}
