use super::*;

#[test]
fn default_record_serializes_in_wire_order() {
    let body = serde_json::to_string(&PlaySituation::default()).expect("serialize");
    assert_eq!(
        body,
        r#"{"down":1,"ydstogo":10,"yardline_100":50,"qtr":1,"min_left":15,"sec_left":0,"posteam_score":0,"defteam_score":0,"pass_location":"middle","pass_length":"short","shotgun":false,"no_huddle":false}"#
    );
}

#[test]
fn setting_down_updates_only_down() {
    let mut record = PlaySituation::default();
    record.apply(FieldEdit::Numeric(NumericField::Down, 3));

    assert_eq!(record.down, 3);
    assert_eq!(
        PlaySituation {
            down: 1,
            ..record.clone()
        },
        PlaySituation::default()
    );
}

#[test]
fn every_field_edit_is_reflected_in_record() {
    let mut record = PlaySituation::default();
    for (offset, field) in NumericField::ALL.into_iter().enumerate() {
        let value = 40 + offset as i64;
        record.apply(FieldEdit::Numeric(field, value));
        assert_eq!(record.numeric(field), value, "{}", field.wire_name());
    }
    for flag in FormationFlag::ALL {
        record.apply(FieldEdit::Flag(flag, true));
        assert!(record.flag(flag), "{}", flag.wire_name());
    }
    record.apply(FieldEdit::PassLocation(PassLocation::Right));
    record.apply(FieldEdit::PassLength(PassLength::None));
    assert_eq!(record.pass_location, PassLocation::Right);
    assert_eq!(record.pass_length, PassLength::None);
}

#[test]
fn parses_edits_by_wire_name() {
    assert_eq!(
        FieldEdit::parse("yardline_100", " 25 ").expect("parse"),
        FieldEdit::Numeric(NumericField::Yardline100, 25)
    );
    assert_eq!(
        FieldEdit::parse("pass_location", "LEFT").expect("parse"),
        FieldEdit::PassLocation(PassLocation::Left)
    );
    assert_eq!(
        "pass_length=none".parse::<FieldEdit>().expect("parse"),
        FieldEdit::PassLength(PassLength::None)
    );
    assert_eq!(
        "no_huddle=yes".parse::<FieldEdit>().expect("parse"),
        FieldEdit::Flag(FormationFlag::NoHuddle, true)
    );
}

#[test]
fn out_of_range_values_are_accepted() {
    let edit = FieldEdit::parse("down", "9").expect("parse");
    let mut record = PlaySituation::default();
    record.apply(edit);
    assert_eq!(record.down, 9);
    assert!(!NumericField::Down.range().contains(&9));
}

#[test]
fn rejects_malformed_edits() {
    assert_eq!(
        FieldEdit::parse("quarterback", "1"),
        Err(FieldError::UnknownField("quarterback".to_string()))
    );
    assert!(matches!(
        FieldEdit::parse("qtr", "third"),
        Err(FieldError::InvalidInteger { field: "qtr", .. })
    ));
    assert!(matches!(
        FieldEdit::parse("pass_length", "medium"),
        Err(FieldError::InvalidChoice {
            field: "pass_length",
            ..
        })
    ));
    assert!(matches!(
        FieldEdit::parse("shotgun", "maybe"),
        Err(FieldError::InvalidFlag { .. })
    ));
    assert_eq!(
        "down".parse::<FieldEdit>(),
        Err(FieldError::MissingAssignment("down".to_string()))
    );
}

#[test]
fn hints_follow_advisory_ranges() {
    assert_eq!(NumericField::Down.hint(), "1–4");
    assert_eq!(NumericField::SecondsLeft.hint(), "0–59");
    assert_eq!(NumericField::DefenseScore.label(), "Opp Score");
}
