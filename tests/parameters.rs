//! Laws of the typed parameter store.

use admgraph::model::{
    AudioObject, AudioProgramme, Diffuse, Duration, Gain, Importance, Language, LoudnessMetadata,
    Name, ObjectsBlock, Parameters, SphericalPosition, Start, Time,
};
use admgraph::AdmError;
use proptest::prelude::*;

mod proptest_helpers;

#[test]
fn required_parameter_is_present_and_not_default() {
    let object = AudioObject::new("Narrator");
    assert!(object.has::<Name>());
    assert!(!object.is_default::<Name>());
    assert_eq!(object.get::<Name>().unwrap(), Name::new("Narrator"));
}

#[test]
fn optional_parameter_without_value_is_not_set() {
    let object = AudioObject::new("Narrator");
    assert!(!object.has::<Duration>());
    assert_eq!(
        object.get::<Duration>(),
        Err(AdmError::NotSet {
            parameter: "duration"
        })
    );
}

#[test]
fn gain_conversions() {
    assert!((Gain::from_db(20.0).as_linear() - 10.0).abs() < 1e-9);
    assert_eq!(Gain::from_linear(0.0).as_db(), f64::NEG_INFINITY);
}

#[test]
fn out_of_range_values_are_rejected_at_construction() {
    assert!(matches!(
        Importance::new(11),
        Err(AdmError::InvalidValue {
            parameter: "importance",
            ..
        })
    ));
    assert!(Diffuse::new(1.5).is_err());
    assert!(Language::new("english").is_err());
}

proptest! {
    #![proptest_config(proptest_helpers::proptest_config())]

    #[test]
    fn defaulted_parameter_set_and_unset(start in proptest_helpers::arb_time(), gain in proptest_helpers::arb_gain()) {
        let mut object = AudioObject::new("o");
        prop_assert!(object.has::<Start>());
        prop_assert!(object.is_default::<Start>());
        prop_assert_eq!(object.get::<Start>().unwrap(), Start(Time::ZERO));
        prop_assert_eq!(object.get::<Gain>().unwrap(), Gain::unity());

        object.set(Start(start));
        object.set(gain);
        prop_assert!(!object.is_default::<Start>());
        prop_assert!(!object.is_default::<Gain>());
        prop_assert_eq!(object.get::<Start>().unwrap(), Start(start));
        prop_assert_eq!(object.get::<Gain>().unwrap(), gain);

        object.unset::<Start>();
        object.unset::<Gain>();
        prop_assert!(object.has::<Start>());
        prop_assert!(object.is_default::<Start>());
        prop_assert!(object.is_default::<Gain>());
        prop_assert_eq!(object.get::<Start>().unwrap(), Start(Time::ZERO));
        prop_assert_eq!(object.get::<Gain>().unwrap(), Gain::unity());
    }

    #[test]
    fn optional_parameter_round_trip(importance in proptest_helpers::arb_importance(), language in proptest_helpers::arb_language()) {
        let mut object = AudioObject::new("o");
        prop_assert!(!object.has::<Importance>());
        object.set(importance);
        prop_assert!(object.has::<Importance>());
        prop_assert_eq!(object.get::<Importance>().unwrap(), importance);
        object.unset::<Importance>();
        prop_assert!(!object.has::<Importance>());

        let mut programme = AudioProgramme::new("p");
        programme.set(language.clone());
        prop_assert_eq!(programme.get::<Language>().unwrap(), language);
        programme.unset::<Language>();
        prop_assert!(!programme.has::<Language>());
    }

    #[test]
    fn block_extent_defaults(diffuse in 0.0f64..=1.0) {
        let position = SphericalPosition::new(30.0, 0.0, 1.0).unwrap();
        let mut block = ObjectsBlock::new(position);
        prop_assert!(block.is_default::<Diffuse>());
        prop_assert_eq!(block.get::<Diffuse>().unwrap().value(), 0.0);

        block.set(Diffuse::new(diffuse).unwrap());
        prop_assert!(!block.is_default::<Diffuse>());
        prop_assert_eq!(block.get::<Diffuse>().unwrap().value(), diffuse);

        block.unset::<Diffuse>();
        prop_assert!(block.is_default::<Diffuse>());
    }

    #[test]
    fn vector_parameter_ignores_duplicates(values in prop::collection::vec(-40.0f64..0.0, 1..6)) {
        let mut programme = AudioProgramme::new("p");
        let mut expected: Vec<LoudnessMetadata> = Vec::new();
        for value in values {
            let entry = LoudnessMetadata {
                integrated_loudness: Some(value),
                ..Default::default()
            };
            let is_new = !expected.contains(&entry);
            prop_assert_eq!(programme.add(entry.clone()), is_new);
            prop_assert!(!programme.add(entry.clone()));
            if is_new {
                expected.push(entry);
            }
        }
        prop_assert_eq!(programme.get::<Vec<LoudnessMetadata>>().unwrap(), expected.clone());

        let first = expected[0].clone();
        prop_assert!(programme.remove(&first));
        prop_assert!(!programme.remove(&first));
        prop_assert_eq!(programme.get::<Vec<LoudnessMetadata>>().unwrap().len(), expected.len() - 1);
    }

    #[test]
    fn timecode_text_round_trip(time in proptest_helpers::arb_time()) {
        let text = time.to_string();
        prop_assert_eq!(text.parse::<Time>().unwrap(), time);

        let json = serde_json::to_string(&time).unwrap();
        prop_assert_eq!(json, format!("\"{}\"", text));
    }
}
