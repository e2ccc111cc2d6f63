use proptest::prelude::*;
use proptest::sample::select;
use serde_json::Value;
use storykeeper_core::serializer::project_file::{
    export, export_to_path, import, import_from_path,
};
use storykeeper_core::{
    DictionaryStore, NewSense, PartOfSpeech, Project, SerializeError, Word, FORMAT_VERSION,
};

fn two_brain_project() -> Project {
    let mut store = DictionaryStore::new(Project::new("Saga of Kaneran"));
    let fantasy = store.add_brain("Fantasy1").unwrap();
    let scifi = store.add_brain("SciFi").unwrap();

    let bank = store.add_word(fantasy, "bank").unwrap();
    store
        .add_sense(bank, NewSense::new("Geography", "river edge"))
        .unwrap();
    store
        .add_sense(
            bank,
            NewSense::new("Finance", "money institution")
                .with_context("Guild Quarter")
                .with_part_of_speech(PartOfSpeech::Noun),
        )
        .unwrap();
    store.add_word(fantasy, "glimmer").unwrap();

    let drive = store.add_word(scifi, "drive").unwrap();
    store
        .add_sense(drive, NewSense::new("Technology", "faster-than-light engine"))
        .unwrap();
    store.add_context("Moon").unwrap();
    store.set_auto_learn_contexts(true);
    store.into_project()
}

fn export_value(project: &Project) -> Value {
    serde_json::from_slice(&export(project).unwrap()).unwrap()
}

#[test]
fn round_trip_keeps_brains_and_order() {
    let project = two_brain_project();

    let restored = import(&export(&project).unwrap()).unwrap();

    assert_eq!(restored, project);
    let names = restored
        .brains
        .iter()
        .map(|brain| brain.name.as_str())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["Fantasy1", "SciFi"]);
    assert!(restored.settings.auto_learn_contexts);
}

#[test]
fn export_writes_format_version() {
    let value = export_value(&two_brain_project());
    assert_eq!(value["format_version"], u64::from(FORMAT_VERSION));
    assert_eq!(value["project"]["title"], "Saga of Kaneran");
}

#[test]
fn newer_version_is_rejected_as_mismatch() {
    let mut value = export_value(&two_brain_project());
    value["format_version"] = Value::from(2);
    let bytes = serde_json::to_vec(&value).unwrap();

    match import(&bytes).unwrap_err() {
        SerializeError::VersionMismatch { found, supported } => {
            assert_eq!(found, 2);
            assert_eq!(supported, FORMAT_VERSION);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn newer_version_wins_over_unknown_body() {
    let bytes = br#"{"format_version": 7, "project": {"anything": "new"}}"#;
    assert!(matches!(
        import(bytes),
        Err(SerializeError::VersionMismatch { found: 7, .. })
    ));
}

#[test]
fn malformed_documents_are_format_errors() {
    let mut missing_version = export_value(&two_brain_project());
    missing_version
        .as_object_mut()
        .unwrap()
        .remove("format_version");
    let mut zero_version = export_value(&two_brain_project());
    zero_version["format_version"] = Value::from(0);
    let mut text_version = export_value(&two_brain_project());
    text_version["format_version"] = Value::from("1");
    let mut extra_field = export_value(&two_brain_project());
    extra_field["extra"] = Value::from(true);

    let cases = vec![
        b"not json at all".to_vec(),
        b"[1, 2, 3]".to_vec(),
        serde_json::to_vec(&missing_version).unwrap(),
        serde_json::to_vec(&zero_version).unwrap(),
        serde_json::to_vec(&text_version).unwrap(),
        serde_json::to_vec(&extra_field).unwrap(),
        br#"{"format_version": 1}"#.to_vec(),
    ];
    for bytes in cases {
        let err = import(&bytes).unwrap_err();
        assert!(
            matches!(err, SerializeError::Format(_)),
            "expected format error, got {err}"
        );
    }
}

#[test]
fn duplicate_word_keys_are_rejected() {
    let mut project = two_brain_project();
    project.brains[1].words.push(Word::new("Drive").unwrap());

    let err = import(&export(&project).unwrap()).unwrap_err();
    assert!(matches!(err, SerializeError::Format(_)));
}

#[test]
fn path_helpers_round_trip_through_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("saga.skproj");
    let project = two_brain_project();

    export_to_path(&project, &path).unwrap();
    assert!(!dir.path().join("saga.skproj.tmp").exists());
    assert_eq!(import_from_path(&path).unwrap(), project);

    let missing = import_from_path(dir.path().join("missing.skproj")).unwrap_err();
    assert!(matches!(missing, SerializeError::Io(_)));
}

const PARTS_OF_SPEECH: &[PartOfSpeech] = &[
    PartOfSpeech::Noun,
    PartOfSpeech::Verb,
    PartOfSpeech::Adjective,
    PartOfSpeech::Adverb,
    PartOfSpeech::Pronoun,
    PartOfSpeech::Other,
];

type SenseInput = (String, String, String, Option<PartOfSpeech>);
type WordInput = (String, Vec<SenseInput>);
type BrainInput = (String, Vec<WordInput>);

fn sense_input() -> impl Strategy<Value = SenseInput> {
    (
        "[A-Za-zÄäÉé ]{0,8}",
        "[a-zäöüßé ,.'-]{0,16}",
        "[A-Za-zÄäÖö ]{0,8}",
        proptest::option::of(select(PARTS_OF_SPEECH.to_vec())),
    )
}

// Small alphabets with case pairs so brain names and keys collide often.
fn brain_input() -> impl Strategy<Value = BrainInput> {
    (
        "[aAäÄöÖ ]{0,4}",
        prop::collection::vec(
            (
                "[bBüÜßẞ ]{0,3}",
                prop::collection::vec(sense_input(), 0..3),
            ),
            0..4,
        ),
    )
}

fn build_project(title: &str, auto_learn: bool, brains: &[BrainInput]) -> Project {
    let mut store = DictionaryStore::new(Project::new(title));
    store.set_auto_learn_contexts(auto_learn);
    for (name, words) in brains {
        let Ok(brain_id) = store.add_brain(name) else {
            continue;
        };
        for (key, senses) in words {
            let Ok(word_id) = store.add_word(brain_id, key) else {
                continue;
            };
            for (category, definition, context, part_of_speech) in senses {
                let mut fields = NewSense::new(category.as_str(), definition.as_str())
                    .with_context(context.as_str());
                if let Some(part_of_speech) = part_of_speech {
                    fields = fields.with_part_of_speech(*part_of_speech);
                }
                let _ = store.add_sense(word_id, fields);
            }
        }
    }
    store.into_project()
}

proptest! {
    #[test]
    fn proptest_store_built_projects_round_trip(
        title in "\\PC{0,12}",
        auto_learn in any::<bool>(),
        brains in prop::collection::vec(brain_input(), 0..4),
    ) {
        let project = build_project(&title, auto_learn, &brains);
        prop_assert!(project.validate().is_ok());

        let bytes = export(&project).unwrap();
        let restored = import(&bytes);
        prop_assert!(restored.is_ok(), "import failed: {:?}", restored.as_ref().err());
        prop_assert_eq!(restored.unwrap(), project);
    }
}
