use storykeeper_core::{ContextIndex, DictionaryStore, NewSense, Project, WordId};

fn fantasy_store() -> (DictionaryStore, WordId) {
    let mut store = DictionaryStore::new(Project::new("Saga"));
    let brain_id = store.add_brain("Fantasy1").unwrap();
    let word_id = store.add_word(brain_id, "bank").unwrap();
    store
        .add_sense(word_id, NewSense::new("Geography", "river edge"))
        .unwrap();
    store
        .add_sense(word_id, NewSense::new("Finance", "money institution"))
        .unwrap();
    (store, word_id)
}

#[test]
fn river_text_ranks_geography_first() {
    let (store, word_id) = fantasy_store();
    let brain = store.active_brain().unwrap();
    let senses = store.list_senses(word_id).unwrap();

    let ranked = ContextIndex::new(brain).rank("bank", "he sat by the river");

    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0].sense_id, senses[0].id);
    assert!(ranked[0].score > ranked[1].score);
}

#[test]
fn money_text_ranks_finance_first() {
    let (store, word_id) = fantasy_store();
    let brain = store.active_brain().unwrap();
    let senses = store.list_senses(word_id).unwrap();

    let ranked = ContextIndex::new(brain).rank("Bank", "she counted the money twice");
    assert_eq!(ranked[0].sense_id, senses[1].id);
}

#[test]
fn unrelated_text_keeps_sense_order() {
    let (store, word_id) = fantasy_store();
    let brain = store.active_brain().unwrap();
    let senses = store.list_senses(word_id).unwrap();

    let ranked = ContextIndex::new(brain).rank("bank", "the dragon slept");
    let ids = ranked.iter().map(|item| item.sense_id).collect::<Vec<_>>();
    assert_eq!(ids, vec![senses[0].id, senses[1].id]);
    assert!(ranked.iter().all(|item| item.score == 0.0));
}

#[test]
fn word_without_senses_ranks_empty() {
    let (mut store, _) = fantasy_store();
    let brain_id = store.active_brain().unwrap().id;
    store.add_word(brain_id, "glimmer").unwrap();
    let brain = store.active_brain().unwrap();

    assert!(ContextIndex::new(brain).rank("glimmer", "any text").is_empty());
    assert!(ContextIndex::new(brain).rank("unknown", "any text").is_empty());
    assert!(ContextIndex::new(brain).best_sense("glimmer", "x").is_none());
}

#[test]
fn scores_stay_within_unit_range() {
    let (store, _) = fantasy_store();
    let brain = store.active_brain().unwrap();

    let ranked = ContextIndex::new(brain).rank("bank", "geography river edge geography");
    for item in ranked {
        assert!((0.0..=1.0).contains(&item.score));
    }
}
