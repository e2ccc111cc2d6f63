use std::cell::Cell;
use storykeeper_core::db::open_db_in_memory;
use storykeeper_core::serializer::project_file::export;
use storykeeper_core::{
    CancellationToken, CheckError, NewProjectConfig, NewSense, Project, ProjectRepository,
    SessionError, SpellChecker, SqliteProjectRepository, StorySession,
};

/// Flags any token not in its word list, suggesting the list's first entry.
struct ListChecker {
    known: Vec<&'static str>,
}

impl SpellChecker for ListChecker {
    fn check(&self, token: &str) -> Vec<String> {
        if self.known.iter().any(|word| word.eq_ignore_ascii_case(token)) {
            Vec::new()
        } else {
            vec![self.known[0].to_string()]
        }
    }
}

/// Cancels the shared token after `limit` checks.
struct CancellingChecker {
    token: CancellationToken,
    limit: usize,
    seen: Cell<usize>,
}

impl SpellChecker for CancellingChecker {
    fn check(&self, _token: &str) -> Vec<String> {
        self.seen.set(self.seen.get() + 1);
        if self.seen.get() >= self.limit {
            self.token.cancel();
        }
        vec!["x".to_string()]
    }
}

fn seeded_session(
    repo: SqliteProjectRepository<'_>,
) -> StorySession<SqliteProjectRepository<'_>> {
    let mut session = StorySession::open(repo, &NewProjectConfig::default()).unwrap();
    let store = session.store_mut();
    let brain_id = store.add_brain("Fantasy1").unwrap();
    let word_id = store.add_word(brain_id, "Kaneran").unwrap();
    store
        .add_sense(word_id, NewSense::new("Species", "river-dwelling folk"))
        .unwrap();
    let bank = store.add_word(brain_id, "bank").unwrap();
    store
        .add_sense(bank, NewSense::new("Geography", "river edge"))
        .unwrap();
    store
        .add_sense(bank, NewSense::new("Finance", "money institution"))
        .unwrap();
    session
}

#[test]
fn new_session_uses_project_defaults() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteProjectRepository::try_new(&mut conn).unwrap();
    let config = NewProjectConfig {
        title: "Saga".to_string(),
        auto_learn_contexts: true,
        default_contexts: vec!["Moon".to_string()],
    };

    let session = StorySession::open(repo, &config).unwrap();

    assert!(session.has_unsaved_changes());
    assert_eq!(session.project().title, "Saga");
    assert_eq!(session.store().contexts(), ["Moon"]);
    assert!(session.store().settings().auto_learn_contexts);
}

#[test]
fn saved_project_is_reopened() {
    let mut conn = open_db_in_memory().unwrap();
    let saved = {
        let repo = SqliteProjectRepository::try_new(&mut conn).unwrap();
        let mut session = seeded_session(repo);
        session.save().unwrap();
        assert!(!session.has_unsaved_changes());
        session.project().clone()
    };

    let repo = SqliteProjectRepository::try_new(&mut conn).unwrap();
    let session = StorySession::open(repo, &NewProjectConfig::default()).unwrap();
    assert!(!session.has_unsaved_changes());
    assert_eq!(session.project(), &saved);
}

#[test]
fn rank_in_active_uses_active_brain() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteProjectRepository::try_new(&mut conn).unwrap();
    let session = seeded_session(repo);

    let ranked = session.rank_in_active("bank", "he sat by the river").unwrap();
    let brain = session.store().active_brain().unwrap();
    let geography = brain.find_word("bank").unwrap().senses[0].id;
    assert_eq!(ranked[0].sense_id, geography);
}

#[test]
fn brain_actions_need_an_active_brain() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteProjectRepository::try_new(&mut conn).unwrap();
    let session = StorySession::open(repo, &NewProjectConfig::default()).unwrap();
    let checker = ListChecker { known: vec!["the"] };

    assert!(matches!(
        session.rank_in_active("bank", "river"),
        Err(SessionError::NoActiveBrain)
    ));
    assert!(matches!(
        session.check_text_in_active(&checker, "text", &CancellationToken::new()),
        Err(SessionError::NoActiveBrain)
    ));
}

#[test]
fn check_pass_skips_dictionary_words() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteProjectRepository::try_new(&mut conn).unwrap();
    let session = seeded_session(repo);
    let checker = ListChecker {
        known: vec!["the", "sailed", "to"],
    };

    let text = "The Kaneran sailed to Bnk";
    let findings = session
        .check_text_in_active(&checker, text, &CancellationToken::new())
        .unwrap();

    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].token, "Bnk");
    assert_eq!(&text[findings[0].start..findings[0].end], "Bnk");
    assert_eq!(findings[0].suggestions, vec!["the".to_string()]);
}

#[test]
fn cancelled_check_pass_returns_no_findings() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteProjectRepository::try_new(&mut conn).unwrap();
    let session = seeded_session(repo);
    let token = CancellationToken::new();
    let checker = CancellingChecker {
        token: token.clone(),
        limit: 2,
        seen: Cell::new(0),
    };

    let err = session
        .check_text_in_active(&checker, "one two three four five", &token)
        .unwrap_err();
    assert!(matches!(err, SessionError::Check(CheckError::Cancelled)));
    assert_eq!(checker.seen.get(), 2);

    let precancelled = CancellationToken::new();
    precancelled.cancel();
    let list = ListChecker { known: vec!["one"] };
    assert!(session
        .check_text_in_active(&list, "one", &precancelled)
        .is_err());
}

#[test]
fn import_replaces_whole_project() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteProjectRepository::try_new(&mut conn).unwrap();
    let mut session = seeded_session(repo);
    session.save().unwrap();

    let mut incoming = Project::new("Second Draft");
    incoming.contexts = Default::default();
    let bytes = export(&incoming).unwrap();
    session.import_bytes(&bytes).unwrap();

    assert!(session.has_unsaved_changes());
    assert_eq!(session.project(), &incoming);
    assert!(session.store().active_brain().is_none());
}

#[test]
fn failed_import_keeps_current_project() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteProjectRepository::try_new(&mut conn).unwrap();
    let mut session = seeded_session(repo);
    let before = session.project().clone();

    let err = session.import_bytes(b"{\"format_version\": 9}").unwrap_err();
    assert!(matches!(err, SessionError::Serialize(_)));
    assert_eq!(session.project(), &before);

    let exported = session.export_bytes().unwrap();
    assert!(!exported.is_empty());
}

#[test]
fn repository_sees_session_save() {
    let mut conn = open_db_in_memory().unwrap();
    {
        let repo = SqliteProjectRepository::try_new(&mut conn).unwrap();
        seeded_session(repo).save().unwrap();
    }
    let repo = SqliteProjectRepository::try_new(&mut conn).unwrap();
    let loaded = repo.load_project().unwrap().unwrap();
    assert_eq!(loaded.brains[0].words.len(), 2);
}
