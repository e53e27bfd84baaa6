use std::collections::HashMap;

use chrono::{
    DateTime,
    Duration,
    TimeZone,
    Utc,
};
use goldlist::{
    classify_pages,
    persistence::{
        store::STORE_FILE,
        JsonStore,
        Settings,
        VocabularyStore,
    },
    review::ReviewService,
    PageState,
    Stage,
    Status,
    Transition,
};

fn day(n: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 6, 9, 30, 0).unwrap() + Duration::days(n)
}

#[test]
fn test_fifth_day_roadmap() {
    let counts = HashMap::from([(3, 0), (5, 12)]);
    let pages = classify_pages(day(0), day(5), &counts, 20);

    assert_eq!(pages[2].state, PageState::Missed);
    assert_eq!(pages[4].state, PageState::Partial);
    assert_eq!(pages[5].state, PageState::Active);
    assert_eq!(pages[6].state, PageState::Locked);
}

#[test]
fn test_word_distilled_through_every_stage_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(STORE_FILE);

    let (notebook_id, stubborn, easy) = {
        let store = JsonStore::open(path.clone()).unwrap();
        let service = ReviewService::new(store, Settings::default());
        let notebook = service.create_notebook("Portuguese", None, day(0)).unwrap();
        let stubborn = service.add_word(notebook.id, None, "saudade", "longing", day(0)).unwrap();
        let easy = service.add_word(notebook.id, None, "obrigado", "thanks", day(0)).unwrap();
        (notebook.id, stubborn.id, easy.id)
    };

    let service = ReviewService::new(JsonStore::open(path.clone()).unwrap(), Settings::default());

    // Nothing is due until the two week rest is over.
    assert!(service.queue(day(13)).unwrap().is_empty());
    assert_eq!(service.queue(day(14)).unwrap().len(), 2);

    let learned = service.review(easy, true, day(14)).unwrap();
    assert_eq!(learned.transition, Transition::Learned);

    let mut now = day(14);
    let mut transitions = Vec::new();
    loop {
        let queue = service.queue(now).unwrap();
        let Some(entry) = queue.iter().find(|e| e.id == stubborn) else {
            break;
        };
        assert_ne!(entry.status, Status::Learned);

        let outcome = service.review(entry.id, false, now).unwrap();
        transitions.push(outcome.transition);
        now += Duration::days(14);
    }

    assert_eq!(transitions.len(), 12);
    assert_eq!(transitions[3], Transition::Promoted(Stage::Silver));
    assert_eq!(transitions[7], Transition::Promoted(Stage::Gold));
    assert_eq!(transitions[11], Transition::Leech);

    let stats = service.stats(now).unwrap();
    assert_eq!((stats.learned, stats.leech), (1, 1));
    assert!(stats.by_stage.is_empty());

    drop(service);
    let reopened = JsonStore::open(path).unwrap();
    let leech = reopened.entry(stubborn).unwrap();
    assert_eq!(leech.status, Status::Leech);
    assert_eq!((leech.stage, leech.round), (Stage::Gold, 1));
    assert_eq!(leech.next_review_date, None);
    assert_eq!(reopened.page_counts(notebook_id).unwrap().get(&1), Some(&2));
    assert!(reopened.profile().unwrap().current_streak >= 1);
}
