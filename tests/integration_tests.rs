// Integration tests for Lume Swipe, run against the in-memory store

use lume_swipe::core::CandidateSelector;
use lume_swipe::models::{Gender, LocationScope, NewPreferences, NewProfile, NewPromptAnswer};
use lume_swipe::services::{DatingService, DatingStore, MemoryStore, PromptCatalog};
use std::sync::Arc;
use std::time::Duration;

struct Harness {
    store: Arc<MemoryStore>,
    service: DatingService,
}

fn harness() -> Harness {
    let store = Arc::new(MemoryStore::new());
    let service = DatingService::new(
        store.clone(),
        CandidateSelector::default(),
        PromptCatalog::new(Duration::from_secs(60)),
    );
    Harness { store, service }
}

fn profile(name: &str, age: i32, gender: Gender, city: &str) -> NewProfile {
    NewProfile {
        display_name: name.to_string(),
        age,
        gender,
        orientation: "straight".to_string(),
        bio: Some(format!("Hi, I'm {}", name)),
        hobbies: vec!["hiking".to_string()],
        country: Some("US".to_string()),
        state: Some("NY".to_string()),
        city: Some(city.to_string()),
        profession: None,
        religion: None,
        height_cm: Some(170),
    }
}

async fn register(h: &Harness, wallet: &str, name: &str, age: i32, gender: Gender, city: &str) -> uuid::Uuid {
    let user = h.service.create_user(wallet).await.unwrap();
    h.service
        .create_profile(wallet, profile(name, age, gender, city))
        .await
        .unwrap();
    user.id
}

fn prefs(genders: Vec<Gender>, scope: LocationScope) -> NewPreferences {
    NewPreferences {
        preferred_genders: genders,
        age_min: Some(21),
        age_max: Some(40),
        location_scope: scope,
    }
}

#[tokio::test]
async fn test_integration_like_match_scenario() {
    let h = harness();
    let a = register(&h, "wallet-a", "Alex", 29, Gender::Male, "New York").await;
    let b = register(&h, "wallet-b", "Bea", 27, Gender::Female, "New York").await;

    h.service
        .create_preferences("wallet-a", prefs(vec![Gender::Female], LocationScope::SameCity))
        .await
        .unwrap();
    h.service
        .create_preferences("wallet-b", prefs(vec![Gender::Male], LocationScope::SameCity))
        .await
        .unwrap();

    let suggestion = h.service.next_suggestion("wallet-a").await.unwrap().unwrap();
    assert_eq!(suggestion.id, b);

    let first = h.service.like("wallet-a", "wallet-b").await.unwrap();
    assert!(!first.is_match);

    // Target given by id works the same as by wallet
    let second = h.service.like("wallet-b", &a.to_string()).await.unwrap();
    assert!(second.is_match);
    assert!(second.match_created);

    let for_a = h.service.matches("wallet-a").await.unwrap();
    assert_eq!(for_a.len(), 1);
    assert_eq!(for_a[0].user.card.id, b);
    assert_eq!(for_a[0].user.card.display_name, "Bea");
    assert!(for_a[0].user.profile.is_some());

    let for_b = h.service.matches("wallet-b").await.unwrap();
    assert_eq!(for_b.len(), 1);
    assert_eq!(for_b[0].user.card.id, a);
}

#[tokio::test]
async fn test_integration_mutual_like_single_match_either_order() {
    let h = harness();
    register(&h, "a", "A", 30, Gender::Male, "Austin").await;
    register(&h, "b", "B", 30, Gender::Female, "Austin").await;

    h.service.like("b", "a").await.unwrap();
    h.service.like("a", "b").await.unwrap();
    h.service.like("a", "b").await.unwrap();
    h.service.like("b", "a").await.unwrap();

    assert_eq!(h.service.matches("a").await.unwrap().len(), 1);
    assert_eq!(h.service.matches("b").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_integration_concurrent_mutual_likes_create_one_match() {
    let h = harness();
    register(&h, "a", "A", 30, Gender::Male, "Austin").await;
    register(&h, "b", "B", 30, Gender::Female, "Austin").await;

    let (x, y) = tokio::join!(h.service.like("a", "b"), h.service.like("b", "a"));
    let (x, y) = (x.unwrap(), y.unwrap());

    // Whichever landed second sees the match and creates it
    assert!(x.is_match || y.is_match);
    assert_eq!(
        [x.match_created, y.match_created].iter().filter(|c| **c).count(),
        1
    );
    assert_eq!(h.service.matches("a").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_integration_defaults_without_preferences() {
    let h = harness();
    register(&h, "me", "Me", 30, Gender::Male, "Boston").await;
    let teen_ok = register(&h, "young", "Young", 18, Gender::Other, "Denver").await;
    register(&h, "old", "Old", 101, Gender::Female, "Miami").await;

    // No preferences: any gender, any location, ages 18..=100
    let suggestion = h.service.next_suggestion("me").await.unwrap().unwrap();
    assert_eq!(suggestion.id, teen_ok);

    h.service.report("me", "young").await.unwrap();
    assert!(h.service.next_suggestion("me").await.unwrap().is_none());
}

#[tokio::test]
async fn test_integration_never_self_never_repeat() {
    let h = harness();
    let me = register(&h, "me", "Me", 30, Gender::Male, "Boston").await;
    let others = [
        register(&h, "o1", "O1", 25, Gender::Female, "Boston").await,
        register(&h, "o2", "O2", 26, Gender::Female, "Boston").await,
        register(&h, "o3", "O3", 27, Gender::Female, "Boston").await,
    ];

    let mut seen = Vec::new();
    while let Some(s) = h.service.next_suggestion("me").await.unwrap() {
        assert_ne!(s.id, me);
        assert!(!seen.contains(&s.id), "suggested {} twice", s.id);
        seen.push(s.id);

        if seen.len() % 2 == 0 {
            h.service.like("me", &s.id.to_string()).await.unwrap();
        } else {
            h.service.report("me", &s.wallet_pub_key).await.unwrap();
        }
    }

    seen.sort();
    let mut expected = others.to_vec();
    expected.sort();
    assert_eq!(seen, expected);
}

#[tokio::test]
async fn test_integration_report_after_like_flips_action() {
    let h = harness();
    register(&h, "a", "A", 30, Gender::Male, "Austin").await;
    let b = register(&h, "b", "B", 30, Gender::Female, "Austin").await;

    let liked = h.service.like("a", "b").await.unwrap();
    assert_eq!(h.service.received_likes("b").await.unwrap().len(), 1);

    let reported = h.service.report("a", "b").await.unwrap();
    assert_eq!(reported.id, liked.swipe.id);
    assert!(h.service.received_likes("b").await.unwrap().is_empty());

    let swiped = h.store.swiped_user_ids(liked.swipe.from_user_id).await.unwrap();
    assert_eq!(swiped, vec![b]);
    assert!(h.service.next_suggestion("a").await.unwrap().is_none());
}

#[tokio::test]
async fn test_integration_duplicate_likes_single_swipe() {
    let h = harness();
    register(&h, "a", "A", 30, Gender::Male, "Austin").await;
    register(&h, "b", "B", 30, Gender::Female, "Austin").await;

    let first = h.service.like("a", "b").await.unwrap();
    let second = h.service.like("a", "b").await.unwrap();

    assert_eq!(first.swipe.id, second.swipe.id);
    let likes = h.service.received_likes("b").await.unwrap();
    assert_eq!(likes.len(), 1);
    assert_eq!(likes[0].user.display_name, "A");
}

#[tokio::test]
async fn test_integration_premium_then_recency_ranking() {
    let h = harness();
    register(&h, "me", "Me", 30, Gender::Male, "Boston").await;
    let plain = register(&h, "plain", "Plain", 25, Gender::Female, "Boston").await;
    let premium = register(&h, "premium", "Premium", 25, Gender::Female, "Boston").await;

    h.store
        .update_user(premium, |u| {
            u.is_premium = true;
            u.last_active_at -= chrono::Duration::days(30);
        })
        .await;

    let first = h.service.next_suggestion("me").await.unwrap().unwrap();
    assert_eq!(first.id, premium);

    h.service.report("me", "premium").await.unwrap();
    let second = h.service.next_suggestion("me").await.unwrap().unwrap();
    assert_eq!(second.id, plain);
}

#[tokio::test]
async fn test_integration_location_scope() {
    let h = harness();
    register(&h, "me", "Me", 30, Gender::Male, "Buffalo").await;
    let same_state = register(&h, "ny", "NY", 28, Gender::Female, "Albany").await;

    h.service
        .create_preferences("me", prefs(vec![], LocationScope::SameCity))
        .await
        .unwrap();
    assert!(h.service.next_suggestion("me").await.unwrap().is_none());

    h.service
        .update_preferences("me", prefs(vec![], LocationScope::SameState))
        .await
        .unwrap();
    let suggestion = h.service.next_suggestion("me").await.unwrap().unwrap();
    assert_eq!(suggestion.id, same_state);
}

#[tokio::test]
async fn test_integration_suggestion_touches_last_active() {
    let h = harness();
    let me = register(&h, "me", "Me", 30, Gender::Male, "Boston").await;

    h.store
        .update_user(me, |u| u.last_active_at -= chrono::Duration::days(1))
        .await;
    let before = h.store.user_by_wallet("me").await.unwrap().unwrap().last_active_at;

    // Nobody to suggest, still counts as activity
    assert!(h.service.next_suggestion("me").await.unwrap().is_none());

    let after = h.store.user_by_wallet("me").await.unwrap().unwrap().last_active_at;
    assert!(after > before);
}

#[tokio::test]
async fn test_integration_suggestion_carries_photos_and_prompts() {
    let h = harness();
    register(&h, "me", "Me", 30, Gender::Male, "Boston").await;
    register(&h, "them", "Them", 29, Gender::Female, "Boston").await;

    h.service.add_photo("them", "https://cdn.example/2.jpg", Some(2)).await.unwrap();
    h.service.add_photo("them", "https://cdn.example/1.jpg", Some(1)).await.unwrap();

    let prompts = h.service.list_prompts("them").await.unwrap();
    let answers: Vec<NewPromptAnswer> = prompts
        .iter()
        .take(4)
        .map(|p| NewPromptAnswer {
            prompt_id: p.id,
            answer: format!("answer to {}", p.question),
        })
        .collect();
    assert_eq!(h.service.answer_prompts("them", answers.clone()).await.unwrap(), 4);
    // Already answered prompts are skipped
    assert_eq!(h.service.answer_prompts("them", answers).await.unwrap(), 0);

    let suggestion = h.service.next_suggestion("me").await.unwrap().unwrap();
    assert_eq!(suggestion.photos.len(), 2);
    assert_eq!(suggestion.photos[0].url, "https://cdn.example/1.jpg");
    assert_eq!(suggestion.prompt_answers.len(), 3);
    assert_eq!(suggestion.prompt_answers[0].question, prompts[0].question);

    h.service.like("them", "me").await.unwrap();
    let likes = h.service.received_likes("me").await.unwrap();
    assert_eq!(likes[0].user.profile_image.as_deref(), Some("https://cdn.example/1.jpg"));
}
