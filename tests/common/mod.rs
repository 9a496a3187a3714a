#![allow(dead_code)]

use std::sync::Arc;

use trivia_ladder::balance::InMemoryBalanceLedger;
use trivia_ladder::catalog::InMemoryCatalog;
use trivia_ladder::config::GameConfig;
use trivia_ladder::models::question::{AnswerKey, Question, QUESTION_LEVEL_MAX};
use trivia_ladder::services::GameService;
use trivia_ladder::store::{GameStore, InMemoryGameStore};

pub struct TestEnv {
    pub service: Arc<GameService>,
    pub store: Arc<InMemoryGameStore>,
    pub ledger: Arc<InMemoryBalanceLedger>,
}

pub async fn create_test_env() -> TestEnv {
    // Initialize tracing for tests
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();

    let store = Arc::new(InMemoryGameStore::new());
    let catalog = Arc::new(InMemoryCatalog::new());
    let ledger = Arc::new(InMemoryBalanceLedger::new());

    seed_questions(&catalog, 4).await;

    let config = GameConfig::default();
    let service = Arc::new(
        GameService::new(store.clone(), catalog, ledger.clone(), &config)
            .expect("default config is valid"),
    );

    TestEnv {
        service,
        store,
        ledger,
    }
}

pub async fn seed_questions(catalog: &InMemoryCatalog, per_level: usize) {
    for level in 0..=QUESTION_LEVEL_MAX {
        for n in 0..per_level {
            catalog
                .add(Question {
                    id: format!("q-{}-{}", level, n),
                    level,
                    text: format!("Question {} at level {}", n, level),
                    answers: [
                        "answer one".to_string(),
                        "answer two".to_string(),
                        "answer three".to_string(),
                        "answer four".to_string(),
                    ],
                    correct_index: 1,
                })
                .await
                .expect("seed question");
        }
    }
}

/// Answers the current question correctly `times` in a row.
pub async fn answer_correctly(env: &TestEnv, game_id: &str, times: usize) {
    for _ in 0..times {
        let question = env
            .service
            .current_question(game_id)
            .await
            .expect("query current question")
            .expect("game still in progress");
        let accepted = env
            .service
            .answer(game_id, question.correct_answer_key())
            .await
            .expect("submit answer");
        assert!(accepted);
    }
}

/// A key that is wrong for the game's current question.
pub async fn wrong_key(env: &TestEnv, game_id: &str) -> AnswerKey {
    let question = env
        .service
        .current_question(game_id)
        .await
        .expect("query current question")
        .expect("game still in progress");
    let correct = question.correct_answer_key();
    AnswerKey::ALL
        .iter()
        .copied()
        .find(|&k| k != correct)
        .expect("three keys are wrong")
}

/// Moves `created_at` into the past, as if the game had been running for
/// `seconds` longer than it has.
pub async fn backdate(env: &TestEnv, game_id: &str, seconds: i64) {
    let mut game = env
        .store
        .get(game_id)
        .await
        .expect("load game")
        .expect("game exists");
    game.created_at = game.created_at - chrono::Duration::seconds(seconds);
    env.store.update(&mut game).await.expect("store backdated game");
}
