//! End-to-end gameplay through `Game` against on-disk data files.

use std::path::Path;
use std::sync::{Arc, Mutex};

use campusquiz_core::clock::TimeRemaining;
use campusquiz_core::config::GameConfig;
use campusquiz_core::engine::{Game, GameObserver, NoopObserver};
use campusquiz_core::model::{Minigame, Permission};
use campusquiz_core::session::{SessionState, SessionTick, SubmitOutcome};
use campusquiz_core::store::{LoginFailure, LoginOutcome, ProfileStore};
use campusquiz_core::Error;

const USERS: &str = r#"[
  {"username": "goose", "password": "honk", "permission": "Teacher",
   "totalScore": 40, "middlesexScore": 40, "naturalSciencesScore": 0, "talbotScore": 0},
  {"username": "JimmyJohn", "password": "sub", "permission": "Student",
   "totalScore": 900, "middlesexScore": 500, "naturalSciencesScore": 200, "talbotScore": 200},
  {"username": "dev", "password": "root", "permission": "Developer",
   "totalScore": 0, "middlesexScore": 0, "naturalSciencesScore": 0, "talbotScore": 0}
]"#;

const QUESTIONS: &str = r#"[
  {"id": 1, "miniGame": "middlesex", "question": "Capital of France?", "type": "short",
   "options": [], "answer": ["Paris"], "difficulty": 1},
  {"id": 2, "miniGame": "middlesex", "question": "5 x 6?", "type": "short",
   "options": [], "answer": ["30", "thirty"], "difficulty": 1},
  {"id": 3, "miniGame": "middlesex", "question": "Square root of 144?", "type": "short",
   "options": [], "answer": ["12"], "difficulty": 2},
  {"id": 4, "miniGame": "middlesex", "question": "Chemical symbol for gold?", "type": "short",
   "options": [], "answer": ["Au"], "difficulty": 2},
  {"id": 5, "miniGame": "middlesex", "question": "Year the Berlin Wall fell?", "type": "short",
   "options": [], "answer": ["1989"], "difficulty": 3},
  {"id": 6, "miniGame": "talbot", "question": "Largest planet?", "type": "short",
   "options": [], "answer": ["Jupiter"], "difficulty": 1}
]"#;

fn setup(dir: &Path) -> GameConfig {
    let data = dir.join("json_files");
    std::fs::create_dir_all(&data).unwrap();
    std::fs::write(data.join("users.json"), USERS).unwrap();
    std::fs::write(data.join("question.json"), QUESTIONS).unwrap();
    GameConfig {
        profiles_path: data.join("users.json"),
        questions_path: data.join("question.json"),
        round_seconds: 2,
        ..GameConfig::default()
    }
}

fn answer_current(game: &mut Game) -> SubmitOutcome {
    let answer = game
        .session()
        .and_then(|s| s.current_question())
        .map(|q| q.answers[0].clone())
        .unwrap();
    game.submit(&answer).unwrap()
}

fn play_out(game: &mut Game) -> u32 {
    let mut ticks = 0;
    loop {
        ticks += 1;
        match game.tick().unwrap() {
            SessionTick::Running(_) => {}
            SessionTick::Finished(fin) => {
                assert!(fin.saved);
                return ticks;
            }
            SessionTick::Inactive => panic!("round ended without finishing"),
        }
    }
}

#[derive(Default)]
struct Seconds(Mutex<Vec<u32>>);

impl GameObserver for Seconds {
    fn on_question(&self, _: &str) {}
    fn on_feedback(&self, _: bool, _: Option<&str>) {}
    fn on_time_remaining(&self, remaining: TimeRemaining) {
        let mut seen = self.0.lock().unwrap();
        if seen.last() != Some(&remaining.seconds) {
            seen.push(remaining.seconds);
        }
    }
    fn on_finished(&self, _: u32) {}
    fn on_new_user(&self, _: &str) {}
    fn on_login_result(&self, _: bool, _: Option<&str>) {}
}

#[test]
fn new_player_scores_and_lands_on_leaderboard() {
    let dir = tempfile::tempdir().unwrap();
    let config = setup(dir.path());
    let mut game = Game::open(config.clone(), Arc::new(NoopObserver))
        .unwrap()
        .with_seed(11);

    assert_eq!(
        game.login("a", "p", Permission::Student).unwrap(),
        LoginOutcome::Created
    );
    game.start(Minigame::Middlesex).unwrap();
    for _ in 0..3 {
        assert!(matches!(
            answer_current(&mut game),
            SubmitOutcome::Correct { points: 10, .. }
        ));
    }
    assert_eq!(play_out(&mut game), 200);
    assert_eq!(game.session().unwrap().state(), SessionState::Finished);

    let store = ProfileStore::load(&config.profiles_path).unwrap();
    let profile = store.get("a").unwrap();
    assert_eq!(profile.middlesex_score, 30);
    assert_eq!(profile.total_score, 30);

    let board = &game.leaderboards().minigame;
    assert_eq!(board.entries[0].username, "JimmyJohn");
    assert_eq!(board.position_of("a").unwrap().score, 30);
    assert_eq!(board.position_of("a").unwrap().rank, 3);
}

#[test]
fn medium_player_gets_fifteen_per_answer() {
    let dir = tempfile::tempdir().unwrap();
    let mut game = Game::open(setup(dir.path()), Arc::new(NoopObserver)).unwrap();
    game.login("JimmyJohn", "sub", Permission::Student).unwrap();
    game.start(Minigame::Middlesex).unwrap();

    answer_current(&mut game);
    answer_current(&mut game);
    let session = game.session().unwrap();
    assert_eq!(session.running_score(), 530);
    assert_eq!(session.current_question().unwrap().difficulty, 2);

    let fin = game.leave().unwrap().unwrap();
    assert_eq!(fin.final_score, 530);
    assert_eq!(fin.total_score, 930);
    assert_eq!(game.leaderboards().global.entries[0].score, 930);
}

#[test]
fn wrong_credentials_are_rejected_without_changes() {
    let dir = tempfile::tempdir().unwrap();
    let config = setup(dir.path());
    let before = std::fs::read_to_string(&config.profiles_path).unwrap();
    let mut game = Game::open(config.clone(), Arc::new(NoopObserver)).unwrap();

    assert_eq!(
        game.login("goose", "quack", Permission::Teacher).unwrap(),
        LoginOutcome::Rejected(LoginFailure::WrongPassword)
    );
    assert_eq!(
        game.login("goose", "honk", Permission::Student).unwrap(),
        LoginOutcome::Rejected(LoginFailure::WrongRole)
    );
    assert!(game.player().is_none());
    assert_eq!(std::fs::read_to_string(&config.profiles_path).unwrap(), before);
}

#[test]
fn clock_reports_each_second() {
    let dir = tempfile::tempdir().unwrap();
    let observer = Arc::new(Seconds::default());
    let mut game = Game::open(setup(dir.path()), observer.clone()).unwrap();
    game.login("goose", "honk", Permission::Teacher).unwrap();
    game.start(Minigame::Middlesex).unwrap();
    play_out(&mut game);

    assert_eq!(*observer.0.lock().unwrap(), vec![2, 1, 0]);
    assert_eq!(game.tick().unwrap(), SessionTick::Inactive);
}

#[test]
fn developer_override_and_staff_views() {
    let dir = tempfile::tempdir().unwrap();
    let config = setup(dir.path());
    let mut game = Game::open(config.clone(), Arc::new(NoopObserver)).unwrap();

    game.login("goose", "honk", Permission::Teacher).unwrap();
    assert!(matches!(
        game.force_tier(3),
        Err(Error::PermissionDenied { .. })
    ));
    let progress = game.class_progress(Some("j")).unwrap();
    assert_eq!(progress.rows.len(), 1);
    assert_eq!(progress.rows[0].username, "JimmyJohn");

    game.login("dev", "root", Permission::Developer).unwrap();
    game.force_tier(3).unwrap();
    game.start(Minigame::Middlesex).unwrap();
    assert_eq!(
        game.session().unwrap().current_question().unwrap().text,
        "Year the Berlin Wall fell?"
    );
    assert!(matches!(
        answer_current(&mut game),
        SubmitOutcome::Correct { points: 30, .. }
    ));
    game.logout().unwrap();

    let store = ProfileStore::load(&config.profiles_path).unwrap();
    assert_eq!(store.get("dev").unwrap().middlesex_score, 1030);
    assert_eq!(game.rank("total", 1).unwrap()[0].username, "dev");
}

#[test]
fn reset_stats_clears_board_position() {
    let dir = tempfile::tempdir().unwrap();
    let mut game = Game::open(setup(dir.path()), Arc::new(NoopObserver)).unwrap();
    game.login("JimmyJohn", "sub", Permission::Student).unwrap();
    assert_eq!(game.leaderboards().global.entries[0].username, "JimmyJohn");

    game.reset_stats().unwrap();
    let profile = game.store().get("JimmyJohn").unwrap();
    assert_eq!(profile.total_score, 0);
    assert_eq!(profile.talbot_score, 0);
    assert_eq!(game.leaderboards().global.entries[0].username, "goose");
}
