//! Auto-play driven through the orchestrator on paused time.

mod support;

use std::sync::Arc;
use std::time::Duration;

use strictly_hangman::{AutoPlayState, Command, Letter, Orchestrator, Phase, StepOutcome};
use support::{Call, FakeHangman};
use tokio::time::Instant;

const DELAY: Duration = Duration::from_millis(1000);

async fn started(fake: FakeHangman) -> (Arc<FakeHangman>, Orchestrator<FakeHangman>) {
    let api = Arc::new(fake);
    let mut orchestrator = Orchestrator::new(Arc::clone(&api), DELAY);
    orchestrator.start();
    assert_eq!(orchestrator.step().await, StepOutcome::Applied);
    (api, orchestrator)
}

fn ai_moves(api: &FakeHangman) -> usize {
    api.count(|c| matches!(c, Call::AiMove))
}

#[tokio::test(start_paused = true)]
async fn test_auto_play_fires_after_delay_and_rearms() {
    let (api, mut orchestrator) = started(FakeHangman::with_words(&["apple"])).await;

    orchestrator.dispatch(Command::ToggleAutoPlay);
    assert_eq!(orchestrator.auto_play().state(), AutoPlayState::Armed);
    assert_eq!(orchestrator.auto_play().pending(), 1);

    let armed_at = Instant::now();
    assert_eq!(orchestrator.step().await, StepOutcome::Applied);
    assert!(armed_at.elapsed() >= DELAY);
    assert!(orchestrator.ai_move_pending());
    assert_eq!(orchestrator.auto_play().state(), AutoPlayState::Running);

    assert_eq!(orchestrator.step().await, StepOutcome::Applied);
    assert_eq!(ai_moves(&api), 1);
    let e = Letter::new('e').expect("letter");
    assert!(orchestrator.session().expect("session").has_guessed(e));
    assert_eq!(orchestrator.auto_play().state(), AutoPlayState::Armed);
    assert_eq!(orchestrator.auto_play().pending(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_auto_play_stops_when_round_ends() {
    let fake = FakeHangman::with_words(&["ab"]);
    fake.set_ai_order("abcdefg");
    let (api, mut orchestrator) = started(fake).await;

    orchestrator.dispatch(Command::ToggleAutoPlay);
    while orchestrator.phase() == &Phase::Active {
        orchestrator.step().await;
    }

    assert_eq!(orchestrator.phase(), &Phase::Terminal);
    assert!(orchestrator.session().expect("session").is_won());
    assert_eq!(
        orchestrator.auto_play().state(),
        AutoPlayState::DisarmedOnTerminal
    );
    assert_eq!(orchestrator.auto_play().pending(), 0);

    tokio::time::sleep(DELAY * 10).await;
    assert_eq!(orchestrator.drain(), 0);
    assert_eq!(ai_moves(&api), 2);
}

#[tokio::test(start_paused = true)]
async fn test_failed_ai_move_disables_auto_play() {
    let fake = FakeHangman::with_words(&["apple"]);
    fake.fail_ai_moves(1);
    let (api, mut orchestrator) = started(fake).await;

    orchestrator.dispatch(Command::ToggleAutoPlay);
    orchestrator.step().await; // tick
    orchestrator.step().await; // failed move

    assert_eq!(orchestrator.auto_play().state(), AutoPlayState::Disabled);
    assert_eq!(orchestrator.auto_play().pending(), 0);
    let banner = orchestrator.ui().banner().clone().expect("banner");
    assert_eq!(banner.text(), "Failed to let AI play");

    tokio::time::sleep(DELAY * 5).await;
    assert_eq!(orchestrator.drain(), 0);
    assert_eq!(ai_moves(&api), 1);
}

#[tokio::test(start_paused = true)]
async fn test_toggling_never_stacks_timers() {
    let (api, mut orchestrator) = started(FakeHangman::with_words(&["apple"])).await;

    orchestrator.dispatch(Command::ToggleAutoPlay);
    orchestrator.dispatch(Command::ToggleAutoPlay);
    assert_eq!(orchestrator.auto_play().state(), AutoPlayState::Disabled);
    assert_eq!(orchestrator.auto_play().pending(), 0);
    orchestrator.dispatch(Command::ToggleAutoPlay);
    assert_eq!(orchestrator.auto_play().pending(), 1);

    tokio::time::sleep(DELAY + Duration::from_millis(10)).await;
    // Only the live timer delivers a tick; the cancelled one never fires.
    assert_eq!(orchestrator.drain(), 1);
    assert!(orchestrator.ai_move_pending());
    orchestrator.step().await;
    assert_eq!(ai_moves(&api), 1);
    assert!(orchestrator.auto_play().pending() <= 1);
}

#[tokio::test(start_paused = true)]
async fn test_tick_deferred_behind_pending_guess() {
    let fake = FakeHangman::with_words(&["apple"]);
    fake.delay_guesses(DELAY * 2);
    let (api, mut orchestrator) = started(fake).await;

    orchestrator.dispatch(Command::ToggleAutoPlay);
    orchestrator.dispatch(Command::Guess('z'));

    // The tick arrives while the guess is still outstanding.
    assert_eq!(orchestrator.step().await, StepOutcome::Applied);
    assert_eq!(ai_moves(&api), 0);
    assert_eq!(orchestrator.auto_play().state(), AutoPlayState::Running);

    // The guess completes and re-arms.
    assert_eq!(orchestrator.step().await, StepOutcome::Applied);
    assert_eq!(orchestrator.session().expect("session").lives(), 5);
    assert_eq!(orchestrator.auto_play().state(), AutoPlayState::Armed);

    orchestrator.step().await;
    assert!(orchestrator.ai_move_pending());
}

#[tokio::test(start_paused = true)]
async fn test_new_round_disables_auto_play() {
    let (api, mut orchestrator) = started(FakeHangman::with_words(&["apple", "kiwi"])).await;

    orchestrator.dispatch(Command::ToggleAutoPlay);
    orchestrator.dispatch(Command::NewRandomRound);
    assert_eq!(orchestrator.auto_play().state(), AutoPlayState::Disabled);

    orchestrator.step().await;
    tokio::time::sleep(DELAY * 3).await;
    assert_eq!(orchestrator.drain(), 0);
    assert_eq!(ai_moves(&api), 0);
}

#[tokio::test(start_paused = true)]
async fn test_auto_play_refused_after_round_ends() {
    let (_api, mut orchestrator) = started(FakeHangman::with_words(&["a"])).await;

    orchestrator.dispatch(Command::Guess('a'));
    orchestrator.step().await;
    assert_eq!(orchestrator.phase(), &Phase::Terminal);

    orchestrator.dispatch(Command::ToggleAutoPlay);
    assert_eq!(orchestrator.auto_play().state(), AutoPlayState::Disabled);
}

#[tokio::test(start_paused = true)]
async fn test_rejected_snapshot_behind_deferred_tick_rearms() {
    let fake = FakeHangman::with_words(&["apple"]);
    fake.delay_guesses(DELAY * 3);
    fake.truncate_patterns();
    let (api, mut orchestrator) = started(fake).await;

    orchestrator.dispatch(Command::ToggleAutoPlay);
    orchestrator.dispatch(Command::Guess('z'));

    // Tick deferred behind the guess.
    assert_eq!(orchestrator.step().await, StepOutcome::Applied);
    assert_eq!(orchestrator.auto_play().state(), AutoPlayState::Running);

    // The guess response is rejected; auto-play must keep going.
    assert_eq!(orchestrator.step().await, StepOutcome::Applied);
    assert_eq!(orchestrator.session().expect("session").lives(), 6);
    assert_eq!(orchestrator.auto_play().state(), AutoPlayState::Armed);
    assert_eq!(orchestrator.auto_play().pending(), 1);

    orchestrator.step().await;
    assert!(orchestrator.ai_move_pending());
    assert_eq!(ai_moves(&api), 0);
    orchestrator.step().await;
    assert_eq!(ai_moves(&api), 1);
}
