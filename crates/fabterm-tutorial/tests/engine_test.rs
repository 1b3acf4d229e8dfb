//! Tutorial engine state machine tests

mod common;

use common::*;
use fabterm_test_utils::TestFixtures;
use fabterm_tutorial::{
    catalog, AssetStore, MemoryProgressStore, StepMarker, Submission, Transition,
    TutorialError, UnavailableStore,
};
use pretty_assertions::assert_eq;

#[tokio::test(start_paused = true)]
async fn fresh_mount_starts_at_first_step() {
    let store = MemoryProgressStore::new();
    let (engine, _events) = mount(&store);

    assert_eq!(engine.index(), 0);
    assert_eq!(engine.pending_resume(), None);
    assert_eq!(engine.current_step().id, 1);
    assert_eq!(store.get(), Some(0));
    assert!(engine.resume_enabled());
}

#[tokio::test(start_paused = true)]
async fn static_output_shows_at_once_and_completes_later() {
    let store = MemoryProgressStore::new();
    let (mut engine, mut events) = mount(&store);

    assert_eq!(engine.output().len(), 1);
    assert!(engine.output()[0].contains("Welcome to the DeepFabric Interactive Tutorial"));
    assert!(!engine.output_finished());

    play_to_end(&mut engine, &mut events).await;
    assert!(engine.output_finished());
    // Finished output never unlocks a step on its own
    assert!(!engine.step_completed());
}

#[tokio::test(start_paused = true)]
async fn expected_command_unlocks_step_two() {
    let store = MemoryProgressStore::new();
    let (mut engine, _events) = mount(&store);

    assert_eq!(engine.submit_text("continue"), Submission::Accepted);
    assert_eq!(engine.next_step(), Transition::Advanced(1));
    assert_eq!(engine.current_step().id, 2);
    assert!(!engine.step_completed());

    engine.set_input("pip install deepfabric");
    assert_eq!(engine.submit(), Submission::Accepted);
    assert!(engine.step_completed());
    assert_eq!(engine.input(), "");
    assert_eq!(engine.history(), &["continue", "pip install deepfabric"]);
    assert_eq!(store.get(), Some(1));
}

#[tokio::test(start_paused = true)]
async fn normalized_and_synonym_submissions_unlock() {
    let store = MemoryProgressStore::with_index(2);
    let (mut engine, _events) = mount(&store);
    engine.resolve_resume(true);

    assert_eq!(
        engine.submit_text("  DeepFabric   GENERATE\tquickstart.yaml "),
        Submission::Accepted
    );
    assert_eq!(engine.history(), &["DeepFabric   GENERATE\tquickstart.yaml"]);

    engine.next_step();
    assert_eq!(engine.submit_text("Next"), Submission::Accepted);
}

#[tokio::test(start_paused = true)]
async fn mismatch_gives_hint_and_changes_nothing() {
    let store = MemoryProgressStore::with_index(1);
    let (mut engine, _events) = mount(&store);
    engine.resolve_resume(true);

    engine.set_input("pip install");
    let result = engine.submit();
    assert_eq!(
        result,
        Submission::Rejected {
            hint: "Hint: Try typing \"pip install deepfabric\"".to_string()
        }
    );
    assert!(!engine.step_completed());
    assert!(engine.history().is_empty());
    assert_eq!(engine.input(), "pip install");
    assert_eq!(engine.index(), 1);
    assert_eq!(engine.next_step(), Transition::Blocked);
}

#[tokio::test(start_paused = true)]
async fn blank_submission_is_ignored() {
    let store = MemoryProgressStore::new();
    let (mut engine, _events) = mount(&store);
    assert_eq!(engine.submit_text("   "), Submission::Ignored);
    assert!(engine.history().is_empty());
}

#[tokio::test(start_paused = true)]
async fn typing_after_completion_reports_already_complete() {
    let store = MemoryProgressStore::new();
    let (mut engine, _events) = mount(&store);
    engine.submit_text("continue");
    assert_eq!(engine.submit_text("continue"), Submission::AlreadyComplete);
    assert_eq!(engine.history().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn animated_output_matches_declared_lines() {
    let store = MemoryProgressStore::with_index(1);
    let (mut engine, mut events) = mount(&store);
    let start = tokio::time::Instant::now();
    engine.resolve_resume(true);
    assert!(engine.is_animating());
    assert!(engine.output().is_empty());

    play_to_end(&mut engine, &mut events).await;

    let declared = animated_contents(engine.current_step());
    assert_eq!(engine.output(), declared.as_slice());
    assert!(engine.output_finished());
    assert!(!engine.is_animating());

    let total = match engine.current_step().mock_output {
        fabterm_tutorial::MockOutput::Animated(produce) => produce().total_delay(),
        fabterm_tutorial::MockOutput::Static(_) => unreachable!(),
    };
    assert!(start.elapsed() >= total);
}

#[tokio::test(start_paused = true)]
async fn lines_arrive_in_order_with_their_delays() {
    let store = MemoryProgressStore::with_index(1);
    let (mut engine, mut events) = mount(&store);
    let start = tokio::time::Instant::now();
    engine.resolve_resume(true);

    play_lines(&mut engine, &mut events, 2).await;
    assert_eq!(
        engine.output(),
        &[
            "Collecting deepfabric",
            "  Downloading deepfabric-0.1.0-py3-none-any.whl (45 kB)"
        ]
    );
    // 500 ms + 800 ms
    assert!(start.elapsed() >= std::time::Duration::from_millis(1300));
    assert!(!engine.output_finished());
}

#[tokio::test(start_paused = true)]
async fn changing_step_discards_previous_animation() {
    let store = MemoryProgressStore::with_index(1);
    let (mut engine, mut events) = mount(&store);
    engine.resolve_resume(true);

    play_lines(&mut engine, &mut events, 1).await;
    assert_eq!(engine.auto_submit(), Submission::Accepted);
    assert_eq!(engine.next_step(), Transition::Advanced(2));
    assert!(engine.output().is_empty());

    play_to_end(&mut engine, &mut events).await;
    let declared = animated_contents(engine.current_step());
    assert_eq!(engine.output(), declared.as_slice());
    assert!(!engine.output().iter().any(|l| l.contains("Collecting")));
}

#[tokio::test(start_paused = true)]
async fn resume_accepted_starts_at_stored_step() {
    let store = MemoryProgressStore::with_index(4);
    let (mut engine, _events) = mount(&store);

    assert_eq!(engine.pending_resume(), Some(4));
    // No input is taken while the offer is open
    assert_eq!(engine.submit_text("continue"), Submission::Ignored);

    assert_eq!(engine.resolve_resume(true), Transition::Advanced(4));
    assert_eq!(engine.current_step().id, 5);
    assert_eq!(engine.pending_resume(), None);
    assert_eq!(store.get(), Some(4));
}

#[tokio::test(start_paused = true)]
async fn resume_declined_starts_over() {
    let store = MemoryProgressStore::with_index(4);
    let (mut engine, _events) = mount(&store);

    assert_eq!(engine.resolve_resume(false), Transition::Advanced(0));
    assert_eq!(engine.index(), 0);
    assert_eq!(store.get(), Some(0));
    assert_eq!(engine.resolve_resume(true), Transition::Blocked);
}

#[tokio::test(start_paused = true)]
async fn out_of_range_progress_is_not_offered() {
    for stored in [0, catalog().len(), catalog().len() + 5] {
        let store = MemoryProgressStore::with_index(stored);
        let (engine, _events) = mount(&store);
        assert_eq!(engine.pending_resume(), None, "stored {stored}");
        assert_eq!(engine.index(), 0);
    }
}

#[tokio::test(start_paused = true)]
async fn exit_keyword_on_terminal_step_clears_progress() {
    let last = catalog().len() - 1;
    let store = MemoryProgressStore::with_index(last);
    let (mut engine, _events) = mount(&store);
    engine.resolve_resume(true);
    assert!(engine.is_last_step());

    assert_eq!(engine.submit_text("EXIT"), Submission::Exit);
    assert!(engine.is_exited());
    assert_eq!(store.get(), None);

    let (fresh, _events) = mount(&store);
    assert_eq!(fresh.pending_resume(), None);
    assert_eq!(fresh.index(), 0);
}

#[tokio::test(start_paused = true)]
async fn exit_keyword_only_counts_on_terminal_step() {
    let store = MemoryProgressStore::with_index(1);
    let (mut engine, _events) = mount(&store);
    engine.resolve_resume(true);

    assert!(matches!(
        engine.submit_text("exit"),
        Submission::Rejected { .. }
    ));
    assert!(!engine.is_exited());
}

#[tokio::test(start_paused = true)]
async fn terminal_step_rejects_other_input() {
    let last = catalog().len() - 1;
    let store = MemoryProgressStore::with_index(last);
    let (mut engine, _events) = mount(&store);
    engine.resolve_resume(true);

    assert_eq!(
        engine.submit_text("ls"),
        Submission::Rejected {
            hint: "Type 'exit' to return to the main terminal.".to_string()
        }
    );
}

#[tokio::test(start_paused = true)]
async fn finishing_terminal_step_exits() {
    let last = catalog().len() - 1;
    let store = MemoryProgressStore::with_index(last);
    let (mut engine, mut events) = mount(&store);
    engine.resolve_resume(true);

    assert!(!engine.continue_step());
    play_to_end(&mut engine, &mut events).await;
    assert!(engine.continue_step());
    assert_eq!(engine.next_step(), Transition::Exited);
    assert_eq!(store.get(), None);
}

#[tokio::test(start_paused = true)]
async fn whole_tutorial_walkthrough() {
    let store = MemoryProgressStore::new();
    let (mut engine, mut events) = mount(&store);

    while !engine.is_last_step() {
        assert_eq!(engine.auto_submit(), Submission::Accepted, "step {}", engine.current_step().id);
        let before = engine.index();
        assert_eq!(engine.next_step(), Transition::Advanced(before + 1));
        assert_eq!(store.get(), Some(before + 1));
    }
    play_to_end(&mut engine, &mut events).await;
    assert_eq!(engine.submit_text("exit"), Submission::Exit);
    assert_eq!(engine.history().len(), catalog().len() - 1);
    assert_eq!(store.get(), None);
}

#[tokio::test(start_paused = true)]
async fn confirmation_step_needs_finished_output() {
    let store = MemoryProgressStore::with_index(1);
    let (mut engine, mut events) = mount_with(&CONFIRM_STEPS, Box::new(store.clone()));
    engine.resolve_resume(true);

    assert!(!engine.continue_step());
    assert!(matches!(
        engine.submit_text("continue"),
        Submission::Rejected { .. }
    ));

    play_to_end(&mut engine, &mut events).await;
    assert_eq!(engine.submit_text("continue"), Submission::Accepted);
    assert!(engine.step_completed());
    assert_eq!(engine.next_step(), Transition::Advanced(2));
}

#[tokio::test(start_paused = true)]
async fn skip_requires_confirmation() {
    let store = MemoryProgressStore::with_index(1);
    let (mut engine, _events) = mount(&store);
    engine.resolve_resume(true);

    assert!(engine.request_exit());
    assert!(engine.exit_requested());
    assert_eq!(engine.confirm_exit(false), Transition::Blocked);
    assert!(!engine.is_exited());
    assert_eq!(store.get(), Some(1));

    assert!(engine.request_exit());
    assert_eq!(engine.confirm_exit(true), Transition::Exited);
    assert!(engine.is_exited());
    assert_eq!(store.get(), None);
}

#[tokio::test(start_paused = true)]
async fn unskippable_steps_refuse_exit_request() {
    let store = MemoryProgressStore::new();
    let (mut engine, _events) = mount(&store);
    assert!(!engine.request_exit());
    assert_eq!(engine.confirm_exit(true), Transition::Blocked);
    assert!(!engine.is_exited());
}

#[tokio::test(start_paused = true)]
async fn tab_fills_without_submitting() {
    let store = MemoryProgressStore::with_index(2);
    let (mut engine, _events) = mount(&store);
    engine.resolve_resume(true);

    assert!(engine.autocomplete());
    assert_eq!(engine.input(), "deepfabric generate quickstart.yaml");
    assert!(!engine.step_completed());
    assert!(engine.history().is_empty());
}

#[tokio::test(start_paused = true)]
async fn storage_failure_degrades_to_fresh_start() {
    let (mut engine, _events) = mount_with(catalog(), Box::new(UnavailableStore::new("denied")));

    assert_eq!(engine.index(), 0);
    assert_eq!(engine.pending_resume(), None);
    assert!(!engine.resume_enabled());

    engine.submit_text("continue");
    assert_eq!(engine.next_step(), Transition::Advanced(1));
    assert!(engine.request_exit());
    assert_eq!(engine.confirm_exit(true), Transition::Exited);
}

#[tokio::test(start_paused = true)]
async fn events_after_exit_are_dropped() {
    let store = MemoryProgressStore::with_index(1);
    let (mut engine, mut events) = mount(&store);
    engine.resolve_resume(true);
    engine.request_exit();
    engine.confirm_exit(true);

    tokio::time::sleep(std::time::Duration::from_secs(30)).await;
    while let Ok(event) = events.try_recv() {
        assert!(!engine.apply_player_event(event));
    }
    assert!(engine.output().is_empty());
}

#[tokio::test(start_paused = true)]
async fn markers_and_progress_follow_index() {
    let store = MemoryProgressStore::with_index(2);
    let (mut engine, _events) = mount(&store);
    engine.resolve_resume(true);

    let markers = engine.markers();
    assert_eq!(markers[0], StepMarker::Done);
    assert_eq!(markers[1], StepMarker::Done);
    assert_eq!(markers[2], StepMarker::Current);
    assert_eq!(markers[3], StepMarker::Pending);
    assert!((engine.progress() - 3.0 / 9.0).abs() < f64::EPSILON);
}

#[tokio::test(start_paused = true)]
async fn copy_puts_expected_command_on_clipboard() {
    let store = MemoryProgressStore::with_index(1);
    let (mut engine, _events) = mount(&store);
    engine.resolve_resume(true);

    let mut clipboard = RecordingClipboard::default();
    let copied = engine.copy_command(&mut clipboard).unwrap();
    assert_eq!(copied, "pip install deepfabric");
    assert_eq!(clipboard.contents.as_deref(), Some("pip install deepfabric"));
    assert!(!engine.step_completed());
    assert_eq!(engine.input(), "");
}

#[tokio::test(start_paused = true)]
async fn copy_failure_leaves_state_alone() {
    let store = MemoryProgressStore::with_index(1);
    let (mut engine, _events) = mount(&store);
    engine.resolve_resume(true);

    let result = engine.copy_command(&mut DeniedClipboard);
    assert!(matches!(result, Err(TutorialError::Clipboard(_))));
    assert_eq!(engine.index(), 1);
    assert!(!engine.step_completed());
}

#[tokio::test(start_paused = true)]
async fn copy_without_command_is_an_error() {
    let last = catalog().len() - 1;
    let store = MemoryProgressStore::with_index(last);
    let (mut engine, _events) = mount(&store);
    engine.resolve_resume(true);

    let result = engine.copy_command(&mut RecordingClipboard::default());
    assert!(matches!(result, Err(TutorialError::NoCommand(9))));
}

#[tokio::test]
async fn download_saves_step_asset() {
    let fixtures = TestFixtures::new().unwrap();
    let store = MemoryProgressStore::with_index(2);
    let (mut engine, _events) = mount(&store);
    engine.resolve_resume(true);

    let saved = engine
        .download(&AssetStore::embedded(), fixtures.path())
        .await
        .unwrap();
    assert_eq!(saved, fixtures.path().join("quickstart.yaml"));
    assert!(fixtures.read_to_string("quickstart.yaml").unwrap().contains("topic_tree"));
}

#[tokio::test]
async fn download_without_file_is_an_error() {
    let fixtures = TestFixtures::new().unwrap();
    let store = MemoryProgressStore::with_index(1);
    let (mut engine, _events) = mount(&store);
    engine.resolve_resume(true);

    let result = engine.download(&AssetStore::embedded(), fixtures.path()).await;
    assert!(matches!(result, Err(TutorialError::NoDownload(2))));
}

#[tokio::test]
async fn download_from_empty_asset_dir_is_not_found() {
    let fixtures = TestFixtures::new().unwrap();
    let store = MemoryProgressStore::with_index(4);
    let (mut engine, _events) = mount(&store);
    engine.resolve_resume(true);

    let assets = AssetStore::from_dir(fixtures.missing_dir("assets"));
    let result = engine.download(&assets, fixtures.path()).await;
    assert!(matches!(result, Err(TutorialError::AssetNotFound(name)) if name == "agent_tool_calling.yaml"));
}
