//! Case lifecycle integration tests.
//!
//! Exercise case creation (template → personalized plan → generic) and the
//! step state machine against a real temp-dir SQLite storage.

use tempfile::TempDir;
use visad::case::service::{self, case_progress};
use visad::case::state::StepAction;
use visad::error::ApiError;
use visad::storage::{CaseStepRow, Storage};

// ─── Helpers ─────────────────────────────────────────────────────────────────

async fn make_storage(dir: &TempDir) -> Storage {
    Storage::new(dir.path()).await.unwrap()
}

async fn make_user(storage: &Storage, email: &str) -> String {
    let user = storage
        .create_user(email, "hash", "salt", Some("Ada"), Some("Diallo"))
        .await
        .unwrap();
    // Profile row so the personalized generator has a snapshot to read.
    storage.get_or_create_profile(&user.id).await.unwrap();
    user.id
}

async fn add_french_certificate(storage: &Storage, user_id: &str) {
    let profile = storage.get_or_create_profile(user_id).await.unwrap();
    storage
        .add_language(&profile.id, "FRENCH", "B2", true, Some("TCF"), None)
        .await
        .unwrap();
}

fn step_numbers(steps: &[CaseStepRow]) -> Vec<i64> {
    steps.iter().map(|s| s.step_number).collect()
}

// ─── Case creation ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_case_personalized_without_certificate() {
    let dir = TempDir::new().unwrap();
    let storage = make_storage(&dir).await;
    let user_id = make_user(&storage, "a@example.com").await;

    let (case, steps) = service::create_case(&storage, &user_id, "France", "STUDENT", None)
        .await
        .unwrap();

    assert_eq!(case.status, "PENDING");
    // Contiguous numbering from 1, no gaps.
    assert_eq!(step_numbers(&steps), (1..=steps.len() as i64).collect::<Vec<_>>());

    // The language phase survives with its three sub-steps.
    let phase3 = steps
        .iter()
        .find(|s| s.title == "Phase 3 : Certification de français")
        .expect("language phase present");
    assert!(phase3.requires_proof);
    let subs_after_phase3: Vec<&CaseStepRow> = steps
        .iter()
        .filter(|s| {
            s.step_number > phase3.step_number
                && s.step_number <= phase3.step_number + 3
                && s.title.starts_with("— ")
        })
        .collect();
    assert_eq!(subs_after_phase3.len(), 3);
}

#[tokio::test]
async fn test_create_case_marks_language_phase_validated() {
    let dir = TempDir::new().unwrap();
    let storage = make_storage(&dir).await;
    let user_id = make_user(&storage, "a@example.com").await;
    add_french_certificate(&storage, &user_id).await;

    let (_, steps) = service::create_case(&storage, &user_id, "France", "STUDENT", None)
        .await
        .unwrap();

    let phase3 = steps
        .iter()
        .find(|s| s.title.starts_with("Phase 3"))
        .unwrap();
    assert_eq!(phase3.title, "Phase 3 : Certification de français (validé)");
    assert!(!phase3.requires_proof);
    assert!(phase3.proof_type.is_none());
    // Its sub-steps are gone; the next row is the following phase.
    let next = steps
        .iter()
        .find(|s| s.step_number == phase3.step_number + 1)
        .unwrap();
    assert!(next.title.starts_with("Phase 4"));
}

#[tokio::test]
async fn test_create_case_unknown_pair_uses_generic_plan() {
    let dir = TempDir::new().unwrap();
    let storage = make_storage(&dir).await;
    let user_id = make_user(&storage, "a@example.com").await;

    let (_, steps) = service::create_case(&storage, &user_id, "Atlantide", "TOURIST", None)
        .await
        .unwrap();

    let phases: Vec<&CaseStepRow> = steps.iter().filter(|s| s.title.starts_with("Phase")).collect();
    assert_eq!(phases.len(), 5);
    assert_eq!(step_numbers(&steps), (1..=steps.len() as i64).collect::<Vec<_>>());

    // Deterministic: a second case for the same pair yields the same plan.
    let (_, steps2) = service::create_case(&storage, &user_id, "Atlantide", "TOURIST", None)
        .await
        .unwrap();
    let titles: Vec<&str> = steps.iter().map(|s| s.title.as_str()).collect();
    let titles2: Vec<&str> = steps2.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, titles2);
}

#[tokio::test]
async fn test_administrator_template_wins_over_catalog() {
    let dir = TempDir::new().unwrap();
    let storage = make_storage(&dir).await;
    let user_id = make_user(&storage, "a@example.com").await;

    let template_id = storage.create_template("France", "STUDENT").await.unwrap();
    storage
        .add_template_step(&template_id, 1, "Étape administrateur", None, true, Some("DOCUMENT"))
        .await
        .unwrap();
    storage
        .add_template_step(&template_id, 2, "Seconde étape", None, false, None)
        .await
        .unwrap();

    let (_, steps) = service::create_case(&storage, &user_id, "France", "STUDENT", None)
        .await
        .unwrap();

    assert_eq!(steps.len(), 2);
    assert_eq!(steps[0].title, "Étape administrateur");
    assert_eq!(steps[0].proof_type.as_deref(), Some("DOCUMENT"));
    assert_eq!(step_numbers(&steps), vec![1, 2]);
}

// ─── Step state machine over storage ─────────────────────────────────────────

#[tokio::test]
async fn test_step_lifecycle_without_proof() {
    let dir = TempDir::new().unwrap();
    let storage = make_storage(&dir).await;
    let user_id = make_user(&storage, "a@example.com").await;
    let (case, steps) = service::create_case(&storage, &user_id, "Atlantide", "TOURIST", None)
        .await
        .unwrap();

    // "Phase 1 : Préparation des documents" requires no proof.
    let step = &steps[0];
    assert!(!step.requires_proof);

    let row = service::transition_step(&storage, &user_id, &case.id, &step.id, StepAction::Begin)
        .await
        .unwrap();
    assert_eq!(row.status, "IN_PROGRESS");
    assert!(row.completed_at.is_none());

    let row = service::transition_step(&storage, &user_id, &case.id, &step.id, StepAction::Complete)
        .await
        .unwrap();
    assert_eq!(row.status, "COMPLETED");
    assert!(row.completed_at.is_some());

    // Reopen clears the timestamp.
    let row = service::transition_step(&storage, &user_id, &case.id, &step.id, StepAction::Reopen)
        .await
        .unwrap();
    assert_eq!(row.status, "IN_PROGRESS");
    assert!(row.completed_at.is_none());
}

#[tokio::test]
async fn test_proof_requiring_step_must_pass_validation() {
    let dir = TempDir::new().unwrap();
    let storage = make_storage(&dir).await;
    let user_id = make_user(&storage, "a@example.com").await;
    let (case, steps) = service::create_case(&storage, &user_id, "Atlantide", "TOURIST", None)
        .await
        .unwrap();

    let step = steps.iter().find(|s| s.requires_proof).unwrap();
    service::transition_step(&storage, &user_id, &case.id, &step.id, StepAction::Begin)
        .await
        .unwrap();

    // Direct completion is a hard state-machine violation.
    let err =
        service::transition_step(&storage, &user_id, &case.id, &step.id, StepAction::Complete)
            .await
            .unwrap_err();
    assert!(matches!(err, ApiError::StateViolation(_)));

    // The rejected transition left the row untouched.
    let row = storage.get_case_step(&step.id, &case.id).await.unwrap().unwrap();
    assert_eq!(row.status, "IN_PROGRESS");
    assert!(row.completed_at.is_none());

    // Proof upload → validation → completion.
    let row = service::transition_step(
        &storage,
        &user_id,
        &case.id,
        &step.id,
        StepAction::AttachProof {
            url: "/uploads/123_preuve.png".into(),
            notes: Some("Capture du compte".into()),
        },
    )
    .await
    .unwrap();
    assert_eq!(row.status, "PENDING_VALIDATION");
    assert_eq!(row.proof_url.as_deref(), Some("/uploads/123_preuve.png"));
    assert!(row.completed_at.is_none());

    let row = service::transition_step(&storage, &user_id, &case.id, &step.id, StepAction::Validate)
        .await
        .unwrap();
    assert_eq!(row.status, "COMPLETED");
    assert!(row.completed_at.is_some());
}

#[tokio::test]
async fn test_foreign_case_is_not_found() {
    let dir = TempDir::new().unwrap();
    let storage = make_storage(&dir).await;
    let owner = make_user(&storage, "owner@example.com").await;
    let intruder = make_user(&storage, "intruder@example.com").await;

    let (case, steps) = service::create_case(&storage, &owner, "France", "STUDENT", None)
        .await
        .unwrap();

    let err =
        service::transition_step(&storage, &intruder, &case.id, &steps[0].id, StepAction::Begin)
            .await
            .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));

    // No mutation happened.
    let row = storage.get_case_step(&steps[0].id, &case.id).await.unwrap().unwrap();
    assert_eq!(row.status, "NOT_STARTED");
}

#[tokio::test]
async fn test_case_progress_and_status_follow_steps() {
    let dir = TempDir::new().unwrap();
    let storage = make_storage(&dir).await;
    let user_id = make_user(&storage, "a@example.com").await;

    // A two-step template keeps the walk short.
    let template_id = storage.create_template("Atlantide", "WORK").await.unwrap();
    storage
        .add_template_step(&template_id, 1, "Première étape", None, false, None)
        .await
        .unwrap();
    storage
        .add_template_step(&template_id, 2, "Seconde étape", None, false, None)
        .await
        .unwrap();

    let (case, steps) = service::create_case(&storage, &user_id, "Atlantide", "WORK", None)
        .await
        .unwrap();
    assert_eq!(case_progress(&steps), 0);

    for step in &steps {
        service::transition_step(&storage, &user_id, &case.id, &step.id, StepAction::Begin)
            .await
            .unwrap();
        service::transition_step(&storage, &user_id, &case.id, &step.id, StepAction::Complete)
            .await
            .unwrap();
    }

    let detail = service::get_case_detail(&storage, &user_id, &case.id)
        .await
        .unwrap();
    assert_eq!(detail.progress, 100);
    assert_eq!(detail.case.status, "COMPLETED");

    // Reopening one step drops the case back to IN_PROGRESS.
    service::transition_step(&storage, &user_id, &case.id, &steps[0].id, StepAction::Reopen)
        .await
        .unwrap();
    let detail = service::get_case_detail(&storage, &user_id, &case.id)
        .await
        .unwrap();
    assert_eq!(detail.progress, 50);
    assert_eq!(detail.case.status, "IN_PROGRESS");
}
