mod common;

use cursus::model::ValidationError;
use cursus::model::entity::{
    ContentKind, LessonContent, LessonDraft, ModuleDraft, Quiz, QuizOption, QuizQuestion,
};
use cursus::store::{EditorError, StoreError};
use uuid::Uuid;

use crate::common::{seed_course, setup_editor, video_draft};

#[tokio::test]
async fn create_merges_server_confirmed_lesson() {
    let (server, mut editor, course) = setup_editor().await;
    let module = editor
        .create_module(ModuleDraft::new(course, "Getting Started with React"))
        .await
        .unwrap();
    server.clear_calls();

    let id = editor
        .create_lesson(video_draft(module, "Introduction to React"))
        .await
        .unwrap();

    let lesson = editor.store().lesson(id).unwrap();
    assert_eq!(lesson.title(), "Introduction to React");
    assert_eq!(lesson.lesson_order(), 1);
    assert_eq!(lesson.kind(), ContentKind::Video);
    assert!(!lesson.published());
    assert_eq!(server.calls_to("POST", "/api/v1/lessons").len(), 1);
}

#[tokio::test]
async fn invalid_draft_never_reaches_the_api() {
    let (server, mut editor, course) = setup_editor().await;
    let (module_a, ..) = seed_course(&mut editor, course).await;
    let lesson_count = editor.store().lesson_count();
    server.clear_calls();

    let draft = LessonDraft::new(
        module_a,
        "Broken video",
        "15m",
        LessonContent::Video {
            video_ref: "".into(),
        },
    );
    let result = editor.create_lesson(draft).await;

    assert!(matches!(
        result,
        Err(EditorError::Validation(ValidationError::MissingVideoRef))
    ));
    assert!(server.calls().is_empty());
    assert_eq!(editor.store().lesson_count(), lesson_count);
}

#[tokio::test]
async fn quiz_lessons_validate_their_definition() {
    let (server, mut editor, course) = setup_editor().await;
    let (module_a, ..) = seed_course(&mut editor, course).await;
    server.clear_calls();

    let empty = LessonDraft::new(
        module_a,
        "React Basics Quiz",
        "10m",
        LessonContent::Quiz {
            quiz: Quiz::new(vec![], 70),
        },
    );
    assert!(matches!(
        editor.create_lesson(empty).await,
        Err(EditorError::Validation(ValidationError::EmptyQuiz))
    ));
    assert!(server.calls().is_empty());

    let quiz = Quiz::new(
        vec![QuizQuestion::new(
            "What does useState return?",
            vec![
                QuizOption::new("A tuple of value and setter", true),
                QuizOption::new("A promise", false),
            ],
        )],
        70,
    )
    .with_time_limit(10)
    .with_max_attempts(3);
    let draft = LessonDraft::new(module_a, "React Basics Quiz", "10m", LessonContent::Quiz {
        quiz,
    });
    let id = editor.create_lesson(draft).await.unwrap();
    assert_eq!(editor.store().lesson(id).unwrap().kind(), ContentKind::Quiz);
}

#[tokio::test]
async fn create_against_unknown_module_is_rejected_locally() {
    let (server, mut editor, _course) = setup_editor().await;
    server.clear_calls();

    let result = editor
        .create_lesson(video_draft(Uuid::new_v4(), "Orphan"))
        .await;
    assert!(matches!(
        result,
        Err(EditorError::Store(StoreError::UnknownModule(_)))
    ));
    assert!(server.calls().is_empty());
}

#[tokio::test]
async fn update_can_move_a_lesson_to_another_module() {
    let (_server, mut editor, course) = setup_editor().await;
    let (module_a, module_b, lessons, hook_lesson) = seed_course(&mut editor, course).await;

    let draft = video_draft(module_b, "Introduction to React");
    editor.update_lesson(lessons[0], draft).await.unwrap();

    // old module closed the gap, new module appended at the end
    let ranks_a: Vec<i32> = editor
        .store()
        .lessons_in(module_a)
        .iter()
        .map(|l| l.lesson_order())
        .collect();
    assert_eq!(ranks_a, vec![1, 2]);

    let in_b: Vec<Uuid> = editor
        .store()
        .lessons_in(module_b)
        .iter()
        .map(|l| l.id())
        .collect();
    assert_eq!(in_b, vec![hook_lesson, lessons[0]]);
    assert_eq!(
        editor.store().lesson(lessons[0]).unwrap().lesson_order(),
        2
    );
    editor.settle().await;
}

#[tokio::test]
async fn failed_create_leaves_local_state_unchanged() {
    let (server, mut editor, course) = setup_editor().await;
    let (module_a, ..) = seed_course(&mut editor, course).await;
    let lesson_count = editor.store().lesson_count();

    server.fail_next(500);
    let result = editor.create_lesson(video_draft(module_a, "Doomed")).await;

    assert!(matches!(result, Err(EditorError::Fetch(_))));
    assert_eq!(editor.store().lesson_count(), lesson_count);
    assert!(editor.store().banner().is_some());
}

#[tokio::test]
async fn delete_requires_confirmation_and_renumbers() {
    let (server, mut editor, course) = setup_editor().await;
    let (module_a, _, lessons, _) = seed_course(&mut editor, course).await;
    server.clear_calls();

    // without the dialog's confirmation nothing happens at all
    let refused = editor.delete_lesson(lessons[0], false).await;
    assert!(matches!(refused, Err(EditorError::DeleteNotConfirmed)));
    assert!(server.calls().is_empty());
    assert!(editor.store().lesson(lessons[0]).is_some());

    editor.delete_lesson(lessons[0], true).await.unwrap();
    assert!(editor.store().lesson(lessons[0]).is_none());

    let ranks: Vec<i32> = editor
        .store()
        .lessons_in(module_a)
        .iter()
        .map(|l| l.lesson_order())
        .collect();
    assert_eq!(ranks, vec![1, 2]);

    editor.settle().await;
    assert_eq!(server.calls_to("DELETE", "/api/v1/lessons/").len(), 1);
}

#[tokio::test]
async fn module_delete_refuses_while_lessons_remain() {
    let (server, mut editor, course) = setup_editor().await;
    let (module_a, module_b, _, hook_lesson) = seed_course(&mut editor, course).await;
    server.clear_calls();

    let result = editor.delete_module(module_b, true).await;
    assert!(matches!(
        result,
        Err(EditorError::Store(StoreError::ModuleNotEmpty(_)))
    ));
    assert!(server.calls().is_empty());

    editor.delete_lesson(hook_lesson, true).await.unwrap();
    editor.delete_module(module_b, true).await.unwrap();
    assert!(editor.store().module(module_b).is_none());
    assert!(editor.store().module(module_a).is_some());
    editor.settle().await;
}

#[tokio::test]
async fn refresh_replaces_local_state_and_clears_staleness() {
    let (server, mut editor, course) = setup_editor().await;
    let (module_a, _, lessons, _) = seed_course(&mut editor, course).await;

    // provoke a failed sync so the module is flagged stale
    editor.move_lesson(lessons[2], lessons[0]).unwrap();
    server.fail_next(500);
    editor.settle().await;
    assert!(editor.store().stale_modules().contains(&module_a));

    editor.refresh(course).await.unwrap();
    assert!(editor.store().stale_modules().is_empty());
    assert_eq!(editor.store().lesson_count(), 4);

    let ranks: Vec<i32> = editor
        .store()
        .lessons_in(module_a)
        .iter()
        .map(|l| l.lesson_order())
        .collect();
    assert_eq!(ranks, vec![1, 2, 3]);
}

#[tokio::test]
async fn upload_returns_the_stored_url() {
    let (server, mut editor, course) = setup_editor().await;
    let (module_a, ..) = seed_course(&mut editor, course).await;
    server.clear_calls();

    let url = editor
        .upload_file("syllabus.pdf", b"%PDF-1.7".to_vec())
        .await
        .unwrap();
    assert_eq!(url, "/api/v1/static/syllabus.pdf");

    let draft = LessonDraft::new(module_a, "Course Syllabus", "5m", LessonContent::Pdf {
        file_url: url,
    });
    let id = editor.create_lesson(draft).await.unwrap();
    assert_eq!(editor.store().lesson(id).unwrap().kind(), ContentKind::Pdf);

    let uploads = server.calls_to("POST", "/api/v1/uploads");
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].body["filename"], "syllabus.pdf");
}

#[tokio::test]
async fn module_stats_sum_lesson_durations() {
    let (_server, mut editor, course) = setup_editor().await;
    let module = editor
        .create_module(ModuleDraft::new(course, "React Hooks Deep Dive"))
        .await
        .unwrap();

    for (title, duration) in [("useState Hook Tutorial", "25m"), ("useEffect Deep Dive", "1h 20m")] {
        let draft = LessonDraft::new(module, title, duration, LessonContent::Text {
            body: "# Notes".into(),
        });
        editor.create_lesson(draft).await.unwrap();
    }

    let stats = editor.store().module_stats(module).unwrap();
    assert_eq!(stats.lesson_count, 2);
    assert_eq!(stats.total_minutes, 105);
    assert_eq!(stats.formatted_duration(), "1h 45m");
}
