mod common;

use tokio_util::sync::CancellationToken;

use common::{ctx, lesson, rejected, user, world, world_with, Recorded, SCHOOL};
use lesson_qa::application::context::RequestContext;
use lesson_qa::application::dto::pagination::PageRequest;
use lesson_qa::application::error::{DiscussionError, ErrorCode};
use lesson_qa::application::services::visibility::CountMode;
use lesson_qa::application::use_cases::questions::create_question::NewQuestion;
use lesson_qa::application::use_cases::questions::update_question::QuestionEdit;
use lesson_qa::bootstrap::config::Config;
use lesson_qa::domain::lessons::Visibility;
use lesson_qa::domain::status::{ActivationStatus, ApprovalStatus};
use lesson_qa::domain::users::Role;
use lesson_qa::infrastructure::memory::JournalEntry;
use uuid::Uuid;

fn ask(content_item_id: Uuid, title: &str) -> NewQuestion {
    NewQuestion {
        content_item_id,
        title: title.to_string(),
        content: "Could someone explain?".to_string(),
    }
}

#[tokio::test]
async fn student_without_enrollment_cannot_ask() {
    let w = world().await;
    let res = w
        .app
        .create_question()
        .execute(&ctx(&w.unenrolled_student), ask(w.lesson.id, "Why?"))
        .await;
    assert_eq!(rejected(res), ErrorCode::StudentNotEnrolledInAnyClass);
    assert!(w.store.journal().await.is_empty());
}

#[tokio::test]
async fn teacher_cannot_ask_on_another_schools_lesson() {
    let w = world().await;
    let res = w
        .app
        .create_question()
        .execute(&ctx(&w.teacher), ask(w.foreign_lesson.id, "Why?"))
        .await;
    assert_eq!(
        rejected(res),
        ErrorCode::CannotCreateQuestionForLessonNotInYourSchool
    );
}

#[tokio::test]
async fn enrolled_student_asks_and_everyone_is_told() {
    let w = world().await;
    let created = w
        .app
        .create_question()
        .execute(&ctx(&w.student), ask(w.lesson.id, "  Why is chlorophyll green?  "))
        .await
        .unwrap();

    assert_eq!(created.title, "Why is chlorophyll green?");
    assert_eq!(created.creator_role, Role::Student);
    assert!(created.can_update && created.can_delete);
    assert_eq!(created.created_at, common::epoch());
    assert!(w.store.question(created.id).await.is_some());
    assert_eq!(w.store.commits().await, 1);

    let events = w.notifications.events().await;
    assert_eq!(events.len(), 1);
    match &events[0] {
        Recorded::Question("question_created", notice) => {
            assert_eq!(notice.payload.id, created.id);
            assert_eq!(notice.content_item_id, w.lesson.id);
            assert_eq!(notice.actor_name, "student");
        }
        other => panic!("unexpected notification {other:?}"),
    }
}

#[tokio::test]
async fn folder_placement_makes_a_lesson_reachable() {
    let w = world().await;
    let shelved = lesson(Some(SCHOOL), Visibility::ClassRestricted, w.teacher.id);
    w.store.add_content_item(shelved.clone()).await;

    let res = w
        .app
        .create_question()
        .execute(&ctx(&w.student), ask(shelved.id, "Where is this?"))
        .await;
    assert_eq!(
        rejected(res),
        ErrorCode::CannotCreateQuestionForLessonNotAccessible
    );

    w.store.place_in_folder(w.class_id, shelved.id).await.unwrap();
    assert!(
        w.app
            .create_question()
            .execute(&ctx(&w.student), ask(shelved.id, "Where is this?"))
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn lesson_state_is_checked_before_approval() {
    let w = world().await;
    let mut pending = lesson(Some(SCHOOL), Visibility::SchoolWide, w.teacher.id);
    pending.approval = ApprovalStatus::Pending;
    let mut archived = pending.clone();
    archived.id = Uuid::new_v4();
    archived.status = ActivationStatus::Archived;
    w.store.add_content_item(pending.clone()).await;
    w.store.add_content_item(archived.clone()).await;

    let uc = w.app.create_question();
    assert_eq!(
        rejected(uc.execute(&ctx(&w.teacher), ask(pending.id, "Soon?")).await),
        ErrorCode::CannotCreateQuestionForPendingLesson
    );
    assert_eq!(
        rejected(uc.execute(&ctx(&w.teacher), ask(archived.id, "Gone?")).await),
        ErrorCode::LessonMaterialNotActive
    );
    assert_eq!(
        rejected(uc.execute(&ctx(&w.teacher), ask(Uuid::new_v4(), "Where?")).await),
        ErrorCode::LessonMaterialNotFound
    );
}

#[tokio::test]
async fn identity_and_payload_are_validated() {
    let w = world().await;
    let uc = w.app.create_question();
    assert_eq!(
        rejected(uc.execute(&ctx(&w.stranger), ask(w.lesson.id, "Hi")).await),
        ErrorCode::InsufficientPermission
    );
    assert_eq!(
        rejected(
            uc.execute(&RequestContext::new(Uuid::new_v4()), ask(w.lesson.id, "Hi"))
                .await
        ),
        ErrorCode::UserNotFound
    );
    assert_eq!(
        rejected(uc.execute(&ctx(&w.student), ask(w.lesson.id, "   ")).await),
        ErrorCode::InvalidContent
    );
    assert!(w.store.journal().await.is_empty());
}

#[tokio::test]
async fn detail_hides_questions_from_outsiders() {
    let w = world().await;
    let question = w.seed_question(&w.student, 1).await;

    let res = w
        .app
        .get_question_detail()
        .execute(&ctx(&w.unenrolled_student), question.id)
        .await;
    assert_eq!(rejected(res), ErrorCode::QuestionNotFound);

    let res = w
        .app
        .get_question_detail()
        .execute(&ctx(&w.stranger), question.id)
        .await;
    assert_eq!(rejected(res), ErrorCode::QuestionNotFound);
}

#[tokio::test]
async fn detail_carries_tree_counts_and_flags() {
    let w = world().await;
    let question = w.seed_question(&w.student, 1).await;
    let first = w.seed_comment(&question, None, &w.teacher, 5).await;
    w.seed_comment(&question, Some(&first), &w.classmate, 7).await;
    w.seed_comment(&question, None, &w.classmate, 6).await;

    let detail = w
        .app
        .get_question_detail()
        .execute(&ctx(&w.teacher), question.id)
        .await
        .unwrap();
    assert_eq!(detail.question.comment_count, 3);
    assert_eq!(detail.question.creator_role, Role::Student);
    assert!(!detail.question.can_update);
    // The teacher runs the student's class.
    assert!(detail.question.can_delete);
    assert_eq!(detail.comments.len(), 2);
    assert_eq!(detail.comments[0].id, first.id);
    assert_eq!(detail.comments[0].reply_count, 1);
    assert_eq!(detail.comments[0].replies[0].creator_role, Role::Student);

    let as_owner = w
        .app
        .get_question_detail()
        .execute(&ctx(&w.student), question.id)
        .await
        .unwrap();
    assert!(as_owner.question.can_update);
    assert!(!as_owner.question.can_delete);
}

#[tokio::test]
async fn only_the_author_or_a_system_admin_may_edit() {
    let w = world().await;
    let question = w.seed_question(&w.student, 1).await;
    let edit = |title: &str| QuestionEdit {
        question_id: question.id,
        title: title.to_string(),
        content: "edited".to_string(),
    };

    let res = w
        .app
        .update_question()
        .execute(&ctx(&w.school_admin), edit("Hijacked"))
        .await;
    assert_eq!(rejected(res), ErrorCode::InsufficientPermissionToUpdateQuestion);

    let updated = w
        .app
        .update_question()
        .execute(&ctx(&w.student), edit(" Refined "))
        .await
        .unwrap();
    assert_eq!(updated.title, "Refined");
    assert!(updated.last_modified_at.is_some());
    assert_eq!(
        w.store.question(question.id).await.unwrap().title,
        "Refined"
    );

    assert!(
        w.app
            .update_question()
            .execute(&ctx(&w.system_admin), edit("Moderated"))
            .await
            .is_ok()
    );
    let events = w.notifications.events().await;
    assert_eq!(events.len(), 2);
    assert!(events.iter().all(|e| e.event() == "question_updated"));
}

#[tokio::test]
async fn archived_questions_cannot_be_edited() {
    let w = world().await;
    let mut question = w.seed_question(&w.student, 1).await;
    question.status = ActivationStatus::Archived;
    w.store.insert_question(question.clone()).await;

    let res = w
        .app
        .update_question()
        .execute(
            &ctx(&w.student),
            QuestionEdit {
                question_id: question.id,
                title: "t".into(),
                content: "c".into(),
            },
        )
        .await;
    assert_eq!(rejected(res), ErrorCode::QuestionNotActive);
}

#[tokio::test]
async fn student_deletes_own_unanswered_question() {
    let w = world().await;
    let question = w.seed_question(&w.student, 1).await;

    let deleted = w
        .app
        .delete_question()
        .execute(&ctx(&w.student), question.id)
        .await
        .unwrap();
    assert!(deleted);
    assert_eq!(w.store.removals().await, vec![question.id]);
    assert_eq!(w.store.commits().await, 1);
    assert!(w.store.question(question.id).await.is_none());

    let events = w.notifications.events().await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event(), "question_deleted");
}

#[tokio::test]
async fn student_cannot_delete_answered_question() {
    let w = world().await;
    let question = w.seed_question(&w.student, 1).await;
    w.seed_comment(&question, None, &w.teacher, 2).await;

    let res = w
        .app
        .delete_question()
        .execute(&ctx(&w.student), question.id)
        .await;
    assert_eq!(rejected(res), ErrorCode::CannotDeleteQuestionWithComments);
    assert!(w.store.removals().await.is_empty());
    assert_eq!(w.store.commits().await, 0);
    assert!(w.notifications.events().await.is_empty());
}

#[tokio::test]
async fn class_teacher_cascades_a_students_question() {
    let w = world().await;
    let question = w.seed_question(&w.student, 1).await;
    let comment = w.seed_comment(&question, None, &w.classmate, 2).await;
    let reply = w.seed_comment(&question, Some(&comment), &w.student, 3).await;

    let res = w
        .app
        .delete_question()
        .execute(&ctx(&w.other_teacher), question.id)
        .await;
    assert_eq!(rejected(res), ErrorCode::InsufficientPermissionToDeleteQuestion);

    assert!(
        w.app
            .delete_question()
            .execute(&ctx(&w.teacher), question.id)
            .await
            .unwrap()
    );
    assert_eq!(
        w.store.removals().await,
        vec![reply.id, comment.id, question.id]
    );
    assert_eq!(w.store.commits().await, 1);
    assert!(w.store.comment(reply.id).await.is_none());
}

#[tokio::test]
async fn school_admin_moderates_within_the_school() {
    let w = world().await;
    let question = w.seed_question(&w.teacher, 1).await;
    w.seed_comment(&question, None, &w.student, 2).await;
    assert!(
        w.app
            .delete_question()
            .execute(&ctx(&w.school_admin), question.id)
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn staff_listing_a_restricted_lesson_sees_students_and_themselves() {
    let w = world().await;
    w.seed_question(&w.student, 1).await;
    w.seed_question(&w.other_teacher, 2).await;
    let own = w.seed_question(&w.teacher, 3).await;
    w.seed_question(&w.classmate, 4).await;

    let page = w
        .app
        .list_questions_by_lesson()
        .execute(&ctx(&w.teacher), w.lesson.id, PageRequest::new(1, 10))
        .await
        .unwrap();
    let authors: Vec<Uuid> = page.items.iter().map(|q| q.created_by).collect();
    assert_eq!(authors, vec![w.classmate.id, w.teacher.id, w.student.id]);
    assert_eq!(page.total_items, 3);
    let mine = page.items.iter().find(|q| q.id == own.id).unwrap();
    assert!(mine.can_update && mine.can_delete);

    let page = w
        .app
        .list_questions_by_lesson()
        .execute(&ctx(&w.moderator), w.lesson.id, PageRequest::new(1, 10))
        .await
        .unwrap();
    assert!(page.items.iter().all(|q| q.creator_role == Role::Student));
    assert_eq!(page.total_items, 2);

    let page = w
        .app
        .list_questions_by_lesson()
        .execute(&ctx(&w.student), w.lesson.id, PageRequest::new(1, 10))
        .await
        .unwrap();
    assert_eq!(page.items.len(), 4);
}

#[tokio::test]
async fn unfiltered_count_reports_the_store_total() {
    let cfg = Config {
        visibility_count: CountMode::Unfiltered,
        ..Config::default()
    };
    let w = world_with(cfg).await;
    w.seed_question(&w.student, 1).await;
    w.seed_question(&w.other_teacher, 2).await;

    let page = w
        .app
        .list_questions_by_lesson()
        .execute(&ctx(&w.teacher), w.lesson.id, PageRequest::new(1, 10))
        .await
        .unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.total_items, 2);
}

#[tokio::test]
async fn listing_requires_teacher_reach_and_pages_results() {
    let w = world().await;
    for minute in 0..5 {
        w.seed_question(&w.student, minute).await;
    }

    let res = w
        .app
        .list_questions_by_lesson()
        .execute(&ctx(&w.other_teacher), w.lesson.id, PageRequest::new(1, 10))
        .await;
    assert_eq!(rejected(res), ErrorCode::TeacherNotHaveAccessToMaterial);

    let page = w
        .app
        .list_questions_by_lesson()
        .execute(&ctx(&w.student), w.lesson.id, PageRequest::new(3, 2))
        .await
        .unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.total_items, 5);
    assert_eq!(page.total_pages, 3);
    assert!(!page.has_next());
}

#[tokio::test]
async fn school_wide_lessons_still_need_class_access_to_list() {
    let w = world().await;
    let open_lesson = lesson(Some(SCHOOL), Visibility::SchoolWide, w.teacher.id);
    w.store.add_content_item(open_lesson.clone()).await;
    let newcomer = user("new-teacher", Some(SCHOOL));
    w.store.add_user(newcomer.clone(), &["Teacher"]).await;

    let uc = w.app.list_questions_by_lesson();
    let first = PageRequest::new(1, 10);
    assert_eq!(
        rejected(uc.execute(&ctx(&newcomer), open_lesson.id, first).await),
        ErrorCode::TeacherMustHaveActiveClass
    );
    assert_eq!(
        rejected(uc.execute(&ctx(&newcomer), w.lesson.id, first).await),
        ErrorCode::TeacherMustHaveActiveClass
    );
    assert_eq!(
        rejected(uc.execute(&ctx(&w.other_teacher), open_lesson.id, first).await),
        ErrorCode::TeacherNotHaveAccessToMaterial
    );
    // The author of the lesson needs no class.
    assert!(uc.execute(&ctx(&w.teacher), open_lesson.id, first).await.is_ok());
}

#[tokio::test]
async fn page_far_past_the_end_is_empty() {
    let w = world().await;
    w.seed_question(&w.student, 1).await;

    let page = w
        .app
        .list_questions_by_lesson()
        .execute(&ctx(&w.student), w.lesson.id, PageRequest::new(u64::MAX, 10))
        .await
        .unwrap();
    assert!(page.items.is_empty());
    assert_eq!(page.total_items, 1);
    assert!(!page.has_next());
}

#[tokio::test]
async fn list_and_detail_agree_on_comment_count() {
    let w = world().await;
    let question = w.seed_question(&w.student, 1).await;
    let mut closed = w.seed_comment(&question, None, &w.teacher, 2).await;
    w.seed_comment(&question, Some(&closed), &w.classmate, 3).await;
    w.seed_comment(&question, None, &w.classmate, 4).await;
    closed.status = ActivationStatus::Archived;
    w.store.insert_comment(closed).await;

    let page = w
        .app
        .list_questions_by_lesson()
        .execute(&ctx(&w.teacher), w.lesson.id, PageRequest::new(1, 10))
        .await
        .unwrap();
    let detail = w
        .app
        .get_question_detail()
        .execute(&ctx(&w.teacher), question.id)
        .await
        .unwrap();
    assert_eq!(detail.question.comment_count, 1);
    assert_eq!(page.items[0].comment_count, detail.question.comment_count);
}

#[tokio::test]
async fn cancelled_request_touches_nothing() {
    let w = world().await;
    let question = w.seed_question(&w.student, 1).await;
    let cancel = CancellationToken::new();
    cancel.cancel();
    let cctx = RequestContext::with_cancellation(w.student.id, cancel);

    let res = w.app.delete_question().execute(&cctx, question.id).await;
    assert!(matches!(res, Err(DiscussionError::Cancelled)));
    assert!(w.store.journal().await.is_empty());
    assert!(w.store.question(question.id).await.is_some());
}

#[tokio::test]
async fn failed_commit_is_reported_and_not_announced() {
    let w = world().await;
    let question = w.seed_question(&w.student, 1).await;
    w.store.fail_commits(true).await;

    let res = w
        .app
        .delete_question()
        .execute(&ctx(&w.student), question.id)
        .await;
    assert!(matches!(res, Err(DiscussionError::Store(_))));
    assert!(w.store.question(question.id).await.is_some());
    assert!(w.notifications.events().await.is_empty());
    assert_eq!(
        w.store.journal().await,
        vec![JournalEntry::Removed(question.id)]
    );
}
