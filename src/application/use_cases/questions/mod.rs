pub mod create_question;
pub mod delete_question;
pub mod get_question_detail;
pub mod list_questions_by_lesson;
pub mod update_question;
