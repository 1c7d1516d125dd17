use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::application::dto::discussions::QuestionResponse;
use crate::domain::lessons::{ContentItem, Visibility};
use crate::domain::users::{Actor, Role};

/// How the reported total reacts to questions hidden from a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CountMode {
    /// Store total minus what was hidden on the fetched page.
    #[default]
    PageAdjusted,
    /// Store total as-is.
    Unfiltered,
}

impl CountMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CountMode::PageAdjusted => "page-adjusted",
            CountMode::Unfiltered => "unfiltered",
        }
    }
}

impl FromStr for CountMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "page-adjusted" | "page_adjusted" => Ok(CountMode::PageAdjusted),
            "unfiltered" => Ok(CountMode::Unfiltered),
            other => anyhow::bail!("unknown visibility count mode: {other}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct VisibleQuestions {
    pub items: Vec<QuestionResponse>,
    pub total: u64,
    pub hidden: u64,
}

/// Hides questions a teacher or moderator should not see on a lesson that is
/// not school-wide: only student questions and the viewer's own remain.
/// Page order is preserved. Other roles see the page untouched.
pub fn filter_for_viewer(
    actor: &Actor,
    item: &ContentItem,
    questions: Vec<QuestionResponse>,
    total: u64,
    mode: CountMode,
) -> VisibleQuestions {
    if !actor.role.is_staff() || item.visibility == Visibility::SchoolWide {
        return VisibleQuestions {
            items: questions,
            total,
            hidden: 0,
        };
    }

    let fetched = questions.len() as u64;
    let items: Vec<QuestionResponse> = questions
        .into_iter()
        .filter(|q| q.creator_role == Role::Student || actor.is(q.created_by))
        .collect();
    let hidden = fetched - items.len() as u64;
    let total = match mode {
        CountMode::Unfiltered => total,
        CountMode::PageAdjusted => total.saturating_sub(hidden).max(items.len() as u64),
    };
    VisibleQuestions {
        items,
        total,
        hidden,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rstest::rstest;
    use uuid::Uuid;

    use super::*;
    use crate::domain::status::{ActivationStatus, ApprovalStatus};
    use crate::domain::users::User;

    fn actor(role: Role) -> Actor {
        Actor::new(
            User {
                id: Uuid::new_v4(),
                full_name: "viewer".into(),
                avatar_url: None,
                school_id: Some(1),
            },
            role,
        )
    }

    fn lesson(visibility: Visibility) -> ContentItem {
        ContentItem {
            id: Uuid::new_v4(),
            title: "Fractions".into(),
            school_id: Some(1),
            status: ActivationStatus::Active,
            approval: ApprovalStatus::Approved,
            visibility,
            created_by: Uuid::new_v4(),
        }
    }

    fn question(created_by: Uuid, creator_role: Role, title: &str) -> QuestionResponse {
        QuestionResponse {
            id: Uuid::new_v4(),
            content_item_id: Uuid::new_v4(),
            title: title.into(),
            content: "?".into(),
            created_by,
            creator_role,
            created_at: Utc::now(),
            last_modified_at: None,
            status: ActivationStatus::Active,
            comment_count: 0,
            can_update: false,
            can_delete: false,
        }
    }

    fn page(viewer: &Actor) -> Vec<QuestionResponse> {
        vec![
            question(Uuid::new_v4(), Role::Student, "student-1"),
            question(Uuid::new_v4(), Role::Teacher, "other-teacher"),
            question(viewer.id(), viewer.role, "mine"),
            question(Uuid::new_v4(), Role::Student, "student-2"),
            question(Uuid::new_v4(), Role::SchoolAdmin, "admin"),
        ]
    }

    fn titles(v: &VisibleQuestions) -> Vec<&str> {
        v.items.iter().map(|q| q.title.as_str()).collect()
    }

    #[rstest]
    #[case(Role::Teacher)]
    #[case(Role::ContentModerator)]
    fn staff_see_students_and_themselves_on_restricted_lessons(#[case] role: Role) {
        let viewer = actor(role);
        let v = filter_for_viewer(
            &viewer,
            &lesson(Visibility::ClassRestricted),
            page(&viewer),
            12,
            CountMode::PageAdjusted,
        );
        assert_eq!(titles(&v), vec!["student-1", "mine", "student-2"]);
        assert_eq!(v.hidden, 2);
        assert_eq!(v.total, 10);
    }

    #[rstest]
    #[case(Role::Student)]
    #[case(Role::SchoolAdmin)]
    #[case(Role::SystemAdmin)]
    fn other_roles_are_not_filtered(#[case] role: Role) {
        let viewer = actor(role);
        let v = filter_for_viewer(
            &viewer,
            &lesson(Visibility::Private),
            page(&viewer),
            5,
            CountMode::PageAdjusted,
        );
        assert_eq!(v.items.len(), 5);
        assert_eq!(v.total, 5);
    }

    #[test]
    fn school_wide_lessons_pass_through() {
        let viewer = actor(Role::Teacher);
        let v = filter_for_viewer(
            &viewer,
            &lesson(Visibility::SchoolWide),
            page(&viewer),
            5,
            CountMode::PageAdjusted,
        );
        assert_eq!(v.items.len(), 5);
        assert_eq!(v.hidden, 0);
    }

    #[test]
    fn unfiltered_mode_keeps_store_total() {
        let viewer = actor(Role::Teacher);
        let v = filter_for_viewer(
            &viewer,
            &lesson(Visibility::Private),
            page(&viewer),
            5,
            CountMode::Unfiltered,
        );
        assert_eq!(v.items.len(), 3);
        assert_eq!(v.total, 5);
    }

    #[test]
    fn adjusted_total_never_drops_below_visible_items() {
        let viewer = actor(Role::Teacher);
        let v = filter_for_viewer(
            &viewer,
            &lesson(Visibility::Private),
            page(&viewer),
            1,
            CountMode::PageAdjusted,
        );
        assert_eq!(v.total, 3);
    }

    #[rstest]
    #[case("page-adjusted", CountMode::PageAdjusted)]
    #[case("Unfiltered", CountMode::Unfiltered)]
    fn parses_count_mode(#[case] raw: &str, #[case] expected: CountMode) {
        assert_eq!(raw.parse::<CountMode>().unwrap(), expected);
        assert!("sometimes".parse::<CountMode>().is_err());
    }
}
