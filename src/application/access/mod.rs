use uuid::Uuid;

use crate::application::context::RequestContext;
use crate::application::error::{DiscussionError, DiscussionResult, ErrorCode};
use crate::application::ports::class_membership_port::ClassMembershipPort;
use crate::application::ports::role_provider::RoleProvider;
use crate::application::ports::user_repository::UserRepository;
use crate::domain::lessons::ContentItem;
use crate::domain::users::{Actor, Role};

pub mod relationship;
pub mod rules;

pub use relationship::RelationshipResolver;
pub use rules::{CreatorFacts, OwnedNode, Subject};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    View,
    Update,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeView {
    pub creator_role: Role,
    pub can_update: bool,
    pub can_delete: bool,
}

// Presentation layer is responsible for authenticating the caller; the guard
// only ever sees the actor id carried by the request context.

/// Authorization checks for questions and comments on a lesson.
pub struct AccessGuard<'a, U, R, C>
where
    U: UserRepository + ?Sized,
    R: RoleProvider + ?Sized,
    C: ClassMembershipPort + ?Sized,
{
    pub users: &'a U,
    pub roles: &'a R,
    pub classes: &'a C,
}

impl<'a, U, R, C> AccessGuard<'a, U, R, C>
where
    U: UserRepository + ?Sized,
    R: RoleProvider + ?Sized,
    C: ClassMembershipPort + ?Sized,
{
    pub async fn load_actor(&self, ctx: &RequestContext) -> DiscussionResult<Actor> {
        let user = ctx
            .step(self.users.find_by_id(ctx.actor_id))
            .await?
            .ok_or(ErrorCode::UserNotFound)?;
        let role = self.resolve_role(ctx, user.id).await?;
        Ok(Actor::new(user, role))
    }

    pub async fn resolve_role(&self, ctx: &RequestContext, user_id: Uuid) -> DiscussionResult<Role> {
        let labels = ctx.step(self.roles.roles_for(user_id)).await?;
        Ok(Role::resolve(&labels))
    }

    pub async fn check_create_question(
        &self,
        ctx: &RequestContext,
        actor: &Actor,
        item: &ContentItem,
    ) -> DiscussionResult<()> {
        if !actor.role.is_known() {
            return Err(ErrorCode::InsufficientPermission.into());
        }
        ensure_active(item)?;
        ensure_tenant(actor, item)?;
        if actor.role == Role::Student {
            self.ensure_student_reach(ctx, actor, item).await?;
        }
        ensure_approved(item)
    }

    /// Whether the actor may see discussions attached to `item` at all.
    pub async fn is_question_accessible(
        &self,
        ctx: &RequestContext,
        actor: &Actor,
        item: &ContentItem,
    ) -> DiscussionResult<bool> {
        match actor.role {
            Role::SystemAdmin => Ok(true),
            Role::SchoolAdmin | Role::Teacher | Role::ContentModerator => {
                Ok(actor.school_id().is_some() && item.belongs_to_school(actor.school_id()))
            }
            Role::Student => {
                if !ctx
                    .step(self.classes.is_enrolled_in_any_class(actor.id()))
                    .await?
                {
                    return Ok(false);
                }
                self.student_reaches(ctx, actor, item).await
            }
            Role::Unknown => Ok(false),
        }
    }

    /// Inaccessible questions are reported as missing so their existence
    /// is not confirmed to the caller.
    pub async fn check_view_question(
        &self,
        ctx: &RequestContext,
        actor: &Actor,
        item: &ContentItem,
    ) -> DiscussionResult<()> {
        if !self.is_question_accessible(ctx, actor, item).await? {
            tracing::debug!(actor_id = %actor.id(), content_item_id = %item.id, role = %actor.role, "question_hidden_from_actor");
            return Err(ErrorCode::QuestionNotFound.into());
        }
        check_content_state(actor, item)
    }

    pub async fn check_list_questions(
        &self,
        ctx: &RequestContext,
        actor: &Actor,
        item: &ContentItem,
    ) -> DiscussionResult<()> {
        if !actor.role.is_known() {
            return Err(ErrorCode::InsufficientPermission.into());
        }
        check_content_state(actor, item)?;
        match actor.role {
            Role::Student => self.ensure_student_reach(ctx, actor, item).await,
            Role::Teacher => self.ensure_teacher_reach(ctx, actor, item).await,
            Role::ContentModerator | Role::SchoolAdmin | Role::SystemAdmin | Role::Unknown => Ok(()),
        }
    }

    /// Single entry point for operations on an existing question or comment.
    pub async fn authorize(
        &self,
        ctx: &RequestContext,
        actor: &Actor,
        op: Operation,
        item: &ContentItem,
        node: &OwnedNode,
    ) -> DiscussionResult<()> {
        match op {
            Operation::View => self.check_view_question(ctx, actor, item).await,
            Operation::Update => {
                check_content_state(actor, item)?;
                rules::can_update(actor, node).map_err(DiscussionError::from)
            }
            Operation::Delete => {
                check_content_state(actor, item)?;
                let creator = if rules::needs_creator_facts(actor, node) {
                    Some(self.creator_facts(ctx, actor, node.created_by).await?)
                } else {
                    None
                };
                rules::can_delete(actor, node, creator.as_ref()).map_err(DiscussionError::from)
            }
        }
    }

    /// Loads what the delete rule needs about a creator. Lookup failures
    /// propagate.
    pub async fn creator_facts(
        &self,
        ctx: &RequestContext,
        actor: &Actor,
        creator_id: Uuid,
    ) -> DiscussionResult<CreatorFacts> {
        let Some(creator) = ctx.step(self.users.find_by_id(creator_id)).await? else {
            return Ok(CreatorFacts::unknown());
        };
        let role = self.resolve_role(ctx, creator_id).await?;
        let under_actor_authority = if rules::staff_may_moderate(actor, role, creator.school_id) {
            self.relationship()
                .teacher_owns_authority_over_student(ctx, actor.id(), creator_id)
                .await?
        } else {
            false
        };
        Ok(CreatorFacts {
            role,
            school_id: creator.school_id,
            under_actor_authority,
        })
    }

    /// Same as [`Self::creator_facts`], but an unresolvable creator degrades
    /// to `Unknown` instead of failing. Cancellation still propagates.
    pub async fn creator_facts_lenient(
        &self,
        ctx: &RequestContext,
        actor: &Actor,
        creator_id: Uuid,
    ) -> DiscussionResult<CreatorFacts> {
        let creator = degrade(
            ctx.step(self.users.find_by_id(creator_id)).await,
            None,
            "creator_lookup_failed",
            creator_id,
        )?;
        let Some(creator) = creator else {
            return Ok(CreatorFacts::unknown());
        };
        let role = degrade(
            self.resolve_role(ctx, creator_id).await,
            Role::Unknown,
            "creator_role_lookup_failed",
            creator_id,
        )?;
        let under_actor_authority = if rules::staff_may_moderate(actor, role, creator.school_id) {
            degrade(
                self.relationship()
                    .teacher_owns_authority_over_student(ctx, actor.id(), creator_id)
                    .await,
                false,
                "creator_relationship_lookup_failed",
                creator_id,
            )?
        } else {
            false
        };
        Ok(CreatorFacts {
            role,
            school_id: creator.school_id,
            under_actor_authority,
        })
    }

    /// Creator role and permission flags of a node as presented to the actor.
    /// Built from lenient creator facts, so it never fails on a lookup.
    pub async fn describe(
        &self,
        ctx: &RequestContext,
        actor: &Actor,
        node: &OwnedNode,
    ) -> DiscussionResult<NodeView> {
        let creator = if actor.is(node.created_by) {
            CreatorFacts {
                role: actor.role,
                school_id: actor.school_id(),
                under_actor_authority: false,
            }
        } else {
            self.creator_facts_lenient(ctx, actor, node.created_by).await?
        };
        Ok(NodeView {
            creator_role: creator.role,
            can_update: rules::can_update(actor, node).is_ok(),
            can_delete: rules::can_delete(actor, node, Some(&creator)).is_ok(),
        })
    }

    fn relationship(&self) -> RelationshipResolver<'a, C> {
        RelationshipResolver {
            classes: self.classes,
        }
    }

    async fn student_reaches(
        &self,
        ctx: &RequestContext,
        actor: &Actor,
        item: &ContentItem,
    ) -> DiscussionResult<bool> {
        if ctx
            .step(self.classes.has_access_to_material(actor.id(), item.id))
            .await?
        {
            return Ok(true);
        }
        ctx.step(self.classes.material_in_student_folders(actor.id(), item.id))
            .await
    }

    async fn ensure_student_reach(
        &self,
        ctx: &RequestContext,
        actor: &Actor,
        item: &ContentItem,
    ) -> DiscussionResult<()> {
        if !ctx
            .step(self.classes.is_enrolled_in_any_class(actor.id()))
            .await?
        {
            return Err(ErrorCode::StudentNotEnrolledInAnyClass.into());
        }
        if !self.student_reaches(ctx, actor, item).await? {
            return Err(ErrorCode::CannotCreateQuestionForLessonNotAccessible.into());
        }
        Ok(())
    }

    async fn ensure_teacher_reach(
        &self,
        ctx: &RequestContext,
        actor: &Actor,
        item: &ContentItem,
    ) -> DiscussionResult<()> {
        if actor.is(item.created_by) {
            return Ok(());
        }
        if !ctx
            .step(self.classes.teacher_has_active_class(actor.id()))
            .await?
        {
            return Err(ErrorCode::TeacherMustHaveActiveClass.into());
        }
        if !ctx
            .step(self.classes.teacher_has_access_to_material(actor.id(), item.id))
            .await?
        {
            return Err(ErrorCode::TeacherNotHaveAccessToMaterial.into());
        }
        Ok(())
    }
}

/// Active, inside the actor's tenant, approved; in that order.
pub fn check_content_state(actor: &Actor, item: &ContentItem) -> DiscussionResult<()> {
    ensure_active(item)?;
    ensure_tenant(actor, item)?;
    ensure_approved(item)
}

fn ensure_active(item: &ContentItem) -> DiscussionResult<()> {
    if item.is_active() {
        Ok(())
    } else {
        Err(ErrorCode::LessonMaterialNotActive.into())
    }
}

fn ensure_approved(item: &ContentItem) -> DiscussionResult<()> {
    if item.is_approved() {
        Ok(())
    } else {
        Err(ErrorCode::CannotCreateQuestionForPendingLesson.into())
    }
}

fn ensure_tenant(actor: &Actor, item: &ContentItem) -> DiscussionResult<()> {
    match actor.role {
        Role::SystemAdmin => Ok(()),
        Role::SchoolAdmin | Role::Teacher | Role::ContentModerator => {
            if actor.school_id().is_none() {
                return Err(ErrorCode::UserNotPartOfSchool.into());
            }
            if !item.belongs_to_school(actor.school_id()) {
                return Err(ErrorCode::CannotCreateQuestionForLessonNotInYourSchool.into());
            }
            Ok(())
        }
        // Students reach material through their classes; a school affiliation,
        // when present, must still match.
        Role::Student => {
            if actor.school_id().is_some() && !item.belongs_to_school(actor.school_id()) {
                return Err(ErrorCode::CannotCreateQuestionForLessonNotInYourSchool.into());
            }
            Ok(())
        }
        Role::Unknown => Err(ErrorCode::InsufficientPermission.into()),
    }
}

fn degrade<T>(
    res: DiscussionResult<T>,
    fallback: T,
    event: &'static str,
    creator_id: Uuid,
) -> DiscussionResult<T> {
    match res {
        Ok(v) => Ok(v),
        Err(DiscussionError::Cancelled) => Err(DiscussionError::Cancelled),
        Err(e) => {
            tracing::warn!(creator_id = %creator_id, lookup = event, error = ?e, "creator_lookup_degraded");
            Ok(fallback)
        }
    }
}
