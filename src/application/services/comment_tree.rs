//! Two-level comment tree assembly.
//!
//! Comments are stored flat. The tree is rebuilt on read by grouping replies
//! under their parent id; nesting never goes deeper than one reply level.

use std::collections::HashMap;

use uuid::Uuid;

use crate::application::access::rules::{self, CreatorFacts, OwnedNode, Subject};
use crate::application::access::AccessGuard;
use crate::application::context::RequestContext;
use crate::application::dto::discussions::{CommentResponse, CommentTree};
use crate::application::error::DiscussionResult;
use crate::application::ports::class_membership_port::ClassMembershipPort;
use crate::application::ports::role_provider::RoleProvider;
use crate::application::ports::user_repository::UserRepository;
use crate::domain::discussions::Comment;
use crate::domain::users::Actor;

pub struct CommentTreeAssembler<'g, 'a, U, R, C>
where
    U: UserRepository + ?Sized,
    R: RoleProvider + ?Sized,
    C: ClassMembershipPort + ?Sized,
{
    pub guard: &'g AccessGuard<'a, U, R, C>,
    /// One creator lookup per distinct author instead of one per comment.
    pub memoize_lookups: bool,
}

impl<'g, 'a, U, R, C> CommentTreeAssembler<'g, 'a, U, R, C>
where
    U: UserRepository + ?Sized,
    R: RoleProvider + ?Sized,
    C: ClassMembershipPort + ?Sized,
{
    pub async fn build(
        &self,
        ctx: &RequestContext,
        actor: &Actor,
        comments: &[Comment],
    ) -> DiscussionResult<CommentTree> {
        let facts = self.creator_facts(ctx, actor, comments).await?;
        Ok(assemble(comments, actor, &facts))
    }

    async fn creator_facts(
        &self,
        ctx: &RequestContext,
        actor: &Actor,
        comments: &[Comment],
    ) -> DiscussionResult<HashMap<Uuid, CreatorFacts>> {
        let mut facts = HashMap::new();
        let mut lookups = 0usize;
        for comment in comments {
            if self.memoize_lookups && facts.contains_key(&comment.created_by) {
                continue;
            }
            let found = self
                .guard
                .creator_facts_lenient(ctx, actor, comment.created_by)
                .await?;
            lookups += 1;
            facts.insert(comment.created_by, found);
        }
        tracing::trace!(comments = comments.len(), lookups, "comment_tree_creator_lookups");
        Ok(facts)
    }
}

/// Builds the tree from already-resolved creator facts. Pure.
///
/// Replies whose parent is not part of `comments` are left out.
pub fn assemble(
    comments: &[Comment],
    actor: &Actor,
    facts: &HashMap<Uuid, CreatorFacts>,
) -> CommentTree {
    let mut top_level: Vec<&Comment> = Vec::new();
    let mut replies_by_parent: HashMap<Uuid, Vec<&Comment>> = HashMap::new();
    for comment in comments {
        match comment.parent_comment_id {
            None => top_level.push(comment),
            Some(parent) => replies_by_parent.entry(parent).or_default().push(comment),
        }
    }
    sort_chronologically(&mut top_level);

    let mut reply_total = 0u64;
    let nodes = top_level
        .into_iter()
        .map(|comment| {
            let mut replies = replies_by_parent.remove(&comment.id).unwrap_or_default();
            sort_chronologically(&mut replies);
            let reply_nodes: Vec<CommentResponse> = replies
                .into_iter()
                .map(|reply| node(reply, actor, facts, 0))
                .collect();
            let reply_count = reply_nodes.len() as u64;
            reply_total += reply_count;
            let mut top = node(comment, actor, facts, reply_count);
            top.reply_count = reply_count;
            top.replies = reply_nodes;
            top
        })
        .collect::<Vec<_>>();

    CommentTree {
        comment_count: nodes.len() as u64 + reply_total,
        comments: nodes,
    }
}

// Ties on the timestamp fall back to the id so the order never depends on
// the input order.
fn sort_chronologically(comments: &mut [&Comment]) {
    comments.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
}

fn node(
    comment: &Comment,
    actor: &Actor,
    facts: &HashMap<Uuid, CreatorFacts>,
    active_children: u64,
) -> CommentResponse {
    let creator = facts
        .get(&comment.created_by)
        .copied()
        .unwrap_or_else(CreatorFacts::unknown);
    let owned = OwnedNode {
        subject: Subject::Comment,
        created_by: comment.created_by,
        active_children,
    };
    let mut response = CommentResponse::from_comment(comment, creator.role);
    response.can_update = rules::can_update(actor, &owned).is_ok();
    response.can_delete = rules::can_delete(actor, &owned, Some(&creator)).is_ok();
    response
}
