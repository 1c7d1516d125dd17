use async_trait::async_trait;
use uuid::Uuid;

use crate::application::ports::unit_of_work::UnitOfWork;
use crate::domain::discussions::{Comment, Question};

use super::store::{JournalEntry, MemoryStore, State};

#[derive(Debug, Clone)]
enum Op {
    PutQuestion { question: Question, insert: bool },
    DeleteQuestion(Uuid),
    PutComment { comment: Comment, insert: bool },
    DeleteComment(Uuid),
}

/// Buffers writes and applies them to a copy of the store state on commit.
/// The copy replaces the live state only if every write applied cleanly and
/// the result is referentially sound.
pub struct MemoryUnitOfWork {
    store: MemoryStore,
    ops: Vec<Op>,
}

impl MemoryUnitOfWork {
    pub(crate) fn new(store: MemoryStore) -> Self {
        Self {
            store,
            ops: Vec::new(),
        }
    }

    async fn stage(&mut self, op: Op, entry: JournalEntry) {
        self.ops.push(op);
        self.store.record(entry).await;
    }
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    async fn add_question(&mut self, question: &Question) -> anyhow::Result<()> {
        let entry = JournalEntry::Added(question.id);
        self.stage(
            Op::PutQuestion {
                question: question.clone(),
                insert: true,
            },
            entry,
        )
        .await;
        Ok(())
    }

    async fn update_question(&mut self, question: &Question) -> anyhow::Result<()> {
        let entry = JournalEntry::Updated(question.id);
        self.stage(
            Op::PutQuestion {
                question: question.clone(),
                insert: false,
            },
            entry,
        )
        .await;
        Ok(())
    }

    async fn remove_question(&mut self, id: Uuid) -> anyhow::Result<()> {
        self.stage(Op::DeleteQuestion(id), JournalEntry::Removed(id)).await;
        Ok(())
    }

    async fn add_comment(&mut self, comment: &Comment) -> anyhow::Result<()> {
        let entry = JournalEntry::Added(comment.id);
        self.stage(
            Op::PutComment {
                comment: comment.clone(),
                insert: true,
            },
            entry,
        )
        .await;
        Ok(())
    }

    async fn update_comment(&mut self, comment: &Comment) -> anyhow::Result<()> {
        let entry = JournalEntry::Updated(comment.id);
        self.stage(
            Op::PutComment {
                comment: comment.clone(),
                insert: false,
            },
            entry,
        )
        .await;
        Ok(())
    }

    async fn remove_comment(&mut self, id: Uuid) -> anyhow::Result<()> {
        self.stage(Op::DeleteComment(id), JournalEntry::Removed(id)).await;
        Ok(())
    }

    async fn commit(self: Box<Self>) -> anyhow::Result<u64> {
        if self.store.faults.read().await.commits {
            anyhow::bail!("commit rejected by the store");
        }
        let mut live = self.store.state.write().await;
        let mut next = live.clone();
        for op in &self.ops {
            apply(&mut next, op)?;
        }
        check_integrity(&next)?;
        *live = next;
        drop(live);

        let rows = self.ops.len() as u64;
        self.store.record(JournalEntry::Committed { rows }).await;
        Ok(rows)
    }

    async fn rollback(self: Box<Self>) -> anyhow::Result<()> {
        self.store.record(JournalEntry::RolledBack).await;
        Ok(())
    }
}

fn apply(state: &mut State, op: &Op) -> anyhow::Result<()> {
    match op {
        Op::PutQuestion { question, insert } => {
            let exists = state.questions.contains_key(&question.id);
            if *insert && exists {
                anyhow::bail!("question {} already exists", question.id);
            }
            if !*insert && !exists {
                anyhow::bail!("question {} does not exist", question.id);
            }
            state.questions.insert(question.id, question.clone());
        }
        Op::DeleteQuestion(id) => {
            state
                .questions
                .remove(id)
                .ok_or_else(|| anyhow::anyhow!("question {id} does not exist"))?;
        }
        Op::PutComment { comment, insert } => {
            let exists = state.comments.contains_key(&comment.id);
            if *insert && exists {
                anyhow::bail!("comment {} already exists", comment.id);
            }
            if !*insert && !exists {
                anyhow::bail!("comment {} does not exist", comment.id);
            }
            state.comments.insert(comment.id, comment.clone());
        }
        Op::DeleteComment(id) => {
            state
                .comments
                .remove(id)
                .ok_or_else(|| anyhow::anyhow!("comment {id} does not exist"))?;
        }
    }
    Ok(())
}

// Rows that would dangle after the commit make the whole commit fail, like a
// foreign key violation would.
fn check_integrity(state: &State) -> anyhow::Result<()> {
    for question in state.questions.values() {
        if !state.content_items.contains_key(&question.content_item_id) {
            anyhow::bail!(
                "question {} references missing content item {}",
                question.id,
                question.content_item_id
            );
        }
    }
    for comment in state.comments.values() {
        if !state.questions.contains_key(&comment.question_id) {
            anyhow::bail!(
                "comment {} references missing question {}",
                comment.id,
                comment.question_id
            );
        }
        if let Some(parent_id) = comment.parent_comment_id {
            match state.comments.get(&parent_id) {
                Some(parent) if parent.question_id == comment.question_id => {}
                Some(_) => anyhow::bail!(
                    "comment {} replies to {} of another question",
                    comment.id,
                    parent_id
                ),
                None => anyhow::bail!(
                    "comment {} references missing parent {}",
                    comment.id,
                    parent_id
                ),
            }
        }
    }
    Ok(())
}
