//! Locally-created ideas and memos for a guest (unauthenticated) session.
//!
//! Shapes and addressing match the server resources so callers can run
//! against either source; ids carry a `guest-` prefix the server never
//! issues. Migration reads these collections but never mutates them —
//! clearing after a successful migration is the caller's decision.

use crate::models::{Idea, IdeaDraft, IdeaPatch, Memo, MemoDraft};
use crate::storage::{
    load_json_from_storage, remove_from_storage, save_json_to_storage, GUEST_IDEAS_KEY,
    GUEST_MEMOS_KEY,
};
use crate::util::{local_id, now_iso};

pub fn list_guest_ideas() -> Vec<Idea> {
    load_json_from_storage::<Vec<Idea>>(GUEST_IDEAS_KEY).unwrap_or_default()
}

fn save_guest_ideas(ideas: &[Idea]) {
    save_json_to_storage(GUEST_IDEAS_KEY, &ideas);
}

pub fn create_guest_idea(draft: &IdeaDraft) -> Idea {
    let now = now_iso();
    let idea = Idea {
        id: local_id("guest"),
        title: draft.title.clone(),
        description: draft.description.clone(),
        category: draft.category.clone(),
        status: draft.status,
        priority: draft.priority,
        tags: draft.tags.clone(),
        created_at: now.clone(),
        updated_at: now,
    };

    let mut ideas = list_guest_ideas();
    ideas.push(idea.clone());
    save_guest_ideas(&ideas);

    idea
}

pub fn update_guest_idea(id: &str, patch: &IdeaPatch) -> Option<Idea> {
    let mut ideas = list_guest_ideas();
    let idea = ideas.iter_mut().find(|i| i.id == id)?;

    if let Some(title) = &patch.title {
        idea.title = title.clone();
    }
    if let Some(description) = &patch.description {
        idea.description = description.clone();
    }
    if let Some(category) = &patch.category {
        idea.category = category.clone();
    }
    if let Some(status) = patch.status {
        idea.status = status;
    }
    if let Some(priority) = patch.priority {
        idea.priority = priority;
    }
    if let Some(tags) = &patch.tags {
        idea.tags = tags.clone();
    }
    idea.updated_at = now_iso();

    let updated = idea.clone();
    save_guest_ideas(&ideas);
    Some(updated)
}

pub fn delete_guest_idea(id: &str) {
    let mut ideas = list_guest_ideas();
    let before = ideas.len();
    ideas.retain(|i| i.id != id);
    if ideas.len() != before {
        save_guest_ideas(&ideas);
    }
}

pub fn list_guest_memos() -> Vec<Memo> {
    load_json_from_storage::<Vec<Memo>>(GUEST_MEMOS_KEY).unwrap_or_default()
}

pub fn guest_memo_by_date(date: &str) -> Option<Memo> {
    list_guest_memos().into_iter().find(|m| m.date == date)
}

/// Create-or-update by date, the same contract as the server endpoint.
pub fn save_guest_memo(date: &str, content: &str) -> Memo {
    let mut memos = list_guest_memos();
    let now = now_iso();

    let memo = if let Some(pos) = memos.iter().position(|m| m.date == date) {
        let existing = &mut memos[pos];
        existing.content = content.to_string();
        existing.updated_at = now;
        existing.clone()
    } else {
        let memo = Memo {
            id: local_id("guest"),
            date: date.to_string(),
            content: content.to_string(),
            created_at: now.clone(),
            updated_at: now,
        };
        memos.push(memo.clone());
        memos.sort_by(|a, b| a.date.cmp(&b.date));
        memo
    };

    save_json_to_storage(GUEST_MEMOS_KEY, &memos);
    memo
}

pub fn delete_guest_memo(id: &str) {
    let mut memos = list_guest_memos();
    let before = memos.len();
    memos.retain(|m| m.id != id);
    if memos.len() != before {
        save_json_to_storage(GUEST_MEMOS_KEY, &memos);
    }
}

pub fn delete_guest_memo_by_date(date: &str) {
    let mut memos = list_guest_memos();
    let before = memos.len();
    memos.retain(|m| m.date != date);
    if memos.len() != before {
        save_json_to_storage(GUEST_MEMOS_KEY, &memos);
    }
}

/// Ordered migration inputs: ideas in creation order, memos in date order.
/// Reading leaves the stored copies untouched.
pub fn guest_migration_payload() -> (Vec<IdeaDraft>, Vec<MemoDraft>) {
    let ideas = list_guest_ideas()
        .into_iter()
        .map(|i| IdeaDraft {
            title: i.title,
            description: i.description,
            category: i.category,
            status: i.status,
            priority: i.priority,
            tags: i.tags,
        })
        .collect();

    let memos = list_guest_memos()
        .into_iter()
        .map(|m| MemoDraft {
            date: m.date,
            content: m.content,
        })
        .collect();

    (ideas, memos)
}

pub fn clear_guest_data() {
    remove_from_storage(GUEST_IDEAS_KEY);
    remove_from_storage(GUEST_MEMOS_KEY);
}
