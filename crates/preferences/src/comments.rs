use std::sync::Arc;

use safeswap_shared::not_found;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{KeyValueStore, store};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub substitute_id: String,
    pub text: String,
    pub timestamp: u64,
}

#[derive(Validate)]
pub struct CommentInput {
    #[validate(length(min = 1, max = 2000))]
    pub text: String,
}

impl CommentInput {
    fn trimmed(text: &str) -> Self {
        Self {
            text: text.trim().to_owned(),
        }
    }
}

#[derive(Clone)]
pub struct Comments(Arc<dyn KeyValueStore>);

impl Comments {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self(store)
    }

    fn key(substitute_id: &str) -> String {
        format!("comments-{substitute_id}")
    }

    pub async fn list(&self, substitute_id: &str) -> anyhow::Result<Vec<Comment>> {
        store::load(self.0.as_ref(), &Self::key(substitute_id)).await
    }

    pub async fn add(&self, substitute_id: &str, text: &str) -> safeswap_shared::Result<Comment> {
        let input = CommentInput::trimmed(text);
        input.validate()?;

        let comment = Comment {
            id: ulid::Ulid::new().to_string(),
            substitute_id: substitute_id.to_owned(),
            text: input.text,
            timestamp: safeswap_shared::now_millis(),
        };

        store::modify(
            self.0.as_ref(),
            &Self::key(substitute_id),
            |comments: &mut Vec<Comment>| {
                comments.push(comment.clone());
                Some(())
            },
        )
        .await?;

        Ok(comment)
    }

    /// Replaces the text and refreshes the timestamp.
    pub async fn edit(
        &self,
        substitute_id: &str,
        comment_id: &str,
        text: &str,
    ) -> safeswap_shared::Result<Comment> {
        let input = CommentInput::trimmed(text);
        input.validate()?;

        let edited = store::modify(
            self.0.as_ref(),
            &Self::key(substitute_id),
            |comments: &mut Vec<Comment>| {
                let comment = comments.iter_mut().find(|c| c.id == comment_id)?;
                comment.text = input.text;
                comment.timestamp = safeswap_shared::now_millis();

                Some(comment.clone())
            },
        )
        .await?;

        match edited {
            Some(comment) => Ok(comment),
            None => not_found!("comment {comment_id}"),
        }
    }

    pub async fn delete(&self, substitute_id: &str, comment_id: &str) -> safeswap_shared::Result<()> {
        let deleted = store::modify(
            self.0.as_ref(),
            &Self::key(substitute_id),
            |comments: &mut Vec<Comment>| {
                let before = comments.len();
                comments.retain(|c| c.id != comment_id);

                (comments.len() < before).then_some(())
            },
        )
        .await?;

        if deleted.is_none() {
            not_found!("comment {comment_id}");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;

    #[tokio::test]
    async fn test_add_trims_and_rejects_empty() -> anyhow::Result<()> {
        let comments = Comments::new(Arc::new(MemoryStore::new()));

        let comment = comments.add("sub-1", "  great in pancakes \n").await?;
        assert_eq!(comment.text, "great in pancakes");

        let result = comments.add("sub-1", "   ").await;
        assert!(matches!(result, Err(safeswap_shared::Error::Validate(_))));

        assert_eq!(comments.list("sub-1").await?, vec![comment]);
        assert!(comments.list("sub-2").await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_edit_and_delete() -> anyhow::Result<()> {
        let comments = Comments::new(Arc::new(MemoryStore::new()));
        let first = comments.add("sub-1", "too sweet").await?;
        let second = comments.add("sub-1", "works").await?;

        let edited = comments.edit("sub-1", &first.id, " fine with less sugar ").await?;
        assert_eq!(edited.id, first.id);
        assert_eq!(edited.text, "fine with less sugar");
        assert!(edited.timestamp >= first.timestamp);

        let result = comments.edit("sub-1", "missing", "text").await;
        assert!(matches!(result, Err(safeswap_shared::Error::NotFound(_))));

        comments.delete("sub-1", &second.id).await?;
        let result = comments.delete("sub-1", &second.id).await;
        assert!(matches!(result, Err(safeswap_shared::Error::NotFound(_))));

        assert_eq!(comments.list("sub-1").await?, vec![edited]);

        Ok(())
    }
}
