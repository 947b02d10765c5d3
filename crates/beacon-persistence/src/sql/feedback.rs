//! Feedback threads and their reply history

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::*;

use super::ExternalDbPersistService;
use crate::entity::{feedback, feedback_reply};
use crate::model::{
    FeedbackInfo, FeedbackReply, FeedbackStatus, NewFeedback, NewReply, Page, page_offset,
};
use crate::traits::FeedbackPersistence;

fn feedback_to_info(model: feedback::Model, replies: Vec<feedback_reply::Model>) -> FeedbackInfo {
    FeedbackInfo {
        id: model.id,
        project_id: model.project_id,
        username: model.username,
        email: model.email,
        content: model.content,
        ip: model.ip,
        timestamp: model.created_at.and_utc(),
        updated_at: model.updated_at.and_utc(),
        status: model.status.parse().unwrap_or_default(),
        reply_input: model.reply_input,
        reply_history: replies
            .into_iter()
            .map(|reply| FeedbackReply {
                content: reply.content,
                time: reply.time.and_utc(),
                admin: reply.admin,
            })
            .collect(),
    }
}

/// Replies of the given threads grouped by thread, newest first
async fn find_replies<C: ConnectionTrait>(
    db: &C,
    feedback_ids: Vec<i64>,
) -> anyhow::Result<HashMap<i64, Vec<feedback_reply::Model>>> {
    if feedback_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let replies = feedback_reply::Entity::find()
        .filter(feedback_reply::Column::FeedbackId.is_in(feedback_ids))
        .order_by_desc(feedback_reply::Column::Time)
        .order_by_desc(feedback_reply::Column::Id)
        .all(db)
        .await?;

    let mut grouped: HashMap<i64, Vec<feedback_reply::Model>> = HashMap::new();
    for reply in replies {
        grouped.entry(reply.feedback_id).or_default().push(reply);
    }

    Ok(grouped)
}

#[async_trait]
impl FeedbackPersistence for ExternalDbPersistService {
    async fn feedback_create(&self, feedback: NewFeedback) -> anyhow::Result<FeedbackInfo> {
        let now = Utc::now().naive_utc();

        let entity = feedback::ActiveModel {
            project_id: Set(feedback.project_id),
            username: Set(feedback.username),
            email: Set(feedback.email),
            content: Set(feedback.content),
            ip: Set(feedback.ip),
            status: Set(FeedbackStatus::Pending.as_str().to_string()),
            reply_input: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = entity.insert(&self.db).await?;

        Ok(feedback_to_info(model, Vec::new()))
    }

    async fn feedback_find_by_id(&self, id: i64) -> anyhow::Result<Option<FeedbackInfo>> {
        let Some(model) = feedback::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let mut replies = find_replies(&self.db, vec![model.id]).await?;
        let history = replies.remove(&model.id).unwrap_or_default();

        Ok(Some(feedback_to_info(model, history)))
    }

    async fn feedback_search_page(
        &self,
        project_id: &str,
        page_no: u64,
        page_size: u64,
    ) -> anyhow::Result<Page<FeedbackInfo>> {
        let query = feedback::Entity::find().filter(feedback::Column::ProjectId.eq(project_id));

        let total_count = query.clone().count(&self.db).await?;

        if total_count == 0 {
            return Ok(Page::new(0, page_no, page_size, Vec::new()));
        }

        let models = query
            .order_by_desc(feedback::Column::CreatedAt)
            .order_by_desc(feedback::Column::Id)
            .offset(page_offset(page_no, page_size))
            .limit(page_size)
            .all(&self.db)
            .await?;

        let mut replies = find_replies(&self.db, models.iter().map(|m| m.id).collect()).await?;

        let page_items = models
            .into_iter()
            .map(|model| {
                let history = replies.remove(&model.id).unwrap_or_default();
                feedback_to_info(model, history)
            })
            .collect();

        Ok(Page::new(total_count, page_no, page_size, page_items))
    }

    async fn feedback_update(
        &self,
        id: i64,
        status: Option<FeedbackStatus>,
        reply: Option<NewReply>,
    ) -> anyhow::Result<Option<FeedbackInfo>> {
        let tx = self.db.begin().await?;

        let Some(model) = feedback::Entity::find_by_id(id).one(&tx).await? else {
            return Ok(None);
        };

        let mut entity: feedback::ActiveModel = model.into();
        entity.updated_at = Set(Utc::now().naive_utc());

        if let Some(status) = status {
            entity.status = Set(status.as_str().to_string());
        }

        if let Some(reply) = reply {
            entity.reply_input = Set(Some(reply.content.clone()));

            feedback_reply::ActiveModel {
                feedback_id: Set(id),
                content: Set(reply.content),
                admin: Set(reply.admin),
                time: Set(reply.time.naive_utc()),
                ..Default::default()
            }
            .insert(&tx)
            .await?;
        }

        let model = entity.update(&tx).await?;
        let mut replies = find_replies(&tx, vec![id]).await?;

        tx.commit().await?;

        Ok(Some(feedback_to_info(
            model,
            replies.remove(&id).unwrap_or_default(),
        )))
    }

    async fn feedback_delete(&self, id: i64) -> anyhow::Result<bool> {
        let tx = self.db.begin().await?;

        feedback_reply::Entity::delete_many()
            .filter(feedback_reply::Column::FeedbackId.eq(id))
            .exec(&tx)
            .await?;

        let result = feedback::Entity::delete_by_id(id).exec(&tx).await?;

        tx.commit().await?;

        Ok(result.rows_affected > 0)
    }
}
