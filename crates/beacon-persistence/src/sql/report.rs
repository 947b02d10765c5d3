//! Report storage and the latest-per-user aggregation

use async_trait::async_trait;
use sea_orm::{
    prelude::Expr,
    sea_query::{Alias, Query},
    *,
};

use super::ExternalDbPersistService;
use crate::entity::report;
use crate::model::{NewReport, Page, ReportInfo, page_offset};
use crate::traits::ReportPersistence;

fn report_to_info(model: report::Model) -> ReportInfo {
    ReportInfo {
        id: model.id,
        project_id: model.project_id,
        username: model.username,
        ip: model.ip,
        timestamp: model.reported_at.and_utc(),
        version: model.version,
        remark: model.remark,
        device_info: model.device_info,
        user_agent: model.user_agent,
        location: model.location,
        additional_data: model
            .additional_data
            .and_then(|raw| serde_json::from_str(&raw).ok()),
    }
}

/// Rows of the same project and username that are more recent than the
/// outer `report` row, by `(reported_at, id)`.
fn newer_report_of_same_user() -> sea_orm::sea_query::SelectStatement {
    let newer = Alias::new("newer");

    Query::select()
        .expr(Expr::cust("1"))
        .from_as(report::Entity, newer.clone())
        .cond_where(
            Condition::all()
                .add(
                    Expr::col((newer.clone(), report::Column::ProjectId))
                        .equals((report::Entity, report::Column::ProjectId)),
                )
                .add(
                    Expr::col((newer.clone(), report::Column::Username))
                        .equals((report::Entity, report::Column::Username)),
                )
                .add(
                    Condition::any()
                        .add(
                            Expr::col((newer.clone(), report::Column::ReportedAt))
                                .gt(Expr::col((report::Entity, report::Column::ReportedAt))),
                        )
                        .add(
                            Condition::all()
                                .add(
                                    Expr::col((newer.clone(), report::Column::ReportedAt))
                                        .equals((report::Entity, report::Column::ReportedAt)),
                                )
                                .add(
                                    Expr::col((newer, report::Column::Id))
                                        .gt(Expr::col((report::Entity, report::Column::Id))),
                                ),
                        ),
                ),
        )
        .to_owned()
}

#[async_trait]
impl ReportPersistence for ExternalDbPersistService {
    async fn report_create(&self, report: NewReport) -> anyhow::Result<ReportInfo> {
        let additional_data = match report.additional_data {
            Some(value) => Some(serde_json::to_string(&value)?),
            None => None,
        };

        let entity = report::ActiveModel {
            project_id: Set(report.project_id),
            username: Set(report.username),
            ip: Set(report.ip),
            reported_at: Set(report.timestamp.naive_utc()),
            version: Set(report.version),
            remark: Set(report.remark),
            device_info: Set(report.device_info),
            user_agent: Set(report.user_agent),
            location: Set(report.location),
            additional_data: Set(additional_data),
            ..Default::default()
        };

        let model = entity.insert(&self.db).await?;

        Ok(report_to_info(model))
    }

    async fn report_find_by_id(&self, id: i64) -> anyhow::Result<Option<ReportInfo>> {
        Ok(report::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(report_to_info))
    }

    async fn report_delete(&self, id: i64) -> anyhow::Result<bool> {
        let result = report::Entity::delete_by_id(id).exec(&self.db).await?;

        Ok(result.rows_affected > 0)
    }

    async fn report_latest_per_user(
        &self,
        project_id: &str,
        page_no: u64,
        page_size: u64,
    ) -> anyhow::Result<Page<ReportInfo>> {
        let total_count = report::Entity::find()
            .select_only()
            .column_as(Expr::col(report::Column::Username).count_distinct(), "count")
            .filter(report::Column::ProjectId.eq(project_id))
            .filter(report::Column::Username.ne(""))
            .into_tuple::<i64>()
            .one(&self.db)
            .await?
            .unwrap_or_default() as u64;

        if total_count == 0 {
            return Ok(Page::new(0, page_no, page_size, Vec::new()));
        }

        let page_items = report::Entity::find()
            .filter(report::Column::ProjectId.eq(project_id))
            .filter(report::Column::Username.ne(""))
            .filter(Expr::exists(newer_report_of_same_user()).not())
            .order_by_desc(report::Column::ReportedAt)
            .order_by_desc(report::Column::Id)
            .offset(page_offset(page_no, page_size))
            .limit(page_size)
            .all(&self.db)
            .await?
            .into_iter()
            .map(report_to_info)
            .collect();

        Ok(Page::new(total_count, page_no, page_size, page_items))
    }

    async fn report_user_history(
        &self,
        project_id: &str,
        username: &str,
        page_no: u64,
        page_size: u64,
    ) -> anyhow::Result<Page<ReportInfo>> {
        let query = report::Entity::find()
            .filter(report::Column::ProjectId.eq(project_id))
            .filter(report::Column::Username.eq(username));

        let total_count = query.clone().count(&self.db).await?;

        if total_count == 0 {
            return Ok(Page::new(0, page_no, page_size, Vec::new()));
        }

        let page_items = query
            .order_by_desc(report::Column::ReportedAt)
            .order_by_desc(report::Column::Id)
            .offset(page_offset(page_no, page_size))
            .limit(page_size)
            .all(&self.db)
            .await?
            .into_iter()
            .map(report_to_info)
            .collect();

        Ok(Page::new(total_count, page_no, page_size, page_items))
    }
}
