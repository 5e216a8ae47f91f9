use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AppState, MessageResponse};
use crate::domain::{Report, ReportStatus};
use crate::error::Result;
use crate::metrics::track;

#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    pub description: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub post_id: Uuid,
    pub description: String,
    pub status: ReportStatus,
}

impl From<Report> for ReportResponse {
    fn from(report: Report) -> Self {
        Self {
            id: report.id,
            user_id: report.user_id,
            post_id: report.post_id,
            description: report.description,
            status: report.status,
        }
    }
}

/// Report a post; the reason comes from the `description` query parameter
pub async fn report_post(
    state: web::Data<AppState>,
    path: web::Path<(Uuid, Uuid)>,
    query: web::Query<ReportQuery>,
) -> Result<HttpResponse> {
    let (user_id, post_id) = path.into_inner();
    track(
        "report_post",
        state
            .reports
            .report_post(user_id, post_id, &query.description),
    )
    .await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Post reported successfully!")))
}

pub async fn get_post_reports(
    state: web::Data<AppState>,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let reports = track("get_post_reports", state.reports.get_post_reports(*post_id)).await?;
    let body: Vec<ReportResponse> = reports.into_iter().map(ReportResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}
