use std::sync::Arc;
use uuid::Uuid;

use super::{require_post, require_user};
use crate::domain::Report;
use crate::error::Result;
use crate::repository::SocialGraphRepository;
use crate::validators::require_not_blank;

/// Report service - users flagging posts for moderation
#[derive(Clone)]
pub struct ReportService {
    repo: Arc<dyn SocialGraphRepository>,
}

impl ReportService {
    pub fn new(repo: Arc<dyn SocialGraphRepository>) -> Self {
        Self { repo }
    }

    /// File a report; new reports start out PENDING
    pub async fn report_post(&self, user_id: Uuid, post_id: Uuid, description: &str) -> Result<Report> {
        require_not_blank("Description", description)?;
        require_user(self.repo.as_ref(), user_id).await?;
        require_post(self.repo.as_ref(), post_id).await?;

        let report = self
            .repo
            .insert_report(&Report::pending(user_id, post_id, description))
            .await?;

        tracing::info!(report_id = %report.id, post_id = %post_id, user_id = %user_id, "Post reported");
        Ok(report)
    }

    pub async fn get_post_reports(&self, post_id: Uuid) -> Result<Vec<Report>> {
        require_post(self.repo.as_ref(), post_id).await?;
        Ok(self.repo.find_reports_by_post(post_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Post, ReportStatus, User};
    use crate::error::AppError;
    use crate::repository::InMemorySocialGraphRepository;

    async fn setup() -> (ReportService, User, Post) {
        let repo = Arc::new(InMemorySocialGraphRepository::new());
        let alice = repo.create_user(&User::new("alice", None)).await.unwrap();
        let post = repo
            .insert_post(&Post::new(&alice, "buy cheap watches", None))
            .await
            .unwrap();
        (ReportService::new(repo), alice, post)
    }

    #[tokio::test]
    async fn test_report_starts_pending() {
        let (reports, alice, post) = setup().await;
        let report = reports.report_post(alice.id, post.id, "spam").await.unwrap();

        assert_eq!(report.status, ReportStatus::Pending);
        assert_eq!(report.description, "spam");

        let listed = reports.get_post_reports(post.id).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, report.id);
    }

    #[tokio::test]
    async fn test_report_requires_existing_post() {
        let (reports, alice, _) = setup().await;
        let err = reports
            .report_post(alice.id, Uuid::new_v4(), "spam")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_report_requires_description() {
        let (reports, alice, post) = setup().await;
        let err = reports.report_post(alice.id, post.id, " ").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
