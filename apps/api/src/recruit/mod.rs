// Recruiting assistant.
// Flow: upload → extract → chunk → embed/index → search → view | summarize | ask | email.
// Chat completions and embeddings go through llm_client; mail through mailer.

pub mod assistant;
pub mod chunk_store;
pub mod chunker;
pub mod extract;
pub mod handlers;
pub mod ingest;
pub mod mailer;
pub mod prompts;
pub mod search;
pub mod vector_store;
pub mod workspace;

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::config::ChunkingConfig;
use crate::errors::AppError;
use crate::llm_client::{Embedder, LanguageModel};
use extract::{extract_or_inline_error, DocumentKind};
use ingest::IngestReport;
use mailer::{extract_email, EmailOutcome, Mailer};
use prompts::{SHORTLIST_BODY, SHORTLIST_SUBJECT};
use vector_store::VectorIndex;
use workspace::{sanitize_file_name, Workspace};

pub const UNSUPPORTED_FILE: &str = "Unsupported file type.";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("vector store error: {0}")]
    Vector(#[from] qdrant_client::QdrantError),
}

/// Pre-filled shortlisting email offered alongside a CV.
#[derive(Debug, Clone, Serialize)]
pub struct EmailDraft {
    pub to: String,
    pub subject: &'static str,
    pub body: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct CvView {
    pub file_name: String,
    pub content: String,
    pub downloadable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<EmailDraft>,
}

/// A stored CV, ready to hand back for download.
#[derive(Debug)]
pub struct CvFile {
    pub file_name: String,
    pub kind: DocumentKind,
    pub bytes: Vec<u8>,
}

/// Everything Pipeline B needs, built once at startup.
pub struct RecruitDesk {
    pub workspace: Workspace,
    pub chunking: ChunkingConfig,
    pub llm: Arc<dyn LanguageModel>,
    pub embedder: Arc<dyn Embedder>,
    pub store: Arc<dyn VectorIndex>,
    pub mailer: Mailer,
}

impl RecruitDesk {
    /// Stores an upload in the working directory and returns its stored name.
    pub async fn upload(&self, raw_name: &str, bytes: &[u8]) -> Result<String, AppError> {
        let file_name = sanitize_file_name(raw_name)
            .ok_or_else(|| AppError::Validation(format!("Invalid file name: {raw_name}")))?;
        if DocumentKind::from_file_name(&file_name).is_none() {
            return Err(AppError::Validation(format!(
                "{file_name}: only .pdf and .docx files are accepted"
            )));
        }
        self.workspace.save(&file_name, bytes).await?;
        info!("Stored upload {file_name} ({} bytes)", bytes.len());
        Ok(file_name)
    }

    pub async fn embed(&self) -> Result<IngestReport, AppError> {
        ingest::ingest_working_dir(
            &self.workspace,
            self.chunking,
            self.embedder.as_ref(),
            self.store.as_ref(),
        )
        .await
    }

    /// Distinct CV names among the top matches for `query`.
    pub async fn search(&self, query: &str) -> Result<Vec<String>, AppError> {
        let mut vectors = self.embedder.embed(&[query.to_string()]).await?;
        let Some(query_vector) = vectors.pop() else {
            return Ok(Vec::new());
        };
        let hits = self.store.search(&query_vector, search::SEARCH_K).await?;
        Ok(search::distinct_file_names(&hits))
    }

    pub async fn view(&self, file_name: &str) -> Result<CvView, AppError> {
        let (file_name, bytes) = self.load(file_name).await?;
        let Some(kind) = DocumentKind::from_file_name(&file_name) else {
            return Ok(CvView {
                file_name,
                content: UNSUPPORTED_FILE.to_string(),
                downloadable: false,
                email: None,
            });
        };
        let content = extract_or_inline_error(kind, bytes).await;
        let email = extract_email(&content).map(|to| EmailDraft {
            to: to.to_string(),
            subject: SHORTLIST_SUBJECT,
            body: SHORTLIST_BODY,
        });
        Ok(CvView {
            file_name,
            content,
            downloadable: true,
            email,
        })
    }

    pub async fn download(&self, file_name: &str) -> Result<CvFile, AppError> {
        let (file_name, bytes) = self.load(file_name).await?;
        let kind = DocumentKind::from_file_name(&file_name)
            .ok_or_else(|| AppError::Validation(UNSUPPORTED_FILE.to_string()))?;
        Ok(CvFile {
            file_name,
            kind,
            bytes,
        })
    }

    pub async fn summarize(&self, file_name: &str) -> Result<String, AppError> {
        let text = self.cv_text(file_name).await?;
        Ok(assistant::summarize(self.llm.as_ref(), &text).await?)
    }

    pub async fn ask(&self, file_name: &str, query: &str) -> Result<String, AppError> {
        let text = self.cv_text(file_name).await?;
        Ok(assistant::ask(self.llm.as_ref(), &text, query).await?)
    }

    /// Mails the first address found in the CV. Transport failures come back
    /// as `EmailOutcome::Failed`, not as errors.
    pub async fn email(
        &self,
        file_name: &str,
        subject: &str,
        body: &str,
    ) -> Result<EmailOutcome, AppError> {
        let text = self.cv_text(file_name).await?;
        let to = extract_email(&text).ok_or_else(|| {
            AppError::Validation(format!("No email address found in {file_name}"))
        })?;
        Ok(self.mailer.send(to, subject, body).await)
    }

    async fn cv_text(&self, file_name: &str) -> Result<String, AppError> {
        let (file_name, bytes) = self.load(file_name).await?;
        let kind = DocumentKind::from_file_name(&file_name)
            .ok_or_else(|| AppError::Validation(UNSUPPORTED_FILE.to_string()))?;
        Ok(extract_or_inline_error(kind, bytes).await)
    }

    async fn load(&self, requested: &str) -> Result<(String, Vec<u8>), AppError> {
        let not_found = || AppError::NotFound(format!("CV {requested} not found"));
        let file_name = sanitize_file_name(requested)
            .filter(|name| name == requested)
            .ok_or_else(not_found)?;
        let bytes = self.workspace.read(&file_name).await?.ok_or_else(not_found)?;
        Ok((file_name, bytes))
    }
}


#[cfg(test)]
mod tests {
    use super::extract::fixtures::docx_bytes;
    use super::testing::desk_with;
    use super::*;
    use crate::llm_client::testing::ScriptedModel;

    fn desk() -> (tempfile::TempDir, RecruitDesk) {
        desk_with(Arc::new(ScriptedModel::replying("Strong Rust background.")))
    }

    #[tokio::test]
    async fn test_upload_rejects_unsupported_types() {
        let (_root, desk) = desk();
        let err = desk.upload("cv.txt", b"hello").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(
            desk.upload("../up/cv.docx", b"x").await.unwrap(),
            "cv.docx"
        );
    }

    #[tokio::test]
    async fn test_search_returns_distinct_matching_cvs() {
        let (_root, desk) = desk();
        desk.upload("rust.docx", &docx_bytes(&["rust rust rust"]))
            .await
            .unwrap();
        desk.upload("cooking.docx", &docx_bytes(&["baking bread and pasta"]))
            .await
            .unwrap();
        desk.embed().await.unwrap();

        let names = desk.search("rust").await.unwrap();
        assert_eq!(names.first().map(String::as_str), Some("rust.docx"));
        assert!(names.len() <= 2);
    }

    #[tokio::test]
    async fn test_view_offers_email_draft_when_address_present() {
        let (_root, desk) = desk();
        desk.upload("jane.docx", &docx_bytes(&["Jane Doe", "jane@example.com"]))
            .await
            .unwrap();
        desk.upload("anon.docx", &docx_bytes(&["No contact"]))
            .await
            .unwrap();

        let view = desk.view("jane.docx").await.unwrap();
        assert_eq!(view.content, "Jane Doe\njane@example.com");
        let draft = view.email.unwrap();
        assert_eq!(draft.to, "jane@example.com");
        assert_eq!(draft.subject, "Your CV is shortlisted for [Position Name]");

        assert!(desk.view("anon.docx").await.unwrap().email.is_none());
    }

    #[tokio::test]
    async fn test_unknown_or_traversing_names_are_not_found() {
        let (_root, desk) = desk();
        assert!(matches!(
            desk.view("ghost.pdf").await.unwrap_err(),
            AppError::NotFound(_)
        ));
        assert!(matches!(
            desk.download("../config.pdf").await.unwrap_err(),
            AppError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_summary_uses_cv_text() {
        let llm = Arc::new(ScriptedModel::replying("MSc, 5 years"));
        let (_root, desk) = desk_with(llm.clone());
        desk.upload("jane.docx", &docx_bytes(&["Jane Doe", "Acme Corp"]))
            .await
            .unwrap();

        assert_eq!(desk.summarize("jane.docx").await.unwrap(), "MSc, 5 years");
        assert!(llm.last_prompt().unwrap().contains("Jane Doe\nAcme Corp"));
    }

    #[tokio::test]
    async fn test_email_without_smtp_reports_failure() {
        let (_root, desk) = desk();
        desk.upload("jane.docx", &docx_bytes(&["jane@example.com"]))
            .await
            .unwrap();
        let outcome = desk.email("jane.docx", "Hi", "Body").await.unwrap();
        assert_eq!(
            outcome.message(),
            "Failed to send email: SMTP is not configured"
        );
    }
}
