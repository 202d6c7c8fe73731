//! Topic promotion: merge a source document into a topic document.
//!
//! # Responsibility
//! - Key topics by the sanitized `context` of the promoted document.
//! - Create the topic from a verbatim copy, or append the source body.
//! - Record each promotion as a notification document.
//!
//! # Invariants
//! - Exactly one file exists per topic key.
//! - Appends never touch the topic's frontmatter.
//! - Topic write and notification write are not atomic; a failed
//!   notification is logged and reported as `notification_path: None`.

use crate::config::Settings;
use crate::frontmatter::FrontmatterBuilder;
use crate::model::document::{
    DocumentType, DOCUMENT_EXTENSION, FIELD_CONTEXT, FIELD_CREATED, FIELD_LINKS, FIELD_TYPE,
};
use crate::model::time::{format_created, format_notification_stamp, Clock};
use crate::model::wikilink::format_link;
use crate::repo::document_repo::{DocumentRepository, RepoError, RepoResult};
use crate::service::capture_service::SECTION_SEPARATOR;
use crate::store::resolve_date_folder;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Topic label used when the source has no `context`.
pub const FALLBACK_TOPIC_LABEL: &str = "Deep Dive";

const TOPIC_KEY_RESERVED: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Service error for topic promotion.
#[derive(Debug)]
pub enum TopicError {
    /// Promoted document does not exist.
    SourceNotFound(String),
    Repo(RepoError),
}

impl Display for TopicError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SourceNotFound(path) => write!(f, "source document not found: {path}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TopicError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::SourceNotFound(_) => None,
        }
    }
}

impl From<RepoError> for TopicError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Whether a promotion created the topic or extended it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromoteKind {
    Created,
    Updated,
}

/// Result of one promotion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromoteOutcome {
    pub topic_path: String,
    pub kind: PromoteKind,
    /// Notification document, `None` when writing it failed.
    pub notification_path: Option<String>,
}

/// Topic aggregation facade over repository implementations.
pub struct TopicService<R: DocumentRepository, C: Clock> {
    repo: R,
    clock: C,
    settings: Settings,
}

impl<R: DocumentRepository, C: Clock> TopicService<R, C> {
    pub fn new(repo: R, clock: C, settings: Settings) -> Self {
        Self {
            repo,
            clock,
            settings,
        }
    }

    /// Promotes `source_path` into the configured topic folder.
    pub fn promote(&self, source_path: &str) -> Result<PromoteOutcome, TopicError> {
        let target_folder = self.settings.topic_folder().to_string();
        self.promote_into(source_path, &target_folder)
    }

    /// Promotes `source_path` into `target_folder/<key>.md`.
    pub fn promote_into(
        &self,
        source_path: &str,
        target_folder: &str,
    ) -> Result<PromoteOutcome, TopicError> {
        let source = self.repo.read(source_path).map_err(|err| match err {
            RepoError::NotFound(path) => TopicError::SourceNotFound(path),
            other => TopicError::Repo(other),
        })?;
        let key = topic_key(source.frontmatter().context().unwrap_or(FALLBACK_TOPIC_LABEL));
        let target_folder = target_folder.trim_end_matches('/');
        let topic_path = format!("{target_folder}/{key}{DOCUMENT_EXTENSION}");

        self.repo.ensure_folder(target_folder)?;
        let kind = if self.repo.exists(&topic_path)? {
            let topic = self.repo.read(&topic_path)?;
            let merged = format!("{}{SECTION_SEPARATOR}{}", topic.text, source.body().trim());
            self.repo.modify(&topic_path, &merged)?;
            PromoteKind::Updated
        } else {
            self.repo.create(&topic_path, &source.text)?;
            PromoteKind::Created
        };
        info!(
            "event=topic_promote module=topic status=ok source={} topic={} kind={:?}",
            source_path, topic_path, kind
        );

        let notification_path = match self.write_notification(&key, kind) {
            Ok(path) => Some(path),
            Err(err) => {
                warn!(
                    "event=topic_notify module=topic status=error topic={} error={}",
                    topic_path, err
                );
                None
            }
        };
        Ok(PromoteOutcome {
            topic_path,
            kind,
            notification_path,
        })
    }

    fn write_notification(&self, key: &str, kind: PromoteKind) -> RepoResult<String> {
        let now = self.clock.now();
        let folder = resolve_date_folder(self.settings.base_folder(), now);
        self.repo.ensure_folder(&folder)?;
        let stem = format_notification_stamp(self.settings.stamp_format(), now);
        let path = self.repo.free_path(&folder, &stem)?;

        let link = format_link(key);
        let message = match kind {
            PromoteKind::Created => format!("New topic {link} was created."),
            PromoteKind::Updated => format!("Topic {link} was updated."),
        };
        let text = FrontmatterBuilder::new()
            .field(FIELD_TYPE, DocumentType::TopicNotification.as_str())
            .quoted(FIELD_CONTEXT, key)
            .list(FIELD_LINKS, &[link])
            .quoted(FIELD_CREATED, &format_created(now))
            .finish(&message);
        self.repo.create(&path, &text)?;
        Ok(path)
    }
}

/// Topic file key: reserved file-name characters replaced by `-`.
pub fn topic_key(context: &str) -> String {
    context.replace(TOPIC_KEY_RESERVED, "-")
}
