//! Document producers: memo, checklist and deep dive.
//!
//! # Responsibility
//! - Derive `context`, file names and verified `links` from user input.
//! - Assemble reference text from a source document and linked documents.
//! - Write new documents into the date-partitioned capture folder.
//!
//! # Invariants
//! - `created` is written once, here, from the injected clock.
//! - `links` only lists targets that resolve to an existing document.
//! - Generation runs before any write; a failed call leaves the vault
//!   untouched.

use crate::config::Settings;
use crate::frontmatter::FrontmatterBuilder;
use crate::generation::prompt::{
    checklist_prompt, deep_dive_prompt, parse_checklist_response, render_checklist,
};
use crate::generation::registry::GeneratorRegistry;
use crate::generation::GenerationError;
use crate::model::document::{
    base_name, DocumentType, FIELD_CONTEXT, FIELD_CREATED, FIELD_LINKS, FIELD_TYPE,
};
use crate::model::time::{format_created, format_file_stamp, Clock};
use crate::model::wikilink::{format_link, link_targets, replace_with_display, replace_with_target};
use crate::repo::document_repo::{DocumentRepository, RepoError, RepoResult};
use crate::store::resolve_date_folder;
use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static CONTEXT_STRIP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[/\\?%*:|"<>#\[\]]"#).expect("valid context strip regex"));
static FILE_UNSAFE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[/\\?%*:|"<>]"#).expect("valid file-name regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Separator between the user request and generated output.
pub const SECTION_SEPARATOR: &str = "\n\n---\n\n";

/// Service error for capture use-cases.
#[derive(Debug)]
pub enum CaptureError {
    /// Input is blank.
    EmptyInput,
    /// Deep dive has no source or linked text to work from.
    MissingReference,
    /// Source document vanished.
    SourceNotFound(String),
    Generation(GenerationError),
    Repo(RepoError),
}

impl Display for CaptureError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyInput => write!(f, "input is empty"),
            Self::MissingReference => {
                write!(f, "reference text is missing; select a source document first")
            }
            Self::SourceNotFound(path) => write!(f, "source document not found: {path}"),
            Self::Generation(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CaptureError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Generation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for CaptureError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<GenerationError> for CaptureError {
    fn from(value: GenerationError) -> Self {
        Self::Generation(value)
    }
}

/// Reference material handed to a generator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reference {
    /// Source document title with wikilinks flattened to their targets.
    pub title: String,
    /// Source text followed by `## [[name]]` sections of linked documents.
    pub text: String,
}

/// Capture service facade over repository implementations.
pub struct CaptureService<R: DocumentRepository, C: Clock> {
    repo: R,
    clock: C,
    settings: Settings,
}

impl<R: DocumentRepository, C: Clock> CaptureService<R, C> {
    pub fn new(repo: R, clock: C, settings: Settings) -> Self {
        Self {
            repo,
            clock,
            settings,
        }
    }

    /// Saves `content` verbatim as a memo and returns the new path.
    ///
    /// An existing `source` document is linked by base name; a vanished one
    /// is ignored.
    pub fn create_memo(&self, content: &str, source: Option<&str>) -> Result<String, CaptureError> {
        if content.trim().is_empty() {
            return Err(CaptureError::EmptyInput);
        }

        let mut links = self.verified_links(&[content])?;
        if let Some(source) = source {
            if self.repo.exists(source)? {
                push_unique(&mut links, format_link(base_name(source)));
            }
        }

        let now = self.clock.now();
        let mut header = FrontmatterBuilder::new().field(FIELD_TYPE, DocumentType::Memo.as_str());
        let context = derive_context(content);
        if !context.is_empty() {
            header = header.quoted(FIELD_CONTEXT, &context);
        }
        let text = header
            .quoted(FIELD_CREATED, &format_created(now))
            .list(FIELD_LINKS, &links)
            .finish(content);

        self.write_capture(DocumentType::Memo, content, &text)
    }

    /// Builds the reference for a request: the source document's full text
    /// plus one section per resolvable wikilink in `request`.
    pub fn build_reference(
        &self,
        request: &str,
        source: Option<&str>,
    ) -> Result<Reference, CaptureError> {
        let mut reference = Reference::default();
        if let Some(source) = source {
            let document = self.repo.read(source).map_err(|err| match err {
                RepoError::NotFound(path) => CaptureError::SourceNotFound(path),
                other => CaptureError::Repo(other),
            })?;
            reference.title = replace_with_target(document.base_name());
            reference.text = document.text;
        }
        reference.text.push_str(&self.linked_sections(request)?);
        Ok(reference)
    }

    /// Generates a checklist for `request` and saves it.
    pub fn listify(
        &self,
        registry: &GeneratorRegistry,
        request: &str,
        source: Option<&str>,
    ) -> Result<String, CaptureError> {
        if request.trim().is_empty() {
            return Err(CaptureError::EmptyInput);
        }
        let reference = self.build_reference(request, source)?;
        let prompt = checklist_prompt(request, &reference.title, &reference.text);
        let response = registry.generate(&self.settings, &prompt)?;
        let items = parse_checklist_response(&response);
        if items.is_empty() {
            return Err(GenerationError::MalformedResponse(
                "no `- [ ]` items in completion".to_string(),
            )
            .into());
        }
        self.save_checklist(request, &reference.title, &items)
    }

    /// Generates a deep-dive article for `request` and saves it.
    pub fn deep_dive(
        &self,
        registry: &GeneratorRegistry,
        request: &str,
        source: Option<&str>,
    ) -> Result<String, CaptureError> {
        if request.trim().is_empty() {
            return Err(CaptureError::EmptyInput);
        }
        let reference = self.build_reference(request, source)?;
        if reference.text.trim().is_empty() {
            return Err(CaptureError::MissingReference);
        }
        let prompt = deep_dive_prompt(request, &reference.text);
        let article = registry.generate(&self.settings, &prompt)?;
        self.save_deep_dive(request, &reference.title, &article)
    }

    /// Writes a checklist document from already generated items.
    pub fn save_checklist(
        &self,
        request: &str,
        source_title: &str,
        items: &[String],
    ) -> Result<String, CaptureError> {
        let body = format!("{request}{SECTION_SEPARATOR}{}", render_checklist(items));
        let text = self.generated_document(DocumentType::Listify, request, source_title, &body)?;
        self.write_capture(DocumentType::Listify, request, &text)
    }

    /// Writes a deep-dive document from an already generated article.
    pub fn save_deep_dive(
        &self,
        request: &str,
        source_title: &str,
        article: &str,
    ) -> Result<String, CaptureError> {
        let body = format!("{request}{SECTION_SEPARATOR}{article}");
        let text = self.generated_document(DocumentType::DeepDive, request, source_title, &body)?;
        self.write_capture(DocumentType::DeepDive, request, &text)
    }

    fn generated_document(
        &self,
        kind: DocumentType,
        request: &str,
        source_title: &str,
        body: &str,
    ) -> RepoResult<String> {
        let title_link = format_link(source_title);
        let links = self.verified_links(&[request, title_link.as_str()])?;
        let mut header = FrontmatterBuilder::new().field(FIELD_TYPE, kind.as_str());
        let context = derive_context(request);
        if !context.is_empty() {
            header = header.quoted(FIELD_CONTEXT, &context);
        }
        Ok(header
            .list(FIELD_LINKS, &links)
            .quoted(FIELD_CREATED, &format_created(self.clock.now()))
            .finish(body))
    }

    fn write_capture(
        &self,
        kind: DocumentType,
        input: &str,
        text: &str,
    ) -> Result<String, CaptureError> {
        let now = self.clock.now();
        let folder = resolve_date_folder(self.settings.base_folder(), now);
        self.repo.ensure_folder(&folder)?;
        let stem = format!(
            "{}_{}_{}",
            format_file_stamp(self.settings.stamp_format(), now),
            kind.as_str(),
            file_context(input)
        );
        let path = self.repo.free_path(&folder, &stem)?;
        self.repo.create(&path, text)?;
        info!(
            "event=capture_save module=capture status=ok type={} path={}",
            kind, path
        );
        Ok(path)
    }

    fn verified_links(&self, texts: &[&str]) -> RepoResult<Vec<String>> {
        let mut links = Vec::new();
        for text in texts {
            for target in link_targets(text) {
                if self.repo.resolve_link(&target)?.is_some() {
                    push_unique(&mut links, format_link(&target));
                }
            }
        }
        Ok(links)
    }

    fn linked_sections(&self, request: &str) -> RepoResult<String> {
        let mut sections = String::new();
        for target in link_targets(request) {
            let Some(path) = self.repo.resolve_link(&target)? else {
                continue;
            };
            match self.repo.read(&path) {
                Ok(document) => {
                    sections.push_str(&format!("\n\n## {}\n{}", format_link(&target), document.text));
                }
                Err(err) => warn!(
                    "event=reference_read module=capture status=error path={} error={}",
                    path, err
                ),
            }
        }
        Ok(sections)
    }
}

/// `context` value for an input: first line, wikilinks replaced by their
/// display part, reserved characters removed, whitespace collapsed.
pub fn derive_context(input: &str) -> String {
    let first_line = replace_with_display(first_line(input));
    let stripped = CONTEXT_STRIP_RE.replace_all(&first_line, "");
    WHITESPACE_RE.replace_all(&stripped, " ").trim().to_string()
}

/// File-name fragment for an input: first line, wikilinks replaced by their
/// display part, reserved characters and whitespace runs turned into `_`.
pub fn file_context(input: &str) -> String {
    let first_line = replace_with_display(first_line(input));
    let replaced = FILE_UNSAFE_RE.replace_all(first_line.trim(), "_");
    WHITESPACE_RE.replace_all(&replaced, "_").into_owned()
}

fn first_line(input: &str) -> &str {
    input.lines().next().unwrap_or_default()
}

fn push_unique(links: &mut Vec<String>, link: String) {
    if !links.contains(&link) {
        links.push(link);
    }
}

#[cfg(test)]
mod tests {
    use super::{derive_context, file_context};

    #[test]
    fn context_uses_display_part_and_drops_reserved_characters() {
        assert_eq!(
            derive_context("Review [[notes|Plan A]]: #todo / \"draft\"\nsecond line"),
            "Review notes todo draft"
        );
        assert_eq!(derive_context("  [[Topic]]  "), "Topic");
        assert_eq!(derive_context("\nbody only"), "");
    }

    #[test]
    fn file_context_replaces_unsafe_characters() {
        assert_eq!(file_context("a/b: c  d"), "a_b__c_d");
        assert_eq!(file_context("see [[x|Plan A]]"), "see_x");
    }
}
