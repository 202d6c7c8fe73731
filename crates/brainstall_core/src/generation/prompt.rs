//! Prompt builders and response parsing for capture flows.

use once_cell::sync::Lazy;
use regex::Regex;

static CHECKBOX_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-\s*\[\s*\]\s*").expect("valid checkbox regex"));

const UNCHECKED_MARKER: &str = "- [ ]";

/// Prompt asking for an action checklist about `request`, grounded in the
/// reference article.
pub fn checklist_prompt(request: &str, title: &str, reference: &str) -> String {
    format!(
        "Using the article \"{title}\" below as reference, write a checklist about \"{request}\".

# Article
{reference}

# Requirements
From the article above, list the actions worth practicing, considering or improving in the context of \"{request}\".

## Rules
1. Write each item as one natural sentence.
2. Each sentence states an action and its intent.
3. Keep each item around fifty characters.
4. Output only checklist lines (- [ ]) with no headings or explanations.
5. Express the purpose in plain prose without colons or brackets.

# Output example
- [ ] Back up data weekly to guard against loss
- [ ] Share progress with the team to stay aligned
- [ ] Write down experiment steps to make them reproducible"
    )
}

/// Prompt asking for a readable summary of the reference text in the
/// context of `request`.
pub fn deep_dive_prompt(request: &str, reference: &str) -> String {
    format!(
        "Summarize the reference text below clearly in the context of \"{request}\".

Important:
1. The reference may be a voice transcript with unnatural endings, cut-off phrases and loose punctuation.
2. Do not quote it verbatim; understand it and rewrite it as natural written prose.
3. Do not add information, formulas or equations absent from the reference.
4. Leave out symbols, chatter and metadata unrelated to the context.
5. Do not write an h1 heading or a title; start from h2 subheadings.
6. Group related information and make the key points explicit.
7. Mark vague or unknown details as \"unknown\" or \"not stated\".
8. Drop spoken fillers and use proper written language.

Write the output as a well-organized markdown summary.

---
[Reference text]
{reference}
---"
    )
}

/// Extracts checklist items from lines starting with `- [ ]`.
///
/// The checkbox prefix is removed and items are trimmed; blank items are
/// dropped.
pub fn parse_checklist_response(response: &str) -> Vec<String> {
    response
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with(UNCHECKED_MARKER))
        .map(|line| CHECKBOX_PREFIX_RE.replace(line, "").trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

/// Renders checklist items as unchecked markdown tasks.
pub fn render_checklist(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("{UNCHECKED_MARKER} {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}
