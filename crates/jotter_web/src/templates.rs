//! Key-value HTML template substitution.
//!
//! # Responsibility
//! - Load every page template once at startup.
//! - Substitute `{{ key }}` with HTML-escaped text and `{{{ key }}}` with
//!   raw markup.
//!
//! # Invariants
//! - A [`Templates`] value always holds every [`Page`]; rendering a page
//!   cannot fail.
//! - Unknown keys substitute as empty strings.

use log::{error, info};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use rocket::http::RawStr;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

static PLACEHOLDER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{\{\s*([A-Za-z0-9_]+)\s*\}\}\}|\{\{\s*([A-Za-z0-9_]+)\s*\}\}")
        .expect("valid placeholder regex")
});

/// Every page the web shell can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Index,
    NoteItem,
    NoNotes,
    New,
    View,
    Edit,
    NotFound,
    Error,
}

impl Page {
    pub const ALL: [Page; 8] = [
        Page::Index,
        Page::NoteItem,
        Page::NoNotes,
        Page::New,
        Page::View,
        Page::Edit,
        Page::NotFound,
        Page::Error,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            Page::Index => "index.html",
            Page::NoteItem => "note_item.html",
            Page::NoNotes => "no_notes.html",
            Page::New => "new.html",
            Page::View => "view.html",
            Page::Edit => "edit.html",
            Page::NotFound => "not_found.html",
            Page::Error => "error.html",
        }
    }
}

#[derive(Debug)]
pub enum TemplateError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Missing(Page),
}

impl Display for TemplateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "cannot read template `{}`: {source}", path.display())
            }
            Self::Missing(page) => write!(f, "missing template `{}`", page.file_name()),
        }
    }
}

impl Error for TemplateError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Missing(_) => None,
        }
    }
}

/// Values substituted into one template.
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    values: HashMap<&'static str, String>,
}

impl TemplateContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value; it is escaped or not depending on the placeholder form.
    pub fn set(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.values.insert(key, value.into());
        self
    }

    fn get(&self, key: &str) -> &str {
        self.values.get(key).map_or("", String::as_str)
    }
}

/// Loaded page templates.
#[derive(Debug, Clone)]
pub struct Templates {
    sources: HashMap<Page, String>,
}

impl Templates {
    /// Reads every page template from `dir`.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, TemplateError> {
        let dir = dir.as_ref();
        let mut sources = HashMap::with_capacity(Page::ALL.len());
        for page in Page::ALL {
            let path = dir.join(page.file_name());
            let source = std::fs::read_to_string(&path).map_err(|err| {
                error!(
                    "event=templates_load module=templates status=error file={} error={}",
                    page.file_name(),
                    err
                );
                TemplateError::Read { path, source: err }
            })?;
            sources.insert(page, source);
        }
        info!(
            "event=templates_load module=templates status=ok count={} dir={}",
            sources.len(),
            dir.display()
        );
        Ok(Self { sources })
    }

    /// Builds templates from in-memory sources; every page must be present.
    pub fn from_sources(
        sources: impl IntoIterator<Item = (Page, String)>,
    ) -> Result<Self, TemplateError> {
        let sources: HashMap<Page, String> = sources.into_iter().collect();
        if let Some(missing) = Page::ALL.into_iter().find(|page| !sources.contains_key(page)) {
            return Err(TemplateError::Missing(missing));
        }
        Ok(Self { sources })
    }

    pub fn render(&self, page: Page, context: &TemplateContext) -> String {
        let source = self.sources.get(&page).map_or("", String::as_str);
        substitute(source, context)
    }
}

fn substitute(source: &str, context: &TemplateContext) -> String {
    PLACEHOLDER_RE
        .replace_all(source, |caps: &Captures<'_>| {
            if let Some(raw_key) = caps.get(1) {
                context.get(raw_key.as_str()).to_string()
            } else {
                let key = caps.get(2).map_or("", |m| m.as_str());
                RawStr::new(context.get(key)).html_escape().into_owned()
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::{Page, TemplateContext, TemplateError, Templates};

    fn templates_with(page: Page, source: &str) -> Templates {
        Templates::from_sources(Page::ALL.into_iter().map(|candidate| {
            let text = if candidate == page { source } else { "" };
            (candidate, text.to_string())
        }))
        .unwrap()
    }

    #[test]
    fn double_braces_escape_and_triple_braces_do_not() {
        let templates = templates_with(Page::View, "<h1>{{ title }}</h1>{{{body}}}");
        let context = TemplateContext::new()
            .set("title", "<script>")
            .set("body", "<p>ok</p>");
        assert_eq!(
            templates.render(Page::View, &context),
            "<h1>&lt;script&gt;</h1><p>ok</p>"
        );
    }

    #[test]
    fn unknown_keys_render_empty() {
        let templates = templates_with(Page::Index, "[{{ nothing }}][{{{ nada }}}]");
        assert_eq!(templates.render(Page::Index, &TemplateContext::new()), "[][]");
    }

    #[test]
    fn repeated_keys_are_all_replaced() {
        let templates = templates_with(Page::Edit, "{{id}}-{{ id }}");
        let context = TemplateContext::new().set("id", "9");
        assert_eq!(templates.render(Page::Edit, &context), "9-9");
    }

    #[test]
    fn from_sources_requires_every_page() {
        let err = Templates::from_sources([(Page::Index, String::new())]).unwrap_err();
        assert!(matches!(err, TemplateError::Missing(Page::NoteItem)));
    }

    #[test]
    fn load_reports_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let err = Templates::load(dir.path()).unwrap_err();
        assert!(matches!(err, TemplateError::Read { .. }));
        assert!(err.to_string().contains("index.html"));
    }

    #[test]
    fn escaped_values_are_safe_inside_quoted_attributes() {
        let templates = templates_with(Page::Edit, "<input value=\"{{ title }}\">");
        let context = TemplateContext::new().set("title", r#"a&"b'"#);
        assert_eq!(
            templates.render(Page::Edit, &context),
            "<input value=\"a&amp;&quot;b&#x27;\">"
        );
    }
}
