//! Script elements as seen by the analyzer.

use indexmap::IndexMap;

/// One script element of a page.
///
/// Holds what the analyzer needs to fetch the script's text (through a
/// [`PageFlavor`](super::PageFlavor)) and to resolve relative identifiers
/// against the script's own location. Attribute names are stored lowercased.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptContext {
    position: usize,
    src: Option<String>,
    inline_text: Option<String>,
    attributes: IndexMap<String, String>,
}

impl ScriptContext {
    /// An inline `<script>` with the given body.
    pub fn inline(text: impl Into<String>) -> Self {
        Self {
            inline_text: Some(text.into()),
            ..Self::default()
        }
    }

    /// An external `<script src="...">`.
    pub fn external(src: impl Into<String>) -> Self {
        let src = src.into();
        let mut attributes = IndexMap::new();
        attributes.insert("src".to_string(), src.clone());
        Self {
            src: Some(src),
            attributes,
            ..Self::default()
        }
    }

    /// Add an attribute. Setting `src` also sets the external source.
    #[must_use]
    pub fn with_attribute(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        let name = name.as_ref().to_ascii_lowercase();
        let value = value.into();
        if name == "src" {
            self.src = Some(value.clone());
        }
        self.attributes.insert(name, value);
        self
    }

    /// Set the document position.
    #[must_use]
    pub const fn at(mut self, position: usize) -> Self {
        self.position = position;
        self
    }

    /// Zero-based position among the page's script elements.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// The `src` attribute, if the script is external.
    #[must_use]
    pub fn src(&self) -> Option<&str> {
        self.src.as_deref()
    }

    /// The inline body, if any.
    #[must_use]
    pub fn inline_text(&self) -> Option<&str> {
        self.inline_text.as_deref()
    }

    /// Look up an attribute case-insensitively.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    /// All attributes in document order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Module-style location of the script, used as the base for relative
    /// identifiers.
    ///
    /// Derived from `src`: scheme and host are dropped, as are any query or
    /// fragment and a trailing `.js`. Inline scripts have no location.
    #[must_use]
    pub fn location(&self) -> Option<String> {
        let src = self.src.as_deref()?;
        let path = match src.find("://") {
            Some(idx) => {
                let rest = &src[idx + 3..];
                rest.find('/').map_or("", |slash| &rest[slash..])
            }
            None if src.starts_with("//") => {
                let rest = &src[2..];
                rest.find('/').map_or("", |slash| &rest[slash..])
            }
            None => src,
        };
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let path = path.strip_suffix(".js").unwrap_or(path);
        let path = path.trim_start_matches("./").trim_start_matches('/');
        Some(path.to_string())
    }
}
