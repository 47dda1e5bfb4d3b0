//! Raw markup insertion.
//!
//! Everything the renderer emits is built from escaped text except diagram
//! engine output, which is inserted verbatim. [`TrustedMarkup`] marks such
//! content and [`insert_raw_markup`] is the only place it enters the output.

/// Markup produced by a trusted engine and inserted without escaping.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrustedMarkup(String);

impl TrustedMarkup {
    /// Wrap engine output. Callers vouch that `markup` came from the diagram
    /// engine (or the renderer itself), never from document text.
    pub fn from_engine_output(markup: impl Into<String>) -> Self {
        Self(markup.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Append trusted markup to the output unescaped.
pub fn insert_raw_markup(markup: &TrustedMarkup, out: &mut String) {
    out.push_str(&markup.0);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_raw_markup_is_verbatim() {
        let markup = TrustedMarkup::from_engine_output("<svg><g/></svg>");
        let mut out = String::from("<div>");
        insert_raw_markup(&markup, &mut out);
        assert_eq!(out, "<div><svg><g/></svg>");
    }
}
