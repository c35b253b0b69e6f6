//! String Interner - Deduplicate tag and attribute names
//!
//! Tag names ("div", "script") and attribute names ("style", "onclick")
//! repeat on almost every element, so they are stored once and referenced by ID.

use std::collections::HashMap;

/// Interned string ID - just 4 bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct InternedString(pub u32);

impl InternedString {
    /// Empty string
    pub const EMPTY: InternedString = InternedString(0);
}

/// String interner for deduplicating names
#[derive(Debug)]
pub struct StringInterner {
    strings: Vec<Box<str>>,
    map: HashMap<Box<str>, u32>,
}

impl StringInterner {
    /// Create a new interner with the names the refactoring passes look up pre-interned
    pub fn new() -> Self {
        let mut interner = Self {
            strings: Vec::with_capacity(128),
            map: HashMap::with_capacity(128),
        };

        // Index 0 is always the empty string
        interner.intern("");

        const COMMON_TAGS: &[&str] = &[
            "html", "head", "body", "div", "span", "p", "a", "img",
            "ul", "ol", "li", "table", "tr", "td", "th",
            "form", "input", "button", "select", "option", "textarea",
            "script", "style", "link", "meta", "title",
        ];

        const COMMON_ATTRS: &[&str] = &[
            "id", "class", "style", "href", "src", "rel", "type", "defer",
            "onclick", "onload", "onsubmit", "onchange",
        ];

        for name in COMMON_TAGS.iter().chain(COMMON_ATTRS) {
            interner.intern(name);
        }

        interner
    }

    /// Intern a string, returning its ID.
    /// If the string is already interned, returns the existing ID.
    pub fn intern(&mut self, s: &str) -> InternedString {
        if let Some(&idx) = self.map.get(s) {
            return InternedString(idx);
        }

        let idx = self.strings.len() as u32;
        self.strings.push(s.into());
        self.map.insert(s.into(), idx);
        InternedString(idx)
    }

    /// Look up a string without interning it
    pub fn lookup(&self, s: &str) -> Option<InternedString> {
        self.map.get(s).map(|&idx| InternedString(idx))
    }

    /// Get the string for an interned ID
    #[inline]
    pub fn get(&self, id: InternedString) -> &str {
        self.strings.get(id.0 as usize).map(|s| &**s).unwrap_or("")
    }

    /// Number of interned strings
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}
