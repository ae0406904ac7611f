use core::fmt;

use weft_dom::Namespace;

/// An attribute on a start or end tag token.
///
/// Per [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization):
/// "a list of attributes, each of which has a name and a value"
///
/// `prefix` and `namespace` stay `None` until the tree builder adjusts
/// foreign attributes (`xlink:href` and friends).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// "each of which has a name"
    pub name: String,
    /// "and a value"
    pub value: String,
    /// Namespace prefix after foreign attribute adjustment.
    pub prefix: Option<String>,
    /// Namespace after foreign attribute adjustment.
    pub namespace: Option<Namespace>,
}

impl Attribute {
    /// Create a new un-namespaced attribute with the given name and value.
    #[must_use]
    pub const fn new(name: String, value: String) -> Self {
        Self {
            name,
            value,
            prefix: None,
            namespace: None,
        }
    }

    /// The qualified name: `prefix:name` when a prefix is set.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("{prefix}:{}", self.name),
            None => self.name.clone(),
        }
    }
}

/// Whether a tag token is a start tag or an end tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    /// `<name ...>`
    Start,
    /// `</name ...>`
    End,
}

/// "Start and end tag tokens have a tag name, a self-closing flag, and a
/// list of attributes, each of which has a name and a value. When a start
/// or end tag token is created, its self-closing flag must be unset (its
/// other state is that it be set), and its attributes list must be empty."
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// Start or end tag.
    pub kind: TagKind,
    /// "a tag name"
    pub name: String,
    /// "a self-closing flag"
    pub self_closing: bool,
    /// "a list of attributes"
    pub attributes: Vec<Attribute>,
}

impl Tag {
    /// A fresh tag token of the given kind.
    #[must_use]
    pub const fn new(kind: TagKind) -> Self {
        Self {
            kind,
            name: String::new(),
            self_closing: false,
            attributes: Vec::new(),
        }
    }

    /// A start tag with the given name and no attributes.
    #[must_use]
    pub fn start(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::new(TagKind::Start)
        }
    }

    /// An end tag with the given name.
    #[must_use]
    pub fn end(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::new(TagKind::End)
        }
    }

    /// True for start tags.
    #[must_use]
    pub fn is_start(&self) -> bool {
        self.kind == TagKind::Start
    }

    /// Value of the attribute called `name`, if present.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value.as_str())
    }
}

/// "DOCTYPE tokens have a name, a public identifier, a system identifier,
/// and a force-quirks flag. When a DOCTYPE token is created, its name,
/// public identifier, and system identifier must be marked as missing
/// (which is a distinct state from the empty string), and the force-quirks
/// flag must be set to off (its other state is on)."
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Doctype {
    /// "a name"
    pub name: Option<String>,
    /// "a public identifier"
    pub public_identifier: Option<String>,
    /// "a system identifier"
    pub system_identifier: Option<String>,
    /// "a force-quirks flag"
    pub force_quirks: bool,
}

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// "The output of the tokenization step is a series of zero or more of the following
/// tokens: DOCTYPE, start tag, end tag, comment, character, end-of-file."
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A DOCTYPE token.
    Doctype(Doctype),
    /// A start or end tag token.
    Tag(Tag),
    /// "Comment and character tokens have data."
    Comment(String),
    /// A single character.
    Character(char),
    /// End-of-file token signals the end of input.
    EndOfFile,
}

impl Token {
    /// "When a DOCTYPE token is created, its name, public identifier, and system
    /// identifier must be marked as missing"
    #[must_use]
    pub fn new_doctype() -> Self {
        Self::Doctype(Doctype::default())
    }

    /// A fresh start tag token.
    #[must_use]
    pub const fn new_start_tag() -> Self {
        Self::Tag(Tag::new(TagKind::Start))
    }

    /// A fresh end tag token.
    #[must_use]
    pub const fn new_end_tag() -> Self {
        Self::Tag(Tag::new(TagKind::End))
    }

    /// Create a new comment token with empty data.
    #[must_use]
    pub const fn new_comment() -> Self {
        Self::Comment(String::new())
    }

    /// Returns true if this is an end-of-file token.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self, Self::EndOfFile)
    }

    /// The tag name if this is a start tag.
    #[must_use]
    pub fn start_tag_name(&self) -> Option<&str> {
        match self {
            Self::Tag(tag) if tag.kind == TagKind::Start => Some(&tag.name),
            _ => None,
        }
    }

    /// The tag name if this is an end tag.
    #[must_use]
    pub fn end_tag_name(&self) -> Option<&str> {
        match self {
            Self::Tag(tag) if tag.kind == TagKind::End => Some(&tag.name),
            _ => None,
        }
    }

    /// True for a start tag whose name is one of `names`.
    #[must_use]
    pub fn is_start_tag_one_of(&self, names: &[&str]) -> bool {
        self.start_tag_name().is_some_and(|name| names.contains(&name))
    }

    /// True for a character token that is ASCII whitespace (tab, LF, FF, CR, space).
    #[must_use]
    pub const fn is_whitespace_character(&self) -> bool {
        matches!(self, Self::Character('\t' | '\n' | '\x0C' | '\r' | ' '))
    }

    /// [§ 13.2.5.8 Tag name state](https://html.spec.whatwg.org/multipage/parsing.html#tag-name-state)
    ///
    /// "Append the current input character to the current tag token's tag name."
    pub fn append_to_tag_name(&mut self, c: char) {
        if let Self::Tag(tag) = self {
            tag.name.push(c);
        }
    }

    /// [§ 13.2.5.40 Self-closing start tag state](https://html.spec.whatwg.org/multipage/parsing.html#self-closing-start-tag-state)
    ///
    /// "Set the self-closing flag of the current tag token."
    pub const fn set_self_closing(&mut self) {
        if let Self::Tag(tag) = self {
            tag.self_closing = true;
        }
    }

    /// "Append the current input character to the comment token's data."
    pub fn append_to_comment(&mut self, c: char) {
        if let Self::Comment(data) = self {
            data.push(c);
        }
    }

    /// "Append the current input character to the current DOCTYPE token's name."
    pub fn append_to_doctype_name(&mut self, c: char) {
        if let Self::Doctype(doctype) = self {
            doctype.name.get_or_insert_with(String::new).push(c);
        }
    }

    /// "Set the current DOCTYPE token's public identifier to the empty string
    /// (not missing)"
    pub fn start_public_identifier(&mut self) {
        if let Self::Doctype(doctype) = self {
            doctype.public_identifier = Some(String::new());
        }
    }

    /// "Append the current input character to the current DOCTYPE token's
    /// public identifier."
    pub fn append_to_public_identifier(&mut self, c: char) {
        if let Self::Doctype(doctype) = self {
            doctype.public_identifier.get_or_insert_with(String::new).push(c);
        }
    }

    /// "Set the current DOCTYPE token's system identifier to the empty string
    /// (not missing)"
    pub fn start_system_identifier(&mut self) {
        if let Self::Doctype(doctype) = self {
            doctype.system_identifier = Some(String::new());
        }
    }

    /// "Append the current input character to the current DOCTYPE token's
    /// system identifier."
    pub fn append_to_system_identifier(&mut self, c: char) {
        if let Self::Doctype(doctype) = self {
            doctype.system_identifier.get_or_insert_with(String::new).push(c);
        }
    }

    /// "Set the current DOCTYPE token's force-quirks flag to on."
    pub const fn set_force_quirks(&mut self) {
        if let Self::Doctype(doctype) = self {
            doctype.force_quirks = true;
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Doctype(doctype) => {
                write!(f, "DOCTYPE")?;
                if let Some(n) = &doctype.name {
                    write!(f, " {n}")?;
                }
                if let Some(pub_id) = &doctype.public_identifier {
                    write!(f, " PUBLIC \"{pub_id}\"")?;
                }
                if let Some(sys_id) = &doctype.system_identifier {
                    write!(f, " SYSTEM \"{sys_id}\"")?;
                }
                if doctype.force_quirks {
                    write!(f, " (force-quirks)")?;
                }
                Ok(())
            }
            Self::Tag(tag) if tag.kind == TagKind::Start => {
                write!(f, "<{}", tag.name)?;
                for attr in &tag.attributes {
                    write!(f, " {}=\"{}\"", attr.qualified_name(), attr.value)?;
                }
                if tag.self_closing {
                    write!(f, " /")?;
                }
                write!(f, ">")
            }
            Self::Tag(tag) => write!(f, "</{}>", tag.name),
            Self::Comment(data) => write!(f, "<!--{data}-->"),
            Self::Character(data) => match data {
                '\n' => write!(f, "Character(\\n)"),
                '\t' => write!(f, "Character(\\t)"),
                ' ' => write!(f, "Character(SPACE)"),
                c => write!(f, "Character({c})"),
            },
            Self::EndOfFile => write!(f, "EOF"),
        }
    }
}
