/// Separator between the prefix and content encoding names
pub const DIRECTIVE_SEPARATOR: char = '/';

/// Parsed encoding directive: which encoding the length prefix uses and which the content uses.
///
/// Grammar is `NAME` or `NAME "/" NAME`. A single name applies to both parts. Only the
/// first separator splits; anything after it, further separators included, is the
/// content name, which the registry will then reject as unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodingDirective<'a> {
    pub prefix: &'a str,
    pub content: &'a str,
}

impl<'a> EncodingDirective<'a> {
    pub fn parse(directive: &'a str) -> Self {
        match directive.split_once(DIRECTIVE_SEPARATOR) {
            Some((prefix, content)) => Self { prefix, content },
            None => Self {
                prefix: directive,
                content: directive,
            },
        }
    }

    /// True when prefix and content use different encodings
    pub fn is_split(&self) -> bool {
        self.prefix != self.content
    }
}

impl<'a> From<&'a str> for EncodingDirective<'a> {
    fn from(directive: &'a str) -> Self {
        Self::parse(directive)
    }
}
