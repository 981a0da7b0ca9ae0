/// Default width, in characters, of the source excerpt carried by a
/// syntax error.
pub const DEFAULT_CONTEXT_WIDTH: usize = 100;

/// What to do when two fields of one struct-like block share an explicit id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicateFieldIds {
    /// Fail the parse with a syntax error.
    #[default]
    Reject,
    /// Keep every field as written.
    Keep,
}

/// Parser configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    pub duplicate_field_ids: DuplicateFieldIds,
    pub context_width: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            duplicate_field_ids: DuplicateFieldIds::default(),
            context_width: DEFAULT_CONTEXT_WIDTH,
        }
    }
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn duplicate_field_ids(mut self, policy: DuplicateFieldIds) -> Self {
        self.duplicate_field_ids = policy;
        self
    }

    pub fn context_width(mut self, width: usize) -> Self {
        self.context_width = width;
        self
    }
}
