//! Shared control vocabulary.
//!
//! Every node declares the subset of identifiers it supports; the same
//! identifier (e.g. [`ControlId::Cancel`]) is reused across many nodes and
//! never collides because lookups are scoped to each node's boundary.

/// Semantic identifier of a control on a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ControlId {
    /// Name / title input
    Name,
    /// Free-text description input
    Description,
    /// Search box
    Search,
    /// Confirm button of a dialog
    Ok,
    /// Dismiss button of a dialog
    Cancel,
    /// Save button
    Save,
    /// Create button
    Create,
    /// Delete button
    Delete,
    /// Edit button
    Edit,
    /// Close (X) button
    Close,
    /// Submit button
    Submit,
    /// Next step in a wizard
    Next,
    /// Previous step in a wizard
    Back,
    /// Toggle that opens or collapses a widget
    Toggle,
    /// File input
    Upload,
    /// Generic text value field
    Value,
    /// Dialog or page title text
    Title,
    /// Error / validation message
    Error,
    /// Screen-specific identifier outside the shared vocabulary
    Custom(&'static str),
}

impl ControlId {
    /// Canonical lowercase name, used in logs and error messages
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Description => "description",
            Self::Search => "search",
            Self::Ok => "ok",
            Self::Cancel => "cancel",
            Self::Save => "save",
            Self::Create => "create",
            Self::Delete => "delete",
            Self::Edit => "edit",
            Self::Close => "close",
            Self::Submit => "submit",
            Self::Next => "next",
            Self::Back => "back",
            Self::Toggle => "toggle",
            Self::Upload => "upload",
            Self::Value => "value",
            Self::Title => "title",
            Self::Error => "error",
            Self::Custom(name) => *name,
        }
    }
}

impl std::fmt::Display for ControlId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
