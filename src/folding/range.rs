use serde::{Deserialize, Serialize};

/// A foldable line span, in the LSP wire shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoldingRange {
    pub start_line: u32,
    pub end_line: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_character: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_character: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl FoldingRange {
    pub fn new(start_line: u32, end_line: u32) -> Self {
        Self {
            start_line,
            end_line,
            start_character: None,
            end_character: None,
            kind: None,
        }
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Only ranges spanning more than one line can be folded.
    pub fn is_valid(&self) -> bool {
        self.start_line < self.end_line
    }
}

impl From<lsp_types::FoldingRange> for FoldingRange {
    fn from(range: lsp_types::FoldingRange) -> Self {
        let kind = range.kind.map(|k| {
            match k {
                lsp_types::FoldingRangeKind::Comment => "comment",
                lsp_types::FoldingRangeKind::Imports => "imports",
                lsp_types::FoldingRangeKind::Region => "region",
            }
            .to_string()
        });

        Self {
            start_line: range.start_line,
            end_line: range.end_line,
            start_character: range.start_character,
            end_character: range.end_character,
            kind,
        }
    }
}
