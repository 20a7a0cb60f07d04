//! @ai:module:intent Extract fenced code blocks from kernel source text
//! @ai:module:layer application
//! @ai:module:public_api CodeExtractor, ExtractedBlock, extract_code_block, prepare_kernel_code
//! @ai:module:stateless true

use regex::Regex;

/// @ai:intent A fenced code block found in source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedBlock {
    /// Language tag after the opening fence, lowercased; `None` when untagged.
    pub language: Option<String>,
    pub code: String,
}

/// @ai:intent Finds markdown-style fenced code blocks
pub struct CodeExtractor {
    code_block_regex: Regex,
}

impl CodeExtractor {
    /// @ai:intent Create a new code extractor
    /// @ai:effects pure
    pub fn new() -> Self {
        Self {
            // ```python\n...``` with an optional tag and trailing text on the fence line
            code_block_regex: Regex::new(r"```([\w+-]*)[^\n]*\n([\s\S]*?)```")
                .expect("code block pattern is valid"),
        }
    }

    /// @ai:intent Return every fenced block in order of appearance
    /// @ai:effects pure
    pub fn extract_all(&self, text: &str) -> Vec<ExtractedBlock> {
        self.code_block_regex
            .captures_iter(text)
            .map(|cap| {
                let tag = cap.get(1).map(|m| m.as_str()).unwrap_or("");
                let code = cap.get(2).map(|m| m.as_str()).unwrap_or("");

                ExtractedBlock {
                    language: Some(tag.to_lowercase()).filter(|t| !t.is_empty()),
                    code: code.trim().to_string(),
                }
            })
            .collect()
    }

    /// @ai:intent Pick the kernel block: first python-tagged block, else first block
    /// @ai:effects pure
    pub fn extract_primary(&self, text: &str) -> Option<ExtractedBlock> {
        let blocks = self.extract_all(text);

        let python = blocks
            .iter()
            .position(|b| matches!(b.language.as_deref(), Some("python" | "py")));

        match python {
            Some(index) => blocks.into_iter().nth(index),
            None => blocks.into_iter().next(),
        }
    }

    /// @ai:intent Use the extracted block when non-empty, otherwise the raw text verbatim
    /// @ai:effects pure
    pub fn prepare_kernel_code(&self, raw: &str) -> String {
        match self.extract_primary(raw) {
            Some(block) if !block.code.is_empty() => {
                tracing::debug!(
                    language = block.language.as_deref().unwrap_or("untagged"),
                    "Using fenced code block from kernel source"
                );
                block.code
            }
            _ => {
                tracing::debug!("No fenced code block found, using kernel source as-is");
                raw.to_string()
            }
        }
    }
}

impl Default for CodeExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// @ai:intent Extract the primary fenced block's code, if any
/// @ai:effects pure
pub fn extract_code_block(text: &str) -> Option<String> {
    CodeExtractor::new().extract_primary(text).map(|b| b.code)
}

/// @ai:effects pure
pub fn prepare_kernel_code(raw: &str) -> String {
    CodeExtractor::new().prepare_kernel_code(raw)
}
