use crate::context::SenderTag;
use crate::error::InputError;
use std::path::Path;

/// Stand-in text scored for an uploaded screenshot. The image is never read.
pub const SCREENSHOT_PLACEHOLDER: &str = "Screenshot analysis";

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

/// A validated analysis request, ready for `Scanner::analyze`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisInput {
    pub text: String,
    pub sender: SenderTag,
}

impl AnalysisInput {
    /// Message text must be non-blank and a sender must be chosen.
    pub fn from_text(text: &str, sender: &str) -> Result<Self, InputError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(InputError::EmptyMessage);
        }
        Ok(Self {
            text: text.to_string(),
            sender: parse_sender(sender)?,
        })
    }

    pub fn from_screenshot(path: &Path, sender: &str) -> Result<Self, InputError> {
        let display = path.display().to_string();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
            .unwrap_or_default();

        if !IMAGE_EXTENSIONS.contains(&extension.as_str()) {
            return Err(InputError::ScreenshotType(display));
        }
        if !path.is_file() {
            return Err(InputError::ScreenshotMissing(display));
        }

        log::debug!("Accepted screenshot {display}; content is not inspected");
        Ok(Self {
            text: SCREENSHOT_PLACEHOLDER.to_string(),
            sender: parse_sender(sender)?,
        })
    }
}

fn parse_sender(sender: &str) -> Result<SenderTag, InputError> {
    match sender.parse::<SenderTag>()? {
        SenderTag::Unspecified => Err(InputError::EmptySender),
        tag => Ok(tag),
    }
}
