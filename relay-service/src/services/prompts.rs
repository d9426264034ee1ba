//! Instruction templates sent alongside every image.
//!
//! Both variants ask for text that is later converted to Braille; they differ
//! only in how much output is wanted.

use std::fmt;
use std::str::FromStr;

/// Terse label: at most four words, the subject last.
pub const LABEL_PROMPT: &str = r#"ANALYSIS PROCESS:
1. Identify the main object/subject visually
2. Extract and read any visible text (labels, signs, writing, numbers)
3. Combine visual characteristics with key text information
4. Prioritize the most useful identifying details

PRIORITY FEATURES (include when visible):
- Text content (brand names, labels, numbers, words)
- Visual characteristics (size, color, shape, condition)
- Safety indicators (warnings, prescriptions, hazards)
- Functional details (buttons, switches, controls)
- Spatial markers (room numbers, addresses, directions)

FORMAT REQUIREMENTS:
- Maximum 4 words total
- Last word MUST be the main object/subject
- Include most distinguishing characteristic first
- Use specific descriptors over generic ones

EXAMPLES:
- Milk carton with "2%" text + large size -> "Large 2% milk carton"
- Medicine bottle with "Advil" text + white color -> "White Advil medication bottle"
- Door with "Room 237" sign -> "Room 237 door sign"
- Control panel with "Power" button -> "Red power button panel"
- Traffic sign with "Stop" text -> "Red stop traffic sign"

SPATIAL CONTEXT (when multiple items visible):
- Include position: "Left", "Right", "Top", "Bottom"
- Example: "Blue Pepsi can left" (when next to other cans)

Return only the 4-word description, nothing else."#;

/// Longer accessibility description.
pub const DESCRIPTION_PROMPT: &str = "Analyze this image and provide a detailed description suitable for a Braille printer.
Focus on:
1. Text content (if any) - transcribe exactly
2. Objects and their positions
3. Colors and visual elements
4. Overall scene composition
5. Any important details for accessibility

Keep the description concise but comprehensive, as it will be converted to Braille.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PromptVariant {
    #[default]
    Label,
    Description,
}

impl PromptVariant {
    pub fn template(&self) -> &'static str {
        match self {
            PromptVariant::Label => LABEL_PROMPT,
            PromptVariant::Description => DESCRIPTION_PROMPT,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PromptVariant::Label => "label",
            PromptVariant::Description => "description",
        }
    }
}

impl fmt::Display for PromptVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PromptVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "label" => Ok(PromptVariant::Label),
            "description" => Ok(PromptVariant::Description),
            other => Err(format!(
                "unknown prompt variant '{}', expected 'label' or 'description'",
                other
            )),
        }
    }
}
