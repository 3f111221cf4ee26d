use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where a raw deal claim was picked up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateSource {
    /// Free-text chat feeds (deal channels, group messages)
    #[default]
    Chat,
    /// The retailer's own deal/listing page
    OfficialPage,
}

impl fmt::Display for CandidateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Chat => write!(f, "chat"),
            Self::OfficialPage => write!(f, "official_page"),
        }
    }
}

impl FromStr for CandidateSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "chat" => Ok(Self::Chat),
            "official_page" | "official" => Ok(Self::OfficialPage),
            _ => Err(format!(
                "Invalid candidate source: '{}'. Use 'chat' or 'official_page'",
                s
            )),
        }
    }
}

/// How a candidate's verification data was obtained. The tier feeds the
/// gate's source_reliability component.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationSource {
    /// Scraped from the official product page
    OfficialPage,
    /// Extracted from a screenshot via a vision model fallback
    Vision,
    /// No verification; only the claim text itself
    #[default]
    TextOnly,
}

impl VerificationSource {
    /// Reliability credit contributed to the confidence gate.
    pub fn reliability(&self) -> f64 {
        match self {
            Self::OfficialPage => 0.10,
            Self::Vision => 0.06,
            Self::TextOnly => 0.02,
        }
    }
}

impl fmt::Display for VerificationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OfficialPage => write!(f, "official_page"),
            Self::Vision => write!(f, "vision"),
            Self::TextOnly => write!(f, "text_only"),
        }
    }
}

impl FromStr for VerificationSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "official_page" | "official" => Ok(Self::OfficialPage),
            "vision" | "ocr" => Ok(Self::Vision),
            "text_only" | "text" | "none" => Ok(Self::TextOnly),
            _ => Err(format!("Unknown verification source: {s}")),
        }
    }
}
