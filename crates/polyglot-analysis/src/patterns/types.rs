//! Architecture pattern and anti-pattern types.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PatternType {
    Microservices,
    ApiLayer,
    SharedLibrary,
    CommunicationPattern,
    CrossLanguageCircularDependency,
}

impl PatternType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Microservices => "microservices",
            Self::ApiLayer => "api-layer",
            Self::SharedLibrary => "shared-library",
            Self::CommunicationPattern => "communication-pattern",
            Self::CrossLanguageCircularDependency => "cross-language-circular-dependency",
        }
    }
}

impl fmt::Display for PatternType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// A detected architectural pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    pub pattern_type: PatternType,
    /// In [0, 1].
    pub confidence: f64,
    pub description: String,
    pub recommendation: String,
    /// Involved node ids, sorted.
    pub nodes: Vec<String>,
}

/// A detected structural problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AntiPattern {
    pub pattern_type: PatternType,
    pub confidence: f64,
    pub severity: Severity,
    pub description: String,
    pub recommendation: String,
    pub nodes: Vec<String>,
}

/// Output of one detection run over a finished graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    pub patterns: Vec<Pattern>,
    pub anti_patterns: Vec<AntiPattern>,
}
