//! Interface detectors: find the cross-process interfaces a file provides
//! or consumes (REST routes and clients, gRPC, GraphQL, queues, websockets).

mod rules;

pub mod ecmascript;
pub mod go;
pub mod java;
pub mod python;
pub mod rust;

use crate::graph::types::InterfaceDescriptor;
use crate::parsers::types::ParseResult;
use crate::scanner::language_detect::Language;

pub use ecmascript::EcmaScriptDetector;
pub use go::GoDetector;
pub use java::JavaDetector;
pub use python::PythonDetector;
pub use rust::RustDetector;

/// Input for a detector: one file's text and, when available, its parse result.
#[derive(Debug, Clone, Copy)]
pub struct InterfaceContext<'a> {
    pub file: &'a str,
    pub language: Language,
    pub content: &'a str,
    pub result: Option<&'a ParseResult>,
}

impl<'a> InterfaceContext<'a> {
    pub fn new(file: &'a str, language: Language, content: &'a str) -> Self {
        Self {
            file,
            language,
            content,
            result: None,
        }
    }

    pub fn with_result(mut self, result: &'a ParseResult) -> Self {
        self.result = Some(result);
        self
    }

    /// Whether the marker appears in the content or in any import source.
    pub fn mentions(&self, marker: &str) -> bool {
        self.content.contains(marker)
            || self
                .result
                .is_some_and(|r| r.imports.iter().any(|i| i.source.contains(marker)))
    }
}

/// Trait for per-language interface detection.
pub trait InterfaceDetector: Send + Sync {
    fn name(&self) -> &'static str;
    fn languages(&self) -> &'static [Language];
    fn detect(&self, ctx: &InterfaceContext<'_>) -> Vec<InterfaceDescriptor>;
}

/// Registry of interface detectors.
pub struct InterfaceRegistry {
    detectors: Vec<Box<dyn InterfaceDetector>>,
}

impl Default for InterfaceRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl std::fmt::Debug for InterfaceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.detectors.iter().map(|d| d.name()).collect();
        f.debug_struct("InterfaceRegistry").field("detectors", &names).finish()
    }
}

impl InterfaceRegistry {
    pub fn new() -> Self {
        Self { detectors: Vec::new() }
    }

    /// Create a registry with all built-in detectors.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(PythonDetector));
        registry.register(Box::new(EcmaScriptDetector));
        registry.register(Box::new(GoDetector));
        registry.register(Box::new(RustDetector));
        registry.register(Box::new(JavaDetector));
        registry
    }

    pub fn register(&mut self, detector: Box<dyn InterfaceDetector>) {
        self.detectors.push(detector);
    }

    pub fn supports(&self, language: Language) -> bool {
        self.detectors.iter().any(|d| d.languages().contains(&language))
    }

    /// Descriptors from every detector registered for the file's language.
    pub fn extract(&self, ctx: &InterfaceContext<'_>) -> Vec<InterfaceDescriptor> {
        let mut found: Vec<InterfaceDescriptor> = Vec::new();
        for detector in self.detectors.iter().filter(|d| d.languages().contains(&ctx.language)) {
            for descriptor in detector.detect(ctx) {
                if !found.contains(&descriptor) {
                    found.push(descriptor);
                }
            }
        }
        if !found.is_empty() {
            tracing::debug!(file = ctx.file, interfaces = found.len(), "interfaces detected");
        }
        found
    }
}
