//! End-to-end analysis: discovery, cache-aware parsing, interface
//! detection, graph construction, pattern detection, recommendations.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;

use polyglot_core::config::{ConfigOverrides, PolyglotConfig};
use polyglot_core::errors::{PipelineError, PipelineResult, PolyglotErrorCode};
use polyglot_core::events::types::{
    AnalysisCompleteEvent, AnalysisStartedEvent, AntiPatternDetectedEvent, ErrorEvent,
    PatternDetectedEvent,
};
use polyglot_core::events::EventDispatcher;

use super::cancellation::AnalysisCancellation;
use super::report::{AnalysisReport, ReportedError, RunStats};
use crate::cache::{AnalysisCache, CacheScope, CacheStatsSnapshot, VcsScope};
use crate::graph::{
    GraphBuilder, ImportResolver, InterfaceContext, InterfaceDescriptor, InterfaceRegistry,
};
use crate::parsers::types::ParseResult;
use crate::parsers::{ParseOrchestrator, ParserRegistry};
use crate::patterns::{self, generate_recommendations};
use crate::scanner::{discover_files, SourceFile};

/// One file's contribution to a run.
struct ProcessedFile {
    file: SourceFile,
    result: ParseResult,
    interfaces: Vec<InterfaceDescriptor>,
}

enum FileOutcome {
    Done(Box<ProcessedFile>),
    Failed(PipelineError),
    Skipped,
}

/// Analysis entry point for one project root.
pub struct Analyzer {
    root: PathBuf,
    config: PolyglotConfig,
    orchestrator: ParseOrchestrator,
    cache: AnalysisCache,
    scope: CacheScope,
    interfaces: InterfaceRegistry,
    graph_builder: GraphBuilder,
    events: EventDispatcher,
    cancellation: AnalysisCancellation,
    pool: Option<rayon::ThreadPool>,
}

impl std::fmt::Debug for Analyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Analyzer")
            .field("root", &self.root)
            .field("scope", &self.scope)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl Analyzer {
    /// Build an analyzer from a resolved configuration. Fails only on
    /// invalid configuration.
    pub fn new(root: impl Into<PathBuf>, config: PolyglotConfig) -> Result<Self, PipelineError> {
        let root = root.into();
        PolyglotConfig::validate(&config)?;
        let cache = AnalysisCache::from_config(&config.cache, &root)?;
        let orchestrator = ParseOrchestrator::from_config(ParserRegistry::with_defaults(), &config.parser);
        let scope = VcsScope::detect(&root);

        let pool = config.analysis.threads.filter(|&n| n > 0).and_then(|n| {
            rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map_err(|e| tracing::warn!(threads = n, error = %e, "using global rayon pool"))
                .ok()
        });

        Ok(Self {
            root,
            config,
            orchestrator,
            cache,
            scope,
            interfaces: InterfaceRegistry::with_defaults(),
            graph_builder: GraphBuilder::new(),
            events: EventDispatcher::default(),
            cancellation: AnalysisCancellation::new(),
            pool,
        })
    }

    /// Load layered configuration for `root` and build an analyzer.
    pub fn load(root: impl Into<PathBuf>, overrides: Option<&ConfigOverrides>) -> Result<Self, PipelineError> {
        let root = root.into();
        let config = PolyglotConfig::load(&root, overrides)?;
        Self::new(root, config)
    }

    /// Discover and analyze everything under `root` with its layered config.
    pub fn analyze_root(root: &Path) -> Result<AnalysisReport, PipelineError> {
        Self::load(root, None)?.analyze()
    }

    pub fn with_events(mut self, events: EventDispatcher) -> Self {
        self.orchestrator = self.orchestrator.with_events(events.clone());
        self.cache = self.cache.with_events(events.clone());
        self.events = events;
        self
    }

    pub fn with_cache(mut self, cache: AnalysisCache) -> Self {
        self.cache = cache.with_events(self.events.clone());
        self
    }

    pub fn with_scope(mut self, scope: CacheScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_parsers(mut self, registry: ParserRegistry) -> Self {
        self.orchestrator = ParseOrchestrator::from_config(registry, &self.config.parser)
            .with_events(self.events.clone());
        self
    }

    pub fn with_resolver(mut self, resolver: Arc<dyn ImportResolver>) -> Self {
        self.graph_builder = GraphBuilder::with_resolver(resolver);
        self
    }

    pub fn with_interfaces(mut self, interfaces: InterfaceRegistry) -> Self {
        self.interfaces = interfaces;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn scope(&self) -> &CacheScope {
        &self.scope
    }

    pub fn cache(&self) -> &AnalysisCache {
        &self.cache
    }

    /// Handle for cancelling runs from another thread.
    pub fn cancellation(&self) -> &AnalysisCancellation {
        &self.cancellation
    }

    pub fn cache_stats(&self) -> CacheStatsSnapshot {
        self.cache.stats()
    }

    /// Parse one file through the cache. Never fails.
    pub fn parse_file(&self, file: &SourceFile, content: &[u8]) -> ParseResult {
        if let Some(hit) = self.cache.get(&file.relative_path, content, &self.scope) {
            return hit;
        }
        let result = self.orchestrator.parse(&file.relative_path, content, file.language);
        self.cache.set(&file.relative_path, content, &self.scope, &result);
        result
    }

    /// Discover files under the analyzer's root and analyze them.
    /// Discovery failure is fatal.
    pub fn analyze(&self) -> Result<AnalysisReport, PipelineError> {
        let files = discover_files(&self.root, &self.config.analysis)?;
        self.analyze_project(&files)
    }

    /// Analyze a set of files. Per-file failures are isolated and reported
    /// in [`AnalysisReport::errors`].
    pub fn analyze_project(&self, files: &[SourceFile]) -> Result<AnalysisReport, PipelineError> {
        let start = Instant::now();
        if !self.config.analysis.effective_enabled() {
            tracing::info!(root = %self.root.display(), "analysis disabled by configuration");
            return Ok(AnalysisReport::default());
        }

        self.events.emit_analysis_started(&AnalysisStartedEvent {
            root: Some(self.root.clone()),
            file_count: files.len(),
        });

        let outcomes: Vec<FileOutcome> = match &self.pool {
            Some(pool) => pool.install(|| self.process_files(files)),
            None => self.process_files(files),
        };

        let mut stats = RunStats {
            files_submitted: files.len(),
            ..Default::default()
        };
        let mut collected: PipelineResult<Vec<ProcessedFile>> = PipelineResult::default();
        for outcome in outcomes {
            match outcome {
                FileOutcome::Done(processed) => collected.data.push(*processed),
                FileOutcome::Failed(error) => {
                    stats.files_failed += 1;
                    collected.add_error(error);
                }
                FileOutcome::Skipped => stats.files_cancelled += 1,
            }
        }
        if stats.files_cancelled > 0 {
            tracing::warn!(skipped = stats.files_cancelled, "analysis cancelled before all files were processed");
            collected.add_error(PipelineError::Cancelled);
        }

        let mut report = self.assemble(collected.data, &mut stats);
        for error in &collected.errors {
            self.events.emit_error(&ErrorEvent {
                message: error.to_string(),
                error_code: error.error_code().to_string(),
            });
        }
        report.errors = collected.errors.iter().map(ReportedError::from).collect();

        let evicted = self
            .cache
            .enforce_capacity(usize::try_from(self.config.cache.effective_max_size()).unwrap_or(usize::MAX));
        if evicted > 0 {
            tracing::debug!(evicted, "cache trimmed after run");
        }
        self.cache.log_stats();

        stats.cache = self.cache.stats();
        stats.duration_ms = start.elapsed().as_millis() as u64;
        report.stats = stats;

        self.events.emit_analysis_complete(&AnalysisCompleteEvent {
            files: report.stats.files_analyzed,
            nodes: report.graph.node_count(),
            edges: report.graph.edge_count(),
            cross_language_edges: report.cross_language_edge_count,
            duration_ms: report.stats.duration_ms,
        });
        tracing::info!(
            files = report.stats.files_analyzed,
            failed = report.stats.files_failed,
            nodes = report.graph.node_count(),
            cross_language_edges = report.cross_language_edge_count,
            patterns = report.patterns.len(),
            anti_patterns = report.anti_patterns.len(),
            duration_ms = report.stats.duration_ms,
            "analysis complete"
        );
        Ok(report)
    }

    /// Settle-all over the files: every file yields an outcome.
    fn process_files(&self, files: &[SourceFile]) -> Vec<FileOutcome> {
        files
            .par_iter()
            .map(|file| {
                if self.cancellation.is_cancelled() {
                    return FileOutcome::Skipped;
                }
                match self.process_file(file) {
                    Ok(processed) => FileOutcome::Done(Box::new(processed)),
                    Err(error) => {
                        tracing::warn!(file = %file.relative_path, error = %error, "file skipped");
                        FileOutcome::Failed(error)
                    }
                }
            })
            .collect()
    }

    fn process_file(&self, file: &SourceFile) -> Result<ProcessedFile, PipelineError> {
        let content = std::fs::read(&file.path).map_err(|e| PipelineError::FileRead {
            path: file.relative_path.clone(),
            message: e.to_string(),
        })?;
        let result = self.parse_file(file, &content);
        let text = String::from_utf8_lossy(&content);
        let ctx = InterfaceContext::new(&file.relative_path, file.language, &text).with_result(&result);
        let interfaces = self.interfaces.extract(&ctx);
        Ok(ProcessedFile {
            file: file.clone(),
            result,
            interfaces,
        })
    }

    fn assemble(&self, processed: Vec<ProcessedFile>, stats: &mut RunStats) -> AnalysisReport {
        let mut report = AnalysisReport::default();
        let mut results = Vec::with_capacity(processed.len());
        for item in processed {
            stats.record_result(&item.result);
            *report.language_distribution.entry(item.file.language).or_insert(0) += 1;
            report.interfaces.extend(item.interfaces);
            results.push((item.file, item.result));
        }
        stats.interfaces = report.interfaces.len();

        let graph = self.graph_builder.build(&results, &report.interfaces);
        let detection = patterns::detect_all(&graph);
        for pattern in &detection.patterns {
            self.events.emit_pattern_detected(&PatternDetectedEvent {
                pattern_type: pattern.pattern_type.as_str().to_string(),
                confidence: pattern.confidence,
                nodes: pattern.nodes.clone(),
            });
        }
        for anti in &detection.anti_patterns {
            tracing::warn!(
                pattern = anti.pattern_type.as_str(),
                nodes = ?anti.nodes,
                "anti-pattern detected"
            );
            self.events.emit_anti_pattern_detected(&AntiPatternDetectedEvent {
                pattern_type: anti.pattern_type.as_str().to_string(),
                severity: anti.severity.as_str().to_string(),
                nodes: anti.nodes.clone(),
            });
        }

        report.recommendations = generate_recommendations(&graph, &detection, &report.interfaces);
        report.cross_language_edge_count = graph.cross_language_edges.len();
        report.patterns = detection.patterns;
        report.anti_patterns = detection.anti_patterns;
        report.graph = graph;
        report
    }
}
