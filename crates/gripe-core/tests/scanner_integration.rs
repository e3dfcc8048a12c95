//! Integration test: rules end-to-end through Scanner, Collector and Renderer.
//!
//! Each test builds a small tree in a temp directory.

use gripe_core::pattern::Match;
use gripe_core::{
    Complaint, MatchContext, PatternSpec, RenderOptions, Renderer, Rule, RuleError, ScanError,
    Scanner, ScopeFilter, Severity, Span, StructuredMatcher, VcsIndex,
};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

fn tree(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().expect("temp dir");
    for (name, content) in files {
        let path = dir.path().join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
    dir
}

fn file_names(complaint: &Complaint) -> Vec<String> {
    complaint
        .file_spans
        .keys()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

/// A regex rule with fixed globs and the default check.
struct Simple {
    name: &'static str,
    pattern: PatternSpec,
    globs: Vec<&'static str>,
    exclude: Vec<&'static str>,
    severity: Severity,
}

impl Simple {
    fn new(name: &'static str, pattern: &str, globs: &[&'static str]) -> Self {
        Self {
            name,
            pattern: PatternSpec::text(pattern),
            globs: globs.to_vec(),
            exclude: vec![],
            severity: Severity::Critical,
        }
    }
}

impl Rule for Simple {
    fn name(&self) -> &str {
        self.name
    }
    fn description(&self) -> &str {
        "matched"
    }
    fn pattern(&self) -> PatternSpec {
        self.pattern.clone()
    }
    fn globs(&self) -> Vec<String> {
        self.globs.iter().map(ToString::to_string).collect()
    }
    fn exclude_globs(&self) -> Vec<String> {
        self.exclude.iter().map(ToString::to_string).collect()
    }
    fn severity(&self) -> Severity {
        self.severity
    }
}

// ── Custom check skips commented-out calls ──

struct UncommentedPrint;

impl Rule for UncommentedPrint {
    fn name(&self) -> &str {
        "complex-print"
    }
    fn pattern(&self) -> PatternSpec {
        PatternSpec::text(r"print\(")
    }
    fn globs(&self) -> Vec<String> {
        vec!["*.py".into()]
    }
    fn check(&mut self, ctx: &MatchContext<'_>) -> Result<Vec<Complaint>, RuleError> {
        if ctx.line_prefix().contains('#') {
            return Ok(vec![]);
        }
        Ok(vec![Complaint::new(self.name(), Severity::Critical, "print found")
            .with_span(ctx.path, ctx.span)])
    }
}

#[test]
fn commented_print_is_not_reported() {
    let dir = tree(&[("a.py", "print(1)\n# print(2)\n")]);
    let output = Scanner::builder()
        .root(dir.path())
        .rule(UncommentedPrint)
        .build()
        .unwrap()
        .run();

    let complaints = output.collector.complaints();
    assert_eq!(complaints.len(), 1);
    let spans: Vec<Span> = complaints[0].file_spans.values().next().unwrap().keys().copied().collect();
    assert_eq!(spans, vec![Span::new(0, 6)]);

    let options = RenderOptions {
        inline: true,
        root: Some(output.root.clone()),
        ..RenderOptions::default()
    };
    let line = Renderer::new(options, &output.sources).render(&complaints[0]);
    assert_eq!(line, "critical - complex-print: print found --> a.py[1:1]");
}

// ── Shared pattern, disjoint scopes ──

#[test]
fn shared_pattern_is_routed_by_scope() {
    let dir = tree(&[("todo.py", "# TODO\n"), ("todo.md", "TODO: docs\n")]);
    let scanner = Scanner::builder()
        .root(dir.path())
        .rule(Simple::new("x", "TODO", &["*.py"]))
        .rule(Simple::new("y", "TODO", &["*.md"]))
        .build()
        .unwrap();
    assert_eq!(scanner.patterns().len(), 1);

    let output = scanner.run();
    assert_eq!(output.stats.matcher_runs, 2);
    assert_eq!(output.stats.checks, 2);

    let complaints = output.collector.complaints();
    assert_eq!(complaints.len(), 2);
    for complaint in complaints {
        let files = file_names(complaint);
        match complaint.rule.as_str() {
            "x" => assert_eq!(files, vec!["todo.py"]),
            "y" => assert_eq!(files, vec!["todo.md"]),
            other => panic!("unexpected rule {other}"),
        }
    }
}

#[derive(Debug)]
struct CountingMatcher {
    runs: Arc<AtomicUsize>,
}

impl StructuredMatcher for CountingMatcher {
    fn key(&self) -> String {
        "counting:TODO".into()
    }
    fn scan(&self, text: &str) -> Vec<Match> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        text.match_indices("TODO")
            .map(|(i, m)| Match::new(Span::new(i, i + m.len())))
            .collect()
    }
}

#[test]
fn shared_matcher_runs_once_per_file() {
    let dir = tree(&[("a.py", "TODO TODO\n"), ("b.py", "TODO\n"), ("c.md", "TODO\n")]);
    let runs = Arc::new(AtomicUsize::new(0));
    let rule = |name: &'static str, glob: &'static str| {
        let mut r = Simple::new(name, "", &[]);
        r.pattern = PatternSpec::structured(CountingMatcher {
            runs: Arc::clone(&runs),
        });
        r.globs = vec![glob];
        r
    };

    let output = Scanner::builder()
        .root(dir.path())
        .rule(rule("one", "*.py"))
        .rule(rule("two", "*.py"))
        .rule(rule("three", "*"))
        .build()
        .unwrap()
        .run();

    // Three files, one distinct pattern.
    assert_eq!(runs.load(Ordering::SeqCst), 3);
    assert_eq!(output.stats.matcher_runs, 3);
    // a.py: 2 matches x 3 rules, b.py: 1 x 3, c.md: 1 x 1
    assert_eq!(output.collector.total(), 10);
}

// ── Exclude globs ──

#[test]
fn excluded_files_are_not_reported() {
    let dir = tree(&[("foo.py", "pprint(x)\n"), ("test_foo.py", "pprint(x)\n")]);
    let mut rule = Simple::new("use-pformat", "pprint", &["*.py"]);
    rule.exclude = vec!["test_*.py"];

    let output = Scanner::builder()
        .root(dir.path())
        .rule(rule)
        .build()
        .unwrap()
        .run();
    let complaints = output.collector.complaints();
    assert_eq!(complaints.len(), 1);
    assert_eq!(file_names(&complaints[0]), vec!["foo.py"]);
}

// ── Multi-line span rendering ──

#[test]
fn multiline_span_renders_with_context() {
    let dir = tree(&[(
        "five.txt",
        "line one\nline two\nline three\nline four\nline five\n",
    )]);
    let mut rule = Simple::new("multi", r"two\nline three\nline", &["*.txt"]);
    rule.severity = Severity::Warning;

    let output = Scanner::builder()
        .root(dir.path())
        .rule(rule)
        .build()
        .unwrap()
        .run();

    let options = RenderOptions {
        context_lines: 1,
        root: Some(output.root.clone()),
        ..RenderOptions::default()
    };
    let rendered = Renderer::new(options, &output.sources).render(&output.collector.complaints()[0]);
    let expected = [
        "warning - multi: matched",
        " --> five.txt[2:6 to 4:5]",
        "     1| line one",
        "     2| line two",
        "      |      ^^^",
        "     3| line three",
        "      | ^^^^^^^^^^",
        "     4| line four",
        "      | ^^^^",
        "     5| line five",
    ]
    .join("\n");
    assert_eq!(rendered, expected);
}

// ── Rejected rule sets fail before any read ──

#[test]
fn no_rules_fails_before_touching_the_tree() {
    let err = Scanner::builder()
        .root("/this/path/does/not/exist")
        .build()
        .err()
        .unwrap();
    assert!(matches!(err, ScanError::NoRules));
}

#[test]
fn empty_glob_fails_at_build() {
    let dir = tree(&[("a.py", "x")]);
    let err = Scanner::builder()
        .root(dir.path())
        .rule(Simple::new("x", "x", &[]))
        .build()
        .err()
        .unwrap();
    assert!(matches!(err, ScanError::EmptyGlobSet { ref rule } if rule == "x"));
}

// ── Finalize runs once, after every check ──

struct Recording {
    name: &'static str,
    events: Arc<Mutex<Vec<String>>>,
    seen: Vec<PathBuf>,
}

impl Rule for Recording {
    fn name(&self) -> &str {
        self.name
    }
    fn pattern(&self) -> PatternSpec {
        PatternSpec::Everything
    }
    fn globs(&self) -> Vec<String> {
        vec!["*.txt".into()]
    }
    fn check(&mut self, ctx: &MatchContext<'_>) -> Result<Vec<Complaint>, RuleError> {
        self.events.lock().unwrap().push(format!("check {}", self.name));
        self.seen.push(ctx.path.to_path_buf());
        Ok(vec![])
    }
    fn finalize(&mut self) -> Result<Vec<Complaint>, RuleError> {
        self.events.lock().unwrap().push(format!("finalize {}", self.name));
        let complaint = self.seen.iter().fold(
            Complaint::new(self.name, Severity::Warning, "seen files"),
            |c, path| c.with_note(path, Span::empty(0), "seen"),
        );
        Ok(vec![complaint])
    }
}

#[test]
fn finalize_runs_once_after_all_checks() {
    let dir = tree(&[("a.txt", "a"), ("b.txt", "b"), ("c.txt", "c")]);
    let events = Arc::new(Mutex::new(Vec::new()));
    let recording = |name| Recording {
        name,
        events: Arc::clone(&events),
        seen: vec![],
    };

    let output = Scanner::builder()
        .root(dir.path())
        .rule(recording("first"))
        .rule(recording("second"))
        .build()
        .unwrap()
        .run();

    let events = events.lock().unwrap().clone();
    assert_eq!(events.len(), 8);
    assert!(events[..6].iter().all(|e| e.starts_with("check")));
    assert_eq!(events[6..], ["finalize first", "finalize second"]);

    let complaints = output.collector.complaints();
    assert_eq!(complaints.len(), 2);
    assert_eq!(file_names(&complaints[0]), vec!["a.txt", "b.txt", "c.txt"]);
    assert_eq!(output.collector.exit_code(), 0);
}

// ── Exit codes ──

#[test]
fn exit_code_follows_severity() {
    let dir = tree(&[("a.py", "warn crit\n")]);
    let mut warn = Simple::new("w", "warn", &["*.py"]);
    warn.severity = Severity::Warning;

    let warnings_only = Scanner::builder()
        .root(dir.path())
        .rule(warn)
        .build()
        .unwrap()
        .run();
    assert_eq!(warnings_only.collector.exit_code(), 0);

    let mut warn = Simple::new("w", "warn", &["*.py"]);
    warn.severity = Severity::Warning;
    let mixed = Scanner::builder()
        .root(dir.path())
        .rule(warn)
        .rule(Simple::new("c", "crit", &["*.py"]))
        .build()
        .unwrap()
        .run();
    assert_eq!(mixed.collector.exit_code(), 1);
    assert_eq!(
        mixed.collector.summary(),
        "2 Complaints found: 1 Warnings, 1 Critical."
    );
}

// ── Scope filtering ──

struct StagedOnly(PathBuf);

impl VcsIndex for StagedOnly {
    fn staged(&self) -> BTreeSet<PathBuf> {
        BTreeSet::from([self.0.clone()])
    }
    fn untracked(&self) -> BTreeSet<PathBuf> {
        BTreeSet::new()
    }
}

#[test]
fn scope_filter_limits_scanned_files() {
    let dir = tree(&[("a.py", "x"), ("b.py", "x")]);
    let root = fs::canonicalize(dir.path()).unwrap();
    let vcs = StagedOnly(root.join("b.py"));

    let output = Scanner::builder()
        .root(&root)
        .scope(ScopeFilter::from_vcs(&vcs, true, false))
        .rule(Simple::new("x", "x", &["*.py"]))
        .build()
        .unwrap()
        .run();

    assert_eq!(output.stats.files_filtered, 1);
    assert_eq!(output.collector.total(), 1);
    assert_eq!(file_names(&output.collector.complaints()[0]), vec!["b.py"]);
}

#[test]
fn everything_pattern_spans_whole_file() {
    let dir = tree(&[("a.md", "hello\nworld\n"), ("empty.md", "")]);
    let output = Scanner::builder()
        .root(dir.path())
        .rule(Simple::new("exists", "", &["*.md"]))
        .build()
        .unwrap()
        .run();

    let spans: Vec<(String, Span)> = output
        .collector
        .complaints()
        .iter()
        .flat_map(|c| {
            c.file_spans.iter().flat_map(|(p, s)| {
                let name = Path::new(p).file_name().unwrap().to_string_lossy().into_owned();
                s.keys().map(move |span| (name.clone(), *span))
            })
        })
        .collect();
    assert_eq!(
        spans,
        vec![
            ("a.md".to_string(), Span::new(0, 12)),
            ("empty.md".to_string(), Span::new(0, 0)),
        ]
    );
}
