use repodoc::serialize::{NO_DECLARATIONS, to_api_index_text, to_diagram_text};
use repodoc::{Analyzer, CodeContextGraph, NodeKind, ScanOptions};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

fn write(root: &Path, rel: &str, content: &[u8]) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn analyze(root: &Path) -> CodeContextGraph {
    Analyzer::new(root, ScanOptions::default())
        .unwrap()
        .analyze()
        .unwrap()
}

fn ids_of(graph: &CodeContextGraph, kind: NodeKind) -> BTreeSet<String> {
    graph
        .nodes()
        .filter(|n| n.kind == kind)
        .map(|n| n.id.clone())
        .collect()
}

#[test]
fn two_files_sharing_a_function_name() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.py", b"def foo(): pass\nclass Bar: pass\n");
    write(dir.path(), "b.py", b"def foo(): pass\n");

    let graph = analyze(dir.path());

    assert_eq!(
        ids_of(&graph, NodeKind::File),
        BTreeSet::from(["file:a.py".to_string(), "file:b.py".to_string()])
    );
    assert_eq!(
        ids_of(&graph, NodeKind::Function),
        BTreeSet::from([
            "func:file:a.py:foo".to_string(),
            "func:file:b.py:foo".to_string()
        ])
    );
    assert_eq!(
        ids_of(&graph, NodeKind::Class),
        BTreeSet::from(["class:file:a.py:Bar".to_string()])
    );
    assert_eq!(graph.node_count(), 5);
    assert_eq!(graph.edge_count(), 3);

    let index = to_api_index_text(&graph);
    assert_eq!(
        index,
        "### API Reference Data\n\n\
         **File: `a.py`**\n  - Classes: Bar\n  - Functions: foo()\n\n\
         **File: `b.py`**\n  - Functions: foo()\n\n"
    );
}

#[test]
fn file_nodes_match_non_ignored_sources() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(root, "setup.py", b"");
    write(root, "pkg/__init__.py", b"");
    write(root, "pkg/core/engine.py", b"class Engine: pass\n");
    write(root, "pkg/notes.txt", b"def not_python(): pass\n");
    write(root, "scripts/run.sh", b"");
    write(root, ".venv/lib/site.py", b"def hidden(): pass\n");
    write(root, "node_modules/pkg/index.py", b"");
    write(root, ".vscode/settings.py", b"");

    let graph = analyze(root);
    let files: BTreeSet<_> = graph.files().map(|n| n.file.clone()).collect();
    assert_eq!(
        files,
        BTreeSet::from([
            "pkg/__init__.py".to_string(),
            "pkg/core/engine.py".to_string(),
            "setup.py".to_string(),
        ])
    );
    assert!(graph.contains("class:file:pkg/core/engine.py:Engine"));
    assert!(!graph.nodes().any(|n| n.name == "hidden" || n.name == "not_python"));
}

#[test]
fn repeated_names_collapse_to_one_node() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "dup.py",
        b"def foo():\n    pass\n\ndef foo():\n    return 2\n\nclass K:\n    def foo(self):\n        pass\n",
    );

    let graph = analyze(dir.path());
    let decls = graph.declarations_in("dup.py");
    let names: Vec<_> = decls.iter().map(|n| (n.kind, n.name.as_str())).collect();
    assert_eq!(names, vec![(NodeKind::Function, "foo"), (NodeKind::Class, "K")]);
    assert_eq!(graph.edge_count(), 2);
}

#[test]
fn nested_declarations_attach_to_the_file() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "nest.py",
        b"class Outer:\n    class Inner:\n        def method(self):\n            def helper():\n                pass\n",
    );

    let graph = analyze(dir.path());
    let edges: BTreeSet<_> = graph
        .edges()
        .map(|(s, t, _)| (s.id.clone(), t.id.clone()))
        .collect();
    let file = "file:nest.py".to_string();
    assert_eq!(
        edges,
        BTreeSet::from([
            (file.clone(), "class:file:nest.py:Outer".to_string()),
            (file.clone(), "class:file:nest.py:Inner".to_string()),
            (file.clone(), "func:file:nest.py:method".to_string()),
            (file, "func:file:nest.py:helper".to_string()),
        ])
    );
}

#[test]
fn malformed_files_do_not_stop_the_scan() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "broken.py", b"def ok():\n    pass\n\nclass (:\n  ))\n");
    write(dir.path(), "binary.py", b"\xff\xfe\x00\x01def \xc3(\n");
    write(dir.path(), "fine.py", b"def fine(): pass\n");

    let mut analyzer = Analyzer::new(dir.path(), ScanOptions::default()).unwrap();
    let graph = analyzer.analyze().unwrap();

    assert!(graph.contains("file:broken.py"));
    assert!(graph.contains("file:binary.py"));
    assert!(graph.contains("func:file:broken.py:ok"));
    assert!(graph.contains("func:file:fine.py:fine"));
    assert_eq!(analyzer.stats().files, 3);
}

#[test]
fn unreadable_file_keeps_only_its_node() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "huge.py", b"def huge():\n    return 'x'\n");
    write(dir.path(), "tiny.py", b"def t(): 0\n");

    let options = ScanOptions {
        max_file_bytes: 12,
        ..ScanOptions::default()
    };
    let mut analyzer = Analyzer::new(dir.path(), options).unwrap();
    let graph = analyzer.analyze().unwrap();

    assert!(graph.contains("file:huge.py"));
    assert!(graph.declarations_in("huge.py").is_empty());
    assert!(graph.contains("func:file:tiny.py:t"));
    assert_eq!(analyzer.stats().failed, 1);
}

#[test]
fn only_ignored_directory_gives_empty_graph() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), ".git/hooks/pre_commit.py", b"def hook(): pass\n");

    let graph = analyze(dir.path());
    assert!(graph.is_empty());
    assert_eq!(to_diagram_text(&graph), "graph TD;\n");
    assert_eq!(to_api_index_text(&graph), NO_DECLARATIONS);
}

#[test]
fn reanalysis_reproduces_identifiers() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "m/a.py", b"def x(): pass\nclass Y: pass\n");
    write(dir.path(), "m/b.py", b"def z(): pass\n");

    let first = analyze(dir.path());
    let second = analyze(dir.path());
    let ids = |g: &CodeContextGraph| g.nodes().map(|n| n.id.clone()).collect::<BTreeSet<_>>();
    assert_eq!(ids(&first), ids(&second));
    assert_eq!(to_diagram_text(&first), to_diagram_text(&second));
}

#[test]
fn diagram_lists_every_node_and_edge() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "pkg/mod.py", b"def run(): pass\nclass App: pass\n");

    let text = to_diagram_text(&analyze(dir.path()));
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines[0], "graph TD;");
    assert!(lines.contains(&"    file_pkg_mod_py((\"mod.py\"))"));
    assert!(lines.contains(&"    func_file_pkg_mod_py_run[/\"run()\"/]"));
    assert!(lines.contains(&"    class_file_pkg_mod_py_App[\"App\"]"));
    assert!(lines.contains(&"    file_pkg_mod_py -- defines --> func_file_pkg_mod_py_run"));
    assert!(lines.contains(&"    file_pkg_mod_py -- defines --> class_file_pkg_mod_py_App"));
    assert_eq!(lines.len(), 6);
}

#[cfg(unix)]
#[test]
fn symlinked_sources_are_file_nodes() {
    let dir = tempfile::tempdir().unwrap();
    let outside = tempfile::tempdir().unwrap();
    write(dir.path(), "plain.py", b"def plain(): pass\n");
    write(outside.path(), "real.py", b"class Linked: pass\n");
    write(outside.path(), "lib/deep.py", b"def deep(): pass\n");
    std::os::unix::fs::symlink(outside.path().join("real.py"), dir.path().join("link.py"))
        .unwrap();
    std::os::unix::fs::symlink(outside.path().join("lib"), dir.path().join("lib")).unwrap();

    let graph = analyze(dir.path());
    let files: BTreeSet<_> = graph.files().map(|n| n.file.clone()).collect();
    assert_eq!(
        files,
        BTreeSet::from(["link.py".to_string(), "plain.py".to_string()])
    );
    assert!(graph.contains("class:file:link.py:Linked"));
    assert!(!graph.nodes().any(|n| n.name == "deep"));
}
