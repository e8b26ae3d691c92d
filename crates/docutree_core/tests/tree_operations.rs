//! End-to-end tree operations against the real filesystem.

use std::fs;
use std::path::Path;

use docutree_core::category::{self, CategoryData};
use docutree_core::frontmatter::{self, DocFrontmatter};
use docutree_core::fs::RealFileSystem;
use docutree_core::tree::find_in;
use docutree_core::workspace::{DocumentFields, ReorderOutcome};
use docutree_core::{Config, ConfirmRequest, DocNode, DocutreeError, NodeKind, Workspace};
use tempfile::TempDir;

fn tempdir() -> TempDir {
    tempfile::Builder::new().prefix("site").tempdir().unwrap()
}

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn doc(title: &str, position: Option<i64>) -> String {
    match position {
        Some(p) => format!("---\ntitle: {title}\nsidebar_position: {p}\n---\n# {title}\n"),
        None => format!("---\ntitle: {title}\n---\n# {title}\n"),
    }
}

fn open(dir: &TempDir) -> Workspace<RealFileSystem> {
    Workspace::with_config(RealFileSystem, dir.path(), Config::default())
}

fn docs_children(workspace: &mut Workspace<RealFileSystem>) -> Vec<DocNode> {
    let tree = workspace.refresh();
    tree[0].children.clone().unwrap()
}

fn file_names(nodes: &[DocNode]) -> Vec<String> {
    nodes.iter().map(DocNode::file_name).collect()
}

fn read_position(path: &Path) -> Option<i64> {
    if path.is_dir() {
        category::read(&RealFileSystem, path).and_then(|meta| meta.position)
    } else {
        frontmatter::read_metadata(&RealFileSystem, path).sidebar_position
    }
}

/// docs/a.md (2), docs/b.md (1), docs/guide/ (category, 3)
fn scenario_project() -> TempDir {
    let dir = tempdir();
    let docs = dir.path().join("docs");
    write(&docs.join("a.md"), &doc("A", Some(2)));
    write(&docs.join("b.md"), &doc("B", Some(1)));
    write(
        &category::sidecar_path(&docs.join("guide")),
        &category::render(&CategoryData {
            label: "Guide".to_string(),
            position: 3,
            description: String::new(),
        })
        .unwrap(),
    );
    dir
}

#[test]
fn test_positioned_documents_sort_ascending_before_unpositioned() {
    let dir = tempdir();
    let docs = dir.path().join("docs");
    write(&docs.join("three.md"), &doc("Three", Some(3)));
    write(&docs.join("one.md"), &doc("One", Some(1)));
    write(&docs.join("two.md"), &doc("Two", Some(2)));
    write(&docs.join("d.md"), &doc("D", None));

    let mut workspace = open(&dir);
    let children = docs_children(&mut workspace);
    assert_eq!(
        file_names(&children),
        vec!["one.md", "two.md", "three.md", "d.md"]
    );
}

#[test]
fn test_reorder_leaves_contiguous_positions() {
    let dir = tempdir();
    let docs = dir.path().join("docs");
    write(&docs.join("a.md"), &doc("A", Some(5)));
    write(&docs.join("b.md"), &doc("B", Some(5)));
    write(&docs.join("c.md"), &doc("C", Some(9)));
    write(&docs.join("d.md"), "# no frontmatter\n");

    let mut workspace = open(&dir);
    let children = docs_children(&mut workspace);
    let last = children.last().unwrap().clone();
    let first = children[0].clone();

    assert_eq!(
        workspace.move_or_reorder(&last, &first).unwrap(),
        ReorderOutcome::Reordered
    );

    let mut positions: Vec<i64> = ["a.md", "b.md", "c.md", "d.md"]
        .iter()
        .filter_map(|name| read_position(&docs.join(name)))
        .collect();
    positions.sort();
    assert_eq!(positions, vec![1, 2, 3, 4]);
    assert_eq!(read_position(&docs.join("d.md")), Some(1));
    assert_eq!(
        fs::read_to_string(docs.join("d.md")).unwrap().lines().last(),
        Some("# no frontmatter")
    );
}

#[test]
fn test_frontmatter_round_trip_keeps_fields_and_body() {
    let dir = tempdir();
    let path = dir.path().join("x.md");
    let body = "\nSome *text*.\n\n```yaml\n---\nnot: frontmatter\n---\n```\n";
    let frontmatter = DocFrontmatter {
        title: Some("X".to_string()),
        sidebar_position: Some(5),
        ..DocFrontmatter::default()
    };

    frontmatter::write_document(&RealFileSystem, &path, &frontmatter, body).unwrap();
    let read = frontmatter::read_document(&RealFileSystem, &path).unwrap();

    assert_eq!(read.frontmatter.title.as_deref(), Some("X"));
    assert_eq!(read.frontmatter.sidebar_position, Some(5));
    assert_eq!(read.body, body);
}

#[test]
fn test_category_sidecar_rewrite_is_byte_identical() {
    let dir = tempdir();
    let folder = dir.path().join("a");
    fs::create_dir(&folder).unwrap();
    let data = CategoryData {
        label: "A".to_string(),
        position: 2,
        description: "d".to_string(),
    };

    category::write(&RealFileSystem, &folder, &data).unwrap();
    let first = fs::read_to_string(category::sidecar_path(&folder)).unwrap();

    let meta = category::read(&RealFileSystem, &folder).unwrap();
    let reread = CategoryData {
        label: meta.label.unwrap(),
        position: meta.position.unwrap(),
        description: meta.description.unwrap(),
    };
    assert_eq!(reread, data);

    category::write(&RealFileSystem, &folder, &reread).unwrap();
    let second = fs::read_to_string(category::sidecar_path(&folder)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_images_collapse_into_one_group() {
    let dir = tempdir();
    let docs = dir.path().join("docs");
    write(&docs.join("a.md"), &doc("A", Some(1)));
    write(&docs.join("b.md"), &doc("B", Some(2)));
    write(&docs.join("c.md"), &doc("C", Some(3)));
    write(&docs.join("shot.png"), "png");
    write(&docs.join("diagram.svg"), "<svg/>");

    let mut workspace = open(&dir);
    let children = docs_children(&mut workspace);
    assert_eq!(children.len(), 4);

    let group = children
        .iter()
        .find(|n| matches!(n.kind, NodeKind::ImageGroup { .. }))
        .unwrap();
    assert_eq!(group.kind, NodeKind::ImageGroup { count: 2 });
    assert_eq!(group.children.as_ref().map(Vec::len), Some(2));
    assert_eq!(group.path, docs.join("images"));
    assert!(docs.join("images/shot.png").is_file());

    // A second refresh sees the same shape.
    assert_eq!(docs_children(&mut workspace), children);
}

#[test]
fn test_scenario_order_and_reorder() {
    let dir = scenario_project();
    let docs = dir.path().join("docs");
    let mut workspace = open(&dir);

    let children = docs_children(&mut workspace);
    assert_eq!(file_names(&children), vec!["b.md", "a.md", "guide"]);

    let tree = workspace.refresh();
    let a = find_in(&tree, &docs.join("a.md")).unwrap().clone();
    let b = find_in(&tree, &docs.join("b.md")).unwrap().clone();
    workspace.move_or_reorder(&a, &b).unwrap();

    assert_eq!(read_position(&docs.join("a.md")), Some(1));
    assert_eq!(read_position(&docs.join("b.md")), Some(2));
    assert_eq!(read_position(&docs.join("guide")), Some(3));
    assert_eq!(
        file_names(&docs_children(&mut workspace)),
        vec!["a.md", "b.md", "guide"]
    );
}

#[test]
fn test_scenario_category_creation_and_cancel() {
    let dir = scenario_project();
    let docs = dir.path().join("docs");
    let workspace = open(&dir);

    let err = workspace.begin_category(&docs, "My Cat!").unwrap_err();
    assert!(matches!(err, DocutreeError::InvalidCategoryName(_)));
    assert!(!docs.join("My Cat!").exists());

    let mut draft = workspace.begin_category(&docs, "my-cat").unwrap();
    assert!(docs.join("my-cat").is_dir());
    assert_eq!(draft.proposed().position, 4);
    assert!(draft.cancel().unwrap());
    assert!(!docs.join("my-cat").exists());

    let created = workspace.create_category(&docs, "my-cat", None).unwrap();
    assert_eq!(created, docs.join("my-cat"));
    assert!(category::sidecar_path(&created).is_file());
}

#[test]
fn test_scenario_delete_category_with_documents() {
    let dir = scenario_project();
    let docs = dir.path().join("docs");
    let guide = docs.join("guide");
    write(&guide.join("one.md"), &doc("One", Some(1)));
    write(&guide.join("two.md"), &doc("Two", Some(2)));

    let mut workspace = open(&dir);
    let tree = workspace.refresh();
    let node = find_in(&tree, &guide).unwrap().clone();

    let mut asked: Vec<ConfirmRequest> = Vec::new();
    let mut decline_second = |request: &ConfirmRequest| {
        asked.push(request.clone());
        asked.len() < 2
    };
    let err = workspace.delete_entry(&node, &mut decline_second).unwrap_err();
    assert!(matches!(err, DocutreeError::ConfirmationRequired(_)));
    assert!(guide.join("one.md").exists());
    assert_eq!(
        asked[1],
        ConfirmRequest::DeleteFolderWithDocuments {
            path: guide.clone(),
            document_count: 2
        }
    );

    let mut count = 0;
    let mut accept = |_: &ConfirmRequest| {
        count += 1;
        true
    };
    workspace.delete_entry(&node, &mut accept).unwrap();
    assert_eq!(count, 2);
    assert!(!guide.exists());

    let tree = workspace.refresh();
    assert!(find_in(&tree, &guide).is_none());
    assert!(find_in(&tree, &guide.join("one.md")).is_none());
}

#[test]
fn test_new_document_joins_the_end_of_the_folder() {
    let dir = scenario_project();
    let docs = dir.path().join("docs");
    let mut workspace = open(&dir);

    let path = workspace
        .create_document(
            &docs,
            None,
            DocumentFields::titled("Getting Started"),
        )
        .unwrap();
    assert_eq!(path, docs.join("getting-started.md"));

    let names = file_names(&docs_children(&mut workspace));
    assert_eq!(names.last().map(String::as_str), Some("getting-started.md"));
    assert_eq!(read_position(&path), Some(4));
}

#[test]
fn test_project_root_fallback_leaves_files_in_place() {
    let dir = tempdir();
    let root = dir.path();
    write(&root.join("README.md"), "# Readme\n");
    write(&root.join("logo.png"), "img");
    write(&root.join("static/img/favicon.png"), "img");
    write(&root.join("node_modules/pkg/icon.png"), "img");
    write(&root.join("node_modules/pkg/README.md"), "# Pkg\n");

    let mut workspace = open(&dir);
    let tree = workspace.refresh();
    workspace.refresh();

    assert!(root.join("logo.png").exists());
    assert!(!root.join("static/logo.png").exists());
    assert!(!root.join("images").exists());
    assert!(root.join("node_modules/pkg/icon.png").exists());
    assert!(!root.join("node_modules/pkg/images").exists());

    let children = tree[0].children.as_ref().unwrap();
    assert!(find_in(children, &root.join("node_modules")).is_none());
    assert!(find_in(children, &root.join("README.md")).is_some());
}
