//! Initial population of the workspace index

use crate::common::TestProject;
use stylescope::symbols::{ImportKind, SymbolTable};
use stylescope::{Settings, WorkspaceIndex};

fn snapshot(index: &WorkspaceIndex) -> serde_json::Value {
    let tables: Vec<&SymbolTable> = index.documents().collect();
    serde_json::to_value(tables).unwrap()
}

#[tokio::test]
async fn test_scanning_twice_gives_the_same_index() {
    let project = TestProject::new();
    project.add_file("main.scss", "@import 'partials/buttons';\n$gap: 4px;");
    project.add_file(
        "partials/_buttons.scss",
        "@mixin button($size) { padding: $size; }",
    );

    let (scanner, mut index) = project.index().await;
    let first = snapshot(&index);

    scanner.initialize(&mut index, project.path()).await.unwrap();
    assert_eq!(snapshot(&index), first);
    assert_eq!(index.len(), 2);
}

#[tokio::test]
async fn test_imported_partial_records_import_text() {
    let project = TestProject::new();
    project.add_file("main.scss", "@import 'partials/buttons';");
    project.add_file("partials/_buttons.scss", "$radius: 2px;");

    let (_, index) = project.index().await;
    let partial = index.get(&project.doc("partials/_buttons.scss")).unwrap();
    assert_eq!(partial.document_import_path, "partials/buttons");
    assert_eq!(partial.variables[0].name, "$radius");
}

#[tokio::test]
async fn test_import_cycle_terminates() {
    let project = TestProject::new();
    project.add_file("a.scss", "@import 'b';\n$a: 1;");
    project.add_file("b.scss", "@import 'a';\n$b: 2;");

    let scanner = project.scanner();
    let mut index = WorkspaceIndex::new();
    let stats = scanner
        .scan_all(&mut index, vec![project.doc("a.scss")])
        .await;

    assert_eq!(stats.files_scanned, 2);
    assert!(index.contains(&project.doc("a.scss")));
    assert!(index.contains(&project.doc("b.scss")));
}

#[tokio::test]
async fn test_imports_outside_the_root_are_followed() {
    let project = TestProject::new();
    project.add_file("shared/_tokens.scss", "$brand: #336699;");
    project.add_file("app/main.scss", "@use '../shared/tokens';");

    let scanner = project.scanner();
    let mut index = WorkspaceIndex::new();
    scanner
        .initialize(&mut index, &project.path().join("app"))
        .await
        .unwrap();

    let tokens = index.get(&project.doc("shared/_tokens.scss")).unwrap();
    assert_eq!(tokens.variables[0].value.as_deref(), Some("#336699"));
}

#[tokio::test]
async fn test_builtin_and_css_imports_are_recorded_not_followed() {
    let project = TestProject::new();
    project.add_file(
        "main.scss",
        "@use 'sass:math';\n@import 'vendor/reset.css';\n@import url(https://fonts.example.com/x);\n@import 'theme-#{$name}';",
    );
    project.add_file("vendor/reset.css", "html { margin: 0; }");

    let (_, index) = project.index().await;
    assert_eq!(index.len(), 1);

    let main = index.get(&project.doc("main.scss")).unwrap();
    let kinds: Vec<ImportKind> = main.imports.iter().map(|i| i.kind).collect();
    assert_eq!(kinds[0], ImportKind::Use);
    assert!(main.imports[0].is_builtin());
    assert!(main.imports[1].css);
    assert!(main.imports.iter().any(|i| i.dynamic));
    assert!(main.imports.iter().all(|i| !i.is_followable()));
}

#[tokio::test]
async fn test_excluded_directories_are_not_discovered() {
    let project = TestProject::new();
    project.add_file("src/app.scss", "$a: 1;");
    project.add_file("node_modules/lib/_x.scss", "$x: 1;");
    project.add_file("build/out.scss", "$o: 1;");

    let mut settings = Settings::default();
    settings.indexing.exclude.push("build/**".to_string());
    let scanner = project.scanner_with(settings);
    let mut index = WorkspaceIndex::new();
    scanner.initialize(&mut index, project.path()).await.unwrap();

    let paths: Vec<String> = index.paths().map(|p| p.to_string()).collect();
    assert_eq!(paths, vec![project.doc("src/app.scss").to_string()]);
}

#[tokio::test]
async fn test_deleted_file_disappears_on_rescan() {
    let project = TestProject::new();
    project.add_file("main.scss", "@import 'vars';");
    project.add_file("_vars.scss", "$v: 1;");

    let (scanner, mut index) = project.index().await;
    assert!(index.contains(&project.doc("_vars.scss")));

    project.remove_file("_vars.scss");
    let stats = scanner
        .scan(&mut index, vec![project.doc("_vars.scss")])
        .await;

    assert_eq!(stats.files_missing, 1);
    assert!(!index.contains(&project.doc("_vars.scss")));
    assert!(index.contains(&project.doc("main.scss")));
}
