//! Go-to-definition against an indexed workspace

use crate::common::{TestProject, offset_after};
use lsp_types::{Position, Range};
use stylescope::ScssDocument;
use stylescope::ide::find_definition;
use stylescope::indexing::WorkspaceEvent;

fn project() -> TestProject {
    let project = TestProject::new();
    project.add_file("_variables.scss", "// Colors\n\n$color: red;\n");
    project.add_file(
        "_mixins.scss",
        "@mixin button($size) { padding: $size; }\n@function double($n) { @return $n * 2; }",
    );
    project.add_file(
        "main.scss",
        "@import 'variables';\n.a {\n  color: $color;\n  @include button(1px);\n  width: double(2px);\n}",
    );
    project
}

#[tokio::test]
async fn test_variable_definition_in_other_file() {
    let project = project();
    let (_, mut index) = project.index().await;
    let main = project.open("main.scss");

    let offset = offset_after(&main.text, "color: $");
    let location = find_definition(&mut index, &main, offset).unwrap();

    assert_eq!(Some(location.uri), project.doc("_variables.scss").to_url());
    assert_eq!(
        location.range,
        Range::new(Position::new(2, 0), Position::new(2, 6))
    );
}

#[tokio::test]
async fn test_mixin_and_function_definitions() {
    let project = project();
    let (_, mut index) = project.index().await;
    let main = project.open("main.scss");

    let mixin = find_definition(&mut index, &main, offset_after(&main.text, "@include bu")).unwrap();
    assert_eq!(Some(mixin.uri), project.doc("_mixins.scss").to_url());
    assert_eq!(
        mixin.range,
        Range::new(Position::new(0, 7), Position::new(0, 13))
    );

    let function = find_definition(&mut index, &main, offset_after(&main.text, "width: dou")).unwrap();
    assert_eq!(
        function.range,
        Range::new(Position::new(1, 10), Position::new(1, 16))
    );
}

#[tokio::test]
async fn test_non_references_have_no_definition() {
    let project = project();
    let (_, mut index) = project.index().await;
    let main = project.open("main.scss");

    // Property name, selector and the argument of an include
    for needle in ["  col", ".", "button(1p"] {
        let offset = offset_after(&main.text, needle);
        assert!(
            find_definition(&mut index, &main, offset).is_none(),
            "unexpected definition at {needle:?}"
        );
    }
}

#[tokio::test]
async fn test_unsaved_text_is_written_back() {
    let project = project();
    let (_, mut index) = project.index().await;

    let edited = ScssDocument::new(
        project.doc("main.scss"),
        "$local: 1px;\n.a { margin: $color; }",
    );
    let offset = offset_after(&edited.text, "margin: $");
    assert!(find_definition(&mut index, &edited, offset).is_some());

    let table = index.get(&project.doc("main.scss")).unwrap();
    assert_eq!(table.variables[0].name, "$local");
    assert!(table.imports.is_empty());
}

#[tokio::test]
async fn test_deleted_file_no_longer_answers() {
    let project = project();
    let (scanner, mut index) = project.index().await;
    let main = project.open("main.scss");
    let offset = offset_after(&main.text, "color: $");
    assert!(find_definition(&mut index, &main, offset).is_some());

    let removed = project.remove_file("_variables.scss");
    let event = WorkspaceEvent::deleted(&removed).unwrap();
    scanner.apply(&mut index, &event, &project.root()).await;

    assert!(find_definition(&mut index, &main, offset).is_none());
}
