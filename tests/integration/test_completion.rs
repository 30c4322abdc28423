//! Completion against an indexed workspace

use crate::common::{TestProject, offset_after};
use lsp_types::{CompletionItem, CompletionItemKind, Documentation};
use stylescope::ide::complete;
use stylescope::{ScssDocument, Settings};

fn find<'a>(items: &'a [CompletionItem], label: &str) -> &'a CompletionItem {
    items
        .iter()
        .find(|item| item.label == label)
        .unwrap_or_else(|| panic!("no completion item {label}"))
}

fn labels(items: &[CompletionItem]) -> Vec<&str> {
    items.iter().map(|item| item.label.as_str()).collect()
}

fn shared_project() -> TestProject {
    let project = TestProject::new();
    project.add_file("_colors.scss", "$primary: #FFF;\n$gutter: 8px;");
    project.add_file(
        "_spacing.scss",
        "$space: 4px;\n@mixin stack($gap: $space) { gap: $gap; }\n@function rem($px) { @return $px / 16px; }",
    );
    project
}

#[tokio::test]
async fn test_document_without_imports_sees_nothing_as_implicit() {
    let project = shared_project();
    project.add_file("main.scss", ".a { color: $ }");
    let (_, mut index) = project.index().await;
    let settings = Settings::default();

    let main = project.open("main.scss");
    let offset = offset_after(&main.text, "color: $");
    let list = complete(&mut index, &main, offset, &settings.completion).await;

    assert!(labels(&list.items).contains(&"$primary"));
    assert!(labels(&list.items).contains(&"$space"));
    assert!(
        list.items
            .iter()
            .all(|item| !item.detail.as_deref().unwrap_or("").starts_with("(implicitly)"))
    );
}

#[tokio::test]
async fn test_unimported_documents_are_labeled_implicit() {
    let project = shared_project();
    project.add_file("main.scss", "@import 'colors';\n.a { color: $ }");
    let (_, mut index) = project.index().await;
    let settings = Settings::default();

    let main = project.open("main.scss");
    let offset = offset_after(&main.text, "color: $");
    let list = complete(&mut index, &main, offset, &settings.completion).await;

    let primary = find(&list.items, "$primary");
    assert_eq!(primary.detail.as_deref(), Some("_colors.scss"));
    assert_eq!(primary.kind, Some(CompletionItemKind::COLOR));
    assert_eq!(
        primary.documentation,
        Some(Documentation::String("#ffffff".to_string()))
    );

    let space = find(&list.items, "$space");
    assert_eq!(space.detail.as_deref(), Some("(implicitly) _spacing.scss"));
    assert_eq!(space.kind, Some(CompletionItemKind::VARIABLE));
    // @import documents never get a @use edit
    assert!(space.additional_text_edits.is_none());
}

#[tokio::test]
async fn test_use_only_documents_get_use_edits() {
    let project = shared_project();
    project.add_file("main.scss", "@use 'colors';\n\n.a { margin: $ }");
    let (_, mut index) = project.index().await;
    let settings = Settings::default();

    let main = project.open("main.scss");
    let offset = offset_after(&main.text, "margin: $");
    let list = complete(&mut index, &main, offset, &settings.completion).await;

    let space = find(&list.items, "$space");
    let edits = space.additional_text_edits.as_ref().unwrap();
    assert_eq!(edits.len(), 1);
    assert_eq!(edits[0].new_text, "\n@use 'spacing';");
    assert_eq!(edits[0].range.start.line, 0);
    assert_eq!(edits[0].range.start.character, 14);

    assert!(find(&list.items, "$primary").additional_text_edits.is_none());
}

#[tokio::test]
async fn test_suggest_from_use_only_drops_implicit_items() {
    let project = shared_project();
    project.add_file("main.scss", "@use 'colors';\n.a { margin: $ }");
    let (_, mut index) = project.index().await;
    let mut settings = Settings::default();
    settings.completion.suggest_from_use_only = true;

    let main = project.open("main.scss");
    let offset = offset_after(&main.text, "margin: $");
    let list = complete(&mut index, &main, offset, &settings.completion).await;

    assert_eq!(labels(&list.items), vec!["$primary", "$gutter"]);
}

#[tokio::test]
async fn test_mixins_after_include() {
    let project = shared_project();
    project.add_file("main.scss", ".a {\n  @include s\n}");
    let (_, mut index) = project.index().await;
    let settings = Settings::default();

    let main = project.open("main.scss");
    let offset = offset_after(&main.text, "@include s");
    let list = complete(&mut index, &main, offset, &settings.completion).await;

    assert_eq!(labels(&list.items), vec!["stack"]);
    let stack = &list.items[0];
    assert_eq!(stack.insert_text.as_deref(), Some("stack"));
    assert_eq!(
        stack.documentation,
        Some(Documentation::String("stack($gap: $space)".to_string()))
    );
}

#[tokio::test]
async fn test_functions_after_operator() {
    let project = shared_project();
    project.add_file("main.scss", ".a { width: 10px + r }");
    let (_, mut index) = project.index().await;
    let settings = Settings::default();

    let main = project.open("main.scss");
    let offset = offset_after(&main.text, "+ r");
    let list = complete(&mut index, &main, offset, &settings.completion).await;

    let rem = find(&list.items, "rem");
    assert_eq!(rem.insert_text.as_deref(), Some("rem()"));
    assert!(labels(&list.items).iter().all(|label| !label.starts_with('$')));
}

#[tokio::test]
async fn test_disabled_groups_and_comments() {
    let project = shared_project();
    project.add_file("main.scss", ".a { color: $ } // $");
    let (_, mut index) = project.index().await;
    let mut settings = Settings::default();

    let main = project.open("main.scss");
    let in_comment = main.text.len();
    let list = complete(&mut index, &main, in_comment, &settings.completion).await;
    assert!(list.items.is_empty());

    settings.completion.suggest_variables = false;
    let offset = offset_after(&main.text, "color: $");
    let list = complete(&mut index, &main, offset, &settings.completion).await;
    assert!(!list.items.is_empty());
    assert!(labels(&list.items).iter().all(|label| !label.starts_with('$')));
}

#[tokio::test]
async fn test_mixin_locals_only_inside_their_mixin() {
    let project = shared_project();
    let source = "@mixin card {\n  $pad: 2px;\n  padding: $\n}\n.b { margin: $ }";
    project.add_file("main.scss", source);
    let (_, mut index) = project.index().await;
    let settings = Settings::default();
    let main = ScssDocument::new(project.doc("main.scss"), source);

    let inside = offset_after(source, "padding: $");
    let list = complete(&mut index, &main, inside, &settings.completion).await;
    assert!(labels(&list.items).contains(&"$pad"));

    let outside = offset_after(source, "margin: $");
    let list = complete(&mut index, &main, outside, &settings.completion).await;
    assert!(!labels(&list.items).contains(&"$pad"));
    assert!(labels(&list.items).contains(&"$gutter"));
}

#[tokio::test]
async fn test_import_path_completion() {
    let project = shared_project();
    project.add_file("components/_card.scss", "");
    project.add_file("main.scss", "@use '';");
    let (_, mut index) = project.index().await;
    let settings = Settings::default();

    let main = project.open("main.scss");
    let offset = offset_after(&main.text, "@use '");
    let list = complete(&mut index, &main, offset, &settings.completion).await;

    assert_eq!(labels(&list.items), vec!["components", "_colors", "_spacing"]);
    assert_eq!(list.items[0].kind, Some(CompletionItemKind::FOLDER));
    assert_eq!(list.items[0].sort_text.as_deref(), Some("0components"));
}
