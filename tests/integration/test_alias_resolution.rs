//! Path aliases from tsconfig.json / jsconfig.json

use crate::common::TestProject;
use stylescope::ide::links;

#[tokio::test]
async fn test_first_declared_alias_wins_over_longer_prefix() {
    let project = TestProject::new();
    project.add_file(
        "tsconfig.json",
        r#"{
            "compilerOptions": {
                "paths": {
                    "@ui/*": ["src/ui/*"],
                    "@ui/buttons/*": ["legacy/buttons/*"]
                }
            }
        }"#,
    );
    project.add_file("src/main.scss", "@use '@ui/buttons/primary';");
    project.add_file("src/ui/buttons/_primary.scss", "$primary: blue;");

    let (_, index) = project.index().await;
    let main = index.get(&project.doc("src/main.scss")).unwrap();
    assert_eq!(
        main.imports[0].target_path,
        project.doc("src/ui/buttons/primary.scss")
    );
    assert_eq!(
        index
            .get(&project.doc("src/ui/buttons/_primary.scss"))
            .map(|t| t.document_import_path.as_str()),
        Some("@ui/buttons/primary")
    );
}

#[tokio::test]
async fn test_alias_without_substitutions_falls_back_to_relative() {
    let project = TestProject::new();
    project.add_file(
        "jsconfig.json",
        r#"{ "compilerOptions": { "paths": { "@x/*": [], "@x/y": ["never/used"] } } }"#,
    );
    project.add_file("src/main.scss", "@import '@x/y';");

    let (_, index) = project.index().await;
    let main = index.get(&project.doc("src/main.scss")).unwrap();
    assert_eq!(main.imports[0].target_path, project.doc("src/@x/y.scss"));
}

#[tokio::test]
async fn test_jsonc_config_resolves_against_its_own_directory() {
    let project = TestProject::new();
    project.add_file(
        "tsconfig.json",
        r#"{
            // Editor settings live elsewhere
            "compilerOptions": {
                "baseUrl": "./styles",
                "paths": {
                    "~theme/*": ["theme/*"], /* trailing comma below */
                },
            },
        }"#,
    );
    project.add_file("app/page.scss", "@use '~theme/colors';");
    project.add_file("theme/_colors.scss", "$ink: #111;");

    let (_, index) = project.index().await;
    let page = index.get(&project.doc("app/page.scss")).unwrap();
    // baseUrl does not move substitutions away from the config directory
    assert_eq!(page.imports[0].target_path, project.doc("theme/colors.scss"));
    assert_eq!(
        index
            .get(&project.doc("theme/_colors.scss"))
            .map(|t| t.document_import_path.as_str()),
        Some("~theme/colors")
    );
}

#[tokio::test]
async fn test_inherited_aliases_resolve_against_the_governing_config() {
    let project = TestProject::new();
    project.add_file(
        "base.json",
        r#"{ "compilerOptions": { "paths": { "@lib/*": ["libs/*"] } } }"#,
    );
    project.add_file(
        "app/tsconfig.json",
        r#"{ "extends": "../base.json", "compilerOptions": { "paths": { "@app/*": ["shell/*"] } } }"#,
    );
    project.add_file("app/main.scss", "@use '@lib/mixins';\n@use '@app/frame';");

    let (_, index) = project.index().await;
    let config = index.config_for(&project.doc("app/main.scss")).unwrap();
    let prefixes: Vec<&str> = config.aliases.iter().map(|a| a.prefix.as_str()).collect();
    assert_eq!(prefixes, vec!["@app/", "@lib/"]);
    assert_eq!(config.extends_chain.len(), 2);

    let main = index.get(&project.doc("app/main.scss")).unwrap();
    assert_eq!(main.imports[0].target_path, project.doc("app/libs/mixins.scss"));
    assert_eq!(main.imports[1].target_path, project.doc("app/shell/frame.scss"));
}

#[tokio::test]
async fn test_circular_extends_still_loads() {
    let project = TestProject::new();
    project.add_file(
        "tsconfig.json",
        r#"{ "extends": "./other.json", "compilerOptions": { "paths": { "@a/*": ["a/*"] } } }"#,
    );
    project.add_file(
        "other.json",
        r#"{ "extends": "./tsconfig.json", "compilerOptions": { "paths": { "@b/*": ["b/*"] } } }"#,
    );
    project.add_file("main.scss", "@use '@b/thing';");

    let (_, index) = project.index().await;
    let config = index.config_for(&project.doc("main.scss")).unwrap();
    assert_eq!(config.aliases.len(), 2);

    let main = index.get(&project.doc("main.scss")).unwrap();
    assert_eq!(main.imports[0].target_path, project.doc("b/thing.scss"));
}

#[tokio::test]
async fn test_malformed_config_degrades_to_relative_resolution() {
    let project = TestProject::new();
    project.add_file("tsconfig.json", "{ this is not json");
    project.add_file("main.scss", "@use '@ui/x';");

    let (_, index) = project.index().await;
    let config = index.config_for(&project.doc("main.scss")).unwrap();
    assert!(config.aliases.is_empty());

    let main = index.get(&project.doc("main.scss")).unwrap();
    assert_eq!(main.imports[0].target_path, project.doc("@ui/x.scss"));
}

#[tokio::test]
async fn test_links_use_the_alias_table() {
    let project = TestProject::new();
    project.add_file(
        "tsconfig.json",
        r#"{ "compilerOptions": { "paths": { "@lib/*": ["libs/*"] } } }"#,
    );
    project.add_file("src/x.scss", "@use '@lib/mixins';\n");
    project.add_file("libs/_mixins.scss", "@mixin m {}");

    let (_, index) = project.index().await;
    let document = project.open("src/x.scss");
    let links = links(&index, &document);

    assert_eq!(links.len(), 1);
    assert_eq!(
        links[0].target,
        project.doc("libs/mixins.scss").to_url()
    );
    assert_eq!(links[0].range.start.character, 5);
    assert_eq!(links[0].range.end.character, 18);
}
