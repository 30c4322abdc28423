//! Symbol extraction from a parsed stylesheet

use super::{
    Callable, ImportKind, ImportRecord, Parameter, SymbolTable, Variable, is_css_target,
    is_dynamic_target, target_path,
};
use crate::document::{DocumentPath, ScssDocument};
use crate::project_resolver::ProjectConfig;
use crate::syntax::{NodeId, NodeKind, SyntaxTree, unquote};

/// Build the symbol table of `document` from its parsed `tree`.
///
/// Works on whatever the parser recovered; broken input yields fewer symbols,
/// never an error. Variables local to a function body are skipped.
pub fn extract(
    tree: &SyntaxTree,
    document: &ScssDocument,
    config: Option<&ProjectConfig>,
) -> SymbolTable {
    let mut table = SymbolTable::new(document.path.clone());

    for id in tree.descendants() {
        match tree.kind(id) {
            NodeKind::VariableDeclaration => {
                if let Some(variable) = variable(tree, document, id) {
                    table.variables.push(variable);
                }
            }
            NodeKind::MixinDeclaration => {
                if let Some(mixin) = callable(tree, document, id) {
                    table.mixins.push(mixin);
                }
            }
            NodeKind::FunctionDeclaration => {
                if let Some(function) = callable(tree, document, id) {
                    table.functions.push(function);
                }
            }
            NodeKind::Import | NodeKind::Use | NodeKind::Forward => {
                let kind = match tree.kind(id) {
                    NodeKind::Import => ImportKind::Import,
                    NodeKind::Use => ImportKind::Use,
                    _ => ImportKind::Forward,
                };
                for literal in tree.link_literals(id) {
                    let target = unquote(tree.text(literal));
                    if target.is_empty() {
                        continue;
                    }
                    table
                        .imports
                        .push(import_record(kind, target, &document.path, config));
                }
            }
            _ => {}
        }
    }

    table
}

fn variable(tree: &SyntaxTree, document: &ScssDocument, id: NodeId) -> Option<Variable> {
    let mut owning_mixin = None;
    for ancestor in tree.ancestors(id) {
        match tree.kind(ancestor) {
            NodeKind::FunctionDeclaration => return None,
            NodeKind::MixinDeclaration if owning_mixin.is_none() => {
                owning_mixin = tree.name(ancestor).map(str::to_string);
            }
            _ => {}
        }
    }

    let name = tree.name_node(id)?;
    let offset = tree.node(name).offset;
    let value = tree
        .value_node(id)
        .map(|value| tree.text(value).trim().to_string())
        .filter(|value| !value.is_empty());

    Some(Variable {
        name: tree.text(name).to_string(),
        offset,
        position: document.position_at(offset),
        value,
        owning_mixin,
    })
}

fn callable(tree: &SyntaxTree, document: &ScssDocument, id: NodeId) -> Option<Callable> {
    let name = tree.name_node(id)?;
    let offset = tree.node(name).offset;

    let parameters = tree
        .parameters(id)
        .into_iter()
        .filter_map(|param| {
            let name = tree.name_node(param)?;
            Some(Parameter {
                name: tree.text(name).to_string(),
                offset: tree.node(name).offset,
                default_value: tree
                    .value_node(param)
                    .map(|value| tree.text(value).trim().to_string())
                    .filter(|value| !value.is_empty()),
            })
        })
        .collect();

    Some(Callable {
        name: tree.text(name).to_string(),
        offset,
        position: document.position_at(offset),
        parameters,
    })
}

fn import_record(
    kind: ImportKind,
    target: &str,
    importer: &DocumentPath,
    config: Option<&ProjectConfig>,
) -> ImportRecord {
    let dynamic = is_dynamic_target(target);
    let css = is_css_target(target);
    let target_path = target_path(target, importer, config);

    ImportRecord {
        kind,
        target: target.to_string(),
        target_path,
        dynamic,
        css,
    }
}
