//! Traits: what can vary, harvested from the alterable nodes of a parse.

use seni_compiler::{compile, literal_value};
use seni_types::ast::{Node, NodeKind};
use seni_types::Form;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::GeneticError;

/// One alterable slot: its current value and how to produce a new one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trait {
    pub gen_sym: String,
    /// The value written in the source.
    pub initial_value: Form,
    /// Compiled parameter annotations; evaluated to sample a new value.
    pub parameters: Vec<Form>,
}

/// One trait per alterable slot, in the order the parser discovered them.
///
/// Parameter annotations are not searched: brackets nested inside them
/// describe variation, not slots.
pub fn build_traits(nodes: &[Node]) -> Result<Vec<Trait>, GeneticError> {
    let mut traits = Vec::new();
    for node in nodes {
        collect(node, &mut traits)?;
    }
    debug!(traits = traits.len(), "built traits");
    Ok(traits)
}

fn collect(node: &Node, traits: &mut Vec<Trait>) -> Result<(), GeneticError> {
    if !node.alterable {
        for child in node.children() {
            collect(child, traits)?;
        }
        return Ok(());
    }

    let gen_sym = node.gen_sym.clone().unwrap_or_default();
    let parameters = compile(&node.parameter_ast).into_result()?;
    match &node.kind {
        NodeKind::Vector(children) => {
            for (i, child) in children.iter().enumerate() {
                traits.push(Trait {
                    gen_sym: format!("{gen_sym}.{i}"),
                    initial_value: literal_value(child),
                    parameters: parameters.clone(),
                });
            }
        }
        _ => traits.push(Trait {
            gen_sym,
            initial_value: literal_value(node),
            parameters,
        }),
    }
    Ok(())
}
