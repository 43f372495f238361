//! AST → compiled form.
//!
//! Entry points: [`compile`] and [`compile_with_genotype`].
//!
//! Diagnostics emitted:
//! - E300: named-parameter list with an odd number of label/value items
//! - E301: label expected in a named-parameter list
//! - E302: label outside a named-parameter list (warning)
//! - E310: genotype ran out of values
//! - E311: genotype has values left over (warning)

use seni_types::ast::{Node, NodeKind};
use seni_types::{Diagnostics, ErrorCode, Form, GeneCursor, Genotype, SeniError};
use tracing::debug;

// ══════════════════════════════════════════════════════════════════════════════
// Public API
// ══════════════════════════════════════════════════════════════════════════════

/// Output of compilation: best-effort forms plus everything that went wrong.
#[derive(Debug, Clone, PartialEq)]
pub struct CompileResult {
    pub forms: Vec<Form>,
    pub diagnostics: Diagnostics,
}

impl CompileResult {
    /// Strict view: the forms, or the first compile error.
    pub fn into_result(self) -> seni_types::Result<Vec<Form>> {
        match self.diagnostics.errors.into_iter().next() {
            Some(error) => Err(error),
            None => Ok(self.forms),
        }
    }
}

/// Compile a parsed forest. Alterable nodes compile to their own values.
pub fn compile(nodes: &[Node]) -> CompileResult {
    let mut compiler = Compiler::new();
    let forms = compiler.compile_nodes(nodes);
    compiler.finish(forms)
}

/// Compile a parsed forest, replacing each alterable slot with the next gene.
pub fn compile_with_genotype(nodes: &[Node], genotype: &Genotype) -> CompileResult {
    let mut compiler = Compiler::with_genotype(genotype);
    let forms = compiler.compile_nodes(nodes);
    compiler.finish(forms)
}

/// The raw value of a literal node, as stored in a genotype.
///
/// Strings stay bare here; only [`compile`] wraps them in `quote`.
pub fn literal_value(node: &Node) -> Form {
    match &node.kind {
        NodeKind::Int(n) => Form::Number(*n as f64),
        NodeKind::Float(f) => Form::Number(*f),
        NodeKind::Name(n) | NodeKind::Label(n) => Form::Symbol(n.clone()),
        NodeKind::Str(s) => Form::Str(s.clone()),
        NodeKind::Boolean(b) => Form::boolean(*b),
        NodeKind::Colour(c) => Form::Colour(*c),
        NodeKind::Null => Form::Null,
        NodeKind::List { .. } | NodeKind::Vector(_) => Form::Null,
    }
}

/// Does this list use the `(head label: value ...)` convention?
pub fn uses_named_parameters(children: &[Node]) -> bool {
    children.get(1).is_some_and(|n| n.as_label().is_some())
}

// ══════════════════════════════════════════════════════════════════════════════
// Compiler
// ══════════════════════════════════════════════════════════════════════════════

/// Walks nodes and collects diagnostics. Holds the genotype cursor, if any.
pub struct Compiler<'g> {
    genes: Option<GeneCursor<'g>>,
    diagnostics: Diagnostics,
}

impl Default for Compiler<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'g> Compiler<'g> {
    pub fn new() -> Self {
        Self {
            genes: None,
            diagnostics: Diagnostics::empty(),
        }
    }

    pub fn with_genotype(genotype: &'g Genotype) -> Self {
        Self {
            genes: Some(genotype.cursor()),
            diagnostics: Diagnostics::empty(),
        }
    }

    /// Compile nodes in order, sharing the gene cursor between them.
    pub fn compile_nodes(&mut self, nodes: &[Node]) -> Vec<Form> {
        nodes.iter().map(|n| self.compile_node(n)).collect()
    }

    /// Close out compilation, reporting unused genes.
    pub fn finish(mut self, forms: Vec<Form>) -> CompileResult {
        if let Some(genes) = &self.genes {
            if genes.remaining() > 0 {
                let warning = SeniError::warning(
                    ErrorCode::GENOTYPE_SURPLUS,
                    format!(
                        "genotype has {} unused value(s) after {} slot(s)",
                        genes.remaining(),
                        genes.position()
                    ),
                    Default::default(),
                );
                self.diagnostics.push(warning);
            }
        }
        debug!(
            forms = forms.len(),
            errors = self.diagnostics.total_errors,
            warnings = self.diagnostics.total_warnings,
            "compiled"
        );
        CompileResult {
            forms,
            diagnostics: self.diagnostics,
        }
    }

    fn compile_node(&mut self, node: &Node) -> Form {
        if node.alterable && self.genes.is_some() {
            return self.compile_from_genotype(node);
        }

        match &node.kind {
            NodeKind::List { children, .. } => {
                if uses_named_parameters(children) {
                    let head = self.compile_node(&children[0]);
                    let args = self.compile_named(node, &children[1..]);
                    Form::List(vec![head, args])
                } else if children.first().is_some_and(|n| n.as_label().is_some()) {
                    self.compile_named(node, children)
                } else {
                    Form::List(self.compile_nodes(children))
                }
            }
            NodeKind::Vector(children) => {
                let mut items = vec![Form::symbol("list")];
                items.extend(self.compile_nodes(children));
                Form::List(items)
            }
            NodeKind::Str(s) => Form::quote(Form::Str(s.clone())),
            NodeKind::Label(label) => {
                self.diagnostics.push(SeniError::warning(
                    ErrorCode::STRAY_LABEL,
                    format!("label '{label}:' outside a named-parameter list"),
                    node.span,
                ));
                Form::Symbol(label.clone())
            }
            _ => literal_value(node),
        }
    }

    /// `label value label value ...` → an ordered map.
    fn compile_named(&mut self, list: &Node, pairs: &[Node]) -> Form {
        if pairs.len() % 2 != 0 {
            self.diagnostics.push_error(
                SeniError::new(
                    ErrorCode::NAMED_PARAMETER_ARITY,
                    "named parameters must come in label/value pairs",
                    list.span,
                )
                .with_suggestion("give every label a value"),
            );
        }

        let mut map = Vec::with_capacity(pairs.len() / 2);
        for pair in pairs.chunks(2) {
            let label = match pair[0].as_label() {
                Some(label) => label.to_string(),
                None => {
                    self.diagnostics.push_error(SeniError::new(
                        ErrorCode::EXPECTED_LABEL,
                        format!("expected a label, found {}", pair[0].kind_name()),
                        pair[0].span,
                    ));
                    continue;
                }
            };
            let value = match pair.get(1) {
                Some(value) => self.compile_node(value),
                None => Form::Null,
            };
            map.push((label, value));
        }
        Form::Map(map)
    }

    fn compile_from_genotype(&mut self, node: &Node) -> Form {
        match &node.kind {
            NodeKind::Vector(children) => {
                let mut items = vec![Form::symbol("list")];
                for child in children {
                    let fallback = literal_value(child);
                    items.push(self.take_gene(node, fallback));
                }
                Form::List(items)
            }
            _ => {
                let gene = self.take_gene(node, literal_value(node));
                match gene {
                    Form::Str(_) => Form::quote(gene),
                    other => other,
                }
            }
        }
    }

    /// Next gene, or `fallback` plus an error once the genotype is exhausted.
    fn take_gene(&mut self, node: &Node, fallback: Form) -> Form {
        let next = self.genes.as_mut().and_then(|g| g.next_gene().cloned());
        match next {
            Some(gene) => gene,
            None => {
                self.diagnostics.push_error(SeniError::new(
                    ErrorCode::GENOTYPE_EXHAUSTED,
                    format!(
                        "genotype exhausted at alterable {}",
                        node.gen_sym.as_deref().unwrap_or("value")
                    ),
                    node.span,
                ));
                fallback
            }
        }
    }
}
