//! AST + genotype → source text.
//!
//! Walks the parsed forest depth-first, left to right: the same order the
//! parser assigned generated symbols in. Each alterable slot takes the next
//! gene from a [`GeneCursor`]; everything else is rendered from the AST.

use seni_types::ast::{Node, NodeKind};
use seni_types::form::{Colour, FALSE, TRUE};
use seni_types::{Form, GeneCursor, Genotype};
use tracing::debug;

/// Errors from [`unparse`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UnparseError {
    /// More alterable slots than genes.
    #[error("genotype exhausted at {gen_sym} after {used} gene(s)")]
    GenotypeExhausted { gen_sym: String, used: usize },
    /// More genes than alterable slots.
    #[error("genotype has {remaining} gene(s) left over")]
    GenotypeSurplus { remaining: usize },
    /// A gene with no literal spelling the parser accepts inside brackets,
    /// such as the list a `col` or `vector` binding produces.
    #[error("gene for {gen_sym} cannot be written as a bracket literal: {gene}")]
    UnrepresentableGene { gen_sym: String, gene: String },
}

/// Render `nodes` with every alterable slot replaced by the next gene.
///
/// The genotype must hold exactly one gene per slot.
pub fn unparse(nodes: &[Node], genotype: &Genotype) -> Result<String, UnparseError> {
    let mut unparser = Unparser {
        genes: Some(genotype.cursor()),
    };
    let mut terms = Vec::with_capacity(nodes.len());
    for node in nodes {
        terms.push(unparser.node(node)?);
    }
    let remaining = unparser.genes.as_ref().map_or(0, GeneCursor::remaining);
    if remaining > 0 {
        return Err(UnparseError::GenotypeSurplus { remaining });
    }
    let source = terms.join(" ");
    debug!(genes = genotype.len(), bytes = source.len(), "unparsed");
    Ok(source)
}

struct Unparser<'g> {
    /// `None` while rendering parameter annotations, which never take genes.
    genes: Option<GeneCursor<'g>>,
}

impl Unparser<'_> {
    fn node(&mut self, node: &Node) -> Result<String, UnparseError> {
        if node.alterable {
            return self.alterable(node);
        }
        Ok(match &node.kind {
            NodeKind::List { children, quoted } => {
                if *quoted && children.len() == 2 {
                    format!("'{}", self.node(&children[1])?)
                } else {
                    format!("({})", self.sequence(children)?)
                }
            }
            NodeKind::Vector(children) => format!("[{}]", self.sequence(children)?),
            NodeKind::Int(n) => n.to_string(),
            NodeKind::Float(f) if f.fract() == 0.0 => format!("{f:.1}"),
            NodeKind::Float(f) => f.to_string(),
            NodeKind::Name(name) => name.clone(),
            NodeKind::Label(label) => format!("{label}:"),
            NodeKind::Str(s) => format!("\"{s}\""),
            NodeKind::Boolean(b) => boolean(*b).to_string(),
            NodeKind::Colour(c) => colour(c),
            NodeKind::Null => "null".to_string(),
        })
    }

    fn sequence(&mut self, nodes: &[Node]) -> Result<String, UnparseError> {
        let mut terms = Vec::with_capacity(nodes.len());
        for node in nodes {
            terms.push(self.node(node)?);
        }
        Ok(terms.join(" "))
    }

    /// `[;prefix\n value param...]`
    fn alterable(&mut self, node: &Node) -> Result<String, UnparseError> {
        let mut out = String::from("[");
        for comment in &node.parameter_prefix {
            out.push_str(comment);
            out.push('\n');
        }

        let value = match &node.kind {
            _ if self.genes.is_none() => own_value(node),
            NodeKind::Vector(children) => {
                let mut values = Vec::with_capacity(children.len());
                for _ in children {
                    values.push(self.gene(node)?);
                }
                format!("[{}]", values.join(" "))
            }
            _ => self.gene(node)?,
        };
        out.push_str(&value);

        let genes = self.genes.take();
        let params = self.sequence(&node.parameter_ast);
        self.genes = genes;
        let params = params?;
        if !params.is_empty() {
            out.push(' ');
            out.push_str(&params);
        }

        out.push(']');
        Ok(out)
    }

    /// The next gene as source text.
    fn gene(&mut self, node: &Node) -> Result<String, UnparseError> {
        let Some(genes) = self.genes.as_mut() else {
            return Ok(own_value(node));
        };
        let gen_sym = || node.gen_sym.clone().unwrap_or_else(|| "value".into());
        let used = genes.position();
        let gene = genes
            .next_gene()
            .ok_or_else(|| UnparseError::GenotypeExhausted {
                gen_sym: gen_sym(),
                used,
            })?;
        literal_gene(gene).ok_or_else(|| UnparseError::UnrepresentableGene {
            gen_sym: gen_sym(),
            gene: gene.to_string(),
        })
    }
}

fn own_value(node: &Node) -> String {
    match &node.kind {
        NodeKind::Int(n) => n.to_string(),
        NodeKind::Float(f) => format_number(*f),
        NodeKind::Name(s) => s.clone(),
        NodeKind::Str(s) => format!("\"{s}\""),
        NodeKind::Boolean(b) => boolean(*b).to_string(),
        NodeKind::Vector(children) => format!(
            "[{}]",
            children.iter().map(own_value).collect::<Vec<_>>().join(" ")
        ),
        _ => String::new(),
    }
}

fn boolean(b: bool) -> &'static str {
    if b {
        "true"
    } else {
        "false"
    }
}

/// Three decimal places, unless the value is a whole number.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 {
        (n as i64).to_string()
    } else {
        format!("{n:.3}")
    }
}

fn colour(c: &Colour) -> String {
    format!(
        "(col/rgb r: {} g: {} b: {} alpha: {})",
        format_number(c.r),
        format_number(c.g),
        format_number(c.b),
        format_number(c.alpha)
    )
}

/// `gene` spelled as a single literal token, if the lexer can read it back
/// as the same value.
fn literal_gene(gene: &Form) -> Option<String> {
    match gene {
        Form::Number(n) if n.is_finite() => Some(format_number(*n)),
        Form::Symbol(s) if s == TRUE || s == FALSE => Some(format_gene(gene)),
        Form::Symbol(s) if is_plain_name(s) => Some(s.clone()),
        Form::Str(s) if !s.contains('"') => Some(format!("\"{s}\"")),
        Form::List(items) => match items.as_slice() {
            [Form::Symbol(q), Form::Str(s)] if q == "quote" && !s.contains('"') => {
                Some(format!("\"{s}\""))
            }
            _ => None,
        },
        _ => None,
    }
}

/// Whether `s` lexes back as one NAME token rather than a number or boolean.
fn is_plain_name(s: &str) -> bool {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    let starts_number = first == '-' && s[1..].starts_with(|c: char| c.is_ascii_digit());
    let name_start =
        first.is_ascii_alphabetic() || matches!(first, '+' | '-' | '*' | '/' | '<' | '>' | '=');
    let name_rest = chars.all(|c| {
        c.is_ascii_alphanumeric()
            || matches!(
                c,
                '+' | '-' | '*' | '/' | '<' | '>' | '=' | '!' | '@' | '#' | '$' | '%' | '^' | '&' | '?'
            )
    });
    name_start && name_rest && !starts_number && s != "true" && s != "false"
}

/// A genotype value as source text.
pub fn format_gene(gene: &Form) -> String {
    match gene {
        Form::Number(n) => format_number(*n),
        Form::Symbol(s) if s == TRUE => "true".to_string(),
        Form::Symbol(s) if s == FALSE => "false".to_string(),
        Form::Symbol(s) => s.clone(),
        Form::Str(s) => format!("\"{s}\""),
        Form::List(items) => match items.as_slice() {
            [Form::Symbol(q), Form::Str(s)] if q == "quote" => format!("\"{s}\""),
            [Form::Symbol(q), quoted] if q == "quote" => format!("'{}", format_gene(quoted)),
            _ => format!(
                "({})",
                items.iter().map(format_gene).collect::<Vec<_>>().join(" ")
            ),
        },
        Form::Map(pairs) => pairs
            .iter()
            .map(|(k, v)| format!("{k}: {}", format_gene(v)))
            .collect::<Vec<_>>()
            .join(" "),
        Form::Colour(c) => colour(c),
        Form::Null => "null".to_string(),
    }
}
