//! Python source extraction — tree-sitter-based module summaries.
//!
//! Parses one Python file to pull out the module docstring and the list of
//! top-level function definitions (name, docstring, parameter names).
//! Sources that do not parse produce a degraded summary instead of an
//! error; downstream jobs run with the degraded input.

use serde::{Deserialize, Serialize};
use tree_sitter::{Node, Parser};

/// Placeholder when a module carries no docstring.
pub const NO_MODULE_DOC: &str = "No module description available.";

/// Placeholder when a function carries no docstring.
pub const NO_FUNCTION_DOC: &str = "No description.";

/// One top-level function pulled from a source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionInfo {
    pub name: String,
    /// Docstring text with surrounding whitespace trimmed.
    pub doc: String,
    /// Names of the positional-or-keyword parameters, in declaration
    /// order. Positional-only parameters (before `/`), keyword-only
    /// parameters (after `*` or `*args`), `*args`, and `**kwargs` are
    /// excluded.
    pub args: Vec<String>,
}

/// What the extractor produces for one file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleSummary {
    pub module_doc: String,
    pub functions: Vec<FunctionInfo>,
}

impl ModuleSummary {
    /// Parse Python source and extract the module summary.
    ///
    /// Never fails: a source with syntax errors yields a summary whose
    /// `module_doc` describes the first error location and whose function
    /// list is empty.
    pub fn from_source(source: &str) -> Self {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .expect("tree-sitter-python language");

        let tree = match parser.parse(source, None) {
            Some(t) => t,
            None => return Self::degraded("parser produced no tree"),
        };

        let root = tree.root_node();
        if root.has_error() {
            let detail = first_error_location(root)
                .map(|(row, col)| format!("syntax error at line {}, column {}", row + 1, col + 1))
                .unwrap_or_else(|| "syntax error".to_string());
            return Self::degraded(&detail);
        }

        let bytes = source.as_bytes();
        let module_doc =
            docstring_of(root, bytes).unwrap_or_else(|| NO_MODULE_DOC.to_string());

        let mut functions = Vec::new();
        let mut cursor = root.walk();
        for child in root.children(&mut cursor) {
            let def = match child.kind() {
                "function_definition" => Some(child),
                "decorated_definition" => child
                    .child_by_field_name("definition")
                    .filter(|d| d.kind() == "function_definition"),
                _ => None,
            };
            if let Some(def) = def {
                if let Some(func) = extract_function(def, bytes) {
                    functions.push(func);
                }
            }
        }

        Self {
            module_doc,
            functions,
        }
    }

    fn degraded(detail: &str) -> Self {
        Self {
            module_doc: format!("⚠️ Failed to parse code: {detail}"),
            functions: Vec::new(),
        }
    }

    /// Whether this summary came from the degraded (unparseable) path.
    pub fn is_degraded(&self) -> bool {
        self.module_doc.starts_with("⚠️ Failed to parse code")
    }

    /// Render the function list as one bullet line per function, e.g.
    /// `- validate(order, retries): Checks an order against stock.`
    pub fn functions_block(&self) -> String {
        if self.functions.is_empty() {
            return "No functions found.".to_string();
        }
        self.functions
            .iter()
            .map(|f| format!("- {}({}): {}", f.name, f.args.join(", "), f.doc))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A source file together with its parsed summary.
///
/// Built per invocation from disk content and dropped when the job
/// completes; the parse itself is never persisted.
#[derive(Debug, Clone)]
pub struct SourceUnit {
    pub filename: String,
    pub text: String,
    pub summary: ModuleSummary,
}

impl SourceUnit {
    pub fn new(filename: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        let summary = ModuleSummary::from_source(&text);
        Self {
            filename: filename.into(),
            text,
            summary,
        }
    }
}

/// Docstring of a `module` or `block` node: the first statement when it is
/// a bare string literal. Leading comments are not statements and are
/// skipped.
fn docstring_of(node: Node, source: &[u8]) -> Option<String> {
    let mut cursor = node.walk();
    let first = node
        .named_children(&mut cursor)
        .find(|n| n.kind() != "comment")?;
    if first.kind() != "expression_statement" {
        return None;
    }
    let expr = first.named_child(0)?;
    if expr.kind() != "string" {
        return None;
    }
    Some(string_content(expr, source))
}

/// Text between the quotes of a `string` node, trimmed.
fn string_content(string_node: Node, source: &[u8]) -> String {
    let mut out = String::new();
    let mut cursor = string_node.walk();
    for child in string_node.children(&mut cursor) {
        if matches!(child.kind(), "string_content" | "escape_sequence") {
            if let Ok(text) = child.utf8_text(source) {
                out.push_str(text);
            }
        }
    }
    out.trim().to_string()
}

fn extract_function(node: Node, source: &[u8]) -> Option<FunctionInfo> {
    let name = node
        .child_by_field_name("name")
        .and_then(|n| n.utf8_text(source).ok())?
        .to_string();

    let doc = node
        .child_by_field_name("body")
        .and_then(|body| docstring_of(body, source))
        .unwrap_or_else(|| NO_FUNCTION_DOC.to_string());

    let args = node
        .child_by_field_name("parameters")
        .map(|params| parameter_names(params, source))
        .unwrap_or_default();

    Some(FunctionInfo { name, doc, args })
}

/// Names of the positional-or-keyword parameter group only.
fn parameter_names(params: Node, source: &[u8]) -> Vec<String> {
    let mut names = Vec::new();
    let mut cursor = params.walk();
    for child in params.named_children(&mut cursor) {
        let ident = match child.kind() {
            "identifier" => Some(child),
            "typed_parameter" => child.named_child(0).filter(|n| n.kind() == "identifier"),
            "default_parameter" | "typed_default_parameter" => {
                child.child_by_field_name("name")
            }
            // A `/` marker means everything collected so far was
            // positional-only.
            "positional_separator" => {
                names.clear();
                None
            }
            // A bare `*` or `*args` starts the keyword-only group.
            "keyword_separator" | "list_splat_pattern" => break,
            // dictionary_splat_pattern (**kwargs) carries no plain name
            _ => None,
        };
        if let Some(ident) = ident {
            if let Ok(text) = ident.utf8_text(source) {
                names.push(text.to_string());
            }
        }
    }
    names
}

/// First ERROR or MISSING node in document order, descending only into
/// subtrees that contain errors.
fn first_error_location(root: Node) -> Option<(usize, usize)> {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            let pos = node.start_position();
            return Some((pos.row, pos.column));
        }
        if node.has_error() {
            let mut cursor = node.walk();
            let children: Vec<Node> = node.children(&mut cursor).collect();
            for child in children.into_iter().rev() {
                stack.push(child);
            }
        }
    }
    None
}
