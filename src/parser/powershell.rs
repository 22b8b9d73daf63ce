//! PowerShell script parser

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};
use tree_sitter::Node;

use crate::parser::traits::{ParseError, Parser};
use crate::parser::types::{
    FunctionScopeId, Inclusion, ParsedSymbol, SymbolKind, SymbolScope, SymbolTable,
};
use crate::symbols::position::{ScriptPosition, ScriptRegion};

/// Variables PowerShell defines itself. They never name a user symbol.
const AUTOMATIC_VARIABLES: [&str; 10] = [
    "$",
    "^",
    "?",
    "_",
    "args",
    "input",
    "psitem",
    "pscommandpath",
    "psscriptroot",
    "this",
];

/// `$name`, `${name}` and `$scope:name` inside an expandable string.
/// A leading backtick escapes the sigil.
static STRING_VARIABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"`?\$(?:\{[^}]+\}|(?:[A-Za-z_][A-Za-z0-9_]*:)?[A-Za-z0-9_]+)")
        .expect("string variable pattern is valid")
});

/// Parser for PowerShell scripts (.ps1, .psm1)
pub struct PowerShellParser {
    strict: bool,
}

impl PowerShellParser {
    /// Lenient parser: symbols are collected from whatever tree-sitter
    /// recovers, so incomplete editor buffers still parse
    pub fn new() -> Self {
        Self { strict: false }
    }

    /// Parser that rejects scripts containing syntax errors
    pub fn strict() -> Self {
        Self { strict: true }
    }
}

impl Default for PowerShellParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for PowerShellParser {
    fn parse(&self, content: &str) -> Result<SymbolTable, ParseError> {
        let mut parser = tree_sitter::Parser::new();
        let language = tree_sitter_powershell::LANGUAGE;
        parser.set_language(&language.into()).map_err(|e| {
            warn!("Failed to set PowerShell language for tree-sitter: {}", e);
            ParseError::TreeSitter(e.to_string())
        })?;

        let tree = parser.parse(content, None).ok_or_else(|| {
            warn!("Failed to parse PowerShell content");
            ParseError::ParseFailed("Failed to parse PowerShell".to_string())
        })?;

        let root = tree.root_node();
        let lines = LineIndex::new(content);

        if self.strict && root.has_error() {
            let position = first_error(root)
                .map_or(ScriptPosition::new(1, 1), |node| lines.position(node.start_byte()));
            return Err(ParseError::Syntax {
                line: position.line,
                column: position.column,
            });
        }

        let mut collector = SymbolCollector::new(content, &lines);
        collector.visit(root, None);
        let table = collector.finish();

        debug!(
            "Parsed {} symbols and {} inclusions",
            table.symbols.len(),
            table.inclusions.len()
        );
        Ok(table)
    }
}

/// Scope qualifiers that may prefix a variable or function name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Qualifier {
    None,
    Script,
    Global,
    Local,
    Private,
    Using,
}

/// Splits `script:name` into its qualifier and bare name.
/// Drive qualifiers such as `env:` stay part of the name.
fn split_qualifier(raw: &str) -> (Qualifier, &str) {
    let Some((prefix, rest)) = raw.split_once(':') else {
        return (Qualifier::None, raw);
    };

    let qualifier = match prefix.to_ascii_lowercase().as_str() {
        "script" => Qualifier::Script,
        "global" => Qualifier::Global,
        "local" => Qualifier::Local,
        "private" => Qualifier::Private,
        "using" => Qualifier::Using,
        _ => return (Qualifier::None, raw),
    };

    (qualifier, rest)
}

/// Strips the sigil and braces from `$name`, `${name}` or `@name`
fn variable_name(text: &str) -> Option<(Qualifier, &str)> {
    let rest = text.strip_prefix(['$', '@'])?;
    let rest = rest
        .strip_prefix('{')
        .and_then(|inner| inner.strip_suffix('}'))
        .unwrap_or(rest);

    let (qualifier, name) = split_qualifier(rest);
    if name.is_empty() || AUTOMATIC_VARIABLES.contains(&name.to_ascii_lowercase().as_str()) {
        return None;
    }
    Some((qualifier, name))
}

/// A bare word that can name a function: `Get-Item`, `helper`, `Invoke_It`
fn is_command_name(word: &str) -> bool {
    word.chars()
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
        && !word.contains(['.', '/', '\\', ':', '*', '?'])
}

fn looks_like_script_path(path: &str) -> bool {
    let lowered = path.to_ascii_lowercase();
    lowered.ends_with(".ps1")
        || lowered.ends_with(".psm1")
        || path.contains('/')
        || path.contains('\\')
}

/// The operand of a dot-sourcing command (`. <operand>`), if `text` is one
fn dot_source_operand(text: &str) -> Option<&str> {
    let rest = text.strip_prefix('.')?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some(rest.trim_start())
}

/// Splits a dot-sourcing operand into its source token and the path it
/// names. Script blocks and expressions are not paths.
fn read_operand_path(operand: &str) -> Option<(&str, &str)> {
    match operand.chars().next()? {
        '{' | '(' | '@' | '&' => None,
        quote @ ('\'' | '"') => {
            let inner = &operand[1..];
            match inner.find(quote) {
                Some(end) => Some((&operand[..end + 2], &inner[..end])),
                None => Some((operand, inner)),
            }
        }
        _ => {
            let end = operand
                .find(|c: char| c.is_whitespace() || matches!(c, ';' | '|' | ')' | '}'))
                .unwrap_or(operand.len());
            Some((&operand[..end], &operand[..end]))
        }
    }
}

fn ancestors<'tree>(node: Node<'tree>) -> impl Iterator<Item = Node<'tree>> {
    std::iter::successors(node.parent(), |n| n.parent())
}

fn contains(outer: Node, inner: Node) -> bool {
    outer.start_byte() <= inner.start_byte() && inner.end_byte() <= outer.end_byte()
}

fn first_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    node.children(&mut cursor)
        .filter(|child| child.has_error())
        .find_map(first_error)
}

fn named_child_of_kind<'tree>(node: Node<'tree>, kind: &str) -> Option<Node<'tree>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .find(|child| child.kind() == kind)
}

/// Variables declared in a `param(...)` block or `function Name(...)`
/// signature. Default value expressions are ordinary reads.
fn is_parameter(node: Node) -> bool {
    for ancestor in ancestors(node) {
        match ancestor.kind() {
            "script_parameter" => return true,
            "script_parameter_default" | "attribute_list" | "script_block" | "program" => {
                return false;
            }
            _ => {}
        }
    }
    false
}

/// `$x = ...`, `[int]$x = ...`, `$x += ...`
fn is_assignment_target(node: Node) -> bool {
    let Some(assignment) = ancestors(node).find(|n| n.kind() == "assignment_expression") else {
        return false;
    };
    assignment
        .named_child(0)
        .is_some_and(|target| contains(target, node) && target.end_byte() == node.end_byte())
}

/// The loop variable of `foreach ($item in ...)`
fn is_loop_variable(node: Node) -> bool {
    let Some(statement) = ancestors(node).find(|n| n.kind() == "foreach_statement") else {
        return false;
    };
    let mut cursor = statement.walk();
    let target = statement
        .named_children(&mut cursor)
        .find(|child| !matches!(child.kind(), "foreach_parameter" | "comment"));
    target.is_some_and(|target| contains(target, node))
}

/// Byte offset to 1-based line and UTF-16 column conversion
struct LineIndex<'a> {
    content: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    fn new(content: &'a str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(content.match_indices('\n').map(|(index, _)| index + 1))
            .collect();
        Self {
            content,
            line_starts,
        }
    }

    fn position(&self, byte: usize) -> ScriptPosition {
        let line = self
            .line_starts
            .partition_point(|&start| start <= byte)
            .saturating_sub(1);
        let line_start = self.line_starts[line];
        let column = self
            .content
            .get(line_start..byte)
            .map_or(0, |prefix| prefix.encode_utf16().count());
        ScriptPosition::new(line as u32 + 1, column as u32 + 1)
    }

    fn region(&self, start: usize, end: usize) -> ScriptRegion {
        ScriptRegion::new(self.position(start), self.position(end))
    }
}

#[derive(Debug, Clone, Copy)]
struct FunctionFrame {
    parent: Option<usize>,
}

/// A variable occurrence whose scope is decided once the whole script has
/// been walked
#[derive(Debug)]
struct RawVariable {
    name: String,
    qualifier: Qualifier,
    kind: SymbolKind,
    region: ScriptRegion,
    is_declaration: bool,
    function: Option<usize>,
}

struct SymbolCollector<'a> {
    content: &'a str,
    lines: &'a LineIndex<'a>,
    functions: Vec<FunctionFrame>,
    function_symbols: Vec<ParsedSymbol>,
    variables: Vec<RawVariable>,
    inclusions: Vec<Inclusion>,
}

impl<'a> SymbolCollector<'a> {
    fn new(content: &'a str, lines: &'a LineIndex<'a>) -> Self {
        Self {
            content,
            lines,
            functions: Vec::new(),
            function_symbols: Vec::new(),
            variables: Vec::new(),
            inclusions: Vec::new(),
        }
    }

    fn text(&self, node: Node) -> &'a str {
        self.content
            .get(node.start_byte()..node.end_byte())
            .unwrap_or_default()
    }

    fn region(&self, node: Node) -> ScriptRegion {
        self.lines.region(node.start_byte(), node.end_byte())
    }

    /// Walks `node` in source order. `function` is the innermost enclosing
    /// function body.
    fn visit(&mut self, node: Node, function: Option<usize>) {
        let mut function = function;
        match node.kind() {
            "comment" => return,
            "variable" | "braced_variable" => {
                self.record_variable(node, function);
                return;
            }
            "expandable_string_literal" | "expandable_here_string_literal" => {
                self.scan_expandable_string(node, function);
                return;
            }
            "function_statement" => {
                if let Some(index) = self.record_function(node, function) {
                    function = Some(index);
                }
            }
            "command" => self.record_command(node),
            _ => {}
        }

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.visit(child, function);
        }
    }

    fn record_function(&mut self, node: Node, parent: Option<usize>) -> Option<usize> {
        let name_node = named_child_of_kind(node, "function_name")?;
        let (_, name) = split_qualifier(self.text(name_node));
        if !is_command_name(name) {
            return None;
        }

        let index = self.functions.len();
        self.functions.push(FunctionFrame { parent });
        self.function_symbols.push(ParsedSymbol {
            name: name.to_string(),
            kind: SymbolKind::Function,
            region: self.region(name_node),
            scope: SymbolScope::Script,
            is_declaration: true,
        });
        Some(index)
    }

    fn record_command(&mut self, node: Node) {
        let text = self.text(node);
        if let Some(operand) = dot_source_operand(text) {
            let offset = node.start_byte() + (text.len() - operand.len());
            self.record_dot_source(operand, offset);
            return;
        }

        let Some(name_node) = node
            .child_by_field_name("command_name")
            .filter(|name| name.kind() == "command_name")
            .or_else(|| named_child_of_kind(node, "command_name"))
        else {
            return;
        };
        let word = self.text(name_node);
        if is_command_name(word) {
            self.function_symbols.push(ParsedSymbol {
                name: word.to_string(),
                kind: SymbolKind::Function,
                region: self.region(name_node),
                scope: SymbolScope::Script,
                is_declaration: false,
            });
        }
    }

    /// `. <path>` runs a script (or function) in the current scope. Script
    /// block and variable operands are left to the tree walk.
    fn record_dot_source(&mut self, operand: &str, offset: usize) {
        let Some((token, path)) = read_operand_path(operand) else {
            return;
        };
        let region = self.lines.region(offset, offset + token.len());

        if looks_like_script_path(path) {
            self.inclusions.push(Inclusion {
                path: path.to_string(),
                region,
            });
        } else if token == path && is_command_name(path) {
            self.function_symbols.push(ParsedSymbol {
                name: path.to_string(),
                kind: SymbolKind::Function,
                region,
                scope: SymbolScope::Script,
                is_declaration: false,
            });
        }
    }

    fn record_variable(&mut self, node: Node, function: Option<usize>) {
        let (kind, is_declaration) = if is_parameter(node) {
            (SymbolKind::Parameter, true)
        } else {
            (
                SymbolKind::Variable,
                is_assignment_target(node) || is_loop_variable(node),
            )
        };
        self.push_variable(
            self.text(node),
            self.region(node),
            kind,
            is_declaration,
            function,
        );
    }

    /// Expandable strings are scanned textually; verbatim strings are opaque
    fn scan_expandable_string(&mut self, node: Node, function: Option<usize>) {
        let text = self.text(node);
        let base = node.start_byte();
        for found in STRING_VARIABLE.find_iter(text) {
            if found.as_str().starts_with('`') {
                continue;
            }
            let region = self.lines.region(base + found.start(), base + found.end());
            self.push_variable(found.as_str(), region, SymbolKind::Variable, false, function);
        }
    }

    fn push_variable(
        &mut self,
        text: &str,
        region: ScriptRegion,
        kind: SymbolKind,
        is_declaration: bool,
        function: Option<usize>,
    ) {
        let Some((qualifier, name)) = variable_name(text) else {
            return;
        };
        self.variables.push(RawVariable {
            name: name.to_string(),
            qualifier,
            kind,
            region,
            is_declaration,
            function,
        });
    }

    /// Resolves variable scopes and collects every symbol in source order
    fn finish(self) -> SymbolTable {
        let declared: HashSet<(usize, String)> = self
            .variables
            .iter()
            .filter(|v| {
                v.is_declaration
                    && matches!(
                        v.qualifier,
                        Qualifier::None | Qualifier::Local | Qualifier::Private
                    )
            })
            .filter_map(|v| v.function.map(|f| (f, v.name.to_lowercase())))
            .collect();

        let mut symbols = self.function_symbols;
        for variable in &self.variables {
            let scope = variable_scope(&self.functions, &declared, variable);
            symbols.push(ParsedSymbol {
                name: variable.name.clone(),
                kind: variable.kind,
                region: variable.region,
                scope,
                is_declaration: variable.is_declaration,
            });
        }
        symbols.sort_by_key(|s| (s.region.start, s.region.end));

        SymbolTable {
            symbols,
            inclusions: self.inclusions,
        }
    }
}

/// An unqualified variable belongs to the innermost enclosing function that
/// declares it, otherwise to script scope.
fn variable_scope(
    functions: &[FunctionFrame],
    declared: &HashSet<(usize, String)>,
    variable: &RawVariable,
) -> SymbolScope {
    let function_scope = |index: usize| SymbolScope::Function(FunctionScopeId(index as u32));

    match variable.qualifier {
        Qualifier::Script | Qualifier::Global | Qualifier::Using => SymbolScope::Script,
        Qualifier::Local | Qualifier::Private => variable
            .function
            .map_or(SymbolScope::Script, function_scope),
        // Drive-qualified (`$env:PATH`) variables are not scoped
        Qualifier::None if variable.name.contains(':') => SymbolScope::Script,
        Qualifier::None => {
            let key = variable.name.to_lowercase();
            let mut current = variable.function;
            while let Some(index) = current {
                if declared.contains(&(index, key.clone())) {
                    return function_scope(index);
                }
                current = functions[index].parent;
            }
            SymbolScope::Script
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn parse(content: &str) -> SymbolTable {
        PowerShellParser::new().parse(content).unwrap()
    }

    fn names(table: &SymbolTable) -> Vec<(&str, SymbolKind)> {
        table
            .symbols
            .iter()
            .map(|s| (s.name.as_str(), s.kind))
            .collect()
    }

    fn scopes_of(table: &SymbolTable, name: &str) -> Vec<SymbolScope> {
        table
            .symbols
            .iter()
            .filter(|s| s.name == name)
            .map(|s| s.scope)
            .collect()
    }

    #[test]
    fn parse_extracts_variable_declaration_and_usage() {
        let table = parse("# header\n$x = 1\n\n\nWrite-Output $x\n");

        assert_eq!(
            table.symbols,
            vec![
                ParsedSymbol {
                    name: "x".to_string(),
                    kind: SymbolKind::Variable,
                    region: ScriptRegion::on_line(2, 1, 3),
                    scope: SymbolScope::Script,
                    is_declaration: true,
                },
                ParsedSymbol {
                    name: "Write-Output".to_string(),
                    kind: SymbolKind::Function,
                    region: ScriptRegion::on_line(5, 1, 13),
                    scope: SymbolScope::Script,
                    is_declaration: false,
                },
                ParsedSymbol {
                    name: "x".to_string(),
                    kind: SymbolKind::Variable,
                    region: ScriptRegion::on_line(5, 14, 16),
                    scope: SymbolScope::Script,
                    is_declaration: false,
                },
            ]
        );
    }

    #[test]
    fn parse_extracts_function_declaration_and_calls() {
        let table = parse("function Get-Thing {\n    'thing'\n}\nGet-Thing\n$y = Get-Thing -Name a\n");

        let functions: Vec<_> = table
            .symbols
            .iter()
            .filter(|s| s.kind == SymbolKind::Function)
            .map(|s| (s.region, s.is_declaration))
            .collect();
        assert_eq!(
            functions,
            vec![
                (ScriptRegion::on_line(1, 10, 19), true),
                (ScriptRegion::on_line(4, 1, 10), false),
                (ScriptRegion::on_line(5, 6, 15), false),
            ]
        );
    }

    #[test]
    fn parse_skips_comments_and_verbatim_strings() {
        let table = parse("# $a Foo\n<# $b\nBar #>\n'$c Baz'\n");
        assert!(table.symbols.is_empty());
    }

    #[test]
    fn parse_records_variables_inside_expandable_strings() {
        let table = parse("$name = 'x'\n\"Hello $name and ${name} $($name.Length)\"\n");

        let regions: Vec<_> = table.symbols.iter().map(|s| s.region).collect();
        assert_eq!(
            regions,
            vec![
                ScriptRegion::on_line(1, 1, 6),
                ScriptRegion::on_line(2, 8, 13),
                ScriptRegion::on_line(2, 18, 25),
                ScriptRegion::on_line(2, 28, 33),
            ]
        );
    }

    #[test]
    fn parse_skips_escaped_variables_in_expandable_strings() {
        let table = parse("$cost = 1\n\"`$cost is $cost\"\n");

        let regions: Vec<_> = table.symbols.iter().map(|s| s.region).collect();
        assert_eq!(
            regions,
            vec![ScriptRegion::on_line(1, 1, 6), ScriptRegion::on_line(2, 12, 17)]
        );
    }

    #[test]
    fn parse_records_variables_inside_expandable_here_strings() {
        let table = parse("$v = 1\n$t = @\"\nvalue: $v\n\"@\n$u = @'\n$v\n'@\n");

        let usages: Vec<_> = table
            .symbols
            .iter()
            .filter(|s| s.name == "v")
            .map(|s| s.region)
            .collect();
        assert_eq!(
            usages,
            vec![ScriptRegion::on_line(1, 1, 3), ScriptRegion::on_line(3, 8, 10)]
        );
    }

    #[test]
    fn parse_marks_param_block_variables_as_parameters() {
        let table = parse(
            "function Add {\n    param(\n        [int]$Left,\n        $Right = $Default\n    )\n    $Left + $Right\n}\n",
        );

        let params: Vec<_> = table
            .symbols
            .iter()
            .filter(|s| s.kind == SymbolKind::Parameter)
            .map(|s| (s.name.as_str(), s.scope))
            .collect();
        let scope = SymbolScope::Function(FunctionScopeId(0));
        assert_eq!(params, vec![("Left", scope), ("Right", scope)]);

        let default = table.symbols.iter().find(|s| s.name == "Default").unwrap();
        assert_eq!(default.kind, SymbolKind::Variable);
        assert_eq!(default.scope, SymbolScope::Script);
    }

    #[test]
    fn parse_marks_signature_variables_as_parameters() {
        let table = parse("function Greet($Name, [string]$Greeting) { \"$Greeting $Name\" }\n");

        assert_eq!(
            names(&table),
            vec![
                ("Greet", SymbolKind::Function),
                ("Name", SymbolKind::Parameter),
                ("Greeting", SymbolKind::Parameter),
                ("Greeting", SymbolKind::Variable),
                ("Name", SymbolKind::Variable),
            ]
        );
        assert!(
            table
                .symbols
                .iter()
                .skip(1)
                .all(|s| s.scope == SymbolScope::Function(FunctionScopeId(0)))
        );
    }

    #[test]
    fn parse_binds_locally_assigned_variables_to_function_scope() {
        let table = parse("$x = 1\nfunction A { $x = 2; $x }\nfunction B { $x }\n");

        assert_eq!(
            scopes_of(&table, "x"),
            vec![
                SymbolScope::Script,
                SymbolScope::Function(FunctionScopeId(0)),
                SymbolScope::Function(FunctionScopeId(0)),
                SymbolScope::Script,
            ]
        );
    }

    #[test]
    fn parse_nested_function_reads_enclosing_function_variable() {
        let table = parse("function Outer {\n  $x = 1\n  function Inner { $x }\n}\n");

        let usage = table.symbols.iter().rfind(|s| s.name == "x").unwrap();
        assert_eq!(usage.scope, SymbolScope::Function(FunctionScopeId(0)));
    }

    #[rstest]
    #[case("function F { $script:counter = 1 }", "counter", SymbolScope::Script)]
    #[case("function F { $global:counter = 1 }", "counter", SymbolScope::Script)]
    #[case(
        "function F { $local:counter = 1 }",
        "counter",
        SymbolScope::Function(FunctionScopeId(0))
    )]
    #[case("function F { $env:PATH = 'x' }", "env:PATH", SymbolScope::Script)]
    #[case("function F { ${script:counter} }", "counter", SymbolScope::Script)]
    fn parse_resolves_scope_qualifiers(
        #[case] content: &str,
        #[case] name: &str,
        #[case] scope: SymbolScope,
    ) {
        let table = parse(content);
        let variable = table.symbols.iter().find(|s| s.name == name).unwrap();
        assert_eq!(variable.scope, scope);
    }

    #[test]
    fn parse_binds_foreach_variable() {
        let table = parse("function F($items) { foreach ($item in $items) { $item } }\n");

        let item: Vec<_> = table
            .symbols
            .iter()
            .filter(|s| s.name == "item")
            .map(|s| (s.is_declaration, s.scope))
            .collect();
        let scope = SymbolScope::Function(FunctionScopeId(0));
        assert_eq!(item, vec![(true, scope), (false, scope)]);
    }

    #[rstest]
    #[case(". ./lib.ps1", "./lib.ps1", ScriptRegion::on_line(1, 3, 12))]
    #[case(". \"$PSScriptRoot/lib.ps1\"", "$PSScriptRoot/lib.ps1", ScriptRegion::on_line(1, 3, 26))]
    #[case(". '.\\utils\\helpers.psm1'", ".\\utils\\helpers.psm1", ScriptRegion::on_line(1, 3, 25))]
    #[case(". $PSScriptRoot\\lib.ps1 # load", "$PSScriptRoot\\lib.ps1", ScriptRegion::on_line(1, 3, 24))]
    fn parse_extracts_dot_source_inclusions(
        #[case] content: &str,
        #[case] path: &str,
        #[case] region: ScriptRegion,
    ) {
        let table = parse(content);
        assert_eq!(
            table.inclusions,
            vec![Inclusion {
                path: path.to_string(),
                region,
            }]
        );
        assert!(table.symbols.is_empty());
    }

    #[test]
    fn parse_treats_dot_sourced_function_name_as_call() {
        let table = parse("function Init { }\n. Init\n");

        assert!(table.inclusions.is_empty());
        assert_eq!(
            names(&table),
            vec![
                ("Init", SymbolKind::Function),
                ("Init", SymbolKind::Function)
            ]
        );
    }

    #[test]
    fn parse_keeps_function_scope_after_dot_sourced_script_block() {
        let table = parse("function F { . { 1 }; $v = 1; $v }\n");

        assert!(table.inclusions.is_empty());
        assert_eq!(
            scopes_of(&table, "v"),
            vec![SymbolScope::Function(FunctionScopeId(0)); 2]
        );
    }

    #[test]
    fn parse_records_dot_sourced_script_block_variable() {
        let table = parse("$sb = { 'hi' }\n. $sb\n");

        assert!(table.inclusions.is_empty());
        let regions: Vec<_> = table
            .symbols
            .iter()
            .filter(|s| s.name == "sb")
            .map(|s| s.region)
            .collect();
        assert_eq!(
            regions,
            vec![ScriptRegion::on_line(1, 1, 4), ScriptRegion::on_line(2, 3, 6)]
        );
    }

    #[test]
    fn parse_ignores_member_access_and_arguments() {
        let table = parse("$list.Add('x') | Out-Null\nGet-Item -Path .\\file.txt\n");

        assert_eq!(
            names(&table),
            vec![
                ("list", SymbolKind::Variable),
                ("Out-Null", SymbolKind::Function),
                ("Get-Item", SymbolKind::Function),
            ]
        );
    }

    #[test]
    fn parse_ignores_hashtable_keys_and_attribute_arguments() {
        let table = parse(
            "$h = @{\n    Name = 'a'\n    Value = Get-Value\n}\n[CmdletBinding(SupportsShouldProcess)]\nparam()\n",
        );

        assert_eq!(
            names(&table),
            vec![("h", SymbolKind::Variable), ("Get-Value", SymbolKind::Function)]
        );
    }

    #[test]
    fn parse_ignores_automatic_pipeline_variable() {
        let table = parse("Get-Item | ForEach-Object { $_.Name }\n");

        assert_eq!(
            names(&table),
            vec![
                ("Get-Item", SymbolKind::Function),
                ("ForEach-Object", SymbolKind::Function)
            ]
        );
    }

    #[test]
    fn parse_counts_columns_in_utf16_units() {
        let table = parse("'😀'; $x\n");

        assert_eq!(table.symbols[0].region, ScriptRegion::on_line(1, 7, 9));
    }

    #[rstest]
    #[case("function F {\n")]
    #[case("'never closed")]
    #[case("$x = (1 + 2\n")]
    fn strict_parser_rejects_syntax_errors(#[case] content: &str) {
        let result = PowerShellParser::strict().parse(content);
        assert!(matches!(result, Err(ParseError::Syntax { .. })));
    }

    #[test]
    fn lenient_parser_accepts_incomplete_function() {
        assert!(PowerShellParser::new().parse("function F {\n  $x = 1\n").is_ok());
    }

    #[rstest]
    #[case("$x", Some((Qualifier::None, "x")))]
    #[case("${my var}", Some((Qualifier::None, "my var")))]
    #[case("$Script:total", Some((Qualifier::Script, "total")))]
    #[case("@params", Some((Qualifier::None, "params")))]
    #[case("$_", None)]
    #[case("$PSScriptRoot", None)]
    fn variable_name_strips_sigil_and_qualifier(
        #[case] text: &str,
        #[case] expected: Option<(Qualifier, &str)>,
    ) {
        assert_eq!(variable_name(text), expected);
    }

    #[rstest]
    #[case("./lib.ps1 -Force", Some(("./lib.ps1", "./lib.ps1")))]
    #[case("'a b.ps1'", Some(("'a b.ps1'", "a b.ps1")))]
    #[case("{ 1 }", None)]
    #[case("(Get-Path)", None)]
    fn read_operand_path_splits_token_and_path(
        #[case] operand: &str,
        #[case] expected: Option<(&str, &str)>,
    ) {
        assert_eq!(read_operand_path(operand), expected);
    }
}
