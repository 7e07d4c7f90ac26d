use std::fmt;
use std::fs;
use std::path::Path;

use rustpython_parser::Parse;
use rustpython_parser::ast;
use rustpython_parser::ast::Ranged;
use rustpython_parser::text_size::TextSize;

use super::CheckOutcome;
use super::file_label;

/// Python 3 syntax checker. Parses only; nothing is executed.
///
/// Besides the grammar, the statement-level rules the bytecode compiler
/// enforces are checked: `return` and `yield` need a function, `await` an
/// async one, and `break`/`continue` an enclosing loop in the same function.
#[derive(Debug, Default, Clone, Copy)]
pub struct PythonSyntax;

/// First syntax problem found in a source file. Line and column are 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxIssue {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for SyntaxIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (line {}, column {})", self.message, self.line, self.column)
    }
}

impl SyntaxIssue {
    fn at(source: &str, offset: usize, message: impl Into<String>) -> Self {
        let (line, column) = line_and_column(source, offset);
        Self {
            message: message.into(),
            line,
            column,
        }
    }
}

impl PythonSyntax {
    pub fn new() -> Self {
        Self
    }

    pub fn check(&self, source: &str) -> Result<(), SyntaxIssue> {
        if let Some(offset) = source.find('\0') {
            return Err(SyntaxIssue::at(
                source,
                offset,
                "source code cannot contain null bytes",
            ));
        }

        let suite = ast::Suite::parse(source, "<agent>")
            .map_err(|e| SyntaxIssue::at(source, usize::from(e.offset), e.error.to_string()))?;

        check_block(&suite, Scope::MODULE)
            .map_err(|(offset, message)| SyntaxIssue::at(source, usize::from(offset), message))
    }
}

/// What encloses the statements being checked.
#[derive(Debug, Clone, Copy)]
struct Scope {
    function: bool,
    async_function: bool,
    in_loop: bool,
}

impl Scope {
    const MODULE: Self = Self {
        function: false,
        async_function: false,
        in_loop: false,
    };

    const CLASS: Self = Self::MODULE;

    fn function(is_async: bool) -> Self {
        Self {
            function: true,
            async_function: is_async,
            in_loop: false,
        }
    }

    fn looping(self) -> Self {
        Self {
            in_loop: true,
            ..self
        }
    }
}

type Misplaced = (TextSize, &'static str);

fn check_block(body: &[ast::Stmt], scope: Scope) -> Result<(), Misplaced> {
    body.iter().try_for_each(|stmt| check_stmt(stmt, scope))
}

fn check_stmt(stmt: &ast::Stmt, scope: Scope) -> Result<(), Misplaced> {
    match stmt {
        ast::Stmt::FunctionDef(def) => check_block(&def.body, Scope::function(false)),
        ast::Stmt::AsyncFunctionDef(def) => check_block(&def.body, Scope::function(true)),
        ast::Stmt::ClassDef(class) => check_block(&class.body, Scope::CLASS),

        ast::Stmt::Return(_) if !scope.function => Err((stmt.start(), "'return' outside function")),
        ast::Stmt::Break(_) if !scope.in_loop => Err((stmt.start(), "'break' outside loop")),
        ast::Stmt::Continue(_) if !scope.in_loop => {
            Err((stmt.start(), "'continue' not properly in loop"))
        }
        ast::Stmt::Expr(expr) => check_expr_stmt(&expr.value, scope),

        // An `else` clause belongs to the enclosing scope, not the loop.
        ast::Stmt::For(node) => {
            check_block(&node.body, scope.looping())?;
            check_block(&node.orelse, scope)
        }
        ast::Stmt::AsyncFor(node) => {
            check_block(&node.body, scope.looping())?;
            check_block(&node.orelse, scope)
        }
        ast::Stmt::While(node) => {
            check_block(&node.body, scope.looping())?;
            check_block(&node.orelse, scope)
        }

        ast::Stmt::If(node) => {
            check_block(&node.body, scope)?;
            check_block(&node.orelse, scope)
        }
        ast::Stmt::With(node) => check_block(&node.body, scope),
        ast::Stmt::AsyncWith(node) => check_block(&node.body, scope),
        ast::Stmt::Try(node) => {
            check_block(&node.body, scope)?;
            check_handlers(&node.handlers, scope)?;
            check_block(&node.orelse, scope)?;
            check_block(&node.finalbody, scope)
        }
        ast::Stmt::TryStar(node) => {
            check_block(&node.body, scope)?;
            check_handlers(&node.handlers, scope)?;
            check_block(&node.orelse, scope)?;
            check_block(&node.finalbody, scope)
        }
        ast::Stmt::Match(node) => node
            .cases
            .iter()
            .try_for_each(|case| check_block(&case.body, scope)),

        _ => Ok(()),
    }
}

fn check_handlers(handlers: &[ast::ExceptHandler], scope: Scope) -> Result<(), Misplaced> {
    handlers.iter().try_for_each(|handler| {
        let ast::ExceptHandler::ExceptHandler(handler) = handler;
        check_block(&handler.body, scope)
    })
}

fn check_expr_stmt(value: &ast::Expr, scope: Scope) -> Result<(), Misplaced> {
    match value {
        ast::Expr::Yield(_) | ast::Expr::YieldFrom(_) if !scope.function => {
            Err((value.start(), "'yield' outside function"))
        }
        ast::Expr::Await(_) if !scope.function => Err((value.start(), "'await' outside function")),
        ast::Expr::Await(_) if !scope.async_function => {
            Err((value.start(), "'await' outside async function"))
        }
        _ => Ok(()),
    }
}

/// 1-based line and character column of a byte offset.
fn line_and_column(source: &str, offset: usize) -> (usize, usize) {
    let before = source.get(..offset).unwrap_or(source);
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |nl| nl + 1);
    let column = before[line_start..].chars().count() + 1;
    (line, column)
}

/// Check the entry-point file: it must exist, be non-empty, and parse.
/// Stops at the first problem, so a failed outcome has exactly one error.
pub fn validate_entry_point(path: &Path, syntax: &PythonSyntax) -> CheckOutcome {
    let file_name = file_label(path);

    if !path.exists() {
        return CheckOutcome::failed(format!("{file_name} is missing"));
    }

    match fs::metadata(path) {
        Ok(meta) if meta.is_file() && meta.len() == 0 => {
            return CheckOutcome::failed(format!("{file_name} is empty"));
        }
        Ok(_) => {}
        Err(e) => return CheckOutcome::failed(format!("{file_name} could not be read: {e}")),
    }

    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => return CheckOutcome::failed(format!("{file_name} could not be read: {e}")),
    };
    let source = match String::from_utf8(bytes) {
        Ok(source) => source,
        Err(e) => {
            return CheckOutcome::failed(format!("{file_name} is not valid UTF-8: {e}"));
        }
    };

    match syntax.check(&source) {
        Ok(()) => CheckOutcome::new(),
        Err(issue) => CheckOutcome::failed(format!("{file_name} has syntax errors: {issue}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const VALID_AGENT: &str = "\
from typing import Any


class WeatherAgent:
    def run(self, query: str) -> dict[str, Any]:
        for attempt in range(3):
            if not query:
                continue
            try:
                return {\"query\": query, \"attempt\": attempt}
            except ValueError:
                break
        else:
            return {}

    async def stream(self, queries):
        async for query in queries:
            await self.send(query)
            yield query


def handle(command):
    match command:
        case \"stop\":
            return None
        case _:
            return command
";

    fn check_file(contents: &[u8]) -> CheckOutcome {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("agent.py");
        fs::write(&path, contents).expect("write agent.py");
        validate_entry_point(&path, &PythonSyntax::new())
    }

    fn issue(source: &str) -> SyntaxIssue {
        PythonSyntax::new()
            .check(source)
            .expect_err("source should be rejected")
    }

    #[test]
    fn valid_source_passes() {
        let outcome = check_file(VALID_AGENT.as_bytes());
        assert!(outcome.ok);
        assert_eq!(outcome.findings, vec![]);
    }

    #[test]
    fn missing_file() {
        let dir = TempDir::new().expect("tempdir");
        let outcome = validate_entry_point(&dir.path().join("agent.py"), &PythonSyntax::new());
        assert!(!outcome.ok);
        assert_eq!(outcome.errors().collect::<Vec<_>>(), vec!["agent.py is missing"]);
    }

    #[test]
    fn empty_file() {
        let outcome = check_file(b"");
        assert!(!outcome.ok);
        assert_eq!(outcome.errors().collect::<Vec<_>>(), vec!["agent.py is empty"]);
    }

    #[test]
    fn syntax_error_is_a_single_error() {
        let outcome = check_file(b"def broken(:\n    pass\n");
        assert!(!outcome.ok);
        assert_eq!(outcome.findings.len(), 1);
        let message = &outcome.findings[0].message;
        assert!(message.starts_with("agent.py has syntax errors: "), "{message}");
        assert!(message.contains("(line 1, column"), "{message}");
    }

    #[test]
    fn syntax_error_reports_its_line() {
        assert_eq!(issue("x = 1\ny = 2\n)\nz = 3\n").line, 3);
    }

    #[test]
    fn python2_statements_are_rejected() {
        for source in [
            "print \"hello\"\n",
            "exec \"x = 1\"\n",
            "x = `1`\n",
            "if a <> b:\n    pass\n",
            "mode = 0777\n",
        ] {
            assert!(PythonSyntax::new().check(source).is_err(), "{source:?}");
        }
    }

    #[test]
    fn inconsistent_dedent_is_rejected() {
        let issue = issue("if ready:\n        start()\n    stop()\n");
        assert_eq!(issue.line, 3, "{issue}");
    }

    #[test]
    fn unpacking_order_and_duplicate_arguments_are_rejected() {
        assert!(PythonSyntax::new().check("f(**kwargs, *args)\n").is_err());
        assert!(PythonSyntax::new().check("def f(a, a):\n    pass\n").is_err());
    }

    #[test]
    fn return_outside_function() {
        assert_eq!(
            issue("x = 1\nreturn x\n"),
            SyntaxIssue {
                message: "'return' outside function".to_string(),
                line: 2,
                column: 1,
            }
        );
        assert_eq!(
            issue("class Agent:\n    return 1\n").message,
            "'return' outside function"
        );
    }

    #[test]
    fn break_and_continue_need_a_loop_in_the_same_function() {
        assert_eq!(issue("break\n").message, "'break' outside loop");
        assert_eq!(
            issue("if True:\n    continue\n").message,
            "'continue' not properly in loop"
        );
        assert_eq!(
            issue("for x in y:\n    def f():\n        break\n"),
            SyntaxIssue {
                message: "'break' outside loop".to_string(),
                line: 3,
                column: 9,
            }
        );
        assert_eq!(
            issue("while x:\n    pass\nelse:\n    break\n").message,
            "'break' outside loop"
        );
    }

    #[test]
    fn yield_and_await_need_a_function() {
        assert_eq!(issue("yield 1\n").message, "'yield' outside function");
        assert_eq!(issue("await job()\n").message, "'await' outside function");
        assert_eq!(
            issue("def run():\n    await job()\n").message,
            "'await' outside async function"
        );
    }

    #[test]
    fn null_bytes_are_rejected() {
        assert_eq!(
            issue("x = 1\ny = \0\n"),
            SyntaxIssue {
                message: "source code cannot contain null bytes".to_string(),
                line: 2,
                column: 5,
            }
        );
    }

    #[test]
    fn columns_count_characters() {
        assert_eq!(line_and_column("é = 1\nñ = é\n", 10), (2, 3));
    }

    #[test]
    fn non_utf8_source_is_an_error() {
        let outcome = check_file(&[0x78, 0x20, 0x3d, 0x20, 0xff, 0x0a]);
        assert!(!outcome.ok);
        assert!(outcome.findings[0].message.starts_with("agent.py is not valid UTF-8"));
    }

    #[test]
    fn directory_in_place_of_file_is_an_error() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("agent.py");
        fs::create_dir(&path).expect("mkdir");
        let outcome = validate_entry_point(&path, &PythonSyntax::new());
        assert!(!outcome.ok);
        assert_eq!(outcome.findings.len(), 1);
    }
}
