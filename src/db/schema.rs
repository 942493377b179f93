//! Schema script handling.
//!
//! Scripts are plain SQL. A statement may span several lines and ends on the
//! line whose last non-whitespace character is `;`.

/// Split a schema script into executable statements.
///
/// Blank lines and `--` comment lines are skipped. An unterminated trailing
/// fragment is returned as the last statement.
pub fn split_statements(script: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();

    for line in script.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with("--") {
            continue;
        }

        if !current.is_empty() {
            current.push('\n');
        }
        current.push_str(line.trim_end());

        if trimmed.ends_with(';') {
            statements.push(std::mem::take(&mut current));
        }
    }

    if !current.trim().is_empty() {
        statements.push(current);
    }

    statements
}
