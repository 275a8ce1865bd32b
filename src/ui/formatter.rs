//! Pure formatting functions for UI output.
//!
//! Everything here returns text; the printing lives in the parent module.
//! Styling comes from `console`, which drops the escapes when the stream is
//! not a terminal.

use console::style;

use crate::boundary::BoundaryWarning;

pub fn format_error(message: &str) -> String {
    format!("{} {}", style("ERROR:").red().bold(), message)
}

pub fn format_success(message: &str) -> String {
    format!("{} {}", style("✓").green(), message)
}

pub fn format_status(message: &str) -> String {
    format!("{} {}", style("→").yellow(), message)
}

pub fn format_boundary_warning(warning: &BoundaryWarning) -> String {
    format!("{} {}", style("⚠ WARNING:").yellow(), warning)
}

/// Module/Version/Source block printed by `info`.
///
/// Source points at the browsable tree of the first 10 characters of the
/// commit.
pub fn format_build_info(name: &str, version: &str, remote: &str, commit: &str) -> String {
    let short: String = commit.chars().take(10).collect();
    format!(
        "Module:  {}\nVersion: {}\nSource:  {}/tree/{}\n",
        name,
        version,
        remote.trim_end_matches('/'),
        short
    )
}

/// One line per commit: short hash, decorations, message
pub fn format_commit_line(hash: &str, refs: &[String], tags: &[String], message: &str) -> String {
    let short: String = hash.chars().take(7).collect();
    let mut decorations: Vec<String> = refs.to_vec();
    decorations.extend(tags.iter().map(|t| format!("tag: {}", t)));

    if decorations.is_empty() {
        format!("{} {}", style(short).yellow(), message)
    } else {
        format!(
            "{} {} {}",
            style(short).yellow(),
            style(format!("({})", decorations.join(", "))).cyan(),
            message
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_keep_text() {
        console::set_colors_enabled(false);
        assert_eq!(format_error("boom"), "ERROR: boom");
        assert_eq!(format_success("done"), "✓ done");
        assert_eq!(format_status("working"), "→ working");
    }

    #[test]
    fn test_boundary_warning_text() {
        console::set_colors_enabled(false);
        let warning = BoundaryWarning::NoReleaseNotes {
            version: "v1.0.0".into(),
        };
        assert_eq!(
            format_boundary_warning(&warning),
            "⚠ WARNING: No release notes section for 'v1.0.0'"
        );
    }

    #[test]
    fn test_build_info_block() {
        assert_eq!(
            format_build_info(
                "tool",
                "v1.2.0",
                "https://github.com/org/tool/",
                "6ede8cd0123456789abc"
            ),
            "Module:  tool\nVersion: v1.2.0\nSource:  https://github.com/org/tool/tree/6ede8cd012\n"
        );
    }

    #[test]
    fn test_commit_line_decorations() {
        console::set_colors_enabled(false);
        assert_eq!(
            format_commit_line(
                "6ede8cd0123",
                &["HEAD -> master".to_string()],
                &["v1.0.0".to_string()],
                "Release"
            ),
            "6ede8cd (HEAD -> master, tag: v1.0.0) Release"
        );
        assert_eq!(format_commit_line("abc", &[], &[], "msg"), "abc msg");
    }
}
