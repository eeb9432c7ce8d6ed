//! Template rendering for `.worktree/files` and hook scripts
//!
//! Templates use minijinja syntax with the worktree values in scope:
//!
//! ```text
//! {{ branch }}                     feature/user-auth
//! {{ branch | slug }}              feature-user-auth
//! {{ branch | replace("/", "_") }} feature_user-auth
//! {{ directory }}                  /work/project/feature-user-auth
//! {{ root_directory }}             /work/project
//! {% if branch == "main" %}prod{% else %}dev{% endif %}
//! ```
//!
//! `{{-` and `-}}` trim surrounding whitespace. Undefined variables and
//! unknown filters are errors rather than empty output.

use std::fs;
use std::sync::LazyLock;

use minijinja::{AutoEscape, Environment, UndefinedBehavior};
use serde::Serialize;
use wtm_fs::{NormalizedPath, io};
use wtm_git::naming::worktree_directory;

use crate::{Error, Result};

/// Suffix marking a file under `.worktree/files` as a template.
pub const TEMPLATE_SUFFIX: &str = ".tmpl";

static ENVIRONMENT: LazyLock<Environment<'static>> = LazyLock::new(|| {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env.set_keep_trailing_newline(true);
    env.set_auto_escape_callback(|_| AutoEscape::None);
    env.add_filter("slug", slug);
    env
});

/// Values available to templates and hooks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateData {
    /// Branch checked out in the worktree, e.g. `feature/user-auth`.
    pub branch: String,
    /// Absolute path of the worktree directory.
    pub directory: String,
    /// Absolute path of the workspace root.
    pub root_directory: String,
}

fn slug(value: String) -> String {
    worktree_directory(&value)
}

/// Render `source` against `data`. `name` identifies the template in errors.
pub fn render(name: &str, source: &str, data: &TemplateData) -> Result<String> {
    ENVIRONMENT
        .render_named_str(name, source, data)
        .map_err(|e| Error::Template {
            name: name.to_string(),
            message: e.to_string(),
        })
}

/// Populate `worktree_dir` from `files_dir`.
///
/// Directories are recreated, `*.tmpl` files are rendered and written
/// without the suffix, everything else is copied. File permissions are
/// carried over from the source. A missing `files_dir` is not an error.
///
/// Returns the number of files written.
pub fn process_templates(
    files_dir: &NormalizedPath,
    worktree_dir: &NormalizedPath,
    data: &TemplateData,
) -> Result<usize> {
    if !files_dir.is_dir() {
        tracing::debug!(files_dir = %files_dir, "No files directory, skipping templates");
        return Ok(0);
    }

    process_dir(files_dir, worktree_dir, data)
}

fn process_dir(
    source_dir: &NormalizedPath,
    target_dir: &NormalizedPath,
    data: &TemplateData,
) -> Result<usize> {
    let native = source_dir.to_native();
    fs::create_dir_all(target_dir.to_native())
        .map_err(|e| Error::io(target_dir.to_native(), e))?;

    let mut entries = fs::read_dir(&native)
        .map_err(|e| Error::io(&native, e))?
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(|e| Error::io(&native, e))?;
    entries.sort_by_key(|entry| entry.file_name());

    let mut written = 0;
    for entry in entries {
        let file_name = entry.file_name().to_string_lossy().to_string();
        let source = source_dir.join(&file_name);
        let target = target_dir.join(&file_name);

        if source.is_dir() {
            written += process_dir(&source, &target, data)?;
            continue;
        }

        match target.strip_suffix(TEMPLATE_SUFFIX) {
            Some(rendered_target) => {
                let content = io::read_text(&source)?;
                let rendered = render(&file_name, &content, data)?;
                let permissions = fs::metadata(source.to_native())
                    .map_err(|e| Error::io(source.to_native(), e))?
                    .permissions();
                io::write_atomic_with_permissions(
                    &rendered_target,
                    rendered.as_bytes(),
                    Some(permissions),
                )?;
                tracing::debug!(target = %rendered_target, "Rendered template");
            }
            None => {
                io::copy_preserving_permissions(&source, &target)?;
                tracing::debug!(target = %target, "Copied file");
            }
        }
        written += 1;
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn data() -> TemplateData {
        TemplateData {
            branch: "feature/User_Auth".into(),
            directory: "/work/project/feature-User-Auth".into(),
            root_directory: "/work/project".into(),
        }
    }

    #[rstest]
    #[case("{{ branch }}", "feature/User_Auth")]
    #[case("{{branch}}", "feature/User_Auth")]
    #[case("{{ branch | slug }}", "feature-User-Auth")]
    #[case("{{ branch | slug | lower }}", "feature-user-auth")]
    #[case("{{ branch | upper }}", "FEATURE/USER_AUTH")]
    #[case("{{ branch | replace(\"/\", \"_\") }}", "feature_User_Auth")]
    #[case("cd {{ directory }} && make", "cd /work/project/feature-User-Auth && make")]
    #[case("no placeholders", "no placeholders")]
    #[case("{ branch }", "{ branch }")]
    #[case("line\n", "line\n")]
    fn test_render(#[case] source: &str, #[case] expected: &str) {
        assert_eq!(render("t", source, &data()).unwrap(), expected);
    }

    #[rstest]
    #[case("a  {{- root_directory -}}  b", "a/work/projectb")]
    #[case("x\n  {{- branch }}", "xfeature/User_Auth")]
    #[case("{{ branch -}}\n  !", "feature/User_Auth!")]
    #[case("[\n{%- if true %}on{% endif -%}\n]", "[on]")]
    fn test_render_trims_whitespace(#[case] source: &str, #[case] expected: &str) {
        assert_eq!(render("t", source, &data()).unwrap(), expected);
    }

    #[rstest]
    #[case("feature/User_Auth", "dev")]
    #[case("main", "prod")]
    fn test_render_conditionals(#[case] branch: &str, #[case] expected: &str) {
        let data = TemplateData {
            branch: branch.into(),
            ..data()
        };
        let source = r#"{% if branch == "main" %}prod{% else %}dev{% endif %}"#;

        assert_eq!(render("t", source, &data).unwrap(), expected);
    }

    #[test]
    fn test_render_markup_is_not_escaped() {
        let data = TemplateData {
            branch: "fix/<a&b>".into(),
            ..data()
        };

        assert_eq!(render("index.html", "{{ branch }}", &data).unwrap(), "fix/<a&b>");
    }

    #[rstest]
    #[case("{{ nope }}")]
    #[case("{{ .Branch }}")]
    #[case("{{ branch | reverse_words }}")]
    #[case("{% if nope %}x{% endif %}")]
    #[case("{% if branch %}unterminated")]
    #[case("{{ }}")]
    fn test_render_errors(#[case] source: &str) {
        let err = render("broken.tmpl", source, &data()).unwrap_err();
        assert!(matches!(err, Error::Template { ref name, .. } if name == "broken.tmpl"));
    }
}
