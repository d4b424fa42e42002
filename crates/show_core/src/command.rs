//! Argument vector construction from a command template

use crate::error::Result;
use crate::template::{substitute, Substitution, SubstitutionContext};
use crate::tokenize::tokenize;

/// Build the argument vector for one viewer invocation.
///
/// An empty `ctx.title` falls back to the file path. When the template has
/// no `%f`, the file path is appended verbatim as the final argument, so
/// the viewer always receives the image even from a hand-written template.
/// The first element is the program to execute; nothing is passed through
/// a shell.
pub fn build(template: &str, ctx: &SubstitutionContext<'_>) -> Result<Vec<String>> {
    let ctx = ctx.with_default_title();
    let Substitution {
        resolved,
        file_token_seen,
    } = substitute(template, &ctx)?;

    let mut argv = tokenize(&resolved);
    if !file_token_seen {
        argv.push(ctx.file.to_string());
    }

    tracing::debug!("Built viewer command {:?} from template {:?}", argv, template);
    Ok(argv)
}

/// Convenience wrapper over [`build`] taking the context values directly
pub fn build_command(template: &str, app: &str, file: &str, title: &str) -> Result<Vec<String>> {
    build(template, &SubstitutionContext::new(app, file, title))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ViewerError;

    #[test]
    fn test_file_token_inside_quotes() {
        let argv = build_command("%a -e '%f'", "/Apps/IJ", "/tmp/img.nii", "MyTitle").unwrap();
        assert_eq!(argv, vec!["/Apps/IJ", "-e", "/tmp/img.nii"]);
    }

    #[test]
    fn test_file_appended_when_absent() {
        let argv = build_command("%a --show", "/Apps/IJ", "/tmp/img.nii", "").unwrap();
        assert_eq!(argv, vec!["/Apps/IJ", "--show", "/tmp/img.nii"]);
    }

    #[test]
    fn test_appended_file_is_not_split() {
        let argv = build_command("viewer", "", "/tmp/my image.png", "").unwrap();
        assert_eq!(argv, vec!["viewer", "/tmp/my image.png"]);
    }

    #[test]
    fn test_template_without_placeholders() {
        let argv = build_command("eog --fullscreen 'a b'", "", "/tmp/x.png", "").unwrap();
        assert_eq!(argv, vec!["eog", "--fullscreen", "a b", "/tmp/x.png"]);
    }

    #[test]
    fn test_imagej_macro_title_defaults_to_file() {
        let argv = build_command(
            r#"open("%f"); rename("%t");"#,
            "/Apps/IJ",
            "/tmp/img.nii",
            "",
        )
        .unwrap();
        assert_eq!(
            argv,
            vec![r#"open("/tmp/img.nii");"#, r#"rename("/tmp/img.nii");"#]
        );
    }

    #[test]
    fn test_default_linux_template() {
        let argv = build_command(
            r#"%a -e 'open("%f"); rename("%t");'"#,
            "/opt/Fiji.app/ImageJ-linux64",
            "/tmp/Brain-42-0.png",
            "Brain",
        )
        .unwrap();
        assert_eq!(
            argv,
            vec![
                "/opt/Fiji.app/ImageJ-linux64",
                "-e",
                r#"open("/tmp/Brain-42-0.png"); rename("Brain");"#,
            ]
        );
    }

    #[test]
    fn test_missing_application_yields_no_output() {
        let err = build_command("%a %f", "", "/tmp/img.nii", "").unwrap_err();
        assert!(matches!(err, ViewerError::MissingApplication));
    }

    #[test]
    fn test_empty_template_still_names_file() {
        assert_eq!(build_command("", "", "/tmp/x.png", "").unwrap(), vec!["/tmp/x.png"]);
    }
}
