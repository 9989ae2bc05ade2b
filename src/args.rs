//! qpdf argument construction.
//!
//! Maps a validated [`TaskRequest`] onto the argument vector for one qpdf
//! invocation. Construction is pure: no filesystem access, no clock, no
//! randomness. The same request always yields byte-identical arguments.
//!
//! Each path travels as its own argv element, which is how a process
//! argument vector expresses the quoting a shell string would need: paths
//! containing spaces or glob characters reach qpdf as single arguments.
//! [`render_command_line`] produces the quoted human-readable form used
//! for the `qpdf args: …` log line.

use std::ffi::OsString;
use std::path::Path;

use crate::request::{PdfOperation, TaskRequest};

/// Build the qpdf argument vector for a request.
///
/// Flag grammar per operation:
///
/// - merge:   `--empty --pages <input1> … <inputN> -- <output>`
/// - split:   `--split-pages <input0> <folder/pattern>`
/// - rotate:  `--rotate=<signed angle>:1-z <input0> <output>`
/// - reorder: `--pages <input0> <page order> -- <output>`
///
/// Single-input operations read `input_files[0]` only; callers are warned
/// about extra entries by the runner, not here. Assumes the request has
/// passed [`TaskRequest::validate`](crate::request::TaskRequest::validate).
pub fn build_args(request: &TaskRequest) -> Vec<OsString> {
    let mut args = Vec::new();

    match &request.operation {
        PdfOperation::Merge { output_file_name } => {
            args.push("--empty".into());
            args.push("--pages".into());
            for input in &request.input_files {
                args.push(input.clone().into_os_string());
            }
            args.push("--".into());
            args.push(output_path(request, output_file_name));
        }
        PdfOperation::Split { output_pattern } => {
            args.push("--split-pages".into());
            args.push(first_input(request));
            args.push(output_path(request, output_pattern));
        }
        PdfOperation::Rotate {
            angle,
            output_file_name,
        } => {
            // qpdf wants the sign spelled out: +90, -180. 1-z selects
            // every page.
            args.push(format!("--rotate={angle:+}:1-z").into());
            args.push(first_input(request));
            args.push(output_path(request, output_file_name));
        }
        PdfOperation::Reorder {
            page_order,
            output_file_name,
        } => {
            args.push("--pages".into());
            args.push(first_input(request));
            args.push(page_order.clone().into());
            args.push("--".into());
            args.push(output_path(request, output_file_name));
        }
    }

    args
}

fn first_input(request: &TaskRequest) -> OsString {
    request.input_files[0].clone().into_os_string()
}

fn output_path(request: &TaskRequest, file_name: &str) -> OsString {
    request.output_folder.join(file_name).into_os_string()
}

/// Render an argument vector as one shell-style line for logging.
///
/// Arguments containing whitespace, quotes or shell metacharacters are
/// wrapped in double quotes with embedded quotes and backslashes escaped.
/// This is display-only; the vector itself is handed to the process
/// unmodified.
pub fn render_command_line(args: &[OsString]) -> String {
    let rendered: Vec<String> = args
        .iter()
        .map(|arg| quote_for_display(&arg.to_string_lossy()))
        .collect();
    rendered.join(" ")
}

fn quote_for_display(arg: &str) -> String {
    let needs_quotes = arg.is_empty()
        || arg
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '"' | '\'' | '\\' | '*' | '?' | '$' | '&'));

    if !needs_quotes {
        return arg.to_string();
    }

    let mut quoted = String::with_capacity(arg.len() + 2);
    quoted.push('"');
    for c in arg.chars() {
        if matches!(c, '"' | '\\') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::path::PathBuf;

    fn request(operation: PdfOperation, inputs: &[&str]) -> TaskRequest {
        TaskRequest {
            operation,
            tool_path: PathBuf::from("/usr/bin/qpdf"),
            input_files: inputs.iter().map(PathBuf::from).collect(),
            output_folder: PathBuf::from("/out"),
        }
    }

    fn as_strings(args: &[OsString]) -> Vec<String> {
        args.iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn merge_lists_every_input_in_order_between_pages_and_separator() {
        let req = request(
            PdfOperation::Merge {
                output_file_name: "merged.pdf".into(),
            },
            &["a.pdf", "b.pdf", "c.pdf"],
        );

        let args = as_strings(&build_args(&req));
        assert_eq!(
            args,
            vec![
                "--empty",
                "--pages",
                "a.pdf",
                "b.pdf",
                "c.pdf",
                "--",
                "/out/merged.pdf"
            ]
        );

        let pages = args.iter().position(|a| a == "--pages").unwrap();
        let sep = args.iter().position(|a| a == "--").unwrap();
        assert_eq!(sep - pages - 1, req.input_files.len());
    }

    #[test]
    fn merge_accepts_a_single_input() {
        let req = request(
            PdfOperation::Merge {
                output_file_name: "copy.pdf".into(),
            },
            &["only.pdf"],
        );
        let args = as_strings(&build_args(&req));
        assert_eq!(
            args,
            vec!["--empty", "--pages", "only.pdf", "--", "/out/copy.pdf"]
        );
    }

    #[test]
    fn split_uses_first_input_and_joined_pattern() {
        // The second input is intentionally ignored: split operates on
        // input_files[0] only, and the runner reports the extras.
        let req = request(
            PdfOperation::Split {
                output_pattern: "page-%d.pdf".into(),
            },
            &["a.pdf", "b.pdf"],
        );
        let args = as_strings(&build_args(&req));
        assert_eq!(args, vec!["--split-pages", "a.pdf", "/out/page-%d.pdf"]);
    }

    #[rstest]
    #[case(90, "--rotate=+90:1-z")]
    #[case(180, "--rotate=+180:1-z")]
    #[case(270, "--rotate=+270:1-z")]
    #[case(-90, "--rotate=-90:1-z")]
    #[case(-180, "--rotate=-180:1-z")]
    #[case(-270, "--rotate=-270:1-z")]
    fn rotate_flag_spells_out_the_sign(#[case] angle: i32, #[case] expected: &str) {
        let req = request(
            PdfOperation::Rotate {
                angle,
                output_file_name: "rotated.pdf".into(),
            },
            &["in.pdf"],
        );
        let args = as_strings(&build_args(&req));
        assert_eq!(args, vec![expected, "in.pdf", "/out/rotated.pdf"]);
    }

    #[test]
    fn reorder_passes_page_order_verbatim() {
        let req = request(
            PdfOperation::Reorder {
                page_order: "3,1,2".into(),
                output_file_name: "reordered.pdf".into(),
            },
            &["in.pdf"],
        );
        let args = as_strings(&build_args(&req));
        assert_eq!(
            args,
            vec!["--pages", "in.pdf", "3,1,2", "--", "/out/reordered.pdf"]
        );
    }

    #[test]
    fn construction_is_deterministic() {
        let req = request(
            PdfOperation::Merge {
                output_file_name: "merged.pdf".into(),
            },
            &["x.pdf", "y.pdf"],
        );
        assert_eq!(build_args(&req), build_args(&req));
    }

    #[test]
    fn paths_with_spaces_stay_single_arguments() {
        let req = request(
            PdfOperation::Merge {
                output_file_name: "two words.pdf".into(),
            },
            &["my report.pdf"],
        );
        let args = build_args(&req);
        // One argv element per path, spaces and all.
        assert_eq!(args[2], OsString::from("my report.pdf"));
        assert_eq!(args[4], OsString::from("/out/two words.pdf"));
    }

    #[test]
    fn rendered_line_quotes_paths_with_spaces() {
        let req = request(
            PdfOperation::Merge {
                output_file_name: "out.pdf".into(),
            },
            &["my report.pdf", "plain.pdf"],
        );
        let line = render_command_line(&build_args(&req));
        assert_eq!(line, "--empty --pages \"my report.pdf\" plain.pdf -- /out/out.pdf");
    }

    #[test]
    fn rendered_line_escapes_embedded_quotes() {
        let args = vec![OsString::from(r#"we"ird.pdf"#)];
        assert_eq!(render_command_line(&args), r#""we\"ird.pdf""#);
    }
}
