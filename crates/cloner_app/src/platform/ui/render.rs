use std::path::PathBuf;

use chrono::Utc;
use cloner_core::{AppViewModel, PhaseKind, ServiceStatus};
use cloner_engine::sandbox::escape_text;
use cloner_engine::{AtomicFileWriter, PersistError, PreviewFrame, SandboxPolicy};

use super::constants::*;

/// Writes the host page and echoes status changes to the terminal.
pub struct Renderer {
    writer: AtomicFileWriter,
    policy: SandboxPolicy,
    last_status: Option<String>,
}

impl Renderer {
    pub fn new(output_dir: PathBuf, policy: SandboxPolicy) -> Self {
        Self {
            writer: AtomicFileWriter::new(output_dir),
            policy,
            last_status: None,
        }
    }

    pub fn render(&mut self, view: &AppViewModel) -> Result<PathBuf, PersistError> {
        let page = host_page(view, &self.policy, &Utc::now().to_rfc3339());
        let path = self.writer.write(HOST_PAGE_FILENAME, &page)?;

        let status = status_line(view);
        if self.last_status.as_deref() != Some(status.as_str()) {
            println!("{status}");
            self.last_status = Some(status);
        }
        Ok(path)
    }
}

pub fn status_line(view: &AppViewModel) -> String {
    let mut line = match view.phase {
        PhaseKind::Idle => format!("[Idle] Enter a URL to clone ({QUIT_COMMAND} to exit)"),
        PhaseKind::Loading => format!(
            "[Loading] Cloning {}...",
            view.loading_url.as_deref().unwrap_or_default()
        ),
        PhaseKind::Success => format!(
            "[Success] Preview ready ({} bytes), open {HOST_PAGE_FILENAME}",
            view.preview.as_deref().map_or(0, str::len)
        ),
        PhaseKind::Error => format!("[Error] {}", view.error.as_deref().unwrap_or_default()),
    };
    if view.service == ServiceStatus::Unreachable {
        line.push_str(" | cloning service unreachable");
    }
    line
}

/// Full HTML host page for the current view. The preview frame is only
/// present in `Success`.
pub fn host_page(view: &AppViewModel, policy: &SandboxPolicy, rendered_at: &str) -> String {
    let refresh = if view.phase == PhaseKind::Loading {
        format!("<meta http-equiv=\"refresh\" content=\"{LOADING_REFRESH_SECS}\">\n")
    } else {
        String::new()
    };

    let body = match (&view.phase, &view.preview, &view.error) {
        (PhaseKind::Success, Some(document), _) => PreviewFrame::new(document, policy).to_html(),
        (PhaseKind::Error, _, Some(message)) => {
            format!("<p class=\"error\" role=\"alert\">{}</p>", escape_text(message))
        }
        (PhaseKind::Loading, _, _) => format!(
            "<p class=\"status\">Cloning {}&hellip;</p>",
            escape_text(view.loading_url.as_deref().unwrap_or_default())
        ),
        _ => "<p class=\"status\">Submit a URL to see its clone here.</p>".to_string(),
    };

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n{refresh}<title>{PAGE_TITLE}</title>\n<style>\nbody {{ font-family: sans-serif; margin: 0; padding: 1rem; }}\n.preview {{ width: 100%; height: 85vh; border: 1px solid #ccc; }}\n.error {{ color: #b00020; }}\n</style>\n</head>\n<body>\n<h1>{PAGE_TITLE}</h1>\n<main>\n{body}\n</main>\n<footer>Rendered {}</footer>\n</body>\n</html>\n",
        escape_text(rendered_at)
    )
}
