//! Generated files around an installed package
//!
//! The launcher, the `.desktop` entry, the `update-<package>` command and the
//! systemd user units are rendered from Tera templates and written atomically.
//! Writers and removers report a [`Step`]; they never fail the operation.

use crate::config::{Layout, PackageSpec};
use crate::lifecycle::report::{Artifact, Step, StepOutcome};
use crate::utils::fs::{atomic_write, remove_file_if_exists, write_executable};
use crate::utils::platform::current_exe_path;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tera::{Context as TeraContext, Tera};

const LAUNCHER_TEMPLATE: &str = r#"#!/bin/sh
exec "{{ binary }}" "$@"
"#;

const UPDATE_COMMAND_TEMPLATE: &str = r#"#!/bin/sh
# Updates {{ display_name }} to the latest release. Generated by lpm.
exec "{{ program }}"{% if config_path %} --config "{{ config_path }}"{% endif %} --package "{{ package }}" update
"#;

const DESKTOP_ENTRY_TEMPLATE: &str = "[Desktop Entry]
Name={{ display_name }}
Comment={{ desktop.comment }}
GenericName={{ desktop.generic_name }}
Exec={{ exec }} %F
Icon={{ icon }}
Type=Application
StartupNotify=true
StartupWMClass={{ desktop.wm_class }}
Categories={% for c in desktop.categories %}{{ c }};{% endfor %}
MimeType={% for m in desktop.mime_types %}{{ m }};{% endfor %}
Keywords={% for k in desktop.keywords %}{{ k }};{% endfor %}
";

const SERVICE_TEMPLATE: &str = "[Unit]
Description=Update {{ display_name }}
After=network-online.target
Wants=network-online.target

[Service]
Type=oneshot
ExecStart={{ update_command }}
StandardOutput=journal

[Install]
WantedBy=default.target
";

const TIMER_TEMPLATE: &str = "[Unit]
Description=Check for {{ display_name }} updates weekly

[Timer]
OnBootSec=10min
OnCalendar=weekly
Persistent=true

[Install]
WantedBy=timers.target
";

/// The command the generated `update-<package>` script runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateCommand {
    /// `lpm` executable
    pub program: PathBuf,
    /// Config file passed along with `--config`, if any
    pub config_path: Option<PathBuf>,
}

impl UpdateCommand {
    /// The running `lpm` executable.
    pub fn current(config_path: Option<PathBuf>) -> Result<Self> {
        Ok(Self {
            program: current_exe_path()?,
            config_path,
        })
    }
}

/// Renders artifact contents.
#[derive(Debug)]
pub struct ArtifactRenderer {
    tera: Tera,
}

impl ArtifactRenderer {
    /// Creates a renderer with all artifact templates registered.
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);
        tera.add_raw_templates(vec![
            ("launcher", LAUNCHER_TEMPLATE),
            ("update-command", UPDATE_COMMAND_TEMPLATE),
            ("desktop-entry", DESKTOP_ENTRY_TEMPLATE),
            ("service", SERVICE_TEMPLATE),
            ("timer", TIMER_TEMPLATE),
        ])
        .context("Failed to register artifact templates")?;
        Ok(Self {
            tera,
        })
    }

    fn render(&self, name: &str, context: &TeraContext) -> Result<String> {
        self.tera.render(name, context).with_context(|| format!("Failed to render {name} template"))
    }

    /// `#!/bin/sh` script exec'ing the package binary with all arguments.
    pub fn launcher(&self, layout: &Layout, spec: &PackageSpec) -> Result<String> {
        let binary = layout.install_dir(spec).join(&spec.binary);
        let mut context = TeraContext::new();
        context.insert("binary", &shell_double_quoted(&binary.display().to_string()));
        self.render("launcher", &context)
    }

    /// Script running `lpm update` for the package.
    pub fn update_command(&self, spec: &PackageSpec, command: &UpdateCommand) -> Result<String> {
        let mut context = TeraContext::new();
        context.insert("display_name", &spec.display_name);
        context.insert("program", &shell_double_quoted(&command.program.display().to_string()));
        context.insert(
            "config_path",
            &command
                .config_path
                .as_ref()
                .map(|p| shell_double_quoted(&p.display().to_string()))
                .unwrap_or_default(),
        );
        context.insert("package", &shell_double_quoted(&spec.name));
        self.render("update-command", &context)
    }

    /// Freedesktop `.desktop` entry pointing at the launcher.
    pub fn desktop_entry(&self, layout: &Layout, spec: &PackageSpec) -> Result<String> {
        let mut context = TeraContext::new();
        context.insert("display_name", &spec.display_name);
        context.insert("desktop", &spec.desktop);
        context.insert("exec", &desktop_exec_arg(&layout.launcher_path(spec)));
        context.insert("icon", &layout.install_dir(spec).join(&spec.icon_path).display().to_string());
        self.render("desktop-entry", &context)
    }

    /// Oneshot service running the update command.
    pub fn service_unit(&self, layout: &Layout, spec: &PackageSpec) -> Result<String> {
        let mut context = TeraContext::new();
        context.insert("display_name", &spec.display_name);
        context.insert("update_command", &desktop_exec_arg(&layout.update_script_path(spec)));
        self.render("service", &context)
    }

    /// Weekly timer for the service.
    pub fn timer_unit(&self, spec: &PackageSpec) -> Result<String> {
        let mut context = TeraContext::new();
        context.insert("display_name", &spec.display_name);
        self.render("timer", &context)
    }
}

/// Escapes `value` for use inside a double-quoted `sh` string.
fn shell_double_quoted(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '"' | '\\' | '$' | '`') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Quotes a path for an `Exec=` line when it contains reserved characters.
///
/// Desktop entries and systemd units share the double-quote convention.
fn desktop_exec_arg(path: &Path) -> String {
    let raw = path.display().to_string();
    if raw.chars().any(|c| c.is_whitespace() || matches!(c, '"' | '\'' | '\\' | '$' | '`')) {
        format!("\"{}\"", shell_double_quoted(&raw))
    } else {
        raw
    }
}

/// Writes `content` to `path`, as an executable when `executable` is set.
pub(crate) fn write_artifact(artifact: Artifact, path: &Path, content: Result<String>, executable: bool) -> Step {
    let result = content.and_then(|content| {
        if executable {
            write_executable(path, &content)?;
        } else {
            atomic_write(path, content.as_bytes())?;
        }
        tracing::debug!(target: "lifecycle", "Wrote {} {}", artifact, path.display());
        Ok(StepOutcome::Applied)
    });
    Step::from_result(artifact, path, result)
}

/// Removes the file at `path`; a missing file is [`StepOutcome::Absent`].
pub(crate) fn remove_artifact(artifact: Artifact, path: &Path) -> Step {
    let result = remove_file_if_exists(path).map(|removed| {
        if removed {
            tracing::debug!(target: "lifecycle", "Removed {} {}", artifact, path.display());
            StepOutcome::Applied
        } else {
            StepOutcome::Absent
        }
    });
    Step::from_result(artifact, path, result)
}
