use std::env;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::process::Command;

use crate::error::PingError;
use crate::parser;
use crate::platform::{PingOptions, Platform};
use crate::result::PingResult;

/// One executed probe: when it ran, what it targeted, and the parsed
/// output.
#[derive(Debug, Clone, Serialize)]
pub struct ProbeReport {
    pub executed_at: DateTime<Utc>,
    pub host: String,
    pub result: PingResult,
}

/// Locates the system ping binary once and runs probes against it.
///
/// The refined platform variant drives argument building; results are
/// reported under the canonical platform name. Parsing itself is
/// platform-agnostic.
pub struct PingExecutor {
    ping_path: PathBuf,
    platform: Platform,
    options: PingOptions,
}

impl PingExecutor {
    /// Detects the platform and locates the ping binary.
    pub fn new() -> Result<Self, PingError> {
        let platform = Platform::detect();
        let ping_path = locate_ping(platform)?;
        log::debug!(
            "using {} with {} flag set",
            ping_path.display(),
            platform.name()
        );
        Ok(Self {
            ping_path,
            platform,
            options: PingOptions::default(),
        })
    }

    /// Default options applied to every [`ping`](Self::ping) call.
    pub fn set_options(&mut self, options: PingOptions) {
        self.options = options;
    }

    pub fn options(&self) -> &PingOptions {
        &self.options
    }

    /// Ping a host and parse the output. With no options configured a
    /// count of 3 is used so the run terminates on its own.
    pub async fn ping(&self, host: &str) -> Result<ProbeReport, PingError> {
        let mut options = self.options.clone();
        if options.is_empty() {
            options.count = Some(3);
        }
        self.run(host, &options).await
    }

    /// Reachability test: a short quiet burst, up when anything came
    /// back. With `severely` set, every packet must have made it.
    pub async fn check_host(&self, host: &str, severely: bool) -> bool {
        let options = PingOptions {
            count: Some(10),
            size: Some(32),
            quiet: true,
            deadline: Some(10),
            ..PingOptions::default()
        };
        let Ok(report) = self.run(host, &options).await else {
            return false;
        };
        match report.result.received() {
            None | Some(0) => false,
            Some(received) if severely => report.result.transmitted() == Some(received),
            Some(_) => true,
        }
    }

    async fn run(&self, host: &str, options: &PingOptions) -> Result<ProbeReport, PingError> {
        let args = self.platform.build_args(options);
        let executed_at = Utc::now();

        let output = Command::new(&self.ping_path)
            .args(&args.pre)
            .arg(host)
            .args(&args.post)
            .output()
            .await?;

        let lines: Vec<String> = String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::to_string)
            .collect();
        if lines.is_empty() {
            // ping prints at least a banner once it gets going; nothing
            // at all means the name never resolved
            return Err(PingError::HostNotFound);
        }

        let result = parser::parse(&lines, self.platform.canonical().name())?;
        Ok(ProbeReport {
            executed_at,
            host: host.to_string(),
            result,
        })
    }
}

/// Finds an executable `ping` on the PATH, falling back to the sbin
/// directories that often hold it but rarely appear in user PATHs.
/// Windows resolves the name through its own search path.
fn locate_ping(platform: Platform) -> Result<PathBuf, PingError> {
    if platform == Platform::Windows {
        return Ok(PathBuf::from("ping"));
    }

    let path_dirs = env::var_os("PATH")
        .map(|path| env::split_paths(&path).collect::<Vec<_>>())
        .unwrap_or_default();
    let fallback_dirs = ["/bin", "/sbin", "/usr/bin", "/usr/sbin"].map(PathBuf::from);

    for dir in path_dirs.iter().chain(fallback_dirs.iter()) {
        let candidate = dir.join("ping");
        if is_executable(&candidate) {
            return Ok(candidate);
        }
    }

    log::warn!("no executable ping found on PATH");
    Err(PingError::CannotLocatePingBinary)
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
