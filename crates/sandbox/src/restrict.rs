//! Best-effort OS-level hardening applied to tool-server child processes on
//! Linux: a landlock filesystem ruleset confining the child to a working
//! directory, and CPU/address-space rlimits as a backstop against runaway
//! plugins. Both are advisory — a kernel without landlock, or running
//! unprivileged in a container that already blocks these syscalls, simply
//! skips the corresponding restriction and the child still runs.

use std::path::PathBuf;

/// Limits applied to a tool-server child before `exec`.
#[derive(Debug, Clone, Default)]
pub struct SandboxPolicy {
    /// Directories the child may read and write under. Empty means no
    /// filesystem restriction is applied.
    pub allowed_paths: Vec<PathBuf>,
    pub cpu_seconds: Option<u64>,
    pub address_space_bytes: Option<u64>,
}

impl SandboxPolicy {
    pub fn allowing(paths: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            allowed_paths: paths.into_iter().collect(),
            ..Default::default()
        }
    }

    pub fn with_cpu_seconds(mut self, seconds: u64) -> Self {
        self.cpu_seconds = Some(seconds);
        self
    }

    pub fn with_address_space_bytes(mut self, bytes: u64) -> Self {
        self.address_space_bytes = Some(bytes);
        self
    }
}

#[cfg(target_os = "linux")]
pub fn apply(command: &mut tokio::process::Command, policy: SandboxPolicy) {
    use std::os::unix::process::CommandExt;

    if policy.allowed_paths.is_empty()
        && policy.cpu_seconds.is_none()
        && policy.address_space_bytes.is_none()
    {
        return;
    }

    // SAFETY: the closure only calls async-signal-safe syscalls (setrlimit,
    // landlock's ruleset/restrict_self) between fork and exec, and performs
    // no allocation that could deadlock in the child.
    unsafe {
        command.pre_exec(move || {
            if let Some(seconds) = policy.cpu_seconds {
                let limit = nix::sys::resource::Resource::RLIMIT_CPU;
                let _ = nix::sys::resource::setrlimit(limit, seconds, seconds);
            }
            if let Some(bytes) = policy.address_space_bytes {
                let limit = nix::sys::resource::Resource::RLIMIT_AS;
                let _ = nix::sys::resource::setrlimit(limit, bytes, bytes);
            }
            if !policy.allowed_paths.is_empty() {
                if let Err(err) = restrict_filesystem(&policy.allowed_paths) {
                    // landlock unsupported (old kernel) or restriction failed:
                    // degrade to unrestricted rather than refuse to launch.
                    eprintln!("nebula-sandbox: landlock restriction skipped: {err}");
                }
            }
            Ok(())
        });
    }
}

#[cfg(not(target_os = "linux"))]
pub fn apply(_command: &mut tokio::process::Command, _policy: SandboxPolicy) {}

#[cfg(target_os = "linux")]
fn restrict_filesystem(allowed_paths: &[PathBuf]) -> Result<(), landlock::RulesetError> {
    use landlock::{Access, AccessFs, PathBeneath, PathFd, Ruleset, RulesetAttr, RulesetCreatedAttr, ABI};

    let access_all = AccessFs::from_all(ABI::V1);
    let mut created = Ruleset::default().handle_access(access_all)?.create()?;
    for path in allowed_paths {
        if let Ok(path_fd) = PathFd::new(path) {
            created = created.add_rule(PathBeneath::new(path_fd, access_all))?;
        }
    }
    created.restrict_self()?;
    Ok(())
}
