use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::instrument;

/// Lines of downloader stderr kept in the log when it fails.
const STDERR_TAIL_LINES: usize = 10;

/// Fetches whatever audio a link points at into `destination`.
///
/// Implementations make no promise about file names; callers find out what
/// appeared by diffing the directory.
pub trait Downloader {
    fn download(&self, link: &str, destination: &Path) -> Result<()>;
}
impl<F> Downloader for F
where
    F: Fn(&str, &Path) -> Result<()>,
{
    fn download(&self, link: &str, destination: &Path) -> Result<()> {
        self(link, destination)
    }
}

/// The `scdl` command-line downloader (or anything accepting its arguments).
#[derive(Clone, Debug)]
pub struct Scdl {
    program: PathBuf,
    args: Vec<String>,
}
impl Scdl {
    /// Locates `program` on `PATH`. Extra `args` are placed before the
    /// `-l <link> --path <dir>` pair on every invocation.
    pub fn with_program(program: impl AsRef<str>, args: impl IntoIterator<Item = impl Into<String>>) -> Result<Self> {
        let name = program.as_ref();
        let program = which::which(name).or_raise(|| ErrorKind::ToolNotFound(name.to_string()))?;
        tracing::debug!(program = %program.display(), "Discovered download tool");
        Ok(Self { program, args: args.into_iter().map(Into::into).collect() })
    }

    fn name(&self) -> String {
        self.program.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default()
    }
}
impl Downloader for Scdl {
    #[instrument(skip_all, fields(link = link))]
    fn download(&self, link: &str, destination: &Path) -> Result<()> {
        let mut command = Command::new(&self.program);
        command.args(&self.args).arg("-l").arg(link).arg("--path").arg(destination);
        tracing::debug!(command = ?command, "Executing download tool");
        let output = command.output().or_raise(|| ErrorKind::ToolLaunch(self.name()))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let lines: Vec<&str> = stderr.lines().collect();
            let tail = lines[lines.len().saturating_sub(STDERR_TAIL_LINES)..].join("\n");
            tracing::error!(code = ?output.status.code(), stderr = %tail, "Download tool failed");
            exn::bail!(ErrorKind::ToolFailed(output.status.code()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_program_is_reported() {
        let err = Scdl::with_program("cloudtape-no-such-downloader", Vec::<String>::new()).unwrap_err();
        assert_eq!(*err, ErrorKind::ToolNotFound("cloudtape-no-such-downloader".to_string()));
    }

    // `sh -c <script> sh -l <link> --path <dir>` puts the directory in `$4`.
    #[cfg(unix)]
    #[test]
    fn test_invocation_arguments() {
        let temp_dir = tempfile::tempdir().unwrap();
        let tool = Scdl::with_program("sh", ["-c", r#"[ "$1" = "-l" ] && [ "$3" = "--path" ] && echo "$2" > "$4/link.mp3""#, "sh"])
            .unwrap();
        tool.download("https://soundcloud.com/a/b", temp_dir.path()).unwrap();
        let written = std::fs::read_to_string(temp_dir.path().join("link.mp3")).unwrap();
        assert_eq!(written.trim(), "https://soundcloud.com/a/b");
    }

    #[cfg(unix)]
    #[test]
    fn test_non_zero_exit() {
        let temp_dir = tempfile::tempdir().unwrap();
        let tool = Scdl::with_program("sh", ["-c", "echo boom >&2; exit 3", "sh"]).unwrap();
        let err = tool.download("https://soundcloud.com/a/b", temp_dir.path()).unwrap_err();
        assert_eq!(*err, ErrorKind::ToolFailed(Some(3)));
    }
}
