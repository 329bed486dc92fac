use crate::domain::model::Invocation;
use crate::domain::ports::CommandRunner;
use crate::utils::error::{ExtractorError, Result};
use std::process::{Command, ExitStatus, Stdio};

/// 以作業系統程序執行；stdin/stdout/stderr 直接繼承，不擷取輸出
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn run(&self, invocation: &Invocation) -> Result<i32> {
        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args)
            .current_dir(&invocation.current_dir)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        for (key, value) in &invocation.envs {
            cmd.env(key, value);
        }
        for key in &invocation.env_removes {
            cmd.env_remove(key);
        }

        tracing::debug!("Spawning: {}", invocation.display());
        let status = cmd.status().map_err(|source| ExtractorError::SpawnError {
            program: invocation.program.display().to_string(),
            source,
        })?;

        let code = exit_code(status);
        tracing::debug!("{} exited with code {}", invocation.program.display(), code);
        Ok(code)
    }
}

/// 被訊號終止時比照 shell 回傳 128 + 訊號編號
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_exit_code_is_propagated() {
        let dir = TempDir::new().unwrap();
        let invocation = Invocation::new("sh", dir.path()).arg("-c").arg("exit 7");

        assert_eq!(SystemCommandRunner.run(&invocation).unwrap(), 7);
    }

    #[test]
    fn test_env_and_working_directory_are_applied() {
        let dir = TempDir::new().unwrap();
        let invocation = Invocation::new("sh", dir.path())
            .arg("-c")
            .arg("[ \"$YTLE_PROBE\" = on ] && [ -z \"$HOME_PROBE\" ] && pwd > where.txt")
            .env("YTLE_PROBE", "on")
            .env_remove("HOME_PROBE");

        assert_eq!(SystemCommandRunner.run(&invocation).unwrap(), 0);
        let written = std::fs::read_to_string(dir.path().join("where.txt")).unwrap();
        let expected = dir.path().canonicalize().unwrap();
        assert_eq!(
            std::path::Path::new(written.trim()).canonicalize().unwrap(),
            expected
        );
    }

    #[test]
    fn test_signal_maps_to_shell_convention() {
        let dir = TempDir::new().unwrap();
        let invocation = Invocation::new("sh", dir.path()).arg("-c").arg("kill -9 $$");

        assert_eq!(SystemCommandRunner.run(&invocation).unwrap(), 137);
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let dir = TempDir::new().unwrap();
        let invocation = Invocation::new("definitely-not-a-real-program-ytle", dir.path());

        let err = SystemCommandRunner.run(&invocation).unwrap_err();
        assert!(matches!(err, ExtractorError::SpawnError { .. }));
        assert_eq!(err.exit_code(), 127);
    }
}
