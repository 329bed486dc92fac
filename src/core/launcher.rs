use crate::config::LauncherConfig;
use crate::domain::model::{Invocation, LaunchOutcome};
use crate::domain::ports::CommandRunner;
use crate::utils::error::{ExtractorError, LaunchStep, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

const VIRTUAL_ENV_VAR: &str = "VIRTUAL_ENV";

/// 準備 Python 虛擬環境並啟動應用程式。
///
/// 流程固定為：檢查環境 → (建立 → 安裝依賴) → 啟用 → 執行。
/// 任何步驟都不重試；建立或安裝失敗時以該工具的退出碼結束。
pub struct Launcher<R: CommandRunner> {
    runner: R,
    project_root: PathBuf,
    config: LauncherConfig,
    public_url: String,
}

impl<R: CommandRunner> Launcher<R> {
    pub fn new(
        runner: R,
        project_root: PathBuf,
        config: LauncherConfig,
        public_url: impl Into<String>,
    ) -> Self {
        Self {
            runner,
            project_root,
            config,
            public_url: public_url.into(),
        }
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn venv_path(&self) -> PathBuf {
        self.project_root.join(&self.config.venv_dir)
    }

    pub fn scripts_dir(&self) -> PathBuf {
        let dir = if cfg!(windows) { "Scripts" } else { "bin" };
        self.venv_path().join(dir)
    }

    pub fn interpreter(&self) -> PathBuf {
        let exe = if cfg!(windows) { "python.exe" } else { "python" };
        self.scripts_dir().join(exe)
    }

    pub fn run(&self) -> Result<LaunchOutcome> {
        let created_environment = self.ensure_environment()?;
        self.print_banner();
        let exit_code = self.run_application()?;

        Ok(LaunchOutcome {
            created_environment,
            exit_code,
        })
    }

    /// 環境已存在時什麼都不做；回傳本次是否新建
    pub fn ensure_environment(&self) -> Result<bool> {
        let venv = self.venv_path();
        if venv.is_dir() {
            tracing::debug!("Using existing virtual environment: {}", venv.display());
            return Ok(false);
        }

        println!("Virtual environment not found. Creating one...");

        let create = Invocation::new(&self.config.python, &self.project_root)
            .arg("-m")
            .arg("venv")
            .arg(&venv);
        self.run_step(LaunchStep::CreateEnvironment, &create)?;

        let install = self
            .activate(Invocation::new(self.interpreter(), &self.project_root))?
            .arg("-m")
            .arg("pip")
            .arg("install")
            .arg("-r")
            .arg(self.project_root.join(&self.config.manifest));
        self.run_step(LaunchStep::InstallDependencies, &install)?;

        Ok(true)
    }

    /// 讓子程序優先使用虛擬環境裡的工具
    pub fn activate(&self, invocation: Invocation) -> Result<Invocation> {
        let mut paths = vec![self.scripts_dir()];
        if let Some(existing) = std::env::var_os("PATH") {
            paths.extend(std::env::split_paths(&existing));
        }
        let path: OsString =
            std::env::join_paths(paths).map_err(|e| ExtractorError::ConfigError {
                message: format!("Cannot build PATH for the virtual environment: {}", e),
            })?;

        Ok(invocation
            .env(VIRTUAL_ENV_VAR, self.venv_path())
            .env("PATH", path)
            .env_remove("PYTHONHOME"))
    }

    pub fn print_banner(&self) {
        println!("🚀 Starting YouTube Link Extractor...");
        println!("🌐 Open {} in your browser", self.public_url);
    }

    /// 應用程式的退出碼原樣回傳，不視為錯誤
    pub fn run_application(&self) -> Result<i32> {
        let invocation = self
            .activate(Invocation::new(self.interpreter(), &self.project_root))?
            .arg(self.project_root.join(&self.config.entry));

        tracing::debug!("Handing off to: {}", invocation.display());
        let code = self.runner.run(&invocation)?;
        if code != 0 {
            tracing::debug!("{} exited with code {}", LaunchStep::RunApplication, code);
        }
        Ok(code)
    }

    fn run_step(&self, step: LaunchStep, invocation: &Invocation) -> Result<()> {
        tracing::info!("⚙️ {}", invocation.display());
        let code = self.runner.run(invocation)?;
        if code != 0 {
            return Err(ExtractorError::LaunchStepFailed { step, code });
        }
        Ok(())
    }
}

/// 專案根目錄：明確指定的路徑優先，否則為執行檔所在目錄
pub fn resolve_project_root(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(std::path::absolute(path)?),
        None => {
            let exe = std::env::current_exe()?;
            let exe = exe.canonicalize().unwrap_or(exe);
            project_root_for_executable(&exe)
        }
    }
}

pub fn project_root_for_executable(exe: &Path) -> Result<PathBuf> {
    exe.parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .ok_or_else(|| ExtractorError::ConfigError {
            message: format!("Cannot determine directory of {}", exe.display()),
        })
}
