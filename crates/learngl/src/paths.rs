//! Resolves where learngl looks for its configuration file and bundled shaders,
//! honouring environment overrides before falling back to platform directories.
//!
//! Types:
//!
//! - `AppPaths` captures the resolved config directory and the shader search order.
//!
//! Functions:
//!
//! - `AppPaths::discover` probes environment variables and platform defaults.
//! - `AppPaths::find_shader` walks the shader roots for a named file.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use directories_next::ProjectDirs;

pub const ENV_CONFIG_DIR: &str = "LEARNGL_CONFIG_DIR";
pub const ENV_SHADER_DIR: &str = "LEARNGL_SHADER_DIR";
pub const CONFIG_FILE_NAME: &str = "learngl.toml";

const QUALIFIER: &str = "org";
const ORGANISATION: &str = "learngl";
const APPLICATION: &str = "learngl";

#[derive(Debug, Clone)]
pub struct AppPaths {
    config_dir: PathBuf,
    shader_override: Option<PathBuf>,
    working_dir: PathBuf,
}

impl AppPaths {
    pub fn discover() -> Result<Self> {
        let config_dir = match env_override(ENV_CONFIG_DIR) {
            Some(dir) => dir,
            None => ProjectDirs::from(QUALIFIER, ORGANISATION, APPLICATION)
                .map(|dirs| dirs.config_dir().to_path_buf())
                .ok_or_else(|| anyhow!("failed to determine user config directory"))?,
        };
        let working_dir = env::current_dir()
            .map_err(|err| anyhow!("failed to read current directory: {err}"))?;

        Ok(Self::new(
            config_dir,
            env_override(ENV_SHADER_DIR),
            working_dir,
        ))
    }

    pub fn new(config_dir: PathBuf, shader_override: Option<PathBuf>, working_dir: PathBuf) -> Self {
        Self {
            config_dir,
            shader_override,
            working_dir,
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE_NAME)
    }

    pub fn shader_roots(&self) -> Vec<PathBuf> {
        // Resolution order: LEARNGL_SHADER_DIR > ./shaders > CONFIG_DIR/shaders
        let mut roots = Vec::with_capacity(3);
        if let Some(dir) = &self.shader_override {
            roots.push(dir.clone());
        }
        roots.push(self.working_dir.join("shaders"));
        roots.push(self.config_dir.join("shaders"));
        roots
    }

    /// First existing `name` under the shader roots, or the working-directory
    /// candidate so a later read reports a meaningful path.
    pub fn find_shader(&self, name: &str) -> PathBuf {
        let roots = self.shader_roots();
        roots
            .iter()
            .map(|root| root.join(name))
            .find(|candidate| candidate.is_file())
            .unwrap_or_else(|| self.working_dir.join("shaders").join(name))
    }
}

fn env_override(key: &str) -> Option<PathBuf> {
    env::var_os(key)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}
