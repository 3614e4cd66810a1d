// SPDX-License-Identifier: GPL-3.0-only

//! Logical tool names and the executables they resolve to.

use std::fmt;
use std::path::{Path, PathBuf};

use which::which;

use crate::error::{Result, SysError};
use crate::settings::ToolOverrides;

const STRATIS_CMD: &str = match option_env!("STORAGE_STRATIS_CMD") {
    Some(value) => value,
    None => "stratis",
};
const MDADM_CMD: &str = match option_env!("STORAGE_MDADM_CMD") {
    Some(value) => value,
    None => "mdadm",
};
const UDEVADM_CMD: &str = match option_env!("STORAGE_UDEVADM_CMD") {
    Some(value) => value,
    None => "udevadm",
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    /// Stratis pool and filesystem management.
    Stratis,
    /// RAID array management.
    Mdadm,
    /// udev control, used to settle device events.
    Udevadm,
}

impl Tool {
    pub const ALL: [Tool; 3] = [Tool::Stratis, Tool::Mdadm, Tool::Udevadm];

    pub fn name(self) -> &'static str {
        match self {
            Tool::Stratis => "stratis",
            Tool::Mdadm => "mdadm",
            Tool::Udevadm => "udevadm",
        }
    }

    fn default_program(self) -> &'static str {
        match self {
            Tool::Stratis => STRATIS_CMD,
            Tool::Mdadm => MDADM_CMD,
            Tool::Udevadm => UDEVADM_CMD,
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Executable to invoke for each logical tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPaths {
    stratis: PathBuf,
    mdadm: PathBuf,
    udevadm: PathBuf,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            stratis: PathBuf::from(Tool::Stratis.default_program()),
            mdadm: PathBuf::from(Tool::Mdadm.default_program()),
            udevadm: PathBuf::from(Tool::Udevadm.default_program()),
        }
    }
}

impl ToolPaths {
    pub fn with_overrides(overrides: &ToolOverrides) -> Self {
        let defaults = Self::default();
        Self {
            stratis: overrides.stratis.clone().unwrap_or(defaults.stratis),
            mdadm: overrides.mdadm.clone().unwrap_or(defaults.mdadm),
            udevadm: overrides.udevadm.clone().unwrap_or(defaults.udevadm),
        }
    }

    pub fn program(&self, tool: Tool) -> &Path {
        match tool {
            Tool::Stratis => &self.stratis,
            Tool::Mdadm => &self.mdadm,
            Tool::Udevadm => &self.udevadm,
        }
    }

    /// Absolute path of the configured program, searching `PATH` for bare names.
    pub fn locate(&self, tool: Tool) -> Result<PathBuf> {
        which(self.program(tool)).map_err(|error| SysError::ToolNotFound {
            tool: tool.name(),
            reason: error.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_use_bare_program_names() {
        let tools = ToolPaths::default();
        for tool in Tool::ALL {
            assert!(!tools.program(tool).as_os_str().is_empty());
        }
    }

    #[test]
    fn overrides_replace_only_what_they_name() {
        let overrides = ToolOverrides {
            stratis: Some(PathBuf::from("/opt/stratis/bin/stratis")),
            ..Default::default()
        };
        let tools = ToolPaths::with_overrides(&overrides);

        assert_eq!(
            tools.program(Tool::Stratis),
            Path::new("/opt/stratis/bin/stratis")
        );
        assert_eq!(
            tools.program(Tool::Mdadm),
            ToolPaths::default().program(Tool::Mdadm)
        );
    }

    #[test]
    fn locate_reports_missing_tool() {
        let overrides = ToolOverrides {
            mdadm: Some(PathBuf::from("/nonexistent/mdadm")),
            ..Default::default()
        };
        let error = ToolPaths::with_overrides(&overrides)
            .locate(Tool::Mdadm)
            .unwrap_err();
        assert!(matches!(error, SysError::ToolNotFound { tool: "mdadm", .. }));
    }

    #[test]
    fn locate_finds_programs_on_path() {
        let overrides = ToolOverrides {
            udevadm: Some(PathBuf::from("sh")),
            ..Default::default()
        };
        let located = ToolPaths::with_overrides(&overrides)
            .locate(Tool::Udevadm)
            .unwrap();
        assert!(located.is_absolute());
    }
}
