use std::fmt;

use serde::Serialize;

/// Build metadata recorded by `build.rs`
#[derive(Debug, Clone, Serialize)]
pub struct BuildInfo {
    pub version: &'static str,
    pub package_version: &'static str,
    pub build_profile: &'static str,
    pub build_features: &'static str,
    pub build_timestamp: &'static str,
    pub rust_version: &'static str,
    pub build_target: Option<&'static str>,
    pub build_host: Option<&'static str>,
}

pub fn build_info() -> BuildInfo {
    BuildInfo {
        version: env!("REPO_VERSION"),
        package_version: env!("CARGO_PKG_VERSION"),
        build_profile: env!("BUILD_PROFILE"),
        build_features: env!("BUILD_FEATURES"),
        build_timestamp: env!("BUILD_TIMESTAMP"),
        rust_version: env!("RUST_VERSION"),
        build_target: option_env!("BUILD_TARGET"),
        build_host: option_env!("BUILD_HOST"),
    }
}

impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "tokenseal {} ({})", self.package_version, self.version)?;
        writeln!(f, "  profile:   {}", self.build_profile)?;
        writeln!(f, "  features:  {}", self.build_features)?;
        writeln!(f, "  built at:  {}", self.build_timestamp)?;
        write!(f, "  rustc:     {}", self.rust_version)?;
        if let Some(target) = self.build_target {
            write!(f, "\n  target:    {}", target)?;
        }
        Ok(())
    }
}
