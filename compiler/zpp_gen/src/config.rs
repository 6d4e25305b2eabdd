//! Generation settings.

/// Debug builds keep `assert!`/`expect!` checks; release builds compile
/// them away.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum BuildMode {
    #[default]
    Debug,
    Release,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct GenConfig {
    pub build: BuildMode,
}

impl GenConfig {
    /// Environment variable selecting a release build when set to anything
    /// other than empty or `0`.
    pub const RELEASE_VAR: &'static str = "ZPP_RELEASE";

    pub fn release() -> Self {
        GenConfig {
            build: BuildMode::Release,
        }
    }

    pub fn from_env() -> Self {
        Self::from_release_var(std::env::var(Self::RELEASE_VAR).ok().as_deref())
    }

    fn from_release_var(value: Option<&str>) -> Self {
        match value {
            Some(v) if !v.is_empty() && v != "0" => Self::release(),
            _ => Self::default(),
        }
    }

    #[inline]
    pub fn is_release(self) -> bool {
        self.build == BuildMode::Release
    }
}
