// src/arch.rs

//! Host architecture detection
//!
//! Maps the kernel-reported machine type (`uname -m`) to the architecture
//! tag used in Godot's Linux release asset names.

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Release-asset architecture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Architecture {
    X86_64,
    Arm64,
    Arm32,
    X86_32,
}

impl Architecture {
    /// Tag as it appears in asset file names (`linux.{tag}.zip`)
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::X86_64 => "x86_64",
            Self::Arm64 => "arm64",
            Self::Arm32 => "arm32",
            Self::X86_32 => "x86_32",
        }
    }

    /// Architecture to try when no asset exists for this one
    ///
    /// 32-bit builds are often missing upstream; 64-bit hosts of the same
    /// family usually run them through compatibility layers. Only one level of
    /// fallback is defined.
    pub const fn fallback(&self) -> Option<Architecture> {
        match self {
            Self::Arm32 => Some(Self::Arm64),
            Self::X86_32 => Some(Self::X86_64),
            Self::X86_64 | Self::Arm64 => None,
        }
    }

    /// Map a `uname -m` machine string to an architecture
    pub fn from_machine(machine: &str) -> Result<Self> {
        match machine {
            "x86_64" | "amd64" => Ok(Self::X86_64),
            "aarch64" | "arm64" => Ok(Self::Arm64),
            "armv8l" => Ok(Self::Arm32),
            m if m.starts_with("armv7") => Ok(Self::Arm32),
            "i386" | "i686" => Ok(Self::X86_32),
            other => Err(Error::UnsupportedArchitecture(other.to_string())),
        }
    }

    /// Detect the host architecture
    pub fn resolve() -> Result<Self> {
        let uts = nix::sys::utsname::uname()
            .map_err(|e| Error::UnsupportedArchitecture(format!("uname failed: {e}")))?;
        let machine = uts.machine().to_string_lossy();
        debug!("Host machine type: {}", machine);
        Self::from_machine(&machine)
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Architecture {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "x86_64" => Ok(Self::X86_64),
            "arm64" => Ok(Self::Arm64),
            "arm32" => Ok(Self::Arm32),
            "x86_32" => Ok(Self::X86_32),
            other => Self::from_machine(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_aliases() {
        let cases = [
            ("x86_64", Architecture::X86_64),
            ("amd64", Architecture::X86_64),
            ("aarch64", Architecture::Arm64),
            ("arm64", Architecture::Arm64),
            ("armv7l", Architecture::Arm32),
            ("armv7", Architecture::Arm32),
            ("armv8l", Architecture::Arm32),
            ("i386", Architecture::X86_32),
            ("i686", Architecture::X86_32),
        ];

        for (machine, expected) in cases {
            assert_eq!(Architecture::from_machine(machine).unwrap(), expected, "{machine}");
        }
    }

    #[test]
    fn test_unsupported_machines() {
        for machine in ["", "riscv64", "ppc64le", "s390x", "armv6l", "mips", "X86_64", "i586"] {
            let err = Architecture::from_machine(machine).unwrap_err();
            assert!(matches!(err, Error::UnsupportedArchitecture(_)), "{machine}");
        }
    }

    #[test]
    fn test_fallbacks_are_single_level() {
        assert_eq!(Architecture::Arm32.fallback(), Some(Architecture::Arm64));
        assert_eq!(Architecture::X86_32.fallback(), Some(Architecture::X86_64));
        assert_eq!(Architecture::Arm64.fallback(), None);
        assert_eq!(Architecture::X86_64.fallback(), None);
    }

    #[test]
    fn test_tag_parse() {
        for arch in [
            Architecture::X86_64,
            Architecture::Arm64,
            Architecture::Arm32,
            Architecture::X86_32,
        ] {
            assert_eq!(arch.tag().parse::<Architecture>().unwrap(), arch);
        }
    }

    #[test]
    fn test_resolve_host() {
        // Only meaningful on hosts we support; elsewhere it must be the typed error.
        match Architecture::resolve() {
            Ok(arch) => assert!(!arch.tag().is_empty()),
            Err(e) => assert!(matches!(e, Error::UnsupportedArchitecture(_))),
        }
    }
}
