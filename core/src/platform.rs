//! Invocation strategy selection per operating system family

use std::ffi::OsString;
use std::path::Path;

/// Operating system families the controller distinguishes between
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsFamily {
    Unix,
    Windows,
    Other,
}

impl OsFamily {
    /// The family of the platform this binary was built for
    pub fn current() -> Self {
        if cfg!(unix) {
            OsFamily::Unix
        } else if cfg!(windows) {
            OsFamily::Windows
        } else {
            OsFamily::Other
        }
    }
}

/// How an executable is turned into a concrete program + arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationPlan {
    /// Run the target path itself with no extra arguments
    Direct,
    /// Run `launcher` with the target path as its only argument
    Interpreted { launcher: String },
}

impl InvocationPlan {
    /// Split the plan into the program to execute and its argument list
    pub fn program_and_args(&self, target: &Path) -> (OsString, Vec<OsString>) {
        match self {
            InvocationPlan::Direct => (target.as_os_str().to_owned(), Vec::new()),
            InvocationPlan::Interpreted { launcher } => {
                (OsString::from(launcher), vec![target.as_os_str().to_owned()])
            }
        }
    }
}

/// Maps an OS family to an [`InvocationPlan`].
///
/// Unix is executed directly; every other family goes through the configured
/// launcher.
#[derive(Debug, Clone)]
pub struct PlatformResolver {
    launcher: String,
}

impl PlatformResolver {
    pub fn new(launcher: impl Into<String>) -> Self {
        Self {
            launcher: launcher.into(),
        }
    }

    pub fn resolve(&self, family: OsFamily) -> InvocationPlan {
        match family {
            OsFamily::Unix => InvocationPlan::Direct,
            OsFamily::Windows | OsFamily::Other => InvocationPlan::Interpreted {
                launcher: self.launcher.clone(),
            },
        }
    }

    /// Plan for the platform this binary runs on
    pub fn resolve_current(&self) -> InvocationPlan {
        self.resolve(OsFamily::current())
    }
}
