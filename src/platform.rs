//! Per-platform ping invocation details.
//!
//! Every OS ships a ping with its own flag names and argument order.
//! The closed set of known variants lives in [`Platform`]; each maps to
//! an immutable [`ArgFlags`] table plus an ordering rule in
//! [`Platform::build_args`]. Only invocation differs per platform — the
//! output parser never looks at the variant.

use std::fs;

use serde::{Deserialize, Serialize};

/// Options accepted for a ping run. Anything left unset is simply not
/// passed to the binary; options the platform has no flag for are
/// silently dropped, which mirrors what the tools themselves support.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PingOptions {
    pub count: Option<u32>,
    /// Payload size in bytes.
    pub size: Option<u32>,
    pub ttl: Option<u32>,
    /// Per-packet timeout. Unit is platform-defined (ms or s).
    pub timeout: Option<u32>,
    /// Overall deadline in seconds (Linux -w).
    pub deadline: Option<u32>,
    pub quiet: bool,
    /// Source interface name or address.
    pub iface: Option<String>,
}

impl PingOptions {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Flag spelling per option for one platform. `None` means the option
/// is unsupported there; an empty string means the value is passed bare
/// (SunOS and HP-UX take size/count as positional trailing arguments).
#[derive(Debug, Clone, Copy)]
pub struct ArgFlags {
    pub timeout: Option<&'static str>,
    pub iface: Option<&'static str>,
    pub ttl: Option<&'static str>,
    pub count: Option<&'static str>,
    pub quiet: Option<&'static str>,
    pub size: Option<&'static str>,
    pub deadline: Option<&'static str>,
}

const NO_FLAGS: ArgFlags = ArgFlags {
    timeout: None,
    iface: None,
    ttl: None,
    count: None,
    quiet: None,
    size: None,
    deadline: None,
};

/// Built argument list: tokens before the host and after it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PingArgs {
    pub pre: Vec<String>,
    pub post: Vec<String>,
}

/// Known ping variants. The three Linux vendor entries exist because
/// old Red Hat and Debian builds of iputils disagreed about `-I` and
/// `-W`; detection reports the refined variant for argument building
/// and the canonical one for everything user-facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    SunOs,
    FreeBsd,
    NetBsd,
    OpenBsd,
    Darwin,
    Linux,
    LinuxDebian,
    LinuxRedHat8,
    LinuxRedHat9,
    Windows,
    Hpux,
    Aix,
}

impl Platform {
    pub fn name(self) -> &'static str {
        match self {
            Platform::SunOs => "sunos",
            Platform::FreeBsd => "freebsd",
            Platform::NetBsd => "netbsd",
            Platform::OpenBsd => "openbsd",
            Platform::Darwin => "darwin",
            Platform::Linux => "linux",
            Platform::LinuxDebian => "linuxdebian",
            Platform::LinuxRedHat8 => "linuxredhat8",
            Platform::LinuxRedHat9 => "linuxredhat9",
            Platform::Windows => "windows",
            Platform::Hpux => "hpux",
            Platform::Aix => "aix",
        }
    }

    /// Collapses vendor-refined variants back to their base platform.
    pub fn canonical(self) -> Platform {
        match self {
            Platform::LinuxDebian | Platform::LinuxRedHat8 | Platform::LinuxRedHat9 => {
                Platform::Linux
            }
            other => other,
        }
    }

    pub fn flags(self) -> ArgFlags {
        match self {
            Platform::SunOs => ArgFlags {
                ttl: Some("-t"),
                count: Some(""),
                quiet: Some("-q"),
                size: Some(""),
                iface: Some("-i"),
                ..NO_FLAGS
            },
            Platform::FreeBsd => ArgFlags {
                timeout: Some("-t"),
                ttl: Some("-m"),
                count: Some("-c"),
                quiet: Some("-q"),
                ..NO_FLAGS
            },
            Platform::NetBsd => ArgFlags {
                timeout: Some("-w"),
                iface: Some("-I"),
                ttl: Some("-T"),
                count: Some("-c"),
                quiet: Some("-q"),
                size: Some("-s"),
                ..NO_FLAGS
            },
            Platform::OpenBsd => ArgFlags {
                timeout: Some("-w"),
                iface: Some("-I"),
                ttl: Some("-t"),
                count: Some("-c"),
                quiet: Some("-q"),
                size: Some("-s"),
                ..NO_FLAGS
            },
            Platform::Darwin => ArgFlags {
                timeout: Some("-t"),
                count: Some("-c"),
                quiet: Some("-q"),
                ..NO_FLAGS
            },
            Platform::Linux => ArgFlags {
                timeout: Some("-W"),
                ttl: Some("-t"),
                count: Some("-c"),
                quiet: Some("-q"),
                size: Some("-s"),
                deadline: Some("-w"),
                ..NO_FLAGS
            },
            Platform::LinuxDebian => ArgFlags {
                timeout: Some("-W"),
                ttl: Some("-t"),
                count: Some("-c"),
                quiet: Some("-q"),
                size: Some("-s"),
                deadline: Some("-w"),
                ..NO_FLAGS
            },
            Platform::LinuxRedHat8 => ArgFlags {
                iface: Some("-I"),
                ttl: Some("-t"),
                count: Some("-c"),
                quiet: Some("-q"),
                size: Some("-s"),
                deadline: Some("-w"),
                ..NO_FLAGS
            },
            Platform::LinuxRedHat9 => ArgFlags {
                timeout: Some("-W"),
                iface: Some("-I"),
                ttl: Some("-t"),
                count: Some("-c"),
                quiet: Some("-q"),
                size: Some("-s"),
                deadline: Some("-w"),
                ..NO_FLAGS
            },
            Platform::Windows => ArgFlags {
                timeout: Some("-w"),
                ttl: Some("-i"),
                count: Some("-n"),
                ..NO_FLAGS
            },
            Platform::Hpux => ArgFlags {
                ttl: Some("-t"),
                count: Some("-n"),
                size: Some(""),
                ..NO_FLAGS
            },
            Platform::Aix => ArgFlags {
                timeout: Some("-i"),
                ttl: Some("-T"),
                count: Some("-c"),
                size: Some("-s"),
                ..NO_FLAGS
            },
        }
    }

    /// Builds the argument list around the host for this variant.
    pub fn build_args(self, options: &PingOptions) -> PingArgs {
        let flags = self.flags();

        let timeout = value_tokens(flags.timeout, options.timeout);
        let ttl = value_tokens(flags.ttl, options.ttl);
        let deadline = value_tokens(flags.deadline, options.deadline);
        let iface = flags
            .iface
            .zip(options.iface.as_deref())
            .map(|(flag, name)| vec![flag.to_string(), name.to_string()])
            .unwrap_or_default();
        let quiet = match (flags.quiet, options.quiet) {
            (Some(flag), true) => vec![flag.to_string()],
            _ => Vec::new(),
        };
        let mut count = value_tokens(flags.count, options.count);
        let mut size = value_tokens(flags.size, options.size);

        let mut args = PingArgs::default();
        match self {
            Platform::SunOs => {
                // SunOS takes size and count as trailing positionals and
                // needs -s to emit per-packet lines; once either is
                // given, both must be, so the missing one is defaulted.
                let mut seq = Vec::new();
                if !size.is_empty() || !count.is_empty() || !iface.is_empty() {
                    seq.push("-s".to_string());
                    if size.is_empty() {
                        size = vec!["56".to_string()];
                    }
                    if count.is_empty() {
                        count = vec!["5".to_string()];
                    }
                }
                args.pre = [iface, seq, ttl].concat();
                args.post = [size, count].concat();
            }
            Platform::FreeBsd => {
                args.pre = [quiet, count, ttl, timeout].concat();
            }
            Platform::Darwin => {
                args.pre = [count, timeout, size].concat();
            }
            Platform::NetBsd | Platform::OpenBsd => {
                args.pre = [quiet, count, iface, size, ttl, timeout].concat();
            }
            Platform::Linux => {
                args.pre = [quiet, deadline, count, ttl, size, timeout].concat();
            }
            Platform::LinuxDebian => {
                args.pre = [quiet, count, ttl, size, timeout].concat();
            }
            Platform::LinuxRedHat8 => {
                args.pre = [iface, ttl, count, quiet, size, deadline].concat();
            }
            Platform::LinuxRedHat9 => {
                args.pre = [timeout, iface, ttl, count, quiet, size, deadline].concat();
            }
            Platform::Windows => {
                args.pre = [count, ttl, timeout].concat();
            }
            Platform::Hpux => {
                args.pre = ttl;
                args.post = [size, count].concat();
            }
            Platform::Aix => {
                args.pre = [count, timeout, ttl, size].concat();
            }
        }
        args
    }

    /// Maps the running OS to a variant. On Linux the vendor release
    /// files further refine the variant, because the iputils flag set
    /// differed between distributions.
    pub fn detect() -> Platform {
        match std::env::consts::OS {
            "windows" => Platform::Windows,
            "macos" => Platform::Darwin,
            "freebsd" | "dragonfly" => Platform::FreeBsd,
            "netbsd" => Platform::NetBsd,
            "openbsd" => Platform::OpenBsd,
            "solaris" | "illumos" => Platform::SunOs,
            "aix" => Platform::Aix,
            "linux" => refine_linux(),
            other => {
                log::debug!("unrecognized OS {other:?}, using linux flag set");
                Platform::Linux
            }
        }
    }
}

fn value_tokens(flag: Option<&'static str>, value: Option<u32>) -> Vec<String> {
    match (flag, value) {
        (Some(""), Some(value)) => vec![value.to_string()],
        (Some(flag), Some(value)) => vec![flag.to_string(), value.to_string()],
        _ => Vec::new(),
    }
}

fn refine_linux() -> Platform {
    if let Ok(release) = fs::read_to_string("/etc/lsb-release") {
        if release.to_ascii_lowercase().contains("gutsy") {
            return Platform::LinuxRedHat9;
        }
    }
    if fs::metadata("/etc/debian_version").is_ok() {
        return Platform::LinuxDebian;
    }
    if let Ok(release) = fs::read_to_string("/etc/redhat-release") {
        let release = release.to_ascii_lowercase();
        if release.contains("release 8") {
            return Platform::LinuxRedHat8;
        }
        if release.contains("release 9") {
            return Platform::LinuxRedHat9;
        }
    }
    Platform::Linux
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts() -> PingOptions {
        PingOptions::default()
    }

    #[test]
    fn empty_options_build_empty_args() {
        for platform in [Platform::Linux, Platform::Windows, Platform::SunOs, Platform::Hpux] {
            assert_eq!(platform.build_args(&opts()), PingArgs::default());
        }
    }

    #[test]
    fn linux_orders_flags_before_host() {
        let options = PingOptions {
            count: Some(2),
            size: Some(64),
            deadline: Some(10),
            quiet: true,
            ..opts()
        };
        let args = Platform::Linux.build_args(&options);
        assert_eq!(args.pre, ["-q", "-w", "10", "-c", "2", "-s", "64"]);
        assert!(args.post.is_empty());
    }

    #[test]
    fn windows_uses_its_own_flag_names() {
        let options = PingOptions {
            count: Some(2),
            ttl: Some(128),
            timeout: Some(5000),
            quiet: true, // no windows equivalent, dropped
            ..opts()
        };
        let args = Platform::Windows.build_args(&options);
        assert_eq!(args.pre, ["-n", "2", "-i", "128", "-w", "5000"]);
        assert!(args.post.is_empty());
    }

    #[test]
    fn sunos_defaults_size_and_count_together() {
        let args = Platform::SunOs.build_args(&PingOptions { size: Some(100), ..opts() });
        assert_eq!(args.pre, ["-s"]);
        assert_eq!(args.post, ["100", "5"]);

        let args = Platform::SunOs.build_args(&PingOptions { count: Some(2), ..opts() });
        assert_eq!(args.post, ["56", "2"]);
    }

    #[test]
    fn hpux_takes_size_and_count_after_host() {
        let options = PingOptions { count: Some(3), size: Some(64), ttl: Some(32), ..opts() };
        let args = Platform::Hpux.build_args(&options);
        assert_eq!(args.pre, ["-t", "32"]);
        assert_eq!(args.post, ["64", "-n", "3"]);
    }

    #[test]
    fn unsupported_options_are_dropped() {
        // Darwin ping has no size or ttl flag in this table
        let options = PingOptions { count: Some(4), size: Some(64), ttl: Some(32), ..opts() };
        let args = Platform::Darwin.build_args(&options);
        assert_eq!(args.pre, ["-c", "4"]);
    }

    #[test]
    fn vendor_variants_collapse_to_linux() {
        assert_eq!(Platform::LinuxDebian.canonical(), Platform::Linux);
        assert_eq!(Platform::LinuxRedHat8.canonical(), Platform::Linux);
        assert_eq!(Platform::LinuxRedHat9.canonical(), Platform::Linux);
        assert_eq!(Platform::Darwin.canonical(), Platform::Darwin);
    }

    #[test]
    fn redhat8_has_no_per_packet_timeout() {
        let options = PingOptions { timeout: Some(5), count: Some(1), ..opts() };
        assert_eq!(
            Platform::LinuxRedHat8.build_args(&options).pre,
            ["-c", "1"]
        );
        assert_eq!(
            Platform::LinuxRedHat9.build_args(&options).pre,
            ["-W", "5", "-c", "1"]
        );
    }
}
