//! hashcat command line construction.

use std::ffi::OsString;
use std::process::Stdio;

use hashcrack_core::CrackerSettings;
use tokio::process::Command;

use crate::LaunchRequest;

/// Builds the hashcat invocation for one session.
#[derive(Debug, Clone)]
pub struct CrackerCommand<'a> {
    settings: &'a CrackerSettings,
}

impl<'a> CrackerCommand<'a> {
    /// Create a builder over the given settings.
    pub fn new(settings: &'a CrackerSettings) -> Self {
        Self { settings }
    }

    /// Argument vector for a request, without the program name.
    ///
    /// Order: `-m <mode> -a <attack> -o <out> --status --status-timer <n>
    /// -r <rule> [extra..] <hash file> <wordlist>`.
    pub fn args(&self, request: &LaunchRequest) -> Vec<OsString> {
        let stem = request.session_id.to_string();
        let s = self.settings;

        let mut args: Vec<OsString> = vec![
            "-m".into(),
            request.hash_type.to_string().into(),
            "-a".into(),
            s.attack_mode.to_string().into(),
            "-o".into(),
            s.output_file(&stem).into_os_string(),
            "--status".into(),
            "--status-timer".into(),
            s.status_timer_secs.to_string().into(),
            "-r".into(),
            s.rule_file().into_os_string(),
        ];
        args.extend(s.extra_args.iter().map(OsString::from));
        args.push(s.hash_file(&stem).into_os_string());
        args.push(s.wordlist().into_os_string());
        args
    }

    /// A ready-to-spawn command: stdin closed, stdout and stderr piped,
    /// killed if the handle is dropped.
    pub fn build(&self, request: &LaunchRequest) -> Command {
        let mut cmd = Command::new(&self.settings.bin_path);
        cmd.args(self.args(request))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}
