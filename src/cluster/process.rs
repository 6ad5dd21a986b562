//! `tokio::process` / `std::process` 기반 실제 명령 실행기

use std::io;
use std::process::{Child, Command as StdCommand, ExitStatus, Stdio};
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use tokio::process::Command;

use super::{DetachedProcess, ProcessOutput, ProcessRunner};
use crate::config::ConnectorSettings;

/// 실제 서브프로세스를 실행하는 `ProcessRunner`
///
/// `run`은 `timeout`을 넘기면 자식 프로세스를 정리하고 `TimedOut` 에러를 반환합니다.
#[derive(Debug, Clone)]
pub struct SystemProcessRunner {
    timeout: Duration,
}

impl SystemProcessRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// `ConnectorSettings::command_timeout`을 적용한 실행기
    pub fn from_settings(settings: &ConnectorSettings) -> Self {
        Self::new(settings.command_timeout)
    }
}

#[async_trait]
impl ProcessRunner for SystemProcessRunner {
    async fn run(&self, program: &str, args: &[String]) -> io::Result<ProcessOutput> {
        debug!("Running: {} {}", program, args.join(" "));

        let mut command = Command::new(program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = tokio::time::timeout(self.timeout, command.output()).await.map_err(|_| {
            io::Error::new(
                io::ErrorKind::TimedOut,
                format!("{} did not finish within {:?}", program, self.timeout),
            )
        })??;

        Ok(ProcessOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }

    fn spawn_detached(&self, program: &str, args: &[String]) -> io::Result<Box<dyn DetachedProcess>> {
        debug!("Spawning: {} {}", program, args.join(" "));

        let child = StdCommand::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::inherit())
            .spawn()?;

        Ok(Box::new(ChildProcess { child: Some(child) }))
    }
}

/// `std::process::Child` 래퍼
///
/// 종료 신호를 보낸 뒤 자식은 별도 스레드에서 회수(wait)되어 좀비로 남지 않습니다.
struct ChildProcess {
    child: Option<Child>,
}

impl DetachedProcess for ChildProcess {
    fn id(&self) -> Option<u32> {
        self.child.as_ref().map(Child::id)
    }

    fn has_exited(&mut self) -> io::Result<bool> {
        match self.child.as_mut() {
            Some(child) => Ok(child.try_wait()?.is_some()),
            None => Ok(true),
        }
    }

    fn terminate(&mut self) -> io::Result<()> {
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };

        if !needs_signal(child.try_wait()) {
            return Ok(());
        }

        send_sigterm(&mut child)?;

        std::thread::spawn(move || {
            if let Err(e) = child.wait() {
                warn!("Failed to reap tunnel process: {}", e);
            }
        });
        Ok(())
    }
}

/// 상태 확인에 실패하면 아직 실행 중이라고 보고 신호를 보냅니다.
fn needs_signal(poll: io::Result<Option<ExitStatus>>) -> bool {
    match poll {
        Ok(status) => status.is_none(),
        Err(e) => {
            warn!("Could not poll tunnel process, signalling anyway: {}", e);
            true
        }
    }
}

#[cfg(unix)]
fn send_sigterm(child: &mut Child) -> io::Result<()> {
    let pid = child.id() as libc::pid_t;
    // SAFETY: kill(2) takes plain integers; pid belongs to a child we have not yet reaped.
    let rc = unsafe { libc::kill(pid, libc::SIGTERM) };
    if rc == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}

#[cfg(not(unix))]
fn send_sigterm(child: &mut Child) -> io::Result<()> {
    child.kill()
}
