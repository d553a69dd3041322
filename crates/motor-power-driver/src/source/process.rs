//! 外部采集进程行源
//!
//! 启动总线采集命令（默认 `candump can0`），逐行读取其 stdout。
//! 进程退出或管道关闭即流结束；重启采集由上层监督者负责。

use super::{LineSource, ReaderSource};
use crate::DriverError;
use parking_lot::Mutex;
use std::io::BufReader;
use std::process::{Child, ChildStdout, Command, Stdio};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 外部采集进程行源
///
/// Drop 时终止并回收子进程。
pub struct ProcessSource {
    child: Arc<Mutex<Child>>,
    pid: u32,
    reader: ReaderSource<BufReader<ChildStdout>>,
    command_line: String,
}

/// 从其他线程终止采集进程
///
/// 读取阻塞在安静的总线上时，终止进程会关闭管道，Pump 随即读到流结束。
#[derive(Debug, Clone)]
pub struct KillHandle {
    child: Arc<Mutex<Child>>,
    command_line: String,
}

impl KillHandle {
    /// 终止子进程（已退出时什么也不做）
    pub fn kill(&self) {
        terminate(&mut self.child.lock(), &self.command_line);
    }
}

/// 终止并回收子进程
fn terminate(child: &mut Child, command_line: &str) {
    match child.try_wait() {
        Ok(Some(status)) => {
            debug!("Capture process `{}` exited: {}", command_line, status);
        },
        Ok(None) => {
            if let Err(e) = child.kill() {
                warn!("Failed to kill capture process `{}`: {}", command_line, e);
            }
            let _ = child.wait();
            debug!("Capture process `{}` terminated", command_line);
        },
        Err(e) => {
            warn!("Failed to query capture process `{}`: {}", command_line, e);
        },
    }
}

impl ProcessSource {
    /// 启动采集进程
    ///
    /// `argv[0]` 为程序名，其余为参数。不经过 shell。
    ///
    /// # Errors
    ///
    /// - [`DriverError::EmptyCommand`]: `argv` 为空
    /// - [`DriverError::Spawn`]: 进程启动失败（如程序不存在）
    pub fn spawn<S: AsRef<str>>(argv: &[S]) -> Result<Self, DriverError> {
        let (program, args) = argv.split_first().ok_or(DriverError::EmptyCommand)?;
        let command_line = argv.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(" ");

        let mut child = Command::new(program.as_ref())
            .args(args.iter().map(AsRef::as_ref))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| DriverError::Spawn {
                command: command_line.clone(),
                source,
            })?;

        let stdout = match child.stdout.take() {
            Some(stdout) => stdout,
            None => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(DriverError::NoStdout);
            },
        };

        let pid = child.id();
        info!("Capture process started: `{}` (pid {})", command_line, pid);

        Ok(Self {
            child: Arc::new(Mutex::new(child)),
            pid,
            reader: ReaderSource::new(BufReader::new(stdout)),
            command_line,
        })
    }

    /// 子进程 PID
    pub fn id(&self) -> u32 {
        self.pid
    }

    /// 获取终止句柄
    pub fn kill_handle(&self) -> KillHandle {
        KillHandle {
            child: self.child.clone(),
            command_line: self.command_line.clone(),
        }
    }

    /// 启动时的命令行
    pub fn command_line(&self) -> &str {
        &self.command_line
    }
}

impl LineSource for ProcessSource {
    fn next_line(&mut self) -> Result<Option<String>, DriverError> {
        self.reader.next_line()
    }
}

impl Drop for ProcessSource {
    fn drop(&mut self) {
        terminate(&mut self.child.lock(), &self.command_line);
    }
}

impl std::fmt::Debug for ProcessSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessSource")
            .field("pid", &self.pid)
            .field("command_line", &self.command_line)
            .finish()
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_empty_command() {
        let argv: [&str; 0] = [];
        assert!(matches!(
            ProcessSource::spawn(&argv),
            Err(DriverError::EmptyCommand)
        ));
    }

    #[test]
    fn test_spawn_missing_program() {
        let result = ProcessSource::spawn(&["definitely-not-a-real-capture-tool-9a"]);
        match result {
            Err(DriverError::Spawn { command, .. }) => {
                assert_eq!(command, "definitely-not-a-real-capture-tool-9a");
            },
            other => panic!("Expected Spawn error, got {:?}", other),
        }
    }

    #[test]
    fn test_reads_process_stdout_until_exit() {
        let mut source = ProcessSource::spawn(&["printf", "line one\\nline two\\n"]).unwrap();
        assert_eq!(source.command_line(), "printf line one\\nline two\\n");
        assert_eq!(source.next_line().unwrap().as_deref(), Some("line one\n"));
        assert_eq!(source.next_line().unwrap().as_deref(), Some("line two\n"));
        assert!(source.next_line().unwrap().is_none());
    }

    #[test]
    fn test_drop_kills_running_process() {
        let source = ProcessSource::spawn(&["sleep", "30"]).unwrap();
        let start = std::time::Instant::now();
        drop(source);
        assert!(start.elapsed() < std::time::Duration::from_secs(5));
    }

    #[test]
    fn test_kill_handle_unblocks_read() {
        let mut source = ProcessSource::spawn(&["sleep", "30"]).unwrap();
        let handle = source.kill_handle();
        let start = std::time::Instant::now();

        let reader = std::thread::spawn(move || source.next_line().unwrap());
        std::thread::sleep(std::time::Duration::from_millis(100));
        handle.kill();

        assert!(reader.join().unwrap().is_none());
        assert!(start.elapsed() < std::time::Duration::from_secs(5));

        // 进程已退出，再次调用无副作用
        handle.kill();
    }
}
