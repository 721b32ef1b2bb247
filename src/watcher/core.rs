use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use globset::{Glob, GlobSet, GlobSetBuilder};
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, error, info, trace, warn};

/// Default debounce window for collapsing change-event bursts.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(150);

/// How often the supervision loop wakes to check the hosted process when no
/// events are pending.
const CHILD_POLL: Duration = Duration::from_millis(200);

/// Configuration for a [`DevWatcher`].
#[derive(Debug, Clone)]
pub struct WatcherConfig {
    /// Command to run as the hosted process
    pub entry: PathBuf,
    /// Arguments passed to the hosted process
    pub args: Vec<String>,
    /// Paths observed recursively for changes
    pub watch: Vec<PathBuf>,
    /// Glob patterns for paths that never trigger a restart
    pub ignore: Vec<String>,
    /// Debounce window; repeated events inside it collapse into one restart
    pub debounce: Duration,
    /// Log every observed change event
    pub verbose: bool,
    /// Extra environment for the hosted process
    pub env: Vec<(String, String)>,
}

impl WatcherConfig {
    pub fn new(entry: impl Into<PathBuf>) -> Self {
        Self {
            entry: entry.into(),
            args: Vec::new(),
            watch: vec![PathBuf::from(".")],
            ignore: Vec::new(),
            debounce: DEFAULT_DEBOUNCE,
            verbose: false,
            env: Vec::new(),
        }
    }
}

/// Where the watcher is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatcherState {
    /// Not started, or stopped
    Idle,
    /// Hosted process running, observing for changes
    Watching,
    /// Change seen, debounce timer armed
    Debouncing,
    /// Old process terminating / new process spawning
    Restarting,
    /// Spawn failed or the hosted process died; waiting for the next change
    Failed,
}

enum LoopEvent {
    Changed(PathBuf),
    Restart,
    Stop,
}

/// Development watcher: observe, debounce, restart.
///
/// The hosted server is a separate OS process; the watcher talks to it only
/// through spawn / kill / wait. Dropping the watcher stops it.
pub struct DevWatcher {
    config: WatcherConfig,
    state: Arc<Mutex<WatcherState>>,
    restarts: Arc<AtomicUsize>,
    tx: Option<Sender<LoopEvent>>,
    loop_handle: Option<JoinHandle<()>>,
    fs_watcher: Option<RecommendedWatcher>,
}

impl DevWatcher {
    pub fn new(config: WatcherConfig) -> Self {
        Self {
            config,
            state: Arc::new(Mutex::new(WatcherState::Idle)),
            restarts: Arc::new(AtomicUsize::new(0)),
            tx: None,
            loop_handle: None,
            fs_watcher: None,
        }
    }

    /// Spawn the hosted process and begin observing the watch paths.
    ///
    /// A hosted process that fails to launch is reported and leaves the
    /// watcher alive in `Failed`; only watcher-infrastructure problems
    /// (thread spawn, filesystem observation) are returned as errors.
    pub fn start(&mut self) -> anyhow::Result<()> {
        if self.loop_handle.is_some() {
            return Ok(());
        }

        let (tx, rx) = mpsc::channel();
        let handle = {
            let config = self.config.clone();
            let state = Arc::clone(&self.state);
            let restarts = Arc::clone(&self.restarts);
            thread::Builder::new()
                .name("treeroute-dev".into())
                .spawn(move || supervise(&config, &rx, &state, &restarts))?
        };

        let event_tx = tx.clone();
        let mut fs_watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if event.kind.is_modify() || event.kind.is_create() || event.kind.is_remove() {
                        for path in event.paths {
                            let _ = event_tx.send(LoopEvent::Changed(path));
                        }
                    }
                }
                Err(err) => warn!(error = %err, "file watch error"),
            },
            Config::default(),
        )?;
        for path in &self.config.watch {
            fs_watcher.watch(path, RecursiveMode::Recursive)?;
        }
        info!(
            entry = %self.config.entry.display(),
            watch = ?self.config.watch,
            debounce_ms = self.config.debounce.as_millis() as u64,
            "dev watcher started"
        );

        self.fs_watcher = Some(fs_watcher);
        self.tx = Some(tx);
        self.loop_handle = Some(handle);
        Ok(())
    }

    /// Request an immediate restart, bypassing the debounce window.
    pub fn restart(&self) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(LoopEvent::Restart);
        }
    }

    /// Inject a synthetic change event, as if a watched file had changed.
    /// Goes through the same ignore filter and debounce window as real
    /// filesystem events.
    pub fn notify_change(&self, path: impl Into<PathBuf>) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(LoopEvent::Changed(path.into()));
        }
    }

    /// Cancel any pending debounce, terminate the hosted process, stop
    /// observing.
    pub fn stop(&mut self) {
        self.fs_watcher = None;
        if let Some(tx) = self.tx.take() {
            let _ = tx.send(LoopEvent::Stop);
        }
        if let Some(handle) = self.loop_handle.take() {
            let _ = handle.join();
        }
    }

    pub fn state(&self) -> WatcherState {
        *self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Number of successful restarts since `start()` (the initial spawn does
    /// not count).
    pub fn restart_count(&self) -> usize {
        self.restarts.load(Ordering::SeqCst)
    }
}

impl Drop for DevWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

fn set_state(state: &Mutex<WatcherState>, next: WatcherState) {
    *state.lock().unwrap_or_else(|e| e.into_inner()) = next;
}

fn get_state(state: &Mutex<WatcherState>) -> WatcherState {
    *state.lock().unwrap_or_else(|e| e.into_inner())
}

/// The single-threaded supervision loop. Change events, debounce expiry and
/// restart orchestration all happen here; nothing else touches the child.
fn supervise(
    config: &WatcherConfig,
    rx: &Receiver<LoopEvent>,
    state: &Mutex<WatcherState>,
    restarts: &AtomicUsize,
) {
    let ignore = build_ignore_set(&config.ignore);

    let mut child = match spawn_child(config) {
        Ok(c) => {
            set_state(state, WatcherState::Watching);
            Some(c)
        }
        Err(err) => {
            error!(
                entry = %config.entry.display(),
                error = %err,
                "failed to start hosted process"
            );
            set_state(state, WatcherState::Failed);
            None
        }
    };

    let mut deadline: Option<Instant> = None;

    loop {
        let timeout = match deadline {
            Some(d) => d.saturating_duration_since(Instant::now()).min(CHILD_POLL),
            None => CHILD_POLL,
        };

        match rx.recv_timeout(timeout) {
            Ok(LoopEvent::Changed(path)) => {
                if is_ignored(&ignore, &path) {
                    trace!(path = %path.display(), "change ignored");
                } else {
                    if config.verbose {
                        debug!(path = %path.display(), "change detected");
                    }
                    set_state(state, WatcherState::Debouncing);
                    deadline = Some(Instant::now() + config.debounce);
                }
            }
            Ok(LoopEvent::Restart) => {
                deadline = None;
                do_restart(config, &mut child, state, restarts);
            }
            Ok(LoopEvent::Stop) | Err(RecvTimeoutError::Disconnected) => {
                deadline = None;
                if let Some(mut c) = child.take() {
                    let _ = c.kill();
                    let _ = c.wait();
                }
                set_state(state, WatcherState::Idle);
                debug!("dev watcher stopped");
                return;
            }
            Err(RecvTimeoutError::Timeout) => {}
        }

        if let Some(d) = deadline {
            if Instant::now() >= d {
                deadline = None;
                do_restart(config, &mut child, state, restarts);
            }
        }

        // A child that exits while we are merely watching crashed on its
        // own; treat it like a failed restart and wait for the next change
        // instead of respawn-looping.
        if get_state(state) == WatcherState::Watching {
            if let Some(c) = child.as_mut() {
                match c.try_wait() {
                    Ok(Some(status)) => {
                        error!(%status, "hosted process exited unexpectedly");
                        child = None;
                        set_state(state, WatcherState::Failed);
                    }
                    Ok(None) => {}
                    Err(err) => warn!(error = %err, "failed to poll hosted process"),
                }
            }
        }
    }
}

/// Kill-wait-spawn, in that order. The replacement is never spawned before
/// the old child has fully exited.
fn do_restart(
    config: &WatcherConfig,
    child: &mut Option<Child>,
    state: &Mutex<WatcherState>,
    restarts: &AtomicUsize,
) {
    set_state(state, WatcherState::Restarting);

    if let Some(mut old) = child.take() {
        let _ = old.kill();
        match old.wait() {
            Ok(status) => debug!(%status, "hosted process terminated"),
            Err(err) => warn!(error = %err, "failed to reap hosted process"),
        }
    }

    match spawn_child(config) {
        Ok(new_child) => {
            restarts.fetch_add(1, Ordering::SeqCst);
            set_state(state, WatcherState::Watching);
            info!(pid = new_child.id(), "hosted process restarted");
            *child = Some(new_child);
        }
        Err(err) => {
            error!(
                entry = %config.entry.display(),
                error = %err,
                "failed to spawn hosted process, waiting for next change"
            );
            set_state(state, WatcherState::Failed);
        }
    }
}

fn spawn_child(config: &WatcherConfig) -> std::io::Result<Child> {
    let mut command = Command::new(&config.entry);
    command
        .args(&config.args)
        .envs(config.env.iter().cloned())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = command.spawn()?;
    if let Some(stdout) = child.stdout.take() {
        forward_output(stdout, false);
    }
    if let Some(stderr) = child.stderr.take() {
        forward_output(stderr, true);
    }
    info!(entry = %config.entry.display(), pid = child.id(), "hosted process started");
    Ok(child)
}

/// Drain a child pipe line-by-line into the log. Also prevents the child
/// from blocking on a full OS pipe buffer.
fn forward_output(pipe: impl std::io::Read + Send + 'static, is_stderr: bool) {
    thread::spawn(move || {
        let reader = BufReader::new(pipe);
        for line in reader.lines() {
            match line {
                Ok(line) if is_stderr => warn!(target: "hosted", "{line}"),
                Ok(line) => info!(target: "hosted", "{line}"),
                Err(_) => break,
            }
        }
    });
}

fn build_ignore_set(patterns: &[String]) -> GlobSet {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        match Glob::new(pattern) {
            Ok(glob) => {
                builder.add(glob);
            }
            Err(err) => warn!(pattern = %pattern, error = %err, "invalid ignore pattern, skipping"),
        }
    }
    builder.build().unwrap_or_else(|err| {
        warn!(error = %err, "failed to build ignore set, ignoring nothing");
        GlobSet::empty()
    })
}

/// Match against both the full path and the bare file name, so `*.log`
/// ignores `/tmp/app/server.log` without requiring `**/` prefixes.
fn is_ignored(set: &GlobSet, path: &Path) -> bool {
    set.is_match(path) || path.file_name().map_or(false, |name| set.is_match(name))
}
