//! File watching for config reloads.

use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use notify::event::{AccessKind, AccessMode};
use notify::{Event as NotifyEvent, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, info, warn};

use super::ConfigError;

/// Events arriving within this window after the first one collapse into a
/// single reload. Editors and `fs::write` emit a truncate and a write.
const SETTLE: Duration = Duration::from_millis(50);

/// A running watch. Dropping it stops the watcher, which closes the event
/// channel and ends the reload thread.
pub(crate) struct Watch {
    _watcher: RecommendedWatcher,
    targets: usize,
}

impl Watch {
    pub fn targets(&self) -> usize {
        self.targets
    }
}

impl std::fmt::Debug for Watch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Watch").field("targets", &self.targets).finish()
    }
}

/// Watches the parent directory of every path and calls `on_change` on a
/// dedicated thread whenever one of the paths is created, modified, or removed.
///
/// Directories are watched rather than the files themselves so that files
/// replaced by rename, or created after startup, are still noticed. A path
/// that is a symlink at startup also has its resolved target watched.
pub(crate) fn spawn_watcher<F>(paths: &[PathBuf], on_change: F) -> Result<Watch, ConfigError>
where
    F: Fn(&Path) + Send + 'static,
{
    let mut targets = HashSet::new();
    let mut dirs = BTreeSet::new();
    let mut target_count = 0;

    for path in paths {
        let Some(file_name) = path.file_name() else {
            warn!(path = %path.display(), "config path has no file name, not watching");
            continue;
        };
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let dir = match parent.canonicalize() {
            Ok(dir) => dir,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cannot resolve config directory, not watching");
                continue;
            }
        };
        let link = dir.join(file_name);

        // A symlinked file changes at its target, which may live elsewhere.
        if let Ok(resolved) = link.canonicalize() {
            if resolved != link {
                if let Some(target_dir) = resolved.parent() {
                    debug!(path = %link.display(), target = %resolved.display(), "config file is a symlink, watching its target too");
                    dirs.insert(target_dir.to_path_buf());
                    targets.insert(resolved);
                }
            }
        }

        targets.insert(link);
        dirs.insert(dir);
        target_count += 1;
    }

    let (tx, rx) = mpsc::channel::<PathBuf>();

    let mut watcher = notify::recommended_watcher(move |res: Result<NotifyEvent, notify::Error>| {
        match res {
            Ok(event) => {
                if !is_relevant(&event.kind) {
                    return;
                }
                if let Some(path) = event.paths.into_iter().find(|p| targets.contains(p)) {
                    // The receiver is gone only while the watch is shutting down.
                    let _ = tx.send(path);
                }
            }
            Err(e) => {
                warn!(error = %e, "file watcher error");
            }
        }
    })?;

    for dir in &dirs {
        watcher.watch(dir, RecursiveMode::NonRecursive)?;
        debug!(dir = %dir.display(), "watching config directory");
    }

    thread::Builder::new()
        .name("config-watch".into())
        .spawn(move || reload_loop(rx, on_change))
        .map_err(|e| ConfigError::Watch(notify::Error::io(e)))?;

    info!(files = target_count, "watching config files for changes");

    Ok(Watch {
        _watcher: watcher,
        targets: target_count,
    })
}

fn is_relevant(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Create(_)
            | EventKind::Modify(_)
            | EventKind::Remove(_)
            | EventKind::Access(AccessKind::Close(AccessMode::Write))
    )
}

fn reload_loop<F>(rx: mpsc::Receiver<PathBuf>, on_change: F)
where
    F: Fn(&Path),
{
    while let Ok(path) = rx.recv() {
        thread::sleep(SETTLE);
        let coalesced = rx.try_iter().count();
        info!(path = %path.display(), coalesced, "config file changed");
        on_change(&path);
    }
    debug!("config watch stopped");
}
