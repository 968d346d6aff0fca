//! The menu session: read one key, transition, render, repeat.
//!
//! Single-threaded by design. The only blocking point is the bounded poll in
//! the key decoder; timeouts double as the footer-refresh tick. Raw mode and
//! the alternate screen are owned by the restore guard, so every exit path
//! (clean quit, error, panic) puts the terminal back.

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use anyhow::{anyhow, bail, Context, Result};

use crate::actions;
use crate::capabilities::{Capabilities, MIN_COLS, MIN_ROWS};
use crate::config_store::{ConfigStore, JsonStore};
use crate::decoder::{KeyDecoder, KeyEvent, StdinSource};
use crate::logging::log_debug;
use crate::menu::{MenuKind, MenuTree};
use crate::metrics::{FooterMetrics, StaticFooter, SystemMetrics};
use crate::nav::{Effect, NavigationController};
use crate::render::{self, FrameView};
use crate::terminal_restore::TerminalRestoreGuard;

/// How long one loop iteration waits for a first byte. Also the cadence of
/// footer refreshes and banner expiry checks.
const POLL_TIMEOUT: Duration = Duration::from_millis(150);

/// How long a transient status banner stays on screen.
const BANNER_TTL: Duration = Duration::from_millis(2500);

#[derive(Debug, Clone)]
pub struct MenuOptions {
    pub kind: MenuKind,
    pub no_color: bool,
    pub ascii: bool,
    pub config_path: Option<PathBuf>,
}

/// Flag set by the SIGWINCH handler to trigger a size re-detect.
static SIGWINCH_RECEIVED: AtomicBool = AtomicBool::new(false);

/// Only flips an atomic flag (async-signal-safe); the loop does the work.
extern "C" fn handle_sigwinch(_: libc::c_int) {
    SIGWINCH_RECEIVED.store(true, Ordering::SeqCst);
}

pub(crate) fn install_sigwinch_handler() -> Result<()> {
    unsafe {
        // SAFETY: handle_sigwinch only stores to an atomic.
        let handler = handle_sigwinch as *const () as libc::sighandler_t;
        if libc::signal(libc::SIGWINCH, handler) == libc::SIG_ERR {
            return Err(anyhow!("failed to install SIGWINCH handler"));
        }
    }
    Ok(())
}

pub(crate) fn take_sigwinch() -> bool {
    SIGWINCH_RECEIVED.swap(false, Ordering::SeqCst)
}

fn is_tty(fd: libc::c_int) -> bool {
    // SAFETY: isatty only inspects the descriptor.
    unsafe { libc::isatty(fd) == 1 }
}

/// Transient banner with an expiry deadline.
#[derive(Default)]
struct Banner {
    text: Option<String>,
    deadline: Option<Instant>,
}

impl Banner {
    fn set(&mut self, text: String) {
        self.text = Some(text);
        self.deadline = Some(Instant::now() + BANNER_TTL);
    }

    /// Clears once the deadline passes; returns true when something changed.
    fn expire(&mut self) -> bool {
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => {
                self.text = None;
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// Run one menu session to completion. Fails *before* raw mode when the
/// terminal is unusable, so a failure can never corrupt the caller's shell.
pub fn run_menu(opts: &MenuOptions) -> Result<()> {
    if !is_tty(libc::STDIN_FILENO) || !is_tty(libc::STDOUT_FILENO) {
        bail!("the menu needs an interactive terminal (stdin and stdout must be a TTY)");
    }

    let mut caps = Capabilities::detect(opts.no_color, opts.ascii);
    if !caps.size_ok() {
        bail!(
            "terminal too small: need at least {MIN_COLS}x{MIN_ROWS} characters, have {}x{}",
            caps.width,
            caps.height
        );
    }

    let mut store = JsonStore::open_default(opts.config_path.as_deref());
    let mut tree = MenuTree::load(opts.kind, &store);
    let mut nav = NavigationController::new();
    let mut metrics: Box<dyn FooterMetrics> = if store.get_bool("ui.metrics_footer", true) {
        Box::new(SystemMetrics::new())
    } else {
        Box::new(StaticFooter(String::new()))
    };

    install_sigwinch_handler()?;
    log_debug(&format!("menu session start: {}", opts.kind));

    let guard = TerminalRestoreGuard::new();
    guard.enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    guard
        .enter_alt_screen(&mut stdout)
        .context("enter alternate screen")?;
    guard.hide_cursor(&mut stdout).context("hide cursor")?;

    let result = session_loop(
        &mut caps,
        &mut store,
        &mut tree,
        &mut nav,
        metrics.as_mut(),
    );

    guard.restore();
    log_debug("menu session end");
    result
}

fn session_loop(
    caps: &mut Capabilities,
    store: &mut JsonStore,
    tree: &mut MenuTree,
    nav: &mut NavigationController,
    metrics: &mut dyn FooterMetrics,
) -> Result<()> {
    let decoder = KeyDecoder::new();
    let mut source = StdinSource::new();
    let mut banner = Banner::default();

    draw(caps, tree, nav, metrics, &banner)?;

    loop {
        let event = decoder
            .read_event(&mut source, POLL_TIMEOUT)
            .context("reading key input")?;

        if take_sigwinch() {
            caps.refresh_size();
            draw(caps, tree, nav, metrics, &banner)?;
        }

        if event == KeyEvent::Timeout {
            // Footer refresh tick; navigation state is untouched.
            banner.expire();
            draw(caps, tree, nav, metrics, &banner)?;
            continue;
        }

        let effects = nav.handle(&event, tree);
        log_debug(&format!(
            "key {:?} -> mode {:?} crumb {:?} sel {}",
            event,
            nav.mode(),
            nav.breadcrumb(),
            nav.selected()
        ));
        tracing::debug!(
            key = ?event,
            mode = ?nav.mode(),
            selected = nav.selected(),
            effects = effects.len(),
            "transition"
        );

        let mut keep_running = true;
        for effect in &effects {
            keep_running &= apply_effect(effect, tree, store, metrics, &mut banner);
        }
        if !keep_running {
            return Ok(());
        }

        draw(caps, tree, nav, metrics, &banner)?;
    }
}

/// Apply one effect to the world. Returns false when the session should end.
fn apply_effect(
    effect: &Effect,
    tree: &mut MenuTree,
    store: &mut JsonStore,
    metrics: &mut dyn FooterMetrics,
    banner: &mut Banner,
) -> bool {
    match effect {
        Effect::Exit => false,
        Effect::ToggleSet { key, value } => {
            let written = tree
                .toggle_path_for_key(key)
                .map(|path| tree.set_toggle(&path, *value, store))
                .unwrap_or(false);
            if !written {
                // The toggle keeps its last confirmed value; tell the user.
                banner.set(format!("Could not save {key}"));
                log_debug(&format!("config write failed for {key}"));
            }
            true
        }
        Effect::Activate(action) => {
            banner.set(actions::dispatch(*action, store, metrics));
            true
        }
        // State already moved inside the controller; nothing to do here.
        Effect::Expand(_)
        | Effect::Collapse(_)
        | Effect::NavigateBack
        | Effect::RequestConfirmation(_) => true,
    }
}

fn draw(
    caps: &Capabilities,
    tree: &MenuTree,
    nav: &NavigationController,
    metrics: &mut dyn FooterMetrics,
    banner: &Banner,
) -> Result<()> {
    let view = FrameView::build(tree, nav, metrics.footer_text(), banner.text.clone());
    let lines = render::render(caps, &view);

    let frame_width = render::frame_width(caps.width);
    let left = ((caps.width as usize).saturating_sub(frame_width)) / 2;
    let top = ((caps.height as usize).saturating_sub(lines.len())) / 2;

    let mut out = String::new();
    out.push_str("\x1b[2J\x1b[H");
    for _ in 0..top {
        out.push_str("\r\n");
    }
    for line in &lines {
        out.push_str(&" ".repeat(left));
        out.push_str(line);
        out.push_str("\r\n");
    }

    let mut stdout = io::stdout();
    stdout.write_all(out.as_bytes()).context("write frame")?;
    stdout.flush().context("flush frame")?;
    Ok(())
}
