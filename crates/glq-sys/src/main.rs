// Entry point -- brings up the console, video and CD audio, then drives
// frames from the winit event loop.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{CursorGrabMode, Window, WindowId};

use glq_common::cmd::{cbuf_execute, cmd_init, cmd_shutdown, with_cmd_ctx};
use glq_common::common::{com_args, com_dprintf, com_init_args, com_parm_value, sys_error, DISTNAME};
use glq_common::cvar::{cvar_get, cvar_init, cvar_register_commands, cvar_shutdown};
use glq_common::q_shared::CVAR_ZERO;

use glq_sys::cd_audio::{cdaudio_init, cdaudio_shutdown, cdaudio_update};
use glq_sys::gl_imp::GlWindow;
use glq_sys::host::VidHost;
use glq_sys::vid_gl::{
    vid_init, vid_set_global_state, vid_take_global_state, with_vid_state, VidInitParams, VidState,
};

const ICON_FILE: &str = "quake.bmp";

/// Host for running the platform layer on its own: the keyboard always
/// belongs to the game and sound is not mixed here.
struct ConsoleHost {
    window: Arc<Window>,
    mouse_active: bool,
}

impl VidHost for ConsoleHost {
    fn block_sound(&mut self) {
        com_dprintf("sound blocked\n");
    }

    fn unblock_sound(&mut self) {
        com_dprintf("sound unblocked\n");
    }

    fn activate_mouse(&mut self) {
        let grabbed = self
            .window
            .set_cursor_grab(CursorGrabMode::Confined)
            .or_else(|_| self.window.set_cursor_grab(CursorGrabMode::Locked));
        if let Err(e) = grabbed {
            log::debug!("cursor grab failed: {}", e);
        }
        self.mouse_active = true;
    }

    fn deactivate_mouse(&mut self) {
        if let Err(e) = self.window.set_cursor_grab(CursorGrabMode::None) {
            log::debug!("cursor release failed: {}", e);
        }
        self.mouse_active = false;
    }

    fn show_mouse(&mut self) {
        self.window.set_cursor_visible(true);
    }

    fn hide_mouse(&mut self) {
        self.window.set_cursor_visible(false);
    }

    fn mouse_active(&self) -> bool {
        self.mouse_active
    }

    fn key_dest_is_game(&self) -> bool {
        true
    }
}

struct GlQuakeApp {
    driver: GlWindow,
    host: ConsoleHost,
    minimized: bool,
}

impl GlQuakeApp {
    fn run_frame(&mut self) {
        cbuf_execute();
        cdaudio_update();

        self.driver.clear();
        let (driver, host) = (&mut self.driver, &mut self.host);
        with_vid_state(|vid| vid.end_rendering(driver, host));
    }

    fn activate(&mut self, active: bool, minimize: bool) {
        self.minimized = minimize;
        let (driver, host) = (&mut self.driver, &mut self.host);
        with_vid_state(|vid| vid.app_activate(active, minimize, host, driver));
    }
}

impl ApplicationHandler for GlQuakeApp {
    fn resumed(&mut self, _event_loop: &ActiveEventLoop) {}

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Focused(focused) => {
                self.activate(focused, false);
            }

            WindowEvent::Occluded(occluded) => {
                if occluded {
                    self.activate(false, true);
                } else {
                    self.activate(true, false);
                }
            }

            WindowEvent::Resized(size) => {
                self.driver.resize(size.width, size.height);
                let host = &mut self.host;
                with_vid_state(|vid| {
                    let rect = vid.window_rect;
                    vid.update_window_status(rect.x, rect.y, size.width as i32, size.height as i32, host);
                });
            }

            WindowEvent::Moved(pos) => {
                let host = &mut self.host;
                with_vid_state(|vid| {
                    let rect = vid.window_rect;
                    vid.update_window_status(pos.x, pos.y, rect.width, rect.height, host);
                });
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if self.minimized {
            std::thread::sleep(std::time::Duration::from_millis(1));
        }
        self.run_frame();
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        cdaudio_shutdown();
        if let Some(mut vid) = vid_take_global_state() {
            vid.shutdown(&mut self.driver, &mut self.host);
        }
        cvar_shutdown();
        cmd_shutdown();
    }
}

fn gamedir() -> PathBuf {
    let basedir = com_parm_value("-basedir").unwrap_or_else(|| ".".to_string());
    let game = com_parm_value("-game").unwrap_or_else(|| "id1".to_string());
    Path::new(&basedir).join(game)
}

/// Read a loose lump from the game directory.
fn load_lump(gamedir: &Path, name: &str) -> Option<Vec<u8>> {
    let path = gamedir.join(name);
    match std::fs::read(&path) {
        Ok(data) => Some(data),
        Err(e) => {
            log::warn!("{}: {}", path.display(), e);
            None
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let argv: Vec<String> = std::env::args().collect();
    com_init_args(&argv);
    let args = com_args();

    cmd_init();
    cvar_init();
    with_cmd_ctx(cvar_register_commands);
    cvar_get("developer", "0", CVAR_ZERO);

    let gamedir = gamedir();
    // a grey ramp stands in when the palette is not on disk
    let palette = load_lump(&gamedir, "gfx/palette.lmp")
        .unwrap_or_else(|| (0..768).map(|i| (i / 3) as u8).collect());
    let colormap = load_lump(&gamedir, "gfx/colormap.lmp").unwrap_or_default();

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => sys_error(&format!("Unable to initialize the window system: {}", e)),
    };
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut driver = match GlWindow::new(&event_loop, DISTNAME, Some(Path::new(ICON_FILE))) {
        Ok(driver) => driver,
        Err(e) => sys_error(&e.to_string()),
    };
    let mut host = ConsoleHost {
        window: driver.window(),
        mouse_active: false,
    };

    let params = VidInitParams {
        args: args.clone(),
        palette,
        colormap,
        gamedir,
    };
    let mut vid = VidState::new();
    if let Err(e) = vid_init(&mut vid, &params, &mut driver, &mut host) {
        sys_error(&e.to_string());
    }
    vid_set_global_state(vid);

    if let Err(e) = cdaudio_init(&args, false) {
        log::info!("CD audio unavailable: {}", e);
    }

    let mut app = GlQuakeApp {
        driver,
        host,
        minimized: false,
    };
    if let Err(e) = event_loop.run_app(&mut app) {
        sys_error(&format!("event loop: {}", e));
    }
}
