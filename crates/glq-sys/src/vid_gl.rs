// vid_gl.rs -- video state, mode setting and per-frame glue for the GL renderer

use std::path::PathBuf;

use parking_lot::Mutex;

use glq_common::cmd::{cmd_add_command, CmdContext};
use glq_common::common::{com_printf, ComArgs};
use glq_common::cvar::{cvar_get, cvar_set_value, cvar_variable_value};
use glq_common::q_shared::{q_atoi, read_little_long, CVAR_ARCHIVE, CVAR_ZERO};

use crate::cd_audio::{cdaudio_pause, cdaudio_resume};
use crate::gl_imp::{gl_init, init_8bit_palette, GlInfo};
use crate::host::{VidHost, VideoDriver};
use crate::palette::{apply_gamma, gamma_for, PaletteTables};
use crate::vid_modes::{
    describe_ext_mode, describe_mode, nummodes_message, select_default_mode, ModeList, ModeState,
    MODE_WINDOWED,
};

pub const WARP_WIDTH: i32 = 320;
pub const WARP_HEIGHT: i32 = 200;

/// Byte offset of the fullbright count in colormap.lmp.
const COLORMAP_FULLBRIGHT_OFFSET: usize = 2048 * 4;

/// Errors raised while bringing up or changing the display.
#[derive(Debug)]
pub enum VidError {
    /// Only the windowed mode exists and -window was not given.
    NoFullscreenModes,
    /// Nothing in the mode list matches -width/-height/-bpp.
    ModeNotAvailable,
    /// Mode number out of range for the current window type.
    BadMode(usize),
    /// Window creation or display mode change failed.
    Window(String),
    /// GL context or surface creation failed.
    Context(String),
    /// Neither glBindTextureEXT nor glBindTexture is available.
    NoTextureObjects,
    /// A required GL entry point could not be resolved.
    ProcAddress(&'static str),
}

impl std::fmt::Display for VidError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VidError::NoFullscreenModes => write!(f, "No RGB fullscreen modes available"),
            VidError::ModeNotAvailable => write!(f, "Specified video mode not available"),
            VidError::BadMode(mode) => write!(f, "Bad video mode {}", mode),
            VidError::Window(msg) => write!(f, "Unable to set video mode: {}", msg),
            VidError::Context(msg) => write!(f, "GL context error: {}", msg),
            VidError::NoTextureObjects => write!(f, "No texture objects!"),
            VidError::ProcAddress(name) => write!(f, "GetProcAddress for {} failed", name),
        }
    }
}

impl std::error::Error for VidError {}

/// What the renderer sees of the display.
#[derive(Debug, Clone, Default)]
pub struct VidDef {
    pub width: i32,
    pub height: i32,
    pub conwidth: i32,
    pub conheight: i32,
    pub maxwarpwidth: i32,
    pub maxwarpheight: i32,
    pub fullbright: i32,
    pub aspect: f32,
    pub numpages: i32,
    pub recalc_refdef: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WindowRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// Console size from -conwidth/-conheight, no larger than the mode.
pub fn console_size(args: &ComArgs, mode_width: i32, mode_height: i32) -> (i32, i32) {
    let conwidth = (args.parm_int("-conwidth").unwrap_or(640) & 0xfff8).max(320);
    let conheight = args.parm_int("-conheight").unwrap_or(conwidth * 3 / 4).max(200);
    (conwidth.min(mode_width), conheight.min(mode_height))
}

/// Number of colormap entries that are not fullbright.
pub fn fullbright_from_colormap(colormap: &[u8]) -> i32 {
    read_little_long(colormap, COLORMAP_FULLBRIGHT_OFFSET).map_or(256, |n| 256 - n)
}

/// Inputs to `vid_init` that come from the game data.
pub struct VidInitParams {
    pub args: ComArgs,
    /// palette.lmp, 256 RGB triplets.
    pub palette: Vec<u8>,
    /// colormap.lmp.
    pub colormap: Vec<u8>,
    pub gamedir: PathBuf,
}

pub struct VidState {
    pub modes: ModeList,
    pub vid_modenum: Option<usize>,
    pub vid_default: usize,
    pub modestate: ModeState,
    pub windowed: bool,
    pub leavecurrentmode: bool,
    pub vid_initialized: bool,
    pub vid_canalttab: bool,
    pub vid_wassuspended: bool,
    pub windowed_mouse: bool,
    pub sound_active: bool,
    pub active_app: bool,
    pub minimized: bool,
    pub fullsbardraw: bool,
    pub vid: VidDef,
    pub palette: Option<PaletteTables>,
    pub gamma: f32,
    pub gl_info: GlInfo,
    pub window_rect: WindowRect,
    pub window_center: (i32, i32),
}

impl VidState {
    pub fn new() -> Self {
        Self {
            modes: ModeList::default(),
            vid_modenum: None,
            vid_default: MODE_WINDOWED,
            modestate: ModeState::Uninit,
            windowed: false,
            leavecurrentmode: false,
            vid_initialized: false,
            vid_canalttab: false,
            vid_wassuspended: false,
            windowed_mouse: true,
            sound_active: false,
            active_app: false,
            minimized: false,
            fullsbardraw: false,
            vid: VidDef::default(),
            palette: None,
            gamma: 1.0,
            gl_info: GlInfo::default(),
            window_rect: WindowRect::default(),
            window_center: (0, 0),
        }
    }

    pub fn num_modes(&self) -> usize {
        self.modes.len()
    }

    // ========================================================
    // Mode setting
    // ========================================================

    /// VID_SetMode
    pub fn set_mode(
        &mut self,
        modenum: usize,
        driver: &mut dyn VideoDriver,
        host: &mut dyn VidHost,
    ) -> Result<(), VidError> {
        if (self.windowed && modenum != 0)
            || (!self.windowed && modenum < 1)
            || (!self.windowed && modenum >= self.modes.len())
        {
            return Err(VidError::BadMode(modenum));
        }
        let mode = self.modes.get(modenum).cloned().ok_or(VidError::BadMode(modenum))?;

        cdaudio_pause();

        self.modestate = mode.mode_type;
        self.vid.width = mode.width;
        self.vid.height = mode.height;
        self.vid.numpages = 2;
        self.vid.aspect = (mode.height as f32 / mode.width as f32) * (320.0 / 240.0);

        let opened = driver.open(&mode);

        match mode.mode_type {
            ModeState::Windowed => {
                if cvar_variable_value("_windowed_mouse") != 0.0 && host.key_dest_is_game() {
                    host.activate_mouse();
                    host.hide_mouse();
                } else {
                    host.deactivate_mouse();
                    host.show_mouse();
                }
            }
            _ => {
                host.activate_mouse();
                host.hide_mouse();
            }
        }

        cdaudio_resume();
        opened?;

        self.update_window_status(0, 0, mode.width, mode.height, host);

        self.vid_modenum = Some(modenum);
        cvar_set_value("vid_mode", modenum as f32);

        if let Some(desc) = describe_mode(&self.modes, modenum, self.leavecurrentmode) {
            com_printf(&format!("Video mode {} initialized.\n", desc));
        }

        self.vid.recalc_refdef = true;
        Ok(())
    }

    /// VID_UpdateWindowStatus
    pub fn update_window_status(&mut self, x: i32, y: i32, width: i32, height: i32, host: &mut dyn VidHost) {
        self.window_rect = WindowRect { x, y, width, height };
        self.window_center = (x + width / 2, y + height / 2);
        host.update_clip_cursor();
    }

    // ========================================================
    // Rendering
    // ========================================================

    /// GL_BeginRendering -- the area the renderer should draw into.
    pub fn begin_rendering(&self) -> (i32, i32, i32, i32) {
        (0, 0, self.window_rect.width, self.window_rect.height)
    }

    /// GL_EndRendering
    pub fn end_rendering(&mut self, driver: &mut dyn VideoDriver, host: &mut dyn VidHost) {
        if !host.skip_update() {
            driver.swap_buffers();
        }

        // handle the mouse state when windowed if that's changed
        if self.modestate == ModeState::Windowed {
            if cvar_variable_value("_windowed_mouse") == 0.0 {
                if self.windowed_mouse {
                    host.deactivate_mouse();
                    host.show_mouse();
                    self.windowed_mouse = false;
                }
            } else {
                self.windowed_mouse = true;
                if host.key_dest_is_game() && !host.mouse_active() && self.active_app {
                    host.activate_mouse();
                    host.hide_mouse();
                } else if host.mouse_active() && !host.key_dest_is_game() {
                    host.deactivate_mouse();
                    host.show_mouse();
                }
            }
        }

        if self.fullsbardraw {
            host.sbar_changed();
        }
    }

    /// VID_SetPalette
    pub fn set_palette(&mut self, palette: &[u8]) {
        self.palette = Some(PaletteTables::build(palette));
    }

    /// VID_ShiftPalette -- palette shifts are blended by the renderer under GL.
    pub fn shift_palette(&mut self, _palette: &[u8]) {}

    // ========================================================
    // Focus
    // ========================================================

    /// AppActivate -- the window gained or lost focus.
    pub fn app_activate(
        &mut self,
        active: bool,
        minimize: bool,
        host: &mut dyn VidHost,
        driver: &mut dyn VideoDriver,
    ) {
        self.active_app = active;
        self.minimized = minimize;

        // enable/disable sound on focus gain/loss
        if !active && self.sound_active {
            host.block_sound();
            self.sound_active = false;
        } else if active && !self.sound_active {
            host.unblock_sound();
            self.sound_active = true;
        }

        let windowed_mouse = cvar_variable_value("_windowed_mouse") != 0.0;

        if active {
            if self.modestate == ModeState::FullDib {
                host.activate_mouse();
                host.hide_mouse();
                if self.vid_canalttab && self.vid_wassuspended {
                    driver.restore_fullscreen();
                    self.vid_wassuspended = false;
                }
            } else if self.modestate == ModeState::Windowed && windowed_mouse && host.key_dest_is_game() {
                host.activate_mouse();
                host.hide_mouse();
            }
        } else if self.modestate == ModeState::FullDib {
            host.deactivate_mouse();
            host.show_mouse();
            if self.vid_canalttab {
                driver.leave_fullscreen();
                self.vid_wassuspended = true;
            }
        } else if self.modestate == ModeState::Windowed && windowed_mouse {
            host.deactivate_mouse();
            host.show_mouse();
        }
    }

    /// VID_Shutdown
    pub fn shutdown(&mut self, driver: &mut dyn VideoDriver, host: &mut dyn VidHost) {
        if self.vid_initialized {
            self.app_activate(false, false, host, driver);
        }
        driver.shutdown();
        self.vid_initialized = false;
    }

    // ========================================================
    // Console commands
    // ========================================================

    fn describe_current_mode_f(&self) {
        let desc = self
            .vid_modenum
            .and_then(|m| describe_ext_mode(&self.modes, m, self.leavecurrentmode, self.modestate));
        if let Some(desc) = desc {
            com_printf(&format!("{}\n", desc));
        }
    }

    fn nummodes_f(&self) {
        com_printf(&format!("{}\n", nummodes_message(self.num_modes())));
    }

    fn describe_mode_f(&self, modenum: i32) {
        let desc = usize::try_from(modenum)
            .ok()
            .and_then(|m| describe_ext_mode(&self.modes, m, false, self.modestate));
        if let Some(desc) = desc {
            com_printf(&format!("{}\n", desc));
        }
    }

    fn describe_modes_f(&self) {
        for i in 1..self.num_modes() {
            if let Some(desc) = describe_ext_mode(&self.modes, i, false, self.modestate) {
                com_printf(&format!("{:2}: {}\n", i, desc));
            }
        }
    }
}

impl Default for VidState {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================
// Startup
// ============================================================

fn register_cvars() {
    cvar_get("vid_mode", "0", CVAR_ZERO);
    cvar_get("_vid_default_mode", "0", CVAR_ARCHIVE);
    cvar_get("_vid_default_mode_win", "3", CVAR_ARCHIVE);
    cvar_get("vid_wait", "0", CVAR_ZERO);
    cvar_get("vid_nopageflip", "0", CVAR_ARCHIVE);
    cvar_get("_vid_wait_override", "0", CVAR_ARCHIVE);
    cvar_get("vid_config_x", "800", CVAR_ARCHIVE);
    cvar_get("vid_config_y", "600", CVAR_ARCHIVE);
    cvar_get("vid_stretch_by_2", "1", CVAR_ARCHIVE);
    cvar_get("_windowed_mouse", "1", CVAR_ARCHIVE);
    cvar_get("gl_ztrick", "1", CVAR_ZERO);
}

fn register_commands() {
    cmd_add_command("vid_nummodes", Some(Box::new(|_ctx: &mut CmdContext| {
        with_vid_state(|vid| vid.nummodes_f());
    })));
    cmd_add_command("vid_describecurrentmode", Some(Box::new(|_ctx: &mut CmdContext| {
        with_vid_state(|vid| vid.describe_current_mode_f());
    })));
    cmd_add_command("vid_describemode", Some(Box::new(|ctx: &mut CmdContext| {
        let modenum = q_atoi(ctx.cmd_argv(1));
        with_vid_state(|vid| vid.describe_mode_f(modenum));
    })));
    cmd_add_command("vid_describemodes", Some(Box::new(|_ctx: &mut CmdContext| {
        with_vid_state(|vid| vid.describe_modes_f());
    })));
}

/// VID_Init -- build the mode list, open the window in the chosen mode,
/// bring up GL and the palette tables.
pub fn vid_init(
    vid: &mut VidState,
    params: &VidInitParams,
    driver: &mut dyn VideoDriver,
    host: &mut dyn VidHost,
) -> Result<(), VidError> {
    register_cvars();
    register_commands();

    let args = &params.args;

    vid.modes = ModeList::init_dib(args);
    let driver_modes = driver.enumerate_modes();
    vid.modes.init_full_dib(&driver_modes);
    log::debug!(
        "{} display modes reported, {} usable",
        driver_modes.len(),
        vid.modes.len() - 1
    );

    let desktop = driver.desktop_size();
    let selection = select_default_mode(&mut vid.modes, args, desktop)?;
    vid.windowed = selection.windowed;
    vid.vid_default = selection.vid_default;
    vid.leavecurrentmode = selection.leavecurrentmode;
    vid.vid_initialized = true;

    let (mode_width, mode_height) = vid
        .modes
        .get(vid.vid_default)
        .map_or((i32::MAX, i32::MAX), |m| (m.width, m.height));
    let (conwidth, conheight) = console_size(args, mode_width, mode_height);
    vid.vid.conwidth = conwidth;
    vid.vid.conheight = conheight;
    vid.vid.maxwarpwidth = WARP_WIDTH;
    vid.vid.maxwarpheight = WARP_HEIGHT;
    vid.vid.fullbright = fullbright_from_colormap(&params.colormap);

    vid.set_mode(vid.vid_default, driver, host)?;
    vid.app_activate(true, false, host, driver);

    vid.gl_info = gl_init(driver, args)?;
    if vid.gl_info.fullsbar {
        vid.fullsbardraw = true;
    }

    // gamma depends on the GL vendor, so the palette comes after GL_Init
    vid.gamma = gamma_for(args, &vid.gl_info);
    let mut palette = params.palette.clone();
    apply_gamma(&mut palette, vid.gamma);
    vid.set_palette(&palette);

    if let Some(tables) = &vid.palette {
        vid.gl_info.is_8bit = init_8bit_palette(driver, &vid.gl_info, args, &tables.rgb_triplets());
    }

    let gldir = params.gamedir.join("glquake");
    if let Err(e) = std::fs::create_dir_all(&gldir) {
        log::warn!("couldn't create {}: {}", gldir.display(), e);
    }

    vid.vid_canalttab = true;

    if args.check_parm("-fullsbar").is_some() {
        vid.fullsbardraw = true;
    }
    Ok(())
}

// ============================================================
// Global singleton
// ============================================================

static VID_STATE: Mutex<Option<VidState>> = Mutex::new(None);

/// Store a VidState in the global so console commands can reach it.
pub fn vid_set_global_state(vid: VidState) {
    *VID_STATE.lock() = Some(vid);
}

/// Remove the global VidState, returning it.
pub fn vid_take_global_state() -> Option<VidState> {
    VID_STATE.lock().take()
}

/// Access the global VidState with a closure.
pub fn with_vid_state<F, R>(f: F) -> Option<R>
where
    F: FnOnce(&mut VidState) -> R,
{
    VID_STATE.lock().as_mut().map(f)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::host::testing::{FakeDriver, RecordingHost};
    use crate::vid_modes::DriverMode;
    use glq_common::cmd::{cmd_execute_string, cmd_init, with_cmd_ctx};
    use glq_common::common::{com_begin_redirect, com_end_redirect};
    use glq_common::cvar::{cvar_init, cvar_register_commands, cvar_set};

    /// Tests that touch the global cvars/commands run one at a time.
    pub(crate) static GLOBALS: Mutex<()> = Mutex::new(());

    pub(crate) fn init_globals() {
        cmd_init();
        cvar_init();
        with_cmd_ctx(cvar_register_commands);
    }

    fn driver_with_modes() -> FakeDriver {
        let mut driver = FakeDriver::new();
        driver.strings.extensions = "GL_EXT_texture_object".into();
        driver.modes = vec![
            DriverMode { width: 640, height: 480, bpp: 16, refresh_millihertz: 60_000 },
            DriverMode { width: 800, height: 600, bpp: 32, refresh_millihertz: 60_000 },
        ];
        driver
    }

    fn params(args: &[&str]) -> VidInitParams {
        let mut colormap = vec![0u8; 16384];
        colormap[8192..8196].copy_from_slice(&32i32.to_le_bytes());
        VidInitParams {
            args: ComArgs::from_strs(args),
            palette: (0..768).map(|i| (i / 3) as u8).collect(),
            colormap,
            gamedir: std::env::temp_dir().join("glq-vid-test"),
        }
    }

    #[test]
    fn test_console_size() {
        assert_eq!(console_size(&ComArgs::from_strs(&["glquake"]), 1024, 768), (640, 480));
        assert_eq!(
            console_size(&ComArgs::from_strs(&["glquake", "-conwidth", "803"]), 1024, 768),
            (800, 600)
        );
        assert_eq!(
            console_size(&ComArgs::from_strs(&["glquake", "-conwidth", "100", "-conheight", "50"]), 1024, 768),
            (320, 200)
        );
        // never larger than the mode
        assert_eq!(
            console_size(&ComArgs::from_strs(&["glquake", "-conwidth", "1024"]), 640, 480),
            (640, 480)
        );
    }

    #[test]
    fn test_fullbright() {
        let mut colormap = vec![0u8; 8200];
        colormap[8192..8196].copy_from_slice(&32i32.to_le_bytes());
        assert_eq!(fullbright_from_colormap(&colormap), 224);
        assert_eq!(fullbright_from_colormap(&[0u8; 100]), 256);
    }

    #[test]
    fn test_vid_init_fullscreen() {
        let _guard = GLOBALS.lock();
        init_globals();

        let mut vid = VidState::new();
        let mut driver = driver_with_modes();
        let mut host = RecordingHost { key_game: true, ..Default::default() };
        vid_init(&mut vid, &params(&["glquake", "-width", "800"]), &mut driver, &mut host).unwrap();

        assert_eq!(vid.vid_modenum, Some(2));
        assert_eq!(vid.modestate, ModeState::FullDib);
        assert_eq!((vid.vid.width, vid.vid.height), (800, 600));
        assert_eq!((vid.vid.conwidth, vid.vid.conheight), (640, 480));
        assert_eq!(vid.vid.fullbright, 224);
        assert_eq!(vid.begin_rendering(), (0, 0, 800, 600));
        assert_eq!(driver.opened.len(), 1);
        assert!(driver.state_applied);
        assert!(vid.vid_canalttab);
        assert!(host.mouse && host.mouse_hidden);
        assert_eq!(host.sound_unblocks, 1);
        assert_eq!(cvar_variable_value("vid_mode"), 2.0);
        assert!((vid.gamma - 0.7).abs() < 1e-6);
        assert!(vid.palette.is_some());
        assert!(!vid.gl_info.is_8bit);
    }

    #[test]
    fn test_vid_init_fullsbar() {
        let _guard = GLOBALS.lock();
        init_globals();

        let mut host = RecordingHost::default();

        let mut vid = VidState::new();
        vid_init(&mut vid, &params(&["glquake"]), &mut driver_with_modes(), &mut host).unwrap();
        assert!(!vid.fullsbardraw);

        let mut vid = VidState::new();
        vid_init(&mut vid, &params(&["glquake", "-fullsbar"]), &mut driver_with_modes(), &mut host).unwrap();
        assert!(vid.fullsbardraw);
        assert!(!vid.gl_info.fullsbar);

        let mut driver = driver_with_modes();
        driver.strings.renderer = "PowerVR PCX2".into();
        let mut vid = VidState::new();
        vid_init(&mut vid, &params(&["glquake"]), &mut driver, &mut host).unwrap();
        assert!(vid.gl_info.fullsbar);
        assert!(vid.fullsbardraw);
    }

    #[test]
    fn test_vid_init_gamedir_and_gamma_tables() {
        let _guard = GLOBALS.lock();
        init_globals();

        let mut p = params(&["glquake"]);
        p.gamedir = std::env::temp_dir().join("glq-vid-init-gamedir");
        let _ = std::fs::remove_dir_all(&p.gamedir);

        let mut vid = VidState::new();
        let mut host = RecordingHost::default();
        vid_init(&mut vid, &p, &mut driver_with_modes(), &mut host).unwrap();
        assert!(p.gamedir.join("glquake").is_dir());
        let _ = std::fs::remove_dir_all(&p.gamedir);

        let mut corrected = p.palette.clone();
        apply_gamma(&mut corrected, vid.gamma);
        let (r, g, b) = (corrected[30] as u32, corrected[31] as u32, corrected[32] as u32);
        assert_ne!(r, 10);
        let tables = vid.palette.as_ref().unwrap();
        assert_eq!(tables.table24[10], 0xff00_0000 | r | g << 8 | b << 16);
    }

    #[test]
    fn test_vid_init_console_clamped_to_mode() {
        let _guard = GLOBALS.lock();
        init_globals();

        let mut vid = VidState::new();
        let mut driver = driver_with_modes();
        let mut host = RecordingHost::default();
        let p = params(&["glquake", "-window", "-width", "320", "-conwidth", "1024"]);
        vid_init(&mut vid, &p, &mut driver, &mut host).unwrap();

        assert_eq!(vid.modestate, ModeState::Windowed);
        assert_eq!((vid.vid.conwidth, vid.vid.conheight), (320, 240));
    }

    #[test]
    fn test_vid_init_errors() {
        let _guard = GLOBALS.lock();
        init_globals();

        let mut host = RecordingHost::default();

        let mut driver = FakeDriver::new();
        let r = vid_init(&mut VidState::new(), &params(&["glquake"]), &mut driver, &mut host);
        assert!(matches!(r, Err(VidError::NoFullscreenModes)));

        let mut driver = driver_with_modes();
        let r = vid_init(&mut VidState::new(), &params(&["glquake", "-mode", "9"]), &mut driver, &mut host);
        assert!(matches!(r, Err(VidError::BadMode(9))));

        let mut driver = driver_with_modes();
        driver.fail_open = true;
        let r = vid_init(&mut VidState::new(), &params(&["glquake", "-window"]), &mut driver, &mut host);
        assert!(matches!(r, Err(VidError::Window(_))));
    }

    #[test]
    fn test_app_activate_fullscreen_alt_tab() {
        let _guard = GLOBALS.lock();
        init_globals();

        let mut vid = VidState::new();
        vid.modestate = ModeState::FullDib;
        vid.vid_canalttab = true;
        let mut driver = FakeDriver::new();
        let mut host = RecordingHost::default();

        vid.app_activate(true, false, &mut host, &mut driver);
        assert_eq!(host.sound_unblocks, 1);
        assert!(host.mouse);

        // a second activation does not unblock sound again
        vid.app_activate(true, false, &mut host, &mut driver);
        assert_eq!(host.sound_unblocks, 1);

        vid.app_activate(false, true, &mut host, &mut driver);
        assert_eq!(host.sound_blocks, 1);
        assert!(!host.mouse && !host.mouse_hidden);
        assert_eq!(driver.left_fullscreen, 1);
        assert!(vid.vid_wassuspended);
        assert!(vid.minimized);

        vid.app_activate(true, false, &mut host, &mut driver);
        assert_eq!(driver.restored_fullscreen, 1);
        assert!(!vid.vid_wassuspended);
    }

    #[test]
    fn test_windowed_mouse_follows_cvar_and_key_dest() {
        let _guard = GLOBALS.lock();
        init_globals();
        register_cvars();

        let mut vid = VidState::new();
        vid.modestate = ModeState::Windowed;
        vid.active_app = true;
        let mut driver = FakeDriver::new();
        let mut host = RecordingHost { key_game: true, ..Default::default() };

        vid.end_rendering(&mut driver, &mut host);
        assert_eq!(driver.swaps, 1);
        assert!(host.mouse);

        host.key_game = false;
        vid.end_rendering(&mut driver, &mut host);
        assert!(!host.mouse);

        host.key_game = true;
        cvar_set("_windowed_mouse", "0");
        vid.end_rendering(&mut driver, &mut host);
        assert!(!host.mouse);
        assert!(!vid.windowed_mouse);

        host.skip = true;
        vid.end_rendering(&mut driver, &mut host);
        assert_eq!(driver.swaps, 3);
    }

    #[test]
    fn test_fullsbar_marks_status_bar() {
        let _guard = GLOBALS.lock();
        init_globals();

        let mut vid = VidState::new();
        vid.fullsbardraw = true;
        let mut host = RecordingHost::default();
        vid.end_rendering(&mut FakeDriver::new(), &mut host);
        assert_eq!(host.sbar_changes, 1);
    }

    #[test]
    fn test_update_window_status() {
        let mut vid = VidState::new();
        let mut host = RecordingHost::default();
        vid.update_window_status(10, 20, 640, 480, &mut host);
        assert_eq!(vid.window_center, (330, 260));
        assert_eq!(host.clip_updates, 1);
    }

    #[test]
    fn test_vid_commands() {
        let _guard = GLOBALS.lock();
        init_globals();

        let mut vid = VidState::new();
        let mut driver = driver_with_modes();
        let mut host = RecordingHost::default();
        vid_init(&mut vid, &params(&["glquake", "-width", "640"]), &mut driver, &mut host).unwrap();
        vid_set_global_state(vid);

        com_begin_redirect();
        cmd_execute_string("vid_nummodes");
        cmd_execute_string("vid_describecurrentmode");
        cmd_execute_string("vid_describemode 0");
        cmd_execute_string("vid_describemodes");
        let out = com_end_redirect().unwrap_or_default();
        vid_take_global_state();

        assert!(out.contains("3 video modes are available\n"));
        assert!(out.contains("640x480x16 fullscreen\n"));
        assert!(out.contains("\nwindowed\n"));
        assert!(out.contains(" 1: 640x480x16 fullscreen\n 2: 800x600x32 fullscreen\n"));
    }

    #[test]
    fn test_shutdown() {
        let mut vid = VidState::new();
        let mut driver = FakeDriver::new();
        let mut host = RecordingHost::default();
        vid.shutdown(&mut driver, &mut host);
        assert!(driver.shut_down);
        assert!(!vid.vid_initialized);
    }
}
