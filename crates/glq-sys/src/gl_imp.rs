// gl_imp.rs -- OpenGL window and context on winit + glutin, and GL startup

use std::ffi::{c_void, CString};
use std::num::NonZeroU32;
use std::path::Path;
use std::sync::Arc;

use glow::HasContext;
use glutin::config::{ColorBufferType, Config, ConfigTemplateBuilder, GlConfig};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, NotCurrentGlContext, PossiblyCurrentContext, Version,
};
use glutin::display::{GetGlDisplay, GlDisplay};
use glutin::surface::{GlSurface, Surface, WindowSurface};
use glutin_winit::{DisplayBuilder, GlWindow as _};
use raw_window_handle::HasWindowHandle;
use winit::dpi::PhysicalSize;
use winit::event_loop::EventLoop;
use winit::monitor::{MonitorHandle, VideoModeHandle};
use winit::window::{Fullscreen, Icon, Window};

use glq_common::common::{com_printf, ComArgs};
use glq_common::q_shared::q_starts_with_nocase;

use crate::host::VideoDriver;
use crate::vid_gl::VidError;
use crate::vid_modes::{DriverMode, VMode};

// Fixed-function enums glow does not carry.
const GL_ALPHA_TEST: u32 = 0x0BC0;
const GL_FLAT: u32 = 0x1D00;
const GL_TEXTURE_ENV: u32 = 0x2300;
const GL_TEXTURE_ENV_MODE: u32 = 0x2200;
const GL_SHARED_TEXTURE_PALETTE_EXT: u32 = 0x81FB;

const MAX_EXTENSIONS_PRINT: usize = 2047;

#[cfg(target_os = "windows")]
const GL_LIBRARY: &str = "opengl32.dll";
#[cfg(target_os = "macos")]
const GL_LIBRARY: &str = "/System/Library/Frameworks/OpenGL.framework/OpenGL";
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
const GL_LIBRARY: &str = "libGL.so.1";

// ============================================================
// Driver strings and capabilities
// ============================================================

/// The four strings the driver reports.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlStrings {
    pub vendor: String,
    pub renderer: String,
    pub version: String,
    pub extensions: String,
}

/// Capabilities derived from the driver strings.
#[derive(Debug, Clone, Default)]
pub struct GlInfo {
    pub strings: GlStrings,
    /// PowerVR needs the status bar redrawn every frame.
    pub fullsbar: bool,
    pub permedia: bool,
    pub is_3dfx: bool,
    pub texture_object_ext: bool,
    pub sgis_multitexture: bool,
    pub shared_texture_palette: bool,
    /// Multitexture entry points were resolved.
    pub mtexable: bool,
    /// The shared 8-bit texture palette is in use.
    pub is_8bit: bool,
}

fn has_extension(extensions: &str, name: &str) -> bool {
    extensions.split_whitespace().any(|e| e == name)
}

impl GlInfo {
    pub fn from_strings(vendor: &str, renderer: &str, version: &str, extensions: &str) -> Self {
        Self {
            strings: GlStrings {
                vendor: vendor.to_string(),
                renderer: renderer.to_string(),
                version: version.to_string(),
                extensions: extensions.to_string(),
            },
            fullsbar: q_starts_with_nocase(renderer, "PowerVR"),
            permedia: q_starts_with_nocase(renderer, "Permedia"),
            is_3dfx: renderer.contains("Voodoo") || vendor.contains("3Dfx"),
            texture_object_ext: has_extension(extensions, "GL_EXT_texture_object"),
            sgis_multitexture: has_extension(extensions, "GL_SGIS_multitexture"),
            shared_texture_palette: has_extension(extensions, "GL_EXT_shared_texture_palette"),
            mtexable: false,
            is_8bit: false,
        }
    }
}

fn truncate_for_print(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// GL_Init -- report the driver, resolve texture binding and multitexture,
/// and set the initial state.
pub fn gl_init(driver: &mut dyn VideoDriver, args: &ComArgs) -> Result<GlInfo, VidError> {
    let strings = driver.gl_strings();
    com_printf(&format!("GL_VENDOR: {}\n", strings.vendor));
    com_printf(&format!("GL_RENDERER: {}\n", strings.renderer));
    com_printf(&format!("GL_VERSION: {}\n", strings.version));
    com_printf(&format!(
        "GL_EXTENSIONS: {}\n",
        truncate_for_print(&strings.extensions, MAX_EXTENSIONS_PRINT)
    ));

    let mut info = GlInfo::from_strings(
        &strings.vendor,
        &strings.renderer,
        &strings.version,
        &strings.extensions,
    );

    check_texture_extensions(driver, &info, args)?;
    check_multitexture_extensions(driver, &mut info, args);

    driver.setup_gl_state();
    Ok(info)
}

fn check_texture_extensions(
    driver: &mut dyn VideoDriver,
    info: &GlInfo,
    args: &ComArgs,
) -> Result<(), VidError> {
    if !info.texture_object_ext || args.check_parm("-gl11").is_some() {
        if !driver.bind_texture_from_library() {
            return Err(VidError::NoTextureObjects);
        }
        return Ok(());
    }

    if !driver.resolve("glBindTextureEXT") {
        return Err(VidError::ProcAddress("glBindTextureEXT"));
    }
    Ok(())
}

fn check_multitexture_extensions(driver: &mut dyn VideoDriver, info: &mut GlInfo, args: &ComArgs) {
    if !info.sgis_multitexture || args.check_parm("-nomtex").is_some() {
        return;
    }
    if driver.resolve("glMTexCoord2fSGIS") && driver.resolve("glSelectTextureSGIS") {
        com_printf("Multitexture extensions found.\n");
        info.mtexable = true;
    }
}

/// VID_Init8bitPalette -- upload the shared texture palette when asked for
/// with -8bit and the driver supports it. Returns true if enabled.
pub fn init_8bit_palette(
    driver: &mut dyn VideoDriver,
    info: &GlInfo,
    args: &ComArgs,
    rgb: &[u8],
) -> bool {
    if args.check_parm("-8bit").is_none() || args.check_parm("-no8bit").is_some() {
        return false;
    }
    if !info.shared_texture_palette || !driver.resolve("glColorTableEXT") {
        return false;
    }
    com_printf("8-bit GL extensions enabled.\n");
    driver.upload_shared_palette(rgb);
    true
}

// ============================================================
// Entry points outside glow
// ============================================================

type BindTextureFn = unsafe extern "system" fn(target: u32, texture: u32);
type ColorTableFn = unsafe extern "system" fn(
    target: u32,
    internal_format: u32,
    width: i32,
    format: u32,
    kind: u32,
    table: *const c_void,
);
type AlphaFuncFn = unsafe extern "system" fn(func: u32, reference: f32);
type ShadeModelFn = unsafe extern "system" fn(mode: u32);
type TexEnvfFn = unsafe extern "system" fn(target: u32, pname: u32, param: f32);

#[derive(Default)]
struct GlProcs {
    bind_texture: Option<BindTextureFn>,
    color_table: Option<ColorTableFn>,
    alpha_func: Option<AlphaFuncFn>,
    shade_model: Option<ShadeModelFn>,
    tex_envf: Option<TexEnvfFn>,
}

// ============================================================
// winit + glutin driver
// ============================================================

/// The game window and its GL context.
pub struct GlWindow {
    window: Arc<Window>,
    gl_config: Config,
    context: Option<PossiblyCurrentContext>,
    surface: Option<Surface<WindowSurface>>,
    gl: Option<glow::Context>,
    procs: GlProcs,
    gl_library: Option<libloading::Library>,
    video_modes: Vec<VideoModeHandle>,
    fullscreen_mode: Option<VideoModeHandle>,
}

/// Load the title bar icon. Magenta (255, 0, 255) is the transparent key.
fn load_icon(path: &Path) -> Option<Icon> {
    let mut img = match image::open(path) {
        Ok(img) => img.to_rgba8(),
        Err(e) => {
            com_printf("Unable to load title bar icon.\n");
            log::debug!("{}: {}", path.display(), e);
            return None;
        }
    };
    for px in img.pixels_mut() {
        if px.0[..3] == [255, 0, 255] {
            px.0[3] = 0;
        }
    }
    let (width, height) = img.dimensions();
    Icon::from_rgba(img.into_raw(), width, height)
        .map_err(|e| com_printf(&format!("Unable to process title bar icon: {}\n", e)))
        .ok()
}

/// The monitor the window is on, else the primary one, else the first one
/// listed. Wayland reports neither of the first two.
fn pick_monitor<M, I>(
    current: Option<M>,
    primary: impl FnOnce() -> Option<M>,
    available: impl FnOnce() -> I,
) -> Option<M>
where
    I: IntoIterator<Item = M>,
{
    current
        .or_else(primary)
        .or_else(|| available().into_iter().next())
}

impl GlWindow {
    /// Create the (hidden) window and pick a GL config: RGB888, 24-bit depth,
    /// double buffered.
    pub fn new(event_loop: &EventLoop<()>, title: &str, icon: Option<&Path>) -> Result<Self, VidError> {
        let mut attributes = Window::default_attributes()
            .with_title(title)
            .with_visible(false)
            .with_resizable(false);
        if let Some(icon) = icon.and_then(load_icon) {
            attributes = attributes.with_window_icon(Some(icon));
        }

        let template = ConfigTemplateBuilder::new()
            .with_buffer_type(ColorBufferType::Rgb { r_size: 8, g_size: 8, b_size: 8 })
            .with_depth_size(24)
            .with_single_buffering(false);

        let (window, gl_config) = DisplayBuilder::new()
            .with_window_attributes(Some(attributes))
            .build(event_loop, template, |configs| {
                // find_configs returns Err(BadConfig) on an empty match, and
                // DisplayBuilder::build propagates it before the picker runs
                configs
                    .reduce(|best, c| if c.depth_size() > best.depth_size() { c } else { best })
                    .expect("no GL configs offered")
            })
            .map_err(|e| VidError::Context(e.to_string()))?;

        let window = window.ok_or_else(|| VidError::Window("window creation failed".to_string()))?;
        log::debug!(
            "GL config: depth {} stencil {} samples {}",
            gl_config.depth_size(),
            gl_config.stencil_size(),
            gl_config.num_samples()
        );

        Ok(Self {
            window: Arc::new(window),
            gl_config,
            context: None,
            surface: None,
            gl: None,
            procs: GlProcs::default(),
            gl_library: None,
            video_modes: Vec::new(),
            fullscreen_mode: None,
        })
    }

    pub fn window(&self) -> Arc<Window> {
        Arc::clone(&self.window)
    }

    /// Keep the drawable in step with the window.
    pub fn resize(&mut self, width: u32, height: u32) {
        let (Some(surface), Some(context)) = (&self.surface, &self.context) else {
            return;
        };
        if let (Some(w), Some(h)) = (NonZeroU32::new(width), NonZeroU32::new(height)) {
            surface.resize(context, w, h);
        }
    }

    /// Clear the color buffer before the renderer draws.
    pub fn clear(&mut self) {
        if let Some(gl) = &self.gl {
            unsafe { gl.clear(glow::COLOR_BUFFER_BIT) };
        }
    }

    fn monitor(&self) -> Option<MonitorHandle> {
        pick_monitor(
            self.window.current_monitor(),
            || self.window.primary_monitor(),
            || self.window.available_monitors(),
        )
    }

    fn exclusive_mode_for(&self, mode: &VMode) -> Option<VideoModeHandle> {
        if let Some(handle) = self.video_modes.get(mode.modenum) {
            let size = handle.size();
            if size.width as i32 == mode.width
                && size.height as i32 == mode.height
                && handle.bit_depth() as i32 == mode.bpp
            {
                return Some(handle.clone());
            }
        }
        // -force and -current modes are matched by size only
        self.video_modes
            .iter()
            .find(|h| h.size().width as i32 == mode.width && h.size().height as i32 == mode.height)
            .cloned()
    }

    fn create_context(&mut self) -> Result<(), VidError> {
        let raw_handle = self.window.window_handle().ok().map(|h| h.as_raw());
        let context_attributes = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(2, 1))))
            .build(raw_handle);
        let gl_display = self.gl_config.display();

        let not_current = unsafe { gl_display.create_context(&self.gl_config, &context_attributes) }
            .map_err(|e| VidError::Context(e.to_string()))?;
        let surface_attributes = self
            .window
            .build_surface_attributes(Default::default())
            .map_err(|e| VidError::Context(e.to_string()))?;
        let surface = unsafe { gl_display.create_window_surface(&self.gl_config, &surface_attributes) }
            .map_err(|e| VidError::Context(e.to_string()))?;
        let context = not_current
            .make_current(&surface)
            .map_err(|e| VidError::Context(e.to_string()))?;

        let gl = unsafe { glow::Context::from_loader_function_cstr(|s| gl_display.get_proc_address(s)) };

        self.gl = Some(gl);
        self.surface = Some(surface);
        self.context = Some(context);
        Ok(())
    }
}

impl VideoDriver for GlWindow {
    fn enumerate_modes(&mut self) -> Vec<DriverMode> {
        let Some(monitor) = self.monitor() else {
            log::warn!("no monitor to enumerate video modes on");
            return Vec::new();
        };
        self.video_modes = monitor.video_modes().collect();
        self.video_modes
            .iter()
            .map(|m| DriverMode {
                width: m.size().width as i32,
                height: m.size().height as i32,
                bpp: m.bit_depth() as i32,
                refresh_millihertz: m.refresh_rate_millihertz(),
            })
            .collect()
    }

    fn desktop_size(&mut self) -> (i32, i32) {
        let size = self.monitor().map_or_else(|| self.window.inner_size(), |m| m.size());
        (size.width as i32, size.height as i32)
    }

    fn open(&mut self, mode: &VMode) -> Result<(), VidError> {
        if mode.fullscreen {
            let handle = self.exclusive_mode_for(mode);
            match &handle {
                Some(h) => self.window.set_fullscreen(Some(Fullscreen::Exclusive(h.clone()))),
                None => {
                    log::warn!("{} not offered by the monitor, using borderless", mode.modedesc);
                    self.window.set_fullscreen(Some(Fullscreen::Borderless(None)));
                }
            }
            self.fullscreen_mode = handle;
        } else {
            self.window.set_fullscreen(None);
            let _ = self
                .window
                .request_inner_size(PhysicalSize::new(mode.width as u32, mode.height as u32));
        }

        self.window.set_visible(true);
        self.window.focus_window();
        self.create_context()
    }

    fn gl_strings(&mut self) -> GlStrings {
        let Some(gl) = &self.gl else {
            return GlStrings::default();
        };
        unsafe {
            let mut extensions = gl.get_parameter_string(glow::EXTENSIONS);
            if extensions.is_empty() {
                let mut list: Vec<String> = gl.supported_extensions().iter().cloned().collect();
                list.sort();
                extensions = list.join(" ");
            }
            GlStrings {
                vendor: gl.get_parameter_string(glow::VENDOR),
                renderer: gl.get_parameter_string(glow::RENDERER),
                version: gl.get_parameter_string(glow::VERSION),
                extensions,
            }
        }
    }

    fn resolve(&mut self, name: &str) -> bool {
        let Ok(cname) = CString::new(name) else {
            return false;
        };
        let ptr = self.gl_config.display().get_proc_address(&cname);
        if ptr.is_null() {
            log::debug!("{} not provided by the driver", name);
            return false;
        }

        let procs = &mut self.procs;
        unsafe {
            match name {
                "glBindTextureEXT" | "glBindTexture" => {
                    procs.bind_texture = Some(std::mem::transmute::<*const c_void, BindTextureFn>(ptr))
                }
                "glColorTableEXT" => {
                    procs.color_table = Some(std::mem::transmute::<*const c_void, ColorTableFn>(ptr))
                }
                "glAlphaFunc" => {
                    procs.alpha_func = Some(std::mem::transmute::<*const c_void, AlphaFuncFn>(ptr))
                }
                "glShadeModel" => {
                    procs.shade_model = Some(std::mem::transmute::<*const c_void, ShadeModelFn>(ptr))
                }
                "glTexEnvf" => {
                    procs.tex_envf = Some(std::mem::transmute::<*const c_void, TexEnvfFn>(ptr))
                }
                _ => {}
            }
        }
        true
    }

    fn bind_texture_from_library(&mut self) -> bool {
        let library = match unsafe { libloading::Library::new(GL_LIBRARY) } {
            Ok(library) => library,
            Err(e) => {
                log::error!("Couldn't load {}: {}", GL_LIBRARY, e);
                return false;
            }
        };
        let func = unsafe { library.get::<BindTextureFn>(b"glBindTexture\0") }.map(|sym| *sym);
        match func {
            Ok(func) => {
                self.procs.bind_texture = Some(func);
                self.gl_library = Some(library);
                true
            }
            Err(e) => {
                log::error!("glBindTexture: {}", e);
                false
            }
        }
    }

    fn setup_gl_state(&mut self) {
        for name in ["glAlphaFunc", "glShadeModel", "glTexEnvf"] {
            self.resolve(name);
        }
        let Some(gl) = &self.gl else {
            return;
        };
        let procs = &self.procs;

        unsafe {
            gl.clear_color(1.0, 0.0, 0.0, 0.0);
            gl.cull_face(glow::FRONT);
            gl.enable(glow::TEXTURE_2D);
            if let Some(bind) = procs.bind_texture {
                bind(glow::TEXTURE_2D, 0);
            }

            gl.enable(GL_ALPHA_TEST);
            if let Some(alpha_func) = procs.alpha_func {
                alpha_func(glow::GREATER, 0.666);
            }

            gl.polygon_mode(glow::FRONT_AND_BACK, glow::FILL);
            if let Some(shade_model) = procs.shade_model {
                shade_model(GL_FLAT);
            }

            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MIN_FILTER, glow::NEAREST as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, glow::NEAREST as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, glow::REPEAT as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, glow::REPEAT as i32);

            gl.blend_func(glow::SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA);

            if let Some(tex_envf) = procs.tex_envf {
                tex_envf(GL_TEXTURE_ENV, GL_TEXTURE_ENV_MODE, glow::REPLACE as f32);
            }
        }
    }

    fn upload_shared_palette(&mut self, rgb: &[u8]) {
        if rgb.len() < 768 {
            return;
        }
        let (Some(gl), Some(color_table)) = (&self.gl, self.procs.color_table) else {
            return;
        };
        unsafe {
            gl.enable(GL_SHARED_TEXTURE_PALETTE_EXT);
            color_table(
                GL_SHARED_TEXTURE_PALETTE_EXT,
                glow::RGB,
                256,
                glow::RGB,
                glow::UNSIGNED_BYTE,
                rgb.as_ptr() as *const c_void,
            );
        }
    }

    fn swap_buffers(&mut self) {
        if let (Some(surface), Some(context)) = (&self.surface, &self.context) {
            if let Err(e) = surface.swap_buffers(context) {
                log::warn!("swap_buffers: {}", e);
            }
        }
    }

    fn leave_fullscreen(&mut self) {
        self.window.set_fullscreen(None);
        self.window.set_minimized(true);
    }

    fn restore_fullscreen(&mut self) {
        let fullscreen = match &self.fullscreen_mode {
            Some(h) => Fullscreen::Exclusive(h.clone()),
            None => Fullscreen::Borderless(None),
        };
        self.window.set_minimized(false);
        self.window.set_fullscreen(Some(fullscreen));
    }

    fn shutdown(&mut self) {
        self.gl = None;
        self.surface = None;
        self.context = None;
        self.gl_library = None;
        self.window.set_fullscreen(None);
        self.window.set_visible(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::testing::FakeDriver;
    use crate::vid_gl::tests::GLOBALS;

    #[test]
    fn test_gl_info_flags() {
        let info = GlInfo::from_strings(
            "3Dfx Interactive Inc.",
            "powervr PCX2",
            "1.1",
            "GL_EXT_texture_object GL_SGIS_multitexture GL_EXT_shared_texture_palette",
        );
        assert!(info.fullsbar);
        assert!(!info.permedia);
        assert!(info.is_3dfx);
        assert!(info.texture_object_ext);
        assert!(info.sgis_multitexture);
        assert!(info.shared_texture_palette);
    }

    #[test]
    fn test_extension_tokens_match_whole_words() {
        let info = GlInfo::from_strings("x", "Permedia 2", "1.1", "GL_EXT_texture_object_extra");
        assert!(info.permedia);
        assert!(!info.texture_object_ext);
    }

    #[test]
    fn test_gl_init_uses_extension_bind() {
        let _guard = GLOBALS.lock();
        let mut driver = FakeDriver::new();
        driver.strings.extensions = "GL_EXT_texture_object GL_SGIS_multitexture".into();
        let info = gl_init(&mut driver, &ComArgs::from_strs(&["glquake"])).unwrap();
        assert!(info.mtexable);
        assert_eq!(
            driver.resolved,
            vec!["glBindTextureEXT", "glMTexCoord2fSGIS", "glSelectTextureSGIS"]
        );
        assert!(!driver.library_bind);
        assert!(driver.state_applied);
    }

    #[test]
    fn test_gl_init_gl11_uses_library() {
        let _guard = GLOBALS.lock();
        let mut driver = FakeDriver::new();
        driver.strings.extensions = "GL_EXT_texture_object".into();
        gl_init(&mut driver, &ComArgs::from_strs(&["glquake", "-gl11"])).unwrap();
        assert!(driver.library_bind);
        assert!(driver.resolved.is_empty());
    }

    #[test]
    fn test_gl_init_without_texture_objects_fails() {
        let _guard = GLOBALS.lock();
        let mut driver = FakeDriver::new();
        driver.library_available = false;
        assert!(matches!(
            gl_init(&mut driver, &ComArgs::from_strs(&["glquake"])),
            Err(VidError::NoTextureObjects)
        ));
    }

    #[test]
    fn test_gl_init_missing_bind_ext_fails() {
        let _guard = GLOBALS.lock();
        let mut driver = FakeDriver::new();
        driver.strings.extensions = "GL_EXT_texture_object".into();
        driver.missing.push("glBindTextureEXT");
        assert!(matches!(
            gl_init(&mut driver, &ComArgs::from_strs(&["glquake"])),
            Err(VidError::ProcAddress("glBindTextureEXT"))
        ));
    }

    #[test]
    fn test_nomtex() {
        let _guard = GLOBALS.lock();
        let mut driver = FakeDriver::new();
        driver.strings.extensions = "GL_SGIS_multitexture".into();
        let info = gl_init(&mut driver, &ComArgs::from_strs(&["glquake", "-nomtex"])).unwrap();
        assert!(!info.mtexable);
    }

    #[test]
    fn test_8bit_palette_is_opt_in() {
        let _guard = GLOBALS.lock();
        let info = GlInfo::from_strings("x", "y", "1.1", "GL_EXT_shared_texture_palette");
        let rgb = vec![0u8; 768];

        let mut driver = FakeDriver::new();
        assert!(!init_8bit_palette(&mut driver, &info, &ComArgs::from_strs(&["glquake"]), &rgb));
        assert!(driver.uploaded_palette.is_none());

        let args = ComArgs::from_strs(&["glquake", "-8bit", "-no8bit"]);
        assert!(!init_8bit_palette(&mut driver, &info, &args, &rgb));

        let args = ComArgs::from_strs(&["glquake", "-8bit"]);
        assert!(init_8bit_palette(&mut driver, &info, &args, &rgb));
        assert_eq!(driver.uploaded_palette.as_deref().map(<[u8]>::len), Some(768));
    }

    #[test]
    fn test_pick_monitor_fallbacks() {
        assert_eq!(pick_monitor(Some(1), || Some(2), || vec![3]), Some(1));
        assert_eq!(pick_monitor(None, || Some(2), || vec![3]), Some(2));
        assert_eq!(pick_monitor(None, || None, || vec![3, 4]), Some(3));
        assert_eq!(pick_monitor::<i32, _>(None, || None, Vec::new), None);
    }

    #[test]
    fn test_truncate_for_print() {
        assert_eq!(truncate_for_print("abcdef", 4), "abcd");
        assert_eq!(truncate_for_print("ab", 4), "ab");
    }
}
