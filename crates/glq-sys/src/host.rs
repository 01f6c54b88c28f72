// host.rs -- seams between the platform layer and the rest of the engine

use crate::gl_imp::GlStrings;
use crate::vid_gl::VidError;
use crate::vid_modes::{DriverMode, VMode};

/// Engine services the video layer calls back into.
pub trait VidHost {
    fn block_sound(&mut self);
    fn unblock_sound(&mut self);

    fn activate_mouse(&mut self);
    fn deactivate_mouse(&mut self);
    fn show_mouse(&mut self);
    fn hide_mouse(&mut self);
    fn mouse_active(&self) -> bool;

    /// Keys are going to the game rather than the console or a menu.
    fn key_dest_is_game(&self) -> bool;

    /// Window rect changed; re-clip the cursor if captured.
    fn update_clip_cursor(&mut self) {}

    /// The status bar has to be redrawn every frame.
    fn sbar_changed(&mut self) {}

    /// Screen updates are suspended (loading plaque etc).
    fn skip_update(&self) -> bool {
        false
    }

    fn local_sound(&mut self, _name: &str) {}

    /// Return to the options menu.
    fn menu_options(&mut self) {}
}

/// Display, window and GL context operations.
pub trait VideoDriver {
    /// Modes the display reports, in driver order.
    fn enumerate_modes(&mut self) -> Vec<DriverMode>;

    /// Current desktop resolution.
    fn desktop_size(&mut self) -> (i32, i32);

    /// Size the window for `mode`, switch the display if it is fullscreen,
    /// and make a GL context current on it.
    fn open(&mut self, mode: &VMode) -> Result<(), VidError>;

    fn gl_strings(&mut self) -> GlStrings;

    /// Resolve a GL entry point by name, keeping the ones the platform layer calls.
    /// Returns false if the driver does not provide it.
    fn resolve(&mut self, name: &str) -> bool;

    /// Take glBindTexture from the system GL library instead of the context.
    fn bind_texture_from_library(&mut self) -> bool;

    /// Apply the initial fixed-function state.
    fn setup_gl_state(&mut self);

    /// Enable the shared texture palette and upload 256 RGB triplets.
    fn upload_shared_palette(&mut self, rgb: &[u8]);

    fn swap_buffers(&mut self);

    /// Restore the desktop display mode (focus lost while fullscreen).
    fn leave_fullscreen(&mut self);

    /// Re-enter the fullscreen display mode after `leave_fullscreen`.
    fn restore_fullscreen(&mut self);

    fn shutdown(&mut self);
}

/// 2D drawing the video menu needs.
pub trait MenuDraw {
    /// Width of a cached picture, if it could be loaded.
    fn pic_width(&mut self, name: &str) -> Option<i32>;
    fn draw_pic(&mut self, x: i32, y: i32, name: &str);
    fn print(&mut self, x: i32, y: i32, text: &str);
    fn print_white(&mut self, x: i32, y: i32, text: &str);
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::vid_modes::DriverMode;

    /// Display driver that records what it was asked to do.
    pub struct FakeDriver {
        pub modes: Vec<DriverMode>,
        pub desktop: (i32, i32),
        pub strings: GlStrings,
        pub missing: Vec<&'static str>,
        pub library_available: bool,
        pub fail_open: bool,

        pub opened: Vec<VMode>,
        pub resolved: Vec<String>,
        pub library_bind: bool,
        pub state_applied: bool,
        pub uploaded_palette: Option<Vec<u8>>,
        pub swaps: usize,
        pub left_fullscreen: usize,
        pub restored_fullscreen: usize,
        pub shut_down: bool,
    }

    impl FakeDriver {
        pub fn new() -> Self {
            Self {
                modes: Vec::new(),
                desktop: (1024, 768),
                strings: GlStrings {
                    vendor: "Test Vendor".into(),
                    renderer: "Test Renderer".into(),
                    version: "1.1".into(),
                    extensions: String::new(),
                },
                missing: Vec::new(),
                library_available: true,
                fail_open: false,
                opened: Vec::new(),
                resolved: Vec::new(),
                library_bind: false,
                state_applied: false,
                uploaded_palette: None,
                swaps: 0,
                left_fullscreen: 0,
                restored_fullscreen: 0,
                shut_down: false,
            }
        }
    }

    impl VideoDriver for FakeDriver {
        fn enumerate_modes(&mut self) -> Vec<DriverMode> {
            self.modes.clone()
        }

        fn desktop_size(&mut self) -> (i32, i32) {
            self.desktop
        }

        fn open(&mut self, mode: &VMode) -> Result<(), VidError> {
            if self.fail_open {
                return Err(VidError::Window("refused".into()));
            }
            self.opened.push(mode.clone());
            Ok(())
        }

        fn gl_strings(&mut self) -> GlStrings {
            self.strings.clone()
        }

        fn resolve(&mut self, name: &str) -> bool {
            if self.missing.contains(&name) {
                return false;
            }
            self.resolved.push(name.to_string());
            true
        }

        fn bind_texture_from_library(&mut self) -> bool {
            self.library_bind = self.library_available;
            self.library_available
        }

        fn setup_gl_state(&mut self) {
            self.state_applied = true;
        }

        fn upload_shared_palette(&mut self, rgb: &[u8]) {
            self.uploaded_palette = Some(rgb.to_vec());
        }

        fn swap_buffers(&mut self) {
            self.swaps += 1;
        }

        fn leave_fullscreen(&mut self) {
            self.left_fullscreen += 1;
        }

        fn restore_fullscreen(&mut self) {
            self.restored_fullscreen += 1;
        }

        fn shutdown(&mut self) {
            self.shut_down = true;
        }
    }

    /// Engine host that tracks mouse and sound calls.
    #[derive(Default)]
    pub struct RecordingHost {
        pub key_game: bool,
        pub skip: bool,
        pub mouse: bool,
        pub mouse_hidden: bool,
        pub sound_blocks: usize,
        pub sound_unblocks: usize,
        pub clip_updates: usize,
        pub sbar_changes: usize,
        pub sounds: Vec<String>,
        pub options_menu: usize,
    }

    impl VidHost for RecordingHost {
        fn block_sound(&mut self) {
            self.sound_blocks += 1;
        }

        fn unblock_sound(&mut self) {
            self.sound_unblocks += 1;
        }

        fn activate_mouse(&mut self) {
            self.mouse = true;
        }

        fn deactivate_mouse(&mut self) {
            self.mouse = false;
        }

        fn show_mouse(&mut self) {
            self.mouse_hidden = false;
        }

        fn hide_mouse(&mut self) {
            self.mouse_hidden = true;
        }

        fn mouse_active(&self) -> bool {
            self.mouse
        }

        fn key_dest_is_game(&self) -> bool {
            self.key_game
        }

        fn update_clip_cursor(&mut self) {
            self.clip_updates += 1;
        }

        fn sbar_changed(&mut self) {
            self.sbar_changes += 1;
        }

        fn skip_update(&self) -> bool {
            self.skip
        }

        fn local_sound(&mut self, name: &str) {
            self.sounds.push(name.to_string());
        }

        fn menu_options(&mut self) {
            self.options_menu += 1;
        }
    }
}
