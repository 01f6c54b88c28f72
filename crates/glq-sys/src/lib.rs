#![allow(clippy::needless_return, clippy::collapsible_if, clippy::collapsible_else_if,
         clippy::manual_range_contains, clippy::single_match, clippy::too_many_arguments,
         clippy::new_without_default)]

// Platform layer: display modes, window and GL context, palette tables,
// video menu and CD audio.

pub mod host;
pub mod vid_modes;
pub mod palette;
pub mod gl_imp;
pub mod vid_gl;
pub mod vid_menu;
pub mod cd_audio;
#[cfg(target_os = "linux")]
pub mod cd_linux;
