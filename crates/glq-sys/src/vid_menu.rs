// vid_menu.rs -- the video options menu (read-only mode list)

use glq_common::q_shared::K_ESCAPE;

use crate::host::{MenuDraw, VidHost};
use crate::vid_gl::VidState;
use crate::vid_modes::describe_mode;

const VID_ROW_SIZE: usize = 3;
const MAX_COLUMN_SIZE: i32 = 9;
const MODE_AREA_HEIGHT: i32 = MAX_COLUMN_SIZE + 2;
const MAX_MODEDESCS: usize = MAX_COLUMN_SIZE as usize * VID_ROW_SIZE;

struct ModeDesc {
    desc: String,
    iscur: bool,
}

/// VID_MenuDraw
pub fn vid_menu_draw(vid: &VidState, draw: &mut dyn MenuDraw) {
    if let Some(width) = draw.pic_width("gfx/vidmodes.lmp") {
        draw.draw_pic((320 - width) / 2, 4, "gfx/vidmodes.lmp");
    }

    let modedescs: Vec<ModeDesc> = (1..vid.num_modes())
        .filter_map(|i| {
            describe_mode(&vid.modes, i, vid.leavecurrentmode).map(|desc| ModeDesc {
                desc,
                iscur: vid.vid_modenum == Some(i),
            })
        })
        .take(MAX_MODEDESCS)
        .collect();

    if !modedescs.is_empty() {
        draw.print(2 * 8, 36, "Fullscreen Modes (WIDTHxHEIGHTxBPP)");

        let mut column = 8;
        let mut row = 36 + 2 * 8;
        for (i, m) in modedescs.iter().enumerate() {
            if m.iscur {
                draw.print_white(column, row, &m.desc);
            } else {
                draw.print(column, row, &m.desc);
            }

            column += 13 * 8;
            if i % VID_ROW_SIZE == VID_ROW_SIZE - 1 {
                column = 8;
                row += 8;
            }
        }
    }

    let help_top = 36 + MODE_AREA_HEIGHT * 8;
    draw.print(3 * 8, help_top + 8 * 2, "Video modes must be set from the");
    draw.print(3 * 8, help_top + 8 * 3, "command line with -width <width>");
    draw.print(3 * 8, help_top + 8 * 4, "and -bpp <bits-per-pixel>");
    draw.print(3 * 8, help_top + 8 * 6, "Select windowed mode with -window");
}

/// VID_MenuKey -- only Escape does anything.
pub fn vid_menu_key(key: i32, host: &mut dyn VidHost) {
    if key == K_ESCAPE {
        host.local_sound("misc/menu1.wav");
        host.menu_options();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::testing::RecordingHost;
    use crate::vid_modes::{DriverMode, ModeList};
    use glq_common::common::ComArgs;

    #[derive(Default)]
    struct FakeMenu {
        pic: Option<i32>,
        pics: Vec<(i32, i32, String)>,
        text: Vec<(i32, i32, String, bool)>,
    }

    impl MenuDraw for FakeMenu {
        fn pic_width(&mut self, _name: &str) -> Option<i32> {
            self.pic
        }

        fn draw_pic(&mut self, x: i32, y: i32, name: &str) {
            self.pics.push((x, y, name.to_string()));
        }

        fn print(&mut self, x: i32, y: i32, text: &str) {
            self.text.push((x, y, text.to_string(), false));
        }

        fn print_white(&mut self, x: i32, y: i32, text: &str) {
            self.text.push((x, y, text.to_string(), true));
        }
    }

    fn vid_with_modes(count: i32) -> VidState {
        let mut vid = VidState::new();
        vid.modes = ModeList::init_dib(&ComArgs::from_strs(&["glquake"]));
        let driver_modes: Vec<DriverMode> = (0..count)
            .map(|i| DriverMode { width: 320 + i * 16, height: 240, bpp: 16, refresh_millihertz: 0 })
            .collect();
        vid.modes.init_full_dib(&driver_modes);
        vid
    }

    #[test]
    fn test_menu_layout() {
        let mut vid = vid_with_modes(4);
        vid.vid_modenum = Some(2);
        let mut menu = FakeMenu { pic: Some(160), ..Default::default() };
        vid_menu_draw(&vid, &mut menu);

        assert_eq!(menu.pics, vec![(80, 4, "gfx/vidmodes.lmp".to_string())]);
        assert_eq!(menu.text[0], (16, 36, "Fullscreen Modes (WIDTHxHEIGHTxBPP)".to_string(), false));
        assert_eq!(menu.text[1], (8, 52, "320x240x16".to_string(), false));
        assert_eq!(menu.text[2], (112, 52, "336x240x16".to_string(), true));
        assert_eq!(menu.text[3], (216, 52, "352x240x16".to_string(), false));
        // fourth mode wraps to the next row
        assert_eq!(menu.text[4], (8, 60, "368x240x16".to_string(), false));
        assert_eq!(menu.text[5], (24, 140, "Video modes must be set from the".to_string(), false));
        assert_eq!(menu.text[8].1, 172);
    }

    #[test]
    fn test_menu_caps_mode_count() {
        let vid = vid_with_modes(40);
        let mut menu = FakeMenu::default();
        vid_menu_draw(&vid, &mut menu);
        // heading, 27 modes, 4 help lines
        assert_eq!(menu.text.len(), 1 + MAX_MODEDESCS + 4);
        assert!(menu.pics.is_empty());
    }

    #[test]
    fn test_menu_without_fullscreen_modes() {
        let vid = vid_with_modes(0);
        let mut menu = FakeMenu::default();
        vid_menu_draw(&vid, &mut menu);
        assert_eq!(menu.text.len(), 4);
    }

    #[test]
    fn test_menu_key() {
        let mut host = RecordingHost::default();
        vid_menu_key(b'a' as i32, &mut host);
        assert!(host.sounds.is_empty());
        vid_menu_key(K_ESCAPE, &mut host);
        assert_eq!(host.sounds, vec!["misc/menu1.wav"]);
        assert_eq!(host.options_menu, 1);
    }
}
